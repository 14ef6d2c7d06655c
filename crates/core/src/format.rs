//! Display formatting for rupiah amounts and dates (`id-ID` conventions).
//!
//! All functions are pure. Malformed input yields an empty string (or zero
//! for [`extract_number`]) rather than an error.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Indonesian month names, January first.
const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Render an amount as IDR currency with no fraction digits.
///
/// Matches `Intl.NumberFormat("id-ID", { style: "currency", currency: "IDR" })`:
/// `Rp` followed by a non-breaking space and the dot-grouped amount.
///
/// ```
/// # use backoffice_core::format::format_to_rupiah;
/// assert_eq!(format_to_rupiah(1_500_000), "Rp\u{a0}1.500.000");
/// assert_eq!(format_to_rupiah(-1_500), "-Rp\u{a0}1.500");
/// ```
#[must_use]
pub fn format_to_rupiah(amount: i64) -> String {
    let grouped = format_thousands(amount.unsigned_abs());
    if amount < 0 {
        format!("-Rp\u{a0}{grouped}")
    } else {
        format!("Rp\u{a0}{grouped}")
    }
}

/// Group digits by thousands with `.` separators: `1234567` → `1.234.567`.
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Re-format user-typed text as a dot-grouped amount.
///
/// Existing separators and any other non-digit characters are dropped before
/// grouping. Returns an empty string when no digit remains.
#[must_use]
pub fn format_rupiah(value: &str) -> String {
    let digits = only_digits(value);
    if digits.is_empty() {
        return String::new();
    }
    digits
        .parse::<u64>()
        .map(format_thousands)
        .unwrap_or_default()
}

/// Parse a dot-grouped display string back into a number.
///
/// Non-digit characters are stripped first; empty or unparseable input
/// yields `0`.
#[must_use]
pub fn extract_number(formatted: &str) -> u64 {
    only_digits(formatted).parse().unwrap_or(0)
}

/// Render an ISO date (or RFC 3339 timestamp) as a long Indonesian date,
/// e.g. `2026-10-19` → `19 Oktober 2026`.
///
/// Returns an empty string when the input cannot be parsed.
#[must_use]
pub fn format_date(iso: &str) -> String {
    parse_calendar_date(iso).map_or_else(String::new, format_naive_date)
}

/// Render a calendar date as a long Indonesian date.
#[must_use]
pub fn format_naive_date(date: NaiveDate) -> String {
    let month = month_name(date.month()).unwrap_or_default();
    format!("{} {month} {}", date.day(), date.year())
}

/// Indonesian name of a 1-based month number.
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTHS.get(index).copied()
}

fn parse_calendar_date(iso: &str) -> Option<NaiveDate> {
    let iso = iso.trim();
    if let Ok(date) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(iso) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
