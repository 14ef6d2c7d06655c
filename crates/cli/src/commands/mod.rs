//! Command implementations.
//!
//! Each command returns the text to print; `main` writes it to stdout.

pub mod draft;
pub mod products;
pub mod session;
pub mod settings;
pub mod transactions;

use backoffice_admin::AppError;
use backoffice_core::Rupiah;
use backoffice_core::format::extract_number;

/// Parse an operator-typed amount such as `25.000` or `Rp 25.000`.
pub(crate) fn parse_rupiah(field: &str, text: &str) -> Result<Rupiah, AppError> {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest(format!("{field} must contain a number")));
    }
    i64::try_from(extract_number(text))
        .map(Rupiah::new)
        .map_err(|_| AppError::BadRequest(format!("{field} is too large")))
}

/// Turn a 1-based line number into an index.
pub(crate) fn line_index(line: usize) -> Result<usize, AppError> {
    line.checked_sub(1)
        .ok_or_else(|| AppError::BadRequest("line numbers start at 1".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rupiah() {
        assert_eq!(parse_rupiah("cost", "25.000").unwrap(), Rupiah::new(25_000));
        assert_eq!(parse_rupiah("cost", "Rp\u{a0}1.500.000").unwrap(), Rupiah::new(1_500_000));
        assert!(parse_rupiah("cost", "").is_err());
        assert!(parse_rupiah("cost", "gratis").is_err());
    }

    #[test]
    fn test_line_index() {
        assert_eq!(line_index(1).unwrap(), 0);
        assert!(line_index(0).is_err());
    }
}
