//! The in-progress online transaction assembled before submission.
//!
//! The draft serialises to the exact body expected by
//! `POST /online-transactions`, and the same JSON is what gets persisted to
//! client storage between runs. Unset scalars are written as empty strings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::channel::SaleChannel;
use super::id::ProductId;

/// One product entry of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
}

impl DraftLine {
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, product_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
        }
    }
}

/// A not-yet-submitted online transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type", default, with = "blank_as_none")]
    pub channel: Option<SaleChannel>,
    #[serde(default)]
    pub order_number: String,
    #[serde(default, with = "blank_as_none")]
    pub created_date: Option<NaiveDate>,
    #[serde(rename = "products", default)]
    pub lines: Vec<DraftLine>,
}

impl TransactionDraft {
    /// Whether this is the empty initial draft.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// Partial update of the draft's scalar fields.
///
/// `None` leaves a field untouched; `Some` overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftFields {
    pub channel: Option<SaleChannel>,
    pub order_number: Option<String>,
    pub created_date: Option<NaiveDate>,
}

impl DraftFields {
    pub(crate) fn apply(self, draft: &mut TransactionDraft) {
        if let Some(channel) = self.channel {
            draft.channel = Some(channel);
        }
        if let Some(order_number) = self.order_number {
            draft.order_number = order_number;
        }
        if let Some(created_date) = self.created_date {
            draft.created_date = Some(created_date);
        }
    }
}

/// Partial update of one draft line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinePatch {
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub quantity: Option<u32>,
}

impl LinePatch {
    /// Patch that only changes the quantity.
    #[must_use]
    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, line: &mut DraftLine) {
        if let Some(product_id) = self.product_id {
            line.product_id = product_id;
        }
        if let Some(product_name) = self.product_name {
            line.product_name = product_name;
        }
        if let Some(quantity) = self.quantity {
            line.quantity = quantity;
        }
    }
}

impl TransactionDraft {
    /// Merge scalar fields. Last write wins per field.
    pub fn update_fields(&mut self, fields: DraftFields) {
        fields.apply(self);
    }

    /// Append a line. Lines are never merged by product.
    pub fn add_line(&mut self, line: DraftLine) {
        self.lines.push(line);
    }

    /// Merge `patch` into the line at `index`.
    ///
    /// Returns `false` and leaves the draft untouched if `index` is out of
    /// range.
    pub fn update_line(&mut self, index: usize, patch: LinePatch) -> bool {
        match self.lines.get_mut(index) {
            Some(line) => {
                patch.apply(line);
                true
            }
            None => false,
        }
    }

    /// Remove the line at `index`, shifting later lines down.
    ///
    /// Returns the removed line, or `None` if `index` is out of range.
    pub fn remove_line(&mut self, index: usize) -> Option<DraftLine> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }
}

/// Serde adapter mapping `None` to `""` and back, for any `Display + FromStr`.
mod blank_as_none {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[allow(clippy::ref_option)] // signature required by serde's `with`
    pub fn serialize<T: Display, S: Serializer>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_draft_wire_format() {
        let value = serde_json::to_value(TransactionDraft::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "",
                "order_number": "",
                "created_date": "",
                "products": []
            })
        );
    }

    #[test]
    fn test_filled_draft_wire_format() {
        let mut draft = TransactionDraft::default();
        draft.update_fields(DraftFields {
            channel: Some(SaleChannel::Shopee),
            order_number: Some("ORD-1".to_string()),
            created_date: NaiveDate::from_ymd_opt(2024, 5, 1),
        });
        draft.add_line(DraftLine::new("p1", "Widget", 2));

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["type"], "SHOPEE");
        assert_eq!(value["created_date"], "2024-05-01");
        assert_eq!(
            value["products"],
            serde_json::json!([{ "product_id": "p1", "product_name": "Widget", "quantity": 2 }])
        );

        let back: TransactionDraft = serde_json::from_value(value).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn test_rehydrates_sparse_snapshot() {
        let draft: TransactionDraft = serde_json::from_str(r#"{"type":"","products":[]}"#).unwrap();
        assert!(draft.is_empty());
    }

    #[test]
    fn test_update_fields_last_write_wins() {
        let mut draft = TransactionDraft::default();
        draft.update_fields(DraftFields {
            order_number: Some("ORD-1".to_string()),
            ..DraftFields::default()
        });
        draft.update_fields(DraftFields {
            order_number: Some("ORD-2".to_string()),
            ..DraftFields::default()
        });
        assert_eq!(draft.order_number, "ORD-2");
        assert_eq!(draft.channel, None);
    }

    #[test]
    fn test_add_line_never_merges() {
        let mut draft = TransactionDraft::default();
        draft.add_line(DraftLine::new("p1", "Widget", 1));
        draft.add_line(DraftLine::new("p1", "Widget", 3));
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.total_items(), 4);
    }

    #[test]
    fn test_out_of_range_edits_leave_lines_alone() {
        let mut draft = TransactionDraft::default();
        draft.add_line(DraftLine::new("p1", "Widget", 1));
        let before = draft.clone();

        assert!(!draft.update_line(1, LinePatch::quantity(5)));
        assert!(draft.remove_line(1).is_none());
        assert_eq!(draft, before);
    }
}
