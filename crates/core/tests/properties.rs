//! Properties of the formatting helpers and the draft that must hold for
//! every input, not just the hand-picked samples in the unit tests.

use backoffice_core::format::{extract_number, format_rupiah, format_thousands};
use backoffice_core::{DraftLine, LinePatch, TransactionDraft};
use proptest::prelude::*;

fn line_strategy() -> impl Strategy<Value = DraftLine> {
    ("[a-z0-9]{1,8}", "[A-Za-z ]{0,12}", 1u32..1_000)
        .prop_map(|(id, name, quantity)| DraftLine::new(id, name, quantity))
}

fn draft_with(lines: &[DraftLine]) -> TransactionDraft {
    let mut draft = TransactionDraft::default();
    for line in lines {
        draft.add_line(line.clone());
    }
    draft
}

// ============================================================================
// Amount formatting
// ============================================================================

proptest! {
    /// Grouping then parsing gives back the original amount.
    #[test]
    fn test_rupiah_round_trip(n in any::<u64>()) {
        prop_assert_eq!(extract_number(&format_rupiah(&n.to_string())), n);
    }

    /// Grouped output only ever contains digits and dots, with groups of three.
    #[test]
    fn test_thousands_grouping_shape(n in any::<u64>()) {
        let formatted = format_thousands(n);
        let groups: Vec<&str> = formatted.split('.').collect();
        prop_assert!(groups.iter().all(|g| g.chars().all(|c| c.is_ascii_digit())));
        prop_assert!(groups.iter().skip(1).all(|g| g.len() == 3));
        prop_assert!(groups.first().is_some_and(|g| (1..=3).contains(&g.len())));
    }
}

// ============================================================================
// Draft lines
// ============================================================================

proptest! {
    /// Every added line is kept, in call order, without merging.
    #[test]
    fn test_add_line_keeps_length_and_order(
        lines in prop::collection::vec(line_strategy(), 0..20)
    ) {
        let draft = draft_with(&lines);
        prop_assert_eq!(draft.lines.len(), lines.len());
        prop_assert_eq!(&draft.lines, &lines);
    }

    /// In range, removal behaves like `Vec::remove`; out of range, nothing changes.
    #[test]
    fn test_remove_line_matches_vec_remove(
        lines in prop::collection::vec(line_strategy(), 0..20),
        index in 0usize..25,
    ) {
        let mut draft = draft_with(&lines);
        let mut expected = lines.clone();

        let removed = draft.remove_line(index);
        if index < lines.len() {
            prop_assert_eq!(removed, Some(expected.remove(index)));
        } else {
            prop_assert_eq!(removed, None);
        }
        prop_assert_eq!(&draft.lines, &expected);
    }

    /// A quantity patch touches only the addressed line.
    #[test]
    fn test_update_line_changes_only_that_line(
        lines in prop::collection::vec(line_strategy(), 0..20),
        index in 0usize..25,
        quantity in 1u32..1_000,
    ) {
        let mut draft = draft_with(&lines);

        let updated = draft.update_line(index, LinePatch::quantity(quantity));
        prop_assert_eq!(updated, index < lines.len());
        prop_assert_eq!(draft.lines.len(), lines.len());
        for (i, (after, before)) in draft.lines.iter().zip(&lines).enumerate() {
            if i == index {
                prop_assert_eq!(after.quantity, quantity);
                prop_assert_eq!(&after.product_id, &before.product_id);
                prop_assert_eq!(&after.product_name, &before.product_name);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }
}
