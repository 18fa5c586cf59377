//! Diff engine

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::money::{round2, same_amount};
use shared::order::{EditDelta, LineItemEdit, ResolvedLineItem};

use super::error::{ReconcileError, ReconcileResult};

/// Apply operator edits to the resolved originals
///
/// Edits naming unknown line items are skipped; negative values are
/// rejected before anything is sent anywhere.
pub fn apply_edits(
    resolved: &[ResolvedLineItem],
    edits: &[LineItemEdit],
) -> ReconcileResult<Vec<ResolvedLineItem>> {
    let mut by_id: HashMap<&str, &LineItemEdit> = HashMap::with_capacity(edits.len());
    for edit in edits {
        validate(edit)?;
        if !resolved.iter().any(|item| item.id() == edit.line_item_id) {
            tracing::warn!(line_item_id = %edit.line_item_id, "Edit for unknown line item skipped");
            continue;
        }
        by_id.insert(edit.line_item_id.as_str(), edit);
    }

    resolved
        .iter()
        .map(|item| match by_id.get(item.id()) {
            Some(edit) => item.apply_edit(edit).ok_or_else(|| ReconcileError::InvalidEdit {
                line_item_id: edit.line_item_id.clone(),
                reason: "price per unit × weight is out of range".to_string(),
            }),
            None => Ok(item.clone()),
        })
        .collect()
}

fn validate(edit: &LineItemEdit) -> ReconcileResult<()> {
    let invalid = |reason: &str| ReconcileError::InvalidEdit {
        line_item_id: edit.line_item_id.clone(),
        reason: reason.to_string(),
    };
    if edit.price_per_unit.is_some_and(|p| p < Decimal::ZERO) {
        return Err(invalid("price per unit must not be negative"));
    }
    if edit.final_weight.is_some_and(|w| w < Decimal::ZERO) {
        return Err(invalid("weight must not be negative"));
    }
    Ok(())
}

/// Deltas for every edited item whose total differs from its original
///
/// Output follows the order of `originals`; items whose totals match after
/// 2-decimal normalization produce nothing.
pub fn diff(originals: &[ResolvedLineItem], edited: &[ResolvedLineItem]) -> Vec<EditDelta> {
    let edited: HashMap<&str, &ResolvedLineItem> =
        edited.iter().map(|item| (item.id(), item)).collect();

    originals
        .iter()
        .filter_map(|original| {
            let edited = edited.get(original.id())?;
            if same_amount(original.total, edited.total) {
                return None;
            }
            Some(EditDelta {
                line_item_id: original.id().to_string(),
                original_total: round2(original.total),
                new_total: round2(edited.total),
                final_weight: round2(edited.final_weight),
                title: original.display_title.clone(),
            })
        })
        .collect()
}
