//! Types derived by the reconciliation engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::LineItem;
use crate::money::round2;

// ============================================================================
// Adjustment Records
// ============================================================================

/// Direction of a compensating record created by a previous edit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentKind {
    /// Custom line item raising the billed total
    Upcharge,
    /// Line-item discount lowering the billed total
    Discount,
}

/// Upcharge or discount applied by a previous edit session, decoded from
/// the text of the order itself
///
/// The order is the only store: a fresh set of records is rebuilt from the
/// order contents every session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentRecord {
    pub kind: AdjustmentKind,
    /// Absolute amount; `kind` gives the direction
    pub amount: Decimal,
    /// Original line item this record compensates (line item gid)
    pub referenced_line_item_id: String,
    /// Weight in effect when the record was created
    pub encoded_weight: Decimal,
    /// Embedded discount id (discounts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_record_id: Option<String>,
    /// The upcharge's own custom line item (upcharges only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthetic_line_item_id: Option<String>,
}

// ============================================================================
// Resolved Line Items
// ============================================================================

/// Where the resolver found the weight of a line item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightSource {
    /// Weight embedded in a previous upcharge/discount
    Adjustment,
    /// Weight-named variant option
    VariantOption,
    /// No information: 1 lb per unit
    Assumed,
}

/// An editable line item with inferred price-per-pound and weight
///
/// `price_per_unit` and `final_weight` are an editing convenience; `total`
/// is the authoritative amount owed, derived from the order's actual price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedLineItem {
    #[serde(flatten)]
    pub line_item: LineItem,
    /// Display title (variant name without the default suffix)
    pub display_title: String,
    pub price_per_unit: Decimal,
    pub final_weight: Decimal,
    pub total: Decimal,
    pub weight_source: WeightSource,
}

impl ResolvedLineItem {
    pub fn id(&self) -> &str {
        &self.line_item.id
    }

    /// Apply an operator edit
    ///
    /// The total is recomputed as `round(price_per_unit × final_weight, 2)`
    /// only when the edit actually changes one of the two fields; otherwise
    /// the authoritative total is kept as is. `None` when the product does
    /// not fit in a decimal.
    pub fn apply_edit(&self, edit: &LineItemEdit) -> Option<ResolvedLineItem> {
        let price_per_unit = edit.price_per_unit.map(round2).unwrap_or(self.price_per_unit);
        let final_weight = edit.final_weight.map(round2).unwrap_or(self.final_weight);

        if price_per_unit == self.price_per_unit && final_weight == self.final_weight {
            return Some(self.clone());
        }

        let total = price_per_unit.checked_mul(final_weight)?;
        Some(ResolvedLineItem {
            price_per_unit,
            final_weight,
            total: round2(total),
            ..self.clone()
        })
    }
}

/// Operator edit of one line item (either field may be left unchanged)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemEdit {
    pub line_item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_weight: Option<Decimal>,
}

// ============================================================================
// Deltas and Outcomes
// ============================================================================

/// A line item whose billed total must change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditDelta {
    pub line_item_id: String,
    /// Baseline the delta is measured against
    pub original_total: Decimal,
    pub new_total: Decimal,
    pub final_weight: Decimal,
    pub title: String,
}

impl EditDelta {
    /// `new_total - original_total`, rounded
    pub fn difference(&self) -> Decimal {
        round2(self.new_total - self.original_total)
    }
}

/// External mutation performed for one delta
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AppliedAction {
    Upcharge {
        amount: Decimal,
        custom_line_item_ids: Vec<String>,
    },
    Discount {
        amount: Decimal,
        #[serde(skip_serializing_if = "Option::is_none")]
        discount_id: Option<String>,
    },
    /// Baseline already matched after removing a prior upcharge
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedEdit {
    pub line_item_id: String,
    /// Prior upcharge removed before applying the new amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_upcharge: Option<Decimal>,
    #[serde(flatten)]
    pub action: AppliedAction,
}

/// Result of an edit submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditOutcome {
    /// Every edited total matched its original; no external call was made
    NoChanges,
    Committed {
        order_id: String,
        calculated_order_id: String,
        applied: Vec<AppliedEdit>,
    },
}
