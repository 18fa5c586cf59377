//! Weight/price resolver
//!
//! Infers `(price_per_unit, final_weight, total)` for a line item from the
//! signals available, first match wins:
//!
//! 1. an adjustment record from a previous edit (its encoded weight is the
//!    total weight, not per unit)
//! 2. a variant option named "weight" with a `<n>lb` value
//! 3. nothing: 1 lb per unit
//!
//! `total` is always derived from the order's actual discounted price.
//! Every value leaving the resolver is rounded to 2 decimal places.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::money::{parse_decimal, round2};
use shared::order::{
    AdjustmentKind, AdjustmentRecord, LineItem, ResolvedLineItem, SelectedOption, WeightSource,
};

use super::error::Anomaly;

/// Option name (after normalization) that carries a per-unit weight
const WEIGHT_OPTION: &str = "weight";

/// A resolved line item and the anomaly recovered from, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub item: ResolvedLineItem,
    pub anomaly: Option<Anomaly>,
}

/// Resolve one line item against the adjustments keyed by line item id
pub fn resolve(
    line_item: &LineItem,
    adjustments: &HashMap<String, AdjustmentRecord>,
) -> Resolution {
    let quantity = Decimal::from(line_item.quantity);

    let (total, weight, source) = match adjustments.get(&line_item.id) {
        Some(record) => (
            adjusted_total(line_item, record),
            Some(record.encoded_weight),
            WeightSource::Adjustment,
        ),
        None => {
            let total = line_item.discounted_total();
            match option_weight(line_item) {
                Some(per_unit) => (
                    total,
                    per_unit.checked_mul(quantity),
                    WeightSource::VariantOption,
                ),
                None => (total, Some(quantity), WeightSource::Assumed),
            }
        }
    };

    let per_pound = weight.and_then(|w| price_per_pound(total, w).map(|ppu| (w, ppu)));
    let (weight, price_per_unit, anomaly) = match per_pound {
        Some((weight, ppu)) => (weight, ppu, None),
        None => {
            let invalid = Anomaly::InvalidWeight {
                line_item_id: line_item.id.clone(),
                weight: weight.map(round2),
            };
            invalid.log();
            let fallback = quantity.max(Decimal::ONE);
            let ppu = total.checked_div(fallback).map(round2).unwrap_or_default();
            (fallback, ppu, Some(invalid))
        }
    };

    let item = ResolvedLineItem {
        line_item: line_item.clone(),
        display_title: line_item.display_title(),
        price_per_unit,
        final_weight: round2(weight),
        total: round2(total),
        weight_source: source,
    };

    Resolution { item, anomaly }
}

/// `round(total / weight, 2)`; `None` unless the weight is at least 0.01
/// after rounding and the quotient fits
fn price_per_pound(total: Decimal, weight: Decimal) -> Option<Decimal> {
    if round2(weight) <= Decimal::ZERO {
        return None;
    }
    total.checked_div(weight).map(round2)
}

/// Total owed given a prior adjustment
///
/// An upcharge lives on its own custom line item, so it is added back. A
/// discount is allocated to this line and already reduces its discounted
/// unit price.
fn adjusted_total(line_item: &LineItem, record: &AdjustmentRecord) -> Decimal {
    let discounted = line_item.discounted_total();
    match record.kind {
        AdjustmentKind::Upcharge => discounted.saturating_add(record.amount),
        AdjustmentKind::Discount => discounted,
    }
}

/// Per-unit pounds from a weight-named variant option
///
/// An unparsable value counts as 1 lb.
fn option_weight(line_item: &LineItem) -> Option<Decimal> {
    let option = line_item
        .variant
        .as_ref()?
        .selected_options
        .iter()
        .find(|o| is_weight_option(o))?;

    Some(parse_pounds(&option.value).unwrap_or(Decimal::ONE))
}

fn is_weight_option(option: &SelectedOption) -> bool {
    let normalized: String = option
        .name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    normalized.eq_ignore_ascii_case(WEIGHT_OPTION)
}

/// `"2lb"`, `"2 lbs"`, `"2.5LB"` → pounds
fn parse_pounds(value: &str) -> Option<Decimal> {
    let lower = value.trim().to_ascii_lowercase();
    let number = lower
        .strip_suffix("lbs")
        .or_else(|| lower.strip_suffix("lb"))
        .unwrap_or(&lower);
    parse_decimal(number)
}

#[cfg(test)]
mod tests;
