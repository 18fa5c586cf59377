//! Adjustment record codec
//!
//! The platform keeps no structured metadata on custom items or discounts,
//! so the link back to the source line item lives in their free text:
//!
//! ```text
//! record      = description " (" weight "lbs) " reference [ " " discount-id ]
//! reference   = "references_item:" bare-line-item-id
//! discount-id = "discount_id:" bare-discount-id
//! ```
//!
//! The markers are a stable format: records written by older sessions must
//! stay decodable. Decoding never fails; a missing reference yields `None`
//! and a missing or malformed weight is reported as absent.
//!
//! When the text holds several `(<n>lbs)` groups, the last one before the
//! reference marker is the record weight rather than the first: a product
//! title with its own weight in parentheses cannot shadow it. Texts with a
//! single group decode the same either way.

use rust_decimal::Decimal;
use shared::gid::bare_id;
use shared::money::{fmt2, parse_decimal};

pub const REFERENCE_MARKER: &str = "references_item:";
pub const DISCOUNT_ID_MARKER: &str = "discount_id:";
pub const WEIGHT_UNIT: &str = "lbs";

/// Weight assumed when a record carries none
pub const DEFAULT_WEIGHT: Decimal = Decimal::ONE;

/// Fields recovered from a record's text
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    /// Bare id of the referenced line item
    pub line_item_id: String,
    /// `None` when the weight token is absent or unparsable
    pub weight: Option<Decimal>,
    /// Bare discount application id, when embedded
    pub discount_id: Option<String>,
}

impl DecodedRecord {
    pub fn weight_or_default(&self) -> Decimal {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }
}

/// Human-readable part of a record for a line item title
pub fn describe(title: &str) -> String {
    format!("Price difference between {}'s expected and actual weight", title)
}

/// Append the weight and reference markers to a description
pub fn encode(description: &str, weight: Decimal, line_item_id: &str) -> String {
    format!(
        "{} ({}{}) {}{}",
        description,
        fmt2(weight),
        WEIGHT_UNIT,
        REFERENCE_MARKER,
        bare_id(line_item_id)
    )
}

/// Embed (or replace) the discount id in an encoded record
pub fn with_discount_id(text: &str, discount_id: &str) -> String {
    let base = match text.rfind(DISCOUNT_ID_MARKER) {
        Some(pos) => text[..pos].trim_end(),
        None => text.trim_end(),
    };
    format!("{} {}{}", base, DISCOUNT_ID_MARKER, bare_id(discount_id))
}

/// Decode a record; `None` when the text carries no usable reference
pub fn decode(text: &str) -> Option<DecodedRecord> {
    let marker = text.rfind(REFERENCE_MARKER)?;
    let line_item_id = first_token(&text[marker + REFERENCE_MARKER.len()..])?;

    let discount_id = text
        .rfind(DISCOUNT_ID_MARKER)
        .and_then(|pos| first_token(&text[pos + DISCOUNT_ID_MARKER.len()..]));

    Some(DecodedRecord {
        line_item_id: line_item_id.to_string(),
        weight: decode_weight(&text[..marker]),
        discount_id: discount_id.map(str::to_string),
    })
}

/// Leading token up to whitespace; `None` when empty
fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next().filter(|t| !t.is_empty())
}

/// The `(<n>lbs)` group written by [`encode`] sits right before the
/// reference marker, so the last such group wins over any that a product
/// title may contain
fn decode_weight(text: &str) -> Option<Decimal> {
    let group = parenthesized_groups(text)
        .filter(|g| g.trim_end().ends_with(WEIGHT_UNIT))
        .last()?;
    let number = group.trim_end().trim_end_matches(WEIGHT_UNIT);
    parse_decimal(number)
}

fn parenthesized_groups(text: &str) -> impl Iterator<Item = &str> {
    text.split('(')
        .skip(1)
        .filter_map(|rest| rest.split_once(')').map(|(inner, _)| inner))
}
