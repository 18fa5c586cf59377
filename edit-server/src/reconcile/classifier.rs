//! Line item classifier
//!
//! Splits an order into the original, editable line items and the
//! adjustment records left by previous edit sessions.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use shared::gid::line_item_gid;
use shared::order::{
    AdjustmentKind, AdjustmentRecord, DiscountApplication, DiscountValue, LineItem, Order,
};

use super::codec::{self, DecodedRecord};
use super::error::Anomaly;

/// Result of classifying an order
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Editable originals, in order
    pub originals: Vec<LineItem>,
    /// Adjustment records keyed by referenced line item gid
    pub adjustments: HashMap<String, AdjustmentRecord>,
    pub anomalies: Vec<Anomaly>,
}

impl Classification {
    fn push_anomaly(&mut self, anomaly: Anomaly) {
        anomaly.log();
        self.anomalies.push(anomaly);
    }

    /// Upcharges win over discounts; within one kind the later record wins
    fn insert(&mut self, record: AdjustmentRecord) {
        match self.adjustments.entry(record.referenced_line_item_id.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(record);
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get().kind;
                if existing == record.kind {
                    let anomaly = Anomaly::DuplicateAdjustment {
                        line_item_id: record.referenced_line_item_id.clone(),
                        kind: record.kind,
                    };
                    entry.insert(record);
                    self.push_anomaly(anomaly);
                } else if record.kind == AdjustmentKind::Upcharge {
                    entry.insert(record);
                }
            }
        }
    }
}

/// Partition an order's line items and discounts
///
/// Items with a refundable quantity below 1 are excluded entirely. A
/// variant-less item is an upcharge added by a previous session; discounts
/// count only when their text carries the reference marker.
pub fn classify(order: &Order) -> Classification {
    let mut result = Classification::default();

    for item in order.line_items.iter().filter(|i| i.is_editable()) {
        if item.variant.is_some() {
            result.originals.push(item.clone());
            continue;
        }

        let Some(decoded) = decode(&mut result, &item.id, &item.title) else {
            continue;
        };
        result.insert(AdjustmentRecord {
            kind: AdjustmentKind::Upcharge,
            amount: item.discounted_total(),
            referenced_line_item_id: line_item_gid(&decoded.line_item_id),
            encoded_weight: decoded.weight_or_default(),
            external_record_id: None,
            synthetic_line_item_id: Some(item.id.clone()),
        });
    }

    for (index, discount) in order.discount_applications.iter().enumerate() {
        classify_discount(&mut result, index, discount);
    }

    tracing::debug!(
        order_id = %order.id,
        originals = result.originals.len(),
        adjustments = result.adjustments.len(),
        anomalies = result.anomalies.len(),
        "Order classified"
    );

    result
}

fn classify_discount(result: &mut Classification, index: usize, discount: &DiscountApplication) {
    let Some(text) = discount.text() else {
        return;
    };
    if !text.contains(codec::REFERENCE_MARKER) {
        return;
    }

    let source_id = format!("discount_application[{}]", index);
    let Some(decoded) = decode(result, &source_id, text) else {
        return;
    };
    let referenced = line_item_gid(&decoded.line_item_id);

    let amount = match discount.value {
        DiscountValue::Fixed(amount) => amount.abs(),
        DiscountValue::Percentage(_) => {
            result.push_anomaly(Anomaly::UnsupportedDiscountValue {
                line_item_id: referenced,
                text: text.to_string(),
            });
            return;
        }
    };

    result.insert(AdjustmentRecord {
        kind: AdjustmentKind::Discount,
        amount,
        referenced_line_item_id: referenced,
        encoded_weight: decoded.weight_or_default(),
        external_record_id: decoded.discount_id.clone(),
        synthetic_line_item_id: None,
    });
}

/// Decode a record's text, turning every recovery into an anomaly
fn decode(result: &mut Classification, source_id: &str, text: &str) -> Option<DecodedRecord> {
    let Some(decoded) = codec::decode(text) else {
        result.push_anomaly(Anomaly::DecodeAnomaly {
            source_id: source_id.to_string(),
            text: text.to_string(),
            reason: "missing line item reference".to_string(),
        });
        return None;
    };

    if decoded.weight.is_none() {
        result.push_anomaly(Anomaly::DecodeAnomaly {
            source_id: source_id.to_string(),
            text: text.to_string(),
            reason: format!("missing weight, assuming {}", codec::DEFAULT_WEIGHT),
        });
    }

    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::order::{DiscountApplicationKind, Variant};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn original(id: u64, quantity: i64) -> LineItem {
        LineItem {
            id: format!("gid://shopify/LineItem/{}", id),
            title: "Ribeye".into(),
            quantity,
            unit_price_after_discounts: d("10.00"),
            variant: Some(Variant {
                id: "gid://shopify/ProductVariant/1".into(),
                display_name: "Ribeye".into(),
                list_price: d("10.00"),
                selected_options: vec![],
            }),
            image_url: None,
        }
    }

    fn custom(id: u64, title: &str, price: &str, quantity: i64) -> LineItem {
        LineItem {
            id: format!("gid://shopify/LineItem/{}", id),
            title: title.into(),
            quantity,
            unit_price_after_discounts: d(price),
            variant: None,
            image_url: None,
        }
    }

    fn manual_discount(description: &str, value: DiscountValue) -> DiscountApplication {
        DiscountApplication {
            kind: DiscountApplicationKind::Manual,
            title: Some("Price difference".into()),
            description: Some(description.into()),
            value,
        }
    }

    fn order(line_items: Vec<LineItem>, discounts: Vec<DiscountApplication>) -> Order {
        Order {
            id: "gid://shopify/Order/1".into(),
            name: "#1001".into(),
            created_at: None,
            customer: None,
            line_items,
            discount_applications: discounts,
        }
    }

    #[test]
    fn test_partitions_originals_and_upcharges() {
        let result = classify(&order(
            vec![
                original(11, 2),
                custom(
                    12,
                    "Price difference between Ribeye's expected and actual weight (6.00lbs) references_item:11",
                    "2.00",
                    1,
                ),
            ],
            vec![],
        ));

        assert_eq!(result.originals.len(), 1);
        assert_eq!(result.originals[0].id, "gid://shopify/LineItem/11");

        let record = &result.adjustments["gid://shopify/LineItem/11"];
        assert_eq!(record.kind, AdjustmentKind::Upcharge);
        assert_eq!(record.amount.to_string(), "2.00");
        assert_eq!(record.encoded_weight, d("6"));
        assert_eq!(
            record.synthetic_line_item_id.as_deref(),
            Some("gid://shopify/LineItem/12")
        );
        assert!(result.anomalies.is_empty());
    }

    #[test]
    fn test_zero_quantity_items_are_excluded() {
        let result = classify(&order(
            vec![
                original(11, 0),
                custom(12, "Old upcharge (6.00lbs) references_item:11", "2.00", 0),
            ],
            vec![],
        ));
        assert!(result.originals.is_empty());
        assert!(result.adjustments.is_empty());
    }

    #[test]
    fn test_custom_item_without_reference_is_dropped_with_anomaly() {
        let result = classify(&order(
            vec![original(11, 1), custom(12, "Gift wrapping", "5.00", 1)],
            vec![],
        ));
        assert!(result.adjustments.is_empty());
        assert!(matches!(
            result.anomalies.as_slice(),
            [Anomaly::DecodeAnomaly { .. }]
        ));
    }

    #[test]
    fn test_marked_discount_becomes_record() {
        let result = classify(&order(
            vec![original(11, 2)],
            vec![
                manual_discount("Loyalty", DiscountValue::Fixed(d("1.00"))),
                manual_discount(
                    "Price difference (5.00lbs) references_item:11 discount_id:77",
                    DiscountValue::Fixed(d("3.35")),
                ),
            ],
        ));

        let record = &result.adjustments["gid://shopify/LineItem/11"];
        assert_eq!(record.kind, AdjustmentKind::Discount);
        assert_eq!(record.amount, d("3.35"));
        assert_eq!(record.encoded_weight, d("5"));
        assert_eq!(record.external_record_id.as_deref(), Some("77"));
        // unmarked discounts are ignored silently
        assert!(result.anomalies.is_empty());
    }

    #[test]
    fn test_percentage_discount_is_unsupported() {
        let result = classify(&order(
            vec![original(11, 2)],
            vec![manual_discount(
                "Price difference (5.00lbs) references_item:11",
                DiscountValue::Percentage(d("10")),
            )],
        ));
        assert!(result.adjustments.is_empty());
        assert!(matches!(
            result.anomalies.as_slice(),
            [Anomaly::UnsupportedDiscountValue { .. }]
        ));
    }

    #[test]
    fn test_upcharge_wins_over_discount() {
        let result = classify(&order(
            vec![
                original(11, 2),
                custom(12, "Price difference (7.00lbs) references_item:11", "7.00", 1),
            ],
            vec![manual_discount(
                "Price difference (4.50lbs) references_item:11 discount_id:5",
                DiscountValue::Fixed(d("2.00")),
            )],
        ));

        let record = &result.adjustments["gid://shopify/LineItem/11"];
        assert_eq!(record.kind, AdjustmentKind::Upcharge);
        assert_eq!(record.encoded_weight, d("7"));
    }

    #[test]
    fn test_duplicate_records_keep_latest() {
        let result = classify(&order(
            vec![original(11, 2)],
            vec![
                manual_discount(
                    "Price difference (5.00lbs) references_item:11 discount_id:1",
                    DiscountValue::Fixed(d("3.35")),
                ),
                manual_discount(
                    "Price difference (4.00lbs) references_item:11 discount_id:2",
                    DiscountValue::Fixed(d("3.33")),
                ),
            ],
        ));

        let record = &result.adjustments["gid://shopify/LineItem/11"];
        assert_eq!(record.external_record_id.as_deref(), Some("2"));
        assert!(matches!(
            result.anomalies.as_slice(),
            [Anomaly::DuplicateAdjustment { .. }]
        ));
    }
}
