use super::*;
use crate::reconcile::classifier::classify;
use shared::order::{Order, Variant};
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn line_item(quantity: i64, unit_price: &str, options: &[(&str, &str)]) -> LineItem {
    LineItem {
        id: "gid://shopify/LineItem/1".to_string(),
        title: "Ribeye".to_string(),
        quantity,
        unit_price_after_discounts: d(unit_price),
        variant: Some(Variant {
            id: "gid://shopify/ProductVariant/1".to_string(),
            display_name: "Ribeye - Default Title".to_string(),
            list_price: d(unit_price),
            selected_options: options
                .iter()
                .map(|(name, value)| SelectedOption {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }),
        image_url: None,
    }
}

fn record(kind: AdjustmentKind, amount: &str, weight: &str) -> AdjustmentRecord {
    AdjustmentRecord {
        kind,
        amount: d(amount),
        referenced_line_item_id: "gid://shopify/LineItem/1".to_string(),
        encoded_weight: d(weight),
        external_record_id: None,
        synthetic_line_item_id: Some("gid://shopify/LineItem/2".to_string()),
    }
}

fn adjustments(records: Vec<AdjustmentRecord>) -> HashMap<String, AdjustmentRecord> {
    records
        .into_iter()
        .map(|r| (r.referenced_line_item_id.clone(), r))
        .collect()
}

// ========================================================================
// Variant option weight
// ========================================================================

#[test]
fn test_variant_option_weight() {
    let item = line_item(2, "10.00", &[("Weight", "3lb")]);
    let resolution = resolve(&item, &HashMap::new());

    assert_eq!(resolution.item.final_weight.to_string(), "6.00");
    assert_eq!(resolution.item.price_per_unit.to_string(), "3.33");
    assert_eq!(resolution.item.total.to_string(), "20.00");
    assert_eq!(resolution.item.weight_source, WeightSource::VariantOption);
    assert_eq!(resolution.item.display_title, "Ribeye");
    assert!(resolution.anomaly.is_none());
}

#[test]
fn test_variant_option_weight_formula_holds_for_many_inputs() {
    for (quantity, unit_price, value, per_unit) in [
        (1, "12.00", "2lb", "2"),
        (3, "7.50", "1.5 lbs", "1.5"),
        (4, "9.99", "0.5LB", "0.5"),
        (5, "20.00", "10", "10"),
    ] {
        let item = line_item(quantity, unit_price, &[("Size", "Large"), ("Weight", value)]);
        let resolved = resolve(&item, &HashMap::new()).item;
        let q = Decimal::from(quantity);
        let n = d(per_unit);
        let total = round2(d(unit_price) * q);

        assert_eq!(resolved.final_weight, round2(n * q));
        assert_eq!(resolved.price_per_unit, round2(total / (q * n)));
    }
}

#[test]
fn test_option_name_normalization() {
    let item = line_item(1, "10.00", &[(" WEIGHT ", "2lb")]);
    assert_eq!(resolve(&item, &HashMap::new()).item.final_weight, d("2"));

    let item = line_item(1, "10.00", &[("Net Weight", "2lb")]);
    assert_eq!(
        resolve(&item, &HashMap::new()).item.weight_source,
        WeightSource::Assumed
    );
}

#[test]
fn test_unparsable_option_defaults_to_one_pound() {
    let item = line_item(3, "5.00", &[("Weight", "about two pounds")]);
    let resolved = resolve(&item, &HashMap::new()).item;
    assert_eq!(resolved.final_weight.to_string(), "3.00");
    assert_eq!(resolved.price_per_unit.to_string(), "5.00");
    assert_eq!(resolved.weight_source, WeightSource::VariantOption);
}

// ========================================================================
// Assumed weight
// ========================================================================

#[test]
fn test_assumed_one_pound_per_unit() {
    let item = line_item(4, "2.50", &[("Color", "Red")]);
    let resolved = resolve(&item, &HashMap::new()).item;
    assert_eq!(resolved.final_weight.to_string(), "4.00");
    assert_eq!(resolved.price_per_unit.to_string(), "2.50");
    assert_eq!(resolved.total.to_string(), "10.00");
    assert_eq!(resolved.weight_source, WeightSource::Assumed);
}

// ========================================================================
// Adjustment records
// ========================================================================

#[test]
fn test_upcharge_adds_to_total_and_sets_weight() {
    let item = line_item(2, "10.00", &[("Weight", "3lb")]);
    let records = adjustments(vec![record(AdjustmentKind::Upcharge, "2.00", "6.00")]);
    let resolved = resolve(&item, &records).item;

    assert_eq!(resolved.total.to_string(), "22.00");
    assert_eq!(resolved.final_weight.to_string(), "6.00");
    assert_eq!(resolved.price_per_unit.to_string(), "3.67");
    assert_eq!(resolved.weight_source, WeightSource::Adjustment);
}

#[test]
fn test_discount_is_already_netted_into_price() {
    // 20.00 list, 3.35 discount allocated → unit price 8.325
    let item = line_item(2, "8.325", &[("Weight", "3lb")]);
    let records = adjustments(vec![record(AdjustmentKind::Discount, "3.35", "5.00")]);
    let resolved = resolve(&item, &records).item;

    assert_eq!(resolved.total.to_string(), "16.65");
    assert_eq!(resolved.final_weight.to_string(), "5.00");
    assert_eq!(resolved.price_per_unit.to_string(), "3.33");
}

#[test]
fn test_adjustment_weight_is_not_multiplied_by_quantity() {
    let item = line_item(3, "10.00", &[]);
    let records = adjustments(vec![record(AdjustmentKind::Upcharge, "1.00", "7.25")]);
    assert_eq!(resolve(&item, &records).item.final_weight, d("7.25"));
}

#[test]
fn test_zero_weight_is_an_anomaly_not_a_panic() {
    let item = line_item(2, "10.00", &[]);
    let records = adjustments(vec![record(AdjustmentKind::Upcharge, "2.00", "0")]);
    let resolution = resolve(&item, &records);

    assert!(matches!(
        resolution.anomaly,
        Some(Anomaly::InvalidWeight { .. })
    ));
    assert_eq!(resolution.item.final_weight.to_string(), "2.00");
    assert_eq!(resolution.item.price_per_unit.to_string(), "11.00");
}

#[test]
fn test_zero_option_weight_is_an_anomaly() {
    let item = line_item(1, "10.00", &[("Weight", "0lb")]);
    let resolution = resolve(&item, &HashMap::new());
    assert!(resolution.anomaly.is_some());
    assert_eq!(resolution.item.final_weight.to_string(), "1.00");
}

// ========================================================================
// Out-of-range weights
// ========================================================================

#[test]
fn test_tiny_record_weight_is_an_anomaly() {
    let order = Order {
        id: "gid://shopify/Order/1".to_string(),
        name: "#1001".to_string(),
        created_at: None,
        customer: None,
        line_items: vec![
            line_item(2, "10.00", &[]),
            LineItem {
                id: "gid://shopify/LineItem/2".to_string(),
                title: "Price difference (0.0000000000000000000000000001lbs) references_item:1"
                    .to_string(),
                quantity: 1,
                unit_price_after_discounts: d("2.00"),
                variant: None,
                image_url: None,
            },
        ],
        discount_applications: vec![],
    };
    let classification = classify(&order);
    let resolution = resolve(&classification.originals[0], &classification.adjustments);

    assert!(matches!(
        resolution.anomaly,
        Some(Anomaly::InvalidWeight { weight: Some(w), .. }) if w.is_zero()
    ));
    assert_eq!(resolution.item.total.to_string(), "22.00");
    assert_eq!(resolution.item.final_weight.to_string(), "2.00");
    assert_eq!(resolution.item.price_per_unit.to_string(), "11.00");
}

#[test]
fn test_tiny_option_weight_is_an_anomaly() {
    let item = line_item(1, "10.00", &[("Weight", "1e-28lb")]);
    let resolution = resolve(&item, &HashMap::new());

    assert!(matches!(
        resolution.anomaly,
        Some(Anomaly::InvalidWeight { .. })
    ));
    assert_eq!(resolution.item.final_weight.to_string(), "1.00");
    assert_eq!(resolution.item.price_per_unit.to_string(), "10.00");
}

#[test]
fn test_huge_option_weight_is_an_anomaly() {
    let item = line_item(2, "10.00", &[("Weight", "79228162514264337593543950335lb")]);
    let resolution = resolve(&item, &HashMap::new());

    assert!(matches!(
        resolution.anomaly,
        Some(Anomaly::InvalidWeight { weight: None, .. })
    ));
    assert_eq!(resolution.item.final_weight.to_string(), "2.00");
    assert_eq!(resolution.item.total.to_string(), "20.00");
}
