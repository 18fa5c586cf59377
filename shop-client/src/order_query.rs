//! Order Query Service
//!
//! Read-only access to an order with everything the edit view needs:
//! refundable quantities (editability) and variant options (weight metadata).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::money::to_decimal;
use shared::order::{
    Customer, DiscountApplication, DiscountApplicationKind, DiscountValue, LineItem, Order,
    SelectedOption, Variant,
};

use crate::{ClientError, ClientResult};

/// Read access to orders
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Fetch an order by bare id or order gid
    async fn get_order(&self, order_id: &str) -> ClientResult<Order>;
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct OrderData {
    order: Option<OrderNode>,
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderNode {
    id: String,
    name: String,
    created_at: Option<DateTime<Utc>>,
    customer: Option<CustomerNode>,
    discount_applications: Nodes<DiscountNode>,
    line_items: Nodes<LineItemNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerNode {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiscountNode {
    #[serde(rename = "__typename")]
    typename: String,
    value: DiscountValueNode,
    title: Option<String>,
    description: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum DiscountValueNode {
    MoneyV2 { amount: Decimal },
    PricingPercentageValue { percentage: f64 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemNode {
    id: String,
    title: String,
    refundable_quantity: i64,
    image: Option<ImageNode>,
    variant: Option<VariantNode>,
    discounted_unit_price_set: MoneyBagNode,
}

#[derive(Debug, Deserialize)]
struct ImageNode {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantNode {
    id: String,
    display_name: String,
    price: Decimal,
    #[serde(default)]
    selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyBagNode {
    presentment_money: MoneyNode,
}

#[derive(Debug, Deserialize)]
struct MoneyNode {
    amount: Decimal,
}

// ============================================================================
// Conversion
// ============================================================================

impl OrderData {
    /// Convert the query result, reporting a missing order as `NotFound`
    pub(crate) fn into_order(self, order_id: &str) -> ClientResult<Order> {
        self.order
            .map(Order::from)
            .ok_or_else(|| ClientError::NotFound(format!("Order {}", order_id)))
    }
}

impl From<OrderNode> for Order {
    fn from(node: OrderNode) -> Self {
        Order {
            id: node.id,
            name: node.name,
            created_at: node.created_at,
            customer: node.customer.map(|c| Customer {
                first_name: c.first_name,
                last_name: c.last_name,
                email: c.email,
            }),
            line_items: node.line_items.nodes.into_iter().map(LineItem::from).collect(),
            discount_applications: node
                .discount_applications
                .nodes
                .into_iter()
                .map(DiscountApplication::from)
                .collect(),
        }
    }
}

impl From<LineItemNode> for LineItem {
    fn from(node: LineItemNode) -> Self {
        LineItem {
            id: node.id,
            title: node.title,
            quantity: node.refundable_quantity,
            unit_price_after_discounts: node.discounted_unit_price_set.presentment_money.amount,
            variant: node.variant.map(|v| Variant {
                id: v.id,
                display_name: v.display_name,
                list_price: v.price,
                selected_options: v.selected_options,
            }),
            image_url: node.image.map(|i| i.url),
        }
    }
}

impl From<DiscountNode> for DiscountApplication {
    fn from(node: DiscountNode) -> Self {
        let kind = match node.typename.as_str() {
            "ManualDiscountApplication" => DiscountApplicationKind::Manual,
            "DiscountCodeApplication" => DiscountApplicationKind::DiscountCode,
            "ScriptDiscountApplication" => DiscountApplicationKind::Script,
            "AutomaticDiscountApplication" => DiscountApplicationKind::Automatic,
            _ => DiscountApplicationKind::Other,
        };
        let value = match node.value {
            DiscountValueNode::MoneyV2 { amount } => DiscountValue::Fixed(amount),
            DiscountValueNode::PricingPercentageValue { percentage } => {
                DiscountValue::Percentage(to_decimal(percentage))
            }
        };
        DiscountApplication {
            kind,
            title: node.title.or(node.code),
            description: node.description,
            value,
        }
    }
}
