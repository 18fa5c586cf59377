//! In-memory platform doubles and order fixtures
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use edit_server::reconcile::EditSessionOptions;
use edit_server::{Config, ReconcileService, ServerState};
use rust_decimal::Decimal;
use shared::gid::order_gid;
use shared::order::{
    DiscountApplication, DiscountApplicationKind, DiscountValue, LineItem, Order, SelectedOption,
    Variant,
};
use shop_client::{
    CalculatedOrder, ClientError, ClientResult, Money, OrderEditApi, OrderQuery, UserError,
};
use tokio::sync::Notify;

pub const ORDER_ID: &str = "gid://shopify/Order/1";
pub const CALCULATED_ORDER_ID: &str = "gid://shopify/CalculatedOrder/500";
pub const L1: &str = "gid://shopify/LineItem/1";

pub fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Fixtures
// ============================================================================

/// L1: quantity 2, discounted unit price 10.00, variant option "Weight: 3lb"
pub fn ribeye() -> LineItem {
    LineItem {
        id: L1.to_string(),
        title: "Ribeye".to_string(),
        quantity: 2,
        unit_price_after_discounts: d("10.00"),
        variant: Some(Variant {
            id: "gid://shopify/ProductVariant/100".to_string(),
            display_name: "Ribeye - 3lb".to_string(),
            list_price: d("10.00"),
            selected_options: vec![SelectedOption {
                name: "Weight".to_string(),
                value: "3lb".to_string(),
            }],
        }),
        image_url: None,
    }
}

/// Upcharge custom item left by an earlier session
pub fn upcharge_item(id: u64, amount: &str, weight: &str, references: &str) -> LineItem {
    LineItem {
        id: format!("gid://shopify/LineItem/{}", id),
        title: format!(
            "Price difference between Ribeye - 3lb's expected and actual weight ({}lbs) references_item:{}",
            weight, references
        ),
        quantity: 1,
        unit_price_after_discounts: d(amount),
        variant: None,
        image_url: None,
    }
}

/// Manual discount left by an earlier session
pub fn marked_discount(amount: &str, weight: &str, references: &str, id: &str) -> DiscountApplication {
    DiscountApplication {
        kind: DiscountApplicationKind::Manual,
        title: Some("Price difference".to_string()),
        description: Some(format!(
            "Price difference between Ribeye - 3lb's expected and actual weight ({}lbs) references_item:{} discount_id:{}",
            weight, references, id
        )),
        value: DiscountValue::Fixed(d(amount)),
    }
}

pub fn order(line_items: Vec<LineItem>, discount_applications: Vec<DiscountApplication>) -> Order {
    Order {
        id: ORDER_ID.to_string(),
        name: "#1001".to_string(),
        created_at: None,
        customer: None,
        line_items,
        discount_applications,
    }
}

// ============================================================================
// Order Query double
// ============================================================================

#[derive(Default)]
pub struct MockOrderQuery {
    order: Mutex<Option<Order>>,
    /// Signalled when a fetch starts
    pub entered: Arc<Notify>,
    /// When set, fetches wait for it before returning
    gate: Option<Arc<Notify>>,
}

impl MockOrderQuery {
    pub fn new(order: Order) -> Self {
        Self {
            order: Mutex::new(Some(order)),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn gated(order: Order, gate: Arc<Notify>) -> Self {
        Self {
            order: Mutex::new(Some(order)),
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub fn set_order(&self, order: Order) {
        *self.order.lock().unwrap() = Some(order);
    }
}

#[async_trait]
impl OrderQuery for MockOrderQuery {
    async fn get_order(&self, order_id: &str) -> ClientResult<Order> {
        self.entered.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let order = self.order.lock().unwrap().clone();
        order
            .filter(|o| o.id == order_gid(order_id))
            .ok_or_else(|| ClientError::NotFound(format!("Order {}", order_id)))
    }
}

// ============================================================================
// Order Edit API double
// ============================================================================

/// One recorded platform call
#[derive(Debug, Clone, PartialEq)]
pub enum EditCall {
    Begin {
        order_id: String,
    },
    AddCustomItem {
        calculated_order_id: String,
        title: String,
        quantity: u32,
        amount: Decimal,
        currency: String,
    },
    SetQuantity {
        calculated_order_id: String,
        line_item_id: String,
        quantity: u32,
    },
    AddLineItemDiscount {
        calculated_order_id: String,
        line_item_id: String,
        description: String,
        amount: Decimal,
    },
    UpdateDiscount {
        calculated_order_id: String,
        discount_id: String,
        description: String,
        amount: Decimal,
    },
    Commit {
        calculated_order_id: String,
        notify_customer: bool,
        staff_note: String,
    },
}

/// Call that should fail with a user error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Begin,
    AddCustomItem,
    SetQuantity,
    AddLineItemDiscount,
    UpdateDiscount,
    Commit,
}

pub struct MockEditApi {
    calls: Mutex<Vec<EditCall>>,
    fail_at: Option<FailAt>,
    return_discount_id: bool,
}

impl Default for MockEditApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_at: None,
            return_discount_id: true,
        }
    }
}

impl MockEditApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(fail_at: FailAt) -> Self {
        Self {
            fail_at: Some(fail_at),
            ..Self::default()
        }
    }

    pub fn without_discount_id() -> Self {
        Self {
            return_discount_id: false,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<EditCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: EditCall, point: FailAt) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_at == Some(point) {
            return Err(ClientError::UserErrors(vec![UserError {
                field: Some(vec!["id".to_string()]),
                message: format!("{:?} rejected", point),
            }]));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderEditApi for MockEditApi {
    async fn begin_edit(&self, order_id: &str) -> ClientResult<CalculatedOrder> {
        self.record(
            EditCall::Begin {
                order_id: order_id.to_string(),
            },
            FailAt::Begin,
        )?;
        Ok(CalculatedOrder {
            id: CALCULATED_ORDER_ID.to_string(),
        })
    }

    async fn add_custom_item(
        &self,
        calculated_order_id: &str,
        title: &str,
        quantity: u32,
        price: &Money,
    ) -> ClientResult<Vec<String>> {
        self.record(
            EditCall::AddCustomItem {
                calculated_order_id: calculated_order_id.to_string(),
                title: title.to_string(),
                quantity,
                amount: price.amount,
                currency: price.currency_code.clone(),
            },
            FailAt::AddCustomItem,
        )?;
        Ok(vec!["gid://shopify/CalculatedLineItem/900".to_string()])
    }

    async fn set_quantity(
        &self,
        calculated_order_id: &str,
        calculated_line_item_id: &str,
        quantity: u32,
    ) -> ClientResult<()> {
        self.record(
            EditCall::SetQuantity {
                calculated_order_id: calculated_order_id.to_string(),
                line_item_id: calculated_line_item_id.to_string(),
                quantity,
            },
            FailAt::SetQuantity,
        )
    }

    async fn add_line_item_discount(
        &self,
        calculated_order_id: &str,
        calculated_line_item_id: &str,
        description: &str,
        amount: &Money,
    ) -> ClientResult<Option<String>> {
        self.record(
            EditCall::AddLineItemDiscount {
                calculated_order_id: calculated_order_id.to_string(),
                line_item_id: calculated_line_item_id.to_string(),
                description: description.to_string(),
                amount: amount.amount,
            },
            FailAt::AddLineItemDiscount,
        )?;
        Ok(self
            .return_discount_id
            .then(|| "gid://shopify/CalculatedManualDiscountApplication/77".to_string()))
    }

    async fn update_discount(
        &self,
        calculated_order_id: &str,
        discount_id: &str,
        description: &str,
        amount: &Money,
    ) -> ClientResult<()> {
        self.record(
            EditCall::UpdateDiscount {
                calculated_order_id: calculated_order_id.to_string(),
                discount_id: discount_id.to_string(),
                description: description.to_string(),
                amount: amount.amount,
            },
            FailAt::UpdateDiscount,
        )
    }

    async fn commit_edit(
        &self,
        calculated_order_id: &str,
        notify_customer: bool,
        staff_note: &str,
    ) -> ClientResult<String> {
        self.record(
            EditCall::Commit {
                calculated_order_id: calculated_order_id.to_string(),
                notify_customer,
                staff_note: staff_note.to_string(),
            },
            FailAt::Commit,
        )?;
        Ok(ORDER_ID.to_string())
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub fn service(query: Arc<MockOrderQuery>, api: Arc<MockEditApi>) -> ReconcileService {
    ReconcileService::new(query, api, EditSessionOptions::default())
}

pub fn state(query: Arc<MockOrderQuery>, api: Arc<MockEditApi>) -> ServerState {
    ServerState::with_service(
        Config::new("demo.myshopify.com", "shpat_test"),
        service(query, api),
    )
}
