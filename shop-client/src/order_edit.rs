//! Order Edit API
//!
//! Coarse edit-session primitives offered by the platform: begin, add a
//! custom item, set a quantity, add or update a line-item discount, commit.
//! Every mutation is checked for both `userErrors` and its success payload.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::money::round2;

use crate::error::{UserError, check_user_errors};
use crate::{ClientError, ClientResult};

/// Amount with currency, as sent to the platform
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: Decimal,
    pub currency_code: String,
}

impl Money {
    /// Amount is rounded to 2 decimal places
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount: round2(amount),
            currency_code: currency_code.into(),
        }
    }
}

/// Staging copy of an order inside an edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatedOrder {
    pub id: String,
}

/// Edit-session operations against the platform
///
/// None of these calls are retried: AddCustomItem and AddLineItemDiscount
/// create a new object every time.
#[async_trait]
pub trait OrderEditApi: Send + Sync {
    /// Open an edit session for an order
    async fn begin_edit(&self, order_id: &str) -> ClientResult<CalculatedOrder>;

    /// Add a custom (variant-less) item; returns the added calculated line item ids
    async fn add_custom_item(
        &self,
        calculated_order_id: &str,
        title: &str,
        quantity: u32,
        price: &Money,
    ) -> ClientResult<Vec<String>>;

    /// Set the quantity of a calculated line item
    async fn set_quantity(
        &self,
        calculated_order_id: &str,
        calculated_line_item_id: &str,
        quantity: u32,
    ) -> ClientResult<()>;

    /// Add a fixed-amount discount to a calculated line item; returns the
    /// id of the new discount application when it can be identified
    async fn add_line_item_discount(
        &self,
        calculated_order_id: &str,
        calculated_line_item_id: &str,
        description: &str,
        amount: &Money,
    ) -> ClientResult<Option<String>>;

    /// Replace the description/amount of a staged discount
    async fn update_discount(
        &self,
        calculated_order_id: &str,
        discount_id: &str,
        description: &str,
        amount: &Money,
    ) -> ClientResult<()>;

    /// Commit the session; returns the committed order id
    async fn commit_edit(
        &self,
        calculated_order_id: &str,
        notify_customer: bool,
        staff_note: &str,
    ) -> ClientResult<String>;
}

// ============================================================================
// Wire format
// ============================================================================

/// Input of `orderEditAddLineItemDiscount` / `orderEditUpdateDiscount`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppliedDiscountInput<'a> {
    pub description: &'a str,
    pub fixed_value: &'a Money,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdNode {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BeginData {
    pub order_edit_begin: Option<BeginPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BeginPayload {
    pub calculated_order: Option<IdNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCustomItemData {
    pub order_edit_add_custom_item: Option<LineItemPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetQuantityData {
    pub order_edit_set_quantity: Option<CalculatedOrderPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LineItemPayload {
    pub calculated_line_item: Option<IdNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddDiscountData {
    pub order_edit_add_line_item_discount: Option<AddDiscountPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddDiscountPayload {
    pub calculated_line_item: Option<DiscountedLineItemNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiscountedLineItemNode {
    #[serde(default)]
    pub calculated_discount_allocations: Vec<DiscountAllocationNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiscountAllocationNode {
    pub discount_application: DiscountApplicationNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiscountApplicationNode {
    pub id: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateDiscountData {
    pub order_edit_update_discount: Option<CalculatedOrderPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalculatedOrderPayload {
    pub calculated_order: Option<IdNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommitData {
    pub order_edit_commit: Option<CommitPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommitPayload {
    pub order: Option<IdNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

fn missing(what: &str) -> ClientError {
    ClientError::InvalidResponse(format!("{} missing from response", what))
}

impl BeginData {
    pub(crate) fn into_result(self) -> ClientResult<CalculatedOrder> {
        let payload = self.order_edit_begin.ok_or_else(|| missing("orderEditBegin"))?;
        check_user_errors(payload.user_errors)?;
        payload
            .calculated_order
            .map(|node| CalculatedOrder { id: node.id })
            .ok_or_else(|| missing("calculatedOrder"))
    }
}

impl LineItemPayload {
    pub(crate) fn into_result(self, mutation: &str) -> ClientResult<Vec<String>> {
        check_user_errors(self.user_errors)?;
        self.calculated_line_item
            .map(|node| vec![node.id])
            .ok_or_else(|| missing(&format!("{}.calculatedLineItem", mutation)))
    }
}

impl AddDiscountPayload {
    /// The platform returns no direct handle to the discount application, so
    /// it is found among the line item's allocations by the description just
    /// submitted (the newest match wins)
    pub(crate) fn into_result(self, description: &str) -> ClientResult<Option<String>> {
        check_user_errors(self.user_errors)?;
        let line_item = self
            .calculated_line_item
            .ok_or_else(|| missing("orderEditAddLineItemDiscount.calculatedLineItem"))?;

        Ok(line_item
            .calculated_discount_allocations
            .into_iter()
            .rev()
            .map(|allocation| allocation.discount_application)
            .find(|app| app.description.as_deref() == Some(description))
            .map(|app| app.id))
    }
}

impl CalculatedOrderPayload {
    pub(crate) fn into_result(self, mutation: &str) -> ClientResult<()> {
        check_user_errors(self.user_errors)?;
        self.calculated_order
            .map(|_| ())
            .ok_or_else(|| missing(&format!("{}.calculatedOrder", mutation)))
    }
}

impl CommitPayload {
    pub(crate) fn into_result(self) -> ClientResult<String> {
        check_user_errors(self.user_errors)?;
        self.order
            .map(|node| node.id)
            .ok_or_else(|| missing("orderEditCommit.order"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_serialization() {
        let money = Money::new(Decimal::new(335, 2), "USD");
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json["amount"], "3.35");
        assert_eq!(json["currencyCode"], "USD");
    }

    #[test]
    fn test_begin_user_errors() {
        let data: BeginData = serde_json::from_str(
            r#"{"orderEditBegin":{"calculatedOrder":null,"userErrors":[{"field":["id"],"message":"The order cannot be edited."}]}}"#,
        )
        .unwrap();
        let err = data.into_result().unwrap_err();
        assert!(err.user_errors().is_some());
    }

    #[test]
    fn test_begin_missing_calculated_order() {
        let data: BeginData = serde_json::from_str(
            r#"{"orderEditBegin":{"calculatedOrder":null,"userErrors":[]}}"#,
        )
        .unwrap();
        assert!(matches!(
            data.into_result(),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_add_discount_finds_id_by_description() {
        let data: AddDiscountData = serde_json::from_str(
            r#"{"orderEditAddLineItemDiscount":{
                "calculatedLineItem":{"calculatedDiscountAllocations":[
                    {"discountApplication":{"id":"gid://shopify/CalculatedManualDiscountApplication/old","description":"other"}},
                    {"discountApplication":{"id":"gid://shopify/CalculatedManualDiscountApplication/new","description":"mine"}}
                ]},
                "userErrors":[]}}"#,
        )
        .unwrap();
        let payload = data.order_edit_add_line_item_discount.unwrap();
        assert_eq!(
            payload.into_result("mine").unwrap().as_deref(),
            Some("gid://shopify/CalculatedManualDiscountApplication/new")
        );
    }

    #[test]
    fn test_add_discount_without_match() {
        let payload = AddDiscountPayload {
            calculated_line_item: Some(DiscountedLineItemNode {
                calculated_discount_allocations: vec![],
            }),
            user_errors: vec![],
        };
        assert_eq!(payload.into_result("mine").unwrap(), None);
    }

    #[test]
    fn test_commit_checks_mutation_user_errors() {
        let data: CommitData = serde_json::from_str(
            r#"{"orderEditCommit":{"order":null,"userErrors":[{"field":null,"message":"Payment pending"}]}}"#,
        )
        .unwrap();
        let err = data.order_edit_commit.unwrap().into_result().unwrap_err();
        assert_eq!(err.to_string(), "User errors: Payment pending");
    }
}
