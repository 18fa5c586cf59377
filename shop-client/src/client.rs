//! Network implementation of the order query and edit traits

use async_trait::async_trait;
use serde_json::json;
use shared::gid::order_gid;
use shared::order::Order;

use crate::order_edit::{
    AddCustomItemData, AddDiscountData, AppliedDiscountInput, BeginData, CommitData,
    SetQuantityData, UpdateDiscountData,
};
use crate::order_query::OrderData;
use crate::queries;
use crate::{
    CalculatedOrder, ClientConfig, ClientError, ClientResult, GraphqlClient, Money, OrderEditApi,
    OrderQuery,
};

/// Admin API client for a single shop
#[derive(Debug, Clone)]
pub struct ShopClient {
    graphql: GraphqlClient,
}

impl ShopClient {
    /// Create a new shop client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            graphql: GraphqlClient::new(config)?,
        })
    }

    /// Underlying GraphQL transport
    pub fn graphql(&self) -> &GraphqlClient {
        &self.graphql
    }
}

fn payload<T>(payload: Option<T>, mutation: &str) -> ClientResult<T> {
    payload.ok_or_else(|| ClientError::InvalidResponse(format!("{} missing from response", mutation)))
}

#[async_trait]
impl OrderQuery for ShopClient {
    async fn get_order(&self, order_id: &str) -> ClientResult<Order> {
        let id = order_gid(order_id);
        tracing::debug!(order_id = %id, "Fetching order");

        let data: OrderData = self
            .graphql
            .execute(queries::GET_ORDER_FOR_EDIT, json!({ "id": id }))
            .await?;
        data.into_order(&id)
    }
}

#[async_trait]
impl OrderEditApi for ShopClient {
    async fn begin_edit(&self, order_id: &str) -> ClientResult<CalculatedOrder> {
        let data: BeginData = self
            .graphql
            .execute(queries::ORDER_EDIT_BEGIN, json!({ "id": order_gid(order_id) }))
            .await?;
        data.into_result()
    }

    async fn add_custom_item(
        &self,
        calculated_order_id: &str,
        title: &str,
        quantity: u32,
        price: &Money,
    ) -> ClientResult<Vec<String>> {
        let data: AddCustomItemData = self
            .graphql
            .execute(
                queries::ORDER_EDIT_ADD_CUSTOM_ITEM,
                json!({
                    "id": calculated_order_id,
                    "title": title,
                    "price": price,
                    "quantity": quantity,
                }),
            )
            .await?;
        payload(data.order_edit_add_custom_item, "orderEditAddCustomItem")?
            .into_result("orderEditAddCustomItem")
    }

    async fn set_quantity(
        &self,
        calculated_order_id: &str,
        calculated_line_item_id: &str,
        quantity: u32,
    ) -> ClientResult<()> {
        let data: SetQuantityData = self
            .graphql
            .execute(
                queries::ORDER_EDIT_SET_QUANTITY,
                json!({
                    "id": calculated_order_id,
                    "lineItemId": calculated_line_item_id,
                    "quantity": quantity,
                }),
            )
            .await?;
        payload(data.order_edit_set_quantity, "orderEditSetQuantity")?
            .into_result("orderEditSetQuantity")
    }

    async fn add_line_item_discount(
        &self,
        calculated_order_id: &str,
        calculated_line_item_id: &str,
        description: &str,
        amount: &Money,
    ) -> ClientResult<Option<String>> {
        let data: AddDiscountData = self
            .graphql
            .execute(
                queries::ORDER_EDIT_ADD_LINE_ITEM_DISCOUNT,
                json!({
                    "id": calculated_order_id,
                    "lineItemId": calculated_line_item_id,
                    "discount": AppliedDiscountInput {
                        description,
                        fixed_value: amount,
                    },
                }),
            )
            .await?;
        payload(
            data.order_edit_add_line_item_discount,
            "orderEditAddLineItemDiscount",
        )?
        .into_result(description)
    }

    async fn update_discount(
        &self,
        calculated_order_id: &str,
        discount_id: &str,
        description: &str,
        amount: &Money,
    ) -> ClientResult<()> {
        let data: UpdateDiscountData = self
            .graphql
            .execute(
                queries::ORDER_EDIT_UPDATE_DISCOUNT,
                json!({
                    "id": calculated_order_id,
                    "discountApplicationId": discount_id,
                    "discount": AppliedDiscountInput {
                        description,
                        fixed_value: amount,
                    },
                }),
            )
            .await?;
        payload(data.order_edit_update_discount, "orderEditUpdateDiscount")?
            .into_result("orderEditUpdateDiscount")
    }

    async fn commit_edit(
        &self,
        calculated_order_id: &str,
        notify_customer: bool,
        staff_note: &str,
    ) -> ClientResult<String> {
        let data: CommitData = self
            .graphql
            .execute(
                queries::ORDER_EDIT_COMMIT,
                json!({
                    "id": calculated_order_id,
                    "notifyCustomer": notify_customer,
                    "staffNote": staff_note,
                }),
            )
            .await?;
        payload(data.order_edit_commit, "orderEditCommit")?.into_result()
    }
}
