//! Reconciliation service
//!
//! Glues the pure engine (classifier, resolver, diff) to the platform
//! collaborators. Every call re-fetches and re-classifies the order; no
//! view or adjustment state is kept between calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use shared::gid::order_gid;
use shared::order::{
    AdjustmentRecord, EditDelta, EditOutcome, LineItemEdit, Order, ResolvedLineItem,
};
use shop_client::{ClientError, OrderEditApi, OrderQuery};

use super::classifier::{Classification, classify};
use super::diff::{apply_edits, diff};
use super::error::{Anomaly, ReconcileError, ReconcileResult};
use super::orchestrator::{EditSession, EditSessionOptions};
use super::resolver::resolve;

/// Operator-facing view of an order
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub order_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub customer_name: String,
    /// Editable line items with inferred weight and price per pound
    pub line_items: Vec<ResolvedLineItem>,
    /// Records left by previous edit sessions
    pub adjustments: Vec<AdjustmentRecord>,
    pub anomalies: Vec<Anomaly>,
}

/// An order with its classification and resolved originals
struct LoadedOrder {
    order: Order,
    classification: Classification,
    resolved: Vec<ResolvedLineItem>,
}

/// Order edit reconciliation over injected platform collaborators
pub struct ReconcileService {
    query: Arc<dyn OrderQuery>,
    edit_api: Arc<dyn OrderEditApi>,
    options: EditSessionOptions,
    /// Orders with a submission in flight in this process
    in_flight: DashMap<String, ()>,
}

/// Releases the in-flight mark of an order when dropped
struct InFlightGuard<'a> {
    in_flight: &'a DashMap<String, ()>,
    order_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.order_id);
    }
}

impl ReconcileService {
    pub fn new(
        query: Arc<dyn OrderQuery>,
        edit_api: Arc<dyn OrderEditApi>,
        options: EditSessionOptions,
    ) -> Self {
        Self {
            query,
            edit_api,
            options,
            in_flight: DashMap::new(),
        }
    }

    pub fn options(&self) -> &EditSessionOptions {
        &self.options
    }

    /// Build the edit view of an order
    pub async fn view(&self, order_id: &str) -> ReconcileResult<OrderView> {
        let loaded = self.load(order_id).await?;
        let LoadedOrder {
            order,
            classification,
            resolved,
        } = loaded;

        let mut adjustments: Vec<AdjustmentRecord> =
            classification.adjustments.into_values().collect();
        adjustments.sort_by(|a, b| a.referenced_line_item_id.cmp(&b.referenced_line_item_id));

        Ok(OrderView {
            customer_name: order
                .customer
                .as_ref()
                .map(|c| c.display_name())
                .unwrap_or_else(|| "Guest".to_string()),
            order_id: order.id,
            name: order.name,
            created_at: order.created_at,
            line_items: resolved,
            adjustments,
            anomalies: classification.anomalies,
        })
    }

    /// Deltas an edit submission would apply, without touching the order
    pub async fn preview(
        &self,
        order_id: &str,
        edits: &[LineItemEdit],
    ) -> ReconcileResult<Vec<EditDelta>> {
        let loaded = self.load(order_id).await?;
        let edited = apply_edits(&loaded.resolved, edits)?;
        Ok(diff(&loaded.resolved, &edited))
    }

    /// Apply operator edits to an order in one edit session
    pub async fn submit(
        &self,
        order_id: &str,
        edits: &[LineItemEdit],
    ) -> ReconcileResult<EditOutcome> {
        let order_id = order_gid(order_id);
        let _guard = self.acquire(&order_id)?;

        let loaded = self.load(&order_id).await?;
        let edited = apply_edits(&loaded.resolved, edits)?;
        let deltas = diff(&loaded.resolved, &edited);

        tracing::info!(
            order_id = %order_id,
            edits = edits.len(),
            deltas = deltas.len(),
            "Submitting order edits"
        );

        let mut session = EditSession::new(self.edit_api.as_ref(), &self.options, &order_id);
        session
            .run(deltas, &loaded.classification.adjustments)
            .await
    }

    fn acquire(&self, order_id: &str) -> ReconcileResult<InFlightGuard<'_>> {
        match self.in_flight.entry(order_id.to_string()) {
            Entry::Occupied(_) => {
                tracing::warn!(order_id = %order_id, "Concurrent edit submission refused");
                Err(ReconcileError::EditInProgress(order_id.to_string()))
            }
            Entry::Vacant(entry) => {
                entry.insert(());
                Ok(InFlightGuard {
                    in_flight: &self.in_flight,
                    order_id: order_id.to_string(),
                })
            }
        }
    }

    async fn load(&self, order_id: &str) -> ReconcileResult<LoadedOrder> {
        let order_id = order_gid(order_id);
        let order = self
            .query
            .get_order(&order_id)
            .await
            .map_err(|source| match source {
                ClientError::NotFound(_) => ReconcileError::OrderNotFound(order_id.clone()),
                source => ReconcileError::Query {
                    order_id: order_id.clone(),
                    source,
                },
            })?;

        let mut classification = classify(&order);
        let mut resolved = Vec::with_capacity(classification.originals.len());
        for item in &classification.originals {
            let resolution = resolve(item, &classification.adjustments);
            resolved.push(resolution.item);
            classification.anomalies.extend(resolution.anomaly);
        }

        Ok(LoadedOrder {
            order,
            classification,
            resolved,
        })
    }
}
