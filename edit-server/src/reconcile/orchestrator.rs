//! Edit session orchestrator
//!
//! Turns a set of deltas into the platform's begin → mutate → commit
//! protocol. The platform has no transactions and no abort call, so a
//! failure after begin leaves an uncommitted session behind, which the
//! platform discards on its own. Nothing is rolled back and nothing is
//! retried.
//!
//! ```text
//! NotStarted ──begin──▶ Begun ──▶ Mutating ──commit──▶ Committed
//!                         │           │
//!                         └───────────┴──────error───▶ Failed
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::gid::calculated_line_item_gid;
use shared::money::round2;
use shared::order::{
    AdjustmentKind, AdjustmentRecord, AppliedAction, AppliedEdit, EditDelta, EditOutcome,
};
use shop_client::{ClientError, Money, OrderEditApi};

use super::codec;
use super::error::{ReconcileError, ReconcileResult};

pub const DEFAULT_CURRENCY_CODE: &str = "USD";
pub const DEFAULT_STAFF_NOTE: &str = "Final order weight";

/// Edit session knobs
#[derive(Debug, Clone, PartialEq)]
pub struct EditSessionOptions {
    /// Currency of added items and discounts
    pub currency_code: String,
    /// Staff note recorded on commit
    pub staff_note: String,
    /// Whether the customer is notified on commit
    pub notify_customer: bool,
    /// Zero out the original line after adding an upcharge for it
    ///
    /// Off by default: the original line is what later sessions resolve
    /// the upcharge against.
    pub retire_original_on_upcharge: bool,
}

impl Default for EditSessionOptions {
    fn default() -> Self {
        Self {
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
            staff_note: DEFAULT_STAFF_NOTE.to_string(),
            notify_customer: false,
            retire_original_on_upcharge: false,
        }
    }
}

/// Lifecycle of an edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Begun,
    Mutating,
    Committed,
    /// Terminal; the uncommitted session is left to expire
    Failed,
}

/// A single edit session against one order
pub struct EditSession<'a> {
    api: &'a dyn OrderEditApi,
    options: &'a EditSessionOptions,
    order_id: String,
    calculated_order_id: Option<String>,
    state: SessionState,
}

impl<'a> EditSession<'a> {
    pub fn new(
        api: &'a dyn OrderEditApi,
        options: &'a EditSessionOptions,
        order_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            options,
            order_id: order_id.into(),
            calculated_order_id: None,
            state: SessionState::NotStarted,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn calculated_order_id(&self) -> Option<&str> {
        self.calculated_order_id.as_deref()
    }

    /// Run the whole session
    ///
    /// `adjustments` must be freshly classified from the current order.
    /// An empty delta list returns [`EditOutcome::NoChanges`] without any
    /// external call.
    pub async fn run(
        &mut self,
        deltas: Vec<EditDelta>,
        adjustments: &HashMap<String, AdjustmentRecord>,
    ) -> ReconcileResult<EditOutcome> {
        if self.state != SessionState::NotStarted {
            return Err(ReconcileError::EditInProgress(self.order_id.clone()));
        }
        if deltas.is_empty() {
            tracing::info!(order_id = %self.order_id, "No changes detected, skipping edit session");
            return Ok(EditOutcome::NoChanges);
        }

        let calculated_order_id = self.begin().await?;
        self.state = SessionState::Mutating;

        let mut pending = Vec::with_capacity(deltas.len());
        for delta in deltas {
            let removed = self
                .remove_prior_upcharge(&calculated_order_id, &delta, adjustments)
                .await?;
            pending.push((delta, removed));
        }

        let mut applied = Vec::with_capacity(pending.len());
        for (mut delta, removed) in pending {
            if let Some(amount) = removed {
                delta.original_total = round2(delta.original_total - amount);
            }
            let action = self.apply_delta(&calculated_order_id, &delta).await?;
            applied.push(AppliedEdit {
                line_item_id: delta.line_item_id,
                removed_upcharge: removed,
                action,
            });
        }

        let order_id = self.commit(&calculated_order_id).await?;

        Ok(EditOutcome::Committed {
            order_id,
            calculated_order_id,
            applied,
        })
    }

    async fn begin(&mut self) -> ReconcileResult<String> {
        let result = self.api.begin_edit(&self.order_id).await;
        let calculated = match result {
            Ok(calculated) => calculated,
            Err(source) => {
                return Err(self.fail(ReconcileError::CannotEditOrder {
                    order_id: self.order_id.clone(),
                    source,
                }));
            }
        };

        tracing::info!(
            order_id = %self.order_id,
            calculated_order_id = %calculated.id,
            "Edit session begun"
        );
        self.calculated_order_id = Some(calculated.id.clone());
        self.state = SessionState::Begun;
        Ok(calculated.id)
    }

    /// Zero out the synthetic item of a prior upcharge for this line item
    ///
    /// Returns the removed amount so the baseline can be corrected.
    async fn remove_prior_upcharge(
        &mut self,
        calculated_order_id: &str,
        delta: &EditDelta,
        adjustments: &HashMap<String, AdjustmentRecord>,
    ) -> ReconcileResult<Option<Decimal>> {
        let Some(record) = adjustments
            .get(&delta.line_item_id)
            .filter(|r| r.kind == AdjustmentKind::Upcharge)
        else {
            return Ok(None);
        };
        let Some(synthetic_id) = record.synthetic_line_item_id.as_deref() else {
            return Ok(None);
        };

        let synthetic = calculated_line_item_gid(synthetic_id);
        self.api
            .set_quantity(calculated_order_id, &synthetic, 0)
            .await
            .map_err(|source| self.apply_failed(&delta.line_item_id, source))?;

        tracing::info!(
            line_item_id = %delta.line_item_id,
            upcharge_line_item_id = %synthetic,
            amount = %record.amount,
            "Removed prior upcharge"
        );
        Ok(Some(record.amount))
    }

    async fn apply_delta(
        &mut self,
        calculated_order_id: &str,
        delta: &EditDelta,
    ) -> ReconcileResult<AppliedAction> {
        let difference = delta.difference();
        if difference.is_zero() {
            return Ok(AppliedAction::None);
        }

        let text = codec::encode(
            &codec::describe(&delta.title),
            delta.final_weight,
            &delta.line_item_id,
        );
        let calculated_line_item = calculated_line_item_gid(&delta.line_item_id);

        if difference.is_sign_positive() {
            let price = Money::new(difference, &self.options.currency_code);
            let added = self
                .api
                .add_custom_item(calculated_order_id, &text, 1, &price)
                .await
                .map_err(|source| self.apply_failed(&delta.line_item_id, source))?;

            if self.options.retire_original_on_upcharge {
                self.api
                    .set_quantity(calculated_order_id, &calculated_line_item, 0)
                    .await
                    .map_err(|source| self.apply_failed(&delta.line_item_id, source))?;
            }

            tracing::info!(
                line_item_id = %delta.line_item_id,
                amount = %price.amount,
                "Added upcharge"
            );
            return Ok(AppliedAction::Upcharge {
                amount: price.amount,
                custom_line_item_ids: added,
            });
        }

        let amount = Money::new(-difference, &self.options.currency_code);
        let discount_id = self
            .api
            .add_line_item_discount(calculated_order_id, &calculated_line_item, &text, &amount)
            .await
            .map_err(|source| self.apply_failed(&delta.line_item_id, source))?;

        match discount_id.as_deref() {
            Some(discount_id) => {
                let tagged = codec::with_discount_id(&text, discount_id);
                self.api
                    .update_discount(calculated_order_id, discount_id, &tagged, &amount)
                    .await
                    .map_err(|source| self.apply_failed(&delta.line_item_id, source))?;
            }
            None => tracing::warn!(
                line_item_id = %delta.line_item_id,
                "Discount id not returned, skipping id embedding"
            ),
        }

        tracing::info!(
            line_item_id = %delta.line_item_id,
            amount = %amount.amount,
            "Added discount"
        );
        Ok(AppliedAction::Discount {
            amount: amount.amount,
            discount_id,
        })
    }

    async fn commit(&mut self, calculated_order_id: &str) -> ReconcileResult<String> {
        let result = self
            .api
            .commit_edit(
                calculated_order_id,
                self.options.notify_customer,
                &self.options.staff_note,
            )
            .await;
        match result {
            Ok(order_id) => {
                self.state = SessionState::Committed;
                tracing::info!(
                    order_id = %order_id,
                    calculated_order_id = %calculated_order_id,
                    "Edit session committed"
                );
                Ok(order_id)
            }
            Err(source) => Err(self.fail(ReconcileError::CommitFailed {
                calculated_order_id: calculated_order_id.to_string(),
                source,
            })),
        }
    }

    fn apply_failed(&mut self, line_item_id: &str, source: ClientError) -> ReconcileError {
        self.fail(ReconcileError::EditApplicationFailed {
            line_item_id: line_item_id.to_string(),
            source,
        })
    }

    fn fail(&mut self, err: ReconcileError) -> ReconcileError {
        tracing::warn!(
            order_id = %self.order_id,
            calculated_order_id = ?self.calculated_order_id,
            from_state = ?self.state,
            error = %err,
            "Edit session failed, leaving it uncommitted"
        );
        self.state = SessionState::Failed;
        err
    }
}
