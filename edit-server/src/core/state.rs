use std::sync::Arc;

use shop_client::{OrderEditApi, OrderQuery, ShopClient};

use super::Config;
use super::error::Result;
use crate::reconcile::ReconcileService;

/// Shared state of every request handler
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub service: Arc<ReconcileService>,
}

impl ServerState {
    /// Wire the reconciliation service to the shop's admin API
    pub fn initialize(config: &Config) -> Result<Self> {
        let client = Arc::new(ShopClient::new(&config.client_config())?);
        let query: Arc<dyn OrderQuery> = client.clone();
        let edit_api: Arc<dyn OrderEditApi> = client;

        tracing::info!(
            shop = %config.shop_domain,
            api_version = %config.api_version,
            timeout_ms = config.request_timeout_ms,
            "Shop client ready"
        );

        Ok(Self::with_service(
            config.clone(),
            ReconcileService::new(query, edit_api, config.edit_options()),
        ))
    }

    /// State over an existing service (used with in-memory collaborators)
    pub fn with_service(config: Config, service: ReconcileService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    /// Admin page of an order on the shop
    pub fn order_admin_url(&self, order_id: &str) -> String {
        self.config.client_config().order_admin_url(order_id)
    }
}
