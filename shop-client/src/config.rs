//! Client configuration

use std::time::Duration;

/// Default admin API version
pub const DEFAULT_API_VERSION: &str = "2024-10";

/// Default per-call timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Client configuration for connecting to a shop's admin API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Shop domain (e.g., "my-shop.myshopify.com")
    pub shop_domain: String,

    /// Admin API access token
    pub access_token: String,

    /// Admin API version (e.g., "2024-10")
    pub api_version: String,

    /// Timeout applied to every external call
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(shop_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop_domain: shop_domain.into(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Set the admin API version
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// GraphQL endpoint URL
    pub fn endpoint(&self) -> String {
        let domain = self
            .shop_domain
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        format!("https://{}/admin/api/{}/graphql.json", domain, self.api_version)
    }

    /// Admin page of an order, where the operator lands after a commit
    pub fn order_admin_url(&self, order_id: &str) -> String {
        let domain = self
            .shop_domain
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        format!(
            "https://{}/admin/orders/{}",
            domain,
            shared::gid::bare_id(order_id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let config = ClientConfig::new("https://demo.myshopify.com/", "token");
        assert_eq!(
            config.endpoint(),
            "https://demo.myshopify.com/admin/api/2024-10/graphql.json"
        );
        let config = config.with_api_version("2025-01");
        assert_eq!(
            config.endpoint(),
            "https://demo.myshopify.com/admin/api/2025-01/graphql.json"
        );
    }

    #[test]
    fn test_order_admin_url() {
        let config = ClientConfig::new("demo.myshopify.com", "token");
        assert_eq!(
            config.order_admin_url("gid://shopify/Order/42"),
            "https://demo.myshopify.com/admin/orders/42"
        );
    }
}
