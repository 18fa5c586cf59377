//! GraphQL transport for the admin API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

#[derive(Serialize)]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

/// HTTP client posting GraphQL documents to a single endpoint
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl GraphqlClient {
    /// Create a new GraphQL client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            access_token: config.access_token.clone(),
        })
    }

    /// GraphQL endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a document and return its `data` object
    pub async fn execute<V, T>(&self, query: &str, variables: V) -> ClientResult<T>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await.map_err(ClientError::from_transport)?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_body(&text)
    }
}

/// Decode a GraphQL response body, surfacing top-level errors first
fn parse_body<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
    let body: GraphqlResponse<T> = serde_json::from_str(text)?;

    if !body.errors.is_empty() {
        return Err(ClientError::GraphQl(
            body.errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    body.data
        .ok_or_else(|| ClientError::InvalidResponse("Missing data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Data {
        value: i32,
    }

    #[test]
    fn test_parse_body_data() {
        let data: Data = parse_body(r#"{"data":{"value":7}}"#).unwrap();
        assert_eq!(data.value, 7);
    }

    #[test]
    fn test_parse_body_errors_win() {
        let err = parse_body::<Data>(r#"{"data":null,"errors":[{"message":"Throttled"}]}"#)
            .unwrap_err();
        assert!(matches!(err, ClientError::GraphQl(ref m) if m == &["Throttled".to_string()]));
    }

    #[test]
    fn test_parse_body_missing_data() {
        let err = parse_body::<Data>(r#"{"data":null}"#).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }
}
