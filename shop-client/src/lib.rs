//! Shop Client - commerce platform adapter
//!
//! Reads orders and drives order-edit sessions through the platform's
//! admin GraphQL API. The engine depends only on the [`OrderQuery`] and
//! [`OrderEditApi`] traits; [`ShopClient`] is the network implementation.

pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod order_edit;
pub mod order_query;
mod queries;

pub use client::ShopClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, UserError};
pub use graphql::GraphqlClient;
pub use order_edit::{CalculatedOrder, Money, OrderEditApi};
pub use order_query::OrderQuery;
