//! Remote API access for the myFlix client.
//!
//! [`HttpGateway`] implements [`myflix_core::CatalogApi`] over HTTPS with
//! `reqwest`, attaching the session's bearer token to authorized calls.

pub mod http_gateway;

pub use http_gateway::HttpGateway;
