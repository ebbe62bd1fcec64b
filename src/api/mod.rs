//! Backend and identity provider access
//!
//! - `transport`: the [`Transport`] seam and the reqwest implementation
//! - `resource`: per-record endpoint descriptors
//! - `client`: typed CRUD and billing actions
//! - `auth`: sign-in, token refresh and the persisted session

pub mod auth;
pub mod client;
pub mod resource;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use auth::{decode_claims, IdentityClient, Session, TokenClaims};
pub use client::ApiClient;
pub use resource::Resource;
pub use transport::{ApiRequest, ApiResponse, Body, HttpTransport, Method, Transport};
