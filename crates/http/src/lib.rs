//! PlumbConnect HTTP client
//!
//! Typed bindings for the PlumbConnect marketplace REST API. Authenticated
//! calls go through a gateway that attaches the stored bearer token and
//! transparently refreshes it when the backend answers 401.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod types;

pub use client::{
    ApiRequest, ClientConfig, ClientError, PlumbClient, PlumbClientBuilder, RefreshError,
    SessionNavigator, TokenStorage, TracingNavigator,
};
