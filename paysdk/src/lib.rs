#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the checkout payments SDK.
//!
//! This crate provides the foundational pieces used throughout the SDK:
//! configuration, the error taxonomy, the HTTP transport boundary, and the
//! typed GraphQL execution layer. It deliberately carries no HTTP client of
//! its own — network I/O is injected through the [`transport::Transport`]
//! trait, with a `reqwest`-backed implementation in the `paysdk-http` crate.
//!
//! # Overview
//!
//! A host application uses this crate to query a merchant's eligibility for
//! funding methods against a GraphQL backend. Each concrete query implements
//! the [`graphql::Query`] capability (build a request body, parse the typed
//! result); [`graphql::GraphQlClient`] dispatches it over the transport and
//! classifies the outcome into a uniform response envelope carrying the
//! server's correlation id for support diagnostics.
//!
//! # Modules
//!
//! - [`client_id`] - Client-ID resolution boundary
//! - [`config`] - SDK configuration and environments
//! - [`eligibility`] - Funding-method eligibility query and service
//! - [`error`] - Error taxonomy shared across the SDK
//! - [`graphql`] - Typed GraphQL request construction, dispatch, and parsing
//! - [`transport`] - HTTP transport boundary types and trait

pub mod client_id;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod graphql;
pub mod transport;

pub use config::{CoreConfig, Environment};
pub use error::CoreError;
