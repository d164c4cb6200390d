#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Card payments for the checkout payments SDK.
//!
//! This crate confirms a card as the payment source for an order and drives
//! the optional 3-D Secure step-up that some card networks require before a
//! payment is approved.
//!
//! # Overview
//!
//! [`client::CardConfirmationClient`] makes the single REST call that
//! attaches a card to an order. When the result carries a challenge
//! descriptor, [`approve::ApproveOrderClient`] launches the interactive 3DS
//! sub-flow through the injected [`approve::ChallengeHandler`] seam and maps
//! its verdict onto listener events — exactly one terminal event per
//! attempt, delivered on a single, caller-predictable context.
//!
//! # Modules
//!
//! - [`approve`] — approve-order orchestrator, events, and the 3DS seam
//! - [`card`] — card data and its wire form
//! - [`client`] — card confirmation REST client
//! - [`types`] — confirmation result and challenge descriptor

pub mod approve;
pub mod card;
pub mod client;
pub mod types;

pub use approve::{ApproveOrderClient, ApproveOrderEvent, ApproveOrderListener, ThreeDsVerdict};
pub use card::Card;
pub use client::CardConfirmationClient;
pub use types::{CardConfirmationResult, ThreeDsChallenge};
