//! Gift Lists Module
//!
//! Collaborative gift lists: groups of members, per-recipient lists with
//! budgets, and items that members mark purchased.
//!
//! ## Public API
//!
//! The public API is defined in the `gift-lists-sdk` crate and re-exported
//! here:
//! - `GiftListsClient` - trait for in-process consumers
//! - `GiftGroup`, `GiftList`, `GiftItem`, `User` and their patches - data models
//! - `GiftListsError` - error type
//!
//! [`GiftLists`] wires the services over a set of repositories and hands out
//! the client and live [`Synchronizer`]s.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// === PUBLIC API (from SDK) ===
pub use gift_lists_sdk::{
    Actor, GiftGroup, GiftItem, GiftList, GiftListsClient, GiftListsError, GroupBudget, User,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::GiftLists;

// === LOCAL CLIENT ===
pub mod local_client;

// === LIVE VIEW ===
pub mod sync;
pub use sync::{ScopeStatus, Synchronizer, ViewState};

// === INTERNAL MODULES ===
// Exposed for the in-process backends and for tests.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
