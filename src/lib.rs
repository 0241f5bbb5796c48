//! Headless admin client for the mehfil community backend.
//!
//! The crate owns everything an admin screen does apart from drawing it:
//! the HTTP transport, a tag-invalidated query cache, typed resources, form
//! validation, table state and permission checks.

pub mod api;
pub mod cache;
pub mod controller;
pub mod domain;
pub mod dto;
pub mod forms;
#[cfg(feature = "client")]
pub mod models;
pub mod pagination;
pub mod permissions;
pub mod persist;
pub mod transport;
pub mod upload;

/// Message shown when a failed request carries no server message.
pub const GENERIC_FAILURE: &str = "Something went wrong, please try again";
