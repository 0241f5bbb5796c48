//! Runtime settings of the admin client.

pub mod config;
