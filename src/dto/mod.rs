//! Data handed to the rendering layer.

pub mod list;
