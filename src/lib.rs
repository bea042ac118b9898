//! LightFrame
//!
//! Client and local web UI for the LightFrame image compression API.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
