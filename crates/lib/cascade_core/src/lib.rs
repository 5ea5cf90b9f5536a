//! # cascade_core
//!
//! Core logic for the Cascade integration rule editor: the three-tier draft
//! model, cascading context resolution, and the uniqueness checks that gate
//! persistence.

pub mod editor;
pub mod gateway;
pub mod models;
pub mod settings;
pub mod uuid;

pub use editor::{ConfigEditor, EditorError};
pub use gateway::{GatewayError, IntegrationGateway};
pub use settings::EditorSettings;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
