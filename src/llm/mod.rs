//! LLM provider resolution and completion client.

pub mod client;
pub mod provider;

pub use client::{HttpModelClient, ModelClient};
pub use provider::{DEFAULT_MODEL, ModelSelection, Provider, WireFormat};
