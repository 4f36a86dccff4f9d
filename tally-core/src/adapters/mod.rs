//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the InsightsBackend port
//! - Local filesystem for the FilePicker port
//! - Mock backend server and in-memory ports for testing

pub mod http;
pub mod local_picker;

#[cfg(test)]
pub mod mock_backend;
