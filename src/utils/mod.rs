//! Utility modules for the backend core
//!
//! - **error**: Error handling and the HTTP boundary mapping
//! - **logging**: Structured logging setup

pub mod error;
pub mod logging;
