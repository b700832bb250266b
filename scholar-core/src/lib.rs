//! Scholar Core - Core data structures and trait definitions
//!
//! This module defines the chat data model, the error taxonomy, configuration
//! and logging shared by the chat client and its front ends.

pub mod config;
pub mod error;
pub mod logging;
pub mod markup;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use markup::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;
