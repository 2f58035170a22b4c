// sentkv-common - Shared wire protocol definitions for the SentKV clients
//
// This crate defines the RESP2 reply model and the framing codec

pub mod error;
pub mod reply;
pub mod wire;

// Re-export for convenience
pub use error::*;
pub use reply::*;
pub use wire::*;
