//! Protocol-level error types shared by the reader and the clients.

use thiserror::Error;

use crate::reply::ReplyKind;

/// Violation of the RESP2 reply grammar, or a reply whose shape does not
/// match what the issuing command declared.
///
/// A protocol error means the client and server disagree about where one
/// reply ends and the next begins, so the connection that produced it can
/// no longer be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The reply variant does not match the expected one.
    #[error("unexpected reply type: expected {expected}, got {actual}")]
    UnexpectedType {
        expected: ReplyKind,
        actual: ReplyKind,
    },
    /// A null bulk or null multi-bulk arrived where a value is required.
    #[error("unexpected null reply")]
    UnexpectedNull,
    /// An integer line or length prefix holds a non-numeric payload.
    #[error("invalid integer in reply")]
    BadInteger,
    /// The leading type byte is not one of the five reply markers.
    #[error("unknown reply type byte 0x{0:02x}")]
    UnknownType(u8),
    /// A bulk payload that should be text is not valid UTF-8.
    #[error("bulk payload is not valid utf-8")]
    BadUtf8,
    /// Line or payload framing is broken.
    #[error("malformed frame: {0}")]
    Frame(&'static str),
    /// A hash-shaped multi-bulk arrived with an odd element count, leaving
    /// the trailing key without a value.
    #[error("hash reply has an unpaired trailing field ({0} elements)")]
    UnpairedField(usize),
    /// A fixed-shape multi-bulk arrived with the wrong element count.
    #[error("multi-bulk reply has {actual} elements, expected {expected}")]
    UnexpectedLength { expected: usize, actual: usize },
}

/// Errors surfaced while reading one reply off the transport.
#[derive(Debug, Error)]
pub enum WireError {
    /// Network or IO failure while reading.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// RESP2 framing violation.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
