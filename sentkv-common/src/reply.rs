//! # RESP2 Reply Model
//!
//! Purpose: Represent one framed server reply and expose shape-checked
//! accessors for command result decoding.
//!
//! ## Design Principles
//! 1. **Tagged Union**: The leading wire type byte selects the variant unambiguously.
//! 2. **Null Is Not Empty**: Null bulk/multi-bulk stay distinct from their empty forms.
//! 3. **Fail Fast**: Shape mismatches surface immediately as protocol errors.
//! 4. **Binary-Safe**: Bulk payloads stay raw bytes until a caller asks for text.

use std::fmt;

use crate::error::ProtocolError;

/// Reply type tags, one per wire type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Status,
    Error,
    Integer,
    Bulk,
    MultiBulk,
}

impl fmt::Display for ReplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyKind::Status => "status",
            ReplyKind::Error => "error",
            ReplyKind::Integer => "integer",
            ReplyKind::Bulk => "bulk",
            ReplyKind::MultiBulk => "multi-bulk",
        };
        f.write_str(name)
    }
}

/// One framed RESP2 reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// +OK or +PONG style line.
    Status(String),
    /// -ERR ... line.
    Error(String),
    /// :123 line.
    Integer(i64),
    /// $-prefixed payload; `None` for the null bulk (`$-1`).
    Bulk(Option<Vec<u8>>),
    /// *-prefixed array; `None` for the null array (`*-1`).
    MultiBulk(Option<Vec<Reply>>),
}

impl Reply {
    /// Type tag of this reply.
    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::Status(_) => ReplyKind::Status,
            Reply::Error(_) => ReplyKind::Error,
            Reply::Integer(_) => ReplyKind::Integer,
            Reply::Bulk(_) => ReplyKind::Bulk,
            Reply::MultiBulk(_) => ReplyKind::MultiBulk,
        }
    }

    /// Checks the reply against an expected type tag.
    pub fn expect_kind(&self, expected: ReplyKind) -> Result<(), ProtocolError> {
        let actual = self.kind();
        if actual == expected {
            Ok(())
        } else {
            Err(ProtocolError::UnexpectedType { expected, actual })
        }
    }

    /// Unwraps a status line.
    pub fn into_status(self) -> Result<String, ProtocolError> {
        match self {
            Reply::Status(text) => Ok(text),
            other => Err(ProtocolError::UnexpectedType {
                expected: ReplyKind::Status,
                actual: other.kind(),
            }),
        }
    }

    /// Unwraps an integer reply.
    pub fn into_integer(self) -> Result<i64, ProtocolError> {
        match self {
            Reply::Integer(value) => Ok(value),
            other => Err(ProtocolError::UnexpectedType {
                expected: ReplyKind::Integer,
                actual: other.kind(),
            }),
        }
    }

    /// Unwraps a bulk payload, keeping the null bulk as `None`.
    pub fn into_bulk_or_null(self) -> Result<Option<Vec<u8>>, ProtocolError> {
        match self {
            Reply::Bulk(data) => Ok(data),
            other => Err(ProtocolError::UnexpectedType {
                expected: ReplyKind::Bulk,
                actual: other.kind(),
            }),
        }
    }

    /// Unwraps a bulk payload that must be present.
    pub fn into_bulk(self) -> Result<Vec<u8>, ProtocolError> {
        self.into_bulk_or_null()?.ok_or(ProtocolError::UnexpectedNull)
    }

    /// Unwraps a present bulk payload as UTF-8 text.
    pub fn into_bulk_string(self) -> Result<String, ProtocolError> {
        String::from_utf8(self.into_bulk()?).map_err(|_| ProtocolError::BadUtf8)
    }

    /// Unwraps a multi-bulk, keeping the null array as `None`.
    pub fn into_multi_bulk_or_null(self) -> Result<Option<Vec<Reply>>, ProtocolError> {
        match self {
            Reply::MultiBulk(items) => Ok(items),
            other => Err(ProtocolError::UnexpectedType {
                expected: ReplyKind::MultiBulk,
                actual: other.kind(),
            }),
        }
    }

    /// Unwraps a multi-bulk that must be present.
    pub fn into_multi_bulk(self) -> Result<Vec<Reply>, ProtocolError> {
        self.into_multi_bulk_or_null()?
            .ok_or(ProtocolError::UnexpectedNull)
    }
}
