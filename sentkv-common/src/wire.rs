//! # RESP2 Wire Codec
//!
//! Purpose: Encode request frames and read complete replies from an async
//! byte stream.
//!
//! ## Design Principles
//! 1. **Exact Framing**: One read consumes exactly one reply, suspending on partial input.
//! 2. **Buffer Reuse**: The caller provides the line buffer to avoid per-call allocations.
//! 3. **Binary-Safe**: Bulk strings are treated as raw bytes.
//! 4. **Fail Fast**: Invalid framing returns protocol errors immediately.

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::{ProtocolError, WireError};
use crate::reply::Reply;

/// Encodes a request as a RESP2 array of bulk strings into `out`.
///
/// The frame is `*<argc>\r\n` followed by one `$<len>\r\n<arg>\r\n` bulk per
/// part, the command name first.
pub fn encode_request(name: &[u8], args: &[Vec<u8>], out: &mut Vec<u8>) {
    out.push(b'*');
    push_usize(out, args.len() + 1);
    out.extend_from_slice(b"\r\n");
    push_bulk(out, name);
    for arg in args {
        push_bulk(out, arg);
    }
}

fn push_bulk(out: &mut Vec<u8>, data: &[u8]) {
    out.push(b'$');
    push_usize(out, data.len());
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(data);
    out.extend_from_slice(b"\r\n");
}

/// Reads one complete reply from the buffered stream and advances past it.
///
/// Suspends until the full frame has arrived; bytes belonging to the next
/// reply are left untouched.
pub async fn read_reply<R>(reader: &mut R, line_buf: &mut Vec<u8>) -> Result<Reply, WireError>
where
    R: AsyncBufRead + Unpin + Send,
{
    read_reply_inner(reader, line_buf).await
}

// Multi-bulk replies nest, so the recursive step goes through a boxed future.
fn read_reply_inner<'a, R>(
    reader: &'a mut R,
    line_buf: &'a mut Vec<u8>,
) -> Pin<Box<dyn Future<Output = Result<Reply, WireError>> + Send + 'a>>
where
    R: AsyncBufRead + Unpin + Send,
{
    Box::pin(async move {
        read_line(reader, line_buf).await?;
        if line_buf.is_empty() {
            return Err(ProtocolError::Frame("empty reply line").into());
        }

        match line_buf[0] {
            b'+' => Ok(Reply::Status(
                String::from_utf8_lossy(&line_buf[1..]).into_owned(),
            )),
            b'-' => Ok(Reply::Error(
                String::from_utf8_lossy(&line_buf[1..]).into_owned(),
            )),
            b':' => Ok(Reply::Integer(parse_i64(&line_buf[1..])?)),
            b'$' => {
                let len = parse_i64(&line_buf[1..])?;
                read_bulk(reader, len).await
            }
            b'*' => {
                let len = parse_i64(&line_buf[1..])?;
                if len < 0 {
                    return Ok(Reply::MultiBulk(None));
                }
                let mut items = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    items.push(read_reply_inner(&mut *reader, &mut *line_buf).await?);
                }
                Ok(Reply::MultiBulk(Some(items)))
            }
            other => Err(ProtocolError::UnknownType(other).into()),
        }
    })
}

async fn read_bulk<R>(reader: &mut R, len: i64) -> Result<Reply, WireError>
where
    R: AsyncBufRead + Unpin,
{
    if len < 0 {
        return Ok(Reply::Bulk(None));
    }

    let mut data = vec![0u8; len as usize];
    reader.read_exact(&mut data).await?;

    let mut crlf = [0u8; 2];
    reader.read_exact(&mut crlf).await?;
    if crlf != [b'\r', b'\n'] {
        return Err(ProtocolError::Frame("bulk payload missing terminator").into());
    }

    Ok(Reply::Bulk(Some(data)))
}

async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<(), WireError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let bytes = reader.read_until(b'\n', buf).await?;
    if bytes == 0 || buf.last() != Some(&b'\n') {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed mid-reply",
        )
        .into());
    }
    if buf.len() < 2 || buf[buf.len() - 2] != b'\r' {
        return Err(ProtocolError::Frame("reply line missing CRLF terminator").into());
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn parse_i64(data: &[u8]) -> Result<i64, ProtocolError> {
    if data.is_empty() {
        return Err(ProtocolError::BadInteger);
    }

    let mut negative = false;
    let mut idx = 0;
    if data[0] == b'-' {
        negative = true;
        idx = 1;
    }
    if idx == data.len() {
        return Err(ProtocolError::BadInteger);
    }

    let mut value: i64 = 0;
    while idx < data.len() {
        let b = data[idx];
        if !b.is_ascii_digit() {
            return Err(ProtocolError::BadInteger);
        }
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
        idx += 1;
    }

    if negative {
        Ok(-value)
    } else {
        Ok(value)
    }
}

fn push_usize(out: &mut Vec<u8>, mut value: usize) {
    // Digits go through a small stack buffer to avoid heap allocations.
    let mut buf = [0u8; 20];
    let mut len = 0;
    if value == 0 {
        buf[0] = b'0';
        len = 1;
    } else {
        while value > 0 {
            buf[len] = b'0' + (value % 10) as u8;
            value /= 10;
            len += 1;
        }
    }
    for idx in (0..len).rev() {
        out.push(buf[idx]);
    }
}
