//! # Connection Pool
//!
//! Purpose: Reuse TCP connections across calls to avoid repeated handshake
//! latency while keeping one in-flight request per socket.
//!
//! ## Design Principles
//! 1. **Object Pool Pattern**: Keep a bounded set of reusable connections.
//! 2. **Minimal Locking**: The mutex only guards moves in and out of the idle queue, never I/O.
//! 3. **Fail Fast**: Exceeding the pool limit returns an error immediately.
//! 4. **No Tainted Reuse**: Connections that erred, or were abandoned mid-call, never return to the pool.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use sentkv_common::{encode_request, read_reply, Reply, WireError};

use crate::error::{ClientError, ConnectionError};

/// Pool configuration, derived from the client configuration.
#[derive(Debug, Clone)]
pub(crate) struct PoolConfig {
    /// Server address, e.g. "127.0.0.1:26379".
    pub addr: String,
    /// Maximum number of idle connections to keep.
    pub max_idle: usize,
    /// Maximum total connections (idle + in-use).
    pub max_total: usize,
    /// Optional TCP connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Optional per-call read timeout.
    pub read_timeout: Option<Duration>,
    /// Optional per-call write timeout.
    pub write_timeout: Option<Duration>,
}

struct PoolState {
    idle: VecDeque<Connection>,
    total: usize,
}

struct PoolInner {
    config: PoolConfig,
    state: Mutex<PoolState>,
}

/// Connection pool handle.
#[derive(Clone)]
pub(crate) struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Creates a new connection pool with the provided configuration.
    pub fn new(config: PoolConfig) -> Self {
        let state = PoolState {
            idle: VecDeque::with_capacity(config.max_idle),
            total: 0,
        };
        ConnectionPool {
            inner: Arc::new(PoolInner {
                config,
                state: Mutex::new(state),
            }),
        }
    }

    /// Acquires an idle connection or dials a new one.
    pub async fn acquire(&self) -> Result<PooledConnection, ConnectionError> {
        if let Some(conn) = self.pop_idle() {
            return Ok(PooledConnection::new(self.inner.clone(), conn));
        }

        if !self.try_reserve() {
            return Err(ConnectionError::PoolExhausted);
        }

        match Connection::connect(&self.inner.config).await {
            Ok(conn) => Ok(PooledConnection::new(self.inner.clone(), conn)),
            Err(err) => {
                self.release_slot();
                Err(err)
            }
        }
    }

    fn pop_idle(&self) -> Option<Connection> {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        state.idle.pop_front()
    }

    fn try_reserve(&self) -> bool {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        if state.total >= self.inner.config.max_total {
            return false;
        }
        state.total += 1;
        true
    }

    fn release_slot(&self) {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        state.total = state.total.saturating_sub(1);
    }

    fn return_connection(&self, conn: Connection) {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        if state.idle.len() < self.inner.config.max_idle {
            state.idle.push_back(conn);
        } else {
            state.total = state.total.saturating_sub(1);
        }
    }
}

/// RAII wrapper returning a healthy connection to the pool on drop.
pub(crate) struct PooledConnection {
    pool: Arc<PoolInner>,
    conn: Option<Connection>,
    valid: bool,
}

impl PooledConnection {
    fn new(pool: Arc<PoolInner>, conn: Connection) -> Self {
        PooledConnection {
            pool,
            conn: Some(conn),
            valid: true,
        }
    }

    /// Runs one full request/response exchange on this connection.
    pub async fn round_trip(&mut self, name: &str, args: &[Vec<u8>]) -> Result<Reply, ClientError> {
        let conn = self.conn.as_mut().expect("connection exists");
        let result = conn.round_trip(name, args).await;
        if result.is_err() {
            // IO and framing failures leave the stream unusable.
            self.valid = false;
        }
        result
    }

    /// Prevents this connection from returning to the pool.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else { return };

        let pool = ConnectionPool {
            inner: self.pool.clone(),
        };

        // A connection abandoned between request and reply may hold a
        // partial frame; it is closed instead of reused.
        if self.valid && !conn.in_flight {
            pool.return_connection(conn);
        } else {
            pool.release_slot();
        }
    }
}

/// Single TCP connection with reusable buffers.
///
/// Exists only while connected; any failure destroys it and the pool dials
/// a replacement on the next call.
pub(crate) struct Connection {
    // Buffered reader reduces syscalls while still allowing direct writes.
    reader: BufReader<TcpStream>,
    line_buf: Vec<u8>,
    write_buf: Vec<u8>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    in_flight: bool,
}

impl Connection {
    async fn connect(config: &PoolConfig) -> Result<Self, ConnectionError> {
        let stream = match deadline(config.connect_timeout, TcpStream::connect(config.addr.as_str()))
            .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => return Err(ConnectionError::Io(err)),
            Err(limit) => return Err(ConnectionError::Timeout(limit)),
        };
        // Disable Nagle to keep request latency low for small payloads.
        stream.set_nodelay(true)?;
        tracing::debug!(addr = %config.addr, "connection established");

        Ok(Connection {
            reader: BufReader::new(stream),
            line_buf: Vec::with_capacity(128),
            write_buf: Vec::with_capacity(256),
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
            in_flight: false,
        })
    }

    async fn round_trip(&mut self, name: &str, args: &[Vec<u8>]) -> Result<Reply, ClientError> {
        // The mark stays set if the caller abandons the future or any step
        // fails, so the pool guard will not recycle this socket.
        self.in_flight = true;

        self.write_buf.clear();
        encode_request(name.as_bytes(), args, &mut self.write_buf);

        let Connection {
            reader,
            line_buf,
            write_buf,
            read_timeout,
            write_timeout,
            ..
        } = self;

        let write = async {
            let stream = reader.get_mut();
            stream.write_all(write_buf.as_slice()).await?;
            stream.flush().await
        };
        match deadline(*write_timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(ConnectionError::Io(err).into()),
            Err(limit) => return Err(ConnectionError::Timeout(limit).into()),
        }

        let reply = match deadline(*read_timeout, read_reply(reader, line_buf)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(WireError::Io(err))) => return Err(ConnectionError::Io(err).into()),
            Ok(Err(WireError::Protocol(err))) => return Err(ClientError::Protocol(err)),
            Err(limit) => return Err(ConnectionError::Timeout(limit).into()),
        };

        self.in_flight = false;
        Ok(reply)
    }
}

/// Runs `fut` under an optional time limit; `Err` carries the limit that
/// expired.
async fn deadline<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, Duration> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| limit),
        None => Ok(fut.await),
    }
}
