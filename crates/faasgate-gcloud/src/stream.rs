//! Pull-style request and push-style response sink traits.
//!
//! This provider exposes the request as an object to pull data from and the
//! response as a sink to push data into. The sink has a hard protocol rule:
//! status and headers must be set before the first body byte, after which
//! they are frozen.

use std::io;

use bytes::Bytes;

/// Pull-style view of the native request.
///
/// Head fields (method, URI, headers) are available up front; the body is
/// pulled once, on demand.
pub trait PullRequest {
    /// HTTP verb as delivered by the runtime; case-insensitive.
    fn method(&self) -> &str;

    /// Request target: path plus optional `?query`.
    fn uri(&self) -> &str;

    /// Header pairs in wire order. Names may repeat.
    fn header_pairs(&self) -> &[(String, String)];

    /// Pull the request body. `Ok(None)` means the invocation carried no
    /// body at all; an empty `Bytes` means an empty one.
    fn read_body(&mut self) -> io::Result<Option<Bytes>>;
}

/// Push-style view of the native response.
///
/// Implementations must reject `set_status` and `add_header` once the first
/// body byte has been written, and reject everything once closed.
pub trait ResponseSink {
    /// Set the status line. Head phase only.
    fn set_status(&mut self, status: u16) -> io::Result<()>;

    /// Append a header value. Head phase only.
    fn add_header(&mut self, name: &str, value: &str) -> io::Result<()>;

    /// Write a body chunk. The first write freezes the head.
    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Flush and close the sink. Idempotent close is not required; callers
    /// call it at most once.
    fn finish(&mut self) -> io::Result<()>;
}

/// In-memory [`PullRequest`] used by hosts and tests.
#[derive(Debug, Clone)]
pub struct BufferedRequest {
    method: String,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl BufferedRequest {
    /// Create a bodyless buffered request.
    #[must_use]
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a header pair.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl PullRequest for BufferedRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn header_pairs(&self) -> &[(String, String)] {
        &self.headers
    }

    fn read_body(&mut self) -> io::Result<Option<Bytes>> {
        Ok(self.body.take())
    }
}

/// Write phase of a [`BufferedSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkPhase {
    /// Status and headers may still change.
    Head,
    /// First body byte written; head is frozen.
    Body,
    /// `finish` was called; nothing more is accepted.
    Closed,
}

/// In-memory [`ResponseSink`] enforcing the head-freeze protocol.
#[derive(Debug)]
pub struct BufferedSink {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    phase: SinkPhase,
}

impl BufferedSink {
    /// Create an open sink with status 200 and no headers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
            phase: SinkPhase::Head,
        }
    }

    /// Status as last set.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Headers in the order they were added.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of the given header name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Accumulated body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether `finish` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.phase == SinkPhase::Closed
    }

    fn require_head(&self) -> io::Result<()> {
        match self.phase {
            SinkPhase::Head => Ok(()),
            SinkPhase::Body => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "headers are frozen after the first body byte",
            )),
            SinkPhase::Closed => Err(closed()),
        }
    }
}

impl Default for BufferedSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSink for BufferedSink {
    fn set_status(&mut self, status: u16) -> io::Result<()> {
        self.require_head()?;
        self.status = status;
        Ok(())
    }

    fn add_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.require_head()?;
        self.headers.push((name.to_owned(), value.to_owned()));
        Ok(())
    }

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        if self.phase == SinkPhase::Closed {
            return Err(closed());
        }
        self.phase = SinkPhase::Body;
        self.body.extend_from_slice(chunk);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.phase == SinkPhase::Closed {
            return Err(closed());
        }
        self.phase = SinkPhase::Closed;
        Ok(())
    }
}

/// Sink that fails every call, modeling a connection the runtime already
/// tore down (timeout, client gone). Encode paths must degrade gracefully
/// against it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedSink;

impl ResponseSink for ClosedSink {
    fn set_status(&mut self, _status: u16) -> io::Result<()> {
        Err(closed())
    }

    fn add_header(&mut self, _name: &str, _value: &str) -> io::Result<()> {
        Err(closed())
    }

    fn write_body(&mut self, _chunk: &[u8]) -> io::Result<()> {
        Err(closed())
    }

    fn finish(&mut self) -> io::Result<()> {
        Err(closed())
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "response sink is closed")
}
