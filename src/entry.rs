//! Cache entry value objects.
//!
//! A [`CacheEntry`] is the caller-facing representation of one stored HTTP
//! response: exchange timestamps, status line, ordered response headers, the
//! variant map used by content negotiation, and a lazily-readable body. The
//! struct is immutable once constructed; an update never mutates an entry in
//! place, it replaces the stored record wholesale.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Cursor, Read};

use bytes::Bytes;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Status line of the cached response.
///
/// The protocol token is kept verbatim rather than forced into a fixed
/// version enum, so any `token/major.minor` protocol round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub protocol: String,
    pub major: u32,
    pub minor: u32,
    pub status: u16,
    pub reason: String,
}

impl StatusLine {
    pub fn new(
        protocol: impl Into<String>,
        major: u32,
        minor: u32,
        status: u16,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            major,
            minor,
            status,
            reason: reason.into(),
        }
    }
}

/// One response header pair. Order across a response is significant and
/// preserved exactly; names are neither deduplicated nor case-normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A lazily-readable body of known length.
///
/// Implementations own whatever backs the bytes — a heap buffer, or an open
/// store snapshot — and release it when dropped. Dropping a `get`-returned
/// entry therefore releases the store's read handle.
pub trait Resource: Send {
    /// Body length in bytes, known without reading.
    fn len(&self) -> u64;

    /// Whether the body is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open a fresh reader over the body bytes.
    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>>;
}

/// One HTTP response cache entry.
pub struct CacheEntry {
    /// When the request producing this response was sent.
    pub request_date: EpochMillis,
    /// When the response was received.
    pub response_date: EpochMillis,
    pub status_line: StatusLine,
    pub headers: Vec<Header>,
    /// Variant-identifier to cache-key mapping for content negotiation.
    pub variant_map: HashMap<String, String>,
    body: Box<dyn Resource>,
}

impl CacheEntry {
    pub fn new(
        request_date: EpochMillis,
        response_date: EpochMillis,
        status_line: StatusLine,
        headers: Vec<Header>,
        variant_map: HashMap<String, String>,
        body: Box<dyn Resource>,
    ) -> Self {
        Self {
            request_date,
            response_date,
            status_line,
            headers,
            variant_map,
            body,
        }
    }

    /// The entry's body. Live until the entry is dropped.
    pub fn body(&self) -> &dyn Resource {
        self.body.as_ref()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("request_date", &self.request_date)
            .field("response_date", &self.response_date)
            .field("status_line", &self.status_line)
            .field("headers", &self.headers)
            .field("variant_map", &self.variant_map)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// In-memory body backed by [`Bytes`], for caller-constructed entries.
#[derive(Debug, Clone)]
pub struct HeapResource(Bytes);

impl HeapResource {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }
}

impl Resource for HeapResource {
    fn len(&self) -> u64 {
        self.0.len() as u64
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        // Bytes clones are reference-counted, so each reader is independent.
        Ok(Box::new(Cursor::new(self.0.clone())))
    }
}
