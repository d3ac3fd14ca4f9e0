//! Two-slot record codec.
//!
//! One cache entry maps to one store record with two fixed slots: slot 0
//! carries newline-delimited UTF-8 metadata, slot 1 carries the raw body
//! bytes. The metadata layout, in exact order:
//!
//! ```text
//! request date (epoch ms)
//! response date (epoch ms)
//! protocol token
//! major protocol version
//! minor protocol version
//! status code
//! reason phrase
//! header count, then per header: name line, value line
//! variant map size, then per variant: key line, value line
//! ```
//!
//! Every field is one line terminated by a single `\n`. No field may itself
//! contain a newline; the codec does not escape, this is a constraint of the
//! format. Integers are parsed strictly on the way back in — a malformed or
//! out-of-range token is a [`StorageError::Corrupt`], never a silent default.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::str::FromStr;

use crate::entry::{CacheEntry, Header, Resource, StatusLine};
use crate::error::{Result, StorageError};
use crate::store::Snapshot;

/// Record slot holding the metadata text.
pub const SLOT_METADATA: usize = 0;
/// Record slot holding the verbatim body bytes.
pub const SLOT_BODY: usize = 1;
/// Slots per record.
pub const SLOT_COUNT: usize = 2;

/// Store-level format version. Bump whenever the metadata field order or
/// count changes; the store then discards all previously written records.
pub const FORMAT_VERSION: u32 = 1;

/// Decoded metadata slot, everything but the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    pub request_date: i64,
    pub response_date: i64,
    pub status_line: StatusLine,
    pub headers: Vec<Header>,
    pub variant_map: HashMap<String, String>,
}

impl RecordMetadata {
    pub fn of(entry: &CacheEntry) -> Self {
        Self {
            request_date: entry.request_date,
            response_date: entry.response_date,
            status_line: entry.status_line.clone(),
            headers: entry.headers.clone(),
            variant_map: entry.variant_map.clone(),
        }
    }
}

// ===== encode =====

/// Serialize an entry's metadata into the slot 0 byte stream.
pub fn write_metadata<W: Write>(out: W, entry: &CacheEntry) -> io::Result<()> {
    let mut w = BufWriter::new(out);
    writeln!(w, "{}", entry.request_date)?;
    writeln!(w, "{}", entry.response_date)?;
    let status = &entry.status_line;
    writeln!(w, "{}", status.protocol)?;
    writeln!(w, "{}", status.major)?;
    writeln!(w, "{}", status.minor)?;
    writeln!(w, "{}", status.status)?;
    writeln!(w, "{}", status.reason)?;
    writeln!(w, "{}", entry.headers.len())?;
    for header in &entry.headers {
        writeln!(w, "{}", header.name)?;
        writeln!(w, "{}", header.value)?;
    }
    writeln!(w, "{}", entry.variant_map.len())?;
    for (variant, cache_key) in &entry.variant_map {
        writeln!(w, "{variant}")?;
        writeln!(w, "{cache_key}")?;
    }
    w.flush()
}

/// Stream a body's bytes, unmodified, into the slot 1 byte stream.
pub fn write_body<W: Write>(out: W, body: &dyn Resource) -> io::Result<()> {
    let mut reader = BufReader::new(body.open()?);
    let mut w = BufWriter::new(out);
    io::copy(&mut reader, &mut w)?;
    w.flush()
}

// ===== decode =====

fn read_line<R: BufRead>(r: &mut R, what: &str) -> Result<String> {
    let mut buf = Vec::new();
    let n = r.read_until(b'\n', &mut buf)?;
    if n == 0 {
        return Err(StorageError::corrupt(format!(
            "metadata ended early, expected {what}"
        )));
    }
    if buf.pop() != Some(b'\n') {
        return Err(StorageError::corrupt(format!("{what} line unterminated")));
    }
    String::from_utf8(buf)
        .map_err(|_| StorageError::corrupt(format!("{what} is not valid utf-8")))
}

fn read_number<T: FromStr, R: BufRead>(r: &mut R, what: &str) -> Result<T> {
    let line = read_line(r, what)?;
    line.parse()
        .map_err(|_| StorageError::corrupt(format!("malformed {what}: {line:?}")))
}

/// Parse the slot 0 byte stream back into structured metadata.
pub fn read_metadata<R: Read>(input: R) -> Result<RecordMetadata> {
    let mut r = BufReader::new(input);
    let request_date = read_number(&mut r, "request date")?;
    let response_date = read_number(&mut r, "response date")?;
    let protocol = read_line(&mut r, "protocol token")?;
    let major = read_number(&mut r, "major protocol version")?;
    let minor = read_number(&mut r, "minor protocol version")?;
    let status = read_number(&mut r, "status code")?;
    let reason = read_line(&mut r, "reason phrase")?;

    let header_count: usize = read_number(&mut r, "header count")?;
    let mut headers = Vec::with_capacity(header_count.min(64));
    for _ in 0..header_count {
        let name = read_line(&mut r, "header name")?;
        let value = read_line(&mut r, "header value")?;
        headers.push(Header { name, value });
    }

    let variant_count: usize = read_number(&mut r, "variant map size")?;
    let mut variant_map = HashMap::with_capacity(variant_count.min(64));
    for _ in 0..variant_count {
        let variant = read_line(&mut r, "variant key")?;
        let cache_key = read_line(&mut r, "variant value")?;
        variant_map.insert(variant, cache_key);
    }

    Ok(RecordMetadata {
        request_date,
        response_date,
        status_line: StatusLine {
            protocol,
            major,
            minor,
            status,
            reason,
        },
        headers,
        variant_map,
    })
}

/// Reconstruct a [`CacheEntry`] from a committed record snapshot.
///
/// The metadata slot is parsed eagerly; the body stays behind the snapshot
/// and is read lazily through the entry's [`Resource`]. On any decode
/// failure the snapshot is dropped before the error propagates, so the
/// store's read handle is never leaked.
pub fn read_entry<S: Snapshot>(snapshot: S) -> Result<CacheEntry> {
    // A `?` here drops `snapshot` on the way out, releasing the handle.
    let metadata = {
        let reader = snapshot.reader(SLOT_METADATA)?;
        read_metadata(reader)?
    };

    Ok(CacheEntry::new(
        metadata.request_date,
        metadata.response_date,
        metadata.status_line,
        metadata.headers,
        metadata.variant_map,
        Box::new(SnapshotResource { snapshot }),
    ))
}

/// Body resource that owns the record's read snapshot.
///
/// Length comes from the store's own recorded slot length, not from scanning
/// the stream. Dropping the resource (with its entry) closes the snapshot.
struct SnapshotResource<S: Snapshot> {
    snapshot: S,
}

impl<S: Snapshot> Resource for SnapshotResource<S> {
    fn len(&self) -> u64 {
        self.snapshot.len(SLOT_BODY)
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        self.snapshot.reader(SLOT_BODY)
    }
}
