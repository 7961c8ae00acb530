//! Binary encode/decode for the log container and entry regions.
//!
//! All integers are big-endian. The container frames each entry as a
//! length-prefixed header region followed by a length-prefixed data
//! region; [`ByteCursor`] then walks those regions the way the engine
//! laid them out, with both relative (`get_*`) and absolute (`*_at`) reads.

use std::io::{self, Read, Write};

use crate::entry::RawEntry;
use crate::error::LogError;
use crate::{FORMAT_VERSION, MAGIC};

/// Upper bound on a single header or data region.
///
/// Guards against allocating gigabytes for a corrupt length prefix.
pub const MAX_REGION_LEN: usize = 64 * 1024 * 1024;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), LogError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a big-endian u32.
pub fn write_u32_be(w: &mut dyn Write, v: u32) -> Result<(), LogError> {
    w.write_all(&v.to_be_bytes())?;
    Ok(())
}

/// Write a length-prefixed byte region (u32 length + bytes).
pub fn write_region(w: &mut dyn Write, b: &[u8]) -> Result<(), LogError> {
    let len = u32::try_from(b.len())
        .ok()
        .filter(|&len| len as usize <= MAX_REGION_LEN)
        .ok_or_else(|| LogError::malformed(format!("region of {} bytes is too large", b.len())))?;
    write_u32_be(w, len)?;
    w.write_all(b)?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Fill `buf` completely, reporting a short read as a truncated entry.
fn read_exact_or_truncated(r: &mut dyn Read, buf: &mut [u8], what: &str) -> Result<(), LogError> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            LogError::TruncatedEntry {
                detail: format!("stream ended while reading {what}"),
            }
        } else {
            LogError::Io(e)
        }
    })
}

fn read_region_len(r: &mut dyn Read, what: &str) -> Result<usize, LogError> {
    let mut buf = [0u8; 4];
    read_exact_or_truncated(r, &mut buf, what)?;
    let len = u32::from_be_bytes(buf) as usize;
    if len > MAX_REGION_LEN {
        return Err(LogError::malformed(format!(
            "{what} announces {len} bytes, limit is {MAX_REGION_LEN}"
        )));
    }
    Ok(len)
}

// ── Container preamble ──────────────────────────────────────────

/// Encode the log preamble (magic + version).
pub fn encode_preamble(w: &mut dyn Write) -> Result<(), LogError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    Ok(())
}

/// Decode and validate the log preamble.
///
/// A stream that ends inside the preamble, including an empty one, is a
/// [`LogError::TruncatedEntry`].
pub fn decode_preamble(r: &mut dyn Read) -> Result<(), LogError> {
    let mut magic = [0u8; 4];
    read_exact_or_truncated(r, &mut magic, "log magic")?;
    if magic != MAGIC {
        return Err(LogError::InvalidMagic);
    }

    let mut version = [0u8; 1];
    read_exact_or_truncated(r, &mut version, "format version")?;
    let version = version[0];
    if version != FORMAT_VERSION {
        return Err(LogError::UnsupportedVersion { found: version });
    }
    Ok(())
}

// ── Entry encode/decode ─────────────────────────────────────────

/// Encode a single entry.
pub fn encode_entry(w: &mut dyn Write, entry: &RawEntry) -> Result<(), LogError> {
    write_region(w, &entry.header)?;
    write_region(w, &entry.data)?;
    Ok(())
}

/// Decode a single entry.
///
/// Returns `Ok(None)` on clean EOF (no bytes available), `Ok(Some(entry))`
/// on success, or [`LogError::TruncatedEntry`] when the stream stops
/// partway through an entry.
pub fn decode_entry(r: &mut dyn Read) -> Result<Option<RawEntry>, LogError> {
    // Read the header length byte-by-byte to distinguish clean EOF
    // (zero bytes available) from truncation (1-3 bytes before EOF).
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        match r.read(&mut len_buf[filled..]) {
            Ok(0) => {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(LogError::TruncatedEntry {
                    detail: format!("got {filled} of 4 bytes of the header length"),
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(LogError::Io(e)),
        }
    }
    let header_len = u32::from_be_bytes(len_buf) as usize;
    if header_len > MAX_REGION_LEN {
        return Err(LogError::malformed(format!(
            "header length {header_len} exceeds limit {MAX_REGION_LEN}"
        )));
    }

    let mut header = vec![0u8; header_len];
    read_exact_or_truncated(r, &mut header, "the entry header")?;

    let data_len = read_region_len(r, "the data length")?;
    let mut data = vec![0u8; data_len];
    read_exact_or_truncated(r, &mut data, "the entry data")?;

    Ok(Some(RawEntry { header, data }))
}

// ── Region cursor ───────────────────────────────────────────────

/// Read cursor over a header or data region.
///
/// Relative reads advance the position; absolute reads (`*_at`) leave it
/// untouched. Every read is bounds-checked and reports a
/// [`LogError::MalformedEntry`] instead of panicking.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Borrow `len` bytes at absolute offset `at`.
    pub fn slice_at(&self, at: usize, len: usize) -> Result<&'a [u8], LogError> {
        at.checked_add(len)
            .and_then(|end| self.buf.get(at..end))
            .ok_or_else(|| {
                LogError::malformed(format!(
                    "need {len} bytes at offset {at}, region holds {}",
                    self.buf.len()
                ))
            })
    }

    fn array_at<const N: usize>(&self, at: usize) -> Result<[u8; N], LogError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice_at(at, N)?);
        Ok(out)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], LogError> {
        let out = self.array_at::<N>(self.pos)?;
        self.pos += N;
        Ok(out)
    }

    /// Advance past `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), LogError> {
        self.slice_at(self.pos, n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a byte.
    pub fn get_u8(&mut self) -> Result<u8, LogError> {
        Ok(self.take::<1>()?[0])
    }

    /// Read a big-endian i16.
    pub fn get_i16(&mut self) -> Result<i16, LogError> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    /// Read a big-endian i32.
    pub fn get_i32(&mut self) -> Result<i32, LogError> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    /// Read a big-endian i64.
    pub fn get_i64(&mut self) -> Result<i64, LogError> {
        Ok(i64::from_be_bytes(self.take()?))
    }

    /// Read a big-endian f64.
    pub fn get_f64(&mut self) -> Result<f64, LogError> {
        Ok(f64::from_be_bytes(self.take()?))
    }

    /// Read a non-negative i32 used as a table index.
    pub fn get_index(&mut self, what: &str) -> Result<u32, LogError> {
        let v = self.get_i32()?;
        u32::try_from(v).map_err(|_| LogError::malformed(format!("negative {what} index {v}")))
    }

    /// Read a byte at an absolute offset.
    pub fn u8_at(&self, at: usize) -> Result<u8, LogError> {
        Ok(self.array_at::<1>(at)?[0])
    }

    /// Read a big-endian i16 at an absolute offset.
    pub fn i16_at(&self, at: usize) -> Result<i16, LogError> {
        Ok(i16::from_be_bytes(self.array_at(at)?))
    }

    /// Read a big-endian i32 at an absolute offset.
    pub fn i32_at(&self, at: usize) -> Result<i32, LogError> {
        Ok(i32::from_be_bytes(self.array_at(at)?))
    }

    /// Read a big-endian f64 at an absolute offset.
    pub fn f64_at(&self, at: usize) -> Result<f64, LogError> {
        Ok(f64::from_be_bytes(self.array_at(at)?))
    }

    /// Borrow everything after the current position and move to the end.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = self.buf.get(self.pos..).unwrap_or(&[]);
        self.pos = self.buf.len();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Cursor reads ────────────────────────────────────────────

    proptest! {
        #[test]
        fn cursor_reads_big_endian(a in any::<i32>(), b in any::<i64>(), c in any::<u64>()) {
            let mut buf = Vec::new();
            buf.extend_from_slice(&a.to_be_bytes());
            buf.extend_from_slice(&b.to_be_bytes());
            buf.extend_from_slice(&f64::from_bits(c).to_be_bytes());

            let mut cur = ByteCursor::new(&buf);
            prop_assert_eq!(cur.get_i32().unwrap(), a);
            prop_assert_eq!(cur.get_i64().unwrap(), b);
            prop_assert_eq!(cur.get_f64().unwrap().to_bits(), c);
            prop_assert_eq!(cur.remaining(), 0);
        }
    }

    #[test]
    fn absolute_reads_do_not_move_cursor() {
        let buf = [0u8, 0, 0, 7, 0, 3];
        let cur = ByteCursor::new(&buf);
        assert_eq!(cur.i32_at(0).unwrap(), 7);
        assert_eq!(cur.i16_at(4).unwrap(), 3);
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn short_region_is_malformed_not_panic() {
        let buf = [1u8, 2, 3];
        let mut cur = ByteCursor::new(&buf);
        assert!(matches!(cur.get_i32(), Err(LogError::MalformedEntry { .. })));
        assert!(matches!(cur.i32_at(usize::MAX), Err(LogError::MalformedEntry { .. })));
        assert!(cur.skip(4).is_err());
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn negative_index_rejected() {
        let buf = (-1i32).to_be_bytes();
        let mut cur = ByteCursor::new(&buf);
        match cur.get_index("resource") {
            Err(LogError::MalformedEntry { detail }) => {
                assert!(detail.contains("negative resource index -1"), "{detail}");
            }
            other => panic!("expected MalformedEntry, got {other:?}"),
        }
    }

    #[test]
    fn take_rest_consumes_remaining() {
        let buf = *b"xyhello";
        let mut cur = ByteCursor::new(&buf);
        cur.skip(2).unwrap();
        assert_eq!(cur.take_rest(), b"hello");
        assert_eq!(cur.remaining(), 0);
        assert_eq!(cur.take_rest(), b"");
    }

    // ── Preamble ────────────────────────────────────────────────

    #[test]
    fn preamble_roundtrip() {
        let mut buf = Vec::new();
        encode_preamble(&mut buf).unwrap();
        assert_eq!(&buf[..4], b"SIMT");
        decode_preamble(&mut buf.as_slice()).unwrap();
    }

    #[test]
    fn bad_magic_rejected() {
        let data = b"XIMT\x01";
        let result = decode_preamble(&mut data.as_slice());
        assert!(matches!(result, Err(LogError::InvalidMagic)));
    }

    #[test]
    fn bad_version_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.push(99);
        let result = decode_preamble(&mut buf.as_slice());
        assert!(matches!(
            result,
            Err(LogError::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn preamble_cut_short_is_truncation() {
        let mut full = Vec::new();
        encode_preamble(&mut full).unwrap();
        for cut in 0..full.len() {
            let result = decode_preamble(&mut &full[..cut]);
            assert!(
                matches!(result, Err(LogError::TruncatedEntry { .. })),
                "cut at {cut}: {result:?}"
            );
        }
    }

    // ── Entry framing ───────────────────────────────────────────

    fn sample_entry() -> RawEntry {
        RawEntry {
            header: vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
            data: vec![0xAA; 6],
        }
    }

    #[test]
    fn entry_roundtrip() {
        let entry = sample_entry();
        let mut buf = Vec::new();
        encode_entry(&mut buf, &entry).unwrap();
        assert_eq!(buf.len(), 4 + 10 + 4 + 6);
        let got = decode_entry(&mut buf.as_slice()).unwrap().unwrap();
        assert_eq!(got, entry);
    }

    #[test]
    fn eof_returns_none() {
        let buf: Vec<u8> = Vec::new();
        assert!(decode_entry(&mut buf.as_slice()).unwrap().is_none());
    }

    #[test]
    fn every_partial_entry_is_truncation() {
        let mut buf = Vec::new();
        encode_entry(&mut buf, &sample_entry()).unwrap();
        for cut in 1..buf.len() {
            let result = decode_entry(&mut &buf[..cut]);
            assert!(
                matches!(result, Err(LogError::TruncatedEntry { .. })),
                "cut at {cut}: expected TruncatedEntry, got {result:?}"
            );
        }
    }

    #[test]
    fn oversized_region_rejected() {
        let buf = u32::MAX.to_be_bytes();
        assert!(matches!(
            decode_entry(&mut buf.as_slice()),
            Err(LogError::MalformedEntry { .. })
        ));
    }
}
