use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Magic bytes for packed bitmap payloads.
/// 8 bytes: "GLYPK1\n" followed by one null byte.
pub const MAGIC: &[u8; 8] = b"GLYPK1\n\x00";

/// Current container version.
pub const PACK_VERSION: u16 = 1;

/// Fixed size of the packed bitmap header in bytes.
///   magic[8] + version:u16 + encoding:u8 + counter_width:u8
///   + width:u32 + height:u32 + channels:u32
///   + raw_len:u64 + payload_len:u64 + checksum:u64
///   = 8 + 2 + 1 + 1 + 4 + 4 + 4 + 8 + 8 + 8 = 48
pub const PACK_HEADER_SIZE: usize = 48;

// ── Encoding IDs ───────────────────────────────────────────────────────────

pub const ENCODING_NONE: u8 = 0;
pub const ENCODING_RUN_LENGTH: u8 = 1;
pub const ENCODING_DICTIONARY: u8 = 2;
pub const ENCODING_ENTROPY: u8 = 3;

// ── Encoding ───────────────────────────────────────────────────────────────

/// Names the algorithm a bitmap payload is (or should be) encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    #[default]
    None,
    RunLength,
    Dictionary,
    Entropy,
}

impl Encoding {
    pub const ALL: [Encoding; 4] = [
        Encoding::None,
        Encoding::RunLength,
        Encoding::Dictionary,
        Encoding::Entropy,
    ];

    /// Stable id stored in the packed bitmap header.
    pub fn id(self) -> u8 {
        match self {
            Encoding::None => ENCODING_NONE,
            Encoding::RunLength => ENCODING_RUN_LENGTH,
            Encoding::Dictionary => ENCODING_DICTIONARY,
            Encoding::Entropy => ENCODING_ENTROPY,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, CodecError> {
        match id {
            ENCODING_NONE => Ok(Encoding::None),
            ENCODING_RUN_LENGTH => Ok(Encoding::RunLength),
            ENCODING_DICTIONARY => Ok(Encoding::Dictionary),
            ENCODING_ENTROPY => Ok(Encoding::Entropy),
            other => Err(CodecError::UnsupportedEncoding(format!("id {}", other))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::None => "none",
            Encoding::RunLength => "run-length",
            Encoding::Dictionary => "dictionary",
            Encoding::Entropy => "entropy",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = CodecError;

    /// Accepts the canonical names plus the short forms `rle`, `lzw` and `huff`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "raw" => Ok(Encoding::None),
            "run-length" | "rle" => Ok(Encoding::RunLength),
            "dictionary" | "lzw" => Ok(Encoding::Dictionary),
            "entropy" | "huffman" | "huff" => Ok(Encoding::Entropy),
            _ => Err(CodecError::UnsupportedEncoding(s.to_string())),
        }
    }
}

// ── Run counter width ──────────────────────────────────────────────────────

/// Width of the run counter in an RLE packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterWidth {
    #[default]
    U8,
    U16,
}

impl CounterWidth {
    /// Bytes taken by the counter on the wire.
    pub fn bytes(self) -> usize {
        match self {
            CounterWidth::U8 => 1,
            CounterWidth::U16 => 2,
        }
    }

    /// Largest run a single packet can describe.
    pub fn max_count(self) -> u32 {
        match self {
            CounterWidth::U8 => u8::MAX as u32,
            CounterWidth::U16 => u16::MAX as u32,
        }
    }

    /// Counter plus the one value byte.
    pub fn packet_size(self) -> usize {
        self.bytes() + 1
    }

    /// Append `count` in native byte order. `count` must not exceed `max_count()`.
    pub fn write_count(self, out: &mut Vec<u8>, count: u32) {
        debug_assert!((1..=self.max_count()).contains(&count));
        match self {
            CounterWidth::U8 => out.push(count as u8),
            CounterWidth::U16 => out.extend_from_slice(&(count as u16).to_ne_bytes()),
        }
    }

    /// Read a counter from exactly `bytes()` bytes.
    pub fn read_count(self, buf: &[u8]) -> u32 {
        match self {
            CounterWidth::U8 => buf[0] as u32,
            CounterWidth::U16 => u16::from_ne_bytes([buf[0], buf[1]]) as u32,
        }
    }

    /// Header representation: the counter width in bits.
    pub fn id(self) -> u8 {
        (self.bytes() * 8) as u8
    }

    pub fn from_id(id: u8) -> Result<Self, CodecError> {
        match id {
            8 => Ok(CounterWidth::U8),
            16 => Ok(CounterWidth::U16),
            other => Err(CodecError::MalformedPack(format!(
                "unsupported run counter width {} bits",
                other
            ))),
        }
    }
}

impl fmt::Display for CounterWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.id())
    }
}

impl FromStr for CounterWidth {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u8" | "8" => Ok(CounterWidth::U8),
            "u16" | "16" => Ok(CounterWidth::U16),
            _ => Err(CodecError::InvalidInput(format!(
                "counter width must be u8 or u16, got '{}'",
                s
            ))),
        }
    }
}

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 48-byte packed bitmap header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackHeader {
    pub version: u16,
    pub encoding: Encoding,
    pub counter_width: CounterWidth,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    /// Length of the uncompressed bitmap.
    pub raw_len: u64,
    /// Length of the payload following the header.
    pub payload_len: u64,
    /// xxhash3-64 of the payload bytes.
    pub checksum: u64,
}

impl PackHeader {
    /// Serialize to exactly `PACK_HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; PACK_HEADER_SIZE] {
        let mut buf = [0u8; PACK_HEADER_SIZE];
        buf[..8].copy_from_slice(MAGIC);
        buf[8..10].copy_from_slice(&self.version.to_le_bytes());
        buf[10] = self.encoding.id();
        buf[11] = self.counter_width.id();
        buf[12..16].copy_from_slice(&self.width.to_le_bytes());
        buf[16..20].copy_from_slice(&self.height.to_le_bytes());
        buf[20..24].copy_from_slice(&self.channels.to_le_bytes());
        buf[24..32].copy_from_slice(&self.raw_len.to_le_bytes());
        buf[32..40].copy_from_slice(&self.payload_len.to_le_bytes());
        buf[40..48].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Deserialize from `PACK_HEADER_SIZE` bytes, checking the magic and version.
    pub fn from_bytes(buf: &[u8; PACK_HEADER_SIZE]) -> Result<Self, CodecError> {
        if &buf[..8] != MAGIC {
            return Err(CodecError::MalformedPack(
                "invalid magic bytes, not a packed bitmap".to_string(),
            ));
        }
        let version = u16::from_le_bytes([buf[8], buf[9]]);
        if version != PACK_VERSION {
            return Err(CodecError::MalformedPack(format!(
                "unsupported version {} (only version {} is supported)",
                version, PACK_VERSION
            )));
        }
        Ok(Self {
            version,
            encoding: Encoding::from_id(buf[10])?,
            counter_width: CounterWidth::from_id(buf[11])?,
            width: read_u32(&buf[12..16]),
            height: read_u32(&buf[16..20]),
            channels: read_u32(&buf[20..24]),
            raw_len: read_u64(&buf[24..32]),
            payload_len: read_u64(&buf[32..40]),
            checksum: read_u64(&buf[40..48]),
        })
    }
}

fn read_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn read_u64(b: &[u8]) -> u64 {
    let mut le = [0u8; 8];
    le.copy_from_slice(&b[..8]);
    u64::from_le_bytes(le)
}
