//! Savings and ratio reporting over a (compressed, uncompressed) pair.
//!
//! Everything here is a pure function of buffer lengths.

use serde::Serialize;

pub const KILOBYTE: u64 = 1024;
pub const MEGABYTE: u64 = 1024 * KILOBYTE;
pub const GIGABYTE: u64 = 1024 * MEGABYTE;

/// Render a byte count scaled to B, KB, MB or GB (base 1024).
///
/// Two decimal digits are kept, then trailing zeros and a dangling decimal
/// point are stripped: `1536` becomes `"1.5 KB"`, `2048` becomes `"2 KB"`.
/// With `abbreviated == false` the unit is spelled out (`"Kilobytes"`).
pub fn format_memory_unit(size_bytes: u64, abbreviated: bool) -> String {
    let (adjusted, short, long) = if size_bytes < KILOBYTE {
        (size_bytes as f64, "B", "Bytes")
    } else if size_bytes < MEGABYTE {
        (size_bytes as f64 / KILOBYTE as f64, "KB", "Kilobytes")
    } else if size_bytes < GIGABYTE {
        (size_bytes as f64 / MEGABYTE as f64, "MB", "Megabytes")
    } else {
        (size_bytes as f64 / GIGABYTE as f64, "GB", "Gigabytes")
    };

    let mut number = format!("{:.2}", adjusted);
    if number.contains('.') {
        let trimmed = number.trim_end_matches('0').trim_end_matches('.').len();
        number.truncate(trimmed);
    }

    format!("{} {}", number, if abbreviated { short } else { long })
}

/// Bytes saved by compression, clamped at zero when the data expanded.
pub fn saved_bytes(compressed_len: usize, uncompressed_len: usize) -> u64 {
    uncompressed_len.saturating_sub(compressed_len) as u64
}

/// Human-readable space saved, e.g. `"3.25 KB"`. Never negative.
pub fn space_saved(compressed: &[u8], uncompressed: &[u8]) -> String {
    format_memory_unit(saved_bytes(compressed.len(), uncompressed.len()), true)
}

/// `len(uncompressed) / len(compressed)`.
///
/// Not finite when `compressed` is empty; callers must guard that case.
pub fn compression_ratio(compressed: &[u8], uncompressed: &[u8]) -> f64 {
    uncompressed.len() as f64 / compressed.len() as f64
}

/// Size summary for one encoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionStats {
    pub raw_len: usize,
    pub compressed_len: usize,
}

impl CompressionStats {
    pub fn new(compressed_len: usize, raw_len: usize) -> Self {
        Self {
            raw_len,
            compressed_len,
        }
    }

    pub fn from_buffers(compressed: &[u8], uncompressed: &[u8]) -> Self {
        Self::new(compressed.len(), uncompressed.len())
    }

    pub fn saved_bytes(&self) -> u64 {
        saved_bytes(self.compressed_len, self.raw_len)
    }

    pub fn space_saved(&self) -> String {
        format_memory_unit(self.saved_bytes(), true)
    }

    /// `None` when there is no compressed data to divide by.
    pub fn ratio(&self) -> Option<f64> {
        if self.compressed_len == 0 {
            return None;
        }
        Some(self.raw_len as f64 / self.compressed_len as f64)
    }

    pub fn expanded(&self) -> bool {
        self.compressed_len > self.raw_len
    }
}
