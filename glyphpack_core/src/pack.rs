use log::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::bitmap::BitmapInfo;
use crate::codec::Codec;
use crate::config::CodecOptions;
use crate::error::CodecError;
use crate::format::{CounterWidth, Encoding, PackHeader, PACK_HEADER_SIZE, PACK_VERSION};
use crate::stats::CompressionStats;

/// A glyph bitmap ready to be embedded: the (possibly) encoded payload plus
/// everything needed to restore the original pixels.
///
/// # Byte layout
/// ```text
/// [HEADER: 48 bytes, see PackHeader]
/// [PAYLOAD: payload_len bytes]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    pub encoding: Encoding,
    pub counter_width: CounterWidth,
    pub info: BitmapInfo,
    /// Length of the uncompressed pixel buffer.
    pub raw_len: usize,
    pub payload: Vec<u8>,
}

impl PackedBitmap {
    /// Wrap pixels verbatim, with no encoding applied.
    pub fn uncompressed(info: BitmapInfo, pixels: Vec<u8>) -> Self {
        Self {
            encoding: Encoding::None,
            counter_width: CounterWidth::default(),
            info,
            raw_len: pixels.len(),
            payload: pixels,
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.encoding != Encoding::None
    }

    pub fn stats(&self) -> CompressionStats {
        CompressionStats::new(self.payload.len(), self.raw_len)
    }

    /// Options that rebuild the codec this payload was encoded with.
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions::default().with_counter_width(self.counter_width)
    }

    pub fn header(&self) -> PackHeader {
        PackHeader {
            version: PACK_VERSION,
            encoding: self.encoding,
            counter_width: self.counter_width,
            width: self.info.width,
            height: self.info.height,
            channels: self.info.channels,
            raw_len: self.raw_len as u64,
            payload_len: self.payload.len() as u64,
            checksum: xxh3_64(&self.payload),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PACK_HEADER_SIZE + self.payload.len());
        out.extend_from_slice(&self.header().to_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse a header and payload, verifying lengths and the payload checksum.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let header_bytes: &[u8; PACK_HEADER_SIZE] = bytes
            .get(..PACK_HEADER_SIZE)
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| {
                CodecError::MalformedPack(format!(
                    "need at least {} header bytes, got {}",
                    PACK_HEADER_SIZE,
                    bytes.len()
                ))
            })?;
        let header = PackHeader::from_bytes(header_bytes)?;

        let payload = &bytes[PACK_HEADER_SIZE..];
        if payload.len() as u64 != header.payload_len {
            return Err(CodecError::MalformedPack(format!(
                "header says payload is {} bytes but {} follow it",
                header.payload_len,
                payload.len()
            )));
        }

        let actual = xxh3_64(payload);
        if actual != header.checksum {
            return Err(CodecError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        let raw_len = usize::try_from(header.raw_len).map_err(|_| {
            CodecError::MalformedPack(format!("raw length {} does not fit in memory", header.raw_len))
        })?;
        let info = BitmapInfo::new(header.width, header.height, header.channels);
        info.validate(raw_len)
            .map_err(|e| CodecError::MalformedPack(e.to_string()))?;

        Ok(Self {
            encoding: header.encoding,
            counter_width: header.counter_width,
            info,
            raw_len,
            payload: payload.to_vec(),
        })
    }
}

/// Encode a pixel buffer with `codec`, falling back to the uncompressed
/// pixels when the codec runs out of room or its output is larger than the
/// input.
///
/// Any other codec failure is returned as is.
pub fn pack(codec: &dyn Codec, info: BitmapInfo, pixels: Vec<u8>) -> Result<PackedBitmap, CodecError> {
    if pixels.is_empty() {
        return Err(CodecError::InvalidInput("cannot pack an empty bitmap".to_string()));
    }
    info.validate(pixels.len())?;

    if codec.encoding() == Encoding::None {
        return Ok(PackedBitmap::uncompressed(info, pixels));
    }

    let payload = match codec.encode(&pixels) {
        Ok(payload) => payload,
        Err(e) if e.is_recoverable() => {
            warn!("{} encoding gave up ({}), storing bitmap uncompressed", codec.name(), e);
            return Ok(PackedBitmap::uncompressed(info, pixels));
        }
        Err(e) => return Err(e),
    };

    let stats = CompressionStats::from_buffers(&payload, &pixels);
    if stats.expanded() {
        warn!(
            "{} encoding expanded bitmap from {} to {} bytes, storing it uncompressed",
            codec.name(),
            pixels.len(),
            payload.len()
        );
        return Ok(PackedBitmap::uncompressed(info, pixels));
    }

    debug!(
        "packed {}x{}x{} bitmap with {}: {} -> {} bytes",
        info.width,
        info.height,
        info.channels,
        codec.name(),
        pixels.len(),
        payload.len()
    );

    Ok(PackedBitmap {
        encoding: codec.encoding(),
        counter_width: codec.options().counter_width,
        info,
        raw_len: pixels.len(),
        payload,
    })
}

/// Restore the original pixels of `packed`.
///
/// `codec` must match the encoding recorded in `packed`. Obtain it from the
/// registry with `packed.encoding` and `packed.codec_options()`.
pub fn unpack(codec: &dyn Codec, packed: &PackedBitmap) -> Result<Vec<u8>, CodecError> {
    if codec.encoding() != packed.encoding {
        return Err(CodecError::InvalidInput(format!(
            "codec mismatch: payload uses {} but provided codec is {}",
            packed.encoding,
            codec.encoding()
        )));
    }

    let raw = codec.decode(&packed.payload, packed.raw_len)?;
    if raw.len() != packed.raw_len {
        return Err(CodecError::MalformedPack(format!(
            "payload decoded to {} bytes but header says {}",
            raw.len(),
            packed.raw_len
        )));
    }
    Ok(raw)
}
