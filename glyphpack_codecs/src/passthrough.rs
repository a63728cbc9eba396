use glyphpack_core::codec::Codec;
use glyphpack_core::error::CodecError;
use glyphpack_core::format::Encoding;

/// Identity codec: payloads are stored verbatim.
///
/// Useful for:
/// - Verifying the pack round-trip independently of any codec.
/// - Bitmaps too noisy to benefit from run-length encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughCodec;

impl Codec for PassThroughCodec {
    fn encoding(&self) -> Encoding {
        Encoding::None
    }

    fn name(&self) -> &'static str {
        "none"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(raw.to_vec())
    }

    fn decode(&self, compressed: &[u8], _expected_size: usize) -> Result<Vec<u8>, CodecError> {
        Ok(compressed.to_vec())
    }
}
