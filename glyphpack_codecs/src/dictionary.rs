use glyphpack_core::codec::Codec;
use glyphpack_core::error::CodecError;
use glyphpack_core::format::Encoding;
use log::debug;

/// Dictionary-based (LZW family) codec slot.
///
/// Currently an identity transform, so its ratio is always exactly 1.0.
/// Payloads tagged `dictionary` today hold raw pixels, so a real
/// implementation has to bump the pack version.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryCodec;

impl Codec for DictionaryCodec {
    fn encoding(&self) -> Encoding {
        Encoding::Dictionary
    }

    fn name(&self) -> &'static str {
        "lzw"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        debug!("lzw is not implemented yet, passing {} bytes through", raw.len());
        Ok(raw.to_vec())
    }

    fn decode(&self, compressed: &[u8], _expected_size: usize) -> Result<Vec<u8>, CodecError> {
        Ok(compressed.to_vec())
    }
}
