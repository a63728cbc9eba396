use glyphpack_core::codec::Codec;
use glyphpack_core::error::CodecError;
use glyphpack_core::format::Encoding;
use log::debug;

/// Entropy-based (Huffman family) codec slot. Identity transform for now.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyCodec;

impl Codec for EntropyCodec {
    fn encoding(&self) -> Encoding {
        Encoding::Entropy
    }

    fn name(&self) -> &'static str {
        "huffman"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        debug!("huffman is not implemented yet, passing {} bytes through", raw.len());
        Ok(raw.to_vec())
    }

    fn decode(&self, compressed: &[u8], _expected_size: usize) -> Result<Vec<u8>, CodecError> {
        Ok(compressed.to_vec())
    }
}
