use crate::config::CodecOptions;
use crate::error::CodecError;
use crate::format::Encoding;

/// Core compression abstraction.
///
/// Each `Codec` implementation:
/// - Is identified by the `Encoding` recorded alongside its output.
/// - Works on a whole in-memory buffer at a time; there is no state carried
///   between calls, so one instance may serve any number of threads.
/// - Returns a freshly owned buffer. Callers must not assume the output shares
///   storage with the input, even for identity transforms.
/// - Never truncates: anything that would yield a short result is an error.
pub trait Codec: Send + Sync {
    /// Encoding this codec produces and consumes.
    fn encoding(&self) -> Encoding;

    /// Human-readable codec name for CLI display.
    fn name(&self) -> &'static str;

    /// Settings needed to rebuild an equivalent codec from the registry.
    fn options(&self) -> CodecOptions {
        CodecOptions::default()
    }

    /// Encode an entire buffer. Empty input yields empty output.
    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Decode an entire buffer produced by [`Codec::encode`].
    ///
    /// `expected_size` is the uncompressed length, used as the output
    /// capacity. Output that would exceed it is an error, never clipped.
    fn decode(&self, compressed: &[u8], expected_size: usize) -> Result<Vec<u8>, CodecError>;
}
