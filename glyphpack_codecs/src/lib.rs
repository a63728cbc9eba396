mod dictionary;
mod entropy;
mod passthrough;
mod rle;

pub use dictionary::DictionaryCodec;
pub use entropy::EntropyCodec;
pub use passthrough::PassThroughCodec;
pub use rle::RleCodec;

use glyphpack_core::{unpack, Codec, CodecError, CodecOptions, Encoding, PackedBitmap};

/// Instantiate the codec for `encoding` with default options
/// (8-bit run counter, worst-case output bound).
pub fn create(encoding: Encoding) -> Box<dyn Codec> {
    create_with(encoding, &CodecOptions::default())
}

/// Instantiate the codec for `encoding`.
///
/// Callers select an algorithm purely from configuration; new algorithms are
/// added here and nowhere else.
pub fn create_with(encoding: Encoding, options: &CodecOptions) -> Box<dyn Codec> {
    match encoding {
        Encoding::None => Box::new(PassThroughCodec),
        Encoding::RunLength => Box::new(RleCodec::from_options(options)),
        Encoding::Dictionary => Box::new(DictionaryCodec),
        Encoding::Entropy => Box::new(EntropyCodec),
    }
}

/// Resolve a codec from a configuration string such as `"rle"` or `"none"`.
pub fn create_by_name(name: &str, options: &CodecOptions) -> Result<Box<dyn Codec>, CodecError> {
    Ok(create_with(name.parse()?, options))
}

/// Resolve a codec from the encoding id stored in a packed bitmap header.
pub fn codec_by_id(id: u8, options: &CodecOptions) -> Result<Box<dyn Codec>, CodecError> {
    Ok(create_with(Encoding::from_id(id)?, options))
}

/// Restore the pixels of `packed`, rebuilding its codec from the encoding and
/// counter width recorded alongside the payload.
pub fn unpack_bitmap(packed: &PackedBitmap) -> Result<Vec<u8>, CodecError> {
    let codec = create_with(packed.encoding, &packed.codec_options());
    unpack(codec.as_ref(), packed)
}
