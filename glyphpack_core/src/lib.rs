pub mod bitmap;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod pack;
pub mod stats;

pub use bitmap::BitmapInfo;
pub use codec::Codec;
pub use config::{CodecOptions, OutputBound};
pub use error::CodecError;
pub use format::{CounterWidth, Encoding, PackHeader, MAGIC, PACK_HEADER_SIZE};
pub use pack::{pack, unpack, PackedBitmap};
pub use stats::{compression_ratio, format_memory_unit, space_saved, CompressionStats};
