use glyphpack_core::codec::Codec;
use glyphpack_core::config::{CodecOptions, OutputBound};
use glyphpack_core::error::CodecError;
use glyphpack_core::format::{CounterWidth, Encoding};
use log::debug;

/// Byte-oriented run-length codec.
///
/// The stream is a plain sequence of `(count, value)` packets: the counter in
/// its configured width (native byte order), then the value byte. There is no
/// header and no end marker; a decoder walks packets until the input is
/// consumed. Every packet describes at least one byte, and a run is only split
/// when it would overflow the counter.
///
/// Best for: glyph atlases, which are mostly long runs of transparent pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct RleCodec {
    width: CounterWidth,
    bound: OutputBound,
}

impl RleCodec {
    pub fn new(width: CounterWidth) -> Self {
        Self {
            width,
            bound: OutputBound::WorstCase,
        }
    }

    pub fn from_options(options: &CodecOptions) -> Self {
        Self {
            width: options.counter_width,
            bound: options.output_bound,
        }
    }

    pub fn with_output_bound(mut self, bound: OutputBound) -> Self {
        self.bound = bound;
        self
    }

    /// Encode `raw` into at most `capacity` bytes.
    ///
    /// Fails with `CapacityExceeded` as soon as the next packet would not fit.
    pub fn encode_bounded(&self, raw: &[u8], capacity: usize) -> Result<Vec<u8>, CodecError> {
        let Some((&first, rest)) = raw.split_first() else {
            return Ok(Vec::new());
        };
        if capacity == 0 {
            return Err(CodecError::InvalidInput(
                "output capacity must be positive".to_string(),
            ));
        }

        let max_count = self.width.max_count();
        let worst_case = raw.len().saturating_mul(self.width.packet_size());
        let mut out = Vec::with_capacity(capacity.min(worst_case));

        let mut run_value = first;
        let mut run_count: u32 = 1;

        for &byte in rest {
            if byte == run_value && run_count < max_count {
                run_count += 1;
            } else {
                self.push_packet(&mut out, capacity, run_count, run_value)?;
                run_value = byte;
                run_count = 1;
            }
        }
        self.push_packet(&mut out, capacity, run_count, run_value)?;

        debug!(
            "rle({}) encoded {} bytes into {} bytes",
            self.width,
            raw.len(),
            out.len()
        );
        Ok(out)
    }

    fn push_packet(
        &self,
        out: &mut Vec<u8>,
        capacity: usize,
        count: u32,
        value: u8,
    ) -> Result<(), CodecError> {
        let needed = out.len() + self.width.packet_size();
        if needed > capacity {
            return Err(CodecError::CapacityExceeded { needed, capacity });
        }
        self.width.write_count(out, count);
        out.push(value);
        Ok(())
    }
}

impl Codec for RleCodec {
    fn encoding(&self) -> Encoding {
        Encoding::RunLength
    }

    fn name(&self) -> &'static str {
        "rle"
    }

    fn options(&self) -> CodecOptions {
        CodecOptions::default()
            .with_counter_width(self.width)
            .with_output_bound(self.bound)
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        let capacity = self.bound.capacity(raw.len(), self.width.packet_size());
        self.encode_bounded(raw, capacity)
    }

    fn decode(&self, compressed: &[u8], expected_size: usize) -> Result<Vec<u8>, CodecError> {
        if compressed.is_empty() {
            return Ok(Vec::new());
        }
        if expected_size == 0 {
            return Err(CodecError::InvalidInput(
                "expected size must be positive for a non-empty stream".to_string(),
            ));
        }

        let packet_size = self.width.packet_size();
        let whole = compressed.len() - compressed.len() % packet_size;
        if whole != compressed.len() {
            return Err(CodecError::CorruptStream {
                encoding: "rle",
                offset: whole,
                reason: format!(
                    "trailing {} bytes do not form a {}-byte packet",
                    compressed.len() - whole,
                    packet_size
                ),
            });
        }

        // `expected_size` is only an upper bound; reserve what the packets can describe.
        let producible =
            (compressed.len() / packet_size).saturating_mul(self.width.max_count() as usize);
        let mut out = Vec::with_capacity(expected_size.min(producible));
        for (i, packet) in compressed.chunks_exact(packet_size).enumerate() {
            let (counter, value) = packet.split_at(self.width.bytes());
            let count = self.width.read_count(counter) as usize;
            if count == 0 {
                return Err(CodecError::CorruptStream {
                    encoding: "rle",
                    offset: i * packet_size,
                    reason: "zero-length run".to_string(),
                });
            }

            let needed = out.len() + count;
            if needed > expected_size {
                return Err(CodecError::CapacityExceeded {
                    needed,
                    capacity: expected_size,
                });
            }
            out.resize(needed, value[0]);
        }

        debug!(
            "rle({}) decoded {} bytes into {} bytes",
            self.width,
            compressed.len(),
            out.len()
        );
        Ok(out)
    }
}
