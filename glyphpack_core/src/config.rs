use serde::{Deserialize, Serialize};

use crate::format::CounterWidth;

/// How much room an encoder may use for its output, relative to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputBound {
    /// Room for the worst case, one packet per input byte. Encoding never
    /// runs out of space.
    #[default]
    WorstCase,
    /// `input_len * n` bytes. `Factor(2)` is the classic "double the input"
    /// margin, which a 16-bit counter can overflow on noisy data.
    Factor(usize),
}

impl OutputBound {
    pub fn capacity(self, input_len: usize, packet_size: usize) -> usize {
        match self {
            OutputBound::WorstCase => input_len.saturating_mul(packet_size),
            OutputBound::Factor(n) => input_len.saturating_mul(n),
        }
    }
}

/// Knobs handed to the codec registry when instantiating a codec.
///
/// Codecs that do not use a setting ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CodecOptions {
    pub counter_width: CounterWidth,
    pub output_bound: OutputBound,
}

impl CodecOptions {
    pub fn with_counter_width(mut self, counter_width: CounterWidth) -> Self {
        self.counter_width = counter_width;
        self
    }

    pub fn with_output_bound(mut self, output_bound: OutputBound) -> Self {
        self.output_bound = output_bound;
        self
    }
}
