use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Shape of a decoded glyph bitmap: 1 channel for grayscale, 4 for RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmapInfo {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl BitmapInfo {
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Single-row grayscale view of `len` bytes, for buffers of unknown shape.
    pub fn flat(len: usize) -> Result<Self, CodecError> {
        let width = u32::try_from(len).map_err(|_| {
            CodecError::InvalidInput(format!(
                "{} byte buffer is too large for a single-row bitmap (max {} bytes)",
                len,
                u32::MAX
            ))
        })?;
        Ok(Self::new(width, 1, 1))
    }

    /// Expected pixel buffer length, or `None` on overflow.
    pub fn byte_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels as usize)
    }

    /// Check the dimensions are positive and describe exactly `len` bytes.
    pub fn validate(&self, len: usize) -> Result<(), CodecError> {
        if self.width == 0 || self.height == 0 {
            return Err(CodecError::InvalidInput(format!(
                "bitmap dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(1..=4).contains(&self.channels) {
            return Err(CodecError::InvalidInput(format!(
                "bitmap must have 1 to 4 channels, got {}",
                self.channels
            )));
        }
        match self.byte_len() {
            Some(expected) if expected == len => Ok(()),
            Some(expected) => Err(CodecError::InvalidInput(format!(
                "{}x{}x{} bitmap needs {} bytes but buffer holds {}",
                self.width, self.height, self.channels, expected, len
            ))),
            None => Err(CodecError::InvalidInput(format!(
                "{}x{}x{} bitmap size overflows",
                self.width, self.height, self.channels
            ))),
        }
    }
}
