//! Terminal decode failures.

use thiserror::Error;

/// The two ways a decode attempt can fail.
///
/// `Format` means the symbol's geometry or bitstream grammar contradicts the
/// declared symbol parameters; `Checksum` means Reed-Solomon correction could
/// not repair the codeword block. The two are never conflated: checksum
/// failures are routine on damaged symbols, format failures indicate a
/// detector/producer inconsistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Matrix dimensions, codeword layout, or bitstream grammar is
    /// structurally inconsistent with the symbol parameters.
    #[error("format error: {0}")]
    Format(&'static str),
    /// Reed-Solomon correction exceeded the field's error-correcting
    /// capacity, or a corrected position fell outside the codeword block.
    #[error("checksum error: {0}")]
    Checksum(&'static str),
}

impl DecodeError {
    /// True for checksum (error-correction) failures.
    pub fn is_checksum(&self) -> bool {
        matches!(self, DecodeError::Checksum(_))
    }

    /// True for structural format failures.
    pub fn is_format(&self) -> bool {
        matches!(self, DecodeError::Format(_))
    }
}
