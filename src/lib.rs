//! RustAztec - Aztec 2D barcode decoding library
//!
//! Decodes an Aztec symbol that has already been sampled into a grid of
//! black/white modules. The pipeline runs codeword extraction over the
//! symbol's concentric data rings, Reed-Solomon error correction over a
//! layer-dependent Galois field, and a stateful bitstream decoder
//! implementing the Aztec mode tables (including ECI switches, FNC1/GS1
//! markers and structured-append framing).
//!
//! Image acquisition, binarization and symbol detection are out of scope:
//! the caller supplies the sampled [`BitMatrix`] together with the
//! [`SymbolParams`] the detector derived from the mode message.
//!
//! ```
//! use rust_aztec::{decode_bits, TextMode};
//!
//! // corrected data bitstream for the single character 'A'
//! let bits = [false, false, false, true, false];
//! let decoded = decode_bits(&bits).unwrap();
//! assert_eq!(decoded.text(), "A");
//! assert_eq!(decoded.symbology_identifier(), "]z0");
//! assert_eq!(decoded.content.text(TextMode::Hex), "41");
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Aztec decoding pipeline (codeword extraction, error correction, bitstream)
pub mod decoder;
/// Decode failure kinds
pub mod error;
/// Core data structures (BitMatrix, SymbolParams)
pub mod models;

pub use decoder::aztec_decoder::{decode, decode_batch, decode_bits};
pub use decoder::bitstream::Token;
pub use decoder::content::{Content, DecodedSymbol, Segment, TextMode};
pub use decoder::structured_append::StructuredAppendInfo;
pub use error::DecodeError;
pub use models::{BitMatrix, SymbolParams};
