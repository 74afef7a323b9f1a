//! Aztec decoding pipeline
//!
//! Stages, in data-flow order:
//! - Codeword extraction from the module grid (ring sweep, reference-grid skip)
//! - Reed-Solomon error correction over the layer-dependent Galois field
//! - Stuffed-bit removal
//! - Mode state machine turning the data bitstream into tokens
//! - Structured-append parsing and content assembly

/// Top-level decode orchestration.
pub mod aztec_decoder;
/// Mode state machine over the corrected bitstream.
pub mod bitstream;
/// Codeword extraction, correction and unstuffing.
pub mod codewords;
/// Segments, text rendering, symbology identifiers.
pub mod content;
/// Galois field tables.
pub mod galois;
/// Reed-Solomon decoder.
pub mod reed_solomon;
/// Structured-append header grammar.
pub mod structured_append;
/// The five character tables.
pub mod tables;
