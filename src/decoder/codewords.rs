//! Codeword extraction from the module grid, Reed-Solomon correction and
//! stuffed-bit removal.
//!
//! Full-size symbols interleave reference-grid lines every 16 modules; those
//! rows/columns carry no data and are skipped via an alignment map before the
//! concentric data rings are read.

use log::debug;

use crate::decoder::bitstream::BitReader;
use crate::decoder::galois::field_for_word_size;
use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::error::DecodeError;
use crate::models::{BitMatrix, SymbolParams};

/// Read the symbol's data field into a flat bit sequence.
///
/// Rings are swept outermost-first; each layer contributes `8 * row_size`
/// bits from its two-module-thick left/bottom/right/top runs. Fails when the
/// sampled matrix size does not match the declared layer count/compactness.
pub fn extract_bits(matrix: &BitMatrix, params: &SymbolParams) -> Result<Vec<bool>, DecodeError> {
    if params.layers == 0 {
        return Err(DecodeError::Format("data symbol must have at least one layer"));
    }
    if matrix.dimension() != params.matrix_size() {
        return Err(DecodeError::Format("matrix size does not match symbol parameters"));
    }

    let layers = params.layers as usize;
    let base_size = params.base_matrix_size();
    let alignment_map = build_alignment_map(base_size, params);

    let mut raw_bits = vec![false; params.total_bit_count()];
    let mut row_offset = 0;
    for i in 0..layers {
        let row_size = (layers - i) * 4 + if params.compact { 9 } else { 12 };
        // Ring corners ignoring reference lines: <low,low> to <high,high>.
        let low = i * 2;
        let high = base_size - 1 - low;
        for j in 0..row_size {
            let column_offset = j * 2;
            for k in 0..2 {
                // left column
                raw_bits[row_offset + column_offset + k] =
                    matrix.get(alignment_map[low + k], alignment_map[low + j]);
                // bottom row
                raw_bits[row_offset + 2 * row_size + column_offset + k] =
                    matrix.get(alignment_map[low + j], alignment_map[high - k]);
                // right column
                raw_bits[row_offset + 4 * row_size + column_offset + k] =
                    matrix.get(alignment_map[high - k], alignment_map[high - j]);
                // top row
                raw_bits[row_offset + 6 * row_size + column_offset + k] =
                    matrix.get(alignment_map[high - j], alignment_map[low + k]);
            }
        }
        row_offset += row_size * 8;
    }
    Ok(raw_bits)
}

/// Map data coordinates (reference lines excluded) to matrix coordinates.
fn build_alignment_map(base_size: usize, params: &SymbolParams) -> Vec<usize> {
    if params.compact {
        return (0..base_size).collect();
    }
    let mut map = vec![0usize; base_size];
    let orig_center = base_size / 2;
    let center = params.matrix_size() / 2;
    for i in 0..orig_center {
        let offset = i + i / 15;
        map[orig_center - i - 1] = center - offset - 1;
        map[orig_center + i] = center + offset + 1;
    }
    map
}

/// Reed-Solomon-correct the raw bit sequence and remove stuffed bits,
/// yielding the data bitstream fed to the mode state machine.
pub fn correct_bits(raw_bits: &[bool], params: &SymbolParams) -> Result<Vec<bool>, DecodeError> {
    let word_size = params.word_size();
    let num_data_words = params.data_blocks as usize;
    let num_words = raw_bits.len() / word_size;
    if num_words < num_data_words {
        return Err(DecodeError::Format("fewer codewords than declared data blocks"));
    }

    // Any leading remainder bits are padding.
    let mut reader = BitReader::new(raw_bits);
    reader.advance(raw_bits.len() % word_size);
    let mut words: Vec<u16> = Vec::with_capacity(num_words);
    for _ in 0..num_words {
        words.push(reader.read(word_size).expect("word count precomputed") as u16);
    }

    let field = field_for_word_size(word_size);
    let num_ecc = num_words - num_data_words;
    ReedSolomonDecoder::new(field).decode(&mut words, num_ecc)?;
    debug!("corrected {num_words} x {word_size}-bit codewords ({num_ecc} check words)");

    // Unstuff the data words. The encoder never emits an all-zero or all-one
    // word; a word of 1 or mask-1 carries word_size-1 identical bits.
    let mask = (1u16 << word_size) - 1;
    let mut bits = Vec::with_capacity(num_data_words * word_size);
    for &word in words.iter().take(num_data_words) {
        if word == 0 || word == mask {
            return Err(DecodeError::Format("stuffed-bit violation in data codeword"));
        }
        if word == 1 || word == mask - 1 {
            let fill = word != 1;
            bits.extend(std::iter::repeat_n(fill, word_size - 1));
        } else {
            for bit in (0..word_size).rev() {
                bits.push(word >> bit & 1 == 1);
            }
        }
    }
    Ok(bits)
}
