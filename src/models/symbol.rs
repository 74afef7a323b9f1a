//! Symbol parameters reported by the detector.

/// Geometry and metadata of a detected Aztec symbol.
///
/// Produced once per decode attempt by the (out-of-scope) detector and
/// consumed read-only. The layer count fully determines the codeword width
/// and therefore the Galois field the Reed-Solomon block lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolParams {
    /// Compact symbols have no reference grid and a smaller core.
    pub compact: bool,
    /// Number of data layers around the bullseye (>= 1).
    pub layers: u32,
    /// Number of data codewords in the Reed-Solomon block.
    pub data_blocks: u32,
    /// Reader-initialisation (programming) symbol flag.
    pub reader_init: bool,
    /// Symbol was sampled mirrored.
    pub mirrored: bool,
    /// Rune value for layer-0 rune symbols; unused for data symbols.
    pub rune_value: i32,
}

impl SymbolParams {
    /// Parameters for a plain data symbol.
    pub fn new(compact: bool, layers: u32, data_blocks: u32) -> Self {
        Self {
            compact,
            layers,
            data_blocks,
            reader_init: false,
            mirrored: false,
            rune_value: 0,
        }
    }

    /// Codeword width in bits, per the layer-count breakpoints of the
    /// Aztec specification.
    pub fn word_size(&self) -> usize {
        match self.layers {
            0..=2 => 6,
            3..=8 => 8,
            9..=22 => 10,
            _ => 12,
        }
    }

    /// Matrix side length in modules ignoring reference-grid lines.
    pub fn base_matrix_size(&self) -> usize {
        (if self.compact { 11 } else { 14 }) + self.layers as usize * 4
    }

    /// Expected side length of the sampled matrix, including the
    /// reference-grid lines full-size symbols insert every 16 modules.
    pub fn matrix_size(&self) -> usize {
        let base = self.base_matrix_size();
        if self.compact {
            base
        } else {
            base + 1 + 2 * ((base / 2 - 1) / 15)
        }
    }

    /// Total number of data-field bits in the symbol.
    pub fn total_bit_count(&self) -> usize {
        let layers = self.layers as usize;
        ((if self.compact { 88 } else { 112 }) + 16 * layers) * layers
    }
}
