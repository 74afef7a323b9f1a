//! Top-level decode entry points wiring the pipeline together.

use log::debug;
use rayon::prelude::*;

use crate::decoder::bitstream::{self, Token};
use crate::decoder::codewords;
use crate::decoder::content::{Content, DecodedSymbol};
use crate::decoder::structured_append::{self, StructuredAppendInfo};
use crate::error::DecodeError;
use crate::models::{BitMatrix, SymbolParams};

/// Decode a sampled Aztec symbol.
///
/// `matrix` and `params` come from the detector; both are only borrowed for
/// the duration of the call and no state survives it, so independent symbols
/// may be decoded concurrently without synchronization.
pub fn decode(matrix: &BitMatrix, params: &SymbolParams) -> Result<DecodedSymbol, DecodeError> {
    let raw_bits = codewords::extract_bits(matrix, params)?;
    let data_bits = codewords::correct_bits(&raw_bits, params)?;
    let mut decoded = decode_bits(&data_bits)?;
    decoded.reader_init = params.reader_init;
    decoded.mirrored = params.mirrored;
    Ok(decoded)
}

/// Decode an already corrected and unstuffed data bitstream.
///
/// This is the pipeline downstream of Reed-Solomon; it is public because the
/// corrected bitstream is an observable layer of its own (and the natural
/// place to exercise mode-table and structured-append behavior).
pub fn decode_bits(bits: &[bool]) -> Result<DecodedSymbol, DecodeError> {
    let mut tokens = bitstream::decode_tokens(bits)?;

    let mut structured_append = StructuredAppendInfo::default();
    if bitstream::has_structured_append_marker(bits) {
        let content_bytes: Vec<u8> = tokens.iter().filter_map(|token| token.content_byte()).collect();
        let (info, consumed) = structured_append::parse(&content_bytes);
        if consumed > 0 {
            debug!(
                "structured append {}/{} id={:?}",
                info.index, info.count, info.id
            );
            drop_leading_content(&mut tokens, consumed);
        }
        structured_append = info;
    }

    let content = Content::assemble(&tokens, structured_append.is_recognized());
    Ok(DecodedSymbol {
        content,
        structured_append,
        reader_init: false,
        mirrored: false,
    })
}

/// Decode independent symbols in parallel.
pub fn decode_batch(symbols: &[(BitMatrix, SymbolParams)]) -> Vec<Result<DecodedSymbol, DecodeError>> {
    symbols
        .par_iter()
        .map(|(matrix, params)| decode(matrix, params))
        .collect()
}

/// Remove the first `count` content-bearing tokens, keeping everything else.
fn drop_leading_content(tokens: &mut Vec<Token>, count: usize) {
    let mut dropped = 0;
    tokens.retain(|token| {
        if dropped < count && token.content_byte().is_some() {
            dropped += 1;
            false
        } else {
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_leading_content_skips_markers() {
        let mut tokens = vec![
            Token::Char(b'A'),
            Token::Eci(5),
            Token::Char(b'D'),
            Token::Char(b'X'),
        ];
        drop_leading_content(&mut tokens, 2);
        assert_eq!(tokens, vec![Token::Eci(5), Token::Char(b'X')]);
    }

    #[test]
    fn test_decode_bits_plain() {
        // 'A' in Upper mode
        let bits = [false, false, false, true, false];
        let decoded = decode_bits(&bits).unwrap();
        assert_eq!(decoded.text(), "A");
        assert_eq!(decoded.symbology_identifier(), "]z0");
        assert_eq!(decoded.structured_append.index, -1);
    }
}
