//! Reed-Solomon error correction over the Aztec Galois fields.
//!
//! The Aztec generator polynomial has roots alpha^1 .. alpha^numEcc
//! (generator base 1), unlike QR's base-0 convention. Codewords are treated
//! as a polynomial in descending powers: `words[0]` is the coefficient of
//! x^(n-1).

use log::trace;

use crate::decoder::galois::GaloisField;
use crate::error::DecodeError;

/// Decoder for one Reed-Solomon block over a borrowed field.
pub struct ReedSolomonDecoder<'a> {
    field: &'a GaloisField,
}

impl<'a> ReedSolomonDecoder<'a> {
    /// Decoder over `field`; the field tables are shared and read-only.
    pub fn new(field: &'a GaloisField) -> Self {
        Self { field }
    }

    /// Correct up to `num_ecc / 2` word errors in place.
    ///
    /// `received` holds the full block, data words followed by `num_ecc`
    /// check words. All failures are `DecodeError::Checksum`.
    pub fn decode(&self, received: &mut [u16], num_ecc: usize) -> Result<(), DecodeError> {
        let syndromes = self.syndromes(received, num_ecc);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(());
        }

        let sigma = self.find_error_locator(&syndromes);
        let degree = sigma.len() - 1;
        trace!("nonzero syndromes, error locator degree {degree}");
        if degree == 0 {
            return Err(DecodeError::Checksum("degenerate error locator"));
        }
        if 2 * degree > num_ecc {
            return Err(DecodeError::Checksum("correction capacity exceeded"));
        }

        let positions = self.find_error_positions(&sigma, received.len())?;
        let magnitudes = self.find_error_magnitudes(&sigma, &syndromes, &positions, received.len())?;
        for (&position, &magnitude) in positions.iter().zip(&magnitudes) {
            received[position] ^= magnitude;
        }

        // Verify the corrected block evaluates to zero syndromes
        let residual = self.syndromes(received, num_ecc);
        if residual.iter().any(|&s| s != 0) {
            return Err(DecodeError::Checksum("residual syndromes after correction"));
        }
        Ok(())
    }

    /// Evaluate the received polynomial at alpha^1 .. alpha^num_ecc.
    fn syndromes(&self, received: &[u16], num_ecc: usize) -> Vec<u16> {
        let n = received.len();
        let mut syndromes = vec![0u16; num_ecc];
        for (i, syndrome) in syndromes.iter_mut().enumerate() {
            let mut sum = 0u16;
            for (j, &word) in received.iter().enumerate() {
                sum ^= self.field.mul(word, self.field.alpha_pow((i + 1) * (n - 1 - j)));
            }
            *syndrome = sum;
        }
        syndromes
    }

    /// Berlekamp-Massey: smallest LFSR generating the syndrome sequence.
    /// Returns the locator polynomial in ascending powers, trailing zeros
    /// trimmed.
    fn find_error_locator(&self, syndromes: &[u16]) -> Vec<u16> {
        let mut sigma = vec![1u16];
        let mut prev = vec![1u16];
        let mut prev_delta: u16 = 1;
        let mut errors = 0usize;
        let mut gap = 1usize;

        for i in 0..syndromes.len() {
            let mut delta = syndromes[i];
            for j in 1..=errors {
                if j < sigma.len() {
                    delta ^= self.field.mul(sigma[j], syndromes[i - j]);
                }
            }

            if delta == 0 {
                gap += 1;
                continue;
            }

            let scale = self.field.div(delta, prev_delta);
            if sigma.len() < prev.len() + gap {
                sigma.resize(prev.len() + gap, 0);
            }
            if 2 * errors <= i {
                let sigma_snapshot = sigma.clone();
                for (j, &coeff) in prev.iter().enumerate() {
                    sigma[j + gap] ^= self.field.mul(scale, coeff);
                }
                prev = sigma_snapshot;
                prev_delta = delta;
                errors = i + 1 - errors;
                gap = 1;
            } else {
                for (j, &coeff) in prev.iter().enumerate() {
                    sigma[j + gap] ^= self.field.mul(scale, coeff);
                }
                gap += 1;
            }
        }

        while sigma.len() > 1 && sigma.last() == Some(&0) {
            sigma.pop();
        }
        sigma
    }

    /// Chien search over the codeword index range. The locator's roots are
    /// the inverses of the error locations; any root falling outside the
    /// block means the locator is bogus, which shows up as a count mismatch.
    fn find_error_positions(&self, sigma: &[u16], n: usize) -> Result<Vec<usize>, DecodeError> {
        let degree = sigma.len() - 1;
        let mut positions = Vec::with_capacity(degree);
        for i in 0..n {
            let x_inv = self.field.alpha_pow_neg(n - 1 - i);
            let mut sum = 0u16;
            for (j, &coeff) in sigma.iter().enumerate() {
                sum ^= self.field.mul(coeff, self.field.pow(x_inv, j));
            }
            if sum == 0 {
                positions.push(i);
            }
        }
        if positions.len() != degree {
            return Err(DecodeError::Checksum("error locations out of range"));
        }
        Ok(positions)
    }

    /// Forney's formula with generator base 1: e = omega(X^-1) / sigma'(X^-1).
    fn find_error_magnitudes(
        &self,
        sigma: &[u16],
        syndromes: &[u16],
        positions: &[usize],
        n: usize,
    ) -> Result<Vec<u16>, DecodeError> {
        let degree = sigma.len() - 1;
        // omega = syndromes * sigma mod x^degree
        let mut omega = vec![0u16; degree];
        for (i, omega_i) in omega.iter_mut().enumerate() {
            for j in 0..=i.min(degree) {
                *omega_i ^= self.field.mul(sigma[j], syndromes[i - j]);
            }
        }

        let mut magnitudes = Vec::with_capacity(positions.len());
        for &position in positions {
            let x_inv = self.field.alpha_pow_neg(n - 1 - position);

            let mut omega_value = 0u16;
            for (i, &coeff) in omega.iter().enumerate() {
                omega_value ^= self.field.mul(coeff, self.field.pow(x_inv, i));
            }

            // Formal derivative keeps only odd-power terms.
            let mut derivative = 0u16;
            for (i, &coeff) in sigma.iter().enumerate().skip(1).step_by(2) {
                derivative ^= self.field.mul(coeff, self.field.pow(x_inv, i - 1));
            }
            if derivative == 0 {
                return Err(DecodeError::Checksum("zero locator derivative"));
            }

            magnitudes.push(self.field.div(omega_value, derivative));
        }
        Ok(magnitudes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::galois::field_for_word_size;

    // Vectors produced with a base-1 generator polynomial encoder over the
    // matching field.
    const GF64_CODEWORD: [u16; 12] = [10, 20, 30, 40, 50, 60, 57, 29, 60, 20, 21, 21];
    const GF256_CODEWORD: [u16; 13] = [
        0x12, 0x34, 0x56, 0x78, 0x9A, 103, 171, 109, 31, 46, 144, 134, 141,
    ];

    #[test]
    fn test_no_errors() {
        let decoder = ReedSolomonDecoder::new(field_for_word_size(6));
        let mut words = GF64_CODEWORD;
        assert!(decoder.decode(&mut words, 6).is_ok());
        assert_eq!(words, GF64_CODEWORD);
    }

    #[test]
    fn test_correct_three_errors_gf64() {
        let decoder = ReedSolomonDecoder::new(field_for_word_size(6));
        let mut words = GF64_CODEWORD;
        words[1] ^= 0x15;
        words[7] ^= 0x3F;
        words[10] ^= 0x01;
        assert!(decoder.decode(&mut words, 6).is_ok());
        assert_eq!(words, GF64_CODEWORD);
    }

    #[test]
    fn test_correct_four_errors_gf256() {
        let decoder = ReedSolomonDecoder::new(field_for_word_size(8));
        let mut words = GF256_CODEWORD;
        words[0] ^= 0xFF;
        words[6] ^= 0x42;
        words[9] ^= 0x10;
        words[12] ^= 0x81;
        assert!(decoder.decode(&mut words, 8).is_ok());
        assert_eq!(words, GF256_CODEWORD);
    }

    #[test]
    fn test_beyond_capacity() {
        let decoder = ReedSolomonDecoder::new(field_for_word_size(6));
        let mut words = GF64_CODEWORD;
        for word in words.iter_mut().take(4) {
            *word ^= 0x11;
        }
        let err = decoder.decode(&mut words, 6).unwrap_err();
        assert!(err.is_checksum());
    }

    #[test]
    fn test_all_zero_block() {
        // The zero codeword is valid (all syndromes vanish)
        let decoder = ReedSolomonDecoder::new(field_for_word_size(6));
        let mut words = [0u16; 16];
        assert!(decoder.decode(&mut words, 6).is_ok());
    }
}
