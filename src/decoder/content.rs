//! Grouping of decoded tokens into ECI-tagged segments, text rendering and
//! symbology identifier derivation.

use encoding_rs::Encoding;
use log::trace;

use crate::decoder::bitstream::Token;
use crate::decoder::structured_append::StructuredAppendInfo;

/// ASCII group separator, emitted for FNC1 markers that act as field
/// separators rather than symbology modifiers.
const GS: u8 = 0x1D;

/// Rendering modes for [`Content::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Per-segment charset rendering; the default charset is ISO-8859-1.
    Plain,
    /// Uppercase space-separated dump of the raw content bytes.
    Hex,
    /// ECI-annotated rendering: `\NNNNNN` designator prefixes per segment,
    /// backslashes doubled, output transcoded to UTF-8 (ECI 000026).
    Eci,
}

/// A maximal run of content bytes under one active ECI designator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    /// Active designator; `None` for the implicit leading segment.
    pub eci: Option<u32>,
    /// Raw content bytes of the run.
    pub bytes: Vec<u8>,
}

/// The recovered message: ordered segments plus the symbology modifier
/// accumulated while classifying FNC1 markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    segments: Vec<Segment>,
    modifier: u8,
    has_eci: bool,
}

impl Content {
    /// Group `tokens` into segments and classify FNC1 markers by position.
    ///
    /// An FNC1 before any content byte marks GS1 data; one after a single
    /// uppercase letter or exactly two digits marks AIM application data
    /// (both are consumed); anywhere else it becomes a literal GS byte.
    /// Token positions are counted after structured-append removal, so the
    /// sequencing prefix never primes the classification.
    pub(crate) fn assemble(tokens: &[Token], structured_append: bool) -> Self {
        let mut segments = vec![Segment::default()];
        let mut modifier = 0u8;
        let mut has_eci = false;
        let mut head = Vec::with_capacity(2);
        let mut byte_count = 0usize;

        fn push_byte(segments: &mut [Segment], head: &mut Vec<u8>, count: &mut usize, byte: u8) {
            if *count < 2 {
                head.push(byte);
            }
            *count += 1;
            segments.last_mut().expect("never empty").bytes.push(byte);
        }

        for &token in tokens {
            match token {
                Token::Char(byte) | Token::Byte(byte) => {
                    push_byte(&mut segments, &mut head, &mut byte_count, byte);
                }
                Token::Eci(eci) => {
                    has_eci = true;
                    segments.push(Segment {
                        eci: Some(eci),
                        bytes: Vec::new(),
                    });
                }
                Token::Fnc1 => {
                    if byte_count == 0 {
                        modifier = 1;
                    } else if byte_count == 1 && head[0].is_ascii_uppercase() {
                        modifier = 2;
                    } else if byte_count == 2
                        && head[0].is_ascii_digit()
                        && head[1].is_ascii_digit()
                    {
                        modifier = 2;
                    } else {
                        push_byte(&mut segments, &mut head, &mut byte_count, GS);
                    }
                }
            }
        }

        if structured_append {
            modifier += 6;
        }
        trace!("assembled {} segments, modifier {modifier}", segments.len());
        Self {
            segments,
            modifier,
            has_eci,
        }
    }

    /// Ordered content segments, including empty ones.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when an explicit ECI designator switch occurred.
    pub fn has_eci(&self) -> bool {
        self.has_eci
    }

    /// All content bytes in order, ignoring segment boundaries.
    pub fn bytes(&self) -> Vec<u8> {
        self.segments
            .iter()
            .flat_map(|segment| segment.bytes.iter().copied())
            .collect()
    }

    /// Symbology identifier, always matching `]z[0-9A-F]`.
    ///
    /// The modifier nibble is 0/1/2 for plain/GS1/AIM content, plus 6 for a
    /// recognized structured-append header. The ECI-bearing variants (+3)
    /// appear only in ECI-annotated renderings, not here.
    pub fn symbology_identifier(&self) -> String {
        format!("]z{}", hex_digit(self.modifier))
    }

    /// Render the content in the requested mode.
    pub fn text(&self, mode: TextMode) -> String {
        match mode {
            TextMode::Plain => self
                .segments
                .iter()
                .map(|segment| decode_segment(segment))
                .collect(),
            TextMode::Hex => {
                let bytes = self.bytes();
                let mut out = String::with_capacity(bytes.len() * 3);
                for (i, byte) in bytes.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&format!("{byte:02X}"));
                }
                out
            }
            TextMode::Eci => {
                let mut out = format!("]z{}", hex_digit(self.modifier + 3));
                for segment in &self.segments {
                    if segment.bytes.is_empty() {
                        continue;
                    }
                    // The output itself is UTF-8, so every run reports ECI 26.
                    out.push_str("\\000026");
                    out.push_str(&decode_segment(segment).replace('\\', "\\\\"));
                }
                out
            }
        }
    }

    /// Raw bytes prefixed with the symbology identifier; when explicit ECIs
    /// are present, each segment carries its `\NNNNNN` designator and
    /// backslashes are doubled.
    pub fn bytes_eci(&self) -> Vec<u8> {
        if !self.has_eci {
            let mut out = self.symbology_identifier().into_bytes();
            out.extend(self.bytes());
            return out;
        }
        let mut out = format!("]z{}", hex_digit(self.modifier + 3)).into_bytes();
        for segment in &self.segments {
            if let Some(eci) = segment.eci {
                out.extend(format!("\\{eci:06}").into_bytes());
            }
            for &byte in &segment.bytes {
                out.push(byte);
                if byte == b'\\' {
                    out.push(byte);
                }
            }
        }
        out
    }
}

fn hex_digit(value: u8) -> char {
    b"0123456789ABCDEF"[value as usize & 0xF] as char
}

/// Decode one segment to text using its ECI charset.
fn decode_segment(segment: &Segment) -> String {
    match segment.eci.and_then(encoding_for_eci) {
        Some(encoding) => encoding
            .decode_without_bom_handling(&segment.bytes)
            .0
            .into_owned(),
        // The implicit default charset is true ISO-8859-1 (not the
        // windows-1252 superset), so map bytes straight to code points.
        None => segment.bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Charset for an ECI designator. `None` falls back to the Latin-1 default,
/// which also covers the CP437 (0, 2) and ASCII (27) assignments that
/// `encoding_rs` does not carry.
fn encoding_for_eci(eci: u32) -> Option<&'static Encoding> {
    use encoding_rs::*;
    match eci {
        4 => Some(ISO_8859_2),
        5 => Some(ISO_8859_3),
        6 => Some(ISO_8859_4),
        7 => Some(ISO_8859_5),
        8 => Some(ISO_8859_6),
        9 => Some(ISO_8859_7),
        10 => Some(ISO_8859_8),
        11 => Some(WINDOWS_1254), // ISO-8859-9 superset
        12 => Some(ISO_8859_10),
        13 => Some(WINDOWS_874), // ISO-8859-11 superset
        15 => Some(ISO_8859_13),
        16 => Some(ISO_8859_14),
        17 => Some(ISO_8859_15),
        18 => Some(ISO_8859_16),
        20 => Some(SHIFT_JIS),
        21 => Some(WINDOWS_1250),
        22 => Some(WINDOWS_1251),
        23 => Some(WINDOWS_1252),
        24 => Some(WINDOWS_1256),
        25 => Some(UTF_16BE),
        26 => Some(UTF_8),
        28 => Some(BIG5),
        29 => Some(GB18030),
        30 => Some(EUC_KR),
        _ => None,
    }
}

/// Fully decoded Aztec symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    /// The recovered message.
    pub content: Content,
    /// Structured-append position, or defaults when absent.
    pub structured_append: StructuredAppendInfo,
    /// Reader-initialisation flag carried over from the symbol parameters.
    pub reader_init: bool,
    /// Mirror flag carried over from the symbol parameters.
    pub mirrored: bool,
}

impl DecodedSymbol {
    /// Plain-charset rendering of the message.
    pub fn text(&self) -> String {
        self.content.text(TextMode::Plain)
    }

    /// Shorthand for [`Content::symbology_identifier`].
    pub fn symbology_identifier(&self) -> String {
        self.content.symbology_identifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<Token> {
        text.bytes().map(Token::Char).collect()
    }

    #[test]
    fn test_plain_content() {
        let content = Content::assemble(&chars("AB"), false);
        assert_eq!(content.symbology_identifier(), "]z0");
        assert_eq!(content.text(TextMode::Plain), "AB");
        assert_eq!(content.text(TextMode::Hex), "41 42");
        assert!(!content.has_eci());
    }

    #[test]
    fn test_gs1_first_position() {
        let mut tokens = vec![Token::Fnc1];
        tokens.extend(chars("2001"));
        let content = Content::assemble(&tokens, false);
        assert_eq!(content.symbology_identifier(), "]z1");
        assert_eq!(content.text(TextMode::Plain), "2001");
    }

    #[test]
    fn test_aim_after_single_letter() {
        let mut tokens = chars("A");
        tokens.push(Token::Fnc1);
        tokens.extend(chars("B"));
        let content = Content::assemble(&tokens, false);
        assert_eq!(content.symbology_identifier(), "]z2");
        assert_eq!(content.text(TextMode::Plain), "AB");
    }

    #[test]
    fn test_aim_after_two_digits() {
        let mut tokens = chars("99");
        tokens.push(Token::Fnc1);
        tokens.extend(chars("B"));
        let content = Content::assemble(&tokens, false);
        assert_eq!(content.symbology_identifier(), "]z2");
        assert_eq!(content.text(TextMode::Plain), "99B");
    }

    #[test]
    fn test_fnc1_elsewhere_is_group_separator() {
        let mut tokens = chars("AB");
        tokens.push(Token::Fnc1);
        tokens.extend(chars("C"));
        let content = Content::assemble(&tokens, false);
        assert_eq!(content.symbology_identifier(), "]z0");
        assert_eq!(content.text(TextMode::Plain), "AB\u{1d}C");
    }

    #[test]
    fn test_single_digit_does_not_prime_aim() {
        let mut tokens = chars("1");
        tokens.push(Token::Fnc1);
        tokens.extend(chars("A"));
        let content = Content::assemble(&tokens, false);
        assert_eq!(content.symbology_identifier(), "]z0");
        assert_eq!(content.text(TextMode::Plain), "1\u{1d}A");
    }

    #[test]
    fn test_structured_append_offsets_modifier() {
        let content = Content::assemble(&chars("A"), true);
        assert_eq!(content.symbology_identifier(), "]z6");
        let mut tokens = vec![Token::Fnc1];
        tokens.extend(chars("X"));
        let content = Content::assemble(&tokens, true);
        assert_eq!(content.symbology_identifier(), "]z7");
    }

    #[test]
    fn test_eci_segments() {
        let mut tokens = vec![Token::Eci(7)];
        tokens.push(Token::Char(0xB0)); // U+0410 in ISO-8859-5
        let content = Content::assemble(&tokens, false);
        assert!(content.has_eci());
        assert_eq!(content.segments().len(), 2);
        assert_eq!(content.text(TextMode::Plain), "\u{0410}");
    }

    #[test]
    fn test_default_charset_is_latin1() {
        let content = Content::assemble(&[Token::Char(0xE9)], false);
        assert_eq!(content.text(TextMode::Plain), "é");
        // 0x80..0x9F map to C1 controls, not windows-1252 typography
        let content = Content::assemble(&[Token::Char(0x80)], false);
        assert_eq!(content.text(TextMode::Plain), "\u{80}");
    }

    #[test]
    fn test_eci_text_mode() {
        let content = Content::assemble(&chars("A"), false);
        assert_eq!(content.text(TextMode::Eci), "]z3\\000026A");

        let mut tokens = vec![Token::Eci(3)];
        tokens.extend(chars("A\\B"));
        tokens.push(Token::Char(0xE9));
        let content = Content::assemble(&tokens, false);
        assert_eq!(content.text(TextMode::Eci), "]z3\\000026A\\\\Bé");
    }

    #[test]
    fn test_bytes_eci() {
        let content = Content::assemble(&chars("A"), false);
        assert_eq!(content.bytes_eci(), b"]z0A");

        let mut tokens = vec![Token::Eci(3)];
        tokens.extend(chars("A\\B"));
        tokens.push(Token::Char(0xE9));
        let content = Content::assemble(&tokens, false);
        assert_eq!(content.bytes_eci(), b"]z3\\000003A\\\\B\xE9");
    }

    #[test]
    fn test_plain_text_round_trips_to_bytes() {
        // Default-charset rendering is bijective: re-encoding the text
        // reproduces the decoded byte stream exactly.
        let tokens: Vec<Token> = [b' ', b'D', b'A', 0x1D, 0xE9, 0x80, 0xFF]
            .into_iter()
            .map(Token::Char)
            .collect();
        let content = Content::assemble(&tokens, false);
        let round_tripped: Vec<u8> = content
            .text(TextMode::Plain)
            .chars()
            .map(|c| u32::from(c) as u8)
            .collect();
        assert_eq!(round_tripped, content.bytes());
    }

    #[test]
    fn test_binary_tokens_render_as_hex() {
        let tokens = [Token::Byte(0x1D), Token::Byte(0xFF)];
        let content = Content::assemble(&tokens, false);
        assert_eq!(content.text(TextMode::Hex), "1D FF");
    }
}
