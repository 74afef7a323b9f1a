//! Structured-append header parsing (ISO/IEC 24778:2008 section 8).

/// Position of one symbol within a multi-symbol message.
///
/// `index`/`count` are -1 when no sequence was recognized; `count` 0 means
/// the sequence was recognized but its size is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredAppendInfo {
    /// Zero-based position of this symbol in the sequence.
    pub index: i32,
    /// Total number of symbols, 0 if unknown.
    pub count: i32,
    /// Optional message id shared by all symbols of the sequence.
    pub id: String,
}

impl Default for StructuredAppendInfo {
    fn default() -> Self {
        Self {
            index: -1,
            count: -1,
            id: String::new(),
        }
    }
}

impl StructuredAppendInfo {
    /// True when a sequencing pair was recognized in the symbol.
    pub fn is_recognized(&self) -> bool {
        self.index >= 0
    }
}

/// Parse the structured-append header from the leading content bytes.
///
/// Grammar: an optional space-framed id (` id `), then two sequencing
/// characters in `A..=Z` read as index and count, then at least one byte of
/// message data. Returns the parsed info and the number of leading bytes it
/// consumed; on any mismatch nothing is consumed and the bytes stay in the
/// message. These rules, including forcing `count` to 0 when `index` and
/// `count` collide rather than rejecting the pair, follow the historical
/// behavior of deployed readers and are not worth second-guessing.
pub fn parse(bytes: &[u8]) -> (StructuredAppendInfo, usize) {
    let none = (StructuredAppendInfo::default(), 0);
    if bytes.is_empty() {
        return none;
    }

    let mut start = 0;
    let mut id = String::new();
    if bytes[0] == b' ' {
        // Space-framed id; without the terminating space there is no header.
        let Some(terminator) = bytes[1..].iter().position(|&b| b == b' ') else {
            return none;
        };
        // The id itself may be empty (two adjacent spaces).
        id = bytes[1..1 + terminator].iter().map(|&b| char::from(b)).collect();
        start = terminator + 2;
    }

    // Sequencing pair, and at least one byte of data after it.
    if start + 2 >= bytes.len() {
        return none;
    }
    let (seq_index, seq_count) = (bytes[start], bytes[start + 1]);
    if !seq_index.is_ascii_uppercase() || !seq_count.is_ascii_uppercase() {
        return none;
    }

    let index = (seq_index - b'A') as i32;
    let mut count = (seq_count - b'A') as i32 + 1;
    if count == 1 || count <= index {
        count = 0;
    }

    (StructuredAppendInfo { index, count, id }, start + 2)
}
