/// A 3-byte window of a document's content. Matching is byte-exact: no
/// Unicode normalisation or case-folding is applied anywhere in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Trigram([u8; 3]);

impl Trigram {
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Trigram(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }
}

impl std::fmt::Display for Trigram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Overlapping 3-byte windows of `content`. Content shorter than 3 bytes
/// yields no trigrams.
pub fn trigrams_of(content: &str) -> impl Iterator<Item = Trigram> + '_ {
    let bytes = content.as_bytes();
    let windows = bytes.len().saturating_sub(2);
    (0..windows).map(move |i| Trigram([bytes[i], bytes[i + 1], bytes[i + 2]]))
}

#[cfg(test)]
#[path = "trigram_tests.rs"]
mod tests;
