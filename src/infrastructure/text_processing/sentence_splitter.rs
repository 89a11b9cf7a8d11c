use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, Document};

pub const DEFAULT_MAX_CHUNK_CHARS: usize = 500;

/// Packs whole sentences into chunks of at most `max_chars` characters.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace. A sentence longer than
/// `max_chars` becomes a chunk of its own rather than being cut mid-sentence.
pub struct SentenceSplitter {
    max_chars: usize,
}

impl SentenceSplitter {
    pub fn new(max_chars: usize) -> Result<Self, TextSplitterError> {
        if max_chars == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "max_chars must be positive".to_string(),
            ));
        }
        Ok(Self { max_chars })
    }

    /// Sentences with their starting char offset in `text`.
    fn sentences(text: &str) -> Vec<(usize, &str)> {
        let mut sentences = Vec::new();
        let mut start_byte = 0;
        let mut start_char = 0;
        let mut chars = text.char_indices().enumerate().peekable();

        while let Some((char_idx, (byte_idx, c))) = chars.next() {
            let at_boundary = matches!(c, '.' | '!' | '?')
                && chars
                    .peek()
                    .is_some_and(|(_, (_, next))| next.is_whitespace());

            if at_boundary {
                let end = byte_idx + c.len_utf8();
                sentences.push((start_char, &text[start_byte..end]));
                start_byte = end;
                start_char = char_idx + 1;
            }
        }

        if start_byte < text.len() {
            sentences.push((start_char, &text[start_byte..]));
        }

        sentences
            .into_iter()
            .filter_map(|(offset, s)| {
                let leading = s.chars().take_while(|c| c.is_whitespace()).count();
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some((offset + leading, trimmed))
            })
            .collect()
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHUNK_CHARS,
        }
    }
}

#[async_trait]
impl TextSplitter for SentenceSplitter {
    async fn split(&self, text: &str, document: &Document) -> Result<Vec<Chunk>, TextSplitterError> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;
        let mut current_offset = 0;

        for (offset, sentence) in Self::sentences(text) {
            let sentence_len = sentence.chars().count();
            let joined_len = if current.is_empty() {
                sentence_len
            } else {
                current_len + 1 + sentence_len
            };

            if !current.is_empty() && joined_len > self.max_chars {
                chunks.push(Chunk::new(
                    std::mem::take(&mut current),
                    document.id,
                    document.filename.clone(),
                    current_offset,
                ));
                current_len = 0;
            }

            if current.is_empty() {
                current_offset = offset;
                current.push_str(sentence);
                current_len = sentence_len;
            } else {
                current.push(' ');
                current.push_str(sentence);
                current_len += 1 + sentence_len;
            }
        }

        if !current.is_empty() {
            chunks.push(Chunk::new(
                current,
                document.id,
                document.filename.clone(),
                current_offset,
            ));
        }

        Ok(chunks)
    }
}
