//! Recursive character text splitting with overlap.
//!
//! Documents are split on the first separator in `SEPARATORS` that occurs
//! in the text; pieces that are still too large are split again with the
//! remaining separators, down to single characters. Separators stay
//! attached to the preceding piece so chunk text keeps the original
//! punctuation and formatting. Adjacent chunks share `chunk_overlap`
//! characters taken from the tail of the previous chunk.

use crate::error::{Error, Result};

/// Separator priority, most structural first. The empty string means
/// "split into single characters" and always succeeds.
pub const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Build a splitter. `chunk_overlap` must be strictly less than
    /// `chunk_size`, and `chunk_size` must be non-zero.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk_overlap ({}) must be strictly less than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunks of at most `chunk_size` characters.
    /// Empty input yields no chunks; input that already fits yields a
    /// single chunk equal to the input.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.split_with(text, SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (sep, rest) = pick_separator(text, separators);
        let pieces = split_keep_separator(text, sep);

        let mut chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(&piece) <= self.chunk_size {
                pending.push(piece);
            } else {
                if !pending.is_empty() {
                    chunks.extend(self.merge_pieces(std::mem::take(&mut pending)));
                }
                if rest.is_empty() {
                    // No finer separator left; emit oversize as-is.
                    chunks.push(piece);
                } else {
                    chunks.extend(self.split_with(&piece, rest));
                }
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge_pieces(pending));
        }
        chunks
    }

    /// Accumulate small pieces into chunks up to `chunk_size`, carrying a
    /// `chunk_overlap`-character window from the tail of each emitted
    /// chunk into the next one.
    fn merge_pieces(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: std::collections::VecDeque<(String, usize)> = std::collections::VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(&piece);
            if total + len > self.chunk_size && !window.is_empty() {
                chunks.push(window.iter().map(|(p, _)| p.as_str()).collect::<String>());
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    if let Some((_, dropped)) = window.pop_front() {
                        total -= dropped;
                    } else {
                        break;
                    }
                }
            }
            total += len;
            window.push_back((piece, len));
        }
        if !window.is_empty() {
            chunks.push(window.iter().map(|(p, _)| p.as_str()).collect::<String>());
        }
        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First separator that occurs in `text`, plus the finer ones after it.
/// The empty-string separator matches everything.
fn pick_separator<'a>(text: &str, separators: &'a [&'a str]) -> (&'a str, &'a [&'a str]) {
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() || text.contains(sep) {
            return (sep, &separators[i + 1..]);
        }
    }
    ("", &[])
}

/// Split on `sep`, keeping the separator attached to the preceding piece,
/// so that concatenating the pieces restores the input exactly.
fn split_keep_separator(text: &str, sep: &str) -> Vec<String> {
    if sep.is_empty() {
        return text.chars().map(|c| c.to_string()).collect();
    }
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, m) in text.match_indices(sep) {
        let end = idx + m.len();
        if end > start {
            pieces.push(text[start..end].to_string());
        }
        start = end;
    }
    if start < text.len() {
        pieces.push(text[start..].to_string());
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pieces_reassemble_input() {
        let text = "First paragraph.\n\nSecond line\nthird. And a tail";
        let pieces = split_keep_separator(text, "\n\n");
        assert_eq!(pieces.concat(), text);
        let pieces = split_keep_separator(text, " ");
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn separator_priority_skips_absent_separators() {
        let (sep, rest) = pick_separator("a b", SEPARATORS);
        assert_eq!(sep, " ");
        assert_eq!(rest, &[""]);
    }
}
