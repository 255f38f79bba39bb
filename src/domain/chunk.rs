use tracing::warn;

use crate::error::{AppError, AppResult};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Extracted text of one PDF page. Page numbers start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub page: u32,
    pub text: String,
}

/// Recursive character splitter: tries coarse separators first and falls
/// back to finer ones for pieces that are still too long.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        if chunk_size == 0 {
            return Err(AppError::Configuration(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap > chunk_size {
            return Err(AppError::Configuration(format!(
                "chunk overlap ({chunk_overlap}) is larger than chunk size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn split_pages(&self, pages: &[Page]) -> Vec<Chunk> {
        pages
            .iter()
            .flat_map(|page| {
                self.split_text(&page.text)
                    .into_iter()
                    .map(move |text| (page.number, text))
            })
            .enumerate()
            .map(|(index, (page, text))| Chunk { index, page, text })
            .collect()
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.as_str();
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }
            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }
            if finer.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }
        chunks
    }

    /// Greedily packs pieces into windows, carrying up to `chunk_overlap`
    /// characters of trailing pieces into the next window.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        "created a chunk of size {total}, which is longer than the specified {}",
                        self.chunk_size
                    );
                }
                if !current.is_empty() {
                    if let Some(doc) = join_trimmed(&current) {
                        docs.push(doc);
                    }
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        total -= char_len(current[0]);
                        current.remove(0);
                    }
                }
            }
            current.push(piece);
            total += len;
        }

        if let Some(doc) = join_trimmed(&current) {
            docs.push(doc);
        }
        docs
    }
}

/// Splits on `separator`, attaching each separator to the start of the piece
/// that follows it. An empty separator splits into single characters.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        pieces.push(&text[start..idx]);
        start = idx;
    }
    pieces.push(&text[start..]);
    pieces.into_iter().filter(|piece| !piece.is_empty()).collect()
}

fn join_trimmed(pieces: &[&str]) -> Option<String> {
    let joined = pieces.concat();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(count: usize) -> String {
        (0..count)
            .map(|i| format!("word{i:04}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let splitter = TextSplitter::default();
        assert_eq!(splitter.split_text("  hello world \n"), vec!["hello world"]);
    }

    #[test]
    fn separators_attach_to_following_piece() {
        assert_eq!(
            split_keeping_separator("a b  c", " "),
            vec!["a", " b", " ", " c"]
        );
        assert_eq!(split_keeping_separator(" lead", " "), vec![" lead"]);
        assert_eq!(split_keeping_separator("né", ""), vec!["n", "é"]);
    }

    #[test]
    fn chunks_respect_size_and_overlap() {
        let splitter = TextSplitter::new(50, 20).expect("valid splitter");
        let text = words(40);
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50, "chunk too long: {chunk:?}");
        }
        for pair in chunks.windows(2) {
            let last_word = pair[0].split(' ').last().expect("non-empty chunk");
            assert!(
                pair[1].contains(last_word),
                "expected overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn prefers_paragraph_boundaries() {
        let splitter = TextSplitter::new(30, 0).expect("valid splitter");
        let text = "first paragraph here\n\nsecond paragraph here";
        assert_eq!(
            splitter.split_text(text),
            vec!["first paragraph here", "second paragraph here"]
        );
    }

    #[test]
    fn unbroken_text_falls_back_to_characters() {
        let splitter = TextSplitter::new(10, 2).expect("valid splitter");
        let chunks = splitter.split_text(&"x".repeat(25));
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(9)]);
    }

    #[test]
    fn chunk_count_is_deterministic() {
        let splitter = TextSplitter::default();
        let pages = vec![
            Page {
                number: 1,
                text: words(600),
            },
            Page {
                number: 2,
                text: words(150),
            },
        ];
        let first = splitter.split_pages(&pages);
        let second = splitter.split_pages(&pages);
        assert_eq!(first, second);
        assert_eq!(first.first().map(|c| c.page), Some(1));
        assert_eq!(first.last().map(|c| c.page), Some(2));
        let indices: Vec<_> = first.iter().map(|c| c.index).collect();
        assert_eq!(indices, (0..first.len()).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_overlap_larger_than_size() {
        assert!(matches!(
            TextSplitter::new(100, 200),
            Err(AppError::Configuration(_))
        ));
    }
}
