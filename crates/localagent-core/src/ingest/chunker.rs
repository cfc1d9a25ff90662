//! Document chunking for embedding

use super::Document;
use crate::search::IndexDocument;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Break points tried in order, from paragraph down to word
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

/// A piece of a document ready to be embedded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub source: String,
    /// Ordinal across the whole ingestion run
    pub chunk_index: usize,
    /// Character offset of the chunk within its document
    pub start_index: usize,
    /// RFC 3339 timestamp
    pub ingested_at: String,
}

impl Chunk {
    pub fn metadata(&self) -> Value {
        json!({
            "source": self.source,
            "chunk_index": self.chunk_index,
            "start_index": self.start_index,
            "ingested_at": self.ingested_at,
        })
    }

    pub fn into_index_document(self, vector: Vec<f32>) -> IndexDocument {
        let metadata = self.metadata();
        IndexDocument {
            id: self.id,
            text: self.text,
            vector,
            metadata,
        }
    }
}

/// A span of text and its character offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub start: usize,
}

/// Split every document, numbering chunks across the whole set
pub fn split_documents(documents: &[Document], chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let ingested_at = chrono::Utc::now().to_rfc3339();
    let mut chunks = Vec::new();

    for document in documents {
        for span in split_text(&document.text, chunk_size, overlap) {
            chunks.push(Chunk {
                id: chunk_id(&document.source, span.start, &span.text),
                text: span.text,
                source: document.source.clone(),
                chunk_index: chunks.len(),
                start_index: span.start,
                ingested_at: ingested_at.clone(),
            });
        }
    }

    chunks
}

/// Split text into spans of at most `chunk_size` characters, sharing about
/// `overlap` characters between neighbours.
///
/// Each cut is moved back to the last paragraph, line, sentence or word
/// break in the final 30% of the window when one exists. Spans are trimmed
/// and whitespace-only spans dropped.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<TextSpan> {
    let chunk_size = chunk_size.max(1);
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = offsets.len() - 1;

    let mut spans = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + chunk_size).min(total);
        let mut cut = end;

        if end < total {
            let search_from = start + chunk_size * 70 / 100;
            if search_from < end {
                let region = &text[offsets[search_from]..offsets[end]];
                if let Some(byte_end) = last_break(region) {
                    cut = search_from + region[..byte_end].chars().count();
                }
            }
        }

        push_trimmed(&mut spans, &text[offsets[start]..offsets[cut]], start);

        if cut >= total {
            break;
        }
        let next = cut.saturating_sub(overlap);
        start = if next > start { next } else { cut };
    }

    spans
}

/// Byte offset just past the highest-priority separator in `region`
fn last_break(region: &str) -> Option<usize> {
    SEPARATORS
        .iter()
        .find_map(|sep| region.rfind(sep).map(|pos| pos + sep.len()))
}

fn push_trimmed(spans: &mut Vec<TextSpan>, raw: &str, start: usize) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    spans.push(TextSpan {
        text: trimmed.to_string(),
        start: start + raw[..leading].chars().count(),
    });
}

/// Stable id so re-ingesting the same file overwrites its chunks
fn chunk_id(source: &str, start: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(start.to_le_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
