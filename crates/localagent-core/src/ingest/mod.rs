//! Knowledge-base ingestion
//!
//! Loads files from the data directory, splits them into overlapping chunks,
//! embeds each batch and writes it to the vector index.

mod chunker;
mod loader;

pub use chunker::{split_documents, split_text, Chunk, TextSpan};
pub use loader::{load_documents, Document};

use crate::config::IngestConfig;
use crate::error::{LocalAgentError, Result};
use crate::llm::Embedder;
use crate::search::VectorIndex;
use serde::Serialize;

/// Summary of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub indexed: usize,
}

/// Run the whole pipeline without progress reporting
pub async fn run(
    config: &IngestConfig,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
) -> Result<IngestReport> {
    run_with_progress(config, embedder, index, |_, _| {}).await
}

/// Run the pipeline, calling `on_batch(done, total)` after each indexed batch.
///
/// An empty data directory is not an error; the report shows zero chunks
/// and the index is left untouched.
pub async fn run_with_progress<F>(
    config: &IngestConfig,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    mut on_batch: F,
) -> Result<IngestReport>
where
    F: FnMut(usize, usize),
{
    let documents = load_documents(&config.data_dir, &config.patterns)?;
    if documents.is_empty() {
        tracing::warn!("No documents found in {}", config.data_dir.display());
        return Ok(IngestReport::default());
    }

    tracing::info!(
        "Chunking {} document(s) (size={}, overlap={})",
        documents.len(),
        config.chunk_size,
        config.chunk_overlap
    );
    let chunks = split_documents(&documents, config.chunk_size, config.chunk_overlap);
    let total = chunks.len();

    let mut report = IngestReport {
        documents: documents.len(),
        chunks: total,
        indexed: 0,
    };
    let mut index_ready = false;

    for batch in chunks.chunks(config.batch_size.max(1)) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await?;
        if vectors.len() != batch.len() {
            return Err(LocalAgentError::Parse(format!(
                "Embedder returned {} vectors for {} chunks",
                vectors.len(),
                batch.len()
            )));
        }

        if !index_ready {
            let dims = vectors.first().map(Vec::len).unwrap_or_default();
            index.ensure_index(dims).await?;
            index_ready = true;
        }

        let documents: Vec<_> = batch
            .iter()
            .cloned()
            .zip(vectors)
            .map(|(chunk, vector)| chunk.into_index_document(vector))
            .collect();
        report.indexed += index.bulk_index(&documents).await?;

        tracing::info!("Ingested {}/{} chunks", report.indexed, total);
        on_batch(report.indexed, total);
    }

    Ok(report)
}
