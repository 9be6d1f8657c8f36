use std::error::Error;

use async_trait::async_trait;

use crate::domain::analysis::{AnalysisPrompt, ChunkAnalysis, ChunkOutcome};

#[async_trait]
pub trait ChunkAnalyzer: Send + Sync {
    async fn analyze_chunk(
        &self,
        chunk: &str,
        prompt: &AnalysisPrompt,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// One task per chunk, one outcome per chunk, back in chunk order. A
/// failed chunk becomes a Failed entry instead of disappearing.
pub async fn analyze_chunks<A>(
    analyzer: &A,
    chunks: Vec<String>,
    prompt: &AnalysisPrompt,
) -> Vec<ChunkAnalysis>
where
    A: ChunkAnalyzer + Clone + 'static,
{
    let total = chunks.len();
    let mut handles = Vec::with_capacity(total);

    for (i, chunk) in chunks.into_iter().enumerate() {
        let index = i + 1;
        let analyzer = analyzer.clone();
        let prompt = prompt.clone();

        let handle = tokio::spawn(async move {
            match analyzer.analyze_chunk(&chunk, &prompt).await {
                Ok(reply) => ChunkAnalysis {
                    index,
                    outcome: ChunkOutcome::Reply(reply),
                },
                Err(e) => {
                    log::error!("Chunk {} analysis failed: {}", index, e);
                    ChunkAnalysis {
                        index,
                        outcome: ChunkOutcome::Failed(e.to_string()),
                    }
                }
            }
        });
        handles.push((index, handle));
    }

    let mut results = Vec::with_capacity(total);
    for (index, handle) in handles {
        let analysis = match handle.await {
            Ok(analysis) => analysis,
            Err(e) => ChunkAnalysis {
                index,
                outcome: ChunkOutcome::Failed(format!("analysis task aborted: {}", e)),
            },
        };
        log::info!("Processing chunk {}/{}", results.len() + 1, total);
        results.push(analysis);
    }

    results.sort_by_key(|analysis| analysis.index);
    results
}
