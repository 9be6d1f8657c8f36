use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{
    configuration::AnalysisVariant,
    domain::{analysis::AnalysisPrompt, session::Session},
    routes::scraper_route::{render_workbench, Flash},
    services::{self, ChunkAnalyzer, OpenaiClient},
};

#[derive(Deserialize)]
struct AnalyzeForm {
    // The listing form has no query field at all.
    #[serde(default)]
    query: String,
}

/// Claims the session, fans the chunks out, and records the results.
/// Spawned detached so a dropped request future cannot strand the
/// session in `Analyzing`.
async fn analyze_into_session<A>(
    session: web::Data<RwLock<Session>>,
    analyzer: A,
    prompt: AnalysisPrompt,
) -> Flash
where
    A: ChunkAnalyzer + Clone + 'static,
{
    let content = {
        let mut session = session.write().await;
        match session.begin_analysis() {
            Ok(content) => content,
            Err(e) => return Flash::Error(e.to_string()),
        }
    };

    let chunks = services::split_content(&content, services::MAX_CHUNK_CHARS);
    log::info!("Analyzing {} chunks", chunks.len());

    let results = services::analyze_chunks(&analyzer, chunks, &prompt).await;

    let mut session = session.write().await;
    session.complete_analysis(results);
    Flash::Success("Analysis complete!".to_string())
}

#[post("/analyze")]
async fn analyze(
    form: web::Form<AnalyzeForm>,
    session: web::Data<RwLock<Session>>,
    openai_client: web::Data<OpenaiClient>,
    variant: web::Data<AnalysisVariant>,
) -> HttpResponse {
    let variant = *variant.get_ref();

    let prompt = match variant {
        AnalysisVariant::Query => {
            let query = form.query.trim().to_string();
            if query.is_empty() {
                let session = session.read().await;
                return render_workbench(
                    &session,
                    variant,
                    Flash::Error("Please enter a query".to_string()),
                );
            }
            AnalysisPrompt::Query(query)
        }
        AnalysisVariant::Listing => AnalysisPrompt::Listing,
    };

    // Actix drops this request future when the client disconnects; the
    // spawned task carries the analysis through to a terminal phase anyway.
    let task = tokio::spawn(analyze_into_session(
        session.clone(),
        openai_client.get_ref().clone(),
        prompt,
    ));

    let flash = match task.await {
        Ok(flash) => flash,
        Err(e) => {
            log::error!("Analysis task failed: {}", e);
            Flash::Error("Failed to analyze the content. Please try again.".to_string())
        }
    };

    let session = session.read().await;
    render_workbench(&session, variant, flash)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::domain::session::Phase;

    #[derive(Clone)]
    struct GatedAnalyzer {
        gate: Arc<Semaphore>,
    }

    #[async_trait]
    impl ChunkAnalyzer for GatedAnalyzer {
        async fn analyze_chunk(
            &self,
            chunk: &str,
            _prompt: &AnalysisPrompt,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            let _permit = self.gate.acquire().await?;
            Ok(format!("summary: {}", chunk))
        }
    }

    async fn wait_for_phase(session: &RwLock<Session>, phase: Phase) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while session.read().await.phase() != phase {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    fn fetched_session(content: &str) -> web::Data<RwLock<Session>> {
        let mut session = Session::new();
        session.begin_fetch().unwrap();
        session.complete_fetch("http://example.com".to_string(), content.to_string());
        web::Data::new(RwLock::new(session))
    }

    #[tokio::test]
    async fn analysis_outlives_a_dropped_request_future() {
        let session = fetched_session("page text");
        let gate = Arc::new(Semaphore::new(0));

        // Mirrors the handler: the request future merely awaits the
        // spawned analysis.
        let request = tokio::spawn({
            let session = session.clone();
            let analyzer = GatedAnalyzer { gate: gate.clone() };
            async move {
                let task = tokio::spawn(analyze_into_session(
                    session,
                    analyzer,
                    AnalysisPrompt::Query("what is on this page?".to_string()),
                ));
                let _ = task.await;
            }
        });

        wait_for_phase(&session, Phase::Analyzing).await;

        // The client disconnects mid-analysis and the request future is
        // dropped.
        request.abort();
        let _ = request.await;

        gate.add_permits(1);

        wait_for_phase(&session, Phase::Done).await;

        let mut session = session.write().await;
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].display_text(), "summary: page text");
        assert!(session.begin_analysis().is_ok());
    }

    #[tokio::test]
    async fn analysis_without_content_is_refused() {
        let session = web::Data::new(RwLock::new(Session::new()));

        let flash = analyze_into_session(
            session.clone(),
            GatedAnalyzer {
                gate: Arc::new(Semaphore::new(1)),
            },
            AnalysisPrompt::Listing,
        )
        .await;

        assert_eq!(
            flash,
            Flash::Error("Scrape a website before requesting analysis".to_string())
        );
        assert_eq!(session.read().await.phase(), Phase::Idle);
    }
}
