//! The four-stage crew pipeline.

use std::path::Path;

use crate::config::PipelineConfig;
use crate::document::{clip_chars, read_financial_document};
use crate::error::{LlmError, PipelineError};
use crate::findings::{investment_notes, risk_notes};
use crate::llm::LlmClient;
use crate::rate_limit::RateLimiter;
use crate::stages::{Stage, StageInput, Verdict, ANALYZE, ASSESS_RISK, ORDER, RECOMMEND, VERIFY};
use crate::AnalysisPipeline;

/// Runs verify → analyze → recommend → assess risk, each stage seeing the
/// previous stage's output. A rejected verification stops the run.
pub struct CrewPipeline {
    client: LlmClient,
    limiter: RateLimiter,
    max_document_chars: usize,
}

impl CrewPipeline {
    /// Build the pipeline from explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the LLM HTTP client cannot be built.
    pub fn new(config: &PipelineConfig) -> Result<Self, LlmError> {
        let client = LlmClient::new(&config.llm)?;
        tracing::info!(
            model = client.model(),
            max_rpm = config.max_rpm,
            "Crew pipeline configured",
        );
        Ok(Self {
            client,
            limiter: RateLimiter::per_minute(config.max_rpm),
            max_document_chars: config.max_document_chars,
        })
    }

    /// Run all stages over already-extracted document text.
    pub async fn analyze_text(&self, query: &str, document: &str) -> Result<String, PipelineError> {
        let document = clip_chars(document, self.max_document_chars);

        let verification = self
            .run_stage(
                &VERIFY,
                query,
                StageInput {
                    document: Some(document),
                    ..Default::default()
                },
            )
            .await?;
        if let Verdict::Rejected(reason) = Verdict::parse(&verification) {
            tracing::info!(reason = %reason, "Document rejected by verifier");
            return Err(PipelineError::NotFinancialDocument(reason));
        }

        let analysis = self
            .run_stage(
                &ANALYZE,
                query,
                StageInput {
                    document: Some(document),
                    context: Some(&verification),
                    notes: None,
                },
            )
            .await?;

        let investment = investment_notes(document);
        let recommendation = self
            .run_stage(
                &RECOMMEND,
                query,
                StageInput {
                    document: Some(document),
                    context: Some(&analysis),
                    notes: Some(&investment),
                },
            )
            .await?;

        let risk = risk_notes(document);
        let assessment = self
            .run_stage(
                &ASSESS_RISK,
                query,
                StageInput {
                    document: Some(document),
                    context: Some(&recommendation),
                    notes: Some(&risk),
                },
            )
            .await?;

        Ok(render_report(&[verification, analysis, recommendation, assessment]))
    }

    async fn run_stage(
        &self,
        stage: &Stage,
        query: &str,
        input: StageInput<'_>,
    ) -> Result<String, PipelineError> {
        self.limiter.acquire().await;
        tracing::debug!(stage = stage.name, "Running pipeline stage");

        let output = self
            .client
            .complete(stage.messages(query, &input))
            .await
            .map_err(|source| PipelineError::Stage {
                stage: stage.name,
                source,
            })?;

        tracing::debug!(stage = stage.name, chars = output.len(), "Pipeline stage finished");
        Ok(output.trim().to_string())
    }
}

#[async_trait::async_trait]
impl AnalysisPipeline for CrewPipeline {
    async fn run(&self, query: &str, file_path: &Path) -> Result<String, PipelineError> {
        let document = read_financial_document(file_path).await?;
        self.analyze_text(query, &document).await
    }
}

/// One `## <title>` section per stage output, in [`ORDER`].
fn render_report(outputs: &[String; ORDER.len()]) -> String {
    ORDER
        .iter()
        .zip(outputs)
        .map(|(stage, body)| format!("## {}\n\n{}", stage.title, body))
        .collect::<Vec<_>>()
        .join("\n\n")
}
