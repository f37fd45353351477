use std::sync::Arc;

use futures::future::try_join_all;
use tracing::info;

use super::agent::AnalysisAgent;
use super::passes::{CoachingPass, ObjectionPass, StructurePass};
use super::report::Report;
use super::synthesis::SynthesisPass;
use crate::error::PipelineError;
use crate::knowledge::KnowledgeBase;
use crate::llm::LanguageModel;
use crate::transcript::Transcript;

/// Query used to pull objection-handling knowledge into the objection pass.
const KNOWLEDGE_QUERY: &str = "handling customer objections price timing competition closing techniques";

/// Runs the configured pass list over one transcript and synthesizes the report.
pub struct AnalysisCoordinator {
    llm: Arc<dyn LanguageModel>,
    knowledge: Arc<KnowledgeBase>,
    passes: Vec<Arc<dyn AnalysisAgent>>,
    top_k: usize,
}

impl AnalysisCoordinator {
    pub fn new(llm: Arc<dyn LanguageModel>, knowledge: Arc<KnowledgeBase>, top_k: usize) -> Self {
        Self {
            llm,
            knowledge,
            passes: vec![
                Arc::new(StructurePass),
                Arc::new(CoachingPass),
                Arc::new(ObjectionPass),
            ],
            top_k,
        }
    }

    /// Analyze a reconstructed transcript into a coaching report.
    ///
    /// The specialist passes are mutually independent and run concurrently;
    /// synthesis joins on all of them. An empty transcript is a contract
    /// violation and fails before any pass runs.
    pub async fn analyze_call(
        &self,
        job_id: &str,
        transcript: &Transcript,
    ) -> Result<Report, PipelineError> {
        if transcript.is_empty() {
            return Err(PipelineError::EmptyTranscript);
        }

        info!("Running {} analysis passes for job {}", self.passes.len(), job_id);

        let transcript_text = transcript.as_prompt_text();

        let snippets = self.knowledge.retrieve(KNOWLEDGE_QUERY, self.top_k);
        let knowledge_context = KnowledgeBase::format_for_prompt(&snippets);

        let llm = self.llm.as_ref();
        let text = transcript_text.as_str();
        let results = try_join_all(self.passes.iter().map(|pass| {
            let context = if pass.uses_knowledge() {
                knowledge_context.as_str()
            } else {
                ""
            };
            async move { pass.analyze(llm, text, context, &[]).await }
        }))
        .await?;

        let report = SynthesisPass.synthesize(llm, job_id, &results).await?;

        info!("Report synthesis completed for job {}", job_id);
        Ok(report)
    }
}
