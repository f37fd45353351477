use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode::decode_structured;
use crate::llm::{LanguageModel, LlmError};

/// The fixed set of analysis passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentName {
    TranscriptStructure,
    Coaching,
    Objection,
    Synthesis,
}

impl AgentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TranscriptStructure => "Transcript Analyzer",
            Self::Coaching => "Sales Coach",
            Self::Objection => "Objection Expert",
            Self::Synthesis => "Supervisor",
        }
    }
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one analysis pass.
///
/// `fields` holds whatever structure the model returned; when the response was
/// unparsable it contains only `raw_analysis`. Readers use the accessors
/// below, which treat absent keys as empty/neutral, never as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub agent: AgentName,

    pub fields: serde_json::Map<String, Value>,

    /// Unparsed model output, retained for audit and fallback
    pub raw_response: String,
}

impl AnalysisResult {
    /// Wrap a model response, degrading to a raw-only field map when the
    /// response is not the JSON object we asked for.
    pub fn from_response(agent: AgentName, response: String) -> Self {
        let fields = match decode_structured(&response) {
            Some(Value::Object(map)) => map,
            _ => {
                tracing::error!("{}: response was not structured, keeping raw text", agent);
                let mut map = serde_json::Map::new();
                map.insert("raw_analysis".to_string(), Value::String(response.clone()));
                map
            }
        };

        Self {
            agent,
            fields,
            raw_response: response,
        }
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn f64_field(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    /// String entries of an array field; absent or non-array keys read as empty.
    pub fn list_field(&self, key: &str) -> Vec<String> {
        self.fields
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Structured fields rendered as pretty JSON for downstream prompts.
    pub fn fields_json(&self) -> String {
        serde_json::to_string_pretty(&self.fields).unwrap_or_else(|_| "{}".to_string())
    }
}

/// One analysis pass: a single model invocation with a deterministic prompt
/// template, producing a structured result.
#[async_trait::async_trait]
pub trait AnalysisAgent: Send + Sync {
    fn name(&self) -> AgentName;

    fn system_prompt(&self) -> &'static str;

    /// Whether this pass wants retrieved knowledge-base context in its prompt.
    fn uses_knowledge(&self) -> bool {
        false
    }

    /// Assemble the user prompt from the transcript, optional retrieved
    /// context, and optional prior pass results.
    fn build_prompt(&self, transcript_text: &str, context: &str, prior: &[AnalysisResult])
        -> String;

    /// Run the pass. Model transport failure propagates; malformed model
    /// output does not - it degrades to a raw-only result.
    async fn analyze(
        &self,
        llm: &dyn LanguageModel,
        transcript_text: &str,
        context: &str,
        prior: &[AnalysisResult],
    ) -> Result<AnalysisResult, LlmError> {
        tracing::info!("{}: starting analysis", self.name());

        let prompt = self.build_prompt(transcript_text, context, prior);
        let response = llm.complete(self.system_prompt(), &prompt).await?;

        Ok(AnalysisResult::from_response(self.name(), response))
    }
}

/// Render prior pass results as a prompt context block; empty input renders empty.
pub(crate) fn render_prior(prior: &[AnalysisResult]) -> String {
    if prior.is_empty() {
        return String::new();
    }

    let mut block = String::from("\n\n## Context from other analysis passes:\n");
    for result in prior {
        block.push_str(&format!("\n### {}:\n{}\n", result.agent, result.fields_json()));
    }
    block
}
