//! Final synthesis pass: merges the partial pass results into the report the
//! caller sees. Works entirely off the structured fields of the prior passes,
//! not the raw transcript.

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info};

use super::agent::{AgentName, AnalysisResult};
use super::report::{AgentInsight, ObjectionRecord, Report};
use crate::llm::{LanguageModel, LlmError};

/// Presentation cap for the prioritized top-N lists.
const TOP_N: usize = 5;

/// Raw pass output kept on each insight is truncated to this many characters.
const INSIGHT_MAX_CHARS: usize = 500;

pub struct SynthesisPass;

impl SynthesisPass {
    const SYSTEM_PROMPT: &'static str =
        "You are a senior sales director who synthesizes insights from multiple specialists. Your role is to:\n\
         1. Review analyses from all specialist agents\n\
         2. Synthesize findings into a coherent narrative\n\
         3. Prioritize the most impactful insights\n\
         4. Create actionable recommendations\n\
         5. Produce an executive summary\n\
         6. Assign an overall performance score\n\
         Be concise, prioritize action items, and focus on high-impact improvements.";

    /// Merge all pass results into the final report.
    ///
    /// An unparsable synthesis response degrades to a report built from the
    /// raw text with neutral defaults; it never fails the job.
    pub async fn synthesize(
        &self,
        llm: &dyn LanguageModel,
        job_id: &str,
        results: &[AnalysisResult],
    ) -> Result<Report, LlmError> {
        let compiled: Vec<String> = results
            .iter()
            .map(|result| format!("## {}\n{}", result.agent, result.fields_json()))
            .collect();

        let prompt = format!(
            r#"Review these specialist analyses of a sales call:

{}

Synthesize a final sales improvement report with:
1. Executive summary (2-3 sentences)
2. Overall performance score (1-10)
3. Top 5 strengths
4. Top 5 weaknesses
5. Top 5 missed opportunities
6. Top 5 recommended actions (prioritized)

Return in JSON format:
{{
    "executive_summary": "concise summary",
    "overall_score": 7.5,
    "top_strengths": ["strength1", ...],
    "top_weaknesses": ["weakness1", ...],
    "missed_opportunities": ["opp1", ...],
    "recommended_actions": ["action1", ...]
}}
"#,
            compiled.join("\n\n")
        );

        info!("{}: synthesizing final report", AgentName::Synthesis);

        let response = llm.complete(Self::SYSTEM_PROMPT, &prompt).await?;
        let synthesis = AnalysisResult::from_response(AgentName::Synthesis, response);

        if synthesis.str_field("executive_summary").is_none() {
            error!("{}: unstructured synthesis response, building degraded report", AgentName::Synthesis);
        }

        Ok(build_report(job_id, &synthesis, results))
    }
}

fn build_report(job_id: &str, synthesis: &AnalysisResult, results: &[AnalysisResult]) -> Report {
    let call_summary = synthesis
        .str_field("executive_summary")
        .map(str::to_string)
        .unwrap_or_else(|| truncate(&synthesis.raw_response, 300));

    Report {
        job_id: job_id.to_string(),
        call_summary,
        overall_score: synthesis.f64_field("overall_score").unwrap_or(5.0),
        strengths: capped(synthesis.list_field("top_strengths")),
        weaknesses: capped(synthesis.list_field("top_weaknesses")),
        missed_opportunities: capped(synthesis.list_field("missed_opportunities")),
        objections_detected: extract_objections(results),
        recommended_actions: capped(synthesis.list_field("recommended_actions")),
        agent_insights: results.iter().map(insight_from).collect(),
        generated_at: Utc::now(),
    }
}

/// Objection records come from the objection pass's structured output; absent
/// or unstructured output yields an empty list.
fn extract_objections(results: &[AnalysisResult]) -> Vec<ObjectionRecord> {
    results
        .iter()
        .filter(|result| result.agent == AgentName::Objection)
        .flat_map(|result| {
            result
                .fields
                .get("objections_detected")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        })
        .map(|entry| ObjectionRecord {
            objection: str_of(&entry, "objection"),
            category: str_of(&entry, "type"),
            handling: str_of(&entry, "how_handled"),
        })
        .collect()
}

fn insight_from(result: &AnalysisResult) -> AgentInsight {
    let mut key_points = Vec::new();

    if let Some(summary) = result.str_field("summary") {
        key_points.push(summary.to_string());
    }
    key_points.extend(result.list_field("key_improvements").into_iter().take(3));
    key_points.truncate(TOP_N);

    AgentInsight {
        agent_name: result.agent.to_string(),
        analysis: truncate(&result.raw_response, INSIGHT_MAX_CHARS),
        key_points,
        score: result
            .f64_field("overall_score")
            .or_else(|| result.f64_field("overall_objection_handling_score")),
    }
}

fn capped(mut list: Vec<String>) -> Vec<String> {
    list.truncate(TOP_N);
    list
}

fn str_of(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
