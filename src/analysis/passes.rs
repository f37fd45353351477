//! The three independent analysis passes. Each carries its own system prompt
//! and JSON response schema; they share no state and can run concurrently.

use super::agent::{render_prior, AgentName, AnalysisAgent, AnalysisResult};

/// Extracts call phases, speaker roles, pain points, questions, and topics.
pub struct StructurePass;

#[async_trait::async_trait]
impl AnalysisAgent for StructurePass {
    fn name(&self) -> AgentName {
        AgentName::TranscriptStructure
    }

    fn system_prompt(&self) -> &'static str {
        "You are an expert sales call analyst. Your role is to:\n\
         1. Analyze the structure and flow of sales conversations\n\
         2. Identify speaker roles (sales rep vs. customer)\n\
         3. Extract key information: customer pain points, questions asked, topics discussed\n\
         4. Identify the call phase (intro, discovery, presentation, objection handling, close)\n\
         5. Note conversation dynamics and rapport building\n\
         Provide structured, objective analysis focusing on factual observations."
    }

    fn build_prompt(
        &self,
        transcript_text: &str,
        _context: &str,
        prior: &[AnalysisResult],
    ) -> String {
        format!(
            r#"Analyze this sales call transcript:

{transcript_text}
{prior}
Provide a comprehensive analysis covering:
1. Call structure and phases
2. Speaker identification and roles
3. Key topics and pain points discussed
4. Questions asked by rep and customer
5. Conversation flow and transitions
6. Overall call dynamics

Return your analysis in the following JSON format:
{{
    "call_phases": ["phase1", "phase2", ...],
    "speaker_roles": {{"spk_0": "role", "spk_1": "role"}},
    "customer_pain_points": ["pain1", "pain2", ...],
    "questions_asked_by_rep": ["question1", ...],
    "questions_asked_by_customer": ["question1", ...],
    "key_topics": ["topic1", "topic2", ...],
    "conversation_quality": "assessment",
    "summary": "brief summary"
}}
"#,
            prior = render_prior(prior)
        )
    }
}

/// Scores rep performance and produces per-dimension coaching assessments.
pub struct CoachingPass;

#[async_trait::async_trait]
impl AnalysisAgent for CoachingPass {
    fn name(&self) -> AgentName {
        AgentName::Coaching
    }

    fn system_prompt(&self) -> &'static str {
        "You are an expert sales coach with 20+ years of experience. Your role is to:\n\
         1. Evaluate sales rep performance across key dimensions\n\
         2. Identify what the rep did well (strengths)\n\
         3. Identify areas for improvement (weaknesses)\n\
         4. Assess discovery skills, product presentation, and closing techniques\n\
         5. Score the rep's performance (1-10 scale)\n\
         6. Provide specific, actionable coaching recommendations\n\
         Be constructive, specific, and data-driven in your feedback."
    }

    fn build_prompt(
        &self,
        transcript_text: &str,
        context: &str,
        prior: &[AnalysisResult],
    ) -> String {
        format!(
            r#"Evaluate the sales rep's performance in this call:

{transcript_text}

{context}
{prior}
Provide a detailed coaching evaluation covering:
1. Overall performance score (1-10)
2. Strengths: What did the rep do well?
3. Weaknesses: What needs improvement?
4. Discovery skills assessment
5. Product presentation quality
6. Closing effectiveness
7. Rapport and relationship building
8. Specific coaching recommendations

Return your evaluation in JSON format:
{{
    "overall_score": 7.5,
    "strengths": ["strength1", "strength2", ...],
    "weaknesses": ["weakness1", "weakness2", ...],
    "discovery_assessment": "detailed assessment",
    "presentation_quality": "assessment",
    "closing_effectiveness": "assessment",
    "rapport_building": "assessment",
    "coaching_recommendations": ["rec1", "rec2", ...],
    "top_priority_improvement": "specific area"
}}
"#,
            prior = render_prior(prior)
        )
    }
}

/// Detects objections, classifies them, and rates how they were handled.
/// The only pass that consumes retrieved knowledge-base context.
pub struct ObjectionPass;

#[async_trait::async_trait]
impl AnalysisAgent for ObjectionPass {
    fn name(&self) -> AgentName {
        AgentName::Objection
    }

    fn uses_knowledge(&self) -> bool {
        true
    }

    fn system_prompt(&self) -> &'static str {
        "You are an expert in sales objection handling. Your role is to:\n\
         1. Detect all customer objections (explicit and implicit)\n\
         2. Classify objection types (price, timing, authority, need, competition, etc.)\n\
         3. Evaluate how the rep handled each objection\n\
         4. Identify missed opportunities to address concerns\n\
         5. Suggest better objection handling strategies\n\
         6. Reference proven objection handling frameworks\n\
         Be thorough in identifying subtle objections and resistance."
    }

    fn build_prompt(
        &self,
        transcript_text: &str,
        context: &str,
        prior: &[AnalysisResult],
    ) -> String {
        format!(
            r#"Analyze objection handling in this sales call:

{transcript_text}

## Sales Coaching Knowledge:
{context}
{prior}
Identify and analyze:
1. All customer objections (explicit and implicit)
2. Objection classification
3. How each objection was handled
4. Effectiveness rating for each response
5. Missed opportunities to address concerns
6. Recommended improvements using proven frameworks

Return your analysis in JSON format:
{{
    "objections_detected": [
        {{
            "objection": "text of objection",
            "type": "price|timing|authority|need|competition|other",
            "severity": "low|medium|high",
            "how_handled": "rep's response",
            "effectiveness_score": 6,
            "missed_opportunity": "what could have been done better",
            "recommended_approach": "specific suggestion"
        }}
    ],
    "overall_objection_handling_score": 7.0,
    "unaddressed_concerns": ["concern1", ...],
    "key_improvements": ["improvement1", ...],
    "framework_recommendations": ["framework1", ...]
}}
"#,
            prior = render_prior(prior)
        )
    }
}
