pub mod agent;
pub mod coordinator;
pub mod decode;
pub mod passes;
pub mod report;
pub mod synthesis;

pub use agent::{AgentName, AnalysisAgent, AnalysisResult};
pub use coordinator::AnalysisCoordinator;
pub use decode::decode_structured;
pub use passes::{CoachingPass, ObjectionPass, StructurePass};
pub use report::{AgentInsight, ObjectionRecord, Report};
pub use synthesis::SynthesisPass;
