pub mod answer;
pub mod community;
pub mod confidence;
pub mod embedding;
pub mod graph_store;
pub mod llm;

pub use answer::IAnswerGenerator;
pub use community::ICommunityProvider;
pub use confidence::IConfidenceScorer;
pub use embedding::IEmbeddingService;
pub use graph_store::IGraphStore;
pub use llm::{Completion, CompletionRequest, ILlmService, LlmTask};
