pub mod cloudflare;
pub mod extract;
pub mod flowith;
pub mod minimax;
pub mod oivscode;
pub mod registry;
pub mod typefully;
pub mod types;

pub use cloudflare::{CloudflareConfig, CloudflareProvider};
pub use flowith::{FlowithConfig, FlowithProvider};
pub use minimax::{MinimaxConfig, MinimaxProvider};
pub use oivscode::{OivscodeConfig, OivscodeProvider};
pub use registry::ModelRegistry;
pub use typefully::{TypefullyConfig, TypefullyProvider};
pub use types::{
    ChatCompletionResponse, ChatMessage, Choice, CompletionRequest, NormalizedCompletion,
    Provider, ProviderError, Role, Usage,
};
