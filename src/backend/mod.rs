// Gateway module for the assistant service - follows the Train Station Pattern
// All external access must go through this gateway

mod http;
mod traits;
mod types;

pub use http::HttpBackend;
#[cfg(test)]
pub use traits::MockAssistantBackend;
pub use traits::AssistantBackend;
pub use types::{ChatReply, ChatRequest, HealthReport, KeyInfoReport, KeyPoolReport};
