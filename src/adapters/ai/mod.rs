//! AI Provider Adapters (C7).
//!
//! Implementations of the `AIProvider` port:
//!
//! - `AnthropicProvider` — production adapter against Anthropic's Messages API.
//! - `MockAIProvider` — configurable test double.

mod anthropic_provider;
mod mock_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
