//! Chat completion: provider clients, wire types, and the model → provider router.

mod error;
mod provider;
mod router;
mod wire;

pub use error::{ChatError, ProviderError};
pub use provider::{ChatProvider, OpenAiCompatibleClient};
pub use router::ChatRouter;

#[cfg(test)]
pub(crate) use router::tests::FakeProvider;
