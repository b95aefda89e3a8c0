//! Card extraction through a vision-capable chat model
//!
//! - `VisionApiClient` sends one schema-constrained chat completion per card
//!   to an OpenAI-compatible endpoint and checks the completion
//! - `VisionProvider` picks the backend from `VisionConfig` and degrades to
//!   "unavailable" when it cannot be built
//! - `CardExtractor` is the seam the request pipeline depends on
//!
//! Provider failures are mapped onto `CardError` variants by `classify`.

mod api;
pub mod classify;
pub mod prompts;
mod provider;

pub use api::VisionApiClient;
pub use provider::{CardExtractor, ExtractorInfo, VisionProvider};
