//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the scoring pipeline and the systems it depends on: the page
//! scraper, the project database and the model-training pipeline.

mod page_source;
mod parameters;
mod storage;

pub use page_source::{FetchError, PageSource};
pub use parameters::ParameterSource;
pub use storage::ProjectStore;
