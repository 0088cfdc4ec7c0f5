pub mod metadata;
pub mod normalizer;
pub mod text;

pub use normalizer::clean;
pub use text::{DEFAULT_CONTENT_SELECTORS, extract_text};
