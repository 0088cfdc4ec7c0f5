pub mod charset;
pub mod client;
pub mod errors;
pub mod types;

pub use client::{build_page_client, build_probe_client, fetch};
pub use errors::FetchError;
pub use types::{PageBody, RawPage};
