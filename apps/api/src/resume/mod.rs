// Resume ingestion: upload handling and the extraction → recognition → profile pipeline.
// The blocking PDF parse runs inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod pipeline;

pub use pipeline::ResumeParser;
