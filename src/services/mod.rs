pub mod analyzer;
pub mod chunker;
pub mod cleaner;
pub mod exporter;
pub mod openai_client;
pub mod scout;

pub use analyzer::*;
pub use chunker::*;
pub use cleaner::*;
pub use exporter::*;
pub use openai_client::*;
pub use scout::*;
