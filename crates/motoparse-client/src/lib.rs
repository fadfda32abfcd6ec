pub mod client;
pub mod error;
pub mod orchestrator;
pub mod service;

pub use client::ParseClient;
pub use error::{ClientError, SubmitError};
pub use orchestrator::{ParseState, ParsingOrchestrator};
pub use service::ParseService;
