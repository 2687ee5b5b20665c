//! Move prediction service
//!
//! Line protocol parsing, the request loop that answers the game client,
//! startup diagnostics and service configuration.

pub mod cli;
pub mod config;
pub mod protocol;
pub mod report;
pub mod request_loop;

pub use cli::Cli;
pub use config::{ConfigError, DatasetSection, ServiceConfig};
pub use protocol::{Command, PredictRequest, RequestParseError};
pub use request_loop::{LoopState, LoopStats, RequestError, RequestLoop};
