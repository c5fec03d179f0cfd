pub mod config;
pub mod convert;
pub mod core;
pub mod domain;
pub mod extract;
pub mod parse;
pub mod server;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::service_config::ServiceConfig;
pub use config::CliConfig;

pub use convert::{RemoteConverter, TextConverter};
pub use core::engine::{IngestEngine, IngestReport};
pub use core::pipeline::IngestPipeline;
pub use utils::error::{IngestError, Result};
