pub mod cli;
pub mod service_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "lex-ingest"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Legal document ingestion service: PDF in, structured content and metadata out")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = "0.0.0.0"))]
    pub host: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "8000"))]
    pub port: u16,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./processed_outputs"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./uploaded_docs"))]
    pub upload_path: String,

    #[cfg_attr(
        feature = "cli",
        arg(
            long,
            help = "Docling-compatible PDF converter endpoint; native text extraction when unset"
        )
    )]
    pub converter_endpoint: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, default_value = "120"))]
    pub converter_timeout_seconds: u64,

    #[cfg_attr(feature = "cli", arg(long, default_value = "50"))]
    pub context_window_chars: usize,

    #[cfg_attr(feature = "cli", arg(long, default_value = "1800"))]
    pub min_year: i32,

    #[cfg_attr(feature = "cli", arg(long, default_value = "10"))]
    pub max_year_offset: i32,

    #[cfg_attr(feature = "cli", arg(long, default_value = "25"))]
    pub max_upload_mb: usize,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable system resource monitoring"))]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn converter_endpoint(&self) -> Option<&str> {
        self.converter_endpoint.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn context_window_chars(&self) -> usize {
        self.context_window_chars
    }

    fn min_year(&self) -> i32 {
        self.min_year
    }

    fn max_year_offset(&self) -> i32 {
        self.max_year_offset
    }

    fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_path("upload_path", &self.upload_path)?;
        if let Some(endpoint) = &self.converter_endpoint {
            validation::validate_url("converter_endpoint", endpoint)?;
        }
        validation::validate_positive_number("context_window_chars", self.context_window_chars, 1)?;
        validation::validate_positive_number("max_upload_mb", self.max_upload_mb, 1)?;
        validation::validate_range("min_year", self.min_year, 1000, 3000)?;
        validation::validate_range("max_year_offset", self.max_year_offset, 0, 100)?;
        Ok(())
    }
}
