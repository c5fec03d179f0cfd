use crate::domain::ports::ConfigProvider;
use crate::utils::error::{IngestError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub pipeline: PipelineInfo,
    pub service: Option<ServiceSection>,
    pub converter: Option<ConverterSection>,
    pub extraction: Option<ExtractionSection>,
    pub output: OutputSection,
    pub monitoring: Option<MonitoringSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_mb: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterSection {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSection {
    pub context_window_chars: Option<usize>,
    pub min_year: Option<i32>,
    pub max_year_offset: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub output_path: String,
    pub upload_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IngestError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| IngestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CONVERTER_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        crate::utils::validation::validate_path("output.output_path", &self.output.output_path)?;

        if let Some(upload_path) = &self.output.upload_path {
            crate::utils::validation::validate_path("output.upload_path", upload_path)?;
        }

        if let Some(endpoint) = self.converter.as_ref().and_then(|c| c.endpoint.as_ref()) {
            crate::utils::validation::validate_url("converter.endpoint", endpoint)?;
        }

        if let Some(window) = self.extraction.as_ref().and_then(|e| e.context_window_chars) {
            crate::utils::validation::validate_positive_number(
                "extraction.context_window_chars",
                window,
                1,
            )?;
        }

        if let Some(min_year) = self.extraction.as_ref().and_then(|e| e.min_year) {
            crate::utils::validation::validate_range("extraction.min_year", min_year, 1000, 3000)?;
        }

        Ok(())
    }

    pub fn host(&self) -> &str {
        self.service
            .as_ref()
            .and_then(|s| s.host.as_deref())
            .unwrap_or("0.0.0.0")
    }

    pub fn port(&self) -> u16 {
        self.service.as_ref().and_then(|s| s.port).unwrap_or(8000)
    }

    pub fn upload_path(&self) -> &str {
        self.output
            .upload_path
            .as_deref()
            .unwrap_or("./uploaded_docs")
    }

    pub fn converter_timeout_seconds(&self) -> u64 {
        self.converter
            .as_ref()
            .and_then(|c| c.timeout_seconds)
            .unwrap_or(120)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for ServiceConfig {
    fn converter_endpoint(&self) -> Option<&str> {
        self.converter.as_ref().and_then(|c| c.endpoint.as_deref())
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn context_window_chars(&self) -> usize {
        self.extraction
            .as_ref()
            .and_then(|e| e.context_window_chars)
            .unwrap_or(50)
    }

    fn min_year(&self) -> i32 {
        self.extraction
            .as_ref()
            .and_then(|e| e.min_year)
            .unwrap_or(1800)
    }

    fn max_year_offset(&self) -> i32 {
        self.extraction
            .as_ref()
            .and_then(|e| e.max_year_offset)
            .unwrap_or(10)
    }

    fn max_upload_bytes(&self) -> usize {
        self.service
            .as_ref()
            .and_then(|s| s.max_upload_mb)
            .unwrap_or(25)
            * 1024
            * 1024
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_service_config() {
        let toml_content = r#"
[pipeline]
name = "lex-ingest"
description = "Legal document ingestion"
version = "0.1.0"

[service]
port = 9000

[converter]
endpoint = "https://docling.internal/convert"

[output]
output_path = "./test-output"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "lex-ingest");
        assert_eq!(config.port(), 9000);
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(
            config.converter_endpoint(),
            Some("https://docling.internal/convert")
        );
        assert_eq!(config.context_window_chars(), 50);
        assert_eq!(config.max_upload_bytes(), 25 * 1024 * 1024);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_CONVERTER_ENDPOINT", "https://converter.test");

        let toml_content = r#"
[pipeline]
name = "test"
description = "test"
version = "1.0"

[converter]
endpoint = "${TEST_CONVERTER_ENDPOINT}"

[output]
output_path = "./output"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.converter_endpoint(), Some("https://converter.test"));

        std::env::remove_var("TEST_CONVERTER_ENDPOINT");
    }

    #[test]
    fn test_config_validation_rejects_bad_endpoint() {
        let toml_content = r#"
[pipeline]
name = "test"
description = "test"
version = "1.0"

[converter]
endpoint = "not-a-url"

[output]
output_path = "./output"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_blank_pipeline_name() {
        let toml_content = r#"
[pipeline]
name = "  "
description = "test"
version = "1.0"

[output]
output_path = "./output"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"
description = "File test"
version = "1.0"

[output]
output_path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ServiceConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert!(config.converter_endpoint().is_none());
    }

    #[test]
    fn test_extraction_overrides() {
        let toml_content = r#"
[pipeline]
name = "test"
description = "test"
version = "1.0"

[extraction]
context_window_chars = 80
min_year = 1900

[output]
output_path = "./output"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.context_window_chars(), 80);
        assert_eq!(config.min_year(), 1900);
        assert_eq!(config.max_year_offset(), 10);
    }
}
