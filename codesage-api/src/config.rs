//! Server configuration.
//!
//! Every setting can be passed as a flag or through the environment. A `.env`
//! file in the working directory is loaded by `main` before parsing, so the
//! provider key can live there during development:
//!
//! ```bash
//! OPENROUTER_API_KEY=sk-or-...
//! CODESAGE_MODEL=gpt-4.1-mini
//! CODESAGE_TIMEOUT_SECS=300
//! ```

use clap::Parser;
use codesage::{GeneratorConfig, DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Clone)]
#[command(
    name = "codesage-api",
    about = "Turns uploaded PDFs into exam questions",
    version
)]
pub struct ServiceConfig {
    /// LLM provider API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Chat-completions endpoint
    #[arg(long, env = "CODESAGE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Model identifier sent to the provider
    #[arg(long, env = "CODESAGE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Deadline for the outbound LLM call, in seconds
    #[arg(long, env = "CODESAGE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Directory for request-scoped upload files (created if missing)
    #[arg(long, env = "CODESAGE_TEMP_DIR", default_value = "temp_pdfs")]
    pub temp_dir: PathBuf,

    /// Address to bind
    #[arg(long, env = "CODESAGE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "CODESAGE_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Largest accepted request body, in MiB
    #[arg(long, env = "CODESAGE_MAX_UPLOAD_MB", default_value_t = 50)]
    pub max_upload_mb: usize,

    /// Optional `X-Title` header sent to the provider
    #[arg(long, env = "CODESAGE_APP_TITLE")]
    pub app_title: Option<String>,

    /// Optional `HTTP-Referer` header sent to the provider
    #[arg(long, env = "CODESAGE_APP_REFERER")]
    pub app_referer: Option<String>,
}

impl ServiceConfig {
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new(self.api_key.clone())
            .with_api_url(self.api_url.clone())
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_attribution(self.app_title.clone(), self.app_referer.clone())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(extra: &[&str]) -> ServiceConfig {
        let mut args = vec!["codesage-api", "--api-key", "sk-test"];
        args.extend_from_slice(extra);
        ServiceConfig::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_explicit_flags() {
        let config = parse(&[
            "--model",
            "openai/gpt-4o-mini",
            "--timeout-secs",
            "300",
            "--temp-dir",
            "/tmp/codesage",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--max-upload-mb",
            "5",
        ]);

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.temp_dir, PathBuf::from("/tmp/codesage"));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.max_upload_bytes(), 5 * 1024 * 1024);
    }

    #[test]
    fn test_generator_config_mirrors_flags() {
        let config = parse(&[
            "--api-url",
            "http://localhost:4000/v1/chat/completions",
            "--model",
            "m",
            "--timeout-secs",
            "30",
            "--app-title",
            "CodeSage",
        ]);
        let generator = config.generator_config();

        assert_eq!(generator.api_key, "sk-test");
        assert_eq!(generator.api_url, "http://localhost:4000/v1/chat/completions");
        assert_eq!(generator.model, "m");
        assert_eq!(generator.timeout, Duration::from_secs(30));
        assert_eq!(generator.app_title.as_deref(), Some("CodeSage"));
    }

    #[test]
    fn test_rejects_non_numeric_port() {
        let result =
            ServiceConfig::try_parse_from(["codesage-api", "--api-key", "k", "--port", "http"]);
        assert!(result.is_err());
    }
}
