//! Configuration for document analysis

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Environment variable pointing at a TOML config file
pub const CONFIG_PATH_ENV: &str = "DOC_INSIGHT_CONFIG";

/// Values shipped in example env files that must never be sent as credentials
const PLACEHOLDER_KEYS: &[&str] = &["your_gemini_api_key_here", "your_openai_api_key_here"];

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation backend configuration
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Chunking and relevance selection
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Input file limits
    #[serde(default)]
    pub intake: IntakeConfig,
    /// Compliance analysis settings
    #[serde(default)]
    pub compliance: ComplianceConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Reads `path` if given, otherwise the file named by `DOC_INSIGHT_CONFIG`,
    /// otherwise `<config dir>/doc-insight/config.toml` when it exists, and
    /// falls back to defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(|| default_config_path().filter(|p| p.exists()));

        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// Apply overrides from environment-style variables.
    ///
    /// Provider-specific keys only apply to the provider they name, so a
    /// Gemini key is never sent to OpenAI.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("DOC_INSIGHT_PROVIDER") {
            match provider.parse() {
                Ok(provider) => self.generation.provider = provider,
                Err(e) => tracing::warn!("Ignoring DOC_INSIGHT_PROVIDER: {}", e),
            }
        }

        let (key_var, model_var) = match self.generation.provider {
            GenerationProvider::Gemini => ("GEMINI_API_KEY", "GEMINI_MODEL"),
            GenerationProvider::OpenAi => ("OPENAI_API_KEY", "OPENAI_MODEL"),
        };

        if let Some(key) = lookup(key_var) {
            self.generation.api_key = Some(key);
        }
        if let Some(model) = lookup(model_var).filter(|m| !m.trim().is_empty()) {
            self.generation.model_id = Some(model);
        }
    }

    /// Reject values that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.chunk_size_tokens == 0 {
            return Err(Error::config("retrieval.chunk_size_tokens must be positive"));
        }
        if self.generation.max_context_chars == 0 {
            return Err(Error::config("generation.max_context_chars must be positive"));
        }
        if self.generation.api_key().is_none() {
            tracing::warn!(
                "No API key configured for {:?}; generation requests will fail",
                self.generation.provider
            );
        }
        Ok(())
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("doc-insight").join("config.toml"))
}

/// Hosted model provider
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    /// Google Gemini (Generative Language API)
    #[default]
    Gemini,
    /// OpenAI chat completions
    OpenAi,
}

impl GenerationProvider {
    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAi => "gpt-3.5-turbo",
        }
    }

    /// Public API base URL
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl FromStr for GenerationProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("unknown provider '{}' (expected gemini or openai)", other)),
        }
    }
}

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Which hosted model API to call
    #[serde(default)]
    pub provider: GenerationProvider,
    /// Model identifier (provider default when unset)
    #[serde(default)]
    pub model_id: Option<String>,
    /// API credential
    #[serde(default)]
    pub api_key: Option<String>,
    /// Override for the API base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Document text beyond this many characters is cut before whole-document prompts
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

fn default_timeout_secs() -> u64 { 60 }
fn default_max_context_chars() -> usize { 30_000 }

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::default(),
            model_id: None,
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
            max_context_chars: default_max_context_chars(),
        }
    }
}

impl GenerationConfig {
    /// Effective model identifier
    pub fn model_id(&self) -> &str {
        self.model_id
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Effective API base URL, without trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    /// The API key, unless it is missing, blank or a placeholder
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !PLACEHOLDER_KEYS.contains(key))
    }
}

/// Chunking and relevance selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Words per chunk for question answering
    #[serde(default = "default_chunk_size_tokens")]
    pub chunk_size_tokens: usize,
    /// Query words with this many characters or fewer are ignored
    #[serde(default = "default_min_query_token_chars")]
    pub min_query_token_chars: usize,
}

fn default_chunk_size_tokens() -> usize { 2000 }
fn default_min_query_token_chars() -> usize { crate::retrieval::DEFAULT_MIN_TOKEN_CHARS }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size_tokens: default_chunk_size_tokens(),
            min_query_token_chars: default_min_query_token_chars(),
        }
    }
}

/// Input limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Maximum file size in bytes (default: 10MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Minimum characters a file must yield
    #[serde(default = "default_min_extracted_chars")]
    pub min_extracted_chars: usize,
    /// Minimum text length for summary, insight and compliance tasks
    #[serde(default = "default_min_analysis_chars")]
    pub min_analysis_chars: usize,
}

fn default_max_file_size() -> u64 { 10 * 1024 * 1024 }
fn default_min_extracted_chars() -> usize { 20 }
fn default_min_analysis_chars() -> usize { 100 }

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            min_extracted_chars: default_min_extracted_chars(),
            min_analysis_chars: default_min_analysis_chars(),
        }
    }
}

/// Jurisdiction used for compliance analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceConfig {
    /// Jurisdiction name as it should appear in the prompt
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
    /// Legal areas the analysis should focus on
    #[serde(default = "default_focus_areas")]
    pub focus_areas: Vec<String>,
}

fn default_jurisdiction() -> String {
    "Switzerland".to_string()
}

fn default_focus_areas() -> Vec<String> {
    [
        "Data Protection (DSG - Datenschutzgesetz, GDPR compliance in Switzerland)",
        "Employment Law (OR - Obligationenrecht, Labor Law)",
        "Contract Law (Swiss Code of Obligations)",
        "Consumer Protection (Konsumentenschutzgesetz)",
        "Corporate Law (OR, Aktiengesetz)",
        "Financial Regulations (FINMA regulations)",
        "Privacy and Data Security",
        "Anti-discrimination laws",
        "Environmental regulations (Umweltschutzgesetz)",
        "Tax compliance (Swiss tax law)",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            jurisdiction: default_jurisdiction(),
            focus_areas: default_focus_areas(),
        }
    }
}
