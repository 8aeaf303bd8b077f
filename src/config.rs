use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Credentials and model selection for the Gemini API
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: String,
    /// Model identifier (default: gemini-2.5-flash)
    pub model_name: String,
    /// REST base URL, without the `/models/...` suffix
    pub api_base: String,
    /// Request timeout in seconds. Unset leaves the HTTP client's default in place.
    #[serde(deserialize_with = "deserialize_optional_duration_secs")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API with credentials
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum accepted request body for image uploads, in bytes (default: 10 MiB)
    pub max_image_bytes: usize,
}

/// Command line arguments for configuration overrides
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "autodiag")]
#[command(version, about = "AutoDiag - Vehicle Diagnostic Assistant API")]
pub struct CommandLineArgs {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Server host (overrides config file)
    #[arg(long, value_name = "HOST")]
    pub server_host: Option<String>,

    /// Server port (overrides config file)
    #[arg(long, value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Gemini model identifier (overrides config file)
    #[arg(long, value_name = "MODEL")]
    pub llm_model: Option<String>,

    /// Gemini API base URL (overrides config file)
    #[arg(long, value_name = "URL")]
    pub llm_api_base: Option<String>,

    /// LLM request timeout (overrides config file, e.g., "30s", "2m")
    #[arg(long, value_name = "DURATION")]
    pub llm_timeout: Option<String>,

    /// Logging level (overrides config file, e.g., "info,autodiag=debug")
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with command line, environment variable, and file support
    ///
    /// Loading order (priority from highest to lowest):
    /// 1. Command line arguments
    /// 2. Environment variables (a `.env` file is read first if present)
    /// 3. Configuration file (config.toml)
    /// 4. Default values
    pub fn load() -> Result<Self, anyhow::Error> {
        let cli_args = CommandLineArgs::parse();
        Self::load_with_args(&cli_args)
    }

    pub fn load_with_args(cli_args: &CommandLineArgs) -> Result<Self, anyhow::Error> {
        let config_path = cli_args.config.clone().or_else(Self::find_config_file);
        let mut config = if let Some(config_path) = config_path {
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };

        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!("Failed to read .env file: {}", e);
        }
        config.apply_env_overrides();

        config.apply_cli_overrides(cli_args);

        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - GOOGLE_API_KEY / APP_LLM_API_KEY: Gemini API key (APP_ wins if both are set)
    /// - APP_LLM_MODEL: Model identifier
    /// - APP_LLM_API_BASE: API base URL
    /// - APP_LLM_TIMEOUT: Request timeout (accepts "30", "30s", "2m")
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8000)
    /// - APP_LOG_LEVEL: Logging level
    /// - APP_CORS_ALLOWED_ORIGINS: Comma separated origin list
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            self.llm.api_key = key;
            tracing::info!("Override llm.api_key from env (GOOGLE_API_KEY)");
        }

        if let Ok(key) = std::env::var("APP_LLM_API_KEY") {
            self.llm.api_key = key;
            tracing::info!("Override llm.api_key from env");
        }

        if let Ok(model) = std::env::var("APP_LLM_MODEL") {
            self.llm.model_name = model;
            tracing::info!("Override llm.model_name from env: {}", self.llm.model_name);
        }

        if let Ok(base) = std::env::var("APP_LLM_API_BASE") {
            self.llm.api_base = base;
            tracing::info!("Override llm.api_base from env: {}", self.llm.api_base);
        }

        if let Ok(timeout) = std::env::var("APP_LLM_TIMEOUT") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.llm.timeout_secs = Some(val);
                    tracing::info!("Override llm.timeout_secs from env: {}", val);
                },
                Err(e) => tracing::warn!("Invalid APP_LLM_TIMEOUT '{}': {}", timeout, e),
            }
        }

        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Ok(origins) = std::env::var("APP_CORS_ALLOWED_ORIGINS") {
            self.cors.allowed_origins = parse_origin_list(&origins);
            tracing::info!("Override cors.allowed_origins from env: {:?}", self.cors.allowed_origins);
        }
    }

    /// Apply command line argument overrides (highest priority)
    fn apply_cli_overrides(&mut self, args: &CommandLineArgs) {
        if let Some(host) = &args.server_host {
            self.server.host = host.clone();
            tracing::info!("Override server.host from CLI: {}", self.server.host);
        }

        if let Some(port) = args.server_port {
            self.server.port = port;
            tracing::info!("Override server.port from CLI: {}", self.server.port);
        }

        if let Some(model) = &args.llm_model {
            self.llm.model_name = model.clone();
            tracing::info!("Override llm.model_name from CLI: {}", self.llm.model_name);
        }

        if let Some(base) = &args.llm_api_base {
            self.llm.api_base = base.clone();
            tracing::info!("Override llm.api_base from CLI: {}", self.llm.api_base);
        }

        if let Some(timeout) = &args.llm_timeout {
            match parse_duration_to_secs(timeout) {
                Ok(val) => {
                    self.llm.timeout_secs = Some(val);
                    tracing::info!("Override llm.timeout_secs from CLI: {}", val);
                },
                Err(e) => tracing::warn!("Invalid --llm-timeout '{}': {}", timeout, e),
            }
        }

        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
            tracing::info!("Override logging.level from CLI: {}", self.logging.level);
        }
    }

    /// Warn about settings that are accepted but leave the service degraded
    ///
    /// Call once the global subscriber is installed. A missing key only warns
    /// so that `/health` keeps serving.
    pub fn log_startup_warnings(&self) {
        if self.llm.api_key.trim().is_empty() {
            tracing::warn!("LLM API key is not set; diagnostic requests will fail");
            tracing::warn!("Set GOOGLE_API_KEY or llm.api_key in config.toml");
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.llm.model_name.trim().is_empty() {
            anyhow::bail!("llm.model_name cannot be empty");
        }

        if self.llm.api_base.trim().is_empty() {
            anyhow::bail!("llm.api_base cannot be empty");
        }

        if self.llm.timeout_secs == Some(0) {
            anyhow::bail!("llm.timeout_secs must be > 0 when set");
        }

        if self.upload.max_image_bytes == 0 {
            anyhow::bail!("upload.max_image_bytes must be > 0");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths = ["conf/config.toml", "config.toml"];

        possible_paths
            .iter()
            .find(|path| Path::new(path).exists())
            .map(|path| path.to_string())
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, anyhow::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000 }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model_name: "gemini-2.5-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: None,
        }
    }
}

// Keep the key out of logs
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "****" })
            .field("model_name", &self.model_name)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,autodiag=debug".to_string(), file: None }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost".to_string(),
                "http://localhost:8001".to_string(),
                "http://127.0.0.1:8001".to_string(),
            ],
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_image_bytes: 10 * 1024 * 1024 }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.trim().parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    let multiplier: u64 = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hour" | "hours" => 60 * 60,
        _ => return Err(format!("unsupported unit: {}", unit)),
    };
    n.checked_mul(multiplier).ok_or_else(|| "duration is too large".to_string())
}

fn parse_origin_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// Accepts a number of seconds or a human-friendly string like "30s"
fn deserialize_optional_duration_secs<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = Option<u64>;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '2m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(Some(v as u64)) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map(Some).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}
