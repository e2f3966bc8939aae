use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub scan_cache: ScanCacheConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Connection settings for the booking REST backend that owns ticket records
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL without trailing slash, e.g. `https://api.example.com`
    pub base_url: String,
    /// Bearer token attached to every backend call (optional)
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ScanCacheConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            backend: BackendConfig::from_env()?,
            scan_cache: ScanCacheConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 64 * 1024; // 64KB, scan payloads are tiny

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl BackendConfig {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("BACKEND_BASE_URL")
            .map_err(|_| "BACKEND_BASE_URL environment variable is required".to_string())?;
        let base_url = normalize_base_url(&base_url)?;

        let api_token = env::var("BACKEND_API_TOKEN").ok().filter(|s| !s.is_empty());

        let request_timeout_secs = env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "BACKEND_TIMEOUT_SECS must be a valid number".to_string())?;

        let connect_timeout_secs = env::var("BACKEND_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CONNECT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "BACKEND_CONNECT_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            api_token,
            request_timeout: Duration::from_secs(request_timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

impl ScanCacheConfig {
    const DEFAULT_CAPACITY: usize = 500;

    pub fn from_env() -> Result<Self, String> {
        let capacity = env::var("SCAN_CACHE_CAPACITY")
            .unwrap_or_else(|_| Self::DEFAULT_CAPACITY.to_string())
            .parse::<usize>()
            .map_err(|_| "SCAN_CACHE_CAPACITY must be a valid number".to_string())?;

        if capacity == 0 {
            return Err("SCAN_CACHE_CAPACITY must be greater than zero".to_string());
        }

        Ok(Self { capacity })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Eventdesk API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Ticket activation and event status API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(format!(
            "BACKEND_BASE_URL must start with http:// or https://, got '{}'",
            raw
        ));
    }
    Ok(trimmed.to_string())
}
