use anyhow::Result;
use std::env;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// Which backend the data service routes to by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Api,
    Mock,
    Hybrid,
}

impl DataMode {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mock" => Self::Mock,
            "hybrid" => Self::Hybrid,
            _ => Self::Api,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Mock => "mock",
            Self::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,

    // API
    pub api_base_url: String,
    pub http_timeout_seconds: u64,

    // Data service
    pub data_mode: DataMode,
    pub fallback_to_mock: bool,

    // Auth
    pub token_expiry_buffer_seconds: i64,

    // Local persistence (session file, favorites)
    pub storage_dir: PathBuf,

    // Listing pagination
    pub page_size: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));

        let api_base_url = parse_base_url(
            &env::var("MILLION_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
        )?;
        let http_timeout_seconds = env::var("MILLION_HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let data_mode =
            DataMode::from_str(&env::var("MILLION_DATA_MODE").unwrap_or_else(|_| "api".to_string()));
        let fallback_to_mock = env::var("MILLION_FALLBACK_TO_MOCK")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        // Refresh ahead of the recorded expiry instant by this margin.
        let token_expiry_buffer_seconds = env::var("MILLION_TOKEN_EXPIRY_BUFFER_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300); // 5 minutes

        let storage_dir = env::var("MILLION_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                env::var("HOME")
                    .map(|h| PathBuf::from(h).join(".million"))
                    .unwrap_or_else(|_| PathBuf::from(".million"))
            });

        let page_size = env::var("MILLION_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(12);

        Ok(Settings {
            env,
            api_base_url,
            http_timeout_seconds,
            data_mode,
            fallback_to_mock,
            token_expiry_buffer_seconds,
            storage_dir,
            page_size,
        })
    }
}

/// Rejects unparseable base URLs up front instead of on the first request,
/// and normalizes away a trailing slash.
fn parse_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|e| anyhow::anyhow!("invalid API base URL {:?}: {}", raw, e))?;
    Ok(url.to_string().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_must_parse() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("/api/only/a/path").is_err());
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(
            parse_base_url("http://localhost:5000/api").unwrap(),
            "http://localhost:5000/api"
        );
        assert_eq!(
            parse_base_url("https://api.example.com/").unwrap(),
            "https://api.example.com"
        );
    }
}
