use std::time::Duration;

use shared::{domain::BlogId, protocol::BLOGS_PATH};
use thiserror::Error;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid blog api base url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("blog api base url must use http or https, got '{0}'")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Where the blog API lives and how long a single call may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogApiConfig {
    base_url: Url,
    request_timeout: Duration,
}

impl BlogApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim();
        let mut parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        parsed.set_query(None);
        parsed.set_fragment(None);

        Ok(Self {
            base_url: parsed,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn blogs_url(&self) -> Url {
        self.endpoint(None)
    }

    pub fn blog_url(&self, id: &BlogId) -> Url {
        self.endpoint(Some(id))
    }

    fn endpoint(&self, id: Option<&BlogId>) -> Url {
        let mut url = self.base_url.clone();
        // http(s) urls always have a path to extend
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(BLOGS_PATH);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }
}
