use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use shared::{
    domain::{BlogId, BlogPost},
    error::ErrorBody,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{BlogApiConfig, ConfigError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("blog api unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error(
        "blog api rejected the request with status {status}: {}",
        .message.as_deref().unwrap_or("no reason given")
    )]
    Rejected { status: u16, message: Option<String> },
    #[error("blog api sent an unreadable body: {0}")]
    MalformedBody(String),
}

impl StoreError {
    /// Text for the user: the server's own reason when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            StoreError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Result of a list fetch. `skipped` counts entries that were not valid posts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogListing {
    pub posts: Vec<BlogPost>,
    pub skipped: usize,
}

impl From<Vec<BlogPost>> for BlogListing {
    fn from(posts: Vec<BlogPost>) -> Self {
        Self { posts, skipped: 0 }
    }
}

/// Remote collection of blog posts the admin screen edits.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn list_blogs(&self) -> Result<BlogListing, StoreError>;
    async fn delete_blog(&self, id: &BlogId) -> Result<(), StoreError>;
    /// Replaces the stored post with `post` in full.
    async fn update_blog(&self, post: &BlogPost) -> Result<(), StoreError>;
}

pub struct HttpBlogStore {
    http: Client,
    config: BlogApiConfig,
}

impl HttpBlogStore {
    pub fn new(config: BlogApiConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &BlogApiConfig {
        &self.config
    }
}

#[async_trait]
impl BlogStore for HttpBlogStore {
    async fn list_blogs(&self) -> Result<BlogListing, StoreError> {
        let res = self
            .http
            .get(self.config.blogs_url())
            .send()
            .await
            .map_err(StoreError::Transport)?;
        let res = ensure_success(res).await?;

        let body = res.bytes().await.map_err(StoreError::Transport)?;
        let raw: Vec<Value> = serde_json::from_slice(&body)
            .map_err(|err| StoreError::MalformedBody(err.to_string()))?;

        let total = raw.len();
        let posts: Vec<BlogPost> = raw
            .into_iter()
            .filter_map(|value| {
                let id = value.get("id").cloned();
                match serde_json::from_value::<BlogPost>(value) {
                    Ok(post) => Some(post),
                    Err(err) => {
                        warn!(?id, error = %err, "skipping blog post that failed validation");
                        None
                    }
                }
            })
            .collect();
        let skipped = total - posts.len();
        debug!(total, skipped, "fetched blog list");
        Ok(BlogListing { posts, skipped })
    }

    async fn delete_blog(&self, id: &BlogId) -> Result<(), StoreError> {
        let res = self
            .http
            .delete(self.config.blog_url(id))
            .send()
            .await
            .map_err(StoreError::Transport)?;
        ensure_success(res).await?;
        Ok(())
    }

    async fn update_blog(&self, post: &BlogPost) -> Result<(), StoreError> {
        let res = self
            .http
            .put(self.config.blog_url(&post.id))
            .json(post)
            .send()
            .await
            .map_err(StoreError::Transport)?;
        ensure_success(res).await?;
        Ok(())
    }
}

async fn ensure_success(res: Response) -> Result<Response, StoreError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    // A missing or non-JSON body still counts as a rejection, just without a reason.
    let message = match res.bytes().await {
        Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.reason().map(str::to_owned)),
        Err(_) => None,
    };
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
