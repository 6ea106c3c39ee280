//! WebDAV-backed media store.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};

use super::{validate_path, MediaError, MediaStore};

#[derive(Debug, Clone)]
pub struct WebdavConfig {
    /// Base URL of the share, e.g. `https://dav.example.com/media`.
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Base of the URLs handed back to clients. Usually the share exposed
    /// read-only over plain HTTP.
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct WebdavClient {
    http: Client,
    config: WebdavConfig,
}

impl WebdavClient {
    pub fn new(mut config: WebdavConfig) -> Self {
        while config.base_url.ends_with('/') {
            config.base_url.pop();
        }
        while config.public_base_url.ends_with('/') {
            config.public_base_url.pop();
        }
        Self {
            http: Client::new(),
            config,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// MKCOL every parent collection of `path`. An existing collection
    /// answers 405, which is fine.
    async fn ensure_collections(&self, path: &str) -> Result<(), MediaError> {
        let mut prefix = String::new();
        let Some((directories, _file)) = path.rsplit_once('/') else {
            return Ok(());
        };
        for segment in directories.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            let response = self
                .http
                .request(Method::from_bytes(b"MKCOL").map_err(|e| MediaError::upstream("mkcol", e))?, self.url_for(&prefix))
                .basic_auth(&self.config.username, Some(&self.config.password))
                .send()
                .await
                .map_err(|e| MediaError::upstream("mkcol", e))?;
            match response.status() {
                StatusCode::CREATED | StatusCode::METHOD_NOT_ALLOWED => {}
                status => {
                    return Err(MediaError::Upstream(format!(
                        "mkcol {prefix}: unexpected status {status}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStore for WebdavClient {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, MediaError> {
        validate_path(path)?;
        self.ensure_collections(path).await?;
        let response = self
            .http
            .put(self.url_for(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .body(bytes)
            .send()
            .await
            .map_err(|e| MediaError::upstream("put", e))?;
        if !response.status().is_success() {
            return Err(MediaError::Upstream(format!(
                "put {path}: unexpected status {}",
                response.status()
            )));
        }
        tracing::info!(path, "media file uploaded");
        Ok(format!("{}/{}", self.config.public_base_url, path))
    }

    async fn delete(&self, path: &str) -> Result<(), MediaError> {
        validate_path(path)?;
        let response = self
            .http
            .delete(self.url_for(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await
            .map_err(|e| MediaError::upstream("delete", e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(MediaError::Upstream(format!("no such file: {path}")));
        }
        if !response.status().is_success() {
            return Err(MediaError::Upstream(format!(
                "delete {path}: unexpected status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
