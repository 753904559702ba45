use crate::Result;
use crate::config;
use crate::errors::Error;
use crate::fuel_log::FuelLog;
use crate::logging::*;
use anyhow::bail;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::path::PathBuf;
use std::sync::Arc;


/// Where the fuel log document is read from.
///
/// `Ok(None)` means the document does not exist.
#[async_trait]
pub trait FuelLogSource: Send + Sync {
    async fn fetch(&self) -> std::result::Result<Option<FuelLog>, Error>;

    fn describe(&self) -> String;
}

pub fn from_config() -> Result<Arc<dyn FuelLogSource>> {
    let kind = config::get("FUEL_LOG_SOURCE").unwrap_or_else(|_| "gcs".to_string());
    match kind.as_str() {
        "gcs" => Ok(Arc::new(CloudStorage::from_config())),
        "file" => Ok(Arc::new(LocalFile::from_config())),
        other => bail!("Unknown FUEL_LOG_SOURCE: {}", other),
    }
}

/// Object in a cloud storage bucket, read over the JSON/XML download endpoint.
///
/// Without an access token only public objects can be read. The token is a
/// static bearer token taken from `STORAGE_ACCESS_TOKEN` at startup; it is not
/// refreshed here, so an expiring OAuth token has to be rotated externally
/// and the service restarted.
pub struct CloudStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    object: String,
    access_token: Option<String>,
}

impl CloudStorage {
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            bucket: bucket.into(),
            object: object.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn from_config() -> Self {
        let base_url = config::get("STORAGE_BASE_URL")
            .unwrap_or_else(|_| "https://storage.googleapis.com".to_string());
        let bucket = config::get("BUCKET_NAME").unwrap_or_else(|_| "cloud-run-am4".to_string());
        let object = config::get("FUEL_LOG_FILE").unwrap_or_else(|_| "fuel_log.json".to_string());
        let storage = Self::new(base_url, bucket, object);
        match config::get("STORAGE_ACCESS_TOKEN") {
            Ok(token) => storage.with_access_token(token),
            Err(_) => storage,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            self.object
        )
    }
}

#[async_trait]
impl FuelLogSource for CloudStorage {
    async fn fetch(&self) -> std::result::Result<Option<FuelLog>, Error> {
        let log = DEFAULT.new(o!(
            "function" => "CloudStorage::fetch",
            "bucket" => self.bucket.clone(),
            "object" => self.object.clone(),
        ));
        let mut request = self.client.get(self.url());
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            error!(log, "Fuel stats file not found in the bucket");
            return Ok(None);
        }
        let text = response.error_for_status()?.text().await?;
        let fuel_log = FuelLog::from_json(&text)?;
        debug!(log, "fetched"; "days" => fuel_log.dates().count());
        Ok(Some(fuel_log))
    }

    fn describe(&self) -> String {
        format!("gcs://{}/{}", self.bucket, self.object)
    }
}

/// JSON document on the local filesystem.
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config() -> Self {
        Self::new(config::get("FUEL_LOG_PATH").unwrap_or_else(|_| "fuel_log.json".to_string()))
    }
}

#[async_trait]
impl FuelLogSource for LocalFile {
    async fn fetch(&self) -> std::result::Result<Option<FuelLog>, Error> {
        let log = DEFAULT.new(o!(
            "function" => "LocalFile::fetch",
            "path" => self.path.display().to_string(),
        ));
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                error!(log, "Fuel stats file not found");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Some(FuelLog::from_json(&text)?))
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}
