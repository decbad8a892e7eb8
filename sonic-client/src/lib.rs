//! Sonic object storage client
//!
//! A small HTTP client for S3-compatible object storage, used to persist
//! audit logs. Requests are path-style (`{endpoint}/{bucket}/{key}`) and
//! unsigned, so the endpoint must accept anonymous writes (a gateway, a
//! pre-authorised proxy, or a bucket policy that allows them).
//!
//! # Example
//!
//! ```no_run
//! use sonic_client::{HttpObjectStorage, ObjectStorage};
//!
//! #[tokio::main]
//! async fn main() -> sonic_client::Result<()> {
//!     let storage = HttpObjectStorage::new("http://localhost:9000");
//!     storage
//!         .put_object("audit", "logs/app-build-20240309-140507.json", b"{}".to_vec())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod error;
mod listing;

pub use error::{ClientError, Result};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Default endpoint for AWS S3
pub const DEFAULT_ENDPOINT: &str = "https://s3.amazonaws.com";

/// Object storage operations needed by the audit store
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Uploads an object, replacing any existing object with the same key
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;

    /// Downloads an object
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Lists every key starting with `prefix`
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;
}

/// HTTP implementation of ObjectStorage
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    /// Base URL of the storage service (e.g., "https://s3.amazonaws.com")
    endpoint: String,
    /// HTTP client instance
    client: Client,
}

impl HttpObjectStorage {
    /// Create a new client for the given endpoint
    ///
    /// # Example
    /// ```
    /// use sonic_client::HttpObjectStorage;
    ///
    /// let storage = HttpObjectStorage::new("http://localhost:9000/");
    /// assert_eq!(storage.endpoint(), "http://localhost:9000");
    /// ```
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint,
            bucket,
            key.trim_start_matches('/')
        )
    }

    fn bucket_url(&self, bucket: &str) -> String {
        format!("{}/{}", self.endpoint, bucket)
    }

    /// Check the status code and return an error if the request failed
    async fn check_status(
        &self,
        response: reqwest::Response,
        bucket: &str,
        key: &str,
    ) -> Result<reqwest::Response> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::not_found(bucket, key));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::storage_error(
                bucket,
                key,
                status.as_u16(),
                error_text,
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let url = self.object_url(bucket, key);
        debug!("PUT {} ({} bytes)", url, body.len());

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        self.check_status(response, bucket, key).await?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.object_url(bucket, key);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let response = self.check_status(response, bucket, key).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let url = self.bucket_url(bucket);
        let mut keys = Vec::new();
        let mut token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut query = vec![("list-type", "2".to_string()), ("prefix", prefix.to_string())];
            if let Some(token) = &token {
                query.push(("continuation-token", token.clone()));
            }

            debug!("GET {} prefix={}", url, prefix);
            let response = self.client.get(&url).query(&query).send().await?;
            let body = self
                .check_status(response, bucket, prefix)
                .await?
                .text()
                .await?;

            let page = listing::parse_list_page(&body).map_err(|reason| {
                ClientError::InvalidListing {
                    bucket: bucket.to_string(),
                    reason,
                }
            })?;
            keys.extend(page.keys);

            match page.next_token {
                Some(next) if seen_tokens.insert(next.clone()) => token = Some(next),
                Some(next) => {
                    warn!(
                        "Listing of {} returned continuation token {} twice, stopping",
                        bucket, next
                    );
                    break;
                }
                None => break,
            }
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{
        body_bytes, header, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_trims_trailing_slash() {
        let storage = HttpObjectStorage::new("http://localhost:9000/");
        assert_eq!(storage.endpoint(), "http://localhost:9000");
    }

    #[test]
    fn test_object_url() {
        let storage = HttpObjectStorage::new(DEFAULT_ENDPOINT);
        assert_eq!(
            storage.object_url("audit", "logs/app-build-20240309-140507.json"),
            "https://s3.amazonaws.com/audit/logs/app-build-20240309-140507.json"
        );
        assert_eq!(
            storage.object_url("audit", "/app.json"),
            "https://s3.amazonaws.com/audit/app.json"
        );
    }

    #[test]
    fn test_with_custom_client() {
        let storage = HttpObjectStorage::with_client("http://minio:9000", Client::new());
        assert_eq!(storage.bucket_url("audit"), "http://minio:9000/audit");
    }

    fn listing(keys: &[&str], next_token: Option<&str>) -> String {
        let contents: String = keys
            .iter()
            .map(|key| format!("<Contents><Key>{}</Key></Contents>", key))
            .collect();
        let token = next_token
            .map(|t| format!("<NextContinuationToken>{}</NextContinuationToken>", t))
            .unwrap_or_default();

        format!(
            "<ListBucketResult><IsTruncated>{}</IsTruncated>{}{}</ListBucketResult>",
            next_token.is_some(),
            contents,
            token
        )
    }

    #[tokio::test]
    async fn test_put_object_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/audit/logs/app-build-20240309-140507.json"))
            .and(header("content-type", "application/json"))
            .and(body_bytes(b"{\"stage\":\"build\"}".to_vec()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let storage = HttpObjectStorage::new(server.uri());
        storage
            .put_object(
                "audit",
                "logs/app-build-20240309-140507.json",
                b"{\"stage\":\"build\"}".to_vec(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_object_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("AccessDenied"))
            .mount(&server)
            .await;

        let storage = HttpObjectStorage::new(server.uri());
        let err = storage
            .put_object("audit", "a.json", b"{}".to_vec())
            .await
            .unwrap_err();

        match err {
            ClientError::StorageError {
                bucket,
                key,
                status,
                message,
            } => {
                assert_eq!(bucket, "audit");
                assert_eq!(key, "a.json");
                assert_eq!(status, 403);
                assert_eq!(message, "AccessDenied");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/audit/logs/a.json"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{}".to_vec()))
            .mount(&server)
            .await;

        let storage = HttpObjectStorage::new(server.uri());
        assert_eq!(storage.get_object("audit", "logs/a.json").await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("NoSuchKey"))
            .mount(&server)
            .await;

        let storage = HttpObjectStorage::new(server.uri());
        let err = storage.get_object("audit", "logs/a.json").await.unwrap_err();

        assert!(
            matches!(err, ClientError::NotFound { ref bucket, ref key } if bucket == "audit" && key == "logs/a.json")
        );
    }

    #[tokio::test]
    async fn test_list_objects_follows_continuation_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/audit"))
            .and(query_param("list-type", "2"))
            .and(query_param("prefix", "logs/app-"))
            .and(query_param_is_missing("continuation-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(listing(&["logs/app-a.json", "logs/app-b.json"], Some("page-2"))),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/audit"))
            .and(query_param("continuation-token", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(&["logs/app-c.json"], None)))
            .expect(1)
            .mount(&server)
            .await;

        let storage = HttpObjectStorage::new(server.uri());
        let keys = storage.list_objects("audit", "logs/app-").await.unwrap();

        assert_eq!(
            keys,
            vec!["logs/app-a.json", "logs/app-b.json", "logs/app-c.json"]
        );
    }

    #[tokio::test]
    async fn test_list_objects_stops_on_repeated_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/audit"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(listing(&["a.json"], Some("same"))),
            )
            .expect(2)
            .mount(&server)
            .await;

        let storage = HttpObjectStorage::new(server.uri());
        let keys = storage.list_objects("audit", "").await.unwrap();

        assert_eq!(keys, vec!["a.json", "a.json"]);
    }

    #[tokio::test]
    async fn test_list_objects_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ListBucketResult><Key>a</Name>"))
            .mount(&server)
            .await;

        let storage = HttpObjectStorage::new(server.uri());
        let err = storage.list_objects("audit", "").await.unwrap_err();

        assert!(matches!(err, ClientError::InvalidListing { .. }));
    }
}
