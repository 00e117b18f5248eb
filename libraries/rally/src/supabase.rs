//! Remote gateway backed by a Supabase project: PostgREST for rows, Storage for images.
use postgrest::Postgrest;

use crate::{
    config::RemoteConfig,
    error::{Error, Result},
    record::Record,
    remote::{RemoteGateway, StorageHealth},
};

pub struct SupabaseGateway {
    config: RemoteConfig,
    // only built when the config passes `is_configured`, so header construction can't see junk values
    rest: Option<Postgrest>,
    http: reqwest::Client,
}

impl SupabaseGateway {
    pub fn new(config: RemoteConfig) -> Self {
        let rest = config.is_configured().then(|| rest_client(&config));

        if rest.is_none() {
            log::info!("Supabase is not configured, running in local-only mode");
        }

        Self {
            config,
            rest,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn rest(&self) -> Result<&Postgrest> {
        self.rest.as_ref().ok_or(Error::RemoteUnavailable)
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.config.base_url(),
            self.config.storage_bucket
        )
    }

    fn storage_request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let RemoteConfig {
            supabase_anon_key, ..
        } = &self.config;
        self.http
            .request(method, url)
            .header("apikey", supabase_anon_key)
            .header("Authorization", format!("Bearer {supabase_anon_key}"))
    }
}

impl RemoteGateway for SupabaseGateway {
    fn is_available(&self) -> bool {
        self.rest.is_some()
    }

    async fn fetch_all<R: Record>(&self) -> Result<Vec<R>> {
        let table = R::TABLE;
        let response = self
            .rest()?
            .from(table)
            .select("*")
            .execute()
            .await
            .map_err(|e| Error::request_failed(format!("Fetching {table} failed: {e:?}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::request_failed(format!("Reading {table} failed: {e:?}")))?;

        if !status.is_success() {
            return Err(Error::request_failed(format!(
                "Fetching {table} failed with status {status}: {body}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::request_failed(format!(
                "Failed to parse {table} response: {e}\nResponse body: {body}"
            ))
        })
    }

    async fn upsert_one<R: Record>(&self, record: &R) -> Result<R> {
        let table = R::TABLE;
        let payload = serde_json::to_string(record)?;

        let response = self
            .rest()?
            .from(table)
            .upsert(payload)
            .on_conflict("id")
            .execute()
            .await
            .map_err(|e| Error::request_failed(format!("Saving to {table} failed: {e:?}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::request_failed(format!("Reading {table} failed: {e:?}")))?;

        if !status.is_success() {
            log::error!("Upsert into {table} failed: {status} - {body}");
            return Err(Error::request_failed(format!(
                "Saving to {table} failed with status {status}: {body}"
            )));
        }

        let mut rows: Vec<R> = serde_json::from_str(&body).map_err(|e| {
            Error::request_failed(format!(
                "Failed to parse {table} upsert response: {e}\nResponse body: {body}"
            ))
        })?;

        if rows.is_empty() {
            return Err(Error::request_failed(format!(
                "Saving to {table} returned no rows for {}",
                record.id()
            )));
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete_one<R: Record>(&self, id: &str) -> Result<()> {
        let table = R::TABLE;
        let response = self
            .rest()?
            .from(table)
            .delete()
            .eq("id", id)
            .execute()
            .await
            .map_err(|e| Error::request_failed(format!("Deleting from {table} failed: {e:?}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::request_failed(format!(
                "Deleting {id} from {table} failed with status {status}: {body}"
            )));
        }
        Ok(())
    }

    async fn upload_asset(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        if !self.is_available() {
            return Err(Error::RemoteUnavailable);
        }

        let url = format!(
            "{}/storage/v1/object/{}/{path}",
            self.config.base_url(),
            self.config.storage_bucket
        );

        let response = self
            .storage_request(reqwest::Method::POST, &url)
            .header("content-type", content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() || e.is_request() {
                    log::error!("CORS/Network error during upload of {path}: {e:?}");
                }
                Error::AssetUploadFailed(format!("{e:?}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Upload of {path} failed: {status} - {body}");
            if is_missing_bucket(status.as_u16(), &body) {
                let bucket = &self.config.storage_bucket;
                return Err(Error::StorageMisconfigured(format!(
                    "Bucket missing. Create a bucket named '{bucket}' in Supabase Storage."
                )));
            }
            return Err(Error::AssetUploadFailed(format!(
                "status {status}: {body}"
            )));
        }

        Ok(self.public_url(path))
    }

    async fn check_storage_health(&self) -> StorageHealth {
        if !self.is_available() {
            return StorageHealth::Misconfigured(
                "Remote service is not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY."
                    .to_string(),
            );
        }

        let bucket = &self.config.storage_bucket;
        let url = format!("{}/storage/v1/bucket/{bucket}", self.config.base_url());

        let response = match self
            .storage_request(reqwest::Method::GET, &url)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Storage check failed before a response arrived: {e:?}");
                return StorageHealth::Unreachable(
                    "The request never reached storage. Check the network and the allowed origins in Supabase."
                        .to_string(),
                );
            }
        };

        let status = response.status();
        if status.is_success() {
            return StorageHealth::Ok;
        }

        let body = response.text().await.unwrap_or_default();
        if is_missing_bucket(status.as_u16(), &body) {
            StorageHealth::Misconfigured(format!(
                "Bucket missing. Create a bucket named '{bucket}' in Supabase Storage."
            ))
        } else {
            StorageHealth::Misconfigured(format!("Storage error {status}: {body}"))
        }
    }
}

fn rest_client(config: &RemoteConfig) -> Postgrest {
    let RemoteConfig {
        supabase_anon_key, ..
    } = config;
    Postgrest::new(format!("{}/rest/v1", config.base_url()))
        .insert_header("apikey", supabase_anon_key.clone())
        .insert_header("Authorization", format!("Bearer {supabase_anon_key}"))
}

/// Storage answers a missing bucket with 404, or with 400 and a "Bucket not found" body.
fn is_missing_bucket(status: u16, body: &str) -> bool {
    status == 404 || body.to_lowercase().contains("not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_records::Note;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// A gateway pointed at a plain-http local server, which `new` would refuse.
    fn local_gateway(base_url: &str) -> SupabaseGateway {
        let config = RemoteConfig::new(base_url, "anon");
        SupabaseGateway {
            rest: Some(rest_client(&config)),
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Answers exactly one request with `status` and `body`, then closes.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
                let text = String::from_utf8_lossy(&request).to_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|value| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    #[test]
    fn test_unconfigured_gateway_is_unavailable() {
        let gateway = SupabaseGateway::new(RemoteConfig::default());
        assert!(!gateway.is_available());
    }

    #[test]
    fn test_public_url_layout() {
        let gateway = SupabaseGateway::new(RemoteConfig::new("https://abc.supabase.co/", "anon"));
        assert!(gateway.is_available());
        assert_eq!(
            gateway.public_url("coaches/rick-1.png"),
            "https://abc.supabase.co/storage/v1/object/public/academy-assets/coaches/rick-1.png"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_calls_fail_without_network() {
        let gateway = SupabaseGateway::new(RemoteConfig::default());

        assert!(matches!(
            gateway.fetch_all::<Note>().await,
            Err(Error::RemoteUnavailable)
        ));
        assert!(matches!(
            gateway.upsert_one(&Note::new("a", "1")).await,
            Err(Error::RemoteUnavailable)
        ));
        assert!(matches!(
            gateway.delete_one::<Note>("a").await,
            Err(Error::RemoteUnavailable)
        ));
        assert!(matches!(
            gateway.upload_asset("notes/a.png", vec![1, 2, 3], "image/png").await,
            Err(Error::RemoteUnavailable)
        ));
        assert!(matches!(
            gateway.check_storage_health().await,
            StorageHealth::Misconfigured(_)
        ));
    }

    #[test]
    fn test_missing_bucket_detection() {
        assert!(is_missing_bucket(404, ""));
        assert!(is_missing_bucket(400, r#"{"error":"Bucket not found"}"#));
        assert!(!is_missing_bucket(403, r#"{"error":"new row violates row-level security policy"}"#));
    }

    #[tokio::test]
    async fn test_health_of_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let health = local_gateway(&format!("http://{addr}")).check_storage_health().await;
        assert!(matches!(health, StorageHealth::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_health_of_missing_bucket_is_misconfigured() {
        let base = serve_once("404 Not Found", r#"{"error":"Bucket not found"}"#).await;

        match local_gateway(&base).check_storage_health().await {
            StorageHealth::Misconfigured(message) => {
                assert!(message.contains("Bucket missing"));
                assert!(message.contains("academy-assets"));
            }
            other => panic!("expected Misconfigured, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health_reports_other_storage_errors() {
        let base = serve_once("403 Forbidden", r#"{"error":"permission denied"}"#).await;

        match local_gateway(&base).check_storage_health().await {
            StorageHealth::Misconfigured(message) => {
                assert!(message.contains("403"));
                assert!(message.contains("permission denied"));
            }
            other => panic!("expected Misconfigured, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health_ok_when_bucket_exists() {
        let base = serve_once("200 OK", r#"{"id":"academy-assets"}"#).await;
        assert_eq!(local_gateway(&base).check_storage_health().await, StorageHealth::Ok);
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_request_failed() {
        let base = serve_once("500 Internal Server Error", r#"{"message":"boom"}"#).await;

        match local_gateway(&base).fetch_all::<Note>().await {
            Err(Error::RemoteRequestFailed(diagnostic)) => {
                assert!(diagnostic.contains("500"));
                assert!(diagnostic.contains("boom"));
            }
            other => panic!("expected RemoteRequestFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_unparseable_body_is_request_failed() {
        let base = serve_once("200 OK", "<html>not json</html>").await;

        match local_gateway(&base).fetch_all::<Note>().await {
            Err(Error::RemoteRequestFailed(diagnostic)) => {
                assert!(diagnostic.contains("not json"));
            }
            other => panic!("expected RemoteRequestFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upsert_returns_canonical_row() {
        let base = serve_once("201 Created", r#"[{"id":"a","text":"stored"}]"#).await;

        let stored = local_gateway(&base)
            .upsert_one(&Note::new("a", "sent"))
            .await
            .unwrap();
        assert_eq!(stored, Note::new("a", "stored"));
    }

    #[tokio::test]
    async fn test_upload_into_missing_bucket_is_misconfigured() {
        let base = serve_once("400 Bad Request", r#"{"statusCode":"404","error":"Bucket not found"}"#).await;

        let result = local_gateway(&base)
            .upload_asset("notes/a.png", vec![1, 2, 3], "image/png")
            .await;
        assert!(matches!(result, Err(Error::StorageMisconfigured(_))));
    }

    #[tokio::test]
    async fn test_upload_rejection_is_upload_failure() {
        let base = serve_once("413 Payload Too Large", r#"{"error":"Payload too large"}"#).await;

        match local_gateway(&base)
            .upload_asset("notes/a.png", vec![1, 2, 3], "image/png")
            .await
        {
            Err(Error::AssetUploadFailed(message)) => assert!(message.contains("413")),
            other => panic!("expected AssetUploadFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_success_returns_public_url() {
        let base = serve_once("200 OK", r#"{"Key":"academy-assets/notes/a.png"}"#).await;

        let url = local_gateway(&base)
            .upload_asset("notes/a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(url, format!("{base}/storage/v1/object/public/academy-assets/notes/a.png"));
    }
}
