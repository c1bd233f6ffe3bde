//! Google Drive v2 API client
//!
//! Every public operation performs at most one authenticated API call and
//! returns the raw response. A 401 triggers a single token refresh followed
//! by a single retry; downloads additionally recover once from an expired
//! download link (403) when the caller supplies the file id.

use std::fmt;
use std::sync::Arc;

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, StreamingResponse};
use core_auth::{Credentials, RefreshCallback, TokenManager, TokenRefresher};
use core_runtime::config::DriveConfig;
use futures::stream::Stream;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::error::Result;
use crate::pagination::paginate;
use crate::types::FileDownloadInfo;

/// Query selecting everything but folders
const NON_FOLDER_QUERY: &str = "mimeType != 'application/vnd.google-apps.folder'";

const UNAUTHORIZED: u16 = 401;
const FORBIDDEN: u16 = 403;

/// Query parameters of an API call; `None` values are left out of the URL
pub type QueryParams<'a> = &'a [(&'a str, Option<String>)];

/// Google Drive API client
///
/// Holds the OAuth credentials of one account. The access token is replaced
/// in place whenever the API reports it as expired.
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::{Credentials, GoogleDriveClient};
/// use futures::TryStreamExt;
///
/// let client = GoogleDriveClient::new(
///     http_client,
///     Credentials::new(access_token, refresh_token, client_id, client_secret),
/// );
///
/// let response = client.get_file("0B1234").await?;
/// if response.is_success() {
///     let file: serde_json::Value = response.json()?;
/// }
///
/// let files: Vec<serde_json::Value> = client.user_files_stream(None).try_collect().await?;
/// ```
pub struct GoogleDriveClient {
    http_client: Arc<dyn HttpClient>,
    tokens: TokenManager,
    config: DriveConfig,
}

impl GoogleDriveClient {
    /// Create a client against the public Google endpoints
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `credentials` - Access/refresh tokens and OAuth client credentials
    pub fn new(http_client: Arc<dyn HttpClient>, credentials: Credentials) -> Self {
        Self::builder(http_client, credentials).build()
    }

    /// Start building a client with a custom configuration or refresh callback
    pub fn builder(
        http_client: Arc<dyn HttpClient>,
        credentials: Credentials,
    ) -> GoogleDriveClientBuilder {
        GoogleDriveClientBuilder {
            http_client,
            credentials,
            config: DriveConfig::default(),
            refresh_callback: None,
        }
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Current access token
    pub fn access_token(&self) -> Result<String> {
        Ok(self.tokens.access_token()?)
    }

    /// Snapshot of the current credentials, including any refreshed token
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(self.tokens.credentials()?)
    }

    /// Mint a new access token from the refresh token.
    ///
    /// Replaces the stored access token and invokes the refresh callback.
    ///
    /// # Errors
    ///
    /// Fails with [`GoogleDriveError::Auth`](crate::GoogleDriveError::Auth)
    /// when the token endpoint rejects the grant or answers without an
    /// `access_token`; the stored token is then left unchanged.
    pub async fn refresh_token(&self) -> Result<()> {
        self.tokens.refresh().await?;
        Ok(())
    }

    /// Submit a request to the Drive API.
    ///
    /// Builds `{api_base_url}/{path}`, attaches the bearer token and sends
    /// the request. On 401 the token is refreshed and the same request is
    /// sent exactly once more; whatever that retry returns, 401 included, is
    /// handed back. Any other status is returned untouched.
    #[instrument(skip(self, method, params), fields(method = %method))]
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: QueryParams<'_>,
    ) -> Result<HttpResponse> {
        let url = self.config.api_url(path);

        let response = self.send_api(method, &url, params).await?;
        if response.status != UNAUTHORIZED {
            return Ok(response);
        }

        info!("Access token rejected, refreshing before retry");
        self.tokens.refresh().await?;

        let retried = self.send_api(method, &url, params).await?;
        if retried.status == UNAUTHORIZED {
            warn!("Request still unauthorized after token refresh");
        }

        Ok(retried)
    }

    /// Retrieve a file description (`GET files/{file_id}`)
    pub async fn get_file(&self, file_id: &str) -> Result<HttpResponse> {
        let path = format!("files/{}", urlencoding::encode(file_id));
        self.request(HttpMethod::Get, &path, &[]).await
    }

    /// Retrieve one page of the user's non-folder files
    ///
    /// `count` defaults to the configured page size.
    pub async fn get_user_files(
        &self,
        count: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<HttpResponse> {
        let params = [
            ("q", Some(NON_FOLDER_QUERY.to_string())),
            ("maxResults", Some(self.page_size(count).to_string())),
            ("pageToken", page_token.map(str::to_string)),
        ];
        self.request(HttpMethod::Get, "files", &params).await
    }

    /// Lazily iterate over the user's non-folder files, page by page
    ///
    /// Each item is the raw file resource as returned in `items`.
    pub fn user_files_stream(
        &self,
        count: Option<u32>,
    ) -> impl Stream<Item = Result<Value>> + '_ {
        paginate(move |page_token: Option<String>| async move {
            self.get_user_files(count, page_token.as_deref()).await
        })
    }

    /// Retrieve one page of comments attached to a file
    pub async fn get_file_comments(
        &self,
        file_id: &str,
        count: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<HttpResponse> {
        let path = format!("files/{}/comments", urlencoding::encode(file_id));
        let params = [
            ("maxResults", Some(self.page_size(count).to_string())),
            ("pageToken", page_token.map(str::to_string)),
        ];
        self.request(HttpMethod::Get, &path, &params).await
    }

    /// Lazily iterate over the comments of a file, page by page
    pub fn file_comments_stream<'a>(
        &'a self,
        file_id: &'a str,
        count: Option<u32>,
    ) -> impl Stream<Item = Result<Value>> + 'a {
        paginate(move |page_token: Option<String>| async move {
            self.get_file_comments(file_id, count, page_token.as_deref())
                .await
        })
    }

    /// Download file content from `url`, leaving the body as a stream.
    ///
    /// - 401: the token is refreshed and the same URL is tried once more;
    ///   that result is final.
    /// - 403 with `file_id`: the link is treated as expired. A fresh file
    ///   description is fetched and its `downloadUrl` is tried once. If the
    ///   description cannot be retrieved the original 403 is returned and the
    ///   failure is logged.
    #[instrument(skip(self, url))]
    pub async fn download(&self, url: &str, file_id: Option<&str>) -> Result<StreamingResponse> {
        let (response, refreshed) = self.download_with_refresh(url).await?;

        if refreshed || response.status != FORBIDDEN {
            return Ok(response);
        }
        let Some(file_id) = file_id else {
            return Ok(response);
        };

        debug!("Download link rejected, fetching a fresh one");

        let description = self.get_file(file_id).await?;
        if description.status != 200 {
            error!(
                file_id,
                status = description.status,
                response = %String::from_utf8_lossy(&description.body),
                "Could not retrieve file description"
            );
            return Ok(response);
        }

        let fresh_url = match description.json::<FileDownloadInfo>() {
            Ok(FileDownloadInfo {
                download_url: Some(fresh_url),
            }) if !fresh_url.is_empty() => fresh_url,
            _ => {
                error!(file_id, "File description carries no downloadUrl");
                return Ok(response);
            }
        };

        let (retried, _) = self.download_with_refresh(&fresh_url).await?;
        Ok(retried)
    }

    fn page_size(&self, count: Option<u32>) -> u32 {
        count.unwrap_or(self.config.default_page_size)
    }

    fn authorized(&self, method: HttpMethod, url: &str) -> Result<HttpRequest> {
        let token = self.tokens.access_token()?;
        Ok(HttpRequest::new(method, url).bearer_token(token))
    }

    async fn send_api(
        &self,
        method: HttpMethod,
        url: &str,
        params: QueryParams<'_>,
    ) -> Result<HttpResponse> {
        let request = self
            .authorized(method, url)?
            .header("Accept", "application/json")
            .query_pairs(params.iter().map(|(key, value)| (*key, value.clone())))
            .timeout(self.config.request_timeout);

        let response = self.http_client.execute(request).await?;
        debug!(status = response.status, url, "API response");
        Ok(response)
    }

    async fn send_download(&self, url: &str) -> Result<StreamingResponse> {
        let request = self
            .authorized(HttpMethod::Get, url)?
            .timeout(self.config.download_timeout);

        let response = self.http_client.execute_stream(request).await?;
        debug!(status = response.status, "Download response");
        Ok(response)
    }

    /// One download attempt plus a single retry after a token refresh.
    /// The flag reports whether the refresh happened.
    async fn download_with_refresh(&self, url: &str) -> Result<(StreamingResponse, bool)> {
        let response = self.send_download(url).await?;
        if response.status != UNAUTHORIZED {
            return Ok((response, false));
        }

        info!("Access token rejected by download, refreshing before retry");
        self.tokens.refresh().await?;

        let retried = self.send_download(url).await?;
        Ok((retried, true))
    }
}

impl fmt::Debug for GoogleDriveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleDriveClient")
            .field("tokens", &self.tokens)
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`GoogleDriveClient`]
pub struct GoogleDriveClientBuilder {
    http_client: Arc<dyn HttpClient>,
    credentials: Credentials,
    config: DriveConfig,
    refresh_callback: Option<RefreshCallback>,
}

impl GoogleDriveClientBuilder {
    /// Use custom endpoints, page size or timeouts
    pub fn config(mut self, config: DriveConfig) -> Self {
        self.config = config;
        self
    }

    /// Invoke `callback(new_access_token, refresh_token)` after every refresh
    pub fn refresh_callback(mut self, callback: RefreshCallback) -> Self {
        self.refresh_callback = Some(callback);
        self
    }

    pub fn build(self) -> GoogleDriveClient {
        let refresher = TokenRefresher::new(&self.config, self.http_client.clone());
        let tokens = TokenManager::new(self.credentials, refresher, self.refresh_callback);

        GoogleDriveClient {
            http_client: self.http_client,
            tokens,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::{mock, Sequence};
    use std::time::Duration;

    mock! {
        HttpClient {}

        #[async_trait::async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn execute_stream(&self, request: HttpRequest) -> BridgeResult<StreamingResponse>;
        }
    }

    const TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";

    fn client(mock: MockHttpClient) -> GoogleDriveClient {
        GoogleDriveClient::new(
            Arc::new(mock),
            Credentials::new("old-token", "refresh-token", "client-id", "client-secret"),
        )
    }

    fn bearer(request: &HttpRequest) -> Option<&str> {
        request.headers.get("Authorization").map(String::as_str)
    }

    #[tokio::test]
    async fn test_get_file_builds_url_and_bearer() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Get);
            assert_eq!(req.url, "https://www.googleapis.com/drive/v2/files/abc123");
            assert_eq!(bearer(&req), Some("Bearer old-token"));
            assert!(req.query.is_empty());
            assert_eq!(req.timeout, Some(Duration::from_secs(30)));

            Ok(HttpResponse::new(200, r#"{"id": "abc123"}"#))
        });

        let response = client(mock_http).get_file("abc123").await.unwrap();

        assert_eq!(response.status, 200);
        let file: Value = response.json().unwrap();
        assert_eq!(file["id"], "abc123");
    }

    #[tokio::test]
    async fn test_get_user_files_query() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.url, "https://www.googleapis.com/drive/v2/files");
            assert_eq!(req.query_value("q"), Some(NON_FOLDER_QUERY));
            assert_eq!(req.query_value("maxResults"), Some("100"));
            assert_eq!(req.query_value("pageToken"), None);

            Ok(HttpResponse::new(200, r#"{"items": []}"#))
        });

        let response = client(mock_http).get_user_files(None, None).await.unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_get_file_comments_query() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(
                req.url,
                "https://www.googleapis.com/drive/v2/files/abc/comments"
            );
            assert_eq!(req.query_value("maxResults"), Some("20"));
            assert_eq!(req.query_value("pageToken"), Some("page-2"));
            assert_eq!(req.query_value("q"), None);

            Ok(HttpResponse::new(200, r#"{"items": []}"#))
        });

        client(mock_http)
            .get_file_comments("abc", Some(20), Some("page-2"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_401_status_returned_verbatim() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(404, "File not found")));

        let response = client(mock_http).get_file("missing").await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.text().unwrap(), "File not found");
    }

    #[tokio::test]
    async fn test_retry_after_refresh_keeps_params() {
        let mut mock_http = MockHttpClient::new();
        let mut seq = Sequence::new();

        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req| req.url.ends_with("/files") && bearer(req) == Some("Bearer old-token"))
            .returning(|_| Ok(HttpResponse::new(401, "")));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req| req.url == TOKEN_URL)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"access_token": "new-token"}"#)));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req| {
                bearer(req) == Some("Bearer new-token")
                    && req.query_value("pageToken") == Some("p2")
                    && req.query_value("maxResults") == Some("5")
            })
            .returning(|_| Ok(HttpResponse::new(200, r#"{"items": []}"#)));

        let client = client(mock_http);
        let response = client.get_user_files(Some(5), Some("p2")).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(client.access_token().unwrap(), "new-token");
    }

    #[tokio::test]
    async fn test_refresh_failure_is_error() {
        let mut mock_http = MockHttpClient::new();
        let mut seq = Sequence::new();

        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(401, "")));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req| req.url == TOKEN_URL)
            .returning(|_| Ok(HttpResponse::new(400, r#"{"error": "invalid_grant"}"#)));

        let client = client(mock_http);
        let result = client.get_file("abc").await;

        assert!(matches!(
            result,
            Err(crate::GoogleDriveError::Auth(
                core_auth::AuthError::TokenRefreshFailed { status: 400, .. }
            ))
        ));
        assert_eq!(client.access_token().unwrap(), "old-token");
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|_| {
            Err(BridgeError::OperationFailed("Request timed out".to_string()))
        });

        let result = client(mock_http).get_file("abc").await;

        assert!(matches!(
            result,
            Err(crate::GoogleDriveError::BridgeError(_))
        ));
    }

    #[tokio::test]
    async fn test_download_success_uses_stream() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute_stream().times(1).returning(|req| {
            assert_eq!(req.url, "https://doc.example.com/content?id=1");
            assert_eq!(bearer(&req), Some("Bearer old-token"));
            assert_eq!(req.timeout, Some(Duration::from_secs(300)));

            Ok(StreamingResponse::from_bytes(200, vec![1u8, 2, 3, 4, 5]))
        });

        let response = client(mock_http)
            .download("https://doc.example.com/content?id=1", Some("1"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let data = response.bytes().await.unwrap();
        assert_eq!(&data[..], &[1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_download_403_without_file_id_is_final() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute_stream()
            .times(1)
            .returning(|_| Ok(StreamingResponse::from_bytes(403, "expired")));
        mock_http.expect_execute().times(0);

        let response = client(mock_http)
            .download("https://doc.example.com/old", None)
            .await
            .unwrap();

        assert_eq!(response.status, 403);
    }

    #[tokio::test]
    async fn test_download_refresh_skips_link_recovery() {
        let mut mock_http = MockHttpClient::new();
        let mut seq = Sequence::new();

        mock_http
            .expect_execute_stream()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(StreamingResponse::from_bytes(401, "")));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req| req.url == TOKEN_URL)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"access_token": "new-token"}"#)));
        mock_http
            .expect_execute_stream()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req| bearer(req) == Some("Bearer new-token"))
            .returning(|_| Ok(StreamingResponse::from_bytes(403, "")));

        let response = client(mock_http)
            .download("https://doc.example.com/old", Some("abc"))
            .await
            .unwrap();

        assert_eq!(response.status, 403);
    }

    #[tokio::test]
    async fn test_download_description_without_url() {
        let mut mock_http = MockHttpClient::new();
        let mut seq = Sequence::new();

        mock_http
            .expect_execute_stream()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(StreamingResponse::from_bytes(403, "")));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"id": "abc"}"#)));

        let response = client(mock_http)
            .download("https://doc.example.com/old", Some("abc"))
            .await
            .unwrap();

        assert_eq!(response.status, 403);
    }

    #[tokio::test]
    async fn test_custom_config_and_callback() {
        let mut mock_http = MockHttpClient::new();
        let mut seq = Sequence::new();

        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req| req.url == "http://localhost:9000/drive/v2/files/abc")
            .returning(|_| Ok(HttpResponse::new(401, "")));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req| req.url == "http://localhost:9000/token")
            .returning(|_| Ok(HttpResponse::new(200, r#"{"access_token": "t2"}"#)));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, "{}")));

        let config = DriveConfig::builder()
            .api_base_url("http://localhost:9000/drive/v2")
            .token_url("http://localhost:9000/token")
            .build()
            .unwrap();

        let seen = Arc::new(std::sync::Mutex::new(None));
        let sink = seen.clone();

        let client = GoogleDriveClient::builder(
            Arc::new(mock_http),
            Credentials::new("t1", "r1", "id", "secret"),
        )
        .config(config)
        .refresh_callback(Arc::new(move |token: &str, refresh: &str| {
            *sink.lock().unwrap() = Some((token.to_string(), refresh.to_string()));
        }))
        .build();

        client.get_file("abc").await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            Some(("t2".to_string(), "r1".to_string()))
        );
        assert_eq!(client.credentials().unwrap().access_token, "t2");
    }
}
