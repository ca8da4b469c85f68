#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{RawQuery, Request, State};
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use kudu_update::{
    ArchiveFile, ArchiveUploader, ConfigurationSnapshot, ControlPlane, ControlPlaneError,
    ControlPlaneResult, DeploymentTarget, RepositoryAccess, Result, SiteBinding, Subscription,
    UploadError, UploadReceipt,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    fn from_parts(parts: &Parts, body: &Bytes) -> Self {
        Self {
            method: parts.method.to_string(),
            target: parts
                .uri
                .path_and_query()
                .map(|pq| pq.to_string())
                .unwrap_or_default(),
            headers: parts
                .headers
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
                .collect(),
            body: body.to_vec(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn json(value: Value) -> Self {
        Self::new(200, value.to_string())
    }

    pub fn ok() -> Self {
        Self::new(200, "")
    }
}

impl IntoResponse for StubResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

type Requests = Arc<Mutex<Vec<RecordedRequest>>>;

/// Axum server on a loopback port that records every request it receives.
pub struct StubServer {
    addr: SocketAddr,
    requests: Requests,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Answers every request with `handler`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubResponse + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let app = Router::new().fallback(move |request: Request| {
            let handler = Arc::clone(&handler);
            async move {
                let (parts, body) = request.into_parts();
                let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
                handler(&RecordedRequest::from_parts(&parts, &body))
            }
        });

        Self::serve(app).await
    }

    pub async fn serve(router: Router) -> Self {
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let app = router.layer(middleware::from_fn_with_state(Arc::clone(&requests), record_request));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_matching(&self, method: &str, path_suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path().ends_with(path_suffix))
            .collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record_request(State(requests): State<Requests>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    requests.lock().unwrap().push(RecordedRequest::from_parts(&parts, &body));
    next.run(Request::from_parts(parts, Body::from(body))).await
}

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    LookupSubscription,
    LookupSite,
    GetConfig,
    EnsureDeploymentUri,
    ClearConfig,
    SetConfig,
}

/// In-memory control plane that writes every call to a shared journal.
pub struct RecordingControlPlane {
    journal: Journal,
    snapshot: Value,
    auth: String,
    fail_on: Option<Op>,
}

impl RecordingControlPlane {
    pub fn new(journal: Journal, snapshot: Value) -> Self {
        Self {
            journal,
            snapshot,
            auth: "$mysite:secret".to_string(),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, op: Op) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn with_auth(mut self, auth: &str) -> Self {
        self.auth = auth.to_string();
        self
    }

    fn record(&self, op: Op, entry: String) -> ControlPlaneResult<()> {
        self.journal.lock().unwrap().push(entry);
        if self.fail_on == Some(op) {
            return Err(ControlPlaneError::Unknown {
                status: Some(500),
                code: Some("InternalServerError".into()),
                message: format!("{:?} failed", op),
            });
        }
        Ok(())
    }
}

pub fn test_site() -> SiteBinding {
    SiteBinding {
        name: "mysite".into(),
        resource_group: "rg".into(),
        location: Some("West US".into()),
        resource_id: "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Web/sites/mysite".into(),
    }
}

#[async_trait]
impl ControlPlane for RecordingControlPlane {
    async fn lookup_subscription(&self) -> ControlPlaneResult<Subscription> {
        self.record(Op::LookupSubscription, "lookup_subscription".into())?;
        Ok(Subscription {
            id: "sub-1".into(),
            display_name: Some("Test".into()),
        })
    }

    async fn lookup_site(&self, _subscription: &Subscription, site_name: &str) -> ControlPlaneResult<SiteBinding> {
        self.record(Op::LookupSite, format!("lookup_site:{}", site_name))?;
        Ok(test_site())
    }

    async fn get_config(&self, _site: &SiteBinding) -> ControlPlaneResult<ConfigurationSnapshot> {
        self.record(Op::GetConfig, "get_config".into())?;
        Ok(ConfigurationSnapshot::new(self.snapshot.clone()))
    }

    async fn ensure_deployment_uri(&self, _site: &SiteBinding) -> ControlPlaneResult<RepositoryAccess> {
        self.record(Op::EnsureDeploymentUri, "ensure_deployment_uri".into())?;
        Ok(RepositoryAccess {
            uri: "https://mysite.scm.azurewebsites.net/".into(),
            auth: self.auth.clone(),
        })
    }

    async fn clear_config(&self, _site: &SiteBinding, key: &str) -> ControlPlaneResult<()> {
        self.record(Op::ClearConfig, format!("clear_config:{}", key))
    }

    async fn set_config(&self, _site: &SiteBinding, key: &str, value: &str) -> ControlPlaneResult<()> {
        self.record(Op::SetConfig, format!("set_config:{}={}", key, value))
    }
}

/// Uploader that answers with a fixed status instead of touching the network.
pub struct RecordingUploader {
    journal: Journal,
    status: u16,
    body: Option<String>,
}

impl RecordingUploader {
    pub fn new(journal: Journal, status: u16) -> Self {
        Self { journal, status, body: None }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

#[async_trait]
impl ArchiveUploader for RecordingUploader {
    async fn upload(&self, archive: &ArchiveFile, target: &DeploymentTarget) -> Result<UploadReceipt> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("upload:{}", target.upload_uri()));

        if self.status != 200 {
            return Err(UploadError::unexpected_status(self.status, self.body.clone()).into());
        }

        let bytes_sent = std::fs::metadata(archive.path())?.len();
        Ok(UploadReceipt { status: 200, bytes_sent })
    }
}

pub fn archive_with(content: &[u8]) -> (tempfile::NamedTempFile, ArchiveFile) {
    use std::io::Write;

    let mut file = tempfile::Builder::new().suffix(".zip").tempfile().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    let archive = ArchiveFile::open_checked(file.path()).unwrap();
    (file, archive)
}

pub const SITE_ID: &str = "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Web/sites/mysite";

#[derive(Clone)]
struct AzureState {
    settings: Arc<Mutex<Map<String, Value>>>,
    scm_type: Arc<Mutex<String>>,
    zip: StubResponse,
}

/// Canned App Service management API plus the site's deployment endpoint, on one stub server.
pub struct FakeAzure {
    pub server: StubServer,
    settings: Arc<Mutex<Map<String, Value>>>,
    scm_type: Arc<Mutex<String>>,
}

impl FakeAzure {
    pub async fn start(settings: Value, scm_type: &str, zip: StubResponse) -> Self {
        let state = AzureState {
            settings: Arc::new(Mutex::new(settings.as_object().cloned().unwrap_or_default())),
            scm_type: Arc::new(Mutex::new(scm_type.to_string())),
            zip,
        };
        let settings = Arc::clone(&state.settings);
        let scm_type = Arc::clone(&state.scm_type);

        let site = |suffix: &str| format!("{}{}", SITE_ID, suffix);
        let app = Router::new()
            .route("/subscriptions", get(list_subscriptions))
            .route("/subscriptions/sub-1", get(get_subscription))
            .route("/subscriptions/sub-1/providers/Microsoft.Web/sites", get(list_sites))
            .route(&site("/config/appsettings/list"), post(list_app_settings))
            .route(&site("/config/appsettings"), put(put_app_settings))
            .route(&site("/config/web"), get(get_site_config).patch(patch_site_config))
            .route(&site("/config/publishingcredentials/list"), post(publishing_credentials))
            .route("/scm/zip", put(upload_zip))
            .fallback(not_found)
            .with_state(state);

        let server = StubServer::serve(app).await;
        Self { server, settings, scm_type }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn settings(&self) -> Map<String, Value> {
        self.settings.lock().unwrap().clone()
    }

    pub fn scm_type(&self) -> String {
        self.scm_type.lock().unwrap().clone()
    }
}

fn host(headers: &HeaderMap) -> String {
    headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn list_subscriptions() -> Json<Value> {
    Json(json!({
        "value": [
            {"subscriptionId": "sub-0", "displayName": "Old", "state": "Disabled"},
            {"subscriptionId": "sub-1", "displayName": "Test", "state": "Enabled"}
        ]
    }))
}

async fn get_subscription() -> Json<Value> {
    Json(json!({"subscriptionId": "sub-1", "displayName": "Test", "state": "Enabled"}))
}

async fn list_sites(headers: HeaderMap, RawQuery(query): RawQuery) -> Json<Value> {
    if query.as_deref().is_some_and(|q| q.contains("skiptoken")) {
        return Json(json!({
            "value": [{"id": SITE_ID, "name": "mysite", "location": "West US"}]
        }));
    }

    Json(json!({
        "value": [{
            "id": "/subscriptions/sub-1/resourceGroups/other/providers/Microsoft.Web/sites/othersite",
            "name": "othersite"
        }],
        "nextLink": format!(
            "http://{}/subscriptions/sub-1/providers/Microsoft.Web/sites?api-version=2022-03-01&$skiptoken=2",
            host(&headers)
        )
    }))
}

async fn list_app_settings(State(state): State<AzureState>) -> Json<Value> {
    let settings = state.settings.lock().unwrap().clone();
    Json(json!({ "properties": Value::Object(settings) }))
}

async fn put_app_settings(State(state): State<AzureState>, Json(body): Json<Value>) -> Json<Value> {
    let updated = body["properties"].as_object().cloned().unwrap_or_default();
    *state.settings.lock().unwrap() = updated;
    Json(body)
}

async fn get_site_config(State(state): State<AzureState>) -> Json<Value> {
    let scm_type = state.scm_type.lock().unwrap().clone();
    Json(json!({ "properties": { "scmType": scm_type } }))
}

async fn patch_site_config(State(state): State<AzureState>, Json(body): Json<Value>) -> Json<Value> {
    if let Some(scm_type) = body["properties"]["scmType"].as_str() {
        *state.scm_type.lock().unwrap() = scm_type.to_string();
    }
    Json(body)
}

async fn publishing_credentials(headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "properties": {
            "publishingUserName": "$mysite",
            "publishingPassword": "secret",
            "scmUri": format!("http://$mysite:secret@{}/scm", host(&headers))
        }
    }))
}

async fn upload_zip(State(state): State<AzureState>) -> StubResponse {
    state.zip
}

async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": {"code": "ResourceNotFound", "message": format!("No route for {}", uri)}})),
    )
}
