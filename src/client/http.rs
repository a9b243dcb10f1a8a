//! HTTP implementation of [`PraxApi`].
//!
//! The CLI is synchronous; each call blocks on a private current-thread
//! runtime that drives the async `reqwest` client.

use super::{ListFilters, LogOptions, LogStream, PraxApi};
use crate::config::ApiConfig;
use crate::error::{ApiResult, ErrorInfo};
use crate::models::{
    ErrorResponse, Paged, PermissionsRequest, ResourcePermissionsSchema, RouteSchema, RunSchema,
    SecretRequest, SecretSchema, SubmitRequest, UserSchema, WorkflowKind, WorkflowSchema,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const ORG_HEADER: &str = "X-PRAX-ORG";

/// Map transport-level failures to [`ErrorInfo`].
pub(super) fn map_http_error(error: reqwest::Error) -> ErrorInfo {
    if error.is_timeout() {
        ErrorInfo::transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ErrorInfo::transport(format!("Connection error: {}", error))
    } else if error.is_decode() {
        ErrorInfo::decode(format!("Failed to decode response: {}", error))
    } else {
        ErrorInfo::transport(format!("HTTP error: {}", error))
    }
}

/// Build an [`ErrorInfo`] from a non-success response.
async fn error_from_response(response: Response) -> ErrorInfo {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) => parsed.into_error_info(status.as_u16()),
        Err(_) if body.trim().is_empty() => ErrorInfo::remote(
            status.as_u16(),
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        ),
        Err(_) => ErrorInfo::remote(status.as_u16(), body.trim().to_string()),
    }
}

async fn check(response: Response) -> ApiResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let response = check(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ErrorInfo::decode(format!("Failed to parse response: {}", e)))
}

/// PRAX REST client.
pub struct HttpPraxClient {
    runtime: Arc<Runtime>,
    client: Client,
    /// Log streams are unbounded; this client only limits the connect phase.
    stream_client: Client,
    base_url: Url,
    token: Option<String>,
    org: Option<String>,
}

impl HttpPraxClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ErrorInfo::config(format!("Failed to start runtime: {}", e)))?;
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ErrorInfo::config(format!("Failed to create HTTP client: {}", e)))?;
        let stream_client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ErrorInfo::config(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = Url::parse(config.url.trim_end_matches('/'))
            .map_err(|e| ErrorInfo::config(format!("Invalid API URL '{}': {}", config.url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ErrorInfo::config(format!(
                "Invalid API URL '{}': cannot carry a path",
                config.url
            )));
        }
        Ok(Self {
            runtime: Arc::new(runtime),
            client,
            stream_client,
            base_url,
            token: config.token.clone(),
            org: config.org.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    /// A trailing `""` segment yields a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.request_on(&self.client, method, segments)
    }

    fn request_on(&self, client: &Client, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "PRAX request");
        let mut builder = client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(org) = &self.org {
            builder = builder.header(ORG_HEADER, org);
        }
        builder
    }

    fn call<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let result = self.runtime.block_on(async {
            let response = builder.send().await.map_err(map_http_error)?;
            decode::<T>(response).await
        });
        if let Err(e) = &result {
            warn!(kind = %e.kind, status = ?e.status, detail = %e.detail, "PRAX request failed");
        }
        result
    }
}

impl PraxApi for HttpPraxClient {
    fn list_workflows(
        &self,
        kind: WorkflowKind,
        filters: &ListFilters,
    ) -> ApiResult<Paged<WorkflowSchema>> {
        self.call(
            self.request(Method::GET, &[kind.collection(), ""])
                .query(&filters.to_query()),
        )
    }

    fn get_workflow(&self, kind: WorkflowKind, name: &str) -> ApiResult<WorkflowSchema> {
        self.call(self.request(Method::GET, &[kind.collection(), name]))
    }

    fn submit(
        &self,
        kind: WorkflowKind,
        name: &str,
        parameters: &BTreeMap<String, String>,
    ) -> ApiResult<RunSchema> {
        let body = SubmitRequest {
            parameters: parameters.clone(),
        };
        self.call(
            self.request(Method::POST, &[kind.collection(), name, "submit"])
                .json(&body),
        )
    }

    fn retry(&self, kind: WorkflowKind, name: &str) -> ApiResult<RunSchema> {
        self.call(self.request(Method::POST, &[kind.collection(), name, "retry"]))
    }

    fn terminate(&self, kind: WorkflowKind, name: &str) -> ApiResult<RunSchema> {
        self.call(self.request(Method::POST, &[kind.collection(), name, "terminate"]))
    }

    fn get_run(&self, kind: WorkflowKind, run_name: &str) -> ApiResult<RunSchema> {
        self.call(self.request(Method::GET, &[kind.run_collection(), run_name]))
    }

    fn run_logs(
        &self,
        kind: WorkflowKind,
        run_name: &str,
        options: LogOptions,
    ) -> ApiResult<LogStream> {
        let mut query = vec![("follow", options.follow.to_string())];
        if let Some(lines) = options.lines {
            query.push(("lines", lines.to_string()));
        }
        let builder = self
            .request_on(
                &self.stream_client,
                Method::GET,
                &[kind.run_collection(), run_name, "logs"],
            )
            .query(&query);
        let response = self.runtime.block_on(async {
            let response = builder.send().await.map_err(map_http_error)?;
            check(response).await
        })?;
        Ok(LogStream::from_response(Arc::clone(&self.runtime), response))
    }

    fn list_routes(&self, filters: &ListFilters) -> ApiResult<Paged<RouteSchema>> {
        self.call(
            self.request(Method::GET, &["routes", ""])
                .query(&filters.to_query()),
        )
    }

    fn get_route(&self, name: &str) -> ApiResult<RouteSchema> {
        self.call(self.request(Method::GET, &["routes", name]))
    }

    fn update_route_thumbnail(
        &self,
        name: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> ApiResult<RouteSchema> {
        let form = Form::new().part("thumbnail", Part::bytes(content).file_name(file_name.to_string()));
        self.call(
            self.request(Method::POST, &["routes", name, "thumbnail"])
                .multipart(form),
        )
    }

    fn allow_route(
        &self,
        name: &str,
        permissions: &PermissionsRequest,
    ) -> ApiResult<ResourcePermissionsSchema> {
        self.call(
            self.request(Method::POST, &["routes", name, "permissions"])
                .json(permissions),
        )
    }

    fn get_users(&self) -> ApiResult<Vec<UserSchema>> {
        self.call(self.request(Method::GET, &["users", ""]))
    }

    fn create_or_update_user_secret(&self, request: &SecretRequest) -> ApiResult<SecretSchema> {
        self.call(
            self.request(Method::POST, &["users", "secrets", ""])
                .json(request),
        )
    }
}
