//! PRAX API client.
//!
//! [`PraxApi`] is the seam between command handlers and the service: one
//! method per entity action, each returning [`ApiResult`]. [`HttpPraxClient`]
//! is the real implementation; tests substitute their own.

mod filters;
mod http;
mod logs;
#[cfg(test)]
mod testing;

pub use filters::ListFilters;
pub use http::{HttpPraxClient, DEFAULT_CONNECT_TIMEOUT};
pub use logs::LogStream;

use crate::error::ApiResult;
use crate::models::{
    Paged, PermissionsRequest, ResourcePermissionsSchema, RouteSchema, RunSchema, SecretRequest,
    SecretSchema, UserSchema, WorkflowKind, WorkflowSchema,
};
use std::collections::BTreeMap;

/// Options for fetching run logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Keep the stream open and deliver lines as they are produced.
    pub follow: bool,
    /// Only the last `n` lines.
    pub lines: Option<u32>,
}

/// Remote operations used by the CLI.
pub trait PraxApi {
    fn list_workflows(
        &self,
        kind: WorkflowKind,
        filters: &ListFilters,
    ) -> ApiResult<Paged<WorkflowSchema>>;

    fn get_workflow(&self, kind: WorkflowKind, name: &str) -> ApiResult<WorkflowSchema>;

    fn submit(
        &self,
        kind: WorkflowKind,
        name: &str,
        parameters: &BTreeMap<String, String>,
    ) -> ApiResult<RunSchema>;

    fn retry(&self, kind: WorkflowKind, name: &str) -> ApiResult<RunSchema>;

    fn terminate(&self, kind: WorkflowKind, name: &str) -> ApiResult<RunSchema>;

    fn get_run(&self, kind: WorkflowKind, run_name: &str) -> ApiResult<RunSchema>;

    fn run_logs(
        &self,
        kind: WorkflowKind,
        run_name: &str,
        options: LogOptions,
    ) -> ApiResult<LogStream>;

    fn list_routes(&self, filters: &ListFilters) -> ApiResult<Paged<RouteSchema>>;

    fn get_route(&self, name: &str) -> ApiResult<RouteSchema>;

    fn update_route_thumbnail(
        &self,
        name: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> ApiResult<RouteSchema>;

    fn allow_route(
        &self,
        name: &str,
        permissions: &PermissionsRequest,
    ) -> ApiResult<ResourcePermissionsSchema>;

    fn get_users(&self) -> ApiResult<Vec<UserSchema>>;

    fn create_or_update_user_secret(&self, request: &SecretRequest) -> ApiResult<SecretSchema>;
}
