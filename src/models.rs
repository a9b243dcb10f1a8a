//! PRAX API schemas.

use crate::error::{ErrorInfo, FieldError};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Schedulable entity kinds sharing the same command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowKind {
    Pipeline,
    Task,
    Build,
}

impl WorkflowKind {
    pub fn singular(self) -> &'static str {
        match self {
            WorkflowKind::Pipeline => "pipeline",
            WorkflowKind::Task => "task",
            WorkflowKind::Build => "build",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            WorkflowKind::Pipeline => "pipelines",
            WorkflowKind::Task => "tasks",
            WorkflowKind::Build => "builds",
        }
    }

    /// Capitalised singular, for status lines.
    pub fn title(self) -> &'static str {
        match self {
            WorkflowKind::Pipeline => "Pipeline",
            WorkflowKind::Task => "Task",
            WorkflowKind::Build => "Build",
        }
    }

    /// Collection path segment, e.g. `pipelines`.
    pub fn collection(self) -> &'static str {
        self.plural()
    }

    /// Run collection path segment, e.g. `pipeline-runs`.
    pub fn run_collection(self) -> &'static str {
        match self {
            WorkflowKind::Pipeline => "pipeline-runs",
            WorkflowKind::Task => "task-runs",
            WorkflowKind::Build => "build-runs",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// Lifecycle states reported for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Error,
    Terminated,
    Skipped,
    #[serde(untagged)]
    Other(String),
}

impl RunStatus {
    /// Still making progress; a terminate request has not taken effect yet.
    pub fn is_active(&self) -> bool {
        matches!(self, RunStatus::Pending | RunStatus::Running)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Pending => f.write_str("Pending"),
            RunStatus::Running => f.write_str("Running"),
            RunStatus::Succeeded => f.write_str("Succeeded"),
            RunStatus::Failed => f.write_str("Failed"),
            RunStatus::Error => f.write_str("Error"),
            RunStatus::Terminated => f.write_str("Terminated"),
            RunStatus::Skipped => f.write_str("Skipped"),
            RunStatus::Other(s) => f.write_str(s),
        }
    }
}

/// One execution of a pipeline, task or build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSchema {
    pub name: String,
    #[serde(default)]
    pub object_ref: Option<String>,
    pub status: RunStatus,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub arguments: Option<Value>,
    #[serde(default)]
    pub details: Option<Value>,
}

/// A pipeline, task or build definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSchema {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub project: String,
    #[serde(default)]
    pub stage: Option<String>,
    pub org: String,
    #[serde(default)]
    pub object_ref: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_run: Option<RunSchema>,
    #[serde(default)]
    pub details: Option<Value>,
}

/// A published service, app or notebook endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSchema {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub org: String,
    #[serde(default)]
    pub username: Option<String>,
    pub project: String,
    #[serde(default)]
    pub service_name: Option<String>,
    pub stage: String,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub status: String,
    pub url: String,
    #[serde(default)]
    pub custom_domains: Vec<String>,
    #[serde(default)]
    pub publish_app: bool,
    #[serde(default)]
    pub open_access: bool,
    #[serde(default)]
    pub notebook: bool,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A resource owned by the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResourceSchema {
    pub name: String,
    pub resource_type: String,
    #[serde(default)]
    pub org: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSchema {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub current_org: Option<String>,
    #[serde(default)]
    pub orgs: Vec<String>,
    #[serde(default)]
    pub resources: Vec<UserResourceSchema>,
}

impl UserSchema {
    /// Names of the user's secrets in `org`.
    pub fn secrets_in<'a>(&'a self, org: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.resources
            .iter()
            .filter(move |r| r.resource_type == "secret" && r.org.as_deref() == Some(org))
            .map(|r| r.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSchema {
    pub name: String,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Users and groups to grant access to, with the access level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsRequest {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    pub view: bool,
    pub change: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPermission {
    pub subject: String,
    #[serde(default)]
    pub view: bool,
    #[serde(default)]
    pub change: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourcePermissionsSchema {
    #[serde(default)]
    pub users: Vec<SubjectPermission>,
    #[serde(default)]
    pub groups: Vec<SubjectPermission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub parameters: BTreeMap<String, String>,
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub count: usize,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>) -> Self {
        let count = items.len();
        Self { items, count }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// More items exist on the server than this page holds.
    pub fn is_truncated(&self) -> bool {
        self.count > self.items.len()
    }
}

/// `detail` of an error body: a message or a list of validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Validation(Vec<FieldError>),
}

/// Body the service returns with non-success statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: ErrorDetail,
}

impl ErrorResponse {
    pub fn into_error_info(self, status: u16) -> ErrorInfo {
        match self.detail {
            ErrorDetail::Message(msg) => ErrorInfo::remote(status, msg),
            ErrorDetail::Validation(errors) => {
                ErrorInfo::remote(status, "Request validation failed").with_errors(errors)
            }
        }
    }
}

/// Optional timestamps; values without an offset are taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw))),
        }
    }
}
