//! Field lists per entity kind.

use super::presentation::{
    format_dt, format_route_status, format_schedule, nested_or_na, NOT_AVAILABLE,
};
use crate::models::WorkflowKind;
use crate::render::FieldSpec;
use serde_json::Value;

/// Columns for `list pipelines|tasks|builds`.
pub fn workflow_list(kind: WorkflowKind) -> Vec<FieldSpec> {
    let mut fields = vec![
        FieldSpec::new("Name", "$.name"),
        FieldSpec::new("Project", "$.project"),
        FieldSpec::new("Stage", "$.stage"),
        FieldSpec::new("Org.", "$.org"),
        FieldSpec::new("Last Run", "$.last_run").map(nested_or_na("status")),
        FieldSpec::new("Started at", "$.last_run").map(|run| match run {
            Value::Null => Value::String(NOT_AVAILABLE.to_string()),
            run => format_dt(run.get("started_at").unwrap_or(&Value::Null)),
        }),
    ];
    if kind == WorkflowKind::Pipeline {
        fields.push(
            FieldSpec::new("Schedule", r#"$.["suspended", "schedule"]"#)
                .separator(" ")
                .map_list(format_schedule),
        );
    }
    fields
}

/// Summary rows for `describe pipeline|task|build`.
pub fn workflow_detail(kind: WorkflowKind) -> Vec<FieldSpec> {
    let mut fields = vec![
        FieldSpec::new(format!("{} Name", kind.title()), "$.name"),
        FieldSpec::new("Description", "$.description"),
        FieldSpec::new("Project", "$.project"),
        FieldSpec::new("Organization", "$.org"),
        FieldSpec::new("Stage", "$.stage"),
        FieldSpec::new("Object Ref.", "$.object_ref"),
    ];
    if kind == WorkflowKind::Pipeline {
        fields.push(FieldSpec::new("Schedule", "$.schedule"));
        fields.push(FieldSpec::new("Suspended", "$.suspended"));
    }
    fields.push(FieldSpec::new("Created At", "$.created_at").map(format_dt));
    fields.push(FieldSpec::new("Updated At", "$.updated_at").map(format_dt));
    fields
}

/// Rows for a run sub-section.
pub fn run_detail() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Run Name", "$.name"),
        FieldSpec::new("Object Ref", "$.object_ref"),
        FieldSpec::new("Status", "$.status"),
        FieldSpec::new("Started at", "$.started_at").map(format_dt),
        FieldSpec::new("Finished at", "$.finished_at").map(format_dt),
        FieldSpec::new("Message", "$.message"),
    ]
}

/// Columns for `list routes|notebooks`.
pub fn route_list() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Name", "$.name"),
        FieldSpec::new("Project", "$.project"),
        FieldSpec::new("Stage", "$.stage"),
        FieldSpec::new("Status", "$.status").map(format_route_status),
        FieldSpec::new("URL", "$.url"),
    ]
}

/// Rows for `describe route`.
pub fn route_detail() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Name", "$.name"),
        FieldSpec::new("Description", "$.description"),
        FieldSpec::new("Project", "$.project"),
        FieldSpec::new("Service", "$.service_name"),
        FieldSpec::new("Stage", "$.stage"),
        FieldSpec::new("Org", "$.org"),
        FieldSpec::new("Owner", "$.username"),
        FieldSpec::new("Tier", "$.tier"),
        FieldSpec::new("Default URL", "$.url"),
        FieldSpec::new("Created At", "$.created_at").map(format_dt),
        FieldSpec::new("Updated At", "$.updated_at").map(format_dt),
        FieldSpec::new("Custom Domains", "$.custom_domains.*").map(|domain| match domain {
            Value::String(d) if !d.is_empty() => Value::String(format!("https://{}/", d)),
            _ => Value::Null,
        }),
        FieldSpec::new("Publish App", "$.publish_app"),
        FieldSpec::new("Open Access", "$.open_access"),
        FieldSpec::new("Thumbnail URL", "$.thumbnail"),
        FieldSpec::new("Status", "$.status"),
        FieldSpec::new("Details", "$.details").map(|details| match details {
            Value::Null => Value::Null,
            other => serde_yaml::to_string(other)
                .map(|s| Value::String(s.trim_end().to_string()))
                .unwrap_or(Value::Null),
        }),
    ]
}

/// Rows for `describe user`.
pub fn user_detail() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Username", "$.username"),
        FieldSpec::new("Email", "$.email"),
        FieldSpec::new("PRAX API Token", "$.token"),
        FieldSpec::new("Current Org.", "$.current_org"),
        FieldSpec::new("Organizations", "$.orgs.*"),
        FieldSpec::new("User Resources", "$.resources.*").map(|resource| {
            let kind = resource
                .get("resource_type")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let name = resource
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Value::String(format!("{}: {}", kind.strip_suffix('s').unwrap_or(kind), name))
        }),
    ]
}
