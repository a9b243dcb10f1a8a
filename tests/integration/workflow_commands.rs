//! Pipelines, tasks and builds through `RunContext::execute`.

use super::mock::{context, not_found, run, run_schema, workflow, Call, MockPrax};
use prax::client::{ListFilters, LogOptions};
use prax::error::{ErrorInfo, ErrorKind};
use prax::models::{Paged, WorkflowKind};
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn test_list_pipelines_shows_na_for_missing_last_run() {
    let ctx = context(MockPrax {
        workflows: Some(Ok(Paged::new(vec![
            workflow("ingest", Some(run_schema("ingest-x1", "Running"))),
            workflow("forecast", None),
        ]))),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["list", "pipelines"]);

    assert!(result.is_ok());
    assert!(out.contains("ingest"));
    assert!(out.contains("forecast"));
    assert!(out.contains("Running"));
    assert!(out.contains("N/A"));
    assert!(out.contains("⟳ 0 6 * * *"));
    assert!(!out.contains("Showing"));
    assert_eq!(
        ctx.api().calls(),
        vec![Call::ListWorkflows(
            WorkflowKind::Pipeline,
            ListFilters::new(100)
        )]
    );
}

#[test]
fn test_list_forwards_only_given_filters() {
    let ctx = context(MockPrax {
        workflows: Some(Ok(Paged::new(vec![workflow("t1", None)]))),
        ..MockPrax::default()
    });

    let (result, _) = run(
        &ctx,
        &["list", "tasks", "--project", "ocean-models", "--limit", "5"],
    );

    assert!(result.is_ok());
    let expected = ListFilters {
        project: Some("ocean-models".to_string()),
        ..ListFilters::new(5)
    };
    assert_eq!(
        ctx.api().calls(),
        vec![Call::ListWorkflows(WorkflowKind::Task, expected)]
    );
}

#[test]
fn test_list_empty_prints_no_results() {
    let ctx = context(MockPrax {
        workflows: Some(Ok(Paged::new(vec![]))),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["list", "tasks"]);

    assert!(result.is_ok());
    assert_eq!(out, "No tasks found!\n");
}

#[test]
fn test_list_error_renders_nothing() {
    let ctx = context(MockPrax {
        workflows: Some(Err(not_found())),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["list", "builds"]);

    let err = result.unwrap_err();
    assert_eq!(err.context, "Error fetching builds");
    assert_eq!(err.info.detail, "not found!");
    assert!(out.is_empty());
}

#[test]
fn test_list_truncated_prints_footer() {
    let mut page = Paged::new(vec![workflow("ingest", None)]);
    page.count = 5;
    let ctx = context(MockPrax {
        workflows: Some(Ok(page)),
        ..MockPrax::default()
    });

    let (_, out) = run(&ctx, &["list", "pipelines", "--limit", "1"]);

    assert!(out.ends_with("Showing 1 of 5 pipelines.\n"));
}

#[test]
fn test_list_json_output_dumps_records() {
    let ctx = context(MockPrax {
        workflows: Some(Ok(Paged::new(vec![
            workflow("a", None),
            workflow("b", None),
        ]))),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["list", "tasks", "-o", "json"]);

    assert!(result.is_ok());
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let names: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_describe_pipeline_with_last_run_sections() {
    let mut last_run = run_schema("ingest-x1", "Succeeded");
    last_run.arguments = Some(json!({"region": "us"}));
    last_run.details = Some(json!({"nodes": 3}));
    let ctx = context(MockPrax {
        workflow: Some(Ok(workflow("ingest", Some(last_run)))),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["describe", "pipeline", "ingest"]);

    assert!(result.is_ok());
    assert!(out.contains("Pipeline Name"));
    assert!(out.contains("2024-01-01 00:00:00 UTC"));
    assert!(out.contains("\nLast Run:\n"));
    assert!(out.contains("  Object Ref"));
    assert!(out.contains("\n    Arguments:\n    region: us\n"));
    assert!(out.contains("\n  Run Details:\n  nodes: 3\n"));
}

#[test]
fn test_describe_without_last_run_stops_after_summary() {
    let ctx = context(MockPrax {
        workflow: Some(Ok(workflow("forecast", None))),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["describe", "task", "forecast"]);

    assert!(result.is_ok());
    assert!(out.contains("Task Name"));
    assert!(!out.contains("Last Run:"));
}

#[test]
fn test_describe_yaml_dumps_full_record() {
    let ctx = context(MockPrax {
        workflow: Some(Ok(workflow("forecast", None))),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["describe", "build", "forecast", "-o", "yaml"]);

    assert!(result.is_ok());
    assert!(out.contains("\nname: forecast\n"));
    assert!(out.contains("last_run: null"));
}

#[test]
fn test_submit_sends_parameter_map() {
    let ctx = context(MockPrax {
        run: Some(Ok(run_schema("etl-job-7f2", "Pending"))),
        ..MockPrax::default()
    });

    let (result, out) = run(
        &ctx,
        &["submit", "task", "etl-job", "-p", "region=us", "-p", "mode=fast"],
    );

    assert!(result.is_ok());
    let expected: BTreeMap<String, String> = [("region", "us"), ("mode", "fast")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(
        ctx.api().calls(),
        vec![Call::Submit(WorkflowKind::Task, "etl-job".to_string(), expected)]
    );
    assert!(out.contains("Task 'etl-job' submitted!"));
    assert!(out.contains("etl-job-7f2"));
}

#[test]
fn test_submit_malformed_parameter_is_local_error() {
    let ctx = context(MockPrax::default());

    let (result, out) = run(&ctx, &["submit", "task", "etl-job", "-p", "region"]);

    let err = result.unwrap_err();
    assert_eq!(err.info.kind, ErrorKind::Precondition);
    assert!(ctx.api().calls().is_empty());
    assert!(out.is_empty());
}

#[test]
fn test_retry_reports_new_run() {
    let ctx = context(MockPrax {
        run: Some(Ok(run_schema("build-r2", "Running"))),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["retry", "build", "image"]);

    assert!(result.is_ok());
    assert_eq!(
        ctx.api().calls(),
        vec![Call::Retry(WorkflowKind::Build, "image".to_string())]
    );
    assert!(out.contains("Build 'image' retried! Run 'build-r2' is Running."));
}

#[test]
fn test_terminate_polls_until_inactive() {
    let mock = MockPrax {
        run: Some(Ok(run_schema("etl-job-7f2", "Running"))),
        ..MockPrax::default()
    };
    mock.run_states.borrow_mut().extend([
        Ok(run_schema("etl-job-7f2", "Running")),
        Ok(run_schema("etl-job-7f2", "Running")),
        Ok(run_schema("etl-job-7f2", "Terminated")),
    ]);
    let ctx = context(mock);

    let (result, out) = run(&ctx, &["terminate", "task", "etl-job"]);

    assert!(result.is_ok());
    let polls = ctx
        .api()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::GetRun(WorkflowKind::Task, run) if run == "etl-job-7f2"))
        .count();
    assert_eq!(polls, 3);
    assert!(out.contains("Task run 'etl-job-7f2' terminated with status Terminated"));
}

#[test]
fn test_terminate_poll_error_stops() {
    let mock = MockPrax {
        run: Some(Ok(run_schema("etl-job-7f2", "Running"))),
        ..MockPrax::default()
    };
    mock.run_states.borrow_mut().extend([
        Ok(run_schema("etl-job-7f2", "Running")),
        Err(ErrorInfo::transport("connection reset")),
        Ok(run_schema("etl-job-7f2", "Terminated")),
    ]);
    let ctx = context(mock);

    let (result, out) = run(&ctx, &["terminate", "task", "etl-job"]);

    assert_eq!(result.unwrap_err().info.detail, "connection reset");
    assert_eq!(ctx.api().calls().len(), 3);
    assert!(out.is_empty());
}

#[test]
fn test_terminate_no_wait_skips_polling() {
    let ctx = context(MockPrax {
        run: Some(Ok(run_schema("p-1", "Running"))),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["terminate", "pipeline", "ingest", "--no-wait"]);

    assert!(result.is_ok());
    assert_eq!(
        ctx.api().calls(),
        vec![Call::Terminate(WorkflowKind::Pipeline, "ingest".to_string())]
    );
    assert!(out.contains("Termination of Pipeline run 'p-1' requested."));
}

#[test]
fn test_logs_without_run_is_precondition() {
    let ctx = context(MockPrax {
        workflow: Some(Ok(workflow("ingest", None))),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["logs", "pipeline", "ingest"]);

    let err = result.unwrap_err();
    assert_eq!(err.info.kind, ErrorKind::Precondition);
    assert_eq!(
        ctx.api().calls(),
        vec![Call::GetWorkflow(WorkflowKind::Pipeline, "ingest".to_string())]
    );
    assert!(out.is_empty());
}

#[test]
fn test_logs_stream_until_error() {
    let mock = MockPrax {
        workflow: Some(Ok(workflow("ingest", Some(run_schema("ingest-x1", "Running"))))),
        ..MockPrax::default()
    };
    *mock.logs.borrow_mut() = Some(vec![
        Ok("step 1".to_string()),
        Ok("step 2".to_string()),
        Err(ErrorInfo::transport("stream closed")),
        Ok("never".to_string()),
    ]);
    let ctx = context(mock);

    let (result, out) = run(&ctx, &["logs", "pipeline", "ingest", "-f", "-n", "50"]);

    assert_eq!(result.unwrap_err().info.detail, "stream closed");
    assert_eq!(out, "step 1\nstep 2\n");
    assert_eq!(
        ctx.api().calls()[1],
        Call::RunLogs(
            WorkflowKind::Pipeline,
            "ingest-x1".to_string(),
            LogOptions {
                follow: true,
                lines: Some(50)
            }
        )
    );
}
