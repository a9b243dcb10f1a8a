//! `describe user` and `create user-secret`.

use super::mock::{context, run, user, Call, MockPrax};
use prax::error::{ErrorInfo, ErrorKind};
use prax::models::{SecretRequest, SecretSchema};
use serde_json::json;
use std::collections::BTreeMap;

fn secret(name: &str) -> SecretSchema {
    SecretSchema {
        name: name.to_string(),
        org: Some("oceanum".to_string()),
        description: None,
    }
}

#[test]
fn test_describe_user_lists_resources() {
    let ctx = context(MockPrax {
        users: Some(Ok(vec![user(json!([
            {"name": "ingest", "resource_type": "pipelines", "org": "oceanum"},
            {"name": "db", "resource_type": "secret", "org": "oceanum"}
        ]))])),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["describe", "user"]);

    assert!(result.is_ok());
    assert!(out.contains("jdoe@example.com"));
    assert!(out.contains("tok-123"));
    assert!(out.contains("pipeline: ingest"));
    assert!(out.contains("secret: db"));
    assert!(out.contains("partners"));
}

#[test]
fn test_describe_user_empty() {
    let ctx = context(MockPrax {
        users: Some(Ok(vec![])),
        ..MockPrax::default()
    });

    let (result, out) = run(&ctx, &["describe", "user"]);

    assert!(result.is_ok());
    assert_eq!(out, "No users found!\n");
}

#[test]
fn test_create_secret_in_current_org() {
    let ctx = context(MockPrax {
        users: Some(Ok(vec![user(json!([]))])),
        secret: Some(Ok(secret("db-creds"))),
        ..MockPrax::default()
    });

    let (result, out) = run(
        &ctx,
        &[
            "create",
            "user-secret",
            "db-creds",
            "--description",
            "database",
            "-d",
            "user=admin",
            "-d",
            "password=s3=cr3t",
        ],
    );

    assert!(result.is_ok());
    let data: BTreeMap<String, String> = [("user", "admin"), ("password", "s3=cr3t")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(
        ctx.api().calls(),
        vec![
            Call::GetUsers,
            Call::CreateSecret(SecretRequest {
                name: "db-creds".to_string(),
                org: Some("oceanum".to_string()),
                description: Some("database".to_string()),
                data,
            }),
        ]
    );
    assert!(out.contains("User secret 'db-creds' created in org 'oceanum'!"));
}

#[test]
fn test_existing_secret_with_yes_updates_without_prompt() {
    let ctx = context(MockPrax {
        users: Some(Ok(vec![user(json!([
            {"name": "db-creds", "resource_type": "secret", "org": "oceanum"}
        ]))])),
        secret: Some(Ok(secret("db-creds"))),
        ..MockPrax::default()
    })
    .with_confirm(|_| panic!("prompt must not be shown with --yes"));

    let (result, out) = run(
        &ctx,
        &["create", "user-secret", "db-creds", "-d", "user=admin", "--yes"],
    );

    assert!(result.is_ok());
    assert_eq!(ctx.api().calls().len(), 2);
    assert!(out.contains("updated"));
}

#[test]
fn test_existing_secret_declined_is_not_sent() {
    let ctx = context(MockPrax {
        users: Some(Ok(vec![user(json!([
            {"name": "db-creds", "resource_type": "secret", "org": "oceanum"}
        ]))])),
        ..MockPrax::default()
    })
    .with_confirm(|_| Ok(false));

    let (result, out) = run(&ctx, &["create", "user-secret", "db-creds", "-d", "a=b"]);

    assert!(result.is_ok());
    assert_eq!(ctx.api().calls(), vec![Call::GetUsers]);
    assert!(out.contains("Aborted"));
}

#[test]
fn test_confirmation_unavailable_is_error() {
    let ctx = context(MockPrax {
        users: Some(Ok(vec![user(json!([
            {"name": "db-creds", "resource_type": "secret", "org": "oceanum"}
        ]))])),
        ..MockPrax::default()
    })
    .with_confirm(|_| Err(ErrorInfo::precondition("not a terminal, pass --yes")));

    let (result, _) = run(&ctx, &["create", "user-secret", "db-creds", "-d", "a=b"]);

    assert_eq!(result.unwrap_err().info.kind, ErrorKind::Precondition);
    assert_eq!(ctx.api().calls(), vec![Call::GetUsers]);
}

#[test]
fn test_secret_without_data_is_rejected_locally() {
    let ctx = context(MockPrax::default());

    let (result, _) = run(&ctx, &["create", "user-secret", "db-creds"]);

    assert_eq!(result.unwrap_err().info.kind, ErrorKind::Precondition);
    assert!(ctx.api().calls().is_empty());
}

#[test]
fn test_malformed_secret_data_is_rejected_locally() {
    let ctx = context(MockPrax::default());

    let (result, _) = run(&ctx, &["create", "user-secret", "db-creds", "-d", "novalue"]);

    assert_eq!(result.unwrap_err().info.kind, ErrorKind::Precondition);
    assert!(ctx.api().calls().is_empty());
}
