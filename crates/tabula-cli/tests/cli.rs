//! CLI integration tests against a mock API server.
//!
//! Each test runs the built binary with a temporary secrets file and an
//! isolated HOME, so no real credentials or config are touched.

mod common;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{cli_command, run_cli, write_secrets};

fn api_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}/v0", server.address().port())
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn stdout_lines(output: &std::process::Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
        .collect()
}

#[test]
fn test_missing_token_fails() {
    let dir = TempDir::new().unwrap();
    let secrets = write_secrets(dir.path(), json!({"base_id": "appBase"}));

    let output = cli_command(&["--secrets", secrets.to_str().unwrap(), "bases"], dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("personal_access_token"), "stderr: {}", stderr);
}

#[test]
fn test_missing_secrets_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");

    let output = cli_command(&["--secrets", missing.to_str().unwrap(), "bases"], dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    let output = cli_command(&["--version"], dir.path()).output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("tabula "));
}

#[tokio::test]
async fn test_bases_prints_one_line_per_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/meta/bases"))
        .and(header("authorization", "Bearer patCli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bases": [
                {"id": "appOne", "name": "One", "permissionLevel": "create"},
                {"id": "appTwo", "name": "Two", "permissionLevel": "read"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let secrets = write_secrets(dir.path(), json!({"personal_access_token": "patCli"}));
    let url = api_url(&server);

    let output = run_cli(
        args(&["--secrets", secrets.to_str().unwrap(), "--api-url", &url, "bases"]),
        dir.path().to_path_buf(),
    )
    .await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["id"], "appTwo");
    assert_eq!(lines[1]["permissionLevel"], "read");
}

#[tokio::test]
async fn test_query_uses_secret_defaults_and_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/appBase/Tasks"))
        .and(query_param("maxRecords", "5"))
        .and(query_param("sort[0][field]", "Due"))
        .and(query_param("sort[0][direction]", "desc"))
        .and(query_param("recordMetadata[]", "commentCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {"id": "rec1", "createdTime": "2024-01-01T00:00:00.000Z", "fields": {"Name": "Write", "Due": "2024-02-01"}},
                {"id": "rec2", "createdTime": "2024-01-01T00:00:00.000Z", "fields": {"Name": "Plan"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let secrets = write_secrets(
        dir.path(),
        json!({"personal_access_token": "patCli", "base_id": "appBase", "table_id": "Tasks"}),
    );
    let url = api_url(&server);

    let output = run_cli(
        args(&[
            "--secrets",
            secrets.to_str().unwrap(),
            "--api-url",
            &url,
            "query",
            "--max-records",
            "5",
            "--sort",
            "Due:desc",
            "--param",
            "recordMetadata[]=commentCount",
        ]),
        dir.path().to_path_buf(),
    )
    .await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_lines(&output),
        vec![
            json!({"Name": "Write", "Due": "2024-02-01"}),
            json!({"Name": "Plan", "Due": null}),
        ]
    );
}

#[tokio::test]
async fn test_query_without_table_fails_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let secrets = write_secrets(
        dir.path(),
        json!({"personal_access_token": "patCli", "base_id": "appBase"}),
    );
    let url = api_url(&server);

    let output = run_cli(
        args(&["--secrets", secrets.to_str().unwrap(), "--api-url", &url, "query"]),
        dir.path().to_path_buf(),
    )
    .await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("table_id"));
}

#[tokio::test]
async fn test_links_resolves_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/meta/bases/appBase/tables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tables": [
                {
                    "id": "tblProjects000001",
                    "name": "Projects",
                    "fields": [{
                        "id": "fldTasks000000001",
                        "name": "Tasks",
                        "type": "multipleRecordLinks",
                        "options": {"linkedTableId": "tblTasks000000001", "isReversed": false}
                    }]
                },
                {
                    "id": "tblTasks000000001",
                    "name": "Tasks",
                    "fields": [{"id": "fldName0000000001", "name": "Name", "type": "singleLineText"}]
                }
            ]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let secrets = write_secrets(dir.path(), json!({"personal_access_token": "patCli"}));
    let url = api_url(&server);

    let output = run_cli(
        args(&[
            "--secrets",
            secrets.to_str().unwrap(),
            "--api-url",
            &url,
            "links",
            "--base",
            "appBase",
        ]),
        dir.path().to_path_buf(),
    )
    .await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_lines(&output),
        vec![json!({"from": "Tasks", "to": "Projects", "fields": ["Tasks"]})]
    );
}
