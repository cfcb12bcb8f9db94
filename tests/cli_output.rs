//! Tests for CLI output formatting.
//!
//! - JSON output with --json flag serializes the wire records
//! - Pretty-print output as default

use semaphoreapi::output::PrettyPrint;
use semaphoreapi::{HookType, Semaphore, SemaphoreClient, Webhook};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_output_uses_wire_names() {
    let hook = make_test_webhook();
    let json_output = serde_json::to_string_pretty(&hook).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert!(parsed.is_object());
    assert_eq!(parsed["id"], 11);
    assert_eq!(parsed["hook_type"], "post_build");
}

#[tokio::test]
async fn test_json_output_of_project_record() {
    let mut semaphore = connect().await;
    let project = semaphore.project("semaphoreci4j").await.unwrap().unwrap();

    let parsed = serde_json::to_value(project.record()).unwrap();
    assert_eq!(parsed["hash_id"], "project-hash-id");
    assert_eq!(parsed["updated_at"], "2017-12-27T16:18:01+01:00");
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let pretty_output = make_test_webhook().pretty_print();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&pretty_output);
    assert!(
        parse_result.is_err(),
        "Default output should NOT be valid JSON"
    );
}

#[tokio::test]
async fn test_project_pretty_print_shows_key_fields() {
    let mut semaphore = connect().await;
    let project = semaphore.project("semaphoreci4j").await.unwrap().unwrap();

    let output = project.pretty_print();
    assert!(output.starts_with("Project: devfort/semaphoreci4j"));
    assert!(output.contains("project-hash-id"), "Should show hash ID");
    assert!(output.contains("Branches:       0"));
    assert!(output.contains("+01:00"), "Should keep the UTC offset");
}

#[test]
fn test_list_pretty_print_is_table() {
    // The table output from `tabled` contains column headers
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct TestRow {
        number: u64,
        result: String,
    }

    let rows = vec![
        TestRow {
            number: 35,
            result: "passed".to_string(),
        },
        TestRow {
            number: 34,
            result: "failed".to_string(),
        },
    ];

    let table_output = Table::new(rows).to_string();

    assert!(table_output.contains("number"), "Should have column headers");
    assert!(table_output.contains("result"), "Should have column headers");
}

// ============================================================================
// Test Helpers
// ============================================================================

fn make_test_webhook() -> Webhook {
    serde_json::from_value(serde_json::json!({
        "id": 11,
        "url": "https://hooks.devfort.example/semaphore",
        "hook_type": "post_build"
    }))
    .unwrap()
}

async fn connect() -> Semaphore {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": 61049,
                "hash_id": "project-hash-id",
                "name": "semaphoreci4j",
                "owner": "devfort",
                "html_url": "https://semaphoreci.com/devfort/semaphoreci4j",
                "created_at": "2017-12-27T15:45:51+01:00",
                "updated_at": "2017-12-27T16:18:01+01:00",
                "branches": []
            }
        ])))
        .mount(&server)
        .await;

    let client = SemaphoreClient::new("test-token", &server.uri()).unwrap();
    // The server drops here; the project listing is already loaded
    Semaphore::connect(client).await.unwrap()
}

#[test]
fn test_hook_type_display_matches_wire_name() {
    assert_eq!(HookType::PostDeploy.to_string(), "post_deploy");
}
