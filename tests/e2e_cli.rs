//! End-to-end runs of the `tb` binary: offline commands, config errors,
//! and client commands against a live test server.

mod common;

use common::cli::{TbWorkspace, extract_json_payload, run_tb, tb_command};
use common::{TestServer, fixtures};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

fn json_of(stdout: &str) -> Value {
    serde_json::from_str(&extract_json_payload(stdout)).expect("json output")
}

/// Run `tb` from inside a multi-threaded test without starving the server.
fn run_blocking(workspace: &TbWorkspace, args: &[&str], label: &str) -> common::cli::TbRun {
    tokio::task::block_in_place(|| run_tb(workspace, args, label))
}

// ============================================================================
// OFFLINE
// ============================================================================

#[test]
fn e2e_schema_task() {
    let _log = common::test_log("e2e_schema_task");
    let workspace = TbWorkspace::new();
    let run = run_tb(&workspace, ["schema", "task"], "schema_task");
    assert!(run.status.success(), "schema failed: {}", run.stderr);

    let schema = json_of(&run.stdout);
    assert_eq!(schema["title"], "Task");
    assert!(schema["properties"]["isCompleted"].is_object());
}

#[test]
fn e2e_schema_defaults_to_all() {
    let workspace = TbWorkspace::new();
    let run = run_tb(&workspace, ["schema"], "schema_all");
    assert!(run.status.success());
    let schema = json_of(&run.stdout);
    for key in ["Task", "TaskInput", "PaginatedResult", "ApiError"] {
        assert!(schema.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn e2e_completions_bash() {
    let workspace = TbWorkspace::new();
    tb_command(&workspace)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_tb").and(predicate::str::contains("--server-url")));
}

#[test]
fn e2e_completions_to_file() {
    let workspace = TbWorkspace::new();
    let out = workspace.root.join("_tb");
    let out_arg = out.to_string_lossy().to_string();
    let run = run_tb(
        &workspace,
        ["completions", "zsh", "-o", out_arg.as_str()],
        "completions_file",
    );
    assert!(run.status.success());
    assert!(run.stderr.contains("Generated zsh completions"));
    assert!(predicate::path::exists().eval(&out));
    assert!(predicate::str::contains("tb").eval(&fs::read_to_string(&out).unwrap()));
}

#[test]
fn e2e_invalid_project_config_exits_7() {
    let workspace = TbWorkspace::new();
    fs::write(workspace.root.join("taskboard.yaml"), "port: not-a-port\n").unwrap();

    tb_command(&workspace)
        .arg("list")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("CONFIG_ERROR"));
}

#[test]
fn e2e_missing_explicit_config_exits_7() {
    let workspace = TbWorkspace::new();
    let run = run_tb(
        &workspace,
        ["--config", "nowhere.yaml", "schema"],
        "missing_config",
    );
    assert_eq!(run.exit_code(), Some(7));
}

#[test]
fn e2e_unreachable_server_exits_5() {
    let workspace = TbWorkspace::new();
    let run = run_tb(
        &workspace,
        ["--server-url", "http://127.0.0.1:9", "list"],
        "unreachable",
    );
    assert_eq!(run.exit_code(), Some(5), "stderr: {}", run.stderr);
}

#[test]
fn e2e_blank_title_exits_4_without_a_server() {
    let workspace = TbWorkspace::new();
    tb_command(&workspace)
        .args(["--server-url", "http://127.0.0.1:9", "add", "   "])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("VALIDATION_ERROR"))
        .stdout(predicate::str::is_empty());
}

// ============================================================================
// AGAINST A SERVER
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn e2e_add_list_done_purge() {
    let _log = common::test_log("e2e_add_list_done_purge");
    let server = TestServer::start(common::seeded_state(Vec::new())).await;
    let url = server.base_url.clone();
    let workspace = TbWorkspace::new();

    let run = run_blocking(
        &workspace,
        &["--server-url", &url, "--json", "add", "Buy milk", "-d", "2 litres"],
        "add",
    );
    assert!(run.status.success(), "add failed: {}", run.stderr);
    let created = json_of(&run.stdout);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["isCompleted"], false);

    run_blocking(&workspace, &["--server-url", &url, "add", "Walk dog"], "add_second");

    let run = run_blocking(&workspace, &["--server-url", &url, "--json", "list"], "list");
    assert!(run.status.success(), "list failed: {}", run.stderr);
    let listed = json_of(&run.stdout);
    assert_eq!(listed["pagination"]["totalCount"], 2);
    assert_eq!(listed["tasks"][0]["title"], "Walk dog");
    assert_eq!(listed["view"], "page=1&pageSize=10");

    let run = run_blocking(&workspace, &["--server-url", &url, "done", &id], "done");
    assert!(run.status.success(), "done failed: {}", run.stderr);
    assert!(run.stdout.contains("✓"));

    let run = run_blocking(
        &workspace,
        &["--server-url", &url, "list", "--filter", "completed"],
        "list_completed",
    );
    assert!(run.stdout.contains("Buy milk"));
    assert!(!run.stdout.contains("Walk dog"));
    assert!(run.stdout.contains("Page 1 of 1 (1 task)"));

    let run = run_blocking(&workspace, &["--server-url", &url, "--json", "purge"], "purge");
    assert!(run.status.success(), "purge failed: {}", run.stderr);
    assert_eq!(json_of(&run.stdout)["message"], "Deleted 1 completed task(s)");

    let remaining = server.state.service().await.all_tasks().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Walk dog");

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn e2e_list_search_and_view() {
    let server = TestServer::start(common::seeded_state(fixtures::numbered_tasks(12))).await;
    let url = server.base_url.clone();
    let workspace = TbWorkspace::new();

    let run = run_blocking(
        &workspace,
        &["--server-url", &url, "--json", "list", "--view", "page=2&pageSize=5"],
        "list_view",
    );
    let listed = json_of(&run.stdout);
    assert_eq!(listed["pagination"]["currentPage"], 2);
    assert_eq!(listed["tasks"][0]["title"], "task-06");

    let run = run_blocking(
        &workspace,
        &["--server-url", &url, "list", "--search", "task-1"],
        "list_search",
    );
    assert!(run.status.success());
    assert!(run.stdout.contains("task-11"));
    assert!(run.stdout.contains("task-10"));
    assert!(run.stdout.contains("Search: \"task-1\""));

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn e2e_show_and_errors() {
    let task = fixtures::task_with_description("Inspect me", "line one\nline two", 0);
    let id = task.id.to_string();
    let server = TestServer::start(common::seeded_state([task])).await;
    let url = server.base_url.clone();
    let workspace = TbWorkspace::new();

    let run = run_blocking(&workspace, &["--server-url", &url, "show", &id], "show");
    assert!(run.status.success(), "show failed: {}", run.stderr);
    assert!(run.stdout.contains("Inspect me"));
    assert!(run.stdout.contains("  line two"));

    let missing = "00000000-0000-4000-8000-000000000000";
    let run = run_blocking(&workspace, &["--server-url", &url, "show", missing], "show_missing");
    assert_eq!(run.exit_code(), Some(3), "stderr: {}", run.stderr);

    let run = run_blocking(&workspace, &["--server-url", &url, "delete", "nope"], "bad_id");
    assert_eq!(run.exit_code(), Some(3));

    let run = run_blocking(&workspace, &["--server-url", &url, "purge"], "purge_none");
    assert!(run.status.success());

    let run = run_blocking(
        &workspace,
        &["--server-url", &url, "edit", &id, "--title", "Renamed"],
        "edit",
    );
    assert!(run.status.success(), "edit failed: {}", run.stderr);
    let stored = server.state.service().await.all_tasks().unwrap();
    assert_eq!(stored[0].title, "Renamed");
    assert_eq!(stored[0].description, "line one\nline two");

    server.stop().await;
}
