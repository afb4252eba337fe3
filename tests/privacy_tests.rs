use std::sync::Arc;

use recovery_mode::capabilities::Capabilities;
use recovery_mode::models::{AppState, Core, View};
use recovery_mode::store::FileNoteStore;

const NETWORK_CRATES: &[&str] = &[
    "reqwest", "hyper", "axum", "ureq", "surf", "isahc", "tower-http", "tungstenite", "rmcp",
];

fn dependency_names(manifest: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_deps = false;

    for line in manifest.lines().map(str::trim) {
        if line.starts_with('[') {
            in_deps = line.ends_with("dependencies]");
            continue;
        }
        if in_deps && !line.is_empty() && !line.starts_with('#') {
            if let Some((name, _)) = line.split_once('=') {
                names.push(name.trim().to_string());
            }
        }
    }
    names
}

#[test]
fn test_no_network_dependencies() {
    let manifest = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
    let names = dependency_names(manifest);

    assert!(names.contains(&"serde".to_string()));
    for name in &names {
        assert!(
            !NETWORK_CRATES.iter().any(|banned| name.contains(banned)),
            "{} reaches the network",
            name
        );
    }
}

// Each `tokio = { ... }` entry, joined onto one line
fn tokio_entries(manifest: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current: Option<String> = None;

    for line in manifest.lines().map(str::trim) {
        if line.starts_with("tokio =") {
            current = Some(String::new());
        }
        if let Some(entry) = current.as_mut() {
            entry.push_str(line);
            if line.ends_with('}') {
                entries.extend(current.take());
            }
        }
    }
    entries
}

#[test]
fn test_tokio_has_no_socket_support() {
    let manifest = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
    let entries = tokio_entries(manifest);

    assert_eq!(entries.len(), 2, "runtime and dev-dependency entries");
    for entry in entries {
        assert!(entry.contains("\"process\""));
        assert!(!entry.contains("\"net\""), "tokio enables net: {}", entry);
        assert!(!entry.contains("\"full\""), "tokio enables full: {}", entry);
    }
}

fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_only_the_notes_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let core = Core::new(
        AppState::new(Arc::new(FileNoteStore::in_dir(dir.path()))),
        Capabilities::default(),
    );

    for view in View::ALL {
        core.navigate(view);
        if view == View::Rest {
            core.toggle_timer();
        }
        if view == View::Facts {
            core.next_fact();
        }
    }
    core.back();
    assert!(files_in(dir.path()).is_empty());

    core.navigate(View::Notes);
    core.add_note("private thought").unwrap();
    core.back();

    assert_eq!(files_in(dir.path()), vec!["recovery_notes.json".to_string()]);
}
