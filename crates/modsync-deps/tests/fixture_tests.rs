//! Golden-file tests using test-fixtures/scenarios/
//!
//! Each scenario directory holds a plugin descriptor, a host dependency list
//! and the descriptor the merge is expected to produce.

use modsync_deps::{Error, Grammar, ReconcileOptions, compare, load, merge, render_descriptor};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;

fn scenario_dir(name: &str) -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/modsync-deps -> ../../test-fixtures
    manifest_dir.join("../../test-fixtures/scenarios").join(name)
}

fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n")
}

#[rstest]
#[case::host_requirement_wins("success", 2)]
#[case::host_replacement_added("mismatch_replace_1", 1)]
#[case::pinned_replacement_overwritten("mismatch_replace_2", 1)]
#[case::host_replacement_wins("mismatch_replace_3", 1)]
fn test_scenario_merges_to_expected(#[case] name: &str, #[case] mismatches_before: usize) {
    let dir = scenario_dir(name);
    let plugin = load(&dir.join("plugin.mod"), None).unwrap();
    let host = load(&dir.join("host.txt"), None).unwrap();
    let expected = fs::read_to_string(dir.join("expected.mod"))
        .unwrap_or_else(|e| panic!("Failed to read expected.mod for {}: {}", name, e));
    let options = ReconcileOptions::default();

    assert_eq!(compare(&plugin, &host, &options).len(), mismatches_before);

    let merged = merge(&plugin, &host);

    assert_eq!(
        normalize_line_endings(&render_descriptor(&merged)),
        normalize_line_endings(&expected)
    );
    assert!(compare(&merged, &host, &options).is_empty());
}

#[test]
fn test_malformed_host_list() {
    let dir = scenario_dir("malformed");
    let err = load(&dir.join("host.txt"), Some(Grammar::Flat)).unwrap_err();

    match err {
        Error::MalformedLine {
            line_number, line, ..
        } => {
            assert_eq!(line_number, 3);
            assert_eq!(line.trim_end(), "github.com/solo-io/bar v1.2.3 =>");
        }
        other => panic!("expected MalformedLine, got {other:?}"),
    }
}

#[test]
fn test_expected_descriptors_parse_back() {
    for name in ["success", "mismatch_replace_1", "mismatch_replace_2", "mismatch_replace_3"] {
        let dir = scenario_dir(name);
        let expected = load(&dir.join("expected.mod"), None).unwrap();
        let plugin = load(&dir.join("plugin.mod"), None).unwrap();
        let host = load(&dir.join("host.txt"), None).unwrap();

        assert_eq!(expected, merge(&plugin, &host), "scenario {name}");
    }
}
