//! Scanning the fixture consumer classes

use opreg_analyzer::SourceScanner;
use opreg_common::{CompilerError, ServiceDefinition, UsageSource};
use std::path::PathBuf;

fn consumers_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/consumers")
}

#[test]
fn test_scan_fixture_persons_consumer() {
    let scanner = SourceScanner::new(consumers_dir()).unwrap();
    let persons = ServiceDefinition::new("persons", "/persons")
        .with_prefixes(["Persons"])
        .with_consumer("persons.ts");

    let used = scanner.usage(&persons).unwrap();
    for method in ["list", "create", "listFollowers", "removeFollower", "listChanges"] {
        assert!(used.contains(method), "persons.ts should use {}", method);
    }
    assert!(!used.contains("getChangelog"));
}

#[test]
fn test_scan_fixture_search_consumer() {
    let scanner = SourceScanner::new(consumers_dir()).unwrap();
    let search = ServiceDefinition::new("search", "/itemSearch")
        .with_prefixes(["ItemSearch"])
        .with_consumer("search.ts");

    let used: Vec<String> = scanner.usage(&search).unwrap().into_iter().collect();
    assert_eq!(used, vec!["byField".to_string(), "items".to_string()]);
}

#[test]
fn test_declared_consumer_missing_from_fixtures() {
    let scanner = SourceScanner::new(consumers_dir()).unwrap();
    let webhooks = ServiceDefinition::new("webhooks", "/webhooks").with_consumer("webhooks.ts");

    match scanner.usage(&webhooks).unwrap_err() {
        CompilerError::ConsumerMissing { service, path } => {
            assert_eq!(service, "webhooks");
            assert!(path.ends_with("webhooks.ts"));
        }
        other => panic!("expected ConsumerMissing, got {}", other),
    }
}

#[test]
fn test_unclaimed_fixture_sources() {
    let scanner = SourceScanner::new(consumers_dir()).unwrap();
    let services = vec![
        ServiceDefinition::new("persons", "/persons").with_consumer("persons.ts"),
        ServiceDefinition::new("deals", "/deals").with_consumer("deals.ts"),
    ];

    let unclaimed = scanner.unclaimed_sources(&services).unwrap();
    let names: Vec<String> = unclaimed
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();

    assert_eq!(names.len(), 9);
    assert!(!names.contains(&"persons.ts".to_string()));
    assert!(names.contains(&"person-fields.ts".to_string()));
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}
