// Tests for exact substring scanning

use domainspotter_core::scan::{ScanOutcome, scan_all};

fn candidates() -> Vec<String> {
    ["example.com", "examp1e.com", "test.org", "my-example.net"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_scan_all_scenario() {
    let list: Vec<String> = ["example.com", "examp1e.com", "test.org"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(scan_all("example", &list), ScanOutcome::Matches(vec!["example.com"]));
}

#[test]
fn test_scan_all_keeps_candidate_order() {
    let list = candidates();
    assert_eq!(
        scan_all("example", &list).matches(),
        &["example.com", "my-example.net"]
    );
}

#[test]
fn test_scan_all_no_match_is_outcome() {
    let list = candidates();
    let outcome = scan_all("paypal", &list);
    assert_eq!(outcome, ScanOutcome::NoMatch);
    assert!(!outcome.is_match());
    assert!(outcome.matches().is_empty());
}

#[test]
fn test_scan_all_is_case_sensitive() {
    let list = candidates();
    assert_eq!(scan_all("EXAMPLE", &list), ScanOutcome::NoMatch);
}

#[test]
fn test_scan_all_empty_query() {
    let list = candidates();
    assert_eq!(scan_all("", &list), ScanOutcome::NoMatch);
}

#[test]
fn test_scan_all_results_are_subset_containing_query() {
    let list = candidates();
    for query in ["e", ".com", "exa", "org", "-"] {
        for found in scan_all(query, &list).matches() {
            assert!(list.iter().any(|c| c == found));
            assert!(found.contains(query));
        }
    }
}

#[test]
fn test_scan_all_is_idempotent() {
    let list = candidates();
    assert_eq!(scan_all("com", &list), scan_all("com", &list));
}

#[test]
fn test_scan_all_keeps_duplicates() {
    let list = vec!["dup.com".to_string(), "dup.com".to_string()];
    assert_eq!(scan_all("dup", &list).len(), 2);
}

#[test]
fn test_batch_continues_after_no_match() {
    let list = candidates();
    let queries = ["paypal", "test", "example"];
    let counts: Vec<usize> = queries.iter().map(|q| scan_all(q, &list).len()).collect();
    assert_eq!(counts, vec![0, 1, 2]);
}
