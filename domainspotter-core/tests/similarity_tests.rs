// Tests for similarity metrics

use domainspotter_core::similarity::{
    Processor, Query, Scorer, default_process, partial_ratio, ratio, token_set_ratio,
    token_sort_ratio, weighted_ratio,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.01
}

// ============================================================================
// ratio
// ============================================================================

#[test]
fn test_ratio_identical_is_100() {
    assert!(approx(ratio("example.com", "example.com"), 100.0));
}

#[test]
fn test_ratio_disjoint_is_0() {
    assert!(approx(ratio("abc", "xyz"), 0.0));
}

#[test]
fn test_ratio_known_values() {
    // lcs 6, lengths 6 + 11
    assert!(approx(ratio("exampl", "example.com"), 200.0 * 6.0 / 17.0));
    // lcs 5
    assert!(approx(ratio("exampl", "examp1e.com"), 200.0 * 5.0 / 17.0));
}

#[test]
fn test_ratio_is_symmetric() {
    let pairs = [("paypal", "paypa1.com"), ("amazon", "arnazon-support.net"), ("a", "ba")];
    for (a, b) in pairs {
        assert!(approx(ratio(a, b), ratio(b, a)));
    }
}

#[test]
fn test_ratio_is_case_sensitive() {
    assert!(ratio("Example", "example") < 100.0);
}

// ============================================================================
// Processing
// ============================================================================

#[test]
fn test_default_process_normalizes_domains() {
    assert_eq!(default_process("PayPal.com"), "paypal com");
    assert_eq!(default_process("secure-LOGIN_paypal.net"), "secure login paypal net");
    assert_eq!(default_process("  Example  "), "example");
}

#[test]
fn test_processed_text_scores_case_insensitively() {
    let upper = Processor::Normalize.apply("PAYPAL");
    let candidate = Processor::Normalize.apply("paypal.com");
    assert!(approx(weighted_ratio(&upper, &candidate), weighted_ratio("paypal", "paypal com")));
    assert!(approx(weighted_ratio(&upper, &candidate), 90.0));
    assert_eq!(weighted_ratio("PAYPAL", "paypal.com"), 0.0);
}

#[test]
fn test_empty_strings_score_zero() {
    assert_eq!(ratio("", "example.com"), 0.0);
    assert_eq!(ratio("example", ""), 0.0);
    assert_eq!(partial_ratio("", ""), 0.0);
    assert_eq!(weighted_ratio("", "a"), 0.0);
}

// ============================================================================
// partial_ratio
// ============================================================================

#[test]
fn test_partial_ratio_substring_is_100() {
    assert!(approx(partial_ratio("paypal", "secure-paypal-login.com"), 100.0));
    assert!(approx(partial_ratio("secure-paypal-login.com", "paypal"), 100.0));
}

#[test]
fn test_partial_ratio_one_substitution() {
    // the 5-byte prefix window "examp" beats any full-length window
    assert!(approx(partial_ratio("exampl", "examp1e.com"), 200.0 * 5.0 / 11.0));
}

#[test]
fn test_partial_ratio_edge_window() {
    // prefix of the needle only appears at the very end of the haystack
    let score = partial_ratio("comxyz", "example.com");
    assert!(approx(score, 200.0 * 3.0 / 9.0));
}

#[test]
fn test_partial_ratio_at_least_ratio() {
    let pairs = [("bank", "bankofamerica-verify.com"), ("apple", "app1e-id.org")];
    for (a, b) in pairs {
        assert!(partial_ratio(a, b) + 1e-9 >= ratio(a, b));
    }
}

// ============================================================================
// token_sort_ratio / weighted_ratio
// ============================================================================

#[test]
fn test_token_sort_ignores_token_order() {
    assert!(approx(token_sort_ratio("login secure", "secure login"), 100.0));
    assert!(ratio("login secure", "secure login") < 100.0);
}

#[test]
fn test_token_sort_single_token_equals_ratio() {
    assert!(approx(token_sort_ratio("exampl", "example.com"), ratio("exampl", "example.com")));
}

#[test]
fn test_token_set_subset_is_100() {
    assert!(approx(token_set_ratio("secure paypal", "paypal secure login"), 100.0));
    assert!(approx(token_set_ratio("paypal paypal", "paypal"), 100.0));
}

#[test]
fn test_token_set_partial_overlap() {
    // best of "paypal" against "paypal login" and "paypal verify"
    assert!(approx(token_set_ratio("paypal login", "paypal verify"), 200.0 * 6.0 / 18.0));
}

#[test]
fn test_token_set_disjoint_falls_back_to_ratio() {
    assert!(approx(token_set_ratio("exampl", "test.org"), ratio("exampl", "test.org")));
    assert_eq!(token_set_ratio("   ", "example"), 0.0);
}

#[test]
fn test_weighted_ratio_uses_token_set() {
    // similar lengths, one token set contains the other: 100 * 0.95
    assert!(approx(weighted_ratio("secure paypal", "paypal secure login"), 95.0));
}

#[test]
fn test_weighted_ratio_scales_partial_match() {
    // length ratio 11/6 >= 1.5, so partial score is scaled by 0.9
    assert!(approx(weighted_ratio("exampl", "example.com"), 90.0));
    assert!(approx(weighted_ratio("exampl", "examp1e.com"), 0.9 * 200.0 * 5.0 / 11.0));
}

#[test]
fn test_weighted_ratio_similar_lengths_uses_ratio() {
    assert!(approx(weighted_ratio("exampl", "test.org"), ratio("exampl", "test.org")));
}

#[test]
fn test_weighted_ratio_very_different_lengths() {
    // length ratio >= 8 scales partial matches by 0.6
    let long = "ab-aaaaaaaaaaaaaaaaaaaa.com";
    assert!(approx(weighted_ratio("ab", long), 60.0));
}

#[test]
fn test_scores_within_bounds() {
    let query = Query::new("micros0ft");
    let candidates = ["microsoft.com", "m.com", "micros0ft-office365-login.xyz", "zzz"];
    for scorer in [
        Scorer::Ratio,
        Scorer::Partial,
        Scorer::TokenSort,
        Scorer::TokenSet,
        Scorer::Weighted,
    ] {
        for candidate in candidates {
            let score = scorer.score(&query, candidate);
            assert!((0.0..=100.0).contains(&score), "{:?} {} {}", scorer, candidate, score);
        }
    }
}

// ============================================================================
// Scorer helpers
// ============================================================================

#[test]
fn test_scorer_from_str() {
    assert_eq!(Scorer::from_str("ratio"), Some(Scorer::Ratio));
    assert_eq!(Scorer::from_str("partial"), Some(Scorer::Partial));
    assert_eq!(Scorer::from_str("token-sort"), Some(Scorer::TokenSort));
    assert_eq!(Scorer::from_str("token_set"), Some(Scorer::TokenSet));
    assert_eq!(Scorer::from_str("WRatio"), Some(Scorer::Weighted));
    assert_eq!(Scorer::from_str("jaro"), None);
}

#[test]
fn test_scorer_default_is_weighted() {
    assert_eq!(Scorer::default(), Scorer::Weighted);
}

#[test]
fn test_score_with_cutoff_drops_low_scores() {
    let query = Query::new("exampl");
    assert!(Scorer::Ratio.score_with_cutoff(&query, "test.org", 50.0).is_none());
    assert!(Scorer::Ratio.score_with_cutoff(&query, "example.com", 50.0).is_some());
}

#[test]
fn test_score_with_cutoff_length_bound_agrees_with_score() {
    let query = Query::new("ab");
    let long = "a".repeat(40);
    // bound 200*2/42 < 10, so skipped before scoring
    assert!(Scorer::Ratio.score_with_cutoff(&query, &long, 10.0).is_none());
    assert!(Scorer::Ratio.score(&query, &long) < 10.0);
}
