use clip_recall_core::search::apply;

fn store() -> Vec<String> {
    ["Buy milk", "buy bread", "Call Alice", "ALICE called"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn blank_query_returns_entries_verbatim() {
    let entries = store();
    assert_eq!(apply("", &entries), entries);
    assert_eq!(apply("   \t", &entries), entries);
}

#[test]
fn single_term_matches_case_insensitively() {
    assert_eq!(apply("alice", &store()), ["ALICE called", "Call Alice"]);
}

#[test]
fn prefix_matches_rank_first() {
    assert_eq!(apply("call", &store()), ["Call Alice", "ALICE called"]);
    assert_eq!(apply("ALICE", &store()), ["ALICE called", "Call Alice"]);
}

#[test]
fn buy_ranks_both_prefix_hits_in_store_order() {
    assert_eq!(apply("buy", &store()), ["Buy milk", "buy bread"]);
}

#[test]
fn negation_alone_excludes_without_ranking() {
    let entries = vec![
        "foo bar".to_string(),
        "plain".to_string(),
        "FOOD".to_string(),
        "another".to_string(),
    ];
    assert_eq!(apply("-foo", &entries), ["plain", "another"]);
}

#[test]
fn or_groups_match_either_and_never_duplicate() {
    let entries = vec![
        "hello there".to_string(),
        "big world".to_string(),
        "hello world".to_string(),
        "nothing".to_string(),
    ];
    assert_eq!(
        apply("hello or world", &entries),
        ["hello there", "hello world", "big world"]
    );
}

#[test]
fn phrase_with_exclusion() {
    let entries = vec![
        "Intro to Machine Learning".to_string(),
        "machine learning and AI".to_string(),
        "learning machine".to_string(),
    ];
    assert_eq!(
        apply(r#""machine learning" -ai"#, &entries),
        ["Intro to Machine Learning"]
    );
}

#[test]
fn phrase_only_query_ranks_by_phrase_first_word() {
    let entries = vec![
        "visit new york".to_string(),
        "New York pizza".to_string(),
    ];
    assert_eq!(
        apply(r#""new york""#, &entries),
        ["New York pizza", "visit new york"]
    );
}

#[test]
fn group_terms_are_and_within_a_group() {
    assert_eq!(apply("buy milk", &store()), ["Buy milk"]);
    assert_eq!(apply("buy alice", &store()), Vec::<String>::new());
}

#[test]
fn unbalanced_quote_degrades_to_literal_match() {
    let entries = vec![r#"say "hi"#.to_string(), "say hi".to_string()];
    assert_eq!(apply(r#""hi"#, &entries), [r#"say "hi"#]);
}

// Known quirk: with only negated terms the raw text is re-tokenized, quotes and
// all; a bare `or` between negations is dropped rather than treated as a term.
#[test]
fn negations_joined_by_or_all_apply() {
    let entries = vec![
        "alpha".to_string(),
        "beta".to_string(),
        "or else".to_string(),
        "gamma".to_string(),
    ];
    assert_eq!(apply("-alpha or -beta", &entries), ["or else", "gamma"]);
}

#[test]
fn stray_dash_and_empty_segments_never_fail() {
    let entries = store();
    assert_eq!(apply("-", &entries), Vec::<String>::new());
    assert_eq!(apply(" or ", &entries), Vec::<String>::new());
    assert_eq!(apply(r#""""#, &entries), Vec::<String>::new());
}
