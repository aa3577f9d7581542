use regex::Regex;
use std::sync::OnceLock;

const OR_DELIMITER: &str = " or ";
const OR_WORD: &str = "or";

static QUOTED_PHRASE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedQuery {
    pub exact_phrases: Vec<String>,
    pub or_groups: Vec<Vec<String>>,
    pub excluded_terms: Vec<String>,
    pub starts_with_token: Option<String>,
}

impl ParsedQuery {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }

        let lowered_raw = raw.to_lowercase();
        let query = lowered_raw.trim();

        let mut exact_phrases = Vec::new();
        for captures in quoted_phrase_regex().captures_iter(query) {
            if let Some(phrase) = captures.get(1) {
                push_unique(&mut exact_phrases, phrase.as_str());
            }
        }
        let stripped = quoted_phrase_regex().replace_all(query, "");
        let remaining = stripped.trim();

        let mut or_groups: Vec<Vec<String>> = Vec::new();
        let mut excluded_terms = Vec::new();

        if !remaining.is_empty() {
            for segment in remaining.split(OR_DELIMITER) {
                let mut group = Vec::new();
                for token in segment.split_whitespace() {
                    match negated_term(token) {
                        Some(term) => push_unique(&mut excluded_terms, term),
                        None => group.push(token.to_string()),
                    }
                }
                if !group.is_empty() {
                    or_groups.push(group);
                }
            }
        }

        // Re-reads the raw text with quotes still in place.
        if or_groups.is_empty() && exact_phrases.is_empty() {
            let mut group = Vec::new();
            for token in lowered_raw.split_whitespace() {
                if let Some(term) = negated_term(token) {
                    push_unique(&mut excluded_terms, term);
                } else if token != OR_WORD {
                    group.push(token.to_string());
                }
            }
            if !group.is_empty() {
                or_groups.push(group);
            }
        }

        let starts_with_token = or_groups
            .first()
            .and_then(|group| group.first().cloned())
            .or_else(|| {
                exact_phrases
                    .first()
                    .and_then(|phrase| phrase.split_whitespace().next())
                    .map(str::to_string)
            });

        Some(Self {
            exact_phrases,
            or_groups,
            excluded_terms,
            starts_with_token,
        })
    }

    // `lowered` must already be lowercase.
    pub fn matches(&self, lowered_entry: &str) -> bool {
        if self
            .excluded_terms
            .iter()
            .any(|term| lowered_entry.contains(term.as_str()))
        {
            return false;
        }

        if !self
            .exact_phrases
            .iter()
            .all(|phrase| lowered_entry.contains(phrase.as_str()))
        {
            return false;
        }

        self.or_groups.is_empty()
            || self.or_groups.iter().any(|group| {
                group
                    .iter()
                    .all(|term| lowered_entry.contains(term.as_str()))
            })
    }

    pub fn ranks_first(&self, lowered_entry: &str) -> bool {
        match self.starts_with_token.as_deref() {
            Some(token) if !token.is_empty() => lowered_entry.starts_with(token),
            _ => false,
        }
    }
}

fn quoted_phrase_regex() -> &'static Regex {
    QUOTED_PHRASE.get_or_init(|| {
        Regex::new(r#""([^"]+)""#).expect("quoted phrase pattern should compile")
    })
}

fn negated_term(token: &str) -> Option<&str> {
    if token.len() > 1 {
        token.strip_prefix('-')
    } else {
        None
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::ParsedQuery;

    fn parse(raw: &str) -> ParsedQuery {
        ParsedQuery::parse(raw).expect("query should not be blank")
    }

    #[test]
    fn blank_query_has_no_criteria() {
        assert!(ParsedQuery::parse("").is_none());
        assert!(ParsedQuery::parse("  \t ").is_none());
    }

    #[test]
    fn parses_phrases_groups_and_exclusions() {
        let parsed = parse(r#""Machine Learning" Rust or Go -ai"#);
        assert_eq!(parsed.exact_phrases, vec!["machine learning".to_string()]);
        assert_eq!(
            parsed.or_groups,
            vec![vec!["rust".to_string()], vec!["go".to_string()]]
        );
        assert_eq!(parsed.excluded_terms, vec!["ai".to_string()]);
        assert_eq!(parsed.starts_with_token.as_deref(), Some("rust"));
    }

    #[test]
    fn terms_within_segment_form_one_group() {
        let parsed = parse("buy milk or call alice");
        assert_eq!(
            parsed.or_groups,
            vec![
                vec!["buy".to_string(), "milk".to_string()],
                vec!["call".to_string(), "alice".to_string()],
            ]
        );
    }

    #[test]
    fn uppercase_or_is_a_delimiter_after_lowercasing() {
        let parsed = parse("hello OR world");
        assert_eq!(parsed.or_groups.len(), 2);
    }

    #[test]
    fn lone_dash_is_a_positive_term() {
        let parsed = parse("a - b");
        assert_eq!(
            parsed.or_groups,
            vec![vec!["a".to_string(), "-".to_string(), "b".to_string()]]
        );
        assert!(parsed.excluded_terms.is_empty());
    }

    #[test]
    fn phrase_only_query_takes_start_token_from_phrase() {
        let parsed = parse(r#""New York" -"#);
        assert_eq!(parsed.exact_phrases, vec!["new york".to_string()]);
        assert_eq!(parsed.or_groups, vec![vec!["-".to_string()]]);

        let parsed = parse(r#""New York""#);
        assert!(parsed.or_groups.is_empty());
        assert_eq!(parsed.starts_with_token.as_deref(), Some("new"));
    }

    #[test]
    fn unbalanced_quote_is_an_ordinary_character() {
        let parsed = parse(r#""hello world"#);
        assert!(parsed.exact_phrases.is_empty());
        assert_eq!(
            parsed.or_groups,
            vec![vec!["\"hello".to_string(), "world".to_string()]]
        );
        assert_eq!(parsed.starts_with_token.as_deref(), Some("\"hello"));
    }

    #[test]
    fn empty_quote_pair_is_not_a_phrase() {
        let parsed = parse(r#""" note"#);
        assert!(parsed.exact_phrases.is_empty());
        assert_eq!(
            parsed.or_groups,
            vec![vec!["\"\"".to_string(), "note".to_string()]]
        );
    }

    #[test]
    fn segment_with_only_exclusions_is_dropped_but_exclusions_kept() {
        let parsed = parse("alpha or -beta");
        assert_eq!(parsed.or_groups, vec![vec!["alpha".to_string()]]);
        assert_eq!(parsed.excluded_terms, vec!["beta".to_string()]);
    }

    // The fallback path re-tokenizes the raw text; with only negations it
    // contributes nothing beyond the exclusions and discards bare `or` words.
    #[test]
    fn all_negative_query_falls_back_to_raw_tokens() {
        let parsed = parse("-Foo or -BAR");
        assert!(parsed.or_groups.is_empty());
        assert!(parsed.exact_phrases.is_empty());
        assert_eq!(
            parsed.excluded_terms,
            vec!["foo".to_string(), "bar".to_string()]
        );
        assert!(parsed.starts_with_token.is_none());
    }

    #[test]
    fn matching_is_substring_based() {
        let parsed = parse(r#""machine learning" -ai"#);
        assert!(parsed.matches("intro to machine learning"));
        assert!(!parsed.matches("machine learning with ai"));
        assert!(!parsed.matches("machine-learning"));
    }

    #[test]
    fn ranks_first_uses_prefix_of_start_token() {
        let parsed = parse("call");
        assert!(parsed.ranks_first("call alice"));
        assert!(!parsed.ranks_first("alice called"));
    }
}
