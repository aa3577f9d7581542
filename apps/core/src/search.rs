use crate::query_dsl::ParsedQuery;

pub fn apply<S: AsRef<str>>(raw_query: &str, entries: &[S]) -> Vec<String> {
    let Some(parsed) = ParsedQuery::parse(raw_query) else {
        return entries
            .iter()
            .map(|entry| entry.as_ref().to_string())
            .collect();
    };

    apply_parsed(&parsed, entries)
}

fn apply_parsed<S: AsRef<str>>(parsed: &ParsedQuery, entries: &[S]) -> Vec<String> {
    let mut starts_with = Vec::new();
    let mut contains = Vec::new();

    for entry in entries {
        let entry = entry.as_ref();
        let lowered = entry.to_lowercase();
        if !parsed.matches(&lowered) {
            continue;
        }

        if parsed.ranks_first(&lowered) {
            starts_with.push(entry.to_string());
        } else {
            contains.push(entry.to_string());
        }
    }

    starts_with.extend(contains);
    starts_with
}

pub fn sanitize_query(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '\u{0000}'..='\u{001F}' | '\u{007F}'))
        .collect()
}

pub fn is_blank_query(raw: &str) -> bool {
    raw.trim().is_empty()
}
