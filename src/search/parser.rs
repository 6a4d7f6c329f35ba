//! Free-text query parsing.
//!
//! Country names typed into the search box are pulled out of the text and
//! turned into country facet values, so "kenya hospitals" searches for
//! "hospitals" in Kenya.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::geo::COUNTRIES;

/// NFD-decompose and drop combining marks ("Côte" becomes "Cote").
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Remove every case-insensitive occurrence of `needle`. Returns `None`
/// when there was nothing to remove.
fn remove_all(haystack: &str, needle: &[char]) -> Option<String> {
    let chars: Vec<char> = haystack.chars().collect();
    if needle.is_empty() || chars.len() < needle.len() {
        return None;
    }

    let mut out = String::with_capacity(haystack.len());
    let mut found = false;
    let mut i = 0;
    while i < chars.len() {
        let end = i + needle.len();
        if end <= chars.len() && chars[i..end].iter().copied().map(fold).eq(needle.iter().copied()) {
            found = true;
            i = end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    found.then_some(out)
}

/// Known country names, accent-folded and lower-cased, longest first.
fn candidates() -> Vec<(Vec<char>, &'static str)> {
    let mut names: Vec<(String, &'static str)> = COUNTRIES
        .iter()
        .map(|c| (strip_accents(c.name).chars().map(fold).collect(), c.iso2))
        .collect();
    names.sort_by(|a, b| {
        b.0.chars()
            .count()
            .cmp(&a.0.chars().count())
            .then_with(|| a.0.cmp(&b.0))
    });
    names
        .into_iter()
        .map(|(name, iso2)| (name.chars().collect(), iso2))
        .collect()
}

/// Split a free-text query into the residual search text and the country
/// codes named in it.
///
/// Matching ignores case and accents. Longer names win over the names they
/// contain ("Nigeria" before "Niger"). Passes repeat until no known name is
/// left, so feeding the residual back in yields the same residual and no
/// codes.
pub fn extract_countries(query: &str) -> (String, Vec<String>) {
    let candidates = candidates();
    let mut text = collapse_whitespace(&strip_accents(query));
    let mut codes: Vec<String> = Vec::new();

    loop {
        let mut changed = false;
        for (name, iso2) in &candidates {
            if let Some(rest) = remove_all(&text, name) {
                text = collapse_whitespace(&rest);
                if !codes.iter().any(|c| c == iso2) {
                    codes.push((*iso2).to_string());
                }
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    (text, codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_accents() {
        assert_eq!(strip_accents("Côte d'Ivoire"), "Cote d'Ivoire");
        assert_eq!(strip_accents("São Tomé"), "Sao Tome");
        assert_eq!(strip_accents("plain"), "plain");
    }

    #[test]
    fn test_country_is_extracted_from_query() {
        let (residual, codes) = extract_countries("kenya hospitals");
        assert_eq!(residual, "hospitals");
        assert_eq!(codes, vec!["KE"]);
    }

    #[test]
    fn test_matching_ignores_case_and_accents() {
        let (residual, codes) = extract_countries("Schools in COTE D'IVOIRE and réunion");
        assert_eq!(residual, "Schools in and");
        assert!(codes.contains(&"CI".to_string()));
        assert!(codes.contains(&"RE".to_string()));
    }

    #[test]
    fn test_longest_name_wins() {
        let (residual, codes) = extract_countries("Nigeria water");
        assert_eq!(residual, "water");
        assert_eq!(codes, vec!["NG"]);

        let (_, codes) = extract_countries("Niger water");
        assert_eq!(codes, vec!["NE"]);
    }

    #[test]
    fn test_every_occurrence_is_removed() {
        let (residual, codes) = extract_countries("Kenya wells kenya roads");
        assert_eq!(residual, "wells roads");
        assert_eq!(codes, vec!["KE"]);
    }

    #[test]
    fn test_extraction_is_idempotent_on_residual() {
        for query in [
            "kenya hospitals",
            "South  Sudan health",
            "ugandakenya",
            "Democratic Republic of the Congo mining",
            "  ",
            "water",
        ] {
            let (residual, _) = extract_countries(query);
            let (again, codes) = extract_countries(&residual);
            assert_eq!(again, residual, "not idempotent for {:?}", query);
            assert!(codes.is_empty(), "residual {:?} still names a country", residual);
        }
    }

    #[test]
    fn test_plain_query_is_untouched_apart_from_whitespace() {
        let (residual, codes) = extract_countries("  clean   water ");
        assert_eq!(residual, "clean water");
        assert!(codes.is_empty());
    }
}
