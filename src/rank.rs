//! Ranking of candidate strings against a (possibly multi-token) query.
//!
//! Each token is matched with [`fuzzy_match`]; a candidate survives only if
//! every token matches. Scores add up and highlight ranges are unioned.

use std::cmp::Ordering;

use clap::ValueEnum;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::fuzzy::fuzzy_match;

/// How query case is interpreted.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Fold ASCII case on both sides
    Ignore,
    /// Compare characters exactly
    Respect,
    /// Case-sensitive only if the token has an upper-case letter
    #[default]
    Smart,
}

impl CaseMode {
    /// Resolve to the `case_sensitive` flag for a single token.
    pub fn is_sensitive(self, token: &str) -> bool {
        match self {
            CaseMode::Ignore => false,
            CaseMode::Respect => true,
            CaseMode::Smart => token.chars().any(|c| c.is_ascii_uppercase()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CaseMode::Ignore => "ignore",
            CaseMode::Respect => "respect",
            CaseMode::Smart => "smart",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Token {
    pattern: String,
    case_sensitive: bool,
}

/// A parsed query.
#[derive(Clone, Debug)]
pub struct Query {
    raw: String,
    tokens: Vec<Token>,
}

impl Query {
    pub fn new(raw: &str, case: CaseMode, split_tokens: bool) -> Self {
        let raw = raw.trim();
        let parts: Vec<&str> = if raw.is_empty() {
            Vec::new()
        } else if split_tokens {
            raw.split_whitespace().collect()
        } else {
            vec![raw]
        };

        let tokens = parts
            .into_iter()
            .map(|p| Token {
                pattern: p.to_string(),
                case_sensitive: case.is_sensitive(p),
            })
            .collect();

        Self {
            raw: raw.to_string(),
            tokens,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Match every token against `text` (or its selected field).
    ///
    /// Returns `None` if any token fails. Ranges are in `text` char indices.
    pub fn match_text(&self, text: &str, field: Option<&FieldSelector>) -> Option<Scored> {
        let (haystack, offset) = match field {
            Some(selector) => selector.select(text)?,
            None => (text, 0),
        };

        let mut score = 0i64;
        let mut ranges = Vec::new();
        for token in &self.tokens {
            let result = fuzzy_match(haystack, &token.pattern, token.case_sensitive);
            if !result.is_match() {
                return None;
            }
            score += result.score;
            ranges.extend(
                result
                    .matches
                    .iter()
                    .map(|&(s, e)| (s + offset, e + offset)),
            );
        }

        Some(Scored {
            score,
            matches: merge_ranges(ranges),
        })
    }
}

/// Score and highlight ranges of one candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scored {
    pub score: i64,
    pub matches: Vec<(usize, usize)>,
}

/// Restrict matching to the `nth` (1-based) field split by `delimiter`.
#[derive(Clone, Debug)]
pub struct FieldSelector {
    delimiter: Regex,
    nth: usize,
}

impl FieldSelector {
    pub fn new(delimiter: &str, nth: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            delimiter: Regex::new(delimiter)?,
            nth: nth.max(1),
        })
    }

    /// Return the selected field and its char offset within `text`.
    pub fn select<'a>(&self, text: &'a str) -> Option<(&'a str, usize)> {
        let mut field_start = 0;
        let mut field_no = 1;
        for m in self.delimiter.find_iter(text) {
            if m.start() == m.end() {
                continue;
            }
            if field_no == self.nth {
                return Some(field_at(text, field_start, m.start()));
            }
            field_start = m.end();
            field_no += 1;
        }
        (field_no == self.nth).then(|| field_at(text, field_start, text.len()))
    }
}

fn field_at(text: &str, start: usize, end: usize) -> (&str, usize) {
    (&text[start..end], text[..start].chars().count())
}

/// A candidate that survived ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ranked<'a> {
    pub index: usize,
    pub text: &'a str,
    pub score: i64,
    pub matches: Vec<(usize, usize)>,
}

/// Match and order candidates, best first.
///
/// Ties break on shorter candidate, then on original position.
pub fn rank<'a, I>(candidates: I, query: &Query, field: Option<&FieldSelector>) -> Vec<Ranked<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ranked: Vec<(usize, Ranked<'a>)> = candidates
        .into_iter()
        .enumerate()
        .filter_map(|(index, text)| {
            let scored = query.match_text(text, field)?;
            Some((
                text.chars().count(),
                Ranked {
                    index,
                    text,
                    score: scored.score,
                    matches: scored.matches,
                },
            ))
        })
        .collect();

    ranked.sort_by(|(a_len, a), (b_len, b)| compare(a, *a_len, b, *b_len));
    ranked.into_iter().map(|(_, r)| r).collect()
}

fn compare(a: &Ranked<'_>, a_len: usize, b: &Ranked<'_>, b_len: usize) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a_len.cmp(&b_len))
        .then_with(|| a.index.cmp(&b.index))
}

/// Sort ranges and coalesce any that overlap or touch.
pub fn merge_ranges(mut ranges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(ranked: &[Ranked<'_>]) -> Vec<String> {
        ranked.iter().map(|r| r.text.to_string()).collect()
    }

    #[test]
    fn smart_case_follows_uppercase() {
        assert!(!CaseMode::Smart.is_sensitive("foo"));
        assert!(CaseMode::Smart.is_sensitive("Foo"));
        assert!(CaseMode::Respect.is_sensitive("foo"));
        assert!(!CaseMode::Ignore.is_sensitive("FOO"));
    }

    #[test]
    fn query_splits_on_whitespace() {
        let q = Query::new("  auth   jwt ", CaseMode::Smart, true);
        assert_eq!(q.token_count(), 2);
        assert_eq!(q.as_str(), "auth   jwt");

        let q = Query::new("  auth   jwt ", CaseMode::Smart, false);
        assert_eq!(q.token_count(), 1);

        assert!(Query::new("   ", CaseMode::Smart, true).is_empty());
    }

    #[test]
    fn all_tokens_must_match() {
        let q = Query::new("auth jwt", CaseMode::Ignore, true);
        assert!(q.match_text("auth with jwt", None).is_some());
        assert!(q.match_text("auth only", None).is_none());
    }

    #[test]
    fn token_scores_add_up() {
        let q = Query::new("ab cd", CaseMode::Respect, true);
        let scored = q.match_text("ab cd", None).unwrap();
        let ab = fuzzy_match("ab cd", "ab", true);
        let cd = fuzzy_match("ab cd", "cd", true);
        assert_eq!(scored.score, ab.score + cd.score);
        assert_eq!(scored.matches, vec![(0, 2), (3, 5)]);
    }

    #[test]
    fn overlapping_token_ranges_merge() {
        let q = Query::new("ab bc", CaseMode::Respect, true);
        let scored = q.match_text("abc", None).unwrap();
        assert_eq!(scored.matches, vec![(0, 3)]);
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let q = Query::new("", CaseMode::Smart, true);
        let ranked = rank(["b", "a", "c"], &q, None);
        assert_eq!(texts(&ranked), vec!["b", "a", "c"]);
        assert!(ranked.iter().all(|r| r.score == 0 && r.matches.is_empty()));
    }

    #[test]
    fn rank_orders_by_score_then_length_then_index() {
        let q = Query::new("abc", CaseMode::Ignore, true);
        let candidates = ["xaxbxc", "abc-long", "abc", "zzz", "a_b_c", "abc"];
        let ranked = rank(candidates, &q, None);

        assert_eq!(texts(&ranked), vec!["abc", "abc", "abc-long", "a_b_c", "xaxbxc"]);
        assert_eq!(ranked[0].index, 2);
        assert_eq!(ranked[1].index, 5);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn smart_case_filters_candidates() {
        let q = Query::new("Bar", CaseMode::Smart, true);
        let ranked = rank(["foobar", "fooBar"], &q, None);
        assert_eq!(texts(&ranked), vec!["fooBar"]);

        let q = Query::new("bar", CaseMode::Smart, true);
        assert_eq!(rank(["foobar", "fooBar"], &q, None).len(), 2);
    }

    #[test]
    fn field_selector_picks_nth_field() {
        let sel = FieldSelector::new(r"\s*\|\s*", 2).unwrap();
        assert_eq!(sel.select("one | two | three"), Some(("two", 6)));
        assert_eq!(sel.select("only"), None);

        let last = FieldSelector::new(":", 3).unwrap();
        assert_eq!(last.select("a:b:c"), Some(("c", 4)));
        assert_eq!(last.select("a:b"), None);
    }

    #[test]
    fn field_offsets_are_char_based() {
        let sel = FieldSelector::new("/", 2).unwrap();
        assert_eq!(sel.select("héllo/wörld"), Some(("wörld", 6)));
    }

    #[test]
    fn field_matching_shifts_ranges() {
        let sel = FieldSelector::new(":", 2).unwrap();
        let q = Query::new("ab", CaseMode::Respect, true);

        let scored = q.match_text("ab:xab", Some(&sel)).unwrap();
        assert_eq!(scored.matches, vec![(4, 6)]);

        // The first field is ignored.
        assert!(q.match_text("ab:xyz", Some(&sel)).is_none());
    }

    #[test]
    fn merge_ranges_handles_unsorted_input() {
        assert_eq!(
            merge_ranges(vec![(5, 6), (0, 2), (1, 3), (3, 4), (8, 9)]),
            vec![(0, 4), (5, 6), (8, 9)]
        );
        assert!(merge_ranges(Vec::new()).is_empty());
    }
}
