//! Single-pass fuzzy matching with fzf v1 scoring.
//!
//! The matcher finds the leftmost occurrence of a pattern as a subsequence of
//! the text, shrinks that window from the right end, and scores it with
//! bonuses for:
//! - word boundaries (after a non-word character or at the start of the text)
//! - camelCase humps and letter-to-digit transitions
//! - consecutive runs of matched characters
//!
//! All indices are `char` indices into the text. Case folding is ASCII-only.

use serde::Serialize;

const SCORE_MATCH: i64 = 16;
const SCORE_GAP_START: i64 = -3;
const SCORE_GAP_EXTENSION: i64 = -1;

const BONUS_BOUNDARY: i64 = SCORE_MATCH / 2;
const BONUS_NON_WORD: i64 = SCORE_MATCH / 2;
const BONUS_CAMEL_123: i64 = BONUS_BOUNDARY + SCORE_GAP_EXTENSION;
const BONUS_CONSECUTIVE: i64 = -(SCORE_GAP_START + SCORE_GAP_EXTENSION);
const BONUS_FIRST_CHAR_MULTIPLIER: i64 = 2;

/// Character classes used for bonus computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Lower,
    Upper,
    Number,
    NonWord,
}

/// Classify a character by its code point (ASCII only).
pub fn char_class_of(c: char) -> CharClass {
    match c {
        'a'..='z' => CharClass::Lower,
        'A'..='Z' => CharClass::Upper,
        '0'..='9' => CharClass::Number,
        _ => CharClass::NonWord,
    }
}

/// Bonus for matching a character of class `current` that follows `prev`.
pub fn bonus_for_char_class(prev: CharClass, current: CharClass) -> i64 {
    if prev == CharClass::NonWord && current != CharClass::NonWord {
        BONUS_BOUNDARY
    } else if (prev == CharClass::Lower && current == CharClass::Upper)
        || (prev != CharClass::Number && current == CharClass::Number)
    {
        BONUS_CAMEL_123
    } else if current == CharClass::NonWord {
        BONUS_NON_WORD
    } else {
        0
    }
}

/// Outcome of [`fuzzy_match`].
///
/// `start`/`end` delimit the half-open window `[start, end)` holding the
/// match, or are both `-1` when the pattern does not match. `matches` holds
/// merged, ascending, half-open runs of matched characters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub start: isize,
    pub end: isize,
    pub score: i64,
    pub matches: Vec<(usize, usize)>,
}

impl MatchResult {
    /// The trivial match of an empty pattern, anchored at position 0.
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            score: 0,
            matches: Vec::new(),
        }
    }

    pub fn no_match() -> Self {
        Self {
            start: -1,
            end: -1,
            score: 0,
            matches: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.start >= 0
    }

    /// Every matched character index, in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches.iter().flat_map(|&(s, e)| s..e)
    }
}

#[inline]
fn fold(c: char, case_sensitive: bool) -> char {
    if case_sensitive {
        c
    } else {
        c.to_ascii_lowercase()
    }
}

/// Fuzzy-match `pattern` against `text`.
///
/// An empty pattern matches trivially at position 0 with score 0. When
/// `case_sensitive` is false both sides are folded with ASCII lowercasing.
pub fn fuzzy_match(text: &str, pattern: &str, case_sensitive: bool) -> MatchResult {
    if pattern.is_empty() {
        return MatchResult::empty();
    }

    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().map(|c| fold(c, case_sensitive)).collect();

    let Some((sidx, eidx)) = find_window(&text, &pattern, case_sensitive) else {
        return MatchResult::no_match();
    };

    let (score, matches) = score_window(&text, &pattern, sidx, eidx, case_sensitive);

    MatchResult {
        start: sidx as isize,
        end: eidx as isize,
        score,
        matches,
    }
}

/// Score `pattern` against `text` for ranking.
///
/// Returns `None` if the pattern does not match.
pub fn score(pattern: &str, text: &str, case_sensitive: bool) -> Option<i64> {
    let result = fuzzy_match(text, pattern, case_sensitive);
    result.is_match().then_some(result.score)
}

/// Locate the leftmost match and shrink it to the tightest window ending at
/// the same position. `pattern` must already be folded.
fn find_window(text: &[char], pattern: &[char], case_sensitive: bool) -> Option<(usize, usize)> {
    let mut pidx = 0;
    let mut sidx = None;
    let mut eidx = None;

    for (idx, &c) in text.iter().enumerate() {
        if fold(c, case_sensitive) == pattern[pidx] {
            if sidx.is_none() {
                sidx = Some(idx);
            }
            pidx += 1;
            if pidx == pattern.len() {
                eidx = Some(idx + 1);
                break;
            }
        }
    }

    let (mut sidx, eidx) = (sidx?, eidx?);

    // Walk back from the end; the last hit on pattern[0] is the tightest start.
    let mut pidx = pattern.len();
    for idx in (sidx..eidx).rev() {
        if fold(text[idx], case_sensitive) == pattern[pidx - 1] {
            pidx -= 1;
            if pidx == 0 {
                sidx = idx;
                break;
            }
        }
    }

    Some((sidx, eidx))
}

/// Score the window `[sidx, eidx)` and collect merged match ranges.
fn score_window(
    text: &[char],
    pattern: &[char],
    sidx: usize,
    eidx: usize,
    case_sensitive: bool,
) -> (i64, Vec<(usize, usize)>) {
    assert!(
        !pattern.is_empty(),
        "score_window called with an empty pattern"
    );

    let mut pidx = 0;
    let mut score = 0i64;
    let mut in_gap = false;
    let mut consecutive = 0usize;
    let mut first_bonus = 0i64;
    let mut positions = Vec::with_capacity(pattern.len());

    let mut prev_class = if sidx > 0 {
        char_class_of(text[sidx - 1])
    } else {
        CharClass::NonWord
    };

    for (idx, &c) in text.iter().enumerate().take(eidx).skip(sidx) {
        let class = char_class_of(c);

        if pidx < pattern.len() && fold(c, case_sensitive) == pattern[pidx] {
            positions.push(idx);
            score += SCORE_MATCH;

            let mut bonus = bonus_for_char_class(prev_class, class);
            if consecutive == 0 {
                first_bonus = bonus;
            } else {
                if bonus == BONUS_BOUNDARY {
                    first_bonus = bonus;
                }
                bonus = bonus.max(first_bonus).max(BONUS_CONSECUTIVE);
            }

            if pidx == 0 {
                score += bonus * BONUS_FIRST_CHAR_MULTIPLIER;
            } else {
                score += bonus;
            }

            in_gap = false;
            consecutive += 1;
            pidx += 1;
        } else {
            score += if in_gap {
                SCORE_GAP_EXTENSION
            } else {
                SCORE_GAP_START
            };
            in_gap = true;
            consecutive = 0;
            first_bonus = 0;
        }

        prev_class = class;
    }

    (score, merge_positions(&positions))
}

/// Collapse ascending positions into half-open runs.
fn merge_positions(positions: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &pos in positions {
        match ranges.last_mut() {
            Some(last) if last.1 == pos => last.1 += 1,
            _ => ranges.push((pos, pos + 1)),
        }
    }
    ranges
}
