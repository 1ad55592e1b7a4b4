//! Parsing of the model's free-text interpretation
//!
//! The model is asked to answer with three labeled sections, but its output
//! is best-effort: markers go missing, number lines come back malformed.
//! `parse` therefore never fails. A missing section becomes a placeholder
//! string and missing or invalid number sets are replaced with freshly
//! generated ones, so the caller always gets a complete, display-ready
//! result.

use crate::lotto::{self, NumberSet};
use rand::Rng;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const EASTERN_MARKER: &str = "[동양적 관점]";
pub const WESTERN_MARKER: &str = "[서양적 관점]";
pub const LOTTO_MARKER: &str = "[로또 번호]";

/// Shown when a section marker is absent from the response.
pub const MISSING_SECTION: &str = "해석을 불러오지 못했습니다.";

/// Every interpretation carries exactly this many number sets.
pub const SET_COUNT: usize = 5;

/// Structured result of one interpretation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub eastern: String,
    pub western: String,
    pub sets: Vec<NumberSet>,
}

// Matches lines like "1세트: 3, 12, 19, 27, 33, 41" after the lotto marker.
// The capture stays on one line so a short set cannot swallow the next one.
fn set_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*\d+\s*세트\s*[:：][ \t]*([0-9,. \t]+)").unwrap())
}

/// Parse a raw model response, padding with thread-local randomness.
pub fn parse(raw: &str) -> Interpretation {
    parse_with(raw, &mut rand::thread_rng())
}

/// Parse a raw model response. Deterministic for a deterministic `rng`:
/// the matched prefix of the sets never depends on the random source.
pub fn parse_with<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> Interpretation {
    let eastern = section(raw, EASTERN_MARKER, &[WESTERN_MARKER, LOTTO_MARKER]);
    let western = section(raw, WESTERN_MARKER, &[LOTTO_MARKER]);

    let mut sets: Vec<NumberSet> = Vec::with_capacity(SET_COUNT);
    if let Some(idx) = raw.find(LOTTO_MARKER) {
        let tail = &raw[idx + LOTTO_MARKER.len()..];
        for caps in set_line().captures_iter(tail) {
            if sets.len() == SET_COUNT {
                break;
            }
            let values: Vec<u8> = caps[1]
                .split(|c: char| !c.is_ascii_digit())
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            if let Some(set) = NumberSet::from_values(&values) {
                sets.push(set);
            }
        }
    }
    while sets.len() < SET_COUNT {
        sets.push(lotto::generate_with(rng));
    }

    Interpretation {
        eastern,
        western,
        sets,
    }
}

/// Text between `marker` and the nearest of `stops` (or end of text).
/// A missing marker or an empty section falls back to the placeholder.
fn section(raw: &str, marker: &str, stops: &[&str]) -> String {
    let start = match raw.find(marker) {
        Some(i) => i + marker.len(),
        None => return MISSING_SECTION.to_string(),
    };
    let rest = &raw[start..];
    let end = stops
        .iter()
        .filter_map(|stop| rest.find(stop))
        .min()
        .unwrap_or(rest.len());
    let text = rest[..end].trim();
    if text.is_empty() {
        MISSING_SECTION.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parse_seeded(raw: &str) -> Interpretation {
        parse_with(raw, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_full_response() {
        let raw = "[동양적 관점]\nA\n[서양적 관점]\nB\n[로또 번호]\n1세트: 1,2,3,4,5,6\n2세트: 10, 9, 8, 7, 6, 5";
        let result = parse_seeded(raw);
        assert_eq!(result.eastern, "A");
        assert_eq!(result.western, "B");
        assert_eq!(result.sets.len(), SET_COUNT);
        assert_eq!(result.sets[0].numbers(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(result.sets[1].numbers(), &[5, 6, 7, 8, 9, 10]);
        for set in &result.sets[2..] {
            let numbers = set.numbers();
            assert!(numbers.windows(2).all(|w| w[0] < w[1]));
            assert!(numbers.iter().all(|&n| (1..=45).contains(&n)));
        }
    }

    #[test]
    fn test_missing_markers_yield_placeholders() {
        let result = parse_seeded("the model ignored the format entirely");
        assert_eq!(result.eastern, MISSING_SECTION);
        assert_eq!(result.western, MISSING_SECTION);
        assert_eq!(result.sets.len(), SET_COUNT);
    }

    #[test]
    fn test_missing_western_only() {
        let result = parse_seeded("[동양적 관점]\n용이 승천하는 길몽입니다.");
        assert_eq!(result.eastern, "용이 승천하는 길몽입니다.");
        assert_eq!(result.western, MISSING_SECTION);
    }

    #[test]
    fn test_empty_section_yields_placeholder() {
        let result = parse_seeded("[동양적 관점]\n\n[서양적 관점]\nB");
        assert_eq!(result.eastern, MISSING_SECTION);
        assert_eq!(result.western, "B");
    }

    #[test]
    fn test_sections_without_lotto_run_to_end() {
        let result = parse_seeded("[동양적 관점]\nA\n[서양적 관점]\nB의 해석\n계속되는 문장");
        assert_eq!(result.eastern, "A");
        assert_eq!(result.western, "B의 해석\n계속되는 문장");
    }

    #[test]
    fn test_short_number_lines_are_dropped_and_padded() {
        let raw = "[로또 번호]\n1세트: 1, 2, 3\n2세트: 4, 5, 6, 7, 8, 9";
        let result = parse_seeded(raw);
        assert_eq!(result.sets.len(), SET_COUNT);
        // the only valid match comes first, padding after
        assert_eq!(result.sets[0].numbers(), &[4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_extra_matches_keep_first_five() {
        let raw = "[로또 번호]\n\
                   1세트: 1, 2, 3, 4, 5, 6\n\
                   2세트: 7, 8, 9, 10, 11, 12\n\
                   3세트: 13, 14, 15, 16, 17, 18\n\
                   4세트: 19, 20, 21, 22, 23, 24\n\
                   5세트: 25, 26, 27, 28, 29, 30\n\
                   6세트: 31, 32, 33, 34, 35, 36";
        let result = parse_seeded(raw);
        assert_eq!(result.sets.len(), SET_COUNT);
        assert_eq!(result.sets[4].numbers(), &[25, 26, 27, 28, 29, 30]);
    }

    #[test]
    fn test_extra_numbers_in_a_line_are_truncated() {
        let raw = "[로또 번호]\n1세트: 1, 2, 3, 4, 5, 6, 7, 8";
        let result = parse_seeded(raw);
        assert_eq!(result.sets[0].numbers(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_fullwidth_colon_is_accepted() {
        let raw = "[로또 번호]\n1세트： 11, 22, 33, 44, 1, 2";
        let result = parse_seeded(raw);
        assert_eq!(result.sets[0].numbers(), &[1, 2, 11, 22, 33, 44]);
    }

    #[test]
    fn test_parse_is_idempotent_with_a_fixed_seed() {
        let raw = "[동양적 관점]\nA\n[서양적 관점]\nB\n[로또 번호]\n1세트: 1,2,3,4,5,6";
        let first = parse_seeded(raw);
        let second = parse_seeded(raw);
        assert_eq!(first, second);
    }
}
