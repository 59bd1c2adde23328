//! Approximate string matching with a minimum-confidence cutoff

/// Similarity score between a query and one candidate, on a 0..=100 scale.
pub trait Scorer: Send + Sync {
    fn score(&self, query: &str, candidate: &str) -> u8;
}

/// Default scorer: weighted blend of edit-distance ratios.
///
/// A candidate whose words appear as a contiguous whole-word run inside the
/// query scores 100. Otherwise the best of the plain ratio, the token-sort
/// ratio (x0.95) and, for strings of clearly different length, the best
/// window ("partial") ratio (x0.9).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

/// Length ratio above which the partial ratio is considered
const PARTIAL_LENGTH_RATIO: f64 = 1.5;
const TOKEN_SORT_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.9;

impl Scorer for WeightedRatio {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        if query.is_empty() || candidate.is_empty() {
            return 0;
        }
        if query == candidate || contains_phrase(query, candidate) {
            return 100;
        }

        let mut best = ratio(query, candidate);
        best = best.max(token_sort_ratio(query, candidate) * TOKEN_SORT_SCALE);

        let (shorter, longer) = if query.chars().count() <= candidate.chars().count() {
            (query, candidate)
        } else {
            (candidate, query)
        };
        let short_len = shorter.chars().count() as f64;
        let long_len = longer.chars().count() as f64;
        if long_len / short_len >= PARTIAL_LENGTH_RATIO {
            best = best.max(partial_ratio(shorter, longer) * PARTIAL_SCALE);
        }

        best.round().clamp(0.0, 100.0) as u8
    }
}

/// Return the index and score of the best candidate scoring at least `cutoff`.
///
/// Ties keep the first candidate seen.
pub fn best_match<'a, S, I>(scorer: &S, query: &str, candidates: I, cutoff: u8) -> Option<(usize, u8)>
where
    S: Scorer + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    if query.is_empty() {
        return None;
    }

    let mut best: Option<(usize, u8)> = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        let score = scorer.score(query, candidate);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }

    best.filter(|&(_, score)| score >= cutoff)
}

/// Split into words with surrounding punctuation removed
fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Whether all words of `phrase` occur consecutively in `text`
fn contains_phrase(text: &str, phrase: &str) -> bool {
    let haystack = words(text);
    let needle = words(phrase);
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle.as_slice())
}

/// Normalized Levenshtein similarity as a percentage
fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let sorted = |s: &str| {
        let mut w = words(s);
        w.sort_unstable();
        w.join(" ")
    };
    ratio(&sorted(a), &sorted(b))
}

/// Best ratio of `shorter` against every equal-length window of `longer`
fn partial_ratio(shorter: &str, longer: &str) -> f64 {
    let long_chars: Vec<char> = longer.chars().collect();
    let width = shorter.chars().count();
    if width == 0 || width > long_chars.len() {
        return ratio(shorter, longer);
    }

    long_chars
        .windows(width)
        .map(|window| {
            let window: String = window.iter().collect();
            ratio(shorter, &window)
        })
        .fold(0.0, f64::max)
}
