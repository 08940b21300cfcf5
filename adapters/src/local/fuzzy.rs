//! Approximate substring matching for the offline stock list.
//!
//! A pattern matches a text when some substring of the text is within
//! `threshold * pattern_len` edits of it. Scores are normalized to `0.0`
//! (exact substring) .. `1.0` (nothing in common).

use corelib::Stock;

pub const DEFAULT_THRESHOLD: f64 = 0.3;

#[derive(Clone, Debug)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Normalized distance of `pattern` to its best substring of `text`,
    /// or `None` when it is above the threshold.
    pub fn score(&self, pattern: &str, text: &str) -> Option<f64> {
        let p: Vec<char> = pattern.to_lowercase().chars().collect();
        if p.is_empty() {
            return None;
        }
        let t: Vec<char> = text.to_lowercase().chars().collect();

        let score = best_substring_distance(&p, &t) as f64 / p.len() as f64;
        (score <= self.threshold).then_some(score)
    }

    /// Best score of `query` against the ticker and the company name.
    pub fn score_stock(&self, query: &str, stock: &Stock) -> Option<f64> {
        let by_ticker = self.score(query, &stock.ticker);
        let by_name = self.score(query, &stock.company_name);

        match (by_ticker, by_name) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Matching stocks, best first; ties keep list order.
    pub fn search<'a>(&self, query: &str, stocks: &'a [Stock]) -> Vec<&'a Stock> {
        let mut hits: Vec<(f64, usize)> = stocks
            .iter()
            .enumerate()
            .filter_map(|(i, s)| self.score_stock(query, s).map(|score| (score, i)))
            .collect();

        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        hits.into_iter().map(|(_, i)| &stocks[i]).collect()
    }
}

/// Sellers' variant of edit distance: free start and end inside `text`.
fn best_substring_distance(pattern: &[char], text: &[char]) -> usize {
    // prev[j]: distance of pattern[..i] ending at text[..j]
    let mut prev = vec![0usize; text.len() + 1];
    let mut curr = vec![0usize; text.len() + 1];

    for (i, pc) in pattern.iter().enumerate() {
        curr[0] = i + 1;
        for (j, tc) in text.iter().enumerate() {
            let substitute = prev[j] + usize::from(pc != tc);
            let delete = prev[j + 1] + 1;
            let insert = curr[j] + 1;
            curr[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev.into_iter().min().unwrap_or(pattern.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_substring_scores_zero() {
        let m = FuzzyMatcher::default();
        assert_eq!(m.score("appl", "Apple Inc."), Some(0.0));
        assert_eq!(m.score("INC", "Apple Inc."), Some(0.0));
    }

    #[test]
    fn single_typo_within_threshold() {
        let m = FuzzyMatcher::default();
        let s = m.score("tesle", "Tesla Inc.").unwrap();
        assert!((s - 0.2).abs() < 1e-9);
    }

    #[test]
    fn unrelated_text_is_rejected() {
        let m = FuzzyMatcher::default();
        assert_eq!(m.score("zzzz", "Apple Inc."), None);
        assert_eq!(m.score("", "Apple Inc."), None);
    }

    #[test]
    fn text_shorter_than_pattern_counts_missing_chars() {
        assert_eq!(best_substring_distance(&['a', 'b', 'c'], &['a']), 2);
        assert_eq!(best_substring_distance(&['a'], &[]), 1);
    }

    #[test]
    fn search_orders_best_first() {
        let stocks = vec![
            Stock::new("AMZN", "Amazon.com Inc."),
            Stock::new("AAPL", "Apple Inc."),
            Stock::new("ALB", "Albert Bank"),
        ];

        let m = FuzzyMatcher::default();
        let hits = m.search("aapl", &stocks);

        assert_eq!(hits[0].ticker, "AAPL");
        assert!(hits.iter().all(|s| s.ticker != "ALB"));
    }
}
