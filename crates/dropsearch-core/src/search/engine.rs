use super::{SearchMatch, Searchable};
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use tracing::trace;

/// Bonus for a query equal to the record name, ignoring case
const EXACT_BONUS: f64 = 500.0;

/// Floor of the prefix bonus, scaled up toward [`EXACT_BONUS`] by coverage
const PREFIX_BONUS: f64 = 250.0;

/// Keyword matches count for less than name matches
const KEYWORD_WEIGHT: f64 = 0.3;

/// Smart-case fuzzy matcher over prepared records.
pub struct SearchEngine {
    matcher: Matcher,
    buf: Vec<char>,
}

impl SearchEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    /// Records matching `query`, best first. Ties keep dataset order. A blank
    /// query matches nothing.
    pub fn search<'a>(&mut self, query: &str, records: &'a [Searchable]) -> Vec<SearchMatch<'a>> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let pattern = Pattern::new(
            query,
            CaseMatching::Smart,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        let mut matches = Vec::new();
        for searchable in records {
            if let Some(score) = self.score(query, &pattern, searchable) {
                matches.push(SearchMatch { searchable, score });
            }
        }
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));

        trace!("{:?} matched {} of {} records", query, matches.len(), records.len());
        matches
    }

    fn fuzzy(&mut self, pattern: &Pattern, text: &str) -> Option<f64> {
        let haystack = Utf32Str::new(text, &mut self.buf);
        pattern.score(haystack, &mut self.matcher).map(f64::from)
    }

    /// Combined score, or `None` when neither the name nor the keywords match.
    fn score(&mut self, query: &str, pattern: &Pattern, searchable: &Searchable) -> Option<f64> {
        let name = self
            .fuzzy(pattern, &searchable.name)
            .map(|s| s + Self::name_match_bonus(query, &searchable.name));

        let keywords = if searchable.keywords.is_empty() {
            None
        } else {
            let joined = searchable.keywords.join(" ");
            self.fuzzy(pattern, &joined).map(|s| s * KEYWORD_WEIGHT)
        };

        match (name, keywords) {
            (None, None) => None,
            (name, keywords) => Some(name.unwrap_or(0.0) + keywords.unwrap_or(0.0)),
        }
    }

    /// Extra score for names the query spells out from the start: the full
    /// bonus for an exact match, a coverage-scaled share for a prefix.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn name_match_bonus(query: &str, name: &str) -> f64 {
        let query = query.to_lowercase();
        let name = name.to_lowercase();

        if name.is_empty() || !name.starts_with(&query) {
            return 0.0;
        }
        if query.len() == name.len() {
            return EXACT_BONUS;
        }

        let coverage = query.chars().count() as f64 / name.chars().count() as f64;
        PREFIX_BONUS + coverage * (EXACT_BONUS - PREFIX_BONUS)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}
