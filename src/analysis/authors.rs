use serde::Serialize;
use std::collections::HashMap;

/// Commit counts keyed by author display name. Names are compared as-is:
/// no case folding or trimming.
#[derive(Debug, Default, Clone)]
pub struct AuthorTally {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub name: String,
    pub commits: usize,
}

/// Authors ordered by descending commit count, ties kept in the order the
/// names were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorRanking(pub Vec<AuthorCount>);

impl AuthorTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str) {
        match self.index.get(name) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(name.to_string(), self.counts.len());
                self.counts.push((name.to_string(), 1));
            }
        }
    }

    pub fn count(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|&slot| self.counts[slot].1)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn rank(self, limit: usize) -> AuthorRanking {
        let mut counts = self.counts;
        // sort_by is stable, so first-seen order survives among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        AuthorRanking(
            counts
                .into_iter()
                .take(limit)
                .map(|(name, commits)| AuthorCount { name, commits })
                .collect(),
        )
    }
}

impl<'a> FromIterator<&'a str> for AuthorTally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        let mut tally = AuthorTally::new();
        for name in names {
            tally.record(name);
        }
        tally
    }
}

impl AuthorRanking {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthorCount> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(ranking: &AuthorRanking) -> Vec<(&str, usize)> {
        ranking
            .iter()
            .map(|entry| (entry.name.as_str(), entry.commits))
            .collect()
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let names = [
            "Bob", "Alice", "Carol", "Bob", "Alice", "Bob", "Carol", "Alice", "Bob", "Alice",
            "Carol", "Bob", "Alice",
        ];
        let tally: AuthorTally = names.into_iter().collect();
        assert_eq!(tally.count("Bob"), Some(5));
        assert_eq!(tally.count("Alice"), Some(5));

        let ranking = tally.rank(30);
        assert_eq!(pairs(&ranking), vec![("Bob", 5), ("Alice", 5), ("Carol", 3)]);
    }

    #[test]
    fn ranking_is_non_increasing_and_truncated() {
        let mut tally = AuthorTally::new();
        for author in 0..40 {
            for _ in 0..(author % 7 + 1) {
                tally.record(&format!("author-{}", author));
            }
        }
        assert_eq!(tally.len(), 40);

        let ranking = tally.rank(30);
        assert_eq!(ranking.len(), 30);
        let counts: Vec<usize> = ranking.iter().map(|entry| entry.commits).collect();
        assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(counts.iter().all(|&count| count > 0));
        assert_eq!(counts[0], 7);
        assert_eq!(ranking.0[0].name, "author-6");
    }

    #[test]
    fn names_are_not_normalised() {
        let tally: AuthorTally = ["alice", "Alice", "Alice "].into_iter().collect();
        assert_eq!(tally.len(), 3);
        assert_eq!(tally.count("alice"), Some(1));
        assert_eq!(tally.count("ALICE"), None);
    }

    #[test]
    fn empty_tally_ranks_to_nothing() {
        let tally = AuthorTally::new();
        assert!(tally.is_empty());
        assert!(tally.rank(30).is_empty());
    }
}
