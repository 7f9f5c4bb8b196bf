use crate::analysis::{AuthorRanking, DateWindow};
use crate::github::RepoRef;
use serde::Serialize;

pub mod assembler;

pub use assembler::ReportAssembler;

/// Open, closed and stale-open totals for pull requests or issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivityCounts {
    pub open: usize,
    pub closed: usize,
    pub stale: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Authors,
    PullRequests,
    Issues,
}

/// One report section as labelled rows, ready for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub header: Option<(String, String)>,
    pub rows: Vec<(String, usize)>,
}

impl Section {
    pub fn authors(ranking: &AuthorRanking) -> Self {
        Self {
            kind: SectionKind::Authors,
            header: Some(("Contributor".to_string(), "Commits count".to_string())),
            rows: ranking
                .iter()
                .map(|entry| (entry.name.clone(), entry.commits))
                .collect(),
        }
    }

    pub fn pull_requests(counts: &ActivityCounts) -> Self {
        Self::counts(SectionKind::PullRequests, "pull requests", counts)
    }

    pub fn issues(counts: &ActivityCounts) -> Self {
        Self::counts(SectionKind::Issues, "issues", counts)
    }

    fn counts(kind: SectionKind, noun: &str, counts: &ActivityCounts) -> Self {
        Self {
            kind,
            header: None,
            rows: vec![
                (format!("Open {}", noun), counts.open),
                (format!("Closed {}", noun), counts.closed),
                (format!("Old {}", noun), counts.stale),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub repository: RepoRef,
    pub branch: String,
    pub window: DateWindow,
    pub authors: AuthorRanking,
    pub pull_requests: ActivityCounts,
    pub issues: ActivityCounts,
}

impl Report {
    pub fn sections(&self) -> Vec<Section> {
        vec![
            Section::authors(&self.authors),
            Section::pull_requests(&self.pull_requests),
            Section::issues(&self.issues),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AuthorTally;

    #[test]
    fn count_sections_are_labelled_in_order() {
        let counts = ActivityCounts {
            open: 4,
            closed: 10,
            stale: 1,
        };
        let section = Section::issues(&counts);
        assert_eq!(section.kind, SectionKind::Issues);
        assert!(section.header.is_none());
        assert_eq!(
            section.rows,
            vec![
                ("Open issues".to_string(), 4),
                ("Closed issues".to_string(), 10),
                ("Old issues".to_string(), 1),
            ]
        );
    }

    #[test]
    fn author_section_keeps_ranking_order() {
        let ranking = ["Bob", "Alice", "Alice"]
            .into_iter()
            .collect::<AuthorTally>()
            .rank(30);
        let section = Section::authors(&ranking);
        assert_eq!(
            section.header,
            Some(("Contributor".to_string(), "Commits count".to_string()))
        );
        assert_eq!(
            section.rows,
            vec![("Alice".to_string(), 2), ("Bob".to_string(), 1)]
        );
    }
}
