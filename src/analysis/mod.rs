use chrono::{DateTime, Utc};

pub mod authors;
pub mod stale;
pub mod window;

pub use authors::{AuthorRanking, AuthorTally};
pub use stale::classify_stale;
pub use window::{is_newest_first, DateWindow, FilterPolicy};

/// A listing record that carries its creation instant.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Timestamped;
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone, PartialEq)]
    pub struct Entry(pub DateTime<Utc>);

    impl Timestamped for Entry {
        fn created_at(&self) -> DateTime<Utc> {
            self.0
        }
    }

    pub fn at(timestamp: &str) -> Entry {
        Entry(timestamp.parse().unwrap())
    }
}
