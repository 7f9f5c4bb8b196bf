use super::Timestamped;
use chrono::{DateTime, Duration, Utc};

/// Entries created before `now - threshold_days`. The clock is read once for
/// the whole call.
pub fn classify_stale<T: Timestamped + Clone>(entries: &[T], threshold_days: u32) -> Vec<T> {
    classify_stale_at(entries, threshold_days, Utc::now())
}

pub fn classify_stale_at<T: Timestamped + Clone>(
    entries: &[T],
    threshold_days: u32,
    now: DateTime<Utc>,
) -> Vec<T> {
    // A cutoff before the earliest representable instant leaves nothing stale.
    let Some(cutoff) = Duration::try_days(i64::from(threshold_days))
        .and_then(|threshold| now.checked_sub_signed(threshold))
    else {
        return Vec::new();
    };
    entries
        .iter()
        .filter(|entry| entry.created_at() < cutoff)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::Entry;

    fn days_ago(now: DateTime<Utc>, days: i64) -> Entry {
        Entry(now - Duration::days(days))
    }

    #[test]
    fn forty_days_is_stale_twenty_is_not() {
        let now: DateTime<Utc> = "2024-06-15T12:00:00Z".parse().unwrap();
        let entries = vec![days_ago(now, 40), days_ago(now, 20)];

        let stale = classify_stale_at(&entries, 30, now);
        assert_eq!(stale, vec![days_ago(now, 40)]);
    }

    #[test]
    fn exactly_at_cutoff_is_not_stale() {
        let now: DateTime<Utc> = "2024-06-15T12:00:00Z".parse().unwrap();
        let entries = vec![days_ago(now, 14)];
        assert!(classify_stale_at(&entries, 14, now).is_empty());
    }

    #[test]
    fn larger_threshold_never_flags_more() {
        let now: DateTime<Utc> = "2024-06-15T12:00:00Z".parse().unwrap();
        let entries: Vec<Entry> = (0..120).step_by(7).map(|d| days_ago(now, d)).collect();

        let mut previous = usize::MAX;
        for threshold in 0..130 {
            let count = classify_stale_at(&entries, threshold, now).len();
            assert!(count <= previous, "threshold {}", threshold);
            previous = count;
        }
    }

    #[test]
    fn huge_threshold_flags_nothing() {
        let now: DateTime<Utc> = "2024-06-15T12:00:00Z".parse().unwrap();
        let entries = vec![days_ago(now, 10_000), Entry(DateTime::<Utc>::MIN_UTC)];
        assert!(classify_stale_at(&entries, u32::MAX, now).is_empty());
        assert!(classify_stale(&entries, u32::MAX).is_empty());
    }

    #[test]
    fn uses_current_clock() {
        let entries = vec![Entry(Utc::now() - Duration::days(365)), Entry(Utc::now())];
        assert_eq!(classify_stale(&entries, 30).len(), 1);
    }
}
