use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// A classified item attributed to an owner, ready for grouping.
///
/// The owner is always resolved; unowned items are filtered out before
/// grouping so grouping keys are never null.
#[derive(Debug, Clone)]
pub struct OwnedItem<T> {
    pub item: T,
    pub owner: String,
    pub reference_date: DateTime<Utc>,
}

/// Items sharing one owner, ordered oldest-first by reference date.
#[derive(Debug, Clone)]
pub struct OwnerGroup<T> {
    pub owner: String,
    pub items: Vec<OwnedItem<T>>,
}

impl<T> OwnerGroup<T> {
    /// Reference date of the oldest item; groups are never empty.
    pub fn earliest(&self) -> DateTime<Utc> {
        self.items[0].reference_date
    }
}

/// Groups items by owner and ranks the groups for presentation.
///
/// Within a group, items sort ascending by reference date; across groups,
/// descending by size with ties broken by the earliest reference date, then
/// by owner name. The busiest backlog surfaces first with its
/// oldest-blocking item on top, and the output is a total order: shuffling
/// the input changes nothing. `tie_key` disambiguates items sharing a
/// reference date (typically the PR number).
pub fn group_and_rank<T>(
    items: Vec<OwnedItem<T>>,
    tie_key: impl Fn(&T) -> u64,
) -> Vec<OwnerGroup<T>> {
    let mut by_owner: IndexMap<String, Vec<OwnedItem<T>>> = IndexMap::new();
    for item in items {
        by_owner.entry(item.owner.clone()).or_default().push(item);
    }

    let mut groups: Vec<OwnerGroup<T>> = by_owner
        .into_iter()
        .map(|(owner, mut items)| {
            items.sort_by_key(|i| (i.reference_date, tie_key(&i.item)));
            OwnerGroup { owner, items }
        })
        .collect();

    groups.sort_by(|a, b| {
        b.items
            .len()
            .cmp(&a.items.len())
            .then_with(|| a.earliest().cmp(&b.earliest()))
            .then_with(|| a.owner.cmp(&b.owner))
    });

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item(id: u64, owner: &str, days_old: i64) -> OwnedItem<u64> {
        OwnedItem {
            item: id,
            owner: owner.to_string(),
            reference_date: Utc::now() - Duration::days(days_old),
        }
    }

    fn rank(items: Vec<OwnedItem<u64>>) -> Vec<OwnerGroup<u64>> {
        group_and_rank(items, |id| *id)
    }

    #[test]
    fn test_groups_by_owner() {
        let groups = rank(vec![
            item(1, "alice", 10),
            item(2, "bob", 5),
            item(3, "alice", 7),
        ]);

        assert_eq!(groups.len(), 2);
        let alice = groups.iter().find(|g| g.owner == "alice").unwrap();
        assert_eq!(alice.items.len(), 2);
    }

    #[test]
    fn test_larger_group_ranks_first() {
        let mut items = Vec::new();
        for i in 0..3 {
            items.push(item(i, "three", 10 + i as i64));
        }
        for i in 10..15 {
            items.push(item(i, "five", 10 + i as i64));
        }

        let groups = rank(items);

        assert_eq!(groups[0].owner, "five", "group with 5 items must come first");
        assert_eq!(groups[1].owner, "three");
    }

    #[test]
    fn test_equal_sizes_rank_by_earliest_date() {
        let groups = rank(vec![
            item(1, "recent", 5),
            item(2, "recent", 6),
            item(3, "old", 30),
            item(4, "old", 4),
        ]);

        assert_eq!(
            groups[0].owner, "old",
            "equal-size tie must break toward the older earliest item"
        );
    }

    #[test]
    fn test_items_within_group_sorted_oldest_first() {
        let groups = rank(vec![
            item(1, "alice", 3),
            item(2, "alice", 30),
            item(3, "alice", 10),
        ]);

        let dates: Vec<_> = groups[0].items.iter().map(|i| i.reference_date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted, "items must be ordered oldest-first");
        assert_eq!(groups[0].items[0].item, 2);
    }

    #[test]
    fn test_ranking_invariant_holds() {
        let groups = rank(vec![
            item(1, "a", 10),
            item(2, "a", 20),
            item(3, "b", 40),
            item(4, "b", 2),
            item(5, "c", 15),
        ]);

        for pair in groups.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            let valid = first.items.len() > second.items.len()
                || (first.items.len() == second.items.len()
                    && first.earliest() <= second.earliest());
            assert!(
                valid,
                "ranking invariant violated between {} and {}",
                first.owner, second.owner
            );
        }
    }

    #[test]
    fn test_stable_under_input_reordering() {
        let items = vec![
            item(1, "alice", 10),
            item(2, "bob", 5),
            item(3, "alice", 7),
            item(4, "carol", 7),
            item(5, "bob", 12),
            item(6, "carol", 12),
        ];

        let mut shuffled = items.clone();
        shuffled.reverse();
        shuffled.swap(0, 3);

        let original = rank(items);
        let reordered = rank(shuffled);

        let describe = |groups: &[OwnerGroup<u64>]| -> Vec<(String, Vec<u64>)> {
            groups
                .iter()
                .map(|g| (g.owner.clone(), g.items.iter().map(|i| i.item).collect()))
                .collect()
        };

        assert_eq!(
            describe(&original),
            describe(&reordered),
            "group membership and ranked order must not depend on input order"
        );
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let groups = rank(vec![]);
        assert!(groups.is_empty());
    }
}
