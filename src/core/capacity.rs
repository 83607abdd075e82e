//! Capacity cap for category lists.
//!
//! Lists are ordered oldest first. Whenever a list grows past its cap the
//! oldest entries are dropped from the front.

/// Default live-capture cap per category.
pub const DEFAULT_MAX_SESSIONS: usize = 5;

/// Default cap applied after an import merge.
pub const DEFAULT_IMPORT_CAP: usize = 50;

/// Trim `list` to at most `max` entries, evicting from the front.
///
/// Returns how many entries were evicted.
pub fn enforce<T>(list: &mut Vec<T>, max: usize) -> usize {
    if list.len() <= max {
        return 0;
    }
    let excess = list.len() - max;
    list.drain(..excess);
    excess
}

/// Append `incoming` after `existing` and cap the result.
#[must_use]
pub fn merge<T>(mut existing: Vec<T>, incoming: Vec<T>, max: usize) -> Vec<T> {
    existing.extend(incoming);
    enforce(&mut existing, max);
    existing
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn under_cap_is_untouched() {
        let mut list = vec![1, 2];
        assert_eq!(enforce(&mut list, 5), 0);
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut list = vec!["a", "b", "c"];
        assert_eq!(enforce(&mut list, 2), 1);
        assert_eq!(list, vec!["b", "c"]);
    }

    #[test]
    fn zero_cap_empties_list() {
        let mut list = vec![1, 2, 3];
        enforce(&mut list, 0);
        assert!(list.is_empty());
    }

    #[test]
    fn merge_keeps_newest() {
        assert_eq!(merge(vec![1, 2, 3], vec![4, 5], 3), vec![3, 4, 5]);
    }

    proptest! {
        #[test]
        fn cap_keeps_most_recent(items in proptest::collection::vec(any::<u16>(), 0..64), max in 0usize..16) {
            let mut list = items.clone();
            enforce(&mut list, max);

            prop_assert!(list.len() <= max);
            let keep = items.len().min(max);
            prop_assert_eq!(&list[..], &items[items.len() - keep..]);
        }

        #[test]
        fn repeated_push_never_exceeds_cap(pushes in 0usize..40, max in 0usize..8) {
            let mut list = Vec::new();
            for i in 0..pushes {
                list.push(i);
                enforce(&mut list, max);
                prop_assert!(list.len() <= max);
            }
            if pushes > 0 && max > 0 {
                prop_assert_eq!(list.last().copied(), Some(pushes - 1));
            }
        }
    }
}
