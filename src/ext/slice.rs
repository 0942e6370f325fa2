use log::warn;

use crate::ext::string::finder_compare;
use crate::value::Equivalent;

/// Extension trait for slices: searching, filtered copies and sorting.
///
/// Every method leaves `self` untouched and returns either a borrowed
/// element, an index, or a freshly allocated `Vec`.
pub trait SliceExt<T> {
    fn is_valid_index(&self, index: usize) -> bool;

    /// First element whose `key` equals `target`.
    fn object_matching_by<K: PartialEq>(&self, target: &K, key: impl Fn(&T) -> K) -> Option<&T>;

    fn index_of_matching_by<K: PartialEq>(&self, target: &K, key: impl Fn(&T) -> K) -> Option<usize>;

    /// Copies of every element whose `key` equals `target`, in order.
    fn objects_matching_by<K: PartialEq>(&self, target: &K, key: impl Fn(&T) -> K) -> Vec<T>
    where
        T: Clone;

    /// Looks for `target`, then for `default`, then falls back to the first
    /// element when `first_if_not_found` is set.
    fn object_matching_or<K: PartialEq>(
        &self,
        target: &K,
        default: Option<&K>,
        first_if_not_found: bool,
        key: impl Fn(&T) -> K,
    ) -> Option<&T>;

    /// First element for which `predicate(element, index)` holds.
    fn object_passing_test(&self, predicate: impl FnMut(&T, usize) -> bool) -> Option<&T>;

    /// Results of `f` for each element, skipping elements that yield `None`.
    fn filter_mapped<U>(&self, f: impl FnMut(&T) -> Option<U>) -> Vec<U>;

    /// Copy without the first element equal to `item`.
    fn removing(&self, item: &T) -> Vec<T>
    where
        T: Clone + PartialEq;

    /// Copy without the element at `index`; an invalid index yields a full copy.
    fn removing_at(&self, index: usize) -> Vec<T>
    where
        T: Clone;

    /// Copy without any element that also appears in `other`.
    fn removing_all_in(&self, other: &[T]) -> Vec<T>
    where
        T: Clone + PartialEq;

    fn reversed(&self) -> Vec<T>
    where
        T: Clone;

    /// Second-to-last element.
    fn penultimate(&self) -> Option<&T>;

    /// Stable sort by an optional key. Missing keys come first when
    /// ascending and last when descending.
    fn sorted_by_optional_key<K: Ord>(&self, key: impl Fn(&T) -> Option<K>, ascending: bool) -> Vec<T>
    where
        T: Clone;

    /// True when this exact element (same address) is in the slice.
    fn contains_identical(&self, item: &T) -> bool;

    fn contains_equivalent(&self, item: &T) -> bool
    where
        T: Equivalent;

    fn index_of_equivalent(&self, item: &T) -> Option<usize>
    where
        T: Equivalent;

    /// Copies of the elements at `indices`, in the order given, skipping
    /// indices that are out of range.
    fn values_at(&self, indices: impl IntoIterator<Item = usize>) -> Vec<T>
    where
        T: Clone;
}

impl<T> SliceExt<T> for [T] {
    fn is_valid_index(&self, index: usize) -> bool {
        index < self.len()
    }

    fn object_matching_by<K: PartialEq>(&self, target: &K, key: impl Fn(&T) -> K) -> Option<&T> {
        self.iter().find(|item| key(item) == *target)
    }

    fn index_of_matching_by<K: PartialEq>(&self, target: &K, key: impl Fn(&T) -> K) -> Option<usize> {
        self.iter().position(|item| key(item) == *target)
    }

    fn objects_matching_by<K: PartialEq>(&self, target: &K, key: impl Fn(&T) -> K) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().filter(|item| key(item) == *target).cloned().collect()
    }

    fn object_matching_or<K: PartialEq>(
        &self,
        target: &K,
        default: Option<&K>,
        first_if_not_found: bool,
        key: impl Fn(&T) -> K,
    ) -> Option<&T> {
        self.object_matching_by(target, &key)
            .or_else(|| default.and_then(|d| self.object_matching_by(d, &key)))
            .or_else(|| if first_if_not_found { self.first() } else { None })
    }

    fn object_passing_test(&self, mut predicate: impl FnMut(&T, usize) -> bool) -> Option<&T> {
        self.iter().enumerate().find(|&(i, item)| predicate(item, i)).map(|(_, item)| item)
    }

    fn filter_mapped<U>(&self, f: impl FnMut(&T) -> Option<U>) -> Vec<U> {
        self.iter().filter_map(f).collect()
    }

    fn removing(&self, item: &T) -> Vec<T>
    where
        T: Clone + PartialEq,
    {
        match self.iter().position(|x| x == item) {
            Some(index) => self.removing_at(index),
            None => self.to_vec(),
        }
    }

    fn removing_at(&self, index: usize) -> Vec<T>
    where
        T: Clone,
    {
        let mut copy = self.to_vec();
        if index < copy.len() {
            copy.remove(index);
        }
        copy
    }

    fn removing_all_in(&self, other: &[T]) -> Vec<T>
    where
        T: Clone + PartialEq,
    {
        self.iter().filter(|item| !other.contains(item)).cloned().collect()
    }

    fn reversed(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().rev().cloned().collect()
    }

    fn penultimate(&self) -> Option<&T> {
        self.len().checked_sub(2).and_then(|i| self.get(i))
    }

    fn sorted_by_optional_key<K: Ord>(&self, key: impl Fn(&T) -> Option<K>, ascending: bool) -> Vec<T>
    where
        T: Clone,
    {
        let mut sorted = self.to_vec();
        sorted.sort_by(|a, b| {
            let ordering = key(a).cmp(&key(b));
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        sorted
    }

    fn contains_identical(&self, item: &T) -> bool {
        self.iter().any(|x| std::ptr::eq(x, item))
    }

    fn contains_equivalent(&self, item: &T) -> bool
    where
        T: Equivalent,
    {
        self.index_of_equivalent(item).is_some()
    }

    fn index_of_equivalent(&self, item: &T) -> Option<usize>
    where
        T: Equivalent,
    {
        self.iter().position(|x| x.is_equivalent(item))
    }

    fn values_at(&self, indices: impl IntoIterator<Item = usize>) -> Vec<T>
    where
        T: Clone,
    {
        indices.into_iter().filter_map(|i| self.get(i).cloned()).collect()
    }
}

/// Finder-order sorting for anything that reads as text.
pub trait FinderSortExt<T> {
    fn sorted_finder_order(&self) -> Vec<T>;
}

impl<T: AsRef<str> + Clone> FinderSortExt<T> for [T] {
    fn sorted_finder_order(&self) -> Vec<T> {
        let mut sorted = self.to_vec();
        sorted.sort_by(|a, b| finder_compare(a.as_ref(), b.as_ref()));
        sorted
    }
}

/// Extension trait for vectors: positional inserts, queue and stack use.
pub trait VecExt<T> {
    /// Inserts at `index`, or appends when `at_end` is set or `index` is
    /// past the end. Returns the index the item landed at.
    fn insert_at_or_end(&mut self, item: T, index: usize, at_end: bool) -> usize;

    /// Inserts `items` in order starting at `index` (clamped to the end).
    fn insert_all_at(&mut self, items: impl IntoIterator<Item = T>, index: usize);

    /// Inserts `items` at `index`, first removing any equal elements already
    /// present so each ends up exactly once. Returns the index of the first
    /// inserted item.
    fn insert_or_move_all_at(&mut self, items: &[T], index: usize) -> usize
    where
        T: Clone + PartialEq;

    /// Appends `items`, moving any that are already present to the end.
    fn add_or_move_all(&mut self, items: &[T])
    where
        T: Clone + PartialEq;

    /// Removes the elements at `indices`; invalid and repeated indices are ignored.
    fn remove_indices(&mut self, indices: impl IntoIterator<Item = usize>);

    fn remove_matching_by<K: PartialEq>(&mut self, target: &K, key: impl Fn(&T) -> K);

    /// Applies a fallible operation to each element, logging failures and
    /// carrying on with the rest.
    fn perform_on_each<E: std::fmt::Display>(&mut self, f: impl FnMut(&mut T) -> Result<(), E>);

    fn enqueue(&mut self, item: T);
    /// Removes and returns the oldest enqueued element. This shifts every
    /// remaining element, so long-lived queues belong in a `VecDeque`.
    fn dequeue(&mut self) -> Option<T>;

    fn stack_push(&mut self, item: T);
    /// Removes and returns the most recently pushed element.
    fn stack_pop(&mut self) -> Option<T>;
}

/// `items` with later duplicates dropped, keeping order.
fn first_occurrences<T: Clone + PartialEq>(items: &[T]) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(item) {
            unique.push(item.clone());
        }
    }
    unique
}

impl<T> VecExt<T> for Vec<T> {
    fn insert_at_or_end(&mut self, item: T, index: usize, at_end: bool) -> usize {
        if at_end || index >= self.len() {
            self.push(item);
            self.len() - 1
        } else {
            self.insert(index, item);
            index
        }
    }

    fn insert_all_at(&mut self, items: impl IntoIterator<Item = T>, index: usize) {
        let index = index.min(self.len());
        for (offset, item) in items.into_iter().enumerate() {
            self.insert(index + offset, item);
        }
    }

    fn insert_or_move_all_at(&mut self, items: &[T], index: usize) -> usize
    where
        T: Clone + PartialEq,
    {
        let items = first_occurrences(items);
        let index = index.min(self.len());
        let moved_before = self[..index].iter().filter(|x| items.contains(x)).count();
        self.retain(|x| !items.contains(x));
        let index = index - moved_before;
        self.insert_all_at(items, index);
        index
    }

    fn add_or_move_all(&mut self, items: &[T])
    where
        T: Clone + PartialEq,
    {
        let items = first_occurrences(items);
        self.retain(|x| !items.contains(x));
        self.extend(items);
    }

    fn remove_indices(&mut self, indices: impl IntoIterator<Item = usize>) {
        let mut indices: Vec<usize> = indices.into_iter().filter(|i| *i < self.len()).collect();
        indices.sort_unstable();
        indices.dedup();
        for index in indices.into_iter().rev() {
            self.remove(index);
        }
    }

    fn remove_matching_by<K: PartialEq>(&mut self, target: &K, key: impl Fn(&T) -> K) {
        self.retain(|item| key(item) != *target);
    }

    fn perform_on_each<E: std::fmt::Display>(&mut self, mut f: impl FnMut(&mut T) -> Result<(), E>) {
        for (index, item) in self.iter_mut().enumerate() {
            if let Err(err) = f(item) {
                warn!("Skipping element {index}: {err}");
            }
        }
    }

    fn enqueue(&mut self, item: T) {
        self.push(item);
    }

    fn dequeue(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(self.remove(0))
        }
    }

    fn stack_push(&mut self, item: T) {
        self.push(item);
    }

    fn stack_pop(&mut self) -> Option<T> {
        self.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: String,
        age: Option<u32>,
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Cleo".into(), age: Some(40) },
            Person { name: "Abe".into(), age: None },
            Person { name: "Bea".into(), age: Some(25) },
            Person { name: "Dan".into(), age: Some(25) },
        ]
    }

    #[test]
    fn test_matching_by_key() {
        let people = people();
        let target = "Bea".to_string();
        assert_eq!(people.object_matching_by(&target, |p| p.name.clone()).map(|p| p.age), Some(Some(25)));
        assert_eq!(people.index_of_matching_by(&Some(25), |p| p.age), Some(2));
        assert_eq!(people.objects_matching_by(&Some(25), |p| p.age).len(), 2);
        assert!(people.object_matching_by(&"Zed".to_string(), |p| p.name.clone()).is_none());
    }

    #[test]
    fn test_matching_or_falls_back() {
        let people = people();
        let name = |p: &Person| p.name.clone();
        let found = people.object_matching_or(&"Zed".into(), Some(&"Dan".into()), false, name);
        assert_eq!(found.map(|p| p.name.as_str()), Some("Dan"));
        let first = people.object_matching_or(&"Zed".into(), None, true, name);
        assert_eq!(first.map(|p| p.name.as_str()), Some("Cleo"));
        assert!(people.object_matching_or(&"Zed".into(), None, false, name).is_none());
    }

    #[test]
    fn test_passing_test_and_filter_mapped() {
        let values = [3, 8, 12, 15];
        assert_eq!(values.object_passing_test(|v, _| v % 4 == 0), Some(&8));
        assert_eq!(values.object_passing_test(|_, i| i == 3), Some(&15));
        assert_eq!(values.filter_mapped(|v| (*v > 10).then_some(v * 2)), vec![24, 30]);
    }

    #[test]
    fn test_removing_non_member_returns_equal_copy() {
        let values = vec![1, 2, 3];
        assert_eq!(values.removing(&9), values);
        assert_eq!(values.removing_at(10), values);
    }

    #[test]
    fn test_removing_member_removes_exactly_one() {
        let values = vec![1, 2, 1, 3];
        assert_eq!(values.removing(&1), vec![2, 1, 3]);
        assert_eq!(values.removing_at(1), vec![1, 1, 3]);
        assert_eq!(values.removing_all_in(&[1, 3]), vec![2]);
    }

    #[test]
    fn test_reverse_and_penultimate() {
        let values = [1, 2, 3];
        assert_eq!(values.reversed(), vec![3, 2, 1]);
        assert_eq!(values.penultimate(), Some(&2));
        assert_eq!([1].penultimate(), None);
        assert!(values.is_valid_index(2));
        assert!(!values.is_valid_index(3));
    }

    #[test]
    fn test_sort_missing_keys_and_stability() {
        let people = people();
        let ascending: Vec<_> = people
            .sorted_by_optional_key(|p| p.age, true)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(ascending, vec!["Abe", "Bea", "Dan", "Cleo"]);
        let descending: Vec<_> = people
            .sorted_by_optional_key(|p| p.age, false)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(descending, vec!["Cleo", "Bea", "Dan", "Abe"]);
    }

    #[test]
    fn test_identity_and_equivalence() {
        let names = vec!["Alpha".to_string(), "beta".to_string()];
        let copy = "Alpha".to_string();
        assert!(names.contains_identical(&names[0]));
        assert!(!names.contains_identical(&copy));
        assert!(names.contains_equivalent(&" BETA ".to_string()));
        assert_eq!(names.index_of_equivalent(&"alpha".to_string()), Some(0));
    }

    #[test]
    fn test_finder_order_and_values_at() {
        let files = ["file10", "File2", "file1"];
        assert_eq!(files.sorted_finder_order(), vec!["file1", "File2", "file10"]);
        assert_eq!(files.values_at([2, 7, 0]), vec!["file1", "file10"]);
    }

    #[test]
    fn test_inserts() {
        let mut values = vec![1, 2, 3];
        assert_eq!(values.insert_at_or_end(9, 1, false), 1);
        assert_eq!(values.insert_at_or_end(8, 1, true), 4);
        assert_eq!(values.insert_at_or_end(7, 99, false), 5);
        assert_eq!(values, vec![1, 9, 2, 3, 8, 7]);
        values.insert_all_at([5, 6], 0);
        assert_eq!(values[..3], [5, 6, 1]);
    }

    #[test]
    fn test_insert_or_move() {
        let mut values = vec!['a', 'b', 'c', 'd'];
        let at = values.insert_or_move_all_at(&['a', 'x'], 3);
        assert_eq!(at, 2);
        assert_eq!(values, vec!['b', 'c', 'a', 'x', 'd']);
        values.add_or_move_all(&['b']);
        assert_eq!(values, vec!['c', 'a', 'x', 'd', 'b']);
    }

    #[test]
    fn test_insert_or_move_with_duplicates() {
        let mut values = vec!['a', 'b'];
        assert_eq!(values.insert_or_move_all_at(&['a', 'a'], 0), 0);
        assert_eq!(values, vec!['a', 'b']);

        let mut values = vec!['a', 'b', 'a', 'c'];
        assert_eq!(values.insert_or_move_all_at(&['c', 'a', 'c'], 4), 1);
        assert_eq!(values, vec!['b', 'c', 'a']);

        let mut values = vec![1, 2, 3];
        values.add_or_move_all(&[2, 4, 2, 4]);
        assert_eq!(values, vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_remove_indices_and_matching() {
        let mut values = vec![10, 11, 12, 13, 14];
        values.remove_indices([4, 0, 0, 99]);
        assert_eq!(values, vec![11, 12, 13]);
        values.remove_matching_by(&true, |v| v % 2 == 1);
        assert_eq!(values, vec![12]);
    }

    #[test]
    fn test_perform_on_each_skips_failures() {
        let mut values = vec![1, 0, 3];
        values.perform_on_each(|v| {
            if *v == 0 {
                return Err("zero");
            }
            *v *= 10;
            Ok(())
        });
        assert_eq!(values, vec![10, 0, 30]);
    }

    #[test]
    fn test_queue_and_stack() {
        let mut queue = Vec::new();
        queue.enqueue(1);
        queue.enqueue(2);
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), None);

        let mut stack = Vec::new();
        stack.stack_push(1);
        stack.stack_push(2);
        assert_eq!(stack.stack_pop(), Some(2));
        assert_eq!(stack.stack_pop(), Some(1));
        assert_eq!(stack.stack_pop(), None);
    }
}
