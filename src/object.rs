//! Helpers available on every type.

use std::any::{Any, TypeId};

/// Optional-callback invocation and runtime type checks, blanket
/// implemented for all types.
///
/// Callbacks are passed as `Option<&dyn Fn>` so a missing callback can be
/// written as a bare `None`.
pub trait ObjectExt {
    /// Runs `selector` on `self`, or returns false when there is none.
    fn perform_bool(&self, selector: Option<&dyn Fn(&Self) -> bool>) -> bool {
        selector.is_some_and(|selector| selector(self))
    }

    /// Runs `selector` on `self`, or returns 0 when there is none.
    fn perform_integer(&self, selector: Option<&dyn Fn(&Self) -> i64>) -> i64 {
        selector.map_or(0, |selector| selector(self))
    }

    /// Calls `f` with `self` once per item, in order.
    fn perform_with_each<I, F>(&self, items: I, mut f: F)
    where
        I: IntoIterator,
        F: FnMut(&Self, I::Item),
    {
        for item in items {
            f(self, item);
        }
    }

    /// True when `self` is exactly of type `U`.
    fn is_instance_of<U: ?Sized + Any>(&self) -> bool
    where
        Self: Any,
    {
        TypeId::of::<Self>() == TypeId::of::<U>()
    }
}

impl<T: ?Sized> ObjectExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        start: i64,
    }

    #[test]
    fn test_perform_without_selector_returns_defaults() {
        let counter = Counter { start: 3 };
        assert!(!counter.perform_bool(None));
        assert_eq!(counter.perform_integer(None), 0);
    }

    #[test]
    fn test_perform_with_selector() {
        let counter = Counter { start: 3 };
        assert!(counter.perform_bool(Some(&|c: &Counter| c.start > 2)));
        assert_eq!(counter.perform_integer(Some(&|c: &Counter| c.start * 2)), 6);
    }

    #[test]
    fn test_perform_with_each() {
        let counter = Counter { start: 10 };
        let mut totals = Vec::new();
        counter.perform_with_each([1, 2, 3], |c, n| totals.push(c.start + n));
        assert_eq!(totals, vec![11, 12, 13]);
    }

    #[test]
    fn test_is_instance_of() {
        let counter = Counter { start: 0 };
        assert!(counter.is_instance_of::<Counter>());
        assert!(!counter.is_instance_of::<String>());
        assert!(String::from("text").is_instance_of::<String>());
        assert!(!42i64.is_instance_of::<i32>());
    }
}
