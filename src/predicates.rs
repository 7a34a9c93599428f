// 🎯 Change predicates - decide whether a write is significant
//
// A predicate receives (old, new) and returns true when the write should be
// recorded. The stored value is updated either way.

/// Boxed predicate as stored by a TrackedField
pub type ChangePredicate<T> = Box<dyn Fn(&T, &T) -> bool>;

/// Every write is significant, including writes of an equal value
pub fn always<T>() -> impl Fn(&T, &T) -> bool {
    |_, _| true
}

/// Significant when the value actually differs
pub fn on_change<T: PartialEq>() -> impl Fn(&T, &T) -> bool {
    |old, new| old != new
}

/// Significant only when the field transitions *to* `target`
///
/// Writing `target` while already at `target` is not significant; neither is
/// any write of another value.
pub fn only_when_it_changes_to<T: PartialEq>(target: T) -> impl Fn(&T, &T) -> bool {
    move |old, new| *new == target && *new != *old
}

/// Significant only when the field transitions *away from* `source`
pub fn only_when_it_leaves<T: PartialEq>(source: T) -> impl Fn(&T, &T) -> bool {
    move |old, new| *old == source && *new != *old
}
