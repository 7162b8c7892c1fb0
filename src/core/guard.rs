//! Guard predicates for choosing transition targets.
//!
//! Guards are pure boolean functions over some input (usually the machine
//! context). A [`Choice`] evaluates an ordered list of guards and picks the
//! target of the first one that passes, which is how eventless
//! "check then branch" pseudo-states are expressed.

use std::fmt;

/// Pure predicate over an input value.
///
/// # Example
///
/// ```rust
/// use pricing_machine::core::Guard;
///
/// let is_bulk = Guard::new(|quantity: &u32| *quantity >= 10);
///
/// assert!(is_bulk.check(&12));
/// assert!(!is_bulk.check(&3));
/// ```
pub struct Guard<T> {
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Guard<T> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against `input`.
    pub fn check(&self, input: &T) -> bool {
        (self.predicate)(input)
    }
}

impl<T> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// Ordered guarded branches with a fallback target.
///
/// Branches are evaluated in insertion order; the first passing guard wins.
/// When none pass, the fallback is returned.
///
/// # Example
///
/// ```rust
/// use pricing_machine::core::{Choice, Guard};
///
/// let tier = Choice::new("small")
///     .when(Guard::new(|n: &u32| *n >= 100), "large")
///     .when(Guard::new(|n: &u32| *n >= 10), "medium");
///
/// assert_eq!(tier.choose(&250), "large");
/// assert_eq!(tier.choose(&42), "medium");
/// assert_eq!(tier.choose(&1), "small");
/// ```
#[derive(Debug)]
pub struct Choice<T, V> {
    branches: Vec<(Guard<T>, V)>,
    fallback: V,
}

impl<T, V: Clone> Choice<T, V> {
    /// Start a choice that resolves to `fallback` when no guard passes.
    pub fn new(fallback: V) -> Self {
        Self {
            branches: Vec::new(),
            fallback,
        }
    }

    /// Append a guarded branch. Earlier branches take precedence.
    pub fn when(mut self, guard: Guard<T>, target: V) -> Self {
        self.branches.push((guard, target));
        self
    }

    /// Resolve the target for `input`.
    pub fn choose(&self, input: &T) -> V {
        self.branches
            .iter()
            .find(|(guard, _)| guard.check(input))
            .map(|(_, target)| target.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::new(|s: &String| s.starts_with("PPP"));

        let input = "PPP-IN".to_string();
        assert_eq!(guard.check(&input), guard.check(&input));
        assert!(guard.check(&input));
        assert!(!guard.check(&"SPRING".to_string()));
    }

    #[test]
    fn choice_prefers_earlier_branches() {
        let choice = Choice::new(0)
            .when(Guard::new(|n: &i32| *n > 0), 1)
            .when(Guard::new(|n: &i32| *n > 5), 2);

        // Both guards pass for 10; the first registered wins.
        assert_eq!(choice.choose(&10), 1);
    }

    #[test]
    fn choice_falls_back_when_nothing_matches() {
        let choice = Choice::new("none").when(Guard::new(|b: &bool| *b), "some");

        assert_eq!(choice.choose(&false), "none");
        assert_eq!(choice.choose(&true), "some");
    }

    #[test]
    fn empty_choice_always_falls_back() {
        let choice: Choice<u8, &str> = Choice::new("fallback");
        assert_eq!(choice.choose(&7), "fallback");
    }
}
