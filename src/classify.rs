//! Routing sink behind segregation: one branch per class label, values
//! delivered to every matching branch, with an optional catch-all for values
//! that match nothing.

use crate::flow::Flow;
use crate::sink::Sink;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Routes each accepted value to the branches of its classes.
///
/// Branch identity lives in two places: `routes` is the lookup table used
/// for delivery, `branches` preserves registration order (shadowed
/// duplicates included, catch-all last) for the caller-facing vector. When a
/// label is registered twice the table keeps the later node.
pub(crate) struct Classifier<V, C, F> {
  classify: RefCell<F>,
  routes: HashMap<C, Flow<V, V>>,
  branches: Vec<Flow<V, V>>,
  fallback: Option<Flow<V, V>>,
}

impl<V, C, F> Classifier<V, C, F>
where
  V: Clone + 'static,
  C: Eq + Hash,
  F: FnMut(&V) -> HashSet<C>,
{
  pub(crate) fn new(classify: F, classes: impl IntoIterator<Item = C>) -> Self {
    Self::build(classify, classes, false)
  }

  pub(crate) fn with_fallback(classify: F, classes: impl IntoIterator<Item = C>) -> Self {
    Self::build(classify, classes, true)
  }

  /// Registration-order handles to every branch, the catch-all last when
  /// present.
  pub(crate) fn branches(&self) -> Vec<Flow<V, V>> {
    self.branches.clone()
  }

  fn build(classify: F, classes: impl IntoIterator<Item = C>, with_fallback: bool) -> Self {
    let mut routes = HashMap::new();
    let mut branches = Vec::new();
    for class in classes {
      let branch = Flow::start();
      branches.push(branch.clone());
      routes.insert(class, branch);
    }
    tracing::debug!(
      classes = branches.len(),
      fallback = with_fallback,
      "Built classification router"
    );
    let fallback = if with_fallback {
      let branch = Flow::start();
      branches.push(branch.clone());
      Some(branch)
    } else {
      None
    };
    Self {
      classify: RefCell::new(classify),
      routes,
      branches,
      fallback,
    }
  }
}

impl<V, C, F> Sink<V> for Classifier<V, C, F>
where
  V: Clone + 'static,
  C: Eq + Hash,
  F: FnMut(&V) -> HashSet<C>,
{
  /// Delivers the value once per matching registered class. Only when zero
  /// classes matched does the catch-all receive it, exactly once; without a
  /// catch-all the value is dropped.
  fn accept(&self, value: V) {
    let mut classify = self.classify.borrow_mut();
    let classes = (*classify)(&value);
    drop(classify);

    let targets: Vec<&Flow<V, V>> = classes
      .iter()
      .filter_map(|class| self.routes.get(class))
      .collect();
    tracing::trace!(
      named = classes.len(),
      matched = targets.len(),
      "Routing classified value"
    );

    if let Some((last, rest)) = targets.split_last() {
      for target in rest {
        target.accept(value.clone());
      }
      last.accept(value);
    } else if let Some(fallback) = &self.fallback {
      fallback.accept(value);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parity(value: &i32) -> HashSet<&'static str> {
    HashSet::from([if value % 2 == 0 { "even" } else { "odd" }])
  }

  #[test]
  fn routes_each_value_to_its_class() {
    let router = Classifier::new(parity, ["even", "odd"]);
    let branches = router.branches();
    let evens = branches[0].collect();
    let odds = branches[1].collect();
    for value in 1..=6 {
      router.accept(value);
    }
    assert_eq!(evens.to_vec(), vec![2, 4, 6]);
    assert_eq!(odds.to_vec(), vec![1, 3, 5]);
  }

  #[test]
  fn multi_class_values_reach_every_match() {
    let divisors = |value: &i32| {
      let mut classes = HashSet::new();
      if value % 2 == 0 {
        classes.insert("div2");
      }
      if value % 3 == 0 {
        classes.insert("div3");
      }
      classes
    };
    let router = Classifier::with_fallback(divisors, ["div2", "div3"]);
    let branches = router.branches();
    let twos = branches[0].collect();
    let threes = branches[1].collect();
    let rest = branches[2].collect();
    for value in 1..=12 {
      router.accept(value);
    }
    assert_eq!(twos.to_vec(), vec![2, 4, 6, 8, 10, 12]);
    assert_eq!(threes.to_vec(), vec![3, 6, 9, 12]);
    assert_eq!(rest.to_vec(), vec![1, 5, 7, 11]);
  }

  #[test]
  fn fallback_fires_once_even_for_many_unknown_labels() {
    let unknown = |value: &i32| HashSet::from([*value, value + 100, value + 200]);
    let router = Classifier::with_fallback(unknown, [0]);
    let branches = router.branches();
    let zeros = branches[0].collect();
    let rest = branches[1].collect();
    router.accept(5);
    assert!(zeros.is_empty());
    assert_eq!(rest.to_vec(), vec![5]);
  }

  #[test]
  fn matched_values_never_touch_the_fallback() {
    let router =
      Classifier::with_fallback(|_: &i32| HashSet::from(["known", "mystery"]), ["known"]);
    let branches = router.branches();
    let known = branches[0].collect();
    let rest = branches[1].collect();
    router.accept(1);
    router.accept(2);
    assert_eq!(known.to_vec(), vec![1, 2]);
    assert!(rest.is_empty());
  }

  #[test]
  fn unmatched_values_drop_without_a_fallback() {
    let router = Classifier::new(|_: &i32| HashSet::from(["mystery"]), ["known"]);
    let branches = router.branches();
    let known = branches[0].collect();
    router.accept(1);
    assert!(known.is_empty());
  }

  #[test]
  fn empty_classification_goes_to_the_fallback() {
    let router = Classifier::with_fallback(|_: &i32| HashSet::new(), ["known"]);
    let branches = router.branches();
    let rest = branches[1].collect();
    router.accept(3);
    assert_eq!(rest.to_vec(), vec![3]);
  }

  #[test]
  fn duplicate_labels_leave_earlier_nodes_unreachable() {
    let router = Classifier::new(|_: &i32| HashSet::from(["dup"]), ["dup", "dup"]);
    let branches = router.branches();
    let shadowed = branches[0].collect();
    let live = branches[1].collect();
    router.accept(1);
    assert!(shadowed.is_empty());
    assert_eq!(live.to_vec(), vec![1]);
  }
}
