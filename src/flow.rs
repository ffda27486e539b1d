//! # Flow Nodes
//!
//! This module defines [`Flow`], the node primitive every pipeline is built
//! from, together with the propagation protocol and the combinator surface.
//!
//! ## Graph Model
//!
//! A pipeline is a forest of typed out-trees. Each node owns a transform from
//! its input type to an [`Emission`] of its output type, plus an ordered list
//! of subscribers. Combinators ([`filter`](Flow::filter), [`map`](Flow::map),
//! [`peep`](Flow::peep), [`select`](Flow::select),
//! [`segregate`](Flow::segregate), [`collect`](Flow::collect)) are the only
//! way to grow the graph: each creates a fresh child, attaches it exactly
//! once, and hands the child back for further chaining. There is no public
//! attach or rewire, so cycles cannot be expressed and propagation needs no
//! visited set.
//!
//! ## Propagation
//!
//! [`accept`](Flow::accept) is the single driver. It applies the node's
//! transform; on `Emit`, every subscriber receives the value depth-first in
//! attach order, each one completing its entire downstream traversal before
//! the next sibling runs. On `Absorb` the branch ends. One `accept` at a root
//! visits every reachable node before it returns.
//!
//! ## Fan-Out and Ownership
//!
//! Output types are `Clone`: fan-out hands each subscriber its own copy, with
//! the final subscriber receiving the original. Handles are `Rc` clones of
//! the node, so a node lives as long as its parent or any user handle.
//! Everything is single-threaded; `Flow` is deliberately `!Send`.
//!
//! ## Failure
//!
//! Callbacks are infallible signatures; a callback that cannot proceed
//! panics, and the panic unwinds through the in-flight traversal to the
//! injection site. Effects already performed stay performed, later siblings
//! are skipped, and the graph remains usable afterwards.

use crate::classify::Classifier;
use crate::collect::{Collected, Collector};
use crate::emission::Emission;
use crate::select::Selector;
use crate::sink::Sink;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

struct FlowInner<I, O> {
  label: RefCell<Option<String>>,
  transform: RefCell<Box<dyn FnMut(I) -> Emission<O>>>,
  outputs: RefCell<Vec<Box<dyn Sink<O>>>>,
}

/// A pipeline node accepting `I`, emitting `O` to its subscribers.
///
/// `Flow` is a cheap handle: cloning it shares the node rather than copying
/// it. Values enter through [`accept`](Flow::accept) (or
/// [`accept_many`](Flow::accept_many)) and propagate synchronously through
/// every stage built beneath the node.
///
/// # Example
///
/// ```rust
/// use flowweave::Flow;
///
/// let numbers = Flow::start();
/// let doubled = numbers.map(|value: i32| value * 2).collect();
/// numbers.accept_many(1..=3);
/// assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
/// ```
pub struct Flow<I, O> {
  inner: Rc<FlowInner<I, O>>,
}

impl<T> Flow<T, T>
where
  T: Clone + 'static,
{
  /// Creates a root node that re-emits every accepted value unchanged.
  ///
  /// Roots are where values are injected; everything else in a pipeline is
  /// built beneath one with the combinators.
  pub fn start() -> Self {
    Flow::new(Emission::Emit)
  }
}

impl<I, O> Flow<I, O>
where
  I: 'static,
  O: Clone + 'static,
{
  /// Creates a detached node with an arbitrary transform.
  ///
  /// The node has no parent; it is its own injection point, and the
  /// transform decides per value whether anything reaches the subscribers.
  ///
  /// # Example
  ///
  /// ```rust
  /// use flowweave::{Emission, Flow};
  ///
  /// let gate = Flow::new(|value: i32| {
  ///   if value >= 0 {
  ///     Emission::Emit(value)
  ///   } else {
  ///     Emission::Absorb
  ///   }
  /// });
  /// let kept = gate.collect();
  /// gate.accept_many([1, -2, 3]);
  /// assert_eq!(kept.to_vec(), vec![1, 3]);
  /// ```
  pub fn new<F>(transform: F) -> Self
  where
    F: FnMut(I) -> Emission<O> + 'static,
  {
    Self {
      inner: Rc::new(FlowInner {
        label: RefCell::new(None),
        transform: RefCell::new(Box::new(transform)),
        outputs: RefCell::new(Vec::new()),
      }),
    }
  }

  /// Sets a diagnostic label on this node and returns it.
  ///
  /// The label appears in [`Debug`](fmt::Debug) output and in the `flow`
  /// field of trace events; unnamed nodes report as `"flow"`.
  pub fn named(self, label: impl Into<String>) -> Self {
    *self.inner.label.borrow_mut() = Some(label.into());
    self
  }

  /// Returns the diagnostic label, if one was set.
  pub fn label(&self) -> Option<String> {
    self.inner.label.borrow().clone()
  }

  /// Returns how many subscribers are attached to this node.
  pub fn subscriber_count(&self) -> usize {
    self.inner.outputs.borrow().len()
  }

  /// Pushes one value into this node.
  ///
  /// The transform runs first. On [`Emission::Emit`] the result is delivered
  /// to every subscriber in attach order, depth-first: each subscriber
  /// finishes its entire downstream traversal before the next sibling sees
  /// the value. On [`Emission::Absorb`] nothing further happens.
  ///
  /// Propagation is plain recursion. Stack depth grows with pipeline depth,
  /// and the call returns only once the whole reachable subgraph has seen
  /// the value.
  ///
  /// # Panics
  ///
  /// A panicking callback unwinds through the traversal to the caller:
  /// earlier deliveries keep their effects, later siblings are skipped, and
  /// the graph stays usable. Attaching a subscriber to a node that is
  /// mid-delivery, or pushing back into a node whose transform is still on
  /// the stack, panics immediately.
  pub fn accept(&self, value: I) {
    let mut transform = self.inner.transform.borrow_mut();
    let emitted = (*transform)(value);
    drop(transform);

    match emitted {
      Emission::Emit(value) => {
        let outputs = self.inner.outputs.borrow();
        tracing::trace!(
          flow = %self.display_label(),
          subscribers = outputs.len(),
          "Delivering emitted value"
        );
        if let Some((last, rest)) = outputs.split_last() {
          for output in rest {
            output.accept(value.clone());
          }
          last.accept(value);
        }
      }
      Emission::Absorb => {
        tracing::trace!(flow = %self.display_label(), "Absorbed value");
      }
    }
  }

  /// Pushes every value of an iterable, in order.
  ///
  /// Equivalent to calling [`accept`](Flow::accept) once per item: each
  /// value's full traversal completes before the next value enters.
  pub fn accept_many<Values>(&self, values: Values)
  where
    Values: IntoIterator<Item = I>,
  {
    for value in values {
      self.accept(value);
    }
  }

  /// Adds a filtering stage and returns it.
  ///
  /// Values satisfying the predicate pass through unchanged; the rest are
  /// absorbed.
  ///
  /// # Example
  ///
  /// ```rust
  /// use flowweave::Flow;
  ///
  /// let numbers = Flow::start();
  /// let small = numbers.filter(|value: &i32| *value < 5).collect();
  /// numbers.accept_many(1..10);
  /// assert_eq!(small.to_vec(), vec![1, 2, 3, 4]);
  /// ```
  pub fn filter<F>(&self, mut predicate: F) -> Flow<O, O>
  where
    F: FnMut(&O) -> bool + 'static,
  {
    let child = Flow::new(move |value: O| {
      if predicate(&value) {
        Emission::Emit(value)
      } else {
        Emission::Absorb
      }
    });
    self.attach(Box::new(child.clone()));
    child
  }

  /// Adds a mapping stage and returns it.
  ///
  /// The mapping is total: its result is always emitted, so mapping into an
  /// `Option` delivers `Some` and `None` downstream as ordinary payloads.
  /// Use [`filter`](Flow::filter) to drop values.
  pub fn map<V, F>(&self, mut apply: F) -> Flow<O, V>
  where
    V: Clone + 'static,
    F: FnMut(O) -> V + 'static,
  {
    let child = Flow::new(move |value: O| Emission::Emit(apply(value)));
    self.attach(Box::new(child.clone()));
    child
  }

  /// Adds an observation stage and returns it.
  ///
  /// The observer sees each value by reference before it passes through
  /// unchanged. Useful for logging, probes, and tests.
  pub fn peep<F>(&self, mut observer: F) -> Flow<O, O>
  where
    F: FnMut(&O) + 'static,
  {
    let child = Flow::new(move |value: O| {
      observer(&value);
      Emission::Emit(value)
    });
    self.attach(Box::new(child.clone()));
    child
  }

  /// Adds a one-to-many expansion stage and returns its downstream root.
  ///
  /// For each accepted value the selector produces any number of items,
  /// which are pushed into the returned flow in iteration order before the
  /// next upstream value arrives. An empty expansion emits nothing. A folder
  /// flow, for example, becomes a file flow with every folder replaced by
  /// its entries.
  ///
  /// # Example
  ///
  /// ```rust
  /// use flowweave::Flow;
  ///
  /// let folders = Flow::start();
  /// let files = folders
  ///   .select(|folder: &str| match folder {
  ///     "etc" => vec!["passwd", "hosts"],
  ///     _ => vec![],
  ///   })
  ///   .collect();
  /// folders.accept("etc");
  /// assert_eq!(files.to_vec(), vec!["passwd", "hosts"]);
  /// ```
  pub fn select<S, It, F>(&self, selector: F) -> Flow<S, S>
  where
    S: Clone + 'static,
    It: IntoIterator<Item = S> + 'static,
    F: FnMut(O) -> It + 'static,
  {
    let child = Flow::start();
    self.attach(Box::new(Selector::new(selector, child.clone())));
    child
  }

  /// Splits this flow into one branch per class label.
  ///
  /// `classify` names the classes a value belongs to; the value is delivered
  /// to the branch of every named class registered here, and names with no
  /// registered branch are ignored. Branches come back in `classes` order.
  /// When `classes` repeats a label, the last registration receives the
  /// deliveries and earlier ones stay silent.
  ///
  /// # Example
  ///
  /// ```rust
  /// use std::collections::HashSet;
  /// use flowweave::Flow;
  ///
  /// let numbers = Flow::start();
  /// let branches = numbers.segregate(
  ///   |value: &i32| HashSet::from([if value % 2 == 0 { "even" } else { "odd" }]),
  ///   ["even", "odd"],
  /// );
  /// let evens = branches[0].collect();
  /// numbers.accept_many(1..=4);
  /// assert_eq!(evens.to_vec(), vec![2, 4]);
  /// ```
  pub fn segregate<C, F>(
    &self,
    classify: F,
    classes: impl IntoIterator<Item = C>,
  ) -> Vec<Flow<O, O>>
  where
    C: Eq + Hash + 'static,
    F: FnMut(&O) -> HashSet<C> + 'static,
  {
    let router = Classifier::new(classify, classes);
    let branches = router.branches();
    self.attach(Box::new(router));
    branches
  }

  /// Like [`segregate`](Flow::segregate), with a catch-all branch appended.
  ///
  /// The catch-all is the final element of the returned vector. It receives
  /// a value exactly once when classification names no registered class at
  /// all, the empty set included; a value that matched at least one branch
  /// never reaches it.
  pub fn segregate_with_unclassified<C, F>(
    &self,
    classify: F,
    classes: impl IntoIterator<Item = C>,
  ) -> Vec<Flow<O, O>>
  where
    C: Eq + Hash + 'static,
    F: FnMut(&O) -> HashSet<C> + 'static,
  {
    let router = Classifier::with_fallback(classify, classes);
    let branches = router.branches();
    self.attach(Box::new(router));
    branches
  }

  /// Attaches a collection stage appending to an externally owned target.
  ///
  /// Several flows may collect into the same target; appends interleave in
  /// arrival order.
  pub fn collect_to(&self, target: &Collected<O>) {
    self.attach(Box::new(Collector::new(target.clone())));
  }

  /// Attaches a collection stage and returns its freshly created target.
  ///
  /// The target starts empty and fills as values are pushed.
  ///
  /// # Example
  ///
  /// ```rust
  /// use flowweave::Flow;
  ///
  /// let words = Flow::start();
  /// let collected = words.collect();
  /// assert!(collected.is_empty());
  /// words.accept("sable");
  /// assert_eq!(collected.to_vec(), vec!["sable"]);
  /// ```
  pub fn collect(&self) -> Collected<O> {
    let target = Collected::new();
    self.collect_to(&target);
    target
  }

  fn attach(&self, subscriber: Box<dyn Sink<O>>) {
    let mut outputs = self.inner.outputs.borrow_mut();
    outputs.push(subscriber);
    tracing::debug!(
      flow = %self.display_label(),
      subscribers = outputs.len(),
      "Attached subscriber"
    );
  }

  fn display_label(&self) -> String {
    self
      .inner
      .label
      .borrow()
      .clone()
      .unwrap_or_else(|| String::from("flow"))
  }
}

impl<I, O> Clone for Flow<I, O>
where
  I: 'static,
  O: Clone + 'static,
{
  fn clone(&self) -> Self {
    Self {
      inner: Rc::clone(&self.inner),
    }
  }
}

impl<I, O> Sink<I> for Flow<I, O>
where
  I: 'static,
  O: Clone + 'static,
{
  fn accept(&self, value: I) {
    Flow::accept(self, value);
  }
}

impl<I, O> fmt::Debug for Flow<I, O>
where
  I: 'static,
  O: Clone + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Flow")
      .field("label", &self.inner.label.borrow())
      .field("subscribers", &self.inner.outputs.borrow().len())
      .finish()
  }
}
