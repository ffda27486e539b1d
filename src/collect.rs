//! # Collection Targets
//!
//! [`Collected`] is an ordered sequence shared between a pipeline and the
//! caller: a collection stage appends every value it receives, and any handle
//! can read the contents at any point between pushes. Handles are cheap
//! clones over the same storage, so several pipelines can feed one target.

use crate::sink::Sink;
use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

/// A shared, ordered collection fed by one or more pipelines.
///
/// Values appear in arrival order. A freshly created target is empty and
/// valid to read; reading never consumes unless [`take`](Collected::take) is
/// used.
///
/// # Example
///
/// ```rust
/// use flowweave::Collected;
///
/// let collected = Collected::new();
/// collected.push("item");
/// assert_eq!(collected.len(), 1);
/// assert_eq!(collected.take(), vec!["item"]);
/// assert!(collected.is_empty());
/// ```
pub struct Collected<T> {
  items: Rc<RefCell<Vec<T>>>,
}

impl<T> Collected<T> {
  /// Creates an empty target.
  pub fn new() -> Self {
    Self {
      items: Rc::new(RefCell::new(Vec::new())),
    }
  }

  /// Appends one value.
  pub fn push(&self, value: T) {
    self.items.borrow_mut().push(value);
  }

  /// Returns the number of collected values.
  pub fn len(&self) -> usize {
    self.items.borrow().len()
  }

  /// Returns `true` when nothing has been collected.
  pub fn is_empty(&self) -> bool {
    self.items.borrow().is_empty()
  }

  /// Removes and returns everything collected so far, leaving the target
  /// empty for further collection.
  pub fn take(&self) -> Vec<T> {
    mem::take(&mut *self.items.borrow_mut())
  }
}

impl<T: Clone> Collected<T> {
  /// Returns a copy of the collected values, oldest first.
  pub fn to_vec(&self) -> Vec<T> {
    self.items.borrow().clone()
  }
}

impl<T> Clone for Collected<T> {
  fn clone(&self) -> Self {
    Self {
      items: Rc::clone(&self.items),
    }
  }
}

impl<T> Default for Collected<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: fmt::Debug> fmt::Debug for Collected<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Collected").field(&self.items.borrow()).finish()
  }
}

/// The sink a collection stage attaches: appends every accepted value to its
/// target.
pub(crate) struct Collector<T> {
  target: Collected<T>,
}

impl<T> Collector<T> {
  pub(crate) fn new(target: Collected<T>) -> Self {
    Self { target }
  }
}

impl<T> Sink<T> for Collector<T> {
  fn accept(&self, value: T) {
    self.target.push(value);
  }
}
