//! # Sinks
//!
//! [`Sink`] is the receiving end of an edge: anything that can take a pushed
//! value and turn it into effects. Flow nodes are sinks, and so are the
//! crate's routing, expansion, and collection adapters; subscriber lists hold
//! `Box<dyn Sink<V>>` so a node never knows what kind of consumer sits behind
//! an edge.
//!
//! The receiver is `&self`: sinks use interior mutability so one instance can
//! be shared between the graph and user-held handles on a single thread.

use std::rc::Rc;

/// A consumer of pushed values.
///
/// Accepting a value may cause any number of effects, including pushing
/// further values into other sinks, and returns nothing. There is no error
/// channel; a sink that cannot proceed panics.
///
/// # Example
///
/// ```rust
/// use flowweave::{Flow, Sink};
///
/// let flow = Flow::start();
/// let out = flow.collect();
/// Sink::accept(&flow, 5);
/// assert_eq!(out.to_vec(), vec![5]);
/// ```
pub trait Sink<V> {
  /// Accepts one value.
  fn accept(&self, value: V);
}

impl<V, S> Sink<V> for &S
where
  S: Sink<V> + ?Sized,
{
  fn accept(&self, value: V) {
    (**self).accept(value);
  }
}

impl<V, S> Sink<V> for Box<S>
where
  S: Sink<V> + ?Sized,
{
  fn accept(&self, value: V) {
    (**self).accept(value);
  }
}

impl<V, S> Sink<V> for Rc<S>
where
  S: Sink<V> + ?Sized,
{
  fn accept(&self, value: V) {
    (**self).accept(value);
  }
}
