//! Expansion sink behind selection: each accepted value becomes zero or more
//! items pushed into a single downstream root in iteration order.

use crate::flow::Flow;
use crate::sink::Sink;
use std::cell::RefCell;
use std::marker::PhantomData;

pub(crate) struct Selector<I, S, It, F> {
  selector: RefCell<F>,
  downstream: Flow<S, S>,
  _marker: PhantomData<fn(I) -> It>,
}

impl<I, S, It, F> Selector<I, S, It, F>
where
  S: Clone + 'static,
  It: IntoIterator<Item = S>,
  F: FnMut(I) -> It,
{
  pub(crate) fn new(selector: F, downstream: Flow<S, S>) -> Self {
    Self {
      selector: RefCell::new(selector),
      downstream,
      _marker: PhantomData,
    }
  }
}

impl<I, S, It, F> Sink<I> for Selector<I, S, It, F>
where
  S: Clone + 'static,
  It: IntoIterator<Item = S>,
  F: FnMut(I) -> It,
{
  fn accept(&self, value: I) {
    let mut selector = self.selector.borrow_mut();
    let items = (*selector)(value);
    drop(selector);

    let mut produced = 0usize;
    for item in items {
      produced += 1;
      self.downstream.accept(item);
    }
    tracing::trace!(produced, "Expanded one value into downstream items");
  }
}
