//! # Transform Verdicts
//!
//! Every node transform answers with an [`Emission`]: either a value to hand
//! to the node's subscribers, or the decision to absorb the input and end
//! propagation on that branch.
//!
//! Keeping the verdict a dedicated enum, rather than an `Option` or a null
//! sentinel, separates the propagation decision from the payload type. A
//! pipeline carrying `Option<T>` payloads stays unambiguous: `Emit(None)` is
//! a delivered absent value, `Absorb` is suppression.

/// The outcome of applying a node's transform to one input value.
///
/// # Example
///
/// ```rust
/// use flowweave::Emission;
///
/// let verdict = Emission::Emit(Some(7));
/// assert!(verdict.is_emit());
/// assert_ne!(verdict, Emission::Absorb);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission<T> {
  /// Propagate this value to every subscriber of the node.
  Emit(T),
  /// Deliver nothing; propagation ends here for this input.
  Absorb,
}

impl<T> Emission<T> {
  /// Returns `true` for [`Emission::Emit`].
  pub fn is_emit(&self) -> bool {
    matches!(self, Emission::Emit(_))
  }

  /// Returns `true` for [`Emission::Absorb`].
  pub fn is_absorb(&self) -> bool {
    matches!(self, Emission::Absorb)
  }
}
