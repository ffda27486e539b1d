//! # FlowWeave
//!
//! Composable, synchronous, push-based dataflow in pure Rust.
//!
//! FlowWeave builds processing pipelines as a forest of typed nodes. Values
//! are injected at a root and propagate depth-first through transformation,
//! filtering, and fan-out stages, triggering side effects along the way.
//!
//! ## Key Features
//!
//! - **Push-Based Propagation**: One `accept` call drives the whole reachable subgraph
//! - **Synchronous**: No executor, no channels; plain call-stack recursion
//! - **Type-Safe**: Every edge is typed, and stages may change the type mid-pipe
//! - **Composable**: filter / map / peep / select / segregate chain freely
//! - **Explicit Verdicts**: Transforms emit or absorb; absence is never a sentinel
//!
//! ## Quick Start
//!
//! ```rust
//! use flowweave::Flow;
//!
//! let numbers = Flow::start();
//! let evens = numbers.filter(|value: &i32| value % 2 == 0).collect();
//! numbers.accept_many(1..=6);
//! assert_eq!(evens.to_vec(), vec![2, 4, 6]);
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Shared collection targets fed by pipelines.
pub mod collect;
/// Transform verdicts: emit a value downstream or absorb it.
pub mod emission;
/// Flow nodes, propagation, and the combinator surface.
pub mod flow;
/// The receiving end of an edge: anything that can accept pushed values.
pub mod sink;

mod classify;
mod select;

pub use collect::Collected;
pub use emission::Emission;
pub use flow::Flow;
pub use sink::Sink;
