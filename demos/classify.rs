//! Segregation demo: route a stream of integers into even/odd branches.
//!
//! The classifier also names divisibility classes (`div2`..`div9`) that have
//! no registered branch; those labels are simply ignored. Run with
//! `cargo run --example classify`.

use flowweave::Flow;
use std::collections::HashSet;

fn classify(value: &i32) -> HashSet<String> {
  let mut classes = HashSet::new();
  classes.insert(if value % 2 == 0 { "even" } else { "odd" }.to_string());
  for divisor in 2..10 {
    if value % divisor == 0 {
      classes.insert(format!("div{divisor}"));
    }
  }
  classes
}

fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .init();

  let numbers = Flow::start().named("numbers");
  let branches = numbers.segregate(classify, ["even".to_string(), "odd".to_string()]);

  let all_evens = branches[0].peep(|value| println!("{value} is even")).collect();
  branches[1].peep(|value| println!("{value} is odd"));

  numbers.accept_many(0..100);

  println!("{all_evens:?}");
}
