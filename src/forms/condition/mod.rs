// SPDX-License-Identifier: MIT

//! Condition evaluation for field visibility
//!
//! A condition compares the current value of another field against a
//! literal, e.g. `age greater_than_or_equals 18` or
//! `status equals 'closed'`. Values are coerced explicitly (see `coerce`).

mod ast;
pub mod coerce;
mod evaluator;

pub use ast::{Action, Condition, ConditionalLogic, LogicalOperator, Operator};
pub use evaluator::{evaluate, evaluate_condition};
