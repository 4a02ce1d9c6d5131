//! Canonical restricted S-expressions: data model, grammar, star-form
//! matchers, and the `≤` less-permissive-than comparator.
//!
//! This crate has no notion of "rules" or "queries" as such — those are
//! just `Element` values from the caller's point of view. `spocp-store`
//! and `spocp-engine` build the policy vocabulary on top of this grammar.

pub mod compare;
pub mod element;
pub mod error;
pub mod grammar;
pub mod matchers;

pub use compare::leq;
pub use element::{AtomValue, Bound, Element, List, Op, RangeForm, RangeKind, StarForm};
pub use error::ParseError;
pub use grammar::{advanced_form, parse, render};
