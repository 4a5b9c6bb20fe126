//! In-crate test suite: shared fixtures, unit scenarios and property tests.

mod common;
mod unit;
