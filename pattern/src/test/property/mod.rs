//! Property-based tests and pattern generators.

#[cfg(test)]
mod substitute;

pub mod generators;
