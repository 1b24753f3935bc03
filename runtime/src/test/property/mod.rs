//! Property-based tests for the matching runtime.
