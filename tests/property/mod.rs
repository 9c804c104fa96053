//! Property-based tests for dirsnap

mod determinism;
