//! Property-based tests for determinism and structural guarantees

mod fallback_determinism;
