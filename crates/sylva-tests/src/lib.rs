//! Integration test crate for Sylva.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the other sylva crates to verify they work together.

#[cfg(test)]
mod playback;

#[cfg(test)]
mod generation;
