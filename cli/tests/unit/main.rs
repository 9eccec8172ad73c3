//! Unit tests for dodocker CLI
//!
//! These tests use in-memory adapters and run fast without external I/O.

mod architecture;
mod credentials;
mod fakes;
mod property_tests;
