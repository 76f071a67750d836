//! # Malibu Test Suite
//!
//! Unified test crate for cross-crate flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # End-to-end genesis bootstrap flows
//!     └── bootstrap_flow.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p malibu-tests
//!
//! # By category
//! cargo test -p malibu-tests integration::
//! ```

pub mod integration;
