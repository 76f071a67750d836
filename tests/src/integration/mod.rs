//! End-to-end genesis bootstrap flows.

pub mod bootstrap_flow;
