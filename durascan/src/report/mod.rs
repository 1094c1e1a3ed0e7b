//! Machine-readable report formats for CI integration.

pub mod github;
pub mod sarif;
