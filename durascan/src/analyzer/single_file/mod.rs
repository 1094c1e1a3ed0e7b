//! Per-file analysis passes.
//!
//! `discover` parses a file and extracts its durable registrations; `lint`
//! re-walks the kept AST against the completed project index. Keeping the
//! parsed module between the two phases avoids parsing every file twice.

mod analyze_code;
mod discover;
mod lint;

pub(crate) use discover::FileDiscovery;
pub(crate) use lint::{LintOutput, RootCall};
