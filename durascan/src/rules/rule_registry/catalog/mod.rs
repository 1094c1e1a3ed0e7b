pub(super) mod activity;
pub(super) mod binding;
pub(super) mod determinism;

pub(super) use super::types::{rule, RuleCategory, RuleDescriptor, RuleSeverity};

/// Docs path for replay-determinism guidance.
pub const DOC_DETERMINISM: &str = "docs/determinism.md";
/// Docs path for trigger-binding guidance.
pub const DOC_BINDINGS: &str = "docs/bindings.md";
/// Docs path for activity-call guidance.
pub const DOC_ACTIVITIES: &str = "docs/activity-calls.md";
