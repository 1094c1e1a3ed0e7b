use crate::rules::ids;

use super::{rule, RuleCategory, RuleDescriptor, RuleSeverity, DOC_BINDINGS};

pub(crate) static BINDING_RULES: &[RuleDescriptor] = &[
    rule(
        ids::RULE_ID_ORCHESTRATION_BINDING,
        "orchestration-context-binding",
        RuleCategory::Binding,
        RuleSeverity::Critical,
        DOC_BINDINGS,
    ),
    rule(
        ids::RULE_ID_ACTIVITY_BINDING,
        "activity-input-binding",
        RuleCategory::Binding,
        RuleSeverity::Critical,
        DOC_BINDINGS,
    ),
    rule(
        ids::RULE_ID_CLIENT_BINDING,
        "durable-client-binding",
        RuleCategory::Binding,
        RuleSeverity::Critical,
        DOC_BINDINGS,
    ),
    rule(
        ids::RULE_ID_ENTITY_BINDING,
        "entity-context-binding",
        RuleCategory::Binding,
        RuleSeverity::Critical,
        DOC_BINDINGS,
    ),
];
