use crate::rules::ids;

use super::{rule, RuleCategory, RuleDescriptor, RuleSeverity, DOC_DETERMINISM};

pub(crate) static DETERMINISM_RULES: &[RuleDescriptor] = &[
    rule(
        ids::RULE_ID_CURRENT_TIME,
        "current-time",
        RuleCategory::Determinism,
        RuleSeverity::High,
        DOC_DETERMINISM,
    ),
    rule(
        ids::RULE_ID_UUID_RANDOM,
        "fresh-guid-or-random",
        RuleCategory::Determinism,
        RuleSeverity::High,
        DOC_DETERMINISM,
    ),
    rule(
        ids::RULE_ID_ENV_READ,
        "environment-read",
        RuleCategory::Determinism,
        RuleSeverity::Medium,
        DOC_DETERMINISM,
    ),
    rule(
        ids::RULE_ID_IO_CLIENT,
        "io-client",
        RuleCategory::Determinism,
        RuleSeverity::High,
        DOC_DETERMINISM,
    ),
    rule(
        ids::RULE_ID_BLOCKING_SLEEP,
        "blocking-sleep",
        RuleCategory::Determinism,
        RuleSeverity::High,
        DOC_DETERMINISM,
    ),
    rule(
        ids::RULE_ID_SPAWN,
        "thread-or-process-spawn",
        RuleCategory::Determinism,
        RuleSeverity::High,
        DOC_DETERMINISM,
    ),
    rule(
        ids::RULE_ID_TRANSITIVE_CALL,
        "nondeterministic-call",
        RuleCategory::Determinism,
        RuleSeverity::Medium,
        DOC_DETERMINISM,
    ),
];
