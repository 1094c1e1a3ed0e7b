use crate::rules::ids;

use super::{rule, RuleCategory, RuleDescriptor, RuleSeverity, DOC_ACTIVITIES};

pub(crate) static ACTIVITY_RULES: &[RuleDescriptor] = &[
    rule(
        ids::RULE_ID_UNKNOWN_ACTIVITY,
        "unknown-activity",
        RuleCategory::ActivityCall,
        RuleSeverity::Critical,
        DOC_ACTIVITIES,
    ),
    rule(
        ids::RULE_ID_ACTIVITY_INPUT_TYPE,
        "activity-input-type",
        RuleCategory::ActivityCall,
        RuleSeverity::Critical,
        DOC_ACTIVITIES,
    ),
];
