//! Typed metadata registry for all rule IDs.

mod catalog;
mod lookup;
mod types;

pub use catalog::{DOC_ACTIVITIES, DOC_BINDINGS, DOC_DETERMINISM};
pub use lookup::{all_rule_descriptors, get_rule_descriptor, rule_registry_by_id};
pub use types::{RuleCategory, RuleDescriptor, RuleSeverity};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ids;

    #[test]
    fn test_registry_contains_known_rule_with_metadata() {
        let descriptor = get_rule_descriptor(ids::RULE_ID_CURRENT_TIME)
            .expect("expected current-time rule to be present");
        assert_eq!(descriptor.category, RuleCategory::Determinism);
        assert_eq!(descriptor.default_severity, RuleSeverity::High);
        assert_eq!(descriptor.docs_url, DOC_DETERMINISM);
    }

    #[test]
    fn test_registry_contains_binding_rules() {
        let descriptor = get_rule_descriptor(ids::RULE_ID_CLIENT_BINDING)
            .expect("expected client binding rule to be present");
        assert_eq!(descriptor.category.as_str(), "Binding");
        assert_eq!(descriptor.default_severity.as_str(), "CRITICAL");
        assert_eq!(descriptor.docs_url, DOC_BINDINGS);
    }

    #[test]
    fn test_every_descriptor_id_is_unique() {
        let descriptors = all_rule_descriptors();
        assert_eq!(descriptors.len(), rule_registry_by_id().len());
        assert_eq!(descriptors.len(), 13);
    }

    #[test]
    fn test_severity_ordering_supports_thresholds() {
        assert!(RuleSeverity::Critical > RuleSeverity::High);
        assert!(RuleSeverity::High > RuleSeverity::Medium);
        assert!(RuleSeverity::Medium > RuleSeverity::Low);
        assert_eq!(RuleSeverity::parse("medium"), Some(RuleSeverity::Medium));
        assert_eq!(RuleSeverity::parse("bogus"), None);
    }
}
