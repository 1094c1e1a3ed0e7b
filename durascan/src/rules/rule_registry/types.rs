/// Canonical high-level category for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Replay-determinism rule.
    Determinism,
    /// Trigger-binding rule.
    Binding,
    /// Activity-invocation rule.
    ActivityCall,
}

impl RuleCategory {
    /// Returns the canonical display form for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleCategory::Determinism => "Determinism",
            RuleCategory::Binding => "Binding",
            RuleCategory::ActivityCall => "Activity",
        }
    }
}

/// Default severity for a rule when no override applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleSeverity {
    /// Lowest severity.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
    /// Highest severity.
    Critical,
}

impl RuleSeverity {
    /// Returns the canonical display form for this severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleSeverity::Critical => "CRITICAL",
            RuleSeverity::High => "HIGH",
            RuleSeverity::Medium => "MEDIUM",
            RuleSeverity::Low => "LOW",
        }
    }

    /// Parses a case-insensitive severity name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "CRITICAL" => Some(RuleSeverity::Critical),
            "HIGH" => Some(RuleSeverity::High),
            "MEDIUM" => Some(RuleSeverity::Medium),
            "LOW" => Some(RuleSeverity::Low),
            _ => None,
        }
    }
}

/// Strongly typed rule metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleDescriptor {
    /// Stable rule identifier (for example `DS-N101`).
    pub id: &'static str,
    /// Short human-readable rule name.
    pub name: &'static str,
    /// Rule category.
    pub category: RuleCategory,
    /// Default severity for the rule.
    pub default_severity: RuleSeverity,
    /// Documentation URL/path for end-user guidance.
    pub docs_url: &'static str,
}

pub(super) const fn rule(
    id: &'static str,
    name: &'static str,
    category: RuleCategory,
    default_severity: RuleSeverity,
    docs_url: &'static str,
) -> RuleDescriptor {
    RuleDescriptor {
        id,
        name,
        category,
        default_severity,
        docs_url,
    }
}
