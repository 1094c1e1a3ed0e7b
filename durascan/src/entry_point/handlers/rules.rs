use anyhow::Result;
use serde_json::json;

use crate::rules::rule_registry::all_rule_descriptors;

/// Lists every registered rule, as a table or as JSON.
pub(crate) fn handle_rules<W: std::io::Write>(json: bool, writer: &mut W) -> Result<i32> {
    let descriptors = all_rule_descriptors();

    if json {
        let rules: Vec<serde_json::Value> = descriptors
            .iter()
            .map(|descriptor| {
                json!({
                    "id": descriptor.id,
                    "name": descriptor.name,
                    "category": descriptor.category.as_str(),
                    "default_severity": descriptor.default_severity.as_str(),
                    "docs_url": descriptor.docs_url,
                })
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&rules)?)?;
    } else {
        crate::output::print_rule_catalog(writer, descriptors)?;
        writeln!(writer, "{} rules registered", descriptors.len())?;
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn json_listing_covers_every_rule() {
        let mut buffer = Vec::new();
        let code = handle_rules(true, &mut buffer).unwrap();
        assert_eq!(code, 0);

        let parsed: Vec<serde_json::Value> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.len(), all_rule_descriptors().len());
        assert!(parsed
            .iter()
            .any(|rule| rule["id"] == "DS-N101" && rule["category"] == "Determinism"));
    }

    #[test]
    fn table_listing_names_rule_ids() {
        let mut buffer = Vec::new();
        handle_rules(false, &mut buffer).unwrap();
        let out = String::from_utf8(buffer).unwrap();
        assert!(out.contains("DS-N101"));
        assert!(out.contains("rules registered"));
    }
}
