use crate::analyzer::{FunctionRecord, ParseError};
use crate::rules::rule_registry::RuleDescriptor;
use crate::rules::Finding;
use crate::utils::normalize_display_path;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use std::io::Write;

fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);

    if cfg!(test) {
        table.set_width(120);
    }
    table
}

fn get_severity_color(severity: &str) -> Color {
    match severity.to_uppercase().as_str() {
        "CRITICAL" | "HIGH" => Color::Red,
        "MEDIUM" => Color::Yellow,
        "LOW" => Color::Blue,
        _ => Color::White,
    }
}

/// Print a list of findings (Determinism, Bindings, Activity calls).
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_findings(
    writer: &mut impl Write,
    title: &str,
    findings: &[Finding],
) -> std::io::Result<()> {
    if findings.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", title.bold().underline())?;
    let mut table = create_table(vec!["Rule ID", "Message", "Location", "Severity"]);

    for finding in findings {
        let location = format!("{}:{}", normalize_display_path(&finding.file), finding.line);
        let severity_color = get_severity_color(&finding.severity);
        let rule_id = if finding.fix.is_some() {
            format!("{} [*]", finding.rule_id)
        } else {
            finding.rule_id.clone()
        };

        table.add_row(vec![
            Cell::new(rule_id).add_attribute(Attribute::Dim),
            Cell::new(&finding.message).add_attribute(Attribute::Bold),
            Cell::new(location),
            Cell::new(&finding.severity).fg(severity_color),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print the durable function inventory (orchestrators, activities, entities,
/// client bindings).
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_functions(
    writer: &mut impl Write,
    title: &str,
    functions: &[FunctionRecord],
) -> std::io::Result<()> {
    if functions.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", title.bold().underline())?;
    let mut table = create_table(vec!["Kind", "Name", "Binding", "Location"]);

    for function in functions {
        let location = format!(
            "{}:{}",
            normalize_display_path(&function.file),
            function.line
        );
        table.add_row(vec![
            Cell::new(function.kind),
            Cell::new(&function.name).add_attribute(Attribute::Bold),
            Cell::new(function.binding.as_deref().unwrap_or("-")),
            Cell::new(location),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print the rule catalog.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_rule_catalog(
    writer: &mut impl Write,
    descriptors: &[RuleDescriptor],
) -> std::io::Result<()> {
    writeln!(writer, "\n{}", "Available Rules".bold().underline())?;
    let mut table = create_table(vec!["Rule ID", "Name", "Category", "Severity", "Docs"]);

    for descriptor in descriptors {
        let severity = descriptor.default_severity.as_str();
        table.add_row(vec![
            Cell::new(descriptor.id).add_attribute(Attribute::Bold),
            Cell::new(descriptor.name),
            Cell::new(descriptor.category.as_str()),
            Cell::new(severity).fg(get_severity_color(severity)),
            Cell::new(descriptor.docs_url).add_attribute(Attribute::Dim),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print a list of parse errors.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_parse_errors(
    writer: &mut impl Write,
    errors: &[ParseError],
) -> std::io::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", "Parse Errors".bold().underline().red())?;
    let mut table = create_table(vec!["File", "Error"]);

    for error in errors {
        let file = if error.line > 0 {
            format!("{}:{}", normalize_display_path(&error.file), error.line)
        } else {
            normalize_display_path(&error.file)
        };
        table.add_row(vec![
            Cell::new(file).add_attribute(Attribute::Bold),
            Cell::new(&error.message).fg(Color::Red),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}
