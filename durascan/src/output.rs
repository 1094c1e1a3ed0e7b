//! Terminal output: progress indicators, findings tables, and report layouts.

mod progress;
mod reports;
mod summary;
mod tables;

pub use progress::{create_progress_bar, create_spinner, print_exclusion_list};
pub use reports::{print_report, print_report_quiet};
pub use summary::{print_analysis_stats, print_header, print_summary_pills};
pub use tables::{print_findings, print_functions, print_parse_errors, print_rule_catalog};
