mod analysis;
mod functions;
mod rules;

pub(crate) use analysis::handle_analysis;
pub(crate) use functions::handle_functions;
pub(crate) use rules::handle_rules;
