//! Per-module import resolution.
//!
//! Banned-API matching works on canonical dotted paths, so `import datetime
//! as dt; dt.datetime.now()` must resolve to `datetime.datetime.now` before
//! the tables are consulted.

use crate::fix::Edit;
use compact_str::CompactString;
use ruff_python_ast::{self as ast, Expr, ModModule, Stmt};
use ruff_text_size::Ranged;
use rustc_hash::FxHashMap;

/// Builds the dotted path of a `Name`/`Attribute` chain, e.g. `a.b.c`.
///
/// Returns `None` for anything that is not a pure attribute chain (calls,
/// subscripts, literals).
#[must_use]
pub fn dotted_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name(name) => Some(name.id.as_str().to_owned()),
        Expr::Attribute(attr) => {
            let mut base = dotted_path(&attr.value)?;
            base.push('.');
            base.push_str(attr.attr.as_str());
            Some(base)
        }
        _ => None,
    }
}

/// How `timedelta` can be spelled in a generated fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimedeltaBinding {
    /// An existing binding covers it (`timedelta` or `datetime.timedelta`).
    Name(String),
    /// No binding exists; the fix must insert this import edit.
    NeedsImport(Edit),
}

/// Local-name to canonical-path bindings for one module.
#[derive(Debug, Default, Clone)]
pub struct ImportMap {
    bindings: FxHashMap<CompactString, String>,
    import_insertion_offset: usize,
    insertion_needs_leading_newline: bool,
}

impl ImportMap {
    /// Scans a parsed module for import bindings.
    ///
    /// Function-local imports are folded into the same flat namespace; for
    /// canonicalizing banned-API paths that approximation is always safe.
    #[must_use]
    pub fn build(module: &ModModule, source: &str) -> Self {
        let mut map = Self::default();
        let mut last_import_end: Option<usize> = None;

        for stmt in &module.body {
            if matches!(stmt, Stmt::Import(_) | Stmt::ImportFrom(_)) {
                last_import_end = Some(stmt.range().end().to_usize());
            }
        }
        let anchor = last_import_end.or_else(|| docstring_end(module));
        map.set_insertion_point(anchor, source);

        for stmt in &module.body {
            map.collect_stmt(stmt);
        }
        map
    }

    fn set_insertion_point(&mut self, anchor: Option<usize>, source: &str) {
        match anchor {
            None => {
                self.import_insertion_offset = 0;
                self.insertion_needs_leading_newline = false;
            }
            Some(end) => {
                // Insert on the line after the anchor statement.
                match source[end..].find('\n') {
                    Some(nl) => {
                        self.import_insertion_offset = end + nl + 1;
                        self.insertion_needs_leading_newline = false;
                    }
                    None => {
                        self.import_insertion_offset = source.len();
                        self.insertion_needs_leading_newline = true;
                    }
                }
            }
        }
    }

    fn collect_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Import(import) => {
                for alias in &import.names {
                    let target = alias.name.as_str();
                    match &alias.asname {
                        Some(asname) => {
                            self.bindings
                                .insert(CompactString::from(asname.as_str()), target.to_owned());
                        }
                        None => {
                            // `import a.b` binds only the top-level `a`.
                            let first = target.split('.').next().unwrap_or(target);
                            self.bindings
                                .insert(CompactString::from(first), first.to_owned());
                        }
                    }
                }
            }
            Stmt::ImportFrom(import_from) => {
                let prefix = if import_from.level > 0 {
                    // Relative imports never resolve to a stdlib/SDK path;
                    // keep them distinct so they cannot match banned tables.
                    format!(
                        "{}{}",
                        ".".repeat(import_from.level as usize),
                        import_from.module.as_deref().unwrap_or("")
                    )
                } else {
                    import_from.module.as_deref().unwrap_or("").to_owned()
                };
                for alias in &import_from.names {
                    let name = alias.name.as_str();
                    if name == "*" {
                        continue;
                    }
                    let bound = alias.asname.as_ref().unwrap_or(&alias.name);
                    let target = if prefix.is_empty() {
                        name.to_owned()
                    } else {
                        format!("{prefix}.{name}")
                    };
                    self.bindings
                        .insert(CompactString::from(bound.as_str()), target);
                }
            }
            Stmt::FunctionDef(def) => {
                for inner in &def.body {
                    self.collect_stmt(inner);
                }
            }
            Stmt::ClassDef(def) => {
                for inner in &def.body {
                    self.collect_stmt(inner);
                }
            }
            Stmt::If(if_stmt) => {
                for inner in &if_stmt.body {
                    self.collect_stmt(inner);
                }
                for clause in &if_stmt.elif_else_clauses {
                    for inner in &clause.body {
                        self.collect_stmt(inner);
                    }
                }
            }
            Stmt::Try(try_stmt) => {
                for inner in try_stmt
                    .body
                    .iter()
                    .chain(&try_stmt.orelse)
                    .chain(&try_stmt.finalbody)
                {
                    self.collect_stmt(inner);
                }
                for handler in &try_stmt.handlers {
                    let ast::ExceptHandler::ExceptHandler(h) = handler;
                    for inner in &h.body {
                        self.collect_stmt(inner);
                    }
                }
            }
            Stmt::With(with_stmt) => {
                for inner in &with_stmt.body {
                    self.collect_stmt(inner);
                }
            }
            _ => {}
        }
    }

    /// Returns the canonical target for a locally bound name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// Canonicalizes a dotted path through the import bindings.
    ///
    /// `dt.datetime.now` becomes `datetime.datetime.now` under
    /// `import datetime as dt`; unbound first segments pass through as-is.
    #[must_use]
    pub fn resolve_dotted(&self, path: &str) -> String {
        let (first, rest) = match path.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };
        let canonical_first = self.resolve(first).unwrap_or(first);
        match rest {
            Some(rest) => format!("{canonical_first}.{rest}"),
            None => canonical_first.to_owned(),
        }
    }

    /// Resolves an expression to a canonical dotted path, when it is one.
    #[must_use]
    pub fn resolve_expr(&self, expr: &Expr) -> Option<String> {
        dotted_path(expr).map(|path| self.resolve_dotted(&path))
    }

    /// Determines how generated fixes should spell `timedelta`.
    #[must_use]
    pub fn timedelta_binding(&self) -> TimedeltaBinding {
        // Prefer a direct `from datetime import timedelta` style binding.
        let mut direct: Option<&str> = None;
        let mut via_module: Option<&str> = None;
        for (name, target) in &self.bindings {
            if target == "datetime.timedelta" {
                direct = Some(match direct {
                    Some(existing) if existing <= name.as_str() => existing,
                    _ => name.as_str(),
                });
            } else if target == "datetime" {
                via_module = Some(match via_module {
                    Some(existing) if existing <= name.as_str() => existing,
                    _ => name.as_str(),
                });
            }
        }
        if let Some(name) = direct {
            return TimedeltaBinding::Name(name.to_owned());
        }
        if let Some(module) = via_module {
            return TimedeltaBinding::Name(format!("{module}.timedelta"));
        }

        let text = if self.insertion_needs_leading_newline {
            "\nfrom datetime import timedelta"
        } else {
            "from datetime import timedelta\n"
        };
        TimedeltaBinding::NeedsImport(Edit {
            start_byte: self.import_insertion_offset,
            end_byte: self.import_insertion_offset,
            replacement: text.to_owned(),
        })
    }
}

fn docstring_end(module: &ModModule) -> Option<usize> {
    match module.body.first() {
        Some(Stmt::Expr(expr)) if matches!(*expr.value, Expr::StringLiteral(_)) => {
            Some(expr.range().end().to_usize())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn parse(code: &str) -> ModModule {
        ruff_python_parser::parse_module(code).unwrap().into_syntax()
    }

    #[test]
    fn test_resolves_aliased_imports() {
        let code = "import datetime as dt\nfrom uuid import uuid4\nimport azure.durable_functions as df\n";
        let module = parse(code);
        let imports = ImportMap::build(&module, code);

        assert_eq!(imports.resolve_dotted("dt.datetime.now"), "datetime.datetime.now");
        assert_eq!(imports.resolve_dotted("uuid4"), "uuid.uuid4");
        assert_eq!(
            imports.resolve_dotted("df.Orchestrator.create"),
            "azure.durable_functions.Orchestrator.create"
        );
        assert_eq!(imports.resolve_dotted("unknown.call"), "unknown.call");
    }

    #[test]
    fn test_plain_import_binds_top_level_only() {
        let code = "import http.client\n";
        let module = parse(code);
        let imports = ImportMap::build(&module, code);
        assert_eq!(imports.resolve_dotted("http.client.HTTPSConnection"), "http.client.HTTPSConnection");
    }

    #[test]
    fn test_timedelta_binding_prefers_existing_names() {
        let code = "from datetime import timedelta\n";
        let module = parse(code);
        let imports = ImportMap::build(&module, code);
        assert_eq!(
            imports.timedelta_binding(),
            TimedeltaBinding::Name("timedelta".to_owned())
        );

        let code = "import datetime\n";
        let module = parse(code);
        let imports = ImportMap::build(&module, code);
        assert_eq!(
            imports.timedelta_binding(),
            TimedeltaBinding::Name("datetime.timedelta".to_owned())
        );
    }

    #[test]
    fn test_timedelta_import_inserted_after_last_import() {
        let code = "import uuid\nimport time\n\nx = 1\n";
        let module = parse(code);
        let imports = ImportMap::build(&module, code);
        match imports.timedelta_binding() {
            TimedeltaBinding::NeedsImport(edit) => {
                // Directly after the line holding the last import.
                assert_eq!(edit.start_byte, code.find("\n\nx").unwrap() + 1);
                assert_eq!(edit.replacement, "from datetime import timedelta\n");
            }
            TimedeltaBinding::Name(name) => panic!("unexpected binding {name}"),
        }
    }

    #[test]
    fn test_dotted_path_rejects_calls() {
        let code = "a.b().c\n";
        let module = parse(code);
        let Some(Stmt::Expr(expr)) = module.body.first() else {
            panic!("expected expression statement");
        };
        assert_eq!(dotted_path(&expr.value), None);
    }
}
