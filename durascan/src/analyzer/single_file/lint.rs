//! Lint pass: walk a parsed file against the completed project index.

use compact_str::CompactString;
use ruff_python_ast::{self as ast, Expr, Stmt};
use ruff_text_size::Ranged;
use std::path::PathBuf;
use std::sync::Arc;

use super::discover::FileDiscovery;
use crate::analyzer::DuraScan;
use crate::constants::MAX_RECURSION_DEPTH;
use crate::durable::{FunctionIndex, ScopeOrigin};
use crate::rules::ids::RULE_ID_TRANSITIVE_CALL;
use crate::rules::{activity, binding, determinism, Context, Finding, Rule, ScopeState};
use crate::utils::{LineIndex, SuppressedLines};

/// A direct call from an orchestrator body to a module-local helper.
///
/// These cannot be judged while the file is being walked: whether the helper
/// eventually reaches a non-deterministic API depends on call edges from other
/// functions. They are recorded here and materialized into findings during
/// aggregation, once the project-wide taint set is complete.
#[derive(Debug, Clone)]
pub(crate) struct RootCall {
    /// Qualified name of the called helper.
    pub(crate) callee_qualified: String,
    /// Bare name as written at the call site.
    pub(crate) callee_display: CompactString,
    /// File containing the call.
    pub(crate) file: Arc<PathBuf>,
    /// 1-indexed line of the call.
    pub(crate) line: usize,
    /// 1-indexed column of the call.
    pub(crate) col: usize,
    /// Whether a pragma on the call line suppresses the transitive-call rule.
    pub(crate) suppressed: bool,
}

/// Per-file lint output, merged during aggregation.
#[derive(Debug, Default)]
pub(crate) struct LintOutput {
    pub(crate) findings: Vec<Finding>,
    pub(crate) root_calls: Vec<RootCall>,
    pub(crate) line_count: usize,
}

impl DuraScan {
    /// Runs every rule over one discovered file.
    pub(crate) fn lint_single_file(
        &self,
        fd: &FileDiscovery,
        index: &FunctionIndex,
    ) -> LintOutput {
        let line_index = LineIndex::new(&fd.source);
        let context = Context {
            file: fd.file.as_ref(),
            source: &fd.source,
            line_index: &line_index,
            config: &self.config,
            imports: &fd.imports,
            index,
        };

        // Trigger-binding checks run straight off the registration records.
        let findings: Vec<Finding> = fd
            .discovery
            .functions
            .iter()
            .filter_map(binding::check_trigger_binding)
            .collect();

        let mut rules = determinism::get_determinism_rules();
        rules.extend(activity::get_activity_rules());

        let mut walker = LintWalker {
            context: &context,
            file: &fd.file,
            module: &fd.discovery.module,
            suppressed: &fd.suppressed,
            rules,
            scope_path: Vec::new(),
            frames: Vec::new(),
            findings,
            root_calls: Vec::new(),
            depth: 0,
        };
        for stmt in &fd.module.body {
            walker.walk_stmt(stmt);
        }

        let LintWalker {
            mut findings,
            root_calls,
            ..
        } = walker;

        findings.retain(|finding| {
            !fd.suppressed.is_suppressed(finding.line, &finding.rule_id)
                && !self.is_rule_ignored_for_path(&finding.file, &finding.rule_id)
        });

        self.bump_progress();
        LintOutput {
            findings,
            root_calls,
            line_count: fd.line_count,
        }
    }
}

/// One replay-scope function the walker is currently inside.
struct Frame {
    qualified: String,
    origin: ScopeOrigin,
    context_var: Option<CompactString>,
}

struct LintWalker<'a> {
    context: &'a Context<'a>,
    file: &'a Arc<PathBuf>,
    module: &'a str,
    suppressed: &'a SuppressedLines,
    rules: Vec<Box<dyn Rule>>,
    // Lexical path of enclosing function/class names, mirroring discovery so
    // qualified names line up with the index.
    scope_path: Vec<CompactString>,
    frames: Vec<Frame>,
    findings: Vec<Finding>,
    root_calls: Vec<RootCall>,
    depth: usize,
}

impl LintWalker<'_> {
    fn qualified(&self, name: &str) -> String {
        let mut qualified = String::from(self.module);
        for segment in &self.scope_path {
            if !qualified.is_empty() {
                qualified.push('.');
            }
            qualified.push_str(segment);
        }
        if !qualified.is_empty() {
            qualified.push('.');
        }
        qualified.push_str(name);
        qualified
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        if self.depth >= MAX_RECURSION_DEPTH {
            return;
        }
        self.depth += 1;
        self.visit_stmt(stmt);
        self.depth -= 1;
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(def) => self.visit_function_def(def),
            Stmt::ClassDef(def) => {
                for decorator in &def.decorator_list {
                    self.walk_expr(&decorator.expression, false);
                }
                self.scope_path.push(CompactString::from(def.name.as_str()));
                for inner in &def.body {
                    self.walk_stmt(inner);
                }
                self.scope_path.pop();
            }
            Stmt::Assign(assign) => {
                for target in &assign.targets {
                    self.walk_expr(target, false);
                }
                self.walk_expr(&assign.value, false);
            }
            Stmt::AugAssign(assign) => {
                self.walk_expr(&assign.target, false);
                self.walk_expr(&assign.value, false);
            }
            Stmt::AnnAssign(assign) => {
                self.walk_expr(&assign.target, false);
                self.walk_expr(&assign.annotation, false);
                if let Some(value) = &assign.value {
                    self.walk_expr(value, false);
                }
            }
            Stmt::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.walk_expr(value, false);
                }
            }
            // The direct value of an expression statement is the only place
            // where statement-level rewrites (like the sleep fix) are safe.
            Stmt::Expr(expr) => self.walk_expr(&expr.value, true),
            Stmt::For(for_stmt) => {
                self.walk_expr(&for_stmt.target, false);
                self.walk_expr(&for_stmt.iter, false);
                for inner in for_stmt.body.iter().chain(&for_stmt.orelse) {
                    self.walk_stmt(inner);
                }
            }
            Stmt::While(while_stmt) => {
                self.walk_expr(&while_stmt.test, false);
                for inner in while_stmt.body.iter().chain(&while_stmt.orelse) {
                    self.walk_stmt(inner);
                }
            }
            Stmt::If(if_stmt) => {
                self.walk_expr(&if_stmt.test, false);
                for inner in &if_stmt.body {
                    self.walk_stmt(inner);
                }
                for clause in &if_stmt.elif_else_clauses {
                    if let Some(test) = &clause.test {
                        self.walk_expr(test, false);
                    }
                    for inner in &clause.body {
                        self.walk_stmt(inner);
                    }
                }
            }
            Stmt::With(with_stmt) => {
                for item in &with_stmt.items {
                    self.walk_expr(&item.context_expr, false);
                    if let Some(vars) = &item.optional_vars {
                        self.walk_expr(vars, false);
                    }
                }
                for inner in &with_stmt.body {
                    self.walk_stmt(inner);
                }
            }
            Stmt::Try(try_stmt) => {
                for inner in &try_stmt.body {
                    self.walk_stmt(inner);
                }
                for handler in &try_stmt.handlers {
                    let ast::ExceptHandler::ExceptHandler(h) = handler;
                    if let Some(type_) = &h.type_ {
                        self.walk_expr(type_, false);
                    }
                    for inner in &h.body {
                        self.walk_stmt(inner);
                    }
                }
                for inner in try_stmt.orelse.iter().chain(&try_stmt.finalbody) {
                    self.walk_stmt(inner);
                }
            }
            Stmt::Match(match_stmt) => {
                self.walk_expr(&match_stmt.subject, false);
                for case in &match_stmt.cases {
                    if let Some(guard) = &case.guard {
                        self.walk_expr(guard, false);
                    }
                    for inner in &case.body {
                        self.walk_stmt(inner);
                    }
                }
            }
            Stmt::Raise(raise) => {
                if let Some(exc) = &raise.exc {
                    self.walk_expr(exc, false);
                }
                if let Some(cause) = &raise.cause {
                    self.walk_expr(cause, false);
                }
            }
            Stmt::Assert(assert) => {
                self.walk_expr(&assert.test, false);
                if let Some(msg) = &assert.msg {
                    self.walk_expr(msg, false);
                }
            }
            Stmt::Delete(delete) => {
                for target in &delete.targets {
                    self.walk_expr(target, false);
                }
            }
            _ => {}
        }
    }

    fn visit_function_def(&mut self, def: &ast::StmtFunctionDef) {
        // Decorators and parameter defaults evaluate at import time, outside
        // whatever replay scope the def itself belongs to.
        for decorator in &def.decorator_list {
            self.walk_expr(&decorator.expression, false);
        }
        let parameters = &def.parameters;
        for arg in parameters
            .posonlyargs
            .iter()
            .chain(&parameters.args)
            .chain(&parameters.kwonlyargs)
        {
            if let Some(default) = arg.default.as_deref() {
                self.walk_expr(default, false);
            }
        }

        let name = def.name.as_str();
        let qualified = self.qualified(name);
        let pushed = match self.context.index.replay_scope(&qualified) {
            Some(membership) => {
                self.frames.push(Frame {
                    qualified,
                    origin: membership.origin,
                    context_var: membership.context_var.clone(),
                });
                true
            }
            // Out-of-scope defs nested inside a scope function keep the
            // enclosing frame: their bodies run as part of the replay too.
            None => false,
        };

        self.scope_path.push(CompactString::from(name));
        for inner in &def.body {
            self.walk_stmt(inner);
        }
        self.scope_path.pop();
        if pushed {
            self.frames.pop();
        }
    }

    fn walk_expr(&mut self, expr: &Expr, at_stmt_level: bool) {
        if self.depth >= MAX_RECURSION_DEPTH {
            return;
        }
        self.depth += 1;
        self.visit_expr(expr, at_stmt_level);
        self.depth -= 1;
    }

    fn apply_rules(&mut self, expr: &Expr, at_stmt_level: bool) {
        let scope = self.frames.last().map(|frame| ScopeState {
            qualified: &frame.qualified,
            origin: frame.origin,
            context_var: frame.context_var.as_deref(),
            at_stmt_level,
        });
        for rule in &mut self.rules {
            if let Some(mut found) = rule.visit_expr(expr, self.context, scope.as_ref()) {
                self.findings.append(&mut found);
            }
        }
    }

    /// Records direct orchestrator-body calls to module-local helpers for the
    /// transitive-call rule.
    fn record_root_call(&mut self, expr: &Expr) {
        let Expr::Call(call) = expr else {
            return;
        };
        let Expr::Name(callee) = &*call.func else {
            return;
        };
        if !self
            .frames
            .last()
            .is_some_and(|frame| frame.origin == ScopeOrigin::Root)
        {
            return;
        }
        let candidate = format!("{}.{}", self.module, callee.id);
        if !self.context.index.is_defined(&candidate) {
            return;
        }
        let offset = call.range().start();
        let line = self.context.line_index.line_index(offset);
        self.root_calls.push(RootCall {
            callee_qualified: candidate,
            callee_display: CompactString::from(callee.id.as_str()),
            file: Arc::clone(self.file),
            line,
            col: self.context.line_index.column_index(offset),
            suppressed: self.suppressed.is_suppressed(line, RULE_ID_TRANSITIVE_CALL),
        });
    }

    fn visit_expr(&mut self, expr: &Expr, at_stmt_level: bool) {
        self.apply_rules(expr, at_stmt_level);
        self.record_root_call(expr);

        match expr {
            Expr::Call(call) => {
                self.walk_expr(&call.func, false);
                for arg in &call.arguments.args {
                    self.walk_expr(arg, false);
                }
                for keyword in &call.arguments.keywords {
                    self.walk_expr(&keyword.value, false);
                }
            }
            Expr::Subscript(subscript) => {
                self.walk_expr(&subscript.value, false);
                self.walk_expr(&subscript.slice, false);
            }
            Expr::Attribute(attr) => self.walk_expr(&attr.value, false),
            Expr::BoolOp(op) => {
                for value in &op.values {
                    self.walk_expr(value, false);
                }
            }
            Expr::Named(named) => {
                self.walk_expr(&named.target, false);
                self.walk_expr(&named.value, false);
            }
            Expr::BinOp(op) => {
                self.walk_expr(&op.left, false);
                self.walk_expr(&op.right, false);
            }
            Expr::UnaryOp(op) => self.walk_expr(&op.operand, false),
            Expr::Lambda(lambda) => self.walk_expr(&lambda.body, false),
            Expr::If(if_expr) => {
                self.walk_expr(&if_expr.test, false);
                self.walk_expr(&if_expr.body, false);
                self.walk_expr(&if_expr.orelse, false);
            }
            Expr::Dict(dict) => {
                for item in &dict.items {
                    if let Some(key) = &item.key {
                        self.walk_expr(key, false);
                    }
                    self.walk_expr(&item.value, false);
                }
            }
            Expr::Set(set) => {
                for element in &set.elts {
                    self.walk_expr(element, false);
                }
            }
            Expr::ListComp(comp) => {
                self.walk_expr(&comp.elt, false);
                self.walk_comprehensions(&comp.generators);
            }
            Expr::SetComp(comp) => {
                self.walk_expr(&comp.elt, false);
                self.walk_comprehensions(&comp.generators);
            }
            Expr::DictComp(comp) => {
                if let Some(key) = &comp.key {
                    self.walk_expr(key, false);
                }
                self.walk_expr(&comp.value, false);
                self.walk_comprehensions(&comp.generators);
            }
            Expr::Generator(generator) => {
                self.walk_expr(&generator.elt, false);
                self.walk_comprehensions(&generator.generators);
            }
            Expr::Await(await_expr) => self.walk_expr(&await_expr.value, false),
            Expr::Yield(yield_expr) => {
                if let Some(value) = &yield_expr.value {
                    self.walk_expr(value, false);
                }
            }
            Expr::YieldFrom(yield_from) => self.walk_expr(&yield_from.value, false),
            Expr::Compare(compare) => {
                self.walk_expr(&compare.left, false);
                for comparator in &compare.comparators {
                    self.walk_expr(comparator, false);
                }
            }
            Expr::FString(fstring) => {
                for part in &fstring.value {
                    if let ast::FStringPart::FString(f) = part {
                        for element in &f.elements {
                            if let ast::InterpolatedStringElement::Interpolation(interp) = element {
                                self.walk_expr(&interp.expression, false);
                            }
                        }
                    }
                }
            }
            Expr::Starred(starred) => self.walk_expr(&starred.value, false),
            Expr::List(list) => {
                for element in &list.elts {
                    self.walk_expr(element, false);
                }
            }
            Expr::Tuple(tuple) => {
                for element in &tuple.elts {
                    self.walk_expr(element, false);
                }
            }
            Expr::Slice(slice) => {
                for bound in [&slice.lower, &slice.upper, &slice.step]
                    .into_iter()
                    .flatten()
                {
                    self.walk_expr(bound, false);
                }
            }
            _ => {}
        }
    }

    fn walk_comprehensions(&mut self, generators: &[ast::Comprehension]) {
        for comprehension in generators {
            self.walk_expr(&comprehension.target, false);
            self.walk_expr(&comprehension.iter, false);
            for condition in &comprehension.ifs {
                self.walk_expr(condition, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ids;
    use std::path::Path;

    fn lint(code: &str) -> LintOutput {
        let analyzer = DuraScan::default();
        let fd = analyzer
            .discover_source(Path::new("app.py"), code.to_string(), "app")
            .expect("fixture should parse");
        let index = FunctionIndex::build([&fd.discovery]);
        analyzer.lint_single_file(&fd, &index)
    }

    #[test]
    fn test_orchestrator_current_time_is_flagged_with_fix() {
        let code = r#"
import datetime

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    started = datetime.datetime.now()
    return started
"#;
        let output = lint(code);
        assert_eq!(output.findings.len(), 1);
        let finding = &output.findings[0];
        assert_eq!(finding.rule_id, ids::RULE_ID_CURRENT_TIME);
        assert_eq!(finding.line, 6);
        let fix = finding.fix.as_ref().expect("no-arg call gets a rewrite");
        assert_eq!(fix.edits.len(), 1);
    }

    #[test]
    fn test_out_of_scope_function_is_not_linted() {
        let code = r#"
import datetime

def plain_helper():
    return datetime.datetime.now()
"#;
        let output = lint(code);
        assert!(output.findings.is_empty());
        assert!(output.root_calls.is_empty());
    }

    #[test]
    fn test_pragma_suppresses_finding_on_its_line() {
        let code = r#"
import uuid

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    return uuid.uuid4()  # pragma: no durascan
"#;
        let output = lint(code);
        assert!(output.findings.is_empty());
    }

    #[test]
    fn test_scoped_pragma_only_suppresses_listed_rules() {
        let code = r#"
import uuid

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    return uuid.uuid4()  # pragma: no durascan[DS-N101]
"#;
        let output = lint(code);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].rule_id, ids::RULE_ID_UUID_RANDOM);
    }

    #[test]
    fn test_root_call_to_local_helper_is_recorded() {
        let code = r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    prepare()

def prepare():
    pass
"#;
        let output = lint(code);
        assert_eq!(output.root_calls.len(), 1);
        let call = &output.root_calls[0];
        assert_eq!(call.callee_qualified, "app.prepare");
        assert_eq!(call.callee_display, "prepare");
        assert_eq!(call.line, 4);
        assert!(!call.suppressed);
    }

    #[test]
    fn test_helper_calls_are_not_recorded_as_root_calls() {
        let code = r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    prepare()

def prepare():
    shape()

def shape():
    pass
"#;
        let output = lint(code);
        // Only the orchestrator-body call is a root call; prepare -> shape is
        // covered by the taint closure instead.
        assert_eq!(output.root_calls.len(), 1);
        assert_eq!(output.root_calls[0].callee_qualified, "app.prepare");
    }

    #[test]
    fn test_missing_context_parameter_reported_from_registration() {
        let code = r#"
@app.orchestration_trigger(context_name="ctx")
def flow():
    pass
"#;
        let output = lint(code);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].rule_id, ids::RULE_ID_ORCHESTRATION_BINDING);
    }

    #[test]
    fn test_nested_def_inherits_the_enclosing_frame() {
        let code = r#"
import datetime

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    def local():
        return datetime.datetime.now()
    return local()
"#;
        let output = lint(code);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].rule_id, ids::RULE_ID_CURRENT_TIME);
        assert_eq!(output.findings[0].line, 7);
    }

    #[test]
    fn test_statement_level_sleep_gets_timer_rewrite() {
        let code = r#"
import time

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    time.sleep(30)
"#;
        let output = lint(code);
        assert_eq!(output.findings.len(), 1);
        let finding = &output.findings[0];
        assert_eq!(finding.rule_id, ids::RULE_ID_BLOCKING_SLEEP);
        assert!(finding.fix.is_some());
    }

    #[test]
    fn test_expression_position_sleep_is_flagged_without_fix() {
        let code = r#"
import time

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    result = time.sleep(30)
    return result
"#;
        let output = lint(code);
        assert_eq!(output.findings.len(), 1);
        let finding = &output.findings[0];
        assert_eq!(finding.rule_id, ids::RULE_ID_BLOCKING_SLEEP);
        assert!(finding.fix.is_none());
    }
}
