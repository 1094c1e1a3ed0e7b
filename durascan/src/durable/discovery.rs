//! Per-module discovery of durable registrations and call edges.

use compact_str::CompactString;
use ruff_python_ast::{self as ast, Expr, ModModule, Stmt};
use ruff_text_size::Ranged;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::PathBuf;
use std::sync::Arc;

use super::imports::ImportMap;
use super::types::{DurableFunction, FunctionKind, ParamInfo};
use crate::config::Config;
use crate::constants::{BINDING_DECORATORS, MAX_RECURSION_DEPTH, V1_FACTORY_PATHS};
use crate::rules::determinism::apis;
use crate::utils::LineIndex;

/// Everything discovery learns about one module.
#[derive(Debug, Default)]
pub struct ModuleDiscovery {
    /// Dotted module name the records below are qualified against.
    pub module: String,
    /// Durable registrations found in the module.
    pub functions: Vec<DurableFunction>,
    /// Qualified names of every function defined in the module.
    pub defined_functions: FxHashSet<String>,
    /// Qualified names carrying a configured deterministic marker.
    pub deterministic: FxHashSet<String>,
    /// Bare-name call edges, keyed by the qualified caller.
    pub calls: FxHashMap<String, FxHashSet<CompactString>>,
    /// Qualified names whose bodies directly hit a non-deterministic API.
    pub direct_nondeterminism: FxHashSet<String>,
}

/// Walks a parsed module and returns its discovery record.
#[must_use]
pub fn discover_module(
    module: &ModModule,
    source: &str,
    file: &Arc<PathBuf>,
    module_name: &str,
    imports: &ImportMap,
    config: &Config,
) -> ModuleDiscovery {
    let line_index = LineIndex::new(source);
    let mut visitor = DiscoveryVisitor {
        file,
        module_name,
        imports,
        config,
        line_index: &line_index,
        discovery: ModuleDiscovery {
            module: String::from(module_name),
            ..ModuleDiscovery::default()
        },
        top_level_defs: FxHashMap::default(),
        pending_v1: Vec::new(),
        scope_path: Vec::new(),
        function_stack: Vec::new(),
        depth: 0,
    };

    for stmt in &module.body {
        visitor.walk_stmt(stmt);
    }
    visitor.finish_v1_registrations();
    visitor.discovery
}

struct TopLevelDef {
    qualified: String,
    line: usize,
    col: usize,
    params: Vec<ParamInfo>,
}

struct DiscoveryVisitor<'a> {
    file: &'a Arc<PathBuf>,
    module_name: &'a str,
    imports: &'a ImportMap,
    config: &'a Config,
    line_index: &'a LineIndex,
    discovery: ModuleDiscovery,
    top_level_defs: FxHashMap<CompactString, TopLevelDef>,
    pending_v1: Vec<(CompactString, FunctionKind)>,
    // Lexical path of enclosing function/class names.
    scope_path: Vec<CompactString>,
    // Qualified names of enclosing functions only (classes excluded).
    function_stack: Vec<String>,
    depth: usize,
}

impl DiscoveryVisitor<'_> {
    fn qualified(&self, name: &str) -> String {
        let mut qualified = String::from(self.module_name);
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

    fn current_function(&self) -> Option<&String> {
        self.function_stack.last()
    }

    fn record_nondeterminism(&mut self) {
        if let Some(current) = self.current_function() {
            self.discovery.direct_nondeterminism.insert(current.clone());
        }
    }

    fn record_call_edge(&mut self, callee: &str) {
        if let Some(current) = self.current_function().cloned() {
            self.discovery
                .calls
                .entry(current)
                .or_default()
                .insert(CompactString::from(callee));
        }
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
                    self.walk_expr(&decorator.expression);
                }
                self.scope_path.push(CompactString::from(def.name.as_str()));
                for inner in &def.body {
                    self.walk_stmt(inner);
                }
                self.scope_path.pop();
            }
            Stmt::Assign(assign) => {
                self.detect_v1_factory(assign);
                for target in &assign.targets {
                    self.walk_expr(target);
                }
                self.walk_expr(&assign.value);
            }
            Stmt::AugAssign(assign) => {
                self.walk_expr(&assign.target);
                self.walk_expr(&assign.value);
            }
            Stmt::AnnAssign(assign) => {
                self.walk_expr(&assign.target);
                self.walk_expr(&assign.annotation);
                if let Some(value) = &assign.value {
                    self.walk_expr(value);
                }
            }
            Stmt::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.walk_expr(value);
                }
            }
            Stmt::Expr(expr) => self.walk_expr(&expr.value),
            Stmt::For(for_stmt) => {
                self.walk_expr(&for_stmt.target);
                self.walk_expr(&for_stmt.iter);
                for inner in for_stmt.body.iter().chain(&for_stmt.orelse) {
                    self.walk_stmt(inner);
                }
            }
            Stmt::While(while_stmt) => {
                self.walk_expr(&while_stmt.test);
                for inner in while_stmt.body.iter().chain(&while_stmt.orelse) {
                    self.walk_stmt(inner);
                }
            }
            Stmt::If(if_stmt) => {
                self.walk_expr(&if_stmt.test);
                for inner in &if_stmt.body {
                    self.walk_stmt(inner);
                }
                for clause in &if_stmt.elif_else_clauses {
                    if let Some(test) = &clause.test {
                        self.walk_expr(test);
                    }
                    for inner in &clause.body {
                        self.walk_stmt(inner);
                    }
                }
            }
            Stmt::With(with_stmt) => {
                for item in &with_stmt.items {
                    self.walk_expr(&item.context_expr);
                    if let Some(vars) = &item.optional_vars {
                        self.walk_expr(vars);
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
                        self.walk_expr(type_);
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
                self.walk_expr(&match_stmt.subject);
                for case in &match_stmt.cases {
                    if let Some(guard) = &case.guard {
                        self.walk_expr(guard);
                    }
                    for inner in &case.body {
                        self.walk_stmt(inner);
                    }
                }
            }
            Stmt::Raise(raise) => {
                if let Some(exc) = &raise.exc {
                    self.walk_expr(exc);
                }
                if let Some(cause) = &raise.cause {
                    self.walk_expr(cause);
                }
            }
            Stmt::Assert(assert) => {
                self.walk_expr(&assert.test);
                if let Some(msg) = &assert.msg {
                    self.walk_expr(msg);
                }
            }
            Stmt::Delete(delete) => {
                for target in &delete.targets {
                    self.walk_expr(target);
                }
            }
            _ => {}
        }
    }

    fn visit_function_def(&mut self, def: &ast::StmtFunctionDef) {
        let name = CompactString::from(def.name.as_str());
        let qualified = self.qualified(&name);
        self.discovery.defined_functions.insert(qualified.clone());

        let registration = self.parse_decorators(def);
        if registration.deterministic {
            self.discovery.deterministic.insert(qualified.clone());
        }

        let params = collect_params(def, self.imports);
        // `StmtFunctionDef::range()` includes the decorators; report the
        // position of the `def`/`async` header line instead.
        let header_start = if def.decorator_list.is_empty() {
            def.range().start()
        } else {
            let name_start = def.name.range().start().to_usize();
            let line_start = self.source[..name_start].rfind('\n').map_or(0, |i| i + 1);
            let indent = self.source[line_start..name_start]
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(name_start - line_start);
            def.name.range().start()
                - ruff_text_size::TextSize::try_from(name_start - line_start - indent)
                    .unwrap_or_default()
        };
        let line = self.line_index.line_index(header_start);
        let col = self.line_index.column_index(header_start);

        if self.scope_path.is_empty() {
            self.top_level_defs.insert(
                name.clone(),
                TopLevelDef {
                    qualified: qualified.clone(),
                    line,
                    col,
                    params: params.clone(),
                },
            );
        }

        if let Some(kind) = registration.kind {
            self.discovery.functions.push(DurableFunction {
                registered_name: registration
                    .function_name
                    .unwrap_or_else(|| name.clone()),
                python_name: name.clone(),
                qualified_name: qualified.clone(),
                kind,
                file: Arc::clone(self.file),
                line,
                col,
                declared_binding: registration.declared_binding,
                params,
                via_decorator: true,
            });
        }

        for decorator in &def.decorator_list {
            self.walk_expr(&decorator.expression);
        }
        if let Some(parameters) = default_exprs(def) {
            for expr in parameters {
                self.walk_expr(expr);
            }
        }

        self.scope_path.push(name);
        self.function_stack.push(qualified);
        for inner in &def.body {
            self.walk_stmt(inner);
        }
        self.function_stack.pop();
        self.scope_path.pop();
    }

    fn parse_decorators(&self, def: &ast::StmtFunctionDef) -> DecoratorRegistration {
        let mut registration = DecoratorRegistration::default();
        let durascan = &self.config.durascan;
        let deterministic_markers = &durascan.deterministic_decorators;
        let orchestrator_extras = &durascan.orchestrator_decorators;
        let activity_extras = &durascan.activity_decorators;

        for decorator in &def.decorator_list {
            let (path_expr, call) = match &decorator.expression {
                Expr::Call(call) => (&*call.func, Some(call)),
                other => (other, None),
            };
            let Some(path) = super::imports::dotted_path(path_expr) else {
                continue;
            };
            let tail = path.rsplit('.').next().unwrap_or(&path);

            if deterministic_markers.iter().any(|m| m == tail) {
                registration.deterministic = true;
                continue;
            }

            if tail == "function_name" {
                if let Some(call) = call {
                    registration.function_name = string_argument(call, "name", 0);
                }
                continue;
            }

            let effective = if orchestrator_extras.iter().any(|d| d == tail) {
                "orchestration_trigger"
            } else if activity_extras.iter().any(|d| d == tail) {
                "activity_trigger"
            } else {
                tail
            };

            // The first trigger decorator wins; extras on the same def are
            // ignored.
            if registration.kind.is_some() {
                continue;
            }
            if let Some(keyword) = BINDING_DECORATORS().get(effective) {
                registration.kind = Some(match effective {
                    "orchestration_trigger" => FunctionKind::Orchestrator,
                    "activity_trigger" => FunctionKind::Activity,
                    "entity_trigger" => FunctionKind::Entity,
                    _ => FunctionKind::Client,
                });
                registration.declared_binding = call
                    .and_then(|call| string_argument(call, keyword, usize::MAX));
            }
        }
        registration
    }

    fn detect_v1_factory(&mut self, assign: &ast::StmtAssign) {
        if !self.scope_path.is_empty() {
            return;
        }
        let Expr::Call(call) = &*assign.value else {
            return;
        };
        let Some(path) = self.imports.resolve_expr(&call.func) else {
            return;
        };
        let Some(kind_name) = V1_FACTORY_PATHS().get(path.as_str()) else {
            return;
        };
        let Some(Expr::Name(target_fn)) = call.arguments.args.first() else {
            return;
        };
        let kind = if *kind_name == "orchestrator" {
            FunctionKind::Orchestrator
        } else {
            FunctionKind::Entity
        };
        self.pending_v1
            .push((CompactString::from(target_fn.id.as_str()), kind));
    }

    fn finish_v1_registrations(&mut self) {
        for (python_name, kind) in std::mem::take(&mut self.pending_v1) {
            let Some(def) = self.top_level_defs.get(&python_name) else {
                continue;
            };
            // Skip functions already registered through a v2 decorator.
            if self
                .discovery
                .functions
                .iter()
                .any(|f| f.qualified_name == def.qualified)
            {
                continue;
            }
            self.discovery.functions.push(DurableFunction {
                registered_name: python_name.clone(),
                python_name,
                qualified_name: def.qualified.clone(),
                kind,
                file: Arc::clone(self.file),
                line: def.line,
                col: def.col,
                declared_binding: None,
                params: def.params.clone(),
                via_decorator: false,
            });
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        if self.depth >= MAX_RECURSION_DEPTH {
            return;
        }
        self.depth += 1;
        self.visit_expr(expr);
        self.depth -= 1;
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Call(call) => {
                if let Expr::Name(callee) = &*call.func {
                    self.record_call_edge(callee.id.as_str());
                }
                // A bare name handed to another call may be a function passed
                // by reference (map/filter/functools shapes); the index only
                // keeps edges that resolve to module-level defs.
                for operand in call
                    .arguments
                    .args
                    .iter()
                    .chain(call.arguments.keywords.iter().map(|keyword| &keyword.value))
                {
                    if let Expr::Name(reference) = operand {
                        self.record_call_edge(reference.id.as_str());
                    }
                }
                if let Some(path) = self.imports.resolve_expr(&call.func) {
                    if apis::classify_call(&path, self.config).is_some() {
                        self.record_nondeterminism();
                    }
                }
                self.walk_expr(&call.func);
                for arg in &call.arguments.args {
                    self.walk_expr(arg);
                }
                for keyword in &call.arguments.keywords {
                    self.walk_expr(&keyword.value);
                }
            }
            Expr::Subscript(subscript) => {
                if let Some(path) = self.imports.resolve_expr(&subscript.value) {
                    if apis::classify_subscript(&path).is_some() {
                        self.record_nondeterminism();
                    }
                }
                self.walk_expr(&subscript.value);
                self.walk_expr(&subscript.slice);
            }
            Expr::Attribute(attr) => self.walk_expr(&attr.value),
            Expr::BoolOp(op) => {
                for value in &op.values {
                    self.walk_expr(value);
                }
            }
            Expr::Named(named) => {
                self.walk_expr(&named.target);
                self.walk_expr(&named.value);
            }
            Expr::BinOp(op) => {
                self.walk_expr(&op.left);
                self.walk_expr(&op.right);
            }
            Expr::UnaryOp(op) => self.walk_expr(&op.operand),
            Expr::Lambda(lambda) => self.walk_expr(&lambda.body),
            Expr::If(if_expr) => {
                self.walk_expr(&if_expr.test);
                self.walk_expr(&if_expr.body);
                self.walk_expr(&if_expr.orelse);
            }
            Expr::Dict(dict) => {
                for item in &dict.items {
                    if let Some(key) = &item.key {
                        self.walk_expr(key);
                    }
                    self.walk_expr(&item.value);
                }
            }
            Expr::Set(set) => {
                for element in &set.elts {
                    self.walk_expr(element);
                }
            }
            Expr::ListComp(comp) => {
                self.walk_expr(&comp.elt);
                self.walk_comprehensions(&comp.generators);
            }
            Expr::SetComp(comp) => {
                self.walk_expr(&comp.elt);
                self.walk_comprehensions(&comp.generators);
            }
            Expr::DictComp(comp) => {
                if let Some(key) = &comp.key {
                    self.walk_expr(key);
                }
                self.walk_expr(&comp.value);
                self.walk_comprehensions(&comp.generators);
            }
            Expr::Generator(generator) => {
                self.walk_expr(&generator.elt);
                self.walk_comprehensions(&generator.generators);
            }
            Expr::Await(await_expr) => self.walk_expr(&await_expr.value),
            Expr::Yield(yield_expr) => {
                if let Some(value) = &yield_expr.value {
                    self.walk_expr(value);
                }
            }
            Expr::YieldFrom(yield_from) => self.walk_expr(&yield_from.value),
            Expr::Compare(compare) => {
                self.walk_expr(&compare.left);
                for comparator in &compare.comparators {
                    self.walk_expr(comparator);
                }
            }
            Expr::FString(fstring) => {
                for part in &fstring.value {
                    if let ast::FStringPart::FString(f) = part {
                        for element in &f.elements {
                            if let ast::InterpolatedStringElement::Interpolation(interp) = element {
                                self.walk_expr(&interp.expression);
                            }
                        }
                    }
                }
            }
            Expr::Starred(starred) => self.walk_expr(&starred.value),
            Expr::List(list) => {
                for element in &list.elts {
                    self.walk_expr(element);
                }
            }
            Expr::Tuple(tuple) => {
                for element in &tuple.elts {
                    self.walk_expr(element);
                }
            }
            Expr::Slice(slice) => {
                for bound in [&slice.lower, &slice.upper, &slice.step].into_iter().flatten() {
                    self.walk_expr(bound);
                }
            }
            _ => {}
        }
    }

    fn walk_comprehensions(&mut self, generators: &[ast::Comprehension]) {
        for comprehension in generators {
            self.walk_expr(&comprehension.target);
            self.walk_expr(&comprehension.iter);
            for condition in &comprehension.ifs {
                self.walk_expr(condition);
            }
        }
    }
}

#[derive(Default)]
struct DecoratorRegistration {
    kind: Option<FunctionKind>,
    declared_binding: Option<CompactString>,
    function_name: Option<CompactString>,
    deterministic: bool,
}

/// Extracts a string argument from a call, by keyword first and then by
/// position (`usize::MAX` disables positional lookup).
fn string_argument(
    call: &ast::ExprCall,
    keyword: &str,
    position: usize,
) -> Option<CompactString> {
    for kw in &call.arguments.keywords {
        if kw.arg.as_ref().is_some_and(|arg| arg == keyword) {
            if let Expr::StringLiteral(s) = &kw.value {
                return Some(CompactString::from(s.value.to_string()));
            }
            return None;
        }
    }
    match call.arguments.args.get(position) {
        Some(Expr::StringLiteral(s)) => Some(CompactString::from(s.value.to_string())),
        _ => None,
    }
}

fn collect_params(def: &ast::StmtFunctionDef, imports: &ImportMap) -> Vec<ParamInfo> {
    let parameters = &def.parameters;
    parameters
        .posonlyargs
        .iter()
        .chain(&parameters.args)
        .map(|arg| ParamInfo {
            name: CompactString::from(arg.parameter.name.as_str()),
            annotation: arg
                .parameter
                .annotation
                .as_ref()
                .and_then(|annotation| imports.resolve_expr(annotation)),
        })
        .collect()
}

fn default_exprs(def: &ast::StmtFunctionDef) -> Option<Vec<&Expr>> {
    let parameters = &def.parameters;
    let defaults: Vec<&Expr> = parameters
        .posonlyargs
        .iter()
        .chain(&parameters.args)
        .chain(&parameters.kwonlyargs)
        .filter_map(|arg| arg.default.as_deref())
        .collect();
    if defaults.is_empty() {
        None
    } else {
        Some(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruff_python_parser::parse_module;

    fn discover(code: &str) -> ModuleDiscovery {
        let parsed = parse_module(code).expect("fixture should parse");
        let module = parsed.into_syntax();
        let imports = ImportMap::build(&module, code);
        let file = Arc::new(PathBuf::from("app.py"));
        let config = Config::default();
        discover_module(&module, code, &file, "app", &imports, &config)
    }

    #[test]
    fn finds_v2_orchestrator_with_declared_binding() {
        let code = r#"
import azure.functions as func

app = func.FunctionApp()

@app.orchestration_trigger(context_name="context")
def run_flow(context):
    yield context.call_activity("Work", 1)
"#;
        let discovery = discover(code);
        assert_eq!(discovery.functions.len(), 1);
        let func = &discovery.functions[0];
        assert_eq!(func.kind, FunctionKind::Orchestrator);
        assert_eq!(func.qualified_name, "app.run_flow");
        assert_eq!(func.declared_binding.as_deref(), Some("context"));
        assert!(func.via_decorator);
        assert_eq!(func.first_param().map(|p| p.name.as_str()), Some("context"));
    }

    #[test]
    fn function_name_decorator_overrides_registered_name() {
        let code = r#"
@app.function_name(name="ProcessOrder")
@app.activity_trigger(input_name="payload")
def process_order(payload):
    return payload
"#;
        let discovery = discover(code);
        let func = &discovery.functions[0];
        assert_eq!(func.kind, FunctionKind::Activity);
        assert_eq!(func.registered_name, "ProcessOrder");
        assert_eq!(func.python_name, "process_order");
    }

    #[test]
    fn finds_v1_factory_registration() {
        let code = r#"
import azure.durable_functions as df

def my_orchestrator(context):
    yield context.call_activity("Step", None)

main = df.Orchestrator.create(my_orchestrator)
"#;
        let discovery = discover(code);
        assert_eq!(discovery.functions.len(), 1);
        let func = &discovery.functions[0];
        assert_eq!(func.kind, FunctionKind::Orchestrator);
        assert_eq!(func.qualified_name, "app.my_orchestrator");
        assert!(!func.via_decorator);
        assert!(func.declared_binding.is_none());
    }

    #[test]
    fn v1_factory_does_not_duplicate_decorated_function() {
        let code = r#"
import azure.durable_functions as df

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    pass

main = df.Orchestrator.create(flow)
"#;
        let discovery = discover(code);
        assert_eq!(discovery.functions.len(), 1);
        assert!(discovery.functions[0].via_decorator);
    }

    #[test]
    fn records_call_edges_and_direct_nondeterminism() {
        let code = r#"
import datetime

def stamp():
    return datetime.datetime.now()

def relay():
    return stamp()
"#;
        let discovery = discover(code);
        assert!(discovery.direct_nondeterminism.contains("app.stamp"));
        assert!(!discovery.direct_nondeterminism.contains("app.relay"));
        let edges = discovery.calls.get("app.relay").expect("relay calls stamp");
        assert!(edges.contains("stamp"));
        assert!(discovery.defined_functions.contains("app.stamp"));
    }

    #[test]
    fn function_references_in_call_arguments_are_edges() {
        let code = r#"
def make_id(item):
    return item

def flow(items):
    return list(map(make_id, items))
"#;
        let discovery = discover(code);
        let edges = discovery.calls.get("app.flow").expect("flow records edges");
        assert!(edges.contains("make_id"));

        let keyword_code = r#"
def fallback():
    return 0

def pick(options):
    return max(options, key=fallback)
"#;
        let discovery = discover(keyword_code);
        let edges = discovery.calls.get("app.pick").expect("pick records edges");
        assert!(edges.contains("fallback"));
    }

    #[test]
    fn first_trigger_decorator_wins() {
        let code = r#"
@app.orchestration_trigger(context_name="ctx")
@app.activity_trigger(input_name="payload")
def confused(ctx):
    pass
"#;
        let discovery = discover(code);
        assert_eq!(discovery.functions.len(), 1);
        let func = &discovery.functions[0];
        assert_eq!(func.kind, FunctionKind::Orchestrator);
        assert_eq!(func.declared_binding.as_deref(), Some("ctx"));
    }

    #[test]
    fn deterministic_marker_is_recorded() {
        let code = r#"
from helpers import deterministic

@deterministic
def pure_math(x):
    return x * 2
"#;
        let discovery = discover(code);
        assert!(discovery.deterministic.contains("app.pure_math"));
        assert!(discovery.functions.is_empty());
    }

    #[test]
    fn environment_subscript_counts_as_direct_violation() {
        let code = r#"
import os

def read_region():
    return os.environ["REGION"]
"#;
        let discovery = discover(code);
        assert!(discovery.direct_nondeterminism.contains("app.read_region"));
    }
}
