use compact_str::CompactString;
use std::path::PathBuf;
use std::sync::Arc;

/// The role a function plays in a Durable Functions application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// Orchestrator function (replayed from history).
    Orchestrator,
    /// Activity function (runs exactly once per scheduling).
    Activity,
    /// Durable entity function.
    Entity,
    /// Function carrying a durable client binding (e.g. an HTTP starter).
    Client,
}

impl FunctionKind {
    /// Returns the canonical display form for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FunctionKind::Orchestrator => "Orchestrator",
            FunctionKind::Activity => "Activity",
            FunctionKind::Entity => "Entity",
            FunctionKind::Client => "Client",
        }
    }
}

/// A single function parameter with its (resolved) annotation path.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    /// Parameter name.
    pub name: CompactString,
    /// Dotted annotation path, resolved through imports where possible
    /// (e.g. `azure.durable_functions.DurableOrchestrationContext`).
    pub annotation: Option<String>,
}

/// A function registered with the durable runtime.
#[derive(Debug, Clone)]
pub struct DurableFunction {
    /// Name the runtime knows the function by (`@app.function_name` override
    /// when present, otherwise the Python name).
    pub registered_name: CompactString,
    /// The Python `def` name.
    pub python_name: CompactString,
    /// Module-qualified name, e.g. `orchestrators.billing.run`.
    pub qualified_name: String,
    /// Role in the durable application.
    pub kind: FunctionKind,
    /// File the function is defined in.
    pub file: Arc<PathBuf>,
    /// 1-indexed line of the `def`.
    pub line: usize,
    /// 1-indexed column of the `def`.
    pub col: usize,
    /// Binding name declared on the trigger decorator (`context_name=...`,
    /// `input_name=...`, `client_name=...`). `None` for v1 registrations.
    pub declared_binding: Option<CompactString>,
    /// All parameters in declaration order.
    pub params: Vec<ParamInfo>,
    /// Whether the registration came from a v2 decorator (v1 factory
    /// registrations have no decorator to validate).
    pub via_decorator: bool,
}

impl DurableFunction {
    /// Returns the first parameter, which triggers bind to by position.
    #[must_use]
    pub fn first_param(&self) -> Option<&ParamInfo> {
        self.params.first()
    }

    /// Returns the variable name holding the orchestration context inside
    /// this function's body. Only orchestrators have one; other kinds never
    /// feed context-based fixes.
    #[must_use]
    pub fn context_variable(&self) -> Option<&str> {
        match self.kind {
            FunctionKind::Orchestrator => self.first_param().map(|p| p.name.as_str()),
            _ => None,
        }
    }
}

/// How a function entered the replay scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOrigin {
    /// An orchestrator root.
    Root,
    /// Explicitly marked deterministic via a configured decorator.
    Marked,
    /// Reachable from a root or marked function through the call graph.
    Reached,
}

/// Replay-scope membership for one function.
#[derive(Debug, Clone)]
pub struct ScopeMembership {
    /// How the function entered the scope.
    pub origin: ScopeOrigin,
    /// The orchestration context variable, known only for roots.
    pub context_var: Option<CompactString>,
}
