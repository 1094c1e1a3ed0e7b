//! Project-wide index of durable registrations and the replay scope.

use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use super::discovery::ModuleDiscovery;
use super::types::{DurableFunction, FunctionKind, ScopeMembership, ScopeOrigin};

/// Merged view over every module's discovery record.
///
/// The index answers three questions during linting: is this function part of
/// the replay scope (and through which origin), is this string a registered
/// activity name, and does calling this helper eventually reach a
/// non-deterministic API.
#[derive(Debug, Default)]
pub struct FunctionIndex {
    functions: Vec<DurableFunction>,
    scope: FxHashMap<String, ScopeMembership>,
    activities: FxHashMap<CompactString, usize>,
    defined: FxHashSet<String>,
    transitive_violations: FxHashSet<String>,
}

impl FunctionIndex {
    /// Builds the index from per-module discovery records.
    #[must_use]
    pub fn build<'a, I>(discoveries: I) -> Self
    where
        I: IntoIterator<Item = &'a ModuleDiscovery>,
    {
        let discoveries: Vec<&ModuleDiscovery> = discoveries.into_iter().collect();
        let mut index = FunctionIndex::default();

        for discovery in &discoveries {
            for function in &discovery.functions {
                let position = index.functions.len();
                if function.kind == FunctionKind::Activity {
                    index
                        .activities
                        .insert(function.registered_name.clone(), position);
                }
                index.functions.push(function.clone());
            }
            index
                .defined
                .extend(discovery.defined_functions.iter().cloned());
        }

        // Bare-name call edges resolve against the defining module only.
        let mut edges: FxHashMap<&str, Vec<String>> = FxHashMap::default();
        for discovery in &discoveries {
            for (caller, callees) in &discovery.calls {
                let resolved = edges.entry(caller.as_str()).or_default();
                for callee in callees {
                    let candidate = format!("{}.{}", discovery.module, callee);
                    if discovery.defined_functions.contains(&candidate) {
                        resolved.push(candidate);
                    }
                }
            }
        }

        let mut queue: VecDeque<String> = VecDeque::new();
        for function in &index.functions {
            // Only orchestrators are replayed; entity, activity, and client
            // bodies run outside the replay scope.
            if function.kind != FunctionKind::Orchestrator {
                continue;
            }
            index.scope.insert(
                function.qualified_name.clone(),
                ScopeMembership {
                    origin: ScopeOrigin::Root,
                    context_var: function
                        .context_variable()
                        .map(CompactString::from),
                },
            );
            queue.push_back(function.qualified_name.clone());
        }
        for discovery in &discoveries {
            for marked in &discovery.deterministic {
                if !index.scope.contains_key(marked) {
                    index.scope.insert(
                        marked.clone(),
                        ScopeMembership {
                            origin: ScopeOrigin::Marked,
                            context_var: None,
                        },
                    );
                    queue.push_back(marked.clone());
                }
            }
        }

        // Everything reachable from a root or marked function joins the scope.
        while let Some(current) = queue.pop_front() {
            let Some(callees) = edges.get(current.as_str()) else {
                continue;
            };
            for callee in callees {
                if !index.scope.contains_key(callee) {
                    index.scope.insert(
                        callee.clone(),
                        ScopeMembership {
                            origin: ScopeOrigin::Reached,
                            context_var: None,
                        },
                    );
                    queue.push_back(callee.clone());
                }
            }
        }

        index.transitive_violations = compute_transitive_violations(&discoveries, &edges);
        index
    }

    /// All registered durable functions, across every analyzed file.
    #[must_use]
    pub fn functions(&self) -> &[DurableFunction] {
        &self.functions
    }

    /// Replay-scope membership for a qualified function name.
    #[must_use]
    pub fn replay_scope(&self, qualified: &str) -> Option<&ScopeMembership> {
        self.scope.get(qualified)
    }

    /// Whether any module defines a top-level function with this exact
    /// qualified name.
    #[must_use]
    pub fn is_defined(&self, qualified: &str) -> bool {
        self.defined.contains(qualified)
    }

    /// Looks up an activity registration by its runtime name.
    #[must_use]
    pub fn activity(&self, name: &str) -> Option<&DurableFunction> {
        self.activities
            .get(name)
            .and_then(|&position| self.functions.get(position))
    }

    /// Whether any activity registrations were discovered at all.
    #[must_use]
    pub fn has_activities(&self) -> bool {
        !self.activities.is_empty()
    }

    /// Whether calling this function eventually executes a non-deterministic
    /// API, directly or through module-local helpers.
    #[must_use]
    pub fn transitively_nondeterministic(&self, qualified: &str) -> bool {
        self.transitive_violations.contains(qualified)
    }
}

/// Walks reverse call edges from every direct violator: a caller of a tainted
/// function is itself tainted.
fn compute_transitive_violations(
    discoveries: &[&ModuleDiscovery],
    edges: &FxHashMap<&str, Vec<String>>,
) -> FxHashSet<String> {
    let mut reverse: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for (caller, callees) in edges {
        for callee in callees {
            reverse.entry(callee.as_str()).or_default().push(caller);
        }
    }

    let mut tainted: FxHashSet<String> = FxHashSet::default();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for discovery in discoveries {
        for violator in &discovery.direct_nondeterminism {
            if tainted.insert(violator.clone()) {
                queue.push_back(violator);
            }
        }
    }
    while let Some(current) = queue.pop_front() {
        let Some(callers) = reverse.get(current) else {
            continue;
        };
        for caller in callers {
            if tainted.insert((*caller).to_string()) {
                queue.push_back(caller);
            }
        }
    }
    tainted
}
