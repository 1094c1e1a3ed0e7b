//! Durable Functions application model.
//!
//! Discovery walks each file for durable registrations (v2 decorators and
//! v1 `Orchestrator.create`/`Entity.create` factories), the index merges the
//! per-file results, and the replay scope is the call-graph closure over
//! orchestrator roots and functions explicitly marked deterministic.

pub mod discovery;
pub mod imports;
mod index;
mod types;

pub use discovery::{discover_module, ModuleDiscovery};
pub use imports::{dotted_path, ImportMap, TimedeltaBinding};
pub use index::FunctionIndex;
pub use types::{DurableFunction, FunctionKind, ParamInfo, ScopeMembership, ScopeOrigin};
