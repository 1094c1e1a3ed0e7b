/// Maximum recursion depth for AST visitors to prevent stack overflow on deeply nested code.
pub const MAX_RECURSION_DEPTH: usize = 400;
/// Number of files to process per chunk in parallel processing.
pub const CHUNK_SIZE: usize = 500;
/// Default configuration filename.
pub const CONFIG_FILENAME: &str = ".durascan.toml";
/// Python project configuration filename.
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";
/// Class name expected on an orchestration trigger binding parameter.
pub const CONTEXT_CLASS: &str = "DurableOrchestrationContext";
/// Class name expected on an entity trigger binding parameter.
pub const ENTITY_CONTEXT_CLASS: &str = "DurableEntityContext";
/// Class name expected on a durable client binding parameter.
pub const ORCHESTRATION_CLIENT_CLASS: &str = "DurableOrchestrationClient";
