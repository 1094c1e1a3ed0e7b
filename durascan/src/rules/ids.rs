//! Stable rule identifiers.
//!
//! IDs follow `DS-<category><number>`: `N` for non-determinism inside the
//! replay scope, `B` for trigger-binding mistakes, `A` for activity calls.

/// Wall-clock time read inside the replay scope.
pub const RULE_ID_CURRENT_TIME: &str = "DS-N101";
/// Fresh GUID or random value inside the replay scope.
pub const RULE_ID_UUID_RANDOM: &str = "DS-N102";
/// Environment variable read inside the replay scope.
pub const RULE_ID_ENV_READ: &str = "DS-N103";
/// Outbound I/O client use inside the replay scope.
pub const RULE_ID_IO_CLIENT: &str = "DS-N104";
/// Blocking sleep inside the replay scope.
pub const RULE_ID_BLOCKING_SLEEP: &str = "DS-N105";
/// Thread, process or task spawn inside the replay scope.
pub const RULE_ID_SPAWN: &str = "DS-N106";
/// Orchestrator call into a helper that is non-deterministic somewhere
/// down its call chain.
pub const RULE_ID_TRANSITIVE_CALL: &str = "DS-N107";

/// `context_name` does not match the orchestrator signature.
pub const RULE_ID_ORCHESTRATION_BINDING: &str = "DS-B201";
/// `input_name` does not match the activity signature.
pub const RULE_ID_ACTIVITY_BINDING: &str = "DS-B202";
/// `client_name` does not match the client signature.
pub const RULE_ID_CLIENT_BINDING: &str = "DS-B203";
/// `context_name` does not match the entity signature.
pub const RULE_ID_ENTITY_BINDING: &str = "DS-B204";

/// `call_activity` names an activity no file registers.
pub const RULE_ID_UNKNOWN_ACTIVITY: &str = "DS-A301";
/// `call_activity` passes a literal that conflicts with the activity's
/// annotated input type.
pub const RULE_ID_ACTIVITY_INPUT_TYPE: &str = "DS-A302";
