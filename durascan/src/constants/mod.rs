mod limits;
mod regexes;
mod sets;

pub use limits::{
    CHUNK_SIZE, CONFIG_FILENAME, CONTEXT_CLASS, ENTITY_CONTEXT_CLASS, MAX_RECURSION_DEPTH,
    ORCHESTRATION_CLIENT_CLASS, PYPROJECT_FILENAME,
};
pub use regexes::{get_suppression_re, get_test_file_re};
pub use sets::{
    get_binding_decorators, get_current_time_apis, get_default_exclude_folders,
    get_durable_exempt_prefixes, get_environment_apis, get_io_module_prefixes,
    get_nondeterministic_prefixes, get_secrets_value_apis, get_sleep_apis, get_spawn_prefixes,
    get_uuid_apis, get_v1_factory_paths,
};

pub use get_binding_decorators as BINDING_DECORATORS;
pub use get_current_time_apis as CURRENT_TIME_APIS;
pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;
pub use get_durable_exempt_prefixes as DURABLE_EXEMPT_PREFIXES;
pub use get_environment_apis as ENVIRONMENT_APIS;
pub use get_io_module_prefixes as IO_MODULE_PREFIXES;
pub use get_nondeterministic_prefixes as NONDETERMINISTIC_PREFIXES;
pub use get_secrets_value_apis as SECRETS_VALUE_APIS;
pub use get_sleep_apis as SLEEP_APIS;
pub use get_spawn_prefixes as SPAWN_PREFIXES;
pub use get_suppression_re as SUPPRESSION_RE;
pub use get_test_file_re as TEST_FILE_RE;
pub use get_uuid_apis as UUID_APIS;
pub use get_v1_factory_paths as V1_FACTORY_PATHS;
