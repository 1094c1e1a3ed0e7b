use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::OnceLock;

/// Returns wall-clock APIs that differ between execution and replay.
pub fn get_current_time_apis() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut set = FxHashSet::default();
        for api in [
            "datetime.datetime.now",
            "datetime.datetime.utcnow",
            "datetime.datetime.today",
            "datetime.date.today",
            "time.time",
            "time.time_ns",
            "time.monotonic",
            "time.localtime",
            "time.gmtime",
        ] {
            set.insert(api);
        }
        set
    })
}

/// Returns GUID factories that return a fresh value on every call.
pub fn get_uuid_apis() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut set = FxHashSet::default();
        set.insert("uuid.uuid1");
        set.insert("uuid.uuid4");
        set
    })
}

/// Returns module prefixes whose calls are inherently non-deterministic.
pub fn get_nondeterministic_prefixes() -> &'static [&'static str] {
    static PREFIXES: OnceLock<Vec<&'static str>> = OnceLock::new();
    PREFIXES.get_or_init(|| vec!["random."])
}

/// Returns the `secrets` module entry points that mint fresh values.
/// Comparison helpers like `secrets.compare_digest` stay allowed.
pub fn get_secrets_value_apis() -> &'static [&'static str] {
    static PREFIXES: OnceLock<Vec<&'static str>> = OnceLock::new();
    PREFIXES.get_or_init(|| vec!["secrets.token_", "secrets.choice", "secrets.randbelow"])
}

/// Returns environment-read APIs whose values can change between replays.
pub fn get_environment_apis() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut set = FxHashSet::default();
        set.insert("os.getenv");
        set.insert("os.environ.get");
        set.insert("os.environ.setdefault");
        set
    })
}

/// Returns blocking sleep APIs that stall the worker during replay.
pub fn get_sleep_apis() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut set = FxHashSet::default();
        set.insert("time.sleep");
        set.insert("asyncio.sleep");
        set
    })
}

/// Returns module prefixes that spawn threads, processes or tasks.
pub fn get_spawn_prefixes() -> &'static [&'static str] {
    static PREFIXES: OnceLock<Vec<&'static str>> = OnceLock::new();
    PREFIXES.get_or_init(|| {
        vec![
            "threading.",
            "_thread.",
            "multiprocessing.",
            "concurrent.futures.",
            "subprocess.",
        ]
    })
}

/// Returns module prefixes whose use indicates outbound I/O.
pub fn get_io_module_prefixes() -> &'static [&'static str] {
    static PREFIXES: OnceLock<Vec<&'static str>> = OnceLock::new();
    PREFIXES.get_or_init(|| {
        vec![
            "requests.",
            "urllib.",
            "urllib3.",
            "http.client.",
            "httpx.",
            "aiohttp.",
            "socket.",
            "smtplib.",
            "ftplib.",
            "azure.",
        ]
    })
}

/// Returns prefixes exempt from the I/O check (the Durable SDK itself).
pub fn get_durable_exempt_prefixes() -> &'static [&'static str] {
    static PREFIXES: OnceLock<Vec<&'static str>> = OnceLock::new();
    PREFIXES.get_or_init(|| vec!["azure.durable_functions", "azure.functions"])
}

/// Returns the durable binding decorator names mapped to the keyword argument
/// each one requires (the parameter name the runtime will bind to).
pub fn get_binding_decorators() -> &'static FxHashMap<&'static str, &'static str> {
    static MAP: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = FxHashMap::default();
        map.insert("orchestration_trigger", "context_name");
        map.insert("activity_trigger", "input_name");
        map.insert("entity_trigger", "context_name");
        map.insert("durable_client_input", "client_name");
        map
    })
}

/// Returns the v1 programming-model factory paths that register a function
/// with the durable runtime, mapped to the kind they register.
pub fn get_v1_factory_paths() -> &'static FxHashMap<&'static str, &'static str> {
    static MAP: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = FxHashMap::default();
        map.insert("azure.durable_functions.Orchestrator.create", "orchestrator");
        map.insert("azure.durable_functions.Entity.create", "entity");
        map
    })
}

/// Returns default folders excluded from scanning.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut set = FxHashSet::default();
        for folder in [
            "__pycache__",
            ".pytest_cache",
            ".mypy_cache",
            ".ruff_cache",
            ".tox",
            ".nox",
            ".pytype",
            "htmlcov",
            ".coverage",
            "*.egg-info",
            ".eggs",
            "venv",
            ".venv",
            "env",
            ".env",
            "build",
            "dist",
            "site-packages",
            "node_modules",
            "target",
            "vendor",
            ".git",
            ".hg",
            ".svn",
            ".idea",
            ".vscode",
            ".python_packages",
            ".azure",
        ] {
            set.insert(folder);
        }
        set
    })
}
