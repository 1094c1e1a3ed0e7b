//! Shared classification of non-deterministic API paths.
//!
//! Discovery and the individual rules must agree on what counts as
//! non-deterministic, so both go through these tables.

use crate::config::Config;
use crate::constants;

/// The kind of replay hazard a dotted path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCategory {
    /// Wall-clock reads (`datetime.datetime.now`, `time.time`, ...).
    CurrentTime,
    /// Fresh GUIDs and random values (`uuid.uuid4`, `random.*`, ...).
    Random,
    /// Environment variable reads.
    EnvRead,
    /// Outbound I/O clients and the builtin `open`.
    IoClient,
    /// Blocking sleeps.
    Sleep,
    /// Thread, process or task spawns.
    Spawn,
}

/// Classifies a canonical dotted call path, import aliasing already applied.
#[must_use]
pub fn classify_call(path: &str, config: &Config) -> Option<ApiCategory> {
    if constants::CURRENT_TIME_APIS().contains(path) {
        return Some(ApiCategory::CurrentTime);
    }
    if constants::UUID_APIS().contains(path)
        || constants::NONDETERMINISTIC_PREFIXES()
            .iter()
            .any(|prefix| path.starts_with(prefix))
        || constants::SECRETS_VALUE_APIS()
            .iter()
            .any(|prefix| path.starts_with(prefix))
    {
        return Some(ApiCategory::Random);
    }
    if constants::ENVIRONMENT_APIS().contains(path) {
        return Some(ApiCategory::EnvRead);
    }
    if constants::SLEEP_APIS().contains(path) {
        return Some(ApiCategory::Sleep);
    }
    if constants::SPAWN_PREFIXES()
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return Some(ApiCategory::Spawn);
    }
    if is_io_client(path, config) {
        return Some(ApiCategory::IoClient);
    }
    None
}

/// Classifies a canonical dotted path used as a subscript base
/// (`os.environ["KEY"]`).
#[must_use]
pub fn classify_subscript(path: &str) -> Option<ApiCategory> {
    (path == "os.environ").then_some(ApiCategory::EnvRead)
}

fn is_io_client(path: &str, config: &Config) -> bool {
    if path == "open" {
        return true;
    }
    // The durable SDK itself lives under `azure.`, never flag it.
    if constants::DURABLE_EXEMPT_PREFIXES()
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return false;
    }
    if constants::IO_MODULE_PREFIXES()
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return true;
    }
    config.durascan.extra_io_modules.iter().any(|module| {
        path.strip_prefix(module.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_the_builtin_tables() {
        let config = Config::default();
        assert_eq!(
            classify_call("datetime.datetime.now", &config),
            Some(ApiCategory::CurrentTime)
        );
        assert_eq!(
            classify_call("uuid.uuid4", &config),
            Some(ApiCategory::Random)
        );
        assert_eq!(
            classify_call("random.randint", &config),
            Some(ApiCategory::Random)
        );
        assert_eq!(
            classify_call("secrets.token_hex", &config),
            Some(ApiCategory::Random)
        );
        assert_eq!(classify_call("secrets.compare_digest", &config), None);
        assert_eq!(
            classify_call("os.getenv", &config),
            Some(ApiCategory::EnvRead)
        );
        assert_eq!(classify_call("time.sleep", &config), Some(ApiCategory::Sleep));
        assert_eq!(
            classify_call("subprocess.run", &config),
            Some(ApiCategory::Spawn)
        );
        assert_eq!(classify_call("json.loads", &config), None);
    }

    #[test]
    fn io_clients_include_open_and_honor_the_sdk_exemption() {
        let config = Config::default();
        assert_eq!(classify_call("open", &config), Some(ApiCategory::IoClient));
        assert_eq!(
            classify_call("requests.get", &config),
            Some(ApiCategory::IoClient)
        );
        assert_eq!(
            classify_call("azure.storage.blob.BlobServiceClient", &config),
            Some(ApiCategory::IoClient)
        );
        assert_eq!(
            classify_call("azure.durable_functions.Orchestrator.create", &config),
            None
        );
        assert_eq!(classify_call("azure.functions.HttpResponse", &config), None);
    }

    #[test]
    fn extra_io_modules_extend_the_table() {
        let mut config = Config::default();
        config
            .durascan
            .extra_io_modules
            .push(String::from("internal.sdk"));
        assert_eq!(
            classify_call("internal.sdk.Client", &config),
            Some(ApiCategory::IoClient)
        );
        assert_eq!(classify_call("internal.sdkish.Client", &config), None);
    }

    #[test]
    fn subscripts_only_match_environ() {
        assert_eq!(classify_subscript("os.environ"), Some(ApiCategory::EnvRead));
        assert_eq!(classify_subscript("os.path"), None);
    }
}
