use std::collections::HashMap;
use std::fmt::Debug;

/// Permits parameterizing the environment variable lookup that config
/// loaders rely on.
///
/// Implement this trait to feed configuration from somewhere other than
/// the process environment, for instance in tests.
pub trait Env: Debug + Send + Sync + 'static {
    /// Get an environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns an hashmap of (variable, value) pairs of strings, for all the
    /// environment variables of the current process.
    fn vars(&self) -> HashMap<String, String>;
}

/// Implements Env for the OS context.
#[derive(Debug, Copy, Clone, Default)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }

    fn vars(&self) -> HashMap<String, String> {
        std::env::vars().collect()
    }
}

/// StaticEnv provides a static env environment.
///
/// This is useful for testing or for providing a fixed environment.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// The environment variables to use.
    pub envs: HashMap<String, String>,
}

impl StaticEnv {
    /// Build a StaticEnv from key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            envs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }

    fn vars(&self) -> HashMap<String, String> {
        self.envs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_env() {
        let env = StaticEnv::from_pairs([("AWS_REGION", "us-bar-1")]);
        assert_eq!(env.var("AWS_REGION").as_deref(), Some("us-bar-1"));
        assert_eq!(env.var("AWS_DEFAULT_REGION"), None);
        assert_eq!(env.vars().len(), 1);
    }

    #[test]
    fn test_os_env() {
        temp_env::with_vars(
            [
                ("AWSIGN_CORE_TEST_PRESENT", Some("on")),
                ("AWSIGN_CORE_TEST_ABSENT", None),
            ],
            || {
                assert_eq!(OsEnv.var("AWSIGN_CORE_TEST_PRESENT").as_deref(), Some("on"));
                assert_eq!(OsEnv.var("AWSIGN_CORE_TEST_ABSENT"), None);
                assert!(OsEnv.vars().contains_key("AWSIGN_CORE_TEST_PRESENT"));
            },
        );
    }
}
