use std::{env, fs};

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Configurable string value: inline, from an environment variable or from
/// a file. File contents are trimmed.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum GenericValue {
    Literal {
        value: String,
    },
    FromEnv {
        from_env: String,
        prefix: Option<String>,
    },
    FromFile {
        path: String,
        prefix: Option<String>,
    },
}

impl GenericValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            GenericValue::Literal { value } => Ok(value.to_owned()),
            GenericValue::FromEnv { from_env, prefix } => env::var(from_env)
                .map(|value| with_prefix(prefix, value))
                .map_err(|err| anyhow!("env variable '{}': {}", from_env, err)),
            GenericValue::FromFile { path, prefix } => fs::read_to_string(path)
                .map(|value| with_prefix(prefix, value.trim().to_string()))
                .map_err(|err| anyhow!("file '{}': {}", path, err)),
        }
    }
}

fn with_prefix(prefix: &Option<String>, value: String) -> String {
    prefix
        .as_ref()
        .map(|prefix| format!("{}{}", prefix, value))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn untagged_variants_deserialize() {
        let literal: GenericValue = serde_yaml::from_str("value: abc").unwrap();
        assert_eq!(literal, GenericValue::Literal { value: "abc".into() });

        let from_env: GenericValue = serde_yaml::from_str("{from_env: KEY, prefix: 'Bearer '}").unwrap();
        assert_eq!(from_env, GenericValue::FromEnv { from_env: "KEY".into(), prefix: Some("Bearer ".into()) });

        let from_file: GenericValue = serde_yaml::from_str("path: /tmp/key").unwrap();
        assert_eq!(from_file, GenericValue::FromFile { path: "/tmp/key".into(), prefix: None });
    }

    #[test]
    #[serial]
    fn env_value_gets_prefix() {
        env::set_var("API_AGENT_TEST_KEY", "secret");
        let value = GenericValue::FromEnv { from_env: "API_AGENT_TEST_KEY".into(), prefix: Some("Bearer ".into()) };
        assert_eq!(value.resolve().unwrap(), "Bearer secret");
        env::remove_var("API_AGENT_TEST_KEY");
        assert!(value.resolve().is_err());
    }

    #[test]
    fn file_value_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key");
        fs::write(&path, "  from-file\n").unwrap();
        let value = GenericValue::FromFile { path: path.display().to_string(), prefix: None };
        assert_eq!(value.resolve().unwrap(), "from-file");
    }
}
