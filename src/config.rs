//! Runtime configuration, loaded from environment variables with defaults.
use anyhow::Context;
use std::env;
use std::path::PathBuf;

/// Configuration for a [`SignatureService`](crate::service::SignatureService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub limits: ValidationLimits,
    pub storage: StorageBackend,
    /// tracing filter directive (`RUST_LOG`)
    pub log_filter: String,
}

/// Upper bounds, in characters, enforced when a request is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_document_name: usize,
    pub max_signer_name: usize,
    pub max_message: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    InMemory,
    Sled { path: PathBuf },
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            limits: ValidationLimits::default(),
            storage: StorageBackend::InMemory,
            log_filter: "info".to_string(),
        }
    }
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_document_name: 255,
            max_signer_name: 100,
            max_message: 1000,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. Unset keys fall back to defaults,
    /// values that fail to parse are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = ValidationLimits::default();

        let limits = ValidationLimits {
            max_document_name: parse_or(&lookup, "ESIG_MAX_DOCUMENT_NAME", defaults.max_document_name)?,
            max_signer_name: parse_or(&lookup, "ESIG_MAX_SIGNER_NAME", defaults.max_signer_name)?,
            max_message: parse_or(&lookup, "ESIG_MAX_MESSAGE", defaults.max_message)?,
        };

        let storage = match lookup("ESIG_STORAGE_PATH").filter(|path| !path.trim().is_empty()) {
            Some(path) => StorageBackend::Sled { path: path.into() },
            None => StorageBackend::InMemory,
        };

        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            limits,
            storage,
            log_filter,
        })
    }
}

fn parse_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> anyhow::Result<usize> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a positive integer, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.limits, ValidationLimits::default());
        assert_eq!(config.storage, StorageBackend::InMemory);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn reads_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("ESIG_MAX_MESSAGE", "50"),
            ("ESIG_STORAGE_PATH", "/tmp/esig.db"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.limits.max_message, 50);
        assert_eq!(config.limits.max_signer_name, 100);
        assert_eq!(
            config.storage,
            StorageBackend::Sled {
                path: "/tmp/esig.db".into()
            }
        );
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = ServiceConfig::from_lookup(lookup_from(&[("ESIG_MAX_SIGNER_NAME", "lots")]))
            .unwrap_err();

        assert!(err.to_string().contains("ESIG_MAX_SIGNER_NAME"));
    }
}
