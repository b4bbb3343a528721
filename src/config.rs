//! Resolver configuration.
//!
//! [`ResolverOptions`] can be built in code, read from configuration
//! sources (environment variables, in-memory maps, JSON documents), or
//! deserialized directly with the `config` feature.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::constructor::{ConstructorResolutionBehavior, MostResolvableParametersBehavior, SingleConstructorBehavior};
use crate::error::{DiError, DiResult};

/// Prefix used by [`ResolverOptions::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_GENERICS";

const ALLOW_OVERRIDING: &str = "allow_overriding_registrations";
const CACHE_CLOSED_TYPES: &str = "cache_closed_types";
const CONSTRUCTOR_RESOLUTION: &str = "constructor_resolution";

/// A configuration value that can be various types
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(untagged))]
pub enum ConfigValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ConfigValue {
    /// Parses a raw string the way environment variables are read.
    pub fn parse(raw: &str) -> Self {
        if let Ok(b) = raw.parse::<bool>() {
            ConfigValue::Boolean(b)
        } else if let Ok(i) = raw.parse::<i64>() {
            ConfigValue::Integer(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            ConfigValue::Float(f)
        } else {
            ConfigValue::String(raw.to_string())
        }
    }

    pub fn as_bool(&self) -> DiResult<bool> {
        match self {
            ConfigValue::Boolean(b) => Ok(*b),
            ConfigValue::Integer(0) => Ok(false),
            ConfigValue::Integer(1) => Ok(true),
            other => Err(DiError::Config(format!("expected a boolean, found {}", other))),
        }
    }

    pub fn as_str(&self) -> DiResult<&str> {
        match self {
            ConfigValue::String(s) => Ok(s),
            other => Err(DiError::Config(format!("expected a string, found {}", other))),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Boolean(b) => write!(f, "{}", b),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync + fmt::Debug {
    /// Get a configuration value by key
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// List all available keys
    fn keys(&self) -> Vec<String>;
}

/// Environment variable configuration source.
///
/// Keys are looked up as `PREFIX_KEY` in upper case.
#[derive(Debug, Default)]
pub struct EnvironmentConfigSource {
    prefix: Option<String>,
}

impl EnvironmentConfigSource {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn env_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.to_uppercase(), key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }
}

impl ConfigSource for EnvironmentConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        env::var(self.env_key(key)).ok().map(|value| ConfigValue::parse(&value))
    }

    fn keys(&self) -> Vec<String> {
        env::vars()
            .filter_map(|(key, _)| match &self.prefix {
                Some(prefix) => {
                    let prefix = format!("{}_", prefix.to_uppercase());
                    key.strip_prefix(&prefix).map(str::to_lowercase)
                }
                None => Some(key.to_lowercase()),
            })
            .collect()
    }
}

/// In-memory configuration source, mostly for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MapConfigSource {
    values: HashMap<String, ConfigValue>,
}

impl MapConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

impl ConfigSource for MapConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// Flat JSON object configuration source.
#[cfg(feature = "config")]
#[derive(Debug, Clone)]
pub struct JsonConfigSource {
    values: HashMap<String, ConfigValue>,
}

#[cfg(feature = "config")]
impl JsonConfigSource {
    pub fn from_json(json: &str) -> DiResult<Self> {
        let values = serde_json::from_str(json).map_err(|e| DiError::Config(format!("invalid JSON configuration: {}", e)))?;
        Ok(Self { values })
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> DiResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DiError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }
}

#[cfg(feature = "config")]
impl ConfigSource for JsonConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// Which [`ConstructorResolutionBehavior`] the container uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ConstructorResolution {
    /// [`MostResolvableParametersBehavior`]
    #[default]
    MostResolvableParameters,
    /// [`SingleConstructorBehavior`]
    SingleConstructor,
}

impl ConstructorResolution {
    pub fn behavior(self) -> Arc<dyn ConstructorResolutionBehavior> {
        match self {
            ConstructorResolution::MostResolvableParameters => Arc::new(MostResolvableParametersBehavior),
            ConstructorResolution::SingleConstructor => Arc::new(SingleConstructorBehavior),
        }
    }

    fn parse(raw: &str) -> DiResult<Self> {
        match raw.to_ascii_lowercase().replace('-', "_").as_str() {
            "most_resolvable_parameters" => Ok(ConstructorResolution::MostResolvableParameters),
            "single_constructor" => Ok(ConstructorResolution::SingleConstructor),
            other => Err(DiError::Config(format!("unknown constructor resolution '{}'", other))),
        }
    }
}

/// Options controlling registration and resolution.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::config::{ConfigValue, MapConfigSource, ResolverOptions};
///
/// let source = MapConfigSource::new()
///     .set("allow_overriding_registrations", ConfigValue::Boolean(false));
/// let options = ResolverOptions::from_source(&source).unwrap();
///
/// assert!(!options.allow_overriding_registrations);
/// assert!(options.cache_closed_types);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResolverOptions {
    /// A second non-appending registration for the same service type
    /// replaces the first instead of failing.
    pub allow_overriding_registrations: bool,
    /// Memoize closing results per implementation/request pair.
    pub cache_closed_types: bool,
    pub constructor_resolution: ConstructorResolution,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            allow_overriding_registrations: true,
            cache_closed_types: true,
            constructor_resolution: ConstructorResolution::default(),
        }
    }
}

impl ResolverOptions {
    /// Defaults overlaid with whatever `source` provides.
    pub fn from_source(source: &dyn ConfigSource) -> DiResult<Self> {
        let mut options = Self::default();

        if let Some(value) = source.get(ALLOW_OVERRIDING) {
            options.allow_overriding_registrations = value.as_bool()?;
        }
        if let Some(value) = source.get(CACHE_CLOSED_TYPES) {
            options.cache_closed_types = value.as_bool()?;
        }
        if let Some(value) = source.get(CONSTRUCTOR_RESOLUTION) {
            options.constructor_resolution = ConstructorResolution::parse(value.as_str()?)?;
        }

        tracing::debug!(?options, "loaded resolver options");
        Ok(options)
    }

    /// Reads `FERROUS_GENERICS_*` environment variables.
    pub fn from_env() -> DiResult<Self> {
        Self::from_source(&EnvironmentConfigSource::with_prefix(ENV_PREFIX))
    }

    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::Config(format!("invalid resolver options: {}", e)))
    }
}
