//! Configuration system
//!
//! Loader settings can be kept in TOML or RON files; the format is chosen
//! from the file extension.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parsed but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Suffix appended to logical resource names before resolution
pub const DEFAULT_RESOURCE_SUFFIX: &str = "_c";

/// # Material Loader Configuration
///
/// Settings shared by material and texture loading for one loader instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Suffix appended to every material and texture name before it is resolved
    pub resource_suffix: String,
    /// Maximum anisotropic filtering level; 0 leaves anisotropy untouched
    pub max_anisotropy: u32,
}

impl LoaderConfig {
    /// Create a configuration with the default suffix and no anisotropy
    pub fn new() -> Self {
        Self {
            resource_suffix: DEFAULT_RESOURCE_SUFFIX.to_string(),
            max_anisotropy: 0,
        }
    }

    /// Set the maximum anisotropy level
    pub fn with_max_anisotropy(mut self, level: u32) -> Self {
        self.max_anisotropy = level;
        self
    }

    /// Set the resource name suffix
    pub fn with_resource_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.resource_suffix = suffix.into();
        self
    }

    /// Name under which a logical resource is looked up
    pub fn compiled_name(&self, name: &str) -> String {
        format!("{}{}", name, self.resource_suffix)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resource_suffix.is_empty() {
            return Err(ConfigError::Invalid("resource suffix cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for LoaderConfig {}
