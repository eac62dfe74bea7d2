use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use topic_sieve::config::load_config;
///
/// let config = load_config(Path::new("sieve.toml")).unwrap();
/// println!("Concurrency: {}", config.pipeline.concurrency);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is written into the error report header so a report can be
/// matched with the configuration that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Reads the classifier credential from the environment
///
/// # Returns
///
/// * `Ok(String)` - The non-empty credential
/// * `Err(ConfigError::MissingCredential)` - The variable is unset or blank
pub fn read_api_key(env_var: &str) -> Result<String, ConfigError> {
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingCredential(env_var.to_string())),
    }
}

/// Loads `KEY=value` lines from an env file into the process environment
///
/// Variables already set in the environment keep their value.
///
/// # Returns
///
/// * `Ok(true)` - The file was loaded
/// * `Ok(false)` - There is no such file
/// * `Err(ConfigError::EnvFile)` - The file exists but could not be read or parsed
pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ConfigError::EnvFile(format!("{}: {}", path.display(), e))),
    }
}
