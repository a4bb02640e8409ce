use std::fs;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use tracing::{debug, warn};

use super::main::ConfigError;

/// Read a configuration file, tolerating a UTF-8 byte order mark
pub fn read_config_text(path: &Path) -> Result<String, ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (content, encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        debug!(
            "Config file {} contained invalid {} sequences, replaced",
            path.display(),
            encoding.name()
        );
    }
    Ok(content.into_owned())
}

/// Replace `${VAR_NAME}` placeholders using `lookup`. Unknown variables are left untouched.
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("placeholder pattern is valid");
    pattern
        .replace_all(content, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| {
                warn!("Environment variable {} is not set, placeholder left unresolved", &caps[1]);
                caps[0].to_string()
            })
        })
        .into_owned()
}

/// Drop a secret that is still an unresolved `${VAR}` placeholder
pub fn resolved_secret(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let trimmed = v.trim();
        !trimmed.is_empty() && !(trimmed.starts_with("${") && trimmed.ends_with('}'))
    })
}

/// First existing file among the candidate paths
pub fn find_config_file(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Candidate locations, most specific first
pub fn default_config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("conf.yaml"));
    candidates.push(PathBuf::from("conf.yml"));
    candidates.push(PathBuf::from("conf.json"));
    candidates
}
