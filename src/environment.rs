use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;

/// Retrieves an environment variable and splits it into a vector of strings based on a delimiter.
///
/// Empty segments are dropped, so an unset variable yields an empty vector.
pub fn get_env_var_as_vec(var: &str, delimiter: char) -> Vec<String> {
    env::var(var)
        .unwrap_or_default()
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Returns the trimmed value of the first of `vars` that is set and non-empty.
pub fn get_env_var_any(vars: &[&str]) -> Option<String> {
    vars.iter()
        .filter_map(|var| env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Parses an environment variable, falling back to `default` when it is unset or empty.
///
/// A value that is present but does not parse is an error rather than a silent default.
pub fn get_env_var_parsed<T>(var: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Invalid value {:?} for {}: {}", value, var, e)),
        _ => Ok(default),
    }
}

/// Reads a boolean flag, falling back to `default` when it is unset or empty.
///
/// Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`, case-insensitively.
pub fn get_env_var_bool(var: &str, default: bool) -> Result<bool> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(anyhow!("Invalid value {:?} for {}: expected a boolean", value, var)),
            }
        }
        _ => Ok(default),
    }
}
