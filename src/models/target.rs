use regex::Regex;
use std::env;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

pub const PROVIDER_MARKER: &str = "CameraRaw";
pub const CACHE_MARKER: &str = "Cache2";

/// Default Cache2 location, derived from the platform app-data variables.
pub fn default_target() -> PathBuf {
    default_target_from(|name| env::var(name).ok())
}

fn default_target_from<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let base = lookup("LOCALAPPDATA")
        .or_else(|| lookup("APPDATA"))
        .map(PathBuf::from)
        .or_else(dirs_next::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    absolutize(&base.join("Adobe").join(PROVIDER_MARKER).join(CACHE_MARKER))
}

/// Turn a user-supplied path string into an absolute, canonical path:
/// surrounding whitespace and quotes stripped, embedded environment
/// variables expanded, separators normalized for the host platform.
pub fn normalize_path(input: &str) -> PathBuf {
    let raw = input.trim().trim_matches(|c| c == '"' || c == '\'');
    let expanded = expand_env_vars_with(raw, |name| env::var(name).ok());
    let with_host_seps: String = expanded
        .chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect();
    absolutize(Path::new(&with_host_seps))
}

/// Expand `%VAR%`, `$VAR` and `${VAR}` references. Unset variables are
/// left verbatim.
fn expand_env_vars_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"%([A-Za-z0-9_]+)%|\$\{([A-Za-z0-9_]+)\}|\$([A-Za-z0-9_]+)")
        .expect("env var pattern is valid");
    re.replace_all(input, |caps: &regex::Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        lookup(name).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Resolve symlinks and `..` components where possible. A path that does
/// not exist cannot be canonicalized; it is anchored to the current
/// directory instead so the safety gate can still report an absolute path.
fn absolutize(path: &Path) -> PathBuf {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return resolved;
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
