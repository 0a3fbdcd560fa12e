//! Path handling for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is visible under `/host`, which maps
//! to the directory Zellij was started from (usually the user's home). Paths
//! from configuration are written the way the user sees them on the host and
//! must be translated before the worker can open them.

use std::path::{Path, PathBuf};

/// Sandbox mount point of the host filesystem.
pub const HOST_ROOT: &str = "/host";

/// Returns the plugin data directory, `/host/.local/share/zellij/yakguk`.
///
/// Trace exports are written here; the dataset itself lives wherever
/// `data_file` points.
#[must_use]
pub fn data_dir() -> PathBuf {
    Path::new(HOST_ROOT).join(".local/share/zellij/yakguk")
}

/// Expands a leading `~` to the sandbox host root.
///
/// # Examples
///
/// ```
/// use yakguk::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/pharmacy_data.json"), "/host/pharmacy_data.json");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/data/pharmacies.json"), "/data/pharmacies.json");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    match path.strip_prefix('~') {
        Some("") => HOST_ROOT.to_string(),
        Some(rest) if rest.starts_with('/') => format!("{HOST_ROOT}{rest}"),
        _ => path.to_string(),
    }
}

/// Resolves a configured dataset path to a path the worker can open.
///
/// Tilde paths and relative paths are both anchored at the host root;
/// absolute paths are used unchanged.
#[must_use]
pub fn resolve_host_path(raw: &str) -> PathBuf {
    let expanded = PathBuf::from(expand_tilde(raw.trim()));
    if expanded.is_absolute() {
        expanded
    } else {
        Path::new(HOST_ROOT).join(expanded)
    }
}

/// Removes the `/host` prefix so a sandbox path reads like a host path.
///
/// # Examples
///
/// ```
/// use yakguk::infrastructure::strip_host_prefix;
///
/// assert_eq!(strip_host_prefix("/host/pharmacy_data.json"), "~/pharmacy_data.json");
/// assert_eq!(strip_host_prefix("/data/pharmacies.json"), "/data/pharmacies.json");
/// ```
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    match path.strip_prefix(HOST_ROOT) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{rest}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_under_host() {
        assert_eq!(data_dir(), PathBuf::from("/host/.local/share/zellij/yakguk"));
    }

    #[test]
    fn tilde_only_expands_at_the_start() {
        assert_eq!(expand_tilde("~user/file"), "~user/file");
        assert_eq!(expand_tilde("data/~/file"), "data/~/file");
    }

    #[test]
    fn relative_paths_anchor_at_host_root() {
        assert_eq!(
            resolve_host_path("data/pharmacy_data.json"),
            PathBuf::from("/host/data/pharmacy_data.json")
        );
        assert_eq!(
            resolve_host_path(" ~/pharmacy_data.json "),
            PathBuf::from("/host/pharmacy_data.json")
        );
        assert_eq!(resolve_host_path("/srv/data.json"), PathBuf::from("/srv/data.json"));
    }

    #[test]
    fn strip_prefix_needs_a_path_boundary() {
        assert_eq!(strip_host_prefix("/hostname/file"), "/hostname/file");
        assert_eq!(strip_host_prefix("/host"), "~");
    }
}
