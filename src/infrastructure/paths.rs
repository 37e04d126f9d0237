//! Path helpers for the Zellij sandbox.

use std::path::PathBuf;

const SESSION_FILE: &str = "session.json";
const TRACE_FILE: &str = "countryscope-otlp.json";

/// Returns the data directory for countryscope storage.
///
/// `/host` is the sandbox mount of the directory Zellij was started from,
/// usually the home directory, so this normally resolves to
/// `~/.local/share/zellij/countryscope`.
///
/// # Examples
///
/// ```
/// use countryscope::infrastructure::get_data_dir;
///
/// assert_eq!(
///     get_data_dir().to_str(),
///     Some("/host/.local/share/zellij/countryscope")
/// );
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("countryscope")
}

/// File holding the persisted session keys.
#[must_use]
pub fn session_file() -> PathBuf {
    get_data_dir().join(SESSION_FILE)
}

/// File receiving exported spans.
#[must_use]
pub fn trace_file() -> PathBuf {
    get_data_dir().join(TRACE_FILE)
}

/// Expands tilde paths to use the `/host` prefix.
///
/// # Examples
///
/// ```
/// use countryscope::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/nord.toml"), "/host/themes/nord.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_files_live_in_data_dir() {
        assert_eq!(session_file(), get_data_dir().join("session.json"));
        assert!(trace_file().ends_with("countryscope-otlp.json"));
    }
}
