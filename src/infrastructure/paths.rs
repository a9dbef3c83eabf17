//! Filesystem locations for the session cache, config file and trace output.

use std::path::{Path, PathBuf};

/// Overrides the data directory when set.
pub const HOME_ENV: &str = "CANCAPP_HOME";

pub const SESSION_FILE: &str = "session.json";
pub const CONFIG_FILE: &str = "config.toml";
pub const TRACE_FILE: &str = "cancapp-otlp.json";

/// Returns the data directory.
///
/// `$CANCAPP_HOME` wins; otherwise the platform data directory
/// (`~/.local/share/cancapp` on Linux), falling back to `./.cancapp` when the
/// platform has none.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::data_dir().map_or_else(|| PathBuf::from(".cancapp"), |dir| dir.join("cancapp"))
}

#[must_use]
pub fn session_file(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE)
}

#[must_use]
pub fn config_file(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TRACE_FILE)
}

/// Expands a leading `~` to the user's home directory.
///
/// # Examples
///
/// ```
/// use cancapp::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path").to_str(), Some("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_the_data_dir() {
        let dir = Path::new("/tmp/cancapp");
        assert_eq!(session_file(dir), PathBuf::from("/tmp/cancapp/session.json"));
        assert_eq!(config_file(dir), PathBuf::from("/tmp/cancapp/config.toml"));
        assert_eq!(trace_file(dir), PathBuf::from("/tmp/cancapp/cancapp-otlp.json"));
    }

    #[test]
    fn expands_tilde_prefix_only() {
        assert_eq!(expand_tilde("relative/file.png"), PathBuf::from("relative/file.png"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/a.png"), home.join("a.png"));
            assert_eq!(expand_tilde("~"), home);
        }
    }
}
