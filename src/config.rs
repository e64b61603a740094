// fsgate - Configuration
//
// Immutable safe-root configuration. Built once at startup and passed
// into the dispatcher — no global state, no mutation after construction.

use std::env;
use std::path::PathBuf;

/// Server configuration: the ordered list of safe roots.
///
/// Every filesystem operation must resolve to a path under one of these
/// roots. Relative roots are resolved against the working directory when
/// the guard canonicalizes them.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub safe_roots: Vec<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let mut roots = vec![
            PathBuf::from("demos"),
            PathBuf::from("test"),
            PathBuf::from("docs"),
            env::temp_dir(),
        ];
        if let Some(home) = home_dir() {
            roots.push(home.join("Downloads"));
            roots.push(home.join("Documents"));
        }
        Self { safe_roots: roots }
    }
}

impl ServerConfig {
    /// Build a configuration from an explicit root list.
    pub fn from_roots(roots: Vec<PathBuf>) -> Self {
        Self { safe_roots: roots }
    }
}

/// User home directory from the environment.
/// HOME on Unix, USERPROFILE on Windows.
fn home_dir() -> Option<PathBuf> {
    if let Some(home) = env::var_os("HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    if cfg!(target_os = "windows") {
        if let Some(profile) = env::var_os("USERPROFILE") {
            if !profile.is_empty() {
                return Some(PathBuf::from(profile));
            }
        }
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_includes_temp_dir() {
        let config = ServerConfig::default();
        assert!(config.safe_roots.contains(&env::temp_dir()));
    }

    #[test]
    fn default_includes_relative_roots() {
        let config = ServerConfig::default();
        assert!(config.safe_roots.contains(&PathBuf::from("demos")));
        assert!(config.safe_roots.contains(&PathBuf::from("test")));
        assert!(config.safe_roots.contains(&PathBuf::from("docs")));
    }

    #[test]
    fn from_roots_preserves_order() {
        let roots = vec![PathBuf::from("/a"), PathBuf::from("/b")];
        let config = ServerConfig::from_roots(roots.clone());
        assert_eq!(config.safe_roots, roots);
    }
}
