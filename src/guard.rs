// fsgate - Path Guard
//
// Decides whether a candidate path falls under one of the configured
// safe roots after canonicalization. Comparison is segment-aware:
// /tmp/xyz never matches a root of /tmp/x.
//
// TOCTOU NOTE: the guard check and the filesystem operation that follows
// are not atomic. A symlink swapped in between the two could redirect the
// operation outside the safe roots. This is a known, accepted risk here.

use std::path::{Path, PathBuf};

/// Containment check against a fixed set of canonical safe roots.
///
/// Roots are canonicalized once at construction and never mutated.
#[derive(Debug, Clone)]
pub struct PathGuard {
    roots: Vec<PathBuf>,
}

impl PathGuard {
    /// Canonicalize the configured roots. Roots that cannot be resolved
    /// (typically: do not exist) are skipped with a warning — a missing
    /// root can never grant access.
    pub fn new(roots: &[PathBuf]) -> Self {
        let roots = roots
            .iter()
            .filter_map(|r| match r.canonicalize() {
                Ok(canonical) => Some(canonical),
                Err(e) => {
                    log::warn!("skipping unresolvable safe root {:?}: {}", r, e);
                    None
                }
            })
            .collect();
        Self { roots }
    }

    /// The canonical safe roots in effect.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Is this path safe to access?
    ///
    /// True iff the canonical resolution of `path` equals a safe root or
    /// has one as a strict path-segment prefix. Unresolvable paths are
    /// always unsafe — never unsafe-by-default-true.
    pub fn is_safe(&self, path: &str) -> bool {
        let resolved = match resolve(path) {
            Some(p) => p,
            None => return false,
        };
        self.roots.iter().any(|root| resolved.starts_with(root))
    }
}

/// Resolve a path with realpath semantics: follow symlinks, strip `.`
/// and `..` segments. For paths that do not exist yet (write targets),
/// canonicalize the parent directory and append the final component.
/// None = unresolvable = unsafe.
fn resolve(path: &str) -> Option<PathBuf> {
    if path.is_empty() || path.contains('\0') {
        return None;
    }

    let candidate = Path::new(path);
    if let Ok(canonical) = candidate.canonicalize() {
        return Some(canonical);
    }

    // Not on disk — resolve the parent instead. file_name() returns None
    // for trailing `..`, so traversal in the final component is rejected.
    let parent = candidate.parent()?;
    let file_name = candidate.file_name()?;
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".").canonicalize().ok()?
    } else {
        parent.canonicalize().ok()?
    };
    Some(parent.join(file_name))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn guard_for(root: &Path) -> PathGuard {
        PathGuard::new(&[root.to_path_buf()])
    }

    #[test]
    fn allows_file_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inside.txt");
        fs::write(&file, "data").unwrap();
        let guard = guard_for(dir.path());
        assert!(guard.is_safe(file.to_str().unwrap()));
    }

    #[test]
    fn allows_root_itself() {
        let dir = tempfile::tempdir().unwrap();
        let guard = guard_for(dir.path());
        assert!(guard.is_safe(dir.path().to_str().unwrap()));
    }

    #[test]
    fn rejects_path_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let guard = guard_for(dir.path());
        assert!(!guard.is_safe("/etc/passwd"));
    }

    #[test]
    fn rejects_sibling_with_common_string_prefix() {
        // Root "x" must not match sibling "xyz" — segment comparison,
        // not raw string prefix.
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("x");
        let sibling = parent.path().join("xyz");
        fs::create_dir(&root).unwrap();
        fs::create_dir(&sibling).unwrap();
        let inside = sibling.join("victim.txt");
        fs::write(&inside, "data").unwrap();

        let guard = guard_for(&root);
        assert!(!guard.is_safe(sibling.to_str().unwrap()));
        assert!(!guard.is_safe(inside.to_str().unwrap()));
    }

    #[test]
    fn rejects_traversal_out_of_root() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("safe");
        fs::create_dir(&root).unwrap();
        fs::write(parent.path().join("secret.txt"), "data").unwrap();

        let guard = guard_for(&root);
        let escape = root.join("..").join("secret.txt");
        assert!(!guard.is_safe(escape.to_str().unwrap()));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlink_escape() {
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("secret.txt");
        fs::write(&target, "data").unwrap();

        let root = tempfile::tempdir().unwrap();
        let link = root.path().join("innocent.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let guard = guard_for(root.path());
        assert!(!guard.is_safe(link.to_str().unwrap()));
    }

    #[test]
    fn allows_nonexistent_file_with_safe_parent() {
        // Write targets don't exist yet — parent resolution must apply.
        let dir = tempfile::tempdir().unwrap();
        let new_file = dir.path().join("not-yet-created.txt");
        let guard = guard_for(dir.path());
        assert!(guard.is_safe(new_file.to_str().unwrap()));
    }

    #[test]
    fn rejects_nonexistent_file_with_nonexistent_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("missing").join("file.txt");
        let guard = guard_for(dir.path());
        assert!(!guard.is_safe(nested.to_str().unwrap()));
    }

    #[test]
    fn rejects_empty_and_null_byte_paths() {
        let dir = tempfile::tempdir().unwrap();
        let guard = guard_for(dir.path());
        assert!(!guard.is_safe(""));
        assert!(!guard.is_safe("/tmp/foo\0bar"));
    }

    #[test]
    fn missing_root_grants_nothing() {
        let guard = PathGuard::new(&[PathBuf::from("/fsgate_nonexistent_root_xyz")]);
        assert!(guard.roots().is_empty());
        assert!(!guard.is_safe("/fsgate_nonexistent_root_xyz/file.txt"));
    }
}
