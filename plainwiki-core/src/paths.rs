use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Lexically normalize `path`: drop `.` components and fold `..` into the
/// preceding component. Touches no filesystem state.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Make `root` absolute and normalized so that confinement checks compare like
/// with like.
pub fn absolute_root(root: &Path) -> Result<PathBuf> {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    Ok(normalize(&absolute))
}

/// Join `relative` onto `root` and verify the normalized result stays inside
/// `root`. `root` must already be normalized (see [`absolute_root`]).
pub fn confine(root: &Path, relative: &str) -> Result<PathBuf> {
    let candidate = normalize(&root.join(relative));
    if candidate == root || !candidate.starts_with(root) {
        tracing::warn!("Rejected path outside storage root: {:?}", candidate);
        return Err(Error::PathSecurityViolation(candidate));
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/wiki/pages/./a/../Home.txt")),
            PathBuf::from("/wiki/pages/Home.txt")
        );
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_confine_accepts_paths_inside_root() {
        let root = PathBuf::from("/wiki/pages");
        assert_eq!(
            confine(&root, "Home.txt").unwrap(),
            PathBuf::from("/wiki/pages/Home.txt")
        );
        assert_eq!(
            confine(&root, "../pages/Home.txt").unwrap(),
            PathBuf::from("/wiki/pages/Home.txt")
        );
    }

    #[test]
    fn test_confine_rejects_traversal() {
        let root = PathBuf::from("/wiki/pages");
        for relative in ["../../etc/passwd.txt", "../pages2/Home.txt", "/etc/passwd", ".."] {
            assert!(
                matches!(confine(&root, relative), Err(Error::PathSecurityViolation(_))),
                "{relative}"
            );
        }
    }

    #[test]
    fn test_confine_rejects_root_itself() {
        let root = PathBuf::from("/wiki/pages");
        assert!(confine(&root, ".").is_err());
        assert!(confine(&root, "").is_err());
    }
}
