//! Model directory enumeration and save-path resolution.
//!
//! The plain download node's `local_path` input is a choice over the
//! directories under the models root; the final save path is resolved here
//! with component sanitization so host-supplied strings cannot escape the
//! target directory.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Conventional model directory set, used when the models root does not
/// exist yet (fresh install) so the schema choice list is never empty.
pub const DEFAULT_MODEL_DIRS: &[&str] = &[
    "checkpoints",
    "clip",
    "clip_vision",
    "controlnet",
    "diffusers",
    "embeddings",
    "loras",
    "upscale_models",
    "vae",
];

/// Errors raised while resolving save paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// A path value was empty after trimming.
    #[error("empty path value for {what}")]
    Empty {
        /// Which value was empty (`directory` or `filename`).
        what: &'static str,
    },

    /// A path component would escape the target directory.
    #[error("path component {component:?} in {value:?} is not allowed")]
    UnsafeComponent {
        /// The offending component.
        component: String,
        /// The full value it came from.
        value: String,
    },

    /// Directory creation failed.
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl PathError {
    fn unsafe_component(component: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnsafeComponent {
            component: component.into(),
            value: value.into(),
        }
    }
}

/// Lists the model directories under `models_root`, sorted by name.
///
/// Falls back to [`DEFAULT_MODEL_DIRS`] when the root is missing, not
/// readable, or holds no subdirectories at all.
#[must_use]
pub fn model_dirs(models_root: &Path) -> Vec<String> {
    let mut dirs: Vec<String> = match std::fs::read_dir(models_root) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.'))
            .collect(),
        Err(e) => {
            debug!(root = %models_root.display(), error = %e, "models root not readable, using default directory set");
            Vec::new()
        }
    };
    if dirs.is_empty() {
        return DEFAULT_MODEL_DIRS.iter().map(|s| (*s).to_string()).collect();
    }
    dirs.sort();
    dirs
}

/// Resolves the full save path for `filename` under `dir`, creating the
/// directory if needed.
///
/// Relative `dir` values resolve under `models_root`; absolute values (the
/// override input) are honored as-is. Both `dir` and `filename` may contain
/// `/`-separated subpaths, but no component may be empty, `.`, or `..`.
///
/// # Errors
///
/// Returns [`PathError`] when a value is empty, a component is unsafe, or
/// the directory cannot be created.
pub fn prepare_download_path(
    models_root: &Path,
    dir: &str,
    filename: &str,
) -> Result<PathBuf, PathError> {
    let dir = dir.trim();
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(PathError::Empty { what: "filename" });
    }

    let dir_path = if Path::new(dir).is_absolute() {
        PathBuf::from(dir)
    } else {
        if dir.is_empty() {
            return Err(PathError::Empty { what: "directory" });
        }
        models_root.join(relative_components(dir)?)
    };

    let save_path = dir_path.join(relative_components(filename)?);

    let parent = save_path.parent().unwrap_or(&dir_path);
    std::fs::create_dir_all(parent).map_err(|e| PathError::CreateDir {
        path: parent.to_path_buf(),
        source: e,
    })?;

    debug!(path = %save_path.display(), "resolved save path");
    Ok(save_path)
}

/// Rebuilds `value` as a relative path from validated components.
fn relative_components(value: &str) -> Result<PathBuf, PathError> {
    let mut out = PathBuf::new();
    for component in value.split(['/', '\\']) {
        match component {
            "" | "." | ".." => {
                return Err(PathError::unsafe_component(component, value));
            }
            safe => out.push(safe),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_model_dirs_lists_sorted_subdirectories() {
        let root = TempDir::new().unwrap();
        for name in ["vae", "checkpoints", "loras"] {
            std::fs::create_dir(root.path().join(name)).unwrap();
        }
        std::fs::write(root.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(root.path().join(".cache")).unwrap();

        assert_eq!(
            model_dirs(root.path()),
            vec!["checkpoints", "loras", "vae"],
            "files and dot-directories must be excluded"
        );
    }

    #[test]
    fn test_model_dirs_missing_root_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("does-not-exist");
        let dirs = model_dirs(&missing);
        assert_eq!(dirs.len(), DEFAULT_MODEL_DIRS.len());
        assert!(dirs.iter().any(|d| d == "checkpoints"));
    }

    #[test]
    fn test_model_dirs_empty_root_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        let dirs = model_dirs(root.path());
        assert_eq!(dirs.len(), DEFAULT_MODEL_DIRS.len());
    }

    #[test]
    fn test_prepare_creates_directory_and_joins_filename() {
        let root = TempDir::new().unwrap();
        let path =
            prepare_download_path(root.path(), "checkpoints", "v1-5-pruned-emaonly.ckpt").unwrap();
        assert_eq!(
            path,
            root.path().join("checkpoints").join("v1-5-pruned-emaonly.ckpt")
        );
        assert!(root.path().join("checkpoints").is_dir());
    }

    #[test]
    fn test_prepare_supports_nested_filenames() {
        let root = TempDir::new().unwrap();
        let path =
            prepare_download_path(root.path(), "checkpoints", "vae/diffusion.safetensors").unwrap();
        assert_eq!(
            path,
            root.path()
                .join("checkpoints")
                .join("vae")
                .join("diffusion.safetensors")
        );
        assert!(root.path().join("checkpoints").join("vae").is_dir());
    }

    #[test]
    fn test_prepare_absolute_dir_is_honored_as_is() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let dir = elsewhere.path().join("override");
        let path =
            prepare_download_path(root.path(), dir.to_str().unwrap(), "model.safetensors").unwrap();
        assert_eq!(path, dir.join("model.safetensors"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_prepare_rejects_traversal_in_dir() {
        let root = TempDir::new().unwrap();
        let result = prepare_download_path(root.path(), "../outside", "model.ckpt");
        assert!(matches!(result, Err(PathError::UnsafeComponent { .. })));
    }

    #[test]
    fn test_prepare_rejects_traversal_in_filename() {
        let root = TempDir::new().unwrap();
        let result = prepare_download_path(root.path(), "checkpoints", "../../etc/passwd");
        assert!(matches!(result, Err(PathError::UnsafeComponent { .. })));
    }

    #[test]
    fn test_prepare_rejects_empty_values() {
        let root = TempDir::new().unwrap();
        assert!(matches!(
            prepare_download_path(root.path(), "", "model.ckpt"),
            Err(PathError::Empty { what: "directory" })
        ));
        assert!(matches!(
            prepare_download_path(root.path(), "checkpoints", "  "),
            Err(PathError::Empty { what: "filename" })
        ));
    }
}
