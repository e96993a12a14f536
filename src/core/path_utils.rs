/*
 * Resolves the launcher's per-user directories: the local configuration
 * directory (settings, log file, import record) and the private data directory
 * the game assets are imported into. Both are derived from `ProjectDirs` with
 * no organization qualifier and are created on first use.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const PRIVATE_DATA_SUBDIR: &str = "data";

/*
 * Retrieves the application's local (non-roaming) configuration directory,
 * creating it if necessary. Returns `None` if the platform offers no suitable
 * location or the directory cannot be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving config local dir for '{app_name}'");
    ProjectDirs::from("", "", app_name)
        .and_then(|proj_dirs| ensure_dir_exists(proj_dirs.config_local_dir()))
}

/*
 * Retrieves the private directory that holds the imported game data. This is
 * the engine's working directory and the destination root of every import.
 */
pub fn get_private_data_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving private data dir for '{app_name}'");
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        ensure_dir_exists(&proj_dirs.data_local_dir().join(PRIVATE_DATA_SUBDIR))
    })
}

fn ensure_dir_exists(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        log::trace!("PathUtils: Directory already exists: {path:?}");
        return Some(path.to_path_buf());
    }
    match fs::create_dir_all(path) {
        Ok(()) => {
            log::debug!("PathUtils: Created directory {path:?}");
            Some(path.to_path_buf())
        }
        Err(e) => {
            log::error!("PathUtils: Failed to create directory {path:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn remove_project_dirs(app_name: &str) {
        if let Some(proj_dirs) = ProjectDirs::from("", "", app_name) {
            for dir in [proj_dirs.config_local_dir(), proj_dirs.data_local_dir()] {
                if dir.exists() {
                    if let Err(e) = fs::remove_dir_all(dir) {
                        eprintln!("Test cleanup failed for {dir:?}: {e}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_ensure_dir_exists_creates_nested_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        assert_eq!(ensure_dir_exists(&nested), Some(nested.clone()));
        assert!(nested.is_dir());
        // Second call is a no-op on an existing directory.
        assert_eq!(ensure_dir_exists(&nested), Some(nested));
    }

    #[test]
    fn test_ensure_dir_exists_fails_on_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        assert_eq!(ensure_dir_exists(&blocker.join("child")), None);
    }

    #[test]
    fn test_private_data_dir_is_created_and_named_after_app() {
        let unique_app_name = format!("TestApp_PathUtils_Data_{}", rand::random::<u64>());

        let path = get_private_data_dir(&unique_app_name);

        // Some sandboxed CI environments have no home directory at all.
        if let Some(path) = path {
            assert!(path.is_dir());
            assert!(path.ends_with(PRIVATE_DATA_SUBDIR));
            assert!(
                path.to_string_lossy()
                    .to_lowercase()
                    .contains(&unique_app_name.to_lowercase())
            );
        }
        remove_project_dirs(&unique_app_name);
    }

    #[test]
    fn test_config_dir_returns_same_path_twice() {
        let unique_app_name = format!("TestApp_PathUtils_Config_{}", rand::random::<u64>());

        let first = get_base_app_config_local_dir(&unique_app_name);
        let second = get_base_app_config_local_dir(&unique_app_name);

        assert_eq!(first, second);
        remove_project_dirs(&unique_app_name);
    }
}
