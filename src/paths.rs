// Filesystem locations.
// Resolves where hubnav keeps its config file and log output.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "hubnav")
}

/// Config directory (~/.config/hubnav on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Directory for log output (~/.local/share/hubnav on Linux).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path to the log file.
pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("hubnav.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        // Only checks path construction; a home directory may be absent in CI.
        if let Some(path) = config_path() {
            assert!(path.ends_with("config.json"));
        }
        if let Some(path) = log_path() {
            assert!(path.ends_with("hubnav.log"));
        }
    }
}
