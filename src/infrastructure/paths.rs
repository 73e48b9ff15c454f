//! Paths inside the Zellij plugin sandbox, where the host filesystem is
//! mounted under `/host`.

use std::path::PathBuf;

/// Directory holding the record store and the trace file.
///
/// Resolves to `/host/.local/share/zellij/registrar`. `/host` is the cwd of
/// the last focused terminal, so when Zellij runs from the home directory
/// this is `~/.local/share/zellij/registrar`.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("registrar")
}

/// Rewrites a leading `~` to `/host`.
///
/// ```
/// use registrar::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/school/records.json"), "/host/school/records.json");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/tmp/records.json"), "/tmp/records.json");
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

/// Resolves the `data_file` option: relative names land in [`get_data_dir`].
#[must_use]
pub fn resolve_data_file(data_file: &str) -> PathBuf {
    let expanded = PathBuf::from(expand_tilde(data_file.trim()));
    if expanded.is_absolute() {
        expanded
    } else {
        get_data_dir().join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_data_files_live_in_the_data_dir() {
        assert_eq!(
            resolve_data_file("north.json"),
            PathBuf::from("/host/.local/share/zellij/registrar/north.json")
        );
        assert_eq!(resolve_data_file("~/r.json"), PathBuf::from("/host/r.json"));
        assert_eq!(resolve_data_file("/srv/r.json"), PathBuf::from("/srv/r.json"));
    }
}
