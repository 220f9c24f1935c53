use std::path::PathBuf;

use crate::platform::paths;

/// Resolve a configured path, expanding a leading `~` or `~/` to the home
/// directory. Left as written when there is no home directory.
pub fn expand_tilde(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some("") => "",
        Some(rest) => match rest.strip_prefix('/') {
            Some(rest) => rest,
            None => return PathBuf::from(raw),
        },
        None => return PathBuf::from(raw),
    };
    match paths::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde("/var/lib/bakbridge"), PathBuf::from("/var/lib/bakbridge"));
        assert_eq!(expand_tilde("backups/~old"), PathBuf::from("backups/~old"));
        assert_eq!(expand_tilde("~alice/state.json"), PathBuf::from("~alice/state.json"));
    }

    #[test]
    fn leading_tilde_joins_home() {
        let Some(home) = paths::home_dir() else {
            return;
        };
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("~/book/state.json"), home.join("book/state.json"));
    }
}
