use std::path::PathBuf;

/// Directory name used under the per-user config directory.
pub const APP_DIR_NAME: &str = "bakbridge";

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// `$HOME`, falling back to the password database entry for the effective user.
#[cfg(unix)]
pub fn home_dir() -> Option<PathBuf> {
    env_path("HOME").or_else(|| {
        use nix::unistd::{Uid, User};
        User::from_uid(Uid::effective())
            .ok()
            .flatten()
            .map(|u| u.dir)
    })
}

#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
    env_path("USERPROFILE")
}

#[cfg(target_os = "macos")]
fn user_config_root() -> Option<PathBuf> {
    home_dir().map(|h| h.join("Library").join("Application Support"))
}

#[cfg(windows)]
fn user_config_root() -> Option<PathBuf> {
    env_path("APPDATA")
}

#[cfg(all(unix, not(target_os = "macos")))]
fn user_config_root() -> Option<PathBuf> {
    env_path("XDG_CONFIG_HOME")
        .filter(|p| p.is_absolute())
        .or_else(|| home_dir().map(|h| h.join(".config")))
}

/// `<config_dir>/bakbridge`, holding the config file and the location book.
///
/// `None` when neither the platform config directory nor a home directory
/// can be found; the location book then stays in memory.
pub fn app_config_dir() -> Option<PathBuf> {
    user_config_root().map(|d| d.join(APP_DIR_NAME))
}
