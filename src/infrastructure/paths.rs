//! Home-relative path expansion for configured files.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to `home`.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use redbank::infrastructure::expand_home;
///
/// let home = Path::new("/home/alice");
/// assert_eq!(expand_home("~/bank.json", Some(home)), PathBuf::from("/home/alice/bank.json"));
/// assert_eq!(expand_home("~", Some(home)), PathBuf::from("/home/alice"));
/// assert_eq!(expand_home("/srv/bank.json", Some(home)), PathBuf::from("/srv/bank.json"));
/// assert_eq!(expand_home("~/bank.json", None), PathBuf::from("~/bank.json"));
/// ```
#[must_use]
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (rest, Some(home)) if rest.starts_with("~/") => home.join(&rest[2..]),
        _ => PathBuf::from(path),
    }
}

/// [`expand_home`] with `$HOME`.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    expand_home(path, home.as_deref())
}
