pub mod track;
pub mod playlist;
pub mod tracksfile;

use camino::{Utf8Path, Utf8PathBuf};
use std::path::Path;
use std::sync::OnceLock;

/// Returns the path to the default tracks file.
pub fn default_tracks_file() -> &'static Utf8Path {
    static TRACKS_FILE: OnceLock<Utf8PathBuf> = OnceLock::new();
    TRACKS_FILE.get_or_init(|| path_from(dirs::home_dir, "Music/tracks.tsv"))
}

/// Constructs a path by concatenating a `dirs::*` function output and an arbitrary relative path.
///
/// # Examples
/// ```no_run
/// use playlist_tools::path_from;
/// assert_eq!(path_from(dirs::home_dir, "my_file.txt"), "/home/user/my_file.txt");
/// ```
pub fn path_from<A: AsRef<Path>, B: AsRef<Path>>(base_dir: fn() -> Option<A>, rel_path: B) -> Utf8PathBuf {
    assert!(rel_path.as_ref().is_relative(), "rel_path must be relative");
    let path = match base_dir() {
        Some(path) => path,
        None => panic!("Failed to locate base directory"),
    };
    assert!(path.as_ref().is_absolute(), "base_dir must yield an absolute path");
    let mut path = match path.as_ref().to_str() {
        Some(str) => Utf8PathBuf::from(str),
        None => panic!("Failed to convert base_dir to UTF-8 (other encodings not supported)"),
    };
    let rel_path = match rel_path.as_ref().to_str() {
        Some(path) => path,
        None => panic!("Failed to convert rel_path to UTF-8 (other encodings not supported)"),
    };
    path.push(rel_path);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fake_base() -> Option<PathBuf> {
        Some(PathBuf::from("/srv/media"))
    }

    fn no_base() -> Option<PathBuf> {
        None
    }

    #[test]
    fn path_from_joins_relative_path() {
        assert_eq!(path_from(fake_base, "Music/tracks.tsv"), "/srv/media/Music/tracks.tsv");
    }

    #[test]
    #[should_panic(expected = "rel_path must be relative")]
    fn path_from_rejects_absolute_rel_path() {
        path_from(fake_base, "/etc/passwd");
    }

    #[test]
    #[should_panic(expected = "Failed to locate base directory")]
    fn path_from_requires_base_dir() {
        path_from(no_base, "x");
    }
}
