use crate::track::Track;
use anyhow::{anyhow, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};

/// A text file listing tracks, one `<duration>\t<title>` per line.
///
/// This owns the tracks; playlists built from it borrow them. Blank lines and lines starting
/// with `#` are ignored.
#[derive(Debug)]
pub struct TracksFile {
    path: Utf8PathBuf,
    tracks: Vec<Track>,
}

impl TracksFile {
    /// Creates an empty object for `fpath`, without touching the filesystem.
    pub fn new<T: AsRef<Utf8Path>>(fpath: T) -> Self {
        TracksFile {
            path: Utf8PathBuf::from(fpath.as_ref()),
            tracks: Vec::new(),
        }
    }

    /// Reads a tracks file. Lines that fail to parse are skipped with a warning.
    pub fn open<T: AsRef<Utf8Path>>(fpath: T) -> Result<Self> {
        let mut tf = Self::new(fpath);

        let file = match File::open(&tf.path) {
            Ok(file) => BufReader::new(file),
            Err(e) => return Err(anyhow!("Failed to open '{}': {}", tf.path, e)),
        };
        for (i, line) in file.lines().enumerate() {
            let line = match line {
                Ok(str) => str,
                Err(e) => return Err(anyhow!("Failed to read line {} in '{}': {}", i + 1, tf.path, e)),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match line.parse::<Track>() {
                Ok(track) => tf.tracks.push(track),
                Err(e) => warn!("Failed to parse line {} in '{}': {}, skipping", i + 1, tf.path, e),
            }
        }
        Ok(tf)
    }

    /// Returns the path to the text file from which the object was created.
    pub fn path(&self) -> &Utf8PathBuf {
        &self.path
    }

    /// Returns all tracks, in order of appearance.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Overwrites the text file with the owned tracks, in order.
    pub fn write(&self) -> Result<()> {
        Self::write_order(&self.path, self.tracks.iter())
    }

    /// Writes `tracks` to `fpath` in the given order, replacing any existing contents.
    pub fn write_order<'a, T: AsRef<Utf8Path>>(fpath: T, tracks: impl Iterator<Item = &'a Track>) -> Result<()> {
        let fpath = fpath.as_ref();
        let mut file = match File::create(fpath) {
            Ok(file) => file,
            Err(e) => return Err(anyhow!("Failed to create '{}': {}", fpath, e)),
        };
        for track in tracks {
            writeln!(file, "{}", track.as_file_line())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[test]
    fn open_skips_comments_blanks_and_bad_lines() {
        let dir = tempdir().unwrap();
        let path = utf8(dir.path().join("tracks.tsv"));
        fs::write(&path, "# header\n3:25\tFirst\n\nnot a line\n61\tSecond\n1:00:00\tThird\n").unwrap();

        let tf = TracksFile::open(&path).unwrap();
        assert_eq!(tf.path(), &path);
        assert_eq!(tf.tracks(), [
            Track::new("First", 205),
            Track::new("Second", 61),
            Track::new("Third", 3600),
        ]);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempdir().unwrap();
        let path = utf8(dir.path().join("missing.tsv"));
        let err = TracksFile::open(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to open"));
    }

    #[test]
    fn write_then_open_preserves_tracks() {
        let dir = tempdir().unwrap();
        let path = utf8(dir.path().join("out.tsv"));

        let mut tf = TracksFile::new(&path);
        tf.push(Track::new("One", 5));
        tf.push(Track::new("Two", 125));
        tf.write().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "0:05\tOne\n2:05\tTwo\n");
        assert_eq!(TracksFile::open(&path).unwrap().tracks(), tf.tracks());
    }

    #[test]
    fn write_order_uses_the_given_order() {
        let dir = tempdir().unwrap();
        let path = utf8(dir.path().join("order.tsv"));
        let tracks = [Track::new("A", 1), Track::new("B", 2)];

        TracksFile::write_order(&path, tracks.iter().rev()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0:02\tB\n0:01\tA\n");
    }
}
