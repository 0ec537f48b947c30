use camino::Utf8PathBuf;
use playlist_tools::{
    playlist::Playlist,
    track::{Track, TrackInfo},
    tracksfile::TracksFile,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn sorted_playlist_written_back_and_reloaded() {
    let dir = tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("tracks.tsv")).unwrap();
    fs::write(&path, "7\tg\n1\tb\n6\tc\n7\td\n5\te\n8\tf\n7\ta\n").unwrap();

    let tf = TracksFile::open(&path).unwrap();
    let mut playlist = Playlist::new(tf.tracks().len());
    for track in tf.tracks() {
        assert!(playlist.push(track));
    }
    assert_eq!(playlist.total_duration(), 41);
    assert_eq!(playlist.title_of_shortest(), Some("b"));

    playlist.sort_by_duration();
    TracksFile::write_order(&path, (0..playlist.len()).filter_map(|i| playlist.get(i))).unwrap();

    let reloaded = TracksFile::open(&path).unwrap();
    let durations: Vec<u32> = reloaded.tracks().iter().map(TrackInfo::duration).collect();
    assert_eq!(durations, [1, 5, 6, 7, 7, 7, 8]);
    assert_eq!(reloaded.tracks().len(), 7);
}

#[test]
fn merge_two_files_into_bounded_playlist() {
    let mut first = TracksFile::new("first.tsv");
    first.push(Track::new("Opening", 120));
    first.push(Track::new("Middle", 240));
    let mut second = TracksFile::new("second.tsv");
    second.push(Track::new("Closing", 90));

    let mut merged = Playlist::new(3);
    let mut other = Playlist::new(2);
    for track in first.tracks() {
        assert!(merged.push(track));
    }
    for track in second.tracks() {
        assert!(other.push(track));
    }
    assert!(merged.push_all(&other));
    assert!(merged.is_full());
    assert_eq!(merged.index_of("closing"), Some(2));
    assert!(!merged.push_all(&other));
    assert_eq!(merged.len(), 3);
}
