use playlist_tools::{
    default_tracks_file,
    playlist::*,
    track::*,
    tracksfile::*,
};
use anyhow::{anyhow, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use log::{error, info, warn};
use std::process::ExitCode;

/// Capacity used when `--capacity` is not given.
const DEFAULT_CAPACITY: usize = 100;

#[derive(Parser)]
struct Cli {
    /// Tracks file to read. Default ~/Music/tracks.tsv
    #[arg(short, long)]
    file: Option<Utf8PathBuf>,

    /// Maximum number of tracks the playlist may hold
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the playlist in order
    List {
        #[arg(short, long, help = "Print tracks without indices or totals")]
        plain: bool,
    },
    /// Sort the playlist by increasing duration
    Sort {
        #[arg(short, long, help = "Write the sorted order back to the tracks file")]
        write: bool,
    },
    /// Print the title of the shortest track
    Shortest,
    /// Print the index of a track, by title (case-insensitive)
    Find {
        title: String,
    },
    /// Remove tracks by title (case-insensitive, first match each)
    Remove {
        titles: Vec<String>,

        #[arg(short, long, help = "Write the result back to the tracks file")]
        write: bool,
    },
    /// Insert a new track at a position
    Insert {
        index: usize,
        /// Duration as s, m:ss or h:mm:ss
        duration: String,
        title: String,

        #[arg(short, long, help = "Write the result back to the tracks file")]
        write: bool,
    },
    /// Append all tracks of another tracks file, if they all fit
    Merge {
        other: Utf8PathBuf,

        #[arg(short, long, help = "Write the result back to the tracks file")]
        write: bool,
    },
    /// Print a short summary
    Stats,
}

/// Builds a playlist over the tracks of `tf`. Returns it together with the number of tracks that
/// did not fit.
fn load(tf: &TracksFile, capacity: usize) -> (Playlist<'_, Track>, usize) {
    let mut playlist = Playlist::new(capacity);
    let mut n_dropped = 0usize;
    for track in tf.tracks() {
        if !playlist.push(track) {
            n_dropped += 1;
        }
    }
    if n_dropped != 0 {
        warn!("'{}' holds {} tracks but capacity is {}, ignoring the last {}",
            tf.path(), tf.tracks().len(), capacity, n_dropped);
    }
    (playlist, n_dropped)
}

fn print_playlist(playlist: &Playlist<'_, Track>) {
    for i in 0..playlist.len() {
        if let Some(track) = playlist.get(i) {
            println!("{}  {}", format!("{:>4}", i).dimmed(), track);
        }
    }
    println!("{} {} tracks, {}",
        "--".dimmed(), playlist.len(), format_duration(playlist.total_duration()).bold());
}

/// Writes the playlist order to `fpath`. Refuses if tracks were left out of the playlist, since
/// writing would silently delete them.
fn write_back(fpath: &Utf8Path, playlist: &Playlist<'_, Track>, n_dropped: usize) -> Result<()> {
    if n_dropped != 0 {
        return Err(anyhow!("Refusing to write '{}': {} tracks did not fit the playlist", fpath, n_dropped));
    }
    TracksFile::write_order(fpath, (0..playlist.len()).filter_map(|i| playlist.get(i)))?;
    info!("Wrote {} tracks to '{}'", playlist.len(), fpath);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let fpath = cli.file.unwrap_or_else(|| default_tracks_file().to_owned());
    let tf = TracksFile::open(&fpath)?;

    match cli.command {
        Commands::List { plain } => {
            let (playlist, _) = load(&tf, cli.capacity);
            if plain {
                print!("{}", playlist);
            } else {
                print_playlist(&playlist);
            }
        },

        Commands::Sort { write } => {
            let (mut playlist, n_dropped) = load(&tf, cli.capacity);
            playlist.sort_by_duration();
            print_playlist(&playlist);
            if write {
                write_back(&fpath, &playlist, n_dropped)?;
            }
        },

        Commands::Shortest => {
            let (playlist, _) = load(&tf, cli.capacity);
            match playlist.title_of_shortest() {
                Some(title) => println!("{}", title),
                None => return Err(anyhow!("'{}' contains no tracks", fpath)),
            }
        },

        Commands::Find { title } => {
            let (playlist, _) = load(&tf, cli.capacity);
            match playlist.index_of(&title) {
                Some(index) => println!("{}", index),
                None => return Err(anyhow!("'{}' not found in '{}'", title, fpath)),
            }
        },

        Commands::Remove { titles, write } => {
            let (mut playlist, n_dropped) = load(&tf, cli.capacity);
            for title in &titles {
                let len = playlist.len();
                playlist.remove_title(title);
                if playlist.len() == len {
                    warn!("'{}' not found in '{}', skipping", title, fpath);
                }
            }
            print_playlist(&playlist);
            if write {
                write_back(&fpath, &playlist, n_dropped)?;
            }
        },

        Commands::Insert { index, duration, title, write } => {
            let duration = match parse_duration(&duration) {
                Ok(val) => val,
                Err(e) => return Err(anyhow!("Failed to parse duration '{}': {}", duration, e)),
            };
            let track = Track::new(title, duration);
            let (mut playlist, n_dropped) = load(&tf, cli.capacity);
            if !playlist.insert(index, &track) {
                return Err(anyhow!("Cannot insert '{}' at {} (len: {}, capacity: {})",
                    track.title, index, playlist.len(), playlist.capacity()));
            }
            print_playlist(&playlist);
            if write {
                write_back(&fpath, &playlist, n_dropped)?;
            }
        },

        Commands::Merge { other, write } => {
            let other_tf = TracksFile::open(&other)?;
            let (mut playlist, n_dropped) = load(&tf, cli.capacity);
            let (other_playlist, _) = load(&other_tf, other_tf.tracks().len().max(1));
            if !playlist.push_all(&other_playlist) {
                return Err(anyhow!("Cannot merge '{}': {} + {} tracks exceed capacity {}",
                    other, playlist.len(), other_playlist.len(), playlist.capacity()));
            }
            print_playlist(&playlist);
            if write {
                write_back(&fpath, &playlist, n_dropped)?;
            }
        },

        Commands::Stats => {
            let (playlist, n_dropped) = load(&tf, cli.capacity);
            let total = playlist.total_duration();
            println!("{}", fpath.as_str().bold());
            println!("No. tracks:       {} / {}", playlist.len(), playlist.capacity());
            if n_dropped != 0 {
                println!("Not loaded:       {}", n_dropped.to_string().red());
            }
            println!("Total duration:   {}", format_duration(total));
            if !playlist.is_empty() {
                println!("Avg duration:     {}", format_duration(total / playlist.len() as u64));
            }
            if let Some(title) = playlist.title_of_shortest() {
                println!("Shortest track:   {}", title);
            }
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .module("playlist_tools")
        .verbosity(2 + cli.verbose as usize)
        .init()
    {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if cli.capacity == 0 {
        error!("The capacity must be positive");
        return ExitCode::FAILURE;
    }

    if let Err(e) = run(cli) {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
