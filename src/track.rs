use anyhow::{anyhow, Error, Result};
use regex::Regex;
use std::fmt;
use std::rc::Rc;
use std::sync::OnceLock;

/// Read access to the two attributes a playlist cares about.
///
/// Playlists never construct, modify or drop the values behind this trait; they only borrow them.
/// Anything that can report a title and a duration can be stored, including handles into an
/// arena owned elsewhere.
pub trait TrackInfo {
    /// The track title. Comparisons against it are case-insensitive.
    fn title(&self) -> &str;

    /// The playtime length, in whole seconds.
    fn duration(&self) -> u32;
}

impl<T: TrackInfo + ?Sized> TrackInfo for &T {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn duration(&self) -> u32 {
        (**self).duration()
    }
}

impl<T: TrackInfo + ?Sized> TrackInfo for Box<T> {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn duration(&self) -> u32 {
        (**self).duration()
    }
}

impl<T: TrackInfo + ?Sized> TrackInfo for Rc<T> {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn duration(&self) -> u32 {
        (**self).duration()
    }
}

/// A track in a tracks file.
///
/// Carries only what `TrackInfo` exposes.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Track {
    /// Track title.
    pub title: String,

    /// The playtime length of the track, in seconds.
    pub duration: u32,
}

impl Track {
    pub fn new<T: Into<String>>(title: T, duration: u32) -> Self {
        Track {
            title: title.into(),
            duration,
        }
    }

    /// Formats the track as a single tracks file line.
    pub fn as_file_line(&self) -> String {
        format!("{}\t{}", format_duration(self.duration.into()), self.title)
    }
}

impl TrackInfo for Track {
    fn title(&self) -> &str {
        &self.title
    }

    fn duration(&self) -> u32 {
        self.duration
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, format_duration(self.duration.into()))
    }
}

impl std::str::FromStr for Track {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, anyhow::Error> {
        let mut it = line.splitn(2, '\t');
        let duration_str = match it.next() {
            Some(split) => split.trim(),
            None => return Err(anyhow!("Failed to extract duration substring from line '{}'", line)),
        };
        let title = match it.next() {
            Some(split) => split.trim(),
            None => return Err(anyhow!("Failed to extract title substring from line '{}'", line)),
        };
        if title.is_empty() {
            return Err(anyhow!("Empty title in line '{}'", line));
        }
        let duration = match parse_duration(duration_str) {
            Ok(val) => val,
            Err(e) => return Err(anyhow!("Failed to convert duration substring '{}': {}", duration_str, e)),
        };
        Ok(Track::new(title, duration))
    }
}

fn re_duration() -> &'static Regex {
    static RE_DURATION: OnceLock<Regex> = OnceLock::new();
    RE_DURATION.get_or_init(|| {
        Regex::new(r"^(?:(?:(\d+):)?(\d+):)?(\d+)$").expect("Failed to compile RE_DURATION regex")
    })
}

/// Parses a duration written as `s`, `m:ss` or `h:mm:ss` into seconds.
///
/// # Examples
/// ```
/// use playlist_tools::track::parse_duration;
/// assert_eq!(parse_duration("3:25").unwrap(), 205);
/// assert_eq!(parse_duration("1:00:00").unwrap(), 3600);
/// assert_eq!(parse_duration("42").unwrap(), 42);
/// ```
pub fn parse_duration(s: &str) -> Result<u32> {
    let captures = match re_duration().captures(s) {
        Some(v) => v,
        None => return Err(anyhow!("'{}' is not of the form [[h:]m:]s", s)),
    };
    let field = |i: usize| -> Result<u64> {
        match captures.get(i) {
            Some(m) => m.as_str().parse::<u64>()
                .map_err(|e| anyhow!("Failed to convert '{}' to number: {}", m.as_str(), e)),
            None => Ok(0),
        }
    };
    let secs = field(1)?.saturating_mul(3600)
        .saturating_add(field(2)?.saturating_mul(60))
        .saturating_add(field(3)?);
    u32::try_from(secs).map_err(|_| anyhow!("Duration '{}' is out of range", s))
}

/// Formats seconds as `m:ss`, or `h:mm:ss` for an hour or more.
pub fn format_duration(secs: u64) -> String {
    let hrs = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    if hrs > 0 {
        format!("{hrs}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_accepts_all_forms() {
        assert_eq!(parse_duration("0").unwrap(), 0);
        assert_eq!(parse_duration("75").unwrap(), 75);
        assert_eq!(parse_duration("4:05").unwrap(), 245);
        assert_eq!(parse_duration("1:02:03").unwrap(), 3723);
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-3").is_err());
        assert!(parse_duration("3:").is_err());
        assert!(parse_duration("a:bc").is_err());
        assert!(parse_duration("1:2:3:4").is_err());
        assert!(parse_duration("99999999999").is_err());
        assert!(parse_duration("99999999999999999999:00:00").is_err());
        assert!(parse_duration("9999999999999999:00:00").is_err());
    }

    #[test]
    fn format_duration_switches_to_hours() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(245), "4:05");
        assert_eq!(format_duration(3723), "1:02:03");
    }

    #[test]
    fn track_line_round_trips() {
        let track: Track = "3:25\tSome Song".parse().unwrap();
        assert_eq!(track, Track::new("Some Song", 205));
        assert_eq!(track.as_file_line(), "3:25\tSome Song");
        assert_eq!(track.as_file_line().parse::<Track>().unwrap(), track);
    }

    #[test]
    fn track_line_requires_title() {
        assert!("3:25".parse::<Track>().is_err());
        assert!("3:25\t   ".parse::<Track>().is_err());
        assert!("x\tSong".parse::<Track>().is_err());
    }

    #[test]
    fn display_shows_title_and_duration() {
        assert_eq!(Track::new("Intro", 65).to_string(), "Intro (1:05)");
    }

    #[test]
    fn trait_forwards_through_handles() {
        let track = Rc::new(Track::new("Shared", 10));
        let boxed: Box<dyn TrackInfo> = Box::new(Track::new("Boxed", 20));
        assert_eq!(TrackInfo::title(&track), "Shared");
        assert_eq!(boxed.duration(), 20);
        assert_eq!(TrackInfo::duration(&&*track), 10);
    }
}
