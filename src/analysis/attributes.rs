//! Genre and release-date resolution for works
//!
//! Node fields and the song lookup CSV disagree in places, and the views
//! consult them in different orders. Both orders live here.

use crate::graph::{parse_release_day, parse_year, Node, SongLookup};
use chrono::NaiveDate;

/// Placeholder genre for works with no usable genre
pub const UNKNOWN_GENRE: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkAttributes<'a> {
    songs: Option<&'a SongLookup>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl<'a> WorkAttributes<'a> {
    pub fn new(songs: Option<&'a SongLookup>) -> Self {
        Self { songs }
    }

    fn lookup_genre(&self, node: &Node) -> Option<&'a str> {
        present(self.songs.and_then(|s| s.genre_of(node)))
    }

    fn lookup_release_date(&self, node: &Node) -> Option<&'a str> {
        present(self.songs.and_then(|s| s.release_date_of(node)))
    }

    /// Node genre, else the lookup genre
    pub fn genre<'n>(&self, node: &'n Node) -> Option<&'n str>
    where
        'a: 'n,
    {
        present(node.genre.as_deref()).or_else(|| self.lookup_genre(node))
    }

    /// True when either the node or the lookup records `genre`
    pub fn has_genre(&self, node: &Node, genre: &str) -> bool {
        node.genre.as_deref() == Some(genre) || self.lookup_genre(node) == Some(genre)
    }

    /// Lookup genre for works, else node genre, skipping "Unknown" at both
    /// steps; "Unknown" when neither helps
    pub fn flow_genre<'n>(&self, node: &'n Node) -> &'n str
    where
        'a: 'n,
    {
        let known = |g: Option<&'n str>| present(g).filter(|g| *g != UNKNOWN_GENRE);
        let from_lookup = if node.is_work() {
            known(self.lookup_genre(node))
        } else {
            None
        };
        from_lookup
            .or_else(|| known(node.genre.as_deref()))
            .or_else(|| known(self.lookup_genre(node)))
            .unwrap_or(UNKNOWN_GENRE)
    }

    /// Node release date, else the lookup release date
    pub fn release_date<'n>(&self, node: &'n Node) -> Option<&'n str>
    where
        'a: 'n,
    {
        present(node.release_date.as_deref()).or_else(|| self.lookup_release_date(node))
    }

    pub fn release_year(&self, node: &Node) -> Option<i32> {
        self.release_date(node).and_then(parse_year)
    }

    pub fn release_day(&self, node: &Node) -> Option<NaiveDate> {
        self.release_date(node).and_then(parse_release_day)
    }

    /// Release year used by the flow views; year 0 counts as missing
    pub fn flow_year(&self, node: &Node) -> Option<i32> {
        self.release_year(node).filter(|&y| y != 0)
    }
}
