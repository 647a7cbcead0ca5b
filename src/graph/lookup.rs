//! Song/album attribute lookup backed by the analysis CSV

use super::loader::{LoadError, LoadResult};
use super::node::Node;
use rustc_hash::FxHashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Genre and release date recorded for one work
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongRecord {
    pub genre: Option<String>,
    pub release_date: Option<String>,
}

/// CSV rows keyed by trimmed node id. Later rows win over earlier ones.
#[derive(Debug, Clone, Default)]
pub struct SongLookup {
    records: FxHashMap<String, SongRecord>,
}

impl SongLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the CSV from disk
    pub fn load(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        info!("Loading song lookup from: {}", path.display());
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Read headered CSV with at least an `id` column
    pub fn from_reader<R: Read>(reader: R) -> LoadResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);
        let id_col = column("id").ok_or_else(|| LoadError::MissingColumn("id".to_string()))?;
        let genre_col = column("genre");
        let date_col = column("release_date");

        let mut lookup = SongLookup::new();
        for row in rdr.records() {
            let row = row?;
            let id = row.get(id_col).map(str::trim).unwrap_or("");
            if id.is_empty() {
                continue;
            }
            let field = |col: Option<usize>| {
                col.and_then(|c| row.get(c))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };
            lookup.insert(
                id,
                SongRecord {
                    genre: field(genre_col),
                    release_date: field(date_col),
                },
            );
        }

        info!("Loaded {} song records", lookup.len());
        Ok(lookup)
    }

    pub fn insert(&mut self, id: impl Into<String>, record: SongRecord) {
        self.records.insert(id.into(), record);
    }

    pub fn get(&self, id: &str) -> Option<&SongRecord> {
        self.records.get(id.trim())
    }

    /// Recorded genre of a node, if any
    pub fn genre_of(&self, node: &Node) -> Option<&str> {
        self.get(node.id.as_str()).and_then(|r| r.genre.as_deref())
    }

    /// Recorded release date of a node, if any
    pub fn release_date_of(&self, node: &Node) -> Option<&str> {
        self.get(node.id.as_str()).and_then(|r| r.release_date.as_deref())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
