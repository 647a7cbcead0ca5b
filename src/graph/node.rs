//! Node implementation for the music graph

use super::types::{parse_year, NodeId, NodeType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A node in the music graph
///
/// Nodes have:
/// - A unique ID
/// - A node type (person, song, album, group, label)
/// - Optional name, stage name, genre and release date
/// - A notable flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Kind of entity
    pub node_type: NodeType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    /// Raw release date text ("2031", "2031-04-02", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(default)]
    pub notable: bool,
}

impl Node {
    /// Create a new node with no attributes
    pub fn new(id: impl Into<NodeId>, node_type: NodeType) -> Self {
        Node {
            id: id.into(),
            node_type,
            name: None,
            stage_name: None,
            genre: None,
            release_date: None,
            notable: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_stage_name(mut self, stage_name: impl Into<String>) -> Self {
        self.stage_name = Some(stage_name.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    pub fn notable(mut self, notable: bool) -> Self {
        self.notable = notable;
        self
    }

    /// `name`, else `stage_name`, else empty
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.stage_name.as_deref())
            .unwrap_or("")
    }

    /// Check if this node is a song or album
    pub fn is_work(&self) -> bool {
        self.node_type.is_work()
    }

    /// Check if node is of the given type
    pub fn is(&self, node_type: NodeType) -> bool {
        self.node_type == node_type
    }

    /// Release year, if the release date carries one
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(parse_year)
    }

    /// Release day, if the release date carries one
    pub fn release_day(&self) -> Option<NaiveDate> {
        self.release_date.as_deref().and_then(parse_release_day)
    }
}

/// Parse a release day: a full `YYYY-MM-DD` date, or January 1 of the
/// leading year when only a year can be read.
pub fn parse_release_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(day);
    }
    parse_year(trimmed).and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
}
