//! Core type definitions for the music graph

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a node.
///
/// Source files carry ids as strings or numbers; both are coerced to their
/// text form so that `1` and `"1"` name the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id.to_string())
    }
}

struct NodeIdVisitor;

impl<'de> Visitor<'de> for NodeIdVisitor {
    type Value = NodeId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or numeric node id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeId, E> {
        Ok(NodeId::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<NodeId, E> {
        Ok(NodeId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeId, E> {
        Ok(NodeId(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeId, E> {
        Ok(NodeId(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<NodeId, E> {
        // 3.0 renders as "3", matching how the source data is keyed
        if v.fract() == 0.0 && v.abs() < 1e15 {
            Ok(NodeId((v as i64).to_string()))
        } else {
            Ok(NodeId(v.to_string()))
        }
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeIdVisitor)
    }
}

/// Kind of entity a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum NodeType {
    Person,
    Song,
    Album,
    MusicalGroup,
    RecordLabel,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Person,
        NodeType::Song,
        NodeType::Album,
        NodeType::MusicalGroup,
        NodeType::RecordLabel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Person => "Person",
            NodeType::Song => "Song",
            NodeType::Album => "Album",
            NodeType::MusicalGroup => "MusicalGroup",
            NodeType::RecordLabel => "RecordLabel",
        }
    }

    /// Songs and albums
    pub fn is_work(&self) -> bool {
        matches!(self, NodeType::Song | NodeType::Album)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTypeError(s.to_string()))
    }
}

/// Relationship type of a directed edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum EdgeType {
    PerformerOf,
    ComposerOf,
    ProducerOf,
    LyricistOf,
    RecordedBy,
    DistributedBy,
    InStyleOf,
    InterpolatesFrom,
    CoverOf,
    LyricalReferenceTo,
    DirectlySamples,
    MemberOf,
}

impl EdgeType {
    pub const ALL: [EdgeType; 12] = [
        EdgeType::PerformerOf,
        EdgeType::ComposerOf,
        EdgeType::ProducerOf,
        EdgeType::LyricistOf,
        EdgeType::RecordedBy,
        EdgeType::DistributedBy,
        EdgeType::InStyleOf,
        EdgeType::InterpolatesFrom,
        EdgeType::CoverOf,
        EdgeType::LyricalReferenceTo,
        EdgeType::DirectlySamples,
        EdgeType::MemberOf,
    ];

    /// Stylistic or derivative relationships between works
    pub const INFLUENCE: [EdgeType; 5] = [
        EdgeType::InStyleOf,
        EdgeType::CoverOf,
        EdgeType::DirectlySamples,
        EdgeType::InterpolatesFrom,
        EdgeType::LyricalReferenceTo,
    ];

    /// A person contributing to a work
    pub const CONTRIBUTION: [EdgeType; 4] = [
        EdgeType::PerformerOf,
        EdgeType::ComposerOf,
        EdgeType::ProducerOf,
        EdgeType::LyricistOf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::PerformerOf => "PerformerOf",
            EdgeType::ComposerOf => "ComposerOf",
            EdgeType::ProducerOf => "ProducerOf",
            EdgeType::LyricistOf => "LyricistOf",
            EdgeType::RecordedBy => "RecordedBy",
            EdgeType::DistributedBy => "DistributedBy",
            EdgeType::InStyleOf => "InStyleOf",
            EdgeType::InterpolatesFrom => "InterpolatesFrom",
            EdgeType::CoverOf => "CoverOf",
            EdgeType::LyricalReferenceTo => "LyricalReferenceTo",
            EdgeType::DirectlySamples => "DirectlySamples",
            EdgeType::MemberOf => "MemberOf",
        }
    }

    pub fn is_influence(&self) -> bool {
        Self::INFLUENCE.contains(self)
    }

    pub fn is_contribution(&self) -> bool {
        Self::CONTRIBUTION.contains(self)
    }

    /// Human-readable sentence for an edge from `source` to `target`
    pub fn describe(&self, source: &str, target: &str) -> String {
        match self {
            EdgeType::PerformerOf => format!("{source} performed {target}"),
            EdgeType::ComposerOf => format!("{source} composed {target}"),
            EdgeType::ProducerOf => format!("{source} produced {target}"),
            EdgeType::LyricistOf => format!("{source} wrote lyrics for {target}"),
            EdgeType::RecordedBy => format!("{target} was recorded by {source}"),
            EdgeType::DistributedBy => format!("{target} aided in distribution of {source}"),
            EdgeType::InStyleOf => {
                format!("{source} was performed (partly) in the style of {target}")
            }
            EdgeType::InterpolatesFrom => format!("{source} interpolates a melody from {target}"),
            EdgeType::CoverOf => format!("{source} is a cover of {target}"),
            EdgeType::LyricalReferenceTo => {
                format!("{source} makes a lyrical reference to {target}")
            }
            EdgeType::DirectlySamples => format!("{source} directly samples {target}"),
            EdgeType::MemberOf => format!("{source} was/is a member of {target}"),
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTypeError(s.to_string()))
    }
}

/// A node or edge type string that is not part of the schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type '{0}'")]
pub struct UnknownTypeError(pub String);

/// Parse a release year the lenient way the source data is read:
/// optional leading whitespace and sign, then the leading run of digits.
/// `"2031-04-02"` is 2031, `"  1999x"` is 1999, `"n/a"` is `None`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i32 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_coercion() {
        let from_num: NodeId = serde_json::from_str("42").unwrap();
        let from_str: NodeId = serde_json::from_str("\"42\"").unwrap();
        let from_float: NodeId = serde_json::from_str("42.0").unwrap();

        assert_eq!(from_num, from_str);
        assert_eq!(from_float, from_str);
        assert_eq!(from_num.as_str(), "42");
        assert_eq!(format!("{}", from_num), "42");
    }

    #[test]
    fn test_node_type_parse() {
        assert_eq!("Song".parse::<NodeType>(), Ok(NodeType::Song));
        assert!("Band".parse::<NodeType>().is_err());
        assert!(NodeType::Album.is_work());
        assert!(!NodeType::MusicalGroup.is_work());
    }

    #[test]
    fn test_edge_type_groups() {
        assert!(EdgeType::CoverOf.is_influence());
        assert!(!EdgeType::CoverOf.is_contribution());
        assert!(EdgeType::LyricistOf.is_contribution());
        assert!(!EdgeType::MemberOf.is_influence());
        assert!(!EdgeType::MemberOf.is_contribution());
        assert_eq!("DirectlySamples".parse::<EdgeType>(), Ok(EdgeType::DirectlySamples));
    }

    #[test]
    fn test_edge_descriptions() {
        assert_eq!(EdgeType::PerformerOf.describe("Ann", "Tide"), "Ann performed Tide");
        assert_eq!(
            EdgeType::RecordedBy.describe("Tide", "Reef Records"),
            "Reef Records was recorded by Tide"
        );
        assert_eq!(
            EdgeType::MemberOf.describe("Ann", "The Gulls"),
            "Ann was/is a member of The Gulls"
        );
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2020"), Some(2020));
        assert_eq!(parse_year("2031-04-02"), Some(2031));
        assert_eq!(parse_year("  1999x"), Some(1999));
        assert_eq!(parse_year("-12"), Some(-12));
        assert_eq!(parse_year("n/a"), None);
        assert_eq!(parse_year(""), None);
    }
}
