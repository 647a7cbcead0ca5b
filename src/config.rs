//! Analysis configuration
//!
//! Every field has a default, so an empty YAML document is a valid config.
//!
//! ```yaml
//! data:
//!   graph_path: MC1_graph.json
//! rising_stars:
//!   reference_date: 2039-01-01
//!   window_years: 5
//! sankey:
//!   era: peak
//! ```

use crate::analysis::ego::EgoView;
use crate::analysis::genre_matrix::MatrixMode;
use crate::analysis::sankey::Era;
use crate::graph::{EdgeType, LoadOptions};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Genre the rising-star, sankey, timeline and histogram views focus on
pub const FOCUS_GENRE: &str = "Oceanus Folk";

/// Artist the influence-path and ego views center on
pub const SEED_ARTIST: &str = "Sailor Shift";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data: DataConfig,
    pub subgraph: SubgraphConfig,
    pub genre_matrix: GenreMatrixConfig,
    pub rising_stars: RisingStarsConfig,
    pub influence_paths: InfluencePathsConfig,
    pub sankey: SankeyConfig,
    pub histogram: HistogramConfig,
    pub ego: EgoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub graph_path: PathBuf,
    pub songs_path: Option<PathBuf>,
    pub keep_non_notable_works: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            graph_path: PathBuf::from("MC1_graph.json"),
            songs_path: Some(PathBuf::from("songs_albums_analysis.csv")),
            keep_non_notable_works: false,
        }
    }
}

impl DataConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            keep_non_notable_works: self.keep_non_notable_works,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubgraphConfig {
    pub max_hops: usize,
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self { max_hops: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenreMatrixConfig {
    pub min_year: i32,
    pub max_year: i32,
    pub mode: MatrixMode,
}

impl Default for GenreMatrixConfig {
    fn default() -> Self {
        Self {
            min_year: 1900,
            max_year: 2040,
            mode: MatrixMode::Outgoing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RisingStarsConfig {
    pub focus_genre: String,
    /// Fixed "today" of the dataset
    pub reference_date: NaiveDate,
    pub window_years: u32,
    pub min_timeline_entries: usize,
    pub max_predictions: usize,
    pub trajectory_count: usize,
}

impl Default for RisingStarsConfig {
    fn default() -> Self {
        Self {
            focus_genre: FOCUS_GENRE.to_string(),
            reference_date: NaiveDate::from_ymd_opt(2039, 1, 1).unwrap_or_default(),
            window_years: 5,
            min_timeline_entries: 3,
            max_predictions: 5,
            trajectory_count: 3,
        }
    }
}

impl RisingStarsConfig {
    /// `reference_date` moved back by `window_years`, clamped to the earliest date
    pub fn window_start(&self) -> NaiveDate {
        self.window_years
            .checked_mul(12)
            .map(chrono::Months::new)
            .and_then(|months| self.reference_date.checked_sub_months(months))
            .unwrap_or(NaiveDate::MIN)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluencePathsConfig {
    pub seed_name: String,
    pub max_depth: usize,
    pub top_contributors: usize,
}

impl Default for InfluencePathsConfig {
    fn default() -> Self {
        Self {
            seed_name: SEED_ARTIST.to_string(),
            max_depth: 3,
            top_contributors: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SankeyConfig {
    pub focus_genre: String,
    pub min_flow_strength: usize,
    pub max_outward_genres: usize,
    pub era: Era,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        Self {
            focus_genre: FOCUS_GENRE.to_string(),
            min_flow_strength: 2,
            max_outward_genres: 8,
            era: Era::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub focus_genre: String,
    pub min_year: i32,
    pub max_year: i32,
    pub influence_types: Vec<EdgeType>,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            focus_genre: FOCUS_GENRE.to_string(),
            min_year: 1900,
            max_year: 2040,
            influence_types: EdgeType::INFLUENCE.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EgoConfig {
    pub center_name: String,
    pub view: EgoView,
}

impl Default for EgoConfig {
    fn default() -> Self {
        Self {
            center_name: SEED_ARTIST.to_string(),
            view: EgoView::Collaborations,
        }
    }
}

impl AnalysisConfig {
    /// Read and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse and validate YAML text
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let config: AnalysisConfig = if text.trim().is_empty() {
            AnalysisConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_range("genre_matrix", self.genre_matrix.min_year, self.genre_matrix.max_year)?;
        check_range("histogram", self.histogram.min_year, self.histogram.max_year)?;
        check_name("rising_stars.focus_genre", &self.rising_stars.focus_genre)?;
        check_name("influence_paths.seed_name", &self.influence_paths.seed_name)?;
        check_name("sankey.focus_genre", &self.sankey.focus_genre)?;
        check_name("histogram.focus_genre", &self.histogram.focus_genre)?;
        check_name("ego.center_name", &self.ego.center_name)?;

        if self.rising_stars.window_years == 0 {
            return Err(ConfigError::Invalid(
                "rising_stars.window_years must be at least 1".to_string(),
            ));
        }
        if self.influence_paths.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "influence_paths.max_depth must be at least 1".to_string(),
            ));
        }
        if let Some(bad) = self
            .histogram
            .influence_types
            .iter()
            .find(|t| !t.is_influence())
        {
            return Err(ConfigError::Invalid(format!(
                "histogram.influence_types: {} is not an influence edge type",
                bad
            )));
        }
        Ok(())
    }
}

fn check_range(section: &str, min: i32, max: i32) -> ConfigResult<()> {
    if min > max {
        return Err(ConfigError::Invalid(format!(
            "{section}: min_year {min} is after max_year {max}"
        )));
    }
    Ok(())
}

fn check_name(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}
