//! Genre-to-genre influence matrix and its heat color scale
//!
//! An edge from A to B reads "A draws on B", so the target's genre is the
//! influencer and the source's genre the influenced. Only edges whose target
//! was released inside the year window count.

use crate::graph::GraphStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Orientation of the matrix rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixMode {
    /// Rows are influencer genres
    #[default]
    Outgoing,
    /// Rows are influenced genres
    Incoming,
}

impl fmt::Display for MatrixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixMode::Outgoing => write!(f, "outgoing"),
            MatrixMode::Incoming => write!(f, "incoming"),
        }
    }
}

impl FromStr for MatrixMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "outgoing" => Ok(MatrixMode::Outgoing),
            "incoming" => Ok(MatrixMode::Incoming),
            other => Err(format!("unknown matrix mode '{other}' (expected outgoing or incoming)")),
        }
    }
}

/// Square count matrix over the sorted genre list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenreMatrix {
    pub genres: Vec<String>,
    /// `cells[row][col]`
    pub cells: Vec<Vec<u32>>,
}

impl GenreMatrix {
    fn zeroed(genres: Vec<String>) -> Self {
        let n = genres.len();
        GenreMatrix {
            genres,
            cells: vec![vec![0; n]; n],
        }
    }

    pub fn genre_count(&self) -> usize {
        self.genres.len()
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    /// Cell value by genre names
    pub fn value(&self, row: &str, col: &str) -> Option<u32> {
        let r = self.position(row)?;
        let c = self.position(col)?;
        Some(self.cells[r][c])
    }

    pub fn position(&self, genre: &str) -> Option<usize> {
        self.genres.iter().position(|g| g == genre)
    }

    pub fn max(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn min_nonzero(&self) -> Option<u32> {
        self.cells.iter().flatten().copied().filter(|&v| v > 0).min()
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    /// True when no cell is set
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v == 0)
    }

    /// Tooltip sentence for a cell
    pub fn describe(&self, row: usize, col: usize) -> String {
        format!(
            "{} has taken {} influences from {}",
            self.genres[col], self.cells[row][col], self.genres[row]
        )
    }

    /// Heat scale sized to this matrix
    pub fn heat_scale(&self) -> HeatScale {
        HeatScale::new(self.max())
    }
}

/// Count genre-to-genre edges whose target was released in `[min_year, max_year]`
pub fn genre_matrix(store: &GraphStore, min_year: i32, max_year: i32, mode: MatrixMode) -> GenreMatrix {
    let mut genres: Vec<String> = store
        .nodes()
        .iter()
        .filter_map(|n| n.genre.as_deref())
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();
    genres.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    genres.dedup();

    let mut matrix = GenreMatrix::zeroed(genres);
    let topology = store.topology();

    for &(s, t) in &topology.endpoints {
        let source = store.node_at(s);
        let target = store.node_at(t);

        let Some(year) = target.release_year() else {
            continue;
        };
        if year < min_year || year > max_year {
            continue;
        }
        let (Some(influenced), Some(influencer)) = (
            source.genre.as_deref().and_then(|g| matrix.position(g)),
            target.genre.as_deref().and_then(|g| matrix.position(g)),
        ) else {
            continue;
        };

        let (row, col) = match mode {
            MatrixMode::Outgoing => (influencer, influenced),
            MatrixMode::Incoming => (influenced, influencer),
        };
        matrix.cells[row][col] += 1;
    }

    debug!(
        "Genre matrix {}..={} ({}): {} genres, {} edges counted",
        min_year,
        max_year,
        mode,
        matrix.genre_count(),
        matrix.total()
    );

    matrix
}

/// Color for an empty cell
pub const NEUTRAL_COLOR: &str = "#f8f9fa";

const LOW_RGB: (f64, f64, f64) = (52.0, 152.0, 219.0);
const HIGH_RGB: (f64, f64, f64) = (230.0, 126.0, 34.0);

/// Two-segment heat scale: linear up to the threshold, logarithmic above it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatScale {
    pub max: u32,
    pub threshold: u32,
}

impl HeatScale {
    pub fn new(max: u32) -> Self {
        Self { max, threshold: 5 }
    }

    /// Position of `value` on the blue-to-orange ramp, in `[0, 1]`
    pub fn intensity(&self, value: u32) -> f64 {
        let threshold = f64::from(self.threshold);
        let value_f = f64::from(value);
        if value <= self.threshold {
            return value_f / threshold * 0.5;
        }
        let log_max = (f64::from(self.max) - threshold + 1.0).ln();
        if log_max <= 0.0 {
            return 1.0;
        }
        let log_val = (value_f - threshold + 1.0).ln();
        0.5 + (log_val / log_max) * 0.5
    }

    /// CSS color for a cell value
    pub fn color(&self, value: u32) -> String {
        if value == 0 {
            return NEUTRAL_COLOR.to_string();
        }
        let i = self.intensity(value);
        let lerp = |a: f64, b: f64| (a + (b - a) * i).round() as i64;
        format!(
            "rgb({}, {}, {})",
            lerp(LOW_RGB.0, HIGH_RGB.0),
            lerp(LOW_RGB.1, HIGH_RGB.1),
            lerp(LOW_RGB.2, HIGH_RGB.2)
        )
    }
}
