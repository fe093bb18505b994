//! Judges, scoring dimensions and the 3×3 score matrix
//!
//! Every judge record carries all three dimensions, but by convention each
//! judge only ever writes the dimension it owns. The matrix does not enforce
//! that; aggregation only reads the owned cells.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Highest value a single cell may hold
pub const MAX_SCORE: u8 = 100;

/// Saturate a raw input into [0, MAX_SCORE]
pub fn clamp_score(value: i64) -> u8 {
    value.clamp(0, MAX_SCORE as i64) as u8
}

/// One of the three fixed judging roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judge {
    Judge1,
    Judge2,
    Judge3,
}

impl Judge {
    pub const ALL: [Judge; 3] = [Judge::Judge1, Judge::Judge2, Judge::Judge3];

    /// The dimension this judge is responsible for
    pub fn dimension(self) -> Dimension {
        match self {
            Judge::Judge1 => Dimension::Strategy,
            Judge::Judge2 => Dimension::Acquisition,
            Judge::Judge3 => Dimension::Private,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Judge::Judge1 => "judge1",
            Judge::Judge2 => "judge2",
            Judge::Judge3 => "judge3",
        }
    }
}

impl fmt::Display for Judge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Judge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "judge1" | "1" => Ok(Judge::Judge1),
            "judge2" | "2" => Ok(Judge::Judge2),
            "judge3" | "3" => Ok(Judge::Judge3),
            other => Err(format!("unknown judge '{}'", other)),
        }
    }
}

/// One of the three fixed scoring categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Strategy,
    Acquisition,
    Private,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::Strategy,
        Dimension::Acquisition,
        Dimension::Private,
    ];

    /// The judge that owns this dimension
    pub fn judge(self) -> Judge {
        match self {
            Dimension::Strategy => Judge::Judge1,
            Dimension::Acquisition => Judge::Judge2,
            Dimension::Private => Judge::Judge3,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Dimension::Strategy => "strategy",
            Dimension::Acquisition => "acquisition",
            Dimension::Private => "private",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Dimension::Strategy => "AI Strategy",
            Dimension::Acquisition => "AI Acquisition",
            Dimension::Private => "AI Private Domain",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strategy" => Ok(Dimension::Strategy),
            "acquisition" => Ok(Dimension::Acquisition),
            "private" => Ok(Dimension::Private),
            other => Err(format!("unknown dimension '{}'", other)),
        }
    }
}

/// Scores one judge gave across all three dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionScores {
    #[serde(deserialize_with = "lenient_cell")]
    pub strategy: u8,
    #[serde(deserialize_with = "lenient_cell")]
    pub acquisition: u8,
    #[serde(deserialize_with = "lenient_cell")]
    pub private: u8,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Strategy => self.strategy,
            Dimension::Acquisition => self.acquisition,
            Dimension::Private => self.private,
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: u8) {
        match dimension {
            Dimension::Strategy => self.strategy = value,
            Dimension::Acquisition => self.acquisition = value,
            Dimension::Private => self.private = value,
        }
    }
}

/// Full judge × dimension matrix for one entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scores {
    pub judge1: DimensionScores,
    pub judge2: DimensionScores,
    pub judge3: DimensionScores,
}

impl Scores {
    pub fn judge(&self, judge: Judge) -> &DimensionScores {
        match judge {
            Judge::Judge1 => &self.judge1,
            Judge::Judge2 => &self.judge2,
            Judge::Judge3 => &self.judge3,
        }
    }

    fn judge_mut(&mut self, judge: Judge) -> &mut DimensionScores {
        match judge {
            Judge::Judge1 => &mut self.judge1,
            Judge::Judge2 => &mut self.judge2,
            Judge::Judge3 => &mut self.judge3,
        }
    }

    pub fn get(&self, judge: Judge, dimension: Dimension) -> u8 {
        self.judge(judge).get(dimension)
    }

    /// Write one cell. Callers are expected to pass a clamped value.
    pub fn set(&mut self, judge: Judge, dimension: Dimension, value: u8) {
        self.judge_mut(judge).set(dimension, value);
    }

    /// Copy of the matrix with one cell replaced
    pub fn with(mut self, judge: Judge, dimension: Dimension, value: u8) -> Self {
        self.set(judge, dimension, value);
        self
    }
}

/// Deserialize `null` as `T::default()`
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a cell from any JSON number (or `null`), rounded and clamped.
/// Rows written by other clients may hold fractional or out-of-range values.
fn lenient_cell<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    // `as` saturates and maps NaN to 0
    Ok(clamp_score(raw.round() as i64))
}
