use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseStyleError;

/// Scene configuration selecting how many trees are grown and how deep.
///
/// The host reports scene modes as raw integers (`1`, `2`, `3`); use
/// [`SceneMode::from_raw`] to map them, which never fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SceneMode {
    /// One centered tree at full depth.
    #[default]
    Single,
    /// Two trees placed symmetrically around the center.
    Pair,
    /// A row of smaller, shallower trees.
    Forest,
}

impl SceneMode {
    pub const ALL: [SceneMode; 3] = [SceneMode::Single, SceneMode::Pair, SceneMode::Forest];

    /// Maps a raw host value onto a scene mode.
    ///
    /// `2` selects [`SceneMode::Pair`], anything `>= 3` selects
    /// [`SceneMode::Forest`], and everything else (including `0` and
    /// negative values) falls back to [`SceneMode::Single`].
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            2 => SceneMode::Pair,
            r if r >= 3 => SceneMode::Forest,
            _ => SceneMode::Single,
        }
    }

    /// The raw host value for this mode.
    pub fn as_raw(self) -> i32 {
        match self {
            SceneMode::Single => 1,
            SceneMode::Pair => 2,
            SceneMode::Forest => 3,
        }
    }
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneMode::Single => "single",
            SceneMode::Pair => "pair",
            SceneMode::Forest => "forest",
        };
        f.write_str(name)
    }
}

/// Blossom look used for attached flowers and falling flower particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowerStyle {
    #[default]
    Peach,
    Sakura,
    Delonix,
}

impl FlowerStyle {
    pub const ALL: [FlowerStyle; 3] = [FlowerStyle::Peach, FlowerStyle::Sakura, FlowerStyle::Delonix];

    pub fn name(self) -> &'static str {
        match self {
            FlowerStyle::Peach => "peach",
            FlowerStyle::Sakura => "sakura",
            FlowerStyle::Delonix => "delonix",
        }
    }
}

impl fmt::Display for FlowerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlowerStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peach" => Ok(FlowerStyle::Peach),
            "sakura" => Ok(FlowerStyle::Sakura),
            "delonix" => Ok(FlowerStyle::Delonix),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}
