use std::fmt;

use thiserror::Error;

pub const LOCATIONS: [&str; 5] = ["Wizard City", "Krokotopia", "Marleybone", "Mooshu", "Dragonspyre"];
pub const SNACKS: [&str; 5] = ["Snack 1", "Snack 2", "Snack 3", "Snack 4", "Snack 5"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("missing '{delimiter}' in resolution '{text}'")]
    MissingDelimiter { text: String, delimiter: char },
    #[error("invalid dimension '{0}'")]
    InvalidDimension(String),
}

/// Splits `"800x600"` style text into its two numeric halves.
pub fn separate(text: &str, delimiter: char) -> Result<(u32, u32), ResolutionError> {
    let (w, h) = text.trim().split_once(delimiter).ok_or_else(|| ResolutionError::MissingDelimiter {
        text: text.to_string(),
        delimiter,
    })?;
    let parse = |s: &str| s.trim().parse::<u32>().map_err(|_| ResolutionError::InvalidDimension(s.to_string()));
    Ok((parse(w)?, parse(h)?))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Resolution {
    #[default]
    #[value(name = "800x600")]
    R800x600,
    #[value(name = "1280x800")]
    R1280x800,
}

impl Resolution {
    pub const ALL: [Resolution; 2] = [Resolution::R800x600, Resolution::R1280x800];

    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Resolution::R800x600 => (800, 600),
            Resolution::R1280x800 => (1280, 800),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "{w}x{h}")
    }
}

/// Frozen choices from the configuration screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigureSettings {
    pub locations: [bool; 5],
    pub snacks: [bool; 5],
    pub num_games: u32,
    pub resolution: Resolution,
}

impl Default for ConfigureSettings {
    fn default() -> Self {
        Self {
            locations: [true, false, false, false, false],
            snacks: [false; 5],
            num_games: 1,
            resolution: Resolution::default(),
        }
    }
}

impl ConfigureSettings {
    pub fn selected_locations(&self) -> Vec<&'static str> {
        LOCATIONS.into_iter().zip(self.locations).filter_map(|(name, on)| on.then_some(name)).collect()
    }

    pub fn selected_snacks(&self) -> Vec<&'static str> {
        SNACKS.into_iter().zip(self.snacks).filter_map(|(name, on)| on.then_some(name)).collect()
    }
}

/// Games count from free text. Anything that is not an integer counts as one game.
pub fn parse_num_games(text: &str) -> u32 {
    match text.trim().parse::<i64>() {
        Ok(n) => n.clamp(1, u32::MAX as i64) as u32,
        Err(_) => 1,
    }
}
