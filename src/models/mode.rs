use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

use super::Item;

/// Relative weight of each scoring component
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    pub similarity: f64,
    pub alignment: f64,
    pub popularity: f64,
    pub noise: f64,
}

impl ScoringWeights {
    pub const PERSONALIZED: Self = Self::new(0.60, 0.30, 0.08, 0.02);
    pub const BECAUSE_LIKED: Self = Self::new(0.65, 0.25, 0.08, 0.02);
    pub const TRENDING: Self = Self::new(0.50, 0.25, 0.23, 0.02);
    pub const CATEGORY: Self = Self::new(0.50, 0.40, 0.08, 0.02);

    pub const fn new(similarity: f64, alignment: f64, popularity: f64, noise: f64) -> Self {
        Self {
            similarity,
            alignment,
            popularity,
            noise,
        }
    }

    pub fn total(&self) -> f64 {
        self.similarity + self.alignment + self.popularity + self.noise
    }
}

/// Release-year partition used by `year` mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearBucket {
    /// 2018 onwards
    Recent,
    /// 2010 to 2017
    TwentyTens,
    /// 2000 to 2009
    TwoThousands,
    /// 1990 to 1999
    Nineties,
    /// Before 1990
    Classic,
}

impl YearBucket {
    pub fn contains(&self, year: i32) -> bool {
        match self {
            YearBucket::Recent => year >= 2018,
            YearBucket::TwentyTens => (2010..2018).contains(&year),
            YearBucket::TwoThousands => (2000..2010).contains(&year),
            YearBucket::Nineties => (1990..2000).contains(&year),
            YearBucket::Classic => year < 1990,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            YearBucket::Recent => "recent",
            YearBucket::TwentyTens => "2010s",
            YearBucket::TwoThousands => "2000s",
            YearBucket::Nineties => "90s",
            YearBucket::Classic => "classic",
        }
    }
}

impl FromStr for YearBucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(YearBucket::Recent),
            "2010s" => Ok(YearBucket::TwentyTens),
            "2000s" => Ok(YearBucket::TwoThousands),
            "90s" => Ok(YearBucket::Nineties),
            "classic" => Ok(YearBucket::Classic),
            other => Err(AppError::InvalidInput(format!(
                "Unknown year bucket '{}' (expected recent, 2010s, 2000s, 90s or classic)",
                other
            ))),
        }
    }
}

/// Runtime partition used by `runtime` mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeBucket {
    /// Under 90 minutes
    Short,
    /// 90 to 150 minutes
    Medium,
    /// Over 150 minutes
    Long,
}

impl RuntimeBucket {
    pub fn contains(&self, runtime: u32) -> bool {
        match self {
            RuntimeBucket::Short => runtime < 90,
            RuntimeBucket::Medium => (90..=150).contains(&runtime),
            RuntimeBucket::Long => runtime > 150,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeBucket::Short => "short",
            RuntimeBucket::Medium => "medium",
            RuntimeBucket::Long => "long",
        }
    }
}

impl FromStr for RuntimeBucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(RuntimeBucket::Short),
            "medium" => Ok(RuntimeBucket::Medium),
            "long" => Ok(RuntimeBucket::Long),
            other => Err(AppError::InvalidInput(format!(
                "Unknown runtime bucket '{}' (expected short, medium or long)",
                other
            ))),
        }
    }
}

/// Raw mode parameters as they arrive on a request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeParams {
    pub filter_genre: Option<String>,
    pub filter_service: Option<String>,
    pub year_bucket: Option<String>,
    pub runtime_bucket: Option<String>,
}

impl ModeParams {
    fn provided(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.filter_genre.is_some() {
            names.push("filter_genre");
        }
        if self.filter_service.is_some() {
            names.push("filter_service");
        }
        if self.year_bucket.is_some() {
            names.push("year_bucket");
        }
        if self.runtime_bucket.is_some() {
            names.push("runtime_bucket");
        }
        names
    }
}

/// Ranking mode, selected once per request
///
/// Each variant carries its weight set and, for the category modes, the hard
/// constraint every returned item must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Personalized,
    BecauseLiked,
    Trending,
    Genre(String),
    Service(String),
    Year(YearBucket),
    Runtime(RuntimeBucket),
}

impl Mode {
    /// Parses a caller-selected mode and its parameter
    ///
    /// The parameter belonging to the selected mode is required; parameters of
    /// any other mode are rejected.
    pub fn parse(mode: Option<&str>, params: &ModeParams) -> AppResult<Self> {
        let name = mode.map(|m| m.trim().to_lowercase());
        let (parsed, expected) = match name.as_deref() {
            None | Some("") => (Mode::Personalized, None),
            Some("because_liked") => (Mode::BecauseLiked, None),
            Some("trending") => (Mode::Trending, None),
            Some("genre") => {
                let genre = required(&params.filter_genre, "genre", "filter_genre")?;
                (Mode::Genre(genre), Some("filter_genre"))
            }
            Some("service") => {
                let service = required(&params.filter_service, "service", "filter_service")?;
                (Mode::Service(service), Some("filter_service"))
            }
            Some("year") => {
                let bucket = required(&params.year_bucket, "year", "year_bucket")?;
                (Mode::Year(bucket.parse()?), Some("year_bucket"))
            }
            Some("runtime") => {
                let bucket = required(&params.runtime_bucket, "runtime", "runtime_bucket")?;
                (Mode::Runtime(bucket.parse()?), Some("runtime_bucket"))
            }
            Some(other) => {
                return Err(AppError::InvalidInput(format!(
                    "Unknown mode '{}' (expected because_liked, trending, genre, service, year or runtime)",
                    other
                )))
            }
        };

        let extraneous: Vec<&str> = params
            .provided()
            .into_iter()
            .filter(|p| Some(*p) != expected)
            .collect();
        if !extraneous.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Parameter(s) {} not valid for mode '{}'",
                extraneous.join(", "),
                parsed.name()
            )));
        }

        Ok(parsed)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Personalized => "personalized",
            Mode::BecauseLiked => "because_liked",
            Mode::Trending => "trending",
            Mode::Genre(_) => "genre",
            Mode::Service(_) => "service",
            Mode::Year(_) => "year",
            Mode::Runtime(_) => "runtime",
        }
    }

    pub fn weights(&self) -> ScoringWeights {
        match self {
            Mode::BecauseLiked => ScoringWeights::BECAUSE_LIKED,
            Mode::Trending => ScoringWeights::TRENDING,
            Mode::Genre(_) | Mode::Service(_) => ScoringWeights::CATEGORY,
            Mode::Personalized | Mode::Year(_) | Mode::Runtime(_) => ScoringWeights::PERSONALIZED,
        }
    }

    /// Hard constraint of the mode; modes without one admit everything
    pub fn admits(&self, item: &Item) -> bool {
        match self {
            Mode::Genre(genre) => item.has_genre(genre),
            Mode::Service(service) => item.has_service(service),
            Mode::Year(bucket) => bucket.contains(item.year_or_default()),
            Mode::Runtime(bucket) => bucket.contains(item.runtime_or_default()),
            Mode::Personalized | Mode::BecauseLiked | Mode::Trending => true,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Genre(genre) => write!(f, "genre:{}", genre),
            Mode::Service(service) => write!(f, "service:{}", service),
            Mode::Year(bucket) => write!(f, "year:{}", bucket.as_str()),
            Mode::Runtime(bucket) => write!(f, "runtime:{}", bucket.as_str()),
            other => write!(f, "{}", other.name()),
        }
    }
}

fn required(value: &Option<String>, mode: &str, param: &str) -> AppResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::InvalidInput(format!(
            "Mode '{}' requires the '{}' parameter",
            mode, param
        ))),
    }
}
