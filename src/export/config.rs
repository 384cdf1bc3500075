//! Export configuration.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;

/// How per-vertex attributes are laid out in a mesh fragment.
///
/// The two layouts produce different, mutually incompatible schema versions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Unique vertices once each plus a `face_indices` array. No UVs.
    #[default]
    Indexed,
    /// Every polygon corner carries its own position, normal and UV; no
    /// indices. Adds a texture reference.
    Flattened,
}

impl Strategy {
    /// The `version` attribute written on the document root
    pub fn format_version(self) -> &'static str {
        match self {
            Strategy::Indexed => "0.5",
            Strategy::Flattened => "0.7",
        }
    }

    /// Inverse of [`Strategy::format_version`]
    pub fn from_format_version(version: &str) -> Option<Self> {
        match version {
            "0.5" => Some(Strategy::Indexed),
            "0.7" => Some(Strategy::Flattened),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Indexed => write!(f, "indexed"),
            Strategy::Flattened => write!(f, "flattened"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "indexed" => Ok(Strategy::Indexed),
            "flattened" => Ok(Strategy::Flattened),
            other => Err(format!(
                "unknown strategy '{}', expected 'indexed' or 'flattened'",
                other
            )),
        }
    }
}

/// Which axis points up in the source scene.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SourceAxes {
    /// Z up, right handed. Converted with (x, y, z) -> (x, z, -y).
    #[default]
    ZUp,
    /// Already Y up; vectors pass through unchanged.
    YUp,
}

/// Settings for one export
#[derive(Clone, Debug, PartialEq)]
pub struct ExportConfig {
    pub strategy: Strategy,
    pub source_axes: SourceAxes,
    /// Directory texture paths are rewritten relative to
    pub resource_root: String,
    /// Date written to `<created>`; today's local date when `None`
    pub created: Option<NaiveDate>,
    /// Serialize top-level objects on the rayon thread pool
    pub parallel: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            source_axes: SourceAxes::default(),
            resource_root: "resources/".to_string(),
            created: None,
            parallel: false,
        }
    }
}

impl ExportConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_source_axes(mut self, source_axes: SourceAxes) -> Self {
        self.source_axes = source_axes;
        self
    }

    pub fn with_resource_root(mut self, resource_root: &str) -> Self {
        self.resource_root = resource_root.to_string();
        self
    }

    pub fn with_created(mut self, created: NaiveDate) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The date to stamp into the document header
    pub fn created_date(&self) -> NaiveDate {
        self.created
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("indexed".parse::<Strategy>(), Ok(Strategy::Indexed));
        assert_eq!("Flattened".parse::<Strategy>(), Ok(Strategy::Flattened));
        assert!("interleaved".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_format_versions_round_trip() {
        for strategy in [Strategy::Indexed, Strategy::Flattened] {
            assert_eq!(
                Strategy::from_format_version(strategy.format_version()),
                Some(strategy)
            );
        }
        assert_eq!(Strategy::from_format_version("1.0"), None);
    }

    #[test]
    fn test_fixed_created_date() {
        let date = NaiveDate::from_ymd_opt(2016, 3, 9).unwrap();
        let config = ExportConfig::new(Strategy::Flattened).with_created(date);
        assert_eq!(config.created_date().to_string(), "2016-03-09");
        assert_eq!(config.resource_root, "resources/");
    }
}
