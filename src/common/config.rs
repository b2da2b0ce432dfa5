use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout_engine::Orientation;

pub const DEFAULT_FOCUS_SCALE_X: f64 = 0.65;
pub const DEFAULT_FOCUS_SCALE_Y: f64 = 0.6;
pub const DEFAULT_FOCUS_SHRINK: f64 = 0.95;
/// 14:9, close to the common video frame shapes.
pub const DEFAULT_ASPECT: f64 = 1.5555;
pub const DEFAULT_ASPECT_SCALE: f64 = 0.65;
pub const DEFAULT_EXHAUSTIVE_LIMIT: usize = 10;
pub const DEFAULT_SEARCH_BUDGET: usize = 250_000;

pub fn config_file() -> Option<PathBuf> { dirs::home_dir().map(|home| home.join(".grav-layout.toml")) }

fn yes() -> bool { true }

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: LayoutSettings,
}

/// Defaults for every layout method. Per-call options are merged on top.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub perimeter: PerimeterSettings,
    #[serde(default)]
    pub focus: FocusSettings,
    #[serde(default)]
    pub aspect_focus: AspectFocusSettings,
    #[serde(default)]
    pub tiling: TilingSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct GridSettings {
    #[serde(default)]
    pub orientation: Orientation,
    /// Inset the outermost cells away from the box edges.
    #[serde(default)]
    pub edge: bool,
    /// Resize every object to its cell before placing it.
    #[serde(default = "yes")]
    pub resize: bool,
    /// Columns; zero together with `num_y` means "pick for me".
    #[serde(default)]
    pub num_x: usize,
    #[serde(default)]
    pub num_y: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            edge: false,
            resize: true,
            num_x: 0,
            num_y: 0,
        }
    }
}

impl GridSettings {
    /// One row (or column) of `count` resized cells.
    pub fn line(orientation: Orientation, edge: bool, count: usize) -> Self {
        let (num_x, num_y) = match orientation {
            Orientation::Horizontal => (count, 1),
            Orientation::Vertical => (1, count),
        };
        Self { orientation, edge, resize: true, num_x, num_y }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct PerimeterSettings {
    /// Report success even when a region could not be arranged.
    #[serde(default)]
    pub legacy_status: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct FocusSettings {
    /// Inner box width relative to the outer box, used when none is given.
    #[serde(default = "default_focus_scale_x")]
    pub scale_x: f64,
    #[serde(default = "default_focus_scale_y")]
    pub scale_y: f64,
    /// Focused objects are gridded into the inner box scaled by this much.
    #[serde(default = "default_focus_shrink")]
    pub shrink: f64,
}

fn default_focus_scale_x() -> f64 { DEFAULT_FOCUS_SCALE_X }
fn default_focus_scale_y() -> f64 { DEFAULT_FOCUS_SCALE_Y }
fn default_focus_shrink() -> f64 { DEFAULT_FOCUS_SHRINK }

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            scale_x: DEFAULT_FOCUS_SCALE_X,
            scale_y: DEFAULT_FOCUS_SCALE_Y,
            shrink: DEFAULT_FOCUS_SHRINK,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct AspectFocusSettings {
    /// Width over height of the derived inner box.
    #[serde(default = "default_aspect")]
    pub aspect: f64,
    /// Fraction of the constraining outer dimension the inner box takes.
    #[serde(default = "default_aspect_scale")]
    pub scale: f64,
}

fn default_aspect() -> f64 { DEFAULT_ASPECT }
fn default_aspect_scale() -> f64 { DEFAULT_ASPECT_SCALE }

impl Default for AspectFocusSettings {
    fn default() -> Self {
        Self {
            aspect: DEFAULT_ASPECT,
            scale: DEFAULT_ASPECT_SCALE,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct TilingSettings {
    /// Commit positions with animated moves rather than immediate ones.
    #[serde(default = "yes")]
    pub animate: bool,
    /// Above this many objects the first complete packing is kept.
    #[serde(default = "default_exhaustive_limit")]
    pub exhaustive_limit: usize,
    /// Upper bound on search nodes visited in one call.
    #[serde(default = "default_search_budget")]
    pub search_budget: usize,
}

fn default_exhaustive_limit() -> usize { DEFAULT_EXHAUSTIVE_LIMIT }
fn default_search_budget() -> usize { DEFAULT_SEARCH_BUDGET }

impl Default for TilingSettings {
    fn default() -> Self {
        Self {
            animate: true,
            exhaustive_limit: DEFAULT_EXHAUSTIVE_LIMIT,
            search_budget: DEFAULT_SEARCH_BUDGET,
        }
    }
}

fn check_fraction(issues: &mut Vec<String>, name: &str, value: f64) {
    if !(value > 0.0 && value <= 1.0) {
        issues.push(format!("{name} must be in (0, 1], got {value}"));
    }
}

impl FocusSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        check_fraction(&mut issues, "focus.scale_x", self.scale_x);
        check_fraction(&mut issues, "focus.scale_y", self.scale_y);
        check_fraction(&mut issues, "focus.shrink", self.shrink);
        issues
    }
}

impl AspectFocusSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !(self.aspect > 0.0 && self.aspect.is_finite()) {
            issues.push(format!("aspect_focus.aspect must be positive, got {}", self.aspect));
        }
        check_fraction(&mut issues, "aspect_focus.scale", self.scale);
        issues
    }
}

impl TilingSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.search_budget == 0 {
            issues.push("tiling.search_budget must be at least 1".to_string());
        }
        issues
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.focus.validate();
        issues.extend(self.aspect_focus.validate());
        issues.extend(self.tiling.validate());
        issues
    }

    /// Resets every invalid value to its default. Returns how many were fixed.
    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;
        let focus_defaults = FocusSettings::default();
        for (value, default) in [
            (&mut self.focus.scale_x, focus_defaults.scale_x),
            (&mut self.focus.scale_y, focus_defaults.scale_y),
            (&mut self.focus.shrink, focus_defaults.shrink),
            (&mut self.aspect_focus.scale, DEFAULT_ASPECT_SCALE),
        ] {
            if !(*value > 0.0 && *value <= 1.0) {
                *value = default;
                fixes += 1;
            }
        }
        if !(self.aspect_focus.aspect > 0.0 && self.aspect_focus.aspect.is_finite()) {
            self.aspect_focus.aspect = DEFAULT_ASPECT;
            fixes += 1;
        }
        if self.tiling.search_budget == 0 {
            self.tiling.search_budget = DEFAULT_SEARCH_BUDGET;
            fixes += 1;
        }
        fixes
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> { Self::read_checked(path).map(|(config, _)| config) }

    /// Like [`Config::read`], but also returns the issues that were found
    /// before invalid values were reset.
    pub fn read_checked(path: &Path) -> anyhow::Result<(Config, Vec<String>)> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse_checked(&buf)
    }

    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }

    fn parse(buf: &str) -> anyhow::Result<Config> { Self::parse_checked(buf).map(|(config, _)| config) }

    fn parse_checked(buf: &str) -> anyhow::Result<(Config, Vec<String>)> {
        let mut config: Config = toml::from_str(buf)?;
        let issues = config.validate();
        if !issues.is_empty() {
            for issue in &issues {
                warn!("config: {issue}");
            }
            let fixes = config.auto_fix_values();
            warn!("config: reset {fixes} invalid values to their defaults");
        }
        Ok((config, issues))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.settings.grid, GridSettings::default());
        assert!(config.settings.grid.resize);
        assert_eq!(config.settings.aspect_focus.aspect, 1.5555);
    }

    #[test]
    fn empty_document_parses_to_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [settings.grid]
            orientation = "vertical"
            edge = true
            num_x = 3

            [settings.focus]
            shrink = 0.9

            [settings.tiling]
            animate = false
        "#,
        )
        .unwrap();

        assert_eq!(config.settings.grid.orientation, Orientation::Vertical);
        assert!(config.settings.grid.edge);
        assert!(config.settings.grid.resize);
        assert_eq!(config.settings.grid.num_x, 3);
        assert_eq!(config.settings.focus.shrink, 0.9);
        assert_eq!(config.settings.focus.scale_x, DEFAULT_FOCUS_SCALE_X);
        assert!(!config.settings.tiling.animate);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::parse("[settings.grid]\ncolumns = 3\n").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.settings.focus.shrink = 1.5;
        config.settings.aspect_focus.aspect = -1.0;

        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("focus.shrink"));
        assert!(issues[1].contains("aspect_focus.aspect"));

        assert_eq!(config.auto_fix_values(), 2);
        assert_eq!(config.settings.focus.shrink, DEFAULT_FOCUS_SHRINK);
        assert_eq!(config.settings.aspect_focus.aspect, DEFAULT_ASPECT);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn parse_repairs_invalid_values() {
        let config = Config::parse("[settings.aspect_focus]\nscale = 0.0\n").unwrap();
        assert_eq!(config.settings.aspect_focus.scale, DEFAULT_ASPECT_SCALE);
    }

    #[test]
    fn checked_read_reports_issues_before_fixing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings.focus]\nshrink = 7.0").unwrap();

        let (config, issues) = Config::read_checked(file.path()).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("focus.shrink"));
        assert_eq!(config.settings.focus.shrink, DEFAULT_FOCUS_SHRINK);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings.perimeter]\nlegacy_status = true").unwrap();

        let config = Config::read(file.path()).unwrap();
        assert!(config.settings.perimeter.legacy_status);
    }
}
