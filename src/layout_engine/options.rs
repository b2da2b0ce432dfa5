//! Per-call layout options.
//!
//! Callers pass a loose name to value map; every algorithm resolves it into
//! its typed settings struct by merging the map over configured defaults.
//! Unknown keys are ignored. Known keys with the wrong type are rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LayoutError;
use super::graph::Orientation;
use crate::common::collections::HashMap;
use crate::common::config::{
    AspectFocusSettings, FocusSettings, GridSettings, PerimeterSettings, TilingSettings,
};

pub const HORIZ: &str = "horiz";
pub const EDGE: &str = "edge";
pub const RESIZE: &str = "resize";
pub const NUM_X: &str = "numX";
pub const NUM_Y: &str = "numY";
pub const SCALE_X: &str = "scaleX";
pub const SCALE_Y: &str = "scaleY";
pub const SHRINK: &str = "shrink";
pub const ASPECT: &str = "aspect";
pub const SCALE: &str = "scale";
pub const LEGACY_STATUS: &str = "legacyStatus";
pub const ANIMATE: &str = "animate";
pub const EXHAUSTIVE_LIMIT: &str = "exhaustiveLimit";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self { OptionValue::Bool(value) }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self { OptionValue::Int(value) }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self { OptionValue::Float(value) }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{value}"),
            OptionValue::Int(value) => write!(f, "{value}"),
            OptionValue::Float(value) => write!(f, "{value}"),
        }
    }
}

impl FromStr for OptionValue {
    type Err = LayoutError;

    /// Accepts `true`/`false` in any case, then integers, then floats.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Ok(OptionValue::Bool(true));
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Ok(OptionValue::Bool(false));
        }
        if let Ok(int) = trimmed.parse::<i64>() {
            return Ok(OptionValue::Int(int));
        }
        trimmed
            .parse::<f64>()
            .map(OptionValue::Float)
            .map_err(|_| LayoutError::invalid_option(raw, "not a bool, integer or number"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(HashMap<String, OptionValue>);

impl Options {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<OptionValue> { self.0.get(key).copied() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Parses a `key=value` assignment, as given on a command line.
    pub fn parse_assignment(&mut self, assignment: &str) -> Result<(), LayoutError> {
        let Some((key, value)) = assignment.split_once('=') else {
            return Err(LayoutError::invalid_option(assignment, "expected key=value"));
        };
        let key = key.trim();
        let value = value.parse::<OptionValue>().map_err(|_| {
            LayoutError::invalid_option(key, format!("cannot parse `{}`", value.trim()))
        })?;
        self.insert(key, value);
        Ok(())
    }

    fn bool(&self, key: &str) -> Result<Option<bool>, LayoutError> {
        match self.get(key) {
            None => Ok(None),
            Some(OptionValue::Bool(value)) => Ok(Some(value)),
            Some(other) => Err(LayoutError::invalid_option(key, format!("expected a bool, got {other}"))),
        }
    }

    fn count(&self, key: &str) -> Result<Option<usize>, LayoutError> {
        match self.get(key) {
            None => Ok(None),
            Some(OptionValue::Int(value)) => usize::try_from(value).map(Some).map_err(|_| {
                LayoutError::invalid_option(key, format!("expected a non-negative integer, got {value}"))
            }),
            Some(other) => Err(LayoutError::invalid_option(
                key,
                format!("expected a non-negative integer, got {other}"),
            )),
        }
    }

    fn float(&self, key: &str) -> Result<Option<f64>, LayoutError> {
        match self.get(key) {
            None => Ok(None),
            Some(OptionValue::Float(value)) => Ok(Some(value)),
            Some(OptionValue::Int(value)) => Ok(Some(value as f64)),
            Some(other) => Err(LayoutError::invalid_option(key, format!("expected a number, got {other}"))),
        }
    }
}

fn reject_issues(key: &str, issues: Vec<String>) -> Result<(), LayoutError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(LayoutError::invalid_option(key, issues.join("; ")))
    }
}

impl GridSettings {
    pub fn merged(&self, options: &Options) -> Result<Self, LayoutError> {
        let mut merged = *self;
        if let Some(horiz) = options.bool(HORIZ)? {
            merged.orientation = Orientation::from_horiz(horiz);
        }
        if let Some(edge) = options.bool(EDGE)? {
            merged.edge = edge;
        }
        if let Some(resize) = options.bool(RESIZE)? {
            merged.resize = resize;
        }
        if let Some(num_x) = options.count(NUM_X)? {
            merged.num_x = num_x;
        }
        if let Some(num_y) = options.count(NUM_Y)? {
            merged.num_y = num_y;
        }
        Ok(merged)
    }
}

impl PerimeterSettings {
    pub fn merged(&self, options: &Options) -> Result<Self, LayoutError> {
        let mut merged = *self;
        if let Some(legacy) = options.bool(LEGACY_STATUS)? {
            merged.legacy_status = legacy;
        }
        Ok(merged)
    }
}

impl FocusSettings {
    pub fn merged(&self, options: &Options) -> Result<Self, LayoutError> {
        let mut merged = *self;
        if let Some(scale_x) = options.float(SCALE_X)? {
            merged.scale_x = scale_x;
        }
        if let Some(scale_y) = options.float(SCALE_Y)? {
            merged.scale_y = scale_y;
        }
        if let Some(shrink) = options.float(SHRINK)? {
            merged.shrink = shrink;
        }
        reject_issues("focus", merged.validate())?;
        Ok(merged)
    }
}

impl AspectFocusSettings {
    pub fn merged(&self, options: &Options) -> Result<Self, LayoutError> {
        let mut merged = *self;
        if let Some(aspect) = options.float(ASPECT)? {
            merged.aspect = aspect;
        }
        if let Some(scale) = options.float(SCALE)? {
            merged.scale = scale;
        }
        reject_issues("aspectFocus", merged.validate())?;
        Ok(merged)
    }
}

impl TilingSettings {
    pub fn merged(&self, options: &Options) -> Result<Self, LayoutError> {
        let mut merged = *self;
        if let Some(animate) = options.bool(ANIMATE)? {
            merged.animate = animate;
        }
        if let Some(limit) = options.count(EXHAUSTIVE_LIMIT)? {
            merged.exhaustive_limit = limit;
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn grid_defaults_survive_empty_options() {
        let merged = GridSettings::default().merged(&Options::new()).unwrap();
        assert_eq!(merged, GridSettings::default());
    }

    #[test]
    fn grid_options_override_defaults() {
        let options = Options::new()
            .with(HORIZ, false)
            .with(EDGE, true)
            .with(NUM_X, 2i64)
            .with("somethingElse", 4.5);
        let merged = GridSettings::default().merged(&options).unwrap();

        assert_eq!(merged.orientation, Orientation::Vertical);
        assert!(merged.edge);
        assert!(merged.resize);
        assert_eq!((merged.num_x, merged.num_y), (2, 0));
    }

    #[test]
    fn wrong_types_are_rejected() {
        let options = Options::new().with(RESIZE, 1i64);
        assert!(matches!(
            GridSettings::default().merged(&options),
            Err(LayoutError::InvalidOption { key, .. }) if key == RESIZE
        ));

        let options = Options::new().with(NUM_Y, -3i64);
        assert!(GridSettings::default().merged(&options).is_err());

        let options = Options::new().with(SCALE, true);
        assert!(AspectFocusSettings::default().merged(&options).is_err());
    }

    #[test]
    fn integers_widen_to_floats() {
        let options = Options::new().with(ASPECT, 2i64);
        let merged = AspectFocusSettings::default().merged(&options).unwrap();
        assert_eq!(merged.aspect, 2.0);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let options = Options::new().with(SHRINK, 0.0);
        assert!(FocusSettings::default().merged(&options).is_err());
    }

    #[test]
    fn parses_assignments() {
        let mut options = Options::new();
        options.parse_assignment("horiz=False").unwrap();
        options.parse_assignment("numX = 3").unwrap();
        options.parse_assignment("scale=0.5").unwrap();

        assert_eq!(options.get(HORIZ), Some(OptionValue::Bool(false)));
        assert_eq!(options.get(NUM_X), Some(OptionValue::Int(3)));
        assert_eq!(options.get(SCALE), Some(OptionValue::Float(0.5)));
        assert!(options.parse_assignment("scale").is_err());
        assert!(options.parse_assignment("scale=wide").is_err());
    }

    #[test]
    fn deserializes_from_json() {
        let options: Options =
            serde_json::from_str(r#"{"edge": true, "numY": 2, "scaleX": 0.5}"#).unwrap();
        assert_eq!(options.get(EDGE), Some(OptionValue::Bool(true)));
        assert_eq!(options.get(NUM_Y), Some(OptionValue::Int(2)));
        assert_eq!(options.get(SCALE_X), Some(OptionValue::Float(0.5)));
    }
}
