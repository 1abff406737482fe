//! Configuration types and validation for a merge run

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::merge::AppearanceCachePolicy;
use crate::types::AffineTransform;

/// Settings for one merge. Loadable from JSON; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Added to every target page; may be negative
    pub page_shift: i32,
    pub x_shift: f64,
    pub y_shift: f64,
    pub scale: f64,
    pub appearance_cache: AppearanceCachePolicy,
    pub report_unresolved_replies: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            page_shift: 0,
            x_shift: 0.0,
            y_shift: 0.0,
            scale: 1.0,
            appearance_cache: AppearanceCachePolicy::PerKind,
            report_unresolved_replies: true,
        }
    }
}

impl MergeConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: MergeConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(Error::ConfigError(format!("Scale must be finite and non-zero, got {}", self.scale)));
        }
        if !self.x_shift.is_finite() || !self.y_shift.is_finite() {
            return Err(Error::ConfigError("Shifts must be finite".into()));
        }
        Ok(())
    }

    /// `[scale 0 0 scale x_shift y_shift]`
    pub fn transform(&self) -> AffineTransform {
        AffineTransform::scale_translate(self.scale, self.x_shift, self.y_shift)
    }

    /// Replaces the geometry with `spec`. A quad that leaves the config
    /// invalid is rejected and the config is left unchanged.
    pub fn apply(&mut self, spec: TransformSpec) -> Result<()> {
        let updated = Self {
            page_shift: spec.page_shift,
            x_shift: spec.x_shift,
            y_shift: spec.y_shift,
            scale: spec.scale,
            ..self.clone()
        };
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// The `PG/X/Y/SCALE` command-line quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSpec {
    pub page_shift: i32,
    pub x_shift: f64,
    pub y_shift: f64,
    pub scale: f64,
}

impl TransformSpec {
    pub fn parse(raw: &str) -> Result<Self> {
        raw.parse()
    }
}

impl FromStr for TransformSpec {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split('/').map(str::trim).collect();
        let [page, x, y, scale] = parts.as_slice() else {
            return Err(Error::ConfigError(format!(
                "Expected PGNUMSHIFT/XSHIFT/YSHIFT/SCALE, got {:?}",
                raw
            )));
        };
        let number = |field: &str, value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| Error::ConfigError(format!("Invalid {} {:?}", field, value)))
        };
        let page_shift = page
            .parse::<i32>()
            .map_err(|_| Error::ConfigError(format!("Invalid page shift {:?}", page)))?;
        Ok(Self {
            page_shift,
            x_shift: number("x shift", *x)?,
            y_shift: number("y shift", *y)?,
            scale: number("scale", *scale)?,
        })
    }
}
