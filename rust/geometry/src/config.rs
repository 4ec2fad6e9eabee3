// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kernel configuration with environment overrides.

use crate::error::{Error, Result};
use std::str::FromStr;

/// How floor and roof caps are triangulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapMode {
    /// Earcut the outer ring with the inner ring as a hole
    #[default]
    Earcut,
    /// Stitch inner and outer rings with two triangles per edge
    Stitched,
}

impl FromStr for CapMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earcut" => Ok(CapMode::Earcut),
            "stitched" | "stitch" => Ok(CapMode::Stitched),
            other => Err(Error::Config(format!("unknown cap mode '{}'", other))),
        }
    }
}

/// Tunables for building mesh construction.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Cap triangulation strategy.
    pub cap_mode: CapMode,
    /// Distance (plan units) window cutters reach past each wall face.
    pub cutter_overshoot: f64,
    /// Interior corner angles (radians) below this are rejected as degenerate.
    pub min_corner_angle: f64,
    /// Side length of player marker cubes, in scene units.
    pub marker_side: f64,
}

impl KernelConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// - `WALLFORGE_CAP_MODE` (`earcut` | `stitched`)
    /// - `WALLFORGE_CUTTER_OVERSHOOT`
    /// - `WALLFORGE_MIN_CORNER_ANGLE`
    /// - `WALLFORGE_MARKER_SIDE`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            cap_mode: env_or("WALLFORGE_CAP_MODE", defaults.cap_mode)?,
            cutter_overshoot: env_or("WALLFORGE_CUTTER_OVERSHOOT", defaults.cutter_overshoot)?,
            min_corner_angle: env_or("WALLFORGE_MIN_CORNER_ANGLE", defaults.min_corner_angle)?,
            marker_side: env_or("WALLFORGE_MARKER_SIDE", defaults.marker_side)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would build wrong geometry.
    ///
    /// Overshoot and marker side must be finite and positive, the corner
    /// angle threshold finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("cutter_overshoot", self.cutter_overshoot),
            ("marker_side", self.marker_side),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{} must be finite and > 0, got {}", name, value)));
            }
        }
        if !(self.min_corner_angle.is_finite() && self.min_corner_angle >= 0.0) {
            return Err(Error::Config(format!(
                "min_corner_angle must be finite and >= 0, got {}",
                self.min_corner_angle
            )));
        }
        Ok(())
    }

    /// Builder-style cap mode override
    pub fn with_cap_mode(mut self, cap_mode: CapMode) -> Self {
        self.cap_mode = cap_mode;
        self
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            cap_mode: CapMode::Earcut,
            cutter_overshoot: 1e-3,
            min_corner_angle: 1e-6,
            marker_side: 0.1,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("{}={}: {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}
