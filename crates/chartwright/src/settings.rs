// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::color::Rgb;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_COLOR_PALETTE: [&str; 20] = [
    "rgb(20,178,226)",
    "rgb(0,193,141)",
    "rgb(229,77,66)",
    "rgb(241,134,0)",
    "rgb(171,85,163)",
    "rgb(244,213,33)",
    "rgb(148,161,174)",
    "rgb(107,191,216)",
    "rgb(181,136,177)",
    "rgb(238,135,128)",
    "rgb(241,171,84)",
    "rgb(133,209,188)",
    "rgb(41,117,170)",
    "rgb(4,140,103)",
    "rgb(181,60,51)",
    "rgb(163,101,46)",
    "rgb(140,57,132)",
    "rgb(136,219,244)",
    "rgb(189,234,222)",
    "rgb(239,197,194)",
];

/// Smallest positive brightness the renderer treats as "changed"; used to
/// neutralise hover on non-drillable points without disabling it.
pub const MINIMUM_SAFE_BRIGHTNESS: f64 = 5e-324;

/// Read-only constants for one pipeline. Nothing here is process-global; a
/// caller that wants different limits builds a different value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub color_palette: Vec<String>,
    pub derived_measure_lighten: f64,
    pub heatmap_label_max_view_by: usize,
    pub heatmap_label_max_stack_by: usize,
    pub heatmap_border_max_items: usize,
    pub marker_max_points: usize,
    pub series_limit: usize,
    pub categories_limit: usize,
    pub proportion_categories_limit: usize,
    pub hover_brightness: f64,
    pub minimum_safe_brightness: f64,
    pub max_point_width: u32,
    pub waterfall_up_color: String,
    pub waterfall_color: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            color_palette: DEFAULT_COLOR_PALETTE.iter().map(|c| c.to_string()).collect(),
            derived_measure_lighten: 0.6,
            heatmap_label_max_view_by: 6,
            heatmap_label_max_stack_by: 20,
            heatmap_border_max_items: 30,
            marker_max_points: 30,
            series_limit: 1000,
            categories_limit: 365,
            proportion_categories_limit: 20,
            hover_brightness: 0.1,
            minimum_safe_brightness: MINIMUM_SAFE_BRIGHTNESS,
            max_point_width: 100,
            waterfall_up_color: "rgb(20,178,226)".to_string(),
            waterfall_color: "rgb(148,161,174)".to_string(),
        }
    }
}

impl PipelineSettings {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let settings: PipelineSettings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::SettingsFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.color_palette.is_empty() {
            return Err(invalid("color_palette", "must contain at least one colour"));
        }
        for colour in &self.color_palette {
            colour.parse::<Rgb>()?;
        }
        if !(0.0..=1.0).contains(&self.derived_measure_lighten) {
            return Err(invalid("derived_measure_lighten", "must be between 0.0 and 1.0"));
        }
        if !(0.0..=1.0).contains(&self.hover_brightness) {
            return Err(invalid("hover_brightness", "must be between 0.0 and 1.0"));
        }
        if self.series_limit == 0 || self.categories_limit == 0 {
            return Err(invalid("series_limit/categories_limit", "must be greater than 0"));
        }
        if self.proportion_categories_limit == 0 {
            return Err(invalid("proportion_categories_limit", "must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
