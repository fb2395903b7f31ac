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

use crate::chart_type::ChartType;
use crate::error::ConfigError;
use crate::headers::{MeasureGroup, ResolvedAttribute};
use crate::model::Afm;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static HEX_COLOUR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").expect("hex colour regex")
});
static RGB_COLOUR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[\d.]+\s*)?\)$")
        .expect("rgb colour regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Moves each channel `percent` of the way towards white (positive) or
    /// black (negative).
    pub fn lighten(&self, percent: f64) -> Rgb {
        let channel = |c: u8| -> u8 {
            let (target, p) = if percent < 0.0 {
                (0.0, -percent)
            } else {
                (255.0, percent)
            };
            let c = f64::from(c);
            ((target - c) * p + c).round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColour {
            value: s.to_string(),
        };
        let s = s.trim();
        if let Some(caps) = HEX_COLOUR.captures(s) {
            let channel = |i: usize| u8::from_str_radix(&caps[i], 16).map_err(|_| invalid());
            return Ok(Rgb {
                r: channel(1)?,
                g: channel(2)?,
                b: channel(3)?,
            });
        }
        if let Some(caps) = RGB_COLOUR.captures(s) {
            let channel = |i: usize| caps[i].parse::<u8>().map_err(|_| invalid());
            return Ok(Rgb {
                r: channel(1)?,
                g: channel(2)?,
                b: channel(3)?,
            });
        }
        Err(invalid())
    }
}

/// Lightens a CSS colour string. Colours that do not parse are returned as-is.
pub fn lighter_color(color: &str, percent: f64) -> String {
    match color.parse::<Rgb>() {
        Ok(rgb) => rgb.lighten(percent).to_string(),
        Err(_) => color.to_string(),
    }
}

fn cycle(palette: &[String], index: usize) -> String {
    if palette.is_empty() {
        return String::new();
    }
    palette[index % palette.len()].clone()
}

/// One colour per series, or per point for attribute-driven proportion charts.
pub fn color_palette(
    base: &[String],
    measure_group: &MeasureGroup,
    view_by: Option<&ResolvedAttribute>,
    stack_by: Option<&ResolvedAttribute>,
    afm: &Afm,
    chart_type: ChartType,
    derived_lighten: f64,
) -> Vec<String> {
    let attribute_proportion = chart_type.is_proportion() && !afm.attributes.is_empty();

    if stack_by.is_some() || attribute_proportion {
        let count = stack_by.or(view_by).map_or(0, ResolvedAttribute::len);
        return (0..count).map(|i| cycle(base, i)).collect();
    }

    let mut assigned: Vec<String> = Vec::with_capacity(measure_group.len());
    let mut linked_derived = 0usize;
    for (index, measure) in measure_group.items.iter().enumerate() {
        let mut color = cycle(base, index - linked_derived);

        let source_index = afm
            .derived_source(&measure.local_identifier)
            .and_then(|source| measure_group.position(source));
        if let Some(source_index) = source_index {
            linked_derived += 1;
            let source_color = if source_index < index {
                assigned[source_index].clone()
            } else {
                cycle(base, source_index.saturating_sub(linked_derived))
            };
            color = lighter_color(&source_color, derived_lighten);
        }
        assigned.push(color);
    }
    assigned
}
