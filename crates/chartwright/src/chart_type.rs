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

use crate::error::InputError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The closed set of chart types the pipeline can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartType {
    Column,
    Bar,
    Line,
    Area,
    Pie,
    Donut,
    Funnel,
    ColumnLine,
    ColumnArea,
    DualAxis,
    Waterfall,
    Heatmap,
    Treemap,
    Sankey,
    Histogram,
    Pareto,
    Scatter,
    Bubble,
    Bullet,
    WordCloud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartFamily {
    Categorical,
    Proportion,
    Matrix,
    Hierarchical,
    Flow,
    Distribution,
    Positional,
    WordWeight,
}

/// How the hover pass styles a chart's series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverStyle {
    /// Line-like series: drillable series get a pointer cursor and a lighter
    /// marker, the rest lose their hover halo.
    Halo,
    /// Whole-series brightness, enabled only on drillable series.
    SeriesBrightness,
    /// Per-point brightness for point-coloured charts.
    PointBrightness,
}

impl ChartType {
    pub const ALL: [ChartType; 20] = [
        ChartType::Column,
        ChartType::Bar,
        ChartType::Line,
        ChartType::Area,
        ChartType::Pie,
        ChartType::Donut,
        ChartType::Funnel,
        ChartType::ColumnLine,
        ChartType::ColumnArea,
        ChartType::DualAxis,
        ChartType::Waterfall,
        ChartType::Heatmap,
        ChartType::Treemap,
        ChartType::Sankey,
        ChartType::Histogram,
        ChartType::Pareto,
        ChartType::Scatter,
        ChartType::Bubble,
        ChartType::Bullet,
        ChartType::WordCloud,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Column => "column",
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Pie => "pie",
            ChartType::Donut => "donut",
            ChartType::Funnel => "funnel",
            ChartType::ColumnLine => "column-line",
            ChartType::ColumnArea => "column-area",
            ChartType::DualAxis => "dualaxis",
            ChartType::Waterfall => "waterfall",
            ChartType::Heatmap => "heatmap",
            ChartType::Treemap => "treemap",
            ChartType::Sankey => "sankey",
            ChartType::Histogram => "histogram",
            ChartType::Pareto => "pareto",
            ChartType::Scatter => "scatter",
            ChartType::Bubble => "bubble",
            ChartType::Bullet => "bullet",
            ChartType::WordCloud => "wordcloud",
        }
    }

    pub fn family(&self) -> ChartFamily {
        match self {
            ChartType::Column
            | ChartType::Bar
            | ChartType::Line
            | ChartType::Area
            | ChartType::ColumnLine
            | ChartType::ColumnArea
            | ChartType::DualAxis
            | ChartType::Waterfall => ChartFamily::Categorical,
            ChartType::Pie | ChartType::Donut | ChartType::Funnel => ChartFamily::Proportion,
            ChartType::Heatmap => ChartFamily::Matrix,
            ChartType::Treemap => ChartFamily::Hierarchical,
            ChartType::Sankey => ChartFamily::Flow,
            ChartType::Histogram | ChartType::Pareto => ChartFamily::Distribution,
            ChartType::Scatter | ChartType::Bubble | ChartType::Bullet => ChartFamily::Positional,
            ChartType::WordCloud => ChartFamily::WordWeight,
        }
    }

    /// Pie, donut and funnel: one series whose points carry colour and legend index.
    pub fn is_proportion(&self) -> bool {
        self.family() == ChartFamily::Proportion
    }

    /// Charts whose points map one-to-one onto measures when no view-by
    /// attribute is present.
    pub fn points_are_measures(&self) -> bool {
        self.is_proportion() || *self == ChartType::Waterfall
    }

    /// Pie and donut share the stricter data-size limits and the negative
    /// value check.
    pub fn is_pie_like(&self) -> bool {
        matches!(self, ChartType::Pie | ChartType::Donut)
    }

    pub fn hover_style(&self) -> HoverStyle {
        match self {
            ChartType::Line | ChartType::Area => HoverStyle::Halo,
            ChartType::Funnel
            | ChartType::Pie
            | ChartType::Donut
            | ChartType::Treemap
            | ChartType::WordCloud
            | ChartType::Heatmap => HoverStyle::PointBrightness,
            _ => HoverStyle::SeriesBrightness,
        }
    }

    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(ChartType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| InputError::UnsupportedChartType {
                chart_type: s.to_string(),
                supported: Self::supported_list(),
            })
    }
}

impl Serialize for ChartType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChartType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
