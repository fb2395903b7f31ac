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

//! The chart options builder: maps the generic result shape onto the
//! intermediate [`ChartOptions`] model, one handler per chart family.

pub mod categorical;
pub mod distribution;
pub mod flow;
pub mod hierarchy;
pub mod matrix;
pub mod positional;
pub mod proportion;
pub mod wordcloud;

use crate::buckets::MeasureBuckets;
use crate::chart_type::ChartType;
use crate::color::color_palette;
use crate::drill::{DrillContextItem, DrillMatcher, DrillScope};
use crate::error::Result;
use crate::headers::{resolve_headers, MeasureGroup, ResolvedAttribute, ResolvedHeaders};
use crate::model::{ChartConfig, ChartInput};
use crate::settings::PipelineSettings;
use crate::tooltip::TooltipSpec;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stacking {
    Normal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Titles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_format: Option<String>,
    /// Value format of matrix charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Categories {
    Flat(Vec<String>),
    /// One list per axis (heatmap) or a single wrapped list (pareto, bullet).
    Nested(Vec<Vec<String>>),
}

impl Default for Categories {
    fn default() -> Self {
        Categories::Flat(Vec::new())
    }
}

impl Categories {
    /// The list that labels the primary axis.
    pub fn primary(&self) -> &[String] {
        match self {
            Categories::Flat(items) => items,
            Categories::Nested(lists) => lists.first().map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn len(&self) -> usize {
        self.primary().len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub enabled: bool,
}

/// A point of the generic series types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub y: Option<f64>,
    pub format: String,
    pub marker: Marker,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_index: Option<usize>,
    pub drilldown: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drill_context: Option<Vec<DrillContextItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreemapNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XyPoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Present only for bubbles; the inner `None` is a missing size value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Option<f64>>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletPoint {
    pub y: Option<f64>,
    pub target: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordPoint {
    pub weight: Option<f64>,
    pub y: Option<f64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataPoint {
    Point(SeriesPoint),
    /// Bare value (histogram, pareto).
    Value(Option<f64>),
    /// `[column, row, value]`
    Cell(usize, usize, Option<f64>),
    /// `[from, to, weight]`
    Link(String, String, Option<f64>),
    Node(TreemapNode),
    Xy(XyPoint),
    Bullet(BulletPoint),
    Word(WordPoint),
}

impl DataPoint {
    pub fn as_point(&self) -> Option<&SeriesPoint> {
        match self {
            DataPoint::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            DataPoint::Point(p) => p.y,
            DataPoint::Value(v) => *v,
            DataPoint::Cell(_, _, v) | DataPoint::Link(_, _, v) => *v,
            DataPoint::Node(n) => n.value,
            DataPoint::Xy(p) => p.y,
            DataPoint::Bullet(p) => p.y,
            DataPoint::Word(p) => p.weight,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_index: Option<usize>,
    pub data: Vec<DataPoint>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    pub is_drillable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_series: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "formatX", skip_serializing_if = "Option::is_none")]
    pub format_x: Option<String>,
    #[serde(rename = "formatGD", skip_serializing_if = "Option::is_none")]
    pub format_gd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_labels: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turbo_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub series: Vec<Series>,
    pub categories: Categories,
    /// Bullet comparison bands, one list per data row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bands: Option<Vec<Vec<Band>>>,
}

/// Everything the compositor needs; it never looks at the query again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub stacking: Option<Stacking>,
    pub legend_layout: String,
    pub color_palette: Vec<String>,
    pub title: Titles,
    pub show_in_percent: bool,
    pub show_in_percent_x: bool,
    pub show_in_percent_measures: bool,
    pub show_in_percent_secondary: bool,
    pub dual_axis: bool,
    pub data: ChartData,
    pub tooltip: TooltipSpec,
}

impl ChartOptions {
    pub fn new(chart_type: ChartType, color_palette: Vec<String>, tooltip: TooltipSpec) -> Self {
        ChartOptions {
            chart_type,
            stacking: None,
            legend_layout: "horizontal".to_string(),
            color_palette,
            title: Titles::default(),
            show_in_percent: false,
            show_in_percent_x: false,
            show_in_percent_measures: false,
            show_in_percent_secondary: false,
            dual_axis: false,
            data: ChartData::default(),
            tooltip,
        }
    }

    pub fn with_data(mut self, series: Vec<Series>, categories: Categories) -> Self {
        self.data.series = series;
        self.data.categories = categories;
        self
    }
}

/// Read-only view of one build's inputs, shared by every family handler.
pub struct BuildContext<'a> {
    pub chart_type: ChartType,
    pub input: &'a ChartInput,
    pub headers: &'a ResolvedHeaders,
    pub buckets: &'a MeasureBuckets,
    pub rows: &'a [Vec<Option<f64>>],
    /// Colours assigned to this chart's series or points.
    pub colors: &'a [String],
    pub settings: &'a PipelineSettings,
    pub matcher: &'a dyn DrillMatcher,
}

impl<'a> BuildContext<'a> {
    pub fn config(&self) -> &'a ChartConfig {
        &self.input.config
    }

    pub fn measure_group(&self) -> &'a MeasureGroup {
        &self.headers.measure_group
    }

    pub fn view_by(&self) -> Option<&'a ResolvedAttribute> {
        self.headers.view_by.as_ref()
    }

    pub fn stack_by(&self) -> Option<&'a ResolvedAttribute> {
        self.headers.stack_by.as_ref()
    }

    /// Assigned colour, cycling when there are more series than colours.
    pub fn color(&self, index: usize) -> String {
        cycle(self.colors, index)
    }

    /// Colour from the configured default palette, ignoring `config.colors`.
    pub fn default_color(&self, index: usize) -> String {
        cycle(&self.settings.color_palette, index)
    }

    pub fn view_by_names_or_blank(&self) -> Vec<String> {
        self.view_by()
            .map(ResolvedAttribute::item_names)
            .unwrap_or_else(|| vec![String::new()])
    }

    pub fn first_row(&self) -> &'a [Option<f64>] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn drill_scope(&self) -> DrillScope<'a> {
        DrillScope {
            chart_type: self.chart_type,
            headers: self.headers,
            afm: &self.input.afm,
            drillable_items: &self.input.drillable_items,
            matcher: self.matcher,
        }
    }
}

fn cycle(palette: &[String], index: usize) -> String {
    if palette.is_empty() {
        String::new()
    } else {
        palette[index % palette.len()].clone()
    }
}

pub trait OptionsBuilder: Send + Sync {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions;
}

/// One handler per chart type. The match is exhaustive, so a new chart type
/// does not compile until it has a handler.
pub fn builder_for(chart_type: ChartType) -> &'static dyn OptionsBuilder {
    match chart_type {
        ChartType::Column
        | ChartType::Bar
        | ChartType::Line
        | ChartType::Area
        | ChartType::ColumnLine
        | ChartType::ColumnArea
        | ChartType::DualAxis
        | ChartType::Waterfall => &categorical::CategoricalBuilder,
        ChartType::Pie | ChartType::Donut | ChartType::Funnel => &proportion::ProportionBuilder,
        ChartType::Heatmap => &matrix::HeatmapBuilder,
        ChartType::Treemap => &hierarchy::TreemapBuilder,
        ChartType::Sankey => &flow::SankeyBuilder,
        ChartType::Histogram => &distribution::HistogramBuilder,
        ChartType::Pareto => &distribution::ParetoBuilder,
        ChartType::Scatter | ChartType::Bubble => &positional::XyBuilder,
        ChartType::Bullet => &positional::BulletBuilder,
        ChartType::WordCloud => &wordcloud::WordCloudBuilder,
    }
}

/// Validates the preconditions and runs the handler for `input.config.type`.
pub fn build_chart_options(
    input: &ChartInput,
    settings: &PipelineSettings,
    matcher: &dyn DrillMatcher,
) -> Result<ChartOptions> {
    let chart_type: ChartType = input.config.chart_type.parse()?;
    let headers = resolve_headers(&input.dimensions, &input.header_items)?;
    let buckets = MeasureBuckets::index(&input.md_object, &headers.measure_group);

    let base_palette = input
        .config
        .colors
        .as_deref()
        .filter(|colors| !colors.is_empty())
        .unwrap_or(settings.color_palette.as_slice());
    let colors = color_palette(
        base_palette,
        &headers.measure_group,
        headers.view_by.as_ref(),
        headers.stack_by.as_ref(),
        &input.afm,
        chart_type,
        settings.derived_measure_lighten,
    );
    let rows = input.execution_result_data.rows();

    tracing::debug!(
        target: "chartwright::options",
        chart_type = %chart_type,
        measures = headers.measure_group.len(),
        view_by = headers.view_by.as_ref().map_or(0, ResolvedAttribute::len),
        stack_by = headers.stack_by.as_ref().map_or(0, ResolvedAttribute::len),
        rows = rows.len(),
        "building chart options"
    );

    let ctx = BuildContext {
        chart_type,
        input,
        headers: &headers,
        buckets: &buckets,
        rows: &rows,
        colors: &colors,
        settings,
        matcher,
    };
    let options = builder_for(chart_type).build(&ctx);

    tracing::debug!(
        target: "chartwright::options",
        series = options.data.series.len(),
        categories = options.data.categories.len(),
        "chart options built"
    );
    Ok(options)
}
