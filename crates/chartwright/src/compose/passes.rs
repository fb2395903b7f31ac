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

//! Customisation passes. Each pass reads the options and the tree built by
//! the passes before it, and returns a fragment that is merged onto that
//! tree.

use super::formatters::FormatterKind;
use super::templates::{AXIS_LABEL_COLOR, AXIS_LABEL_FONT, AXIS_TITLE_COLOR, AXIS_TITLE_FONT, GRID_LINE_COLOR};
use crate::chart_type::{ChartType, HoverStyle};
use crate::color::lighter_color;
use crate::escape::escape_angle_brackets;
use crate::options::{Categories, ChartOptions};
use crate::settings::PipelineSettings;
use serde_json::{json, Map, Value};

/// Read-only inputs shared by every pass.
pub struct PassInput<'a> {
    pub options: &'a ChartOptions,
    pub settings: &'a PipelineSettings,
    /// `options.data.series` already serialised.
    pub series: &'a [Value],
}

pub type Pass = fn(&PassInput<'_>, &Value) -> Value;

/// The passes in the order they must run.
pub const PASSES: [(&str, Pass); 8] = [
    ("title", title),
    ("stacking", stacking),
    ("percent-axis", percent_axis),
    ("labels", labels),
    ("data", data),
    ("tooltip", tooltip),
    ("hover-styles", hover_styles),
    ("dual-axis", dual_axis),
];

pub fn title(input: &PassInput<'_>, _tree: &Value) -> Value {
    let titles = &input.options.title;
    json!({
        "yAxis": { "title": { "text": escape_angle_brackets(titles.y.as_deref().unwrap_or_default()) } },
        "xAxis": { "title": { "text": escape_angle_brackets(titles.x.as_deref().unwrap_or_default()) } }
    })
}

pub fn stacking(input: &PassInput<'_>, _tree: &Value) -> Value {
    match input.options.stacking {
        Some(stacking) => json!({
            "plotOptions": { "series": { "stacking": stacking } },
            "yAxis": { "stackLabels": { "formatter": FormatterKind::StackLabel.as_str() } }
        }),
        None => json!({}),
    }
}

pub fn percent_axis(input: &PassInput<'_>, _tree: &Value) -> Value {
    let percent = json!({ "labels": { "formatter": FormatterKind::Percent.as_str() } });
    let mut fragment = Map::new();
    if input.options.show_in_percent_x {
        fragment.insert("xAxis".to_string(), percent.clone());
    }
    if input.options.show_in_percent {
        fragment.insert("yAxis".to_string(), percent);
    }
    Value::Object(fragment)
}

pub fn labels(input: &PassInput<'_>, _tree: &Value) -> Value {
    let stacked = input.options.stacking.is_some();
    let style = if stacked {
        json!({ "color": "#ffffff", "textShadow": "0 0 1px #000000" })
    } else {
        json!({ "color": "#000000", "textShadow": "none" })
    };
    let data_labels = |formatter: FormatterKind| {
        json!({ "dataLabels": { "formatter": formatter.as_str(), "style": style, "allowOverlap": false } })
    };

    let mut fragment = json!({
        "drilldown": {},
        "plotOptions": {
            "bar": data_labels(FormatterKind::DataLabel),
            "column": data_labels(FormatterKind::DataLabel),
            "bullet": data_labels(FormatterKind::BulletLabel),
            "funnel": data_labels(FormatterKind::FunnelLabel)
        },
        "yAxis": {}
    });
    if stacked {
        fragment["drilldown"] = json!({ "activeDataLabelStyle": { "color": "#ffffff" } });
    }
    if let Some(format) = &input.options.title.y_format {
        fragment["yAxis"] = json!({ "defaultFormat": format });
    }
    fragment
}

/// Types whose series and categories reach the renderer exactly as built.
fn keeps_raw_series(chart_type: ChartType) -> bool {
    matches!(
        chart_type,
        ChartType::Sankey
            | ChartType::Pareto
            | ChartType::Histogram
            | ChartType::Scatter
            | ChartType::Bubble
            | ChartType::Bullet
            | ChartType::WordCloud
            | ChartType::Heatmap
            | ChartType::Treemap
    )
}

fn keeps_raw_categories(chart_type: ChartType) -> bool {
    matches!(
        chart_type,
        ChartType::Sankey
            | ChartType::Pareto
            | ChartType::Histogram
            | ChartType::Heatmap
            | ChartType::Bullet
            | ChartType::Waterfall
    )
}

/// Palette colour and escaped labels for one generic series.
fn restyle_series(mut series: Value, index: usize, palette: &[String]) -> Value {
    let Some(object) = series.as_object_mut() else {
        return series;
    };
    if !palette.is_empty() {
        object.insert("color".to_string(), json!(palette[index % palette.len()]));
    }
    if let Some(Value::String(name)) = object.get_mut("name") {
        *name = escape_angle_brackets(name);
    }
    if let Some(Value::Array(points)) = object.get_mut("data") {
        for point in points.iter_mut() {
            if let Some(Value::String(name)) = point.get_mut("name") {
                *name = escape_angle_brackets(name);
            }
        }
    }
    series
}

fn axis_list(categories: &Categories, index: usize) -> Vec<String> {
    match categories {
        Categories::Nested(lists) => lists.get(index).cloned().unwrap_or_default(),
        Categories::Flat(items) if index == 0 => items.clone(),
        Categories::Flat(_) => Vec::new(),
    }
}

/// Whether any category label survives; nested lists count as present.
fn has_labels(categories: &Categories) -> bool {
    match categories {
        Categories::Flat(items) => items.iter().any(|item| !item.is_empty()),
        Categories::Nested(lists) => !lists.is_empty(),
    }
}

fn escape_categories(categories: &Categories) -> Categories {
    match categories {
        Categories::Flat(items) => Categories::Flat(items.iter().map(|c| escape_angle_brackets(c)).collect()),
        Categories::Nested(lists) => Categories::Nested(
            lists
                .iter()
                .map(|list| list.iter().map(|c| escape_angle_brackets(c)).collect())
                .collect(),
        ),
    }
}

fn categories_value(categories: &Categories) -> Value {
    match categories {
        Categories::Flat(items) => json!(items),
        Categories::Nested(lists) => json!(lists),
    }
}

pub fn data(input: &PassInput<'_>, _tree: &Value) -> Value {
    let options = input.options;
    let chart_type = options.chart_type;

    let mut series: Vec<Value> = if keeps_raw_series(chart_type) {
        input.series.to_vec()
    } else {
        input
            .series
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, s)| restyle_series(s, index, &options.color_palette))
            .collect()
    };
    let categories = if keeps_raw_categories(chart_type) {
        options.data.categories.clone()
    } else {
        escape_categories(&options.data.categories)
    };

    if chart_type == ChartType::Waterfall {
        if let Some(first) = series.first_mut().and_then(Value::as_object_mut) {
            first.insert("color".to_string(), json!(input.settings.waterfall_color));
        }
    }

    let labels_enabled = has_labels(&categories);
    match chart_type {
        ChartType::WordCloud => json!({
            "series": series,
            "xAxis": { "categories": categories_value(&categories) }
        }),
        ChartType::Histogram | ChartType::Treemap | ChartType::Scatter | ChartType::Bubble => {
            json!({ "series": series })
        }
        ChartType::Pareto => json!({
            "series": series,
            "xAxis": { "categories": axis_list(&categories, 0) }
        }),
        ChartType::Bullet => {
            let bands = options
                .data
                .bands
                .as_ref()
                .and_then(|rows| rows.first())
                .cloned()
                .unwrap_or_default();
            let soft_max = bands.last().map_or(json!(0), |band| json!(band.to));
            json!({
                "series": series,
                "xAxis": {
                    "labels": { "enabled": labels_enabled },
                    "categories": axis_list(&categories, 0)
                },
                "yAxis": { "plotBands": bands, "softMax": soft_max }
            })
        }
        ChartType::Sankey => json!({
            "plotOptions": { "sankey": { "colors": input.settings.color_palette } },
            "series": series
        }),
        ChartType::Heatmap => json!({
            "series": series,
            "xAxis": {
                "labels": { "enabled": labels_enabled },
                "categories": axis_list(&categories, 0)
            },
            "yAxis": {
                "labels": { "enabled": labels_enabled },
                "categories": axis_list(&categories, 1)
            },
            "plotOptions": {
                "heatmap": { "dataLabels": { "formatter": FormatterKind::HeatmapLabel.as_str() } }
            }
        }),
        _ => json!({
            "series": series,
            "xAxis": {
                "labels": { "enabled": labels_enabled },
                "categories": categories_value(&categories)
            }
        }),
    }
}

pub fn tooltip(_input: &PassInput<'_>, _tree: &Value) -> Value {
    json!({
        "tooltip": {
            "borderWidth": 0,
            "borderRadius": 0,
            "shadow": false,
            "useHTML": true,
            "positioner": FormatterKind::TooltipPositioner.as_str(),
            "formatter": FormatterKind::Tooltip.as_str()
        }
    })
}

fn is_drillable(series: &Value) -> bool {
    series.get("isDrillable").and_then(Value::as_bool).unwrap_or(false)
}

pub fn hover_styles(input: &PassInput<'_>, tree: &Value) -> Value {
    let settings = input.settings;
    let series = tree.get("series").and_then(Value::as_array).cloned().unwrap_or_default();

    let styled: Vec<Value> = match input.options.chart_type.hover_style() {
        HoverStyle::Halo => series
            .iter()
            .map(|s| {
                if is_drillable(s) {
                    let color = s.get("color").and_then(Value::as_str).unwrap_or_default();
                    json!({
                        "marker": {
                            "states": {
                                "hover": { "fillColor": lighter_color(color, settings.hover_brightness) }
                            }
                        },
                        "cursor": "pointer"
                    })
                } else {
                    json!({ "states": { "hover": { "halo": { "size": 0 } } } })
                }
            })
            .collect(),
        HoverStyle::SeriesBrightness => series
            .iter()
            .map(|s| {
                json!({
                    "states": {
                        "hover": { "brightness": settings.hover_brightness, "enabled": is_drillable(s) }
                    }
                })
            })
            .collect(),
        HoverStyle::PointBrightness => series
            .iter()
            .map(|s| {
                let points = s.get("data").and_then(Value::as_array).cloned().unwrap_or_default();
                let styled_points: Vec<Value> = points
                    .iter()
                    .map(|point| {
                        if !point.is_object() {
                            return json!(null);
                        }
                        let drillable = point.get("drilldown").and_then(Value::as_bool).unwrap_or(false);
                        if drillable {
                            json!({ "states": { "hover": { "brightness": settings.hover_brightness } } })
                        } else {
                            json!({
                                "states": { "hover": { "brightness": settings.minimum_safe_brightness } },
                                "halo": { "size": 0 }
                            })
                        }
                    })
                    .collect();
                json!({ "data": styled_points })
            })
            .collect(),
    };
    json!({ "series": without_null_points(styled) })
}

/// Non-object points (matrix cells, bare values) take no hover styling. A
/// `null` slot would overwrite the point when merged, so it becomes `{}`,
/// and a series of only such points gets no data fragment at all.
fn without_null_points(series: Vec<Value>) -> Vec<Value> {
    series
        .into_iter()
        .map(|mut s| {
            if let Some(Value::Array(points)) = s.get_mut("data") {
                if points.iter().all(Value::is_null) {
                    points.clear();
                } else {
                    for point in points.iter_mut().filter(|p| p.is_null()) {
                        *point = json!({});
                    }
                }
            }
            s
        })
        .collect()
}

fn axis_style() -> Value {
    json!({
        "gridLineColor": GRID_LINE_COLOR,
        "labels": { "style": { "color": AXIS_LABEL_COLOR, "font": AXIS_LABEL_FONT } },
        "title": { "margin": 15, "style": { "color": AXIS_TITLE_COLOR, "font": AXIS_TITLE_FONT } }
    })
}

fn series_name(tree: &Value, index: usize) -> String {
    tree.get("series")
        .and_then(|s| s.get(index))
        .and_then(|s| s.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn series_count(tree: &Value) -> usize {
    tree.get("series").and_then(Value::as_array).map_or(0, Vec::len)
}

pub fn dual_axis(input: &PassInput<'_>, tree: &Value) -> Value {
    let options = input.options;
    let merged = super::merge::merged;

    if options.chart_type == ChartType::Pareto {
        let primary = merged(axis_style(), json!({ "title": { "text": series_name(tree, 1) } }));
        let cumulative = merged(
            axis_style(),
            json!({
                "opposite": true,
                "title": { "text": series_name(tree, 0) },
                "minPadding": 0,
                "maxPadding": 0,
                "max": 100,
                "min": 0,
                "labels": { "format": "{value}%" }
            }),
        );
        return json!({ "yAxis": [primary, cumulative] });
    }

    if !options.dual_axis {
        return json!({});
    }

    let (left_title, right_title) = if series_count(tree) == 2 {
        (series_name(tree, 0), series_name(tree, 1))
    } else {
        ("Columns".to_string(), "Lines".to_string())
    };
    let percent = |enabled: bool| {
        if enabled {
            json!({ "labels": { "formatter": FormatterKind::Percent.as_str() } })
        } else {
            json!({})
        }
    };
    let left = merged(
        merged(axis_style(), json!({ "title": { "text": left_title } })),
        percent(options.show_in_percent_measures),
    );
    let right = merged(
        merged(axis_style(), json!({ "opposite": true, "title": { "text": right_title } })),
        percent(options.show_in_percent_secondary),
    );
    json!({ "yAxis": [left, right] })
}
