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

//! Point tooltips. The options builder picks a [`TooltipSpec`] per chart
//! family; the renderer later supplies the hovered [`HoverPoint`].

use crate::chart_type::ChartType;
use crate::escape::custom_escape;
use crate::format::NumberFormat;
use serde::{Deserialize, Serialize};

/// Title and items of an attribute axis, as needed to label heatmap cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeAxis {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureLabel {
    pub name: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TooltipSpec {
    /// Series name and value, preceded by the attribute row when there is one.
    Categorical {
        chart_type: ChartType,
        attribute_title: Option<String>,
    },
    /// Bin range row, then the series value.
    Histogram {
        bin_title: String,
        attribute_title: Option<String>,
    },
    Heatmap {
        view_by: Option<AttributeAxis>,
        stack_by: Option<AttributeAxis>,
    },
    Sankey {
        from_title: Option<String>,
        to_title: Option<String>,
    },
    /// One row per coordinate measure, in x, y, z order.
    Xy {
        attribute_title: Option<String>,
        measures: Vec<Option<MeasureLabel>>,
    },
    Bullet,
    Pareto {
        attribute_title: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HoverSeries {
    pub name: String,
    pub format: Option<String>,
    pub format_x: Option<String>,
    #[serde(rename = "formatGD")]
    pub format_gd: Option<String>,
}

/// The hovered point as the rendering engine reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HoverPoint {
    pub x: Option<f64>,
    pub x2: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub value: Option<f64>,
    pub weight: Option<f64>,
    pub sum: Option<f64>,
    pub target: Option<f64>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub format: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub color: Option<String>,
    pub series: HoverSeries,
}

type Row = (String, String);

impl TooltipSpec {
    pub fn render(&self, point: &HoverPoint, number_format: &dyn NumberFormat) -> String {
        let fmt = |value: Option<f64>, pattern: Option<&str>| {
            custom_escape(&number_format.format(value, pattern.unwrap_or_default()))
        };
        let series_name = custom_escape(&point.series.name);
        let point_name = custom_escape(point.name.as_deref().unwrap_or_default());

        let rows: Vec<Row> = match self {
            TooltipSpec::Categorical {
                chart_type,
                attribute_title,
            } => {
                let value = fmt(point.y.or(point.value), point.format.as_deref());
                let mut rows = vec![(series_name, value)];
                match attribute_title {
                    Some(title) if *chart_type == ChartType::Treemap => {
                        rows.insert(0, (custom_escape(title), point_name));
                    }
                    Some(title) => {
                        let label = point.category.as_deref().or(point.name.as_deref());
                        rows.insert(0, (custom_escape(title), custom_escape(label.unwrap_or_default())));
                    }
                    None if chart_type.points_are_measures() => rows[0].0 = point_name,
                    None => {}
                }
                rows
            }
            TooltipSpec::Histogram {
                bin_title,
                attribute_title,
            } => {
                let value = fmt(point.y.or(point.value), point.format.as_deref());
                let mut rows = vec![(series_name, value)];
                if let Some(title) = attribute_title {
                    let label = point.category.as_deref().or(point.name.as_deref());
                    rows.insert(0, (custom_escape(title), custom_escape(label.unwrap_or_default())));
                }
                let format_x = point.series.format_x.as_deref();
                let range = format!("{} - {}", fmt(point.x, format_x), fmt(point.x2, format_x));
                rows.insert(0, (custom_escape(bin_title), range));
                rows
            }
            TooltipSpec::Heatmap { view_by, stack_by } => {
                let mut rows = Vec::with_capacity(3);
                let item_at = |axis: &AttributeAxis, index: Option<f64>| {
                    index
                        .filter(|i| *i >= 0.0)
                        .and_then(|i| axis.items.get(i as usize))
                        .map(|name| custom_escape(name))
                        .unwrap_or_default()
                };
                if let Some(axis) = stack_by {
                    rows.push((custom_escape(&axis.title), item_at(axis, point.y)));
                }
                if let Some(axis) = view_by {
                    rows.push((custom_escape(&axis.title), item_at(axis, point.x)));
                }
                rows.push((series_name, fmt(point.value, point.series.format_gd.as_deref())));
                rows
            }
            TooltipSpec::Sankey {
                from_title,
                to_title,
            } => {
                let format_gd = point.series.format_gd.as_deref();
                match point.weight.filter(|w| !w.is_nan()) {
                    // a node: the renderer reports the summed flow instead of a weight
                    None => vec![(series_name, fmt(point.sum, format_gd))],
                    Some(weight) => {
                        let mut rows = Vec::with_capacity(3);
                        if let Some(title) = from_title {
                            let from = custom_escape(point.from.as_deref().unwrap_or_default());
                            rows.push((custom_escape(title), from));
                        }
                        if let Some(title) = to_title {
                            let to = custom_escape(point.to.as_deref().unwrap_or_default());
                            rows.push((custom_escape(title), to));
                        }
                        rows.push((series_name, fmt(Some(weight), format_gd)));
                        rows
                    }
                }
            }
            TooltipSpec::Xy {
                attribute_title,
                measures,
            } => {
                let mut rows = Vec::with_capacity(4);
                if let Some(title) = attribute_title {
                    rows.push((custom_escape(title), point_name));
                }
                let coordinates = [point.x, point.y, point.z];
                for (measure, value) in measures.iter().zip(coordinates) {
                    if let Some(measure) = measure {
                        rows.push((custom_escape(&measure.name), fmt(value, Some(&measure.format))));
                    }
                }
                rows
            }
            TooltipSpec::Bullet => {
                let format_gd = point.series.format_gd.as_deref();
                let mut rows = Vec::with_capacity(2);
                if point.y.is_some_and(|y| y != 0.0) {
                    rows.push((series_name, fmt(point.y, format_gd)));
                }
                if point.target.is_some_and(|t| t != 0.0) {
                    rows.push(("Target".to_string(), fmt(point.target, format_gd)));
                }
                rows
            }
            TooltipSpec::Pareto { attribute_title } => {
                let mut rows = Vec::with_capacity(2);
                if let Some(title) = attribute_title {
                    let label = point.name.as_deref().or(point.category.as_deref());
                    rows.push((custom_escape(title), custom_escape(label.unwrap_or_default())));
                }
                rows.push((series_name, fmt(point.y, point.series.format.as_deref())));
                rows
            }
        };

        table(&rows)
    }
}

fn table(rows: &[Row]) -> String {
    let body = rows
        .iter()
        .map(|(title, value)| {
            format!("<tr><td class=\"title\">{title}</td><td class=\"value\">{value}</td></tr>")
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("<table class=\"tt-values\">{body}</table>")
}
