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

//! Support for the external legend: the items it lists and the visibility it
//! owns.

use crate::chart_type::ChartType;
use crate::options::ChartOptions;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendItem {
    pub name: String,
    pub color: String,
    pub legend_index: usize,
}

/// One item per point for proportion charts, one per series otherwise.
/// Entries without a legend index are not listed.
pub fn legend_items(options: &ChartOptions) -> Vec<LegendItem> {
    if options.chart_type.is_proportion() {
        options
            .data
            .series
            .first()
            .map(|series| {
                series
                    .data
                    .iter()
                    .filter_map(|point| point.as_point())
                    .filter_map(|point| {
                        Some(LegendItem {
                            name: point.name.clone(),
                            color: point.color.clone().unwrap_or_default(),
                            legend_index: point.legend_index?,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    } else {
        options
            .data
            .series
            .iter()
            .filter_map(|series| {
                Some(LegendItem {
                    name: series.name.clone(),
                    color: series.color.clone().unwrap_or_default(),
                    legend_index: series.legend_index?,
                })
            })
            .collect()
    }
}

fn clip_title(axis: &mut Value) {
    if let Some(object) = axis.as_object_mut() {
        let title = object.entry("title").or_insert_with(|| json!({}));
        if let Some(title) = title.as_object_mut() {
            let style = title.entry("style").or_insert_with(|| json!({}));
            if let Some(style) = style.as_object_mut() {
                style.insert("textOverflow".to_string(), json!("ellipsis"));
                style.insert("overflow".to_string(), json!("hidden"));
            }
        }
    }
}

/// Applies the legend's enabled flags to the tree. Items are looked up by
/// their `legendIndex` (their position when they have none); flags missing
/// from `enabled` mean visible. Histogram visibility is fixed by its
/// template and left alone.
pub fn apply_legend_visibility(mut tree: Value, chart_type: ChartType, enabled: &[bool]) -> Value {
    match tree.get_mut("yAxis") {
        Some(Value::Array(axes)) => axes.iter_mut().for_each(clip_title),
        Some(axis) => clip_title(axis),
        None => {}
    }

    if chart_type == ChartType::Histogram {
        return tree;
    }

    let items = if chart_type.is_proportion() {
        tree.pointer_mut("/series/0/data")
    } else {
        tree.pointer_mut("/series")
    };
    if let Some(Value::Array(items)) = items {
        for (position, item) in items.iter_mut().enumerate() {
            let Some(object) = item.as_object_mut() else {
                continue;
            };
            let index = object
                .get("legendIndex")
                .and_then(Value::as_u64)
                .map_or(position, |i| i as usize);
            let visible = enabled.get(index).copied().unwrap_or(true);
            object.insert("visible".to_string(), json!(visible));
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::tests_support::Fixture;

    #[test]
    fn test_items_follow_series_or_points() {
        let column = Fixture::new(ChartType::Column)
            .measures(&[("Amount", "#,##0"), ("Count", "#,##0")])
            .view_by("Region", &["East", "West"])
            .rows(&[&[Some(1.0), Some(2.0)], &[Some(3.0), Some(4.0)]])
            .build();
        let items = legend_items(&column);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "Count");
        assert_eq!(items[1].legend_index, 1);

        let pie = Fixture::new(ChartType::Pie)
            .measures(&[("Amount", "#,##0")])
            .view_by("Region", &["East", "West", "North"])
            .rows(&[&[Some(1.0), Some(5.0), Some(3.0)]])
            .build();
        let items = legend_items(&pie);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "West");
    }

    #[test]
    fn test_visibility_defaults_to_visible() {
        let tree = json!({
            "yAxis": { "title": { "text": "Amount" } },
            "series": [{ "legendIndex": 0 }, { "legendIndex": 1 }, { "legendIndex": 2 }]
        });
        let tree = apply_legend_visibility(tree, ChartType::Column, &[true, false]);
        assert_eq!(tree["series"][0]["visible"], true);
        assert_eq!(tree["series"][1]["visible"], false);
        assert_eq!(tree["series"][2]["visible"], true);
        assert_eq!(tree["yAxis"]["title"]["style"]["textOverflow"], "ellipsis");
    }

    #[test]
    fn test_pie_toggles_points_and_dual_axes_clip() {
        let tree = json!({
            "yAxis": [{ "title": { "text": "a" } }, { "title": { "text": "b" } }],
            "series": [{ "data": [{ "legendIndex": 1 }, { "legendIndex": 0 }] }]
        });
        let tree = apply_legend_visibility(tree, ChartType::Donut, &[false, true]);
        assert_eq!(tree["series"][0]["data"][0]["visible"], true);
        assert_eq!(tree["series"][0]["data"][1]["visible"], false);
        assert_eq!(tree["yAxis"][1]["title"]["style"]["overflow"], "hidden");
    }

    #[test]
    fn test_histogram_left_alone() {
        let tree = json!({ "series": [{}, { "visible": false }] });
        let tree = apply_legend_visibility(tree, ChartType::Histogram, &[true, true]);
        assert_eq!(tree["series"][1]["visible"], false);
        assert!(tree["series"][0].get("visible").is_none());
    }
}
