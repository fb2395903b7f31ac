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

use super::{BuildContext, Categories, ChartOptions, DataPoint, OptionsBuilder, Series, TreemapNode};
use crate::tooltip::TooltipSpec;
use indexmap::IndexSet;
use serde_json::json;

pub struct TreemapBuilder;

impl OptionsBuilder for TreemapBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let group = ctx.measure_group();
        let attributes = ctx.headers.first_dimension_attributes();
        let values = ctx.input.execution_result_data.leading_values();
        let format = group.format(0);

        let data: Vec<DataPoint> = match attributes {
            [leaves] => values
                .iter()
                .enumerate()
                .map(|(row, value)| {
                    DataPoint::Node(TreemapNode {
                        name: leaves.item_name(row),
                        value: *value,
                        format: Some(format.clone()),
                        ..Default::default()
                    })
                })
                .collect(),
            [parents, children] => {
                let parent_names: IndexSet<String> =
                    parents.items.iter().map(|item| item.name.clone()).collect();
                let parent_nodes = parent_names.iter().enumerate().map(|(index, name)| {
                    DataPoint::Node(TreemapNode {
                        name: name.clone(),
                        id: Some(index.to_string()),
                        color: Some(ctx.default_color(index)),
                        ..Default::default()
                    })
                });
                let child_nodes = values.iter().enumerate().map(|(row, value)| {
                    let parent = parent_names
                        .get_index_of(&parents.item_name(row))
                        .map(|index| index.to_string());
                    DataPoint::Node(TreemapNode {
                        name: children.item_name(row),
                        parent,
                        value: *value,
                        format: Some(format.clone()),
                        ..Default::default()
                    })
                });
                parent_nodes.chain(child_nodes).collect()
            }
            _ => {
                tracing::debug!(
                    target: "chartwright::options",
                    attributes = attributes.len(),
                    "treemap needs one or two attributes; leaving series empty"
                );
                Vec::new()
            }
        };

        let levels = (attributes.len() == 2).then(|| {
            json!([{
                "level": 1,
                "layoutAlgorithm": "sliceAndDice",
                "dataLabels": {
                    "enabled": true,
                    "align": "left",
                    "verticalAlign": "top",
                    "style": { "fontSize": "15px", "fontWeight": "bold" }
                }
            }])
        });

        let series = Series {
            name: group.name(0),
            color: Some(ctx.default_color(0)),
            legend_index: Some(0),
            data,
            levels,
            ..Default::default()
        };

        let tooltip = TooltipSpec::Categorical {
            chart_type: ctx.chart_type,
            attribute_title: attributes.first().map(|a| a.form_of_name().to_string()),
        };
        ChartOptions::new(ctx.chart_type, ctx.colors.to_vec(), tooltip)
            .with_data(vec![series], Categories::Flat(vec![String::new()]))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::tests_support::Fixture;
    use crate::options::DataPoint;
    use crate::ChartType;

    #[test]
    fn test_two_attributes_build_parents_then_children() {
        let options = Fixture::new(ChartType::Treemap)
            .measures(&[("Amount", "#,##0")])
            .stack_by("Region", &["East", "East", "West"])
            .stack_by("City", &["Boston", "Albany", "Reno"])
            .rows(&[&[Some(5.0)], &[Some(3.0)], &[Some(9.0)]])
            .build();
        let series = &options.data.series[0];
        assert_eq!(series.data.len(), 5);
        let DataPoint::Node(west) = &series.data[1] else { panic!("expected node") };
        assert_eq!((west.name.as_str(), west.id.as_deref()), ("West", Some("1")));
        let DataPoint::Node(reno) = &series.data[4] else { panic!("expected node") };
        assert_eq!(reno.parent.as_deref(), Some("1"));
        assert_eq!(reno.value, Some(9.0));
        assert!(series.levels.is_some());
    }

    #[test]
    fn test_single_attribute_builds_leaves() {
        let options = Fixture::new(ChartType::Treemap)
            .measures(&[("Amount", "#,##0")])
            .stack_by("Region", &["East", "West"])
            .rows(&[&[Some(5.0)], &[Some(3.0)]])
            .build();
        let series = &options.data.series[0];
        assert_eq!(series.data.len(), 2);
        assert!(series.levels.is_none());
    }

    #[test]
    fn test_three_attributes_leave_series_empty() {
        let options = Fixture::new(ChartType::Treemap)
            .measures(&[("Amount", "#,##0")])
            .stack_by("A", &["a"])
            .stack_by("B", &["b"])
            .stack_by("C", &["c"])
            .rows(&[&[Some(1.0)]])
            .build();
        assert!(options.data.series[0].data.is_empty());
    }
}
