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

use super::{BuildContext, Categories, ChartOptions, DataPoint, OptionsBuilder, Series, Titles};
use crate::headers::ResolvedAttribute;
use crate::tooltip::{AttributeAxis, TooltipSpec};
use serde_json::json;

pub struct HeatmapBuilder;

fn axis(attribute: Option<&ResolvedAttribute>) -> Option<AttributeAxis> {
    attribute.map(|a| AttributeAxis {
        title: a.form_of_name().to_string(),
        items: a.item_names(),
    })
}

fn within(attribute: Option<&ResolvedAttribute>, limit: usize) -> bool {
    attribute.map_or(true, |a| a.len() <= limit)
}

impl OptionsBuilder for HeatmapBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let settings = ctx.settings;
        let group = ctx.measure_group();
        let view_by = ctx.view_by();
        let stack_by = ctx.stack_by();

        let data: Vec<DataPoint> = ctx
            .rows
            .iter()
            .enumerate()
            .flat_map(|(row, values)| {
                values
                    .iter()
                    .enumerate()
                    .map(move |(column, value)| DataPoint::Cell(column, row, *value))
            })
            .collect();

        let labels_enabled = within(view_by, settings.heatmap_label_max_view_by)
            && within(stack_by, settings.heatmap_label_max_stack_by);
        let dense = !(within(view_by, settings.heatmap_border_max_items)
            && within(stack_by, settings.heatmap_border_max_items));

        let series = Series {
            name: group.name(0),
            color: Some(ctx.color(0)),
            legend_index: Some(0),
            data,
            turbo_threshold: Some(0),
            border_width: Some(if dense { 0 } else { 1 }),
            data_labels: Some(json!({
                "enabled": labels_enabled,
                "formatGD": group.format(0),
            })),
            ..Default::default()
        };

        let names_or_blank = |attribute: Option<&ResolvedAttribute>| {
            attribute
                .map(ResolvedAttribute::item_names)
                .unwrap_or_else(|| vec![String::new()])
        };
        let categories = Categories::Nested(vec![names_or_blank(view_by), names_or_blank(stack_by)]);

        let tooltip = TooltipSpec::Heatmap {
            view_by: axis(view_by),
            stack_by: axis(stack_by),
        };
        let mut options = ChartOptions::new(ctx.chart_type, ctx.colors.to_vec(), tooltip);
        options.title = Titles {
            x: Some(view_by.map(|v| v.form_of_name().to_string()).unwrap_or_default()),
            y: Some(stack_by.map(|s| s.form_of_name().to_string()).unwrap_or_default()),
            format: Some(group.format(0)),
            ..Default::default()
        };
        options.with_data(vec![series], categories)
    }
}

#[cfg(test)]
mod tests {
    use crate::options::tests_support::Fixture;
    use crate::options::{Categories, DataPoint};
    use crate::ChartType;

    fn grid(rows: usize, columns: usize) -> Fixture {
        let stack: Vec<String> = (0..rows).map(|i| format!("r{i}")).collect();
        let view: Vec<String> = (0..columns).map(|i| format!("c{i}")).collect();
        let stack_refs: Vec<&str> = stack.iter().map(String::as_str).collect();
        let view_refs: Vec<&str> = view.iter().map(String::as_str).collect();
        let data: Vec<Vec<Option<f64>>> = (0..rows)
            .map(|r| (0..columns).map(|c| Some((r * columns + c) as f64)).collect())
            .collect();
        let data_refs: Vec<&[Option<f64>]> = data.iter().map(Vec::as_slice).collect();
        Fixture::new(ChartType::Heatmap)
            .measures(&[("Amount", "#,##0")])
            .stack_by("Region", &stack_refs)
            .view_by("Month", &view_refs)
            .rows(&data_refs)
    }

    #[test]
    fn test_cells_are_column_row_value() {
        let options = grid(2, 2).build();
        let data = &options.data.series[0].data;
        assert_eq!(data[1], DataPoint::Cell(1, 0, Some(1.0)));
        assert_eq!(data[2], DataPoint::Cell(0, 1, Some(2.0)));
        assert!(matches!(options.data.categories, Categories::Nested(ref lists) if lists.len() == 2));
        assert_eq!(options.title.y.as_deref(), Some("Region"));
    }

    #[test]
    fn test_dense_grids_drop_labels_then_borders() {
        let options = grid(3, 7).build();
        let series = &options.data.series[0];
        assert_eq!(series.data_labels.as_ref().unwrap()["enabled"], false);
        assert_eq!(series.border_width, Some(1));

        let options = grid(31, 2).build();
        assert_eq!(options.data.series[0].border_width, Some(0));
    }
}
