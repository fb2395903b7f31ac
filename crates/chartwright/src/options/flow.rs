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

use super::{BuildContext, Categories, ChartOptions, DataPoint, OptionsBuilder, Series};
use crate::buckets::BucketRole;
use crate::tooltip::TooltipSpec;

/// Sankey: one `[from, to, weight]` link per result row. The first
/// dimension must hold exactly two attributes.
pub struct SankeyBuilder;

impl OptionsBuilder for SankeyBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let group = ctx.measure_group();
        let attributes = ctx.headers.first_dimension_attributes();

        let (data, tooltip) = match attributes {
            [from, to] => {
                let links = ctx
                    .input
                    .execution_result_data
                    .leading_values()
                    .into_iter()
                    .enumerate()
                    .map(|(row, weight)| DataPoint::Link(from.item_name(row), to.item_name(row), weight))
                    .collect();
                let tooltip = TooltipSpec::Sankey {
                    from_title: Some(from.form_of_name().to_string()),
                    to_title: Some(to.form_of_name().to_string()),
                };
                (links, tooltip)
            }
            _ => {
                tracing::debug!(
                    target: "chartwright::options",
                    attributes = attributes.len(),
                    "sankey needs exactly two attributes; leaving series empty"
                );
                let tooltip = TooltipSpec::Sankey {
                    from_title: None,
                    to_title: None,
                };
                (Vec::new(), tooltip)
            }
        };

        let series = Series {
            name: group.name(0),
            color: Some(ctx.default_color(0)),
            legend_index: Some(0),
            data,
            format_gd: Some(
                ctx.buckets
                    .first(BucketRole::Primary)
                    .map(|index| group.format(index))
                    .unwrap_or_default(),
            ),
            ..Default::default()
        };

        ChartOptions::new(ctx.chart_type, ctx.settings.color_palette.clone(), tooltip)
            .with_data(vec![series], Categories::Flat(vec![String::new()]))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::tests_support::Fixture;
    use crate::options::DataPoint;
    use crate::ChartType;

    #[test]
    fn test_links_follow_rows() {
        let options = Fixture::new(ChartType::Sankey)
            .measures(&[("Visits", "#,##0")])
            .bucket("measures", &[0])
            .stack_by("Source", &["Home", "Home"])
            .stack_by("Target", &["Cart", "Exit"])
            .rows(&[&[Some(40.0)], &[Some(60.0)]])
            .build();
        let series = &options.data.series[0];
        assert_eq!(
            series.data[1],
            DataPoint::Link("Home".into(), "Exit".into(), Some(60.0))
        );
        assert_eq!(series.format_gd.as_deref(), Some("#,##0"));
    }

    #[test]
    fn test_single_attribute_yields_empty_series() {
        let options = Fixture::new(ChartType::Sankey)
            .measures(&[("Visits", "#,##0")])
            .stack_by("Source", &["Home"])
            .rows(&[&[Some(40.0)]])
            .build();
        assert!(options.data.series[0].data.is_empty());
    }
}
