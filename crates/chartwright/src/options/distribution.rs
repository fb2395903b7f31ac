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

//! Histogram and pareto read the first data row as a flat value list. The
//! renderer derives the bins and the cumulative line from the hidden base
//! series (`baseSeries: 1`).

use super::{BuildContext, Categories, ChartOptions, DataPoint, OptionsBuilder, Series, Titles};
use crate::headers::is_percent_format;
use crate::tooltip::TooltipSpec;

pub const CUMULATIVE_PERCENTAGE_FORMAT: &str = "##.0\\%";

fn raw_values(ctx: &BuildContext<'_>) -> Vec<DataPoint> {
    ctx.first_row().iter().map(|v| DataPoint::Value(*v)).collect()
}

pub struct HistogramBuilder;

impl OptionsBuilder for HistogramBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let group = ctx.measure_group();
        let series = vec![
            Series {
                name: "Count".to_string(),
                base_series: Some(1),
                z_index: Some(-1),
                color: Some(ctx.default_color(0)),
                legend_index: Some(0),
                format_x: Some(group.format(0)),
                ..Default::default()
            },
            Series {
                name: "Data".to_string(),
                data: raw_values(ctx),
                legend_index: Some(1),
                color: Some(ctx.default_color(1)),
                visible: Some(false),
                ..Default::default()
            },
        ];

        let tooltip = TooltipSpec::Histogram {
            bin_title: group.name(0),
            attribute_title: ctx.stack_by().map(|s| s.form_of_name().to_string()),
        };
        let mut options = ChartOptions::new(ctx.chart_type, ctx.colors.to_vec(), tooltip);
        options.title = Titles {
            x: Some(group.name(0)),
            x_format: Some(group.format(0)),
            ..Default::default()
        };
        options.with_data(series, Categories::Flat(Vec::new()))
    }
}

pub struct ParetoBuilder;

impl OptionsBuilder for ParetoBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let group = ctx.measure_group();
        let series = vec![
            Series {
                name: "Cumulative percentage".to_string(),
                base_series: Some(1),
                z_index: Some(10),
                color: Some(ctx.default_color(1)),
                format: Some(CUMULATIVE_PERCENTAGE_FORMAT.to_string()),
                legend_index: Some(1),
                ..Default::default()
            },
            Series {
                name: group.name(0),
                data: raw_values(ctx),
                color: Some(ctx.default_color(0)),
                format: Some(group.format(0)),
                legend_index: Some(0),
                ..Default::default()
            },
        ];

        let tooltip = TooltipSpec::Pareto {
            attribute_title: ctx.view_by().map(|v| v.form_of_name().to_string()),
        };
        let mut options = ChartOptions::new(ctx.chart_type, ctx.colors.to_vec(), tooltip);
        options.title = Titles {
            x: Some(ctx.view_by().map(|v| v.form_of_name().to_string()).unwrap_or_default()),
            x_format: Some(group.format(0)),
            ..Default::default()
        };
        options.show_in_percent = is_percent_format(&group.format(0));
        options.with_data(series, Categories::Nested(vec![ctx.view_by_names_or_blank()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::tests_support::Fixture;
    use crate::ChartType;

    #[test]
    fn test_histogram_scaffold() {
        let options = Fixture::new(ChartType::Histogram)
            .measures(&[("Duration", "#,##0.0")])
            .rows(&[&[Some(1.5), Some(2.0), None]])
            .build();
        let series = &options.data.series;
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].base_series, Some(1));
        assert!(series[0].data.is_empty());
        assert_eq!(series[1].data.len(), 3);
        assert_eq!(series[1].visible, Some(false));
        assert_eq!(options.title.x.as_deref(), Some("Duration"));
        assert!(options.data.categories.is_empty());
    }

    #[test]
    fn test_pareto_percent_measure() {
        let options = Fixture::new(ChartType::Pareto)
            .measures(&[("Share", "#,##0.0%")])
            .view_by("Quarter", &["Q1", "Q2", "Q3"])
            .rows(&[&[Some(0.5), Some(0.3), Some(0.2)]])
            .build();
        assert!(options.show_in_percent);
        assert_eq!(options.data.series[0].format.as_deref(), Some(CUMULATIVE_PERCENTAGE_FORMAT));
        assert_eq!(options.data.series[1].name, "Share");
        assert_eq!(options.data.categories, Categories::Nested(vec![vec![
            "Q1".to_string(),
            "Q2".to_string(),
            "Q3".to_string()
        ]]));
    }
}
