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

use super::{
    BuildContext, Categories, ChartOptions, DataPoint, Marker, OptionsBuilder, Series, SeriesPoint,
    Stacking, Titles,
};
use crate::buckets::BucketRole;
use crate::chart_type::ChartType;
use crate::drill;
use crate::headers::ResolvedAttribute;
use crate::tooltip::TooltipSpec;

/// Bar, column, line, area, the combo charts and waterfall.
pub struct CategoricalBuilder;

impl OptionsBuilder for CategoricalBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let chart_type = ctx.chart_type;
        let mut series = drill::annotate(generic_series(ctx), &ctx.drill_scope());
        let mut categories = generic_categories(ctx);
        let mut options = generic_frame(ctx);

        match chart_type {
            ChartType::ColumnLine => {
                for index in ctx.buckets.get(BucketRole::Secondary).unwrap_or(&[]) {
                    if let Some(s) = series.get_mut(*index) {
                        s.series_type = Some("line".to_string());
                    }
                }
                combo_percent_flags(ctx, &mut options);
            }
            ChartType::DualAxis => {
                let has_primary = ctx.buckets.has(BucketRole::Primary);
                for index in ctx.buckets.get(BucketRole::Secondary).unwrap_or(&[]) {
                    if let Some(s) = series.get_mut(*index) {
                        s.series_type = Some("line".to_string());
                        if has_primary {
                            s.y_axis = Some(1);
                            options.dual_axis = true;
                        }
                    }
                }
                combo_percent_flags(ctx, &mut options);
            }
            ChartType::ColumnArea => {
                for index in ctx.buckets.get(BucketRole::Secondary).unwrap_or(&[]) {
                    if let Some(s) = series.get_mut(*index) {
                        s.series_type = Some("area".to_string());
                        s.z_index = Some(-1);
                    }
                }
            }
            ChartType::Waterfall => {
                categories = Categories::Flat(ctx.measure_group().names());
                if let Some(first) = series.first_mut() {
                    first.up_color = Some(ctx.settings.waterfall_up_color.clone());
                }
            }
            _ => {}
        }

        options.with_data(series, categories)
    }
}

/// Stacking, legend layout, titles, percent flag and tooltip shared by the
/// series-per-measure charts.
pub(crate) fn generic_frame(ctx: &BuildContext<'_>) -> ChartOptions {
    let config = ctx.config();
    let group = ctx.measure_group();
    let chart_type = ctx.chart_type;

    let x = config
        .x_label
        .clone()
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| {
            ctx.view_by()
                .map(|v| v.form_of_name().to_string())
                .unwrap_or_default()
        });
    // a single measure names the value axis; several measures leave it blank
    let y = config
        .y_label
        .clone()
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| if group.len() == 1 { group.name(0) } else { String::new() });
    let y_format = config
        .y_format
        .clone()
        .filter(|format| !format.is_empty())
        .unwrap_or_else(|| group.format(0));

    let tooltip = TooltipSpec::Categorical {
        chart_type,
        attribute_title: ctx.view_by().map(|v| v.form_of_name().to_string()),
    };
    let mut options = ChartOptions::new(chart_type, ctx.colors.to_vec(), tooltip);
    options.stacking = (ctx.stack_by().is_some() && chart_type != ChartType::Line)
        .then_some(Stacking::Normal);
    options.legend_layout = config
        .legend_layout
        .clone()
        .unwrap_or_else(|| "horizontal".to_string());
    options.title = Titles {
        x: Some(x),
        y: Some(y),
        y_format: Some(y_format),
        ..Default::default()
    };
    options.show_in_percent = group.any_percent();
    options
}

fn combo_percent_flags(ctx: &BuildContext<'_>, options: &mut ChartOptions) {
    let group = ctx.measure_group();
    options.show_in_percent_measures = ctx.buckets.any_percent(BucketRole::Primary, group);
    options.show_in_percent_secondary = ctx.buckets.any_percent(BucketRole::Secondary, group);
}

/// One series per data row. Rows are measures, or stack-by items when a
/// stacking attribute is present.
pub(crate) fn generic_series(ctx: &BuildContext<'_>) -> Vec<Series> {
    let group = ctx.measure_group();
    let chart_type = ctx.chart_type;
    let view_by = ctx.view_by();
    let stack_by = ctx.stack_by();
    let measures_as_points = chart_type.points_are_measures() && view_by.is_none();

    ctx.rows
        .iter()
        .enumerate()
        .map(|(series_index, row)| {
            let data = row
                .iter()
                .enumerate()
                .map(|(point_index, value)| {
                    let measure_index = if stack_by.is_some() {
                        0
                    } else if measures_as_points {
                        point_index
                    } else {
                        series_index
                    };
                    let name = match (stack_by, view_by) {
                        (Some(stack_by), _) => stack_by.item_name(series_index),
                        (None, Some(view_by)) if chart_type.points_are_measures() => {
                            view_by.item_name(point_index)
                        }
                        _ => group.name(measure_index),
                    };
                    let proportion = chart_type.is_proportion();
                    DataPoint::Point(SeriesPoint {
                        y: *value,
                        format: group.format(measure_index),
                        marker: Marker {
                            enabled: value.is_some() && row.len() <= ctx.settings.marker_max_points,
                        },
                        name,
                        color: proportion.then(|| ctx.color(point_index)),
                        legend_index: proportion.then_some(point_index),
                        drilldown: false,
                        drill_context: None,
                    })
                })
                .collect();

            let name = match stack_by {
                Some(stack_by) => stack_by.item_name(series_index),
                None if measures_as_points && chart_type.is_proportion() => {
                    group.names().join(", ")
                }
                None => group.name(series_index),
            };

            Series {
                name,
                color: Some(ctx.color(series_index)),
                legend_index: Some(series_index),
                data,
                ..Default::default()
            }
        })
        .collect()
}

/// View-by item names; measure names for measure-only proportion charts.
pub(crate) fn generic_categories(ctx: &BuildContext<'_>) -> Categories {
    if let Some(view_by) = ctx.view_by() {
        return Categories::Flat(ResolvedAttribute::item_names(view_by));
    }
    if ctx.chart_type.is_proportion() {
        return Categories::Flat(ctx.measure_group().names());
    }
    Categories::Flat(Vec::new())
}
