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

//! Charts that read fixed measure roles from the query buckets instead of
//! iterating series.

use super::{
    Band, BuildContext, BulletPoint, Categories, ChartOptions, DataPoint, OptionsBuilder, Series,
    Titles, XyPoint,
};
use crate::buckets::BucketRole;
use crate::chart_type::ChartType;
use crate::tooltip::{MeasureLabel, TooltipSpec};
use serde_json::json;

fn cell(row: &[Option<f64>], index: usize) -> Option<f64> {
    row.get(index).copied().flatten()
}

/// Value of the role's first measure, `0` when the bucket is absent.
fn coordinate(ctx: &BuildContext<'_>, role: BucketRole, row: &[Option<f64>]) -> Option<f64> {
    match ctx.buckets.first(role) {
        Some(index) => cell(row, index),
        None => Some(0.0),
    }
}

fn role_label(ctx: &BuildContext<'_>, role: BucketRole) -> Option<MeasureLabel> {
    let group = ctx.measure_group();
    ctx.buckets.first(role).map(|index| MeasureLabel {
        name: group.name(index),
        format: group.format(index),
    })
}

/// Scatter and bubble.
pub struct XyBuilder;

impl OptionsBuilder for XyBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let group = ctx.measure_group();
        let bubble = ctx.chart_type == ChartType::Bubble;
        let stack_by = ctx.stack_by();

        let data = ctx
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                DataPoint::Xy(XyPoint {
                    x: coordinate(ctx, BucketRole::Primary, row),
                    y: coordinate(ctx, BucketRole::Secondary, row),
                    z: bubble.then(|| coordinate(ctx, BucketRole::Size, row)),
                    name: stack_by.map(|s| s.item_name(index)).unwrap_or_default(),
                })
            })
            .collect();

        let series = Series {
            name: String::new(),
            color: Some(ctx.color(0)),
            legend_index: Some(0),
            data,
            data_labels: bubble.then(|| json!({ "enabled": true, "format": "{point.name}" })),
            ..Default::default()
        };

        let mut measures = vec![
            role_label(ctx, BucketRole::Primary),
            role_label(ctx, BucketRole::Secondary),
        ];
        if bubble {
            measures.push(role_label(ctx, BucketRole::Size));
        }
        let tooltip = TooltipSpec::Xy {
            attribute_title: stack_by.map(|s| s.form_of_name().to_string()),
            measures,
        };

        let name_of = |role| ctx.buckets.first(role).map(|i| group.name(i)).unwrap_or_default();
        let format_of = |role| ctx.buckets.first(role).map(|i| group.format(i)).unwrap_or_default();

        let mut options = ChartOptions::new(ctx.chart_type, ctx.colors.to_vec(), tooltip);
        options.title = Titles {
            x: Some(name_of(BucketRole::Primary)),
            y: Some(name_of(BucketRole::Secondary)),
            x_format: Some(format_of(BucketRole::Primary)),
            y_format: Some(format_of(BucketRole::Secondary)),
            ..Default::default()
        };
        options.show_in_percent = ctx.buckets.first_is_percent(BucketRole::Secondary, group);
        options.show_in_percent_x = ctx.buckets.first_is_percent(BucketRole::Primary, group);
        options.with_data(vec![series], Categories::Flat(vec![String::new()]))
    }
}

/// Band opacity by rank: the first band is the darkest.
fn band_opacity(rank: usize, count: usize) -> f64 {
    if count > 1 {
        0.4 * (count - rank) as f64 / count as f64
    } else {
        0.2
    }
}

/// Comparison bands for one row, walking the range measures in bucket order.
/// Each band starts where the previous one ended, the first one at zero.
pub fn bullet_bands(range: &[usize], row: &[Option<f64>]) -> Vec<Band> {
    let mut from = Some(0.0);
    range
        .iter()
        .enumerate()
        .map(|(rank, &index)| {
            let to = cell(row, index);
            let band = Band {
                from,
                to,
                color: format!("rgba(0,0,0,{})", band_opacity(rank, range.len())),
            };
            from = to;
            band
        })
        .collect()
}

pub struct BulletBuilder;

impl OptionsBuilder for BulletBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let group = ctx.measure_group();
        let primary = ctx.buckets.first(BucketRole::Primary);
        let secondary = ctx.buckets.first(BucketRole::Secondary);
        let range = ctx.buckets.get(BucketRole::Range).unwrap_or(&[]);

        let data = ctx
            .rows
            .iter()
            .map(|row| {
                DataPoint::Bullet(BulletPoint {
                    y: primary.and_then(|i| cell(row, i)),
                    target: secondary.and_then(|i| cell(row, i)),
                })
            })
            .collect();
        let bands = ctx.rows.iter().map(|row| bullet_bands(range, row)).collect();

        let name = primary.map(|i| group.name(i)).unwrap_or_default();
        let series = Series {
            name: name.clone(),
            color: Some(ctx.color(0)),
            legend_index: Some(0),
            data,
            data_labels: Some(json!({
                "enabled": true,
                "shadow": false,
                "style": { "textOutline": "none" }
            })),
            format_gd: Some(primary.map(|i| group.format(i)).unwrap_or_default()),
            ..Default::default()
        };

        let mut options = ChartOptions::new(ctx.chart_type, ctx.colors.to_vec(), TooltipSpec::Bullet);
        options.show_in_percent = ctx.buckets.first_is_percent(BucketRole::Primary, group);
        options.data.bands = Some(bands);
        options.with_data(
            vec![series],
            Categories::Nested(vec![vec![name], vec![String::new()]]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::tests_support::Fixture;

    #[test]
    fn test_scatter_defaults_missing_axis_to_zero() {
        let options = Fixture::new(ChartType::Scatter)
            .measures(&[("Spend", "#,##0"), ("Return", "#,##0.0%")])
            .bucket("secondary", &[1])
            .stack_by("Campaign", &["Spring", "Fall"])
            .rows(&[&[Some(10.0), Some(0.5)], &[Some(20.0), None]])
            .build();
        let DataPoint::Xy(first) = &options.data.series[0].data[0] else {
            panic!("expected xy point");
        };
        assert_eq!((first.x, first.y, first.z), (Some(0.0), Some(0.5), None));
        assert_eq!(first.name, "Spring");
        assert!(options.show_in_percent);
        assert!(!options.show_in_percent_x);
        assert_eq!(options.title.x.as_deref(), Some(""));
    }

    #[test]
    fn test_bubble_reads_size_bucket() {
        let options = Fixture::new(ChartType::Bubble)
            .measures(&[("X", "#,##0"), ("Y", "#,##0"), ("Size", "#,##0")])
            .bucket("measures", &[0])
            .bucket("secondary", &[1])
            .bucket("size", &[2])
            .stack_by("Name", &["a"])
            .rows(&[&[Some(1.0), Some(2.0), Some(3.0)]])
            .build();
        let DataPoint::Xy(point) = &options.data.series[0].data[0] else {
            panic!("expected xy point");
        };
        assert_eq!(point.z, Some(Some(3.0)));
        assert!(options.data.series[0].data_labels.is_some());
    }

    #[test]
    fn test_bullet_bands_accumulate_with_decreasing_opacity() {
        let bands = bullet_bands(&[2, 3], &[Some(70.0), Some(100.0), Some(50.0), Some(90.0)]);
        assert_eq!(bands.len(), 2);
        assert_eq!((bands[0].from, bands[0].to), (Some(0.0), Some(50.0)));
        assert_eq!((bands[1].from, bands[1].to), (Some(50.0), Some(90.0)));
        assert_eq!(bands[0].color, "rgba(0,0,0,0.4)");
        assert_eq!(bands[1].color, "rgba(0,0,0,0.2)");
        assert_eq!(bullet_bands(&[1], &[None, Some(5.0)])[0].color, "rgba(0,0,0,0.2)");
    }

    #[test]
    fn test_bullet_point_and_categories() {
        let options = Fixture::new(ChartType::Bullet)
            .measures(&[("Actual", "#,##0"), ("Target", "#,##0"), ("Low", "#,##0"), ("High", "#,##0")])
            .bucket("measures", &[0])
            .bucket("secondary", &[1])
            .bucket("range", &[2, 3])
            .rows(&[&[Some(70.0), Some(100.0), Some(50.0), Some(90.0)]])
            .build();
        assert_eq!(
            options.data.series[0].data[0],
            DataPoint::Bullet(BulletPoint { y: Some(70.0), target: Some(100.0) })
        );
        assert_eq!(
            options.data.categories,
            Categories::Nested(vec![vec!["Actual".to_string()], vec![String::new()]])
        );
        assert_eq!(options.data.bands.as_ref().unwrap()[0].len(), 2);
    }
}
