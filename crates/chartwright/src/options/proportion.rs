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

use super::categorical::{generic_categories, generic_frame, generic_series};
use super::{BuildContext, Categories, ChartOptions, DataPoint, OptionsBuilder};
use crate::drill;
use std::cmp::Ordering;

/// Pie, donut and funnel.
pub struct ProportionBuilder;

impl OptionsBuilder for ProportionBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let mut series = drill::annotate(generic_series(ctx), &ctx.drill_scope());
        let mut categories = generic_categories(ctx);

        if let Some(first) = series.first_mut() {
            let (points, order) = sort_descending(std::mem::take(&mut first.data));
            first.data = points;
            categories = permute(categories, &order);
        }

        generic_frame(ctx).with_data(series, categories)
    }
}

/// Stable sort by value, largest first, missing values counting as zero.
/// The sorted point at position `i` takes the colour of the original point at
/// `i` and legend index `i`, so colours follow rank. Returns the original
/// index of each sorted point.
pub fn sort_descending(points: Vec<DataPoint>) -> (Vec<DataPoint>, Vec<usize>) {
    let original_colors: Vec<Option<String>> = points
        .iter()
        .map(|p| p.as_point().and_then(|p| p.color.clone()))
        .collect();

    let mut indexed: Vec<(usize, DataPoint)> = points.into_iter().enumerate().collect();
    indexed.sort_by(|(_, a), (_, b)| {
        let a = a.value().unwrap_or(0.0);
        let b = b.value().unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });

    let order: Vec<usize> = indexed.iter().map(|(index, _)| *index).collect();
    let sorted = indexed
        .into_iter()
        .enumerate()
        .map(|(position, (_, point))| match point {
            DataPoint::Point(mut point) => {
                point.color = original_colors.get(position).cloned().flatten();
                point.legend_index = Some(position);
                DataPoint::Point(point)
            }
            other => other,
        })
        .collect();
    (sorted, order)
}

fn permute(categories: Categories, order: &[usize]) -> Categories {
    match categories {
        Categories::Flat(items) => {
            if items.len() != order.len() {
                tracing::warn!(
                    target: "chartwright::options",
                    categories = items.len(),
                    points = order.len(),
                    "category count differs from point count, categories left unsorted"
                );
                return Categories::Flat(items);
            }
            Categories::Flat(order.iter().map(|&i| items[i].clone()).collect())
        }
        nested => nested,
    }
}
