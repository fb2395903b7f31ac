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

use super::{BuildContext, Categories, ChartOptions, DataPoint, OptionsBuilder, Series, WordPoint};
use crate::tooltip::TooltipSpec;

pub struct WordCloudBuilder;

impl OptionsBuilder for WordCloudBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> ChartOptions {
        let group = ctx.measure_group();
        let view_by = ctx.view_by();

        // without a view-by attribute each word is a measure
        let data = ctx
            .first_row()
            .iter()
            .enumerate()
            .map(|(index, value)| {
                DataPoint::Word(WordPoint {
                    weight: *value,
                    y: *value,
                    name: match view_by {
                        Some(view_by) => view_by.item_name(index),
                        None => group.name(index),
                    },
                })
            })
            .collect();

        let series = Series {
            name: group.name(0),
            color: Some(ctx.color(0)),
            legend_index: Some(0),
            data,
            ..Default::default()
        };

        let tooltip = TooltipSpec::Categorical {
            chart_type: ctx.chart_type,
            attribute_title: view_by.map(|v| v.form_of_name().to_string()),
        };
        ChartOptions::new(ctx.chart_type, ctx.colors.to_vec(), tooltip)
            .with_data(vec![series], Categories::Flat(ctx.view_by_names_or_blank()))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::tests_support::Fixture;
    use crate::options::{DataPoint, WordPoint};
    use crate::ChartType;

    #[test]
    fn test_words_weighted_by_value() {
        let options = Fixture::new(ChartType::WordCloud)
            .measures(&[("Mentions", "#,##0")])
            .view_by("Keyword", &["rust", "serde"])
            .rows(&[&[Some(12.0), Some(4.0)]])
            .build();
        assert_eq!(
            options.data.series[0].data[1],
            DataPoint::Word(WordPoint {
                weight: Some(4.0),
                y: Some(4.0),
                name: "serde".into()
            })
        );
        assert_eq!(options.data.categories.primary(), ["rust", "serde"]);
    }

    #[test]
    fn test_measures_become_words_without_view_by() {
        let options = Fixture::new(ChartType::WordCloud)
            .measures(&[("Likes", "#,##0"), ("Shares", "#,##0")])
            .rows(&[&[Some(3.0), Some(8.0)]])
            .build();
        let DataPoint::Word(second) = &options.data.series[0].data[1] else {
            panic!("expected a word");
        };
        assert_eq!(second.name, "Shares");
        assert_eq!(options.data.categories.primary(), [""]);
    }
}
