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

use crate::options::{ChartData, ChartOptions};
use crate::settings::PipelineSettings;
use serde::Serialize;

/// Series and category ceilings for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLimits {
    pub series: usize,
    pub categories: usize,
}

impl DataLimits {
    /// Pie and donut draw a single series and cap their slices.
    pub fn for_options(options: &ChartOptions, settings: &PipelineSettings) -> Self {
        if options.chart_type.is_pie_like() {
            DataLimits {
                series: 1,
                categories: settings.categories_limit.min(settings.proportion_categories_limit),
            }
        } else {
            DataLimits {
                series: settings.series_limit,
                categories: settings.categories_limit,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValidation {
    pub data_too_large: bool,
    pub has_negative_value: bool,
}

impl DataValidation {
    pub fn is_renderable(&self) -> bool {
        !self.data_too_large && !self.has_negative_value
    }
}

pub fn is_data_of_reasonable_size(data: &ChartData, limits: DataLimits) -> bool {
    data.series.len() <= limits.series && data.categories.len() <= limits.categories
}

pub fn has_negative_value(data: &ChartData) -> bool {
    data.series
        .iter()
        .flat_map(|series| series.data.iter())
        .any(|point| point.value().is_some_and(|v| v < 0.0))
}

/// Flags data the renderer cannot draw sensibly. Negative values only matter
/// for pie and donut.
pub fn validate_data(settings: &PipelineSettings, options: &ChartOptions) -> DataValidation {
    let limits = DataLimits::for_options(options, settings);
    let validation = DataValidation {
        data_too_large: !is_data_of_reasonable_size(&options.data, limits),
        has_negative_value: options.chart_type.is_pie_like() && has_negative_value(&options.data),
    };
    if !validation.is_renderable() {
        tracing::warn!(
            target: "chartwright::pipeline",
            chart_type = %options.chart_type,
            series = options.data.series.len(),
            categories = options.data.categories.len(),
            data_too_large = validation.data_too_large,
            has_negative_value = validation.has_negative_value,
            "chart data failed validation"
        );
    }
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::tests_support::Fixture;
    use crate::ChartType;

    #[test]
    fn test_small_column_passes() {
        let options = Fixture::new(ChartType::Column)
            .measures(&[("Amount", "#,##0")])
            .view_by("Region", &["East", "West"])
            .rows(&[&[Some(-1.0), Some(2.0)]])
            .build();
        let validation = validate_data(&PipelineSettings::default(), &options);
        assert_eq!(validation, DataValidation::default());
    }

    #[test]
    fn test_pie_with_negative_slice() {
        let options = Fixture::new(ChartType::Pie)
            .measures(&[("Amount", "#,##0")])
            .view_by("Region", &["East", "West"])
            .rows(&[&[Some(-1.0), Some(2.0)]])
            .build();
        let validation = validate_data(&PipelineSettings::default(), &options);
        assert!(validation.has_negative_value);
        assert!(!validation.data_too_large);
        assert!(!validation.is_renderable());
    }

    #[test]
    fn test_pie_category_limit_is_tighter() {
        let names: Vec<String> = (0..21).map(|i| format!("r{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let values: Vec<Option<f64>> = (0..21).map(|i| Some(f64::from(i))).collect();
        let pie = Fixture::new(ChartType::Pie)
            .measures(&[("Amount", "#,##0")])
            .view_by("Region", &refs)
            .rows(&[&values])
            .build();
        assert!(validate_data(&PipelineSettings::default(), &pie).data_too_large);

        let column = Fixture::new(ChartType::Column)
            .measures(&[("Amount", "#,##0")])
            .view_by("Region", &refs)
            .rows(&[&values])
            .build();
        assert!(!validate_data(&PipelineSettings::default(), &column).data_too_large);
    }

    #[test]
    fn test_series_limit_from_settings() {
        let mut fixture = Fixture::new(ChartType::Line)
            .measures(&[("A", "#,##0"), ("B", "#,##0")])
            .view_by("Region", &["East"])
            .rows(&[&[Some(1.0)], &[Some(2.0)]]);
        fixture.settings.series_limit = 1;
        let settings = fixture.settings.clone();
        let options = fixture.build();
        assert!(validate_data(&settings, &options).data_too_large);
    }
}
