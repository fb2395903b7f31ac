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

//! The configuration compositor: common template, then the chart type's
//! template, then the customisation passes, deep-merged in that order.

pub mod formatters;
pub mod merge;
pub mod passes;
pub mod templates;

use crate::error::Result;
use crate::options::ChartOptions;
use crate::settings::PipelineSettings;
use passes::{PassInput, PASSES};
use serde_json::{Map, Value};

/// Runs the passes in order, each one seeing the merged output of the
/// passes before it.
pub fn customized_configuration(options: &ChartOptions, settings: &PipelineSettings) -> Result<Value> {
    let series = options
        .data
        .series
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let input = PassInput {
        options,
        settings,
        series: &series,
    };

    let mut tree = Value::Object(Map::new());
    for (name, pass) in PASSES {
        let fragment = pass(&input, &tree);
        tracing::trace!(target: "chartwright::compose", pass = name, "customisation pass applied");
        tree = merge::merged(tree, fragment);
    }
    Ok(tree)
}

/// The complete configuration tree for the rendering engine.
pub fn compose_configuration(options: &ChartOptions, settings: &PipelineSettings) -> Result<Value> {
    let customized = customized_configuration(options, settings)?;
    let tree = merge::merge_all([
        templates::common_template(settings),
        templates::type_template(options.chart_type, settings),
        customized,
    ]);
    let series = tree.get("series").and_then(Value::as_array).map_or(0, Vec::len);
    tracing::debug!(
        target: "chartwright::compose",
        chart_type = %options.chart_type,
        series,
        "configuration composed"
    );
    Ok(tree)
}
