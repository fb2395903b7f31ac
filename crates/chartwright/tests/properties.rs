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

use chartwright::compose::merge::{merge_all, merged};
use chartwright::{ChartInput, ChartPipeline};
use proptest::prelude::*;
use serde_json::{json, Value};

fn single_measure_chart(chart_type: &str, values: &[Option<f64>]) -> ChartInput {
    let names: Vec<String> = (0..values.len()).map(|i| format!("c{i}")).collect();
    let items: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "attributeHeaderItem": { "name": name, "uri": format!("/obj/7/elements?id={i}") } }))
        .collect();
    serde_json::from_value(json!({
        "afm": {
            "measures": [{ "localIdentifier": "m1", "definition": { "measure": { "item": { "uri": "/obj/1" } } } }],
            "attributes": [{ "localIdentifier": "a1", "displayForm": { "uri": "/obj/7" } }]
        },
        "dimensions": [
            { "headers": [{ "measureGroupHeader": { "items": [
                { "measureHeaderItem": { "name": "Amount", "format": "#,##0.00", "localIdentifier": "m1" } }
            ] } }] },
            { "headers": [{ "attributeHeader": {
                "name": "Stage name", "localIdentifier": "a1", "uri": "/obj/7",
                "identifier": "label.stage", "formOf": { "name": "Stage" }
            } }] }
        ],
        "headerItems": [
            [[{ "measureHeaderItem": { "name": "Amount", "order": 0 } }]],
            [items]
        ],
        "executionResultData": [values],
        "config": { "type": chart_type }
    }))
    .unwrap()
}

fn cell() -> impl Strategy<Value = Option<f64>> {
    prop::option::weighted(0.9, -1000i32..1000).prop_map(|v| v.map(|v| f64::from(v) / 4.0))
}

proptest! {
    #[test]
    fn test_proportion_sort_keeps_points_and_categories_aligned(
        values in prop::collection::vec(cell(), 1..15),
        chart_type in prop::sample::select(vec!["pie", "donut", "funnel"])
    ) {
        let chart = single_measure_chart(chart_type, &values);
        let config = ChartPipeline::default().build(&chart).unwrap();
        let tree = config.tree();
        let points = tree["series"][0]["data"].as_array().unwrap();
        let categories = tree["xAxis"]["categories"].as_array().unwrap();
        prop_assert_eq!(points.len(), values.len());
        prop_assert_eq!(categories.len(), values.len());

        let mut previous = f64::INFINITY;
        for (position, (point, category)) in points.iter().zip(categories).enumerate() {
            prop_assert_eq!(&point["name"], category);
            let name = point["name"].as_str().unwrap();
            let original: usize = name.trim_start_matches('c').parse().unwrap();
            let y = point["y"].as_f64();
            prop_assert_eq!(y, values[original]);

            let rank_value = y.unwrap_or(0.0);
            prop_assert!(rank_value <= previous);
            previous = rank_value;
            prop_assert_eq!(point["legendIndex"].as_u64(), Some(position as u64));
        }
    }

    #[test]
    fn test_builds_are_deterministic(
        values in prop::collection::vec(cell(), 1..10),
        chart_type in prop::sample::select(vec!["column", "bar", "line", "area", "pie", "waterfall", "dualaxis"])
    ) {
        let chart = single_measure_chart(chart_type, &values);
        let pipeline = ChartPipeline::default();
        let first = pipeline.build(&chart).unwrap().into_tree();
        let second = pipeline.build(&chart).unwrap().into_tree();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_merge_with_empty_overlay_is_identity(
        entries in prop::collection::btree_map("[a-e]", -50i64..50, 0..6)
    ) {
        let base = json!(entries);
        prop_assert_eq!(merged(base.clone(), json!({})), base.clone());
        prop_assert_eq!(merge_all([json!({}), base.clone()]), base);
    }
}
