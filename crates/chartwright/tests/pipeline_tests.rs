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

use chartwright::tooltip::HoverSeries;
use chartwright::{
    ChartConfigError, ChartInput, ChartPipeline, FormatterKind, HoverPoint, InputError, LabelContext,
    TooltipAnchor,
};
use serde_json::{json, Value};

fn attribute_header(name: &str, id: &str) -> Value {
    json!({ "attributeHeader": {
        "name": format!("{name} name"),
        "localIdentifier": id,
        "uri": format!("/gdc/md/p/obj/{id}"),
        "identifier": format!("label.{id}"),
        "formOf": { "name": name, "uri": format!("/gdc/md/p/obj/{id}/attr"), "identifier": format!("attr.{id}") }
    }})
}

fn items(id: &str, names: &[&str]) -> Value {
    Value::Array(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                json!({ "attributeHeaderItem": {
                    "name": name,
                    "uri": format!("/gdc/md/p/obj/{id}/elements?id={i}")
                }})
            })
            .collect(),
    )
}

fn measure_group(measures: &[(&str, &str, &str)]) -> Value {
    let items: Vec<Value> = measures
        .iter()
        .map(|(id, name, format)| {
            json!({ "measureHeaderItem": { "name": name, "format": format, "localIdentifier": id } })
        })
        .collect();
    json!({ "measureGroupHeader": { "items": items } })
}

fn measure_items(measures: &[(&str, &str, &str)]) -> Value {
    Value::Array(
        measures
            .iter()
            .enumerate()
            .map(|(order, (_, name, _))| json!({ "measureHeaderItem": { "name": name, "order": order } }))
            .collect(),
    )
}

fn simple_measures(measures: &[(&str, &str, &str)]) -> Vec<Value> {
    measures
        .iter()
        .map(|(id, _, _)| {
            json!({
                "localIdentifier": id,
                "definition": { "measure": { "item": { "uri": format!("/gdc/md/p/obj/{id}") } } }
            })
        })
        .collect()
}

fn input(value: Value) -> ChartInput {
    serde_json::from_value(value).expect("valid chart input")
}

/// Measures on dimension 0, one view-by attribute on dimension 1.
fn measures_by_attribute(chart_type: &str, measures: &[(&str, &str, &str)], view_by: &[&str], data: Value) -> Value {
    json!({
        "afm": {
            "measures": simple_measures(measures),
            "attributes": [{ "localIdentifier": "region", "displayForm": { "uri": "/gdc/md/p/obj/region" } }]
        },
        "dimensions": [
            { "headers": [measure_group(measures)] },
            { "headers": [attribute_header("Region", "region")] }
        ],
        "headerItems": [[measure_items(measures)], [items("region", view_by)]],
        "executionResultData": data,
        "config": { "type": chart_type }
    })
}

#[test]
fn test_heatmap_two_by_three_covers_every_cell() {
    let measures = [("m1", "Amount", "#,##0")];
    let chart = input(json!({
        "afm": { "measures": simple_measures(&measures) },
        "dimensions": [
            { "headers": [attribute_header("Row", "row")] },
            { "headers": [attribute_header("Col", "col"), measure_group(&measures)] }
        ],
        "headerItems": [
            [items("row", &["X", "Y", "Z"])],
            [items("col", &["A", "B"]), measure_items(&measures)]
        ],
        "executionResultData": [["1", "2"], ["3", "4"], ["5", "6"]],
        "config": { "type": "heatmap" }
    }));

    let config = ChartPipeline::default().build(&chart).unwrap();
    let tree = config.tree();
    let cells = tree["series"][0]["data"].as_array().unwrap();
    assert_eq!(cells.len(), 6);

    let mut seen: Vec<(u64, u64)> = cells
        .iter()
        .map(|cell| (cell[0].as_u64().unwrap(), cell[1].as_u64().unwrap()))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    assert_eq!(cells[5], json!([1, 2, 6.0]));

    assert_eq!(tree["series"][0]["dataLabels"]["enabled"], true);
    assert_eq!(tree["xAxis"]["categories"], json!(["A", "B"]));
    assert_eq!(tree["yAxis"]["categories"], json!(["X", "Y", "Z"]));
    assert_eq!(tree["plotOptions"]["heatmap"]["dataLabels"]["formatter"], "heatmapLabel");
    assert_eq!(tree["chart"]["type"], "heatmap");
}

#[test]
fn test_pareto_percent_measure() {
    let measures = [("m1", "Share", "#,##0.0%")];
    let chart = input(measures_by_attribute(
        "pareto",
        &measures,
        &["Q1", "Q2", "Q3"],
        json!([["0.5", "0.3", "0.2"]]),
    ));
    let pipeline = ChartPipeline::default();

    let options = pipeline.build_options(&chart).unwrap();
    assert!(options.show_in_percent);
    assert_eq!(options.data.series.len(), 2);
    assert_eq!(options.data.series[0].format.as_deref(), Some("##.0\\%"));
    assert_eq!(options.data.series[1].name, "Share");

    let tree = pipeline.build(&chart).unwrap().into_tree();
    assert_eq!(tree["xAxis"]["categories"], json!(["Q1", "Q2", "Q3"]));
    assert_eq!(tree["yAxis"][1]["labels"]["format"], "{value}%");
}

#[test]
fn test_bullet_target_and_bands() {
    let measures = [
        ("actual", "Actual", "#,##0"),
        ("target", "Target", "#,##0"),
        ("low", "Low", "#,##0"),
        ("high", "High", "#,##0"),
    ];
    let chart = input(json!({
        "afm": { "measures": simple_measures(&measures) },
        "dimensions": [{ "headers": [measure_group(&measures)] }, { "headers": [] }],
        "headerItems": [[measure_items(&measures)], []],
        "executionResultData": [["70", "100", "50", "90"]],
        "config": { "type": "bullet" },
        "mdObject": { "buckets": [
            { "localIdentifier": "measures", "items": [{ "measure": { "localIdentifier": "actual" } }] },
            { "localIdentifier": "secondary", "items": [{ "measure": { "localIdentifier": "target" } }] },
            { "localIdentifier": "range", "items": [
                { "measure": { "localIdentifier": "low" } },
                { "measure": { "localIdentifier": "high" } }
            ] }
        ] }
    }));

    let tree = ChartPipeline::default().build(&chart).unwrap().into_tree();
    assert_eq!(tree["series"][0]["data"][0], json!({ "y": 70.0, "target": 100.0 }));
    let bands = tree["yAxis"]["plotBands"].as_array().unwrap();
    assert_eq!(bands.len(), 2);
    assert_eq!(bands[0], json!({ "from": 0.0, "to": 50.0, "color": "rgba(0,0,0,0.4)" }));
    assert_eq!(bands[1], json!({ "from": 50.0, "to": 90.0, "color": "rgba(0,0,0,0.2)" }));
    assert_eq!(tree["yAxis"]["softMax"], 90.0);
    assert_eq!(tree["chart"]["inverted"], true);
}

#[test]
fn test_pie_sorts_points_with_categories() {
    let measures = [("m1", "Amount", "#,##0")];
    let chart = input(measures_by_attribute(
        "pie",
        &measures,
        &["East", "West", "North"],
        json!([["10", "30", "20"]]),
    ));
    let config = ChartPipeline::default().build(&chart).unwrap();
    let tree = config.tree();
    let names: Vec<&str> = tree["series"][0]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["West", "North", "East"]);
    assert_eq!(tree["xAxis"]["categories"], json!(["West", "North", "East"]));
    assert_eq!(config.legend_items()[0].name, "West");
    assert!(config.validation().is_renderable());
}

#[test]
fn test_derived_measure_is_lighter_source_colour() {
    let measures = [("m1", "Revenue", "#,##0"), ("m2", "Revenue last year", "#,##0")];
    let mut value = measures_by_attribute("column", &measures, &["East"], json!([["1"], ["2"]]));
    value["afm"]["measures"][1]["definition"] = json!({ "popMeasure": { "measureIdentifier": "m1" } });
    let chart = input(value);

    let tree = ChartPipeline::default().build(&chart).unwrap().into_tree();
    assert_eq!(tree["series"][0]["color"], "rgb(20,178,226)");
    assert_eq!(tree["series"][1]["color"], "rgb(161,224,243)");
}

#[test]
fn test_drillable_measure_marks_points_and_series() {
    let measures = [("m1", "Revenue", "#,##0"), ("m2", "Cost", "#,##0")];
    let mut value = measures_by_attribute("column", &measures, &["East", "West"], json!([["1", "2"], ["3", "4"]]));
    value["drillableItems"] = json!([{ "uri": "/gdc/md/p/obj/m1" }]);
    let chart = input(value);

    let options = ChartPipeline::default().build_options(&chart).unwrap();
    let first = options.data.series[0].data[1].as_point().unwrap();
    assert!(first.drilldown);
    let context = first.drill_context.as_ref().unwrap();
    assert_eq!(context.len(), 2);
    assert_eq!(context[0].id, "m1");
    assert_eq!(context[1].value, "West");
    assert_eq!(context[1].id, "1");
    assert!(options.data.series[0].is_drillable);
    assert!(!options.data.series[1].is_drillable);

    let tree = ChartPipeline::default().build(&chart).unwrap().into_tree();
    assert_eq!(tree["series"][0]["states"]["hover"]["enabled"], true);
    assert_eq!(tree["series"][1]["states"]["hover"]["enabled"], false);
}

#[test]
fn test_legend_flags_hide_series() {
    let measures = [("m1", "Revenue", "#,##0"), ("m2", "Cost", "#,##0")];
    let mut value = measures_by_attribute("line", &measures, &["East"], json!([["1"], ["2"]]));
    value["legendItemsEnabled"] = json!([true, false]);
    let tree = ChartPipeline::default().build(&input(value)).unwrap().into_tree();
    assert_eq!(tree["series"][0]["visible"], true);
    assert_eq!(tree["series"][1]["visible"], false);
    assert_eq!(tree["yAxis"]["title"]["style"]["textOverflow"], "ellipsis");
}

#[test]
fn test_unsupported_type_is_rejected() {
    let measures = [("m1", "Amount", "#,##0")];
    let chart = input(measures_by_attribute("radar", &measures, &["East"], json!([["1"]])));
    let err = ChartPipeline::default().build(&chart).unwrap_err();
    assert!(matches!(
        err,
        ChartConfigError::Input(InputError::UnsupportedChartType { ref chart_type, .. }) if chart_type == "radar"
    ));
    assert!(err.is_programmer_error());
}

#[test]
fn test_missing_measure_group_is_rejected() {
    let chart = input(json!({
        "dimensions": [{ "headers": [attribute_header("Region", "region")] }],
        "headerItems": [[items("region", &["East"])]],
        "executionResultData": [["1"]],
        "config": { "type": "column" }
    }));
    let err = ChartPipeline::default().build(&chart).unwrap_err();
    assert!(matches!(err, ChartConfigError::Input(InputError::MissingMeasureGroup)));
}

#[test]
fn test_tooltip_and_label_formatters() {
    let measures = [("m1", "Revenue", "#,##0")];
    let chart = input(measures_by_attribute("column", &measures, &["East"], json!([["1234"]])));
    let config = ChartPipeline::default().build(&chart).unwrap();

    let html = config.render_tooltip(&HoverPoint {
        y: Some(1234.0),
        format: Some("#,##0".into()),
        category: Some("East".into()),
        color: Some("rgb(20,178,226)".into()),
        series: HoverSeries {
            name: "Revenue".into(),
            ..Default::default()
        },
        ..Default::default()
    });
    assert!(html.contains("border-top-color: rgb(20,178,226);"));
    assert!(html.contains("<tr><td class=\"title\">Region</td><td class=\"value\">East</td></tr>"));
    assert!(html.contains("<tr><td class=\"title\">Revenue</td><td class=\"value\">1,234</td></tr>"));

    let label = config.render_label(
        FormatterKind::DataLabel,
        &LabelContext {
            value: Some(1234.0),
            format: Some("#,##0".into()),
            ..Default::default()
        },
    );
    assert_eq!(label.as_deref(), Some("1,234"));
}

#[test]
fn test_tooltip_arrow_follows_point_position() {
    let measures = [("m1", "Revenue", "#,##0")];
    let chart = input(measures_by_attribute("column", &measures, &["East"], json!([["1234"]])));
    let config = ChartPipeline::default().build(&chart).unwrap();
    let point = HoverPoint {
        y: Some(1234.0),
        format: Some("#,##0".into()),
        category: Some("East".into()),
        series: HoverSeries {
            name: "Revenue".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    let at = |plot_x: f64| {
        config.render_tooltip_at(
            &point,
            &TooltipAnchor {
                plot_x,
                plot_width: 500.0,
                ..Default::default()
            },
        )
    };

    let left = at(10.0);
    assert!(left.contains("<div class=\"tail1 left\"></div>"));
    assert!(left.contains("<td class=\"value\">1,234</td>"));
    assert!(at(490.0).contains("<div class=\"tail1 right\"></div>"));
    assert!(at(250.0).contains("<div class=\"tail2 center\"></div>"));
}
