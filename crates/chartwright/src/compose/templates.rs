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

//! Static visual templates: the shared base and one per chart type.

use super::formatters::FormatterKind;
use crate::chart_type::ChartType;
use crate::settings::PipelineSettings;
use serde_json::{json, Value};

pub const AXIS_LABEL_COLOR: &str = "#94a1ad";
pub const AXIS_TITLE_COLOR: &str = "#6d7680";
pub const AXIS_LABEL_FONT: &str = "12px Avenir, \"Helvetica Neue\", Arial, sans-serif";
pub const AXIS_TITLE_FONT: &str = "14px Avenir, \"Helvetica Neue\", Arial, sans-serif";
pub const GRID_LINE_COLOR: &str = "#ebebeb";

/// Axis, legend and tooltip defaults shared by every chart type.
pub fn common_template(settings: &PipelineSettings) -> Value {
    let axis = json!({
        "labels": {
            "style": { "color": AXIS_LABEL_COLOR, "font": AXIS_LABEL_FONT }
        },
        "title": {
            "margin": 10,
            "style": { "color": AXIS_TITLE_COLOR, "font": AXIS_TITLE_FONT }
        }
    });
    json!({
        "credits": { "enabled": false },
        "title": { "text": null },
        "chart": {
            "animation": false,
            "style": { "fontFamily": "Avenir, \"Helvetica Neue\", Arial, sans-serif" }
        },
        "legend": { "enabled": false },
        "tooltip": {
            "enabled": true,
            "followPointer": true,
            "formatter": FormatterKind::Tooltip.as_str()
        },
        "plotOptions": {
            "series": {
                "animation": false,
                "enableMouseTracking": true,
                "turboThreshold": 10000,
                "maxPointWidth": settings.max_point_width
            }
        },
        "drilldown": {
            "activeDataLabelStyle": { "color": "#000000" },
            "activeAxisLabelStyle": { "color": AXIS_LABEL_COLOR, "textDecoration": "none" }
        },
        "xAxis": axis.clone(),
        "yAxis": super::merge::merged(axis, json!({
            "gridLineColor": GRID_LINE_COLOR,
            "stackLabels": { "enabled": true }
        }))
    })
}

fn line_like(chart_type: &str) -> Value {
    json!({
        "chart": { "type": chart_type },
        "plotOptions": {
            "series": {
                "marker": { "symbol": "circle", "radius": 4.5 },
                "lineWidth": 3,
                "fillOpacity": 0.3,
                "states": { "hover": { "lineWidth": 4 } },
                "dataLabels": { "style": { "fontWeight": "normal" } }
            }
        },
        "xAxis": { "categories": [] },
        "yAxis": { "stackLabels": { "enabled": false } }
    })
}

fn column_like(settings: &PipelineSettings, chart_type: &str) -> Value {
    let mut plot_options = serde_json::Map::new();
    plot_options.insert(
        chart_type.to_string(),
        json!({
            "dataLabels": { "enabled": true, "crop": false, "overflow": "none", "padding": 2 },
            "maxPointWidth": settings.max_point_width
        }),
    );
    plot_options.insert("series".to_string(), json!({ "states": { "hover": { "enabled": false } } }));
    json!({
        "chart": { "type": chart_type },
        "plotOptions": plot_options,
        "xAxis": { "categories": [] }
    })
}

fn combo(settings: &PipelineSettings) -> Value {
    json!({
        "chart": { "type": "column", "spacingTop": 20 },
        "plotOptions": {
            "column": {
                "dataLabels": { "enabled": true, "crop": false, "overflow": "none", "padding": 2 },
                "maxPointWidth": settings.max_point_width
            },
            "series": { "states": { "hover": { "enabled": false } } }
        }
    })
}

fn scatter_like(chart_type: &str) -> Value {
    let mut series_options = serde_json::Map::new();
    series_options.insert(
        chart_type.to_string(),
        json!({
            "marker": {
                "radius": 5,
                "states": { "hover": { "enabled": true, "lineColor": "rgb(100,100,100)" } }
            },
            "states": { "hover": { "marker": { "enabled": false } } }
        }),
    );
    series_options.insert("series".to_string(), json!({ "states": { "hover": { "enabled": false } } }));
    json!({
        "chart": { "type": chart_type, "zoomType": "xy" },
        "plotOptions": series_options
    })
}

/// The static template for one chart type.
pub fn type_template(chart_type: ChartType, settings: &PipelineSettings) -> Value {
    let max_color = settings
        .color_palette
        .first()
        .cloned()
        .unwrap_or_else(|| "rgb(20,178,226)".to_string());
    match chart_type {
        ChartType::Line => line_like("line"),
        ChartType::Area => super::merge::merged(
            line_like("area"),
            json!({ "plotOptions": { "area": { "stacking": "normal" } } }),
        ),
        ChartType::Column => column_like(settings, "column"),
        ChartType::Bar => column_like(settings, "bar"),
        ChartType::ColumnLine | ChartType::DualAxis => combo(settings),
        ChartType::ColumnArea => super::merge::merged(
            combo(settings),
            json!({ "plotOptions": { "area": { "fillOpacity": 0.3, "marker": { "enabled": false } } } }),
        ),
        ChartType::Pie => json!({
            "chart": { "type": "pie" },
            "plotOptions": {
                "pie": {
                    "allowPointSelect": false,
                    "dataLabels": { "enabled": false },
                    "showInLegend": true
                }
            },
            "legend": { "enabled": false }
        }),
        ChartType::Donut => json!({
            "chart": { "type": "pie" },
            "plotOptions": {
                "pie": {
                    "size": "100%",
                    "innerSize": "60%",
                    "allowPointSelect": false,
                    "dataLabels": { "enabled": false },
                    "showInLegend": true
                }
            },
            "legend": { "enabled": false }
        }),
        ChartType::Funnel => json!({
            "chart": { "type": "funnel", "spacingRight": 100 },
            "plotOptions": {
                "funnel": {
                    "neckWidth": "30%",
                    "neckHeight": "25%",
                    "dataLabels": { "enabled": true, "softConnector": true, "color": "#000000" },
                    "showInLegend": true
                }
            },
            "legend": { "enabled": false }
        }),
        ChartType::Waterfall => json!({
            "chart": { "type": "waterfall" },
            "legend": { "enabled": false }
        }),
        ChartType::Heatmap => json!({
            "chart": { "type": "heatmap", "marginTop": 45, "plotBorderWidth": 1 },
            "colorAxis": { "min": 0, "minColor": "#FFFFFF", "maxColor": max_color },
            "legend": {
                "enabled": true,
                "align": "right",
                "layout": "horizontal",
                "margin": 0,
                "verticalAlign": "top",
                "y": -25,
                "symbolWidth": 280,
                "symbolHeight": 10
            },
            "xAxis": { "categories": [] },
            "yAxis": {
                "categories": [],
                "labels": {
                    "autoRotation": [-90],
                    "formatter": FormatterKind::HeatmapCategory.as_str()
                }
            },
            "series": [{ "dataLabels": { "color": "#000000", "allowOverlap": false } }]
        }),
        ChartType::Treemap => json!({
            "chart": { "type": "treemap" },
            "plotOptions": {
                "treemap": {
                    "dataLabels": { "enabled": true, "color": "rgb(255,255,255)" },
                    "showInLegend": true
                }
            },
            "legend": { "enabled": false }
        }),
        ChartType::Sankey => json!({
            "chart": { "type": "sankey" },
            "plotOptions": {
                "sankey": {
                    "dataLabels": {
                        "color": "rgb(0,0,0)",
                        "borderWidth": 0,
                        "shadow": false,
                        "style": { "textOutline": "none" }
                    }
                }
            },
            "series": [{ "keys": ["from", "to", "weight"] }]
        }),
        ChartType::Histogram => json!({
            "chart": { "type": "histogram", "zoomType": "x" },
            "xAxis": { "alignTicks": false },
            "yAxis": { "title": { "text": "Count" } },
            "legend": { "enabled": false },
            "series": [{}, { "visible": false }]
        }),
        ChartType::Pareto => json!({
            "chart": { "type": "pareto", "zoomType": "x" },
            "legend": { "enabled": false },
            "series": [
                { "type": "pareto", "name": "Pareto", "yAxis": 1, "zIndex": 10, "baseSeries": 1 },
                { "type": "column", "zIndex": 2 }
            ]
        }),
        ChartType::Scatter => scatter_like("scatter"),
        ChartType::Bubble => super::merge::merged(
            scatter_like("bubble"),
            json!({
                "chart": { "plotBorderWidth": 1 },
                "plotOptions": {
                    "bubble": {
                        "dataLabels": {
                            "color": "rgb(0,0,0)",
                            "borderWidth": 0,
                            "shadow": false,
                            "style": { "fontWeight": "normal", "textOutline": "none" }
                        }
                    }
                }
            }),
        ),
        ChartType::Bullet => json!({
            "chart": { "type": "bullet", "inverted": true, "marginLeft": 135, "height": "100px" },
            "legend": { "enabled": false },
            "yAxis": { "gridLineWidth": 0 },
            "plotOptions": {
                "bullet": { "targetOptions": { "color": "black" } },
                "series": {
                    "maxPointWidth": settings.max_point_width,
                    "pointPadding": 0.2,
                    "borderWidth": 0,
                    "targetOptions": { "width": "200%" }
                }
            }
        }),
        ChartType::WordCloud => json!({
            "chart": { "type": "wordcloud" },
            "plotOptions": { "wordcloud": { "colorByPoint": false } },
            "legend": { "enabled": false }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_names_its_renderer_type() {
        let settings = PipelineSettings::default();
        for chart_type in ChartType::ALL {
            let template = type_template(chart_type, &settings);
            assert!(template["chart"]["type"].is_string(), "{chart_type} has no chart.type");
        }
    }

    #[test]
    fn test_donut_renders_as_hollow_pie() {
        let template = type_template(ChartType::Donut, &PipelineSettings::default());
        assert_eq!(template["chart"]["type"], "pie");
        assert_eq!(template["plotOptions"]["pie"]["innerSize"], "60%");
    }

    #[test]
    fn test_common_template_wires_tooltip_formatter() {
        let template = common_template(&PipelineSettings::default());
        assert_eq!(template["tooltip"]["formatter"], "tooltip");
        assert_eq!(template["legend"]["enabled"], false);
        assert_eq!(template["yAxis"]["gridLineColor"], GRID_LINE_COLOR);
        assert_eq!(template["yAxis"]["title"]["margin"], 10);
    }
}
