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

//! Named formatter references carried by the configuration tree, and the
//! label and tooltip-placement logic behind them.

use crate::chart_type::ChartType;
use crate::escape::escape_angle_brackets;
use crate::format::{format_as_percent, NumberFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static COLOUR_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?i:(?:color|colour)=)?#?[0-9a-zA-Z]*\]").expect("valid colour code regex"));

const TOOLTIP_ARROW_OFFSET: f64 = 23.0;
const TOOLTIP_MAX_WIDTH: f64 = 366.0;
const TOOLTIP_BAR_VERTICAL_OFFSET: f64 = 5.0;
const TOOLTIP_VERTICAL_OFFSET: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatterKind {
    Tooltip,
    Percent,
    DataLabel,
    FunnelLabel,
    BulletLabel,
    HeatmapLabel,
    StackLabel,
    HeatmapCategory,
    TooltipPositioner,
}

impl FormatterKind {
    pub const ALL: [FormatterKind; 9] = [
        FormatterKind::Tooltip,
        FormatterKind::Percent,
        FormatterKind::DataLabel,
        FormatterKind::FunnelLabel,
        FormatterKind::BulletLabel,
        FormatterKind::HeatmapLabel,
        FormatterKind::StackLabel,
        FormatterKind::HeatmapCategory,
        FormatterKind::TooltipPositioner,
    ];

    /// The reference string written into the tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatterKind::Tooltip => "tooltip",
            FormatterKind::Percent => "percent",
            FormatterKind::DataLabel => "dataLabel",
            FormatterKind::FunnelLabel => "funnelLabel",
            FormatterKind::BulletLabel => "bulletLabel",
            FormatterKind::HeatmapLabel => "heatmapLabel",
            FormatterKind::StackLabel => "stackLabel",
            FormatterKind::HeatmapCategory => "heatmapCategory",
            FormatterKind::TooltipPositioner => "tooltipPositioner",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// What the renderer hands a label formatter. Which fields matter depends on
/// the formatter: `value` is the point value, stack total or axis value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelContext {
    pub value: Option<f64>,
    pub format: Option<String>,
    pub point_name: Option<String>,
    pub is_negative: bool,
    /// Values of every series of the axis at this stack position.
    pub stack_values: Vec<Option<f64>>,
    pub position: usize,
    pub category_count: usize,
    pub category: Option<String>,
}

/// Removes `[red]`, `[color=#ff0000]` style codes from a measure format.
pub fn strip_colors(format: &str) -> String {
    COLOUR_CODE.replace_all(format, "").into_owned()
}

/// Formatted, escaped label text; missing values get no label.
pub fn format_label(value: Option<f64>, format: Option<&str>, number_format: &dyn NumberFormat) -> Option<String> {
    let value = value?;
    let stripped = strip_colors(format.unwrap_or_default());
    Some(escape_angle_brackets(&number_format.format(Some(value), &stripped)))
}

/// Stack totals are labelled when negative, when no series at the position
/// is negative or missing, or when the total is non-zero.
pub fn show_stack_label(ctx: &LabelContext) -> bool {
    let only_positive = ctx.stack_values.iter().all(|v| matches!(v, Some(v) if *v >= 0.0));
    ctx.is_negative || only_positive || ctx.value != Some(0.0)
}

/// Text for every label-style formatter. Tooltip and positioner references
/// are not labels and yield `None`.
pub fn render_label(kind: FormatterKind, ctx: &LabelContext, number_format: &dyn NumberFormat) -> Option<String> {
    let format = ctx.format.as_deref();
    match kind {
        FormatterKind::DataLabel | FormatterKind::BulletLabel | FormatterKind::HeatmapLabel => {
            format_label(ctx.value, format, number_format)
        }
        FormatterKind::FunnelLabel => {
            let label = format_label(ctx.value, format, number_format).unwrap_or_default();
            Some(format!("{}<br>{}", ctx.point_name.as_deref().unwrap_or_default(), label))
        }
        FormatterKind::StackLabel => {
            if show_stack_label(ctx) {
                format_label(ctx.value, format, number_format)
            } else {
                None
            }
        }
        FormatterKind::Percent => ctx.value.map(format_as_percent),
        FormatterKind::HeatmapCategory => {
            if ctx.position >= ctx.category_count {
                Some(String::new())
            } else {
                Some(ctx.category.clone().unwrap_or_default())
            }
        }
        FormatterKind::Tooltip | FormatterKind::TooltipPositioner => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowAlign {
    Left,
    Center,
    Right,
}

impl ArrowAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowAlign::Left => "left",
            ArrowAlign::Center => "center",
            ArrowAlign::Right => "right",
        }
    }
}

/// Geometry of the hovered point in plot coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TooltipAnchor {
    pub plot_x: f64,
    pub plot_y: f64,
    /// Bar/column length.
    pub height: f64,
    pub negative: bool,
    pub plot_left: f64,
    pub plot_top: f64,
    pub plot_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPosition {
    pub x: f64,
    pub y: f64,
}

pub fn arrow_alignment(arrow_position: f64, chart_width: f64) -> ArrowAlign {
    let min_x = -TOOLTIP_ARROW_OFFSET;
    let max_x = chart_width + TOOLTIP_ARROW_OFFSET;
    let half = TOOLTIP_MAX_WIDTH / 2.0;

    if arrow_position + half > max_x && arrow_position - half > min_x {
        ArrowAlign::Right
    } else if arrow_position - half < min_x && arrow_position + half < max_x {
        ArrowAlign::Left
    } else {
        ArrowAlign::Center
    }
}

/// Where the tooltip arrow points: stacked bars aim at the middle of the bar.
pub fn arrow_position(chart_type: ChartType, stacked: bool, point_end: f64, point_height: f64) -> f64 {
    if chart_type == ChartType::Bar && stacked {
        point_end - point_height / 2.0
    } else {
        point_end
    }
}

/// Places a `width` x `height` tooltip above the hovered point, shifting it
/// sideways so it stays inside the plot.
pub fn position_tooltip(
    chart_type: ChartType,
    stacked: bool,
    width: f64,
    height: f64,
    anchor: &TooltipAnchor,
) -> TooltipPosition {
    let point_end = if chart_type == ChartType::Bar && anchor.negative && stacked {
        anchor.plot_x + anchor.height
    } else {
        anchor.plot_x
    };
    let arrow = arrow_position(chart_type, stacked, point_end, anchor.height);
    let horizontal = match arrow_alignment(arrow, anchor.plot_width) {
        ArrowAlign::Right => arrow - width + TOOLTIP_ARROW_OFFSET,
        ArrowAlign::Left => arrow - TOOLTIP_ARROW_OFFSET,
        ArrowAlign::Center => arrow - width / 2.0,
    };

    let vertical_offset = match chart_type {
        ChartType::Column if stacked || anchor.negative => 0.0,
        ChartType::Bar => TOOLTIP_BAR_VERTICAL_OFFSET,
        _ => TOOLTIP_VERTICAL_OFFSET,
    };
    let point_start = if chart_type == ChartType::Column && anchor.negative && stacked {
        anchor.plot_y - anchor.height
    } else {
        anchor.plot_y
    };

    TooltipPosition {
        x: anchor.plot_left + horizontal,
        y: anchor.plot_top + point_start - (height + vertical_offset),
    }
}

/// The tooltip container around a family table.
pub fn tooltip_container(content: &str, color: Option<&str>, align: ArrowAlign) -> String {
    let stroke = color.map(|c| format!("border-top-color: {c};")).unwrap_or_default();
    let align = align.as_str();
    format!(
        "<div class=\"hc-tooltip\">\n\
         <span class=\"stroke\" style=\"{stroke}\"></span>\n\
         <div class=\"content\">\n{content}\n</div>\n\
         <div class=\"tail1 {align}\"></div>\n\
         <div class=\"tail2 {align}\"></div>\n\
         </div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PatternNumberFormat;

    fn label(kind: FormatterKind, ctx: LabelContext) -> Option<String> {
        render_label(kind, &ctx, &PatternNumberFormat)
    }

    #[test]
    fn test_names_round_trip() {
        for kind in FormatterKind::ALL {
            assert_eq!(FormatterKind::from_name(kind.as_str()), Some(kind));
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
        assert_eq!(FormatterKind::from_name("nope"), None);
    }

    #[test]
    fn test_missing_value_has_no_label() {
        let ctx = LabelContext {
            format: Some("#,##0".into()),
            ..Default::default()
        };
        assert_eq!(label(FormatterKind::DataLabel, ctx), None);
    }

    #[test]
    fn test_colour_codes_are_stripped() {
        assert_eq!(strip_colors("[red]#,##0;[color=#00ff00]-#,##0"), "#,##0;-#,##0");
        let ctx = LabelContext {
            value: Some(1200.0),
            format: Some("[green]#,##0".into()),
            ..Default::default()
        };
        assert_eq!(label(FormatterKind::DataLabel, ctx).as_deref(), Some("1,200"));
    }

    #[test]
    fn test_funnel_label_prefixes_point_name() {
        let ctx = LabelContext {
            value: Some(40.0),
            format: Some("#,##0".into()),
            point_name: Some("Leads".into()),
            ..Default::default()
        };
        assert_eq!(label(FormatterKind::FunnelLabel, ctx).as_deref(), Some("Leads<br>40"));
    }

    #[test]
    fn test_stack_label_visibility() {
        let zero_total_mixed = LabelContext {
            value: Some(0.0),
            format: Some("#,##0".into()),
            stack_values: vec![Some(5.0), Some(-5.0)],
            ..Default::default()
        };
        assert_eq!(label(FormatterKind::StackLabel, zero_total_mixed.clone()), None);

        let negative = LabelContext {
            is_negative: true,
            ..zero_total_mixed.clone()
        };
        assert_eq!(label(FormatterKind::StackLabel, negative).as_deref(), Some("0"));

        let all_positive = LabelContext {
            stack_values: vec![Some(0.0), Some(0.0)],
            ..zero_total_mixed
        };
        assert_eq!(label(FormatterKind::StackLabel, all_positive).as_deref(), Some("0"));
    }

    #[test]
    fn test_percent_and_heatmap_category() {
        let percent = LabelContext {
            value: Some(0.07),
            ..Default::default()
        };
        assert_eq!(label(FormatterKind::Percent, percent).as_deref(), Some("7%"));

        let beyond = LabelContext {
            position: 3,
            category_count: 3,
            category: Some("X".into()),
            ..Default::default()
        };
        assert_eq!(label(FormatterKind::HeatmapCategory, beyond).as_deref(), Some(""));
    }

    #[test]
    fn test_arrow_alignment_near_edges() {
        assert_eq!(arrow_alignment(10.0, 600.0), ArrowAlign::Left);
        assert_eq!(arrow_alignment(300.0, 600.0), ArrowAlign::Center);
        assert_eq!(arrow_alignment(590.0, 600.0), ArrowAlign::Right);
    }

    #[test]
    fn test_tooltip_sits_above_column() {
        let anchor = TooltipAnchor {
            plot_x: 300.0,
            plot_y: 200.0,
            height: 50.0,
            plot_left: 40.0,
            plot_top: 10.0,
            plot_width: 600.0,
            ..Default::default()
        };
        let position = position_tooltip(ChartType::Line, false, 100.0, 60.0, &anchor);
        assert_eq!(position, TooltipPosition { x: 290.0, y: 136.0 });

        let stacked = position_tooltip(ChartType::Column, true, 100.0, 60.0, &anchor);
        assert_eq!(stacked.y, 150.0);
    }

    #[test]
    fn test_container_carries_stroke_colour() {
        let html = tooltip_container("<table></table>", Some("rgb(1,2,3)"), ArrowAlign::Center);
        assert!(html.starts_with("<div class=\"hc-tooltip\">"));
        assert!(html.contains("border-top-color: rgb(1,2,3);"));
        assert!(html.contains("<div class=\"tail1 center\"></div>"));
    }
}
