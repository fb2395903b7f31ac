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

pub mod buckets;
pub mod chart_type;
pub mod color;
pub mod compose;
pub mod drill;
pub mod error;
pub mod escape;
pub mod format;
pub mod headers;
pub mod legend;
pub mod model;
pub mod options;
pub mod settings;
pub mod tooltip;
pub mod validate;

pub use chart_type::{ChartFamily, ChartType};
pub use compose::compose_configuration;
pub use compose::formatters::{FormatterKind, LabelContext, TooltipAnchor, TooltipPosition};
pub use drill::{DefaultDrillMatcher, DrillContextItem, DrillMatcher};
pub use error::{ChartConfigError, ConfigError, InputError, Result, SerialisationError};
pub use format::{NumberFormat, PatternNumberFormat};
pub use legend::{legend_items, LegendItem};
pub use model::ChartInput;
pub use options::{build_chart_options, ChartOptions};
pub use settings::PipelineSettings;
pub use tooltip::{HoverPoint, TooltipSpec};
pub use validate::{validate_data, DataValidation};

use compose::formatters::{self, ArrowAlign};
use serde_json::Value;
use std::sync::Arc;

/// Turns query results into renderer configuration. Holds only read-only
/// settings and collaborators, so one pipeline can serve any number of
/// charts, from any number of threads.
pub struct ChartPipeline {
    settings: PipelineSettings,
    number_format: Arc<dyn NumberFormat>,
    drill_matcher: Arc<dyn DrillMatcher>,
}

impl Default for ChartPipeline {
    fn default() -> Self {
        Self::new(PipelineSettings::default())
    }
}

impl ChartPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            settings,
            number_format: Arc::new(PatternNumberFormat),
            drill_matcher: Arc::new(DefaultDrillMatcher),
        }
    }

    pub fn with_number_format(mut self, number_format: Arc<dyn NumberFormat>) -> Self {
        self.number_format = number_format;
        self
    }

    pub fn with_drill_matcher(mut self, drill_matcher: Arc<dyn DrillMatcher>) -> Self {
        self.drill_matcher = drill_matcher;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// The intermediate options model, before composition.
    pub fn build_options(&self, input: &ChartInput) -> Result<ChartOptions> {
        build_chart_options(input, &self.settings, self.drill_matcher.as_ref())
    }

    pub fn build(&self, input: &ChartInput) -> Result<ChartConfiguration> {
        let options = self.build_options(input)?;
        let validation = validate_data(&self.settings, &options);
        let tree = compose_configuration(&options, &self.settings)?;
        let tree = legend::apply_legend_visibility(tree, options.chart_type, &input.legend_items_enabled);
        let legend = legend_items(&options);

        tracing::debug!(
            target: "chartwright::pipeline",
            chart_type = %options.chart_type,
            legend_items = legend.len(),
            renderable = validation.is_renderable(),
            "chart configuration built"
        );

        Ok(ChartConfiguration {
            tree,
            chart_type: options.chart_type,
            stacked: options.stacking.is_some(),
            tooltip: options.tooltip,
            legend,
            validation,
            number_format: Arc::clone(&self.number_format),
        })
    }
}

/// A built chart: the configuration tree plus the behaviour behind the
/// formatter references it carries.
pub struct ChartConfiguration {
    tree: Value,
    chart_type: ChartType,
    stacked: bool,
    tooltip: TooltipSpec,
    legend: Vec<LegendItem>,
    validation: DataValidation,
    number_format: Arc<dyn NumberFormat>,
}

impl std::fmt::Debug for ChartConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartConfiguration")
            .field("chart_type", &self.chart_type)
            .field("tooltip", &self.tooltip)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl ChartConfiguration {
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn into_tree(self) -> Value {
        self.tree
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn legend_items(&self) -> &[LegendItem] {
        &self.legend
    }

    pub fn validation(&self) -> DataValidation {
        self.validation
    }

    pub fn tooltip_spec(&self) -> &TooltipSpec {
        &self.tooltip
    }

    /// The `tooltip` formatter: the family table inside the tooltip box.
    pub fn render_tooltip(&self, point: &HoverPoint) -> String {
        self.render_tooltip_aligned(point, ArrowAlign::Center)
    }

    /// Like [`render_tooltip`](Self::render_tooltip), with the arrow aligned
    /// for the point's position in the plot.
    pub fn render_tooltip_at(&self, point: &HoverPoint, anchor: &TooltipAnchor) -> String {
        let arrow = formatters::arrow_position(self.chart_type, self.stacked, anchor.plot_x, anchor.height);
        self.render_tooltip_aligned(point, formatters::arrow_alignment(arrow, anchor.plot_width))
    }

    fn render_tooltip_aligned(&self, point: &HoverPoint, align: ArrowAlign) -> String {
        let content = self.tooltip.render(point, self.number_format.as_ref());
        formatters::tooltip_container(&content, point.color.as_deref(), align)
    }

    /// The `tooltipPositioner` reference.
    pub fn position_tooltip(&self, width: f64, height: f64, anchor: &TooltipAnchor) -> TooltipPosition {
        formatters::position_tooltip(self.chart_type, self.stacked, width, height, anchor)
    }

    /// Label formatter references; `None` means no label is drawn.
    pub fn render_label(&self, kind: FormatterKind, ctx: &LabelContext) -> Option<String> {
        formatters::render_label(kind, ctx, self.number_format.as_ref())
    }
}
