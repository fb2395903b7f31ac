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

//! Marks generic series points as drillable and builds the payload that
//! describes a clicked point.

use crate::chart_type::ChartType;
use crate::headers::{ResolvedAttribute, ResolvedHeaders};
use crate::model::{Afm, AttributeHeader, AttributeHeaderItem, DrillableItem, MeasureHeaderItem};
use crate::options::{DataPoint, Series};
use serde::{Deserialize, Serialize};

/// Something a drillable item can match against.
#[derive(Debug, Clone, Copy)]
pub enum DrillHook<'a> {
    Measure(&'a MeasureHeaderItem),
    Attribute(&'a AttributeHeader),
    AttributeItem(&'a AttributeHeaderItem),
}

/// Decides whether a hook is drillable. Implementations are supplied by the
/// embedding application.
pub trait DrillMatcher: Send + Sync {
    fn matches(&self, drillable_items: &[DrillableItem], hook: &DrillHook<'_>, afm: &Afm) -> bool;
}

/// URI or identifier equality. Measure hooks resolve through the AFM so that
/// derived measures match on their source measure's catalogue object.
#[derive(Debug, Clone, Default)]
pub struct DefaultDrillMatcher;

impl DrillMatcher for DefaultDrillMatcher {
    fn matches(&self, drillable_items: &[DrillableItem], hook: &DrillHook<'_>, afm: &Afm) -> bool {
        let (uri, identifier) = hook_keys(hook, afm);
        drillable_items.iter().any(|item| {
            let uri_match = matches!((&item.uri, &uri), (Some(a), Some(b)) if !a.is_empty() && a == b);
            let id_match = matches!(
                (&item.identifier, &identifier),
                (Some(a), Some(b)) if !a.is_empty() && a == b
            );
            uri_match || id_match
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn hook_keys(hook: &DrillHook<'_>, afm: &Afm) -> (Option<String>, Option<String>) {
    match hook {
        DrillHook::Measure(measure) => match afm.measure_qualifier(&measure.local_identifier) {
            Some(qualifier) => (qualifier.uri.clone(), qualifier.identifier.clone()),
            None => (measure.uri.clone(), measure.identifier.clone()),
        },
        DrillHook::Attribute(header) => (non_empty(&header.uri), non_empty(&header.identifier)),
        DrillHook::AttributeItem(item) => (non_empty(&item.uri), None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillContextItem {
    /// Attribute element id, or the measure's local identifier.
    pub id: String,
    pub value: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl DrillContextItem {
    fn for_measure(measure: &MeasureHeaderItem, afm: &Afm) -> Self {
        DrillContextItem {
            id: measure.local_identifier.clone(),
            value: measure.name.clone(),
            identifier: measure.identifier.clone().unwrap_or_default(),
            uri: afm
                .measure_qualifier(&measure.local_identifier)
                .and_then(|q| q.uri.clone()),
            format: Some(measure.format.clone()),
        }
    }

    fn for_attribute_item(attribute: &ResolvedAttribute, item: &AttributeHeaderItem) -> Self {
        DrillContextItem {
            id: item.element_id(),
            value: item.name.clone(),
            identifier: attribute.header.identifier.clone(),
            uri: Some(attribute.header.uri.clone()),
            format: None,
        }
    }
}

/// The measure and attribute items a single point originates from.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointOrigin<'a> {
    pub measure: Option<&'a MeasureHeaderItem>,
    pub view_by: Option<(&'a ResolvedAttribute, &'a AttributeHeaderItem)>,
    pub stack_by: Option<(&'a ResolvedAttribute, &'a AttributeHeaderItem)>,
}

impl<'a> PointOrigin<'a> {
    /// Measure, view-by attribute, view-by item, stack-by attribute, stack-by item.
    pub fn hooks(&self) -> Vec<DrillHook<'a>> {
        let mut hooks = Vec::with_capacity(5);
        if let Some(measure) = self.measure {
            hooks.push(DrillHook::Measure(measure));
        }
        for (attribute, item) in [self.view_by, self.stack_by].into_iter().flatten() {
            hooks.push(DrillHook::Attribute(&attribute.header));
            hooks.push(DrillHook::AttributeItem(item));
        }
        hooks
    }

    /// Context entries in measure, view-by, stack-by order.
    pub fn drill_context(&self, afm: &Afm) -> Vec<DrillContextItem> {
        let mut context = Vec::with_capacity(3);
        if let Some(measure) = self.measure {
            context.push(DrillContextItem::for_measure(measure, afm));
        }
        for (attribute, item) in [self.view_by, self.stack_by].into_iter().flatten() {
            context.push(DrillContextItem::for_attribute_item(attribute, item));
        }
        context
    }
}

pub struct DrillScope<'a> {
    pub chart_type: ChartType,
    pub headers: &'a ResolvedHeaders,
    pub afm: &'a Afm,
    pub drillable_items: &'a [DrillableItem],
    pub matcher: &'a dyn DrillMatcher,
}

impl<'a> DrillScope<'a> {
    /// Same measure choice the series builder makes: stacked series carry the
    /// first measure, measure-only proportion charts one measure per point.
    fn measure_index(&self, series_index: usize, point_index: usize) -> usize {
        let measures_as_points =
            self.chart_type.points_are_measures() && self.headers.view_by.is_none();
        if self.headers.stack_by.is_some() {
            0
        } else if measures_as_points {
            point_index
        } else {
            series_index
        }
    }

    pub fn origin(&self, series_index: usize, point_index: usize) -> PointOrigin<'a> {
        let headers = self.headers;
        let attribute_at = |attribute: Option<&'a ResolvedAttribute>, index: usize| {
            attribute.and_then(|a| a.items.get(index).map(|item| (a, item)))
        };
        PointOrigin {
            measure: headers
                .measure_group
                .get(self.measure_index(series_index, point_index)),
            view_by: attribute_at(headers.view_by.as_ref(), point_index),
            stack_by: attribute_at(headers.stack_by.as_ref(), series_index),
        }
    }

    pub fn is_drillable(&self, origin: &PointOrigin<'_>) -> bool {
        if self.drillable_items.is_empty() {
            return false;
        }
        origin
            .hooks()
            .iter()
            .any(|hook| self.matcher.matches(self.drillable_items, hook, self.afm))
    }
}

/// Returns new series whose points carry `drilldown` and, when drillable, a
/// drill context. A series is drillable when any of its points is.
pub fn annotate(series: Vec<Series>, scope: &DrillScope<'_>) -> Vec<Series> {
    series
        .into_iter()
        .enumerate()
        .map(|(series_index, series)| {
            let data: Vec<DataPoint> = series
                .data
                .into_iter()
                .enumerate()
                .map(|(point_index, point)| match point {
                    DataPoint::Point(mut point) => {
                        let origin = scope.origin(series_index, point_index);
                        point.drilldown = scope.is_drillable(&origin);
                        if point.drilldown {
                            point.drill_context = Some(origin.drill_context(scope.afm));
                        }
                        DataPoint::Point(point)
                    }
                    other => other,
                })
                .collect();
            let is_drillable = data
                .iter()
                .any(|p| matches!(p, DataPoint::Point(point) if point.drilldown));
            Series {
                data,
                is_drillable,
                ..series
            }
        })
        .collect()
}
