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

//! Locates the measure group and the categorising attributes inside the
//! result's dimension headers.
//!
//! Data rows follow dimension 0 and data columns follow dimension 1, so the
//! stack-by attribute (one series per item) lives on dimension 0 and the
//! view-by attribute (one category per item) on dimension 1.

use crate::error::{InputError, InputResult};
use crate::model::{AttributeHeader, AttributeHeaderItem, Dimension, Header, HeaderItem, MeasureHeaderItem};

pub const STACK_BY_DIMENSION_INDEX: usize = 0;
pub const VIEW_BY_DIMENSION_INDEX: usize = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureGroup {
    pub items: Vec<MeasureHeaderItem>,
}

impl MeasureGroup {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MeasureHeaderItem> {
        self.items.get(index)
    }

    pub fn name(&self, index: usize) -> String {
        self.get(index).map(|m| m.name.clone()).unwrap_or_default()
    }

    pub fn format(&self, index: usize) -> String {
        self.get(index).map(|m| m.format.clone()).unwrap_or_default()
    }

    pub fn position(&self, local_identifier: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|m| m.local_identifier == local_identifier)
    }

    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|m| m.name.clone()).collect()
    }

    pub fn any_percent(&self) -> bool {
        self.items.iter().any(|m| is_percent_format(&m.format))
    }
}

pub fn is_percent_format(format: &str) -> bool {
    format.contains('%')
}

/// An attribute header together with its realised items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAttribute {
    pub header: AttributeHeader,
    pub items: Vec<AttributeHeaderItem>,
}

impl ResolvedAttribute {
    pub fn form_of_name(&self) -> &str {
        &self.header.form_of.name
    }

    pub fn item_name(&self, index: usize) -> String {
        self.items
            .get(index)
            .map(|item| item.name.clone())
            .unwrap_or_default()
    }

    pub fn item_names(&self) -> Vec<String> {
        self.items.iter().map(|item| item.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedHeaders {
    pub measure_group: MeasureGroup,
    pub view_by: Option<ResolvedAttribute>,
    pub stack_by: Option<ResolvedAttribute>,
    /// Every attribute of every dimension, in header order. Treemap and sankey
    /// read the first dimension's list directly.
    pub dimension_attributes: Vec<Vec<ResolvedAttribute>>,
}

impl ResolvedHeaders {
    pub fn first_dimension_attributes(&self) -> &[ResolvedAttribute] {
        self.dimension_attributes
            .first()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

pub fn resolve_headers(
    dimensions: &[Dimension],
    header_items: &[Vec<Vec<HeaderItem>>],
) -> InputResult<ResolvedHeaders> {
    let measure_group = find_measure_group(dimensions)?;
    let attribute_items = attribute_header_items(header_items);

    let dimension_attributes: Vec<Vec<ResolvedAttribute>> = dimensions
        .iter()
        .enumerate()
        .map(|(index, dimension)| {
            attributes_in_dimension(
                dimension,
                attribute_items.get(index).map(Vec::as_slice).unwrap_or(&[]),
            )
        })
        .collect();

    // only the first attribute of a dimension is honoured for view-by/stack-by
    let first_of = |index: usize| {
        dimension_attributes
            .get(index)
            .and_then(|attrs| attrs.first())
            .cloned()
    };

    Ok(ResolvedHeaders {
        measure_group,
        view_by: first_of(VIEW_BY_DIMENSION_INDEX),
        stack_by: first_of(STACK_BY_DIMENSION_INDEX),
        dimension_attributes,
    })
}

pub fn find_measure_group(dimensions: &[Dimension]) -> InputResult<MeasureGroup> {
    for (dimension_index, dimension) in dimensions.iter().enumerate() {
        let header_count = dimension.headers.len();
        for (header_index, header) in dimension.headers.iter().enumerate() {
            if let Header::MeasureGroupHeader(group) = header {
                if header_index != header_count - 1 {
                    return Err(InputError::MeasureGroupNotLast {
                        dimension: dimension_index,
                    });
                }
                return Ok(MeasureGroup {
                    items: group
                        .items
                        .iter()
                        .map(|item| item.measure_header_item.clone())
                        .collect(),
                });
            }
        }
    }
    Err(InputError::MissingMeasureGroup)
}

/// Keeps only the header item lists that hold attribute values. Newer
/// execution responses interleave measure header items; an empty list is kept
/// so positions stay aligned.
pub fn attribute_header_items(
    header_items: &[Vec<Vec<HeaderItem>>],
) -> Vec<Vec<Vec<AttributeHeaderItem>>> {
    header_items
        .iter()
        .map(|dimension| {
            dimension
                .iter()
                .filter(|list| list.first().map_or(true, |item| item.as_attribute_item().is_some()))
                .map(|list| {
                    list.iter()
                        .filter_map(HeaderItem::as_attribute_item)
                        .cloned()
                        .collect()
                })
                .collect()
        })
        .collect()
}

/// Pairs the k-th attribute header of a dimension with the k-th attribute
/// item list of that dimension.
pub fn attributes_in_dimension(
    dimension: &Dimension,
    items: &[Vec<AttributeHeaderItem>],
) -> Vec<ResolvedAttribute> {
    dimension
        .headers
        .iter()
        .filter_map(|header| match header {
            Header::AttributeHeader(attribute) => Some(attribute),
            Header::MeasureGroupHeader(_) => None,
        })
        .enumerate()
        .map(|(index, header)| ResolvedAttribute {
            header: header.clone(),
            items: items.get(index).cloned().unwrap_or_default(),
        })
        .collect()
}
