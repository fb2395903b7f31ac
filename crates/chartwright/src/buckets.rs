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

use crate::headers::{is_percent_format, MeasureGroup};
use crate::model::MdObject;
use serde::{Deserialize, Serialize};

/// Semantic role of a query bucket for charts that read fixed positions
/// instead of a generic series list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketRole {
    /// `measures`: x value, bullet actual value, primary axis.
    Primary,
    /// `secondary`: y value, bullet target, line/area series of combo charts.
    Secondary,
    /// `size`: bubble radius.
    Size,
    /// `range`: bullet comparison bands.
    Range,
}

impl BucketRole {
    pub fn from_bucket_name(name: &str) -> Option<Self> {
        match name {
            "measures" => Some(BucketRole::Primary),
            "secondary" => Some(BucketRole::Secondary),
            "size" => Some(BucketRole::Size),
            "range" => Some(BucketRole::Range),
            _ => None,
        }
    }
}

/// Positions into the measure group, per role. `None` means the bucket is
/// absent from the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasureBuckets {
    pub primary: Option<Vec<usize>>,
    pub secondary: Option<Vec<usize>>,
    pub size: Option<Vec<usize>>,
    pub range: Option<Vec<usize>>,
}

impl MeasureBuckets {
    /// Buckets with unknown names are ignored, as are references to measures
    /// the measure group does not contain.
    pub fn index(md_object: &MdObject, measure_group: &MeasureGroup) -> Self {
        let mut buckets = MeasureBuckets::default();
        for bucket in &md_object.buckets {
            let Some(role) = BucketRole::from_bucket_name(&bucket.local_identifier) else {
                continue;
            };
            let indexes: Vec<usize> = bucket
                .items
                .iter()
                .filter_map(|item| item.measure.as_ref())
                .filter_map(|measure| measure_group.position(&measure.local_identifier))
                .collect();
            *buckets.slot_mut(role) = Some(indexes);
        }
        buckets
    }

    fn slot_mut(&mut self, role: BucketRole) -> &mut Option<Vec<usize>> {
        match role {
            BucketRole::Primary => &mut self.primary,
            BucketRole::Secondary => &mut self.secondary,
            BucketRole::Size => &mut self.size,
            BucketRole::Range => &mut self.range,
        }
    }

    pub fn get(&self, role: BucketRole) -> Option<&[usize]> {
        match role {
            BucketRole::Primary => self.primary.as_deref(),
            BucketRole::Secondary => self.secondary.as_deref(),
            BucketRole::Size => self.size.as_deref(),
            BucketRole::Range => self.range.as_deref(),
        }
    }

    pub fn has(&self, role: BucketRole) -> bool {
        self.get(role).is_some()
    }

    pub fn first(&self, role: BucketRole) -> Option<usize> {
        self.get(role).and_then(|indexes| indexes.first().copied())
    }

    pub fn any_percent(&self, role: BucketRole, measure_group: &MeasureGroup) -> bool {
        self.get(role).is_some_and(|indexes| {
            indexes
                .iter()
                .any(|&index| is_percent_format(&measure_group.format(index)))
        })
    }

    pub fn first_is_percent(&self, role: BucketRole, measure_group: &MeasureGroup) -> bool {
        self.first(role)
            .is_some_and(|index| is_percent_format(&measure_group.format(index)))
    }
}
