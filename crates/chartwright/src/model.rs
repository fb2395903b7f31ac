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

//! Wire shapes of the pipeline input: query definition (AFM, result spec,
//! buckets), execution response (dimensions, header items, data) and the
//! chart config. All of it is read-only for the duration of a build.

use serde::{Deserialize, Serialize};

const MAX_DERIVED_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjQualifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Afm {
    #[serde(default)]
    pub measures: Vec<AfmMeasure>,
    #[serde(default)]
    pub attributes: Vec<AfmAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfmMeasure {
    pub local_identifier: String,
    pub definition: MeasureDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureDefinition {
    Measure(SimpleMeasureDefinition),
    PopMeasure(DerivedMeasureDefinition),
    PreviousPeriodMeasure(DerivedMeasureDefinition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMeasureDefinition {
    pub item: ObjQualifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default)]
    pub compute_ratio: bool,
}

/// A measure computed relative to another measure of the same AFM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMeasureDefinition {
    pub measure_identifier: String,
}

impl MeasureDefinition {
    pub fn source_measure(&self) -> Option<&str> {
        match self {
            MeasureDefinition::Measure(_) => None,
            MeasureDefinition::PopMeasure(d) | MeasureDefinition::PreviousPeriodMeasure(d) => {
                Some(d.measure_identifier.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfmAttribute {
    pub local_identifier: String,
    pub display_form: ObjQualifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Afm {
    pub fn measure(&self, local_identifier: &str) -> Option<&AfmMeasure> {
        self.measures
            .iter()
            .find(|m| m.local_identifier == local_identifier)
    }

    pub fn measure_position(&self, local_identifier: &str) -> Option<usize> {
        self.measures
            .iter()
            .position(|m| m.local_identifier == local_identifier)
    }

    /// Local identifier of the source measure when `local_identifier` names a
    /// derived measure.
    pub fn derived_source(&self, local_identifier: &str) -> Option<&str> {
        self.measure(local_identifier)
            .and_then(|m| m.definition.source_measure())
    }

    /// The catalogue object behind a measure. Derived measures resolve through
    /// their source chain.
    pub fn measure_qualifier(&self, local_identifier: &str) -> Option<&ObjQualifier> {
        let mut current = local_identifier;
        for _ in 0..MAX_DERIVED_DEPTH {
            let measure = self.measure(current)?;
            match &measure.definition {
                MeasureDefinition::Measure(simple) => return Some(&simple.item),
                MeasureDefinition::PopMeasure(d) | MeasureDefinition::PreviousPeriodMeasure(d) => {
                    current = d.measure_identifier.as_str();
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSpec {
    #[serde(default)]
    pub dimensions: Vec<ResultSpecDimension>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSpecDimension {
    #[serde(default)]
    pub item_identifiers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(default)]
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Header {
    MeasureGroupHeader(MeasureGroupHeader),
    AttributeHeader(AttributeHeader),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureGroupHeader {
    #[serde(default)]
    pub items: Vec<MeasureGroupItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureGroupItem {
    pub measure_header_item: MeasureHeaderItem,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureHeaderItem {
    pub name: String,
    #[serde(default)]
    pub format: String,
    pub local_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeHeader {
    pub name: String,
    #[serde(default)]
    pub local_identifier: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub identifier: String,
    pub form_of: AttributeFormOf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFormOf {
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderItem {
    AttributeHeaderItem(AttributeHeaderItem),
    MeasureHeaderItem(MeasureHeaderItemRef),
    TotalHeaderItem(TotalHeaderItem),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeHeaderItem {
    pub name: String,
    #[serde(default)]
    pub uri: String,
}

impl AttributeHeaderItem {
    /// Element id encoded in an element URI such as
    /// `/gdc/md/p/obj/12/elements?id=34`. Falls back to the whole URI.
    pub fn element_id(&self) -> String {
        match self.uri.rsplit_once("id=") {
            Some((_, id)) => id.to_string(),
            None => self.uri.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureHeaderItemRef {
    pub name: String,
    #[serde(default)]
    pub order: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalHeaderItem {
    pub name: String,
    #[serde(default, rename = "type")]
    pub total_type: String,
}

impl HeaderItem {
    pub fn as_attribute_item(&self) -> Option<&AttributeHeaderItem> {
        match self {
            HeaderItem::AttributeHeaderItem(item) => Some(item),
            _ => None,
        }
    }
}

/// Raw cell as delivered by the execution layer: numbers usually arrive as
/// strings, sometimes as JSON numbers. Text that is not a finite number
/// (including `NaN` and `inf`) is a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn parse(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

pub fn parse_value(raw: &Option<RawValue>) -> Option<f64> {
    raw.as_ref().and_then(RawValue::parse)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionResultData {
    Matrix(Vec<Vec<Option<RawValue>>>),
    Flat(Vec<Option<RawValue>>),
}

impl Default for ExecutionResultData {
    fn default() -> Self {
        ExecutionResultData::Matrix(Vec::new())
    }
}

impl ExecutionResultData {
    /// Parsed data, one vector per row. A one-dimensional result is a single row.
    pub fn rows(&self) -> Vec<Vec<Option<f64>>> {
        match self {
            ExecutionResultData::Matrix(rows) => rows
                .iter()
                .map(|row| row.iter().map(parse_value).collect())
                .collect(),
            ExecutionResultData::Flat(values) => vec![values.iter().map(parse_value).collect()],
        }
    }

    /// One value per result row: the leading cell of each row of a matrix, or
    /// every cell of a flat result.
    pub fn leading_values(&self) -> Vec<Option<f64>> {
        match self {
            ExecutionResultData::Matrix(rows) => rows
                .iter()
                .map(|row| row.first().and_then(parse_value))
                .collect(),
            ExecutionResultData::Flat(values) => values.iter().map(parse_value).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillableItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdObject {
    #[serde(default)]
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub local_identifier: String,
    #[serde(default)]
    pub items: Vec<BucketItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure: Option<BucketReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<BucketReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketReference {
    pub local_identifier: String,
}

/// Everything one build consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInput {
    #[serde(default)]
    pub afm: Afm,
    #[serde(default)]
    pub result_spec: ResultSpec,
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub execution_result_data: ExecutionResultData,
    /// `[dimension][header][item]`, positionally parallel to the dimension headers.
    #[serde(default)]
    pub header_items: Vec<Vec<Vec<HeaderItem>>>,
    pub config: ChartConfig,
    #[serde(default)]
    pub drillable_items: Vec<DrillableItem>,
    #[serde(default)]
    pub md_object: MdObject,
    /// Externally owned legend toggle state, indexed by legend index.
    #[serde(default)]
    pub legend_items_enabled: Vec<bool>,
}
