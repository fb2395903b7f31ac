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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartConfigError {
    #[error("Invalid chart input: {0}")]
    Input(#[from] InputError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] SerialisationError),
}

/// Malformed query or chart config. These abort a build before any output
/// exists and indicate a caller bug rather than a runtime condition.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("config.type '{chart_type}' must match one of the supported chart types: {supported}")]
    UnsupportedChartType {
        chart_type: String,
        supported: String,
    },
    #[error("missing measureGroup: the result has no measure group header")]
    MissingMeasureGroup,
    #[error("measureGroup must be the last header in dimension {dimension}")]
    MeasureGroupNotLast { dimension: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    SettingsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings YAML: {source}")]
    YamlParse {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Invalid settings: {field} {reason}")]
    InvalidSetting { field: String, reason: String },
    #[error("Colour '{value}' is not a #rrggbb or rgb(r,g,b) colour")]
    InvalidColour { value: String },
}

#[derive(Error, Debug)]
pub enum SerialisationError {
    #[error("JSON serialisation failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ChartConfigError>;
pub type InputResult<T> = std::result::Result<T, InputError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl From<serde_json::Error> for ChartConfigError {
    fn from(err: serde_json::Error) -> Self {
        ChartConfigError::Serialisation(SerialisationError::Json { source: err })
    }
}

impl ChartConfigError {
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, ChartConfigError::Input(_))
    }

    pub fn category(&self) -> &'static str {
        match self {
            ChartConfigError::Input(_) => "Input",
            ChartConfigError::Config(_) => "Configuration",
            ChartConfigError::Serialisation(_) => "Serialisation",
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ChartConfigError::Input(InputError::UnsupportedChartType { supported, .. }) => vec![
                "Check the spelling of config.type".to_string(),
                format!("Use one of: {supported}"),
            ],
            ChartConfigError::Input(InputError::MissingMeasureGroup) => vec![
                "Add at least one measure to the query".to_string(),
                "Check that resultSpec places measureGroup on a dimension".to_string(),
            ],
            ChartConfigError::Input(InputError::MeasureGroupNotLast { .. }) => vec![
                "Move measureGroup after the attributes of its dimension in resultSpec".to_string(),
            ],
            ChartConfigError::Config(_) => vec![
                "Compare the settings file against PipelineSettings::default()".to_string(),
            ],
            _ => vec!["Check the error message for specific guidance".to_string()],
        }
    }
}
