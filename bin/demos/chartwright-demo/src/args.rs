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

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chartwright-demo",
    version,
    about = "Turns a saved query result into a chart configuration tree"
)]
pub struct Args {
    #[arg(help = "Path to the chart input JSON (afm, dimensions, headerItems, executionResultData, config)")]
    pub input: Option<PathBuf>,
    #[arg(long = "settings", help = "Pipeline settings YAML; defaults apply when omitted")]
    pub settings: Option<PathBuf>,
    #[arg(
        long = "chart-type",
        help = "Override config.type of the input, e.g. to compare renderings of the same result"
    )]
    pub chart_type: Option<String>,
    #[arg(long = "output", short = 'o', help = "Write the tree here instead of stdout")]
    pub output: Option<PathBuf>,
    #[arg(long = "options", default_value_t = false, help = "Print the intermediate chart options instead of the tree")]
    pub options: bool,
    #[arg(long = "compact", default_value_t = false, help = "Emit single-line JSON")]
    pub compact: bool,
    #[arg(long = "list-types", default_value_t = false, help = "List the supported chart types and exit")]
    pub list_types: bool,
    #[arg(
        long = "debug",
        default_value_t = false,
        help = "Enable debug-level logging (tracing::Level::DEBUG)."
    )]
    pub debug: bool,
}
