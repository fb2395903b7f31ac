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

pub mod args;

use anyhow::{bail, Context, Result};
use args::Args;
use chartwright::{ChartConfigError, ChartInput, ChartPipeline, ChartType, PipelineSettings};
use clap::Parser;
use serde_json::Value;
use std::fs;
use tracing::{info, warn, Level};

fn load_input(args: &Args) -> Result<ChartInput> {
    let Some(path) = &args.input else {
        bail!("an input JSON path is required (see --help)");
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut input: ChartInput =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    if let Some(chart_type) = &args.chart_type {
        input.config.chart_type = chart_type.clone();
    }
    Ok(input)
}

fn load_settings(args: &Args) -> Result<PipelineSettings> {
    match &args.settings {
        Some(path) => PipelineSettings::from_yaml_file(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(PipelineSettings::default()),
    }
}

fn report(err: &ChartConfigError) {
    eprintln!("{} error: {err}", err.category());
    for suggestion in err.suggestions() {
        eprintln!("  - {suggestion}");
    }
}

fn emit(args: &Args, value: &Value) -> Result<()> {
    let text = if args.compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    match &args.output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            info!("Configuration written to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let max_level = if args.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if args.list_types {
        for chart_type in ChartType::ALL {
            println!("{chart_type}");
        }
        return Ok(());
    }

    let settings = load_settings(&args)?;
    let input = load_input(&args)?;
    let pipeline = ChartPipeline::new(settings);

    if args.options {
        let options = match pipeline.build_options(&input) {
            Ok(options) => options,
            Err(err) => {
                report(&err);
                std::process::exit(1);
            }
        };
        return emit(&args, &serde_json::to_value(&options)?);
    }

    let config = match pipeline.build(&input) {
        Ok(config) => config,
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    };

    let validation = config.validation();
    if validation.data_too_large {
        warn!("Data exceeds the series or category limits for a {} chart", config.chart_type());
    }
    if validation.has_negative_value {
        warn!("Negative values cannot be drawn by a {} chart", config.chart_type());
    }
    info!(
        "Built {} chart with {} legend item(s)",
        config.chart_type(),
        config.legend_items().len()
    );
    emit(&args, config.tree())
}
