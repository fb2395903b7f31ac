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

//! Number formatting. The pipeline treats formatting as a black box behind
//! [`NumberFormat`]; [`PatternNumberFormat`] is the default implementation for
//! the `#,##0.00` pattern family used in measure formats.

/// Formats a possibly-missing value with a measure format pattern.
pub trait NumberFormat: Send + Sync {
    fn format(&self, value: Option<f64>, pattern: &str) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct PatternNumberFormat;

impl NumberFormat for PatternNumberFormat {
    fn format(&self, value: Option<f64>, pattern: &str) -> String {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return String::new();
        };
        let sections = split_sections(pattern);
        let (section, negative_section) = match sections.as_slice() {
            [] => (String::new(), false),
            [only] => (only.clone(), false),
            [positive, negative, ..] => {
                if value < 0.0 {
                    (negative.clone(), true)
                } else {
                    (positive.clone(), false)
                }
            }
        };
        let parsed = ParsedSection::parse(&section);
        let scaled = if parsed.percent { value * 100.0 } else { value };

        let Some(number) = &parsed.number else {
            return format!("{}{}", parsed.prefix, parsed.suffix);
        };
        let digits = number.render(scaled.abs());
        let is_zero = digits.chars().all(|c| !c.is_ascii_digit() || c == '0');
        let sign = if scaled < 0.0 && !negative_section && !is_zero {
            "-"
        } else {
            ""
        };
        format!("{sign}{}{digits}{}", parsed.prefix, parsed.suffix)
    }
}

/// Splits on unescaped, unquoted `;`.
fn split_sections(pattern: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut chars = pattern.chars();
    let mut quoted = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            ';' if !quoted => sections.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    sections.push(current);
    sections
}

#[derive(Debug, Default)]
struct ParsedSection {
    prefix: String,
    suffix: String,
    number: Option<NumberPattern>,
    percent: bool,
}

#[derive(Debug, Default)]
struct NumberPattern {
    min_integer: usize,
    min_decimals: usize,
    max_decimals: usize,
    grouping: bool,
}

#[derive(PartialEq)]
enum Stage {
    Before,
    Inside,
    After,
}

impl ParsedSection {
    fn parse(section: &str) -> Self {
        let mut parsed = ParsedSection::default();
        let mut raw_number = String::new();
        let mut stage = Stage::Before;
        let mut chars = section.chars().peekable();

        while let Some(c) = chars.next() {
            let literal = match c {
                '\\' => chars.next(),
                '"' => {
                    let mut text = String::new();
                    for q in chars.by_ref() {
                        if q == '"' {
                            break;
                        }
                        text.push(q);
                    }
                    parsed.push_literal(&stage, &text);
                    None
                }
                // colour codes and conditions
                '[' => {
                    for q in chars.by_ref() {
                        if q == ']' {
                            break;
                        }
                    }
                    None
                }
                '%' => {
                    parsed.percent = true;
                    Some('%')
                }
                '#' | '0' | ',' | '.' if stage != Stage::After => {
                    stage = Stage::Inside;
                    raw_number.push(c);
                    None
                }
                other => Some(other),
            };
            if let Some(ch) = literal {
                if stage == Stage::Inside {
                    stage = Stage::After;
                }
                parsed.push_literal(&stage, &ch.to_string());
            }
        }

        if !raw_number.is_empty() {
            parsed.number = Some(NumberPattern::parse(&raw_number));
        }
        parsed
    }

    fn push_literal(&mut self, stage: &Stage, text: &str) {
        match stage {
            Stage::Before => self.prefix.push_str(text),
            _ => self.suffix.push_str(text),
        }
    }
}

impl NumberPattern {
    fn parse(raw: &str) -> Self {
        let (integer, fraction) = raw.split_once('.').unwrap_or((raw, ""));
        NumberPattern {
            min_integer: integer.chars().filter(|c| *c == '0').count(),
            min_decimals: fraction.chars().filter(|c| *c == '0').count(),
            max_decimals: fraction.chars().filter(|c| matches!(c, '0' | '#')).count(),
            grouping: integer.contains(','),
        }
    }

    fn render(&self, value: f64) -> String {
        let rounded = format!("{:.*}", self.max_decimals, value);
        let (integer, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

        let mut fraction = fraction.to_string();
        while fraction.len() > self.min_decimals && fraction.ends_with('0') {
            fraction.pop();
        }

        let mut integer = integer.trim_start_matches('0').to_string();
        while integer.len() < self.min_integer {
            integer.insert(0, '0');
        }
        if integer.is_empty() && fraction.is_empty() {
            integer.push('0');
        }
        if self.grouping {
            integer = group_thousands(&integer);
        }

        if fraction.is_empty() {
            integer
        } else {
            format!("{integer}.{fraction}")
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// `value * 100` rounded to 14 significant digits, with a `%` suffix.
pub fn format_as_percent(value: f64) -> String {
    let scaled = value * 100.0;
    let rounded = format!("{scaled:.13e}").parse::<f64>().unwrap_or(scaled);
    format!("{rounded}%")
}
