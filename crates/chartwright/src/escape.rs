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

/// Exactly one level of HTML escaping, whether or not the input was already
/// escaped upstream: entities are decoded first, then the text is encoded
/// again.
pub fn custom_escape(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    html_escape::encode_quoted_attribute(&decoded).into_owned()
}

/// Axis titles only need the angle brackets neutralised.
pub fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_escape_is_idempotent() {
        let raw = "<b>Tom & \"Jerry\"</b>";
        let once = custom_escape(raw);
        assert_eq!(once, "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
        assert_eq!(custom_escape(&once), once);
    }

    #[test]
    fn test_double_escaped_input_is_escaped_once() {
        assert_eq!(custom_escape("R&amp;D &lt;EU&gt;"), "R&amp;D &lt;EU&gt;");
        assert_eq!(custom_escape("plain text"), "plain text");
    }

    #[test]
    fn test_angle_brackets_only() {
        assert_eq!(escape_angle_brackets("<a & b>"), "&lt;a & b&gt;");
    }
}
