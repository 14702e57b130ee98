//! Static font-metric tables for the three PDF base font families.
//!
//! Character widths are in em units (relative to font size), taken from the
//! standard Type 1 AFM files. Exported resumes use these base fonts directly, so the
//! tables are exact for regular weight; bold text is approximated by
//! `BOLD_WIDTH_FACTOR`, which only affects where lines wrap.
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

/// Bold glyphs run roughly 5% wider than regular ones in Helvetica and Times.
pub const BOLD_WIDTH_FACTOR: f32 = 1.05;

/// Points per CSS pixel (72pt per inch / 96px per inch).
pub const PT_PER_PX: f32 = 0.75;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// The base PDF font families a design's font name maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Sans-serif: Inter, Arial and anything unrecognized.
    Helvetica,
    /// Serif: Georgia, Times and friends.
    Times,
    /// Monospace: Courier New.
    Courier,
}

impl FontFamily {
    /// Maps a user-facing font name onto a base family. Never fails.
    pub fn from_font_name(name: &str) -> FontFamily {
        let lower = name.to_ascii_lowercase();
        if lower.contains("courier") || lower.contains("mono") {
            FontFamily::Courier
        } else if ["georgia", "times", "garamond", "serif", "cambria", "palatino"]
            .iter()
            .any(|s| lower.contains(s))
            && !lower.contains("sans")
        {
            FontFamily::Times
        } else {
            FontFamily::Helvetica
        }
    }

    /// Base-14 PostScript name for this family.
    pub fn base_font(&self, bold: bool) -> &'static str {
        match (self, bold) {
            (FontFamily::Helvetica, false) => "Helvetica",
            (FontFamily::Helvetica, true) => "Helvetica-Bold",
            (FontFamily::Times, false) => "Times-Roman",
            (FontFamily::Times, true) => "Times-Bold",
            (FontFamily::Courier, false) => "Courier",
            (FontFamily::Courier, true) => "Courier-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// Fixed page box used for export. Values in PDF points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    /// Share of the content width given to a sidebar column.
    pub sidebar_fraction: f32,
    pub column_gap_pt: f32,
}

/// A4 portrait (210mm × 297mm), 40pt margins.
pub fn a4_portrait() -> PageGeometry {
    PageGeometry {
        width_pt: 595.0,
        height_pt: 842.0,
        margin_pt: 40.0,
        sidebar_fraction: 0.30,
        column_gap_pt: 16.0,
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    /// Lowest y (top-down) content may reach.
    pub fn content_bottom(&self) -> f32 {
        self.height_pt - self.margin_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Width in points of `s` set at `size_pt`.
    pub fn width_pt(&self, s: &str, size_pt: f32, bold: bool) -> f32 {
        let factor = if bold { BOLD_WIDTH_FACTOR } else { 1.0 };
        self.measure_str(s) * size_pt * factor
    }

    /// Greedy word wrap of `s` into lines no wider than `max_width_pt`.
    ///
    /// A single word wider than the line is kept whole on its own line.
    /// Whitespace-only input yields no lines.
    pub fn wrap(&self, s: &str, size_pt: f32, bold: bool, max_width_pt: f32) -> Vec<String> {
        let factor = if bold { BOLD_WIDTH_FACTOR } else { 1.0 };
        let max_width = max_width_pt / (size_pt * factor);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in s.split_whitespace() {
            let word_w = self.measure_str(word);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + self.space_width + word_w > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += self.space_width + word_w;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.53,
    space_width: 0.278,
};

static TIMES_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.47,
    space_width: 0.250,
};

/// Courier is monospaced: every glyph is 0.6em.
static COURIER_TABLE: FontMetricTable = FontMetricTable {
    widths: [0.6; 95],
    average_char_width: 0.6,
    space_width: 0.6,
};

/// Returns the static metric table for the given font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Helvetica => &HELVETICA_TABLE,
        FontFamily::Times => &TIMES_TABLE,
        FontFamily::Courier => &COURIER_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontFamily::Helvetica);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_single_space() {
        let metrics = get_metrics(FontFamily::Helvetica);
        let width = metrics.measure_str(" ");
        assert!(
            (width - 0.278).abs() < 1e-4,
            "space width should be 0.278, got {width}"
        );
    }

    #[test]
    fn test_courier_is_monospaced() {
        let metrics = get_metrics(FontFamily::Courier);
        assert_eq!(metrics.measure_str("iiii"), metrics.measure_str("WWWW"));
    }

    #[test]
    fn test_non_ascii_uses_average_width() {
        let metrics = get_metrics(FontFamily::Times);
        assert!((metrics.measure_str("•") - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_font_name_mapping() {
        assert_eq!(FontFamily::from_font_name("Inter"), FontFamily::Helvetica);
        assert_eq!(FontFamily::from_font_name("Arial"), FontFamily::Helvetica);
        assert_eq!(FontFamily::from_font_name("Georgia"), FontFamily::Times);
        assert_eq!(FontFamily::from_font_name("Courier New"), FontFamily::Courier);
        assert_eq!(FontFamily::from_font_name("Open Sans"), FontFamily::Helvetica);
        assert_eq!(FontFamily::from_font_name(""), FontFamily::Helvetica);
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let metrics = get_metrics(FontFamily::Helvetica);
        assert_eq!(metrics.wrap("Rust", 10.5, false, 300.0), vec!["Rust".to_string()]);
    }

    #[test]
    fn test_wrap_long_text_respects_width() {
        let metrics = get_metrics(FontFamily::Helvetica);
        let bullet = "Architected a distributed caching layer using Redis and consistent hashing, \
                      reducing p99 latency by 40% under 50k RPS peak load";
        let lines = metrics.wrap(bullet, 10.5, false, 200.0);
        assert!(lines.len() >= 2, "expected wrapping, got {lines:?}");
        for line in &lines {
            assert!(
                metrics.width_pt(line, 10.5, false) <= 200.0 || !line.contains(' '),
                "line too wide: {line}"
            );
        }
        assert_eq!(lines.join(" "), bullet.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_keeps_overlong_word_whole() {
        let metrics = get_metrics(FontFamily::Courier);
        let lines = metrics.wrap("a supercalifragilistic b", 10.0, false, 30.0);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_blank_input_yields_no_lines() {
        let metrics = get_metrics(FontFamily::Times);
        assert!(metrics.wrap("   ", 10.0, false, 100.0).is_empty());
    }

    #[test]
    fn test_bold_measures_wider() {
        let metrics = get_metrics(FontFamily::Helvetica);
        assert!(metrics.width_pt("Experience", 12.0, true) > metrics.width_pt("Experience", 12.0, false));
    }

    #[test]
    fn test_a4_geometry_sanity() {
        let page = a4_portrait();
        assert_eq!(page.width_pt, 595.0);
        assert_eq!(page.height_pt, 842.0);
        assert!((page.content_width() - 515.0).abs() < 1e-4);
        assert!((page.content_bottom() - 802.0).abs() < 1e-4);
    }
}
