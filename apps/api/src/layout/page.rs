//! Page composition: positions a `VisualDocument` on a fixed page.
//!
//! Produces a flat list of draw operations in top-down page coordinates (points,
//! origin at the top-left corner). Everything is laid out at scale 1.0; a non-unit
//! `preview_scale` is then applied as a uniform transform, the same way the on-screen
//! preview zooms the paper.
//!
//! Content that does not fit above the bottom margin is not drawn and the layout is
//! flagged `overflowed`. Multi-page flow is not attempted.

use serde::Serialize;

use crate::editor::design::DEFAULT_COLOR;
use crate::layout::color::Rgb;
use crate::layout::font_metrics::{get_metrics, FontFamily, FontMetricTable, PageGeometry, PT_PER_PX};
use crate::render::visual::{
    Align, Block, Column, ColumnRole, HeaderRegion, Item, Section, Side, TitleStyle,
    VisualDocument, CHIP_BORDER, CHIP_FILL, INK,
};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        line_width: f32,
    },
    /// `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        bold: bool,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PageLayout {
    pub width_pt: f32,
    pub height_pt: f32,
    pub font: FontFamily,
    pub ops: Vec<DrawOp>,
    /// True when some content fell below the bottom margin and was left out.
    pub overflowed: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

/// Lays `visual` out on `geometry`.
pub fn compose(visual: &VisualDocument, geometry: &PageGeometry) -> PageLayout {
    let font = FontFamily::from_font_name(&visual.style.font);
    let base = visual.style.font_size_px.max(1) as f32 * PT_PER_PX;
    let spacing = if visual.style.line_height.is_finite() && visual.style.line_height > 0.0 {
        visual.style.line_height
    } else {
        1.0
    };

    let mut composer = Composer {
        metrics: get_metrics(font),
        geometry,
        base,
        line: base * spacing,
        ink: Rgb::parse_or(&visual.style.ink, INK),
        ops: Vec::new(),
        overflowed: false,
    };

    let accent = Rgb::parse_or(&visual.style.accent, DEFAULT_COLOR);
    let body_top = composer.header(&visual.header, accent);
    composer.columns(&visual.columns, body_top, accent);

    let layout = PageLayout {
        width_pt: geometry.width_pt,
        height_pt: geometry.height_pt,
        font,
        ops: composer.ops,
        overflowed: composer.overflowed,
    };

    let scale = visual.preview_scale;
    if scale.is_finite() && scale > 0.0 && (scale - 1.0).abs() > f32::EPSILON {
        layout.scaled(scale)
    } else {
        layout
    }
}

impl PageLayout {
    /// Uniformly scales every coordinate, size and line width.
    pub fn scaled(self, s: f32) -> PageLayout {
        let ops = self
            .ops
            .into_iter()
            .map(|op| match op {
                DrawOp::FillRect { x, y, width, height, color } => DrawOp::FillRect {
                    x: x * s,
                    y: y * s,
                    width: width * s,
                    height: height * s,
                    color,
                },
                DrawOp::StrokeRect { x, y, width, height, color, line_width } => {
                    DrawOp::StrokeRect {
                        x: x * s,
                        y: y * s,
                        width: width * s,
                        height: height * s,
                        color,
                        line_width: line_width * s,
                    }
                }
                DrawOp::Line { x1, y1, x2, y2, color, line_width } => DrawOp::Line {
                    x1: x1 * s,
                    y1: y1 * s,
                    x2: x2 * s,
                    y2: y2 * s,
                    color,
                    line_width: line_width * s,
                },
                DrawOp::Text { x, y, text, size, bold, color } => DrawOp::Text {
                    x: x * s,
                    y: y * s,
                    text,
                    size: size * s,
                    bold,
                    color,
                },
            })
            .collect();

        PageLayout {
            width_pt: self.width_pt * s,
            height_pt: self.height_pt * s,
            ops,
            ..self
        }
    }

    /// All text runs in paint order.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

struct Composer<'a> {
    metrics: &'static FontMetricTable,
    geometry: &'a PageGeometry,
    /// Body font size in points.
    base: f32,
    /// Body line advance in points.
    line: f32,
    ink: Rgb,
    ops: Vec<DrawOp>,
    overflowed: bool,
}

impl Composer<'_> {
    /// Draws the header and returns the y where the body starts.
    fn header(&mut self, header: &HeaderRegion, accent: Rgb) -> f32 {
        let margin = self.geometry.margin_pt;
        let width = self.geometry.content_width();
        let text_color = Rgb::parse_or(&header.text_color, INK);
        let name_color = Rgb::parse_or(&header.name_color, DEFAULT_COLOR);
        let name_size = self.base * 2.0;
        let contact_size = self.base * 0.95;

        // Fill goes first so the text paints over it; its height is patched below.
        let fill_index = header.background.as_ref().map(|fill| {
            let color = Rgb::parse(&fill.color).unwrap_or(accent).over_white(fill.opacity);
            self.ops.push(DrawOp::FillRect {
                x: 0.0,
                y: 0.0,
                width: self.geometry.width_pt,
                height: 0.0,
                color,
            });
            self.ops.len() - 1
        });

        let mut cursor = margin;
        for line in self.metrics.wrap(&header.name, name_size, true, width) {
            let x = aligned_x(self.metrics, &line, name_size, true, margin, width, header.align);
            self.text(x, cursor + name_size * 0.8, &line, name_size, true, name_color);
            cursor += name_size * 1.2;
        }
        if header.name.trim().is_empty() {
            cursor += name_size * 1.2;
        }

        for contact in &header.contact_lines {
            for line in self.metrics.wrap(contact, contact_size, false, width) {
                let x = aligned_x(self.metrics, &line, contact_size, false, margin, width, header.align);
                self.text(x, cursor + contact_size * 0.8, &line, contact_size, false, text_color);
                cursor += self.line;
            }
        }
        cursor += self.base * 0.5;

        if let Some(border) = &header.bottom_border {
            let color = Rgb::parse(&border.color).unwrap_or(accent);
            let y = cursor;
            self.ops.push(DrawOp::Line {
                x1: margin,
                y1: y,
                x2: margin + width,
                y2: y,
                color,
                line_width: border.width_px * PT_PER_PX,
            });
        }

        if let Some(i) = fill_index {
            cursor += self.base * 0.5;
            if let Some(DrawOp::FillRect { height, .. }) = self.ops.get_mut(i) {
                *height = cursor;
            }
        }

        cursor + self.base * 1.5
    }

    fn columns(&mut self, columns: &[Column], top: f32, accent: Rgb) {
        let margin = self.geometry.margin_pt;
        let content = self.geometry.content_width();
        let has_sidebar = columns
            .iter()
            .any(|c| matches!(c.role, ColumnRole::Sidebar { .. }));

        let sidebar_w = content * self.geometry.sidebar_fraction;
        let gap = self.geometry.column_gap_pt;
        let main_w = if has_sidebar { content - sidebar_w - gap } else { content };
        let sidebar_left = columns
            .iter()
            .any(|c| c.role == ColumnRole::Sidebar { side: Side::Left });

        for column in columns {
            let (x, w) = match column.role {
                ColumnRole::Main if sidebar_left => (margin + sidebar_w + gap, main_w),
                ColumnRole::Main => (margin, main_w),
                ColumnRole::Sidebar { side: Side::Left } => (margin, sidebar_w),
                ColumnRole::Sidebar { side: Side::Right } => (margin + main_w + gap, sidebar_w),
            };

            if let Some(fill) = &column.background {
                let pad = self.base * 0.75;
                let color = Rgb::parse(&fill.color).unwrap_or(accent).over_white(fill.opacity);
                self.ops.push(DrawOp::FillRect {
                    x: x - pad,
                    y: top - pad,
                    width: w + 2.0 * pad,
                    height: self.geometry.content_bottom() - top + 2.0 * pad,
                    color,
                });
            }

            let mut cursor = top;
            for block in &column.blocks {
                cursor = match block {
                    Block::Contact { lines } => self.contact_block(lines, x, w, cursor),
                    Block::Section(section) => self.section(section, x, w, cursor),
                };
            }
        }
    }

    fn contact_block(&mut self, lines: &[String], x: f32, w: f32, mut cursor: f32) -> f32 {
        let size = self.base * 0.9;
        for detail in lines {
            for line in self.metrics.wrap(detail, size, false, w) {
                self.text(x, cursor + size * 0.8, &line, size, false, self.ink);
                cursor += self.line;
            }
        }
        cursor + self.base
    }

    fn section(&mut self, section: &Section, x: f32, w: f32, mut cursor: f32) -> f32 {
        let size = self.base * 1.15;
        let baseline = cursor + size * 0.8;

        let title_color = match &section.title_style {
            TitleStyle::Colored { color } => Rgb::parse_or(color, DEFAULT_COLOR),
            TitleStyle::Underlined { color } => {
                let rule = Rgb::parse_or(color, DEFAULT_COLOR);
                self.line_at(x, x + w, baseline + size * 0.3, rule, 0.75);
                self.ink
            }
            TitleStyle::AccentBar { color } => {
                let bar = Rgb::parse_or(color, DEFAULT_COLOR);
                self.rect(x - 6.0, cursor, 3.0, size, bar);
                self.ink
            }
        };
        self.text(x, baseline, &section.title, size, true, title_color);
        cursor += size * 1.6;

        let mut chips = ChipRow::new(x, w);
        for item in &section.items {
            match item {
                Item::Paragraph { text } => {
                    for line in self.metrics.wrap(text, self.base, false, w) {
                        self.text(x, cursor + self.base * 0.8, &line, self.base, false, self.ink);
                        cursor += self.line;
                    }
                    cursor += self.base * 0.4;
                }
                Item::Entry(entry) => {
                    let date_size = self.base * 0.95;
                    let date_w = self.metrics.width_pt(&entry.date, date_size, false);
                    let title_w = (w - date_w - 8.0).max(w * 0.5);
                    let first = cursor + self.base * 0.8;
                    self.text(x + w - date_w, first, &entry.date, date_size, false, self.ink);
                    for line in self.metrics.wrap(&entry.title, self.base, true, title_w) {
                        self.text(x, cursor + self.base * 0.8, &line, self.base, true, self.ink);
                        cursor += self.line;
                    }
                    if entry.title.trim().is_empty() {
                        cursor += self.line;
                    }

                    if !entry.subtitle.is_empty() || !entry.location.is_empty() {
                        let loc_w = self.metrics.width_pt(&entry.location, date_size, false);
                        let baseline = cursor + self.base * 0.8;
                        self.text(x, baseline, &entry.subtitle, self.base, true, self.ink);
                        self.text(x + w - loc_w, baseline, &entry.location, date_size, false, self.ink);
                        cursor += self.line;
                    }

                    for description in &entry.lines {
                        for line in self.metrics.wrap(description, self.base, false, w) {
                            self.text(x, cursor + self.base * 0.8, &line, self.base, false, self.ink);
                            cursor += self.line;
                        }
                    }
                    cursor += self.base * 0.6;
                }
                Item::Chip { text } => {
                    cursor = self.chip(&mut chips, text, cursor);
                }
            }
        }
        if chips.used {
            cursor += chips.height(self.base);
        }

        cursor + self.base * 0.8
    }

    /// Places one skill chip, wrapping to a new row when the current one is full.
    fn chip(&mut self, row: &mut ChipRow, text: &str, mut cursor: f32) -> f32 {
        let size = self.base * 0.9;
        let pad_x = self.base * 0.75;
        let height = row.height(self.base);
        let width = (self.metrics.width_pt(text, size, false) + 2.0 * pad_x).min(row.width);

        if row.used && row.next_x + width > row.x + row.width {
            cursor += height + self.base * 0.4;
            row.next_x = row.x;
        }

        self.rect(row.next_x, cursor, width, height, Rgb::parse_or(CHIP_FILL, CHIP_FILL));
        if cursor + height <= self.geometry.content_bottom() {
            self.ops.push(DrawOp::StrokeRect {
                x: row.next_x,
                y: cursor,
                width,
                height,
                color: Rgb::parse_or(CHIP_BORDER, CHIP_BORDER),
                line_width: 0.75,
            });
        }
        self.text(row.next_x + pad_x, cursor + height * 0.5 + size * 0.35, text, size, false, self.ink);

        row.next_x += width + self.base * 0.4;
        row.used = true;
        cursor
    }

    fn text(&mut self, x: f32, baseline: f32, text: &str, size: f32, bold: bool, color: Rgb) {
        if text.trim().is_empty() {
            return;
        }
        if baseline > self.geometry.content_bottom() {
            self.overflowed = true;
            return;
        }
        self.ops.push(DrawOp::Text {
            x,
            y: baseline,
            text: text.to_string(),
            size,
            bold,
            color,
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        if y + height > self.geometry.content_bottom() {
            self.overflowed = true;
            return;
        }
        self.ops.push(DrawOp::FillRect { x, y, width, height, color });
    }

    fn line_at(&mut self, x1: f32, x2: f32, y: f32, color: Rgb, line_width: f32) {
        if y > self.geometry.content_bottom() {
            self.overflowed = true;
            return;
        }
        self.ops.push(DrawOp::Line { x1, y1: y, x2, y2: y, color, line_width });
    }
}

struct ChipRow {
    x: f32,
    width: f32,
    next_x: f32,
    used: bool,
}

impl ChipRow {
    fn new(x: f32, width: f32) -> Self {
        Self { x, width, next_x: x, used: false }
    }

    fn height(&self, base: f32) -> f32 {
        base * 0.9 + base * 0.5
    }
}

fn aligned_x(
    metrics: &FontMetricTable,
    line: &str,
    size: f32,
    bold: bool,
    left: f32,
    width: f32,
    align: Align,
) -> f32 {
    match align {
        Align::Left => left,
        Align::Center => left + ((width - metrics.width_pt(line, size, bold)) / 2.0).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::design::{DesignConfiguration, Layout};
    use crate::layout::font_metrics::a4_portrait;
    use crate::models::resume::{ExperienceEntry, ResumeDocument};
    use crate::render::render;

    fn layout_for(doc: &ResumeDocument, layout: Layout) -> PageLayout {
        let config = DesignConfiguration {
            template: layout,
            ..DesignConfiguration::default()
        };
        compose(&render(doc, &config), &a4_portrait())
    }

    #[test]
    fn test_starter_fits_on_one_page_for_every_layout() {
        for layout in Layout::ALL {
            let page = layout_for(&ResumeDocument::starter(), layout);
            assert!(!page.overflowed, "{layout:?} should fit on one page");
            assert!(page.texts().any(|t| t == "John Doe"));
            assert!(page.texts().any(|t| t == "Work Experience"));
        }
    }

    #[test]
    fn test_empty_document_composes_section_titles_only() {
        let page = layout_for(&ResumeDocument::empty(), Layout::Modern);
        let texts: Vec<_> = page.texts().collect();
        assert_eq!(texts, vec!["Work Experience", "Education", "Skills"]);
        assert!(!page.overflowed);
    }

    #[test]
    fn test_ops_stay_inside_page_bounds() {
        let page = layout_for(&ResumeDocument::starter(), Layout::Elegant);
        for op in &page.ops {
            if let DrawOp::Text { x, y, .. } = op {
                assert!(*x >= 0.0 && *x <= page.width_pt, "x out of page: {op:?}");
                assert!(*y >= 0.0 && *y <= page.height_pt, "y out of page: {op:?}");
            }
        }
    }

    #[test]
    fn test_overflowing_content_is_flagged_not_paginated() {
        let mut doc = ResumeDocument::starter();
        for id in 10..60 {
            let mut entry = ExperienceEntry::placeholder(id);
            entry.description = "Line one\nLine two\nLine three".to_string();
            doc.experience.push(entry);
        }
        let page = layout_for(&doc, Layout::Modern);
        assert!(page.overflowed);
        let bottom = a4_portrait().content_bottom();
        assert!(page.ops.iter().all(|op| match op {
            DrawOp::Text { y, .. } => *y <= bottom,
            _ => true,
        }));
    }

    #[test]
    fn test_creative_header_fill_is_first_op() {
        let page = layout_for(&ResumeDocument::starter(), Layout::Creative);
        match &page.ops[0] {
            DrawOp::FillRect { y, height, .. } => {
                assert_eq!(*y, 0.0);
                assert!(*height > 0.0, "header fill height must be patched");
            }
            other => panic!("expected header fill, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_accent_falls_back_to_default_color() {
        let doc = ResumeDocument::starter();
        let with_color = |template| DesignConfiguration {
            template,
            color: "rebeccapurple".to_string(),
            ..DesignConfiguration::default()
        };
        let default = Rgb::parse_or(DEFAULT_COLOR, DEFAULT_COLOR);

        let creative = compose(&render(&doc, &with_color(Layout::Creative)), &a4_portrait());
        assert!(matches!(&creative.ops[0], DrawOp::FillRect { color, .. } if *color == default));

        let modern = compose(&render(&doc, &with_color(Layout::Modern)), &a4_portrait());
        let border = modern.ops.iter().find_map(|op| match op {
            DrawOp::Line { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(border, Some(default));

        let elegant = compose(&render(&doc, &with_color(Layout::Elegant)), &a4_portrait());
        let tint = elegant.ops.iter().find_map(|op| match op {
            DrawOp::FillRect { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(tint, Some(default.over_white(0.12)));
    }

    #[test]
    fn test_preview_scale_shrinks_everything() {
        let doc = ResumeDocument::starter();
        let mut visual = render(&doc, &DesignConfiguration::default());
        let full = compose(&visual, &a4_portrait());
        visual.preview_scale = 0.5;
        let half = compose(&visual, &a4_portrait());

        assert_eq!(half.width_pt, full.width_pt * 0.5);
        assert_eq!(half.ops.len(), full.ops.len());
        assert_ne!(half.ops, full.ops);
    }

    #[test]
    fn test_serif_font_selects_times() {
        let doc = ResumeDocument::starter();
        let config = DesignConfiguration {
            font: "Georgia".to_string(),
            ..DesignConfiguration::default()
        };
        let page = compose(&render(&doc, &config), &a4_portrait());
        assert_eq!(page.font, FontFamily::Times);
    }
}
