//! Single-page PDF emission from a composed `PageLayout`.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::layout::{DrawOp, PageLayout};

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

/// Writes `layout` as a one-page PDF. Layout coordinates are top-down; PDF user
/// space is bottom-up, so every y is flipped against the page height.
pub fn write_pdf(layout: &PageLayout, title: &str) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let regular_id = Ref::new(4);
    let bold_id = Ref::new(5);
    let content_id = Ref::new(6);
    let info_id = Ref::new(7);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, layout.width_pt, layout.height_pt));
    page.parent(page_tree_id);
    page.contents(content_id);
    {
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(REGULAR, regular_id);
        fonts.pair(BOLD, bold_id);
        fonts.finish();
        resources.finish();
    }
    page.finish();

    for (id, bold) in [(regular_id, false), (bold_id, true)] {
        pdf.type1_font(id)
            .base_font(Name(layout.font.base_font(bold).as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let content = content_stream(layout);
    pdf.stream(content_id, &content);

    let title = if title.trim().is_empty() {
        "Resume".to_string()
    } else {
        format!("{} Resume", title.trim())
    };
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .producer(TextStr("studio-api"));

    pdf.finish()
}

fn content_stream(layout: &PageLayout) -> Vec<u8> {
    let h = layout.height_pt;
    let mut content = Content::new();

    for op in &layout.ops {
        match op {
            DrawOp::FillRect { x, y, width, height, color } => {
                content.set_fill_rgb(color.r, color.g, color.b);
                content.rect(*x, h - y - height, *width, *height);
                content.fill_nonzero();
            }
            DrawOp::StrokeRect { x, y, width, height, color, line_width } => {
                content.set_stroke_rgb(color.r, color.g, color.b);
                content.set_line_width(*line_width);
                content.rect(*x, h - y - height, *width, *height);
                content.stroke();
            }
            DrawOp::Line { x1, y1, x2, y2, color, line_width } => {
                content.set_stroke_rgb(color.r, color.g, color.b);
                content.set_line_width(*line_width);
                content.move_to(*x1, h - y1);
                content.line_to(*x2, h - y2);
                content.stroke();
            }
            DrawOp::Text { x, y, text, size, bold, color } => {
                let encoded = win_ansi(text);
                content.set_fill_rgb(color.r, color.g, color.b);
                content.begin_text();
                content.set_font(if *bold { BOLD } else { REGULAR }, *size);
                content.next_line(*x, h - y);
                content.show(Str(&encoded));
                content.end_text();
            }
        }
    }

    content.finish()
}

/// Encodes `text` for the base fonts' WinAnsi encoding. Characters outside it become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\u{2011}' | '\u{2010}' => b'-',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::color::Rgb;
    use crate::layout::font_metrics::FontFamily;

    fn layout_with(ops: Vec<DrawOp>) -> PageLayout {
        PageLayout {
            width_pt: 595.0,
            height_pt: 842.0,
            font: FontFamily::Helvetica,
            ops,
            overflowed: false,
        }
    }

    #[test]
    fn test_win_ansi_maps_typographic_punctuation() {
        assert_eq!(win_ansi("a • b – c — d"), b"a \x95 b \x96 c \x97 d".to_vec());
        assert_eq!(win_ansi("café"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(win_ansi("日本"), b"??".to_vec());
        assert_eq!(win_ansi("x\u{2011}y"), b"x-y".to_vec());
    }

    #[test]
    fn test_pdf_has_header_and_trailer() {
        let bytes = write_pdf(&layout_with(Vec::new()), "Jane");
        assert!(bytes.starts_with(b"%PDF-"));
        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(16)..]).to_string();
        assert!(tail.contains("%%EOF"), "tail was {tail:?}");
    }

    #[test]
    fn test_pdf_names_selected_base_fonts() {
        let mut layout = layout_with(Vec::new());
        layout.font = FontFamily::Times;
        let text = String::from_utf8_lossy(&write_pdf(&layout, "")).to_string();
        assert!(text.contains("/Times-Roman"));
        assert!(text.contains("/Times-Bold"));
        assert!(text.contains("/WinAnsiEncoding"));
    }

    #[test]
    fn test_text_is_flipped_into_pdf_space() {
        let layout = layout_with(vec![DrawOp::Text {
            x: 40.0,
            y: 100.0,
            text: "Hello".to_string(),
            size: 12.0,
            bold: false,
            color: Rgb::WHITE,
        }]);
        let stream = String::from_utf8_lossy(&content_stream(&layout)).to_string();
        assert!(stream.contains("40 742 Td"), "stream was {stream}");
        assert!(stream.contains("(Hello) Tj"));
    }
}
