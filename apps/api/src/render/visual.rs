use serde::{Deserialize, Serialize};

use crate::editor::design::Layout;
use crate::models::resume::EntryId;

/// Default ink used for body text on every layout.
pub const INK: &str = "#1e293b";
pub const CHIP_FILL: &str = "#f1f5f9";
pub const CHIP_BORDER: &str = "#e2e8f0";
pub const ON_ACCENT: &str = "#ffffff";

/// The laid-out resume: what the preview shows and what export snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualDocument {
    pub layout: Layout,
    pub style: PageStyle,
    /// On-screen zoom applied by the preview surface. Render always produces 1.0;
    /// export resets it to 1.0 before taking the snapshot.
    pub preview_scale: f32,
    pub header: HeaderRegion,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStyle {
    pub font: String,
    pub font_size_px: u32,
    pub line_height: f32,
    pub ink: String,
    pub accent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderRegion {
    pub name: String,
    pub name_color: String,
    pub contact_lines: Vec<String>,
    pub align: Align,
    pub background: Option<Fill>,
    pub text_color: String,
    pub bottom_border: Option<Border>,
}

/// A background fill; `opacity` blends the color over white paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: String,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: String,
    pub width_px: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ColumnRole {
    Main,
    Sidebar { side: Side },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub role: ColumnRole,
    pub background: Option<Fill>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    /// Contact details moved out of the header (sidebar layouts).
    Contact { lines: Vec<String> },
    Section(Section),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Summary => "Professional Summary",
            SectionKind::Experience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
        }
    }
}

/// How the accent color decorates a section title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum TitleStyle {
    Colored { color: String },
    Underlined { color: String },
    AccentBar { color: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub title_style: TitleStyle,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Paragraph { text: String },
    Entry(EntryBlock),
    Chip { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryBlock {
    pub entry_id: EntryId,
    pub title: String,
    pub date: String,
    pub subtitle: String,
    pub location: String,
    pub lines: Vec<String>,
}

impl VisualDocument {
    /// Sections in reading order: columns are flattened in declaration order.
    #[cfg(test)]
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.columns.iter().flat_map(|c| {
            c.blocks.iter().filter_map(|b| match b {
                Block::Section(s) => Some(s),
                Block::Contact { .. } => None,
            })
        })
    }

    #[cfg(test)]
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections().find(|s| s.kind == kind)
    }

    /// Copy with any preview zoom removed; this is what export lays out.
    pub fn unscaled(&self) -> VisualDocument {
        VisualDocument {
            preview_scale: 1.0,
            ..self.clone()
        }
    }
}
