//! Layout functions: one pure function per `Layout`, all sharing the same section
//! builder so every layout presents header → summary → experience → education → skills.

use crate::editor::design::{DesignConfiguration, Layout};
use crate::models::resume::ResumeDocument;
use crate::render::visual::{
    Align, Block, Border, Column, ColumnRole, EntryBlock, Fill, HeaderRegion, Item, PageStyle,
    Section, SectionKind, Side, TitleStyle, VisualDocument, INK, ON_ACCENT,
};

/// Renders `document` with `config`. Total: every document renders, including an empty one.
pub fn render(document: &ResumeDocument, config: &DesignConfiguration) -> VisualDocument {
    let accent = config.color.as_str();
    let (header, columns) = match config.template {
        Layout::Modern => modern(document, accent),
        Layout::Classic => classic(document, accent),
        Layout::Creative => creative(document, accent),
        Layout::Elegant => elegant(document, accent),
    };

    VisualDocument {
        layout: config.template,
        style: PageStyle {
            font: config.font.clone(),
            font_size_px: config.font_size,
            line_height: config.spacing,
            ink: INK.to_string(),
            accent: accent.to_string(),
        },
        preview_scale: 1.0,
        header,
        columns,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layouts
// ────────────────────────────────────────────────────────────────────────────

fn modern(doc: &ResumeDocument, accent: &str) -> (HeaderRegion, Vec<Column>) {
    let header = HeaderRegion {
        name: doc.full_name.clone(),
        name_color: accent.to_string(),
        contact_lines: contact_lines(doc),
        align: Align::Left,
        background: None,
        text_color: INK.to_string(),
        bottom_border: Some(Border {
            color: accent.to_string(),
            width_px: 2.0,
        }),
    };
    let sections = SectionSet::build(doc, TitleStyle::Colored {
        color: accent.to_string(),
    });
    (header, vec![main_column(sections.all())])
}

fn classic(doc: &ResumeDocument, accent: &str) -> (HeaderRegion, Vec<Column>) {
    let header = HeaderRegion {
        name: doc.full_name.clone(),
        name_color: INK.to_string(),
        contact_lines: contact_lines(doc),
        align: Align::Center,
        background: None,
        text_color: INK.to_string(),
        bottom_border: None,
    };
    let sections = SectionSet::build(doc, TitleStyle::Underlined {
        color: accent.to_string(),
    });
    (header, vec![main_column(sections.all())])
}

fn creative(doc: &ResumeDocument, accent: &str) -> (HeaderRegion, Vec<Column>) {
    let header = HeaderRegion {
        name: doc.full_name.clone(),
        name_color: ON_ACCENT.to_string(),
        contact_lines: contact_lines(doc),
        align: Align::Left,
        background: Some(Fill {
            color: accent.to_string(),
            opacity: 1.0,
        }),
        text_color: ON_ACCENT.to_string(),
        bottom_border: None,
    };
    let sections = SectionSet::build(doc, TitleStyle::Colored {
        color: accent.to_string(),
    });
    let (main, skills) = sections.split_skills();
    let sidebar = Column {
        role: ColumnRole::Sidebar { side: Side::Right },
        background: None,
        blocks: vec![Block::Section(skills)],
    };
    (header, vec![main_column(main), sidebar])
}

fn elegant(doc: &ResumeDocument, accent: &str) -> (HeaderRegion, Vec<Column>) {
    let header = HeaderRegion {
        name: doc.full_name.clone(),
        name_color: accent.to_string(),
        contact_lines: Vec::new(),
        align: Align::Left,
        background: None,
        text_color: INK.to_string(),
        bottom_border: None,
    };
    let sections = SectionSet::build(doc, TitleStyle::AccentBar {
        color: accent.to_string(),
    });
    let (main, skills) = sections.split_skills();
    let sidebar = Column {
        role: ColumnRole::Sidebar { side: Side::Left },
        background: Some(Fill {
            color: accent.to_string(),
            opacity: 0.12,
        }),
        blocks: vec![
            Block::Contact {
                lines: contact_details(doc),
            },
            Block::Section(skills),
        ],
    };
    (header, vec![main_column(main), sidebar])
}

// ────────────────────────────────────────────────────────────────────────────
// Shared builders
// ────────────────────────────────────────────────────────────────────────────

/// The sections every layout shows, in the shared order.
struct SectionSet {
    /// `None` when the summary is empty: the only section that may be omitted.
    summary: Option<Section>,
    experience: Section,
    education: Section,
    skills: Section,
}

impl SectionSet {
    fn build(doc: &ResumeDocument, title_style: TitleStyle) -> Self {
        let section = |kind: SectionKind, items: Vec<Item>| Section {
            kind,
            title: kind.title().to_string(),
            title_style: title_style.clone(),
            items,
        };

        let summary = (!doc.summary.trim().is_empty()).then(|| {
            section(
                SectionKind::Summary,
                vec![Item::Paragraph {
                    text: doc.summary.clone(),
                }],
            )
        });

        let experience = doc
            .experience
            .iter()
            .map(|e| {
                Item::Entry(EntryBlock {
                    entry_id: e.id,
                    title: e.title.clone(),
                    date: e.date.clone(),
                    subtitle: e.company.clone(),
                    location: e.location.clone(),
                    lines: e.description_lines(),
                })
            })
            .collect();

        let education = doc
            .education
            .iter()
            .map(|e| {
                Item::Entry(EntryBlock {
                    entry_id: e.id,
                    title: e.degree.clone(),
                    date: e.date.clone(),
                    subtitle: e.school.clone(),
                    location: e.location.clone(),
                    lines: Vec::new(),
                })
            })
            .collect();

        let skills = doc
            .skills
            .iter()
            .map(|s| Item::Chip { text: s.clone() })
            .collect();

        Self {
            summary,
            experience: section(SectionKind::Experience, experience),
            education: section(SectionKind::Education, education),
            skills: section(SectionKind::Skills, skills),
        }
    }

    fn all(self) -> Vec<Section> {
        self.summary
            .into_iter()
            .chain([self.experience, self.education, self.skills])
            .collect()
    }

    /// Main-column sections and the skills section, for sidebar layouts.
    fn split_skills(self) -> (Vec<Section>, Section) {
        let main = self
            .summary
            .into_iter()
            .chain([self.experience, self.education])
            .collect();
        (main, self.skills)
    }
}

fn main_column(sections: Vec<Section>) -> Column {
    Column {
        role: ColumnRole::Main,
        background: None,
        blocks: sections.into_iter().map(Block::Section).collect(),
    }
}

/// `email | phone | location` (empty parts skipped), then the profile link when present.
fn contact_lines(doc: &ResumeDocument) -> Vec<String> {
    let primary = [&doc.email, &doc.phone, &doc.location]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ");

    let mut lines = Vec::new();
    if !primary.is_empty() {
        lines.push(primary);
    }
    if !doc.linkedin.trim().is_empty() {
        lines.push(doc.linkedin.clone());
    }
    lines
}

/// One contact detail per line, for the sidebar.
fn contact_details(doc: &ResumeDocument) -> Vec<String> {
    [&doc.email, &doc.phone, &doc.location, &doc.linkedin]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::design::DesignConfiguration;
    use crate::models::resume::ResumeDocument;

    fn config(layout: Layout) -> DesignConfiguration {
        DesignConfiguration {
            template: layout,
            ..DesignConfiguration::default()
        }
    }

    fn section_order(visual: &VisualDocument) -> Vec<SectionKind> {
        visual.sections().map(|s| s.kind).collect()
    }

    #[test]
    fn test_empty_document_renders_on_every_layout() {
        let doc = ResumeDocument::empty();
        for layout in Layout::ALL {
            let visual = render(&doc, &config(layout));
            assert_eq!(visual.header.name, "");
            assert!(visual.header.contact_lines.is_empty());
            assert_eq!(
                section_order(&visual),
                vec![
                    SectionKind::Experience,
                    SectionKind::Education,
                    SectionKind::Skills
                ],
                "layout {layout:?} must keep empty sections and drop the summary"
            );
            assert!(visual.sections().all(|s| s.items.is_empty()));
        }
    }

    #[test]
    fn test_summary_present_only_when_non_empty() {
        let mut doc = ResumeDocument::starter();
        let visual = render(&doc, &DesignConfiguration::default());
        assert_eq!(section_order(&visual)[0], SectionKind::Summary);

        doc.summary = "   ".to_string();
        let visual = render(&doc, &DesignConfiguration::default());
        assert!(visual.section(SectionKind::Summary).is_none());
    }

    #[test]
    fn test_all_layouts_share_section_order() {
        let doc = ResumeDocument::starter();
        let expected = vec![
            SectionKind::Summary,
            SectionKind::Experience,
            SectionKind::Education,
            SectionKind::Skills,
        ];
        for layout in Layout::ALL {
            assert_eq!(section_order(&render(&doc, &config(layout))), expected);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let doc = ResumeDocument::starter();
        for layout in Layout::ALL {
            let cfg = config(layout);
            assert_eq!(render(&doc, &cfg), render(&doc, &cfg));
        }
    }

    #[test]
    fn test_entries_keep_document_order_and_ids() {
        let mut doc = ResumeDocument::starter();
        doc.education.reverse();
        let visual = render(&doc, &DesignConfiguration::default());
        let ids: Vec<_> = visual
            .section(SectionKind::Education)
            .unwrap()
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Entry(e) => Some(e.entry_id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_modern_uses_accent_border() {
        let visual = render(&ResumeDocument::starter(), &DesignConfiguration::default());
        let border = visual.header.bottom_border.expect("modern has a header border");
        assert_eq!(border.color, "#4f46e5");
        assert_eq!(visual.columns.len(), 1);
    }

    #[test]
    fn test_creative_fills_header_with_accent() {
        let mut cfg = config(Layout::Creative);
        cfg.color = "#0f766e".to_string();
        let visual = render(&ResumeDocument::starter(), &cfg);
        let fill = visual.header.background.expect("creative header is a color block");
        assert_eq!(fill.color, "#0f766e");
        assert_eq!(visual.header.text_color, ON_ACCENT);
        assert_eq!(visual.columns.len(), 2);
    }

    #[test]
    fn test_elegant_moves_contact_into_sidebar() {
        let visual = render(&ResumeDocument::starter(), &config(Layout::Elegant));
        assert!(visual.header.contact_lines.is_empty());
        let sidebar = &visual.columns[1];
        assert_eq!(sidebar.role, ColumnRole::Sidebar { side: Side::Left });
        match &sidebar.blocks[0] {
            Block::Contact { lines } => assert!(lines.contains(&"john.doe@email.com".to_string())),
            other => panic!("expected contact block, got {other:?}"),
        }
    }

    #[test]
    fn test_contact_line_skips_empty_parts() {
        let mut doc = ResumeDocument::empty();
        doc.email = "a@b.co".to_string();
        doc.location = "Oslo".to_string();
        let visual = render(&doc, &DesignConfiguration::default());
        assert_eq!(visual.header.contact_lines, vec!["a@b.co | Oslo".to_string()]);
    }
}
