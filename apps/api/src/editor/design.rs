use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#4f46e5";
pub const DEFAULT_FONT: &str = "Inter";
pub const DEFAULT_SPACING: f32 = 1.5;
pub const DEFAULT_FONT_SIZE_PX: u32 = 14;

/// The closed set of visual layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Single column, accent border under the header.
    #[default]
    Modern,
    /// Single column, centered header, accent-underlined section titles.
    Classic,
    /// Accent-filled header block, main column plus skills sidebar.
    Creative,
    /// Header over a tinted sidebar (contact, skills) and a main column.
    Elegant,
}

impl Layout {
    #[cfg(test)]
    pub const ALL: [Layout; 4] = [
        Layout::Modern,
        Layout::Classic,
        Layout::Creative,
        Layout::Elegant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Modern => "modern",
            Layout::Classic => "classic",
            Layout::Creative => "creative",
            Layout::Elegant => "elegant",
        }
    }

    /// Case-insensitive lookup including the gallery's template ids.
    pub fn from_name(name: &str) -> Option<Layout> {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" | "smart" => Some(Layout::Modern),
            "classic" | "beam" => Some(Layout::Classic),
            "creative" => Some(Layout::Creative),
            "elegant" => Some(Layout::Elegant),
            _ => None,
        }
    }

    /// Like `from_name` but total: unknown names fall back to the default layout.
    pub fn resolve(name: &str) -> Layout {
        Layout::from_name(name).unwrap_or_default()
    }
}

/// Presentation parameters applied to a resume. Independent of the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignConfiguration {
    pub template: Layout,
    /// Any CSS-style color string; unparseable values fall back to the default accent at export.
    pub color: String,
    /// Any font name; export maps it onto the nearest base PDF family.
    pub font: String,
    /// Line-height multiplier. The editing control keeps it within 1.0..=2.0.
    pub spacing: f32,
    pub font_size: u32,
}

impl Default for DesignConfiguration {
    fn default() -> Self {
        Self {
            template: Layout::default(),
            color: DEFAULT_COLOR.to_string(),
            font: DEFAULT_FONT.to_string(),
            spacing: DEFAULT_SPACING,
            font_size: DEFAULT_FONT_SIZE_PX,
        }
    }
}

/// A template suggestion coming from the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub layout: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl DesignConfiguration {
    pub fn set_template(&mut self, layout: Layout) -> bool {
        replace(&mut self.template, layout)
    }

    pub fn set_color(&mut self, color: impl Into<String>) -> bool {
        replace(&mut self.color, color.into())
    }

    pub fn set_font(&mut self, font: impl Into<String>) -> bool {
        replace(&mut self.font, font.into())
    }

    pub fn set_spacing(&mut self, spacing: f32) -> bool {
        replace(&mut self.spacing, spacing)
    }

    pub fn set_font_size(&mut self, px: u32) -> bool {
        replace(&mut self.font_size, px)
    }

    /// Sets template and color together; font, spacing and size are untouched.
    pub fn apply_recommendation(&mut self, rec: &Recommendation) -> bool {
        let layout_changed = self.set_template(Layout::resolve(&rec.layout));
        let color_changed = self.set_color(rec.color.clone());
        layout_changed || color_changed
    }

    pub fn reset(&mut self) -> bool {
        replace(self, DesignConfiguration::default())
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
