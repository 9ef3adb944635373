use serde::{Deserialize, Serialize};

/// Style flag: raised or lowered text.
pub const FLAG_SUPERSCRIPT: u32 = 1 << 0;
/// Style flag: italic or oblique face.
pub const FLAG_ITALIC: u32 = 1 << 1;
/// Style flag: serifed face.
pub const FLAG_SERIFED: u32 = 1 << 2;
/// Style flag: fixed-pitch face.
pub const FLAG_MONOSPACED: u32 = 1 << 3;
/// Style flag: bold face.
pub const FLAG_BOLD: u32 = 1 << 4;

/// Axis-aligned box in page coordinates, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        BBox { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// The smallest decoded unit of text, with its own font and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub font: String,
    pub size: f32,
    /// Style bitset, see the `FLAG_*` constants.
    pub flags: u32,
    /// 1-based page number.
    pub page: u32,
    pub bbox: BBox,
    pub page_width: f32,
    pub page_height: f32,
    pub relative_x: f32,
    pub relative_y: f32,
    /// Vertical origin of the text line this fragment was shown on.
    pub line_y: f32,
}

impl TextFragment {
    /// Build a fragment positioned on `page`, deriving the normalized
    /// coordinates from the page dimensions.
    pub fn new(
        page: &PageText,
        text: impl Into<String>,
        font: impl Into<String>,
        size: f32,
        flags: u32,
        bbox: BBox,
        line_y: f32,
    ) -> Self {
        TextFragment {
            text: text.into(),
            font: font.into(),
            size,
            flags,
            page: page.number,
            bbox,
            page_width: page.width,
            page_height: page.height,
            relative_x: normalize(bbox.x0, page.width),
            relative_y: normalize(bbox.y0, page.height),
            line_y,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.flags & FLAG_BOLD != 0
    }

    pub fn is_italic(&self) -> bool {
        self.flags & FLAG_ITALIC != 0
    }

    pub fn x(&self) -> f32 {
        self.bbox.x0
    }
}

fn normalize(value: f32, extent: f32) -> f32 {
    if extent > 0.0 {
        value / extent
    } else {
        0.0
    }
}

/// One decoded page: its geometry and fragments in decoder order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageText {
    pub number: u32,
    pub width: f32,
    pub height: f32,
    pub fragments: Vec<TextFragment>,
}

impl PageText {
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        PageText {
            number,
            width,
            height,
            fragments: Vec::new(),
        }
    }

    /// Append a fragment located on this page.
    pub fn push(
        &mut self,
        text: impl Into<String>,
        font: impl Into<String>,
        size: f32,
        flags: u32,
        bbox: BBox,
        line_y: f32,
    ) {
        let fragment = TextFragment::new(self, text, font, size, flags, bbox, line_y);
        self.fragments.push(fragment);
    }
}
