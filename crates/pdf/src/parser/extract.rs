//! Content-stream walking and text fragment extraction.
//!
//! A simplified PDF text-rendering state machine turns each page's
//! text-showing operators into [`TextFragment`]s carrying the font, style
//! flags and top-left-origin geometry the outline pipeline consumes.
//!
//! ```text
//! content ops  ->  TextState  ->  TextFragment[]  ->  PageText
//!   (per page)     Tf/Tm/Td/cm     Tj/TJ/'/"
//! ```

use pdfoutline_core::fragment::{
    BBox, PageText, FLAG_BOLD, FLAG_ITALIC, FLAG_MONOSPACED, FLAG_SERIFED, FLAG_SUPERSCRIPT,
};

use super::backend::{
    get_number_from_value, BackendFontInfo, PageBox, PageId, PdfBackend, PdfValue,
};
use crate::PdfError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Approximate character width as a fraction of font size when no better
/// metric is available. 0.5 is a reasonable default for proportional fonts.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// TJ adjustments wider than this fraction of a character insert a space.
const TJ_SPACE_RATIO: f32 = 0.3;

/// The identity 2x3 matrix: [a, b, c, d, e, f].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

// ---------------------------------------------------------------------------
// Matrix helpers
// ---------------------------------------------------------------------------

/// Multiply two PDF matrices: `m1 x m2`.
fn multiply(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

/// Read six numeric operands as a matrix.
fn matrix_operands(operands: &[PdfValue]) -> Option<[f32; 6]> {
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    (vals.len() == 6).then(|| [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]])
}

// ---------------------------------------------------------------------------
// Font style
// ---------------------------------------------------------------------------

/// Derive the style bitset for a font from its base name and descriptor.
pub fn font_flags(base_font: &str, info: Option<&BackendFontInfo>) -> u32 {
    let upper = base_font.to_uppercase();
    let mut flags = 0;

    let bold_markers = ["BOLD", "BLACK", "HEAVY", "SEMIBOLD", "DEMI"];
    if bold_markers.iter().any(|m| upper.contains(m)) || info.is_some_and(|i| i.force_bold()) {
        flags |= FLAG_BOLD;
    }
    if upper.contains("ITALIC") || upper.contains("OBLIQUE") {
        flags |= FLAG_ITALIC;
    }
    if upper.contains("COURIER") || upper.contains("MONO") {
        flags |= FLAG_MONOSPACED;
    }
    if upper.contains("TIMES") || (upper.contains("SERIF") && !upper.contains("SANS")) {
        flags |= FLAG_SERIFED;
    }

    flags
}

// ---------------------------------------------------------------------------
// Internal: PDF text-state machine
// ---------------------------------------------------------------------------

/// Mutable state tracked while walking a page's content stream.
#[derive(Debug, Clone)]
struct TextState {
    /// Current font resource name (the `/F1`-style key, not the full name).
    font_key: Vec<u8>,
    /// Resolved base-font name for the current font.
    font_name: String,
    /// Style bitset for the current font.
    font_flags: u32,
    /// Current font size in text-space units.
    font_size: f32,
    /// Current transformation matrix.
    ctm: [f32; 6],
    /// Saved CTMs for `q` / `Q`.
    ctm_stack: Vec<[f32; 6]>,
    /// Elements [a, b, c, d, tx, ty] of the current text matrix.
    text_matrix: [f32; 6],
    /// Text line matrix -- set by BT and updated by Td/TD/T*/Tm.
    line_matrix: [f32; 6],
    /// Horizontal scaling factor (percent / 100). Default 1.0.
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_flags: 0,
            font_size: 0.0,
            ctm: IDENTITY_MATRIX,
            ctm_stack: Vec::new(),
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Text rendering matrix without rise: text matrix in device space.
    fn rendering_matrix(&self) -> [f32; 6] {
        multiply(&self.text_matrix, &self.ctm)
    }

    /// Current baseline origin in user space.
    fn origin(&self) -> (f32, f32) {
        let m = self.rendering_matrix();
        (m[4], m[5])
    }

    /// Effective font size accounting for the text and transformation matrices.
    ///
    /// The rendered size is `font_size * sqrt(b^2 + d^2)` of the rendering matrix.
    fn effective_font_size(&self) -> f32 {
        let m = self.rendering_matrix();
        let scale = (m[1].powi(2) + m[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    /// Horizontal scale of the rendering matrix, for width estimates.
    fn horizontal_scale(&self) -> f32 {
        let m = self.rendering_matrix();
        (m[0].powi(2) + m[1].powi(2)).sqrt()
    }

    /// Advance the text matrix horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Multiply the text line matrix by a translation (used by Td / TD).
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    /// Apply the `Tf` operator.
    fn set_font(&mut self, key: Vec<u8>, base_font: &str, flags: u32, size: f32) {
        self.font_key = key;
        self.font_size = size;
        self.font_flags = flags;
        self.font_name = base_font.to_string();
    }

    /// Style flags for text shown right now.
    fn flags(&self) -> u32 {
        if self.text_rise > 0.0 {
            self.font_flags | FLAG_SUPERSCRIPT
        } else {
            self.font_flags
        }
    }

    /// Width of `text` in text-space units, before scaling to user space.
    fn text_advance(&self, text: &str) -> f32 {
        let mut total: f32 = 0.0;
        for ch in text.chars() {
            total += (self.font_size * APPROX_CHAR_WIDTH_RATIO + self.char_spacing)
                * self.horiz_scale;
            if ch == ' ' {
                total += self.word_spacing * self.horiz_scale;
            }
        }
        total
    }
}

/// Resolve a font resource name to its [`BackendFontInfo`].
fn resolve_font<'a>(key: &[u8], fonts: &'a [BackendFontInfo]) -> Option<&'a BackendFontInfo> {
    fonts.iter().find(|info| info.name == key)
}

/// Decode a single [`PdfValue::Str`] operand, using the backend's font-aware decoder.
fn decode_string(
    val: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    match val {
        PdfValue::Str(bytes) => backend.decode_text(page_id, font_key, bytes),
        _ => String::new(),
    }
}

/// Collects fragments for one page while the state machine runs.
struct PageSink {
    page: PageText,
    page_box: PageBox,
}

impl PageSink {
    /// Record `text` shown at baseline origin `(x, y)` in user space.
    fn emit(&mut self, text: &str, origin: (f32, f32), width: f32, state: &TextState) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let size = state.effective_font_size();
        let (x, line_y) = self.page_box.to_top_left(origin.0, origin.1);
        let rise = state.text_rise * size / state.font_size.abs().max(f32::EPSILON);
        let bottom = line_y - rise;
        let bbox = BBox::new(x, bottom - size, x + width, bottom);

        self.page.push(
            text,
            state.font_name.clone(),
            size,
            state.flags(),
            bbox,
            line_y,
        );
    }
}

// ---------------------------------------------------------------------------
// Public API: page extraction
// ---------------------------------------------------------------------------

/// Walk a single page's content stream and produce its [`PageText`].
///
/// Handled operators:
///
/// | Operator | Action |
/// |----------|--------|
/// | `q` / `Q` | Save / restore the transformation matrix |
/// | `cm`     | Concatenate to the transformation matrix |
/// | `BT`     | Begin text object -- reset matrices |
/// | `Tf`     | Set font and size |
/// | `Tm`     | Set text matrix directly |
/// | `Td`     | Translate text position |
/// | `TD`     | Translate and set leading |
/// | `T*`     | Move to start of next line |
/// | `TL` `Tc` `Tw` `Tz` `Ts` | Text state parameters |
/// | `Tj`     | Show a string |
/// | `TJ`     | Show strings with kerning adjustments |
/// | `'`      | Move to next line and show string |
/// | `"`      | Set spacing, move to next line and show string |
pub fn extract_page(
    backend: &dyn PdfBackend,
    page_number: u32,
    page_id: PageId,
) -> Result<PageText, PdfError> {
    let page_box = backend.page_box(page_id)?;
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut sink = PageSink {
        page: PageText::new(page_number, page_box.width(), page_box.height()),
        page_box,
    };

    for op in &ops {
        match op.operator.as_str() {
            // -- Graphics state -----------------------------------------
            "q" => state.ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.ctm_stack.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    state.ctm = multiply(&m, &state.ctm);
                }
            }

            // -- Text object --------------------------------------------
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "Tf" => handle_tf(&op.operands, &fonts, &mut state),
            "Tm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.translate_line(0.0, -state.leading),
            "TL" | "Tc" | "Tw" | "Tz" | "Ts" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    match op.operator.as_str() {
                        "TL" => state.leading = v,
                        "Tc" => state.char_spacing = v,
                        "Tw" => state.word_spacing = v,
                        "Tz" => state.horiz_scale = v / 100.0,
                        _ => state.text_rise = v,
                    }
                }
            }

            // -- Show text ----------------------------------------------
            "Tj" => {
                if let Some(first) = op.operands.first() {
                    show_string(first, backend, page_id, &mut state, &mut sink);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    show_tj_array(arr, backend, page_id, &mut state, &mut sink);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(first) = op.operands.first() {
                    show_string(first, backend, page_id, &mut state, &mut sink);
                }
            }
            "\"" => {
                if op.operands.len() >= 3 {
                    if let Some(aw) = get_number_from_value(&op.operands[0]) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = get_number_from_value(&op.operands[1]) {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    show_string(&op.operands[2], backend, page_id, &mut state, &mut sink);
                }
            }

            _ => {}
        }
    }

    log::trace!(
        "page {}: {} fragments",
        page_number,
        sink.page.fragments.len()
    );

    Ok(sink.page)
}

/// Handle the `Tf` (set font) operator.
fn handle_tf(operands: &[PdfValue], fonts: &[BackendFontInfo], state: &mut TextState) {
    if operands.len() < 2 {
        return;
    }
    let key = match &operands[0] {
        PdfValue::Name(n) => n.clone(),
        PdfValue::Str(s) => s.clone(),
        _ => return,
    };
    let size = get_number_from_value(&operands[1]).unwrap_or(0.0);

    let info = resolve_font(&key, fonts);
    let base = match info.and_then(|i| i.base_font.as_deref()) {
        Some(base) => base.to_string(),
        // Font not in the resource dict: keep the key as its name.
        None => String::from_utf8_lossy(&key).into_owned(),
    };
    let flags = font_flags(&base, info);
    state.set_font(key, &base, flags, size);
}

/// Emit one fragment for a shown string and advance the text position.
/// Shared by `Tj`, `'`, and `"`.
fn show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    sink: &mut PageSink,
) {
    let text = decode_string(operand, backend, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    let origin = state.origin();
    let advance = state.text_advance(&text);
    sink.emit(&text, origin, advance * state.horizontal_scale(), state);
    state.advance_x(advance);
}

/// Process a `TJ` array: strings to render interleaved with kerning
/// adjustments in thousandths of a text-space unit. The whole array becomes
/// one fragment; large negative adjustments become spaces.
fn show_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    sink: &mut PageSink,
) {
    let mut buf = String::new();
    let origin = state.origin();
    let mut advance: f32 = 0.0;

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, backend, page_id, &state.font_key);
                let dx = state.text_advance(&fragment);
                buf.push_str(&fragment);
                state.advance_x(dx);
                advance += dx;
            }
            val => {
                if let Some(adj) = get_number_from_value(val) {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    let gap_threshold = state.font_size
                        * APPROX_CHAR_WIDTH_RATIO
                        * state.horiz_scale
                        * TJ_SPACE_RATIO;
                    if dx > gap_threshold && !buf.is_empty() && !buf.ends_with(' ') {
                        buf.push(' ');
                    }
                    state.advance_x(dx);
                    advance += dx;
                }
            }
        }
    }

    sink.emit(&buf, origin, advance * state.horizontal_scale(), state);
}

// ---------------------------------------------------------------------------
// Public API: multi-page extraction
// ---------------------------------------------------------------------------

/// Extract every page of the document, in page order.
pub fn extract_all_pages(backend: &dyn PdfBackend) -> Result<Vec<PageText>, PdfError> {
    backend
        .pages()
        .into_iter()
        .map(|(page_number, page_id)| extract_page(backend, page_number, page_id))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::backend::{decode_text_simple, ContentOp};
    use super::*;

    /// A minimal mock backend for testing the state machine.
    struct MockBackend {
        page_ids: BTreeMap<u32, PageId>,
        fonts: Vec<BackendFontInfo>,
        /// Raw content bytes are unused; we store pre-decoded ops directly.
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            self.page_ids.clone()
        }

        fn page_box(&self, _page: PageId) -> Result<PageBox, PdfError> {
            Ok(PageBox::default())
        }

        fn page_fonts(&self, _page_id: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
            Ok(self.fonts.clone())
        }

        fn page_content(&self, _page_id: PageId) -> Result<Vec<u8>, PdfError> {
            Ok(vec![])
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font_name: &[u8], data: &[u8]) -> String {
            decode_text_simple(data)
        }
    }

    fn make_op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn font(key: &[u8], base: &str) -> BackendFontInfo {
        BackendFontInfo {
            name: key.to_vec(),
            base_font: Some(base.to_string()),
            ..Default::default()
        }
    }

    fn backend(ops: Vec<ContentOp>) -> MockBackend {
        MockBackend {
            page_ids: BTreeMap::from([(1, (1, 0))]),
            fonts: vec![
                font(b"F1", "Helvetica"),
                font(b"F2", "Helvetica-Bold"),
                font(b"F3", "Times-Italic"),
            ],
            ops,
        }
    }

    fn tf_op(font: &[u8], size: f32) -> ContentOp {
        make_op(
            "Tf",
            vec![PdfValue::Name(font.to_vec()), PdfValue::Real(size)],
        )
    }

    fn tm_op(tx: f32, ty: f32) -> ContentOp {
        make_op(
            "Tm",
            vec![
                PdfValue::Real(1.0),
                PdfValue::Real(0.0),
                PdfValue::Real(0.0),
                PdfValue::Real(1.0),
                PdfValue::Real(tx),
                PdfValue::Real(ty),
            ],
        )
    }

    fn td_op(tx: f32, ty: f32) -> ContentOp {
        make_op("Td", vec![PdfValue::Real(tx), PdfValue::Real(ty)])
    }

    fn tj_op(text: &[u8]) -> ContentOp {
        make_op("Tj", vec![PdfValue::Str(text.to_vec())])
    }

    fn page_of(ops: Vec<ContentOp>) -> PageText {
        extract_page(&backend(ops), 1, (1, 0)).unwrap()
    }

    #[test]
    fn test_extract_simple_tj() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            tm_op(72.0, 700.0),
            tj_op(b"Hello World"),
            make_op("ET", vec![]),
        ]);

        assert_eq!(page.number, 1);
        assert_eq!(page.width, 612.0);
        assert_eq!(page.height, 792.0);
        assert_eq!(page.fragments.len(), 1);

        let fragment = &page.fragments[0];
        assert_eq!(fragment.text, "Hello World");
        assert_eq!(fragment.font, "Helvetica");
        assert!((fragment.size - 12.0).abs() < 0.01);
        assert!((fragment.bbox.x0 - 72.0).abs() < 0.01);
        // Baseline at 700 from the bottom is 92 from the top.
        assert!((fragment.line_y - 92.0).abs() < 0.01);
        assert!((fragment.bbox.y0 - 80.0).abs() < 0.01);
        assert!((fragment.relative_y - 80.0 / 792.0).abs() < 1e-4);
        assert!(!fragment.is_bold());
    }

    #[test]
    fn test_extract_bold_font_sets_flag() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F2", 14.0),
            tm_op(72.0, 750.0),
            tj_op(b"Bold Title"),
            make_op("ET", vec![]),
        ]);
        let fragment = &page.fragments[0];
        assert!(fragment.is_bold());
        assert_eq!(fragment.flags & FLAG_BOLD, 16);
        assert_eq!(fragment.font, "Helvetica-Bold");
    }

    #[test]
    fn test_extract_italic_font_sets_flag() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F3", 12.0),
            tm_op(72.0, 700.0),
            tj_op(b"Italic text"),
        ]);
        let fragment = &page.fragments[0];
        assert!(fragment.is_italic());
        assert!(!fragment.is_bold());
        assert_ne!(fragment.flags & FLAG_SERIFED, 0);
    }

    #[test]
    fn test_extract_td_moves_down_the_page() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 10.0),
            td_op(72.0, 700.0),
            tj_op(b"First line"),
            td_op(0.0, -14.0),
            tj_op(b"Second line"),
        ]);
        assert_eq!(page.fragments.len(), 2);
        assert!((page.fragments[0].line_y - 92.0).abs() < 0.01);
        assert!((page.fragments[1].line_y - 106.0).abs() < 0.01);
        assert!((page.fragments[1].bbox.x0 - 72.0).abs() < 0.01);
    }

    #[test]
    fn test_extract_t_star_uses_leading() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 10.0),
            make_op("TL", vec![PdfValue::Real(12.0)]),
            td_op(72.0, 700.0),
            tj_op(b"One"),
            make_op("T*", vec![]),
            tj_op(b"Two"),
        ]);
        assert!((page.fragments[1].line_y - page.fragments[0].line_y - 12.0).abs() < 0.01);
    }

    #[test]
    fn test_extract_tj_array_inserts_space_on_large_gap() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            tm_op(72.0, 700.0),
            make_op(
                "TJ",
                vec![PdfValue::Array(vec![
                    PdfValue::Str(b"Hel".to_vec()),
                    PdfValue::Integer(-10),
                    PdfValue::Str(b"lo".to_vec()),
                    PdfValue::Integer(-400),
                    PdfValue::Str(b"World".to_vec()),
                ])],
            ),
        ]);
        assert_eq!(page.fragments.len(), 1);
        assert_eq!(page.fragments[0].text, "Hello World");
    }

    #[test]
    fn test_extract_quote_operators() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 10.0),
            make_op("TL", vec![PdfValue::Real(12.0)]),
            td_op(72.0, 700.0),
            make_op("'", vec![PdfValue::Str(b"Quoted".to_vec())]),
            make_op(
                "\"",
                vec![
                    PdfValue::Real(1.0),
                    PdfValue::Real(0.5),
                    PdfValue::Str(b"Double".to_vec()),
                ],
            ),
        ]);
        assert_eq!(page.fragments.len(), 2);
        assert_eq!(page.fragments[0].text, "Quoted");
        assert!((page.fragments[0].line_y - 104.0).abs() < 0.01);
        assert!((page.fragments[1].line_y - 116.0).abs() < 0.01);
    }

    #[test]
    fn test_extract_ctm_scales_size_and_position() {
        let page = page_of(vec![
            make_op("q", vec![]),
            make_op(
                "cm",
                vec![
                    PdfValue::Real(2.0),
                    PdfValue::Real(0.0),
                    PdfValue::Real(0.0),
                    PdfValue::Real(2.0),
                    PdfValue::Real(0.0),
                    PdfValue::Real(0.0),
                ],
            ),
            make_op("BT", vec![]),
            tf_op(b"F1", 10.0),
            tm_op(36.0, 350.0),
            tj_op(b"Scaled"),
            make_op("ET", vec![]),
            make_op("Q", vec![]),
            make_op("BT", vec![]),
            tf_op(b"F1", 10.0),
            tm_op(36.0, 350.0),
            tj_op(b"Unscaled"),
        ]);
        let scaled = &page.fragments[0];
        assert!((scaled.size - 20.0).abs() < 0.01);
        assert!((scaled.bbox.x0 - 72.0).abs() < 0.01);
        assert!((scaled.line_y - 92.0).abs() < 0.01);

        let unscaled = &page.fragments[1];
        assert!((unscaled.size - 10.0).abs() < 0.01);
        assert!((unscaled.bbox.x0 - 36.0).abs() < 0.01);
    }

    #[test]
    fn test_extract_skips_blank_strings() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            tj_op(b"   "),
            tj_op(b""),
        ]);
        assert!(page.fragments.is_empty());
    }

    #[test]
    fn test_extract_rise_marks_superscript() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 10.0),
            tm_op(72.0, 700.0),
            make_op("Ts", vec![PdfValue::Real(3.0)]),
            tj_op(b"note"),
        ]);
        let fragment = &page.fragments[0];
        assert_ne!(fragment.flags & FLAG_SUPERSCRIPT, 0);
        // Rise lifts the box but not the line origin.
        assert!((fragment.line_y - 92.0).abs() < 0.01);
        assert!((fragment.bbox.y1 - 89.0).abs() < 0.01);
    }

    #[test]
    fn test_extract_font_not_in_dict_uses_key() {
        let page = page_of(vec![
            make_op("BT", vec![]),
            tf_op(b"F99", 12.0),
            tj_op(b"Mystery"),
        ]);
        assert_eq!(page.fragments[0].font, "F99");
    }

    #[test]
    fn test_extract_all_pages_numbers_pages() {
        let mut backend = backend(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            tm_op(72.0, 700.0),
            tj_op(b"Page text"),
        ]);
        backend.page_ids = BTreeMap::from([(1, (1, 0)), (2, (2, 0))]);

        let pages = extract_all_pages(&backend).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].fragments[0].page, 2);
    }

    #[test]
    fn test_extract_all_pages_empty_document() {
        let mut backend = backend(vec![]);
        backend.page_ids = BTreeMap::new();
        assert!(extract_all_pages(&backend).unwrap().is_empty());
    }

    #[test]
    fn test_font_flags() {
        assert_eq!(font_flags("Helvetica", None), 0);
        assert_ne!(font_flags("Arial-BoldMT", None) & FLAG_BOLD, 0);
        assert_ne!(font_flags("Courier", None) & FLAG_MONOSPACED, 0);

        let forced = BackendFontInfo {
            descriptor_flags: Some(1 << 18),
            ..Default::default()
        };
        assert_ne!(font_flags("CustomFace", Some(&forced)) & FLAG_BOLD, 0);
    }
}
