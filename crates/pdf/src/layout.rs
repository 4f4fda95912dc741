//! Positioned text recovered from page content streams.
//!
//! Text-showing operators are replayed against the text matrix so every
//! string keeps the spot it was drawn at. Strings on the same baseline form a
//! [`TextLine`]; inside a line, text separated by a wide gap (or by two or
//! more spaces) becomes a separate [`TextCell`]. Glyph widths are not read
//! from the font; each glyph is assumed to advance half the font size.

use crate::error::{PdfError, Result};
use lazy_static::lazy_static;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use regex::Regex;

lazy_static! {
    static ref COLUMN_SEPARATOR: Regex = Regex::new(r"(\s{2,}|\t+|\|)+").unwrap();
    static ref HORIZONTAL_RULE: Regex = Regex::new(r"^[-=_]{3,}$").unwrap();
}

/// Estimated glyph advance, as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;
/// Baselines closer than this (in font sizes) belong to the same line.
const LINE_TOLERANCE: f32 = 0.5;
/// Gaps wider than this (in font sizes) separate two cells.
const CELL_GAP: f32 = 0.6;
/// Gaps wider than this (in font sizes) are a space between words.
const WORD_GAP: f32 = 0.15;

/// A run of text with its horizontal extent.
///
/// Units are user space for page content and characters for plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCell {
    pub x: f32,
    pub width: f32,
    pub text: String,
}

impl TextCell {
    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Length of the horizontal span shared with `other`.
    pub fn overlap(&self, other: &TextCell) -> f32 {
        (self.end().min(other.end()) - self.x.max(other.x)).max(0.0)
    }
}

/// Cells on one baseline, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub cells: Vec<TextCell>,
}

impl TextLine {
    /// A lone run of dashes, equals signs or underscores.
    pub fn is_rule(&self) -> bool {
        matches!(self.cells.as_slice(), [cell] if HORIZONTAL_RULE.is_match(&cell.text))
    }

    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.text.clone()).collect()
    }
}

/// Split plain text into lines, using character offsets as positions.
///
/// Lines are not trimmed, so indentation keeps columns aligned.
pub fn lines_from_text(text: &str) -> Vec<TextLine> {
    text.lines()
        .map(|line| TextLine {
            cells: split_runs(line, 0.0, 1.0),
        })
        .collect()
}

/// Read the positioned lines of one page, top to bottom.
pub fn page_lines(doc: &Document, page_id: ObjectId) -> Result<Vec<TextLine>> {
    let content = doc
        .get_page_content(page_id)
        .map_err(|e| PdfError::ParseError(format!("Failed to read page content: {}", e)))?;
    let content = Content::decode(&content)
        .map_err(|e| PdfError::ParseError(format!("Failed to decode page content: {}", e)))?;

    let mut state = TextState::default();
    for op in &content.operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "BT" => {
                state.tm = Matrix::IDENTITY;
                state.tlm = Matrix::IDENTITY;
            }
            "Tf" => {
                if let Some(size) = number(operands, 1) {
                    state.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = number(operands, 0) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                let values: Vec<f32> = operands.iter().filter_map(|o| o.as_float().ok()).collect();
                if let [a, b, c, d, e, f] = values[..] {
                    state.tlm = Matrix { a, b, c, d, e, f };
                    state.tm = state.tlm;
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    state.show(bytes);
                }
            }
            "'" => {
                state.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    state.show(bytes);
                }
            }
            "\"" => {
                state.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    state.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => state.show(bytes),
                            other => {
                                if let Ok(adjust) = other.as_float() {
                                    state.adjust(adjust);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(group_lines(state.fragments))
}

/// False when any cell holds control characters, which is what raw glyph
/// ids look like when a font has no byte-compatible encoding.
pub fn is_legible(lines: &[TextLine]) -> bool {
    !lines
        .iter()
        .flat_map(|line| &line.cells)
        .any(|cell| cell.text.chars().any(char::is_control))
}

#[derive(Debug, Clone, Copy)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translate(self, tx: f32, ty: f32) -> Self {
        Self {
            e: tx * self.a + ty * self.c + self.e,
            f: tx * self.b + ty * self.d + self.f,
            ..self
        }
    }
}

/// A string as drawn, before lines are formed.
#[derive(Debug, Clone)]
struct Fragment {
    x: f32,
    y: f32,
    /// Rendered font size
    size: f32,
    /// Horizontal advance of one glyph
    advance: f32,
    text: String,
}

#[derive(Debug)]
struct TextState {
    tm: Matrix,
    tlm: Matrix,
    font_size: f32,
    leading: f32,
    fragments: Vec<Fragment>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            font_size: 1.0,
            leading: 0.0,
            fragments: Vec::new(),
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = self.tlm.translate(tx, ty);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn show(&mut self, bytes: &[u8]) {
        let text = decode_text(bytes);
        let glyph = GLYPH_ADVANCE * self.font_size;

        if !text.trim().is_empty() {
            let scale = self.tm.b.hypot(self.tm.d);
            self.fragments.push(Fragment {
                x: self.tm.e,
                y: self.tm.f,
                size: (self.font_size * scale).abs().max(1.0),
                advance: glyph * self.tm.a,
                text: text.clone(),
            });
        }

        self.tm = self.tm.translate(text.chars().count() as f32 * glyph, 0.0);
    }

    /// TJ adjustments are in thousandths of an em, positive moving left.
    fn adjust(&mut self, thousandths: f32) {
        self.tm = self.tm.translate(-thousandths / 1000.0 * self.font_size, 0.0);
    }
}

fn number(operands: &[Object], index: usize) -> Option<f32> {
    operands.get(index).and_then(|o| o.as_float().ok())
}

fn decode_text(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1 covers the accented letters of WinAnsi text
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

fn group_lines(mut fragments: Vec<Fragment>) -> Vec<TextLine> {
    // PDF y grows upwards
    fragments.sort_by(|l, r| r.y.total_cmp(&l.y).then(l.x.total_cmp(&r.x)));

    let mut groups: Vec<Vec<Fragment>> = Vec::new();
    for fragment in fragments {
        match groups.last_mut() {
            Some(group) if (group[0].y - fragment.y).abs() <= group[0].size * LINE_TOLERANCE => {
                group.push(fragment);
            }
            _ => groups.push(vec![fragment]),
        }
    }

    groups
        .into_iter()
        .map(|mut group| {
            group.sort_by(|l, r| l.x.total_cmp(&r.x));
            TextLine {
                cells: merge_fragments(&group),
            }
        })
        .collect()
}

fn merge_fragments(fragments: &[Fragment]) -> Vec<TextCell> {
    let mut cells: Vec<TextCell> = Vec::new();

    for fragment in fragments {
        for (i, cell) in split_runs(&fragment.text, fragment.x, fragment.advance)
            .into_iter()
            .enumerate()
        {
            // Only the first run of a fragment can continue the previous cell
            match cells.last_mut() {
                Some(prev) if i == 0 && cell.x - prev.end() < fragment.size * CELL_GAP => {
                    if cell.x - prev.end() > fragment.size * WORD_GAP {
                        prev.text.push(' ');
                    }
                    prev.text.push_str(&cell.text);
                    prev.width = cell.end() - prev.x;
                }
                _ => cells.push(cell),
            }
        }
    }

    cells
}

/// Split `text` on column separators, placing each run `advance` units per
/// character from `x`.
fn split_runs(text: &str, x: f32, advance: f32) -> Vec<TextCell> {
    let mut cells = Vec::new();
    let mut push = |from: usize, to: usize| {
        let raw = &text[from..to];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let lead = raw.len() - raw.trim_start().len();
        let offset = text[..from + lead].chars().count();
        cells.push(TextCell {
            x: x + offset as f32 * advance,
            width: trimmed.chars().count() as f32 * advance,
            text: trimmed.to_string(),
        });
    };

    let mut from = 0;
    for sep in COLUMN_SEPARATOR.find_iter(text) {
        push(from, sep.start());
        from = sep.end();
    }
    push(from, text.len());

    cells
}
