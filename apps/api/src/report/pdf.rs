//! Paginated PDF export via `printpdf`.
//!
//! Layout happens in two steps: `compose_*` turns blocks into positioned
//! draw ops grouped by page (pure, testable), then `write_pdf` emits them.
//! Builtin Helvetica only encodes Latin-1, so every literal goes through
//! `normalize` before it is placed.

use std::io::BufWriter;

use printpdf::{BuiltinFont, Line, Mm, PdfDocument, Point};

use crate::report::model::{Block, MetricEntry, REPORT_TITLE, TABLE_HEADER};
use crate::report::ReportError;
use crate::text::normalize::{normalize, strip_markup};

// A4 portrait
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width in em. Used for wrapping and centering only.
const AVG_CHAR_EM: f32 = 0.5;

const SECTION_GAP_MM: f32 = 3.0;
const TABLE_GAP_MM: f32 = 5.0;
const CELL_PADDING_MM: f32 = 1.5;

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    size_pt: f32,
    bold: bool,
    line_mm: f32,
}

const TITLE: TextStyle = TextStyle {
    size_pt: 16.0,
    bold: true,
    line_mm: 10.0,
};
const HEADING: TextStyle = TextStyle {
    size_pt: 14.0,
    bold: true,
    line_mm: 8.0,
};
const BODY: TextStyle = TextStyle {
    size_pt: 12.0,
    bold: false,
    line_mm: 6.0,
};
const SIMPLE_BODY: TextStyle = TextStyle {
    size_pt: 12.0,
    bold: false,
    line_mm: 8.0,
};

impl TextStyle {
    fn char_width_mm(&self) -> f32 {
        self.size_pt * PT_TO_MM * AVG_CHAR_EM
    }

    /// Characters that fit on one line of the given width.
    fn max_chars(&self, width_mm: f32) -> usize {
        ((width_mm / self.char_width_mm()).floor() as usize).max(1)
    }
}

/// A positioned drawing instruction. Coordinates are PDF-style (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PdfOp {
    Text {
        text: String,
        x_mm: f32,
        y_mm: f32,
        size_pt: f32,
        bold: bool,
    },
    Frame {
        x_mm: f32,
        y_mm: f32,
        w_mm: f32,
        h_mm: f32,
    },
}

/// Tracks the vertical cursor and starts a new page when content would cross
/// the bottom margin.
struct Composer {
    pages: Vec<Vec<PdfOp>>,
    y_mm: f32,
}

impl Composer {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y_mm: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn ensure_space(&mut self, height_mm: f32) {
        if self.y_mm - height_mm < MARGIN_MM {
            self.pages.push(Vec::new());
            self.y_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn push(&mut self, op: PdfOp) {
        // pages is never empty
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }

    fn gap(&mut self, height_mm: f32) {
        self.y_mm = (self.y_mm - height_mm).max(MARGIN_MM);
    }

    /// Places one already-normalized line. Empty lines still consume height.
    fn line(&mut self, text: &str, x_mm: f32, style: TextStyle) {
        self.ensure_space(style.line_mm);
        self.y_mm -= style.line_mm;
        if !text.is_empty() {
            self.push(PdfOp::Text {
                text: text.to_string(),
                x_mm,
                y_mm: self.y_mm + baseline_offset(style),
                size_pt: style.size_pt,
                bold: style.bold,
            });
        }
    }

    /// Normalizes, wraps to the content width, and places every resulting line.
    fn wrapped(&mut self, text: &str, style: TextStyle) {
        let max_chars = style.max_chars(CONTENT_WIDTH_MM);
        for line in wrap_text(&normalize(text), max_chars) {
            self.line(&line, MARGIN_MM, style);
        }
    }

    fn centered(&mut self, text: &str, style: TextStyle) {
        let text = normalize(text);
        let width = text.chars().count() as f32 * style.char_width_mm();
        let x_mm = ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM);
        self.line(&text, x_mm, style);
    }

    /// Two bordered columns of equal width; rows grow to fit wrapped cell text.
    fn table(&mut self, rows: &[MetricEntry]) {
        let header = [TABLE_HEADER[0].to_string(), TABLE_HEADER[1].to_string()];
        let body = rows.iter().map(|r| [r.label.clone(), r.value.clone()]);
        for cells in std::iter::once(header).chain(body) {
            self.table_row(&cells);
        }
    }

    fn table_row(&mut self, cells: &[String; 2]) {
        let col_w = CONTENT_WIDTH_MM / 2.0;
        let max_chars = BODY.max_chars(col_w - 2.0 * CELL_PADDING_MM);
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .map(|c| wrap_text(&normalize(c), max_chars))
            .collect();
        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        let row_h = line_count as f32 * BODY.line_mm + 2.0;

        self.ensure_space(row_h);
        let top = self.y_mm;
        let bottom = top - row_h;

        for (col, lines) in wrapped.iter().enumerate() {
            let x_mm = MARGIN_MM + col as f32 * col_w;
            self.push(PdfOp::Frame {
                x_mm,
                y_mm: bottom,
                w_mm: col_w,
                h_mm: row_h,
            });
            for (i, line) in lines.iter().enumerate().filter(|(_, l)| !l.is_empty()) {
                let line_top = top - 1.0 - i as f32 * BODY.line_mm;
                self.push(PdfOp::Text {
                    text: line.clone(),
                    x_mm: x_mm + CELL_PADDING_MM,
                    y_mm: line_top - BODY.line_mm + baseline_offset(BODY),
                    size_pt: BODY.size_pt,
                    bold: false,
                });
            }
        }

        self.y_mm = bottom;
    }

    fn finish(self) -> Vec<Vec<PdfOp>> {
        self.pages
    }
}

/// Distance from the bottom of a line box to the text baseline.
fn baseline_offset(style: TextStyle) -> f32 {
    (style.line_mm - style.size_pt * PT_TO_MM) / 2.0 + 0.5
}

/// Greedy word wrap by character count. Words longer than a line are split.
/// Always returns at least one (possibly empty) line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lays out the full report block list into pages of draw ops.
pub(crate) fn compose_report(blocks: &[Block]) -> Vec<Vec<PdfOp>> {
    let mut composer = Composer::new();
    let mut after_section = false;

    for block in blocks {
        match block {
            Block::Title(text) => {
                composer.centered(text, TITLE);
                composer.gap(TABLE_GAP_MM);
            }
            Block::Heading(text) => {
                if after_section {
                    composer.gap(SECTION_GAP_MM);
                }
                composer.wrapped(text, HEADING);
                after_section = true;
            }
            Block::Table(rows) => {
                composer.table(rows);
                composer.gap(TABLE_GAP_MM);
                after_section = false;
            }
            Block::Bullet(text) => composer.wrapped(&format!("- {text}"), BODY),
            Block::Numbered { ordinal, text } => {
                composer.wrapped(&format!("{ordinal}. {text}"), BODY)
            }
            Block::Paragraph(text) => {
                if text.is_empty() {
                    composer.line("", MARGIN_MM, BODY);
                }
                for line in text.lines() {
                    composer.wrapped(line, BODY);
                }
            }
        }
    }

    composer.finish()
}

/// Lays out a single free-text field: markdown stripped, one wrapped paragraph per line.
pub(crate) fn compose_simple(text: &str) -> Vec<Vec<PdfOp>> {
    let mut composer = Composer::new();
    for line in strip_markup(text).lines() {
        composer.wrapped(line, SIMPLE_BODY);
    }
    composer.finish()
}

/// Renders the full report layout as a paginated PDF.
pub fn render_report_pdf(blocks: &[Block]) -> Result<Vec<u8>, ReportError> {
    write_pdf(REPORT_TITLE, &compose_report(blocks))
}

/// Renders a single text field (resume, cover letter, tailored resume) as a PDF.
pub fn render_simple_pdf(title: &str, text: &str) -> Result<Vec<u8>, ReportError> {
    write_pdf(title, &compose_simple(text))
}

fn write_pdf(title: &str, pages: &[Vec<PdfOp>]) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        normalize(title),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..pages.len() {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for (layer, ops) in layers.iter().zip(pages) {
        for op in ops {
            match op {
                PdfOp::Text {
                    text,
                    x_mm,
                    y_mm,
                    size_pt,
                    bold: is_bold,
                } => {
                    let font = if *is_bold { &bold } else { &regular };
                    layer.use_text(text.as_str(), *size_pt, Mm(*x_mm), Mm(*y_mm), font);
                }
                PdfOp::Frame {
                    x_mm,
                    y_mm,
                    w_mm,
                    h_mm,
                } => {
                    layer.set_outline_thickness(0.3);
                    layer.add_line(frame(*x_mm, *y_mm, *w_mm, *h_mm));
                }
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

fn frame(x: f32, y: f32, w: f32, h: f32) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ],
        is_closed: true,
    }
}
