//! Block-structured DOCX export via `docx-rs`.
//!
//! Headings, a two-column table, and bullet/number lists backed by numbering
//! definitions. Word handles Unicode, so text is written without Latin-1
//! normalization.

use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText,
    NumberFormat, Numbering, NumberingId, Paragraph, Run, SpecialIndentType, Start, Style,
    StyleType, Table, TableCell, TableRow,
};

use crate::report::model::{Block, MetricEntry, TABLE_HEADER};
use crate::report::ReportError;

const TITLE_STYLE: &str = "Title";
const HEADING_STYLE: &str = "Heading1";
const LIST_BULLET_STYLE: &str = "ListBullet";
const LIST_NUMBER_STYLE: &str = "ListNumber";

const BULLET_NUMBERING_ID: usize = 1;
const DECIMAL_NUMBERING_ID: usize = 2;

/// Renders the full report layout as a DOCX document.
pub fn render_report_docx(blocks: &[Block]) -> Result<Vec<u8>, ReportError> {
    let mut docx = base_document();

    for block in blocks {
        docx = match block {
            Block::Title(text) => docx.add_paragraph(
                text_paragraph(text)
                    .style(TITLE_STYLE)
                    .align(AlignmentType::Center),
            ),
            Block::Heading(text) => docx.add_paragraph(text_paragraph(text).style(HEADING_STYLE)),
            Block::Table(rows) => docx.add_table(metrics_table(rows)),
            Block::Bullet(text) => docx.add_paragraph(
                text_paragraph(text)
                    .style(LIST_BULLET_STYLE)
                    .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0)),
            ),
            // The decimal list numbers items itself, in the same 1..N order as `ordinal`.
            Block::Numbered { text, .. } => docx.add_paragraph(
                text_paragraph(text)
                    .style(LIST_NUMBER_STYLE)
                    .numbering(NumberingId::new(DECIMAL_NUMBERING_ID), IndentLevel::new(0)),
            ),
            Block::Paragraph(text) => docx.add_paragraph(text_paragraph(text)),
        };
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ReportError::Docx(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Styles and list numbering shared by every report.
fn base_document() -> Docx {
    Docx::new()
        .add_style(
            Style::new(TITLE_STYLE, StyleType::Paragraph)
                .name("Title")
                .size(48)
                .bold(),
        )
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_style(Style::new(LIST_BULLET_STYLE, StyleType::Paragraph).name("List Bullet"))
        .add_style(Style::new(LIST_NUMBER_STYLE, StyleType::Paragraph).name("List Number"))
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(
            list_level(NumberFormat::new("bullet"), LevelText::new("\u{2022}")),
        ))
        .add_abstract_numbering(AbstractNumbering::new(DECIMAL_NUMBERING_ID).add_level(
            list_level(NumberFormat::new("decimal"), LevelText::new("%1.")),
        ))
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
        .add_numbering(Numbering::new(DECIMAL_NUMBERING_ID, DECIMAL_NUMBERING_ID))
}

fn list_level(format: NumberFormat, text: LevelText) -> Level {
    Level::new(0, Start::new(1), format, text, LevelJc::new("left")).indent(
        Some(720),
        Some(SpecialIndentType::Hanging(360)),
        None,
        None,
    )
}

/// A paragraph holding `text`; embedded newlines become line breaks.
fn text_paragraph(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        if !line.is_empty() {
            run = run.add_text(line);
        }
    }
    Paragraph::new().add_run(run)
}

fn metrics_table(rows: &[MetricEntry]) -> Table {
    let header = table_row(TABLE_HEADER[0], TABLE_HEADER[1]);
    let body = rows.iter().map(|r| table_row(&r.label, &r.value));
    Table::new(std::iter::once(header).chain(body).collect())
}

fn table_row(label: &str, value: &str) -> TableRow {
    TableRow::new(vec![
        TableCell::new().add_paragraph(text_paragraph(label)),
        TableCell::new().add_paragraph(text_paragraph(value)),
    ])
}
