//! Report data model and the format-independent block layout.
//!
//! Both exporters walk the same `Vec<Block>`, so section order and the
//! presence or absence of content under each heading match across formats.

use serde::{Deserialize, Serialize};

use crate::text::normalize::strip_markup;

pub const REPORT_TITLE: &str = "PathPinpoint Full Report";
pub const SCORES_HEADING: &str = "ATS & Similarity Scores";
pub const TABLE_HEADER: [&str; 2] = ["Metric", "Value"];

/// One row of the scores table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub label: String,
    pub value: String,
}

impl MetricEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Everything the full report renders. Every field may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportBundle {
    pub metrics: Vec<MetricEntry>,
    pub recommendations: String,
    pub tailored_resume: String,
    pub cover_letter: String,
    pub interview_questions: String,
    pub skill_gap: String,
    pub related_roles: String,
    pub salary_estimate: String,
    pub networking_tips: String,
}

/// How a section's lines are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStyle {
    /// One list item per non-empty line, bullet applied by the renderer.
    Bulleted,
    /// One item per line, blank lines included, numbered 1..N by position.
    Numbered,
    /// One paragraph per line, blank lines kept.
    Plain,
    /// The whole field as a single paragraph.
    Single,
}

impl ReportBundle {
    /// Text sections in report order, after the scores table.
    pub fn sections(&self) -> [(&'static str, SectionStyle, &str); 8] {
        [
            ("Recommendations", SectionStyle::Bulleted, self.recommendations.as_str()),
            ("AI-Tailored Resume", SectionStyle::Plain, self.tailored_resume.as_str()),
            ("Cover Letter", SectionStyle::Plain, self.cover_letter.as_str()),
            ("Interview Prep Questions", SectionStyle::Numbered, self.interview_questions.as_str()),
            ("Skill Gap Analysis", SectionStyle::Plain, self.skill_gap.as_str()),
            ("Related Roles", SectionStyle::Bulleted, self.related_roles.as_str()),
            ("Salary Estimate", SectionStyle::Single, self.salary_estimate.as_str()),
            ("Networking Tips", SectionStyle::Bulleted, self.networking_tips.as_str()),
        ]
    }
}

/// A renderer-neutral layout element.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    /// Rows under the fixed `Metric | Value` header.
    Table(Vec<MetricEntry>),
    Bullet(String),
    Numbered { ordinal: usize, text: String },
    Paragraph(String),
}

#[cfg(test)]
impl Block {
    /// The literal strings this block writes, in order.
    pub(crate) fn texts(&self) -> Vec<&str> {
        match self {
            Block::Title(text)
            | Block::Heading(text)
            | Block::Bullet(text)
            | Block::Paragraph(text)
            | Block::Numbered { text, .. } => vec![text.as_str()],
            Block::Table(rows) => TABLE_HEADER
                .into_iter()
                .chain(rows.iter().flat_map(|r| [r.label.as_str(), r.value.as_str()]))
                .collect(),
        }
    }
}

/// Builds the full report layout: title, scores table, then every text section.
/// Section bodies are markdown-stripped here; character normalization is left
/// to renderers that need it.
pub fn build_layout(bundle: &ReportBundle) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title(REPORT_TITLE.to_string()),
        Block::Heading(SCORES_HEADING.to_string()),
        Block::Table(bundle.metrics.clone()),
    ];

    for (heading, style, body) in bundle.sections() {
        blocks.push(Block::Heading(heading.to_string()));
        blocks.extend(layout_section(style, &strip_markup(body)));
    }

    blocks
}

fn layout_section(style: SectionStyle, body: &str) -> Vec<Block> {
    match style {
        SectionStyle::Bulleted => list_items(body)
            .map(|text| Block::Bullet(text.to_string()))
            .collect(),
        SectionStyle::Numbered => body
            .lines()
            .map(strip_list_marker)
            .enumerate()
            .map(|(i, text)| Block::Numbered {
                ordinal: i + 1,
                text: text.to_string(),
            })
            .collect(),
        SectionStyle::Plain => body
            .lines()
            .map(|line| Block::Paragraph(line.to_string()))
            .collect(),
        SectionStyle::Single => {
            let body = body.trim();
            if body.is_empty() {
                Vec::new()
            } else {
                vec![Block::Paragraph(body.to_string())]
            }
        }
    }
}

/// Non-empty lines with any leading dash/bullet marker removed.
fn list_items(body: &str) -> impl Iterator<Item = &str> {
    body.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
}

fn strip_list_marker(line: &str) -> &str {
    line.trim_start_matches(['-', '\u{2022}', ' ', '\t']).trim()
}

/// Section headings paired with the number of content blocks beneath each.
/// The title is skipped; the scores table counts one block per metric row.
#[cfg(test)]
pub(crate) fn outline(blocks: &[Block]) -> Vec<(String, usize)> {
    let mut sections: Vec<(String, usize)> = Vec::new();
    for block in blocks {
        match block {
            Block::Title(_) => {}
            Block::Heading(text) => sections.push((text.clone(), 0)),
            Block::Table(rows) => {
                if let Some(last) = sections.last_mut() {
                    last.1 += rows.len();
                }
            }
            _ => {
                if let Some(last) = sections.last_mut() {
                    last.1 += 1;
                }
            }
        }
    }
    sections
}
