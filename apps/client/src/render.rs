//! Resume rendering for export and "save to profile".
//!
//! Layout is not this crate's concern: the default renderer writes the
//! generated text as a plain Helvetica 12pt document, wrapped at a fixed
//! column, one page per 54 lines.

use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::errors::{ClientError, Result};

/// Turns generated resume text into an uploadable document.
pub trait ResumeRenderer: Send + Sync {
    fn render(&self, resume_text: &str) -> Result<Bytes>;

    fn mime(&self) -> &'static str {
        "application/pdf"
    }
}

const WRAP_COLUMNS: usize = 90;
const LINES_PER_PAGE: usize = 54;
const FONT_SIZE_PT: i64 = 12;
const LEADING_PT: i64 = 14;
const PAGE_WIDTH_PT: i64 = 612; // US letter
const PAGE_HEIGHT_PT: i64 = 792;
const MARGIN_PT: i64 = 42;

/// Single-font text renderer producing a multi-page PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPdfRenderer;

impl ResumeRenderer for PlainPdfRenderer {
    fn render(&self, resume_text: &str) -> Result<Bytes> {
        let lines = wrap_text(resume_text, WRAP_COLUMNS);
        let empty: &[String] = &[];
        let pages: Vec<&[String]> = if lines.is_empty() {
            vec![empty]
        } else {
            lines.chunks(LINES_PER_PAGE).collect()
        };
        build_pdf(&pages)
            .map(Bytes::from)
            .map_err(|e| ClientError::Render(e.to_string()))
    }
}

/// Export file name. Whitespace runs in the full name become underscores,
/// and anything that is not a letter, digit, `-` or `_` is replaced so the
/// name can never leave the target directory.
pub fn export_file_name(full_name: &str) -> String {
    let stem = full_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_");
    if stem.is_empty() {
        "Resume.pdf".to_string()
    } else {
        format!("{stem}_Resume.pdf")
    }
}

/// Greedy word wrap. Words longer than `width` are hard-split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let mut word = word.to_string();
            while word.chars().count() > width {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                let split_at = word.char_indices().nth(width).map(|(i, _)| i).unwrap_or(word.len());
                let rest = word.split_off(split_at);
                out.push(word);
                word = rest;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        out.push(current);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}

/// Encodes a line for the WinAnsi-encoded standard font. Latin-1 maps
/// straight through; a few common typographic characters have their own
/// slots; everything else becomes `?`.
fn win_ansi(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            c if c.is_control() => b' ',
            _ => b'?',
        })
        .collect()
}

fn page_content(lines: &[String]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE_PT.into()]),
        Operation::new("TL", vec![LEADING_PT.into()]),
        Operation::new(
            "Td",
            vec![MARGIN_PT.into(), (PAGE_HEIGHT_PT - MARGIN_PT).into()],
        ),
    ];
    for line in lines {
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(line), StringFormat::Literal)],
        ));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

fn build_pdf(pages: &[&[String]]) -> lopdf::Result<Vec<u8>> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(lines).encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                PAGE_WIDTH_PT.into(),
                PAGE_HEIGHT_PT.into(),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}
