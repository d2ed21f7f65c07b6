//! Serializes a laid-out document with `lopdf` using the standard Helvetica
//! faces in WinAnsi encoding.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::layout::{DrawOp, LaidOutDocument, Page};
use crate::error::Result;
use crate::render::Rgb;

const MM_TO_PT: f32 = 72.0 / 25.4;
const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

pub fn write_pdf(layout: &LaidOutDocument) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let page_height = layout.height * MM_TO_PT;
    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = page_content(page, page_height);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(layout.width * MM_TO_PT),
                Object::Real(page_height),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(to_win_ansi(&layout.title), StringFormat::Literal),
        "Producer" => Object::String(b"gstbill".to_vec(), StringFormat::Literal),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn color_operands(color: Rgb) -> Vec<Object> {
    color.unit().iter().map(|c| (*c).into()).collect()
}

fn page_content(page: &Page, page_height: f32) -> Content {
    let mut ops = Vec::new();

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                bold,
                color,
                text,
            } => {
                let font = if *bold { BOLD_FONT } else { REGULAR_FONT };
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font.as_bytes().to_vec()), (*size).into()],
                ));
                ops.push(Operation::new("rg", color_operands(*color)));
                ops.push(Operation::new(
                    "Td",
                    vec![(x * MM_TO_PT).into(), (page_height - y * MM_TO_PT).into()],
                ));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("rg", color_operands(*fill)));
                ops.push(Operation::new(
                    "re",
                    vec![
                        (x * MM_TO_PT).into(),
                        (page_height - (y + height) * MM_TO_PT).into(),
                        (width * MM_TO_PT).into(),
                        (height * MM_TO_PT).into(),
                    ],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("w", vec![(width * MM_TO_PT).into()]));
                ops.push(Operation::new("RG", color_operands(*color)));
                ops.push(Operation::new(
                    "m",
                    vec![(x1 * MM_TO_PT).into(), (page_height - y1 * MM_TO_PT).into()],
                ));
                ops.push(Operation::new(
                    "l",
                    vec![(x2 * MM_TO_PT).into(), (page_height - y2 * MM_TO_PT).into()],
                ));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }

    Content { operations: ops }
}

/// Latin-1 subset of WinAnsi; anything outside becomes `?`.
fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_layout(pages: usize) -> LaidOutDocument {
        let page = Page {
            ops: vec![
                DrawOp::Text {
                    x: 15.0,
                    y: 15.0,
                    size: 12.0,
                    bold: true,
                    color: Rgb::BLACK,
                    text: "Sharma General Store".to_string(),
                },
                DrawOp::Rect {
                    x: 15.0,
                    y: 30.0,
                    width: 180.0,
                    height: 10.0,
                    fill: Rgb::new(0x19, 0x76, 0xd2),
                },
                DrawOp::Line {
                    x1: 15.0,
                    y1: 45.0,
                    x2: 195.0,
                    y2: 45.0,
                    width: 0.5,
                    color: Rgb::new(0xcc, 0xcc, 0xcc),
                },
            ],
        };
        LaidOutDocument {
            title: "Invoice INV261015001".to_string(),
            width: 210.0,
            height: 297.0,
            pages: vec![page; pages],
        }
    }

    #[test]
    fn test_writes_pdf_header() {
        let bytes = write_pdf(&sample_layout(1)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_page_count_round_trips() {
        let bytes = write_pdf(&sample_layout(3)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_win_ansi_replaces_unmappable() {
        assert_eq!(to_win_ansi("Rs. 10"), b"Rs. 10".to_vec());
        assert_eq!(to_win_ansi("\u{20b9}10"), b"?10".to_vec());
        assert_eq!(to_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xe9]);
    }
}
