//! Draws a laid-out [`Document`] as a PDF file.
use lopdf::{
    Document as PdfDocument, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use super::document::{Align, Cell, Document, Line, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Page};
use crate::ResultEngine;

const PT_PER_MM: f32 = 72.0 / 25.4;
const CELL_PADDING_MM: f32 = 1.0;
/// Average Helvetica glyph width relative to the font size.
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;
const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

fn pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Encodes `document` as PDF bytes, one PDF page per layout page.
pub fn render(document: &Document, title: &str) -> ResultEngine<Vec<u8>> {
    let mut pdf = PdfDocument::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        pt(PAGE_WIDTH_MM).into(),
        pt(PAGE_HEIGHT_MM).into(),
    ];
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf.add_object(dictionary! {
        "Title" => Object::string_literal(latin1(title)),
        "Producer" => Object::string_literal("daybook"),
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);

    let mut data = Vec::new();
    pdf.save_to(&mut data)?;
    Ok(data)
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut operations = vec![Operation::new("w", vec![0.5f32.into()])];
    let mut top_mm = MARGIN_MM;

    for line in &page.lines {
        let mut left_mm = MARGIN_MM;
        for cell in &line.cells {
            cell_operations(&mut operations, line, cell, left_mm, top_mm);
            left_mm += cell.width_mm;
        }
        top_mm += line.height_mm;
    }

    operations
}

fn cell_operations(
    operations: &mut Vec<Operation>,
    line: &Line,
    cell: &Cell,
    left_mm: f32,
    top_mm: f32,
) {
    let bottom = pt(PAGE_HEIGHT_MM - top_mm - line.height_mm);
    let left = pt(left_mm);

    if cell.border {
        operations.push(Operation::new(
            "re",
            vec![
                left.into(),
                bottom.into(),
                pt(cell.width_mm).into(),
                pt(line.height_mm).into(),
            ],
        ));
        operations.push(Operation::new("S", vec![]));
    }

    if cell.text.is_empty() {
        return;
    }

    let text = latin1(&cell.text);
    let x = match cell.align {
        Align::Left => left + pt(CELL_PADDING_MM),
        Align::Center => {
            let estimated = text.len() as f32 * line.font_size * AVERAGE_GLYPH_WIDTH;
            (left + (pt(cell.width_mm) - estimated) / 2.0).max(left)
        }
    };
    // Vertically centred baseline.
    let y = bottom + pt(line.height_mm) / 2.0 - line.font_size * 0.35;
    let font = if line.bold { BOLD_FONT } else { REGULAR_FONT };

    operations.extend([
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), line.font_size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]);
}

/// Single-byte text for the standard fonts; anything outside Latin-1
/// becomes `?`.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
