//! FILENAME: core/persistence/src/pdf_writer.rs
//! Renders a `TableLayout` as a PDF document.
//!
//! Uses the base-14 Helvetica faces, so no font data is embedded. Character
//! codes and their `/ToUnicode` maps come from `pdf_text`. The title and each
//! table row and cell are wrapped in marked content (`/H1`, `/TR`, `/TH`,
//! `/TD`), so a reader can recover the table structure along with its text.

use crate::config::PageSetup;
use crate::pdf_text::{FontEncoding, FontSet};
use crate::table_layout::{LaidOutCell, PlacedRow, RowKind, TableLayout};
use crate::ExportError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

const RULE_WIDTH: f32 = 0.5;
/// Gray level of the header row background.
const HEADER_FILL: f32 = 0.86;

/// Resource name of the regular or bold face for one encoding: `F1`/`F2`
/// for the base encoding, `F3`/`F4` for the first overflow, and so on.
fn font_resource(encoding: usize, bold: bool) -> String {
    format!("F{}", encoding * 2 + if bold { 2 } else { 1 })
}

pub fn write_document(layout: &TableLayout, page: &PageSetup) -> Result<Vec<u8>, ExportError> {
    let fonts = FontSet::for_text(document_text(layout));

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut font_resources = Dictionary::new();
    for (index, encoding) in fonts.encodings().iter().enumerate() {
        let (regular_id, bold_id) = add_fonts(&mut doc, encoding);
        font_resources.set(font_resource(index, false), regular_id);
        font_resources.set(font_resource(index, true), bold_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => font_resources,
    });

    let mut kids = Vec::with_capacity(layout.pages.len());
    for (index, page_layout) in layout.pages.iter().enumerate() {
        let mut painter = Painter {
            ops: Vec::new(),
            fonts: &fonts,
            page,
        };
        if index == 0 {
            painter.title(&layout.title);
        }
        for row in &page_layout.rows {
            painter.row(layout, row);
        }

        let content = Content {
            operations: painter.ops,
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page.width),
            Object::Real(page.height),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(&layout.title),
        "Producer" => Object::string_literal("dispatch persistence"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;

    log::debug!(
        "rendered {} PDF page(s) with {} font encoding(s), {} bytes",
        page_count,
        fonts.encodings().len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Every string the document draws.
fn document_text(layout: &TableLayout) -> impl Iterator<Item = &str> {
    let cells = layout
        .pages
        .iter()
        .flat_map(|page| page.rows.iter())
        .flat_map(|row| row.cells.iter())
        .flat_map(|cell| cell.lines.iter())
        .map(String::as_str);
    std::iter::once(layout.title.as_str()).chain(cells)
}

/// Regular and bold Helvetica sharing one encoding and ToUnicode map.
fn add_fonts(doc: &mut Document, encoding: &FontEncoding) -> (ObjectId, ObjectId) {
    let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, encoding.to_unicode_cmap()));

    let encoding_object: Object = if encoding.differences.is_empty() {
        "WinAnsiEncoding".into()
    } else {
        let mut differences = Vec::new();
        for (code, glyph) in encoding.differences_array() {
            differences.push(Object::Integer(code));
            differences.push(Object::Name(glyph.as_bytes().to_vec()));
        }
        let encoding_id = doc.add_object(dictionary! {
            "Type" => "Encoding",
            "BaseEncoding" => "WinAnsiEncoding",
            "Differences" => differences,
        });
        encoding_id.into()
    };

    let mut font = |base_font: &str| {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => encoding_object.clone(),
            "ToUnicode" => to_unicode_id,
        })
    };
    let regular = font("Helvetica");
    let bold = font("Helvetica-Bold");
    (regular, bold)
}

/// UTF-16BE text string with byte order mark, for document metadata.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xfe, 0xff];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Content stream operations of one page.
struct Painter<'a> {
    ops: Vec<Operation>,
    fonts: &'a FontSet,
    page: &'a PageSetup,
}

impl Painter<'_> {
    fn title(&mut self, title: &str) {
        self.begin_marked("H1");
        self.show_text(
            true,
            self.page.title_font_size,
            self.page.margin,
            self.page.height - self.page.title_top,
            title,
        );
        self.end_marked();
    }

    fn row(&mut self, layout: &TableLayout, row: &PlacedRow) {
        let page = self.page;
        let is_header = row.kind == RowKind::Header;
        let bottom = page.height - (row.top + row.height);

        if is_header {
            let width: f32 = layout.column_widths.iter().sum();
            self.op("q", vec![]);
            self.op("g", vec![Object::Real(HEADER_FILL)]);
            self.rectangle(page.margin, bottom, width, row.height);
            self.op("f", vec![]);
            self.op("Q", vec![]);
        }

        self.op("w", vec![Object::Real(RULE_WIDTH)]);
        for (x, width) in layout.column_x.iter().zip(&layout.column_widths) {
            self.rectangle(*x, bottom, *width, row.height);
        }
        self.op("S", vec![]);

        self.begin_marked("TR");
        for (cell, x) in row.cells.iter().zip(&layout.column_x) {
            self.begin_marked(if is_header { "TH" } else { "TD" });
            self.cell(cell, *x, row.top, is_header);
            self.end_marked();
        }
        self.end_marked();
    }

    fn cell(&mut self, cell: &LaidOutCell, x: f32, top: f32, bold: bool) {
        let page = self.page;
        for (n, line) in cell.lines.iter().enumerate() {
            let baseline = top + page.cell_padding + page.line_height() * n as f32 + page.body_font_size * 0.9;
            self.show_text(
                bold,
                page.body_font_size,
                x + page.cell_padding,
                page.height - baseline,
                line,
            );
        }
    }

    fn show_text(&mut self, bold: bool, size: f32, x: f32, y: f32, text: &str) {
        self.op("BT", vec![]);
        self.op("Td", vec![Object::Real(x), Object::Real(y)]);
        for run in self.fonts.encode(text) {
            let font = font_resource(run.encoding, bold);
            self.op("Tf", vec![Object::Name(font.into_bytes()), Object::Real(size)]);
            self.op("Tj", vec![Object::String(run.bytes, StringFormat::Hexadecimal)]);
        }
        self.op("ET", vec![]);
    }

    fn rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.op(
            "re",
            vec![
                Object::Real(x),
                Object::Real(y),
                Object::Real(width),
                Object::Real(height),
            ],
        );
    }

    fn begin_marked(&mut self, tag: &str) {
        self.op("BMC", vec![Object::Name(tag.as_bytes().to_vec())]);
    }

    fn end_marked(&mut self) {
        self.op("EMC", vec![]);
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }
}
