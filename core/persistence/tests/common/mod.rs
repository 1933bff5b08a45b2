//! FILENAME: tests/common/mod.rs
//! Fixtures and artifact readers for the export integration tests.

#![allow(dead_code)]

use engine::{Customer, CustomerLookup, CustomerStatus, LineItem, NamedRef, Order, OrderType};
use lopdf::content::Content;
use lopdf::{Dictionary, Document};
use std::collections::HashMap;

/// The two reference orders plus a sparse and a malformed one.
pub fn sample_orders() -> Vec<Order> {
    vec![
        Order {
            id: "1".to_string(),
            order_time: Some("25 July 2024 at 15:30:00 UTC+00:00".to_string()),
            order_type: OrderType::Delivery,
            total_price: 25.5,
            client_id: Some("c1".to_string()),
            delivery_guy: Some(NamedRef::new("John Doe")),
            location: Some(NamedRef::new("123 Elm Street")),
            line_items: Some(vec![
                LineItem::new("Pizza", 1, 15.0),
                LineItem::new("Soda", 2, 5.0),
            ]),
        },
        Order {
            id: "2".to_string(),
            order_time: Some("25 July 2024 at 16:00:00 UTC+00:00".to_string()),
            order_type: OrderType::Pickup,
            total_price: 18.75,
            client_id: Some("c2".to_string()),
            delivery_guy: Some(NamedRef::new("Jane Smith")),
            location: Some(NamedRef::new("456 Oak Avenue")),
            line_items: Some(vec![
                LineItem::new("Burger", 1, 10.0),
                LineItem::new("Fries", 1, 3.75),
            ]),
        },
        Order {
            id: "3".to_string(),
            order_time: Some("2024-07-26T09:15:00Z".to_string()),
            order_type: OrderType::Other("Dine-in".to_string()),
            total_price: 7.0,
            client_id: None,
            delivery_guy: None,
            location: None,
            line_items: None,
        },
        Order {
            id: "4".to_string(),
            order_time: Some("26 Julio 2024 at 10:00:00 UTC".to_string()),
            order_type: OrderType::Delivery,
            total_price: f64::NAN,
            client_id: Some("c404".to_string()),
            delivery_guy: Some(NamedRef { name: None }),
            location: None,
            line_items: Some(Vec::new()),
        },
    ]
}

pub fn sample_lookup() -> CustomerLookup {
    [("c1", "Alice Johnson"), ("c2", "Bob Brown")].into_iter().collect()
}

pub fn sample_customers() -> Vec<Customer> {
    vec![
        customer("c1", "Alice", "Johnson", CustomerStatus::Active),
        customer("c2", "Bob", "Brown", CustomerStatus::from_label("active")),
        customer("c3", "Eve", "Gray", CustomerStatus::Inactive),
        customer("c4", "Kofi", "", CustomerStatus::Unknown),
        customer("c5", "Zoë", "Ŋkansah", CustomerStatus::Active),
    ]
}

fn customer(id: &str, first: &str, last: &str, status: CustomerStatus) -> Customer {
    Customer {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        address: format!("{} Ring Road", &id[1..]),
        contact: format!("+233 24 {} 0000", id),
        location: "Accra".to_string(),
        status,
        image_url: None,
    }
}

/// Text of a generated PDF, read back through each font's ToUnicode map.
#[derive(Debug, Default)]
pub struct PdfText {
    /// `/H1` marked content, in document order.
    pub titles: Vec<String>,
    /// `/TR` rows of each page; each row holds its `/TH` or `/TD` cells.
    pub pages: Vec<Vec<Vec<String>>>,
}

impl PdfText {
    /// Rows of every page after its header row, in order.
    pub fn body_rows(&self) -> Vec<Vec<String>> {
        self.pages
            .iter()
            .flat_map(|rows| rows.iter().skip(1).cloned())
            .collect()
    }
}

pub fn read_pdf_text(bytes: &[u8]) -> PdfText {
    let doc = Document::load_mem(bytes).unwrap();
    let mut text = PdfText::default();

    for page_id in doc.get_pages().into_values() {
        let decoders: HashMap<Vec<u8>, HashMap<u8, char>> = doc
            .get_page_fonts(page_id)
            .unwrap()
            .into_iter()
            .map(|(name, font)| (name, to_unicode_map(&doc, font)))
            .collect();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

        let mut font: Vec<u8> = Vec::new();
        let mut tags: Vec<Vec<u8>> = Vec::new();
        let mut buffer = String::new();
        let mut row = Vec::new();
        let mut rows = Vec::new();

        for op in &content.operations {
            match op.operator.as_str() {
                "BMC" => tags.push(op.operands[0].as_name().unwrap().to_vec()),
                "Tf" => font = op.operands[0].as_name().unwrap().to_vec(),
                "Tj" => {
                    let map = &decoders[&font];
                    for byte in op.operands[0].as_str().unwrap() {
                        buffer.push(map.get(byte).copied().unwrap_or('\u{fffd}'));
                    }
                }
                "EMC" => match tags.pop().unwrap().as_slice() {
                    b"TH" | b"TD" => row.push(std::mem::take(&mut buffer)),
                    b"TR" => rows.push(std::mem::take(&mut row)),
                    b"H1" => text.titles.push(std::mem::take(&mut buffer)),
                    other => panic!("unexpected marked content {:?}", other),
                },
                _ => {}
            }
        }
        text.pages.push(rows);
    }
    text
}

/// Code -> character pairs of a font's `/ToUnicode` bfchar blocks.
fn to_unicode_map(doc: &Document, font: &Dictionary) -> HashMap<u8, char> {
    let (_, cmap) = doc.dereference(font.get(b"ToUnicode").unwrap()).unwrap();
    let program = String::from_utf8(cmap.as_stream().unwrap().get_plain_content().unwrap()).unwrap();

    let mut map = HashMap::new();
    let mut in_bfchar = false;
    for line in program.lines().map(str::trim) {
        if line.ends_with("beginbfchar") {
            in_bfchar = true;
            continue;
        }
        if line == "endbfchar" {
            in_bfchar = false;
        }
        if !in_bfchar {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c| c == '<' || c == '>')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        let [code, unicode] = fields.as_slice() else {
            panic!("malformed bfchar entry {:?}", line);
        };
        let units: Vec<u16> = (0..unicode.len())
            .step_by(4)
            .map(|i| u16::from_str_radix(&unicode[i..i + 4], 16).unwrap())
            .collect();
        let c = char::decode_utf16(units).next().unwrap().unwrap();
        map.insert(u8::from_str_radix(code, 16).unwrap(), c);
    }
    map
}
