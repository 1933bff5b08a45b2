//! FILENAME: core/persistence/src/pdf_text.rs
//! Character codes for the document fonts.
//!
//! Text is drawn with the base-14 Helvetica faces, which are simple fonts
//! addressed one byte per character. Characters in WinAnsiEncoding keep their
//! standard code. Any other character takes a spare code through the
//! encoding's `/Differences` array and is drawn with a stand-in glyph. Every
//! code in use is listed in the font's `/ToUnicode` CMap, so text extracted
//! from the document is exactly the text that was laid out.
//!
//! When the spare codes of the base encoding run out, further characters go
//! to additional encodings, each drawn through its own copy of the fonts.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write;

/// Codes WinAnsiEncoding leaves undefined.
const SPARE_CODES: [u8; 37] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e,
    0x1f, 0x7f, 0x81, 0x8d, 0x8f, 0x90, 0x9d,
];

/// Codes available to an overflow encoding (every code but 0).
const OVERFLOW_CODES: usize = 255;

/// bfchar entries per CMap block.
const BFCHAR_BLOCK: usize = 100;

/// One byte-code assignment, shared by the regular and bold face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontEncoding {
    /// Codes redefined away from WinAnsiEncoding, with the glyph drawn.
    pub differences: BTreeMap<u8, &'static str>,
    /// Character of every code in use.
    pub to_unicode: BTreeMap<u8, char>,
}

impl FontEncoding {
    /// `/Differences` array body: `code /glyph` pairs.
    pub fn differences_array(&self) -> Vec<(i64, &'static str)> {
        self.differences
            .iter()
            .map(|(&code, &glyph)| (code as i64, glyph))
            .collect()
    }

    /// `/ToUnicode` CMap program for the codes in use.
    pub fn to_unicode_cmap(&self) -> Vec<u8> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <00> <FF>\n\
             endcodespacerange\n",
        );

        let entries: Vec<(&u8, &char)> = self.to_unicode.iter().collect();
        for block in entries.chunks(BFCHAR_BLOCK) {
            let _ = writeln!(cmap, "{} beginbfchar", block.len());
            for (code, c) in block {
                let mut units = [0u16; 2];
                let utf16: String = c
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|unit| format!("{:04X}", unit))
                    .collect();
                let _ = writeln!(cmap, "<{:02X}> <{}>", code, utf16);
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMapResource defineresource pop\n\
             end\n\
             end\n",
        );
        cmap.into_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    encoding: usize,
    code: u8,
}

/// Consecutive characters drawn through the same encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub encoding: usize,
    pub bytes: Vec<u8>,
}

/// Code assignment for every character of one document.
#[derive(Debug, Clone)]
pub struct FontSet {
    encodings: Vec<FontEncoding>,
    glyphs: HashMap<char, Glyph>,
}

impl FontSet {
    /// Assign codes to every character occurring in `texts`.
    pub fn for_text<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let chars: BTreeSet<char> = texts.into_iter().flat_map(str::chars).collect();
        let mut set = FontSet {
            encodings: vec![FontEncoding::default()],
            glyphs: HashMap::new(),
        };
        let mut spare = SPARE_CODES.iter().copied();

        for c in chars {
            let glyph = if let Some(code) = win_ansi_code(c) {
                Glyph { encoding: 0, code }
            } else if let Some(code) = spare.next() {
                set.encodings[0].differences.insert(code, stand_in_glyph(c));
                Glyph { encoding: 0, code }
            } else {
                set.overflow_glyph(c)
            };
            set.encodings[glyph.encoding].to_unicode.insert(glyph.code, c);
            set.glyphs.insert(c, glyph);
        }

        if set.encodings.len() > 1 {
            log::debug!(
                "{} distinct characters need {} font encodings",
                set.glyphs.len(),
                set.encodings.len()
            );
        }
        set
    }

    fn overflow_glyph(&mut self, c: char) -> Glyph {
        let last = self.encodings.len() - 1;
        if last == 0 || self.encodings[last].to_unicode.len() >= OVERFLOW_CODES {
            self.encodings.push(FontEncoding::default());
        }
        let encoding = self.encodings.len() - 1;
        let code = (self.encodings[encoding].to_unicode.len() + 1) as u8;
        self.encodings[encoding].differences.insert(code, stand_in_glyph(c));
        Glyph { encoding, code }
    }

    pub fn encodings(&self) -> &[FontEncoding] {
        &self.encodings
    }

    /// Byte runs for `text`. Characters the set was not built from are drawn
    /// as `?`.
    pub fn encode(&self, text: &str) -> Vec<TextRun> {
        let mut runs: Vec<TextRun> = Vec::new();
        for c in text.chars() {
            let glyph = self.glyphs.get(&c).copied().unwrap_or(Glyph {
                encoding: 0,
                code: b'?',
            });
            match runs.last_mut() {
                Some(run) if run.encoding == glyph.encoding => run.bytes.push(glyph.code),
                _ => runs.push(TextRun {
                    encoding: glyph.encoding,
                    bytes: vec![glyph.code],
                }),
            }
        }
        runs
    }
}

/// Glyph drawn for a character Helvetica has no glyph for.
fn stand_in_glyph(c: char) -> &'static str {
    match c {
        '₵' => "cent",
        _ if c.is_whitespace() || c.is_control() => "space",
        _ => "question",
    }
}

/// WinAnsiEncoding code of `c`, if it has one.
pub fn win_ansi_code(c: char) -> Option<u8> {
    let code = match c {
        '\u{20}'..='\u{7e}' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(set: &FontSet, runs: &[TextRun]) -> String {
        runs.iter()
            .flat_map(|run| {
                let map = &set.encodings()[run.encoding].to_unicode;
                run.bytes.iter().map(move |b| map[b])
            })
            .collect()
    }

    #[test]
    fn test_win_ansi_codes() {
        assert_eq!(win_ansi_code('A'), Some(b'A'));
        assert_eq!(win_ansi_code('¤'), Some(0xa4));
        assert_eq!(win_ansi_code('ë'), Some(0xeb));
        assert_eq!(win_ansi_code('€'), Some(0x80));
        assert_eq!(win_ansi_code('–'), Some(0x96));
        assert_eq!(win_ansi_code('₵'), None);
        assert_eq!(win_ansi_code('\n'), None);
    }

    #[test]
    fn test_plain_text_uses_standard_codes() {
        let set = FontSet::for_text(["Bob Brown", "GH 18.75"]);

        assert_eq!(set.encodings().len(), 1);
        assert!(set.encodings()[0].differences.is_empty());
        assert_eq!(
            set.encode("Bob 18"),
            vec![TextRun {
                encoding: 0,
                bytes: b"Bob 18".to_vec()
            }]
        );
    }

    #[test]
    fn test_cedi_sign_gets_spare_code_and_maps_back() {
        let set = FontSet::for_text(["GH₵ 25.50", "Zoë Ŋkansah"]);
        let encoding = &set.encodings()[0];

        let runs = set.encode("GH₵ 25.50");
        assert_eq!(runs.len(), 1);
        let code = runs[0].bytes[2];
        assert!(SPARE_CODES.contains(&code));
        assert_eq!(encoding.differences[&code], "cent");
        assert_eq!(encoding.to_unicode[&code], '₵');

        assert_eq!(decode(&set, &set.encode("GH₵ 25.50")), "GH₵ 25.50");
        assert_eq!(decode(&set, &set.encode("Zoë Ŋkansah")), "Zoë Ŋkansah");
    }

    #[test]
    fn test_overflow_encodings() {
        let text: String = (0x4e00u32..0x4e00 + 400).filter_map(char::from_u32).collect();
        let set = FontSet::for_text([text.as_str(), "Kofi"]);

        assert_eq!(set.encodings().len(), 3);
        assert_eq!(set.encodings()[0].differences.len(), SPARE_CODES.len());
        assert_eq!(set.encodings()[1].to_unicode.len(), OVERFLOW_CODES);

        let runs = set.encode(&text);
        assert!(runs.len() >= 3);
        assert_eq!(decode(&set, &runs), text);
        assert_eq!(decode(&set, &set.encode("Kofi")), "Kofi");
    }

    #[test]
    fn test_cmap_lists_every_code() {
        let set = FontSet::for_text(["A₵\n"]);
        let cmap = String::from_utf8(set.encodings()[0].to_unicode_cmap()).unwrap();

        assert!(cmap.contains("3 beginbfchar"));
        assert!(cmap.contains("<41> <0041>"));
        assert!(cmap.contains("<20B5>"));
        assert!(cmap.contains("<000A>"));
        assert!(cmap.trim_end().ends_with("end"));
    }

    #[test]
    fn test_cmap_encodes_astral_characters_as_surrogates() {
        let set = FontSet::for_text(["🍕"]);
        let cmap = String::from_utf8(set.encodings()[0].to_unicode_cmap()).unwrap();
        assert!(cmap.contains("<D83CDF55>"));
    }
}
