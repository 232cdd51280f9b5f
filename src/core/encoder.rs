use crate::domain::model::{EncodedDocuments, EnvelopeRecord, NameRecord};
use crate::utils::error::{RelayError, Result};
use quick_xml::se::Serializer;
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn check_xml_text(field: &str, value: &str) -> Result<()> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(RelayError::InvalidXmlCharacter {
            field: field.to_string(),
            codepoint: c as u32,
        }),
        None => Ok(()),
    }
}

/// Renders the record as an indented XML document, declaration included.
pub fn encode_xml(record: &NameRecord) -> Result<String> {
    check_xml_text("firstName", &record.first_name)?;
    check_xml_text("lastName", &record.last_name)?;

    let mut body = String::new();
    let mut serializer = Serializer::new(&mut body);
    serializer.indent(' ', 2);
    record.serialize(serializer)?;

    Ok(format!("{}{}", XML_HEADER, body.trim()))
}

/// Compact JSON that also escapes `<`, `>`, `&`, U+2028 and U+2029 as `\uXXXX`.
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

pub fn encode_envelope(record: &NameRecord, raw_xml: &str) -> Result<String> {
    let envelope = EnvelopeRecord::from_record(record, raw_xml);

    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, HtmlSafeFormatter);
    envelope.serialize(&mut serializer)?;

    String::from_utf8(buffer)
        .map_err(|e| RelayError::JsonEncoding(serde_json::Error::custom(e.to_string())))
}

/// Produces both documents; the JSON envelope embeds the exact XML output.
pub fn encode(record: &NameRecord) -> Result<EncodedDocuments> {
    let xml = encode_xml(record)?;
    tracing::debug!("Encoded XML document ({} bytes)", xml.len());

    let json = encode_envelope(record, &xml)?;
    tracing::debug!("Encoded JSON envelope ({} bytes)", json.len());

    Ok(EncodedDocuments { xml, json })
}
