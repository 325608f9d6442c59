//! XML decoding utilities for UPnP event payloads.
//!
//! GENA bodies mix namespace prefixes (`e:propertyset`, `e:property`) with a
//! default-namespaced, XML-escaped `LastChange` document. Prefixes are removed
//! before handing the document to serde so that the structs can use plain
//! local names.

use crate::error::{ParseError, ParseResult};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;

/// Parse an XML document into `T` after stripping namespace prefixes.
pub fn parse<T: DeserializeOwned>(xml: &str) -> ParseResult<T> {
    let stripped = strip_namespaces(xml)?;
    quick_xml::de::from_str(&stripped)
        .map_err(|e| ParseError::XmlDeserializationFailed(e.to_string()))
}

/// Rewrite element and attribute names to their local part and drop `xmlns`
/// declarations.
///
/// Text and attribute values are copied through untouched, still escaped, so
/// a nested escaped document survives the rewrite byte for byte.
///
/// Input: `<e:propertyset xmlns:e="urn:x"><e:property>1</e:property></e:propertyset>`
/// Output: `<propertyset><property>1</property></propertyset>`
pub fn strip_namespaces(xml: &str) -> ParseResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::InvalidXmlStructure(e.to_string()))?;

        let rewritten = match event {
            Event::Eof => break,
            Event::Start(start) => Event::Start(local_start(&start)?),
            Event::Empty(start) => Event::Empty(local_start(&start)?),
            Event::End(end) => {
                let name = utf8(end.local_name().as_ref())?;
                Event::End(BytesEnd::new(name))
            }
            other => other,
        };

        writer
            .write_event(rewritten)
            .map_err(|e| ParseError::InvalidXmlStructure(e.to_string()))?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| ParseError::InvalidXmlStructure(e.to_string()))
}

fn local_start(start: &BytesStart<'_>) -> ParseResult<BytesStart<'static>> {
    let name = utf8(start.local_name().as_ref())?;
    let mut rewritten = BytesStart::new(name);

    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|e| ParseError::InvalidXmlStructure(e.to_string()))?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = attribute.key.local_name();
        rewritten.push_attribute((key.as_ref(), attribute.value.as_ref()));
    }

    Ok(rewritten.into_owned())
}

fn utf8(bytes: &[u8]) -> ParseResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| ParseError::InvalidXmlStructure(e.to_string()))
}

/// Deserialize an element whose text content is itself an escaped XML
/// document.
///
/// Meant for `#[serde(default, deserialize_with = "...")]` on an `Option`
/// field: serde only calls it when the element is present.
pub fn deserialize_nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let text = String::deserialize(deserializer)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse::<T>(&text).map(Some).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_namespaces_basic() {
        let input = r#"<e:propertyset><e:property>test</e:property></e:propertyset>"#;
        let expected = r#"<propertyset><property>test</property></propertyset>"#;
        assert_eq!(strip_namespaces(input).unwrap(), expected);
    }

    #[test]
    fn test_strip_namespaces_drops_xmlns_declarations() {
        let input = r#"<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property/></e:propertyset>"#;
        let expected = r#"<propertyset><property/></propertyset>"#;
        assert_eq!(strip_namespaces(input).unwrap(), expected);
    }

    #[test]
    fn test_strip_namespaces_keeps_attribute_values_escaped() {
        let input = r#"<Event xmlns="urn:x"><InstanceID val="0"><AVTransportURI val="http://h/a?x=1&amp;y=2"/></InstanceID></Event>"#;
        let stripped = strip_namespaces(input).unwrap();
        assert!(stripped.contains(r#"val="http://h/a?x=1&amp;y=2""#));
        assert!(!stripped.contains("xmlns"));
    }

    #[test]
    fn test_strip_namespaces_keeps_escaped_text() {
        let input = r#"<e:property><LastChange>&lt;Event/&gt;</LastChange></e:property>"#;
        let expected = r#"<property><LastChange>&lt;Event/&gt;</LastChange></property>"#;
        assert_eq!(strip_namespaces(input).unwrap(), expected);
    }

    #[test]
    fn test_strip_namespaces_rejects_mismatched_tags() {
        let input = r#"<a><b></a>"#;
        assert!(strip_namespaces(input).is_err());
    }
}
