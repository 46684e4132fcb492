//! Parse and serialize element trees with quick-xml events.
//!
//! Whitespace is never trimmed: `w:t` runs are whitespace-significant and
//! templates must round-trip with their spacing intact.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{Result, XmlElement, XmlError, XmlNode};

/// Parse an XML part into its root element.
///
/// The XML declaration, processing instructions and doctype are discarded;
/// they are re-emitted in canonical form by [`serialize_document`].
pub fn parse_document(bytes: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let el = element_from_start(&start)?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                let el = stack.pop().ok_or_else(|| {
                    XmlError::Structure("close tag without open tag".to_string())
                })?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(text) => {
                let value = text.unescape()?.into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(value));
                } else if !value.trim().is_empty() {
                    return Err(XmlError::Structure(
                        "text content outside the root element".to_string(),
                    ));
                }
            }
            Event::CData(cdata) => {
                let value = String::from_utf8(cdata.into_inner().into_owned())?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(value));
                }
            }
            Event::Comment(comment) => {
                let value = String::from_utf8(comment.into_inner().into_owned())?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Comment(value));
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(XmlError::Structure("unclosed element".to_string()));
    }
    root.ok_or_else(|| XmlError::Structure("document has no root element".to_string()))
}

/// Serialize a tree back to part bytes, with the standard OOXML declaration.
pub fn serialize_document(root: &XmlElement) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    write_element(&mut writer, root)?;
    Ok(writer.into_inner())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8(start.name().as_ref().to_vec())?;
    let mut el = XmlElement::new(&name);
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8(attr.key.as_ref().to_vec())?;
        let value = attr.unescape_value()?.into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}

fn attach(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    el: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(el));
    } else if root.is_some() {
        return Err(XmlError::Structure(
            "multiple root elements".to_string(),
        ));
    } else {
        *root = Some(el);
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (name, value) in &el.attrs {
        start.push_attribute((name.as_str(), value.as_str()));
    }
    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        match child {
            XmlNode::Element(inner) => write_element(writer, inner)?,
            XmlNode::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            XmlNode::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}
