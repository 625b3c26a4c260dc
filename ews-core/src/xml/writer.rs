use std::fmt::Display;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::XmlNamespace;
use crate::error::{EwsError, EwsResult};

/// Streaming writer for EWS documents.
///
/// Tracks open elements so callers close them with [`write_end_element`]
/// the same way they opened them, without repeating the qualified name.
///
/// [`write_end_element`]: EwsXmlWriter::write_end_element
pub struct EwsXmlWriter {
    writer: Writer<Vec<u8>>,
    open: Vec<String>,
}

impl Default for EwsXmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl EwsXmlWriter {
    pub fn new() -> Self {
        EwsXmlWriter {
            writer: Writer::new(Vec::new()),
            open: Vec::new(),
        }
    }

    pub fn write_declaration(&mut self) -> EwsResult<()> {
        // EWS only speaks XML 1.0 in UTF-8.
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(())
    }

    pub fn write_start_element(&mut self, ns: XmlNamespace, local_name: &str) -> EwsResult<()> {
        self.write_start_element_with_attributes(ns, local_name, &[])
    }

    pub fn write_start_element_with_attributes(
        &mut self,
        ns: XmlNamespace,
        local_name: &str,
        attributes: &[(&str, &str)],
    ) -> EwsResult<()> {
        let name = ns.qualify(local_name);
        let start = start_tag(&name, attributes);
        self.writer.write_event(Event::Start(start))?;
        self.open.push(name);
        Ok(())
    }

    /// Writes a self-closing element.
    pub fn write_empty_element(
        &mut self,
        ns: XmlNamespace,
        local_name: &str,
        attributes: &[(&str, &str)],
    ) -> EwsResult<()> {
        let name = ns.qualify(local_name);
        self.writer
            .write_event(Event::Empty(start_tag(&name, attributes)))?;
        Ok(())
    }

    /// Closes the most recently opened element.
    pub fn write_end_element(&mut self) -> EwsResult<()> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| EwsError::UnexpectedXml("end element without a start element".into()))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes escaped text into the currently open element.
    pub fn write_value(&mut self, value: &str) -> EwsResult<()> {
        self.writer.write_event(Event::Text(BytesText::new(value)))?;
        Ok(())
    }

    /// Writes `<ns:name>value</ns:name>`.
    pub fn write_element_value(
        &mut self,
        ns: XmlNamespace,
        local_name: &str,
        value: impl Display,
    ) -> EwsResult<()> {
        self.write_element_value_with_attributes(ns, local_name, &[], value)
    }

    pub fn write_element_value_with_attributes(
        &mut self,
        ns: XmlNamespace,
        local_name: &str,
        attributes: &[(&str, &str)],
        value: impl Display,
    ) -> EwsResult<()> {
        self.write_start_element_with_attributes(ns, local_name, attributes)?;
        self.write_value(&value.to_string())?;
        self.write_end_element()
    }

    /// Finishes the document. Fails if any element is still open.
    pub fn into_string(self) -> EwsResult<String> {
        if let Some(name) = self.open.last() {
            return Err(EwsError::UnexpectedXml(format!("element {name} was never closed")));
        }
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| EwsError::UnexpectedXml(format!("writer produced invalid UTF-8: {e}")))
    }
}

fn start_tag<'a>(name: &'a str, attributes: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for attribute in attributes {
        start.push_attribute(*attribute);
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_nested_elements_with_attributes() {
        let mut writer = EwsXmlWriter::new();
        writer
            .write_start_element_with_attributes(XmlNamespace::Types, "To", &[("Kind", "Period")])
            .unwrap();
        writer.write_value("Std & Co").unwrap();
        writer.write_end_element().unwrap();

        assert_eq!(
            writer.into_string().unwrap(),
            r#"<t:To Kind="Period">Std &amp; Co</t:To>"#
        );
    }

    #[test]
    fn test_unbalanced_elements_are_rejected() {
        let mut writer = EwsXmlWriter::new();
        assert!(writer.write_end_element().is_err());

        let mut writer = EwsXmlWriter::new();
        writer.write_start_element(XmlNamespace::Messages, "SyncFolderItems").unwrap();
        assert!(writer.into_string().is_err());
    }

    #[test]
    fn test_empty_element() {
        let mut writer = EwsXmlWriter::new();
        writer
            .write_empty_element(XmlNamespace::Types, "FieldURI", &[("FieldURI", "item:Subject")])
            .unwrap();
        assert_eq!(writer.into_string().unwrap(), r#"<t:FieldURI FieldURI="item:Subject"/>"#);
    }
}
