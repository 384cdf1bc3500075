//! Streaming XML writer with explicit element open/close calls.
//!
//! Wraps a quick-xml [`Writer`] and keeps a stack of open element names, so a
//! close that does not match the innermost open element is reported instead of
//! producing a malformed document. Attribute values and text are escaped by
//! quick-xml.

use std::io::Write;

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use super::error::ExportError;

pub struct XmlDocumentWriter<W: Write> {
    writer: Writer<W>,
    open: Vec<String>,
}

impl<W: Write> XmlDocumentWriter<W> {
    /// Creates a writer that indents nested elements by two spaces
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            open: Vec::new(),
        }
    }

    /// Writes `<?xml version="1.0" encoding="utf-8"?>`
    pub fn declaration(&mut self) -> Result<(), ExportError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(ExportError::xml)
    }

    /// Opens an element; it must later be closed with [`Self::close`]
    pub fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), ExportError> {
        self.writer
            .write_event(Event::Start(start_tag(name, attributes)))
            .map_err(ExportError::xml)?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// Closes the innermost open element, which must be `name`
    pub fn close(&mut self, name: &str) -> Result<(), ExportError> {
        match self.open.last() {
            Some(innermost) if innermost == name => {}
            Some(innermost) => {
                return Err(ExportError::xml(format!(
                    "cannot close <{}> while <{}> is open",
                    name, innermost
                )))
            }
            None => {
                return Err(ExportError::xml(format!(
                    "cannot close <{}>, no element is open",
                    name
                )))
            }
        }
        self.open.pop();
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(ExportError::xml)
    }

    /// Writes `<name attributes>text</name>` on one line
    pub fn text_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<(), ExportError> {
        self.writer
            .write_event(Event::Start(start_tag(name, attributes)))
            .map_err(ExportError::xml)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(ExportError::xml)?;
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(ExportError::xml)
    }

    /// Names of the currently open elements, outermost first
    pub fn open_elements(&self) -> &[String] {
        &self.open
    }

    /// Returns the underlying sink once every element has been closed
    pub fn finish(self) -> Result<W, ExportError> {
        if let Some(innermost) = self.open.last() {
            return Err(ExportError::xml(format!(
                "document finished with <{}> still open",
                innermost
            )));
        }
        Ok(self.writer.into_inner())
    }
}

fn start_tag<'a>(name: &'a str, attributes: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &attribute in attributes {
        start.push_attribute(attribute);
    }
    start
}
