//! XML library tables.
//!
//! ```xml
//! <libraries>
//!   <library>
//!     <library_id>L1</library_id>
//!     <library_type>fr-firststrand</library_type>
//!     <read1_files>a_1.fq,b_1.fq</read1_files>
//!     <read2_files>a_2.fq,b_2.fq</read2_files>
//!     <param name="adapter">AGATCGGAAGAGC</param>
//!   </library>
//! </libraries>
//! ```
//!
//! A document whose root is a single `<library>` element is also accepted.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::core::library::{Library, LibraryParams};
use crate::core::table::LibraryTable;
use crate::parsing::LibraryTableError;

pub const LIBRARIES_ELEMENT: &str = "libraries";
pub const LIBRARY_ELEMENT: &str = "library";
pub const PARAM_ELEMENT: &str = "param";
const PARAM_NAME_ATTR: &str = "name";

fn xml_error(e: impl std::fmt::Display) -> LibraryTableError {
    LibraryTableError::Xml(e.to_string())
}

/// Child element of a `<library>` currently being read
enum Child {
    Field(String),
    Param(String),
    Ignored,
}

/// Partially read `<library>` element
#[derive(Default)]
struct LibraryElement {
    fields: HashMap<String, String>,
    params: LibraryParams,
}

impl LibraryElement {
    /// Start a direct child of `<library>`.
    ///
    /// The first element of a field wins and repeats are ignored. A repeated
    /// `<param>` name replaces the earlier value.
    fn open(&mut self, e: &BytesStart<'_>, name: &str) -> Result<Child, LibraryTableError> {
        let child = match open_child(e, name)? {
            Child::Field(field) if self.fields.contains_key(&field) => Child::Ignored,
            Child::Field(field) => {
                self.fields.insert(field.clone(), String::new());
                Child::Field(field)
            }
            Child::Param(key) => {
                self.params.insert(key.clone(), String::new());
                Child::Param(key)
            }
            Child::Ignored => Child::Ignored,
        };
        Ok(child)
    }

    fn finish(self) -> Result<Library, LibraryTableError> {
        Library::from_fields(&self.fields, self.params)
    }
}

/// Load an XML library table from a file
///
/// # Errors
///
/// Returns `LibraryTableError::Io` if the file cannot be read, or the errors of
/// [`parse_library_table_xml_text`].
pub fn read_library_table_xml(path: &Path) -> Result<LibraryTable, LibraryTableError> {
    let content = std::fs::read_to_string(path)?;
    parse_library_table_xml_text(&content)
}

/// Load an XML library table from text
///
/// # Errors
///
/// Returns `LibraryTableError::Xml` for malformed XML,
/// `LibraryTableError::MissingField` for a library without an id, or
/// `LibraryTableError::DuplicateLibraryId` if an id repeats.
pub fn parse_library_table_xml_text(text: &str) -> Result<LibraryTable, LibraryTableError> {
    LibraryTable::try_from_libraries(parse_libraries(text)?.into_iter().map(Ok))
}

/// Parse every `<library>` element in a document, in document order
///
/// # Errors
///
/// See [`parse_library_table_xml_text`].
pub fn parse_libraries(text: &str) -> Result<Vec<Library>, LibraryTableError> {
    let mut reader = Reader::from_str(text);

    let mut libraries = Vec::new();
    let mut current: Option<LibraryElement> = None;
    let mut child: Option<Child> = None;
    // Nesting depth of the open <library> element
    let mut library_depth = 0usize;
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                depth += 1;
                let name = e.name();
                let name = std::str::from_utf8(name.as_ref()).map_err(xml_error)?;
                if current.is_none() {
                    if name == LIBRARY_ELEMENT {
                        current = Some(LibraryElement::default());
                        library_depth = depth;
                    }
                } else if depth == library_depth + 1 {
                    if let Some(element) = current.as_mut() {
                        child = Some(element.open(&e, name)?);
                    }
                } else if depth == library_depth + 2 {
                    // Only text ahead of a child's first nested element counts
                    child = Some(Child::Ignored);
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                let name = std::str::from_utf8(name.as_ref()).map_err(xml_error)?;
                match current.as_mut() {
                    None if name == LIBRARY_ELEMENT => {
                        libraries.push(LibraryElement::default().finish()?);
                    }
                    Some(element) if depth == library_depth => {
                        element.open(&e, name)?;
                    }
                    Some(_) if depth == library_depth + 1 => child = Some(Child::Ignored),
                    _ => {}
                }
            }
            Event::Text(t) if depth == library_depth + 1 => {
                let text = t.unescape().map_err(xml_error)?;
                append_text(current.as_mut(), child.as_ref(), &text);
            }
            Event::CData(t) if depth == library_depth + 1 => {
                let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                append_text(current.as_mut(), child.as_ref(), &text);
            }
            Event::End(_) => {
                if current.is_some() {
                    if depth == library_depth + 1 {
                        child = None;
                    } else if depth == library_depth {
                        if let Some(element) = current.take() {
                            libraries.push(element.finish()?);
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(libraries)
}

fn open_child(e: &BytesStart<'_>, name: &str) -> Result<Child, LibraryTableError> {
    if name == PARAM_ELEMENT {
        let key = e
            .try_get_attribute(PARAM_NAME_ATTR)
            .map_err(xml_error)?
            .ok_or_else(|| xml_error("<param> element missing 'name' attribute"))?
            .unescape_value()
            .map_err(xml_error)?
            .into_owned();
        Ok(Child::Param(key))
    } else if Library::FIELDS.contains(&name) {
        Ok(Child::Field(name.to_string()))
    } else {
        Ok(Child::Ignored)
    }
}

fn append_text(current: Option<&mut LibraryElement>, child: Option<&Child>, text: &str) {
    let Some(element) = current else {
        return;
    };
    let value = match child {
        Some(Child::Field(field)) => element.fields.get_mut(field),
        Some(Child::Param(key)) => element.params.get_mut(key),
        _ => None,
    };
    if let Some(value) = value {
        value.push_str(text);
    }
}

impl Library {
    /// Write this library as a `<library>` element.
    ///
    /// Read file lists are joined with commas and the derived
    /// `fragment_layout` is included. The library itself is not modified.
    ///
    /// # Errors
    ///
    /// Returns `LibraryTableError::Xml` if the writer fails.
    pub fn to_xml<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
    ) -> Result<(), LibraryTableError> {
        writer
            .write_event(Event::Start(BytesStart::new(LIBRARY_ELEMENT)))
            .map_err(xml_error)?;

        for field in Library::FIELDS {
            let value = self.field_value(field).unwrap_or_default();
            write_text_element(writer, BytesStart::new(field), field, &value)?;
        }

        for (key, value) in &self.params {
            let start =
                BytesStart::new(PARAM_ELEMENT).with_attributes([(PARAM_NAME_ATTR, key.as_str())]);
            write_text_element(writer, start, PARAM_ELEMENT, value)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(LIBRARY_ELEMENT)))
            .map_err(xml_error)?;
        Ok(())
    }
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    name: &str,
    text: &str,
) -> Result<(), LibraryTableError> {
    if text.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }
    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

/// Serialize a table as an XML document rooted at `<libraries>`
///
/// # Errors
///
/// Returns `LibraryTableError::Xml` if the writer fails.
pub fn write_library_table_xml(table: &LibraryTable) -> Result<String, LibraryTableError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new(LIBRARIES_ELEMENT)))
        .map_err(xml_error)?;
    for library in table.values() {
        library.to_xml(&mut writer)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(LIBRARIES_ELEMENT)))
        .map_err(xml_error)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
    xml.push('\n');
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FragmentLayout, LibraryType};

    const XML: &str = r#"<?xml version="1.0"?>
<libraries>
  <library>
    <study_id>S1</study_id>
    <patient_id>P1</patient_id>
    <library_id>L1</library_id>
    <description>Tumor &amp; normal</description>
    <library_type>fr-firststrand</library_type>
    <read1_files>a_1.fq,b_1.fq</read1_files>
    <read2_files>a_2.fq,b_2.fq</read2_files>
    <fragment_layout>single</fragment_layout>
    <param name="adapter">AGATCGGAAGAGC</param>
    <param name="trim"/>
  </library>
  <library>
    <library_id>L2</library_id>
    <read1_files>c.fq</read1_files>
    <read2_files/>
    <notes><species>ignored</species></notes>
  </library>
</libraries>
"#;

    #[test]
    fn test_parse_libraries() {
        let table = parse_library_table_xml_text(XML).unwrap();
        assert_eq!(table.len(), 2);

        let l1 = table.get("L1").unwrap();
        assert_eq!(l1.study_id, "S1");
        assert_eq!(l1.patient_id, "P1");
        assert_eq!(l1.cohort_id, "");
        assert_eq!(l1.description, "Tumor & normal");
        assert_eq!(l1.library_type, LibraryType::FrFirststrand);
        assert_eq!(l1.read2_files, vec!["a_2.fq", "b_2.fq"]);
        // Derived from read2_files, not taken from the document
        assert_eq!(l1.fragment_layout(), FragmentLayout::Paired);
        assert_eq!(l1.params.get("adapter").unwrap(), "AGATCGGAAGAGC");
        assert_eq!(l1.params.get("trim").unwrap(), "");

        let l2 = table.get("L2").unwrap();
        assert_eq!(l2.fragment_layout(), FragmentLayout::Single);
        assert_eq!(l2.species, "");
        assert!(l2.params.is_empty());
    }

    #[test]
    fn test_single_library_root() {
        let xml = "<library><library_id>L1</library_id><read1_files>a.fq</read1_files></library>";
        let libraries = parse_libraries(xml).unwrap();
        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries[0].read1_files, vec!["a.fq"]);
    }

    #[test]
    fn test_duplicate_library_id() {
        let xml = "<libraries><library><library_id>L1</library_id></library>\
                   <library><library_id>L1</library_id></library></libraries>";
        let err = parse_library_table_xml_text(xml).unwrap_err();
        assert!(matches!(err, LibraryTableError::DuplicateLibraryId(_)));
    }

    #[test]
    fn test_missing_library_id() {
        let xml = "<libraries><library><species>human</species></library></libraries>";
        let err = parse_library_table_xml_text(xml).unwrap_err();
        assert!(matches!(err, LibraryTableError::MissingField("library_id")));
    }

    #[test]
    fn test_malformed_xml() {
        let xml = "<libraries><library><library_id>L1</species></library></libraries>";
        let err = parse_library_table_xml_text(xml).unwrap_err();
        assert!(matches!(err, LibraryTableError::Xml(_)));
    }

    #[test]
    fn test_param_requires_name() {
        let xml = "<library><library_id>L1</library_id><param>x</param></library>";
        assert!(matches!(
            parse_libraries(xml),
            Err(LibraryTableError::Xml(_))
        ));
    }

    #[test]
    fn test_repeated_field_keeps_first() {
        let xml = "<library><library_id>L1</library_id><library_id>L2</library_id>\
                   <read1_files>a.fq</read1_files><read1_files>b.fq</read1_files>\
                   <param name=\"k\">x</param><param name=\"k\">y</param></library>";
        let libraries = parse_libraries(xml).unwrap();
        assert_eq!(libraries[0].library_id, "L1");
        assert_eq!(libraries[0].read1_files, vec!["a.fq"]);
        assert_eq!(libraries[0].params.get("k").unwrap(), "y");
    }

    #[test]
    fn test_text_after_nested_element_ignored() {
        let xml = "<library><library_id>L1</library_id>\
                   <description>a<b>x</b>c</description>\
                   <param name=\"k\">p<br/>q</param></library>";
        let libraries = parse_libraries(xml).unwrap();
        assert_eq!(libraries[0].description, "a");
        assert_eq!(libraries[0].params.get("k").unwrap(), "p");
    }

    #[test]
    fn test_param_whitespace_preserved() {
        let mut library = Library::new("L1").with_read_files(["a.fq"], []);
        library
            .params
            .insert("note".to_string(), "  a b  ".to_string());
        let mut table = LibraryTable::new();
        table.insert(library).unwrap();

        let xml = write_library_table_xml(&table).unwrap();
        let reparsed = parse_library_table_xml_text(&xml).unwrap();
        assert_eq!(reparsed.get("L1").unwrap().params.get("note").unwrap(), "  a b  ");

        let xml = "<library>\n  <library_id>\n    L1\n  </library_id>\n</library>";
        assert_eq!(parse_libraries(xml).unwrap()[0].library_id, "L1");
    }

    #[test]
    fn test_write_round_trip() {
        let mut library = Library::new("L1")
            .with_library_type(LibraryType::FrUnstranded)
            .with_read_files(["a_1.fq", "b_1.fq"], ["a_2.fq", "b_2.fq"]);
        library.study_id = "S1".to_string();
        library.sample_id = "Sample <1>".to_string();
        library.species = "human".to_string();
        library
            .params
            .insert("adapter".to_string(), "AGATCGGAAGAGC".to_string());

        let mut table = LibraryTable::new();
        table.insert(library.clone()).unwrap();
        table.insert(Library::new("L2").with_read_files(["c.fq"], [])).unwrap();

        let xml = write_library_table_xml(&table).unwrap();
        assert!(xml.contains("<read1_files>a_1.fq,b_1.fq</read1_files>"));
        assert!(xml.contains("<fragment_layout>paired</fragment_layout>"));
        assert!(xml.contains(r#"<param name="adapter">AGATCGGAAGAGC</param>"#));

        // Writing leaves the record untouched
        assert_eq!(table.get("L1").unwrap(), &library);

        let reparsed = parse_library_table_xml_text(&xml).unwrap();
        assert_eq!(reparsed, table);
    }
}
