//! Typed binding integration tests

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use xmlbind::binding::model::Book;
use xmlbind::binding::{Bindable, FieldDescriptor, TypeRegistry, XmlMarshaller};
use xmlbind::{ErrorKind, XmlService};

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    std::fs::read_to_string(path).expect("fixture should exist")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "note")]
struct Note {
    #[serde(rename = "@lang")]
    lang: String,
    body: String,
}

impl Bindable for Note {
    const ROOT_ELEMENT: &'static str = "note";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::attribute("lang", "String", true),
        FieldDescriptor::element("body", "String", true),
    ];
}

fn marshaller_with_note() -> XmlMarshaller {
    let mut registry = TypeRegistry::with_defaults();
    registry.register::<Note>();
    XmlMarshaller::new(registry)
}

// ============================================================================
// Unmarshal
// ============================================================================

#[test]
fn test_unmarshal_book_fixture() {
    let marshaller = XmlMarshaller::default();
    let book: Book = marshaller.unmarshal_typed(&fixture("book.xml")).unwrap();

    assert_eq!(book.id.as_deref(), Some("b42"));
    assert_eq!(book.title, "The Left Hand of Darkness");
    assert_eq!(book.author, "Ursula K. Le Guin");
    assert_eq!(book.publisher.as_deref(), Some("Ace Books"));
    assert_eq!(book.year, 1969);
    assert_eq!(
        book.genres.map(|g| g.genre),
        Some(vec![
            "science fiction".to_string(),
            "anthropology".to_string()
        ])
    );
}

#[test]
fn test_unmarshal_by_identifier() {
    let marshaller = XmlMarshaller::default();
    let bound = marshaller
        .unmarshal(&fixture("book.xml"), Book::identifier())
        .unwrap();

    assert_eq!(bound.type_identifier(), Book::identifier());
    let book = bound.downcast_ref::<Book>().unwrap();
    assert_eq!(book.year, 1969);
}

#[test]
fn test_registered_custom_type() {
    let marshaller = marshaller_with_note();
    let bound = marshaller
        .unmarshal(r#"<note lang="en"><body>hello</body></note>"#, Note::identifier())
        .unwrap();

    assert_eq!(
        bound.downcast_ref::<Note>(),
        Some(&Note {
            lang: "en".to_string(),
            body: "hello".to_string(),
        })
    );
}

// ============================================================================
// Marshal
// ============================================================================

#[test]
fn test_marshal_round_trip() {
    let marshaller = XmlMarshaller::default();
    let book = Book::new("Kindred", "Octavia E. Butler")
        .with_id("k1")
        .with_year(1979)
        .with_genres(["science fiction", "slave narrative"]);

    let xml = marshaller.marshal(&book).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(r#"<book id="k1">"#));
    assert!(xml.contains("\n    <title>Kindred</title>"));
    assert!(!xml.contains("<publisher>"));

    let back: Book = marshaller.unmarshal_typed(&xml).unwrap();
    assert_eq!(back, book);
}

#[test]
fn test_element_text_is_trimmed_attributes_are_not() {
    let marshaller = XmlMarshaller::default();
    let book = Book::new("  Dune ", "Frank <Herbert> & co").with_id(" b 1 ");

    let xml = marshaller.marshal(&book).unwrap();
    let back: Book = marshaller.unmarshal_typed(&xml).unwrap();

    assert_eq!(back.title, "Dune");
    assert_eq!(back.author, "Frank <Herbert> & co");
    assert_eq!(back.id.as_deref(), Some(" b 1 "));
}

#[test]
fn test_field_report_through_marshaller() {
    let marshaller = XmlMarshaller::default();
    let book = Book::new("Emma", "Jane Austen");

    let fields = marshaller.field_report(&book).unwrap();
    assert_eq!(fields.len(), 6);
    assert_eq!(fields[1].name, "title");

    let metadata = marshaller.object_metadata(&book).unwrap();
    assert_eq!(metadata.class_name, "Book");
    assert_eq!(metadata.fields, fields);
}

#[test]
fn test_marshal_unregistered_type() {
    let marshaller = XmlMarshaller::default();
    let note = Note {
        lang: "fr".to_string(),
        body: "bonjour".to_string(),
    };

    let xml = marshaller.marshal(&note).unwrap();
    assert!(xml.contains(r#"<note lang="fr">"#));
    assert!(xml.contains("<body>bonjour</body>"));
}

// ============================================================================
// Context cache
// ============================================================================

#[test]
fn test_context_built_once_per_type() {
    let marshaller = marshaller_with_note();
    assert!(marshaller.cache().is_empty());

    let first = marshaller.context(Book::identifier()).unwrap();
    marshaller.unmarshal(&fixture("book.xml"), Book::identifier()).unwrap();
    let second = marshaller.context(Book::identifier()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(marshaller.cache().len(), 1);

    marshaller.context(Note::identifier()).unwrap();
    assert_eq!(marshaller.cache().len(), 2);
}

#[test]
fn test_context_shared_across_threads() {
    let marshaller = XmlMarshaller::default();
    let xml = fixture("book.xml");

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let book: Book = marshaller.unmarshal_typed(&xml).unwrap();
                assert_eq!(book.year, 1969);
            });
        }
    });

    assert_eq!(marshaller.cache().len(), 1);
}

// ============================================================================
// Service boundary
// ============================================================================

#[test]
fn test_bind_response_json() {
    let service = XmlService::new();
    let response = service
        .handle_bind(&fixture("book.xml"), Book::identifier())
        .unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["object"]["@id"], "b42");
    assert_eq!(json["object"]["year"], 1969);
    assert_eq!(json["metadata"]["className"], "Book");
    assert_eq!(json["metadata"]["packageName"], "xmlbind::binding::model");
    assert_eq!(
        json["metadata"]["fields"][0],
        json!({ "name": "id", "type": "Option<String>" })
    );
    assert_eq!(json["metadata"]["fields"].as_array().map(Vec::len), Some(6));
}

#[test]
fn test_unknown_identifier() {
    let service = XmlService::new();
    let err = service
        .handle_bind(&fixture("book.xml"), "xmlbind::binding::model::Magazine")
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::TargetTypeNotFound);
    assert!(err.error.contains("Magazine"));
}

#[test]
fn test_wrong_root_element() {
    let service = XmlService::new();
    let err = service
        .handle_bind(&fixture("catalog.xml"), Book::identifier())
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::BindingError);
}

#[test]
fn test_missing_required_field() {
    let service = XmlService::new();
    let err = service
        .handle_bind("<book><title>Untitled</title></book>", Book::identifier())
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::BindingError);
}

#[test]
fn test_malformed_input_on_typed_path() {
    let service = XmlService::new();
    let err = service
        .handle_bind(&fixture("malformed.xml"), Book::identifier())
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::BindingError);
}
