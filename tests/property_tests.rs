//! Property-based tests for generic conversion
//!
//! These tests use proptest to verify:
//! 1. Generated documents are accepted by the well-formedness check
//! 2. Cutting the closing tag short always makes a document malformed
//! 3. Repeated child names group into lists, single ones never do
//! 4. Whatever the checker accepts, the generic parse accepts too
//! 5. Bound values survive marshal then unmarshal

use indexmap::IndexMap;
use proptest::prelude::*;
use xmlbind::binding::model::Book;
use xmlbind::binding::XmlMarshaller;
use xmlbind::{is_well_formed, ErrorKind, GenericValue, XmlService};

#[derive(Debug, Clone)]
enum Tree {
    Leaf(String, String),
    Branch(String, Vec<Tree>),
}

impl Tree {
    fn name(&self) -> &str {
        match self {
            Tree::Leaf(name, _) | Tree::Branch(name, _) => name,
        }
    }

    fn write(&self, out: &mut String) {
        match self {
            Tree::Leaf(name, text) => {
                out.push_str(&format!("<{name}>{text}</{name}>"));
            }
            Tree::Branch(name, children) => {
                out.push_str(&format!("<{name}>"));
                for child in children {
                    child.write(out);
                }
                out.push_str(&format!("</{name}>"));
            }
        }
    }
}

fn to_xml(root: &Tree) -> String {
    let mut out = String::new();
    root.write(&mut out);
    out
}

/// Element names that never start with the reserved `xml` prefix
fn arb_name() -> impl Strategy<Value = String> {
    "[a-w][a-z0-9]{0,5}"
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,]{0,12}"
}

fn arb_tree() -> impl Strategy<Value = Tree> {
    let leaf = (arb_name(), arb_text()).prop_map(|(name, text)| Tree::Leaf(name, text));
    leaf.prop_recursive(4, 32, 6, |inner| {
        (arb_name(), prop::collection::vec(inner, 0..6))
            .prop_map(|(name, children)| Tree::Branch(name, children))
    })
}

fn arb_root() -> impl Strategy<Value = Tree> {
    (arb_name(), prop::collection::vec(arb_tree(), 0..8))
        .prop_map(|(name, children)| Tree::Branch(name, children))
}

proptest! {
    #[test]
    fn generated_documents_are_well_formed(root in arb_root()) {
        let xml = to_xml(&root);
        prop_assert!(is_well_formed(&xml), "rejected: {}", xml);
    }

    #[test]
    fn truncated_documents_are_malformed(root in arb_root(), cut in 1usize..4) {
        let xml = to_xml(&root);
        // The closing tag of the root is at least `</a>`
        let truncated = &xml[..xml.len() - cut];

        prop_assert!(!is_well_formed(truncated));
        let err = XmlService::new().handle_parse(truncated).unwrap_err();
        prop_assert_eq!(err.kind, ErrorKind::MalformedXml);
    }

    #[test]
    fn repeated_children_group_into_lists(root in arb_root()) {
        let xml = to_xml(&root);
        let response = XmlService::new().parse(&xml).unwrap();

        let Tree::Branch(root_name, children) = &root else {
            unreachable!("arb_root always yields a branch");
        };
        prop_assert_eq!(&response.metadata.root_element, root_name);

        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for child in children {
            *counts.entry(child.name()).or_insert(0) += 1;
        }

        let mapping = response.data.as_mapping().unwrap();
        prop_assert_eq!(mapping.len(), counts.len());

        for (name, count) in counts {
            prop_assert_eq!(response.metadata.structure.count_of(name), count);
            match mapping.get(name) {
                Some(GenericValue::List(items)) => prop_assert_eq!(items.len(), count),
                Some(_) => prop_assert_eq!(count, 1),
                None => prop_assert!(false, "missing key {}", name),
            }
        }
    }
}

/// Text and markup that a document builder has to handle beyond plain words
fn arb_content() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "plain",
        "a &amp; b",
        "&lt;tag&gt;",
        "&#x41;&#66;",
        "line\r\nbreak",
        "lone\rreturn",
        "<![CDATA[x < y & z]]>",
        "<!-- note -->",
        "<?pi data?>",
        "  ",
        "",
    ])
    .prop_map(str::to_string)
}

fn arb_attribute_value() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "v",
        "a&amp;b",
        "x\r\ny",
        "&quot;q&quot;",
        "tab\there",
        "&#10;",
        "",
    ])
    .prop_map(str::to_string)
}

fn arb_rich_element() -> impl Strategy<Value = String> {
    let leaf = (
        arb_name(),
        prop::collection::vec(arb_attribute_value(), 0..3),
        arb_content(),
    )
        .prop_map(|(name, values, content)| {
            let attrs: String = values
                .iter()
                .enumerate()
                .map(|(i, v)| format!(r#" k{i}="{v}""#))
                .collect();
            format!("<{name}{attrs}>{content}</{name}>")
        });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            arb_name(),
            prop::collection::vec((arb_content(), inner), 0..4),
        )
            .prop_map(|(name, parts)| {
                let body: String = parts.into_iter().map(|(t, e)| t + &e).collect();
                format!("<{name}>{body}</{name}>")
            })
    })
}

fn arb_book_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9<>&'\"]([a-zA-Z0-9<>&'\" .,]{0,14}[a-zA-Z0-9<>&'\"])?"
}

fn arb_book() -> impl Strategy<Value = Book> {
    (
        arb_book_text(),
        arb_book_text(),
        prop::option::of(arb_book_text()),
        prop::option::of(arb_book_text()),
        any::<i32>(),
        prop::option::of(prop::collection::vec(arb_book_text(), 1..4)),
    )
        .prop_map(|(title, author, id, publisher, year, genres)| {
            let mut book = Book::new(title, author).with_year(year);
            if let Some(id) = id {
                book = book.with_id(id);
            }
            if let Some(publisher) = publisher {
                book = book.with_publisher(publisher);
            }
            if let Some(genres) = genres {
                book = book.with_genres(genres);
            }
            book
        })
}

proptest! {
    #[test]
    fn rich_documents_are_accepted_by_both_paths(element in arb_rich_element()) {
        let xml = format!("<?xml version=\"1.0\"?>\r\n{element}");

        prop_assert!(is_well_formed(&xml), "rejected: {:?}", xml);
        let parsed = XmlService::new().parse(&xml);
        prop_assert!(parsed.is_ok(), "{:?} failed: {:?}", xml, parsed.err());
    }

    #[test]
    fn checker_and_parse_agree_on_damaged_input(
        element in arb_rich_element(),
        cut in any::<prop::sample::Index>(),
    ) {
        let mut xml = element;
        let at = cut.index(xml.len());
        if xml.is_char_boundary(at) {
            xml.remove(at);
        }

        if is_well_formed(&xml) {
            prop_assert!(XmlService::new().parse(&xml).is_ok(), "{:?}", xml);
        } else {
            let err = XmlService::new().handle_parse(&xml).unwrap_err();
            prop_assert_eq!(err.kind, ErrorKind::MalformedXml);
        }
    }

    #[test]
    fn books_survive_marshal_round_trip(book in arb_book()) {
        let marshaller = XmlMarshaller::default();

        let xml = marshaller.marshal(&book).unwrap();
        let back: Book = marshaller.unmarshal_typed(&xml).unwrap();
        prop_assert_eq!(back, book);
    }
}
