//! Bindable types shipped with the crate

use serde::{Deserialize, Serialize};

use super::{Bindable, FieldDescriptor};

/// A book record
///
/// ```xml
/// <book id="b1">
///     <title>Dune</title>
///     <author>Frank Herbert</author>
///     <publisher>Chilton</publisher>
///     <year>1965</year>
///     <genres>
///         <genre>science fiction</genre>
///     </genres>
/// </book>
/// ```
///
/// `title` and `author` are required; `year` defaults to 0 when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "book")]
pub struct Book {
    /// Identifier attribute
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Publisher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Publication year
    #[serde(default)]
    pub year: i32,
    /// `<genres>` wrapper around repeated `<genre>` elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Genres>,
}

/// Wrapper element holding a book's genres
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genres {
    /// Genre names in document order
    #[serde(default)]
    pub genre: Vec<String>,
}

impl Book {
    /// Create a book with the required fields set
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            publisher: None,
            year: 0,
            genres: None,
        }
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the publisher
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Set the publication year
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Set the genres
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = Some(Genres {
            genre: genres.into_iter().map(Into::into).collect(),
        });
        self
    }
}

impl Bindable for Book {
    const ROOT_ELEMENT: &'static str = "book";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::attribute("id", "Option<String>", false),
        FieldDescriptor::element("title", "String", true),
        FieldDescriptor::element("author", "String", true),
        FieldDescriptor::element("publisher", "Option<String>", false),
        FieldDescriptor::element("year", "i32", false),
        FieldDescriptor::element("genres", "Option<Genres>", false),
    ];
}
