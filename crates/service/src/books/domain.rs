use serde::{Deserialize, Serialize};

/// A username + text pair embedded in a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub username: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: i64,
    pub author: String,
    pub title: String,
    pub reviews: Vec<Review>,
}

/// A book together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub book: Book,
    pub version: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub isbn: i64,
    pub author: String,
    pub title: String,
}

/// Search filters, OR-ed together. Absent fields take no part in the match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSearch {
    pub isbn: Option<i64>,
    pub author: Option<String>,
    pub title: Option<String>,
}

impl BookSearch {
    pub fn is_empty(&self) -> bool {
        self.isbn.is_none() && self.author.is_none() && self.title.is_none()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.isbn == Some(book.isbn)
            || self.author.as_deref() == Some(book.author.as_str())
            || self.title.as_deref() == Some(book.title.as_str())
    }
}

impl From<models::book::Review> for Review {
    fn from(r: models::book::Review) -> Self {
        Review { username: r.username, text: r.text }
    }
}

impl From<Review> for models::book::Review {
    fn from(r: Review) -> Self {
        models::book::Review { username: r.username, text: r.text }
    }
}

impl From<models::book::Model> for BookRecord {
    fn from(m: models::book::Model) -> Self {
        BookRecord {
            book: Book {
                isbn: m.isbn,
                author: m.author,
                title: m.title,
                reviews: m.reviews.0.into_iter().map(Review::from).collect(),
            },
            version: m.version,
        }
    }
}
