//! Triples: the (subject, predicate, object) form of a one-hop question.
//!
//! One side of every triple is a [`Category`] (what kind of thing is being
//! asked for) and the other a [`Name`] (the specific thing asked about).
//! [`Direction`] records which side is which, so a triple can never hold two
//! categories or two names.
//!
//! A [`Triple`] holds natural-language terms ("drug", "treats",
//! "type 2 diabetes"); a [`CurieTriple`] holds the same shape with every
//! term resolved to a compact identifier ("biolink:Drug", "biolink:treats",
//! "HP:0005978").

use std::fmt;

/// An ontology class, either as a phrase or as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(pub String);

/// A specific entity, either as free text or as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(pub String);

macro_rules! string_newtype {
    ($type:ident) => {
        impl $type {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $type {
            fn from(value: &str) -> Self {
                $type(value.to_string())
            }
        }

        impl From<String> for $type {
            fn from(value: String) -> Self {
                $type(value)
            }
        }
    };
}

string_newtype!(Category);
string_newtype!(Name);

/// Which side of the predicate holds the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// "What drugs treat asthma?": the category is the subject.
    CategoryFirst,
    /// "What does albuterol treat?": the name is the subject.
    NameFirst,
}

/// A borrowed view of either side of a triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term<'a> {
    Category(&'a Category),
    Name(&'a Name),
}

impl<'a> Term<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Term::Category(category) => category.as_str(),
            Term::Name(name) => name.as_str(),
        }
    }
}

macro_rules! triple_type {
    ($(#[$meta:meta])* $type:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $type {
            category: Category,
            predicate: String,
            name: Name,
            direction: Direction,
        }

        impl $type {
            pub fn new(
                category: Category,
                predicate: impl Into<String>,
                name: Name,
                direction: Direction,
            ) -> Self {
                $type {
                    category,
                    predicate: predicate.into(),
                    name,
                    direction,
                }
            }

            /// `<category> <predicate> <name>`
            pub fn category_first(
                category: Category,
                predicate: impl Into<String>,
                name: Name,
            ) -> Self {
                Self::new(category, predicate, name, Direction::CategoryFirst)
            }

            /// `<name> <predicate> <category>`
            pub fn name_first(
                name: Name,
                predicate: impl Into<String>,
                category: Category,
            ) -> Self {
                Self::new(category, predicate, name, Direction::NameFirst)
            }

            pub fn category(&self) -> &Category {
                &self.category
            }

            pub fn predicate(&self) -> &str {
                &self.predicate
            }

            pub fn name(&self) -> &Name {
                &self.name
            }

            pub fn direction(&self) -> Direction {
                self.direction
            }

            pub fn subject(&self) -> Term<'_> {
                match self.direction {
                    Direction::CategoryFirst => Term::Category(&self.category),
                    Direction::NameFirst => Term::Name(&self.name),
                }
            }

            pub fn object(&self) -> Term<'_> {
                match self.direction {
                    Direction::CategoryFirst => Term::Name(&self.name),
                    Direction::NameFirst => Term::Category(&self.category),
                }
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "({}, {}, {})",
                    self.subject().as_str(),
                    self.predicate,
                    self.object().as_str()
                )
            }
        }
    };
}

triple_type!(
    /// A question as natural-language terms, before identifier resolution.
    Triple
);

triple_type!(
    /// A question with every term resolved to a compact identifier.
    CurieTriple
);
