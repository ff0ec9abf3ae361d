//! Lexical search over inverted indexes.
//!
//! Text fields are analyzed into terms at refresh time and stored in an
//! [`InvertedIndex`](inverted::InvertedIndex). A
//! [`TermQuery`](query::TermQuery) looks a single literal term up in the
//! postings of the current snapshot.

pub mod inverted;
pub mod query;
