//! Data models for the book registry

pub mod book;
pub mod date_format;

// Re-export commonly used types
pub use book::{
    Book, BookFilter, BookPayload, BookQuery, BookRecordIn, BookRecordOut, DateRange,
    InsertOutcome, InsertResponse,
};
