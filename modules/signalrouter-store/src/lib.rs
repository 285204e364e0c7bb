pub mod document_store;
pub mod history_store;

pub use document_store::{Cursor, DocumentStore, FetchedBatch, HttpDocumentStore};
pub use history_store::{HistoryStore, PostgresHistoryStore};
