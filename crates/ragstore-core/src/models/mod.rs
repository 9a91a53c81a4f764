pub mod document;
pub mod search_result;

pub use document::{
    content_type_of, parse_metadata, DocumentRecord, Metadata, StoredDocument,
    CONTENT_TYPE_KEY, DEFAULT_CONTENT_TYPE, PATH_KEY, WORKSPACE_KEY,
};
pub use search_result::SearchResult;
