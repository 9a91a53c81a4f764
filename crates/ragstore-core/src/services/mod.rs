pub mod factory;
pub mod hydration;
pub mod rag_storage;

pub use factory::StorageFactory;
pub use hydration::hydrate_results;
pub use rag_storage::{
    path_to_doc_id, RagStorageAdapter, ReindexReport, DEFAULT_TOP_K, DEFAULT_WORKSPACE_ID,
};
