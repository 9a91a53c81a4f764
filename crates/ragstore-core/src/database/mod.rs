pub mod config;
pub mod connection;
pub mod knowledge_repo;
pub mod record_store;

pub use config::{get_config_dir, get_default_db_path};
pub use connection::DatabaseManager;
pub use knowledge_repo::KnowledgeEmbeddingRepository;
pub use record_store::RecordStore;

#[cfg(test)]
pub use record_store::MockRecordStore;
