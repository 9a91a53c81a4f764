mod common;
mod test_adapter_scenarios;
mod test_ingest_file;
mod test_reindex;
mod test_workspace_isolation;
