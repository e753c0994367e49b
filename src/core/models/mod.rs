pub mod audit_entry;
pub mod entry;
pub mod env_document;
