pub mod audit_helpers;
pub mod crypto_helpers;
pub mod discard;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod keys;
pub mod list;
pub mod log;
pub mod remove;
pub mod session;
pub mod submit;
