use crate::core::errors::Result;
use crate::core::models::env_document::EnvDocument;

/// Port for reading and writing plaintext key/value files.
pub trait ConfigParser: Send + Sync {
    /// Parse raw file content into an `EnvDocument`.
    fn parse(&self, content: &str) -> Result<EnvDocument>;

    /// Serialize an `EnvDocument` back to its file format.
    fn serialize(&self, document: &EnvDocument) -> Result<String>;
}
