pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::models::audit_entry::AuditAction;

/// Edit, encrypt and store key/value secrets from the terminal.
#[derive(Parser, Debug)]
#[command(name = "kvault", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Encryption backend to use ("age" or "gpg"); overrides config
    #[arg(long, global = true)]
    pub cipher: Option<String>,

    /// Path to the kvault directory
    #[arg(long, global = true, env = "KVAULT_DIR")]
    pub dir: Option<String>,

    /// age identity file used for key setup and export
    #[arg(long, global = true, env = "KVAULT_IDENTITY")]
    pub identity: Option<PathBuf>,

    /// Public key to encrypt for; overrides config
    #[arg(long, global = true, env = "KVAULT_PUBLIC_KEY")]
    pub public_key: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Cipher-related flags shared by several commands.
#[derive(Debug, Clone, Default)]
pub struct CryptoArgs {
    pub cipher: Option<String>,
    pub identity: Option<PathBuf>,
    pub public_key: Option<String>,
}

impl Cli {
    pub fn crypto_args(&self) -> CryptoArgs {
        CryptoArgs {
            cipher: self.cipher.clone(),
            identity: self.identity.clone(),
            public_key: self.public_key.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize kvault in the current project
    Init {
        /// Generate an age key pair and encrypt for it
        #[arg(long)]
        generate_key: bool,
    },

    /// Manage the local age key
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Show all rows with their status
    List,

    /// Change the key and value of a row
    Set {
        /// Row number as shown by 'kvault list'
        index: usize,
        /// New key
        key: String,
        /// New value (keeps the current value when omitted)
        value: Option<String>,
    },

    /// Add a row
    Add {
        key: String,
        /// Value (empty when omitted)
        value: Option<String>,
    },

    /// Remove a row, or clear its value if the key is required
    Remove {
        /// Row number as shown by 'kvault list'
        index: usize,
    },

    /// Throw away pending edits
    Discard,

    /// Encrypt pending rows and save them
    Submit,

    /// Load rows from a dotenv file into the draft
    Import {
        /// File to import (default: .env)
        file: Option<String>,
    },

    /// Decrypt stored values into a dotenv file
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show operation history
    Log {
        /// Filter by author name or email
        #[arg(long)]
        author: Option<String>,
        /// Only entries that touched this key
        #[arg(long)]
        key: Option<String>,
        /// Only this action (init, key_setup, import, edit, remove, discard, submit, export)
        #[arg(long)]
        action: Option<AuditAction>,
        /// Show last N entries
        #[arg(long)]
        last: Option<usize>,
        /// Check items.json against the last recorded state hash
        #[arg(long)]
        verify: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeysAction {
    /// Generate an age key pair if none exists
    Setup,
    /// Print the public key of the local identity
    Show,
}
