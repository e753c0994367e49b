use crate::cli::commands::session::Session;
use crate::core::errors::Result;

/// Execute the `kvault list` command.
pub fn execute() -> Result<()> {
    Session::open()?.finish()
}
