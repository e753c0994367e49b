use crate::cli::commands::session::Session;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;

/// Execute the `kvault discard` command.
pub fn execute() -> Result<()> {
    let mut session = Session::open()?;

    if !session.editor.can_discard() {
        output::warning("No pending edits to discard");
        return session.finish();
    }

    session.editor.discard();
    output::success("Pending edits discarded");

    super::audit_helpers::log_audit(
        session.dir,
        Some(&session.config),
        AuditAction::Discard,
        vec![],
        None,
        None,
    );

    session.finish()
}
