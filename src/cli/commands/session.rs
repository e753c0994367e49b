use std::path::Path;

use crate::adapters::store::json_item_store::JsonItemStore;
use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::editor::KeyValueEditor;
use crate::core::services::template_resolver::TemplateResolver;

/// An editing session: config, item store and the editor restored
/// from the draft.
pub struct Session {
    pub dir: &'static Path,
    pub config: AppConfig,
    pub store: JsonItemStore,
    pub editor: KeyValueEditor,
}

impl Session {
    /// Open the session for the current project.
    ///
    /// If the stored items differ from the source the draft was last
    /// loaded from, the editor reloads them first.
    pub fn open() -> Result<Self> {
        let dir = context::require_initialized()?;
        let config = AppConfig::load(dir)?;
        let store = JsonItemStore::new(dir);
        let source = store.load_source(&config.kvault.required)?;
        let unique = config.kvault.unique;

        let editor = match store.load_draft()? {
            Some(snapshot) => {
                let mut editor = KeyValueEditor::restore(snapshot, unique);
                if editor.source() != source.as_slice() {
                    output::detail("Stored items changed since the draft was saved; reloading");
                    editor.load(source);
                }
                editor
            }
            None => KeyValueEditor::with_source(source, unique),
        };

        Ok(Self {
            dir,
            config,
            store,
            editor,
        })
    }

    /// Persist the draft.
    pub fn save(&self) -> Result<()> {
        self.store.save_draft(&self.editor.snapshot())
    }

    /// Print the current view.
    pub fn render(&self) -> Result<()> {
        let reference = TemplateResolver::reference_keys(&self.config, context::project_root())?;
        output::render_view(&self.editor.view(reference.as_ref()));
        Ok(())
    }

    /// Save the draft and show the result.
    pub fn finish(&self) -> Result<()> {
        self.save()?;
        self.render()
    }
}
