use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::adapters::parsers::dotenv_parser::DotenvParser;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::traits::parser::ConfigParser;

/// Priority list of template file names for auto-discovery.
const TEMPLATE_CANDIDATES: &[&str] = &[".env.template", ".env.example", ".env.sample"];

/// Finds the template whose keys count as "defined" for the
/// presence indicator in `kvault list`.
pub struct TemplateResolver;

impl TemplateResolver {
    /// Resolve the template path.
    ///
    /// Resolution order:
    /// 1. `template` in config, relative to the project root
    /// 2. Auto-discovery in the project root
    ///
    /// Returns `None` when no template exists; that is not an error.
    pub fn resolve(config: &AppConfig, project_root: &Path) -> Option<PathBuf> {
        if let Some(ref tpl) = config.kvault.template {
            let path = project_root.join(tpl);
            if path.exists() {
                return Some(path);
            }
            tracing::warn!(template = %path.display(), "configured template not found");
        }

        TEMPLATE_CANDIDATES
            .iter()
            .map(|name| project_root.join(name))
            .find(|p| p.exists())
    }

    /// Load the reference key set from the resolved template, if any.
    pub fn reference_keys(
        config: &AppConfig,
        project_root: &Path,
    ) -> Result<Option<BTreeSet<String>>> {
        let Some(path) = Self::resolve(config, project_root) else {
            return Ok(None);
        };

        let content = std::fs::read_to_string(&path)?;
        let document = DotenvParser::for_file(&path).parse(&content)?;
        tracing::debug!(template = %path.display(), "loaded reference keys");
        Ok(Some(document.key_set()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_template(template: Option<&str>) -> AppConfig {
        let toml = match template {
            Some(t) => format!("[kvault]\nversion = \"0.1.0\"\ntemplate = \"{t}\"\n"),
            None => "[kvault]\nversion = \"0.1.0\"\n".to_string(),
        };
        toml::from_str(&toml).unwrap()
    }

    #[test]
    fn no_template_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_template(None);

        assert_eq!(TemplateResolver::resolve(&config, dir.path()), None);
        assert_eq!(
            TemplateResolver::reference_keys(&config, dir.path()).unwrap(),
            None
        );
    }

    #[test]
    fn configured_template_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env.template"), "A=\n").unwrap();
        std::fs::write(dir.path().join("custom.tpl"), "B=\n").unwrap();
        let config = config_with_template(Some("custom.tpl"));

        let keys = TemplateResolver::reference_keys(&config, dir.path())
            .unwrap()
            .unwrap();

        assert!(keys.contains("B"));
        assert!(!keys.contains("A"));
    }

    #[test]
    fn missing_configured_template_falls_back_to_discovery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env.example"), "DB=\nPORT=\n").unwrap();
        let config = config_with_template(Some("gone.tpl"));

        let keys = TemplateResolver::reference_keys(&config, dir.path())
            .unwrap()
            .unwrap();

        assert_eq!(keys.len(), 2);
    }
}
