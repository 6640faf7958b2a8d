//! Prompt Loader
//!
//! Loads prompt templates from the override directory or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (`prompts-dir` in config)
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates found in `override_dir`
    pub fn new(override_dir: Option<&Path>) -> Self {
        debug!(?override_dir, "PromptLoader::new: called");
        let override_dir = override_dir.filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                debug!(?dir, "PromptLoader::new: override directory missing, ignoring");
            }
            exists
        });

        Self {
            hbs: Self::engine(),
            override_dir: override_dir.map(Path::to_path_buf),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text, never HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Override: `{override_dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in override directory");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in override directory");
        }

        match embedded::get_embedded(name) {
            Some(content) => Ok(content.to_string()),
            None => Err(eyre!("Prompt template not found: {}", name)),
        }
    }

    /// Render a template with the given context
    pub fn render<C: Serialize>(&self, template_name: &str, context: &C) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Serialize)]
    struct Ctx {
        opening: String,
    }

    #[test]
    fn test_render_embedded_without_escaping() {
        let loader = PromptLoader::embedded_only();
        let out = loader
            .render(
                "coach",
                &Ctx {
                    opening: "Grow \"revenue\" & <profit>".to_string(),
                },
            )
            .unwrap();
        assert!(out.contains("Grow \"revenue\" & <profit>"));
        assert!(!out.contains("{{opening}}"));
    }

    #[test]
    fn test_override_directory_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("coach.pmt"), "Custom: {{opening}}").unwrap();

        let loader = PromptLoader::new(Some(dir.path()));
        let out = loader
            .render(
                "coach",
                &Ctx {
                    opening: "hi".to_string(),
                },
            )
            .unwrap();
        assert_eq!(out, "Custom: hi");
    }

    #[test]
    fn test_missing_override_falls_back_to_embedded() {
        let dir = TempDir::new().unwrap();
        let loader = PromptLoader::new(Some(dir.path()));
        assert!(loader.load_template("extract-okr").unwrap().contains("keyResults"));
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
