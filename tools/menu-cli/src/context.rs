//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use menu_commerce::cart::StoreContext;
use menu_configurator::{EngineConfig, InMemoryCatalog};

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Engine configuration.
    pub config: EngineConfig,
    /// Store the cart belongs to.
    pub store: StoreContext,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, store_slug: &str, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            EngineConfig::load(path).with_context(|| format!("Failed to load config {}", path))?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        let store = StoreContext::new(store_slug, store_slug, store_slug);
        Ok(Self {
            config,
            store,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<EngineConfig> {
        let config_names = ["menu.toml", ".menu.toml", "menu.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = EngineConfig::load(&config_path) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Load a catalog document.
    pub fn catalog(&self, path: &str) -> Result<Arc<InMemoryCatalog>> {
        let path = self.resolve_path(path);
        self.output.debug(&format!("Loading catalog {}", path.display()));
        let catalog = InMemoryCatalog::load(&path).with_context(|| format!("Failed to load catalog {}", path.display()))?;
        Ok(Arc::new(catalog))
    }
}
