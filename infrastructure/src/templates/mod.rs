//! Agenda template store backed by TOML files.
//!
//! One file per template, `<dir>/<template-id>.toml`, deserialized straight
//! into [`AgendaTemplate`]. A malformed file is logged and treated as
//! missing.

use async_trait::async_trait;
use plenum_application::ports::TemplateStore;
use plenum_domain::{AgendaTemplate, TemplateId};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct TomlTemplateStore {
    dir: PathBuf,
}

impl TomlTemplateStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// List the template ids available on disk.
    pub fn available(&self) -> Vec<TemplateId> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut ids: Vec<TemplateId> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    path.file_stem()
                        .map(|stem| TemplateId::new(stem.to_string_lossy()))
                } else {
                    None
                }
            })
            .collect();
        ids.sort();
        ids
    }

    fn read(&self, id: &TemplateId) -> Option<AgendaTemplate> {
        let path = self.dir.join(format!("{id}.toml"));
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str::<AgendaTemplate>(&content) {
            Ok(template) => Some(template),
            Err(e) => {
                warn!("Malformed template file {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[async_trait]
impl TemplateStore for TomlTemplateStore {
    async fn get(&self, id: &TemplateId) -> Option<AgendaTemplate> {
        self.read(id)
    }
}
