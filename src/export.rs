// Export module - writes a static snapshot of the component library
//
// Output layout:
//   <out>/blocks/<id>.html       raw markup per block
//   <out>/templates/<id>.html    raw markup per template
//   <out>/blocks.json            { id: metadata } for every block
//   <out>/templates.json         { id: metadata } for every template
//
// A component that fails to export is logged and skipped.

use crate::store::{ComponentMetadata, ComponentStore, ComponentType};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Counts of exported components per category
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub blocks: usize,
    pub templates: usize,
}

pub fn export(store: &ComponentStore, out: &Path) -> Result<ExportSummary> {
    tracing::info!(
        "Exporting {} to {}",
        store.root().display(),
        out.display()
    );
    let mut index: BTreeMap<ComponentType, BTreeMap<String, ComponentMetadata>> = BTreeMap::new();

    for kind in ComponentType::ALL {
        let dir = out.join(kind.as_str());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
        index.insert(kind, BTreeMap::new());
    }

    for component in store.load_all_components() {
        let id = &component.metadata.id;
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            tracing::warn!(
                kind = %component.kind,
                folder = %component.folder,
                "Skipping component with unusable id {:?}",
                id
            );
            continue;
        }

        let html_path = out.join(component.kind.as_str()).join(format!("{}.html", id));
        if let Err(e) = fs::write(&html_path, &component.html) {
            tracing::error!(path = %html_path.display(), error = %e, "Error exporting component");
            continue;
        }

        tracing::info!("Built {}/{}", component.kind, id);
        index
            .entry(component.kind)
            .or_default()
            .insert(id.clone(), component.metadata);
    }

    let mut summary = ExportSummary::default();
    for (kind, entries) in &index {
        let path = out.join(format!("{}.json", kind.as_str()));
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize index")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        match kind {
            ComponentType::Blocks => summary.blocks = entries.len(),
            ComponentType::Templates => summary.templates = entries.len(),
        }
    }

    Ok(summary)
}
