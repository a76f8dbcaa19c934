//! File-backed component store
//!
//! Layout under the contents root:
//!
//! ```text
//! <root>/<type>/<folder>/metadata.json
//! <root>/<type>/<folder>/index.html
//! <root>/<type>/<folder>/preview.png   (optional)
//! ```
//!
//! Nothing is cached: every listing and lookup re-reads the directory tree.
//! There is no locking either, so concurrent writers race and the last one wins.
//!
//! The `*_component` operations never propagate errors. They log the cause and
//! report plain success or failure; the `try_*` variants return the typed error.

mod model;
mod pagination;
mod preview;

pub use model::{slugify, Component, ComponentMetadata, ComponentType, TypeFilter};
pub use pagination::{paginate, Page};
pub use preview::{decode_png_data_url, encode_png_data_url};

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const METADATA_FILE: &str = "metadata.json";
const HTML_FILE: &str = "index.html";
const PREVIEW_FILE: &str = "preview.png";

/// Errors raised inside the store
#[derive(Debug)]
pub enum StoreError {
    /// No stored component has this id
    NotFound(String),
    /// Folder name would escape its category directory
    InvalidFolder(String),
    /// A stored metadata file could not be parsed
    Malformed { path: PathBuf, message: String },
    /// Filesystem failure
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Component not found: {}", id),
            Self::InvalidFolder(folder) => write!(f, "Invalid component folder: {:?}", folder),
            Self::Malformed { path, message } => {
                write!(f, "Malformed component at {}: {}", path.display(), message)
            }
            Self::Io { path, source } => write!(f, "I/O error at {}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Translates between [`Component`] records and their directories on disk
#[derive(Debug, Clone)]
pub struct ComponentStore {
    root: PathBuf,
}

impl ComponentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn type_dir(&self, kind: ComponentType) -> PathBuf {
        self.root.join(kind.as_str())
    }

    fn component_dir(&self, kind: ComponentType, folder: &str) -> Result<PathBuf, StoreError> {
        if !model::is_valid_folder(folder) {
            return Err(StoreError::InvalidFolder(folder.to_string()));
        }
        Ok(self.type_dir(kind).join(folder))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reading
    // ─────────────────────────────────────────────────────────────────────────

    /// Read every visible component of the given categories, sorted by
    /// category then folder. Does not create missing directories.
    ///
    /// Entries that fail to read or parse are logged and skipped.
    pub fn scan(&self, filter: TypeFilter) -> Result<Vec<Component>, StoreError> {
        let mut components = Vec::new();

        for &kind in filter.kinds() {
            let type_path = self.type_dir(kind);
            let entries = match fs::read_dir(&type_path) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(io_error(&type_path)(e)),
            };

            for entry in entries {
                let entry = entry.map_err(io_error(&type_path))?;
                if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    continue;
                }
                let Some(folder) = entry.file_name().to_str().map(String::from) else {
                    tracing::warn!(
                        kind = %kind,
                        path = %entry.path().display(),
                        "Skipping component folder with non UTF-8 name"
                    );
                    continue;
                };

                match self.read_component(kind, &folder) {
                    Ok(Some(component)) => components.push(component),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(kind = %kind, folder = %folder, error = %e, "Skipping component");
                    }
                }
            }
        }

        components.sort_by(|a, b| (a.kind, &a.folder).cmp(&(b.kind, &b.folder)));
        Ok(components)
    }

    /// Read one component directory. `None` when either file is absent.
    fn read_component(
        &self,
        kind: ComponentType,
        folder: &str,
    ) -> Result<Option<Component>, StoreError> {
        let dir = self.component_dir(kind, folder)?;
        let metadata_path = dir.join(METADATA_FILE);
        let html_path = dir.join(HTML_FILE);

        if !metadata_path.is_file() || !html_path.is_file() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&metadata_path).map_err(io_error(&metadata_path))?;
        let metadata: ComponentMetadata =
            serde_json::from_str(&raw).map_err(|e| StoreError::Malformed {
                path: metadata_path.clone(),
                message: e.to_string(),
            })?;
        let html = fs::read_to_string(&html_path).map_err(io_error(&html_path))?;

        Ok(Some(Component {
            metadata,
            html,
            kind,
            folder: folder.to_string(),
        }))
    }

    /// List components, paginated. Missing category directories are created.
    ///
    /// `page` is clamped to `[1, total_pages]` (or 1 for an empty store).
    /// A failed scan is logged and yields an empty page.
    pub fn load_components(&self, page: usize, limit: usize, filter: TypeFilter) -> Page<Component> {
        for &kind in filter.kinds() {
            let type_path = self.type_dir(kind);
            if let Err(e) = fs::create_dir_all(&type_path) {
                tracing::error!(path = %type_path.display(), error = %e, "Failed to create type directory");
            }
        }

        match self.scan(filter) {
            Ok(components) => {
                let last_page = pagination::total_pages(components.len(), limit).max(1);
                paginate(components, page.clamp(1, last_page), limit)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading components");
                Page::empty(page.max(1))
            }
        }
    }

    /// Every component across both categories, unpaginated
    pub fn load_all_components(&self) -> Vec<Component> {
        self.scan(TypeFilter::All).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error loading components");
            Vec::new()
        })
    }

    /// Find a component by id across both categories
    pub fn try_find(&self, id: &str) -> Result<Component, StoreError> {
        self.scan(TypeFilter::All)?
            .into_iter()
            .find(|c| c.metadata.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn find_component(&self, id: &str) -> Option<Component> {
        match self.try_find(id) {
            Ok(component) => Some(component),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Error looking up component");
                None
            }
        }
    }

    /// Path of the stored preview image for `id`, if it has one
    pub fn preview_path(&self, id: &str) -> Option<PathBuf> {
        let component = self.find_component(id)?;
        let path = self
            .component_dir(component.kind, &component.folder)
            .ok()?
            .join(PREVIEW_FILE);
        path.is_file().then_some(path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writing
    // ─────────────────────────────────────────────────────────────────────────

    /// Write metadata, HTML and (optionally) the preview into `dir`.
    ///
    /// A screenshot that fails to decode or write is logged and dropped; the
    /// component itself is still saved.
    fn write_files(
        &self,
        dir: &Path,
        component: &Component,
        screenshot: Option<&str>,
    ) -> Result<(), StoreError> {
        fs::create_dir_all(dir).map_err(io_error(dir))?;

        let metadata_path = dir.join(METADATA_FILE);
        let metadata = serde_json::to_string_pretty(&component.metadata).map_err(|e| {
            StoreError::Malformed {
                path: metadata_path.clone(),
                message: e.to_string(),
            }
        })?;
        fs::write(&metadata_path, metadata).map_err(io_error(&metadata_path))?;

        let html_path = dir.join(HTML_FILE);
        fs::write(&html_path, &component.html).map_err(io_error(&html_path))?;

        if let Some(data_url) = screenshot {
            let preview_path = dir.join(PREVIEW_FILE);
            match decode_png_data_url(data_url) {
                Ok(png) => {
                    if let Err(e) = fs::write(&preview_path, png) {
                        tracing::warn!(path = %preview_path.display(), error = %e, "Error saving screenshot");
                    }
                }
                Err(e) => {
                    tracing::warn!(folder = %component.folder, error = %e, "Discarding undecodable screenshot");
                }
            }
        }

        Ok(())
    }

    /// Create (or silently overwrite) a component directory
    pub fn try_create(
        &self,
        component: &Component,
        screenshot: Option<&str>,
    ) -> Result<Component, StoreError> {
        let component = component.clone().normalized()?;
        let dir = self.component_dir(component.kind, &component.folder)?;
        self.write_files(&dir, &component, screenshot)?;

        tracing::info!(kind = %component.kind, folder = %component.folder, "Component created");
        Ok(component)
    }

    pub fn create_component(&self, component: &Component, screenshot: Option<&str>) -> bool {
        match self.try_create(component, screenshot) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Error creating component");
                false
            }
        }
    }

    /// Update the component currently stored under `original_id`.
    ///
    /// With `name_changed` (or a change of category) the directory moves to the
    /// new identity: an atomic rename when the filesystem allows it, otherwise
    /// the old directory is removed and the new one written from scratch.
    /// Without it the files are overwritten in the original directory.
    pub fn try_update(
        &self,
        original_id: &str,
        component: &Component,
        name_changed: bool,
        screenshot: Option<&str>,
    ) -> Result<Component, StoreError> {
        let original = self.try_find(original_id)?;
        let source = self.component_dir(original.kind, &original.folder)?;

        if name_changed || original.kind != component.kind {
            let mut component = component.clone();
            if name_changed {
                // Re-derive both from the new name unless the caller set a new id
                if component.metadata.id == original.metadata.id {
                    component.metadata.id = String::new();
                }
                if component.folder == original.folder {
                    component.folder = String::new();
                }
            }
            let component = component.normalized()?;
            let target = self.component_dir(component.kind, &component.folder)?;

            if target != source {
                self.relocate(&source, &target)?;
            }
            self.write_files(&target, &component, screenshot)?;

            tracing::info!(
                from = %format!("{}/{}", original.kind, original.folder),
                to = %format!("{}/{}", component.kind, component.folder),
                "Component moved"
            );
            Ok(component)
        } else {
            let mut component = component.clone();
            component.folder = original.folder.clone();
            if component.metadata.id.trim().is_empty() {
                component.metadata.id = original.metadata.id.clone();
            }
            self.write_files(&source, &component, screenshot)?;

            tracing::info!(kind = %component.kind, folder = %component.folder, "Component updated");
            Ok(component)
        }
    }

    /// Move a component directory, falling back to remove-then-recreate when
    /// `rename` fails (for example because the target already exists).
    fn relocate(&self, source: &Path, target: &Path) -> Result<(), StoreError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        match fs::rename(source, target) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::debug!(
                    source = %source.display(),
                    target = %target.display(),
                    error = %e,
                    "Directory rename failed, recreating instead"
                );
                if source.exists() {
                    fs::remove_dir_all(source).map_err(io_error(source))?;
                }
                fs::create_dir_all(target).map_err(io_error(target))
            }
        }
    }

    pub fn update_component(
        &self,
        original_id: &str,
        component: &Component,
        name_changed: bool,
        screenshot: Option<&str>,
    ) -> bool {
        match self.try_update(original_id, component, name_changed, screenshot) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(id = %original_id, error = %e, "Error updating component");
                false
            }
        }
    }

    /// Remove the component stored under `id` along with its directory
    pub fn try_delete(&self, id: &str) -> Result<Component, StoreError> {
        let component = self.try_find(id)?;
        let dir = self.component_dir(component.kind, &component.folder)?;
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(io_error(&dir))?;
        }

        tracing::info!(kind = %component.kind, folder = %component.folder, "Component deleted");
        Ok(component)
    }

    pub fn delete_component(&self, id: &str) -> bool {
        match self.try_delete(id) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Error deleting component");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ComponentStore) {
        let dir = TempDir::new().unwrap();
        let store = ComponentStore::new(dir.path().join("contents"));
        (dir, store)
    }

    fn block(name: &str) -> Component {
        Component {
            metadata: ComponentMetadata {
                id: slugify(name),
                name: name.to_string(),
                tags: vec!["hero".to_string()],
                author: "A".to_string(),
            },
            html: format!("<section>{}</section>\n", name),
            kind: ComponentType::Blocks,
            folder: slugify(name),
        }
    }

    fn ids(page: &Page<Component>) -> Vec<&str> {
        page.data.iter().map(|c| c.metadata.id.as_str()).collect()
    }

    #[test]
    fn test_create_then_load_round_trips() {
        let (_dir, store) = store();
        let mut component = block("Hero Section");
        component.html = "<div class=\"a\">\n\t ünïcode &amp; </div>".to_string();
        component.metadata.tags = vec!["hero".to_string(), "landing".to_string()];

        assert!(store.create_component(&component, None));

        let loaded = store.find_component("hero-section").unwrap();
        assert_eq!(loaded, component);

        let html = fs::read_to_string(store.root().join("blocks/hero-section/index.html")).unwrap();
        assert_eq!(html, component.html);
    }

    #[test]
    fn test_create_list_rename_flow() {
        let (_dir, store) = store();
        let created = store
            .try_create(
                &Component {
                    metadata: ComponentMetadata {
                        id: String::new(),
                        name: "Hero Section".to_string(),
                        tags: vec!["hero".to_string()],
                        author: "A".to_string(),
                    },
                    html: "<h1>Hero</h1>".to_string(),
                    kind: ComponentType::Blocks,
                    folder: String::new(),
                },
                None,
            )
            .unwrap();
        assert_eq!(created.metadata.id, "hero-section");

        let page = store.load_components(1, 12, TypeFilter::Only(ComponentType::Blocks));
        assert_eq!(ids(&page), vec!["hero-section"]);

        let mut renamed = created.clone();
        renamed.metadata.name = "Hero Banner".to_string();
        assert!(store.update_component("hero-section", &renamed, true, None));

        let page = store.load_components(1, 12, TypeFilter::Only(ComponentType::Blocks));
        assert_eq!(ids(&page), vec!["hero-banner"]);
        assert!(!store.root().join("blocks/hero-section").exists());
        assert!(store.find_component("hero-section").is_none());
        assert_eq!(
            store.find_component("hero-banner").unwrap().metadata.name,
            "Hero Banner"
        );
    }

    #[test]
    fn test_update_in_place_keeps_folder() {
        let (_dir, store) = store();
        let original = block("Pricing");
        store.try_create(&original, None).unwrap();

        let mut edited = original.clone();
        edited.html = "<table></table>".to_string();
        edited.metadata.tags = vec!["pricing".to_string()];
        assert!(store.update_component("pricing", &edited, false, None));

        let loaded = store.find_component("pricing").unwrap();
        assert_eq!(loaded.html, "<table></table>");
        assert_eq!(loaded.metadata.tags, vec!["pricing"]);
        assert_eq!(loaded.folder, "pricing");
    }

    #[test]
    fn test_update_missing_id_fails() {
        let (_dir, store) = store();
        assert!(!store.update_component("ghost", &block("Ghost"), false, None));
        assert!(matches!(
            store.try_update("ghost", &block("Ghost"), true, None),
            Err(StoreError::NotFound(_))
        ));
        assert!(!store.root().join("blocks/ghost").exists());
    }

    #[test]
    fn test_rename_onto_existing_slug_overwrites() {
        let (_dir, store) = store();
        store.try_create(&block("Footer"), None).unwrap();
        store.try_create(&block("Footer Dark"), None).unwrap();

        let mut renamed = block("Footer Dark");
        renamed.metadata.name = "Footer".to_string();
        renamed.html = "<footer>merged</footer>".to_string();
        assert!(store.update_component("footer-dark", &renamed, true, None));

        let all = store.load_all_components();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].metadata.id, "footer");
        assert_eq!(all[0].html, "<footer>merged</footer>");
    }

    #[test]
    fn test_type_change_moves_directory() {
        let (_dir, store) = store();
        store.try_create(&block("Landing"), None).unwrap();

        let mut moved = block("Landing");
        moved.kind = ComponentType::Templates;
        assert!(store.update_component("landing", &moved, false, None));

        assert!(!store.root().join("blocks/landing").exists());
        assert_eq!(
            store.find_component("landing").unwrap().kind,
            ComponentType::Templates
        );
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = store();
        store.try_create(&block("Navbar"), None).unwrap();

        assert!(store.delete_component("navbar"));
        assert!(store.find_component("navbar").is_none());
        assert!(!store.root().join("blocks/navbar").exists());
    }

    #[test]
    fn test_delete_missing_id_has_no_side_effects() {
        let (_dir, store) = store();
        store.try_create(&block("Navbar"), None).unwrap();

        assert!(!store.delete_component("does-not-exist"));
        assert_eq!(store.load_all_components().len(), 1);
        assert!(!store.root().join("templates").exists());
    }

    #[test]
    fn test_same_slug_second_create_overwrites_first() {
        let (_dir, store) = store();
        let mut first = block("Hero Section");
        first.html = "<p>first</p>".to_string();
        let mut second = block("hero   section");
        second.html = "<p>second</p>".to_string();
        second.metadata.author = "B".to_string();

        assert!(store.create_component(&first, None));
        assert!(store.create_component(&second, None));

        let all = store.load_all_components();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].html, "<p>second</p>");
        assert_eq!(all[0].metadata.author, "B");
    }

    #[test]
    fn test_load_creates_missing_type_dirs() {
        let (_dir, store) = store();
        let page = store.load_components(1, 12, TypeFilter::All);
        assert!(page.data.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(store.root().join("blocks").is_dir());
        assert!(store.root().join("templates").is_dir());
    }

    #[test]
    fn test_incomplete_and_malformed_entries_skipped() {
        let (_dir, store) = store();
        store.try_create(&block("Good"), None).unwrap();

        let no_html = store.root().join("blocks/no-html");
        fs::create_dir_all(&no_html).unwrap();
        fs::write(no_html.join(METADATA_FILE), r#"{"id":"no-html","name":"x"}"#).unwrap();

        let broken = store.root().join("blocks/broken");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(METADATA_FILE), "{ not json").unwrap();
        fs::write(broken.join(HTML_FILE), "<p></p>").unwrap();

        fs::write(store.root().join("blocks/stray.txt"), "ignored").unwrap();

        let all = store.load_all_components();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].metadata.id, "good");
    }

    #[test]
    fn test_listing_is_sorted_and_paginated() {
        let (_dir, store) = store();
        for name in ["Zeta", "Alpha", "Mid"] {
            store.try_create(&block(name), None).unwrap();
        }
        let mut template = block("Base");
        template.kind = ComponentType::Templates;
        store.try_create(&template, None).unwrap();

        let first = store.load_components(1, 2, TypeFilter::All);
        assert_eq!(ids(&first), vec!["alpha", "mid"]);
        assert_eq!(first.total_items, 4);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next_page);

        let second = store.load_components(2, 2, TypeFilter::All);
        assert_eq!(ids(&second), vec!["zeta", "base"]);

        let templates = store.load_components(1, 12, TypeFilter::Only(ComponentType::Templates));
        assert_eq!(ids(&templates), vec!["base"]);
    }

    #[test]
    fn test_page_is_clamped() {
        let (_dir, store) = store();
        for name in ["One", "Two", "Three"] {
            store.try_create(&block(name), None).unwrap();
        }

        let past_end = store.load_components(7, 2, TypeFilter::All);
        assert_eq!(past_end.current_page, 2);
        assert_eq!(past_end.data.len(), 1);

        let zero = store.load_components(0, 2, TypeFilter::All);
        assert_eq!(zero.current_page, 1);
        assert_eq!(zero.data.len(), 2);
    }

    #[test]
    fn test_screenshot_written_and_bad_one_ignored() {
        let (_dir, store) = store();
        let png = [0x89, b'P', b'N', b'G'];
        let data_url = encode_png_data_url(&png);

        assert!(store.create_component(&block("Card"), Some(&data_url)));
        let preview = store.preview_path("card").unwrap();
        assert_eq!(fs::read(preview).unwrap(), png);

        assert!(store.create_component(&block("Plain"), Some("data:image/png;base64,%%%")));
        assert!(store.find_component("plain").is_some());
        assert!(store.preview_path("plain").is_none());
    }

    #[test]
    fn test_rename_carries_preview() {
        let (_dir, store) = store();
        let data_url = encode_png_data_url(&[1, 2, 3]);
        store.try_create(&block("Card"), Some(&data_url)).unwrap();

        let mut renamed = block("Card");
        renamed.metadata.name = "Card Large".to_string();
        store.try_update("card", &renamed, true, None).unwrap();

        assert_eq!(
            fs::read(store.preview_path("card-large").unwrap()).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_create_rejects_unsafe_folder() {
        let (_dir, store) = store();
        let mut component = block("Evil");
        component.folder = "../../outside".to_string();

        assert!(!store.create_component(&component, None));
        assert!(matches!(
            store.try_create(&component, None),
            Err(StoreError::InvalidFolder(_))
        ));
    }

    #[test]
    fn test_legacy_categories_key_is_read() {
        let (_dir, store) = store();
        let dir = store.root().join("templates/legacy");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(METADATA_FILE),
            r#"{"id":"legacy","name":"Legacy","categories":["old"],"author":"C"}"#,
        )
        .unwrap();
        fs::write(dir.join(HTML_FILE), "<main></main>").unwrap();

        let legacy = store.find_component("legacy").unwrap();
        assert_eq!(legacy.metadata.tags, vec!["old"]);
        assert_eq!(legacy.kind, ComponentType::Templates);
    }
}
