//! Persisted dashboard sidebar state.
//!
//! A saved preference always wins. Without one the sidebar starts closed on
//! narrow viewports. Every change, including an automatic collapse, is written
//! back to the store.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Viewports narrower than this start with the sidebar closed.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

/// Where the open/closed preference is kept between sessions.
pub trait SidebarStore {
    /// The saved preference, or `None` when nothing usable is stored.
    fn load(&self) -> Option<bool>;

    fn save(&mut self, open: bool) -> Result<()>;
}

/// Stores the preference as a JSON boolean in a file.
#[derive(Debug, Clone)]
pub struct FileSidebarStore {
    path: PathBuf,
}

impl FileSidebarStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `sidebar.json` under the user's config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quickcrate").join("sidebar.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SidebarStore for FileSidebarStore {
    fn load(&self) -> Option<bool> {
        let bytes = fs::read(&self.path).ok()?;
        match serde_json::from_slice::<bool>(&bytes) {
            Ok(open) => Some(open),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable sidebar state");
                None
            }
        }
    }

    fn save(&mut self, open: bool) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("create sidebar state dir")?;
        }
        let text = serde_json::to_string(&open).context("serialize sidebar state")?;
        fs::write(&self.path, text.as_bytes())
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

/// In-process store, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySidebarStore {
    value: Option<bool>,
}

impl MemorySidebarStore {
    pub fn new(value: Option<bool>) -> Self {
        Self { value }
    }
}

impl SidebarStore for MemorySidebarStore {
    fn load(&self) -> Option<bool> {
        self.value
    }

    fn save(&mut self, open: bool) -> Result<()> {
        self.value = Some(open);
        Ok(())
    }
}

#[derive(Debug)]
pub struct SidebarState<S: SidebarStore> {
    open: bool,
    store: S,
}

impl<S: SidebarStore> SidebarState<S> {
    /// The saved preference, or open unless the viewport is below the breakpoint.
    pub fn restore(store: S, viewport_width: u32) -> Self {
        let open = store
            .load()
            .unwrap_or(viewport_width >= MOBILE_BREAKPOINT_PX);
        Self { open, store }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn toggle(&mut self) -> Result<()> {
        self.set(!self.open)
    }

    pub fn open(&mut self) -> Result<()> {
        self.set(true)
    }

    pub fn close(&mut self) -> Result<()> {
        self.set(false)
    }

    /// Collapse when the viewport shrinks below the breakpoint.
    pub fn on_resize(&mut self, viewport_width: u32) -> Result<()> {
        if viewport_width < MOBILE_BREAKPOINT_PX && self.open {
            tracing::debug!(viewport_width, "collapsing sidebar for narrow viewport");
            return self.set(false);
        }
        Ok(())
    }

    fn set(&mut self, open: bool) -> Result<()> {
        self.open = open;
        self.store.save(open)
    }
}
