use std::sync::Arc;

use tracing::{debug, warn};

use crate::types::tab::{Tab, TabPatch, TabsSnapshot, DEFAULT_TAB_URL};

/// Durable copy of the tab collection.
///
/// `save_tabs` is fire-and-forget: implementations log their own failures
/// and the manager never rolls back in-memory state.
pub trait TabStore {
    fn load_tabs(&self) -> Vec<Tab>;
    fn save_tabs(&self, tabs: &[Tab]);
}

/// Receives a snapshot after every completed mutation.
pub trait TabObserver {
    fn on_tabs_changed(&self, snapshot: &TabsSnapshot);
}

impl<F: Fn(&TabsSnapshot)> TabObserver for F {
    fn on_tabs_changed(&self, snapshot: &TabsSnapshot) {
        self(snapshot)
    }
}

/// Trait defining the tab management interface.
///
/// Operations on an unknown id return `false` and leave state untouched.
pub trait TabManagerTrait {
    fn load(&mut self);
    fn add_tab(&mut self, url: Option<&str>) -> String;
    fn close_tab(&mut self, tab_id: &str) -> bool;
    fn set_active(&mut self, tab_id: &str) -> bool;
    fn update_tab(&mut self, tab_id: &str, patch: TabPatch) -> bool;
    fn duplicate_tab(&mut self, tab_id: &str) -> Option<String>;
    fn reorder_tabs(&mut self, from_index: usize, to_index: usize) -> bool;
    fn get_tab(&self, tab_id: &str) -> Option<&Tab>;
    fn get_all_tabs(&self) -> &[Tab];
    fn get_active_tab(&self) -> Option<&Tab>;
    fn tab_count(&self) -> usize;
    fn snapshot(&self) -> TabsSnapshot;
}

/// Owner of the ordered tab collection.
///
/// Order is tab strip order. The active tab is derived from the `active`
/// flags; after every mutation a non-empty collection has exactly one.
pub struct TabManager {
    tabs: Vec<Tab>,
    store: Arc<dyn TabStore>,
    observers: Vec<Box<dyn TabObserver>>,
    default_url: String,
}

impl TabManager {
    pub fn new(store: Arc<dyn TabStore>) -> Self {
        Self {
            tabs: Vec::new(),
            store,
            observers: Vec::new(),
            default_url: DEFAULT_TAB_URL.to_string(),
        }
    }

    /// Overrides the URL used for new and synthesized tabs.
    pub fn with_default_url(mut self, url: &str) -> Self {
        self.default_url = url.to_string();
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn TabObserver>) {
        self.observers.push(observer);
    }

    fn find_tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn activate_index(&mut self, index: usize) {
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.active = i == index;
        }
    }

    fn deactivate_all(&mut self) {
        for tab in &mut self.tabs {
            tab.active = false;
        }
    }

    /// Restores the one-active-tab invariant on externally supplied tabs.
    /// No active tab: the last one is activated. Several: the first wins.
    fn repair_active(&mut self) {
        let active: Vec<usize> = self
            .tabs
            .iter()
            .enumerate()
            .filter(|(_, t)| t.active)
            .map(|(i, _)| i)
            .collect();
        match active.as_slice() {
            [_] => {}
            [] => {
                warn!("persisted tabs had no active tab; activating the last one");
                let last = self.tabs.len() - 1;
                self.activate_index(last);
            }
            [first, ..] => {
                warn!(count = active.len(), "persisted tabs had several active tabs");
                let first = *first;
                self.activate_index(first);
            }
        }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer.on_tabs_changed(&snapshot);
        }
    }

    /// Persist the full collection and broadcast it.
    fn commit(&self) {
        self.store.save_tabs(&self.tabs);
        self.notify();
    }
}

impl TabManagerTrait for TabManager {
    /// Replace the working state with the persisted tabs, or one default tab
    /// if nothing was persisted. Does not write back.
    fn load(&mut self) {
        let tabs = self.store.load_tabs();
        if tabs.is_empty() {
            self.tabs = vec![Tab::new(&self.default_url)];
        } else {
            self.tabs = tabs;
            self.repair_active();
        }
        debug!(count = self.tabs.len(), "tabs loaded");
        self.notify();
    }

    /// Append a new active tab and deactivate every other tab.
    /// Returns the new tab's ID.
    fn add_tab(&mut self, url: Option<&str>) -> String {
        let tab = Tab::new(url.unwrap_or(&self.default_url));
        let id = tab.id.clone();
        self.deactivate_all();
        self.tabs.push(tab);
        debug!(tab_id = %id, "tab added");
        self.commit();
        id
    }

    /// Close a tab. If it was active, the last remaining tab becomes active.
    /// Closing the only tab leaves a fresh default tab behind.
    fn close_tab(&mut self, tab_id: &str) -> bool {
        let Some(index) = self.find_tab_index(tab_id) else {
            return false;
        };
        self.tabs.remove(index);

        if self.tabs.is_empty() {
            self.tabs.push(Tab::new(&self.default_url));
        } else if !self.tabs.iter().any(|t| t.active) {
            let last = self.tabs.len() - 1;
            self.activate_index(last);
        }

        debug!(tab_id, remaining = self.tabs.len(), "tab closed");
        self.commit();
        true
    }

    fn set_active(&mut self, tab_id: &str) -> bool {
        let Some(index) = self.find_tab_index(tab_id) else {
            return false;
        };
        self.activate_index(index);
        self.commit();
        true
    }

    /// Merge navigation-driven fields into a tab.
    ///
    /// `active: Some(true)` activates the tab exclusively; `active: Some(false)`
    /// is ignored because it could leave no tab active.
    fn update_tab(&mut self, tab_id: &str, patch: TabPatch) -> bool {
        let Some(index) = self.find_tab_index(tab_id) else {
            return false;
        };

        let tab = &mut self.tabs[index];
        if let Some(url) = patch.url {
            tab.url = url;
        }
        if let Some(title) = patch.title {
            tab.title = title;
        }
        if let Some(favicon) = patch.favicon {
            tab.favicon = favicon;
        }
        match patch.active {
            Some(true) => self.activate_index(index),
            Some(false) => debug!(tab_id, "ignoring request to deactivate a tab directly"),
            None => {}
        }

        self.commit();
        true
    }

    /// Duplicate a tab into a new active tab at the end of the strip.
    /// Returns the new tab's ID.
    fn duplicate_tab(&mut self, tab_id: &str) -> Option<String> {
        let source = self.get_tab(tab_id)?.clone();
        let mut copy = Tab::new(&source.url);
        copy.title = source.title;
        copy.favicon = source.favicon;
        let id = copy.id.clone();

        self.deactivate_all();
        self.tabs.push(copy);
        debug!(source = tab_id, tab_id = %id, "tab duplicated");
        self.commit();
        Some(id)
    }

    /// Move the tab at `from_index` to `to_index` (clamped to the end).
    /// Active flags are left as they are.
    fn reorder_tabs(&mut self, from_index: usize, to_index: usize) -> bool {
        if from_index >= self.tabs.len() {
            return false;
        }
        let tab = self.tabs.remove(from_index);
        let to_index = to_index.min(self.tabs.len());
        self.tabs.insert(to_index, tab);
        self.commit();
        true
    }

    fn get_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_all_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.active)
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn snapshot(&self) -> TabsSnapshot {
        TabsSnapshot {
            tabs: self.tabs.clone(),
            active_id: self.get_active_tab().map(|t| t.id.clone()),
        }
    }
}
