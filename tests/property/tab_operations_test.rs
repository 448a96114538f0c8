//! Property-based tests for Tab Manager operations.
//!
//! For any sequence of operations, a non-empty collection has exactly one
//! active tab, the durable copy matches memory, and reordering only moves
//! tabs around.

use std::sync::{Arc, Mutex};

use prism::managers::tab_manager::{TabManager, TabManagerTrait, TabStore};
use prism::types::tab::{Tab, TabPatch};
use proptest::prelude::*;

#[derive(Default)]
struct MemoryStore {
    tabs: Mutex<Vec<Tab>>,
}

impl TabStore for MemoryStore {
    fn load_tabs(&self) -> Vec<Tab> {
        self.tabs.lock().unwrap().clone()
    }

    fn save_tabs(&self, tabs: &[Tab]) {
        *self.tabs.lock().unwrap() = tabs.to_vec();
    }
}

/// Operations that can be performed on the TabManager. Indices pick a tab
/// modulo the current count; `Unknown` variants use an id that never exists.
#[derive(Debug, Clone)]
enum TabOp {
    Add,
    Close(usize),
    CloseUnknown,
    Activate(usize),
    ActivateUnknown,
    UpdateTitle(usize, String),
    UpdateActive(usize, bool),
    Duplicate(usize),
    Reorder(usize, usize),
}

fn arb_tab_ops() -> impl Strategy<Value = Vec<TabOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(TabOp::Add),
            2 => (0..20usize).prop_map(TabOp::Close),
            1 => Just(TabOp::CloseUnknown),
            2 => (0..20usize).prop_map(TabOp::Activate),
            1 => Just(TabOp::ActivateUnknown),
            1 => (0..20usize, "[a-zA-Z ]{0,30}").prop_map(|(i, t)| TabOp::UpdateTitle(i, t)),
            1 => (0..20usize, any::<bool>()).prop_map(|(i, a)| TabOp::UpdateActive(i, a)),
            1 => (0..20usize).prop_map(TabOp::Duplicate),
            2 => (0..25usize, 0..25usize).prop_map(|(f, t)| TabOp::Reorder(f, t)),
        ],
        1..60,
    )
}

fn id_at(manager: &TabManager, idx: usize) -> String {
    let tabs = manager.get_all_tabs();
    tabs[idx % tabs.len()].id.clone()
}

fn apply(manager: &mut TabManager, op: &TabOp) {
    match op {
        TabOp::Add => {
            manager.add_tab(None);
        }
        TabOp::Close(i) => {
            let id = id_at(manager, *i);
            manager.close_tab(&id);
        }
        TabOp::CloseUnknown => {
            manager.close_tab("no-such-tab");
        }
        TabOp::Activate(i) => {
            let id = id_at(manager, *i);
            manager.set_active(&id);
        }
        TabOp::ActivateUnknown => {
            manager.set_active("no-such-tab");
        }
        TabOp::UpdateTitle(i, title) => {
            let id = id_at(manager, *i);
            manager.update_tab(&id, TabPatch::title(title));
        }
        TabOp::UpdateActive(i, active) => {
            let id = id_at(manager, *i);
            let patch = TabPatch {
                active: Some(*active),
                ..TabPatch::default()
            };
            manager.update_tab(&id, patch);
        }
        TabOp::Duplicate(i) => {
            let id = id_at(manager, *i);
            manager.duplicate_tab(&id);
        }
        TabOp::Reorder(from, to) => {
            manager.reorder_tabs(*from, *to);
        }
    }
}

fn sorted_ids(tabs: &[Tab]) -> Vec<String> {
    let mut ids: Vec<String> = tabs.iter().map(|t| t.id.clone()).collect();
    ids.sort();
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exactly_one_active_tab_after_every_operation(ops in arb_tab_ops()) {
        let store = Arc::new(MemoryStore::default());
        let mut manager = TabManager::new(store.clone());
        manager.load();

        for op in &ops {
            apply(&mut manager, op);

            let active = manager.get_all_tabs().iter().filter(|t| t.active).count();
            prop_assert!(manager.tab_count() >= 1, "collection empty after {:?}", op);
            prop_assert_eq!(active, 1, "after {:?}: {} active tabs", op, active);
            prop_assert_eq!(
                manager.get_active_tab().map(|t| t.id.clone()),
                manager.snapshot().active_id
            );
        }
    }

    #[test]
    fn store_mirrors_memory_after_mutations(ops in arb_tab_ops()) {
        let store = Arc::new(MemoryStore::default());
        let mut manager = TabManager::new(store.clone());
        manager.load();
        manager.add_tab(None);

        for op in &ops {
            apply(&mut manager, op);
        }
        prop_assert_eq!(store.load_tabs(), manager.get_all_tabs().to_vec());
    }

    #[test]
    fn reorder_preserves_tabs_and_active_flag(
        count in 1..12usize,
        active in 0..12usize,
        from in 0..15usize,
        to in 0..15usize,
    ) {
        let store = Arc::new(MemoryStore::default());
        let mut manager = TabManager::new(store);
        manager.load();
        for _ in 1..count {
            manager.add_tab(None);
        }
        let active_id = id_at(&manager, active);
        manager.set_active(&active_id);
        let before = manager.get_all_tabs().to_vec();

        let moved = manager.reorder_tabs(from, to);
        let after = manager.get_all_tabs();

        prop_assert_eq!(moved, from < count);
        prop_assert_eq!(sorted_ids(&before), sorted_ids(after));
        prop_assert_eq!(manager.get_active_tab().map(|t| t.id.clone()), Some(active_id));
        if moved {
            let target = to.min(count - 1);
            prop_assert_eq!(&after[target].id, &before[from].id);
        } else {
            prop_assert_eq!(before.as_slice(), after);
        }
    }
}
