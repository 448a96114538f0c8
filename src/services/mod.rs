// Prism services
// Services provide settings, theming and ad blocking on top of the store.

pub mod privacy_engine;
pub mod settings_engine;
pub mod theme_engine;

use serde_json::Value;

/// Recursively merges `patch` into `target`. Objects merge key by key; any
/// other value in `patch` replaces the one in `target`.
pub(crate) fn merge_json(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}
