//! Deep-merge for partial document updates.
//!
//! Plain objects merge recursively; everything else (scalars, nulls,
//! and notably arrays) replaces the base value wholesale. Array
//! mutations (pets, schedules, inventory) go through read-then-splice
//! in the manager, never element-wise merging. This asymmetry is the
//! contract every mutation path relies on.

use serde_json::Value;

/// Merge `patch` into `base` in place.
pub fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, patch_value),
                    None => {
                        base_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (base_slot, patch_value) => {
            *base_slot = patch_value.clone();
        }
    }
}

/// Merge `patch` over `base`, returning the result.
pub fn merged(base: &Value, patch: &Value) -> Value {
    let mut out = base.clone();
    deep_merge(&mut out, patch);
    out
}
