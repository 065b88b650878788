use ahash::AHashMap;

use crate::model::ElementId;

/// Per-container registry that keeps sibling display names pairwise distinct.
///
/// Every named entity registers under its identifier and receives back the name
/// that was actually assigned: the requested one when free, otherwise the
/// requested one with an incrementing numeric suffix. Registries are
/// per-container, never global.
#[derive(Debug, Clone, Default)]
pub struct UniqueNamer {
    names: AHashMap<ElementId, String>,
}

impl UniqueNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `base` for `id` and returns the assigned name, suffixed with
    /// a counter if `base` is already taken by another entity.
    pub fn add_name(&mut self, id: ElementId, base: &str) -> String {
        let assigned = self.disambiguate(base, Some(&id));
        self.names.insert(id, assigned.clone());
        assigned
    }

    /// Re-registers an already known `id` under `wanted`, collision-checked
    /// against every name except the entity's own previous one. Returns `None`
    /// when `id` was never registered.
    pub fn rename(&mut self, id: &ElementId, wanted: &str) -> Option<String> {
        if !self.names.contains_key(id) {
            return None;
        }
        let assigned = self.disambiguate(wanted, Some(id));
        self.names.insert(id.clone(), assigned.clone());
        Some(assigned)
    }

    /// Frees the name held by `id`, returning it if it was registered.
    pub fn remove_name(&mut self, id: &ElementId) -> Option<String> {
        self.names.remove(id)
    }

    pub fn get(&self, id: &ElementId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.names.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn taken(&self, name: &str, except: Option<&ElementId>) -> bool {
        self.names.iter().any(|(id, n)| n == name && Some(id) != except)
    }

    fn disambiguate(&self, base: &str, except: Option<&ElementId>) -> String {
        let base = base.trim_end();
        if !self.taken(base, except) {
            return base.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{base} {counter}");
            if !self.taken(&candidate, except) {
                return candidate;
            }
            counter += 1;
        }
    }
}
