//! Read-only lookup tables keyed by preset name.

/// A named bundle of presentation attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset<T> {
    pub name: &'static str,
    pub value: T,
}

/// Preset lookup with a guaranteed default entry.
///
/// Lookups never fail: a missing or unrecognized name yields the default.
#[derive(Debug, Clone)]
pub struct PresetTable<T> {
    /// Index 0 is always the default entry.
    entries: Vec<Preset<T>>,
}

impl<T> PresetTable<T> {
    pub fn new(default: Preset<T>, rest: impl IntoIterator<Item = Preset<T>>) -> Self {
        let default_name = default.name;
        let mut entries = vec![default];
        entries.extend(rest.into_iter().filter(|p| p.name != default_name));
        Self { entries }
    }

    /// Look up `name`, falling back to the default entry.
    pub fn lookup(&self, name: Option<&str>) -> &Preset<T> {
        name.and_then(|n| self.get(n))
            .unwrap_or_else(|| self.default_entry())
    }

    /// Exact lookup without fallback.
    pub fn get(&self, name: &str) -> Option<&Preset<T>> {
        self.entries.iter().find(|p| p.name == name)
    }

    pub fn default_entry(&self) -> &Preset<T> {
        &self.entries[0]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Preset names in definition order, default first.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|p| p.name).collect()
    }
}
