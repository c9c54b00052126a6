#![forbid(unsafe_code)]

//! Icon images and the name-to-image registry.

use rustc_hash::FxHashMap;

/// Opaque identity of a registered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconId(pub u32);

/// A decoded image ready to be drawn, with its logical size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Icon {
    pub id: IconId,
    pub width: f64,
    pub height: f64,
}

impl Icon {
    #[must_use]
    pub const fn new(id: IconId, width: f64, height: f64) -> Self {
        Self { id, width, height }
    }

    /// Zero-sized images are never drawn.
    #[inline]
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// `Some(self)` when drawable.
    #[inline]
    #[must_use]
    pub fn drawable(self) -> Option<Self> {
        self.is_drawable().then_some(self)
    }
}

/// Which icon slot of a cell an icon occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconRole {
    Left,
    Center,
    Right,
}

/// Named icon images.
#[derive(Debug, Default, Clone)]
pub struct IconRegistry {
    by_name: FxHashMap<String, Icon>,
    next_id: u32,
}

impl IconRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an image under `name`.
    pub fn register(&mut self, name: impl Into<String>, width: f64, height: f64) -> Icon {
        let icon = Icon::new(IconId(self.next_id), width, height);
        self.next_id += 1;
        self.by_name.insert(name.into(), icon);
        icon
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Icon> {
        self.by_name.get(name).copied()
    }

    /// Resolve an optional name to a drawable icon. Unknown names and
    /// zero-sized images resolve to `None`.
    #[must_use]
    pub fn lookup(&self, name: Option<&str>) -> Option<Icon> {
        name.and_then(|n| self.get(n)).and_then(Icon::drawable)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_distinct_ids() {
        let mut reg = IconRegistry::new();
        let a = reg.register("checked", 16.0, 16.0);
        let b = reg.register("unchecked", 16.0, 16.0);
        assert_ne!(a.id, b.id);
        assert_eq!(reg.get("checked"), Some(a));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn lookup_filters_unknown_and_empty() {
        let mut reg = IconRegistry::new();
        reg.register("blank", 0.0, 12.0);
        let up = reg.register("up-arrow", 9.0, 6.0);
        assert_eq!(reg.lookup(Some("up-arrow")), Some(up));
        assert_eq!(reg.lookup(Some("blank")), None);
        assert_eq!(reg.lookup(Some("missing")), None);
        assert_eq!(reg.lookup(None), None);
    }
}
