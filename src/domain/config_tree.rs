// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable configuration snapshots and dotted-path lookup.

use crate::domain::config_path::ConfigPath;
use crate::domain::raw_value::{Mapping, RawValue};

/// One fully parsed configuration snapshot.
///
/// A tree always has a mapping at its root. It is never mutated after
/// construction; a reload builds a new tree and swaps it in whole.
///
/// # Path resolution
///
/// 1. A root key equal to the full, unsplit path wins. This lets keys that
///    contain literal dots be addressed directly.
/// 2. The empty path resolves to the root mapping itself.
/// 3. Otherwise the path is split on `.` and each segment is looked up in the
///    mapping reached so far. A missing segment, or a non-mapping value with
///    segments still remaining, resolves to `None`.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::{ConfigTree, Mapping, RawValue};
///
/// let inner = Mapping::from([("c".to_string(), RawValue::Int(5))]);
/// let b = Mapping::from([("b".to_string(), RawValue::Mapping(inner))]);
/// let tree = ConfigTree::from_mapping(Mapping::from([("a".to_string(), RawValue::Mapping(b))]));
///
/// assert_eq!(tree.get("a.b.c"), Some(&RawValue::Int(5)));
/// assert_eq!(tree.get("a.b.c.d"), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigTree {
    root: RawValue,
}

impl ConfigTree {
    /// Creates a tree with an empty root mapping.
    pub fn empty() -> Self {
        Self::from_mapping(Mapping::new())
    }

    /// Creates a tree from an already string-keyed root mapping.
    pub fn from_mapping(root: Mapping) -> Self {
        ConfigTree {
            root: RawValue::Mapping(root),
        }
    }

    /// Returns the root mapping.
    pub fn root(&self) -> &Mapping {
        match &self.root {
            RawValue::Mapping(map) => map,
            _ => empty_mapping(),
        }
    }

    /// Returns the root as a value, suitable for serialization.
    pub fn root_value(&self) -> &RawValue {
        &self.root
    }

    /// Returns `true` if the root mapping holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root().is_empty()
    }

    /// Resolves a dotted path to the value stored there.
    pub fn get(&self, path: &str) -> Option<&RawValue> {
        if let Some(value) = self.root().get(path) {
            return Some(value);
        }

        let path = ConfigPath::from(path);
        if path.is_root() {
            return Some(&self.root);
        }

        let mut current = &self.root;
        for segment in path.segments() {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// Resolves a path given as a [`ConfigPath`].
    pub fn get_path(&self, path: &ConfigPath) -> Option<&RawValue> {
        self.get(path.as_str())
    }

    /// Returns `true` if the path resolves to any value.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        ConfigTree::empty()
    }
}

impl From<Mapping> for ConfigTree {
    fn from(root: Mapping) -> Self {
        ConfigTree::from_mapping(root)
    }
}

fn empty_mapping() -> &'static Mapping {
    static EMPTY: Mapping = Mapping::new();
    &EMPTY
}
