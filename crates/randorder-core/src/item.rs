//! Capability interface that runner items implement to be reorderable.
//!
//! The ordering core never looks inside a test. It only reads the
//! structural accessors below; the integration layer adapts its native
//! item type to this trait (see [`crate::node::NodeItem`] for the node-id
//! adapter used by the CLI).

use serde::{Deserialize, Serialize};

/// A structural scope enclosing an item: a class, a module file, or a
/// package directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scope {
    /// Unique id of the scope within a run (e.g. `tests/test_a.py::TestX`).
    pub id: String,
    /// Short display name (e.g. `TestX`).
    pub name: String,
}

impl Scope {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Closest `random_order` marker applying to an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMarker {
    pub disabled: bool,
}

impl OrderMarker {
    pub const DISABLED: OrderMarker = OrderMarker { disabled: true };
}

pub trait TestItem {
    /// Unique identity of the item. The integrity guard compares these.
    fn node_id(&self) -> &str;

    /// File path the item was collected from.
    fn location(&self) -> &str;

    /// Dotted module name, when the runner knows it.
    fn module(&self) -> Option<&str> {
        None
    }

    /// Package the module belongs to, when the runner knows it.
    fn package(&self) -> Option<&str> {
        None
    }

    /// Enclosing class name, if the item is a method.
    fn class(&self) -> Option<&str> {
        None
    }

    /// Enclosing scopes, nearest first.
    fn ancestors(&self) -> &[Scope] {
        &[]
    }

    fn order_marker(&self) -> Option<OrderMarker> {
        None
    }

    fn parent(&self) -> Option<&Scope> {
        self.ancestors().first()
    }

    fn grandparent(&self) -> Option<&Scope> {
        self.ancestors().get(1)
    }
}
