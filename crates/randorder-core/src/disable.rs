//! Opt-out resolution for the `random_order(disabled=True)` marker.

use crate::error::{OrderError, OrderResult};
use crate::item::TestItem;
use crate::shuffle::DisableKey;

pub type DisableResolver = fn(&dyn TestItem) -> OrderResult<Option<DisableKey>>;

/// `None` when the item may be shuffled. Otherwise the id of the item's
/// parent scope: an item only has an order inside its parent, and using the
/// scope id keeps two disabled classes in one module from merging into a
/// single bucket.
pub fn disable_key(item: &dyn TestItem) -> OrderResult<Option<DisableKey>> {
    match item.order_marker() {
        Some(marker) if marker.disabled => item
            .parent()
            .map(|scope| Some(scope.id.clone()))
            .ok_or_else(|| {
                OrderError::key_computation("disable", item.node_id(), "disabled item has no parent scope")
            }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{OrderMarker, Scope};

    struct Marked {
        marker: Option<OrderMarker>,
        ancestors: Vec<Scope>,
    }

    impl TestItem for Marked {
        fn node_id(&self) -> &str {
            "m.py::C::t"
        }
        fn location(&self) -> &str {
            "m.py"
        }
        fn ancestors(&self) -> &[Scope] {
            &self.ancestors
        }
        fn order_marker(&self) -> Option<OrderMarker> {
            self.marker
        }
    }

    #[test]
    fn unmarked_and_enabled_items_shuffle() {
        let scopes = vec![Scope::new("m.py::C", "C")];
        for marker in [None, Some(OrderMarker { disabled: false })] {
            let item = Marked {
                marker,
                ancestors: scopes.clone(),
            };
            assert_eq!(disable_key(&item).unwrap(), None);
        }
    }

    #[test]
    fn disabled_item_keys_on_parent_id() {
        let item = Marked {
            marker: Some(OrderMarker::DISABLED),
            ancestors: vec![Scope::new("m.py::C", "C"), Scope::new("m.py", "m.py")],
        };
        assert_eq!(disable_key(&item).unwrap(), Some("m.py::C".to_string()));
    }

    #[test]
    fn disabled_orphan_is_an_error() {
        let item = Marked {
            marker: Some(OrderMarker::DISABLED),
            ancestors: vec![],
        };
        assert!(matches!(
            disable_key(&item),
            Err(OrderError::KeyComputation { what: "disable", .. })
        ));
    }
}
