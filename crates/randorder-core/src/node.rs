//! [`TestItem`] adapter for runner node ids.
//!
//! A node id looks like `tests/unit/test_io.py::TestReader::test_eof[utf8]`:
//! the file path, any enclosing classes, then the test name. Everything the
//! bucket strategies need is derived from that string.

use std::collections::BTreeMap;

use crate::item::{OrderMarker, Scope, TestItem};

const SEP: &str = "::";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeItem {
    node_id: String,
    location: String,
    module: String,
    package: Option<String>,
    class: Option<String>,
    ancestors: Vec<Scope>,
    marker: Option<OrderMarker>,
}

impl NodeItem {
    pub fn parse(node_id: &str) -> Self {
        // `::` inside a parametrize suffix (`test_x[a::b]`) is not a separator.
        let path = node_id.find('[').map_or(node_id, |at| &node_id[..at]);
        let parts: Vec<&str> = path.split(SEP).collect();
        let location = parts[0].to_string();
        let module = module_name(&location);
        let package = module.rsplit_once('.').map(|(pkg, _)| pkg.to_string());
        // Segments between the file and the test name are classes.
        let classes: &[&str] = if parts.len() > 2 { &parts[1..parts.len() - 1] } else { &[] };

        let mut ancestors = Vec::new();
        for depth in (1..=classes.len()).rev() {
            ancestors.push(Scope::new(parts[..=depth].join(SEP), parts[depth]));
        }
        let file_name = location.rsplit('/').next().unwrap_or(&location);
        ancestors.push(Scope::new(location.clone(), file_name));
        let mut dir = location.as_str();
        while let Some((parent, _)) = dir.rsplit_once('/') {
            let name = parent.rsplit('/').next().unwrap_or(parent);
            ancestors.push(Scope::new(parent, name));
            dir = parent;
        }

        Self {
            node_id: node_id.to_string(),
            location,
            module,
            package,
            class: classes.last().map(|c| (*c).to_string()),
            ancestors,
            marker: None,
        }
    }

    pub fn set_marker(&mut self, marker: Option<OrderMarker>) {
        self.marker = marker;
    }
}

fn module_name(location: &str) -> String {
    let stem = location
        .rsplit_once('.')
        .filter(|(_, ext)| !ext.contains('/'))
        .map_or(location, |(stem, _)| stem);
    stem.trim_start_matches("./").replace('/', ".")
}

impl TestItem for NodeItem {
    fn node_id(&self) -> &str {
        &self.node_id
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn module(&self) -> Option<&str> {
        Some(&self.module)
    }

    fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    fn ancestors(&self) -> &[Scope] {
        &self.ancestors
    }

    fn order_marker(&self) -> Option<OrderMarker> {
        self.marker
    }
}

/// `random_order` markers applied to scopes (or single items) by id.
#[derive(Debug, Clone, Default)]
pub struct MarkerTable {
    markers: BTreeMap<String, OrderMarker>,
}

impl MarkerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, scope_id: impl Into<String>, marker: OrderMarker) {
        self.markers.insert(scope_id.into(), marker);
    }

    pub fn disable(&mut self, scope_id: impl Into<String>) {
        self.mark(scope_id, OrderMarker::DISABLED);
    }

    /// Marker on the item itself, else on the nearest enclosing scope.
    pub fn closest(&self, item: &dyn TestItem) -> Option<OrderMarker> {
        std::iter::once(item.node_id())
            .chain(item.ancestors().iter().map(|scope| scope.id.as_str()))
            .find_map(|id| self.markers.get(id).copied())
    }

    pub fn apply(&self, items: &mut [NodeItem]) {
        for item in items {
            let marker = self.closest(&*item);
            item.set_marker(marker);
        }
    }
}
