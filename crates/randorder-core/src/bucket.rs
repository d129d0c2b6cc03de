//! Bucket types and the registry mapping each type to its key function.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OrderError, OrderResult};
use crate::item::TestItem;
use crate::session::RunSession;
use crate::shuffle::BucketId;

/// Limit on how far items may travel when reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum BucketType {
    /// Shuffle across the whole run.
    Global,
    /// Keep items within their package.
    Package,
    /// Keep items within their module (file).
    #[default]
    Module,
    /// Keep items within their class (or module for free functions).
    Class,
    /// Keep items within their direct parent scope.
    Parent,
    /// Keep items within their grandparent scope.
    Grandparent,
    /// Do not reorder at all.
    None,
}

impl BucketType {
    pub const ALL: [BucketType; 7] = [
        Self::Global,
        Self::Package,
        Self::Module,
        Self::Class,
        Self::Parent,
        Self::Grandparent,
        Self::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Package => "package",
            Self::Module => "module",
            Self::Class => "class",
            Self::Parent => "parent",
            Self::Grandparent => "grandparent",
            Self::None => "none",
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for BucketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketType {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                OrderError::strategy(format!(
                    "unknown bucket type '{s}' (expected one of: {})",
                    names.join(", ")
                ))
            })
    }
}

/// Group an item belongs to under the selected bucket type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey {
    Global,
    Package(String),
    Module(String),
    Class { module: String, class: Option<String> },
    Scope(String),
    /// Reserved bucket for previously failed items; pinned to the front.
    Pinned,
}

impl BucketId for BucketKey {
    fn is_pinned(&self) -> bool {
        matches!(self, Self::Pinned)
    }
}

pub type StrategyFn = fn(&dyn TestItem) -> OrderResult<BucketKey>;

fn global_key(_item: &dyn TestItem) -> OrderResult<BucketKey> {
    Ok(BucketKey::Global)
}

fn package_key(item: &dyn TestItem) -> OrderResult<BucketKey> {
    let package = match item.package() {
        Some(p) => p.to_string(),
        None => item
            .location()
            .rsplit_once('/')
            .map(|(dir, _)| dir.to_string())
            .unwrap_or_default(),
    };
    Ok(BucketKey::Package(package))
}

fn module_key(item: &dyn TestItem) -> OrderResult<BucketKey> {
    Ok(BucketKey::Module(item.location().to_string()))
}

fn class_key(item: &dyn TestItem) -> OrderResult<BucketKey> {
    let module = item.module().unwrap_or_else(|| item.location()).to_string();
    Ok(BucketKey::Class {
        module,
        class: item.class().map(str::to_string),
    })
}

fn parent_key(item: &dyn TestItem) -> OrderResult<BucketKey> {
    item.parent()
        .map(|scope| BucketKey::Scope(scope.id.clone()))
        .ok_or_else(|| OrderError::key_computation("parent", item.node_id(), "item has no parent scope"))
}

fn grandparent_key(item: &dyn TestItem) -> OrderResult<BucketKey> {
    item.grandparent()
        .map(|scope| BucketKey::Scope(scope.id.clone()))
        .ok_or_else(|| {
            OrderError::key_computation("grandparent", item.node_id(), "item has no grandparent scope")
        })
}

fn none_key(_item: &dyn TestItem) -> OrderResult<BucketKey> {
    Err(OrderError::strategy(
        "when shuffling is disabled (bucket type none), item keys must not be computed",
    ))
}

/// Explicit table of bucket key strategies.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: BTreeMap<BucketType, StrategyFn>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(BucketType::Global, global_key);
        registry.register(BucketType::Package, package_key);
        registry.register(BucketType::Module, module_key);
        registry.register(BucketType::Class, class_key);
        registry.register(BucketType::Parent, parent_key);
        registry.register(BucketType::Grandparent, grandparent_key);
        registry.register(BucketType::None, none_key);
        registry
    }

    /// Install or replace the key function for a bucket type.
    pub fn register(&mut self, bucket_type: BucketType, f: StrategyFn) -> Option<StrategyFn> {
        self.strategies.insert(bucket_type, f)
    }

    pub fn get(&self, bucket_type: BucketType) -> OrderResult<StrategyFn> {
        self.strategies
            .get(&bucket_type)
            .copied()
            .ok_or_else(|| OrderError::strategy(format!("no key function registered for '{bucket_type}'")))
    }

    pub fn bucket_types(&self) -> impl Iterator<Item = BucketType> + '_ {
        self.strategies.keys().copied()
    }

    /// Primary key for `item`, then every session hook in registration order.
    pub fn key_for(
        &self,
        bucket_type: BucketType,
        item: &dyn TestItem,
        session: Option<&RunSession>,
    ) -> OrderResult<BucketKey> {
        let key = (self.get(bucket_type)?)(item)?;
        Ok(match session {
            Some(session) => session.rewrite_key(item, key),
            None => key,
        })
    }
}
