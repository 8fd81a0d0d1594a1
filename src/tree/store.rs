use super::resolver::NameResolver;
use crate::errors::{ForestError, Result};
use crate::utils::atomic_file;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reference to a node either by raw slot index or by name.
///
/// Names may be external branch aliases; they go through the attached
/// [`NameResolver`] before being looked up among the slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    ByIndex(usize),
    ByName(String),
}

impl NodeRef {
    pub fn name<S: Into<String>>(name: S) -> Self {
        NodeRef::ByName(name.into())
    }
}

impl From<usize> for NodeRef {
    fn from(index: usize) -> Self {
        NodeRef::ByIndex(index)
    }
}

impl From<&str> for NodeRef {
    fn from(name: &str) -> Self {
        NodeRef::ByName(name.to_string())
    }
}

impl From<String> for NodeRef {
    fn from(name: String) -> Self {
        NodeRef::ByName(name)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::ByIndex(index) => write!(f, "#{index}"),
            NodeRef::ByName(name) => write!(f, "{name}"),
        }
    }
}

/// One slot of the forest. A slot without a name is free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Slot {
    name: Option<String>,
    /// `None` is the root sentinel
    parent: Option<usize>,
    /// Insertion order, which is also rebase order
    children: Vec<usize>,
}

/// On-disk layout of the tree file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedTree {
    /// Slot names by index, `null` for free slots
    pub node_names: Vec<Option<String>>,
    /// Parent-before-child `[parent, child]` pairs from a pre-order walk of every root
    pub edges: Vec<(usize, usize)>,
}

/// Persistent forest of stacked branches.
///
/// Nodes live in an arena of slots addressed by index. Every structural
/// mutation writes the whole forest back to the tree file before returning, so
/// the file is never behind memory by more than the mutation in flight.
#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    slots: Vec<Slot>,
    path: Option<PathBuf>,
    resolver: Option<NameResolver>,
}

impl TreeStore {
    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the tree file at `path`, bootstrapping it with a single trunk
    /// root when it does not exist yet
    pub fn open(path: &Path, trunk: &str) -> Result<Self> {
        if !path.exists() {
            let mut store = Self {
                path: Some(path.to_path_buf()),
                ..Self::default()
            };
            store.create_node(Some(trunk))?;
            debug!("Bootstrapped tree file {} with '{}'", path.display(), trunk);
        }
        Self::load(path)
    }

    /// Read a tree file written by [`TreeStore::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let persisted: PersistedTree = serde_json::from_str(&content)
            .map_err(|e| ForestError::corrupt(format!("{}: {e}", path.display())))?;

        let mut store = Self::from_persisted(persisted)?;
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    /// Rebuild a forest from its persisted form, replaying edges in file order
    pub fn from_persisted(persisted: PersistedTree) -> Result<Self> {
        let slots = persisted
            .node_names
            .into_iter()
            .map(|name| Slot {
                name,
                ..Slot::default()
            })
            .collect();
        let mut store = Self {
            slots,
            ..Self::default()
        };

        for &(parent, child) in &persisted.edges {
            store.check_replayable(parent, child)?;
            store.link(parent, child);
        }

        debug!(
            "Loaded {} slots and {} edges",
            store.slots.len(),
            persisted.edges.len()
        );
        Ok(store)
    }

    fn check_replayable(&self, parent: usize, child: usize) -> Result<()> {
        for index in [parent, child] {
            if !self.is_occupied(index) {
                return Err(ForestError::corrupt(format!(
                    "edge ({parent}, {child}) references free or missing slot {index}"
                )));
            }
        }
        if parent == child {
            return Err(ForestError::corrupt(format!("slot {child} is its own parent")));
        }
        if let Some(existing) = self.slots[child].parent {
            return Err(ForestError::corrupt(format!(
                "slot {child} appears under both {existing} and {parent}"
            )));
        }
        if !self.slots[child].children.is_empty() {
            return Err(ForestError::corrupt(format!(
                "edges below slot {child} were written before the edge from its parent {parent}"
            )));
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(ForestError::corrupt(format!(
                "edge ({parent}, {child}) closes a cycle"
            )));
        }
        Ok(())
    }

    /// Snapshot of the forest in its on-disk layout
    pub fn to_persisted(&self) -> PersistedTree {
        PersistedTree {
            node_names: self.slots.iter().map(|slot| slot.name.clone()).collect(),
            edges: self.all_edges(),
        }
    }

    /// Write the whole forest to the tree file; a no-op for in-memory stores
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        atomic_file::write_json(path, &self.to_persisted())
    }


    /// Attach the alias snapshot used to resolve names
    pub fn attach_resolver(&mut self, resolver: NameResolver) {
        self.resolver = Some(resolver);
    }

    pub fn resolver(&self) -> Option<&NameResolver> {
        self.resolver.as_ref()
    }

    pub fn resolver_mut(&mut self) -> Option<&mut NameResolver> {
        self.resolver.as_mut()
    }

    /// Create a node in the first free slot, or a new one at the end.
    ///
    /// Without a name the node is named after its own slot index.
    pub fn create_node(&mut self, name: Option<&str>) -> Result<usize> {
        if let Some(name) = name {
            if self.find_slot(name).is_some() {
                return Err(ForestError::duplicate(name));
            }
        }

        let index = self
            .slots
            .iter()
            .position(|slot| slot.name.is_none())
            .unwrap_or(self.slots.len());

        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string());
        if self.find_slot(&name).is_some() {
            // A default numeric name can still collide with an explicit one
            return Err(ForestError::duplicate(name));
        }
        if index == self.slots.len() {
            self.slots.push(Slot::default());
        }
        self.slots[index] = Slot {
            name: Some(name.clone()),
            parent: None,
            children: Vec::new(),
        };

        debug!("Created node '{}' in slot {}", name, index);
        self.save()?;
        Ok(index)
    }

    /// Rename an occupied slot
    pub fn set_node_name(&mut self, node: &NodeRef, name: &str) -> Result<()> {
        let index = self.index_of(node)?;
        if let Some(other) = self.find_slot(name) {
            if other != index {
                return Err(ForestError::duplicate(name));
            }
        }
        self.slots[index].name = Some(name.to_string());
        debug!("Renamed slot {} to '{}'", index, name);
        self.save()
    }

    /// Resolve a reference to an occupied slot
    pub fn index_of(&self, node: &NodeRef) -> Result<usize> {
        match node {
            NodeRef::ByIndex(index) => {
                if self.is_occupied(*index) {
                    Ok(*index)
                } else {
                    Err(ForestError::not_found(format!("slot {index}")))
                }
            }
            NodeRef::ByName(name) => self
                .find_slot(name)
                .or_else(|| {
                    let logical = self.resolver.as_ref()?.resolve(name);
                    self.find_slot(logical)
                })
                .ok_or_else(|| ForestError::not_found(name.clone())),
        }
    }

    fn find_slot(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.name.as_deref() == Some(name))
    }

    fn is_occupied(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| slot.name.is_some())
    }

    /// Whether `name` (or the logical node it aliases) occupies a slot
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(&NodeRef::name(name)).is_ok()
    }

    /// Parent slot of a node; `None` when it is a root
    pub fn get_parent(&self, node: &NodeRef) -> Result<Option<usize>> {
        let index = self.index_of(node)?;
        Ok(self.slots[index].parent)
    }

    /// Canonical branch name of a node's parent; `None` when it is a root
    pub fn parent_branch(&self, node: &NodeRef) -> Result<Option<String>> {
        match self.get_parent(node)? {
            Some(parent) => Ok(Some(self.branch_name(parent)?)),
            None => Ok(None),
        }
    }

    /// Logical name stored in a slot
    pub fn node_name(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|slot| slot.name.as_deref())
    }

    /// External branch name used to act on a slot: the canonical alias when
    /// a resolver is attached, otherwise the logical name
    pub fn branch_name(&self, index: usize) -> Result<String> {
        let name = self
            .node_name(index)
            .ok_or_else(|| ForestError::not_found(format!("slot {index}")))?;
        Ok(match &self.resolver {
            Some(resolver) => resolver.canonical(name).to_string(),
            None => name.to_string(),
        })
    }

    /// All aliases of an occupied slot, canonical first
    pub fn aliases(&self, index: usize) -> Vec<String> {
        match (self.node_name(index), &self.resolver) {
            (Some(name), Some(resolver)) => resolver.aliases(name),
            (Some(name), None) => vec![name.to_string()],
            (None, _) => Vec::new(),
        }
    }

    /// Children of a slot in insertion order
    pub fn children(&self, index: usize) -> &[usize] {
        self.slots
            .get(index)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    /// Occupied slots without a parent, in slot order
    pub fn roots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.name.is_some() && slot.parent.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of slots, free ones included
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.name.is_some()).count()
    }

    fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.slots.get(index).and_then(|slot| slot.parent), |&p| {
            self.slots.get(p).and_then(|slot| slot.parent)
        })
    }

    /// Whether `node` lies in the subtree rooted at `root` (itself included)
    pub fn is_in_subtree(&self, root: usize, node: usize) -> bool {
        node == root || self.ancestors(node).any(|ancestor| ancestor == root)
    }

    fn link(&mut self, parent: usize, child: usize) {
        self.slots[parent].children.push(child);
        self.slots[child].parent = Some(parent);
    }

    fn detach(&mut self, child: usize) {
        if let Some(parent) = self.slots[child].parent.take() {
            self.slots[parent].children.retain(|&c| c != child);
        }
    }

    /// Hang `child` under `parent`, keeping the child's own descendants.
    ///
    /// A child that already has a parent is detached from it first.
    pub fn add_edge(&mut self, parent: &NodeRef, child: &NodeRef) -> Result<()> {
        let parent = self.index_of(parent)?;
        let child = self.index_of(child)?;
        if self.is_in_subtree(child, parent) {
            return Err(ForestError::invalid_operation(format!(
                "cannot place '{}' under its own descendant '{}'",
                self.node_name(child).unwrap_or_default(),
                self.node_name(parent).unwrap_or_default()
            )));
        }
        self.detach(child);
        self.link(parent, child);
        debug!("Added edge {} -> {}", parent, child);
        self.save()
    }

    /// Move `node` under `new_parent` (`None` makes it a root).
    ///
    /// The node is appended to the new parent's children and all of its own
    /// children become roots: once a branch is replayed elsewhere, whatever
    /// hung below it no longer descends from it until it is moved back.
    pub fn move_edge(&mut self, node: &NodeRef, new_parent: Option<&NodeRef>) -> Result<()> {
        let node = self.index_of(node)?;
        let new_parent = new_parent.map(|p| self.index_of(p)).transpose()?;
        self.move_edge_by_index(node, new_parent)
    }

    /// [`TreeStore::move_edge`] on already-resolved slots
    pub fn move_edge_by_index(&mut self, node: usize, new_parent: Option<usize>) -> Result<()> {
        if !self.is_occupied(node) {
            return Err(ForestError::not_found(format!("slot {node}")));
        }
        if let Some(parent) = new_parent {
            if !self.is_occupied(parent) {
                return Err(ForestError::not_found(format!("slot {parent}")));
            }
            if parent == node {
                return Err(ForestError::invalid_operation(format!(
                    "slot {node} cannot be its own parent"
                )));
            }
        }

        self.detach(node);
        if let Some(parent) = new_parent {
            self.link(parent, node);
        }

        for child in std::mem::take(&mut self.slots[node].children) {
            self.slots[child].parent = None;
        }

        debug!("Moved slot {} under {:?}", node, new_parent);
        self.save()
    }

    /// Free a node's slot. Its children become roots; they are not deleted.
    pub fn remove_node(&mut self, node: &NodeRef) -> Result<()> {
        let index = self.index_of(node)?;
        self.move_edge_by_index(index, None)?;
        self.slots[index] = Slot::default();
        debug!("Freed slot {}", index);
        self.save()
    }

    /// Pre-order `(parent, child)` edges below `index`
    pub fn subtree_edges(&self, index: usize) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        self.collect_edges(index, &mut edges);
        edges
    }

    fn collect_edges(&self, index: usize, edges: &mut Vec<(usize, usize)>) {
        for &child in self.children(index) {
            edges.push((index, child));
            self.collect_edges(child, edges);
        }
    }

    /// Pre-order edges of every root, roots in slot order
    pub fn all_edges(&self) -> Vec<(usize, usize)> {
        self.roots()
            .into_iter()
            .flat_map(|root| self.subtree_edges(root))
            .collect()
    }
}
