use crate::errors::{ForestError, Result};
use crate::git::{BranchTip, DiffTool, VcsDriver};
use crate::tree::{NameResolver, NodeRef, TreePrinter, TreeStore};
use std::collections::HashSet;
use tracing::{debug, info};

/// One replayed edge: `branch` now sits on top of `onto`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebaseStep {
    pub branch: String,
    pub onto: String,
}

/// Result of a completed subtree rebase
#[derive(Debug, Default)]
pub struct RebaseResult {
    /// Edges in the order they were replayed
    pub steps: Vec<RebaseStep>,
}

impl RebaseResult {
    pub fn summary(&self) -> String {
        match self.steps.len() {
            0 => "Nothing to rebase".to_string(),
            1 => "Rebased 1 branch".to_string(),
            n => format!("Rebased {n} branches"),
        }
    }
}

/// Keeps the branch forest and the repository history in lockstep.
///
/// Every operation runs its external steps first and records the structural
/// change in the [`TreeStore`] only once the step succeeded. The first failing
/// step aborts the operation; steps that already succeeded are neither rolled
/// back in the repository nor in the tree file.
pub struct RebaseOrchestrator<D: VcsDriver> {
    store: TreeStore,
    driver: D,
    trunk_branch: String,
}

impl<D: VcsDriver> RebaseOrchestrator<D> {
    /// Create an orchestrator over an already prepared store
    pub fn new(store: TreeStore, driver: D, trunk_branch: impl Into<String>) -> Self {
        Self {
            store,
            driver,
            trunk_branch: trunk_branch.into(),
        }
    }

    /// Create an orchestrator after snapshotting the repository's branch
    /// aliases into the store
    pub fn with_resolved_names(
        mut store: TreeStore,
        driver: D,
        trunk_branch: impl Into<String>,
    ) -> Result<Self> {
        let listing = driver.branch_listing()?;
        let resolver = NameResolver::from_listing(&listing, |name| store.contains(name));
        store.attach_resolver(resolver);
        Ok(Self::new(store, driver, trunk_branch))
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }


    /// Move `source` and everything below it onto `dest`.
    ///
    /// The new top edge is replayed first, then every existing edge below
    /// `source` in pre-order, so each branch is rebased only after its parent
    /// reached its final position.
    pub fn rebase(&mut self, source: &NodeRef, dest: &NodeRef) -> Result<RebaseResult> {
        let source = self.store.index_of(source)?;
        let dest = self.store.index_of(dest)?;
        if self.store.is_in_subtree(source, dest) {
            return Err(ForestError::invalid_operation(format!(
                "cannot rebase '{}' onto '{}', which is part of its own stack",
                self.store.branch_name(source)?,
                self.store.branch_name(dest)?
            )));
        }

        let mut edges = vec![(dest, source)];
        edges.extend(self.store.subtree_edges(source));
        debug!("Replaying {} edges: {:?}", edges.len(), edges);

        let mut result = RebaseResult::default();
        for (new_parent, node) in edges {
            result.steps.push(self.rebase_edge(new_parent, node)?);
        }
        info!("{}", result.summary());
        Ok(result)
    }

    fn rebase_edge(&mut self, new_parent: usize, node: usize) -> Result<RebaseStep> {
        let branch = self.store.branch_name(node)?;
        let onto = self.store.branch_name(new_parent)?;
        info!("Rebase {} to {}", branch, onto);

        self.switch_to(&branch)?;
        self.driver.rebase_onto(&onto)?;
        self.store.move_edge_by_index(node, Some(new_parent))?;

        Ok(RebaseStep { branch, onto })
    }

    fn switch_to(&self, branch: &str) -> Result<()> {
        self.driver.checkout(branch)?;
        let current = self.driver.current_branch()?;
        if current != branch {
            return Err(ForestError::external(
                format!("switch to branch {branch} (HEAD is at {current})"),
                None,
            ));
        }
        Ok(())
    }

    /// Commit outstanding work as a new branch on top of the current one.
    ///
    /// Without a name the branch gets the next free number. Returns the new
    /// branch name.
    pub fn commit(&mut self, branch_name: Option<String>) -> Result<String> {
        let current = self.driver.current_branch()?;
        let parent = self.store.index_of(&NodeRef::name(&current))?;

        let name = match branch_name {
            Some(name) => name,
            None => {
                let listing = self.driver.branch_listing()?;
                next_available_branch_name(&listing, |name| self.store.contains(name))
            }
        };
        if self.store.contains(&name) {
            return Err(ForestError::duplicate(name));
        }

        self.driver.create_branch_and_switch(&name)?;
        self.driver.commit_interactive()?;

        let node = self.store.create_node(Some(&name))?;
        self.store
            .add_edge(&NodeRef::ByIndex(parent), &NodeRef::ByIndex(node))?;
        let commit = self.driver.rev_parse(&name).ok();
        if let Some(resolver) = self.store.resolver_mut() {
            resolver.insert(&name, commit);
        }

        info!("Committed {} on top of {}", name, current);
        Ok(name)
    }

    /// Amend the current branch in place and re-seat it under its parent.
    ///
    /// Re-seating detaches the branch's children: they still point at the
    /// pre-amend commit until they are rebased.
    pub fn amend(&mut self) -> Result<()> {
        let current = self.driver.current_branch()?;
        let node = self.store.index_of(&NodeRef::name(&current))?;

        self.driver.amend_no_edit()?;

        let parent = self.store.get_parent(&NodeRef::ByIndex(node))?;
        self.store.move_edge_by_index(node, parent)
    }

    /// Delete a branch. Its children become roots.
    pub fn prune(&mut self, branch: &str) -> Result<()> {
        let node = self.store.index_of(&NodeRef::name(branch))?;
        let logical = self
            .store
            .node_name(node)
            .map(str::to_string)
            .unwrap_or_default();

        self.driver.delete_branch(branch)?;

        self.store.remove_node(&NodeRef::ByIndex(node))?;
        if let Some(resolver) = self.store.resolver_mut() {
            resolver.forget(&logical);
        }
        info!("Pruned {}", branch);
        Ok(())
    }

    /// Switch the working tree to a branch
    pub fn update(&mut self, branch: &str) -> Result<()> {
        self.driver.checkout(branch)
    }

    /// Pull the trunk branch and make the trunk node a root again
    pub fn sync(&mut self) -> Result<()> {
        self.switch_to(&self.trunk_branch)?;
        self.driver.pull()?;
        self.store.move_edge_by_index(0, None)?;
        info!("Synced {}", self.trunk_branch);
        Ok(())
    }

    /// Diff the working tree against the current branch's parent
    pub fn diff_parent(&self, tool: DiffTool, extra_args: &[String]) -> Result<()> {
        let current = self.driver.current_branch()?;
        let parent = self
            .store
            .parent_branch(&NodeRef::name(&current))?
            .ok_or_else(|| {
                ForestError::invalid_operation(format!("'{current}' has no parent branch"))
            })?;
        self.driver.diff(tool, &parent, extra_args)
    }

    /// Rename the current branch, defaulting to its slot index. Returns the
    /// new name.
    pub fn rename_current(&mut self, new_name: Option<String>) -> Result<String> {
        let current = self.driver.current_branch()?;
        let node = self.store.index_of(&NodeRef::name(&current))?;
        let new_name = new_name.unwrap_or_else(|| node.to_string());

        if let Ok(other) = self.store.index_of(&NodeRef::name(&new_name)) {
            if other != node {
                return Err(ForestError::duplicate(new_name));
            }
        }

        self.driver.rename_current_branch(&new_name)?;

        if self.store.node_name(node) == Some(current.as_str()) {
            self.store
                .set_node_name(&NodeRef::ByIndex(node), &new_name)?;
        }
        if let Some(resolver) = self.store.resolver_mut() {
            resolver.rename(&current, &new_name);
        }
        info!("Renamed {} to {}", current, new_name);
        Ok(new_name)
    }

    /// Track local branches the tree does not know yet.
    ///
    /// Each untracked commit group becomes a node. A new node is hung under
    /// the tracked branch whose tip is its own tip's first parent; nodes that
    /// were already tracked keep their edges. Returns the adopted names.
    pub fn adopt_branches(&mut self) -> Result<Vec<String>> {
        if self.store.resolver().is_none() {
            let listing = self.driver.branch_listing()?;
            let store = &self.store;
            let resolver = NameResolver::from_listing(&listing, |name| store.contains(name));
            self.store.attach_resolver(resolver);
        }
        let resolver = self.store.resolver().cloned().unwrap_or_default();

        let mut adopted = Vec::new();
        for logical in resolver.logical_names() {
            if self.store.contains(logical) {
                continue;
            }
            let node = self.store.create_node(Some(logical))?;
            adopted.push((node, logical.clone()));
        }

        for (node, logical) in &adopted {
            let Some(commit) = resolver.commit_of(logical) else {
                continue;
            };
            let Ok(parent_commit) = self.driver.rev_parse(&format!("{commit}^")) else {
                debug!("{} has no parent commit", logical);
                continue;
            };
            let parent = resolver
                .logical_names()
                .iter()
                .find(|candidate| resolver.commit_of(candidate) == Some(parent_commit.as_str()));
            if let Some(parent) = parent {
                let parent = self.store.index_of(&NodeRef::name(parent))?;
                if parent != *node {
                    self.store
                        .add_edge(&NodeRef::ByIndex(parent), &NodeRef::ByIndex(*node))?;
                }
            }
        }

        let names: Vec<String> = adopted.into_iter().map(|(_, name)| name).collect();
        info!("Adopted {} branches", names.len());
        Ok(names)
    }

    /// Render the forest with each branch's latest commit and the current
    /// branch marked
    pub fn render_tree(&self) -> String {
        let current = self.driver.current_branch().ok();
        TreePrinter::new(&self.store).render_to_string(
            |branch| {
                self.driver
                    .commit_subject(branch)
                    .unwrap_or_else(|e| format!("<{e}>"))
            },
            current.as_deref(),
        )
    }
}

/// Smallest positive integer that is neither a branch in `listing` nor a
/// name `is_tracked` reports as held by the tree.
///
/// A tree slot can outlive its branch when the branch is deleted behind the
/// tool's back, so the listing alone is not enough.
pub fn next_available_branch_name<F>(listing: &[BranchTip], is_tracked: F) -> String
where
    F: Fn(&str) -> bool,
{
    let taken: HashSet<&str> = listing.iter().map(|tip| tip.name.as_str()).collect();
    (1u64..)
        .map(|n| n.to_string())
        .find(|name| !taken.contains(name.as_str()) && !is_tracked(name))
        .unwrap_or_default()
}
