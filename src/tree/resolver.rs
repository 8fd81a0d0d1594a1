use crate::git::BranchTip;
use std::collections::HashMap;

/// Maps external branch names onto logical node names.
///
/// Built once from a branch listing. Every distinct commit becomes one logical
/// node and every branch pointing at that commit becomes one of its aliases, in
/// listing order except that a name the tree tracks always comes first. The
/// first alias is the canonical name every external step acts on.
///
/// The mapping is a snapshot: it does not follow the repository after it was
/// built, so callers that change branches must update it themselves.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    /// Logical name -> aliases, canonical first
    aliases: HashMap<String, Vec<String>>,
    /// Alias -> logical name
    logical_by_alias: HashMap<String, String>,
    /// Logical name -> commit id the group was built from
    commits: HashMap<String, String>,
    /// Logical names in the order their commits were first seen
    order: Vec<String>,
}

impl NameResolver {
    /// Create an empty resolver; every name resolves to itself
    pub fn new() -> Self {
        Self::default()
    }

    /// Group a branch listing by commit.
    ///
    /// The logical name of a group is the first alias for which `is_known`
    /// returns true (a name the tree already tracks), or the first-seen alias
    /// when the tree knows none of them. The logical name is also the
    /// group's canonical alias.
    pub fn from_listing<F>(listing: &[BranchTip], is_known: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let mut by_commit: HashMap<&str, Vec<String>> = HashMap::new();
        let mut commit_order: Vec<&str> = Vec::new();

        for tip in listing {
            let group = by_commit.entry(tip.commit.as_str()).or_insert_with(|| {
                commit_order.push(tip.commit.as_str());
                Vec::new()
            });
            if !group.contains(&tip.name) {
                group.push(tip.name.clone());
            }
        }

        let mut resolver = Self::new();
        for commit in commit_order {
            let mut names = by_commit.remove(commit).unwrap_or_default();
            if names.is_empty() {
                continue;
            }
            if let Some(known) = names.iter().position(|name| is_known(name.as_str())) {
                let tracked = names.remove(known);
                names.insert(0, tracked);
            }
            let logical = names[0].clone();

            for name in &names {
                resolver
                    .logical_by_alias
                    .insert(name.clone(), logical.clone());
            }
            resolver.commits.insert(logical.clone(), commit.to_string());
            resolver.order.push(logical.clone());
            resolver.aliases.insert(logical, names);
        }

        tracing::debug!(
            "Resolved {} branches into {} logical nodes",
            listing.len(),
            resolver.order.len()
        );
        resolver
    }

    /// Logical name for an external branch name, or the name itself if it is
    /// not a known alias
    pub fn resolve<'a>(&'a self, external_name: &'a str) -> &'a str {
        self.logical_by_alias
            .get(external_name)
            .map(String::as_str)
            .unwrap_or(external_name)
    }

    /// Canonical external name for a logical name
    pub fn canonical<'a>(&'a self, logical_name: &'a str) -> &'a str {
        self.aliases
            .get(logical_name)
            .and_then(|names| names.first())
            .map(String::as_str)
            .unwrap_or(logical_name)
    }

    /// All aliases of a logical node, canonical first
    pub fn aliases(&self, logical_name: &str) -> Vec<String> {
        self.aliases
            .get(logical_name)
            .cloned()
            .unwrap_or_else(|| vec![logical_name.to_string()])
    }

    /// Whether the external name is one of the recorded aliases
    pub fn is_alias(&self, external_name: &str) -> bool {
        self.logical_by_alias.contains_key(external_name)
    }

    /// Commit id a logical node pointed at when the snapshot was taken
    pub fn commit_of(&self, logical_name: &str) -> Option<&str> {
        self.commits.get(logical_name).map(String::as_str)
    }

    /// Logical names in first-seen commit order
    pub fn logical_names(&self) -> &[String] {
        &self.order
    }

    /// Record a freshly created branch as its own logical node
    pub fn insert(&mut self, name: &str, commit: Option<String>) {
        self.forget(name);
        self.aliases
            .insert(name.to_string(), vec![name.to_string()]);
        self.logical_by_alias
            .insert(name.to_string(), name.to_string());
        if let Some(commit) = commit {
            self.commits.insert(name.to_string(), commit);
        }
        self.order.push(name.to_string());
    }

    /// Drop a logical node and all of its aliases
    pub fn forget(&mut self, logical_name: &str) {
        if let Some(names) = self.aliases.remove(logical_name) {
            for name in names {
                self.logical_by_alias.remove(&name);
            }
        }
        self.commits.remove(logical_name);
        self.order.retain(|name| name != logical_name);
    }

    /// Rename one alias of a logical node, moving the logical name along with
    /// it when the old alias was also the logical name
    pub fn rename(&mut self, old_alias: &str, new_name: &str) {
        let logical = self.resolve(old_alias).to_string();
        let mut names = self
            .aliases
            .remove(&logical)
            .unwrap_or_else(|| vec![logical.clone()]);
        for name in names.iter_mut() {
            if name == old_alias {
                *name = new_name.to_string();
            }
        }

        let new_logical = if logical == old_alias {
            new_name.to_string()
        } else {
            logical.clone()
        };

        self.logical_by_alias.remove(old_alias);
        for name in &names {
            self.logical_by_alias
                .insert(name.clone(), new_logical.clone());
        }
        if let Some(commit) = self.commits.remove(&logical) {
            self.commits.insert(new_logical.clone(), commit);
        }
        for name in self.order.iter_mut() {
            if *name == logical {
                *name = new_logical.clone();
            }
        }
        self.aliases.insert(new_logical, names);
    }
}
