use super::store::TreeStore;
use std::fmt::{self, Write};

const LAST_CONNECTOR: &str = "`- ";
const MIDDLE_CONNECTOR: &str = "|- ";
const LAST_INDENT: &str = "   ";
const MIDDLE_INDENT: &str = "|  ";
const CURRENT_MARKER: &str = "  <===============";

/// Renders the forest as an indented tree, one line per node:
///
/// ```text
/// `- master  : (2 days ago) Merge upstream
///    |- feature-a, feature-a-v2  : (3 hours ago) Add parser
///    `- 3  : (1 minute ago) Fix typo  <===============
/// ```
pub struct TreePrinter<'a> {
    store: &'a TreeStore,
}

impl<'a> TreePrinter<'a> {
    pub fn new(store: &'a TreeStore) -> Self {
        Self { store }
    }

    /// Write every root and its descendants into `out`.
    ///
    /// `describe` is called with each node's canonical branch name and supplies
    /// the text after the aliases. Nodes with an alias equal to `current` get a
    /// marker.
    pub fn render<W, F>(&self, out: &mut W, mut describe: F, current: Option<&str>) -> fmt::Result
    where
        W: Write,
        F: FnMut(&str) -> String,
    {
        for root in self.store.roots() {
            self.render_node(out, root, &mut describe, current, "", true)?;
        }
        Ok(())
    }

    /// [`TreePrinter::render`] into a fresh string
    pub fn render_to_string<F>(&self, describe: F, current: Option<&str>) -> String
    where
        F: FnMut(&str) -> String,
    {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render(&mut out, describe, current);
        out
    }

    fn render_node<W, F>(
        &self,
        out: &mut W,
        index: usize,
        describe: &mut F,
        current: Option<&str>,
        prefix: &str,
        last: bool,
    ) -> fmt::Result
    where
        W: Write,
        F: FnMut(&str) -> String,
    {
        let aliases = self.store.aliases(index);
        let Some(canonical) = aliases.first() else {
            return Ok(());
        };

        let connector = if last { LAST_CONNECTOR } else { MIDDLE_CONNECTOR };
        write!(
            out,
            "{prefix}{connector}{}  : {}",
            aliases.join(", "),
            describe(canonical)
        )?;
        if current.is_some_and(|current| aliases.iter().any(|alias| alias == current)) {
            out.write_str(CURRENT_MARKER)?;
        }
        out.write_char('\n')?;

        let child_prefix = format!("{prefix}{}", if last { LAST_INDENT } else { MIDDLE_INDENT });
        let children = self.store.children(index);
        for (position, &child) in children.iter().enumerate() {
            let last_child = position + 1 == children.len();
            self.render_node(out, child, describe, current, &child_prefix, last_child)?;
        }
        Ok(())
    }
}
