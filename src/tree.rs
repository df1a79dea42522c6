//! Folding flat command paths into a tree, and walking argv down it.
use indexmap::IndexMap;

use crate::CommandDescriptor;

/// One distinct path prefix.
///
/// A node without a descriptor is a grouping node: it only exists to host
/// deeper commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandNode {
    pub segment: String,
    pub path: Vec<String>,
    pub descriptor: Option<CommandDescriptor>,
    pub children: IndexMap<String, CommandNode>,
}

impl CommandNode {
    fn child_or_insert(&mut self, segment: &str) -> &mut CommandNode {
        let path = &self.path;
        self.children.entry(segment.to_string()).or_insert_with(|| {
            let mut path = path.clone();
            path.push(segment.to_string());
            CommandNode { segment: segment.to_string(), path, ..CommandNode::default() }
        })
    }

    pub fn child(&self, segment: &str) -> Option<&CommandNode> {
        self.children.get(segment)
    }

    /// Exact lookup, unlike [`resolve`] which stops at the deepest match.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandNode> {
        path.iter().try_fold(self, |node, segment| node.child(segment.as_ref()))
    }

    pub fn is_runnable(&self) -> bool {
        self.descriptor.is_some()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Every node carrying a descriptor, depth-first in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.values().rev());
            Some(node)
        })
        .filter(|node| node.is_runnable())
    }
}

/// Builds a tree with a bare grouping root.
pub fn build(descriptors: &[CommandDescriptor]) -> CommandNode {
    build_rooted(None, descriptors)
}

/// Like [`build`], with `root` attached to the root node.
///
/// Descriptors are attached shallowest first. Two descriptors with the same
/// path both land on the same node and the one registered last wins.
pub fn build_rooted(root: Option<&CommandDescriptor>, descriptors: &[CommandDescriptor]) -> CommandNode {
    let mut tree = CommandNode { descriptor: root.cloned(), ..CommandNode::default() };

    let mut ordered: Vec<&CommandDescriptor> = descriptors.iter().collect();
    ordered.sort_by_key(|it| it.depth());

    for descriptor in ordered {
        if descriptor.paths.is_empty() {
            tracing::warn!("skipping a command with an empty path");
            continue;
        }
        let mut node = &mut tree;
        for segment in &descriptor.paths {
            node = node.child_or_insert(segment);
        }
        if node.descriptor.is_some() {
            tracing::debug!(path = ?descriptor.paths, "command overrides an earlier registration");
        }
        node.descriptor = Some(descriptor.clone());
    }

    tracing::debug!(commands = tree.commands().count(), "built command tree");
    tree
}

/// Greedily descends while the next token names a child.
///
/// Returns the deepest node reached, which may be a grouping node, and the
/// tokens that were not consumed.
pub fn resolve<'t, 'a, S: AsRef<str>>(root: &'t CommandNode, argv: &'a [S]) -> (&'t CommandNode, &'a [S]) {
    let mut node = root;
    let mut rest = argv;
    while let Some((token, tail)) = rest.split_first() {
        match node.child(token.as_ref()) {
            Some(child) => {
                node = child;
                rest = tail;
            }
            None => break,
        }
    }
    tracing::debug!(path = ?node.path, remaining = rest.len(), "resolved command");
    (node, rest)
}
