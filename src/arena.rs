use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::element::Element;
use crate::errors::{PlanError, PlanResult};

/// Tree node in the arena-based plan hierarchy.
#[derive(Debug)]
pub struct PlanNode {
    /// Element payload for this node
    pub element: Element,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based tree structure for plan hierarchies.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// The arena exclusively owns every node; dropping the arena (or removing a
/// subtree) releases all affected nodes exactly once.
#[derive(Debug)]
pub struct PlanArena {
    /// Arena storage for all tree nodes
    arena: Arena<PlanNode>,
    /// Index of the root node, None for an empty tree
    root: Option<Index>,
}

impl Default for PlanArena {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a new node under `parent`, transferring ownership of the
    /// element into the arena.
    ///
    /// With `parent = None` the node becomes the root; inserting a second
    /// root is rejected. The parent must exist and must be a stage, leaf
    /// elements never hold children.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, element: Element, parent: Option<Index>) -> PlanResult<Index> {
        if let Some(parent_idx) = parent {
            let parent_node = self
                .arena
                .get(parent_idx)
                .ok_or(PlanError::NodeNotFound(parent_idx))?;
            if !parent_node.element.is_stage() {
                return Err(PlanError::NotAStage(parent_idx));
            }
        } else if self.root.is_some() {
            return Err(PlanError::RootAlreadySet);
        }

        let node = PlanNode {
            element,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent_idx) {
                parent_node.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        Ok(node_idx)
    }

    /// Inserts a new node without linking it anywhere.
    ///
    /// Detached nodes are invisible to root-based traversal until linked
    /// via [`attach`](Self::attach); this is how a subtree is assembled
    /// off-tree and grafted in one step.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_detached(&mut self, element: Element) -> Index {
        self.arena.insert(PlanNode {
            element,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Links an existing parentless node under a stage.
    ///
    /// Rejected without modifying the tree when the child already has a
    /// parent (each node has exactly one owner), when the parent is a leaf,
    /// or when the link would make the child its own ancestor.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, child_idx: Index, parent_idx: Index) -> PlanResult<()> {
        let parent_node = self
            .arena
            .get(parent_idx)
            .ok_or(PlanError::NodeNotFound(parent_idx))?;
        if !parent_node.element.is_stage() {
            return Err(PlanError::NotAStage(parent_idx));
        }
        let child_node = self
            .arena
            .get(child_idx)
            .ok_or(PlanError::NodeNotFound(child_idx))?;
        if child_node.parent.is_some() {
            return Err(PlanError::AlreadyAttached(child_idx));
        }
        if child_idx == parent_idx || self.is_ancestor(child_idx, parent_idx) {
            return Err(PlanError::CycleDetected(child_idx));
        }

        self.arena
            .get_mut(parent_idx)
            .ok_or(PlanError::NodeNotFound(parent_idx))?
            .children
            .push(child_idx);
        self.arena
            .get_mut(child_idx)
            .ok_or(PlanError::NodeNotFound(child_idx))?
            .parent = Some(parent_idx);
        // Attaching the old root under a detached stage moves the top of
        // the tree; the root always names the topmost ancestor.
        if self.root == Some(child_idx) {
            self.root = Some(self.top_ancestor(parent_idx));
        }
        Ok(())
    }

    fn top_ancestor(&self, idx: Index) -> Index {
        let mut current = idx;
        while let Some(parent) = self.arena.get(current).and_then(|n| n.parent) {
            current = parent;
        }
        current
    }

    /// True if `candidate` appears on the parent chain of `node_idx`.
    #[instrument(level = "trace", skip(self))]
    pub fn is_ancestor(&self, candidate: Index, node_idx: Index) -> bool {
        let mut current = self.arena.get(node_idx).and_then(|n| n.parent);
        while let Some(idx) = current {
            if idx == candidate {
                return true;
            }
            current = self.arena.get(idx).and_then(|n| n.parent);
        }
        false
    }

    /// Removes a node and all of its descendants, releasing each exactly
    /// once. Returns the number of nodes removed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> PlanResult<usize> {
        let parent = self
            .arena
            .get(idx)
            .ok_or(PlanError::NodeNotFound(idx))?
            .parent;

        let mut doomed = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.get(current) {
                stack.extend(node.children.iter().copied());
            }
            doomed.push(current);
        }

        if let Some(parent_idx) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent_idx) {
                parent_node.children.retain(|&c| c != idx);
            }
        }
        if self.root == Some(idx) {
            self.root = None;
        }

        let mut removed = 0;
        for d in doomed {
            if self.arena.remove(d).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&PlanNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut PlanNode> {
        self.arena.get_mut(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    #[instrument(level = "trace", skip(self))]
    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects indices of all leaf nodes (nodes with no children).
    ///
    /// Empty trees return an empty vector.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        let mut leaves = Vec::new();
        if let Some(root) = self.root {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    #[instrument(level = "trace", skip(self))]
    fn collect_leaves(&self, node_idx: Index, leaves: &mut Vec<Index>) {
        if let Some(node) = self.get_node(node_idx) {
            if node.children.is_empty() {
                leaves.push(node_idx);
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a PlanArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a PlanArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a PlanNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a PlanArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a PlanArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a PlanNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_detects_transitive_cycle() {
        let mut plan = PlanArena::new();
        let root = plan.insert_node(Element::stage("root"), None).unwrap();
        let mid = plan.insert_node(Element::stage("mid"), Some(root)).unwrap();
        let leaf = plan
            .insert_node(Element::command("true", 1), Some(mid))
            .unwrap();

        // root is an ancestor of mid, so root can never go under mid
        assert!(plan.is_ancestor(root, leaf));
        assert!(matches!(
            plan.attach(root, mid),
            Err(PlanError::CycleDetected(_))
        ));
    }
}
