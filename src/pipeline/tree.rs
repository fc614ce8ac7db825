//! Hierarchy forest for the navigation panel.
//!
//! Each node is attached under the entry of its `parent_id` when that parent
//! is part of the same collection; otherwise it becomes a root. A node whose
//! declared parent is missing is tolerated and simply shows up at the top
//! level. Children keep the order in which nodes were supplied.
//!
//! The forest is rebuilt from scratch for every snapshot.

use crate::types::{GraphElement, HierarchyNode, TreeEntry};
use std::collections::HashMap;

/// Build the forest for `nodes`.
pub fn project(nodes: &[HierarchyNode]) -> Vec<TreeEntry> {
    project_iter(nodes.iter())
}

/// Build the forest from a combined element list, ignoring edges.
pub fn project_elements(elements: &[GraphElement]) -> Vec<TreeEntry> {
    project_iter(elements.iter().filter_map(GraphElement::as_node))
}

fn project_iter<'a>(nodes: impl Iterator<Item = &'a HierarchyNode>) -> Vec<TreeEntry> {
    let nodes: Vec<&HierarchyNode> = nodes.collect();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        // First occurrence wins for duplicate ids
        index.entry(node.id.as_str()).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut roots = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        if index.get(node.id.as_str()) != Some(&i) {
            continue;
        }
        match node.parent_id.as_deref().and_then(|p| index.get(p)) {
            Some(&parent) => children[parent].push(i),
            None => {
                if let Some(parent) = &node.parent_id {
                    tracing::warn!("Parent {} not found for {}", parent, node.id);
                }
                roots.push(i);
            }
        }
    }

    let forest: Vec<TreeEntry> = roots
        .iter()
        .map(|&root| assemble(root, &nodes, &children))
        .collect();

    let reached: usize = forest.iter().map(TreeEntry::len).sum();
    let unique = index.len();
    if reached < unique {
        tracing::warn!(
            "{} node(s) sit on a parent cycle and were left out of the hierarchy",
            unique - reached
        );
    }

    forest
}

fn assemble(i: usize, nodes: &[&HierarchyNode], children: &[Vec<usize>]) -> TreeEntry {
    let node = nodes[i];
    TreeEntry {
        key: node.id.clone(),
        title: if node.label.is_empty() {
            node.id.clone()
        } else {
            node.label.clone()
        },
        children: children[i]
            .iter()
            .map(|&child| assemble(child, nodes, children))
            .collect(),
    }
}

/// Find the entry with `key` anywhere in `forest`.
pub fn find<'a>(forest: &'a [TreeEntry], key: &str) -> Option<&'a TreeEntry> {
    forest.iter().find_map(|entry| entry.find(key))
}

/// Total number of entries in `forest`.
pub fn count(forest: &[TreeEntry]) -> usize {
    forest.iter().map(TreeEntry::len).sum()
}
