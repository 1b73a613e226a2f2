//! Namespace index derivation
//!
//! One dotted path per node below the root. At every level, container
//! children (and their subtrees) come before the scalar leaves of that
//! level; siblings of the same kind keep declaration order. Wildcard
//! segments render as `$<type>`.

use super::types::SchemaNode;

/// Derives the namespace index of a tree rooted at `root`.
pub fn derive(root: &SchemaNode) -> Vec<String> {
    let mut out = Vec::new();
    walk(root, "", &mut out);
    out
}

fn walk(node: &SchemaNode, prefix: &str, out: &mut Vec<String>) {
    let children = node.children();

    for (segment, child) in children.iter().filter(|(_, c)| c.is_container()) {
        let path = join(prefix, &segment.render());
        out.push(path.clone());
        walk(child, &path, out);
    }

    for (segment, _) in children.iter().filter(|(_, c)| !c.is_container()) {
        out.push(join(prefix, &segment.render()));
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
