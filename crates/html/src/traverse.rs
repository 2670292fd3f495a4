use crate::types::Node;

/// First node in pre-order (including `node` itself) matching `pred`.
/// Does not descend into components.
pub fn find_first<'a>(node: &'a Node, pred: &dyn Fn(&Node) -> bool) -> Option<&'a Node> {
    if pred(node) {
        return Some(node);
    }
    node.children().iter().find_map(|c| find_first(c, pred))
}

pub fn find_by_tag<'a>(node: &'a Node, tag: &str) -> Option<&'a Node> {
    find_first(node, &|n| n.is_element_named(tag))
}

/// Equivalent of `[name]` selectors.
pub fn find_by_attr<'a>(node: &'a Node, name: &str) -> Option<&'a Node> {
    find_first(node, &|n| crate::dom_utils::has_attr(n.attributes(), name))
}
