//! Line-wrap policy.

use crate::tree::RenderNode;

pub(crate) const LINE: &str = "\n";

/// Insert line separators between compiled nodes.
///
/// A separator goes between every adjacent pair. When `loose` is set, one
/// also goes before the first node and, for a non-empty sequence, after the
/// last, so an empty loose sequence yields a single separator.
#[must_use]
pub fn wrap_in_lines(nodes: Vec<RenderNode>, loose: bool) -> Vec<RenderNode> {
    let mut out = Vec::with_capacity(nodes.len() * 2 + 1);
    if loose {
        out.push(RenderNode::text(LINE));
    }
    let non_empty = !nodes.is_empty();
    for (index, node) in nodes.into_iter().enumerate() {
        if index > 0 {
            out.push(RenderNode::text(LINE));
        }
        out.push(node);
    }
    if loose && non_empty {
        out.push(RenderNode::text(LINE));
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::Element;

    fn texts(nodes: &[RenderNode]) -> Vec<String> {
        nodes.iter().map(RenderNode::text_content).collect()
    }

    #[test]
    fn test_tight() {
        let nodes = ["a", "b", "c"].map(RenderNode::text).to_vec();
        let wrapped = wrap_in_lines(nodes, false);
        assert_eq!(texts(&wrapped), ["a", "\n", "b", "\n", "c"]);
    }

    #[test]
    fn test_loose() {
        let nodes = vec![Element::new("p").into(), Element::new("p").into()];
        let wrapped = wrap_in_lines(nodes, true);
        assert_eq!(wrapped.len(), 5);
        assert_eq!(wrapped[0], RenderNode::text("\n"));
        assert_eq!(wrapped[4], RenderNode::text("\n"));
    }

    #[test]
    fn test_empty() {
        assert!(wrap_in_lines(Vec::new(), false).is_empty());
        let wrapped = wrap_in_lines(Vec::new(), true);
        assert_eq!(wrapped, vec![RenderNode::text("\n")]);
    }

    #[test]
    fn test_single_tight_is_unchanged() {
        let nodes = vec![RenderNode::text("only")];
        assert_eq!(wrap_in_lines(nodes.clone(), false), nodes);
    }
}
