//! Token-at-position lookup.
//!
//! Nodes have no parent links, so the lookup returns whole root-to-leaf
//! chains. The walk is guided by the significant range `pos..=end` of each
//! node. An offset on the boundary between two tokens belongs to both:
//! `chain_at_pos` ends at the later one, `chain_before_pos` at the earlier
//! one. An offset in leading trivia is contained by no token, so the "at"
//! chain stops at the deepest composite spanning it.

use crate::syntax::Node;
use std::ptr;

/// Result of [`find_token_at_pos`].
#[derive(Debug, Clone)]
pub struct TokenAtPos<'a> {
    /// Chain to the last token starting before the offset, when that is a
    /// different node than the end of `chain_at_pos`.
    pub chain_before_pos: Option<Vec<&'a Node>>,
    /// Chain to the deepest node containing the offset. Never empty.
    pub chain_at_pos: Vec<&'a Node>,
    /// Common prefix of both chains, root first. Without a before chain
    /// these are the ancestors of the node at the offset.
    pub shared_parents: Vec<&'a Node>,
}

impl<'a> TokenAtPos<'a> {
    /// The deepest node at the offset. A composite when the offset is in trivia.
    pub fn token_at(&self) -> &'a Node {
        self.chain_at_pos[self.chain_at_pos.len() - 1]
    }

    pub fn token_before(&self) -> Option<&'a Node> {
        self.chain_before_pos.as_ref()?.last().copied()
    }

    /// The innermost common ancestor.
    pub fn shared_parent(&self) -> Option<&'a Node> {
        self.shared_parents.last().copied()
    }
}

/// Find the tokens at `offset` in the tree under `root`.
///
/// Returns `None` when the tree spans nothing or `offset` lies outside it.
pub fn find_token_at_pos(root: &Node, offset: usize) -> Option<TokenAtPos<'_>> {
    if root.start == root.end || offset < root.start || offset > root.end {
        return None;
    }

    let chain_at_pos = descend(root, |child| child.contains(offset));
    let chain_before_pos = Some(descend(root, |child| child.pos < offset))
        .filter(|chain| chain.len() > 1)
        .filter(|chain| !ptr::eq(chain[chain.len() - 1], chain_at_pos[chain_at_pos.len() - 1]));

    let shared_parents = match &chain_before_pos {
        Some(before) => before
            .iter()
            .zip(&chain_at_pos)
            .take_while(|(a, b)| ptr::eq(**a, **b))
            .map(|(a, _)| *a)
            .collect(),
        None => chain_at_pos[..chain_at_pos.len() - 1].to_vec(),
    };

    Some(TokenAtPos {
        chain_before_pos,
        chain_at_pos,
        shared_parents,
    })
}

/// Walk down from `root`, taking the last child accepted by `pick` at each
/// level. Children are in source order, so ties go to the later node.
fn descend<'a>(root: &'a Node, pick: impl Fn(&Node) -> bool) -> Vec<&'a Node> {
    let mut chain = vec![root];
    let mut node = root;
    while let Some(child) = node.children.iter().rev().find(|c| pick(c)) {
        chain.push(child);
        node = child;
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;
    use xmlui_lexer::SyntaxKind;

    fn kinds(chain: &[&Node]) -> Vec<SyntaxKind> {
        chain.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_inside_string_literal() {
        let source = "<A b=\"c\"/>";
        let result = parse(source);
        let found = find_token_at_pos(&result.node, 7).unwrap();

        let token = found.token_at();
        assert_eq!(token.kind, SyntaxKind::StringLiteral);
        assert_eq!((token.pos, token.end), (5, 8));
        assert_eq!(
            kinds(&found.chain_at_pos),
            vec![
                SyntaxKind::ContentListNode,
                SyntaxKind::ElementNode,
                SyntaxKind::AttributeListNode,
                SyntaxKind::AttributeNode,
                SyntaxKind::StringLiteral,
            ]
        );
        assert!(found.chain_before_pos.is_none());
        assert_eq!(found.shared_parents.len(), 4);
    }

    #[test]
    fn test_boundary_between_tokens() {
        let source = "<A b=\"c\"/>";
        let result = parse(source);
        let found = find_token_at_pos(&result.node, 8).unwrap();

        assert_eq!(found.token_at().kind, SyntaxKind::NodeClose);
        assert_eq!(found.token_before().map(|n| n.kind), Some(SyntaxKind::StringLiteral));
        assert_eq!(
            kinds(&found.shared_parents),
            vec![SyntaxKind::ContentListNode, SyntaxKind::ElementNode]
        );
        assert_eq!(found.shared_parent().map(|n| n.kind), Some(SyntaxKind::ElementNode));
    }

    #[test]
    fn test_offset_in_leading_trivia() {
        let source = "<A  b='1'/>";
        let result = parse(source);
        // the whitespace is trivia of `b`, which does not contain it
        let found = find_token_at_pos(&result.node, 3).unwrap();
        assert_eq!(
            kinds(&found.chain_at_pos),
            vec![SyntaxKind::ContentListNode, SyntaxKind::ElementNode]
        );
        let before = found.token_before().unwrap();
        assert_eq!(before.kind, SyntaxKind::Identifier);
        assert_eq!((before.pos, before.end), (1, 2));
        assert_eq!(found.shared_parent().map(|n| n.kind), Some(SyntaxKind::ElementNode));
    }

    #[test]
    fn test_trivia_between_tokens_of_different_parents() {
        let source = "<A>\n  <B/></A>";
        let result = parse(source);

        let found = find_token_at_pos(&result.node, 4).unwrap();
        assert_eq!(found.token_at().kind, SyntaxKind::ElementNode);
        assert_eq!(found.token_at().pos, 0);
        let before = found.token_before().unwrap();
        assert_eq!(before.kind, SyntaxKind::NodeEnd);
        assert_eq!((before.pos, before.end), (2, 3));

        // at the `<` of B the chains end under different parents
        let found = find_token_at_pos(&result.node, 6).unwrap();
        assert_eq!(found.token_at().kind, SyntaxKind::OpenNodeStart);
        assert_eq!(
            kinds(&found.chain_at_pos),
            vec![
                SyntaxKind::ContentListNode,
                SyntaxKind::ElementNode,
                SyntaxKind::ContentListNode,
                SyntaxKind::ElementNode,
                SyntaxKind::OpenNodeStart,
            ]
        );
        assert_eq!(found.token_before().map(|n| (n.kind, n.end)), Some((SyntaxKind::NodeEnd, 3)));
        assert_eq!(
            kinds(&found.shared_parents),
            vec![SyntaxKind::ContentListNode, SyntaxKind::ElementNode]
        );
    }

    #[test]
    fn test_offset_in_document_leading_trivia() {
        let result = parse("  <A/>");
        let found = find_token_at_pos(&result.node, 1).unwrap();
        assert_eq!(kinds(&found.chain_at_pos), vec![SyntaxKind::ContentListNode]);
        assert!(found.chain_before_pos.is_none());
        assert!(found.shared_parents.is_empty());
    }

    #[test]
    fn test_at_node_contains_offset() {
        let source = "<A b='1'>\n  text <!-- c --> <C/>\n</A>";
        let result = parse(source);
        for offset in 0..=source.len() {
            let found = find_token_at_pos(&result.node, offset).unwrap();
            let at = found.token_at();
            assert!(at.contains(offset) || found.chain_at_pos.len() == 1, "offset {offset}");
            if let Some(before) = found.token_before() {
                assert!(before.is_token());
                assert!(before.pos < offset);
            }
        }
    }

    #[test]
    fn test_offset_at_document_end() {
        let source = "<A/>";
        let result = parse(source);
        let found = find_token_at_pos(&result.node, 4).unwrap();
        assert_eq!(found.token_at().kind, SyntaxKind::EndOfFile);
        assert_eq!(found.token_before().map(|n| n.kind), Some(SyntaxKind::NodeClose));
    }

    #[test]
    fn test_offset_at_document_start() {
        let result = parse("<A/>");
        let found = find_token_at_pos(&result.node, 0).unwrap();
        assert_eq!(found.token_at().kind, SyntaxKind::OpenNodeStart);
        assert!(found.chain_before_pos.is_none());
    }

    #[test]
    fn test_empty_document() {
        let result = parse("");
        assert!(find_token_at_pos(&result.node, 0).is_none());
    }

    #[test]
    fn test_out_of_range() {
        let result = parse("<A/>");
        assert!(find_token_at_pos(&result.node, 5).is_none());
    }

    #[test]
    fn test_inside_text_node() {
        let source = "<A>hello</A>";
        let result = parse(source);
        let found = find_token_at_pos(&result.node, 5).unwrap();
        assert_eq!(found.token_at().kind, SyntaxKind::TextNode);
        assert_eq!(found.token_at().text(source, true), "hello");
    }
}
