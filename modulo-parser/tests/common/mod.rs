//! Shared helpers for parser integration tests

use modulo_parser::{NodeId, SyntaxTree};

/// Renders a subtree as `(Kind:lexeme child ...)` for structural asserts.
pub fn render(tree: &SyntaxTree, source: &str, id: NodeId) -> String {
    let node = tree.get(id);
    let mut out = format!("({}", node.kind);
    if let Some(text) = node.text(source) {
        out.push(':');
        out.push_str(text);
    }
    for child in tree.children(id) {
        out.push(' ');
        out.push_str(&render(tree, source, child));
    }
    out.push(')');
    out
}

/// Parses `source` with default limits and renders the whole tree.
pub fn shape(source: &str) -> String {
    let tree = modulo_parser::parse_source(source)
        .unwrap_or_else(|err| panic!("failed to parse {:?}: {}", source, err));
    tree.validate().expect("parsed tree is well formed");
    render(&tree, source, tree.root())
}
