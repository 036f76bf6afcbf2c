//! Call-expression identifiers.
//!
//! `foo()` → `foo`, `a.b.c()` → `a.b.c`. When an attribute chain bottoms out
//! in something other than a name (`make().run()`), the attribute names
//! collected so far are still joined (`run`). Subscripts, lambdas and other
//! computed targets produce nothing.

use tree_sitter::Node;

use callscope_core::constants::QUALIFIED_NAME_SEPARATOR;
use callscope_core::types::collections::{BTreeSet, SmallVec4};

/// Collect the identifier of every `call` node under `root` (inclusive).
/// Explicit stack, so deeply nested source can't overflow.
pub fn collect_call_identifiers(root: Node<'_>, source: &[u8], out: &mut BTreeSet<String>) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == "call" {
            if let Some(id) = call_identifier(node, source) {
                out.insert(id);
            }
        }
        let mut cursor = node.walk();
        stack.extend(node.named_children(&mut cursor));
    }
}

/// Identifier for a single `call` node, if its target has a supported shape.
pub fn call_identifier(call: Node<'_>, source: &[u8]) -> Option<String> {
    let target = strip_parens(call.child_by_field_name("function")?);
    match target.kind() {
        "identifier" => target.utf8_text(source).ok().map(str::to_owned),
        "attribute" => attribute_chain(target, source),
        _ => None,
    }
}

fn attribute_chain(node: Node<'_>, source: &[u8]) -> Option<String> {
    let mut parts: SmallVec4<&str> = SmallVec4::new();
    let mut current = node;
    while current.kind() == "attribute" {
        let attr = current.child_by_field_name("attribute")?;
        parts.push(attr.utf8_text(source).ok()?);
        current = strip_parens(current.child_by_field_name("object")?);
    }
    if current.kind() == "identifier" {
        parts.push(current.utf8_text(source).ok()?);
    }
    parts.reverse();
    let sep = QUALIFIED_NAME_SEPARATOR.to_string();
    Some(parts.join(&sep))
}

/// `(expr)` is the same target as `expr`.
fn strip_parens(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        let mut cursor = node.walk();
        let inner = node
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");
        match inner {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}
