//! Python unit extractor.
//!
//! Walks the tree-sitter syntax tree with an explicit stack of
//! `(node, scope)` entries and emits one `ExtractedUnit` per
//! `function_definition` (sync or async) at any depth, in source order.

use std::cell::RefCell;
use std::path::Path;

use tree_sitter::{Node, Parser};

use callscope_core::constants::DEFAULT_MAX_BODY_CHARS;
use callscope_core::errors::ParseError;
use callscope_core::types::collections::{BTreeSet, SmallVec4};

use super::calls::collect_call_identifiers;
use super::scope::ScopeContext;
use super::traits::UnitExtractor;
use super::types::ExtractedUnit;
use crate::scanner::language_detect::Language;

thread_local! {
    static PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

/// Extracts function-level units from Python source.
#[derive(Debug, Clone)]
pub struct PythonExtractor {
    max_body_chars: usize,
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BODY_CHARS)
    }
}

impl PythonExtractor {
    pub fn new(max_body_chars: usize) -> Self {
        Self { max_body_chars }
    }

    pub fn max_body_chars(&self) -> usize {
        self.max_body_chars
    }

    fn extract_tree(&self, root: Node<'_>, text: &str) -> Vec<ExtractedUnit> {
        let source = text.as_bytes();
        let lines: Vec<&str> = text.lines().collect();
        let mut units = Vec::new();
        let mut stack: Vec<(Node<'_>, ScopeContext<'_>)> = vec![(root, ScopeContext::default())];

        while let Some((node, scope)) = stack.pop() {
            let child_scope = match node.kind() {
                "function_definition" => match definition_name(node, source) {
                    Some(name) => {
                        units.push(self.build_unit(node, name, scope, source, &lines));
                        scope.enter_function(name)
                    }
                    None => scope,
                },
                "class_definition" => match definition_name(node, source) {
                    Some(name) => scope.enter_class(name),
                    None => scope,
                },
                _ => scope,
            };

            // Reversed so the next pop is the first child: pre-order, source order.
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, child_scope)));
        }

        units
    }

    fn build_unit(
        &self,
        node: Node<'_>,
        name: &str,
        scope: ScopeContext<'_>,
        source: &[u8],
        lines: &[&str],
    ) -> ExtractedUnit {
        let start_line = node.start_position().row as u32 + 1;
        let end_line = max_end_row(node) as u32 + 1;

        let first = (start_line as usize).saturating_sub(1).min(lines.len());
        let last = (end_line as usize).min(lines.len());
        let body = lines[first..last].join("\n");

        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| positional_parameters(params, source))
            .unwrap_or_default();

        let mut calls = BTreeSet::new();
        collect_call_identifiers(node, source, &mut calls);
        // Decorators sit on the wrapping `decorated_definition`, but their
        // calls belong to the function.
        if let Some(parent) = node.parent().filter(|p| p.kind() == "decorated_definition") {
            let mut cursor = parent.walk();
            for decorator in parent
                .named_children(&mut cursor)
                .filter(|child| child.kind() == "decorator")
            {
                collect_call_identifiers(decorator, source, &mut calls);
            }
        }

        let mut cursor = node.walk();
        let is_async = node.children(&mut cursor).any(|child| child.kind() == "async");

        ExtractedUnit {
            name: name.to_string(),
            parameters,
            start_line,
            end_line,
            body_text: truncate_chars(&body, self.max_body_chars).to_string(),
            class_scope: scope.class.map(str::to_owned),
            enclosing_function: scope.function.map(str::to_owned),
            is_async,
            calls,
        }
    }
}

impl UnitExtractor for PythonExtractor {
    fn extract(&self, source: &[u8], path: &Path) -> Result<Vec<ExtractedUnit>, ParseError> {
        let text = std::str::from_utf8(source).map_err(|_| ParseError::NotUtf8 {
            path: path.to_path_buf(),
        })?;

        let tree = with_parser(|parser| parser.parse(text, None))?.ok_or_else(|| {
            ParseError::NoTree {
                path: path.to_path_buf(),
            }
        })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ParseError::Syntax {
                path: path.to_path_buf(),
                error_nodes: count_errors(root),
            });
        }

        Ok(self.extract_tree(root, text))
    }
}

/// Run `f` with this thread's Python parser, creating it on first use.
fn with_parser<R>(f: impl FnOnce(&mut Parser) -> R) -> Result<R, ParseError> {
    PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let mut parser = Parser::new();
            parser
                .set_language(&Language::Python.ts_language())
                .map_err(|e| ParseError::Grammar {
                    message: e.to_string(),
                })?;
            *slot = Some(parser);
        }
        match slot.as_mut() {
            Some(parser) => Ok(f(parser)),
            None => Err(ParseError::Grammar {
                message: "parser slot empty after initialization".to_string(),
            }),
        }
    })
}

fn definition_name<'src>(node: Node<'_>, source: &'src [u8]) -> Option<&'src str> {
    node.child_by_field_name("name")?.utf8_text(source).ok()
}

/// Largest end row over `node` and all of its descendants.
fn max_end_row(node: Node<'_>) -> usize {
    let mut max_row = node.end_position().row;
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        max_row = max_row.max(current.end_position().row);
        let mut cursor = current.walk();
        stack.extend(current.children(&mut cursor));
    }
    max_row
}

/// Parameter names up to the first `*` / `*args`; `**kwargs` is skipped.
fn positional_parameters(params: Node<'_>, source: &[u8]) -> SmallVec4<String> {
    let mut names = SmallVec4::new();
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        let name_node = match child.kind() {
            "identifier" => Some(child),
            "default_parameter" | "typed_default_parameter" => child.child_by_field_name("name"),
            "typed_parameter" => {
                let mut inner = child.walk();
                let first = child.named_children(&mut inner).next();
                if first.is_some_and(|n| n.kind() == "list_splat_pattern") {
                    break;
                }
                first
            }
            "list_splat_pattern" | "keyword_separator" => break,
            _ => None,
        };
        if let Some(text) = name_node
            .filter(|n| n.kind() == "identifier")
            .and_then(|n| n.utf8_text(source).ok())
        {
            names.push(text.to_string());
        }
    }
    names
}

fn count_errors(root: Node<'_>) -> u32 {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            count += 1;
        }
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }
    count
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn parameters_stop_at_star() {
        let src = "def f(a, b: int, c=1, d: str = 'x', *args, e, **kw):\n    pass\n";
        let units = PythonExtractor::default()
            .extract(src.as_bytes(), Path::new("t.py"))
            .unwrap();
        assert_eq!(units[0].parameters.as_slice(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn bare_star_ends_positional_parameters() {
        let src = "def f(self, x, *, flag=False):\n    pass\n";
        let units = PythonExtractor::default()
            .extract(src.as_bytes(), Path::new("t.py"))
            .unwrap();
        assert_eq!(units[0].parameters.as_slice(), ["self", "x"]);
    }
}
