//! Scope context carried through the syntax-tree walk.
//!
//! Each worklist entry owns an immutable copy; entering a class or function
//! produces a new context for that node's children only.

/// Innermost class and function enclosing a syntax node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeContext<'src> {
    pub class: Option<&'src str>,
    pub function: Option<&'src str>,
}

impl<'src> ScopeContext<'src> {
    /// Context for the body of class `name`. Nested classes keep only the
    /// innermost class name.
    pub fn enter_class(self, name: &'src str) -> Self {
        Self {
            class: Some(name),
            ..self
        }
    }

    /// Context for the body of function `name`.
    pub fn enter_function(self, name: &'src str) -> Self {
        Self {
            function: Some(name),
            ..self
        }
    }
}
