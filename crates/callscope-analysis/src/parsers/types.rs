//! Extraction output.

use serde::{Deserialize, Serialize};

use callscope_core::types::collections::{BTreeSet, SmallVec4};

/// A function-like definition found in one file, before it is given a
/// qualified name and placed in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedUnit {
    pub name: String,
    /// Positional parameter names in declaration order.
    pub parameters: SmallVec4<String>,
    /// 1-based line of the `def` keyword (decorators excluded).
    pub start_line: u32,
    /// 1-based last line of the definition, including nested bodies.
    pub end_line: u32,
    /// Source lines `start_line..=end_line`, cut to the configured budget.
    pub body_text: String,
    /// Innermost enclosing class, if any.
    pub class_scope: Option<String>,
    /// Innermost enclosing function, if any. Diagnostic only.
    pub enclosing_function: Option<String>,
    pub is_async: bool,
    /// Raw call identifiers seen anywhere in the definition's subtree.
    pub calls: BTreeSet<String>,
}
