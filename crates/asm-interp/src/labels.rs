//! Label table: label name → statement index.
//!
//! Built once from the statement list before execution starts and never
//! mutated afterwards. A label resolves to the index of its own declaration;
//! declarations are no-ops, so a jump continues at the next instruction.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::error::{InterpError, Span};
use crate::ir::Statement;

/// A label declaration tracking where it sits in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LabelDef {
    index: usize,
    span: Span,
}

/// Resolved label declarations of one program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: BTreeMap<String, LabelDef>,
}

impl LabelTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `statements` and record every label declaration.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::DuplicateLabel`] if a name is declared twice.
    pub fn build(statements: &[Statement]) -> Result<Self, InterpError> {
        let mut table = Self::new();
        for (index, stmt) in statements.iter().enumerate() {
            if let Statement::Label { name, span } = stmt {
                table.define(name, index, *span)?;
            }
        }
        Ok(table)
    }

    /// Record a declaration of `name` at statement `index`.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::DuplicateLabel`] if `name` is already defined.
    pub fn define(&mut self, name: &str, index: usize, span: Span) -> Result<(), InterpError> {
        if let Some(existing) = self.labels.get(name) {
            return Err(InterpError::DuplicateLabel {
                label: String::from(name),
                span,
                first_span: existing.span,
            });
        }
        self.labels
            .insert(String::from(name), LabelDef { index, span });
        Ok(())
    }

    /// Statement index of `name`, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.labels.get(name).map(|def| def.index)
    }

    /// Resolve a jump or call target.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::UndefinedLabel`] pointing at `span` (the
    /// referencing instruction) if `name` is not declared.
    pub fn resolve(&self, name: &str, span: Span) -> Result<usize, InterpError> {
        self.get(name).ok_or_else(|| InterpError::UndefinedLabel {
            label: String::from(name),
            span,
        })
    }

    /// Iterate over `(name, index)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.labels.iter().map(|(name, def)| (name.as_str(), def.index))
    }

    /// Number of declared labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no labels are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;
    use alloc::vec::Vec;

    fn span() -> Span {
        Span::new(1, 1)
    }

    #[test]
    fn records_declaration_indices() {
        let stmts = parse_program("call f\nend\nf:\n  ret\ng:\n").unwrap();
        let table = LabelTable::build(&stmts).unwrap();
        assert_eq!(table.get("f"), Some(2));
        assert_eq!(table.get("g"), Some(4));
        assert_eq!(table.get("h"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn duplicate_label_error() {
        let mut table = LabelTable::new();
        table.define("foo", 0, Span::new(1, 1)).unwrap();
        let err = table.define("foo", 3, Span::new(4, 1)).unwrap_err();
        assert_eq!(
            err,
            InterpError::DuplicateLabel {
                label: "foo".into(),
                span: Span::new(4, 1),
                first_span: Span::new(1, 1),
            }
        );
    }

    #[test]
    fn duplicate_label_in_program() {
        let stmts = parse_program("a:\nret\na:\n").unwrap();
        assert!(matches!(
            LabelTable::build(&stmts),
            Err(InterpError::DuplicateLabel { .. })
        ));
    }

    #[test]
    fn undefined_label_error() {
        let table = LabelTable::new();
        let err = table.resolve("nowhere", span()).unwrap_err();
        assert!(matches!(err, InterpError::UndefinedLabel { ref label, .. } if label == "nowhere"));
    }

    #[test]
    fn labels_are_case_sensitive() {
        let mut table = LabelTable::new();
        table.define("Loop", 0, span()).unwrap();
        table.define("loop", 1, span()).unwrap();
        let names: Vec<_> = table.iter().collect();
        assert_eq!(names, [("Loop", 0), ("loop", 1)]);
    }
}
