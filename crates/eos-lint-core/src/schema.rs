//! Block definitions and the structural query built from them.

/// Declares a lintable block kind and the labels it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDefinition {
    /// Block type keyword (e.g., `"resource"`).
    pub kind: String,
    /// Names of the positional labels, in order.
    pub label_names: Vec<String>,
    /// Alternate token treated as equivalent to `kind` when looking for echoes.
    pub synonym: Option<String>,
}

impl BlockDefinition {
    /// Creates a definition without a synonym.
    #[must_use]
    pub fn new(kind: impl Into<String>, label_names: &[&str]) -> Self {
        Self {
            kind: kind.into(),
            label_names: label_names.iter().map(|s| (*s).to_string()).collect(),
            synonym: None,
        }
    }

    /// Sets the synonym for this definition.
    #[must_use]
    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonym = Some(synonym.into());
        self
    }
}

/// The block kinds every naming rule inspects.
///
/// Order follows the usual layout of a module and has no effect on matching.
#[must_use]
pub fn lintable_blocks() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new("variable", &["name"]),
        BlockDefinition::new("check", &["name"]),
        BlockDefinition::new("data", &["type", "name"]),
        BlockDefinition::new("ephemeral", &["type", "name"]),
        BlockDefinition::new("module", &["name"]),
        BlockDefinition::new("output", &["name"]),
        BlockDefinition::new("resource", &["type", "name"]),
    ]
}

/// Requests blocks of one kind with an exact label count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSchema {
    /// Block type keyword.
    pub kind: String,
    /// Expected label names.
    pub label_names: Vec<String>,
}

/// A structural query over the top level of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySchema {
    /// Requested block kinds.
    pub blocks: Vec<BlockSchema>,
}

impl BodySchema {
    /// Returns the schema for a block kind, if requested.
    #[must_use]
    pub fn find(&self, kind: &str) -> Option<&BlockSchema> {
        self.blocks.iter().find(|b| b.kind == kind)
    }

    /// Returns true if the query matches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Builds the structural query for a list of block definitions.
#[must_use]
pub fn build_block_schemas(definitions: &[BlockDefinition]) -> BodySchema {
    BodySchema {
        blocks: definitions
            .iter()
            .map(|def| BlockSchema {
                kind: def.kind.clone(),
                label_names: def.label_names.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mirrors_definitions() {
        let schema = build_block_schemas(&lintable_blocks());
        assert_eq!(schema.blocks.len(), 7);
        assert_eq!(schema.blocks[0].kind, "variable");
        assert_eq!(schema.find("resource").map(|b| b.label_names.len()), Some(2));
        assert_eq!(schema.find("output").map(|b| b.label_names.len()), Some(1));
        assert!(schema.find("locals").is_none());
    }

    #[test]
    fn empty_definitions_match_nothing() {
        assert!(build_block_schemas(&[]).is_empty());
    }

    #[test]
    fn synonym_is_optional() {
        let def = BlockDefinition::new("resource", &["type", "name"]).with_synonym("res");
        assert_eq!(def.synonym.as_deref(), Some("res"));
        assert!(lintable_blocks().iter().all(|d| d.synonym.is_none()));
    }
}
