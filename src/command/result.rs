use serde_json::Value;

/// Outcome tree produced once by a command execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultNode {
    Leaf {
        entity: Option<Value>,
        message: String,
    },
    Composite {
        children: Vec<ResultNode>,
    },
}

impl ResultNode {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Leaf {
            entity: None,
            message: message.into(),
        }
    }

    pub fn entity(entity: Value, message: impl Into<String>) -> Self {
        Self::Leaf {
            entity: Some(entity),
            message: message.into(),
        }
    }

    pub fn composite(children: Vec<ResultNode>) -> Self {
        Self::Composite { children }
    }

    /// True when flattening yields a non-null value, which selects a JSON
    /// response over a plain-text one.
    pub fn has_entity(&self) -> bool {
        match self {
            Self::Leaf { entity, .. } => entity.as_ref().is_some_and(|v| !v.is_null()),
            Self::Composite { .. } => true,
        }
    }
}

/// Leaf entities stay positional (absent becomes `null`); each Composite
/// becomes one JSON array, so nesting survives one level per boundary.
pub fn flatten_entities(node: &ResultNode) -> Value {
    match node {
        ResultNode::Leaf { entity, .. } => entity.clone().unwrap_or(Value::Null),
        ResultNode::Composite { children } => {
            Value::Array(children.iter().map(flatten_entities).collect())
        }
    }
}

pub fn flatten_message(node: &ResultNode) -> String {
    match node {
        ResultNode::Leaf { message, .. } => message.clone(),
        ResultNode::Composite { children } => children
            .iter()
            .map(flatten_message)
            .filter_map(|message| {
                let trimmed = message.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_leaf_entities_are_kept_as_null() {
        let node = ResultNode::composite(vec![
            ResultNode::message("first"),
            ResultNode::entity(json!(2), "second"),
        ]);
        assert_eq!(flatten_entities(&node), json!([null, 2]));
    }

    #[test]
    fn composite_messages_skip_blank_children() {
        let node = ResultNode::composite(vec![
            ResultNode::message("  "),
            ResultNode::message("created"),
            ResultNode::message(""),
            ResultNode::composite(vec![ResultNode::message(" pushed \n")]),
        ]);
        assert_eq!(flatten_message(&node), "created\npushed");
    }

    #[test]
    fn leaf_without_entity_selects_text_body() {
        assert!(!ResultNode::message("done").has_entity());
        assert!(ResultNode::entity(json!({"a": 1}), "").has_entity());
        assert!(ResultNode::composite(Vec::new()).has_entity());
    }
}
