use cmdhost::command::{flatten_entities, flatten_message, ResultNode};
use serde_json::json;

#[test]
fn sibling_leaves_flatten_in_order() {
    let result = ResultNode::composite(vec![
        ResultNode::entity(json!("A"), "a"),
        ResultNode::entity(json!("B"), "b"),
    ]);
    assert_eq!(flatten_entities(&result), json!(["A", "B"]));
}

#[test]
fn nested_composites_keep_one_level_per_boundary() {
    let result = ResultNode::composite(vec![
        ResultNode::composite(vec![ResultNode::entity(json!("A"), "a")]),
        ResultNode::entity(json!("B"), "b"),
    ]);
    assert_eq!(flatten_entities(&result), json!([["A"], "B"]));
}

#[test]
fn leaves_without_entities_flatten_to_null() {
    let result = ResultNode::composite(vec![
        ResultNode::message("no entity"),
        ResultNode::entity(json!({"id": 1}), "with entity"),
    ]);
    assert_eq!(flatten_entities(&result), json!([null, {"id": 1}]));
    assert!(!ResultNode::message("plain").has_entity());
    assert!(result.has_entity());
}

#[test]
fn singleton_rewrap_leaves_message_unchanged() {
    let leaf = ResultNode::message("Created README.md");
    let wrapped = ResultNode::composite(vec![leaf.clone()]);
    assert_eq!(flatten_message(&wrapped), flatten_message(&leaf));
    let twice = ResultNode::composite(vec![wrapped]);
    assert_eq!(flatten_message(&twice), "Created README.md");
}

#[test]
fn blank_messages_contribute_nothing() {
    let result = ResultNode::composite(vec![
        ResultNode::message("first"),
        ResultNode::message("   "),
        ResultNode::composite(vec![ResultNode::message("")]),
        ResultNode::message("second"),
    ]);
    assert_eq!(flatten_message(&result), "first\nsecond");
}
