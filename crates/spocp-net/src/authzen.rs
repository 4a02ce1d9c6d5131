//! Translation between the AuthZen 1.0 JSON access-evaluation shape and
//! the canonical S-expression the decision engine actually understands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use spocp_core::Element;

use crate::error::NetError;

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub subject: Entity,
    pub resource: Entity,
    pub action: Action,
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
    #[serde(flatten)]
    pub properties: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(flatten)]
    pub properties: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResponse {
    pub decision: bool,
}

/// `(<resource.type> (id <resource.id>) (action <name> ...) (subject (type
/// ...) (id ...) ...) [(context ...)])`.
pub fn request_to_element(request: &EvaluationRequest) -> Result<Element, NetError> {
    let mut resource_positions = vec![
        Element::list("id", vec![Element::atom(request.resource.id.clone())]),
        action_to_element(&request.action),
        subject_to_element(&request.subject),
    ];
    for (key, value) in &request.resource.properties {
        resource_positions.push(property_to_element(key, value)?);
    }
    if let Some(context) = &request.context {
        resource_positions.push(value_to_element("context", context)?);
    }
    Ok(Element::list(request.resource.type_.clone(), resource_positions))
}

fn action_to_element(action: &Action) -> Element {
    let mut positions = vec![Element::atom(action.name.clone())];
    for (key, value) in &action.properties {
        if let Ok(element) = property_to_element(key, value) {
            positions.push(element);
        }
    }
    Element::list("action", positions)
}

fn subject_to_element(subject: &Entity) -> Element {
    let mut positions = vec![
        Element::list("type", vec![Element::atom(subject.type_.clone())]),
        Element::list("id", vec![Element::atom(subject.id.clone())]),
    ];
    for (key, value) in &subject.properties {
        if let Ok(element) = property_to_element(key, value) {
            positions.push(element);
        }
    }
    Element::list("subject", positions)
}

fn property_to_element(key: &str, value: &Value) -> Result<Element, NetError> {
    value_to_element(key, value)
}

fn value_to_element(key: &str, value: &Value) -> Result<Element, NetError> {
    match value {
        Value::String(s) => Ok(Element::list(key, vec![Element::atom(s.clone())])),
        Value::Bool(b) => Ok(Element::list(key, vec![Element::atom(b.to_string())])),
        Value::Number(n) => Ok(Element::list(key, vec![Element::atom(n.to_string())])),
        Value::Null => Ok(Element::list(key, vec![])),
        Value::Object(map) => {
            let mut positions = Vec::with_capacity(map.len());
            for (child_key, child_value) in map {
                positions.push(value_to_element(child_key, child_value)?);
            }
            Ok(Element::list(key, positions))
        }
        Value::Array(_) => Err(NetError::MalformedAuthzen(format!(
            "property `{key}` is an array, which has no canonical-form representation"
        ))),
    }
}
