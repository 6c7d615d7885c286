//! Shared fixtures and lookups over raw JSON responses for this crate's tests.

use serde_json::Value;

use super::introspection::{IntrospectionQuery, IntrospectionSchema};

pub(crate) const INTROSPECTION_JSON: &str = include_str!("../../fixture/introspection_query.json");

/// The fixture as a bare `{ "__schema": ... }` response.
pub(crate) fn fixture_response() -> Value {
    serde_json::from_str(INTROSPECTION_JSON).unwrap()
}

/// The fixture wrapped in a `{ "data": ... }` envelope.
pub(crate) fn fixture_data_response() -> Value {
    serde_json::json!({ "data": fixture_response() })
}

pub(crate) fn fixture_schema() -> IntrospectionSchema {
    let query: IntrospectionQuery = serde_json::from_str(INTROSPECTION_JSON).unwrap();
    query.schema
}

pub(crate) fn find_type<'a>(response: &'a Value, kind: &str, name: &str) -> Option<&'a Value> {
    let schema = response.get("data").unwrap_or(response).get("__schema")?;
    schema["types"]
        .as_array()?
        .iter()
        .find(|schema_type| schema_type["kind"] == kind && schema_type["name"] == name)
}

pub(crate) fn find_field<'a>(
    response: &'a Value,
    type_kind: &str,
    type_name: &str,
    field_name: &str,
) -> Option<&'a Value> {
    find_type(response, type_kind, type_name)?["fields"]
        .as_array()?
        .iter()
        .find(|field| field["name"] == field_name)
}

pub(crate) fn find_arg<'a>(
    response: &'a Value,
    type_kind: &str,
    type_name: &str,
    field_name: &str,
    arg_name: &str,
) -> Option<&'a Value> {
    find_field(response, type_kind, type_name, field_name)?["args"]
        .as_array()?
        .iter()
        .find(|arg| arg["name"] == arg_name)
}

pub(crate) fn find_input_field<'a>(
    response: &'a Value,
    type_name: &str,
    input_field_name: &str,
) -> Option<&'a Value> {
    find_type(response, "INPUT_OBJECT", type_name)?["inputFields"]
        .as_array()?
        .iter()
        .find(|input_field| input_field["name"] == input_field_name)
}

pub(crate) fn type_names(response: &Value) -> Vec<String> {
    let schema = response.get("data").unwrap_or(response);
    schema["__schema"]["types"]
        .as_array()
        .map(|types| {
            types
                .iter()
                .filter_map(|schema_type| schema_type["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
