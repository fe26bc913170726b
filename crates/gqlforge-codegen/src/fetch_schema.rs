//! Fetch a schema over introspection and render it as SDL.

use anyhow::{bail, Context, Result};
use serde_json::Value;

const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    types {
      kind
      name
      description
      fields(includeDeprecated: true) {
        name
        description
        args {
          name
          description
          type { ...TypeRef }
          defaultValue
        }
        type { ...TypeRef }
        isDeprecated
        deprecationReason
      }
      inputFields {
        name
        description
        type { ...TypeRef }
        defaultValue
      }
      interfaces { ...TypeRef }
      enumValues(includeDeprecated: true) {
        name
        description
        isDeprecated
        deprecationReason
      }
      possibleTypes { ...TypeRef }
    }
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
            }
          }
        }
      }
    }
  }
}
"#;

/// Run the introspection query against `endpoint` and return SDL.
pub fn fetch_and_convert(endpoint: &str, token: Option<&str>) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("gqlforge-codegen/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;
    let body = serde_json::json!({ "query": INTROSPECTION_QUERY });

    tracing::info!(%endpoint, "fetching schema");
    let mut request = client.post(endpoint).json(&body);
    if let Some(token) = token {
        request = request.header("Authorization", format!("Token {}", token));
    }
    let response = request
        .send()
        .with_context(|| format!("introspection request to {} failed", endpoint))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().unwrap_or_default();
        bail!("HTTP {}: {}", status, text);
    }

    let json: Value = response.json().context("response is not JSON")?;
    if let Some(errors) = json["errors"].as_array().filter(|e| !e.is_empty()) {
        let messages: Vec<&str> = errors.iter().filter_map(|e| e["message"].as_str()).collect();
        bail!("introspection failed: {}", messages.join("; "));
    }

    let schema = &json["data"]["__schema"];
    if schema.is_null() {
        bail!("no __schema in response");
    }

    Ok(introspection_to_sdl(schema))
}

pub fn introspection_to_sdl(schema: &Value) -> String {
    let mut sdl = String::new();
    emit_schema_block(&mut sdl, schema);

    let empty = Vec::new();
    let types = schema["types"].as_array().unwrap_or(&empty);

    // Sort by kind then name for stable output.
    let mut user_types: Vec<&Value> = types
        .iter()
        .filter(|t| !t["name"].as_str().unwrap_or("").starts_with("__"))
        .collect();
    user_types.sort_by_key(|t| {
        (
            kind_order(t["kind"].as_str().unwrap_or("")),
            t["name"].as_str().unwrap_or("").to_string(),
        )
    });

    for ty in user_types {
        let name = ty["name"].as_str().unwrap_or("");
        match ty["kind"].as_str().unwrap_or("") {
            "SCALAR" => {
                if matches!(name, "String" | "Int" | "Float" | "Boolean" | "ID") {
                    continue;
                }
                emit_description(&mut sdl, ty, "");
                sdl.push_str(&format!("scalar {}\n\n", name));
            }
            "ENUM" => {
                emit_description(&mut sdl, ty, "");
                sdl.push_str(&format!("enum {} {{\n", name));
                for value in ty["enumValues"].as_array().into_iter().flatten() {
                    emit_description(&mut sdl, value, "  ");
                    sdl.push_str(&format!("  {}", value["name"].as_str().unwrap_or("")));
                    emit_deprecated(&mut sdl, value);
                    sdl.push('\n');
                }
                sdl.push_str("}\n\n");
            }
            "INPUT_OBJECT" => {
                emit_description(&mut sdl, ty, "");
                sdl.push_str(&format!("input {} {{\n", name));
                for field in ty["inputFields"].as_array().into_iter().flatten() {
                    emit_description(&mut sdl, field, "  ");
                    sdl.push_str(&format!(
                        "  {}: {}",
                        field["name"].as_str().unwrap_or(""),
                        render_type_ref(&field["type"])
                    ));
                    emit_default(&mut sdl, field);
                    sdl.push('\n');
                }
                sdl.push_str("}\n\n");
            }
            kind @ ("OBJECT" | "INTERFACE") => {
                let keyword = if kind == "OBJECT" { "type" } else { "interface" };
                emit_description(&mut sdl, ty, "");
                sdl.push_str(&format!("{} {}", keyword, name));
                emit_interfaces(&mut sdl, ty);
                sdl.push_str(" {\n");
                emit_fields(&mut sdl, ty);
                sdl.push_str("}\n\n");
            }
            "UNION" => {
                emit_description(&mut sdl, ty, "");
                let members: Vec<&str> = ty["possibleTypes"]
                    .as_array()
                    .map(|arr| arr.iter().filter_map(|t| t["name"].as_str()).collect())
                    .unwrap_or_default();
                sdl.push_str(&format!("union {} = {}\n\n", name, members.join(" | ")));
            }
            other => tracing::debug!(kind = other, %name, "skipping introspected type"),
        }
    }

    sdl
}

/// `schema { ... }` only when the roots are not the conventional names.
fn emit_schema_block(sdl: &mut String, schema: &Value) {
    let query = schema["queryType"]["name"].as_str();
    let mutation = schema["mutationType"]["name"].as_str();
    let custom_query = query.is_some_and(|q| q != "Query");
    let custom_mutation = mutation.is_some_and(|m| m != "Mutation");
    if !custom_query && !custom_mutation {
        return;
    }
    sdl.push_str("schema {\n");
    if let Some(query) = query {
        sdl.push_str(&format!("  query: {}\n", query));
    }
    if let Some(mutation) = mutation {
        sdl.push_str(&format!("  mutation: {}\n", mutation));
    }
    sdl.push_str("}\n\n");
}

fn kind_order(kind: &str) -> u8 {
    match kind {
        "SCALAR" => 0,
        "ENUM" => 1,
        "INPUT_OBJECT" => 2,
        "INTERFACE" => 3,
        "OBJECT" => 4,
        "UNION" => 5,
        _ => 6,
    }
}

fn emit_description(sdl: &mut String, val: &Value, indent: &str) {
    let Some(desc) = val["description"].as_str().filter(|d| !d.is_empty()) else {
        return;
    };
    if desc.contains('\n') {
        sdl.push_str(&format!(
            "{}\"\"\"{}\"\"\"\n",
            indent,
            desc.replace("\"\"\"", "\\\"\"\"")
        ));
    } else {
        sdl.push_str(&format!("{}\"{}\" ", indent, escape_string(desc)));
    }
}

/// Body of a single-line SDL string literal.
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn emit_deprecated(sdl: &mut String, val: &Value) {
    if val["isDeprecated"].as_bool() != Some(true) {
        return;
    }
    match val["deprecationReason"].as_str() {
        Some(reason) => sdl.push_str(&format!(
            " @deprecated(reason: \"{}\")",
            escape_string(reason)
        )),
        None => sdl.push_str(" @deprecated"),
    }
}

fn emit_default(sdl: &mut String, val: &Value) {
    if let Some(dv) = val["defaultValue"].as_str().filter(|d| !d.is_empty()) {
        sdl.push_str(&format!(" = {}", dv));
    }
}

fn emit_interfaces(sdl: &mut String, ty: &Value) {
    let names: Vec<&str> = ty["interfaces"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|i| i["name"].as_str())
        .collect();
    if !names.is_empty() {
        sdl.push_str(&format!(" implements {}", names.join(" & ")));
    }
}

fn emit_fields(sdl: &mut String, ty: &Value) {
    for field in ty["fields"].as_array().into_iter().flatten() {
        emit_description(sdl, field, "  ");
        let name = field["name"].as_str().unwrap_or("");
        let ftype = render_type_ref(&field["type"]);
        let args: Vec<String> = field["args"]
            .as_array()
            .into_iter()
            .flatten()
            .map(|arg| {
                let mut rendered = format!(
                    "{}: {}",
                    arg["name"].as_str().unwrap_or(""),
                    render_type_ref(&arg["type"])
                );
                emit_default(&mut rendered, arg);
                rendered
            })
            .collect();
        if args.is_empty() {
            sdl.push_str(&format!("  {}: {}", name, ftype));
        } else {
            sdl.push_str(&format!("  {}({}): {}", name, args.join(", "), ftype));
        }
        emit_deprecated(sdl, field);
        sdl.push('\n');
    }
}

fn render_type_ref(ty: &Value) -> String {
    match ty["kind"].as_str() {
        Some("NON_NULL") => format!("{}!", render_type_ref(&ty["ofType"])),
        Some("LIST") => format!("[{}]", render_type_ref(&ty["ofType"])),
        _ => ty["name"].as_str().unwrap_or("Unknown").to_string(),
    }
}
