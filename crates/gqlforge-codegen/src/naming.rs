//! Identifier and doc-comment helpers for emitted Rust source.

use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

/// Rust keywords that need r# prefix when used as identifiers.
const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "else", "enum", "extern", "false", "fn", "for", "if",
    "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static",
    "struct", "trait", "true", "type", "unsafe", "use", "where", "while", "async", "await", "dyn",
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "typeof", "unsized",
    "virtual", "yield", "try",
];

/// Keywords that cannot be raw identifiers either.
const RESERVED: &[&str] = &["self", "Self", "super", "crate"];

/// Make a name safe for use as a Rust identifier.
pub fn safe_ident(name: &str) -> Ident {
    if name.is_empty() {
        // Names made only of underscores case-convert to nothing.
        Ident::new("unnamed", Span::call_site())
    } else if RESERVED.contains(&name) {
        Ident::new(&format!("{}_", name), Span::call_site())
    } else if RUST_KEYWORDS.contains(&name) {
        Ident::new_raw(name, Span::call_site())
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        Ident::new(&format!("_{}", name), Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

/// `licensedSince` → `licensed_since`.
pub fn field_ident(name: &str) -> Ident {
    safe_ident(&name.to_snake_case())
}

/// `vehicle_state` / `VehicleState` → `VehicleState`.
pub fn type_ident(name: &str) -> Ident {
    safe_ident(&name.to_upper_camel_case())
}

/// `IN_PROGRESS` → `InProgress`.
pub fn variant_ident(name: &str) -> Ident {
    safe_ident(&name.to_upper_camel_case())
}

/// `#[serde(rename = "...")]` when the Rust ident differs from the wire name.
pub fn serde_rename(ident: &Ident, wire_name: &str) -> TokenStream {
    let rust_name = ident.to_string();
    let rust_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name);
    if rust_name == wire_name {
        TokenStream::new()
    } else {
        quote! { #[serde(rename = #wire_name)] }
    }
}

/// Emit `/// ...` doc comment tokens from an optional description string.
/// Multi-line descriptions produce multiple `/// ` lines.
pub fn doc_comment_tokens(description: &Option<String>) -> TokenStream {
    let Some(desc) = description else {
        return TokenStream::new();
    };
    let sanitized = sanitize_doc(desc);
    let lines: Vec<TokenStream> = sanitized
        .lines()
        .map(|line| {
            let text = format!(" {}", line);
            quote! { #[doc = #text] }
        })
        .collect();
    quote! { #(#lines)* }
}

/// Sanitize a GraphQL description for use as a Rust doc comment.
///
/// - `[Foo]` bracket tags that are not markdown links become `` `Foo` `` so
///   rustdoc does not treat them as intra-doc links.
/// - Bare `https://` URLs are wrapped in angle brackets.
fn sanitize_doc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        if chars[i] == '[' {
            if let Some(close) = chars[i + 1..].iter().position(|&c| c == ']') {
                let close = i + 1 + close;
                let inner: String = chars[i + 1..close].iter().collect();
                let is_md_link = close + 1 < len && chars[close + 1] == '(';
                if !is_md_link && !inner.is_empty() {
                    out.push('`');
                    out.push_str(&inner);
                    out.push('`');
                    i = close + 1;
                    continue;
                }
            }
            out.push('[');
            i += 1;
        } else if chars[i..].starts_with(&['h', 't', 't', 'p', 's', ':', '/', '/']) {
            let already_bracketed = i > 0 && chars[i - 1] == '<';
            let url_end = chars[i..]
                .iter()
                .position(|&c| c.is_whitespace() || matches!(c, ')' | ',' | '>' | '\''))
                .map(|p| i + p)
                .unwrap_or(len);
            let url: String = chars[i..url_end].iter().collect();
            if already_bracketed {
                out.push_str(&url);
            } else {
                out.push('<');
                out.push_str(&url);
                out.push('>');
            }
            i = url_end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}
