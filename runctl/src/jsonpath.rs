//! `kubectl`-style JSONPath templates, as used by `-o jsonpath=...`.
//!
//! A template mixes literal text with `{...}` expressions. An expression is
//! a path like `{.metadata.name}`, a quoted string like `{"\n"}`, or a
//! `{range .items[*]}...{end}` block which renders its body once per match.
//! Paths are evaluated by [`serde_json_path`].

use runctl_common::prelude::*;
use serde_json_path::JsonPath;
use std::{mem, vec::IntoIter};

/// A parsed template.
pub struct JsonPathTemplate {
    segments: Vec<Segment>,
}

enum Segment {
    Text(String),
    Path(JsonPath),
    Range(JsonPath, Vec<Segment>),
}

enum Token {
    Text(String),
    Expr(String),
}

impl JsonPathTemplate {
    /// Parse `template`.
    pub fn parse(template: &str) -> Result<JsonPathTemplate> {
        let mut tokens = tokenize(template)?.into_iter();
        let segments = parse_segments(&mut tokens, false)
            .with_context(|| format!("could not parse jsonpath template {:?}", template))?;
        Ok(JsonPathTemplate { segments })
    }

    /// Render the template against `value`.
    pub fn render(&self, value: &Value) -> String {
        let mut out = String::new();
        render_segments(&self.segments, value, &mut out);
        out
    }
}

/// Split `template` into literal text and the contents of `{...}`.
fn tokenize(template: &str) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    let mut text = String::new();
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '{' {
            text.push(c);
            continue;
        }
        if !text.is_empty() {
            tokens.push(Token::Text(mem::take(&mut text)));
        }

        // Braces inside quoted strings don't end the expression.
        let mut expr = String::new();
        let mut in_quotes = false;
        let mut escaped = false;
        let mut closed = false;
        for c in chars.by_ref() {
            if in_quotes {
                expr.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_quotes = false;
                }
                continue;
            }
            match c {
                '"' => {
                    in_quotes = true;
                    expr.push(c);
                }
                '}' => {
                    closed = true;
                    break;
                }
                _ => expr.push(c),
            }
        }
        if !closed {
            return Err(format_err!("unclosed `{{` in jsonpath template"));
        }
        tokens.push(Token::Expr(expr.trim().to_owned()));
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    Ok(tokens)
}

/// Build segments from `tokens`, stopping at `{end}` inside a range.
fn parse_segments(tokens: &mut IntoIter<Token>, in_range: bool) -> Result<Vec<Segment>> {
    let mut segments = vec![];
    while let Some(token) = tokens.next() {
        let expr = match token {
            Token::Text(text) => {
                segments.push(Segment::Text(text));
                continue;
            }
            Token::Expr(expr) => expr,
        };
        if expr == "end" {
            if in_range {
                return Ok(segments);
            }
            return Err(format_err!("`{{end}}` without `{{range}}`"));
        } else if let Some(path) = expr.strip_prefix("range ") {
            let path = compile(path)?;
            let body = parse_segments(tokens, true)?;
            segments.push(Segment::Range(path, body));
        } else if expr.starts_with('"') {
            let text = serde_json::from_str::<String>(&expr)
                .with_context(|| format!("invalid string literal {}", expr))?;
            segments.push(Segment::Text(text));
        } else {
            segments.push(Segment::Path(compile(&expr)?));
        }
    }
    if in_range {
        Err(format_err!("`{{range}}` without `{{end}}`"))
    } else {
        Ok(segments)
    }
}

/// Compile a `kubectl` path, which may leave out the leading `$`.
fn compile(expr: &str) -> Result<JsonPath> {
    let expr = expr.trim();
    let rest = expr
        .strip_prefix('$')
        .or_else(|| expr.strip_prefix('@'))
        .unwrap_or(expr);
    let query = if rest.is_empty() || rest == "." {
        "$".to_owned()
    } else if rest.starts_with('.') || rest.starts_with('[') {
        format!("${}", rest)
    } else {
        format!("$.{}", rest)
    };
    JsonPath::parse(&query).with_context(|| format!("invalid jsonpath {:?}", expr))
}

fn render_segments(segments: &[Segment], value: &Value, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Path(path) => {
                let texts = path
                    .query(value)
                    .all()
                    .into_iter()
                    .map(value_text)
                    .collect::<Vec<_>>();
                out.push_str(&texts.join(" "));
            }
            Segment::Range(path, body) => {
                for item in path.query(value).all() {
                    render_segments(body, item, out);
                }
            }
        }
    }
}

/// Strings print bare. Everything else prints as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
