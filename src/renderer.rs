//! Template substitution for generated files and badges.
//!
//! Templates use mustache-style tags: `{{KEY}}` placeholders, `{{#KEY}}…{{/KEY}}`
//! sections rendered when `KEY` is truthy, inverted `{{^KEY}}…{{/KEY}}` sections
//! and `{{! comments }}`. Tags are replaced exactly where they stand and nothing
//! around them is trimmed, so a section whose opening tag starts its own line
//! leaves that line's newline behind when it renders nothing. Templates that
//! should collapse cleanly open the section at the end of the previous line.
//!
//! Templates are translated into MiniJinja source and rendered by MiniJinja.
use std::sync::OnceLock;

use minijinja::Environment;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::config::TemplateConfig;
use crate::error::{Error, Result};
use crate::plugin::PluginKind;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string against a key/value view.
    ///
    /// Keys missing from the view render as empty text and count as false in
    /// sections.
    fn render(&self, template: &str, view: &Value) -> Result<String>;

    /// Renders a template against the default view of `config` with `extra`
    /// merged on top. Keys in `extra` win over the defaults.
    fn render_with_config(
        &self,
        template: &str,
        config: &TemplateConfig,
        extra: &Value,
    ) -> Result<String> {
        let mut view = default_view(config);
        if let Some(extra) = extra.as_object() {
            for (key, value) in extra {
                view.insert(key.clone(), value.clone());
            }
        }
        self.render(template, &Value::Object(view))
    }
}

/// Builds the view every configured template is rendered with.
///
/// * `USER` - account name on the git host
/// * `VERSION` - `major.minor` of the target Julia version
/// * `DOCUMENTER`, `CODECOV`, `COVERALLS` - whether those plugins are configured
/// * `AFTER` - whether any of the above needs an after-success CI step
pub fn default_view(config: &TemplateConfig) -> Map<String, Value> {
    let documenter = config.plugins.has_documenter();
    let codecov = config.plugins.contains(&PluginKind::Codecov);
    let coveralls = config.plugins.contains(&PluginKind::Coveralls);

    let mut view = Map::new();
    view.insert("USER".to_string(), json!(config.user));
    view.insert("VERSION".to_string(), json!(config.julia_version.major_minor()));
    view.insert("DOCUMENTER".to_string(), json!(documenter));
    view.insert("CODECOV".to_string(), json!(codecov));
    view.insert("COVERALLS".to_string(), json!(coveralls));
    view.insert("AFTER".to_string(), json!(documenter || codecov || coveralls));
    view
}

/// Renders `template` against `view` with a default [`MustacheRenderer`].
pub fn substitute(template: &str, view: &Value) -> Result<String> {
    MustacheRenderer::new().render(template, view)
}

#[derive(Debug, PartialEq)]
enum Tag<'a> {
    Variable(&'a str),
    Section { name: &'a str, inverted: bool },
    Close(&'a str),
    Comment,
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Tag(Tag<'a>),
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("name pattern is valid"))
}

fn check_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name_regex().is_match(name) {
        Ok(name)
    } else {
        Err(Error::TemplateError(format!("invalid tag name '{name}'")))
    }
}

fn parse_tag(content: &str) -> Result<Tag<'_>> {
    let content = content.trim();
    let tag = match content.chars().next() {
        Some('#') => Tag::Section { name: check_name(&content[1..])?, inverted: false },
        Some('^') => Tag::Section { name: check_name(&content[1..])?, inverted: true },
        Some('/') => Tag::Close(check_name(&content[1..])?),
        Some('!') => Tag::Comment,
        Some('&') => Tag::Variable(check_name(&content[1..])?),
        _ => Tag::Variable(check_name(content)?),
    };
    Ok(tag)
}

fn tokenize(template: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            tokens.push(Token::Text(&rest[..start]));
        }
        let offset = template.len() - rest.len() + start;
        let unclosed = || Error::TemplateError(format!("unclosed tag at offset {offset}"));

        let after = &rest[start + 2..];
        let (tag, remaining) = if let Some(triple) = after.strip_prefix('{') {
            let end = triple.find("}}}").ok_or_else(unclosed)?;
            (Tag::Variable(check_name(&triple[..end])?), &triple[end + 3..])
        } else {
            let end = after.find("}}").ok_or_else(unclosed)?;
            (parse_tag(&after[..end])?, &after[end + 2..])
        };
        tokens.push(Token::Tag(tag));
        rest = remaining;
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }

    Ok(tokens)
}

/// Translates mustache tokens into MiniJinja source.
///
/// Literal text is passed through the `literals` context list instead of being
/// embedded, so text containing MiniJinja syntax is never interpreted.
fn translate<'a>(tokens: &[Token<'a>]) -> Result<(String, Vec<&'a str>)> {
    let mut source = String::new();
    let mut literals = Vec::new();
    let mut open: Vec<&str> = Vec::new();

    for token in tokens {
        match token {
            Token::Text(text) => {
                source.push_str(&format!("{{{{ literals[{}] }}}}", literals.len()));
                literals.push(*text);
            }
            Token::Tag(Tag::Variable(name)) => {
                source.push_str(&format!("{{{{ view[\"{name}\"] }}}}"));
            }
            Token::Tag(Tag::Section { name, inverted }) => {
                let negation = if *inverted { "not " } else { "" };
                source.push_str(&format!("{{% if {negation}view[\"{name}\"] %}}"));
                open.push(*name);
            }
            Token::Tag(Tag::Close(name)) => match open.pop() {
                Some(expected) if expected == *name => source.push_str("{% endif %}"),
                Some(expected) => {
                    return Err(Error::TemplateError(format!(
                        "section '{expected}' closed by '{name}'"
                    )))
                }
                None => {
                    return Err(Error::TemplateError(format!(
                        "closing tag '{name}' without an open section"
                    )))
                }
            },
            Token::Tag(Tag::Comment) => {}
        }
    }

    if let Some(name) = open.last() {
        return Err(Error::TemplateError(format!("section '{name}' is never closed")));
    }

    Ok((source, literals))
}

/// Mustache-style renderer backed by a MiniJinja environment.
pub struct MustacheRenderer {
    env: Environment<'static>,
}

impl MustacheRenderer {
    pub fn new() -> Self {
        Self { env: Environment::new() }
    }
}

impl Default for MustacheRenderer {
    fn default() -> Self {
        MustacheRenderer::new()
    }
}

impl TemplateRenderer for MustacheRenderer {
    /// # Errors
    /// * `Error::TemplateError` for malformed tags or unbalanced sections
    /// * `Error::MinijinjaError` if rendering the translated template fails
    fn render(&self, template: &str, view: &Value) -> Result<String> {
        let tokens = tokenize(template)?;
        let (source, literals) = translate(&tokens)?;

        // Null counts as missing.
        let view: Map<String, Value> = view
            .as_object()
            .map(|map| {
                map.iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let context = json!({ "view": view, "literals": literals });
        Ok(self.env.render_str(&source, context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("a{{X}}b{{#C}}c{{/C}}{{! note }}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("a"),
                Token::Tag(Tag::Variable("X")),
                Token::Text("b"),
                Token::Tag(Tag::Section { name: "C", inverted: false }),
                Token::Text("c"),
                Token::Tag(Tag::Close("C")),
                Token::Tag(Tag::Comment),
            ]
        );
    }

    #[test]
    fn test_tokenize_triple_and_ampersand() {
        let tokens = tokenize("{{{ A }}}{{& B}}").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Tag(Tag::Variable("A")), Token::Tag(Tag::Variable("B"))]
        );
    }

    #[test]
    fn test_translate_rejects_unbalanced_sections() {
        let tokens = tokenize("{{#A}}x{{/B}}").unwrap();
        assert!(translate(&tokens).is_err());

        let tokens = tokenize("{{#A}}x").unwrap();
        assert!(translate(&tokens).is_err());

        let tokens = tokenize("x{{/A}}").unwrap();
        assert!(translate(&tokens).is_err());
    }
}
