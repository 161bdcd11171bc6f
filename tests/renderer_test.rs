use pkgbaker::config::TemplateConfig;
use pkgbaker::error::Error;
use pkgbaker::plugin::{Codecov, Documenter, Plugin};
use pkgbaker::renderer::{default_view, substitute, MustacheRenderer, TemplateRenderer};
use serde_json::json;

#[test]
fn test_placeholders() {
    let view = json!({ "NAME": "Foo", "COUNT": 3, "FLAG": true });
    assert_eq!(substitute("Hello {{NAME}}!", &view).unwrap(), "Hello Foo!");
    assert_eq!(substitute("{{ NAME }}.jl", &view).unwrap(), "Foo.jl");
    assert_eq!(substitute("{{COUNT}} {{FLAG}}", &view).unwrap(), "3 true");
    assert_eq!(substitute("{{{NAME}}}/{{&NAME}}", &view).unwrap(), "Foo/Foo");
}

#[test]
fn test_missing_key_renders_empty() {
    let view = json!({});
    assert_eq!(substitute("[{{MISSING}}]", &view).unwrap(), "[]");
    assert_eq!(substitute("a{{#MISSING}}b{{/MISSING}}c", &view).unwrap(), "ac");
    assert_eq!(substitute("[{{NULL}}]", &json!({ "NULL": null })).unwrap(), "[]");
}

#[test]
fn test_section_collapses_when_opened_at_line_end() {
    let template =
        "notifications:\n  email: false{{#DOCUMENTER}}\nafter_success:\n  - docs{{/DOCUMENTER}}\nend";

    let with = substitute(template, &json!({ "DOCUMENTER": true })).unwrap();
    assert_eq!(with, "notifications:\n  email: false\nafter_success:\n  - docs\nend");

    let without = substitute(template, &json!({})).unwrap();
    assert_eq!(without, "notifications:\n  email: false\nend");
}

#[test]
fn test_section_on_its_own_line_leaves_blank_line() {
    let template = "a\n{{#DOCUMENTER}}\nb\n{{/DOCUMENTER}}\nc";

    assert_eq!(substitute(template, &json!({ "DOCUMENTER": false })).unwrap(), "a\n\nc");
    assert_eq!(substitute(template, &json!({ "DOCUMENTER": true })).unwrap(), "a\n\nb\n\nc");
}

#[test]
fn test_inverted_and_nested_sections() {
    let template = "{{#A}}a{{#B}}b{{/B}}{{/A}}{{^A}}not a{{/A}}";

    assert_eq!(substitute(template, &json!({ "A": true, "B": true })).unwrap(), "ab");
    assert_eq!(substitute(template, &json!({ "A": true })).unwrap(), "a");
    assert_eq!(substitute(template, &json!({ "A": false, "B": true })).unwrap(), "not a");
}

#[test]
fn test_truthiness() {
    let template = "{{#X}}yes{{/X}}";
    assert_eq!(substitute(template, &json!({ "X": "text" })).unwrap(), "yes");
    assert_eq!(substitute(template, &json!({ "X": "" })).unwrap(), "");
    assert_eq!(substitute(template, &json!({ "X": [] })).unwrap(), "");
}

#[test]
fn test_literal_text_is_kept_verbatim() {
    let template = "{% raw %} {# x #} {commit}{path}#L{line} %}\n\n";
    assert_eq!(substitute(template, &json!({})).unwrap(), template);
}

#[test]
fn test_comments_are_dropped() {
    assert_eq!(substitute("a{{! ignored }}b", &json!({})).unwrap(), "ab");
}

#[test]
fn test_malformed_templates() {
    for template in ["{{NAME", "{{#A}}x", "{{#A}}x{{/B}}", "x{{/A}}", "{{not a name}}", "{{}}"] {
        match substitute(template, &json!({})) {
            Err(Error::TemplateError(_)) => (),
            other => panic!("Expected TemplateError for {template:?}, got {other:?}"),
        }
    }
}

fn config_with_plugins(plugins: Vec<Plugin>) -> TemplateConfig {
    let mut config = TemplateConfig::new("alice", "1.3.0-beta".parse().unwrap());
    config.plugins = plugins.into();
    config
}

#[test]
fn test_default_view() {
    let config = config_with_plugins(vec![]);
    let view = default_view(&config);
    assert_eq!(view["USER"], json!("alice"));
    assert_eq!(view["VERSION"], json!("1.3"));
    assert_eq!(view["DOCUMENTER"], json!(false));
    assert_eq!(view["CODECOV"], json!(false));
    assert_eq!(view["COVERALLS"], json!(false));
    assert_eq!(view["AFTER"], json!(false));

    let config = config_with_plugins(vec![
        Plugin::Documenter(Documenter::default()),
        Plugin::Codecov(Codecov::default()),
    ]);
    let view = default_view(&config);
    assert_eq!(view["DOCUMENTER"], json!(true));
    assert_eq!(view["CODECOV"], json!(true));
    assert_eq!(view["COVERALLS"], json!(false));
    assert_eq!(view["AFTER"], json!(true));
}

#[test]
fn test_render_with_config_extra_view_wins() {
    let config = config_with_plugins(vec![]);
    let renderer = MustacheRenderer::new();

    let extra = json!({ "PKGNAME": "Foo" });
    let text = renderer
        .render_with_config("{{USER}} {{VERSION}} {{PKGNAME}}", &config, &extra)
        .unwrap();
    assert_eq!(text, "alice 1.3 Foo");

    let text = renderer
        .render_with_config("{{USER}}", &config, &json!({ "USER": "bob" }))
        .unwrap();
    assert_eq!(text, "bob");
}
