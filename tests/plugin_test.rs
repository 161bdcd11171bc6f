use std::path::PathBuf;

use pkgbaker::error::Error;
use pkgbaker::plugin::{
    Codecov, ConfigFile, Coveralls, CustomPlugin, GitHubPages, GitLabCi, Plugin, PluginKind,
    Plugins, TravisCi,
};
use pkgbaker::renderer::MustacheRenderer;

fn custom(name: &str, badge: &str, gitignore: &[&str]) -> Plugin {
    Plugin::Custom(CustomPlugin {
        name: name.to_string(),
        badges: vec![badge.to_string()],
        gitignore: gitignore.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    })
}

#[test]
fn test_badges_follow_badge_order_then_names() {
    let plugins: Plugins = vec![
        Plugin::Coveralls(Coveralls::default()),
        custom("Zeta", "zeta {{PKGNAME}}", &[]),
        Plugin::TravisCi(TravisCi::default()),
        custom("Alpha", "alpha {{USER}}", &[]),
        Plugin::GitHubPages(GitHubPages::default()),
    ]
    .into();

    let badges = plugins.badges(&MustacheRenderer::new(), "alice", "Foo").unwrap();

    assert_eq!(badges.len(), 6);
    assert!(badges[0].contains("docs-stable"));
    assert!(badges[0].contains("https://alice.github.io/Foo.jl/stable"));
    assert!(badges[1].contains("docs-dev"));
    assert!(badges[2].contains("https://travis-ci.com/alice/Foo.jl"));
    assert!(badges[3].contains("https://coveralls.io/github/alice/Foo.jl"));
    assert_eq!(badges[4], "alpha alice");
    assert_eq!(badges[5], "zeta Foo");
}

#[test]
fn test_badge_order_does_not_depend_on_insertion_order() {
    let forward: Plugins = vec![
        Plugin::Codecov(Codecov::default()),
        custom("B", "b", &[]),
        custom("A", "a", &[]),
        Plugin::TravisCi(TravisCi::default()),
    ]
    .into();
    let backward: Plugins = vec![
        Plugin::TravisCi(TravisCi::default()),
        custom("A", "a", &[]),
        custom("B", "b", &[]),
        Plugin::Codecov(Codecov::default()),
    ]
    .into();

    let renderer = MustacheRenderer::new();
    assert_eq!(
        forward.badges(&renderer, "alice", "Foo").unwrap(),
        backward.badges(&renderer, "alice", "Foo").unwrap()
    );
}

#[test]
fn test_gitignore_deduplicates_keeping_first_position() {
    let plugins: Plugins = vec![
        Plugin::Codecov(Codecov::default()),
        custom("Deps", "", &["*.jl.mem", "/deps/build.log", ".DS_Store"]),
        Plugin::Coveralls(Coveralls::default()),
        Plugin::GitHubPages(GitHubPages::default()),
    ]
    .into();

    assert_eq!(
        plugins.gitignore(),
        vec![
            ".DS_Store",
            "*.jl.cov",
            "*.jl.*.cov",
            "*.jl.mem",
            "/deps/build.log",
            "/docs/build/",
            "/docs/site/",
        ]
    );
}

#[test]
fn test_gitignore_without_plugins_is_baseline() {
    assert_eq!(Plugins::new().gitignore(), vec![".DS_Store"]);
}

#[test]
fn test_gitlab_coverage_toggle() {
    let renderer = MustacheRenderer::new();

    let with = Plugin::GitLabCi(GitLabCi::default());
    assert_eq!(with.badges(&renderer, "alice", "Foo").unwrap().len(), 2);
    assert_eq!(with.gitignore().len(), 3);

    let without = Plugin::GitLabCi(GitLabCi { coverage: false, ..Default::default() });
    assert_eq!(without.badges(&renderer, "alice", "Foo").unwrap().len(), 1);
    assert!(without.gitignore().is_empty());
}

#[test]
fn test_has_documenter() {
    let plugins: Plugins = vec![Plugin::TravisCi(TravisCi::default())].into();
    assert!(!plugins.has_documenter());

    let plugins: Plugins = vec![Plugin::GitHubPages(GitHubPages::default())].into();
    assert!(plugins.has_documenter());
    assert!(plugins.contains(&PluginKind::GitHubPages));
}

#[test]
fn test_validate_reports_missing_files() {
    let plugins: Plugins = vec![Plugin::TravisCi(TravisCi {
        config_file: ConfigFile::Custom(PathBuf::from("/does/not/exist.yml")),
    })]
    .into();
    match plugins.validate() {
        Err(Error::ValidationError(msg)) => assert!(msg.contains("/does/not/exist.yml")),
        other => panic!("Expected ValidationError, got {:?}", other),
    }

    let plugin = Plugin::Custom(CustomPlugin {
        name: "Lint".to_string(),
        source: Some(PathBuf::from(file!())),
        dest: None,
        ..Default::default()
    });
    assert!(plugin.validate().is_err());
}

#[test]
fn test_plugins_deserialize_from_yaml() {
    let yaml = r#"
- type: github_pages
- type: travis_ci
  config_file: disabled
- type: gitlab_ci
  coverage: false
- type: codecov
- type: custom
  name: Lint
  gitignore: ["/lint/"]
  badges: ["lint {{PKGNAME}}"]
"#;
    let plugins: Plugins = serde_yaml::from_str(yaml).unwrap();

    let kinds: Vec<PluginKind> = plugins.iter().map(Plugin::kind).collect();
    assert_eq!(
        kinds,
        vec![
            PluginKind::GitHubPages,
            PluginKind::TravisCi,
            PluginKind::GitLabCi,
            PluginKind::Codecov,
            PluginKind::Custom("Lint".to_string()),
        ]
    );
    match plugins.get(&PluginKind::TravisCi) {
        Some(Plugin::TravisCi(travis)) => assert_eq!(travis.config_file, ConfigFile::Disabled),
        other => panic!("Expected TravisCi plugin, got {:?}", other),
    }
}
