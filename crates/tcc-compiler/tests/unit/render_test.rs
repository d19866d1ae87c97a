//! Tests for the artifact projection and rendering

#[cfg(test)]
mod render_tests {
    use crate::test_utils::{glob_rule, ref_rule, store_of, target, vql_rule};
    use tcc_compiler::render::{TemplateLibrary, render_artifact};
    use tcc_compiler::{
        ArtifactContent, CompileError, CompilerConfig, DependencySet, TargetFile, TargetRule,
        TargetStore,
    };

    fn sample_targets() -> Vec<TargetFile> {
        let mut mft = target("$MFT", vec![glob_rule("$MFT", "C:/$MFT")]);
        mft.description = "Master file table".to_string();
        mft.preamble = "# preamble".to_string();

        vec![
            target(
                "Windows Logs",
                vec![
                    glob_rule("Event Logs", "C:/Windows/System32/winevt/logs/*.evtx"),
                    vql_rule("Setup", "SELECT * FROM Artifact.Windows.Sys.Setup()"),
                ],
            ),
            mft,
            target("_All", vec![ref_rule("Windows Logs", "Windows Logs"), ref_rule("$MFT", "$MFT")]),
            target("Browsers", vec![vql_rule("Chrome", "SELECT * FROM Artifact.Generic.Browsers.Chrome()")]),
        ]
    }

    fn build(store: &TargetStore, deps: &mut DependencySet) -> ArtifactContent {
        ArtifactContent::build(
            store,
            &CompilerConfig::default(),
            deps,
            "2024-01-01T00:00:00Z".to_string(),
            "abc1234".to_string(),
        )
    }

    #[test]
    fn test_order_independent_of_ingestion() {
        let forward = store_of(sample_targets());
        let mut reversed_targets = sample_targets();
        reversed_targets.reverse();
        for t in &mut reversed_targets {
            t.rules.reverse();
        }
        let reversed = store_of(reversed_targets);

        let mut deps_a = DependencySet::new();
        let mut deps_b = DependencySet::new();
        let a = build(&forward, &mut deps_a);
        let b = build(&reversed, &mut deps_b);

        assert_eq!(a.rules, b.rules);
        assert_eq!(a.target_files, b.target_files);
        assert_eq!(deps_a, deps_b);
    }

    #[test]
    fn test_records_are_sanitized_and_sorted() {
        let store = store_of(sample_targets());
        let mut deps = DependencySet::new();
        let content = build(&store, &mut deps);

        let targets: Vec<&str> = content.target_files.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(targets, vec!["_All", "Browsers", "MFT", "Windows_Logs"]);

        let keys: Vec<(&str, &str)> = content
            .rules
            .iter()
            .map(|r| (r.target.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Browsers", "Chrome"),
                ("MFT", "MFT"),
                ("Windows_Logs", "Event_Logs"),
                ("Windows_Logs", "Setup"),
                ("_All", "MFT"),
                ("_All", "Windows_Logs"),
            ]
        );

        let all_ref = content.rules.iter().find(|r| r.target == "_All" && r.name == "MFT").unwrap();
        assert_eq!(all_ref.r#ref, "MFT");

        let mft = content.target_files.iter().find(|t| t.name == "MFT").unwrap();
        assert_eq!(mft.description, "Master file table");
        assert_eq!(mft.preamble, "# preamble");
    }

    #[test]
    fn test_dependencies_collected_from_queries() {
        let store = store_of(sample_targets());
        let mut deps = DependencySet::new();
        let content = build(&store, &mut deps);

        let names: Vec<&str> = content.dependencies.iter().collect();
        assert_eq!(names, vec!["Generic.Browsers.Chrome", "Windows.Sys.Setup"]);

        // A second render sees the same set.
        let again = build(&store, &mut deps);
        assert_eq!(again.dependencies.len(), 2);
    }

    #[test]
    fn test_render_template_fields() {
        let store = store_of(sample_targets());
        let mut deps = DependencySet::new();
        let content = build(&store, &mut deps);

        let template = "\
Time: {{ Time }} Commit: {{ Commit }}
{% for t in TargetFiles %}T:{{ t.Name }}
{% endfor %}{% for r in Rules %}R:{{ r.Target }}/{{ r.Name }}={{ r.Glob }}{{ r.Ref }}
{% endfor %}{% for d in Dependencies %}D:{{ d }}
{% endfor %}";
        let library = TemplateLibrary::from_sources(
            "artifact.yaml",
            vec![("artifact.yaml".to_string(), template.to_string())],
        );

        let out = render_artifact(&library, &content).unwrap();
        assert!(out.starts_with("Time: 2024-01-01T00:00:00Z Commit: abc1234\n"));
        assert!(out.contains("T:_All\nT:Browsers\nT:MFT\nT:Windows_Logs\n"));
        assert!(out.contains("R:MFT/MFT=C:/$MFT\n"));
        assert!(out.contains("R:_All/Windows_Logs=Windows_Logs\n"));
        assert!(out.contains("D:Windows.Sys.Setup\n"));
    }

    #[test]
    fn test_legacy_rule_glob_is_copied_verbatim() {
        let legacy = TargetRule {
            name: "Logs".to_string(),
            path: r"C:\Logs\".to_string(),
            file_mask: "*.log".to_string(),
            recursive: true,
            ..TargetRule::default()
        };
        let store = store_of(vec![target("Legacy", vec![legacy, glob_rule("Direct", "/var/log/*")])]);
        let content = build(&store, &mut DependencySet::new());

        let direct = content.rules.iter().find(|r| r.name == "Direct").unwrap();
        assert_eq!(direct.glob, "/var/log/*");
        assert_eq!(direct.legacy_glob, "");

        let logs = content.rules.iter().find(|r| r.name == "Logs").unwrap();
        assert_eq!(logs.glob, "");
        assert_eq!(logs.legacy_glob, "C:/Logs/**/*.log");

        let library = TemplateLibrary::from_sources(
            "main",
            vec![("main".to_string(), "{% for r in Rules %}{{ r.Name }}[{{ r.Glob }}|{{ r.LegacyGlob }}]{% endfor %}".to_string())],
        );
        assert_eq!(
            render_artifact(&library, &content).unwrap(),
            "Direct[/var/log/*|]Logs[|C:/Logs/**/*.log]"
        );
    }

    #[test]
    fn test_html_characters_not_escaped() {
        let store = store_of(vec![target("T", vec![vql_rule("q", "SELECT * FROM x WHERE a < 'b'")])]);
        let mut deps = DependencySet::new();
        let content = build(&store, &mut deps);

        let library = TemplateLibrary::from_sources(
            "page.html",
            vec![("page.html".to_string(), "{{ Rules.0.VQL }}".to_string())],
        );
        let out = render_artifact(&library, &content).unwrap();
        assert_eq!(out, "SELECT * FROM x WHERE a < 'b'");
    }

    #[test]
    fn test_template_errors_name_the_template() {
        let content = build(&TargetStore::new(), &mut DependencySet::new());

        let broken = TemplateLibrary::from_sources(
            "broken.tera",
            vec![("broken.tera".to_string(), "{% for x in %}".to_string())],
        );
        match render_artifact(&broken, &content) {
            Err(CompileError::Template { template, .. }) => assert_eq!(template, "broken.tera"),
            other => panic!("expected template error, got {other:?}"),
        }

        let missing_var = TemplateLibrary::from_sources(
            "main.tera",
            vec![("main.tera".to_string(), "{{ NoSuchField }}".to_string())],
        );
        let err = render_artifact(&missing_var, &content).unwrap_err();
        assert!(err.to_string().contains("main.tera"));
    }
}
