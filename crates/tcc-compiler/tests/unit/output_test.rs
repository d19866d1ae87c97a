//! Tests for artifact packaging and the state snapshot

#[cfg(test)]
mod output_tests {
    use std::fs::{self, File};
    use std::io::Read;

    use tempfile::TempDir;
    use zip::ZipArchive;

    use crate::test_utils::{glob_rule, ref_rule, store_of, target, write_file};
    use tcc_compiler::output::{load_state, save_state, write_artifact};
    use tcc_compiler::CompileError;

    #[test]
    fn test_plain_output_truncates_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "artifact.yaml", "old content that is much longer");

        write_artifact(&path, "Pack", "name: Pack\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "name: Pack\n");
    }

    #[test]
    fn test_zip_output_has_single_named_member() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("artifact.zip");

        write_artifact(&path, "Windows.KapeFiles.Targets", "sources: []\n").unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);

        let mut member = archive.by_index(0).unwrap();
        assert_eq!(member.name(), "Windows.KapeFiles.Targets.yaml");

        let mut body = String::new();
        member.read_to_string(&mut body).unwrap();
        assert_eq!(body, "sources: []\n");
    }

    #[test]
    fn test_output_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("no/such/dir/artifact.yaml");

        let err = write_artifact(&path, "Pack", "x").unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }), "{err}");
    }

    #[test]
    fn test_state_round_trip_keeps_order_and_rules() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        let store = store_of(vec![
            target("Zeta", vec![glob_rule("z", "/z/*")]),
            target("Alpha", vec![glob_rule("a", "/a/*"), ref_rule("zeta", "Zeta")]),
        ]);
        save_state(&path, &store).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'), "state file should be indented");

        let loaded = load_state(&path).unwrap();
        assert_eq!(loaded.names(), vec!["Zeta", "Alpha"]);
        assert_eq!(loaded.get("Alpha").unwrap().rule_count(), 2);
        assert_eq!(loaded.get("Alpha").unwrap().rules[1].r#ref, "Zeta");
    }

    #[test]
    fn test_load_state_rejects_garbage() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "state.json", "not json");

        let err = load_state(&path).unwrap_err();
        assert!(matches!(err, CompileError::Parse { .. }), "{err}");
    }
}
