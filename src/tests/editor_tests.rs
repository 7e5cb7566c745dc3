    use super::*;

    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    fn node() -> NodePath {
        NodePath::parse("/s/t").unwrap()
    }

    #[test]
    fn returns_edited_text_and_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("seen");
        let editor = script(
            dir.path(),
            "append.sh",
            &format!("echo \"$1\" > '{}'\necho extra >> \"$1\"", record.display()),
        );

        let edited = edit_text(&editor, &node(), "echo hi\n").unwrap();
        assert_eq!(edited.as_deref(), Some("echo hi\nextra\n"));

        let temp = std::fs::read_to_string(&record).unwrap();
        let temp = temp.trim();
        assert!(temp.ends_with(".ecf"), "{temp}");
        assert!(!Path::new(temp).exists());
    }

    #[test]
    fn unchanged_file_yields_none() {
        let edited = edit_text("true", &node(), "echo hi\n").unwrap();
        assert_eq!(edited, None);
    }

    #[test]
    fn failing_editor_is_a_command_error() {
        let err = edit_text("false", &node(), "x").unwrap_err();
        match err {
            FlowError::Command { path, action, message } => {
                assert_eq!(path, node());
                assert_eq!(action, "edit script");
                assert!(message.contains("exited with"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn editor_command_may_carry_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let editor = script(dir.path(), "put.sh", "printf '%s' \"$1\" > \"$2\"");
        let edited = edit_text(&format!("{} replaced", editor), &node(), "orig").unwrap();
        assert_eq!(edited.as_deref(), Some("replaced"));
    }
