    use super::*;

    #[test]
    fn parse_accepts_absolute_paths() {
        let path = NodePath::parse(" /forecast/model/run_model ").unwrap();
        assert_eq!(path.as_str(), "/forecast/model/run_model");
        assert_eq!(path.name(), "run_model");
        assert_eq!(path.depth(), 3);
        assert_eq!(
            path.segments().collect::<Vec<_>>(),
            vec!["forecast", "model", "run_model"]
        );
    }

    #[test]
    fn parse_rejects_relative_and_empty_segments() {
        for raw in ["forecast/model", "/", "", "/a//b", "/a/"] {
            assert!(
                matches!(NodePath::parse(raw), Err(FlowError::Validation(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn parent_stops_at_the_suite() {
        let task = NodePath::suite("s").child("f").child("t");
        assert_eq!(task.parent(), Some(NodePath::suite("s").child("f")));
        assert_eq!(NodePath::suite("s").parent(), None);
    }

    #[test]
    fn ancestor_check_respects_segment_boundaries() {
        let fam = NodePath::suite("s").child("f");
        assert!(fam.is_ancestor_of(&fam.child("t")));
        assert!(!fam.is_ancestor_of(&fam));
        assert!(!fam.is_ancestor_of(&NodePath::suite("s").child("f2")));
    }

    #[test]
    fn serde_uses_plain_string_form() {
        let path = NodePath::suite("s").child("t");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"/s/t\"");
        let back: NodePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<NodePath>("\"s/t\"").is_err());
    }
