    use super::*;

    fn defs() -> Definitions {
        Definitions {
            server_state: ServerState::Halted,
            suites: vec![
                NodeDef::new("s", NodeKind::Suite, NodeState::Active).with_children(vec![
                    NodeDef::new("f", NodeKind::Family, NodeState::Queued).with_children(vec![
                        NodeDef::new("t1", NodeKind::Task, NodeState::Complete),
                        NodeDef::new("t2", NodeKind::Task, NodeState::Aborted),
                    ]),
                    NodeDef::new("t3", NodeKind::Task, NodeState::Queued),
                ]),
                NodeDef::new("other", NodeKind::Suite, NodeState::Suspended),
            ],
        }
    }

    fn path(raw: &str) -> NodePath {
        NodePath::parse(raw).unwrap()
    }

    #[test]
    fn builds_arena_with_paths_and_links() {
        let snap = TreeSnapshot::from_definitions(&defs()).unwrap();
        assert_eq!(snap.len(), 6);
        assert_eq!(snap.roots().len(), 2);
        assert_eq!(snap.server_state(), ServerState::Halted);

        let t2 = snap.find(&path("/s/f/t2")).unwrap();
        let rec = snap.node(t2);
        assert_eq!(rec.name(), "t2");
        assert_eq!(rec.state, NodeState::Aborted);
        assert_eq!(rec.kind, NodeKind::Task);

        let ancestors: Vec<_> = snap
            .ancestors(t2)
            .map(|id| snap.node(id).path.to_string())
            .collect();
        assert_eq!(ancestors, vec!["/s/f", "/s"]);
    }

    #[test]
    fn children_keep_declaration_order() {
        let snap = TreeSnapshot::from_definitions(&defs()).unwrap();
        let s = snap.find(&path("/s")).unwrap();
        let names: Vec<_> = snap
            .children(s)
            .iter()
            .map(|id| snap.node(*id).name().to_string())
            .collect();
        assert_eq!(names, vec!["f", "t3"]);
    }

    #[test]
    fn descendants_are_pre_order() {
        let snap = TreeSnapshot::from_definitions(&defs()).unwrap();
        let s = snap.find(&path("/s")).unwrap();
        let paths: Vec<_> = snap
            .descendants(s)
            .into_iter()
            .map(|id| snap.node(id).path.to_string())
            .collect();
        assert_eq!(paths, vec!["/s/f", "/s/f/t1", "/s/f/t2", "/s/t3"]);
    }

    #[test]
    fn duplicate_children_are_rejected() {
        let mut d = defs();
        d.suites[1]
            .children
            .push(NodeDef::new("x", NodeKind::Task, NodeState::Queued));
        d.suites[1]
            .children
            .push(NodeDef::new("x", NodeKind::Task, NodeState::Queued));
        let err = TreeSnapshot::from_definitions(&d).unwrap_err();
        assert!(err.to_string().contains("duplicate node path /other/x"));
    }

    #[test]
    fn names_with_slashes_are_rejected() {
        let d = Definitions {
            server_state: ServerState::Running,
            suites: vec![NodeDef::new("a/b", NodeKind::Suite, NodeState::Queued)],
        };
        assert!(TreeSnapshot::from_definitions(&d).is_err());
    }

    #[test]
    fn empty_definitions_give_empty_snapshot() {
        let snap = TreeSnapshot::from_definitions(&Definitions::default()).unwrap();
        assert!(snap.is_empty());
        assert!(snap.roots().is_empty());
    }
