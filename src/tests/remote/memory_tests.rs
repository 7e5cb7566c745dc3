    use super::*;

    use crate::remote::demo_seed;

    fn path(raw: &str) -> NodePath {
        NodePath::parse(raw).unwrap()
    }

    fn workflow() -> MemoryWorkflow {
        MemoryWorkflow::new(demo_seed()).unwrap()
    }

    fn state_of(wf: &MemoryWorkflow, raw: &str) -> NodeState {
        let snap = TreeSnapshot::from_definitions(wf.definitions()).unwrap();
        let id = snap.find(&path(raw)).unwrap();
        snap.node(id).state
    }

    #[test]
    fn suspend_then_resume_restores_prior_state() {
        let mut wf = workflow();
        let p = path("/forecast/model/run_model");
        wf.apply(&p, CommandVerb::Suspend).unwrap();
        assert_eq!(state_of(&wf, "/forecast/model/run_model"), NodeState::Suspended);
        wf.apply(&p, CommandVerb::Resume).unwrap();
        assert_eq!(state_of(&wf, "/forecast/model/run_model"), NodeState::Active);
    }

    #[test]
    fn resume_of_running_node_is_rejected() {
        let mut wf = workflow();
        let err = wf
            .apply(&path("/forecast/model/run_model"), CommandVerb::Resume)
            .unwrap_err();
        assert!(err.to_string().contains("not suspended"), "{err}");
    }

    #[test]
    fn kill_only_hits_running_work() {
        let mut wf = workflow();
        wf.apply(&path("/forecast/products/archive"), CommandVerb::Kill)
            .unwrap();
        assert_eq!(state_of(&wf, "/forecast/products/archive"), NodeState::Aborted);

        let err = wf
            .apply(&path("/forecast/obs/fetch_obs"), CommandVerb::Kill)
            .unwrap_err();
        assert!(err.to_string().contains("cannot kill a node that is complete"));
    }

    #[test]
    fn requeue_and_complete_cover_the_subtree() {
        let mut wf = workflow();
        wf.apply(&path("/forecast/products"), CommandVerb::Requeue)
            .unwrap();
        assert_eq!(state_of(&wf, "/forecast/products/plots"), NodeState::Queued);
        assert_eq!(state_of(&wf, "/forecast/products/archive"), NodeState::Queued);

        wf.apply(&path("/forecast/products"), CommandVerb::ForceComplete)
            .unwrap();
        assert_eq!(state_of(&wf, "/forecast/products/plots"), NodeState::Complete);
    }

    #[test]
    fn unknown_node_is_a_command_error() {
        let mut wf = workflow();
        let err = wf
            .apply(&path("/forecast/nope"), CommandVerb::Suspend)
            .unwrap_err();
        match err {
            FlowError::Command { path, message, .. } => {
                assert_eq!(path.as_str(), "/forecast/nope");
                assert_eq!(message, NO_SUCH_NODE);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn variables_add_replace_and_delete() {
        let mut wf = workflow();
        let p = path("/forecast/model");
        wf.alter(
            &p,
            &Alteration::AddVariable {
                name: "NEW".into(),
                value: "1".into(),
            },
        )
        .unwrap();
        wf.alter(
            &p,
            &Alteration::AddVariable {
                name: "NEW".into(),
                value: "2".into(),
            },
        )
        .unwrap();
        let snap = TreeSnapshot::from_definitions(wf.definitions()).unwrap();
        let vars = &snap.node(snap.find(&p).unwrap()).variables;
        assert_eq!(vars.iter().filter(|v| v.name == "NEW").count(), 1);
        assert!(vars.iter().any(|v| v.name == "NEW" && v.value == "2"));

        wf.alter(&p, &Alteration::DeleteVariable { name: "NEW".into() })
            .unwrap();
        let err = wf
            .alter(&p, &Alteration::DeleteVariable { name: "NEW".into() })
            .unwrap_err();
        assert!(err.to_string().contains("not defined here"));
    }

    #[test]
    fn change_script_replaces_the_file() {
        let mut wf = workflow();
        let p = path("/forecast/obs/fetch_obs");
        wf.alter(
            &p,
            &Alteration::Change {
                name: "script".into(),
                value: "echo new\n".into(),
            },
        )
        .unwrap();
        assert_eq!(wf.file(&p, ArtifactKind::Script).unwrap(), "echo new\n");
    }

    #[test]
    fn missing_file_is_artifact_not_found() {
        let wf = workflow();
        let err = wf
            .file(&path("/forecast/model/post"), ArtifactKind::Output)
            .unwrap_err();
        assert!(matches!(
            err,
            FlowError::ArtifactNotFound {
                kind: ArtifactKind::Output,
                ..
            }
        ));
    }

    #[test]
    fn grow_active_logs_appends_to_running_tasks() {
        let mut wf = workflow();
        let p = path("/forecast/model/run_model");
        let before = wf.file(&p, ArtifactKind::Output).unwrap();
        assert_eq!(wf.grow_active_logs(7), 1);
        let after = wf.file(&p, ArtifactKind::Output).unwrap();
        assert!(after.starts_with(&before));
        assert!(after.ends_with("[tick 7] run_model still running\n"));
    }

    #[test]
    fn client_serves_snapshots_from_its_last_sync() {
        let client = MemoryClient::demo().unwrap();
        assert!(client.fetch_definitions().is_err());
        client.sync().unwrap();

        let p = path("/forecast/model/run_model");
        client.mutate(&p, CommandVerb::Suspend).unwrap();
        let stale = client.fetch_definitions().unwrap();
        assert_eq!(stale.node(stale.find(&p).unwrap()).state, NodeState::Active);

        client.sync().unwrap();
        let fresh = client.fetch_definitions().unwrap();
        assert_eq!(fresh.node(fresh.find(&p).unwrap()).state, NodeState::Suspended);
    }
