use std::collections::HashMap;

use crate::model::{Definitions, NodeDef, NodeKind, NodePath, NodeState, ServerState};

use super::{ArtifactKind, WorkflowSeed};

fn task(name: &str, state: NodeState) -> NodeDef {
    NodeDef::new(name, NodeKind::Task, state)
}

fn family(name: &str, children: Vec<NodeDef>) -> NodeDef {
    NodeDef::new(name, NodeKind::Family, NodeState::Queued).with_children(children)
}

/// Small operational suite used by `--demo` and by the dev server when no
/// seed file is given.
pub fn demo_seed() -> WorkflowSeed {
    let forecast = NodeDef::new("forecast", NodeKind::Suite, NodeState::Active)
        .with_variable("ECF_HOME", "/srv/flow")
        .with_variable("YMD", "20260101")
        .with_children(vec![
            family(
                "obs",
                vec![
                    task("fetch_obs", NodeState::Complete),
                    task("qc_obs", NodeState::Complete).with_trigger("fetch_obs == complete"),
                ],
            )
            .with_variable("OBS_SOURCE", "gts"),
            family(
                "model",
                vec![
                    task("prep", NodeState::Complete),
                    task("run_model", NodeState::Active)
                        .with_trigger("prep == complete")
                        .with_variable("NPROC", "64"),
                    task("post", NodeState::Queued).with_trigger("run_model == complete"),
                ],
            )
            .with_variable("YMD", "20260102"),
            family(
                "products",
                vec![
                    task("plots", NodeState::Aborted),
                    task("archive", NodeState::Submitted),
                ],
            ),
        ]);

    let housekeeping = NodeDef::new("housekeeping", NodeKind::Suite, NodeState::Suspended)
        .with_children(vec![
            task("clean_scratch", NodeState::Suspended),
            task("rotate_logs", NodeState::Unknown),
        ]);

    let mut files: HashMap<NodePath, HashMap<ArtifactKind, String>> = HashMap::new();
    let mut put = |rel: &str, kind: ArtifactKind, text: &str| {
        let path = rel
            .split('/')
            .fold(NodePath::suite("forecast"), |p, seg| p.child(seg));
        files.entry(path).or_default().insert(kind, text.to_string());
    };
    put(
        "obs/fetch_obs",
        ArtifactKind::Output,
        "fetching observations\n1204 reports\ndone\n",
    );
    put(
        "obs/fetch_obs",
        ArtifactKind::Script,
        "%include <head.h>\nfetch_obs --ymd %YMD%\n%include <tail.h>\n",
    );
    put(
        "model/run_model",
        ArtifactKind::Output,
        "model starting with 64 ranks\nstep 1/240\n",
    );
    put(
        "model/run_model",
        ArtifactKind::Script,
        "%include <head.h>\nmpirun -n %NPROC% model.exe\n%include <tail.h>\n",
    );
    put("model/run_model", ArtifactKind::Job, "#!/bin/sh\nmpirun -n 64 model.exe\n");
    put(
        "products/plots",
        ArtifactKind::Output,
        "rendering plots\nERROR: missing field t2m\nerror exit 1\n",
    );
    put(
        "products/plots",
        ArtifactKind::Script,
        "%include <head.h>\nplot --all\n%include <tail.h>\n",
    );

    WorkflowSeed {
        definitions: Definitions {
            server_state: ServerState::Running,
            suites: vec![forecast, housekeeping],
        },
        files,
    }
}
