    use super::*;

    use std::sync::{Arc, Barrier};

    #[derive(Default)]
    struct Recorder {
        values: Vec<u32>,
        notes: Vec<Notification>,
    }

    impl UiState for Recorder {
        fn notify(&mut self, notification: Notification) {
            self.notes.push(notification);
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn posted_updates_apply_on_drain() {
        let mut d: Dispatcher<Recorder> = Dispatcher::new();
        let mut state = Recorder::default();
        d.run(JobName::Refresh, |ctx| {
            ctx.post(|s: &mut Recorder| s.values.push(1));
            ctx.post(|s: &mut Recorder| s.values.push(2));
            Ok(())
        });
        assert!(d.wait_idle(&mut state, WAIT));
        assert_eq!(state.values, vec![1, 2]);
        assert!(d.is_idle());
        assert_eq!(d.outstanding(), 0);
    }

    #[test]
    fn superseded_job_results_are_dropped() {
        let mut d: Dispatcher<Recorder> = Dispatcher::new();
        let mut state = Recorder::default();
        let gate = Arc::new(Barrier::new(2));

        let first_gate = gate.clone();
        let first = d.run(JobName::Refresh, move |ctx| {
            first_gate.wait();
            ctx.post(|s: &mut Recorder| s.values.push(1));
            Err(FlowError::Unexpected("late failure".into()))
        });
        let second = d.run(JobName::Refresh, |ctx| {
            ctx.post(|s: &mut Recorder| s.values.push(2));
            Ok(())
        });
        assert_eq!((first, second), (1, 2));

        assert!(d.wait_idle(&mut state, WAIT));
        assert_eq!(state.values, vec![2]);

        gate.wait();
        assert!(d.settle(&mut state, WAIT));
        assert_eq!(state.values, vec![2]);
        assert!(state.notes.is_empty());
    }

    #[test]
    fn different_names_do_not_supersede_each_other() {
        let mut d: Dispatcher<Recorder> = Dispatcher::new();
        let mut state = Recorder::default();
        d.run(JobName::Refresh, |ctx| {
            ctx.post(|s: &mut Recorder| s.values.push(1));
            Ok(())
        });
        d.run(JobName::LoadNode, |ctx| {
            ctx.post(|s: &mut Recorder| s.values.push(2));
            Ok(())
        });
        assert!(d.settle(&mut state, WAIT));
        state.values.sort();
        assert_eq!(state.values, vec![1, 2]);
    }

    #[test]
    fn command_runs_never_supersede_each_other() {
        let mut d: Dispatcher<Recorder> = Dispatcher::new();
        let mut state = Recorder::default();
        let gate = Arc::new(Barrier::new(2));

        let first_gate = gate.clone();
        d.run(JobName::Command, move |ctx| {
            first_gate.wait();
            ctx.post(|s: &mut Recorder| s.values.push(1));
            Err(FlowError::Unexpected("slow command failed".into()))
        });
        d.run(JobName::Command, |ctx| {
            ctx.post(|s: &mut Recorder| s.values.push(2));
            Ok(())
        });
        assert!(d.is_running(JobName::Command));

        gate.wait();
        assert!(d.wait_idle(&mut state, WAIT));
        state.values.sort();
        assert_eq!(state.values, vec![1, 2]);
        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notes[0].message, "Unexpected Error: slow command failed");
        assert!(!d.is_running(JobName::Command));
        assert_eq!(d.outstanding(), 0);
    }

    #[test]
    fn failures_become_labelled_notifications() {
        let mut d: Dispatcher<Recorder> = Dispatcher::new();
        let mut state = Recorder::default();
        d.run(JobName::Refresh, |_| {
            Err(FlowError::connectivity("sync", "connection refused"))
        });
        assert!(d.wait_idle(&mut state, WAIT));
        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notes[0].severity, crate::error::Severity::Error);
        assert_eq!(
            state.notes[0].message,
            "Refresh Error: failed to sync: connection refused"
        );
    }

    #[test]
    fn panics_are_contained() {
        let mut d: Dispatcher<Recorder> = Dispatcher::new();
        let mut state = Recorder::default();
        d.run(JobName::Command, |_| panic!("boom"));
        assert!(d.wait_idle(&mut state, WAIT));
        assert_eq!(state.notes.len(), 1);
        assert!(state.notes[0].message.contains("boom"));
    }

    #[test]
    fn run_if_idle_skips_while_in_flight() {
        let mut d: Dispatcher<Recorder> = Dispatcher::new();
        let mut state = Recorder::default();
        let gate = Arc::new(Barrier::new(2));
        let job_gate = gate.clone();
        assert_eq!(
            d.run_if_idle(JobName::LiveTail, move |_| {
                job_gate.wait();
                Ok(())
            }),
            Some(1)
        );
        assert_eq!(d.run_if_idle(JobName::LiveTail, |_| Ok(())), None);
        gate.wait();
        assert!(d.wait_idle(&mut state, WAIT));
        assert_eq!(d.run_if_idle(JobName::LiveTail, |_| Ok(())), Some(2));
        assert!(d.settle(&mut state, WAIT));
    }

    #[test]
    fn ticker_fires_once_per_interval() {
        let start = Instant::now();
        let mut t = Ticker::new(Duration::from_secs(2));
        assert!(!t.due(start));
        t.enable(start);
        assert!(!t.due(start + Duration::from_secs(1)));
        assert!(t.due(start + Duration::from_secs(2)));
        assert!(!t.due(start + Duration::from_secs(3)));
        assert!(t.due(start + Duration::from_secs(4)));
        t.disable();
        assert!(!t.is_enabled());
        assert!(!t.due(start + Duration::from_secs(10)));
    }
