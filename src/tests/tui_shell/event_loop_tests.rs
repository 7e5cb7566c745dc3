    use super::*;

    use std::sync::Arc;

    use crate::model::{ClientConfig, NodePath};
    use crate::monitor::{Confirm, Monitor};
    use crate::remote::MemoryClient;
    use crate::tui_shell::modal::ModalKind;

    const WAIT: Duration = Duration::from_secs(5);

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let client = Arc::new(MemoryClient::demo().unwrap());
        let mut monitor = Monitor::new(client, &ClientConfig::default());
        monitor.connect();
        assert!(monitor.wait_idle(WAIT));
        App::new(monitor)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, key(code), Instant::now());
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn selected(app: &App) -> Option<String> {
        app.monitor
            .dashboard()
            .selected_path()
            .map(|p| p.to_string())
    }

    #[test]
    fn quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut a = app();
            press(&mut a, code);
            assert!(a.quit);
        }
        let mut a = app();
        handle_key(
            &mut a,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(a.quit);
    }

    #[test]
    fn arrows_move_and_toggle() {
        let mut a = app();
        press(&mut a, KeyCode::Down);
        assert_eq!(selected(&a).as_deref(), Some("/forecast"));
        press(&mut a, KeyCode::Enter);
        assert!(a.monitor.dashboard().tree().is_collapsed(1));
        press(&mut a, KeyCode::Down);
        assert_eq!(selected(&a).as_deref(), Some("/housekeeping"));
        press(&mut a, KeyCode::Up);
        press(&mut a, KeyCode::Char(' '));
        assert!(!a.monitor.dashboard().tree().is_collapsed(1));
    }

    #[test]
    fn tabs_and_digits_switch_views() {
        let mut a = app();
        press(&mut a, KeyCode::Tab);
        assert_eq!(a.monitor.dashboard().active_view(), ArtifactKind::Script);
        press(&mut a, KeyCode::BackTab);
        press(&mut a, KeyCode::BackTab);
        assert_eq!(a.monitor.dashboard().active_view(), ArtifactKind::Job);
        press(&mut a, KeyCode::Char('1'));
        assert_eq!(a.monitor.dashboard().active_view(), ArtifactKind::Output);
        assert_eq!(step_view(ArtifactKind::Job, true), ArtifactKind::Output);
    }

    #[test]
    fn slash_search_selects_while_typing_and_cycles_on_enter() {
        let mut a = app();
        press(&mut a, KeyCode::Char('/'));
        assert!(matches!(
            a.modal.as_ref().map(|m| &m.kind),
            Some(ModalKind::TreeSearch)
        ));
        type_str(&mut a, "obs");
        assert_eq!(selected(&a).as_deref(), Some("/forecast/obs"));
        press(&mut a, KeyCode::Enter);
        assert_eq!(selected(&a).as_deref(), Some("/forecast/obs/fetch_obs"));
        press(&mut a, KeyCode::Esc);
        assert!(a.modal.is_none());
        assert!(!a.quit);
    }

    #[test]
    fn why_opens_a_viewer() {
        let mut a = app();
        a.monitor
            .select_path(&NodePath::parse("/forecast/model/post").unwrap());
        press(&mut a, KeyCode::Char('w'));
        let modal = a.modal.as_ref().unwrap();
        assert!(matches!(modal.kind, ModalKind::Viewer));
        assert_eq!(modal.title, "Why: /forecast/model/post");
        assert!(
            modal
                .lines
                .contains(&"- Waiting for trigger: run_model == complete".to_string())
        );
    }

    #[test]
    fn requeue_asks_first() {
        let mut a = app();
        a.monitor
            .select_path(&NodePath::parse("/forecast/products/plots").unwrap());
        press(&mut a, KeyCode::Char('R'));
        a.on_tick(Instant::now());
        let modal = a.modal.as_ref().unwrap();
        assert!(matches!(modal.kind, ModalKind::Confirm(Confirm::Requeue(_))));

        press(&mut a, KeyCode::Char('y'));
        assert!(a.modal.is_none());
        assert!(a.monitor.wait_idle(WAIT));
        assert!(a.monitor.dashboard().confirm().is_none());
        assert_eq!(
            a.monitor.dashboard().last_notification().unwrap().message,
            "Tree Refreshed"
        );
    }

    #[test]
    fn variables_modal_submits_typed_assignment() {
        let mut a = app();
        a.monitor
            .select_path(&NodePath::parse("/forecast/obs").unwrap());
        press(&mut a, KeyCode::Char('v'));
        assert!(a.monitor.wait_idle(WAIT));
        assert!(matches!(
            a.modal.as_ref().map(|m| &m.kind),
            Some(ModalKind::Variables { .. })
        ));

        type_str(&mut a, "MODE=fast");
        press(&mut a, KeyCode::Enter);
        assert!(a.monitor.wait_idle(WAIT));
        let set = a.monitor.dashboard().variables().unwrap();
        assert!(set.own().iter().any(|e| e.name == "MODE" && e.value == "fast"));

        press(&mut a, KeyCode::Esc);
        assert!(a.modal.is_none());
        assert!(a.monitor.dashboard().variables().is_none());
    }

    #[test]
    fn variables_need_a_selection() {
        let mut a = app();
        press(&mut a, KeyCode::Char('v'));
        assert!(a.modal.is_none());
    }

    #[test]
    fn toast_follows_latest_notification_and_expires() {
        let mut a = app();
        let start = Instant::now();
        a.on_tick(start);
        assert_eq!(a.toast().unwrap().message, "Tree Refreshed");
        a.on_tick(start + Duration::from_secs(10));
        assert!(a.toast().is_none());

        press(&mut a, KeyCode::Char('F'));
        a.on_tick(start + Duration::from_secs(11));
        assert_eq!(a.toast().unwrap().message, "Filter: aborted");
    }
