    use super::*;

    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::model::{ClientConfig, NodePath};
    use crate::monitor::Monitor;
    use crate::remote::{MemoryClient, WorkflowClient};
    use crate::tui_shell::Modal;

    const WAIT: Duration = Duration::from_secs(5);

    fn render(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app_with(client: Arc<dyn WorkflowClient>) -> App {
        let mut monitor = Monitor::new(client, &ClientConfig::default());
        monitor.connect();
        assert!(monitor.wait_idle(WAIT));
        let mut app = App::new(monitor);
        app.on_tick(Instant::now());
        app
    }

    fn demo_app() -> App {
        app_with(Arc::new(MemoryClient::demo().unwrap()))
    }

    #[test]
    fn dashboard_shows_tree_status_and_toast() {
        let app = demo_app();
        let screen = render(&app, 140, 30);
        assert!(screen.contains("flowtop"));
        assert!(screen.contains("Suites"));
        assert!(screen.contains("forecast"));
        assert!(screen.contains("run_model"));
        assert!(screen.contains("RUNNING"));
        assert!(screen.contains("Filter: all"));
        assert!(screen.contains("Live: OFF"));
        assert!(screen.contains("Tree Refreshed"));
        assert!(screen.contains("Press l to load files"));
    }

    #[test]
    fn loaded_output_is_drawn_in_the_content_pane() {
        let mut app = demo_app();
        app.monitor
            .select_path(&NodePath::parse("/forecast/products/plots").unwrap());
        app.monitor.load_node();
        assert!(app.monitor.wait_idle(WAIT));
        let screen = render(&app, 140, 30);
        assert!(screen.contains("ERROR: missing field t2m"));
        assert!(screen.contains("/forecast/products/plots"));
    }

    #[test]
    fn collapsed_rows_are_not_drawn() {
        let mut app = demo_app();
        app.monitor
            .select_path(&NodePath::parse("/forecast").unwrap());
        app.monitor.toggle_collapse();
        let screen = render(&app, 140, 30);
        assert!(screen.contains("forecast"));
        assert!(!screen.contains("run_model"));
        assert!(screen.contains("housekeeping"));
    }

    #[test]
    fn confirm_modal_is_drawn_over_the_dashboard() {
        let mut app = demo_app();
        app.monitor
            .select_path(&NodePath::parse("/forecast/products/plots").unwrap());
        app.monitor.ask_requeue();
        app.on_tick(Instant::now());
        assert!(app.modal.is_some());
        let screen = render(&app, 140, 30);
        assert!(screen.contains("Re-queue /forecast/products/plots now?"));
        assert!(screen.contains("y = yes"));
    }

    #[test]
    fn viewer_modal_lists_lines() {
        let mut app = demo_app();
        app.modal = Some(Modal::viewer(
            "Why: /forecast",
            vec!["Node:     /forecast".to_string()],
        ));
        let screen = render(&app, 140, 30);
        assert!(screen.contains("Why: /forecast"));
        assert!(screen.contains("Node:     /forecast"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let app = demo_app();
        let _ = render(&app, 10, 3);
    }
