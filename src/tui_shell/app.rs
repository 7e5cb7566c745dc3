use std::time::{Duration, Instant};

use crate::error::Notification;
use crate::monitor::Monitor;

use super::Modal;

mod event_loop;
mod render;
mod runtime;

pub(super) use self::runtime::run;

const TOAST_TTL: Duration = Duration::from_secs(4);

struct Toast {
    notification: Notification,
    shown_at: Instant,
}

pub(super) struct App {
    pub(super) monitor: Monitor,
    pub(super) modal: Option<Modal>,
    pub(super) content_scroll: u16,
    toast: Option<Toast>,
    // `Dashboard::notified` value already turned into a toast.
    seen: u64,
    pub(super) quit: bool,
}

impl App {
    pub(super) fn new(monitor: Monitor) -> Self {
        Self {
            monitor,
            modal: None,
            content_scroll: 0,
            toast: None,
            seen: 0,
            quit: false,
        }
    }

    fn load(opts: crate::tui::TuiRunOptions) -> Self {
        let mut monitor = Monitor::new(opts.client, &opts.config);
        monitor.connect();
        Self::new(monitor)
    }

    /// Once per loop iteration: apply job results, then surface the newest
    /// notification and any pending confirmation.
    pub(super) fn on_tick(&mut self, now: Instant) {
        self.monitor.pump(now);
        let dashboard = self.monitor.dashboard();

        if dashboard.notified() != self.seen {
            self.seen = dashboard.notified();
            if let Some(latest) = dashboard.last_notification() {
                self.toast = Some(Toast {
                    notification: latest.clone(),
                    shown_at: now,
                });
            }
        }
        if self
            .toast
            .as_ref()
            .is_some_and(|t| now.saturating_duration_since(t.shown_at) > TOAST_TTL)
        {
            self.toast = None;
        }

        if self.modal.is_none() {
            if let Some(confirm) = dashboard.confirm() {
                self.modal = Some(Modal::confirm(confirm.clone()));
            }
        }
    }

    pub(super) fn toast(&self) -> Option<&Notification> {
        self.toast.as_ref().map(|t| &t.notification)
    }
}
