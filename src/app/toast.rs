use eframe::egui::{self, Align2, Color32, RichText};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Where the controller reports outcomes the user should notice.
pub trait Notifier {
    fn notify_success(&mut self, message: &str);
    fn notify_error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    shown_at: Instant,
}

/// Auto-dismissing notifications drawn at the top centre of the window.
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    lifetime: Duration,
}

impl ToastQueue {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            lifetime,
        }
    }

    fn push(&mut self, kind: ToastKind, message: &str, now: Instant) {
        self.toasts.push_back(Toast {
            kind,
            message: message.to_string(),
            shown_at: now,
        });
    }

    pub fn expire(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < lifetime);
    }

    pub fn active(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.expire(Instant::now());
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new("toasts")
            .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 12.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in self.active() {
                    let (icon, color) = match toast.kind {
                        ToastKind::Success => ("✅", Color32::from_rgb(0, 180, 0)),
                        ToastKind::Error => ("❌", Color32::from_rgb(220, 50, 50)),
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(icon);
                            ui.label(RichText::new(&toast.message).color(color));
                        });
                    });
                    ui.add_space(6.0);
                }
            });
    }
}

impl Notifier for ToastQueue {
    fn notify_success(&mut self, message: &str) {
        self.push(ToastKind::Success, message, Instant::now());
    }

    fn notify_error(&mut self, message: &str) {
        self.push(ToastKind::Error, message, Instant::now());
    }
}
