//! Toast stack drawn in the bottom-right corner.

use std::{
    collections::VecDeque,
    sync::Mutex,
    time::{Duration, Instant},
};

use client_core::{Notification, NotificationLevel, NotificationSink};
use eframe::egui;

const MAX_VISIBLE_TOASTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

#[derive(Default)]
pub struct ToastQueue {
    toasts: Mutex<VecDeque<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_at(&self, notification: Notification, now: Instant) {
        let toast = Toast {
            expires_at: now + notification.duration,
            notification,
        };
        let mut toasts = self.lock();
        toasts.push_back(toast);
        while toasts.len() > MAX_VISIBLE_TOASTS {
            toasts.pop_front();
        }
    }

    /// Drops expired toasts and returns the rest, oldest first.
    pub fn visible_at(&self, now: Instant) -> Vec<Toast> {
        let mut toasts = self.lock();
        toasts.retain(|toast| toast.expires_at > now);
        toasts.iter().cloned().collect()
    }

    pub fn dismiss(&self, index: usize) {
        self.lock().remove(index);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Toast>> {
        match self.toasts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn show(&self, ctx: &egui::Context) {
        let now = Instant::now();
        let toasts = self.visible_at(now);
        if toasts.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("category_admin_toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_max_width(320.0);
                for (index, toast) in toasts.iter().enumerate() {
                    let (fill, accent) = match toast.notification.level {
                        NotificationLevel::Success => (
                            egui::Color32::from_rgb(36, 84, 56),
                            egui::Color32::from_rgb(110, 200, 140),
                        ),
                        NotificationLevel::Error => (
                            egui::Color32::from_rgb(111, 53, 53),
                            egui::Color32::from_rgb(175, 96, 96),
                        ),
                    };
                    egui::Frame::NONE
                        .fill(fill)
                        .stroke(egui::Stroke::new(1.0, accent))
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(10, 8))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(
                                    egui::RichText::new(&toast.notification.message)
                                        .color(egui::Color32::WHITE),
                                );
                                if ui.small_button("x").clicked() {
                                    dismissed = Some(index);
                                }
                            });
                        });
                    ui.add_space(6.0);
                }
            });

        if let Some(index) = dismissed {
            self.dismiss(index);
        }
        if let Some(next_expiry) = toasts.iter().map(|toast| toast.expires_at).min() {
            ctx.request_repaint_after(
                next_expiry.saturating_duration_since(now) + Duration::from_millis(10),
            );
        }
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }
}
