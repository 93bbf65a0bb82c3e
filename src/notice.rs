use eframe::egui::{self, Align2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind { Error, Warning, Info }

/// Modal message shown over whichever screen is active.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        let notice = Self { kind, title: title.into(), message: message.into() };
        match kind {
            NoticeKind::Error => tracing::error!(title = %notice.title, "{}", notice.message),
            NoticeKind::Warning => tracing::warn!(title = %notice.title, "{}", notice.message),
            NoticeKind::Info => tracing::info!(title = %notice.title, "{}", notice.message),
        }
        notice
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }

    /// Returns true once dismissed.
    pub fn show(&self, ctx: &egui::Context) -> bool {
        let mut dismissed = false;
        let color = match self.kind {
            NoticeKind::Error => egui::Color32::LIGHT_RED,
            NoticeKind::Warning => egui::Color32::YELLOW,
            NoticeKind::Info => egui::Color32::LIGHT_BLUE,
        };
        egui::Window::new(self.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.colored_label(color, self.message.as_str());
                ui.add_space(8.0);
                if ui.button("Ok").clicked() { dismissed = true; }
            });
        dismissed
    }
}
