use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let percent = model.viewport.scroll_percent();
    let section = model.active_label();
    let watch_indicator = if model.watch_enabled {
        " [watching]"
    } else {
        ""
    };
    let sending = if model.contact.is_submitting() {
        " [sending]"
    } else {
        ""
    };

    let status = format!(
        " {}  » {}  [{}%]{}{}  ?:help",
        model.portfolio.owner, section, percent, watch_indicator, sending
    );

    frame.render_widget(
        Paragraph::new(status).style(model.palette.status_bar()),
        area,
    );
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let prefix = match level {
        crate::app::ToastLevel::Info => "[info]",
        crate::app::ToastLevel::Warning => "[warn]",
        crate::app::ToastLevel::Error => "[error]",
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(model.palette.toast(level));
    frame.render_widget(toast, area);
}
