use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::contact::{Field, FormStatus};
use crate::content::wrap_text;

/// Rows the message field may grow to before it scrolls.
const MESSAGE_ROWS: usize = 4;

pub fn help_rect(area: Rect) -> Rect {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(6).max(12);
    centered_popup_rect(popup_width, popup_height, area)
}

pub fn contact_form_rect(area: Rect) -> Rect {
    let popup_width = area.width.saturating_sub(8).clamp(30, 64);
    let popup_height = 22.min(area.height);
    centered_popup_rect(popup_width, popup_height, area)
}

fn help_lines(model: &Model) -> Vec<Line<'static>> {
    let section_style = model.palette.popup_heading();
    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let mut lines = vec![
        Line::styled("Scrolling", section_style),
        Line::raw("  j/k or Up/Down      Scroll"),
        Line::raw("  Space/PageDown      Page down"),
        Line::raw("  b/PageUp            Page up"),
        Line::raw("  Ctrl-d / Ctrl-u     Half page"),
        Line::raw("  g / G               Top / bottom"),
        Line::raw(""),
        Line::styled("Sections", section_style),
        Line::raw("  1-9                 Jump to nav item"),
        Line::raw("  Tab / Shift-Tab     Move nav focus"),
        Line::raw("  Enter               Go to focused item"),
        Line::raw("  m                   Toggle menu (narrow)"),
        Line::raw("  Mouse click         Nav items, brand, menu"),
        Line::raw(""),
        Line::styled("Contact", section_style),
        Line::raw("  c                   Open contact form"),
        Line::raw("  Tab / Shift-Tab     Next / previous field"),
        Line::raw("  Enter               New line in message"),
        Line::raw("  Ctrl-s              Send"),
        Line::raw("  Esc                 Close form"),
        Line::raw(""),
        Line::styled("Other", section_style),
        Line::raw("  w                   Toggle watch"),
        Line::raw("  r                   Reload content"),
        Line::raw("  q / Ctrl-c          Quit"),
        Line::raw("  ? / F1              Toggle help"),
        Line::raw(""),
        Line::styled("Config", section_style),
        Line::raw(format!("  Global: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
    ];
    if let Some(mailer) = &model.mailer_label {
        lines.push(Line::raw(format!("  Mail: {mailer}")));
    }
    lines
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup = help_rect(area);
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(model.palette.popup());
    frame.render_widget(Clear, popup);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let all_lines = help_lines(model);
    let content_height = inner.height.saturating_sub(1);
    let max_scroll = all_lines.len().saturating_sub(usize::from(content_height));
    let scroll = model.help_scroll.min(max_scroll);
    let visible: Vec<Line> = all_lines
        .into_iter()
        .skip(scroll)
        .take(usize::from(content_height))
        .collect();

    frame.render_widget(
        Paragraph::new(visible),
        Rect {
            height: content_height,
            ..inner
        },
    );
    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    frame.render_widget(
        Paragraph::new(Line::styled("j/k scroll \u{2502} Esc closes", model.palette.dim())),
        footer_area,
    );
}

pub fn render_contact_form(model: &Model, frame: &mut Frame, area: Rect) {
    let popup = contact_form_rect(area);
    let palette = model.palette;
    let form = &model.contact;
    let block = Block::default()
        .title("Get in Touch")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(palette.popup());
    let inner = block.inner(popup);
    let field_width = usize::from(inner.width.saturating_sub(2)).max(1);

    let mut lines = vec![
        Line::styled(format!("To: {}", form.recipient()), palette.dim()),
        Line::raw(""),
    ];
    for field in Field::ALL {
        let focused = form.focus() == field;
        let marker = if focused { "›" } else { " " };
        lines.push(Line::styled(
            format!("{marker} {}", field.label()),
            palette.field(focused),
        ));
        let value = form.value(field);
        let cursor = if focused && !form.is_submitting() { "▏" } else { "" };
        if value.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::raw(cursor),
                Span::styled(field.placeholder(), palette.dim()),
            ]));
        } else {
            let wrapped: Vec<String> = value
                .split('\n')
                .flat_map(|para| wrap_text(para, field_width, "", ""))
                .collect();
            let rows = if field == Field::Message {
                MESSAGE_ROWS
            } else {
                1
            };
            let start = wrapped.len().saturating_sub(rows);
            let last = wrapped.len().saturating_sub(1);
            for (idx, row) in wrapped.iter().enumerate().skip(start) {
                let tail = if idx == last { cursor } else { "" };
                lines.push(Line::raw(format!("  {row}{tail}")));
            }
        }
        lines.push(Line::raw(""));
    }

    match form.status() {
        FormStatus::Idle => {}
        FormStatus::Submitting => {
            lines.push(Line::styled(
                FormStatus::Submitting.banner().unwrap_or_default(),
                palette.dim(),
            ));
        }
        status @ FormStatus::Success => {
            lines.push(Line::styled(status.banner().unwrap_or_default(), palette.success()));
        }
        status @ FormStatus::Error(_) => {
            lines.push(Line::styled(status.banner().unwrap_or_default(), palette.failure()));
        }
    }
    if let Some(error) = &model.form_error {
        lines.push(Line::styled(error.clone(), palette.failure()));
    }

    let footer = if form.is_submitting() {
        "Sending, please wait"
    } else {
        "Tab next · Ctrl-s send · Esc close"
    };

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    let body_height = inner.height.saturating_sub(1);
    frame.render_widget(
        Paragraph::new(lines),
        Rect {
            height: body_height,
            ..inner
        },
    );
    frame.render_widget(
        Paragraph::new(Line::styled(footer, palette.dim())),
        Rect::new(inner.x, inner.y + body_height, inner.width, 1),
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
