use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::ui::nav_bar::{MENU_CLOSED, MENU_OPEN, NavBarLayout, item_cell};

use super::{DOCUMENT_SIDE_PADDING, overlays, status};

/// Width the document is laid out at for a terminal `total_width` wide.
pub fn document_content_width(total_width: u16) -> u16 {
    total_width
        .saturating_sub(DOCUMENT_SIDE_PADDING.saturating_mul(2))
        .max(1)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let toast_active = model.active_toast().is_some();

    let doc_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    render_document(model, frame, doc_area);
    render_nav_bar(model, frame, &model.nav_layout());

    if toast_active && area.height >= 2 {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if model.form_visible {
        overlays::render_contact_form(model, frame, area);
    }
}

fn render_document(model: &Model, frame: &mut Frame, area: Rect) {
    let palette = model.palette;
    let content: Vec<Line> = model
        .document
        .visible_lines(model.viewport.offset(), usize::from(area.height))
        .iter()
        .map(|line| Line::styled(line.text().to_string(), palette.line(line.kind())))
        .collect();

    let block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::horizontal(DOCUMENT_SIDE_PADDING));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_nav_bar(model: &Model, frame: &mut Frame, layout: &NavBarLayout) {
    let palette = model.palette;
    frame.render_widget(Clear, layout.bar);
    frame.render_widget(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(palette.nav_border())
            .style(palette.nav_bar()),
        layout.bar,
    );
    frame.render_widget(
        Paragraph::new(model.brand.as_str()).style(palette.brand()),
        layout.brand,
    );

    let active = model.navigator.active_id();
    for (idx, (rect, item)) in layout.items.iter().zip(&model.nav_items).enumerate() {
        let style = palette.nav_item(item.target == active, model.nav_focus == Some(idx));
        frame.render_widget(Paragraph::new(item_cell(&item.label)).style(style), *rect);
    }

    if let Some(button) = layout.menu_button {
        let symbol = if model.navigator.menu_open() {
            MENU_OPEN
        } else {
            MENU_CLOSED
        };
        frame.render_widget(Paragraph::new(symbol).style(palette.brand()), button);
    }

    if let Some(dropdown) = layout.dropdown {
        frame.render_widget(Clear, dropdown);
        frame.render_widget(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(palette.nav_border())
                .style(palette.nav_bar()),
            dropdown,
        );
        for (idx, (rect, item)) in layout
            .dropdown_items
            .iter()
            .zip(&model.nav_items)
            .enumerate()
        {
            let style = palette.nav_item(item.target == active, model.nav_focus == Some(idx));
            let row = Rect {
                x: rect.x + DOCUMENT_SIDE_PADDING.min(rect.width),
                width: rect.width.saturating_sub(DOCUMENT_SIDE_PADDING * 2),
                ..*rect
            };
            frame.render_widget(Paragraph::new(item_cell(&item.label)).style(style), row);
        }
    }
}
