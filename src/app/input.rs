use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::trace;

use crate::app::{App, Message, Model};
use crate::contact::Field;
use crate::content::LineKind;
use crate::nav::Debouncer;
use crate::ui::DOCUMENT_SIDE_PADDING;
use crate::ui::nav_bar::NavHit;

/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut Debouncer<(u16, u16)>,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                trace!(width = w, height = h, "resize queued");
                resize_debouncer.notify((*w, *h), now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match mouse.kind {
                MouseEventKind::ScrollUp => Some(Message::HelpScrollUp),
                MouseEventKind::ScrollDown => Some(Message::HelpScrollDown),
                MouseEventKind::Up(MouseButton::Left) => Some(Message::HideHelp),
                _ => None,
            };
        }

        if model.form_visible {
            let popup = crate::ui::contact_form_rect(model.screen_area());
            let clicked = matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left));
            if clicked && !point_in_rect(mouse.column, mouse.row, popup) {
                return Some(Message::CloseContactForm);
            }
            return None;
        }

        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_ROWS)),
            MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_ROWS)),
            MouseEventKind::Up(MouseButton::Left) => {
                let layout = model.nav_layout();
                match layout.hit(mouse.column, mouse.row) {
                    Some(NavHit::Brand) => {
                        return Some(Message::NavigateTo(
                            model.portfolio.initial_section_id().to_string(),
                        ));
                    }
                    Some(NavHit::Item(idx)) => return Some(Message::NavActivate(idx)),
                    Some(NavHit::MenuButton) => return Some(Message::ToggleMenu),
                    None => {}
                }
                if layout.covers(mouse.column, mouse.row) {
                    return None;
                }
                if model.navigator.menu_open() {
                    return Some(Message::CloseMenu);
                }
                if !in_document_text(model, mouse.column) {
                    return None;
                }
                let line = doc_line_for_row(model, mouse.row)?;
                let kind = model.document.lines().get(line)?.kind();
                (kind == LineKind::FormHint).then_some(Message::OpenContactForm)
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if model.help_visible {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::HelpScrollDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::HelpScrollUp),
                KeyCode::Char('c') if ctrl => Some(Message::Quit),
                _ => Some(Message::HideHelp),
            };
        }

        if model.form_visible {
            return match key.code {
                KeyCode::Esc => Some(Message::CloseContactForm),
                KeyCode::Tab | KeyCode::Down => Some(Message::FormNextField),
                KeyCode::BackTab | KeyCode::Up => Some(Message::FormPrevField),
                KeyCode::Enter if model.contact.focus() == Field::Message => {
                    Some(Message::FormInput('\n'))
                }
                KeyCode::Enter => Some(Message::FormNextField),
                KeyCode::Backspace => Some(Message::FormBackspace),
                KeyCode::Char('s') if ctrl => Some(Message::FormSubmit),
                KeyCode::Char('c') if ctrl => Some(Message::Quit),
                KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                    Some(Message::FormInput(c))
                }
                _ => None,
            };
        }

        let can_scroll_up = model.viewport.offset() > 0;
        let can_scroll_down = model.viewport.offset() < model.viewport.max_offset();

        match key.code {
            // Scrolling
            KeyCode::Char('j') | KeyCode::Down if can_scroll_down => Some(Message::ScrollDown(1)),
            KeyCode::Char('k') | KeyCode::Up if can_scroll_up => Some(Message::ScrollUp(1)),
            KeyCode::Char(' ') | KeyCode::PageDown if can_scroll_down => Some(Message::PageDown),
            KeyCode::Char('b') | KeyCode::PageUp if can_scroll_up => Some(Message::PageUp),
            KeyCode::Char('d') if ctrl && can_scroll_down => Some(Message::HalfPageDown),
            KeyCode::Char('u') if ctrl && can_scroll_up => Some(Message::HalfPageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),

            // Sections
            KeyCode::Char(c @ '1'..='9') => {
                let idx = usize::from(c as u8 - b'1');
                (idx < model.nav_items.len()).then_some(Message::NavActivate(idx))
            }
            KeyCode::Tab => Some(Message::NavFocusNext),
            KeyCode::BackTab => Some(Message::NavFocusPrev),
            KeyCode::Enter if model.nav_focus.is_some() => Some(Message::NavFocusActivate),
            KeyCode::Esc if model.navigator.menu_open() || model.nav_focus.is_some() => {
                Some(Message::CloseMenu)
            }
            KeyCode::Char('m') => Some(Message::ToggleMenu),

            // Contact
            KeyCode::Char('c') if ctrl => Some(Message::Quit),
            KeyCode::Char('c') => Some(Message::OpenContactForm),

            // Content
            KeyCode::Char('w') => Some(Message::ToggleWatch),
            KeyCode::Char('r' | 'R') => Some(Message::ForceReload),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('l') if ctrl => Some(Message::Redraw),

            KeyCode::Char('q') => Some(Message::Quit),

            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Document line under screen `row`, if the row shows content.
fn doc_line_for_row(model: &Model, row: u16) -> Option<usize> {
    if row >= model.viewport.height() {
        return None;
    }
    let line = model.viewport.offset() + usize::from(row);
    (line < model.document.line_count()).then_some(line)
}

/// Whether `col` falls inside the padded document text.
fn in_document_text(model: &Model, col: u16) -> bool {
    let right = model.viewport.width().saturating_sub(DOCUMENT_SIDE_PADDING);
    col >= DOCUMENT_SIDE_PADDING && col < right
}
