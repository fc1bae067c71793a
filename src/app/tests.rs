use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tempfile::tempdir;

use crate::contact::{Dispatcher, Field, FormStatus, OutboxMailer, STATUS_RESET_MS};
use crate::content::{LineKind, Portfolio};
use crate::nav::{ANIMATION_FRAME_MS, DEFAULT_DEBOUNCE_MS, Debouncer, NAV_HEIGHT, NavConfig};

use super::{App, Message, Model, ToastLevel, update};

fn create_test_model() -> Model {
    create_model_with_width(120)
}

fn create_model_with_width(width: u16) -> Model {
    let portfolio = Portfolio::builtin().unwrap();
    let mut model = Model::new(portfolio, (width, 30), NavConfig::default());
    model.set_clock(1_000);
    model
}

fn create_small_model() -> Model {
    let portfolio = Portfolio::parse(
        r#"{
            owner: "Test Person",
            email: "me@example.com",
            sections: [
                { id: "home", blocks: [{ type: "hero" }] },
                { id: "contact", title: "Contact", blocks: [{ type: "contact_form" }] },
            ],
        }"#,
    )
    .unwrap();
    Model::new(portfolio, (80, 24), NavConfig::default())
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn body_top(model: &Model, id: &str) -> usize {
    model.document.section(id).unwrap().body_top
}

fn nav_index(model: &Model, id: &str) -> usize {
    model
        .nav_items
        .iter()
        .position(|item| item.target == id)
        .unwrap()
}

/// Run animation frames until the smooth scroll finishes.
fn finish_animation(model: &mut Model) -> u64 {
    let mut now = model.now_ms();
    while model.navigator.is_animating() {
        now += ANIMATION_FRAME_MS;
        model.poll_timers(now);
    }
    now
}

/// Let any animation finish and the scroll debounce fire.
fn settle(model: &mut Model) {
    let now = finish_animation(model);
    model.poll_timers(now + DEFAULT_DEBOUNCE_MS);
}

#[test]
fn test_model_starts_on_first_section() {
    let model = create_test_model();
    assert_eq!(model.navigator.active_id(), "home");
    assert!(!model.navigator.menu_open());
    assert_eq!(model.nav_items.len(), 8);
    assert_eq!(model.brand, "GS");
    assert_eq!(model.viewport.height(), 29);
    assert_eq!(model.active_label(), "Home");
}

#[test]
fn test_scroll_down_updates_viewport() {
    let model = create_test_model();
    let model = update(model, Message::ScrollDown(5));
    assert_eq!(model.viewport.offset(), 5);
}

#[test]
fn test_scroll_up_updates_viewport() {
    let mut model = create_test_model();
    model.viewport.scroll_down(10);
    let model = update(model, Message::ScrollUp(3));
    assert_eq!(model.viewport.offset(), 7);
}

#[test]
fn test_active_section_waits_for_scroll_to_settle() {
    let model = create_test_model();
    let rows = body_top(&model, "about");
    let mut model = update(model, Message::ScrollDown(rows));
    assert_eq!(model.navigator.active_id(), "home");

    assert!(!model.poll_timers(1_000 + DEFAULT_DEBOUNCE_MS - 1));
    assert_eq!(model.navigator.active_id(), "home");

    assert!(model.poll_timers(1_000 + DEFAULT_DEBOUNCE_MS));
    assert_eq!(model.navigator.active_id(), "about");
    assert_eq!(model.active_label(), "About");
}

#[test]
fn test_scroll_burst_resolves_once_at_final_offset() {
    let mut model = create_test_model();
    let target = body_top(&model, "skills");
    let mut now = 1_000;
    while model.viewport.offset() < target {
        model.set_clock(now);
        model = update(model, Message::ScrollDown(1));
        model.poll_timers(now);
        assert_eq!(model.navigator.active_id(), "home");
        now += 10;
    }
    let last = now - 10;
    model.poll_timers(last + DEFAULT_DEBOUNCE_MS);
    assert_eq!(model.navigator.active_id(), "skills");
}

#[test]
fn test_scroll_at_bottom_does_not_notify() {
    let mut model = create_test_model();
    model = update(model, Message::GoToBottom);
    let settled = 1_000 + DEFAULT_DEBOUNCE_MS;
    model.poll_timers(settled);
    assert!(!model.navigator.is_settling());

    model.set_clock(settled + 1);
    model = update(model, Message::ScrollDown(1));
    assert!(!model.navigator.is_settling());
}

#[test]
fn test_nav_activate_sets_active_immediately_and_closes_menu() {
    let model = create_model_with_width(40);
    let model = update(model, Message::ToggleMenu);
    assert!(model.navigator.menu_open());

    let idx = nav_index(&model, "projects");
    let model = update(model, Message::NavActivate(idx));
    assert_eq!(model.navigator.active_id(), "projects");
    assert!(!model.navigator.menu_open());
    assert!(model.navigator.is_animating());
}

#[test]
fn test_navigation_lands_below_nav_bar_and_stays_active() {
    let model = create_test_model();
    let idx = nav_index(&model, "projects");
    let mut model = update(model, Message::NavActivate(idx));
    let now = finish_animation(&mut model);

    let expected = body_top(&model, "projects") - usize::from(NAV_HEIGHT);
    assert_eq!(model.viewport.offset(), expected);
    model.poll_timers(now + DEFAULT_DEBOUNCE_MS);
    assert_eq!(model.navigator.active_id(), "projects");
}

#[test]
fn test_navigation_without_smooth_scroll_jumps() {
    let portfolio = Portfolio::builtin().unwrap();
    let config = NavConfig {
        smooth_scroll: false,
        ..NavConfig::default()
    };
    let model = Model::new(portfolio, (120, 30), config);
    let model = update(model, Message::NavigateTo("education".to_string()));
    let expected = body_top(&model, "education") - usize::from(NAV_HEIGHT);
    assert_eq!(model.viewport.offset(), expected);
    assert!(!model.navigator.is_animating());
    assert_eq!(model.navigator.active_id(), "education");
}

#[test]
fn test_navigate_to_unknown_id_is_noop() {
    let model = create_model_with_width(40);
    let model = update(model, Message::ToggleMenu);
    let model = update(model, Message::NavigateTo("nowhere".to_string()));
    assert_eq!(model.navigator.active_id(), "home");
    assert_eq!(model.viewport.offset(), 0);
    assert!(model.navigator.menu_open());
}

#[test]
fn test_user_scroll_cancels_navigation_animation() {
    let model = create_test_model();
    let model = update(model, Message::NavigateTo("contact".to_string()));
    assert!(model.navigator.is_animating());
    let model = update(model, Message::ScrollUp(1));
    assert!(!model.navigator.is_animating());
}

#[test]
fn test_page_down_leaves_room_for_nav_bar() {
    let model = create_test_model();
    let model = update(model, Message::PageDown);
    assert_eq!(
        model.viewport.offset(),
        usize::from(model.viewport.height() - NAV_HEIGHT)
    );
}

#[test]
fn test_go_to_top_and_bottom_resolve_edge_sections() {
    let model = create_test_model();
    let mut model = update(model, Message::GoToBottom);
    assert_eq!(model.viewport.offset(), model.viewport.max_offset());
    settle(&mut model);
    let last = model.document.sections().last().unwrap().id.clone();
    assert_eq!(model.navigator.active_id(), last);

    let mut model = update(model, Message::GoToTop);
    assert_eq!(model.viewport.offset(), 0);
    settle(&mut model);
    assert_eq!(model.navigator.active_id(), "home");
}

#[test]
fn test_returning_to_top_reactivates_first_section() {
    let model = create_test_model();
    let rows = body_top(&model, "projects") + 1;
    let mut model = update(model, Message::ScrollDown(rows));
    settle(&mut model);
    assert_eq!(model.navigator.active_id(), "projects");

    let mut model = update(model, Message::GoToTop);
    settle(&mut model);
    assert_eq!(model.navigator.active_id(), "home");
}

#[test]
fn test_scrolling_up_to_second_row_reactivates_first_section() {
    let model = create_test_model();
    let rows = body_top(&model, "about") + 1;
    let mut model = update(model, Message::ScrollDown(rows));
    settle(&mut model);
    assert_eq!(model.navigator.active_id(), "about");

    let mut model = update(model, Message::ScrollUp(rows - 1));
    assert_eq!(model.viewport.offset(), 1);
    settle(&mut model);
    assert_eq!(model.navigator.active_id(), "home");
}

#[test]
fn test_nav_focus_cycles_and_activates() {
    let model = create_test_model();
    let model = update(model, Message::NavFocusPrev);
    assert_eq!(model.nav_focus, Some(7));
    let model = update(model, Message::NavFocusNext);
    assert_eq!(model.nav_focus, Some(0));
    let model = update(model, Message::NavFocusNext);
    assert_eq!(model.nav_focus, Some(1));

    let model = update(model, Message::NavFocusActivate);
    assert_eq!(model.navigator.active_id(), "about");
    assert_eq!(model.nav_focus, None);
}

#[test]
fn test_nav_focus_opens_menu_when_compact() {
    let model = create_model_with_width(40);
    assert!(model.nav_layout().compact);
    let model = update(model, Message::NavFocusNext);
    assert!(model.navigator.menu_open());
    let model = update(model, Message::CloseMenu);
    assert!(!model.navigator.menu_open());
    assert_eq!(model.nav_focus, None);
}

#[test]
fn test_resize_relayouts_and_resolves_immediately() {
    let model = create_test_model();
    let wide_lines = model.document.line_count();
    let rows = body_top(&model, "skills") + 1;
    let mut model = update(model, Message::ScrollDown(rows));
    model.poll_timers(1_000 + DEFAULT_DEBOUNCE_MS);
    assert_eq!(model.navigator.active_id(), "skills");

    let model = update(model, Message::Resize(40, 20));
    assert_eq!(model.viewport.width(), 40);
    assert_eq!(model.viewport.height(), 19);
    assert_eq!(model.document.width(), 36);
    assert!(model.document.line_count() > wide_lines);
    let offset = model.viewport.offset();
    let owner = model.document.section_at(offset).unwrap();
    assert!(offset <= model.viewport.max_offset());
    assert!(
        model.navigator.active_id() == owner.id || model.navigator.active_id() == "skills",
        "active section should follow the new layout"
    );
}

#[test]
fn test_resize_mid_animation_retargets_section() {
    let model = create_test_model();
    let mut model = update(model, Message::NavigateTo("experience".to_string()));
    model.poll_timers(model.now_ms() + ANIMATION_FRAME_MS);
    assert!(model.navigator.is_animating());

    let mut model = update(model, Message::Resize(50, 24));
    assert!(model.navigator.is_animating());
    assert_eq!(model.navigator.active_id(), "experience");

    settle(&mut model);
    let expected = body_top(&model, "experience") - usize::from(NAV_HEIGHT);
    assert_eq!(model.viewport.offset(), expected);
    assert_eq!(model.navigator.active_id(), "experience");
}

#[test]
fn test_toggle_help_changes_visibility() {
    let model = create_test_model();
    let model = update(model, Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HelpScrollDown);
    assert_eq!(model.help_scroll, 1);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
    assert_eq!(model.help_scroll, 0);
}

#[test]
fn test_toggle_watch_changes_state() {
    let model = create_test_model();
    assert!(!model.watch_enabled);
    let model = update(model, Message::ToggleWatch);
    assert!(model.watch_enabled);
}

#[test]
fn test_quit_sets_should_quit() {
    let model = create_test_model();
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_toast_lifecycle() {
    let mut model = create_test_model();
    model.show_toast(ToastLevel::Info, "Hello");
    assert_eq!(model.active_toast(), Some(("Hello", ToastLevel::Info)));
    assert_eq!(model.next_deadline_ms(), Some(5_000));
    assert!(!model.poll_timers(4_999));
    assert!(model.poll_timers(5_000));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_contact_form_open_type_and_close() {
    let model = create_test_model();
    let model = update(model, Message::OpenContactForm);
    assert!(model.form_visible);
    let model = update(model, Message::FormInput('A'));
    let model = update(model, Message::FormInput('l'));
    let model = update(model, Message::FormBackspace);
    assert_eq!(model.contact.value(Field::Name), "A");
    let model = update(model, Message::FormNextField);
    assert_eq!(model.contact.focus(), Field::Email);
    let model = update(model, Message::CloseContactForm);
    assert!(!model.form_visible);
    assert_eq!(model.contact.value(Field::Name), "A");
}

#[test]
fn test_contact_form_requires_recipient() {
    let portfolio = Portfolio::parse(r#"{ owner: "X", sections: [{ id: "home" }] }"#).unwrap();
    let model = Model::new(portfolio, (80, 24), NavConfig::default());
    let model = update(model, Message::OpenContactForm);
    assert!(!model.form_visible);
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Warning));
}

#[test]
fn test_submit_with_missing_fields_reports_error() {
    let model = create_small_model();
    let model = update(model, Message::OpenContactForm);
    let model = update(model, Message::FormSubmit);
    assert_eq!(model.form_error.as_deref(), Some("Name is required"));
    assert_eq!(*model.contact.status(), FormStatus::Idle);

    let mut model = update(model, Message::FormInput('x'));
    assert!(model.form_error.is_none());
    assert!(model.take_outgoing().is_none());
}

fn filled_form(model: Model) -> Model {
    let mut model = update(model, Message::OpenContactForm);
    for (field, text) in [
        (Field::Name, "Ada"),
        (Field::Email, "ada@example.com"),
        (Field::Subject, "Hello"),
        (Field::Message, "Nice portfolio"),
    ] {
        model.contact.set_focus(field);
        for ch in text.chars() {
            model = update(model, Message::FormInput(ch));
        }
    }
    model
}

#[test]
fn test_submit_queues_message_and_completes() {
    let model = filled_form(create_small_model());
    let mut model = update(model, Message::FormSubmit);
    assert!(model.contact.is_submitting());
    let payload = model.take_outgoing().unwrap();
    assert_eq!(payload.to_email, "me@example.com");
    assert_eq!(payload.from_name, "Ada");
    assert!(model.take_outgoing().is_none());

    let model = update(model, Message::FormSubmit);
    assert_eq!(model.form_error.as_deref(), Some("a message is already being sent"));

    let mut model = update(model, Message::ContactDelivered(Ok(())));
    assert_eq!(*model.contact.status(), FormStatus::Success);
    assert_eq!(model.contact.value(Field::Name), "");
    assert!(model.poll_timers(STATUS_RESET_MS));
    assert_eq!(*model.contact.status(), FormStatus::Idle);
}

#[test]
fn test_delivery_result_toasts_when_form_closed() {
    let model = filled_form(create_small_model());
    let model = update(model, Message::FormSubmit);
    let model = update(model, Message::CloseContactForm);
    let model = update(model, Message::ContactDelivered(Err("offline".to_string())));
    assert_eq!(
        model.active_toast(),
        Some(("Send failed: offline", ToastLevel::Error))
    );
    assert_eq!(
        *model.contact.status(),
        FormStatus::Error("offline".to_string())
    );
    assert_eq!(model.contact.value(Field::Name), "Ada");
}

#[test]
fn test_key_mapping_in_normal_mode() {
    let model = create_test_model();
    let cases = [
        (key(KeyCode::Char('j')), Some(Message::ScrollDown(1))),
        (key(KeyCode::Char('k')), None),
        (key(KeyCode::Char(' ')), Some(Message::PageDown)),
        (ctrl('d'), Some(Message::HalfPageDown)),
        (key(KeyCode::Char('G')), Some(Message::GoToBottom)),
        (key(KeyCode::Char('4')), Some(Message::NavActivate(3))),
        (key(KeyCode::Char('9')), None),
        (key(KeyCode::Tab), Some(Message::NavFocusNext)),
        (key(KeyCode::BackTab), Some(Message::NavFocusPrev)),
        (key(KeyCode::Enter), None),
        (key(KeyCode::Esc), None),
        (key(KeyCode::Char('m')), Some(Message::ToggleMenu)),
        (key(KeyCode::Char('c')), Some(Message::OpenContactForm)),
        (ctrl('c'), Some(Message::Quit)),
        (key(KeyCode::Char('w')), Some(Message::ToggleWatch)),
        (key(KeyCode::Char('r')), Some(Message::ForceReload)),
        (key(KeyCode::Char('?')), Some(Message::ToggleHelp)),
        (key(KeyCode::F(1)), Some(Message::ToggleHelp)),
        (key(KeyCode::Char('q')), Some(Message::Quit)),
    ];
    for (event, expected) in cases {
        assert_eq!(App::handle_key(event, &model), expected, "{event:?}");
    }
}

#[test]
fn test_enter_and_esc_follow_nav_focus() {
    let model = update(create_test_model(), Message::NavFocusNext);
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::NavFocusActivate)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::CloseMenu)
    );
}

#[test]
fn test_any_key_closes_help() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::HelpScrollDown)
    );
    for code in [KeyCode::Esc, KeyCode::Char('?'), KeyCode::Char('q'), KeyCode::F(1)] {
        assert_eq!(App::handle_key(key(code), &model), Some(Message::HideHelp));
    }
}

#[test]
fn test_form_mode_captures_typing() {
    let model = update(create_small_model(), Message::OpenContactForm);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::FormInput('q'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::FormNextField)
    );
    assert_eq!(App::handle_key(ctrl('s'), &model), Some(Message::FormSubmit));
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::CloseContactForm)
    );

    let mut model = model;
    model.contact.set_focus(Field::Message);
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::FormInput('\n'))
    );
    assert_eq!(App::handle_key(ctrl('s'), &model), Some(Message::FormSubmit));
}

#[test]
fn test_enter_in_message_field_adds_line_break() {
    let mut model = update(create_small_model(), Message::OpenContactForm);
    model.contact.set_focus(Field::Message);
    for event in [
        key(KeyCode::Char('H')),
        key(KeyCode::Char('i')),
        key(KeyCode::Enter),
        key(KeyCode::Char('!')),
    ] {
        if let Some(msg) = App::handle_key(event, &model) {
            model = update(model, msg);
        }
    }
    assert_eq!(model.contact.value(Field::Message), "Hi\n!");
    assert!(model.form_visible);
    assert!(!model.contact.is_submitting());
}

#[test]
fn test_clicking_nav_item_activates_it() {
    let model = create_test_model();
    let layout = model.nav_layout();
    assert!(!layout.compact);
    let idx = nav_index(&model, "projects");
    let rect = layout.items[idx];

    let msg = App::handle_mouse(click(rect.x + 1, rect.y), &model);
    assert_eq!(msg, Some(Message::NavActivate(idx)));

    let model = update(model, msg.unwrap());
    assert_eq!(model.navigator.active_id(), "projects");
}

#[test]
fn test_clicking_brand_returns_home() {
    let model = create_test_model();
    let brand = model.nav_layout().brand;
    assert_eq!(
        App::handle_mouse(click(brand.x, brand.y), &model),
        Some(Message::NavigateTo("home".to_string()))
    );
}

#[test]
fn test_compact_menu_click_flow() {
    let model = create_model_with_width(40);
    let button = model.nav_layout().menu_button.unwrap();
    let msg = App::handle_mouse(click(button.x, button.y), &model);
    assert_eq!(msg, Some(Message::ToggleMenu));
    let model = update(model, msg.unwrap());
    assert!(model.navigator.menu_open());

    let layout = model.nav_layout();
    let idx = nav_index(&model, "projects");
    let row = layout.dropdown_items[idx];
    let msg = App::handle_mouse(click(row.x + 5, row.y), &model);
    assert_eq!(msg, Some(Message::NavActivate(idx)));

    let model = update(model, msg.unwrap());
    assert_eq!(model.navigator.active_id(), "projects");
    assert!(!model.navigator.menu_open());
}

#[test]
fn test_click_outside_open_menu_closes_it() {
    let model = update(create_model_with_width(40), Message::ToggleMenu);
    let dropdown = model.nav_layout().dropdown.unwrap();
    let below = dropdown.y + dropdown.height + 1;
    assert_eq!(
        App::handle_mouse(click(10, below), &model),
        Some(Message::CloseMenu)
    );
}

#[test]
fn test_mouse_wheel_scrolls() {
    let model = create_test_model();
    let wheel = MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 10,
        row: 10,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        App::handle_mouse(wheel, &model),
        Some(Message::ScrollDown(3))
    );
}

#[test]
fn test_clicking_form_hint_opens_form() {
    let model = create_small_model();
    let hint = model
        .document
        .lines()
        .iter()
        .position(|line| line.kind() == LineKind::FormHint)
        .unwrap();
    let row = u16::try_from(hint - model.viewport.offset()).unwrap();
    assert_eq!(
        App::handle_mouse(click(4, row), &model),
        Some(Message::OpenContactForm)
    );
    assert_eq!(App::handle_mouse(click(0, row), &model), None);
}

#[test]
fn test_click_outside_form_closes_it() {
    let model = update(create_small_model(), Message::OpenContactForm);
    assert_eq!(
        App::handle_mouse(click(0, 0), &model),
        Some(Message::CloseContactForm)
    );
    let popup = crate::ui::contact_form_rect(model.screen_area());
    assert_eq!(
        App::handle_mouse(click(popup.x + 2, popup.y + 2), &model),
        None
    );
}

#[test]
fn test_resize_events_are_debounced() {
    let model = create_test_model();
    let mut debouncer: Debouncer<(u16, u16)> = Debouncer::new(100);
    let event = crossterm::event::Event::Resize(50, 20);
    assert_eq!(App::handle_event(&event, &model, 0, &mut debouncer), None);
    let event = crossterm::event::Event::Resize(60, 25);
    App::handle_event(&event, &model, 50, &mut debouncer);
    assert_eq!(debouncer.take_ready(120), None);
    assert_eq!(debouncer.take_ready(150), Some((60, 25)));
}

#[test]
fn test_teardown_cancels_every_pending_timer() {
    let model = create_test_model();
    let mut model = update(model, Message::NavigateTo("projects".to_string()));
    let mut resize: Debouncer<(u16, u16)> = Debouncer::new(100);
    resize.notify((50, 20), 1_000);
    assert!(model.navigator.is_settling());

    App::teardown(&mut model, &mut resize);
    assert!(!model.navigator.is_animating());
    assert_eq!(model.navigator.next_deadline_ms(), None);
    assert_eq!(resize.take_ready(5_000), None);
    assert!(!model.poll_timers(5_000));
    assert_eq!(model.navigator.active_id(), "projects");
}

#[test]
fn test_poll_timeout_follows_nearest_deadline() {
    let dir = tempdir().unwrap();
    let dispatcher = Dispatcher::new(Box::new(OutboxMailer::new(dir.path().join("out.jsonl"))));
    let mut model = create_test_model();
    let resize: Debouncer<(u16, u16)> = Debouncer::new(100);

    assert_eq!(App::poll_timeout_ms(&model, &resize, None, &dispatcher, 1_000), 250);

    model = update(model, Message::ScrollDown(1));
    assert_eq!(
        App::poll_timeout_ms(&model, &resize, None, &dispatcher, 1_040),
        DEFAULT_DEBOUNCE_MS - 40
    );
}

#[test]
fn test_force_reload_reads_content_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("portfolio.json5");
    std::fs::write(&path, r#"{ owner: "One", sections: [{ id: "home" }] }"#).unwrap();
    let portfolio = Portfolio::load(&path).unwrap();
    let mut model = Model::new(portfolio, (80, 24), NavConfig::default());
    model.content_path = Some(path.clone());
    let mut dispatcher =
        Dispatcher::new(Box::new(OutboxMailer::new(dir.path().join("out.jsonl"))));
    let mut watcher = None;

    std::fs::write(
        &path,
        r#"{ owner: "Two", sections: [{ id: "home" }, { id: "more", title: "More" }] }"#,
    )
    .unwrap();
    model = update(model, Message::ForceReload);
    App::handle_message_side_effects(
        &mut model,
        &mut watcher,
        &mut dispatcher,
        &Message::ForceReload,
    );

    assert_eq!(model.portfolio.owner, "Two");
    assert_eq!(model.nav_items.len(), 2);
    assert_eq!(model.active_toast(), Some(("Reloaded", ToastLevel::Info)));
}

#[test]
fn test_failed_reload_keeps_previous_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("portfolio.json5");
    std::fs::write(&path, r#"{ owner: "One", sections: [{ id: "home" }] }"#).unwrap();
    let portfolio = Portfolio::load(&path).unwrap();
    let mut model = Model::new(portfolio, (80, 24), NavConfig::default());
    model.content_path = Some(path.clone());
    let mut dispatcher =
        Dispatcher::new(Box::new(OutboxMailer::new(dir.path().join("out.jsonl"))));

    std::fs::write(&path, "{ not json").unwrap();
    App::handle_message_side_effects(
        &mut model,
        &mut None,
        &mut dispatcher,
        &Message::FileChanged,
    );

    assert_eq!(model.portfolio.owner, "One");
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Error));
}

#[test]
fn test_watch_without_content_file_is_refused() {
    let dir = tempdir().unwrap();
    let mut dispatcher =
        Dispatcher::new(Box::new(OutboxMailer::new(dir.path().join("out.jsonl"))));
    let mut watcher = None;
    let mut model = update(create_test_model(), Message::ToggleWatch);
    App::handle_message_side_effects(
        &mut model,
        &mut watcher,
        &mut dispatcher,
        &Message::ToggleWatch,
    );
    assert!(!model.watch_enabled);
    assert!(watcher.is_none());
}

#[test]
fn test_submit_side_effect_delivers_to_outbox() {
    let dir = tempdir().unwrap();
    let outbox = dir.path().join("out.jsonl");
    let mut dispatcher = Dispatcher::new(Box::new(OutboxMailer::new(&outbox)));
    let mut model = update(filled_form(create_small_model()), Message::FormSubmit);
    App::handle_message_side_effects(
        &mut model,
        &mut None,
        &mut dispatcher,
        &Message::FormSubmit,
    );

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    let result = loop {
        if let Some(result) = dispatcher.poll() {
            break result;
        }
        assert!(std::time::Instant::now() < deadline, "delivery timed out");
        std::thread::sleep(std::time::Duration::from_millis(10));
    };
    assert_eq!(result, Ok(()));

    let written = std::fs::read_to_string(&outbox).unwrap();
    assert!(written.contains("\"subject\":\"Hello\""));
}
