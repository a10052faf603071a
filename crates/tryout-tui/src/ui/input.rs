//! Keyboard input handling for the TUI.
//!
//! This module translates key events into application and wizard state
//! changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState, FormFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    if key.code == KeyCode::F(1) {
        app.state = AppState::ShowingHelp;
        return false;
    }

    // Confirmation view after an accepted registration
    if app.wizard.is_success() {
        return handle_confirmation_input(app, key);
    }

    if app.focus == FormFocus::Error {
        // Any key acknowledges the error and returns to the form
        app.leave_error_focus();
        return false;
    }

    handle_form_input(app, key);
    false
}

fn handle_confirmation_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.register_another();
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.state = AppState::Quitting;
            return true;
        }
        _ => {}
    }
    false
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            if app.wizard.step().number() > 1 {
                app.previous_step();
            } else {
                app.state = AppState::ConfirmingQuit;
            }
        }
        KeyCode::Down | KeyCode::Tab => {
            app.cycle_focus(true);
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.cycle_focus(false);
        }
        KeyCode::Left | KeyCode::Right => {
            if let FormFocus::Field(field) = app.focus {
                app.cycle_choice(field, key.code == KeyCode::Right);
            }
        }
        KeyCode::Enter => match app.focus {
            FormFocus::Field(_) => {
                app.cycle_focus(true);
            }
            FormFocus::Back => {
                app.previous_step();
            }
            FormFocus::Next => {
                app.next_step();
            }
            FormFocus::Submit => {
                app.start_submit();
            }
            FormFocus::Error => {}
        },
        KeyCode::Backspace => {
            app.backspace();
        }
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.input_char(c);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tryout_core::api::RegistrationError;
    use tryout_core::{Field, Step};

    use crate::app::testing::FakeRegistrar;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c)));
        }
    }

    fn tab(app: &mut App) {
        handle_input(app, key(KeyCode::Tab));
    }

    /// Fill every step through the keyboard, ending with focus on Submit
    fn fill_form(app: &mut App) {
        type_text(app, "Jamie");
        tab(app);
        type_text(app, "Rivera");
        tab(app);
        handle_input(app, key(KeyCode::Right)); // 4th Grade
        tab(app);
        handle_input(app, key(KeyCode::Right)); // Male
        tab(app);
        assert_eq!(app.focus, FormFocus::Next);
        handle_input(app, key(KeyCode::Enter));
        assert_eq!(app.wizard.step(), Step::Parent);

        type_text(app, "Alex Rivera");
        tab(app);
        type_text(app, "alex@example.com");
        tab(app);
        type_text(app, "8605551234");
        tab(app);
        tab(app); // skip Back
        assert_eq!(app.focus, FormFocus::Next);
        handle_input(app, key(KeyCode::Enter));
        assert_eq!(app.wizard.step(), Step::Address);

        type_text(app, "12 Elm St");
        tab(app);
        type_text(app, "Hartford");
        tab(app);
        handle_input(app, key(KeyCode::Char(' '))); // AL
        tab(app);
        type_text(app, "06103");
        tab(app);
        type_text(app, "Pat Rivera");
        tab(app);
        type_text(app, "8605559876");
        tab(app);
        tab(app); // skip Back
        assert_eq!(app.focus, FormFocus::Submit);
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut app = App::with_registrar(Arc::new(FakeRegistrar::accepting()));
        type_text(&mut app, "Sam");
        handle_input(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.wizard.record().player_first_name, "Sa");
    }

    #[test]
    fn test_enter_on_next_is_refused_until_step_ready() {
        let mut app = App::with_registrar(Arc::new(FakeRegistrar::accepting()));
        app.focus = FormFocus::Next;
        handle_input(&mut app, key(KeyCode::Enter));
        assert_eq!(app.wizard.step(), Step::Player);
        assert_eq!(app.focus, FormFocus::Field(Field::PlayerFirstName));
    }

    #[test]
    fn test_esc_goes_back_then_asks_to_quit() {
        let mut app = App::with_registrar(Arc::new(FakeRegistrar::accepting()));
        type_text(&mut app, "Jamie");
        tab(&mut app);
        type_text(&mut app, "Rivera");
        app.cycle_choice(Field::GradeLevel, true);
        app.cycle_choice(Field::Gender, true);
        app.next_step();
        assert_eq!(app.wizard.step(), Step::Parent);

        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.wizard.step(), Step::Player);
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))));
    }

    #[test]
    fn test_help_overlay_toggles() {
        let mut app = App::with_registrar(Arc::new(FakeRegistrar::accepting()));
        handle_input(&mut app, key(KeyCode::F(1)));
        assert_eq!(app.state, AppState::ShowingHelp);
        // Typing does not reach the form while help is open
        type_text(&mut app, "x");
        assert_eq!(app.wizard.record().player_first_name, "");
        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_submit_through_keyboard() {
        let registrar = Arc::new(FakeRegistrar::accepting());
        let mut app = App::with_registrar(registrar.clone());
        fill_form(&mut app);

        handle_input(&mut app, key(KeyCode::Enter));
        assert!(app.wizard.is_submitting());

        // A second Enter while in flight does nothing
        handle_input(&mut app, key(KeyCode::Enter));

        app.wait_for_submission().await;
        assert!(app.wizard.is_success());
        assert_eq!(registrar.call_count(), 1);

        let confirmation = app.wizard.confirmation().unwrap();
        assert_eq!(confirmation.player_name, "Jamie Rivera");

        handle_input(&mut app, key(KeyCode::Char('n')));
        assert!(!app.wizard.is_success());
        assert_eq!(app.wizard.step(), Step::Player);
        assert_eq!(app.focus, FormFocus::Field(Field::PlayerFirstName));
    }

    #[tokio::test]
    async fn test_failed_submit_focuses_error_region() {
        let registrar = Arc::new(FakeRegistrar::failing(RegistrationError::Conflict(
            "dup".to_string(),
        )));
        let mut app = App::with_registrar(registrar.clone());
        fill_form(&mut app);

        handle_input(&mut app, key(KeyCode::Enter));
        app.wait_for_submission().await;

        assert_eq!(app.wizard.error(), Some("dup"));
        assert_eq!(app.focus, FormFocus::Error);
        assert!(!app.wizard.is_submitting());

        // Any key returns to the form, which is complete, so Submit gets focus
        handle_input(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.focus, FormFocus::Submit);
        assert_eq!(app.wizard.record().emergency_contact_name, "Pat Rivera");
    }
}
