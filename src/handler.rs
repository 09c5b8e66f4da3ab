use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{
    App, ApptTab, AuthField, AuthMode, InputMode, ProfileField, Screen, SupportField,
};
use crate::support::SupportStatus;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key)?,
        AppEvent::Tick => {
            app.tick();
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }

    Ok(())
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Screen switching shortcuts available everywhere once logged in
    if app.profile.is_some() {
        match key.code {
            KeyCode::Char('q') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('1') => {
                app.screen = Screen::Dashboard;
                return;
            }
            KeyCode::Char('2') => {
                app.screen = Screen::Appointments;
                return;
            }
            KeyCode::Char('3') => {
                app.screen = Screen::Records;
                return;
            }
            KeyCode::Char('4') | KeyCode::Char('a') => {
                app.screen = Screen::Assistant;
                return;
            }
            KeyCode::Char('5') => {
                app.screen = Screen::Emergency;
                return;
            }
            KeyCode::Char('6') => {
                app.screen = Screen::Profile;
                return;
            }
            KeyCode::Char('7') => {
                app.screen = Screen::Support;
                return;
            }
            _ => {}
        }
    }

    match app.screen {
        Screen::Auth => {
            // Auth lives in editing mode; a stray Normal state just re-enters it
            app.input_mode = InputMode::Editing;
        }
        Screen::Dashboard => handle_dashboard_normal(app, key),
        Screen::Appointments => handle_appointments_normal(app, key),
        Screen::Records => handle_records_normal(app, key),
        Screen::Assistant => handle_assistant_normal(app, key),
        Screen::Emergency => handle_emergency_normal(app, key),
        Screen::Profile => handle_profile_normal(app, key),
        Screen::Support => handle_support_normal(app, key),
    }
}

fn handle_dashboard_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.reminder_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.reminder_nav_up(),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected_reminder(),
        _ => {}
    }
}

fn handle_appointments_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => {
            app.appt_tab = match app.appt_tab {
                ApptTab::Book => ApptTab::Upcoming,
                ApptTab::Upcoming => ApptTab::Book,
            };
        }
        KeyCode::Char('/') => {
            if app.appt_tab == ApptTab::Book {
                app.input_mode = InputMode::Editing;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => match app.appt_tab {
            ApptTab::Book => app.doctor_nav_down(),
            ApptTab::Upcoming => app.appt_nav_down(),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.appt_tab {
            ApptTab::Book => app.doctor_nav_up(),
            ApptTab::Upcoming => app.appt_nav_up(),
        },
        KeyCode::Enter => {
            if app.appt_tab == ApptTab::Book {
                app.book_selected_doctor();
            }
        }
        KeyCode::Char('c') => {
            if app.appt_tab == ApptTab::Upcoming {
                app.cancel_selected_appointment();
            }
        }
        _ => {}
    }
}

fn handle_records_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.record_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.record_nav_up(),
        KeyCode::Char('f') => app.cycle_record_filter(),
        _ => {}
    }
}

fn handle_assistant_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
            app.chat_cursor = app.chat_input.chars().count();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.chat_scroll = app.chat_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.chat_scroll = app.chat_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => app.chat_scroll = 0,
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),
        KeyCode::Esc => app.screen = Screen::Dashboard,
        _ => {}
    }
}

fn handle_emergency_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.emergency_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.emergency_nav_up(),
        _ => {}
    }
}

fn handle_profile_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('e') => app.begin_profile_edit(),
        // Shifted to avoid fat-fingering a logout
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
}

fn handle_support_normal(app: &mut App, key: KeyEvent) {
    match app.support_status {
        SupportStatus::Sent => {
            if key.code == KeyCode::Enter {
                app.reset_support_form();
                app.screen = Screen::Dashboard;
            }
        }
        _ => match key.code {
            KeyCode::Char('i') => {
                app.input_mode = InputMode::Editing;
            }
            _ => {}
        },
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match app.screen {
        Screen::Auth => handle_auth_editing(app, key),
        Screen::Assistant => handle_chat_editing(app, key),
        Screen::Appointments => handle_search_editing(app, key),
        Screen::Profile => handle_profile_editing(app, key),
        Screen::Support => handle_support_editing(app, key),
        _ => app.input_mode = InputMode::Normal,
    }
}

fn handle_auth_editing(app: &mut App, key: KeyEvent) {
    // Ctrl+R flips between login and registration
    if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.auth_mode = match app.auth_mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        app.auth_field = match app.auth_mode {
            AuthMode::Register => AuthField::Name,
            AuthMode::Login => AuthField::Email,
        };
        app.auth_error = None;
        return;
    }

    match key.code {
        KeyCode::Tab => {
            app.auth_field = match (app.auth_mode, app.auth_field) {
                (AuthMode::Register, AuthField::Name) => AuthField::Email,
                (_, AuthField::Email) => AuthField::Password,
                (AuthMode::Register, AuthField::Password) => AuthField::Name,
                (AuthMode::Login, _) => AuthField::Email,
            };
        }
        KeyCode::Enter => {
            app.login();
            if app.profile.is_some() {
                app.spawn_tip_fetch();
            }
        }
        KeyCode::Backspace => {
            auth_field_mut(app).pop();
        }
        KeyCode::Char(c) => {
            auth_field_mut(app).push(c);
            app.auth_error = None;
        }
        KeyCode::Esc => {
            app.auth_error = None;
        }
        _ => {}
    }
}

fn auth_field_mut(app: &mut App) -> &mut String {
    match app.auth_field {
        AuthField::Name => &mut app.auth_name,
        AuthField::Email => &mut app.auth_email,
        AuthField::Password => &mut app.auth_password,
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            // No-op while a reply is outstanding; the guard is in App
            app.spawn_chat_request();
        }
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat_input.chars().count();
            if app.chat_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.chat_cursor = 0;
        }
        KeyCode::End => {
            app.chat_cursor = app.chat_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
            app.chat_input.insert(byte_pos, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

fn handle_search_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.appt_search.pop();
            app.doctor_state.select(Some(0));
        }
        KeyCode::Char(c) => {
            app.appt_search.push(c);
            app.doctor_state.select(Some(0));
        }
        _ => {}
    }
}

fn handle_profile_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_profile_edit(),
        KeyCode::Enter => app.save_profile_form(),
        KeyCode::Tab => {
            app.profile_field = match app.profile_field {
                ProfileField::Name => ProfileField::Age,
                ProfileField::Age => ProfileField::BloodType,
                ProfileField::BloodType => ProfileField::Name,
            };
        }
        KeyCode::Backspace => match app.profile_field {
            ProfileField::Name => {
                app.profile_name_input.pop();
            }
            ProfileField::Age => {
                app.profile_age_input.pop();
            }
            ProfileField::BloodType => {
                app.profile_blood_idx = None;
            }
        },
        KeyCode::Left => {
            if app.profile_field == ProfileField::BloodType {
                app.cycle_blood_type(false);
            }
        }
        KeyCode::Right => {
            if app.profile_field == ProfileField::BloodType {
                app.cycle_blood_type(true);
            }
        }
        KeyCode::Char(c) => match app.profile_field {
            ProfileField::Name => app.profile_name_input.push(c),
            // Whatever gets typed here is fine; parse_age sorts it out on save
            ProfileField::Age => app.profile_age_input.push(c),
            ProfileField::BloodType => match c {
                'j' | 'l' => app.cycle_blood_type(true),
                'k' | 'h' => app.cycle_blood_type(false),
                _ => {}
            },
        },
        _ => {}
    }
}

fn handle_support_editing(app: &mut App, key: KeyEvent) {
    if app.support_status == SupportStatus::Submitting {
        // Form is locked while the request is in flight
        if key.code == KeyCode::Esc {
            app.input_mode = InputMode::Normal;
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab => {
            app.support_field = match app.support_field {
                SupportField::Name => SupportField::Email,
                SupportField::Email => SupportField::Message,
                SupportField::Message => SupportField::Name,
            };
        }
        KeyCode::Enter => app.spawn_support_submit(),
        KeyCode::Backspace => {
            support_field_mut(app).pop();
        }
        KeyCode::Char(c) => {
            support_field_mut(app).push(c);
        }
        _ => {}
    }
}

fn support_field_mut(app: &mut App) -> &mut String {
    match app.support_field {
        SupportField::Name => &mut app.support_name,
        SupportField::Email => &mut app.support_email,
        SupportField::Message => &mut app.support_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::profile::ProfileStore;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn logged_in_app() -> (App, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::with_dir(tmp.path());
        let mut app = App::new(store, Config::new());
        app.auth_email = "a@b.com".to_string();
        app.login();
        (app, tmp)
    }

    #[tokio::test]
    async fn typing_the_auth_form_and_submitting_logs_in() {
        let tmp = TempDir::new().unwrap();
        let mut app = App::new(ProfileStore::with_dir(tmp.path()), Config::new());
        assert_eq!(app.screen, Screen::Auth);

        for c in "a@b.com".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        for c in "secret".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.profile.as_ref().unwrap().email, "a@b.com");
    }

    #[test]
    fn digit_keys_switch_screens() {
        let (mut app, _tmp) = logged_in_app();

        handle_key(&mut app, key(KeyCode::Char('3'))).unwrap();
        assert_eq!(app.screen, Screen::Records);
        handle_key(&mut app, key(KeyCode::Char('4'))).unwrap();
        assert_eq!(app.screen, Screen::Assistant);
        handle_key(&mut app, key(KeyCode::Char('1'))).unwrap();
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn chat_input_editing_is_utf8_safe() {
        let (mut app, _tmp) = logged_in_app();
        app.screen = Screen::Assistant;
        handle_key(&mut app, key(KeyCode::Char('i'))).unwrap();
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in "héllo".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Left)).unwrap();
        handle_key(&mut app, key(KeyCode::Left)).unwrap();
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.chat_input, "hélo");
    }

    #[test]
    fn enter_while_reply_outstanding_does_not_duplicate() {
        let (mut app, _tmp) = logged_in_app();
        app.screen = Screen::Assistant;
        app.input_mode = InputMode::Editing;
        app.chat_input = "first".to_string();
        app.chat_pending = true; // simulate an in-flight reply

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        // Only the seed greeting; nothing was appended
        assert_eq!(app.chat_messages.len(), 1);
    }

    #[test]
    fn sent_confirmation_enter_returns_to_dashboard() {
        let (mut app, _tmp) = logged_in_app();
        app.screen = Screen::Support;
        app.input_mode = InputMode::Editing;
        app.support_message = "Hello".to_string();

        // Submission made from editing mode succeeds in the background
        app.finish_support(true);
        assert_eq!(app.input_mode, InputMode::Normal);

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.support_status, SupportStatus::Idle);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let (mut app, _tmp) = logged_in_app();
        app.screen = Screen::Assistant;
        app.input_mode = InputMode::Editing;
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        )
        .unwrap();
        assert!(app.should_quit);
    }
}
