use ratatui::widgets::ListState;
use tokio::task::JoinHandle;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::assistant::{self, GeminiClient};
use crate::config::Config;
use crate::data::{
    self, Appointment, AppointmentStatus, Doctor, EmergencyAction, HealthMetric, MedicalRecord,
    RecordKind, Reminder,
};
use crate::profile::{parse_age, ProfileStore, UserProfile};
use crate::support::{SupportClient, SupportStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Dashboard,
    Appointments,
    Records,
    Assistant,
    Emergency,
    Profile,
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApptTab {
    Book,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Age,
    BloodType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportField {
    Name,
    Email,
    Message,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,

    // Session (single owner of the logged-in user)
    pub store: ProfileStore,
    pub profile: Option<UserProfile>,
    pub gemini: GeminiClient,
    pub support: SupportClient,

    // Auth form
    pub auth_mode: AuthMode,
    pub auth_field: AuthField,
    pub auth_name: String,
    pub auth_email: String,
    pub auth_password: String,
    pub auth_error: Option<String>,

    // Dashboard
    pub health_tip: Option<String>,
    pub tip_task: Option<JoinHandle<String>>,
    pub reminders: Vec<Reminder>,
    pub reminder_state: ListState,
    pub metrics: Vec<HealthMetric>,

    // Appointments
    pub appt_tab: ApptTab,
    pub doctors: Vec<Doctor>,
    pub doctor_state: ListState,
    pub appt_search: String,
    pub appointments: Vec<Appointment>,
    pub appt_state: ListState,
    next_appt_id: u64,

    // Assistant chat
    pub chat_messages: Vec<ChatMessage>,
    pub chat_input: String,
    pub chat_cursor: usize,
    pub chat_pending: bool,
    pub chat_task: Option<JoinHandle<String>>,
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    pub animation_frame: u8,
    next_message_id: u64,

    // Records
    pub records: Vec<MedicalRecord>,
    pub record_state: ListState,
    pub record_filter: Option<RecordKind>,

    // Emergency
    pub emergency_actions: Vec<EmergencyAction>,
    pub emergency_state: ListState,

    // Profile editor
    pub profile_editing: bool,
    pub profile_field: ProfileField,
    pub profile_name_input: String,
    pub profile_age_input: String,
    pub profile_blood_idx: Option<usize>,
    pub profile_message: Option<String>,
    profile_message_ticks: u8,

    // Support form
    pub support_status: SupportStatus,
    pub support_field: SupportField,
    pub support_name: String,
    pub support_email: String,
    pub support_message: String,
    pub support_task: Option<JoinHandle<bool>>,
}

impl App {
    pub fn new(store: ProfileStore, config: Config) -> Self {
        let profile = store.load();
        let gemini = GeminiClient::new(config.resolve_gemini_key());
        let support = SupportClient::new(config.support_endpoint.clone());

        let mut reminder_state = ListState::default();
        reminder_state.select(Some(0));
        let mut doctor_state = ListState::default();
        doctor_state.select(Some(0));
        let mut record_state = ListState::default();
        record_state.select(Some(0));
        let mut emergency_state = ListState::default();
        emergency_state.select(Some(0));
        let mut appt_state = ListState::default();
        appt_state.select(Some(0));

        let mut app = Self {
            should_quit: false,
            screen: if profile.is_some() {
                Screen::Dashboard
            } else {
                Screen::Auth
            },
            input_mode: if profile.is_some() {
                InputMode::Normal
            } else {
                InputMode::Editing
            },

            store,
            profile,
            gemini,
            support,

            auth_mode: AuthMode::Login,
            auth_field: AuthField::Email,
            auth_name: String::new(),
            auth_email: String::new(),
            auth_password: String::new(),
            auth_error: None,

            health_tip: None,
            tip_task: None,
            reminders: data::reminders(),
            reminder_state,
            metrics: data::metrics(),

            appt_tab: ApptTab::Book,
            doctors: data::doctors(),
            doctor_state,
            appt_search: String::new(),
            appointments: data::initial_appointments(),
            appt_state,
            next_appt_id: 2,

            chat_messages: Vec::new(),
            chat_input: String::new(),
            chat_cursor: 0,
            chat_pending: false,
            chat_task: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            next_message_id: 1,

            records: data::records(),
            record_state,
            record_filter: None,

            emergency_actions: data::emergency_actions(),
            emergency_state,

            profile_editing: false,
            profile_field: ProfileField::Name,
            profile_name_input: String::new(),
            profile_age_input: String::new(),
            profile_blood_idx: None,
            profile_message: None,
            profile_message_ticks: 0,

            support_status: SupportStatus::Idle,
            support_field: SupportField::Message,
            support_name: String::new(),
            support_email: String::new(),
            support_message: String::new(),
            support_task: None,
        };

        if app.profile.is_some() {
            app.seed_conversation();
            app.prefill_support_form();
        }
        app
    }

    // --- Session lifecycle ---------------------------------------------

    /// Simulated login/registration from the auth form. The profile is the
    /// session; saving it is what "being logged in" means across reloads.
    pub fn login(&mut self) {
        let email = self.auth_email.trim().to_string();
        if email.is_empty() {
            self.auth_error = Some("Email is required".to_string());
            return;
        }

        let name = match self.auth_mode {
            AuthMode::Register => {
                let name = self.auth_name.trim().to_string();
                if name.is_empty() {
                    self.auth_error = Some("Full name is required".to_string());
                    return;
                }
                name
            }
            // Demo stub: logging in always lands on the same mock identity
            AuthMode::Login => "Alex Morgan".to_string(),
        };

        let id = now_millis().to_string();
        let profile = UserProfile {
            avatar_seed: Some(id.clone()),
            id,
            name,
            email,
            age: None,
            blood_type: None,
        };

        if self.store.save(&profile).is_err() {
            // Not fatal: the session still works, it just won't survive a restart.
            self.profile_message = Some("Could not persist profile".to_string());
            self.profile_message_ticks = 10;
        }

        self.profile = Some(profile);
        self.seed_conversation();
        self.prefill_support_form();

        self.auth_name.clear();
        self.auth_email.clear();
        self.auth_password.clear();
        self.auth_error = None;
        self.screen = Screen::Dashboard;
        self.input_mode = InputMode::Normal;
    }

    pub fn logout(&mut self) {
        let _ = self.store.clear();
        self.profile = None;
        self.chat_messages.clear();
        self.chat_input.clear();
        self.chat_cursor = 0;
        self.chat_pending = false;
        self.chat_task = None;
        self.health_tip = None;
        self.tip_task = None;
        self.profile_editing = false;
        self.support_status = SupportStatus::Idle;
        self.screen = Screen::Auth;
        self.input_mode = InputMode::Editing;
        self.auth_field = AuthField::Email;
    }

    // --- Assistant conversation ----------------------------------------

    fn push_message(&mut self, role: ChatRole, text: String) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.chat_messages.push(ChatMessage { id, role, text });
    }

    /// Opening greeting so the conversation is never empty on first render.
    fn seed_conversation(&mut self) {
        self.chat_messages.clear();
        let first_name = self
            .profile
            .as_ref()
            .map(|p| p.first_name().to_string())
            .unwrap_or_else(|| "there".to_string());
        self.push_message(
            ChatRole::Assistant,
            format!(
                "Hi {}! I'm your AI Health Assistant. I can answer general wellness \
                 questions or explain medical terms. How can I help you today?",
                first_name
            ),
        );
    }

    /// Accept the current input as a new user turn, if allowed. Returns the
    /// prior history plus the new message text for the caller to send; the
    /// guard makes a submission while a reply is outstanding a no-op, as is
    /// a blank submission.
    pub fn submit_chat(&mut self) -> Option<(Vec<ChatMessage>, String)> {
        let text = self.chat_input.trim().to_string();
        if text.is_empty() || self.chat_pending {
            return None;
        }

        let history = self.chat_messages.clone();
        self.push_message(ChatRole::User, text.clone());
        self.chat_input.clear();
        self.chat_cursor = 0;
        self.chat_pending = true;
        Some((history, text))
    }

    /// Append the assistant's reply for the outstanding turn.
    pub fn complete_chat(&mut self, reply: String) {
        self.push_message(ChatRole::Assistant, reply);
        self.chat_pending = false;
        self.scroll_chat_to_bottom();
    }

    /// Submit the current input and spawn the API call in the background.
    pub fn spawn_chat_request(&mut self) {
        if let Some((history, message)) = self.submit_chat() {
            self.scroll_chat_to_bottom();
            let gemini = self.gemini.clone();
            self.chat_task = Some(tokio::spawn(async move {
                gemini.chat(&history, &message).await
            }));
        }
    }

    /// One-shot tip fetch, kicked off once after login.
    pub fn spawn_tip_fetch(&mut self) {
        if self.health_tip.is_some() || self.tip_task.is_some() {
            return;
        }
        let gemini = self.gemini.clone();
        self.tip_task = Some(tokio::spawn(async move { gemini.health_tip().await }));
    }

    /// Scroll chat so the latest message (or the thinking indicator) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        for msg in &self.chat_messages {
            total_lines += 1; // Role line ("You:" or "Assistant:")
            for line in msg.text.lines() {
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.chat_pending {
            total_lines += 2; // "Assistant:" + "Thinking..."
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }

    // --- Dashboard ------------------------------------------------------

    pub fn reminder_nav_down(&mut self) {
        let len = self.reminders.len();
        if len > 0 {
            let i = self.reminder_state.selected().unwrap_or(0);
            self.reminder_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn reminder_nav_up(&mut self) {
        let i = self.reminder_state.selected().unwrap_or(0);
        self.reminder_state.select(Some(i.saturating_sub(1)));
    }

    pub fn toggle_selected_reminder(&mut self) {
        if let Some(i) = self.reminder_state.selected() {
            if let Some(reminder) = self.reminders.get_mut(i) {
                reminder.completed = !reminder.completed;
            }
        }
    }

    pub fn reminders_done_count(&self) -> usize {
        self.reminders.iter().filter(|r| r.completed).count()
    }

    // --- Appointments ---------------------------------------------------

    pub fn filtered_doctor_indices(&self) -> Vec<usize> {
        let query = self.appt_search.trim().to_lowercase();
        self.doctors
            .iter()
            .enumerate()
            .filter(|(_, d)| {
                query.is_empty()
                    || d.name.to_lowercase().contains(&query)
                    || d.specialty.to_lowercase().contains(&query)
            })
            .map(|(i, _)| i)
            .collect()
    }

    pub fn doctor_nav_down(&mut self) {
        let len = self.filtered_doctor_indices().len();
        if len > 0 {
            let i = self.doctor_state.selected().unwrap_or(0);
            self.doctor_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn doctor_nav_up(&mut self) {
        let i = self.doctor_state.selected().unwrap_or(0);
        self.doctor_state.select(Some(i.saturating_sub(1)));
    }

    /// Book the highlighted doctor and jump to the upcoming tab. Demo slot:
    /// the next free mock time.
    pub fn book_selected_doctor(&mut self) {
        let indices = self.filtered_doctor_indices();
        let Some(doctor) = self
            .doctor_state
            .selected()
            .and_then(|i| indices.get(i))
            .and_then(|&i| self.doctors.get(i))
        else {
            return;
        };

        let appointment = Appointment {
            id: self.next_appt_id,
            doctor_name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
            date: "Mar 15, 2024".to_string(),
            time: "09:30 AM".to_string(),
            status: AppointmentStatus::Upcoming,
        };
        self.next_appt_id += 1;
        self.appointments.push(appointment);
        self.appt_tab = ApptTab::Upcoming;
        self.appt_state.select(Some(self.appointments.len() - 1));
    }

    pub fn appt_nav_down(&mut self) {
        let len = self.appointments.len();
        if len > 0 {
            let i = self.appt_state.selected().unwrap_or(0);
            self.appt_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn appt_nav_up(&mut self) {
        let i = self.appt_state.selected().unwrap_or(0);
        self.appt_state.select(Some(i.saturating_sub(1)));
    }

    pub fn cancel_selected_appointment(&mut self) {
        if let Some(i) = self.appt_state.selected() {
            if let Some(appt) = self.appointments.get_mut(i) {
                if appt.status == AppointmentStatus::Upcoming {
                    appt.status = AppointmentStatus::Cancelled;
                }
            }
        }
    }

    // --- Records --------------------------------------------------------

    pub fn filtered_record_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.record_filter.map_or(true, |k| r.kind == k))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn record_nav_down(&mut self) {
        let len = self.filtered_record_indices().len();
        if len > 0 {
            let i = self.record_state.selected().unwrap_or(0);
            self.record_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn record_nav_up(&mut self) {
        let i = self.record_state.selected().unwrap_or(0);
        self.record_state.select(Some(i.saturating_sub(1)));
    }

    /// Cycle the filter: all -> Lab Report -> Prescription -> X-Ray -> Other -> all
    pub fn cycle_record_filter(&mut self) {
        let kinds = RecordKind::all();
        self.record_filter = match self.record_filter {
            None => Some(kinds[0]),
            Some(current) => kinds
                .iter()
                .position(|k| *k == current)
                .and_then(|i| kinds.get(i + 1))
                .copied(),
        };
        self.record_state.select(Some(0));
    }

    // --- Emergency ------------------------------------------------------

    pub fn emergency_nav_down(&mut self) {
        let len = self.emergency_actions.len();
        if len > 0 {
            let i = self.emergency_state.selected().unwrap_or(0);
            self.emergency_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn emergency_nav_up(&mut self) {
        let i = self.emergency_state.selected().unwrap_or(0);
        self.emergency_state.select(Some(i.saturating_sub(1)));
    }

    // --- Profile editor -------------------------------------------------

    pub fn begin_profile_edit(&mut self) {
        let Some(profile) = &self.profile else { return };
        self.profile_name_input = profile.name.clone();
        self.profile_age_input = profile.age.map(|a| a.to_string()).unwrap_or_default();
        self.profile_blood_idx = profile
            .blood_type
            .as_deref()
            .and_then(|bt| data::BLOOD_TYPES.iter().position(|t| *t == bt));
        self.profile_field = ProfileField::Name;
        self.profile_editing = true;
        self.input_mode = InputMode::Editing;
    }

    pub fn cancel_profile_edit(&mut self) {
        self.profile_editing = false;
        self.input_mode = InputMode::Normal;
    }

    /// Replace the stored profile with the edited form. Age that does not
    /// parse is dropped to `None` rather than saved as garbage.
    pub fn save_profile_form(&mut self) {
        let Some(profile) = self.profile.as_mut() else {
            return;
        };

        let name = self.profile_name_input.trim();
        if !name.is_empty() {
            profile.name = name.to_string();
        }
        profile.age = parse_age(&self.profile_age_input);
        profile.blood_type = self
            .profile_blood_idx
            .and_then(|i| data::BLOOD_TYPES.get(i))
            .map(|bt| bt.to_string());

        let message = match self.store.save(profile) {
            Ok(()) => "Profile updated successfully!",
            Err(_) => "Could not persist profile",
        };
        self.profile_message = Some(message.to_string());
        self.profile_message_ticks = 10;
        self.profile_editing = false;
        self.input_mode = InputMode::Normal;
    }

    pub fn cycle_blood_type(&mut self, forward: bool) {
        let len = data::BLOOD_TYPES.len();
        self.profile_blood_idx = match self.profile_blood_idx {
            None => Some(if forward { 0 } else { len - 1 }),
            Some(i) if forward => {
                if i + 1 >= len {
                    None
                } else {
                    Some(i + 1)
                }
            }
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    // --- Support form ---------------------------------------------------

    fn prefill_support_form(&mut self) {
        if let Some(profile) = &self.profile {
            self.support_name = profile.name.clone();
            self.support_email = profile.email.clone();
        }
    }

    pub fn can_submit_support(&self) -> bool {
        matches!(
            self.support_status,
            SupportStatus::Idle | SupportStatus::Failed
        ) && !self.support_name.trim().is_empty()
            && !self.support_email.trim().is_empty()
            && !self.support_message.trim().is_empty()
    }

    pub fn spawn_support_submit(&mut self) {
        if !self.can_submit_support() {
            return;
        }
        self.support_status = SupportStatus::Submitting;
        let client = self.support.clone();
        let name = self.support_name.clone();
        let email = self.support_email.clone();
        let message = self.support_message.clone();
        self.support_task = Some(tokio::spawn(async move {
            client.submit(&name, &email, &message).await.is_ok()
        }));
    }

    pub fn finish_support(&mut self, ok: bool) {
        self.support_status = if ok {
            self.support_message.clear();
            // Leave editing so Enter on the confirmation goes back home
            self.input_mode = InputMode::Normal;
            SupportStatus::Sent
        } else {
            // The form keeps its contents so the user can resubmit.
            SupportStatus::Failed
        };
    }

    pub fn reset_support_form(&mut self) {
        self.support_status = SupportStatus::Idle;
        self.prefill_support_form();
    }

    // --- Background task polling ---------------------------------------

    /// Reap finished background tasks. Called every loop iteration; the
    /// 300ms tick guarantees it runs even when no keys arrive.
    pub async fn poll_tasks(&mut self) {
        if self.chat_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.chat_task.take() {
                let reply = task
                    .await
                    .unwrap_or_else(|_| assistant::CHAT_ERROR_FALLBACK.to_string());
                self.complete_chat(reply);
            }
        }

        if self.tip_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.tip_task.take() {
                let tip = task
                    .await
                    .unwrap_or_else(|_| assistant::TIP_ERROR_FALLBACK.to_string());
                self.health_tip = Some(tip);
            }
        }

        if self.support_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.support_task.take() {
                let ok = task.await.unwrap_or(false);
                self.finish_support(ok);
            }
        }
    }

    /// Tick event: advance the thinking animation and expire flash messages.
    pub fn tick(&mut self) {
        if self.chat_pending {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if self.profile_message_ticks > 0 {
            self.profile_message_ticks -= 1;
            if self.profile_message_ticks == 0 {
                self.profile_message = None;
            }
        }
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::with_dir(tmp.path());
        let app = App::new(store, Config::new());
        (app, tmp)
    }

    fn logged_in_app() -> (App, TempDir) {
        let (mut app, tmp) = test_app();
        app.auth_email = "a@b.com".to_string();
        app.login();
        (app, tmp)
    }

    #[test]
    fn login_seeds_greeting_and_persists_profile() {
        let (app, tmp) = logged_in_app();

        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.chat_messages.len(), 1);
        assert_eq!(app.chat_messages[0].role, ChatRole::Assistant);
        assert!(app.chat_messages[0].text.contains("Alex"));

        // Simulated reload finds the same profile
        let reloaded = ProfileStore::with_dir(tmp.path()).load().unwrap();
        assert_eq!(reloaded.email, "a@b.com");
        assert_eq!(reloaded.name, "Alex Morgan");
    }

    #[test]
    fn login_requires_email() {
        let (mut app, _tmp) = test_app();
        app.login();
        assert!(app.profile.is_none());
        assert!(app.auth_error.is_some());
    }

    #[test]
    fn restored_profile_skips_auth() {
        let (_, tmp) = logged_in_app();

        let store = ProfileStore::with_dir(tmp.path());
        let app = App::new(store, Config::new());
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(!app.chat_messages.is_empty());
    }

    #[test]
    fn conversation_grows_by_two_per_exchange() {
        let (mut app, _tmp) = logged_in_app();

        for n in 1..=3u64 {
            app.chat_input = format!("question {}", n);
            let (history, message) = app.submit_chat().expect("submission accepted");
            // History excludes the message being sent
            assert_eq!(history.len() as u64, 1 + 2 * (n - 1));
            assert_eq!(message, format!("question {}", n));
            app.complete_chat(format!("answer {}", n));
        }

        // 1 seed + 2 per completed exchange
        assert_eq!(app.chat_messages.len(), 1 + 2 * 3);
        for (i, msg) in app.chat_messages.iter().enumerate() {
            let expected = if i % 2 == 0 {
                ChatRole::Assistant
            } else {
                ChatRole::User
            };
            assert_eq!(msg.role, expected, "message {} role", i);
        }
    }

    #[test]
    fn submit_while_pending_is_a_noop() {
        let (mut app, _tmp) = logged_in_app();

        app.chat_input = "first".to_string();
        assert!(app.submit_chat().is_some());
        let count = app.chat_messages.len();

        app.chat_input = "second".to_string();
        assert!(app.submit_chat().is_none());
        assert_eq!(app.chat_messages.len(), count);
        // Input stays put for after the reply lands
        assert_eq!(app.chat_input, "second");
    }

    #[test]
    fn blank_submit_is_a_noop() {
        let (mut app, _tmp) = logged_in_app();
        app.chat_input = "   ".to_string();
        assert!(app.submit_chat().is_none());
        assert_eq!(app.chat_messages.len(), 1);
    }

    #[test]
    fn headache_question_appends_user_then_assistant() {
        let (mut app, _tmp) = logged_in_app();

        app.chat_input = "What helps with a headache?".to_string();
        app.submit_chat().unwrap();
        app.complete_chat(assistant::CHAT_OFFLINE_FALLBACK.to_string());

        let n = app.chat_messages.len();
        assert_eq!(n, 3);
        assert_eq!(app.chat_messages[n - 2].role, ChatRole::User);
        assert_eq!(app.chat_messages[n - 2].text, "What helps with a headache?");
        assert_eq!(app.chat_messages[n - 1].role, ChatRole::Assistant);
        assert!(!app.chat_messages[n - 1].text.is_empty());
        assert!(!app.chat_pending);
    }

    #[test]
    fn invalid_age_saves_as_absent() {
        let (mut app, tmp) = logged_in_app();

        app.begin_profile_edit();
        app.profile_age_input = "invalid".to_string();
        app.save_profile_form();

        assert_eq!(app.profile.as_ref().unwrap().age, None);
        let reloaded = ProfileStore::with_dir(tmp.path()).load().unwrap();
        assert_eq!(reloaded.age, None);
    }

    #[test]
    fn profile_edit_round_trips_fields() {
        let (mut app, tmp) = logged_in_app();

        app.begin_profile_edit();
        app.profile_name_input = "Sam Rivera".to_string();
        app.profile_age_input = "42".to_string();
        app.profile_blood_idx = Some(4); // O+
        app.save_profile_form();

        let reloaded = ProfileStore::with_dir(tmp.path()).load().unwrap();
        assert_eq!(reloaded.name, "Sam Rivera");
        assert_eq!(reloaded.age, Some(42));
        assert_eq!(reloaded.blood_type.as_deref(), Some("O+"));
        assert!(app.profile_message.is_some());
    }

    #[test]
    fn logout_clears_session_and_store() {
        let (mut app, tmp) = logged_in_app();
        app.logout();

        assert_eq!(app.screen, Screen::Auth);
        assert!(app.profile.is_none());
        assert!(app.chat_messages.is_empty());
        assert!(ProfileStore::with_dir(tmp.path()).load().is_none());
    }

    #[test]
    fn support_failure_keeps_form_resubmittable() {
        let (mut app, _tmp) = logged_in_app();
        app.support_message = "The chart won't load".to_string();

        app.finish_support(false);
        assert_eq!(app.support_status, SupportStatus::Failed);
        assert_eq!(app.support_message, "The chart won't load");
        assert!(app.can_submit_support());

        app.finish_support(true);
        assert_eq!(app.support_status, SupportStatus::Sent);
        assert!(!app.can_submit_support());
    }

    #[test]
    fn support_requires_all_fields() {
        let (mut app, _tmp) = logged_in_app();
        // Name and email are prefilled from the profile, message is empty
        assert!(!app.can_submit_support());
        app.support_message = "Hello".to_string();
        assert!(app.can_submit_support());
    }

    #[test]
    fn booking_adds_upcoming_and_cancel_flips_status() {
        let (mut app, _tmp) = logged_in_app();
        let before = app.appointments.len();

        app.doctor_state.select(Some(1));
        app.book_selected_doctor();

        assert_eq!(app.appointments.len(), before + 1);
        assert_eq!(app.appt_tab, ApptTab::Upcoming);
        let appt = app.appointments.last().unwrap();
        assert_eq!(appt.doctor_name, "Dr. James Chen");
        assert_eq!(appt.status, AppointmentStatus::Upcoming);

        app.appt_state.select(Some(app.appointments.len() - 1));
        app.cancel_selected_appointment();
        assert_eq!(
            app.appointments.last().unwrap().status,
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn doctor_search_filters_by_name_and_specialty() {
        let (mut app, _tmp) = logged_in_app();

        app.appt_search = "dent".to_string();
        let indices = app.filtered_doctor_indices();
        assert_eq!(indices.len(), 1);
        assert_eq!(app.doctors[indices[0]].name, "Dr. James Chen");

        app.appt_search.clear();
        assert_eq!(app.filtered_doctor_indices().len(), app.doctors.len());
    }

    #[test]
    fn reminder_toggle_flips_completion() {
        let (mut app, _tmp) = logged_in_app();
        let done = app.reminders_done_count();

        app.reminder_state.select(Some(1));
        app.toggle_selected_reminder();
        assert_eq!(app.reminders_done_count(), done + 1);

        app.toggle_selected_reminder();
        assert_eq!(app.reminders_done_count(), done);
    }

    #[test]
    fn record_filter_cycles_through_kinds_and_back() {
        let (mut app, _tmp) = logged_in_app();
        assert_eq!(app.record_filter, None);

        let mut seen = Vec::new();
        for _ in 0..RecordKind::all().len() {
            app.cycle_record_filter();
            seen.push(app.record_filter.unwrap());
            assert_eq!(app.filtered_record_indices().len(), 1);
        }
        assert_eq!(seen.len(), 4);

        app.cycle_record_filter();
        assert_eq!(app.record_filter, None);
        assert_eq!(app.filtered_record_indices().len(), app.records.len());
    }

    #[test]
    fn blood_type_cycle_wraps_through_unset() {
        let (mut app, _tmp) = logged_in_app();
        app.begin_profile_edit();
        assert_eq!(app.profile_blood_idx, None);

        app.cycle_blood_type(true);
        assert_eq!(app.profile_blood_idx, Some(0));
        app.cycle_blood_type(false);
        assert_eq!(app.profile_blood_idx, None);
        app.cycle_blood_type(false);
        assert_eq!(app.profile_blood_idx, Some(data::BLOOD_TYPES.len() - 1));
    }

    #[tokio::test]
    async fn degraded_chat_task_resolves_to_fallback() {
        let (mut app, _tmp) = logged_in_app();
        // Force a known-offline client regardless of the environment
        app.gemini = GeminiClient::new(None);
        app.chat_input = "hello".to_string();
        app.spawn_chat_request();
        assert!(app.chat_pending);

        // Wait for the spawned task, then reap it
        if let Some(task) = app.chat_task.take() {
            let reply = task.await.unwrap();
            app.complete_chat(reply);
        }

        assert!(!app.chat_pending);
        let last = app.chat_messages.last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.text, assistant::CHAT_OFFLINE_FALLBACK);
    }

    #[tokio::test]
    async fn degraded_tip_resolves_to_fallback() {
        let (mut app, _tmp) = logged_in_app();
        app.gemini = GeminiClient::new(None);
        app.spawn_tip_fetch();

        if let Some(task) = app.tip_task.take() {
            app.health_tip = Some(task.await.unwrap());
        }
        let tip = app.health_tip.unwrap();
        assert!(!tip.is_empty());
        assert_eq!(tip, assistant::TIP_OFFLINE_FALLBACK);
    }
}
