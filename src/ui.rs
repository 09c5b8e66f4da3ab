use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Sparkline, Wrap,
    },
};
use crate::app::{
    App, ApptTab, AuthField, AuthMode, ChatRole, InputMode, ProfileField, Screen, SupportField,
};
use crate::data::{self, AppointmentStatus, MetricStatus, ReminderKind};
use crate::support::SupportStatus;

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut current_text = String::new();

    while let Some((_, c)) = chars.next() {
        if c == '*' && chars.peek().map(|(_, c)| *c) == Some('*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            let mut bold_text = String::new();
            let mut found_close = false;

            while let Some((_, c)) = chars.next() {
                if c == '*' && chars.peek().map(|(_, c)| *c) == Some('*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    if app.screen == Screen::Auth {
        render_auth_screen(app, frame, area);
        return;
    }

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Auth => unreachable!(),
        Screen::Dashboard => render_dashboard(app, frame, body_area),
        Screen::Appointments => render_appointments(app, frame, body_area),
        Screen::Records => render_records(app, frame, body_area),
        Screen::Assistant => render_assistant(app, frame, body_area),
        Screen::Emergency => render_emergency(app, frame, body_area),
        Screen::Profile => render_profile(app, frame, body_area),
        Screen::Support => render_support(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let user = app
        .profile
        .as_ref()
        .map(|p| format!(" {} ", p.name))
        .unwrap_or_default();

    let offline_badge = if app.gemini.is_offline() {
        Span::styled(" AI offline ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };

    let title = Line::from(vec![
        Span::styled(" HealthGuard ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(user, Style::default().fg(Color::White)),
        offline_badge,
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen {
        Screen::Auth => " SIGN IN ",
        Screen::Dashboard => " HOME ",
        Screen::Appointments => " BOOK ",
        Screen::Records => " RECORDS ",
        Screen::Assistant => " ASSISTANT ",
        Screen::Emergency => " URGENT ",
        Screen::Profile => " PROFILE ",
        Screen::Support => " SUPPORT ",
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints: Vec<Span> = Vec::new();
    match (app.screen, app.input_mode) {
        (Screen::Dashboard, _) => {
            hints.extend(vec![
                Span::styled(" j/k ", key_style),
                Span::styled(" reminders ", label_style),
                Span::styled(" Enter ", key_style),
                Span::styled(" toggle ", label_style),
            ]);
        }
        (Screen::Appointments, InputMode::Normal) => {
            hints.extend(vec![
                Span::styled(" Tab ", key_style),
                Span::styled(" tab ", label_style),
                Span::styled(" j/k ", key_style),
                Span::styled(" nav ", label_style),
            ]);
            match app.appt_tab {
                ApptTab::Book => hints.extend(vec![
                    Span::styled(" / ", key_style),
                    Span::styled(" search ", label_style),
                    Span::styled(" Enter ", key_style),
                    Span::styled(" book ", label_style),
                ]),
                ApptTab::Upcoming => hints.extend(vec![
                    Span::styled(" c ", key_style),
                    Span::styled(" cancel ", label_style),
                ]),
            }
        }
        (Screen::Appointments, InputMode::Editing) => {
            hints.extend(vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" apply ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" done ", label_style),
            ]);
        }
        (Screen::Records, _) => {
            hints.extend(vec![
                Span::styled(" j/k ", key_style),
                Span::styled(" nav ", label_style),
                Span::styled(" f ", key_style),
                Span::styled(" filter ", label_style),
            ]);
        }
        (Screen::Assistant, InputMode::Normal) => {
            hints.extend(vec![
                Span::styled(" i ", key_style),
                Span::styled(" type ", label_style),
                Span::styled(" j/k ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" home ", label_style),
            ]);
        }
        (Screen::Assistant, InputMode::Editing) => {
            hints.extend(vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" stop typing ", label_style),
            ]);
        }
        (Screen::Profile, InputMode::Normal) => {
            hints.extend(vec![
                Span::styled(" e ", key_style),
                Span::styled(" edit ", label_style),
                Span::styled(" L ", key_style),
                Span::styled(" logout ", label_style),
            ]);
        }
        (Screen::Profile, InputMode::Editing) => {
            hints.extend(vec![
                Span::styled(" Tab ", key_style),
                Span::styled(" field ", label_style),
                Span::styled(" Enter ", key_style),
                Span::styled(" save ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" cancel ", label_style),
            ]);
        }
        (Screen::Support, InputMode::Normal) => {
            if app.support_status == SupportStatus::Sent {
                hints.extend(vec![
                    Span::styled(" Enter ", key_style),
                    Span::styled(" dashboard ", label_style),
                ]);
            } else {
                hints.extend(vec![
                    Span::styled(" i ", key_style),
                    Span::styled(" edit ", label_style),
                ]);
            }
        }
        (Screen::Support, InputMode::Editing) => {
            hints.extend(vec![
                Span::styled(" Tab ", key_style),
                Span::styled(" field ", label_style),
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" done ", label_style),
            ]);
        }
        _ => {}
    }

    if app.input_mode == InputMode::Normal && app.profile.is_some() {
        hints.extend(vec![
            Span::styled(" 1-7 ", key_style),
            Span::styled(" screens ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ]);
    }

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

// --- Auth ---------------------------------------------------------------

fn render_auth_screen(app: &App, frame: &mut Frame, area: Rect) {
    let box_width = 48.min(area.width);
    let box_height = 14.min(area.height);
    let x = area.x + (area.width.saturating_sub(box_width)) / 2;
    let y = area.y + (area.height.saturating_sub(box_height)) / 2;
    let card = Rect::new(x, y, box_width, box_height);

    let title = match app.auth_mode {
        AuthMode::Login => " HealthGuard | Welcome Back ",
        AuthMode::Register => " HealthGuard | Create Account ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Your Personal AI Healthcare Companion",
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
    ];

    let field_line = |label: &str, value: &str, focused: bool, masked: bool| -> Line<'static> {
        let shown = if masked {
            "•".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        let style = if focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{:<16}", label), Style::default().fg(Color::Gray)),
            Span::styled(shown, style),
            Span::styled(if focused { " _" } else { "" }, style),
        ])
    };

    if app.auth_mode == AuthMode::Register {
        lines.push(field_line(
            "Full Name",
            &app.auth_name,
            app.auth_field == AuthField::Name,
            false,
        ));
    }
    lines.push(field_line(
        "Email or Phone",
        &app.auth_email,
        app.auth_field == AuthField::Email,
        false,
    ));
    lines.push(field_line(
        "Password",
        &app.auth_password,
        app.auth_field == AuthField::Password,
        true,
    ));
    lines.push(Line::default());

    if let Some(error) = &app.auth_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::default());
    }

    let action = match app.auth_mode {
        AuthMode::Login => "Enter: sign in   Ctrl+R: sign up instead",
        AuthMode::Register => "Enter: get started   Ctrl+R: log in instead",
    };
    lines.push(Line::from(Span::styled(
        action,
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        "Tab: next field   Ctrl+C: quit",
        Style::default().fg(Color::Gray),
    )));

    let form = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    frame.render_widget(form, inner);
}

// --- Dashboard ----------------------------------------------------------

fn render_dashboard(app: &mut App, frame: &mut Frame, area: Rect) {
    let [greeting_area, tip_area, metrics_area, trend_area, reminders_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Min(5),
    ])
    .areas(area);

    let first_name = app
        .profile
        .as_ref()
        .map(|p| p.first_name().to_string())
        .unwrap_or_default();
    let greeting = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Hello, {}!", first_name),
            Style::default().bold(),
        )),
        Line::from(Span::styled(
            "Here is your daily health summary.",
            Style::default().fg(Color::Gray),
        )),
    ]);
    frame.render_widget(greeting, greeting_area);

    let tip_text = match &app.health_tip {
        Some(tip) => format!("\"{}\"", tip),
        None => "Loading your daily tip...".to_string(),
    };
    let tip = Paragraph::new(tip_text)
        .style(Style::default().fg(Color::Cyan))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Daily AI Tip "),
        );
    frame.render_widget(tip, tip_area);

    let metric_areas = Layout::horizontal(
        app.metrics
            .iter()
            .map(|_| Constraint::Ratio(1, app.metrics.len() as u32))
            .collect::<Vec<_>>(),
    )
    .split(metrics_area);

    for (metric, cell) in app.metrics.iter().zip(metric_areas.iter()) {
        let color = match metric.status {
            MetricStatus::Good => Color::Green,
            MetricStatus::Warning => Color::Yellow,
        };
        let card = Paragraph::new(Line::from(vec![
            Span::styled(metric.value, Style::default().bold()),
            Span::styled(format!(" {}", metric.unit), Style::default().fg(Color::Gray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", metric.label)),
        );
        frame.render_widget(card, *cell);
    }

    let steps: Vec<u64> = data::weekly_steps().iter().map(|(_, s)| *s).collect();
    let trend = Sparkline::default()
        .data(&steps)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Activity Trend (steps, Mon-Sun) "),
        );
    frame.render_widget(trend, trend_area);

    let reminders_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(
            " Today's Reminders ({}/{} done) ",
            app.reminders_done_count(),
            app.reminders.len()
        ));

    let items: Vec<ListItem> = app
        .reminders
        .iter()
        .map(|r| {
            let check = if r.completed { "[x]" } else { "[ ]" };
            let kind = match r.kind {
                ReminderKind::Medication => "Rx",
                ReminderKind::General => "  ",
            };
            let style = if r.completed {
                Style::default().fg(Color::Gray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", check), Style::default().fg(Color::Green)),
                Span::styled(format!("{} ", kind), Style::default().fg(Color::Magenta)),
                Span::styled(r.title.clone(), style),
                Span::styled(format!("  {}", r.time), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(reminders_block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, reminders_area, &mut app.reminder_state);
}

// --- Appointments -------------------------------------------------------

fn render_appointments(app: &mut App, frame: &mut Frame, area: Rect) {
    let [tabs_area, body_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let tab_label = |label: &str, active: bool| {
        if active {
            Span::styled(
                format!(" {} ", label),
                Style::default().bg(Color::Blue).fg(Color::White).bold(),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray))
        }
    };
    let tabs = Paragraph::new(Line::from(vec![
        tab_label("Book New", app.appt_tab == ApptTab::Book),
        Span::raw(" "),
        tab_label("Upcoming", app.appt_tab == ApptTab::Upcoming),
    ]));
    frame.render_widget(tabs, tabs_area);

    match app.appt_tab {
        ApptTab::Book => render_doctor_list(app, frame, body_area),
        ApptTab::Upcoming => render_upcoming(app, frame, body_area),
    }
}

fn render_doctor_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let [search_area, list_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let search_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.input_mode == InputMode::Editing {
            Color::Yellow
        } else {
            Color::DarkGray
        }))
        .title(" Search doctors, specialty ");
    let search = Paragraph::new(app.appt_search.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(search_block);
    frame.render_widget(search, search_area);

    if app.input_mode == InputMode::Editing {
        frame.set_cursor_position((
            search_area.x + app.appt_search.chars().count() as u16 + 1,
            search_area.y + 1,
        ));
    }

    let indices = app.filtered_doctor_indices();
    let items: Vec<ListItem> = indices
        .iter()
        .filter_map(|&i| app.doctors.get(i))
        .map(|d| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<20}", d.name), Style::default().bold()),
                Span::styled(format!("{:<22}", d.specialty), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{:.1}* ", d.rating), Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:.1} km", d.distance_km),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Doctors ({}) ", indices.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, list_area, &mut app.doctor_state);
}

fn render_upcoming(app: &mut App, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = app
        .appointments
        .iter()
        .map(|a| {
            let status_style = match a.status {
                AppointmentStatus::Upcoming => Style::default().fg(Color::Green),
                AppointmentStatus::Completed => Style::default().fg(Color::Gray),
                AppointmentStatus::Cancelled => {
                    Style::default().fg(Color::Red).add_modifier(Modifier::CROSSED_OUT)
                }
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<20}", a.doctor_name), Style::default().bold()),
                Span::styled(format!("{:<22}", a.specialty), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{} {} ", a.date, a.time), Style::default().fg(Color::Gray)),
                Span::styled(a.status.label(), status_style),
            ]))
        })
        .collect();

    let empty = app.appointments.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Upcoming Appointments "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.appt_state);

    if empty {
        let placeholder = Paragraph::new("No upcoming appointments.")
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(placeholder, area.inner(Margin::new(2, 2)));
    }
}

// --- Records ------------------------------------------------------------

fn render_records(app: &mut App, frame: &mut Frame, area: Rect) {
    let filter_label = app
        .record_filter
        .map(|k| k.label().to_string())
        .unwrap_or_else(|| "All".to_string());

    let indices = app.filtered_record_indices();
    let items: Vec<ListItem> = indices
        .iter()
        .filter_map(|&i| app.records.get(i))
        .map(|r| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<22}", r.title), Style::default().bold()),
                Span::styled(
                    format!("{:<14}", r.kind.label()),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(format!("{:<12}", r.date), Style::default().fg(Color::Gray)),
                Span::styled(r.doctor.clone(), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(
                    " Medical Records | filter: {} ({}) ",
                    filter_label,
                    indices.len()
                )),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.record_state);
}

// --- Assistant ----------------------------------------------------------

fn render_assistant(app: &mut App, frame: &mut Frame, area: Rect) {
    let [notice_area, chat_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let notice = Paragraph::new(Span::styled(
        " AI can make mistakes. Not a substitute for professional medical advice.",
        Style::default().fg(Color::Yellow),
    ));
    frame.render_widget(notice, notice_area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" AI Health Assistant ");

    let mut lines: Vec<Line> = Vec::new();
    for msg in &app.chat_messages {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(msg.text.clone()));
                lines.push(Line::default());
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "Assistant:",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )));
                for line in msg.text.lines() {
                    lines.push(parse_markdown_line(line));
                }
                lines.push(Line::default());
            }
        }
    }

    if app.chat_pending {
        lines.push(Line::from(Span::styled(
            "Assistant:",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));
    }

    let total_lines = lines.len() as u16;
    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    if total_lines > app.chat_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));
        let mut scrollbar_state =
            ScrollbarState::new(total_lines as usize).position(app.chat_scroll as usize);
        frame.render_stateful_widget(
            scrollbar,
            chat_area.inner(Margin::new(0, 1)),
            &mut scrollbar_state,
        );
    }

    let input_title = if app.chat_pending {
        " Waiting for reply... "
    } else {
        " Ask about symptoms, diet, etc. "
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(
            if app.input_mode == InputMode::Editing && !app.chat_pending {
                Color::Yellow
            } else {
                Color::DarkGray
            },
        ))
        .title(input_title);

    let input = Paragraph::new(app.chat_input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, input_area);

    if app.input_mode == InputMode::Editing {
        frame.set_cursor_position((
            input_area.x + app.chat_cursor as u16 + 1,
            input_area.y + 1,
        ));
    }
}

// --- Emergency ----------------------------------------------------------

fn render_emergency(app: &mut App, frame: &mut Frame, area: Rect) {
    let [list_area, note_area] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(4),
    ])
    .areas(area);

    let items: Vec<ListItem> = app
        .emergency_actions
        .iter()
        .map(|a| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:<22}", a.title),
                    Style::default().fg(Color::Red).bold(),
                ),
                Span::styled(a.subtitle, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Emergency "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Red)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut app.emergency_state);

    let note = Paragraph::new(
        "Note: In a life-threatening emergency, always dial your local emergency \
         number directly from your phone if this app is unresponsive.",
    )
    .style(Style::default().fg(Color::Yellow))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(note, note_area);
}

// --- Profile ------------------------------------------------------------

fn render_profile(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(profile) = app.profile.clone() else {
        return;
    };

    let [head_area, flash_area, form_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let head = Paragraph::new(vec![
        Line::from(Span::styled(profile.name.clone(), Style::default().bold())),
        Line::from(Span::styled(
            profile.email.clone(),
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(head, head_area);

    if let Some(message) = &app.profile_message {
        let flash = Paragraph::new(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        ));
        frame.render_widget(flash, flash_area);
    }

    let field_style = |field: ProfileField| {
        if app.profile_editing && app.profile_field == field {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        }
    };

    let (name_value, age_value, blood_value) = if app.profile_editing {
        (
            app.profile_name_input.clone(),
            app.profile_age_input.clone(),
            app.profile_blood_idx
                .and_then(|i| data::BLOOD_TYPES.get(i))
                .map(|b| format!("< {} >", b))
                .unwrap_or_else(|| "< Not set >".to_string()),
        )
    } else {
        (
            profile.name.clone(),
            profile
                .age
                .map(|a| a.to_string())
                .unwrap_or_else(|| "Not set".to_string()),
            profile
                .blood_type
                .clone()
                .unwrap_or_else(|| "Not set".to_string()),
        )
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Full Name   ", Style::default().fg(Color::Gray)),
            Span::styled(name_value, field_style(ProfileField::Name)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Email       ", Style::default().fg(Color::Gray)),
            Span::styled(profile.email.clone(), Style::default().fg(Color::Gray)),
            Span::styled("  (read-only)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Age         ", Style::default().fg(Color::Gray)),
            Span::styled(age_value, field_style(ProfileField::Age)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Blood Type  ", Style::default().fg(Color::Gray)),
            Span::styled(blood_value, field_style(ProfileField::BloodType)),
        ]),
    ];

    let title = if app.profile_editing {
        " My Profile (editing) "
    } else {
        " My Profile "
    };
    let form = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if app.profile_editing {
                Color::Yellow
            } else {
                Color::Cyan
            }))
            .title(title),
    );
    frame.render_widget(form, form_area);
}

// --- Support ------------------------------------------------------------

fn render_support(app: &mut App, frame: &mut Frame, area: Rect) {
    if app.support_status == SupportStatus::Sent {
        let email = app
            .profile
            .as_ref()
            .map(|p| p.email.clone())
            .unwrap_or_else(|| "your email".to_string());
        let message = Paragraph::new(vec![
            Line::from(Span::styled("Message Sent!", Style::default().fg(Color::Green).bold())),
            Line::default(),
            Line::from(format!(
                "Thank you for reaching out. Our support team will get back to you at {} shortly.",
                email
            )),
            Line::default(),
            Line::from(Span::styled(
                "Press Enter to return to the dashboard.",
                Style::default().fg(Color::Gray),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(" Contact Support "),
        );
        frame.render_widget(message, area);
        return;
    }

    let [intro_area, form_area, status_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(8),
        Constraint::Length(3),
    ])
    .areas(area);

    let intro = Paragraph::new(
        "Have a question about the app or need assistance? Fill out the form below \
         and our team will help you.",
    )
    .style(Style::default().fg(Color::Gray))
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, intro_area);

    let field_style = |field: SupportField| {
        if app.input_mode == InputMode::Editing && app.support_field == field {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        }
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Your Name     ", Style::default().fg(Color::Gray)),
            Span::styled(app.support_name.clone(), field_style(SupportField::Name)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Email Address ", Style::default().fg(Color::Gray)),
            Span::styled(app.support_email.clone(), field_style(SupportField::Email)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Message       ", Style::default().fg(Color::Gray)),
            Span::styled(
                app.support_message.clone(),
                field_style(SupportField::Message),
            ),
        ]),
    ];

    let form = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Contact Support "),
        );
    frame.render_widget(form, form_area);

    let status_line = match app.support_status {
        SupportStatus::Idle => Line::from(Span::styled(
            "Enter sends the message.",
            Style::default().fg(Color::Gray),
        )),
        SupportStatus::Submitting => Line::from(Span::styled(
            "Sending...",
            Style::default().fg(Color::Yellow),
        )),
        SupportStatus::Failed => Line::from(Span::styled(
            "Something went wrong sending your message. Please try again later.",
            Style::default().fg(Color::Red),
        )),
        SupportStatus::Sent => Line::default(),
    };
    let status = Paragraph::new(status_line)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, status_area);
}
