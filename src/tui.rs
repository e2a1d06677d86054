use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::catalog::{Aircraft, Service, AIRCRAFT, AIRPORTS};
use crate::config::Preferences;
use crate::error::Result;
use crate::i18n::Translator;
use crate::output::{quote_lines, receipt_summary, OutputMode};
use crate::pricing::format_euros;
use crate::quote::{QuoteError, TripType};
use crate::submit::{Receipt, SubmitError, Submitter};
use crate::validate::{Field, ReturnDatePolicy, WizardStep};
use crate::wizard::{Advance, NoticeLevel, Phase, Variant, Wizard, WizardError};

const TICK: Duration = Duration::from_millis(100);
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One editable line of a step.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Row {
    Trip(TripType),
    Origin,
    Destination,
    Departure,
    Return,
    Passengers,
    Aircraft(&'static Aircraft),
    Service(Service),
    Name,
    Email,
    Phone,
    Message,
}

impl Row {
    fn is_text(self) -> bool {
        matches!(
            self,
            Row::Origin | Row::Destination | Row::Name | Row::Email | Row::Phone | Row::Message
        )
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
    Output(String, OutputMode),
}

type Outcome = std::result::Result<Receipt, SubmitError>;

pub struct App {
    wizard: Wizard,
    translator: Translator,
    preferences: Preferences,
    submitter: Arc<dyn Submitter>,
    runtime: Handle,
    cursor: usize,
    departure_buf: String,
    return_buf: String,
    hint: Option<String>,
    pending: Option<oneshot::Receiver<Outcome>>,
    ticks: usize,
}

impl App {
    pub fn new(
        wizard: Wizard,
        translator: Translator,
        preferences: Preferences,
        submitter: Arc<dyn Submitter>,
        runtime: Handle,
    ) -> Self {
        Self {
            wizard,
            translator,
            preferences,
            submitter,
            runtime,
            cursor: 0,
            departure_buf: String::new(),
            return_buf: String::new(),
            hint: None,
            pending: None,
            ticks: 0,
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    fn rows(&self) -> Vec<Row> {
        let Some(step) = self.wizard.active_step() else {
            return Vec::new();
        };
        let req = self.wizard.request();

        match step {
            WizardStep::TripType => TripType::ALL.into_iter().map(Row::Trip).collect(),
            WizardStep::Route => {
                let mut rows = Vec::new();
                // The reservation flow has no trip-type step of its own
                if self.wizard.variant() == Variant::Reservation {
                    rows.push(Row::Trip(TripType::OneWay));
                    rows.push(Row::Trip(TripType::RoundTrip));
                }
                rows.push(Row::Origin);
                rows.push(Row::Destination);
                rows
            }
            WizardStep::Schedule => {
                let mut rows = vec![Row::Departure];
                if req.is_round_trip() {
                    rows.push(Row::Return);
                }
                rows.push(Row::Passengers);
                rows
            }
            WizardStep::Aircraft => AIRCRAFT.iter().map(Row::Aircraft).collect(),
            WizardStep::Services => Service::ALL.into_iter().map(Row::Service).collect(),
            WizardStep::Contact => vec![Row::Name, Row::Email, Row::Phone, Row::Message],
            WizardStep::Review => Vec::new(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('q') {
            return Flow::Quit;
        }
        if key.code == KeyCode::F(2) {
            self.cycle_language();
            return Flow::Continue;
        }

        let summary = match self.wizard.phase() {
            Phase::Submitted(receipt) => Some(receipt_summary(receipt, &self.translator)),
            _ => None,
        };
        if let Some(summary) = summary {
            return match key.code {
                KeyCode::Enter => Flow::Output(summary, OutputMode::Print),
                KeyCode::Char('c') if ctrl => Flow::Output(summary, OutputMode::Clipboard),
                KeyCode::Char('q') | KeyCode::Esc => Flow::Quit,
                KeyCode::Char('d') => {
                    self.wizard.dismiss_notice();
                    Flow::Continue
                }
                _ => Flow::Continue,
            };
        }

        if matches!(self.wizard.phase(), Phase::Submitting) {
            return Flow::Continue;
        }
        if matches!(self.wizard.phase(), Phase::Error(_)) {
            return self.handle_error_key(key);
        }

        self.handle_editing_key(key);
        Flow::Continue
    }

    fn handle_error_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Char('r') => self.start_submission(true),
            KeyCode::Esc => {
                self.wizard.retreat();
                self.enter_step();
            }
            KeyCode::Char('d') => self.wizard.dismiss_notice(),
            KeyCode::Char('q') => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        let rows = self.rows();
        let row = rows.get(self.cursor).copied();
        self.hint = None;

        match key.code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.cursor + 1 < rows.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => self.confirm_step(),
            KeyCode::Esc => {
                if self.wizard.retreat() {
                    self.enter_step();
                }
            }
            KeyCode::Left => {
                if let Some(row) = row {
                    self.adjust(row, false);
                }
            }
            KeyCode::Right => {
                if let Some(row) = row {
                    self.adjust(row, true);
                }
            }
            KeyCode::Backspace => {
                if let Some(row) = row {
                    self.backspace(row);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(row) = row {
                    self.activate(row);
                }
            }
            // AltGr arrives as Ctrl+Alt on Windows
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    || key.modifiers.contains(KeyModifiers::ALT) =>
            {
                if let Some(row) = row {
                    self.type_char(row, c);
                }
            }
            _ => {}
        }

        self.sync_date_buffers();
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn confirm_step(&mut self) {
        if self.wizard.is_final_step() {
            self.start_submission(false);
            return;
        }
        match self.wizard.advance() {
            Advance::Moved(_) => self.enter_step(),
            Advance::Blocked(missing) => self.hint = Some(self.missing_hint(&missing)),
            Advance::AtEnd => {}
        }
    }

    fn enter_step(&mut self) {
        self.cursor = 0;
        self.hint = None;
    }

    /// Gauge label; the check mark tells the user Enter will move on.
    fn progress_label(&self) -> String {
        let total = self.wizard.total_steps();
        let current = self.wizard.current_step().unwrap_or(total);
        let mut label = format!("{} {}/{}", self.translator.t("wizard.step_of"), current, total);
        if matches!(self.wizard.phase(), Phase::Editing(_)) && self.wizard.can_advance() {
            label.push_str(" ✓");
        }
        label
    }

    fn return_placeholder(&self) -> String {
        let placeholder = self.translator.t("wizard.date_placeholder");
        match self.wizard.policy() {
            ReturnDatePolicy::Required => placeholder,
            ReturnDatePolicy::Optional => {
                format!("{} ({})", placeholder, self.translator.t("wizard.optional"))
            }
        }
    }

    fn missing_hint(&self, missing: &[Field]) -> String {
        let labels: Vec<String> = missing
            .iter()
            .map(|field| self.translator.t(field.label_key()))
            .collect();
        format!("{}: {}", self.translator.t("wizard.required"), labels.join(", "))
    }

    fn quote_error(&mut self, err: QuoteError) {
        debug!(error = %err, "field rejected");
        self.hint = Some(self.translator.t(err.message_key()));
    }

    fn start_submission(&mut self, retry: bool) {
        let result = if retry {
            self.wizard.retry()
        } else {
            self.wizard.begin_submit()
        };

        match result {
            Ok(submission) => {
                let (tx, rx) = oneshot::channel();
                let submitter = Arc::clone(&self.submitter);
                self.runtime.spawn(async move {
                    let outcome = submitter.submit(submission).await;
                    let _ = tx.send(outcome);
                });
                self.pending = Some(rx);
            }
            Err(WizardError::Incomplete(failure)) => {
                self.hint = Some(self.missing_hint(&failure.missing));
            }
            Err(err) => debug!(error = %err, "submission not started"),
        }
    }

    /// Picks up a finished submission, if any.
    fn poll_submission(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                warn!("submission task ended without an outcome");
                Err(SubmitError::Rejected)
            }
        };

        self.pending = None;
        self.wizard.finish_submit(outcome);
        if matches!(self.wizard.phase(), Phase::Submitted(_)) {
            self.departure_buf.clear();
            self.return_buf.clear();
            self.cursor = 0;
        }
    }

    fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
        self.poll_submission();
    }

    fn cycle_language(&mut self) {
        let next = self.translator.language().next();
        self.translator.set_language(next);
        if let Err(e) = self.preferences.set_language(next) {
            warn!(error = %e, "could not save language preference");
        }
        info!(language = next.code(), "language changed");
    }

    fn adjust(&mut self, row: Row, forward: bool) {
        match row {
            Row::Origin | Row::Destination => {
                let Some(req) = self.wizard.request_mut() else {
                    return;
                };
                let field = if row == Row::Origin {
                    &mut req.origin
                } else {
                    &mut req.destination
                };
                *field = cycle_airport(field, forward).to_string();
            }
            Row::Departure | Row::Return => self.shift_date(row, forward),
            Row::Passengers => {
                if let Some(req) = self.wizard.request_mut() {
                    if forward {
                        req.increment_passengers();
                    } else {
                        req.decrement_passengers();
                    }
                }
            }
            Row::Trip(_) | Row::Aircraft(_) if forward => self.activate(row),
            _ => {}
        }
    }

    fn activate(&mut self, row: Row) {
        if row.is_text() {
            self.type_char(row, ' ');
            return;
        }
        let Some(req) = self.wizard.request_mut() else {
            return;
        };

        match row {
            Row::Trip(trip) => {
                debug!(trip = %trip, "trip type selected");
                req.set_trip_type(trip);
                if trip != TripType::RoundTrip {
                    self.return_buf.clear();
                }
            }
            Row::Aircraft(aircraft) => {
                if let Err(e) = req.select_aircraft(aircraft.id) {
                    self.quote_error(e);
                }
            }
            Row::Service(service) => {
                req.toggle_service(service);
            }
            _ => {}
        }
    }

    fn type_char(&mut self, row: Row, c: char) {
        match row {
            Row::Departure | Row::Return => {
                let buf = self.date_buf(row);
                if (c.is_ascii_digit() || c == '-') && buf.len() < 10 {
                    buf.push(c);
                    self.apply_date_buffer(row);
                }
            }
            Row::Passengers => match c {
                '+' => self.adjust(row, true),
                '-' => self.adjust(row, false),
                _ => {}
            },
            _ => {
                if let Some(text) = self.text_field(row) {
                    text.push(c);
                }
            }
        }
    }

    fn backspace(&mut self, row: Row) {
        match row {
            Row::Departure | Row::Return => {
                self.date_buf(row).pop();
                self.apply_date_buffer(row);
            }
            _ => {
                if let Some(text) = self.text_field(row) {
                    text.pop();
                }
            }
        }
    }

    fn text_field(&mut self, row: Row) -> Option<&mut String> {
        let req = self.wizard.request_mut()?;
        match row {
            Row::Origin => Some(&mut req.origin),
            Row::Destination => Some(&mut req.destination),
            Row::Name => Some(&mut req.contact.name),
            Row::Email => Some(&mut req.contact.email),
            Row::Phone => Some(&mut req.contact.phone),
            Row::Message => Some(&mut req.contact.message),
            _ => None,
        }
    }

    fn date_buf(&mut self, row: Row) -> &mut String {
        if row == Row::Return {
            &mut self.return_buf
        } else {
            &mut self.departure_buf
        }
    }

    /// Only a complete `YYYY-MM-DD` buffer sets the date; anything shorter
    /// leaves it unset.
    fn apply_date_buffer(&mut self, row: Row) {
        let buf = self.date_buf(row).clone();
        let parsed = if buf.len() == 10 {
            NaiveDate::parse_from_str(&buf, DATE_FORMAT).ok()
        } else {
            None
        };
        if buf.len() == 10 && parsed.is_none() {
            self.hint = Some(self.translator.t("wizard.invalid_date"));
        }
        self.set_date(row, parsed);
    }

    fn shift_date(&mut self, row: Row, forward: bool) {
        let today = self.wizard.today();
        let req = self.wizard.request();
        let current = match row {
            Row::Return => req.return_date(),
            _ => req.departure_date(),
        };
        let next = match current {
            Some(date) if forward => date.checked_add_days(Days::new(1)),
            Some(date) => date.checked_sub_days(Days::new(1)),
            None if row == Row::Return => Some(req.departure_date().unwrap_or(today)),
            None => Some(today),
        };
        if let Some(next) = next {
            self.set_date(row, Some(next));
        }
    }

    fn set_date(&mut self, row: Row, date: Option<NaiveDate>) {
        let today = self.wizard.today();
        let Some(req) = self.wizard.request_mut() else {
            return;
        };
        let had_return = req.return_date().is_some();

        // A rejected date leaves the previous one in place
        let result = if row == Row::Return {
            req.set_return_date(date, today)
        } else {
            req.set_departure_date(date, today)
        };
        let dropped_return = had_return && req.return_date().is_none() && row == Row::Departure;
        let kept = if row == Row::Return {
            req.return_date()
        } else {
            req.departure_date()
        };

        if dropped_return {
            self.return_buf.clear();
        }
        if let Err(e) = result {
            // The buffer must never show a date the request does not hold
            if kept.is_none() {
                self.date_buf(row).clear();
            }
            self.quote_error(e);
        }
    }

    fn sync_date_buffers(&mut self) {
        let req = self.wizard.request();
        if let Some(date) = req.departure_date() {
            self.departure_buf = date.format(DATE_FORMAT).to_string();
        }
        if let Some(date) = req.return_date() {
            self.return_buf = date.format(DATE_FORMAT).to_string();
        }
        if !req.is_round_trip() {
            self.return_buf.clear();
        }
    }
}

fn cycle_airport(current: &str, forward: bool) -> &'static str {
    let len = AIRPORTS.len();
    let next = match AIRPORTS.iter().position(|a| *a == current.trim()) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    AIRPORTS[next]
}

pub fn run(app: &mut App) -> Result<Option<(String, OutputMode)>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<Option<(String, OutputMode)>> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // Poll instead of blocking so a finished submission shows up unprompted
        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key) {
                        Flow::Continue => {}
                        Flow::Quit => return Ok(None),
                        Flow::Output(text, mode) => return Ok(Some((text, mode))),
                    }
                }
            }
        }

        app.tick();
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn ui(f: &mut Frame, app: &App) {
    let centered = centered_rect(76, 24, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(centered);

    let t = &app.translator;
    let title = format!(
        " {} · {} ",
        t.t("app.title"),
        t.language().name()
    );
    render_progress(f, chunks[0], app, &title);

    let help_key = match app.wizard.phase() {
        Phase::Editing(_) => match app.wizard.active_step() {
            Some(WizardStep::Review) => "wizard.help_submit",
            Some(WizardStep::Route | WizardStep::Schedule | WizardStep::Contact) => {
                "wizard.help_form"
            }
            _ => "wizard.help_list",
        },
        Phase::Submitting => "wizard.help_sending",
        Phase::Submitted(_) => "wizard.help_submitted",
        Phase::Error(_) => "wizard.help_error",
    };

    match app.wizard.phase() {
        Phase::Editing(_) => render_step(f, chunks[1], app),
        Phase::Submitting => {
            let dots = ".".repeat(app.ticks / 3 % 4);
            let content = vec![
                Line::from(""),
                Line::from(""),
                Line::from(Span::styled(
                    format!("{}{}", t.t("wizard.sending"), dots),
                    Style::default().fg(Color::Cyan).bold(),
                )),
            ];
            let paragraph = Paragraph::new(content)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            f.render_widget(paragraph, chunks[1]);
        }
        Phase::Submitted(receipt) => {
            let mut lines = notice_lines(app);
            for line in receipt_summary(receipt, t).lines() {
                lines.push(Line::from(line.to_string()));
            }
            let paragraph = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(format!(" {} ", t.t("summary.title"))))
                .wrap(Wrap { trim: false });
            f.render_widget(paragraph, chunks[1]);
        }
        Phase::Error(_) => {
            let mut lines = notice_lines(app);
            for (label, value) in quote_lines(app.wizard.request(), t) {
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
                    Span::raw(value),
                ]));
            }
            let paragraph = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL))
                .wrap(Wrap { trim: false });
            f.render_widget(paragraph, chunks[1]);
        }
    }

    let blocked = matches!(app.wizard.phase(), Phase::Editing(_)) && !app.wizard.can_advance();
    let help_style = if blocked {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let help = Paragraph::new(t.t(help_key))
        .style(help_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_progress(f: &mut Frame, area: Rect, app: &App, title: &str) {
    let total = app.wizard.total_steps();
    let current = app.wizard.current_step().unwrap_or(total);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(current as f64 / total.max(1) as f64)
        .label(app.progress_label());
    f.render_widget(gauge, area);
}

fn notice_lines(app: &App) -> Vec<Line<'static>> {
    let Some(notice) = app.wizard.notice() else {
        return Vec::new();
    };
    let color = match notice.level {
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
    };
    vec![
        Line::from(Span::styled(
            app.translator.t(notice.title_key),
            Style::default().fg(color).bold(),
        )),
        Line::from(app.translator.t(notice.body_key)),
        Line::from(""),
    ]
}

fn render_step(f: &mut Frame, area: Rect, app: &App) {
    let Some(step) = app.wizard.active_step() else {
        return;
    };
    let t = &app.translator;

    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // Rows
            Constraint::Length(1), // Hint
            Constraint::Length(1), // Breadcrumb
        ])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} {} ", step.glyph(), t.t(step.title_key())));
    f.render_widget(block, area);

    let mut lines: Vec<Line> = if step == WizardStep::Review {
        quote_lines(app.wizard.request(), t)
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
                    Span::styled(value, Style::default().bold()),
                ])
            })
            .collect()
    } else {
        app.rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| row_line(app, row, i == app.cursor))
            .collect()
    };

    if matches!(
        step,
        WizardStep::Aircraft | WizardStep::Services | WizardStep::Contact | WizardStep::Review
    ) {
        if let Some(total) = app.wizard.estimate() {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw(format!("{}: ", t.t("summary.estimate"))),
                Span::styled(format_euros(total), Style::default().fg(Color::Green).bold()),
            ]));
            lines.push(Line::from(Span::styled(
                t.t("summary.estimate_note"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner_chunks[0]);

    if let Some(hint) = &app.hint {
        let hint = Paragraph::new(Line::from(Span::styled(
            hint.as_str(),
            Style::default().fg(Color::Red),
        )));
        f.render_widget(hint, inner_chunks[1]);
    }

    // Breadcrumb at the bottom
    let crumbs = app.wizard.build_breadcrumb(t);
    if !crumbs.is_empty() {
        let breadcrumb = Paragraph::new(Line::from(Span::styled(
            crumbs.join(" › "),
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(breadcrumb, inner_chunks[2]);
    }
}

fn row_line(app: &App, row: Row, is_cursor: bool) -> Line<'static> {
    let t = &app.translator;
    let req = app.wizard.request();
    let cursor_style = Style::default().fg(Color::Cyan).bold();
    let dim = Style::default().fg(Color::DarkGray);

    let marker = |on: bool| if on { "● " } else { "○ " };
    let field = |label_key: &str, value: &str, placeholder: String| {
        let label_style = if is_cursor { cursor_style } else { Style::default() };
        let mut spans = vec![Span::styled(format!("{}: ", t.t(label_key)), label_style)];
        if value.is_empty() {
            spans.push(Span::styled(placeholder, dim));
        } else {
            spans.push(Span::raw(value.to_string()));
        }
        if is_cursor {
            spans.push(Span::raw("█"));
        }
        Line::from(spans)
    };

    match row {
        Row::Trip(trip) => {
            let chosen = req.trip_type() == Some(trip);
            let style = if is_cursor {
                cursor_style
            } else if chosen {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{}{}", marker(chosen), t.t(trip.label_key())), style),
                Span::styled(format!("  {}", t.t(trip.description_key())), dim),
            ])
        }
        Row::Origin => field("fields.origin", &req.origin, "← →".to_string()),
        Row::Destination => field("fields.destination", &req.destination, "← →".to_string()),
        Row::Departure => field(
            "fields.departure_date",
            &app.departure_buf,
            t.t("wizard.date_placeholder"),
        ),
        Row::Return => field("fields.return_date", &app.return_buf, app.return_placeholder()),
        Row::Passengers => {
            let style = if is_cursor { cursor_style } else { Style::default() };
            Line::from(vec![
                Span::styled(format!("{}: ", t.t("fields.passengers")), style),
                Span::raw(format!("‹ {} ›", req.passengers())),
                Span::styled(format!("  (1–{})", req.max_passengers()), dim),
            ])
        }
        Row::Aircraft(aircraft) => {
            let chosen = req.aircraft().is_some_and(|a| a.id == aircraft.id);
            let style = if is_cursor {
                cursor_style
            } else if chosen {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(
                    format!("{}{} {}", marker(chosen), aircraft.category.glyph(), aircraft.name),
                    style,
                ),
                Span::styled(
                    format!(
                        "  {} {} · {} km · {}/h",
                        aircraft.capacity,
                        t.t("summary.pax"),
                        aircraft.range_km,
                        format_euros(aircraft.hourly_rate)
                    ),
                    dim,
                ),
            ])
        }
        Row::Service(service) => {
            let selected = req.services().contains(&service);
            let checkbox = if selected { "[x] " } else { "[ ] " };
            let style = if is_cursor {
                cursor_style
            } else if selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{}{}", checkbox, t.t(service.label_key())),
                style,
            ))
        }
        Row::Name => field("fields.name", &req.contact.name, String::new()),
        Row::Email => field("fields.email", &req.contact.email, String::new()),
        Row::Phone => field("fields.phone", &req.contact.phone, String::new()),
        Row::Message => field("fields.message", &req.contact.message, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::submit::SimulatedBackend;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn app_with(variant: Variant, runtime: &tokio::runtime::Runtime) -> App {
        app_with_backend(variant, SimulatedBackend::new(Duration::ZERO), runtime)
    }

    fn app_with_backend(
        variant: Variant,
        backend: SimulatedBackend,
        runtime: &tokio::runtime::Runtime,
    ) -> App {
        App::new(
            Wizard::new(variant, ReturnDatePolicy::Required, today()),
            Translator::new(Language::En),
            Preferences::in_memory(Language::En),
            Arc::new(backend),
            runtime.handle().clone(),
        )
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Walks the quote variant up to its last step with a one-way request.
    fn fill_quote(app: &mut App) {
        // Trip type: one way
        press(app, KeyCode::Char(' '));
        press(app, KeyCode::Enter);
        // Route
        type_str(app, "Lisboa");
        press(app, KeyCode::Down);
        type_str(app, "Paris");
        press(app, KeyCode::Enter);
        // Schedule
        type_str(app, "2025-06-01");
        press(app, KeyCode::Enter);
        // Aircraft: first entry
        press(app, KeyCode::Char(' '));
        press(app, KeyCode::Enter);
        // Services: none
        press(app, KeyCode::Enter);
        // Contact
        type_str(app, "Ana Costa");
        press(app, KeyCode::Down);
        type_str(app, "ana@example.com");
        press(app, KeyCode::Down);
        type_str(app, "+351 912 345 678");
    }

    fn wait_for_outcome(app: &mut App) {
        for _ in 0..200 {
            app.tick();
            if app.pending.is_none() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("submission never resolved");
    }

    #[test]
    fn test_blocked_advance_names_missing_field() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Quote, &rt);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.wizard.current_step(), Some(1));
        let hint = app.hint.clone().unwrap();
        assert!(hint.starts_with("Missing required fields"));
        assert!(hint.contains("Trip type"));
    }

    #[test]
    fn test_route_typing_and_airport_cycle() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Quote, &rt);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.wizard.active_step(), Some(WizardStep::Route));

        press(&mut app, KeyCode::Right);
        assert_eq!(app.wizard.request().origin, AIRPORTS[0]);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.wizard.request().origin, AIRPORTS[AIRPORTS.len() - 1]);

        press(&mut app, KeyCode::Down);
        type_str(&mut app, "Ibiza");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.wizard.request().destination, "Ibiz");
    }

    #[test]
    fn test_date_buffer_sets_date_when_complete() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Reservation, &rt);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "Lisboa");
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "Paris");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.wizard.active_step(), Some(WizardStep::Schedule));

        type_str(&mut app, "2025-06-0");
        assert_eq!(app.wizard.request().departure_date(), None);
        type_str(&mut app, "1");
        assert_eq!(
            app.wizard.request().departure_date(),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );

        press(&mut app, KeyCode::Right);
        assert_eq!(app.departure_buf, "2025-06-02");
    }

    #[test]
    fn test_past_date_shows_hint() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Reservation, &rt);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "A");
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "B");
        press(&mut app, KeyCode::Enter);

        type_str(&mut app, "2024-01-01");
        assert_eq!(app.wizard.request().departure_date(), None);
        assert_eq!(app.hint.as_deref(), Some("The date cannot be in the past"));
    }

    #[test]
    fn test_f2_cycles_language() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Quote, &rt);
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.translator.language(), Language::Fr);
        assert_eq!(app.preferences.language, Language::Fr);
    }

    #[test]
    fn test_full_quote_submission() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Quote, &rt);
        fill_quote(&mut app);
        assert!(app.wizard.is_final_step());
        assert_eq!(app.wizard.estimate(), Some(5_000));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.wizard.phase(), &Phase::Submitting);

        wait_for_outcome(&mut app);
        assert!(matches!(app.wizard.phase(), Phase::Submitted(_)));
        assert_eq!(app.wizard.request().origin, "");

        match press(&mut app, KeyCode::Enter) {
            Flow::Output(text, OutputMode::Print) => {
                assert!(text.starts_with("Reference number: QT-"));
                assert!(text.contains("Lisboa → Paris"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ctrl_q_quits_from_anywhere() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Quote, &rt);
        let flow = app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert_eq!(flow, Flow::Quit);
    }

    #[test]
    fn test_rejected_return_date_clears_buffer() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Quote, &rt);
        // Round trip
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "Lisboa");
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "Paris");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.wizard.active_step(), Some(WizardStep::Schedule));

        type_str(&mut app, "2025-06-10");
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "2025-06-05");
        assert_eq!(app.wizard.request().return_date(), None);
        assert_eq!(app.return_buf, "");
        assert_eq!(
            app.hint.as_deref(),
            Some("Return cannot be before departure")
        );

        // Moving on clears the hint, and the row still shows nothing
        press(&mut app, KeyCode::Down);
        assert_eq!(app.hint, None);
        assert_eq!(app.return_buf, "");
        assert_eq!(app.departure_buf, "2025-06-10");
    }

    #[test]
    fn test_rejected_arrow_step_keeps_previous_date() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Reservation, &rt);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "A");
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "B");
        press(&mut app, KeyCode::Enter);

        // First arrow press lands on today; one more back is in the past
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.wizard.request().departure_date(), Some(today()));
        assert_eq!(app.departure_buf, "2025-05-01");
        assert!(app.hint.is_some());
    }

    #[test]
    fn test_failed_submission_retry_and_back_to_editing() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let backend = SimulatedBackend::failing(Duration::ZERO);
        let mut app = app_with_backend(Variant::Quote, backend, &rt);
        fill_quote(&mut app);

        press(&mut app, KeyCode::Enter);
        wait_for_outcome(&mut app);
        assert_eq!(app.wizard.phase(), &Phase::Error(SubmitError::Rejected));
        assert_eq!(app.wizard.request().origin, "Lisboa");
        assert_eq!(app.wizard.request().contact.name, "Ana Costa");
        assert_eq!(
            app.wizard.notice().map(|n| n.level),
            Some(NoticeLevel::Error)
        );

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.wizard.phase(), &Phase::Submitting);
        assert!(app.wizard.notice().is_none());
        wait_for_outcome(&mut app);
        assert!(matches!(app.wizard.phase(), Phase::Error(_)));

        press(&mut app, KeyCode::Esc);
        assert_eq!(
            app.wizard.phase(),
            &Phase::Editing(app.wizard.total_steps())
        );
        assert_eq!(app.wizard.active_step(), Some(WizardStep::Contact));
        assert_eq!(app.wizard.request().contact.email, "ana@example.com");
    }

    #[test]
    fn test_altgr_characters_reach_text_fields() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Quote, &rt);
        fill_quote(&mut app);
        press(&mut app, KeyCode::Up);
        app.wizard.request_mut().unwrap().contact.email = "ana".into();

        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        app.handle_key(KeyEvent::new(KeyCode::Char('@'), altgr));
        type_str(&mut app, "example.com");
        assert_eq!(app.wizard.request().contact.email, "ana@example.com");

        // Plain Ctrl+letter is still not text
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(app.wizard.request().contact.email, "ana@example.com");
    }

    #[test]
    fn test_progress_label_marks_passable_step() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Variant::Quote, &rt);
        assert_eq!(app.progress_label(), "Step 1/6");
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.progress_label(), "Step 1/6 ✓");
    }

    #[test]
    fn test_optional_return_placeholder() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let app = app_with(Variant::Quote, &rt);
        assert_eq!(app.return_placeholder(), "YYYY-MM-DD");

        let lenient = App::new(
            Wizard::new(Variant::Reservation, ReturnDatePolicy::Optional, today()),
            Translator::new(Language::En),
            Preferences::in_memory(Language::En),
            Arc::new(SimulatedBackend::new(Duration::ZERO)),
            rt.handle().clone(),
        );
        assert_eq!(lenient.return_placeholder(), "YYYY-MM-DD (optional)");
    }
}
