// ============================================
// src/tui.rs
// Form and result screens, key handling, run loop
// ============================================

use std::path::Path;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, error};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::activity::{ActivityType, SUBJECT_AREAS};
use crate::error::Result;
use crate::form::Field;
use crate::generator::{Completion, Dispatcher};
use crate::print::write_sheet;
use crate::session::{Session, Ticket};

const HEADER: &str = "Connect Activity Generator";
const TAGLINE: &str = "Create engaging classroom starter activities in seconds";

// --------------------------------------------------
// App state
// --------------------------------------------------

/// What the run loop must do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Generate(Ticket),
    Cancel,
    Print,
    Quit,
}

pub struct App {
    pub session: Session,
    focus: Field,
    /// 0 is "Select a subject area", then one past each entry of SUBJECT_AREAS.
    subject_index: usize,
    /// One-line feedback such as where a sheet was printed.
    status: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            focus: Field::YearLevel,
            subject_index: 0,
            status: None,
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Key handling
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        if self.session.activity().is_some() {
            self.handle_result_key(key)
        } else {
            self.handle_form_key(key)
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('r') if ctrl => {
                self.reset();
                Action::Cancel
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.previous();
                Action::None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Left if self.focus == Field::SubjectArea => {
                self.cycle_subject(false);
                Action::None
            }
            KeyCode::Right if self.focus == Field::SubjectArea => {
                self.cycle_subject(true);
                Action::None
            }
            KeyCode::Backspace if self.focus != Field::SubjectArea => {
                self.session.form.pop_char(self.focus);
                Action::None
            }
            KeyCode::Char(c) if !ctrl && self.focus != Field::SubjectArea => {
                self.session.form.push_char(self.focus, c);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_result_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.reset();
                Action::Cancel
            }
            KeyCode::Char('p') | KeyCode::Char('P') => Action::Print,
            KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        }
    }

    /// Submit is disabled while a generation is pending.
    fn submit(&mut self) -> Action {
        if self.session.is_busy() {
            return Action::None;
        }
        self.status = None;
        match self.session.begin() {
            Ok(ticket) => Action::Generate(ticket),
            Err(_) => Action::None,
        }
    }

    fn cycle_subject(&mut self, forward: bool) {
        let count = SUBJECT_AREAS.len() + 1;
        self.subject_index = if forward {
            (self.subject_index + 1) % count
        } else {
            (self.subject_index + count - 1) % count
        };
        let value = match self.subject_index {
            0 => "",
            i => SUBJECT_AREAS[i - 1],
        };
        self.session.form.set(Field::SubjectArea, value);
    }

    fn reset(&mut self) {
        self.session.reset();
        self.focus = Field::YearLevel;
        self.subject_index = 0;
        self.status = None;
    }

    pub fn apply(&mut self, completion: Completion) {
        match completion.outcome {
            Ok(activity) => {
                self.session.complete(completion.epoch, activity);
            }
            Err(err) => {
                self.session.fail(completion.epoch, &err);
            }
        }
    }

    /// Writes the current activity as a printable sheet.
    pub fn print(&mut self, dir: &Path) {
        let (Some(activity), Some(input)) =
            (self.session.activity(), self.session.generated_from())
        else {
            return;
        };
        self.status = Some(
            match write_sheet(dir, activity, input, Local::now()) {
                Ok(path) => format!("Printable sheet saved to {}", path.display()),
                Err(err) => {
                    error!("print failed: {err}");
                    format!("Print failed: {err}")
                }
            },
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// --------------------------------------------------
// Run loop
// --------------------------------------------------

pub fn run_app(
    terminal: &mut Terminal<impl Backend>,
    dispatcher: &mut Dispatcher,
    print_dir: &Path,
) -> Result<()> {
    let mut app = App::new();

    loop {
        while let Some(completion) = dispatcher.try_next() {
            app.apply(completion);
        }

        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                match app.handle_key(key) {
                    Action::None => {}
                    Action::Generate(ticket) => {
                        let activity_type = ActivityType::draw(&mut rand::rng());
                        dispatcher.start(ticket, activity_type);
                    }
                    Action::Cancel => dispatcher.cancel(),
                    Action::Print => app.print(print_dir),
                    Action::Quit => break,
                }
            }
        }
    }

    debug!("leaving run loop");
    Ok(())
}

// --------------------------------------------------
// UI drawing
// --------------------------------------------------

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();
    let block = Block::default().borders(Borders::ALL).title(HEADER);
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    match app.session.activity() {
        Some(_) => draw_result(f, app, inner_area),
        None => draw_form(f, app, inner_area),
    }
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] tagline
            Constraint::Length(1), // [1] blank
            Constraint::Length(3), // [2] year level
            Constraint::Length(3), // [3] subject area
            Constraint::Length(3), // [4] unit topic
            Constraint::Length(1), // [5] error
            Constraint::Length(3), // [6] button
            Constraint::Min(1),    // [7] key help
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(TAGLINE)
            .style(Style::default().fg(Color::Gray))
            .centered(),
        chunks[0],
    );

    for (field, chunk) in Field::ALL.into_iter().zip([chunks[2], chunks[3], chunks[4]]) {
        draw_input(f, app, field, chunk);
    }

    if let Some(message) = app.session.error() {
        f.render_widget(
            Paragraph::new(message).style(Style::default().fg(Color::Red)),
            chunks[5],
        );
    }

    let (label, style) = if app.session.is_busy() {
        (
            "Generating...",
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )
    } else {
        (
            "Generate Connect Activity",
            Style::default().fg(Color::White).bg(Color::Blue).bold(),
        )
    };
    f.render_widget(
        Paragraph::new(label)
            .style(style)
            .block(Block::default().borders(Borders::ALL))
            .centered(),
        chunks[6],
    );

    f.render_widget(
        Paragraph::new("tab: next field  ←/→: subject  enter: generate  ctrl-r: clear  esc: quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[7],
    );
}

fn draw_input(f: &mut Frame, app: &App, field: Field, area: Rect) {
    let border = if app.focus() == field {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let value = app.session.form.get(field);

    let mut spans = Vec::new();
    if field == Field::SubjectArea {
        spans.push(Span::styled("◀ ", Style::default().fg(Color::DarkGray)));
    }
    if value.is_empty() {
        spans.push(Span::styled(
            field.placeholder(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(value));
    }
    if field == Field::SubjectArea {
        spans.push(Span::styled(" ▶", Style::default().fg(Color::DarkGray)));
    } else if app.focus() == field {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(field.label()),
        ),
        area,
    );
}

fn draw_result(f: &mut Frame, app: &App, area: Rect) {
    let Some(activity) = app.session.activity() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // [0] title
            Constraint::Length(5), // [1] prompt
            Constraint::Min(6),    // [2] questions
            Constraint::Length(1), // [3] status
            Constraint::Length(1), // [4] key help
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(activity.title.as_str())
            .style(Style::default().fg(Color::Magenta).bold()),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(activity.prompt.as_str())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Activity Prompt")),
        chunks[1],
    );

    let lines: Vec<Line> = activity
        .questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::Yellow)),
                Span::raw(question.as_str()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Discussion Questions")),
        chunks[2],
    );

    if let Some(status) = app.status() {
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Green)),
            chunks[3],
        );
    }

    f.render_widget(
        Paragraph::new("n: create new  p: print  esc: quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::compose;
    use crate::error::MISSING_FIELDS_MESSAGE;
    use crate::form::FormInput;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    /// Fills the form through key presses, subject chosen by index.
    fn fill(app: &mut App, year: &str, subject_steps: usize, topic: &str) {
        type_text(app, year);
        app.handle_key(press(KeyCode::Tab));
        for _ in 0..subject_steps {
            app.handle_key(press(KeyCode::Right));
        }
        app.handle_key(press(KeyCode::Tab));
        type_text(app, topic);
    }

    fn generate(app: &mut App, activity_type: ActivityType) {
        let ticket = match app.handle_key(press(KeyCode::Enter)) {
            Action::Generate(ticket) => ticket,
            other => panic!("expected Generate, got {other:?}"),
        };
        let activity = compose(&ticket.input, activity_type);
        app.apply(Completion {
            epoch: ticket.epoch,
            outcome: Ok(activity),
        });
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut app = App::new();
        fill(&mut app, "Year 8", 1, "Fractions");
        assert_eq!(
            app.session.form,
            FormInput::new("Year 8", "Mathematics", "Fractions")
        );
        assert_eq!(app.focus(), Field::UnitTopic);

        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.session.form.unit_topic, "Fraction");
    }

    #[test]
    fn subject_selector_wraps_around() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Tab));
        app.handle_key(press(KeyCode::Left));
        assert_eq!(app.session.form.subject_area, "Music");
        app.handle_key(press(KeyCode::Right));
        assert_eq!(app.session.form.subject_area, "");
        app.handle_key(press(KeyCode::Right));
        app.handle_key(press(KeyCode::Right));
        assert_eq!(app.session.form.subject_area, "Science");
    }

    #[test]
    fn letters_do_not_edit_the_selector() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "Maths");
        assert_eq!(app.session.form.subject_area, "");
    }

    #[test]
    fn empty_form_shows_inline_error() {
        let mut app = App::new();
        assert_eq!(app.handle_key(press(KeyCode::Enter)), Action::None);
        assert_eq!(app.session.error(), Some(MISSING_FIELDS_MESSAGE));
        assert!(screen(&app).contains(MISSING_FIELDS_MESSAGE));
    }

    #[test]
    fn button_is_disabled_while_generating() {
        let mut app = App::new();
        fill(&mut app, "Year 8", 2, "Cells");
        assert!(matches!(app.handle_key(press(KeyCode::Enter)), Action::Generate(_)));
        assert!(screen(&app).contains("Generating..."));
        assert_eq!(app.handle_key(press(KeyCode::Enter)), Action::None);
    }

    #[test]
    fn result_screen_lists_the_questions() {
        let mut app = App::new();
        fill(&mut app, "Year 8", 1, "Fractions");
        generate(&mut app, ActivityType::OddOneOut);

        let text = screen(&app);
        assert!(text.contains("Odd One Out - Which of these doesn't belong?"));
        assert!(text.contains("1. Which item do you think is the odd one out and why?"));
        assert!(text.contains("Discussion Questions"));
    }

    #[test]
    fn create_new_resets_everything() {
        let mut app = App::new();
        fill(&mut app, "Year 8", 1, "Fractions");
        generate(&mut app, ActivityType::MysteryVisual);

        assert_eq!(app.handle_key(press(KeyCode::Char('n'))), Action::Cancel);
        assert!(app.session.activity().is_none());
        assert_eq!(app.session.form, FormInput::default());
        assert_eq!(app.focus(), Field::YearLevel);
        assert!(screen(&app).contains("Generate Connect Activity"));
    }

    #[test]
    fn clear_while_generating_drops_the_late_result() {
        let mut app = App::new();
        fill(&mut app, "Year 8", 1, "Fractions");
        let ticket = match app.handle_key(press(KeyCode::Enter)) {
            Action::Generate(ticket) => ticket,
            other => panic!("expected Generate, got {other:?}"),
        };

        let clear = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(clear), Action::Cancel);

        let late = compose(&ticket.input, ActivityType::OddOneOut);
        app.apply(Completion {
            epoch: ticket.epoch,
            outcome: Ok(late),
        });
        assert!(app.session.activity().is_none());
        assert!(!app.session.is_busy());
    }

    #[test]
    fn print_writes_sheet_and_reports_path() {
        let mut app = App::new();
        fill(&mut app, "Year 8", 1, "Fractions");
        generate(&mut app, ActivityType::OddOneOut);

        let dir = TempDir::new().unwrap();
        assert_eq!(app.handle_key(press(KeyCode::Char('p'))), Action::Print);
        app.print(dir.path());

        let status = app.status().unwrap();
        assert!(status.starts_with("Printable sheet saved to"));
        let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn print_uses_the_submitted_topic() {
        let mut app = App::new();
        fill(&mut app, "Year 8", 1, "Fractions");
        let ticket = match app.handle_key(press(KeyCode::Enter)) {
            Action::Generate(ticket) => ticket,
            other => panic!("expected Generate, got {other:?}"),
        };
        // Still typing into the topic while the service works.
        type_text(&mut app, " and Decimals");
        let activity = compose(&ticket.input, ActivityType::WhatIf);
        app.apply(Completion {
            epoch: ticket.epoch,
            outcome: Ok(activity),
        });

        let dir = TempDir::new().unwrap();
        app.print(dir.path());
        let entry = std::fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let sheet = std::fs::read_to_string(entry.path()).unwrap();
        assert!(sheet.contains("Unit Topic:   Fractions\n"));
        assert!(!sheet.contains("Decimals"));
    }

    #[test]
    fn escape_quits_from_both_screens() {
        let mut app = App::new();
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Action::Quit);
        fill(&mut app, "Year 8", 1, "Fractions");
        generate(&mut app, ActivityType::WhatIf);
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Action::Quit);
    }
}
