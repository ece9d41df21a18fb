use crate::entry_store::EntryStore;
use crate::journal_entry::{long_date, Emotion, EntryDraft, JournalEntry};
use crate::journal_state::Clock;
use crate::session::{Session, View};
use crate::song_search::SongSearch;
use crate::stats::EmotionStats;
use chrono::Local;
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::Duration,
};
use unicode_width::UnicodeWidthChar;

const TICK: Duration = Duration::from_millis(100);
const BAR_WIDTH: usize = 30;

/// Intents the UI hands back to the main loop.
pub enum Action {
    NewEntry,
    Select(String),
    Save,
    Delete(String),
    Cancel,
    SearchSongs,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Sidebar,
    Emotion,
    Keyword,
    Notes,
    Song,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Sidebar => Focus::Emotion,
            Focus::Emotion => Focus::Keyword,
            Focus::Keyword => Focus::Notes,
            Focus::Notes => Focus::Song,
            Focus::Song => Focus::Sidebar,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Sidebar => Focus::Song,
            Focus::Emotion => Focus::Sidebar,
            Focus::Keyword => Focus::Emotion,
            Focus::Notes => Focus::Keyword,
            Focus::Song => Focus::Notes,
        }
    }
}

enum Overlay {
    None,
    Stats,
    SongSearch { dialog: SongSearch, browsing: bool },
    EntrySearch { query: String, selected: usize },
    ConfirmDelete(String),
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    form: EntryDraft,
    focus: Focus,
    overlay: Overlay,
    status: Option<String>,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            form: EntryDraft::default(),
            focus: Focus::Keyword,
            overlay: Overlay::None,
            status: None,
        })
    }

    /// Reset the editor fields from `entry`, or to a blank draft.
    pub fn load_form(&mut self, entry: Option<&JournalEntry>) {
        self.form = entry.map(EntryDraft::from).unwrap_or_default();
    }

    pub fn form_draft(&self) -> EntryDraft {
        self.form.clone()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn song_search_mut(&mut self) -> Option<&mut SongSearch> {
        match &mut self.overlay {
            Overlay::SongSearch { dialog, .. } => Some(dialog),
            _ => None,
        }
    }

    /// Collect the result of an in-flight song lookup, if it has finished.
    pub fn tick(&mut self) {
        if let Some(dialog) = self.song_search_mut() {
            dialog.poll();
        }
    }

    pub fn display<S: EntryStore, C: Clock>(&mut self, session: &Session<S, C>) -> Result<()> {
        let UI {
            terminal,
            form,
            focus,
            overlay,
            status,
        } = self;

        terminal.draw(|f| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .split(f.area());

            let title = Paragraph::new("Zenith · your mood journal")
                .style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center);
            f.render_widget(title, rows[0]);

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Min(0)])
                .split(rows[1]);

            render_sidebar(f, columns[0], session, *focus == Focus::Sidebar);
            match session.current_view() {
                View::Welcome => render_welcome(f, columns[1]),
                View::Editor => render_editor(f, columns[1], session, form, *focus),
            }

            let status_line = Paragraph::new(status.clone().unwrap_or_default())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center);
            f.render_widget(status_line, rows[2]);

            let controls = Paragraph::new(controls_line(session))
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            f.render_widget(controls, rows[3]);

            match overlay {
                Overlay::None => {}
                Overlay::Stats => render_stats(f, &session.stats()),
                Overlay::SongSearch { dialog, browsing } => {
                    render_song_search(f, dialog, *browsing)
                }
                Overlay::EntrySearch { query, selected } => {
                    render_entry_search(f, &session.search(query), query, *selected)
                }
                Overlay::ConfirmDelete(id) => render_confirm_delete(f, id),
            }
        })?;

        Ok(())
    }

    /// Wait up to one tick for a key and translate it.
    pub fn handle_input<S: EntryStore, C: Clock>(
        &mut self,
        session: &Session<S, C>,
    ) -> Result<Option<Action>> {
        if !event::poll(TICK)? {
            return Ok(None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }

        self.status = None;
        if is_quit_key(&key) {
            return Ok(Some(Action::Quit));
        }
        if !matches!(self.overlay, Overlay::None) {
            return Ok(self.handle_overlay_key(key, session));
        }
        Ok(self.handle_main_key(key, session))
    }

    fn handle_main_key<S: EntryStore, C: Clock>(
        &mut self,
        key: KeyEvent,
        session: &Session<S, C>,
    ) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('n') => {
                    self.focus = Focus::Keyword;
                    Some(Action::NewEntry)
                }
                KeyCode::Char('s') if session.current_view() == View::Editor => Some(Action::Save),
                KeyCode::Char('d') => {
                    if let Some(entry) = session.active_entry() {
                        self.overlay = Overlay::ConfirmDelete(entry.id().to_string());
                    }
                    None
                }
                KeyCode::Char('t') if !session.entries().is_empty() => {
                    self.overlay = Overlay::Stats;
                    None
                }
                KeyCode::Char('f') => {
                    self.overlay = Overlay::EntrySearch {
                        query: String::new(),
                        selected: 0,
                    };
                    None
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return None;
            }
            KeyCode::Esc if session.current_view() == View::Editor => return Some(Action::Cancel),
            _ => {}
        }

        if session.current_view() == View::Welcome && self.focus != Focus::Sidebar {
            return match key.code {
                KeyCode::Enter => {
                    self.focus = Focus::Keyword;
                    Some(Action::NewEntry)
                }
                _ => None,
            };
        }

        match self.focus {
            Focus::Sidebar => sidebar_move(key.code, session).map(Action::Select),
            Focus::Emotion => {
                match key.code {
                    KeyCode::Left => self.form.emotion = self.form.emotion.previous(),
                    KeyCode::Right => self.form.emotion = self.form.emotion.next(),
                    _ => {}
                }
                None
            }
            Focus::Keyword => {
                edit_line(&mut self.form.keyword, key.code);
                None
            }
            Focus::Notes => {
                match key.code {
                    KeyCode::Enter => self.form.notes.push('\n'),
                    code => edit_line(&mut self.form.notes, code),
                }
                None
            }
            Focus::Song => {
                match key.code {
                    KeyCode::Enter => {
                        self.overlay = Overlay::SongSearch {
                            dialog: SongSearch::new(),
                            browsing: false,
                        };
                    }
                    KeyCode::Backspace | KeyCode::Delete => self.form.song = None,
                    _ => {}
                }
                None
            }
        }
    }

    fn handle_overlay_key<S: EntryStore, C: Clock>(
        &mut self,
        key: KeyEvent,
        session: &Session<S, C>,
    ) -> Option<Action> {
        match &mut self.overlay {
            Overlay::None => None,
            Overlay::Stats => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.overlay = Overlay::None;
                }
                None
            }
            Overlay::ConfirmDelete(id) => {
                let action = match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Delete(id.clone())),
                    _ => None,
                };
                self.overlay = Overlay::None;
                action
            }
            Overlay::EntrySearch { query, selected } => match key.code {
                KeyCode::Esc => {
                    self.overlay = Overlay::None;
                    None
                }
                KeyCode::Up => {
                    *selected = selected.saturating_sub(1);
                    None
                }
                KeyCode::Down => {
                    if *selected + 1 < session.search(query).len() {
                        *selected += 1;
                    }
                    None
                }
                KeyCode::Enter => {
                    let picked = session
                        .search(query)
                        .get(*selected)
                        .map(|e| e.id().to_string());
                    if picked.is_some() {
                        self.overlay = Overlay::None;
                    }
                    picked.map(Action::Select)
                }
                code => {
                    edit_line(query, code);
                    *selected = 0;
                    None
                }
            },
            Overlay::SongSearch { dialog, browsing } => match key.code {
                KeyCode::Esc => {
                    // Dropping the dialog discards any lookup still in flight.
                    self.overlay = Overlay::None;
                    None
                }
                KeyCode::Down if !dialog.results().is_empty() => {
                    if *browsing {
                        dialog.select_next();
                    } else {
                        *browsing = true;
                        dialog.selected = 0;
                    }
                    None
                }
                KeyCode::Up if *browsing => {
                    if dialog.selected == 0 {
                        *browsing = false;
                    } else {
                        dialog.select_previous();
                    }
                    None
                }
                KeyCode::Enter if *browsing => {
                    if let Some(song) = dialog.choose(dialog.selected) {
                        self.form.song = Some(song);
                        self.overlay = Overlay::None;
                    }
                    None
                }
                KeyCode::Enter if !dialog.is_loading() => Some(Action::SearchSongs),
                code => {
                    if !dialog.is_loading() {
                        edit_line(&mut dialog.query, code);
                        *browsing = false;
                    }
                    None
                }
            },
        }
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

fn edit_line(text: &mut String, code: KeyCode) {
    match code {
        KeyCode::Char(c) => text.push(c),
        KeyCode::Backspace => {
            text.pop();
        }
        _ => {}
    }
}

/// Ctrl+Q, or Ctrl+C since raw mode keeps it from raising SIGINT.
fn is_quit_key(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
}

/// The id to open when moving through the sidebar from the active entry.
fn sidebar_move<S: EntryStore, C: Clock>(code: KeyCode, session: &Session<S, C>) -> Option<String> {
    let entries = session.entries();
    if entries.is_empty() {
        return None;
    }
    let current = session
        .active_entry()
        .and_then(|active| entries.iter().position(|e| e.id() == active.id()));

    let target = match (code, current) {
        (KeyCode::Down, Some(i)) => (i + 1).min(entries.len() - 1),
        (KeyCode::Up, Some(i)) => i.saturating_sub(1),
        (KeyCode::Down | KeyCode::Up | KeyCode::Enter, None) => 0,
        (KeyCode::Home, _) => 0,
        (KeyCode::End, _) => entries.len() - 1,
        _ => return None,
    };
    Some(entries[target].id().to_string())
}

/// Cut `text` to at most `max_width` terminal columns.
fn truncate(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            out.push('…');
            break;
        }
        width += w;
        out.push(c);
    }
    out
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn controls_line<S: EntryStore, C: Clock>(session: &Session<S, C>) -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
    let mut spans = vec![key("^N"), Span::raw(" new  ")];
    if session.current_view() == View::Editor {
        spans.extend([key("^S"), Span::raw(" save  "), key("Esc"), Span::raw(" cancel  ")]);
    }
    if session.active_entry().is_some() {
        spans.extend([key("^D"), Span::raw(" delete  ")]);
    }
    if !session.entries().is_empty() {
        spans.extend([key("^T"), Span::raw(" stats  ")]);
    }
    spans.extend([
        key("^F"),
        Span::raw(" search  "),
        key("Tab"),
        Span::raw(" focus  "),
        key("^Q"),
        Span::raw(" quit"),
    ]);
    Line::from(spans)
}

fn render_sidebar<S: EntryStore, C: Clock>(
    f: &mut Frame,
    area: Rect,
    session: &Session<S, C>,
    focused: bool,
) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = session
        .entries()
        .iter()
        .map(|entry| {
            let notes = entry
                .notes()
                .lines()
                .next()
                .filter(|l| !l.is_empty())
                .unwrap_or("No additional notes.");
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(format!("{} ", entry.emotion().symbol())),
                    Span::styled(
                        entry.date().format("%a %-d %b %Y").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    truncate(entry.keyword(), width),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::raw(truncate(notes, width))),
            ])
        })
        .collect();

    let selected = session
        .active_entry()
        .and_then(|active| session.entries().iter().position(|e| e.id() == active.id()));

    let list = List::new(items)
        .block(focused_block("Entries", focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut ListState::default().with_selected(selected));
}

fn render_welcome(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to Zenith",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Your personal journal for moods and moments."),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to write your first entry."),
        ]),
    ];
    let welcome = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(welcome, area);
}

fn render_editor<S: EntryStore, C: Clock>(
    f: &mut Frame,
    area: Rect,
    session: &Session<S, C>,
    form: &EntryDraft,
    focus: Focus,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    let heading = if session.is_drafting() {
        format!("{} (new)", long_date(Local::now().date_naive()))
    } else {
        session
            .active_entry()
            .map(JournalEntry::heading)
            .unwrap_or_default()
    };
    let title = Paragraph::new(heading)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let mut moods: Vec<Span> = Vec::new();
    for emotion in Emotion::ALL {
        let style = if emotion == form.emotion {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        moods.push(Span::styled(format!(" {} ", emotion.symbol()), style));
    }
    moods.push(Span::raw(format!("  {}", form.emotion.label())));
    let emotion = Paragraph::new(Line::from(moods)).block(focused_block(
        "How do you feel today? (←/→)",
        focus == Focus::Emotion,
    ));
    f.render_widget(emotion, chunks[1]);

    let keyword = Paragraph::new(with_cursor(&form.keyword, focus == Focus::Keyword)).block(
        focused_block("A keyword for today", focus == Focus::Keyword),
    );
    f.render_widget(keyword, chunks[2]);

    let notes = Paragraph::new(with_cursor(&form.notes, focus == Focus::Notes))
        .wrap(Wrap { trim: false })
        .block(focused_block("Notes", focus == Focus::Notes));
    f.render_widget(notes, chunks[3]);

    let song_lines = match &form.song {
        Some(song) => vec![
            Line::from(Span::styled(
                song.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                song.watch_url(),
                Style::default().fg(Color::Blue),
            )),
        ],
        None => vec![Line::from("No song yet. Press Enter to search for one.")],
    };
    let song = Paragraph::new(song_lines)
        .block(focused_block("Song of the day", focus == Focus::Song));
    f.render_widget(song, chunks[4]);
}

fn with_cursor(text: &str, focused: bool) -> String {
    if focused {
        format!("{text}|")
    } else {
        text.to_string()
    }
}

/// A rectangle of the given percentages centred in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn render_stats(f: &mut Frame, stats: &EmotionStats) {
    let area = centered_rect(60, 70, f.area());
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Mood summary ({} entries)", stats.total),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for row in &stats.rows {
        let filled = (row.ratio_of_max * BAR_WIDTH as f64).round() as usize;
        let times = if row.count == 1 { "time" } else { "times" };
        lines.push(Line::from(vec![
            Span::raw(format!("{} {:<12}", row.emotion.symbol(), row.emotion.label())),
            Span::styled("█".repeat(filled), Style::default().fg(Color::Blue)),
            Span::styled(
                "░".repeat(BAR_WIDTH - filled),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(format!(
                " {} {} ({:.0}%)",
                row.count, times, row.percent_of_total
            )),
        ]));
    }

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Journal statistics (Esc to close)"),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_song_search(f: &mut Frame, dialog: &SongSearch, browsing: bool) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let input_title = if dialog.is_loading() {
        "Searching..."
    } else {
        "Artist, song..."
    };
    let input = Paragraph::new(with_cursor(&dialog.query, !browsing))
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input, chunks[0]);

    let block = Block::default().borders(Borders::ALL).title("Find a song");
    if let Some(error) = dialog.error() {
        let message = Paragraph::new(error.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(message, chunks[1]);
    } else if dialog.found_nothing() {
        let message = Paragraph::new("No results. Try another search.")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(message, chunks[1]);
    } else {
        let items: Vec<ListItem> = dialog
            .results()
            .iter()
            .map(|r| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        r.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        r.channel.clone(),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let selected = browsing.then_some(dialog.selected);
        f.render_stateful_widget(list, chunks[1], &mut ListState::default().with_selected(selected));
    }

    let help = Paragraph::new("Enter: search/choose, Down: browse results, Esc: close")
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}

fn render_entry_search(f: &mut Frame, results: &[&JournalEntry], query: &str, selected: usize) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let input = Paragraph::new(with_cursor(query, true))
        .block(Block::default().borders(Borders::ALL).title("Search Entries"));
    f.render_widget(input, chunks[0]);

    let items: Vec<ListItem> = results
        .iter()
        .map(|e| {
            ListItem::new(Line::from(Span::raw(format!(
                "[{}] {} {}",
                e.id(),
                e.emotion().symbol(),
                e.keyword()
            ))))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Results"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let selected = (!results.is_empty()).then_some(selected);
    f.render_stateful_widget(list, chunks[1], &mut ListState::default().with_selected(selected));

    let help = Paragraph::new("Up/Down: Navigate, Enter: Open, Esc: Cancel")
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}

fn render_confirm_delete(f: &mut Frame, id: &str) {
    let area = centered_rect(40, 20, f.area());
    let prompt = Paragraph::new(vec![
        Line::from(format!("Delete the entry for {id}?")),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to delete, any other key to keep it"),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Delete entry"));
    f.render_widget(Clear, area);
    f.render_widget(prompt, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_store::MemoryStore;
    use crate::journal_entry::{parse_day_id, Emotion};
    use crate::journal_state::{FixedClock, JournalState};

    fn session(days: &[&str]) -> Session<MemoryStore, FixedClock> {
        let entries = days
            .iter()
            .map(|d| {
                JournalEntry::new(
                    parse_day_id(d).unwrap(),
                    EntryDraft::new(Emotion::Normal, "k", ""),
                )
                .unwrap()
            })
            .collect();
        Session::new(JournalState::open(
            MemoryStore::with_entries(entries),
            FixedClock::at("2024-06-01"),
        ))
    }

    #[test]
    fn truncate_respects_wide_characters() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello…");
        assert_eq!(truncate("😄😄😄", 4), "😄😄…");
    }

    #[test]
    fn sidebar_moves_through_entries() {
        let mut s = session(&["2024-05-01", "2024-05-02", "2024-05-03"]);
        assert_eq!(
            sidebar_move(KeyCode::Down, &s).as_deref(),
            Some("2024-05-02")
        );
        assert_eq!(sidebar_move(KeyCode::Up, &s).as_deref(), Some("2024-05-03"));

        s.select_entry("2024-05-01");
        assert_eq!(
            sidebar_move(KeyCode::Down, &s).as_deref(),
            Some("2024-05-01")
        );

        s.start_new_entry();
        assert_eq!(
            sidebar_move(KeyCode::Enter, &s).as_deref(),
            Some("2024-05-03")
        );
        assert_eq!(sidebar_move(KeyCode::Char('x'), &s), None);
    }

    #[test]
    fn focus_cycles_both_ways() {
        let mut focus = Focus::Sidebar;
        for _ in 0..5 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Sidebar);
        assert_eq!(Focus::Sidebar.previous(), Focus::Song);
    }

    #[test]
    fn ctrl_c_and_ctrl_q_quit() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert!(is_quit_key(&ctrl('c')));
        assert!(is_quit_key(&ctrl('q')));
        assert!(!is_quit_key(&ctrl('s')));
        assert!(!is_quit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }
}
