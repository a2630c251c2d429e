//! History drawer TUI
//!
//! Full-screen browser over saved analyses:
//! - Browse entries newest first, with title, time and tags
//! - Inspect the selected entry's input text and result
//! - Filter by text or tag
//! - Mark entries for deletion
//! - Press Enter to restore the selected entry

use crate::error::Result;
use crate::history::HistoryEntry;
use crate::search::HistoryQuery;
use crate::types::EntryId;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use serde_json::Value;
use std::io;

/// What the user decided in the browser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseOutcome {
    /// Entry to restore into the active view
    pub restore: Option<EntryId>,
    /// Entries marked for deletion
    pub delete: Vec<EntryId>,
}

/// Browser UI state
pub struct HistoryBrowser {
    entries: Vec<HistoryEntry<Value>>,
    to_delete: Vec<usize>,
    selected: usize,
    list_state: ListState,
    filter: String,
    /// Whether keystrokes currently edit the filter
    filtering: bool,
    filtered_indices: Vec<usize>,
    running: bool,
    show_help: bool,
    restore: Option<usize>,
}

impl HistoryBrowser {
    pub fn new(entries: Vec<HistoryEntry<Value>>) -> Self {
        let filtered_indices: Vec<usize> = (0..entries.len()).collect();
        let mut ui = Self {
            entries,
            to_delete: Vec::new(),
            selected: 0,
            list_state: ListState::default(),
            filter: String::new(),
            filtering: false,
            filtered_indices,
            running: true,
            show_help: false,
            restore: None,
        };
        ui.list_state.select(Some(0));
        ui
    }

    fn update_filter(&mut self, filter: String) {
        self.filter = filter;
        let query = HistoryQuery::new().with_term(self.filter.clone());
        self.filtered_indices = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| query.matches(e))
            .map(|(i, _)| i)
            .collect();
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    fn select_previous(&mut self) {
        if !self.filtered_indices.is_empty() {
            self.selected = self.selected.saturating_sub(1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn select_next(&mut self) {
        if !self.filtered_indices.is_empty() {
            self.selected = (self.selected + 1).min(self.filtered_indices.len() - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn toggle_delete_current(&mut self) {
        if let Some(&idx) = self.filtered_indices.get(self.selected) {
            if let Some(pos) = self.to_delete.iter().position(|&i| i == idx) {
                self.to_delete.remove(pos);
            } else {
                self.to_delete.push(idx);
            }
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.filtering = false,
            KeyCode::Backspace => {
                let mut filter = self.filter.clone();
                filter.pop();
                self.update_filter(filter);
            }
            KeyCode::Char(c) => {
                let mut filter = self.filter.clone();
                filter.push(c);
                self.update_filter(filter);
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.to_delete.clear();
            self.restore = None;
            self.running = false;
            return;
        }

        if self.filtering {
            self.handle_filter_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.toggle_delete_current();
            }
            KeyCode::Char('/') => {
                self.filtering = true;
            }
            KeyCode::Backspace => {
                self.update_filter(String::new());
            }
            KeyCode::Enter => {
                self.restore = self.filtered_indices.get(self.selected).copied();
                self.running = false;
            }
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),      // Header
                Constraint::Percentage(45), // List
                Constraint::Min(8),         // Details or help
            ])
            .split(frame.area());

        let title = if self.filtering || !self.filter.is_empty() {
            format!(
                "Analysis History - Filter: {}{} ({} matches)",
                self.filter,
                if self.filtering { "_" } else { "" },
                self.filtered_indices.len()
            )
        } else {
            format!(
                "Analysis History ({} entries, {} marked for deletion)",
                self.entries.len(),
                self.to_delete.len()
            )
        };
        let header = Paragraph::new(title)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = self
            .filtered_indices
            .iter()
            .map(|&idx| {
                let entry = &self.entries[idx];
                let timestamp = entry.created_at.format("%Y-%m-%d %H:%M");
                let marked = if self.to_delete.contains(&idx) { "[DEL] " } else { "" };
                let tags = if entry.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", entry.tags.join(", "))
                };

                let line = Line::from(vec![
                    Span::styled(marked, Style::default().fg(Color::Red)),
                    Span::styled(format!("{} ", timestamp), Style::default().fg(Color::DarkGray)),
                    Span::styled(entry.title.as_str(), Style::default().fg(Color::White)),
                    Span::styled(tags, Style::default().fg(Color::Magenta)),
                ]);
                ListItem::new(line)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Analyses"))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        if self.show_help {
            let help_text = [
                "Keybindings:",
                "",
                "  ↑/k       - Move up",
                "  ↓/j       - Move down",
                "  d/Delete  - Mark/unmark for deletion",
                "  /         - Edit filter (Enter/Esc to stop)",
                "  Backspace - Clear filter",
                "  Enter     - Restore selected analysis and exit",
                "  ?/F1      - Toggle help",
                "  q/Esc     - Exit, applying marked deletions",
                "  Ctrl+C    - Exit without changes",
            ];
            let help = Paragraph::new(help_text.join("\n"))
                .block(Block::default().borders(Borders::ALL).title("Help"))
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: false });
            frame.render_widget(help, chunks[2]);
        } else if let Some(entry) = self
            .filtered_indices
            .get(self.selected)
            .and_then(|&idx| self.entries.get(idx))
        {
            let result = serde_json::to_string_pretty(&entry.analysis_result)
                .unwrap_or_else(|_| entry.analysis_result.to_string());
            let details = format!(
                "Id: {}\nSaved: {}\nTags: {}\n\n{}\n\nResult:\n{}",
                entry.id,
                entry.created_at.format("%Y-%m-%d %H:%M:%S"),
                entry.tags.join(", "),
                entry.input_text,
                result
            );
            let details_widget = Paragraph::new(details)
                .block(Block::default().borders(Borders::ALL).title("Details"))
                .style(Style::default().fg(Color::Green))
                .wrap(Wrap { trim: false });
            frame.render_widget(details_widget, chunks[2]);
        }
    }

    /// Decisions taken so far
    pub fn outcome(&self) -> BrowseOutcome {
        BrowseOutcome {
            restore: self.restore.map(|idx| self.entries[idx].id.clone()),
            delete: self
                .to_delete
                .iter()
                .map(|&idx| self.entries[idx].id.clone())
                .collect(),
        }
    }
}

/// Run the history browser and return what the user chose
pub fn run_history_browser(entries: Vec<HistoryEntry<Value>>) -> Result<BrowseOutcome> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui = HistoryBrowser::new(entries);

    let result = (|| -> Result<()> {
        while ui.is_running() {
            terminal.draw(|f| ui.render(f))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    ui.handle_key(key);
                }
            }
        }
        Ok(())
    })();

    // Always restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(ui.outcome())
}
