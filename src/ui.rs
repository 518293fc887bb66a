use xbrl_viewer::categories::Category;
use xbrl_viewer::metrics::Comparison;
use xbrl_viewer::search::apply_search;
use xbrl_viewer::view::{Container, FactsView, COLUMNS};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AllFacts,
    BalanceSheet,
    IncomeStatement,
    CashFlow,
    Metrics,
}

impl Page {
    pub const ORDER: [Page; 5] = [
        Page::AllFacts,
        Page::BalanceSheet,
        Page::IncomeStatement,
        Page::CashFlow,
        Page::Metrics,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::AllFacts => Page::BalanceSheet,
            Page::BalanceSheet => Page::IncomeStatement,
            Page::IncomeStatement => Page::CashFlow,
            Page::CashFlow => Page::Metrics,
            Page::Metrics => Page::AllFacts,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::AllFacts => Page::Metrics,
            Page::BalanceSheet => Page::AllFacts,
            Page::IncomeStatement => Page::BalanceSheet,
            Page::CashFlow => Page::IncomeStatement,
            Page::Metrics => Page::CashFlow,
        }
    }

    pub fn title(&self) -> &str {
        match self.category() {
            Some(category) => category.title(),
            None => "Metrics",
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Page::AllFacts => Some(Category::All),
            Page::BalanceSheet => Some(Category::BalanceSheet),
            Page::IncomeStatement => Some(Category::IncomeStatement),
            Page::CashFlow => Some(Category::CashFlow),
            Page::Metrics => None,
        }
    }
}

/// One line of the flattened fact list: a context heading or a fact row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Heading(usize),
    Fact(usize, usize),
}

impl Entry {
    fn group(&self) -> usize {
        match self {
            Entry::Heading(g) | Entry::Fact(g, _) => *g,
        }
    }
}

pub struct App {
    pub view: FactsView,
    pub comparisons: Vec<Comparison>,
    pub state: TableState,
    pub current_page: Page,
    pub query: String,
    pub search_mode: bool,
    pub last_sort: Option<usize>,
}

impl App {
    pub fn new(view: FactsView, comparisons: Vec<Comparison>) -> Self {
        let mut app = Self {
            view,
            comparisons,
            state: TableState::default(),
            current_page: Page::AllFacts,
            query: String::new(),
            search_mode: false,
            last_sort: None,
        };
        app.reset_selection();
        app
    }

    fn container(&self) -> Option<&Container> {
        self.current_page
            .category()
            .and_then(|category| self.view.container(category))
    }

    /// Visible headings and rows of the current page, in display order
    pub fn entries(&self) -> Vec<Entry> {
        let mut entries = Vec::new();
        if let Some(container) = self.container() {
            for (g, group) in container.groups.iter().enumerate() {
                if group.hidden {
                    continue;
                }
                entries.push(Entry::Heading(g));
                for (r, row) in group.table.rows.iter().enumerate() {
                    if !row.hidden {
                        entries.push(Entry::Fact(g, r));
                    }
                }
            }
        }
        entries
    }

    fn reset_selection(&mut self) {
        if self.entries().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn selected_entry(&self) -> Option<Entry> {
        self.state.selected().and_then(|i| self.entries().get(i).copied())
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
        apply_search(&mut self.view, &self.query);
        self.reset_selection();
    }

    pub fn clear_search(&mut self) {
        self.set_query(String::new());
    }

    /// Sort the table under the cursor by one column
    pub fn sort_selected(&mut self, column: usize) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let Some(category) = self.current_page.category() else {
            return;
        };
        if let Some(container) = self.view.container_mut(category) {
            if let Some(group) = container.groups.get_mut(entry.group()) {
                group.table.sort_by_column(column);
                self.last_sort = Some(column);
            }
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.last_sort = None;
        self.reset_selection();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.last_sort = None;
        self.reset_selection();
    }

    pub fn next(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map(|i| (i + 20).min(len - 1)).unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = self.state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        self.state.select(Some(i));
    }

    /// Apply one key press; returns true when the viewer should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.search_mode {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.search_mode = false,
                KeyCode::Backspace => {
                    let mut query = self.query.clone();
                    query.pop();
                    self.set_query(query);
                }
                KeyCode::Char(c) => {
                    let query = format!("{}{}", self.query, c);
                    self.set_query(query);
                }
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('/') => self.search_mode = true,
            KeyCode::Char('c') => self.clear_search(),
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Char(d @ '1'..='4') => {
                self.sort_selected(d as usize - '1' as usize);
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => self.reset_selection(),
            KeyCode::End => {
                let len = self.entries().len();
                if len > 0 {
                    self.state.select(Some(len - 1));
                }
            }
            _ => {}
        }
        false
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "Viewer terminated with an error");
        return Err(err.into());
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Shift+Tab arrives as Tab with SHIFT on some terminals
            let key = if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                KeyEvent::new(KeyCode::BackTab, key.modifiers)
            } else {
                key
            };
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_search(f, chunks[1], app);
    match app.current_page {
        Page::Metrics => render_metrics(f, chunks[2], app),
        _ => render_facts(f, chunks[2], app),
    }
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ORDER.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let label = match page.category().and_then(|c| app.view.container(c)) {
            Some(container) => format!("{} ({})", page.title(), container.row_count()),
            None => page.title().to_string(),
        };
        tab_spans.push(Span::styled(label, style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let (border, cursor) = if app.search_mode {
        (Color::Yellow, "▏")
    } else {
        (Color::White, "")
    };

    let search = Paragraph::new(Line::from(vec![
        Span::raw(app.query.clone()),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Search "),
    );

    f.render_widget(search, area);
}

fn render_facts(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = COLUMNS.iter().enumerate().map(|(i, h)| {
        let label = if app.last_sort == Some(i) {
            format!("{} ▲", h)
        } else {
            format!("{}", h)
        };
        Cell::from(label).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let container = app.container();
    let rows: Vec<Row> = app
        .entries()
        .into_iter()
        .filter_map(|entry| {
            let container = container?;
            Some(match entry {
                Entry::Heading(g) => Row::new(vec![Cell::from(container.groups[g].heading())])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Entry::Fact(g, r) => {
                    let cells = container.groups[g].table.rows[r]
                        .cells()
                        .iter()
                        .map(|c| Cell::from(truncate(c, 48)))
                        .collect::<Vec<_>>();
                    Row::new(cells)
                }
            })
        })
        .collect();

    let title = format!(" {} ", app.current_page.title());
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(13),
            Constraint::Percentage(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_metrics(f: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![Line::from("")];

    for comparison in &app.comparisons {
        content.push(Line::from(Span::styled(
            format!("  {}", comparison.title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        content.push(Line::from(""));
        for row in &comparison.rows {
            let color = if row.company >= row.sector {
                Color::Green
            } else {
                Color::Red
            };
            content.push(Line::from(vec![
                Span::raw(format!("  {:<20}", row.label)),
                Span::styled(format!("{:>14.4}", row.company), Style::default().fg(color)),
                Span::styled(
                    format!("   sector {:>12.4}", row.sector),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
        content.push(Line::from(""));
    }

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Metrics vs Sector Average "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.entries().len();

    let mut status_spans = vec![Span::styled(
        format!(" Line: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if !app.query.is_empty() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Search: {}", app.query),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    for (key, action) in [("/", " Search"), ("1-4", " Sort"), ("Tab", " Page"), ("↑/↓", " Nav")] {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(action));
    }
    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbrl_viewer::categories::CategoryRules;
    use xbrl_viewer::config::ElementIds;
    use xbrl_viewer::facts::Fact;

    fn app() -> App {
        let facts = vec![
            Fact::new("AssetsCurrent", "30", "FY2023"),
            Fact::new("Assets", "4", "FY2023"),
            Fact::new("Revenue", "500", "FY2022"),
        ];
        let view = FactsView::build(&facts, &CategoryRules::default(), &ElementIds::default());
        App::new(view, Vec::new())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_entries_include_headings() {
        let app = app();
        assert_eq!(
            app.entries(),
            vec![
                Entry::Heading(0),
                Entry::Fact(0, 0),
                Entry::Fact(0, 1),
                Entry::Heading(1),
                Entry::Fact(1, 0),
            ]
        );
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_search_mode_filters_live() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert!(app.search_mode);

        for c in "rev".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.query, "rev");
        assert_eq!(app.entries(), vec![Entry::Heading(1), Entry::Fact(1, 0)]);

        press(&mut app, KeyCode::Enter);
        assert!(!app.search_mode);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.entries().len(), 5);
    }

    #[test]
    fn test_quit_ignored_while_searching() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_sort_selected_table() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('2'));

        let all = app.view.container(Category::All).unwrap();
        assert_eq!(all.groups[0].table.column(1), vec!["4", "30"]);
        assert_eq!(app.last_sort, Some(1));
    }

    #[test]
    fn test_page_cycle() {
        let mut app = app();
        for _ in 0..5 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.current_page, Page::AllFacts);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_page, Page::Metrics);
        assert!(app.entries().is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.state.selected(), Some(4));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
