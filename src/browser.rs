use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tokio::runtime::Handle;

use crate::cli::detail::EmployeeDetail;
use crate::client::ApiClient;
use crate::fmt::money_decimal;
use crate::loader::EmployeeLoader;
use crate::tui::{
    self, View, ViewAction, ACCENT_STYLE, ACTIVE_STYLE, ERROR_STYLE, FOOTER_STYLE, HEADER_STYLE,
    INACTIVE_STYLE, SELECTED_STYLE,
};

const PAGE_SIZE: usize = 20;

/// Scroll position over a list that grows as pages arrive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Viewport {
    pub offset: usize,
    pub selected: usize,
    pub visible: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: 0,
            selected: 0,
            visible: PAGE_SIZE,
        }
    }
}

impl Viewport {
    /// Index of the highlighted row in the full list.
    pub fn cursor(&self) -> usize {
        self.offset + self.selected
    }

    pub fn down(&mut self, len: usize) {
        if self.cursor() + 1 >= len {
            return;
        }
        if self.selected + 1 < self.visible {
            self.selected += 1;
        } else {
            self.offset += 1;
        }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else if self.offset > 0 {
            self.offset -= 1;
        }
    }

    pub fn page_down(&mut self, len: usize) {
        let next = self.offset + self.visible;
        if next < len {
            self.offset = next;
            self.selected = 0;
        } else if len > 0 {
            self.selected = (len - 1 - self.offset).min(self.visible.saturating_sub(1));
        }
    }

    pub fn page_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.visible);
        self.selected = 0;
    }

    /// Keep the cursor inside the list after it shrinks or the window resizes.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            *self = Self {
                visible: self.visible,
                ..Self::default()
            };
            return;
        }
        self.offset = self.offset.min(len - 1);
        self.selected = self
            .selected
            .min(len - 1 - self.offset)
            .min(self.visible.saturating_sub(1));
    }

    /// True once fewer than a fifth of a screen's worth of rows remain below
    /// the viewport.
    pub fn needs_more(&self, len: usize) -> bool {
        let below = len.saturating_sub(self.offset + self.visible);
        below * 5 <= self.visible
    }
}

enum BrowseMode {
    Normal,
    EditUrl(String),
}

/// Scrolling employee list. New pages are requested as the viewport nears the
/// end of what has been loaded.
pub struct EmployeeBrowser {
    loader: Arc<EmployeeLoader>,
    client: ApiClient,
    handle: Handle,
    view: Viewport,
    mode: BrowseMode,
    status_message: Option<String>,
    table_state: TableState,
}

impl EmployeeBrowser {
    pub fn new(loader: Arc<EmployeeLoader>, client: ApiClient, handle: Handle) -> Self {
        Self {
            loader,
            client,
            handle,
            view: Viewport::default(),
            mode: BrowseMode::Normal,
            status_message: None,
            table_state: TableState::default(),
        }
    }

    fn spawn_load_more(&self) {
        let loader = Arc::clone(&self.loader);
        self.handle.spawn(async move { loader.load_more().await });
    }

    fn submit_url(&mut self, input: &str) {
        match self.client.config().set_base_url(input) {
            Ok(()) => {
                self.status_message = Some(format!("API URL set to {}", self.client.config().base_url()));
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> ViewAction {
        let len = self.loader.len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Quit,
            KeyCode::Down | KeyCode::Char('j') => self.view.down(len),
            KeyCode::Up | KeyCode::Char('k') => self.view.up(),
            KeyCode::PageDown | KeyCode::Char('n') => self.view.page_down(len),
            KeyCode::PageUp | KeyCode::Char('p') => self.view.page_up(),
            KeyCode::Home => self.view = Viewport { visible: self.view.visible, ..Viewport::default() },
            KeyCode::Char('r') => {
                self.loader.reset();
                self.view.clamp(0);
                self.spawn_load_more();
            }
            KeyCode::Char('c') => {
                self.mode = BrowseMode::EditUrl(self.client.config().base_url());
            }
            KeyCode::Enter => {
                let cursor = self.view.cursor();
                let selected = self.loader.with_items(|items| items.get(cursor).cloned());
                if let Some(employee) = selected {
                    return ViewAction::Open(Box::new(EmployeeDetail::new(
                        employee,
                        self.client.clone(),
                        self.handle.clone(),
                    )));
                }
            }
            _ => {}
        }
        ViewAction::Continue
    }
}

impl View for EmployeeBrowser {
    fn tick(&mut self) {
        let len = self.loader.len();
        self.view.clamp(len);
        let idle = !self.loader.is_loading() && !self.loader.is_exhausted();
        if idle && self.loader.last_error().is_none() && self.view.needs_more(len) {
            self.spawn_load_more();
        }
    }

    fn on_close(&mut self) {
        self.loader.unmount();
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        self.status_message = None;
        let mode = std::mem::replace(&mut self.mode, BrowseMode::Normal);
        match mode {
            BrowseMode::Normal => self.handle_normal_key(code),
            BrowseMode::EditUrl(mut input) => {
                match code {
                    KeyCode::Esc => {}
                    KeyCode::Enter => self.submit_url(&input),
                    KeyCode::Backspace => {
                        input.pop();
                        self.mode = BrowseMode::EditUrl(input);
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                        self.mode = BrowseMode::EditUrl(input);
                    }
                    _ => self.mode = BrowseMode::EditUrl(input),
                }
                ViewAction::Continue
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let narrow = area.width < 100;

        let areas = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Fill(1),   // table
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(area);
        let (title_area, table_area, status_area, keys_area) = (areas[0], areas[1], areas[2], areas[3]);

        frame.render_widget(
            Paragraph::new(format!("Employees  ·  {}", self.client.config().base_url())).style(HEADER_STYLE),
            title_area,
        );

        let header_overhead = 2u16;
        let available = table_area.height.saturating_sub(header_overhead) as usize;
        self.view.visible = available.max(1);

        let rows: Vec<Row> = self.loader.with_items(|items| {
            items
                .iter()
                .skip(self.view.offset)
                .take(self.view.visible)
                .map(|e| {
                    let status = if e.active {
                        Span::styled(e.status_label(), ACTIVE_STYLE)
                    } else {
                        Span::styled(e.status_label(), INACTIVE_STYLE)
                    };
                    let mut cells = vec![
                        Cell::from(e.id.to_string()),
                        Cell::from(e.full_name()),
                        Cell::from(e.area.clone()),
                    ];
                    if !narrow {
                        cells.push(Cell::from(e.shift.clone()));
                        cells.push(Cell::from(money_decimal(e.daily_wage)));
                    }
                    cells.push(Cell::from(status));
                    Row::new(cells)
                })
                .collect()
        });

        if rows.is_empty() {
            let msg = if self.loader.is_loading() {
                Span::styled("Loading employees...", ACCENT_STYLE)
            } else if let Some(err) = self.loader.last_error() {
                Span::styled(format!("Could not load employees: {err}"), ERROR_STYLE)
            } else {
                Span::styled("No employees found.", FOOTER_STYLE)
            };
            let (text, _) = tui::wrap_text(&msg.content, table_area.width as usize);
            frame.render_widget(Paragraph::new(text).style(msg.style), table_area);
        } else {
            let (header, widths): (Vec<&str>, Vec<Constraint>) = if narrow {
                (
                    vec!["ID", "Name", "Area", "Status"],
                    vec![
                        Constraint::Length(6),
                        Constraint::Fill(1),
                        Constraint::Length(14),
                        Constraint::Length(9),
                    ],
                )
            } else {
                (
                    vec!["ID", "Name", "Area", "Shift", "Daily wage", "Status"],
                    vec![
                        Constraint::Length(6),
                        Constraint::Fill(1),
                        Constraint::Length(16),
                        Constraint::Length(12),
                        Constraint::Length(12),
                        Constraint::Length(9),
                    ],
                )
            };
            self.table_state.select(Some(self.view.selected));
            let table = Table::new(rows, widths)
                .header(Row::new(header).style(HEADER_STYLE).bottom_margin(1))
                .column_spacing(1)
                .row_highlight_style(SELECTED_STYLE);
            frame.render_stateful_widget(table, table_area, &mut self.table_state);
        }

        let len = self.loader.len();
        let mut status = if len == 0 {
            "No rows".to_string()
        } else {
            let end = (self.view.offset + self.view.visible).min(len);
            format!("Rows {}-{} of {}", self.view.offset + 1, end, len)
        };
        if self.loader.is_loading() {
            status.push_str(" | loading...");
        } else if self.loader.is_exhausted() {
            status.push_str(" | end of list");
        }
        let status_style = match (&self.status_message, self.loader.last_error()) {
            (Some(msg), _) => {
                status.push_str(&format!(" | {msg}"));
                FOOTER_STYLE
            }
            (None, Some(err)) if len > 0 => {
                status.push_str(&format!(" | {err} (r to retry)"));
                ERROR_STYLE
            }
            _ => FOOTER_STYLE,
        };
        frame.render_widget(Paragraph::new(status).style(status_style), status_area);

        let keys = match &self.mode {
            BrowseMode::Normal => Paragraph::new(
                "\u{2191}/\u{2193}:select  Enter:open  n/p:page  r:reload  c:API URL  q:quit",
            )
            .style(FOOTER_STYLE),
            BrowseMode::EditUrl(input) => Paragraph::new(format!("API URL: {input}\u{2588}")),
        };
        frame.render_widget(keys, keys_area);
    }
}
