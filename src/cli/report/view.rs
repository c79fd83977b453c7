use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table},
    Frame,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::cli::default_range;
use crate::client::ApiClient;
use crate::error::AppError;
use crate::loader::ReportLoader;
use crate::models::Employee;
use crate::reports::{
    Attendance, AttendanceDetail, DaysWorked, HoursWorked, Payroll, Production, Report, ReportKind,
    Tabulate, UnitsProduced,
};
use crate::tui::{View, ViewAction, ACCENT_STYLE, ERROR_STYLE, FOOTER_STYLE, HEADER_STYLE};

/// Build the screen for `kind` and start its first load.
pub fn open(kind: ReportKind, employee: Employee, client: ApiClient, handle: &Handle) -> Box<dyn View> {
    match kind {
        ReportKind::Attendance => mounted::<Attendance>(employee, client, handle),
        ReportKind::AttendanceDetail => mounted::<AttendanceDetail>(employee, client, handle),
        ReportKind::Payroll => mounted::<Payroll>(employee, client, handle),
        ReportKind::DaysWorked => mounted::<DaysWorked>(employee, client, handle),
        ReportKind::Production => mounted::<Production>(employee, client, handle),
        ReportKind::HoursWorked => mounted::<HoursWorked>(employee, client, handle),
        ReportKind::UnitsProduced => mounted::<UnitsProduced>(employee, client, handle),
    }
}

fn mounted<R: Report>(employee: Employee, client: ApiClient, handle: &Handle) -> Box<dyn View> {
    let mut screen = ReportScreen::<R>::new(employee, client, handle.clone());
    screen.submit();
    Box::new(screen)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Focus {
    Start,
    End,
}

/// Date-range filter plus the rendered report for one employee.
pub(crate) struct ReportScreen<R: Report> {
    employee: Employee,
    loader: Arc<ReportLoader<R>>,
    handle: Handle,
    start: String,
    end: String,
    focus: Focus,
    offset: usize,
    visible_count: usize,
    status_message: Option<String>,
    errors_tx: mpsc::UnboundedSender<String>,
    errors_rx: mpsc::UnboundedReceiver<String>,
}

impl<R: Report> ReportScreen<R> {
    pub(crate) fn new(employee: Employee, client: ApiClient, handle: Handle) -> Self {
        let (start, end) = default_range();
        let (errors_tx, errors_rx) = mpsc::unbounded_channel();
        Self {
            employee,
            loader: Arc::new(ReportLoader::new(client)),
            handle,
            start,
            end,
            focus: Focus::Start,
            offset: 0,
            visible_count: 10,
            status_message: None,
            errors_tx,
            errors_rx,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Focus::Start => &mut self.start,
            Focus::End => &mut self.end,
        }
    }

    /// Issue a load for the current filter. Failures come back through the
    /// error channel and show up in the status line.
    fn submit(&mut self) {
        if self.start.trim().is_empty() || self.end.trim().is_empty() {
            self.status_message = Some("Both dates are required (DD/MM/YYYY)".into());
            return;
        }
        self.status_message = None;
        self.offset = 0;
        let loader = Arc::clone(&self.loader);
        let errors = self.errors_tx.clone();
        let id = self.employee.id;
        let (start, end) = (self.start.trim().to_string(), self.end.trim().to_string());
        self.handle.spawn(async move {
            match loader.load_data(id, &start, &end).await {
                Ok(_) | Err(AppError::Cancelled) => {}
                Err(e) => {
                    // The receiver lives as long as the screen.
                    errors.send(format!("Error: {e}")).ok();
                }
            }
        });
    }

    fn row_count(&self) -> usize {
        self.loader.data().map(|d| d.tabulate().rows.len()).unwrap_or(0)
    }
}

impl<R: Report> View for ReportScreen<R> {
    fn tick(&mut self) {
        while let Ok(msg) = self.errors_rx.try_recv() {
            self.status_message = Some(msg);
        }
    }

    fn on_close(&mut self) {
        self.loader.unmount();
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        match code {
            KeyCode::Esc => return ViewAction::Close,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Start => Focus::End,
                    Focus::End => Focus::Start,
                };
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.focused_mut().pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '/' || c == '-' => {
                self.focused_mut().push(c);
            }
            KeyCode::Down => {
                if self.offset + self.visible_count < self.row_count() {
                    self.offset += 1;
                }
            }
            KeyCode::Up => self.offset = self.offset.saturating_sub(1),
            _ => {}
        }
        ViewAction::Continue
    }

    fn draw(&mut self, frame: &mut Frame) {
        let data = self.loader.data();
        let table = data.as_ref().map(|d| d.tabulate()).unwrap_or_default();
        let summary_height = table.summary.len() as u16;

        let areas = Layout::vertical([
            Constraint::Length(1),                  // title
            Constraint::Length(1),                  // filter
            Constraint::Length(1),                  // spacer
            Constraint::Length(summary_height),     // summary
            Constraint::Fill(1),                    // rows
            Constraint::Length(1),                  // status
            Constraint::Length(1),                  // keys
        ])
        .split(frame.area());

        frame.render_widget(
            Paragraph::new(format!("{}  ·  {}", R::KIND.title(), self.employee.full_name()))
                .style(HEADER_STYLE),
            areas[0],
        );

        let field = |label: &'static str, value: &str, focused: bool| {
            let text = if focused {
                format!("{value}\u{2588}")
            } else {
                value.to_string()
            };
            let style = if focused { ACCENT_STYLE } else { FOOTER_STYLE };
            vec![Span::styled(label, FOOTER_STYLE), Span::styled(text, style)]
        };
        let mut filter = field("From: ", &self.start, self.focus == Focus::Start);
        filter.push(Span::raw("   "));
        filter.extend(field("To: ", &self.end, self.focus == Focus::End));
        frame.render_widget(Paragraph::new(Line::from(filter)), areas[1]);

        let summary: Vec<Line> = table
            .summary
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("  {label:<20}"), FOOTER_STYLE),
                    Span::styled(value.clone(), HEADER_STYLE),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(summary), areas[3]);

        let body_area = areas[4];
        if data.is_none() {
            let msg = if self.loader.is_loading() {
                "Loading..."
            } else {
                "No data. Press Enter to load."
            };
            frame.render_widget(Paragraph::new(msg).style(FOOTER_STYLE), body_area);
        } else if let Some(msg) = table.empty_message {
            frame.render_widget(Paragraph::new(msg).style(FOOTER_STYLE), body_area);
        } else if !table.rows.is_empty() {
            self.visible_count = body_area.height.saturating_sub(2).max(1) as usize;
            let rows: Vec<Row> = table
                .rows
                .iter()
                .skip(self.offset)
                .take(self.visible_count)
                .map(|r| Row::new(r.clone()))
                .collect();
            let widths = vec![Constraint::Fill(1); table.header.len()];
            let widget = Table::new(rows, widths)
                .header(Row::new(table.header.clone()).style(HEADER_STYLE).bottom_margin(1))
                .column_spacing(2);
            frame.render_widget(widget, body_area);
        }

        let (status, style) = match (&self.status_message, self.loader.is_loading()) {
            (Some(msg), _) => (msg.clone(), ERROR_STYLE),
            (None, true) => ("Loading...".to_string(), ACCENT_STYLE),
            (None, false) if !table.rows.is_empty() => {
                let end = (self.offset + self.visible_count).min(table.rows.len());
                (
                    format!("Rows {}-{} of {}", self.offset + 1, end, table.rows.len()),
                    FOOTER_STYLE,
                )
            }
            _ => (String::new(), FOOTER_STYLE),
        };
        frame.render_widget(Paragraph::new(status).style(style), areas[5]);

        frame.render_widget(
            Paragraph::new("Tab:switch date  Enter:search  \u{2191}/\u{2193}:scroll  Esc:back")
                .style(FOOTER_STYLE),
            areas[6],
        );
    }
}
