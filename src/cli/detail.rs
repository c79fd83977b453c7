use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::runtime::Handle;

use crate::client::ApiClient;
use crate::fmt::money_decimal;
use crate::models::Employee;
use crate::reports::ReportKind;
use crate::tui::{
    View, ViewAction, ACTIVE_STYLE, FOOTER_STYLE, HEADER_STYLE, INACTIVE_STYLE, SELECTED_STYLE,
};

use super::report::view;

/// One employee's record plus the list of reports that can be opened for them.
pub struct EmployeeDetail {
    employee: Employee,
    client: ApiClient,
    handle: Handle,
    selection: usize,
}

impl EmployeeDetail {
    pub fn new(employee: Employee, client: ApiClient, handle: Handle) -> Self {
        Self {
            employee,
            client,
            handle,
            selection: 0,
        }
    }

    fn selected_kind(&self) -> ReportKind {
        ReportKind::ALL[self.selection]
    }
}

impl View for EmployeeDetail {
    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => ViewAction::Close,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selection + 1 < ReportKind::ALL.len() {
                    self.selection += 1;
                }
                ViewAction::Continue
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selection = self.selection.saturating_sub(1);
                ViewAction::Continue
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.selection = c as usize - '1' as usize;
                ViewAction::Continue
            }
            KeyCode::Enter => ViewAction::Open(view::open(
                self.selected_kind(),
                self.employee.clone(),
                self.client.clone(),
                &self.handle,
            )),
            _ => ViewAction::Continue,
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let e = &self.employee;
        let areas = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

        frame.render_widget(Paragraph::new(e.full_name()).style(HEADER_STYLE), areas[0]);

        let status_style = if e.active { ACTIVE_STYLE } else { INACTIVE_STYLE };
        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<12}"), FOOTER_STYLE),
                Span::raw(value),
            ])
        };
        let info = vec![
            field("ID", e.id.to_string()),
            field("Area", e.area.clone()),
            field("Shift", e.shift.clone()),
            field("Daily wage", money_decimal(e.daily_wage)),
            Line::from(vec![
                Span::styled(format!("  {:<12}", "Status"), FOOTER_STYLE),
                Span::styled(e.status_label(), status_style),
            ]),
        ];
        frame.render_widget(Paragraph::new(info), areas[2]);

        frame.render_widget(Paragraph::new("Reports").style(HEADER_STYLE), areas[3]);
        let menu: Vec<Line> = ReportKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let text = format!("  {}. {}", i + 1, kind.title());
                if i == self.selection {
                    Line::styled(text, SELECTED_STYLE)
                } else {
                    Line::raw(text)
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(menu), areas[4]);

        frame.render_widget(
            Paragraph::new("\u{2191}/\u{2193}:select  1-7:jump  Enter:open report  Esc:back")
                .style(FOOTER_STYLE),
            areas[5],
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;

    use super::*;
    use crate::config::ApiConfig;

    fn detail(rt: &tokio::runtime::Runtime) -> EmployeeDetail {
        let employee = Employee {
            id: 7,
            first_name: "Ana".into(),
            paternal_surname: "Lopez".into(),
            maternal_surname: String::new(),
            area: "PRODUCCION".into(),
            shift: "MATUTINO".into(),
            daily_wage: Decimal::new(35000, 2),
            active: true,
        };
        let client =
            ApiClient::new(ApiConfig::new("http://127.0.0.1:9").unwrap(), Duration::from_secs(1)).unwrap();
        EmployeeDetail::new(employee, client, rt.handle().clone())
    }

    #[test]
    fn test_menu_selection_is_bounded() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut d = detail(&rt);
        d.handle_key(KeyCode::Up);
        assert_eq!(d.selected_kind(), ReportKind::Attendance);
        for _ in 0..20 {
            d.handle_key(KeyCode::Down);
        }
        assert_eq!(d.selected_kind(), ReportKind::UnitsProduced);
        d.handle_key(KeyCode::Char('3'));
        assert_eq!(d.selected_kind(), ReportKind::Payroll);
    }

    #[test]
    fn test_enter_opens_report_and_esc_closes() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut d = detail(&rt);
        assert!(matches!(d.handle_key(KeyCode::Enter), ViewAction::Open(_)));
        assert!(matches!(d.handle_key(KeyCode::Esc), ViewAction::Close));
    }
}
