use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::fmt::{money, units};
use crate::models::{null_default, Quantity};

// ---------------------------------------------------------------------------
// Report kinds
// ---------------------------------------------------------------------------

/// Every report endpoint takes `id_empleado`, `fechaInicio` and `fechaFin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Attendance records with a total count.
    Attendance,
    /// Attendance count with per-day check-in/check-out detail.
    AttendanceDetail,
    /// Payroll calculation for the period.
    Payroll,
    /// Days with an attendance record.
    DaysWorked,
    /// Units produced per day and shift.
    Production,
    /// Hours worked per day.
    HoursWorked,
    /// Units-produced totals.
    UnitsProduced,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::Attendance,
        ReportKind::AttendanceDetail,
        ReportKind::Payroll,
        ReportKind::DaysWorked,
        ReportKind::Production,
        ReportKind::HoursWorked,
        ReportKind::UnitsProduced,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            ReportKind::Attendance => "/reporte-asistencia-empleado",
            ReportKind::AttendanceDetail => "/asistencia-empleado",
            ReportKind::Payroll => "/nomina",
            ReportKind::DaysWorked => "/dias-trabajados",
            ReportKind::Production => "/reporte-produccion",
            ReportKind::HoursWorked => "/horas-trabajadas",
            ReportKind::UnitsProduced => "/unidades-producidas",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Attendance => "Attendance Report",
            ReportKind::AttendanceDetail => "Employee Attendance",
            ReportKind::Payroll => "Payroll Summary",
            ReportKind::DaysWorked => "Days Worked",
            ReportKind::Production => "Production Report",
            ReportKind::HoursWorked => "Hours Worked",
            ReportKind::UnitsProduced => "Units Produced",
        }
    }
}

/// Compile-time binding of a report kind to the payload its endpoint returns.
pub trait Report: Send + Sync + 'static {
    type Output: DeserializeOwned + Serialize + Tabulate + Clone + Send + Sync + 'static;
    const KIND: ReportKind;
}

pub struct Attendance;
pub struct AttendanceDetail;
pub struct Payroll;
pub struct DaysWorked;
pub struct Production;
pub struct HoursWorked;
pub struct UnitsProduced;

impl Report for Attendance {
    type Output = AttendanceReport;
    const KIND: ReportKind = ReportKind::Attendance;
}

impl Report for AttendanceDetail {
    type Output = AttendanceDetailReport;
    const KIND: ReportKind = ReportKind::AttendanceDetail;
}

impl Report for Payroll {
    type Output = PayrollReport;
    const KIND: ReportKind = ReportKind::Payroll;
}

impl Report for DaysWorked {
    type Output = Vec<DayWorked>;
    const KIND: ReportKind = ReportKind::DaysWorked;
}

impl Report for Production {
    type Output = Vec<ProductionItem>;
    const KIND: ReportKind = ReportKind::Production;
}

impl Report for HoursWorked {
    type Output = Vec<HoursWorkedItem>;
    const KIND: ReportKind = ReportKind::HoursWorked;
}

impl Report for UnitsProduced {
    type Output = UnitsProducedReport;
    const KIND: ReportKind = ReportKind::UnitsProduced;
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceReport {
    #[serde(default, deserialize_with = "null_default")]
    pub total: Quantity,
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "a_id_reg_a", default, deserialize_with = "null_default")]
    pub id: i64,
    #[serde(rename = "e_nombre", default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(rename = "e_apellido_p", default, deserialize_with = "null_default")]
    pub surname: String,
    #[serde(rename = "a_fecha", default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(rename = "a_horaEntrada", default, deserialize_with = "null_default")]
    pub check_in: String,
    #[serde(rename = "a_horaSalida", default, deserialize_with = "null_default")]
    pub check_out: String,
    #[serde(rename = "a_turno", default, deserialize_with = "null_default")]
    pub shift: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDetailReport {
    #[serde(rename = "total_asistencias", default, deserialize_with = "null_default")]
    pub total: Quantity,
    #[serde(rename = "detalles", default, deserialize_with = "null_default")]
    pub details: Vec<AttendanceDetailEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDetailEntry {
    #[serde(rename = "fecha", default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(rename = "hora_entrada", default, deserialize_with = "null_default")]
    pub check_in: String,
    #[serde(rename = "hora_salida", default, deserialize_with = "null_default")]
    pub check_out: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollReport {
    #[serde(rename = "diasTrabajados", default, deserialize_with = "null_default")]
    pub days_worked: Quantity,
    #[serde(rename = "asistencias", default, deserialize_with = "null_default")]
    pub attendances: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub total: Option<Quantity>,
    #[serde(rename = "detalles", default, deserialize_with = "null_default")]
    pub details: Option<serde_json::Value>,
}

impl PayrollReport {
    /// Net total to two decimals; `$0.00` when absent or unparseable.
    pub fn net_total(&self) -> String {
        money(self.total.as_ref().and_then(Quantity::as_f64).unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayWorked {
    #[serde(rename = "a_fecha", default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(rename = "a_horaEntrada", default, deserialize_with = "null_default")]
    pub check_in: String,
    #[serde(rename = "a_horaSalida", default, deserialize_with = "null_default")]
    pub check_out: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionItem {
    #[serde(rename = "e_nombre", default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(rename = "e_apellido_p", default, deserialize_with = "null_default")]
    pub surname: String,
    #[serde(rename = "p_fecha", default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(rename = "p_unidadesProducidas", default, deserialize_with = "null_default")]
    pub units: Quantity,
    #[serde(rename = "p_turno", default, deserialize_with = "null_default")]
    pub shift: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursWorkedItem {
    #[serde(rename = "e_nombre", default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(rename = "e_apellido_p", default, deserialize_with = "null_default")]
    pub surname: String,
    #[serde(rename = "a_fecha", default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(rename = "a_horasTrabajadas", default, deserialize_with = "null_default")]
    pub hours: Quantity,
    #[serde(rename = "a_turno", default, deserialize_with = "null_default")]
    pub shift: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitsProducedReport {
    #[serde(default, deserialize_with = "null_default")]
    pub total: Vec<ProducedUnit>,
}

impl UnitsProducedReport {
    /// The "total items" figure is the number of entries, not the sum of
    /// `total_producido`.
    pub fn item_count(&self) -> usize {
        self.total.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducedUnit {
    #[serde(default, deserialize_with = "null_default")]
    pub total_producido: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionSummary {
    pub records: usize,
    pub units: f64,
}

pub fn production_summary(items: &[ProductionItem]) -> ProductionSummary {
    ProductionSummary {
        records: items.len(),
        units: items.iter().filter_map(|i| i.units.as_f64()).sum(),
    }
}

// ---------------------------------------------------------------------------
// Tabular rendering shared by the text output and the terminal view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTable {
    pub summary: Vec<(&'static str, String)>,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// Shown instead of the table when the report has nothing to list.
    pub empty_message: Option<&'static str>,
}

pub trait Tabulate {
    fn tabulate(&self) -> ReportTable;
}

fn records_found(n: usize) -> (&'static str, String) {
    ("Records found", n.to_string())
}

impl Tabulate for AttendanceReport {
    fn tabulate(&self) -> ReportTable {
        let empty = self.data.is_empty() || self.total.as_f64() == Some(0.0);
        ReportTable {
            summary: vec![("Total attendances", self.total.to_string())],
            header: vec!["Date", "Check-in", "Check-out", "Shift"],
            rows: self
                .data
                .iter()
                .map(|r| vec![r.date.clone(), r.check_in.clone(), r.check_out.clone(), r.shift.clone()])
                .collect(),
            empty_message: empty.then_some("No attendance records in this period."),
        }
    }
}

impl Tabulate for AttendanceDetailReport {
    fn tabulate(&self) -> ReportTable {
        let empty = self.total.as_f64() == Some(0.0);
        ReportTable {
            summary: vec![("Total attendances", self.total.to_string())],
            header: vec!["Date", "Check-in / Check-out"],
            rows: self
                .details
                .iter()
                .map(|d| vec![d.date.clone(), format!("{} / {}", d.check_in, d.check_out)])
                .collect(),
            empty_message: empty.then_some("No attendance found in the selected period."),
        }
    }
}

impl Tabulate for PayrollReport {
    fn tabulate(&self) -> ReportTable {
        ReportTable {
            summary: vec![
                ("Days worked", self.days_worked.to_string()),
                ("Attendance records", self.attendances.len().to_string()),
                ("Net pay", self.net_total()),
            ],
            ..ReportTable::default()
        }
    }
}

impl Tabulate for Vec<DayWorked> {
    fn tabulate(&self) -> ReportTable {
        ReportTable {
            summary: vec![records_found(self.len())],
            header: vec!["Date", "Check-in", "Check-out"],
            rows: self
                .iter()
                .map(|d| vec![d.date.clone(), d.check_in.clone(), d.check_out.clone()])
                .collect(),
            empty_message: self.is_empty().then_some("No days worked in this period."),
        }
    }
}

impl Tabulate for Vec<ProductionItem> {
    fn tabulate(&self) -> ReportTable {
        let totals = production_summary(self);
        ReportTable {
            summary: vec![
                records_found(totals.records),
                ("Total units", units(totals.units)),
            ],
            header: vec!["Date", "Shift", "Units"],
            rows: self
                .iter()
                .map(|p| {
                    let produced = p.units.as_f64().map(units).unwrap_or_else(|| p.units.to_string());
                    vec![p.date.clone(), p.shift.clone(), produced]
                })
                .collect(),
            empty_message: self.is_empty().then_some("No production recorded in this period."),
        }
    }
}

impl Tabulate for Vec<HoursWorkedItem> {
    fn tabulate(&self) -> ReportTable {
        ReportTable {
            summary: vec![records_found(self.len())],
            header: vec!["Date", "Shift", "Hours"],
            rows: self
                .iter()
                .map(|h| vec![h.date.clone(), h.shift.clone(), h.hours.to_string()])
                .collect(),
            empty_message: self.is_empty().then_some("No hours recorded in this period."),
        }
    }
}

impl Tabulate for UnitsProducedReport {
    fn tabulate(&self) -> ReportTable {
        ReportTable {
            summary: vec![("Total items", self.item_count().to_string())],
            header: vec!["Produced"],
            rows: self
                .total
                .iter()
                .map(|u| vec![u.total_producido.to_string()])
                .collect(),
            empty_message: self.total.is_empty().then_some("No production totals in this period."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_units_produced_counts_items_not_units() {
        let report: UnitsProducedReport = serde_json::from_value(json!({
            "total": [{"total_producido": 3}, {"total_producido": 7}]
        }))
        .unwrap();
        assert_eq!(report.item_count(), 2);
        let table = report.tabulate();
        assert_eq!(table.summary, vec![("Total items", "2".to_string())]);
        assert_eq!(table.rows, vec![vec!["3".to_string()], vec!["7".to_string()]]);
    }

    #[test]
    fn test_production_summary_sums_units() {
        let items: Vec<ProductionItem> = serde_json::from_value(json!([
            {"e_nombre": "Luis", "e_apellido_p": "Soto", "p_fecha": "2025-01-02", "p_unidadesProducidas": 1500, "p_turno": "MATUTINO"},
            {"e_nombre": "Luis", "e_apellido_p": "Soto", "p_fecha": "2025-01-03", "p_unidadesProducidas": "250", "p_turno": "MIXTO"}
        ]))
        .unwrap();
        let s = production_summary(&items);
        assert_eq!(s.records, 2);
        assert_eq!(s.units, 1750.0);
        let table = items.tabulate();
        assert_eq!(table.summary[1], ("Total units", "1,750".to_string()));
        assert_eq!(table.rows[0], vec!["2025-01-02", "MATUTINO", "1,500"]);
    }

    #[test]
    fn test_payroll_net_total_defaults_to_zero() {
        let report: PayrollReport =
            serde_json::from_value(json!({"diasTrabajados": 4, "asistencias": [{}, {}]})).unwrap();
        assert_eq!(report.net_total(), "$0.00");
        let table = report.tabulate();
        assert_eq!(table.summary[0], ("Days worked", "4".to_string()));
        assert_eq!(table.summary[1], ("Attendance records", "2".to_string()));
        assert!(table.header.is_empty());

        let report: PayrollReport =
            serde_json::from_value(json!({"diasTrabajados": 4, "total": 1400.5})).unwrap();
        assert_eq!(report.net_total(), "$1,400.50");
    }

    #[test]
    fn test_attendance_detail_empty_message() {
        let report: AttendanceDetailReport =
            serde_json::from_value(json!({"total_asistencias": 0, "detalles": []})).unwrap();
        assert!(report.tabulate().empty_message.is_some());

        let report: AttendanceDetailReport = serde_json::from_value(json!({
            "total_asistencias": 1,
            "detalles": [{"fecha": "2025-01-02", "hora_entrada": "08:00", "hora_salida": "17:00"}]
        }))
        .unwrap();
        let table = report.tabulate();
        assert!(table.empty_message.is_none());
        assert_eq!(table.rows[0][1], "08:00 / 17:00");
    }

    #[test]
    fn test_null_check_out_decodes_as_empty() {
        let report: AttendanceDetailReport = serde_json::from_value(json!({
            "total_asistencias": 1,
            "detalles": [{"fecha": "2025-01-02", "hora_entrada": "08:00", "hora_salida": null}]
        }))
        .unwrap();
        assert_eq!(report.details[0].check_out, "");
        assert_eq!(report.tabulate().rows[0][1], "08:00 / ");
    }

    #[test]
    fn test_null_units_total_counts_zero_items() {
        let report: UnitsProducedReport = serde_json::from_value(json!({"total": null})).unwrap();
        assert_eq!(report.item_count(), 0);
        assert!(report.tabulate().empty_message.is_some());
    }

    #[test]
    fn test_null_attendance_total_and_data() {
        let report: AttendanceReport =
            serde_json::from_value(json!({"total": null, "data": null})).unwrap();
        assert_eq!(report.total, Quantity::default());
        assert!(report.data.is_empty());

        let items: Vec<ProductionItem> = serde_json::from_value(json!([
            {"p_fecha": "2025-01-02", "p_unidadesProducidas": null, "p_turno": null}
        ]))
        .unwrap();
        assert_eq!(production_summary(&items).units, 0.0);
    }

    #[test]
    fn test_every_kind_has_a_distinct_endpoint() {
        let mut endpoints: Vec<_> = ReportKind::ALL.iter().map(|k| k.endpoint()).collect();
        endpoints.sort();
        endpoints.dedup();
        assert_eq!(endpoints.len(), 7);
    }
}
