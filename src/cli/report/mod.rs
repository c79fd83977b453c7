pub mod text;
pub mod view;

use tokio::runtime::Runtime;

use crate::client::ApiClient;
use crate::error::{AppError, Result};
use crate::loader::ReportLoader;
use crate::reports::{
    Attendance, AttendanceDetail, DaysWorked, HoursWorked, Payroll, Production, Report, ReportKind,
    Tabulate, UnitsProduced,
};

use super::default_range;

pub struct ReportArgs {
    pub kind: ReportKind,
    pub employee_id: i64,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub json: bool,
}

pub fn run(runtime: &Runtime, client: ApiClient, args: ReportArgs) -> Result<()> {
    let (default_from, default_to) = default_range();
    let from = args.from_date.clone().unwrap_or(default_from);
    let to = args.to_date.clone().unwrap_or(default_to);

    let out = match args.kind {
        ReportKind::Attendance => run_kind::<Attendance>(runtime, client, &args, &from, &to),
        ReportKind::AttendanceDetail => {
            run_kind::<AttendanceDetail>(runtime, client, &args, &from, &to)
        }
        ReportKind::Payroll => run_kind::<Payroll>(runtime, client, &args, &from, &to),
        ReportKind::DaysWorked => run_kind::<DaysWorked>(runtime, client, &args, &from, &to),
        ReportKind::Production => run_kind::<Production>(runtime, client, &args, &from, &to),
        ReportKind::HoursWorked => run_kind::<HoursWorked>(runtime, client, &args, &from, &to),
        ReportKind::UnitsProduced => run_kind::<UnitsProduced>(runtime, client, &args, &from, &to),
    }?;
    println!("{out}");
    Ok(())
}

fn run_kind<R: Report>(
    runtime: &Runtime,
    client: ApiClient,
    args: &ReportArgs,
    from: &str,
    to: &str,
) -> Result<String> {
    let loader = ReportLoader::<R>::new(client);
    let data = runtime
        .block_on(loader.load_data(args.employee_id, from, to))?
        .ok_or_else(|| AppError::Other("report request was superseded".into()))?;

    if args.json {
        return serde_json::to_string_pretty(&data).map_err(|e| AppError::Other(e.to_string()));
    }
    Ok(text::format_report(
        R::KIND,
        args.employee_id,
        from,
        to,
        &data.tabulate(),
    ))
}
