use std::marker::PhantomData;
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{lock, Lifecycle};
use crate::client::ApiClient;
use crate::error::{AppError, Result};
use crate::reports::Report;

#[derive(Debug)]
struct ReportState<T> {
    data: Option<T>,
    is_loading: bool,
    last_error: Option<String>,
    /// Incremented per issued call; only the latest may commit.
    generation: u64,
}

impl<T> Default for ReportState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            last_error: None,
            generation: 0,
        }
    }
}

/// Loads one report kind for one employee and date range. Each call replaces
/// the previous data wholesale. When calls overlap, the most recently issued
/// one wins regardless of which response arrives first.
pub struct ReportLoader<R: Report> {
    client: ApiClient,
    state: Mutex<ReportState<R::Output>>,
    lifecycle: Lifecycle,
    _kind: PhantomData<R>,
}

impl<R: Report> ReportLoader<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(ReportState::default()),
            lifecycle: Lifecycle::default(),
            _kind: PhantomData,
        }
    }

    pub fn data(&self) -> Option<R::Output> {
        lock(&self.state).data.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading
    }

    pub fn last_error(&self) -> Option<String> {
        lock(&self.state).last_error.clone()
    }

    pub fn unmount(&self) {
        self.lifecycle.unmount();
    }

    /// Fetch the report. Errors are returned to the caller and also recorded
    /// as `last_error`; `data` keeps its previous value on failure.
    ///
    /// Returns `Ok(None)` when a newer call was issued before this one
    /// finished, in which case nothing was committed.
    pub async fn load_data(
        &self,
        employee_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> Result<Option<R::Output>> {
        if !self.lifecycle.is_mounted() {
            return Err(AppError::Cancelled);
        }
        let url = self
            .client
            .report_url(R::KIND.endpoint(), employee_id, start_date, end_date);
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.is_loading = true;
            state.generation
        };

        let result = self
            .lifecycle
            .run(self.client.get_json::<R::Output>(&url))
            .await;

        let mut state = lock(&self.state);
        if !self.lifecycle.is_mounted() {
            return Err(AppError::Cancelled);
        }
        if state.generation != generation {
            debug!(%url, generation, latest = state.generation, "discarding stale report response");
            return Ok(None);
        }
        state.is_loading = false;
        match result {
            Ok(data) => {
                state.data = Some(data.clone());
                state.last_error = None;
                Ok(Some(data))
            }
            Err(e) => {
                warn!(report = ?R::KIND, %url, error = %e, "report request failed");
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::ApiConfig;
    use crate::reports::{
        AttendanceDetail, AttendanceDetailReport, DaysWorked, Payroll, UnitsProduced,
    };
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(base: &str) -> ApiClient {
        ApiClient::new(ApiConfig::new(base).unwrap(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_sends_dates_verbatim_as_query_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/dsm44/empleados/nomina")
                    .query_param("id_empleado", "5")
                    .query_param("fechaInicio", "01/01/2025")
                    .query_param("fechaFin", "31/01/2025");
                then.status(200).json_body(json!({
                    "diasTrabajados": 20,
                    "asistencias": [],
                    "total": 7000.0
                }));
            })
            .await;

        let loader = ReportLoader::<Payroll>::new(client_for(&server.base_url()));
        let data = loader
            .load_data(5, "01/01/2025", "31/01/2025")
            .await
            .unwrap()
            .expect("latest call commits");
        mock.assert_hits_async(1).await;
        assert_eq!(data.net_total(), "$7,000.00");
    }

    #[tokio::test]
    async fn test_data_absent_until_loaded_then_equals_body() {
        let server = MockServer::start_async().await;
        let body = json!({
            "total_asistencias": 2,
            "detalles": [
                {"fecha": "2025-01-02", "hora_entrada": "08:00", "hora_salida": "17:00"},
                {"fecha": "2025-01-03", "hora_entrada": "08:05", "hora_salida": "17:02"}
            ]
        });
        let expected: AttendanceDetailReport = serde_json::from_value(body.clone()).unwrap();
        let _mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/dsm44/empleados/asistencia-empleado");
                then.status(200).json_body(body);
            })
            .await;

        let loader = ReportLoader::<AttendanceDetail>::new(client_for(&server.base_url()));
        assert!(loader.data().is_none());
        assert!(!loader.is_loading());

        loader.load_data(3, "01/01/2025", "31/01/2025").await.unwrap();
        assert_eq!(loader.data(), Some(expected));
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_errors_propagate_and_keep_previous_data() {
        let server = MockServer::start_async().await;
        let _ok = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/dsm44/empleados/dias-trabajados")
                    .query_param("id_empleado", "1");
                then.status(200).json_body(json!([
                    {"a_fecha": "2025-01-02", "a_horaEntrada": "08:00", "a_horaSalida": "17:00"}
                ]));
            })
            .await;
        let _fail = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/dsm44/empleados/dias-trabajados")
                    .query_param("id_empleado", "2");
                then.status(500);
            })
            .await;

        let loader = ReportLoader::<DaysWorked>::new(client_for(&server.base_url()));
        loader.load_data(1, "01/01/2025", "31/01/2025").await.unwrap();
        let err = loader
            .load_data(2, "01/01/2025", "31/01/2025")
            .await
            .expect_err("500 propagates");
        assert!(matches!(err, AppError::Status { .. }));
        assert_eq!(loader.data().map(|d| d.len()), Some(1));
        assert!(loader.last_error().is_some());
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_latest_issued_call_wins() {
        let server = MockServer::start_async().await;
        let _slow = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/dsm44/empleados/unidades-producidas")
                    .query_param("fechaInicio", "01/01/2025");
                then.status(200)
                    .delay(Duration::from_millis(400))
                    .json_body(json!({"total": [{"total_producido": 1}]}));
            })
            .await;
        let _fast = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/dsm44/empleados/unidades-producidas")
                    .query_param("fechaInicio", "01/02/2025");
                then.status(200)
                    .json_body(json!({"total": [{"total_producido": 3}, {"total_producido": 7}]}));
            })
            .await;

        let loader = Arc::new(ReportLoader::<UnitsProduced>::new(client_for(&server.base_url())));
        let first = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load_data(5, "01/01/2025", "31/01/2025").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = loader.load_data(5, "01/02/2025", "28/02/2025").await.unwrap();
        assert_eq!(second.map(|d| d.item_count()), Some(2));

        let stale = first.await.unwrap().unwrap();
        assert!(stale.is_none());
        assert_eq!(loader.data().map(|d| d.item_count()), Some(2));
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_unmount_drops_in_flight_result() {
        let server = MockServer::start_async().await;
        let _mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/dsm44/empleados/nomina");
                then.status(200)
                    .delay(Duration::from_millis(300))
                    .json_body(json!({"diasTrabajados": 1}));
            })
            .await;

        let loader = Arc::new(ReportLoader::<Payroll>::new(client_for(&server.base_url())));
        let task = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load_data(1, "01/01/2025", "02/01/2025").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        loader.unmount();

        assert!(matches!(task.await.unwrap(), Err(AppError::Cancelled)));
        assert!(loader.data().is_none());
    }
}
