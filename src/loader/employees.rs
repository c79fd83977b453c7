use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{debug, error, info};

use super::{lock, Lifecycle};
use crate::client::ApiClient;
use crate::error::AppError;
use crate::models::{Employee, EmployeePage};

#[derive(Debug, Clone, Default, PartialEq)]
enum Cursor {
    /// Next request goes to the listing endpoint of the current base URL.
    #[default]
    Start,
    Next(String),
    /// The last page carried no locator.
    Exhausted,
}

#[derive(Debug, Default)]
struct ListState {
    is_loading: bool,
    items: Vec<Employee>,
    cursor: Cursor,
    last_error: Option<String>,
    /// Bumped on reset; responses from an older epoch are dropped.
    epoch: u64,
}

/// Paginated employee list. Pages are appended in server order as the view
/// asks for more; at most one request is in flight at a time.
///
/// Failures are absorbed: they are logged, kept as [`last_error`], and the
/// items stay as they were.
///
/// [`last_error`]: EmployeeLoader::last_error
pub struct EmployeeLoader {
    client: ApiClient,
    state: Mutex<ListState>,
    config_rx: Mutex<watch::Receiver<String>>,
    lifecycle: Lifecycle,
}

impl EmployeeLoader {
    pub fn new(client: ApiClient) -> Self {
        let config_rx = client.config().subscribe();
        Self {
            client,
            state: Mutex::new(ListState::default()),
            config_rx: Mutex::new(config_rx),
            lifecycle: Lifecycle::default(),
        }
    }

    /// Initial load when the list view appears.
    pub async fn mount(&self) {
        self.load_more().await;
    }

    pub fn unmount(&self) {
        self.lifecycle.unmount();
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading
    }

    pub fn is_exhausted(&self) -> bool {
        lock(&self.state).cursor == Cursor::Exhausted
    }

    pub fn items(&self) -> Vec<Employee> {
        lock(&self.state).items.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).items.len()
    }

    /// Run `f` against the current items without cloning them.
    pub fn with_items<R>(&self, f: impl FnOnce(&[Employee]) -> R) -> R {
        f(&lock(&self.state).items)
    }

    pub fn last_error(&self) -> Option<String> {
        lock(&self.state).last_error.clone()
    }

    /// Drop all pages and point the cursor back at the listing endpoint.
    /// A request still in flight will not be committed.
    pub fn reset(&self) {
        let mut state = lock(&self.state);
        state.epoch += 1;
        state.items.clear();
        state.cursor = Cursor::Start;
        state.is_loading = false;
        state.last_error = None;
    }

    /// True once per base-URL change.
    fn take_config_change(&self) -> bool {
        let mut rx = lock(&self.config_rx);
        match rx.has_changed() {
            Ok(true) => {
                rx.borrow_and_update();
                true
            }
            _ => false,
        }
    }

    /// Reset if the base URL changed since the last check.
    fn reset_on_config_change(&self) -> bool {
        if !self.take_config_change() {
            return false;
        }
        info!(base_url = %self.client.config().base_url(), "reloading employees after config change");
        self.reset();
        true
    }

    /// If the base URL changed since the last check, reset and load the first
    /// page from the new address. Returns whether a reload happened.
    pub async fn sync_with_config(&self) -> bool {
        if !self.reset_on_config_change() {
            return false;
        }
        self.load_more().await;
        true
    }

    /// Follow base-URL changes until unmounted, reloading from the new
    /// address each time.
    pub async fn follow_config(&self) {
        let mut rx = self.client.config().subscribe();
        loop {
            let changed = self
                .lifecycle
                .run(async { rx.changed().await.map_err(|_| AppError::Cancelled) })
                .await;
            if changed.is_err() {
                break;
            }
            self.sync_with_config().await;
        }
    }

    /// Fetch the next page and append it. A no-op while another page is
    /// loading, once the list is exhausted, or after unmount.
    pub async fn load_more(&self) {
        // A pending base-URL change invalidates the stored locator.
        self.reset_on_config_change();
        let (url, epoch) = {
            let mut state = lock(&self.state);
            if state.is_loading || !self.lifecycle.is_mounted() {
                return;
            }
            let url = match &state.cursor {
                Cursor::Start => self.client.employees_url(),
                Cursor::Next(locator) => self.client.resolve_locator(locator),
                Cursor::Exhausted => return,
            };
            state.is_loading = true;
            (url, state.epoch)
        };

        let result = self
            .lifecycle
            .run(self.client.get_json::<EmployeePage>(&url))
            .await;

        let mut state = lock(&self.state);
        if state.epoch != epoch || !self.lifecycle.is_mounted() {
            debug!(%url, "discarding employee page from a superseded request");
            return;
        }
        state.is_loading = false;
        match result {
            Ok(page) => {
                state.cursor = match page.next_locator() {
                    Some(next) => Cursor::Next(next.to_string()),
                    None => Cursor::Exhausted,
                };
                debug!(%url, count = page.data.len(), "employee page loaded");
                state.items.extend(page.data);
                state.last_error = None;
            }
            Err(e) => {
                error!(%url, error = %e, "failed to load employees");
                state.last_error = Some(e.to_string());
            }
        }
    }
}
