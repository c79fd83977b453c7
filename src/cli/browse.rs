use std::sync::Arc;

use tokio::runtime::Handle;

use crate::browser::EmployeeBrowser;
use crate::client::ApiClient;
use crate::error::Result;
use crate::loader::EmployeeLoader;
use crate::tui;

pub fn run(handle: Handle, client: ApiClient) -> Result<()> {
    let loader = Arc::new(EmployeeLoader::new(client.clone()));
    {
        let loader = Arc::clone(&loader);
        handle.spawn(async move { loader.mount().await });
    }
    {
        let loader = Arc::clone(&loader);
        handle.spawn(async move { loader.follow_config().await });
    }
    tui::run_views(Box::new(EmployeeBrowser::new(loader, client, handle)))
}
