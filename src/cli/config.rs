use crate::config::ApiConfig;
use crate::error::Result;
use crate::settings::{load_settings, resolve_base_url, save_settings, settings_path, Settings, BASE_URL_ENV};

pub fn show(flag: Option<&str>, settings: &Settings) -> Result<()> {
    let env = std::env::var(BASE_URL_ENV).ok();
    let (url, source) = resolve_base_url(flag, env.as_deref(), settings);

    println!("Base URL:   {url} ({})", source.label());
    println!("Timeout:    {}s", settings.timeout_secs);
    println!("Settings:   {}", settings_path().display());
    println!("Logs:       {}", settings.log_dir().display());
    Ok(())
}

/// Persist a new default. A running session is unaffected.
pub fn set_url(url: &str) -> Result<()> {
    let normalized = ApiConfig::new(url)?.base_url();
    let mut settings = load_settings();
    settings.base_url = normalized.clone();
    save_settings(&settings)?;
    println!("Default API URL set to {normalized}");
    Ok(())
}
