//! CLI-only commands: config info and models list.
//!
//! These run without opening the TUI and produce plain text output.

use crate::core::config::{self, ConfigError};
use crate::core::models::{Model, ModelRegistry, ProviderKey};
use crate::core::paths;
use crate::core::persistence;
use crate::core::setup;

/// Run the `config` command: display paths, model, and API key status.
pub fn run_config() {
    let config_dir = paths::config_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string());
    let cache_dir = paths::cache_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string());

    println!("Config:       {}", config_dir);
    println!("Cache:        {}", cache_dir);

    match config::load() {
        Ok(c) => {
            let last_model = persistence::load_last_model();
            match setup::available_models(&c).and_then(|models| {
                setup::resolve_initial_model(&models, &c, None, last_model.as_deref())
                    .map(|(m, source)| format!("{} ({})", m.id, source.describe()))
            }) {
                Ok(line) => println!("Model:        {}", line),
                Err(e) => println!("Model:        {}", e),
            }
            println!("Temperature:  {}", c.temperature);
            println!("Timeout:      {}s", c.timeout.as_secs());
        }
        Err(ConfigError::MissingApiKey) => {}
        Err(e) => println!("Config error: {}", e),
    }

    for key in ProviderKey::ALL {
        let status = if config::has_api_key(key) {
            "set ✓"
        } else {
            "not set"
        };
        println!("{:<13} {}", format!("{} key:", key), status);
    }
}

/// Run the `models` command: list built-in models and whether they are usable.
pub fn run_models(query: Option<&str>) {
    let registry = ModelRegistry::builtin();
    let filtered = registry.filter(query.unwrap_or(""));
    if filtered.is_empty() {
        println!("No models found.");
        return;
    }
    print!("{}", format_model_table(&filtered, config::has_api_key));
    println!("\n{} model(s) listed", filtered.len());
}

fn format_model_table<F>(models: &[&Model], available: F) -> String
where
    F: Fn(ProviderKey) -> bool,
{
    let id_w = models.iter().map(|m| m.id.len()).max().unwrap_or(0).max(20);
    let name_w = models
        .iter()
        .map(|m| m.display_name.len())
        .max()
        .unwrap_or(0)
        .max(20);

    let mut out = format!(
        "{:<id_w$}  {:<name_w$}  {:<8}  {:>10}  {}\n",
        "ID", "Name", "Provider", "Max tokens", "Status"
    );
    out.push_str(&format!(
        "{}  {}  --------  ----------  ------\n",
        "-".repeat(id_w),
        "-".repeat(name_w)
    ));
    for m in models {
        let status = if available(m.provider) {
            "ready"
        } else {
            "no key"
        };
        out.push_str(&format!(
            "{:<id_w$}  {:<name_w$}  {:<8}  {:>10}  {}\n",
            m.id, m.display_name, m.provider, m.max_output_tokens, status
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_table_marks_providers_without_keys() {
        let registry = ModelRegistry::builtin();
        let models: Vec<&Model> = registry.list().iter().collect();
        let table = format_model_table(&models, |key| key == ProviderKey::Groq);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2 + models.len());
        assert!(lines[0].starts_with("ID"));
        let grok = lines.iter().find(|l| l.starts_with("grok-beta")).unwrap();
        assert!(grok.ends_with("no key"));
        assert!(grok.contains("xai"));
        let mixtral = lines
            .iter()
            .find(|l| l.starts_with("mixtral-8x7b-32768"))
            .unwrap();
        assert!(mixtral.contains("32768"));
        assert!(mixtral.ends_with("ready"));
    }
}
