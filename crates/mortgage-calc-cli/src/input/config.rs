use std::fs;
use std::path::Path;

use mortgage_calc_core::CalculatorConfig;

/// Load the calculator configuration, or the defaults when no path is given.
///
/// `.yaml` / `.yml` files are read as YAML, everything else as JSON.
pub fn load_config(path: Option<&str>) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(CalculatorConfig::default());
    };

    let canonical = super::file::resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let is_yaml = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let config = if is_yaml {
        CalculatorConfig::from_yaml(&contents)?
    } else {
        CalculatorConfig::from_json(&contents)?
    };
    tracing::debug!(path = %canonical.display(), "loaded calculator config");
    Ok(config)
}
