use crate::config::types::{BrowserConfig, Config, CrawlerConfig, GateConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_gate_config(&config.gate)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl loop configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth = 0 is legal: crawl only the root page

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.page_load_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "page_load_attempts must be >= 1, got {}",
            config.page_load_attempts
        )));
    }

    if config.interactive_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "interactive_attempts must be >= 1, got {}",
            config.interactive_attempts
        )));
    }

    // 2^attempt units must stay representable
    if config.page_load_attempts > 16 || config.interactive_attempts > 16 {
        return Err(ConfigError::Validation(
            "attempt counts above 16 are not supported".to_string(),
        ));
    }

    validate_selector("interactive_selector", &config.interactive_selector)?;

    if let Some(trigger) = &config.interactive_trigger {
        validate_selector("interactive_trigger", trigger)?;
    }

    Ok(())
}

/// Validates browser session configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("visibility_timeout_ms", config.visibility_timeout_ms),
        ("network_idle_timeout_ms", config.network_idle_timeout_ms),
        ("navigation_timeout_ms", config.navigation_timeout_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!("{} must be > 0", name)));
        }
    }

    if let Some(executable) = &config.executable {
        if executable.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "executable cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates pre-check configuration
fn validate_gate_config(config: &GateConfig) -> Result<(), ConfigError> {
    if config.requests_per_second < 1 {
        return Err(ConfigError::Validation(format!(
            "requests_per_second must be >= 1, got {}",
            config.requests_per_second
        )));
    }

    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation("timeout_ms must be > 0".to_string()));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a CSS selector the same way the markup parser will read it
fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }

    scraper::Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!("{} '{}' is not a valid selector: {:?}", name, selector, e))
    })?;

    Ok(())
}
