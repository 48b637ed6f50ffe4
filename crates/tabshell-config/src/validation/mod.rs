//! Full configuration validation.
//!
//! Every check pushes into one error list so a bad file reports all of its
//! problems at once.

mod helpers;


use tabshell_common::ConfigError;

use crate::schema::ShellConfig;
use helpers::{is_scheme_name, validate_not_blank, validate_range, validate_url_scheme};

/// Schemes that would let content escape isolation.
const FORBIDDEN_SCHEMES: &[&str] = &["javascript", "data", "file"];

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ShellConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_tabs(&mut errors, config);
    validate_content(&mut errors, config);
    validate_ui(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_window(errors: &mut Vec<String>, config: &ShellConfig) {
    let w = &config.window;
    validate_range(errors, "window.initial_width", w.initial_width, 320, 7680);
    validate_range(errors, "window.initial_height", w.initial_height, 240, 4320);
    validate_range(errors, "window.ui_height", w.ui_height, 32, 400);
    validate_range(errors, "window.sidebar_width", w.sidebar_width, 100, 1000);
}

fn validate_tabs(errors: &mut Vec<String>, config: &ShellConfig) {
    let t = &config.tabs;
    validate_not_blank(errors, "tabs.initial_tab_id", &t.initial_tab_id);
    validate_not_blank(errors, "tabs.default_title", &t.default_title);
    let allowed: Vec<&str> = config
        .content
        .allowed_schemes
        .iter()
        .map(String::as_str)
        .collect();
    validate_url_scheme(errors, "tabs.default_url", &t.default_url, &allowed);
}

fn validate_content(errors: &mut Vec<String>, config: &ShellConfig) {
    let schemes = &config.content.allowed_schemes;
    if schemes.is_empty() {
        errors.push("content.allowed_schemes must not be empty".into());
    }
    for scheme in schemes {
        if !is_scheme_name(scheme) {
            errors.push(format!("content.allowed_schemes: {scheme:?} is not a scheme name"));
        } else if FORBIDDEN_SCHEMES
            .iter()
            .any(|f| f.eq_ignore_ascii_case(scheme))
        {
            errors.push(format!("content.allowed_schemes: {scheme:?} is not permitted"));
        }
    }
    if let Some(ua) = &config.content.user_agent {
        validate_not_blank(errors, "content.user_agent", ua);
    }
}

fn validate_ui(errors: &mut Vec<String>, config: &ShellConfig) {
    if let Some(url) = &config.ui.dev_server_url {
        validate_url_scheme(errors, "ui.dev_server_url", url, &["http", "https"]);
    }
}
