// file: src/utils/logging.rs
// description: Tracing subscriber initialization with optional ANSI coloring

use crate::models::{Notice, NoticeLevel};
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    colored::control::set_override(colored_output);
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_step(step: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", step, total).cyan().bold(), msg)
}

pub fn format_heading(msg: &str) -> String {
    format!("{}", msg.bold().underline())
}

pub fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format_success(&notice.message),
        NoticeLevel::Info => format_info(&notice.message),
        NoticeLevel::Warning => format_warning(&notice.message),
        NoticeLevel::Error => format_error(&notice.message),
    }
}
