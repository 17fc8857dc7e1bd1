use std::path::{Path, PathBuf};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Фильтр по умолчанию: логи приложения без SQL запросов
pub const DEFAULT_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

/// `RUST_LOG` if set and non-empty, otherwise [`DEFAULT_FILTER`]
pub fn log_filter(env_value: Option<&str>) -> String {
    env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Директория логов: `logs/` рядом с исполняемым файлом, иначе `target/logs`
pub fn log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("logs")))
        .unwrap_or_else(|| Path::new("target").join("logs"))
}

/// Инициализация системы трассировки (tracing)
///
/// Логи пишутся в:
/// - stdout (с цветами)
/// - logs/backend.log (без цветов)
pub fn initialize() -> anyhow::Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).map_err(|e| {
        anyhow::anyhow!("Cannot create log directory {}: {}", log_dir.display(), e)
    })?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .map_err(|e| anyhow::anyhow!("Cannot open log file {}: {}", log_file_path.display(), e))?;

    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&filter))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    tracing::info!(
        "Logging initialized (filter: {}, file: {})",
        filter,
        log_file_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(None), DEFAULT_FILTER);
        assert_eq!(log_filter(Some("  ")), DEFAULT_FILTER);
        assert_eq!(log_filter(Some("debug")), "debug");
    }
}
