use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Schema bootstrap, idempotent
const SCHEMA: &[(&str, &str)] = &[
    (
        "a001_topic",
        r#"
        CREATE TABLE IF NOT EXISTS a001_topic (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id TEXT NOT NULL,
            type TEXT NOT NULL,
            create_timestamp TEXT,
            update_timestamp TEXT,
            UNIQUE (type, source_id)
        );
        "#,
    ),
    (
        "a002_credential",
        r#"
        CREATE TABLE IF NOT EXISTS a002_credential (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            topic_id INTEGER NOT NULL REFERENCES a001_topic(id),
            credential_type_id INTEGER NOT NULL,
            credential_type_description TEXT NOT NULL,
            issuer_id INTEGER NOT NULL,
            issuer_name TEXT NOT NULL,
            effective_date TEXT,
            revoked INTEGER NOT NULL DEFAULT 0,
            revoked_date TEXT,
            inactive INTEGER NOT NULL DEFAULT 0,
            latest INTEGER NOT NULL DEFAULT 1
        );
        "#,
    ),
    (
        "a001_topic_name",
        r#"
        CREATE TABLE IF NOT EXISTS a001_topic_name (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            topic_id INTEGER NOT NULL REFERENCES a001_topic(id),
            credential_id INTEGER REFERENCES a002_credential(id),
            text TEXT NOT NULL,
            language TEXT
        );
        "#,
    ),
    (
        "a002_credential_category",
        r#"
        CREATE TABLE IF NOT EXISTS a002_credential_category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            credential_id INTEGER NOT NULL REFERENCES a002_credential(id),
            type TEXT NOT NULL,
            value TEXT NOT NULL
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_a002_credential_topic ON a002_credential(topic_id);",
    "CREATE INDEX IF NOT EXISTS idx_a001_topic_name_topic ON a001_topic_name(topic_id);",
    "CREATE INDEX IF NOT EXISTS idx_a001_topic_name_credential ON a001_topic_name(credential_id);",
    "CREATE INDEX IF NOT EXISTS idx_a002_credential_category_credential ON a002_credential_category(credential_id);",
];

fn sqlite_url(db_file: &Path) -> anyhow::Result<String> {
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = sqlite_url(db_file)?;
    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    for (table, sql) in SCHEMA {
        tracing::debug!("Ensuring table {}", table);
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    for sql in INDEXES {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
