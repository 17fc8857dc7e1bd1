use serde::{Deserialize, Serialize};

/// Настройки отображения, которые backend отдаёт клиенту (`GET /api/v2/config`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Timezone for displayed dates: `UTC`, `+HHMM`, `+HH:MM` or an IANA name
    #[serde(default)]
    pub display_timezone: Option<String>,
    /// Topic type used when the route carries only a source id
    #[serde(default)]
    pub default_topic_type: Option<String>,
}
