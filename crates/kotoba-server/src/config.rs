use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use kotoba_db::models::PairRow;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub session_hours: i64,
    pub translate_api_key: Option<String>,
    pub translate_model: Option<String>,
    pub translate_base_url: Option<String>,
    pub pairs_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("KOTOBA_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("KOTOBA_JWT_SECRET is unset or still a placeholder");
        }

        let port = match get("KOTOBA_PORT") {
            Some(v) => v.parse().with_context(|| format!("invalid KOTOBA_PORT: {}", v))?,
            None => 3000,
        };
        let session_hours = match get("KOTOBA_SESSION_HOURS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("invalid KOTOBA_SESSION_HOURS: {}", v))?,
            None => 12,
        };
        if session_hours <= 0 {
            bail!("KOTOBA_SESSION_HOURS must be positive");
        }

        Ok(Self {
            host: get("KOTOBA_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: get("KOTOBA_DB_PATH").unwrap_or_else(|| "kotoba.db".into()).into(),
            jwt_secret,
            session_hours,
            translate_api_key: get("KOTOBA_TRANSLATE_API_KEY"),
            translate_model: get("KOTOBA_TRANSLATE_MODEL"),
            translate_base_url: get("KOTOBA_TRANSLATE_BASE_URL"),
            pairs_file: get("KOTOBA_PAIRS_FILE").map(PathBuf::from),
        })
    }
}

/// Read a `{ "student_id": "teacher_id" }` JSON object.
pub fn load_pairs(path: &Path) -> Result<Vec<PairRow>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading pairs file {}", path.display()))?;
    parse_pairs(&raw).with_context(|| format!("parsing pairs file {}", path.display()))
}

fn parse_pairs(raw: &str) -> Result<Vec<PairRow>> {
    let map: BTreeMap<String, String> = serde_json::from_str(raw)?;
    Ok(map
        .into_iter()
        .map(|(student_id, teacher_id)| PairRow {
            student_id,
            teacher_id,
        })
        .collect())
}
