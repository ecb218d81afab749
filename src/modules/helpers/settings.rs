use std::env;

use dotenvy::dotenv;

/// Which backing source the bootstrap wires the catalog to.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    CsvFiles,
    Database,
    WebApi,
}

/// Runtime configuration, read once from the environment (with `.env`
/// support) by the binaries. The library itself never touches env vars.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: SourceKind,
    pub dataset_dir: String,
    pub database_url: String,
    pub api_base_url: String,
}

impl Settings {
    pub fn from_env() -> Settings {
        dotenv().ok();

        let source = match env::var("F1_SOURCE").as_deref() {
            Ok("db") | Ok("database") => SourceKind::Database,
            Ok("api") | Ok("web") => SourceKind::WebApi,
            _ => SourceKind::CsvFiles,
        };

        Settings {
            source,
            dataset_dir: env::var("F1_DATASET_DIR").unwrap_or_else(|_| "dataset".to_string()),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "f1_data.db".to_string()),
            api_base_url: env::var("F1_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/f1".to_string()),
        }
    }
}
