use std::path::PathBuf;

use snafu::Snafu;

/// Structural failures of a bulk load. Anything recoverable (a malformed row,
/// a dangling foreign key) is absorbed by the loaders and the catalog instead
/// of surfacing here.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LoadError {
    #[snafu(display("could not read dataset file {}: {}", path.display(), source))]
    DatasetFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("malformed csv in {}: {}", path.display(), source))]
    MalformedCsv { path: PathBuf, source: csv::Error },

    #[snafu(display("could not open database {}: {}", url, source))]
    DbConnect {
        url: String,
        source: diesel::ConnectionError,
    },

    #[snafu(display("query against table '{}' failed: {}", table, source))]
    DbQuery {
        table: &'static str,
        source: diesel::result::Error,
    },

    #[snafu(display("statement against table '{}' failed: {}", table, source))]
    DbStatement {
        table: &'static str,
        source: diesel::result::Error,
    },

    #[snafu(display("request to {} failed: {}", url, source))]
    ApiRequest { url: String, source: reqwest::Error },

    #[snafu(display("unexpected payload from {}: {}", url, source))]
    ApiPayload {
        url: String,
        source: serde_json::Error,
    },
}
