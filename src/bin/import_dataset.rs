use std::path::Path;

use log::{error, info};

use f1_race_catalog::modules::helpers::logging::setup_logging;
use f1_race_catalog::modules::helpers::settings::Settings;
use f1_race_catalog::modules::importer::{create_tables, import_dataset};
use f1_race_catalog::modules::sources::database::establish_connection;

/// Builds (or rebuilds) the local SQLite database from the CSV dataset
/// directory so the catalog can run against `F1_SOURCE=db`.
fn main() {
    setup_logging().expect("failed to setup logging");
    let settings = Settings::from_env();

    info!(
        target: "import_dataset",
        "importing {} into {}",
        settings.dataset_dir,
        settings.database_url
    );

    let conn = &mut match establish_connection(&settings.database_url) {
        Ok(conn) => conn,
        Err(err) => {
            error!(target: "import_dataset", "{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = create_tables(conn) {
        error!(target: "import_dataset", "could not create tables: {err}");
        std::process::exit(1);
    }

    match import_dataset(conn, Path::new(&settings.dataset_dir)) {
        Ok(counts) => {
            info!(
                target: "import_dataset",
                "done: {} races, {} results imported",
                counts.races,
                counts.results
            );
        }
        Err(err) => {
            error!(target: "import_dataset", "import failed: {err}");
            std::process::exit(1);
        }
    }
}
