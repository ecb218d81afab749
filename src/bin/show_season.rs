use std::env;

use log::error;

use f1_race_catalog::modules::catalog::{RecordSource, SeasonCatalog, SeasonRace};
use f1_race_catalog::modules::helpers::fields::Fields;
use f1_race_catalog::modules::helpers::logging::setup_logging;
use f1_race_catalog::modules::helpers::settings::{Settings, SourceKind};
use f1_race_catalog::modules::models::race::Session;
use f1_race_catalog::modules::sources::csv_file::CsvSource;
use f1_race_catalog::modules::sources::database::DbSource;
use f1_race_catalog::modules::sources::web_api::ApiSource;

/// Text front end for the season catalog: prints the calendar, the results of
/// every race, and the driver/constructor tables for one season. The backing
/// source is picked through `F1_SOURCE` (csv, db or api).
fn main() {
    setup_logging().expect("failed to setup logging");
    let settings = Settings::from_env();

    let year_arg = match env::args().nth(1) {
        Some(text) => text,
        None => {
            eprintln!("usage: show_season <year>");
            std::process::exit(2);
        }
    };
    let year = match Fields::season_year(&year_arg) {
        Ok(year) => year,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    let source: Box<dyn RecordSource> = match settings.source {
        SourceKind::CsvFiles => Box::new(CsvSource::new(&settings.dataset_dir)),
        SourceKind::Database => Box::new(DbSource::new(&settings.database_url)),
        SourceKind::WebApi => Box::new(ApiSource::new(&settings.api_base_url)),
    };

    let mut catalog = SeasonCatalog::new();
    if let Err(err) = catalog.load(source.as_ref()) {
        error!(target: "show_season", "failed to load dataset: {err}");
        std::process::exit(1);
    }

    let races = catalog.races_for_season(year);
    if races.is_empty() {
        // a valid outcome, not a failure
        println!("No races found for season {year} in the dataset.");
        return;
    }

    println!("=== Formula 1 {year} ===");
    println!("Season info: {}", catalog.season_url(year));

    for season_race in &races {
        print_race(&catalog, season_race);
    }

    println!("\n--- Drivers ({year}) ---");
    for driver in catalog.drivers_for_season(year) {
        println!(
            "  {:<25} {:<4} {:<4} {}",
            driver.full_name(),
            driver.code.as_deref().unwrap_or("N/A"),
            driver.number.as_deref().unwrap_or("N/A"),
            driver.nationality
        );
    }

    println!("\n--- Constructors ({year}) ---");
    for constructor in catalog.constructors_for_season(year) {
        println!("  {:<25} {}", constructor.name, constructor.nationality);
    }
}

fn print_race(catalog: &SeasonCatalog, season_race: &SeasonRace) {
    let race = &season_race.race;
    let circuit = &season_race.circuit;

    println!("\nRound {}: {}", race.round, race.name);
    println!(
        "  {} — {} ({}, {})",
        race.date, circuit.name, circuit.location, circuit.country
    );
    print_session("First Practice", &race.first_practice);
    print_session("Second Practice", &race.second_practice);
    print_session("Third Practice", &race.third_practice);
    print_session("Qualifying", &race.qualifying);
    print_session("Sprint", &race.sprint);

    for resolved in catalog.results_for_race(&race.id) {
        let time_or_status = resolved
            .result
            .time
            .clone()
            .unwrap_or_else(|| resolved.status.description.clone());
        println!(
            "  {:>3}  {:<25} {:<15} {:>3} laps  {:>5.1} pts  {}",
            resolved.result.display_position(),
            resolved.driver.full_name(),
            resolved.constructor.name,
            resolved.result.laps,
            resolved.result.points,
            time_or_status
        );
    }
}

fn print_session(label: &str, session: &Option<Session>) {
    if let Some(session) = session {
        println!(
            "  {label}: {} {}",
            session.date,
            session.time.as_deref().unwrap_or("")
        );
    }
}
