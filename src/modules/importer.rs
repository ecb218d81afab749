use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::{info, warn};
use snafu::ResultExt;

use crate::errors::{DbStatementSnafu, LoadError};
use crate::models::{
    NewCircuit, NewConstructor, NewDriver, NewRace, NewResult, NewSeason, NewStatus,
};
use crate::modules::catalog::RecordSource;
use crate::modules::helpers::fields::Fields;
use crate::modules::models::race::Session;
use crate::modules::sources::csv_file::CsvSource;
use crate::schema;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// sqlite caps bound variables per statement; stay well under it even for the
// 18-column results table
const INSERT_CHUNK: usize = 250;

#[derive(Debug, Default, PartialEq)]
pub struct ImportCounts {
    pub circuits: usize,
    pub constructors: usize,
    pub drivers: usize,
    pub seasons: usize,
    pub statuses: usize,
    pub races: usize,
    pub results: usize,
}

pub fn create_tables(conn: &mut SqliteConnection) -> Result<(), LoadError> {
    conn.batch_execute(SCHEMA_SQL)
        .context(DbStatementSnafu { table: "schema" })
}

/// Rebuilds the database content from a CSV dataset directory: reads every
/// collection through the CSV source, then bulk-inserts in dependency order.
/// Rows whose ids or rounds are not numeric cannot be stored and are skipped
/// with a warning.
pub fn import_dataset(
    conn: &mut SqliteConnection,
    dataset_dir: &Path,
) -> Result<ImportCounts, LoadError> {
    let bundle = CsvSource::new(dataset_dir).fetch()?;

    let mut counts = ImportCounts::default();

    let circuits: Vec<NewCircuit> = bundle
        .circuits
        .into_values()
        .filter_map(|circuit| {
            let circuit_id = numeric_id(&circuit.id, "circuit")?;
            Some(NewCircuit {
                circuit_id,
                circuit_ref: circuit.circuit_ref,
                name: circuit.name,
                location: circuit.location,
                country: circuit.country,
                lat: circuit.lat,
                lng: circuit.lng,
                alt: circuit.alt,
                url: circuit.url,
            })
        })
        .collect();
    for chunk in circuits.chunks(INSERT_CHUNK) {
        diesel::insert_into(schema::circuits::table)
            .values(chunk)
            .execute(conn)
            .context(DbStatementSnafu { table: "circuits" })?;
    }
    counts.circuits = circuits.len();

    let constructors: Vec<NewConstructor> = bundle
        .constructors
        .into_values()
        .filter_map(|constructor| {
            let constructor_id = numeric_id(&constructor.id, "constructor")?;
            Some(NewConstructor {
                constructor_id,
                constructor_ref: constructor.constructor_ref,
                name: constructor.name,
                nationality: constructor.nationality,
                url: constructor.url,
            })
        })
        .collect();
    for chunk in constructors.chunks(INSERT_CHUNK) {
        diesel::insert_into(schema::constructors::table)
            .values(chunk)
            .execute(conn)
            .context(DbStatementSnafu { table: "constructors" })?;
    }
    counts.constructors = constructors.len();

    let drivers: Vec<NewDriver> = bundle
        .drivers
        .into_values()
        .filter_map(|driver| {
            let driver_id = numeric_id(&driver.id, "driver")?;
            Some(NewDriver {
                driver_id,
                driver_ref: driver.driver_ref,
                number: driver.number,
                code: driver.code,
                forename: driver.forename,
                surname: driver.surname,
                dob: driver.dob.map(|dob| dob.format("%Y-%m-%d").to_string()),
                nationality: driver.nationality,
                url: driver.url,
            })
        })
        .collect();
    for chunk in drivers.chunks(INSERT_CHUNK) {
        diesel::insert_into(schema::drivers::table)
            .values(chunk)
            .execute(conn)
            .context(DbStatementSnafu { table: "drivers" })?;
    }
    counts.drivers = drivers.len();

    let seasons: Vec<NewSeason> = bundle
        .seasons
        .into_values()
        .map(|season| NewSeason {
            year: season.year,
            url: season.url,
        })
        .collect();
    for chunk in seasons.chunks(INSERT_CHUNK) {
        diesel::insert_into(schema::seasons::table)
            .values(chunk)
            .execute(conn)
            .context(DbStatementSnafu { table: "seasons" })?;
    }
    counts.seasons = seasons.len();

    let statuses: Vec<NewStatus> = bundle
        .statuses
        .into_values()
        .filter_map(|status| {
            let status_id = numeric_id(&status.id, "status")?;
            Some(NewStatus {
                status_id,
                description: status.description,
            })
        })
        .collect();
    for chunk in statuses.chunks(INSERT_CHUNK) {
        diesel::insert_into(schema::status::table)
            .values(chunk)
            .execute(conn)
            .context(DbStatementSnafu { table: "status" })?;
    }
    counts.statuses = statuses.len();

    let races: Vec<NewRace> = bundle
        .races
        .into_iter()
        .filter_map(|race| {
            let race_id = numeric_id(&race.id, "race")?;
            let circuit_id = numeric_id(&race.circuit_id, "race circuit")?;
            let round = match Fields::parse_i32(&race.round, "round") {
                Ok(round) => round,
                Err(reason) => {
                    warn!(target: "importer", "race {}: {reason}, skipping", race.id);
                    return None;
                }
            };
            let (fp1_date, fp1_time) = split_session(race.first_practice);
            let (fp2_date, fp2_time) = split_session(race.second_practice);
            let (fp3_date, fp3_time) = split_session(race.third_practice);
            let (quali_date, quali_time) = split_session(race.qualifying);
            let (sprint_date, sprint_time) = split_session(race.sprint);
            Some(NewRace {
                race_id,
                year: race.year,
                round,
                circuit_id,
                name: race.name,
                date: race.date.format("%Y-%m-%d").to_string(),
                time: race.time,
                url: race.url,
                fp1_date,
                fp1_time,
                fp2_date,
                fp2_time,
                fp3_date,
                fp3_time,
                quali_date,
                quali_time,
                sprint_date,
                sprint_time,
            })
        })
        .collect();
    for chunk in races.chunks(INSERT_CHUNK) {
        diesel::insert_into(schema::races::table)
            .values(chunk)
            .execute(conn)
            .context(DbStatementSnafu { table: "races" })?;
    }
    counts.races = races.len();

    let results: Vec<NewResult> = bundle
        .results
        .into_iter()
        .filter_map(|result| {
            Some(NewResult {
                result_id: numeric_id(&result.id, "result")?,
                race_id: numeric_id(&result.race_id, "result race")?,
                driver_id: numeric_id(&result.driver_id, "result driver")?,
                constructor_id: numeric_id(&result.constructor_id, "result constructor")?,
                number: result.number,
                grid: result.grid,
                position: result.position,
                position_text: result.position_text,
                position_order: result.position_order,
                points: result.points,
                laps: result.laps,
                time: result.time,
                milliseconds: result.milliseconds,
                fastest_lap: result.fastest_lap,
                rank: result.rank,
                fastest_lap_time: result.fastest_lap_time,
                fastest_lap_speed: result.fastest_lap_speed,
                status_id: numeric_id(&result.status_id, "result status")?,
            })
        })
        .collect();
    for chunk in results.chunks(INSERT_CHUNK) {
        diesel::insert_into(schema::results::table)
            .values(chunk)
            .execute(conn)
            .context(DbStatementSnafu { table: "results" })?;
    }
    counts.results = results.len();

    info!(
        target: "importer",
        "imported {} circuits, {} constructors, {} drivers, {} seasons, {} statuses, {} races, {} results",
        counts.circuits,
        counts.constructors,
        counts.drivers,
        counts.seasons,
        counts.statuses,
        counts.races,
        counts.results,
    );

    Ok(counts)
}

fn numeric_id(raw: &str, what: &str) -> Option<i32> {
    match raw.trim().parse::<i32>() {
        Ok(id) => Some(id),
        Err(_) => {
            warn!(target: "importer", "{what} id '{raw}' is not numeric, skipping row");
            None
        }
    }
}

fn split_session(session: Option<Session>) -> (Option<String>, Option<String>) {
    match session {
        Some(session) => (Some(session.date), session.time),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::modules::catalog::SeasonCatalog;
    use crate::modules::sources::database::{establish_connection, DbSource};

    use super::*;

    fn write_mini_dataset(dir: &Path) {
        fs::write(
            dir.join("circuits.csv"),
            "circuitId,circuitRef,name,location,country,lat,lng,alt,url\n\
             1,monza,Monza,Monza,Italy,45.6,9.2,162,http://example.com\n",
        )
        .unwrap();
        fs::write(
            dir.join("constructors.csv"),
            "constructorId,constructorRef,name,nationality,url\n\
             1,ferrari,Ferrari,Italian,http://example.com\n",
        )
        .unwrap();
        fs::write(
            dir.join("drivers.csv"),
            "driverId,driverRef,number,code,forename,surname,dob,nationality,url\n\
             1,leclerc,16,LEC,Charles,Leclerc,1997-10-16,Monegasque,http://example.com\n",
        )
        .unwrap();
        fs::write(
            dir.join("races.csv"),
            "raceId,year,round,circuitId,name,date,time,url\n\
             1,2021,1,1,Italian Grand Prix,2021-09-12,13:00:00,\\N\n",
        )
        .unwrap();
        fs::write(
            dir.join("results.csv"),
            "resultId,raceId,driverId,constructorId,number,grid,position,positionText,positionOrder,points,laps,time,milliseconds,fastestLap,rank,fastestLapTime,fastestLapSpeed,statusId\n\
             1,1,1,1,16,1,1,1,1,25,53,1:21:54.365,4914365,\\N,\\N,\\N,\\N,1\n",
        )
        .unwrap();
        fs::write(dir.join("status.csv"), "statusId,status\n1,Finished\n").unwrap();
        fs::write(
            dir.join("seasons.csv"),
            "year,url\n2021,http://example.com/2021\n",
        )
        .unwrap();
    }

    #[test]
    fn imported_database_round_trips_through_the_db_source() {
        let dir = tempdir().unwrap();
        write_mini_dataset(dir.path());
        let db_path = dir.path().join("f1.db");
        let url = db_path.to_str().unwrap().to_string();

        let conn = &mut establish_connection(&url).unwrap();
        create_tables(conn).unwrap();
        let counts = import_dataset(conn, dir.path()).unwrap();
        assert_eq!(counts.races, 1);
        assert_eq!(counts.results, 1);

        let mut catalog = SeasonCatalog::new();
        catalog.load(&DbSource::new(&url)).unwrap();

        let races = catalog.races_for_season(2021);
        assert_eq!(races.len(), 1);
        assert_eq!(races[0].circuit.name, "Monza");

        let results = catalog.results_for_race(&races[0].race.id);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].driver.surname, "Leclerc");
        assert_eq!(results[0].status.description, "Finished");
    }

    #[test]
    fn create_tables_is_repeatable() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("f1.db");
        let conn = &mut establish_connection(db_path.to_str().unwrap()).unwrap();
        create_tables(conn).unwrap();
        create_tables(conn).unwrap();
    }
}
