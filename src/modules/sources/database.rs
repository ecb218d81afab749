use std::collections::HashMap;

use diesel::prelude::*;
use diesel::SqliteConnection;
use log::warn;
use snafu::ResultExt;

use crate::errors::{DbConnectSnafu, DbQuerySnafu, LoadError};
use crate::modules::catalog::{RecordBundle, RecordSource};
use crate::modules::helpers::fields::Fields;
use crate::modules::models::circuit::Circuit;
use crate::modules::models::constructor::Constructor;
use crate::modules::models::driver::Driver;
use crate::modules::models::race::Race;
use crate::modules::models::race_result::RaceResult;
use crate::modules::models::season::Season;
use crate::modules::models::status::Status;
use crate::schema;

pub fn establish_connection(database_url: &str) -> Result<SqliteConnection, LoadError> {
    SqliteConnection::establish(database_url).context(DbConnectSnafu {
        url: database_url.to_string(),
    })
}

/// Loads the whole dataset from the local SQLite database with one full-table
/// query per collection. A missing table or a failed query fails the load;
/// a row whose stored date does not parse is skipped with a warning.
pub struct DbSource {
    database_url: String,
}

impl DbSource {
    pub fn new(database_url: impl Into<String>) -> DbSource {
        DbSource {
            database_url: database_url.into(),
        }
    }
}

impl RecordSource for DbSource {
    fn fetch(&self) -> Result<RecordBundle, LoadError> {
        let conn = &mut establish_connection(&self.database_url)?;

        let circuit_rows: Vec<CircuitRow> = schema::circuits::table
            .load(conn)
            .context(DbQuerySnafu { table: "circuits" })?;
        let constructor_rows: Vec<ConstructorRow> = schema::constructors::table
            .load(conn)
            .context(DbQuerySnafu { table: "constructors" })?;
        let driver_rows: Vec<DriverRow> = schema::drivers::table
            .load(conn)
            .context(DbQuerySnafu { table: "drivers" })?;
        let race_rows: Vec<RaceRow> = schema::races::table
            .load(conn)
            .context(DbQuerySnafu { table: "races" })?;
        let result_rows: Vec<ResultRow> = schema::results::table
            .load(conn)
            .context(DbQuerySnafu { table: "results" })?;
        let status_rows: Vec<StatusRow> = schema::status::table
            .load(conn)
            .context(DbQuerySnafu { table: "status" })?;
        let season_rows: Vec<SeasonRow> = schema::seasons::table
            .load(conn)
            .context(DbQuerySnafu { table: "seasons" })?;

        let mut bundle = RecordBundle {
            circuits: circuit_rows
                .into_iter()
                .map(|row| {
                    let circuit = row.into_circuit();
                    (circuit.id.clone(), circuit)
                })
                .collect(),
            constructors: constructor_rows
                .into_iter()
                .map(|row| {
                    let constructor = row.into_constructor();
                    (constructor.id.clone(), constructor)
                })
                .collect(),
            drivers: driver_rows
                .into_iter()
                .map(|row| {
                    let driver = row.into_driver();
                    (driver.id.clone(), driver)
                })
                .collect(),
            statuses: status_rows
                .into_iter()
                .map(|row| {
                    let status = row.into_status();
                    (status.id.clone(), status)
                })
                .collect(),
            seasons: season_rows
                .into_iter()
                .map(|row| (row.year, row.into_season()))
                .collect::<HashMap<i32, Season>>(),
            races: Vec::new(),
            results: Vec::new(),
        };

        for row in race_rows {
            match row.into_race() {
                Ok(race) => bundle.races.push(race),
                Err(reason) => {
                    warn!(target: "db_source", "skipping race row: {reason}");
                }
            }
        }
        bundle.results = result_rows.into_iter().map(ResultRow::into_result).collect();

        Ok(bundle)
    }

    fn describe(&self) -> String {
        format!("sqlite database at {}", self.database_url)
    }
}

#[derive(Queryable, Debug)]
struct CircuitRow {
    circuit_id: i32,
    circuit_ref: String,
    name: String,
    location: String,
    country: String,
    lat: String,
    lng: String,
    alt: Option<String>,
    url: String,
}

impl CircuitRow {
    fn into_circuit(self) -> Circuit {
        Circuit {
            id: self.circuit_id.to_string(),
            circuit_ref: self.circuit_ref,
            name: self.name,
            location: self.location,
            country: self.country,
            lat: self.lat,
            lng: self.lng,
            alt: self.alt,
            url: self.url,
        }
    }
}

#[derive(Queryable, Debug)]
struct ConstructorRow {
    constructor_id: i32,
    constructor_ref: String,
    name: String,
    nationality: String,
    url: String,
}

impl ConstructorRow {
    fn into_constructor(self) -> Constructor {
        Constructor {
            id: self.constructor_id.to_string(),
            constructor_ref: self.constructor_ref,
            name: self.name,
            nationality: self.nationality,
            url: self.url,
        }
    }
}

#[derive(Queryable, Debug)]
struct DriverRow {
    driver_id: i32,
    driver_ref: String,
    number: Option<String>,
    code: Option<String>,
    forename: String,
    surname: String,
    dob: Option<String>,
    nationality: String,
    url: String,
}

impl DriverRow {
    fn into_driver(self) -> Driver {
        Driver {
            id: self.driver_id.to_string(),
            driver_ref: self.driver_ref,
            number: self.number,
            code: self.code,
            forename: self.forename,
            surname: self.surname,
            dob: self.dob.as_deref().and_then(Fields::lenient_date),
            nationality: self.nationality,
            url: self.url,
        }
    }
}

#[derive(Queryable, Debug)]
struct RaceRow {
    race_id: i32,
    year: i32,
    round: i32,
    circuit_id: i32,
    name: String,
    date: String,
    time: Option<String>,
    url: Option<String>,
    fp1_date: Option<String>,
    fp1_time: Option<String>,
    fp2_date: Option<String>,
    fp2_time: Option<String>,
    fp3_date: Option<String>,
    fp3_time: Option<String>,
    quali_date: Option<String>,
    quali_time: Option<String>,
    sprint_date: Option<String>,
    sprint_time: Option<String>,
}

impl RaceRow {
    fn into_race(self) -> Result<Race, String> {
        let date = Fields::parse_date(&self.date, "date")
            .map_err(|reason| format!("race {}: {reason}", self.race_id))?;
        Ok(Race {
            id: self.race_id.to_string(),
            year: self.year,
            round: self.round.to_string(),
            circuit_id: self.circuit_id.to_string(),
            name: self.name,
            date,
            time: self.time,
            url: self.url,
            first_practice: Race::session(self.fp1_date, self.fp1_time),
            second_practice: Race::session(self.fp2_date, self.fp2_time),
            third_practice: Race::session(self.fp3_date, self.fp3_time),
            qualifying: Race::session(self.quali_date, self.quali_time),
            sprint: Race::session(self.sprint_date, self.sprint_time),
        })
    }
}

#[derive(Queryable, Debug)]
struct ResultRow {
    result_id: i32,
    race_id: i32,
    driver_id: i32,
    constructor_id: i32,
    number: Option<String>,
    grid: i32,
    position: Option<i32>,
    position_text: String,
    position_order: i32,
    points: f32,
    laps: i32,
    time: Option<String>,
    milliseconds: Option<i64>,
    fastest_lap: Option<i32>,
    rank: Option<i32>,
    fastest_lap_time: Option<String>,
    fastest_lap_speed: Option<String>,
    status_id: i32,
}

impl ResultRow {
    fn into_result(self) -> RaceResult {
        RaceResult {
            id: self.result_id.to_string(),
            race_id: self.race_id.to_string(),
            driver_id: self.driver_id.to_string(),
            constructor_id: self.constructor_id.to_string(),
            number: self.number,
            grid: self.grid,
            position: self.position,
            position_text: self.position_text,
            position_order: self.position_order,
            points: self.points,
            laps: self.laps,
            time: self.time,
            milliseconds: self.milliseconds,
            fastest_lap: self.fastest_lap,
            rank: self.rank,
            fastest_lap_time: self.fastest_lap_time,
            fastest_lap_speed: self.fastest_lap_speed,
            status_id: self.status_id.to_string(),
        }
    }
}

#[derive(Queryable, Debug)]
struct StatusRow {
    status_id: i32,
    description: String,
}

impl StatusRow {
    fn into_status(self) -> Status {
        Status {
            id: self.status_id.to_string(),
            description: self.description,
        }
    }
}

#[derive(Queryable, Debug)]
struct SeasonRow {
    year: i32,
    url: String,
}

impl SeasonRow {
    fn into_season(self) -> Season {
        Season {
            year: self.year,
            url: self.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;
    use tempfile::tempdir;

    use crate::models::{NewCircuit, NewRace, NewResult, NewStatus};
    use crate::modules::importer;
    use crate::schema;

    use super::*;

    fn seeded_db(path: &str) {
        let conn = &mut establish_connection(path).unwrap();
        importer::create_tables(conn).unwrap();

        diesel::insert_into(schema::circuits::table)
            .values(&NewCircuit {
                circuit_id: 1,
                circuit_ref: "monza".to_string(),
                name: "Monza".to_string(),
                location: "Monza".to_string(),
                country: "Italy".to_string(),
                lat: "45.6156".to_string(),
                lng: "9.28111".to_string(),
                alt: None,
                url: String::new(),
            })
            .execute(conn)
            .unwrap();

        diesel::insert_into(schema::races::table)
            .values(&NewRace {
                race_id: 7,
                year: 2021,
                round: 14,
                circuit_id: 1,
                name: "Italian Grand Prix".to_string(),
                date: "2021-09-12".to_string(),
                time: Some("13:00:00".to_string()),
                url: None,
                fp1_date: Some("2021-09-10".to_string()),
                fp1_time: Some("12:30:00".to_string()),
                fp2_date: None,
                fp2_time: None,
                fp3_date: None,
                fp3_time: None,
                quali_date: None,
                quali_time: None,
                sprint_date: None,
                sprint_time: None,
            })
            .execute(conn)
            .unwrap();

        diesel::insert_into(schema::results::table)
            .values(&NewResult {
                result_id: 100,
                race_id: 7,
                driver_id: 3,
                constructor_id: 4,
                number: Some("3".to_string()),
                grid: 2,
                position: None,
                position_text: "R".to_string(),
                position_order: 18,
                points: 0.0,
                laps: 25,
                time: None,
                milliseconds: None,
                fastest_lap: None,
                rank: None,
                fastest_lap_time: None,
                fastest_lap_speed: None,
                status_id: 2,
            })
            .execute(conn)
            .unwrap();

        diesel::insert_into(schema::status::table)
            .values(&NewStatus {
                status_id: 2,
                description: "Retired".to_string(),
            })
            .execute(conn)
            .unwrap();
    }

    #[test]
    fn fetch_maps_rows_to_domain_records() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("f1.db");
        let url = db_path.to_str().unwrap().to_string();
        seeded_db(&url);

        let bundle = DbSource::new(&url).fetch().unwrap();

        assert_eq!(bundle.circuits["1"].name, "Monza");

        let race = &bundle.races[0];
        assert_eq!(race.id, "7");
        assert_eq!(race.round, "14");
        assert!(race.first_practice.is_some());
        assert!(race.sprint.is_none());

        let result = &bundle.results[0];
        assert_eq!(result.race_id, "7");
        assert_eq!(result.position, None);
        assert_eq!(result.position_text, "R");
        assert_eq!(bundle.statuses["2"].description, "Retired");
    }

    #[test]
    fn missing_tables_fail_the_load() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("empty.db");
        let url = db_path.to_str().unwrap().to_string();
        // touch the file so the connection succeeds but no tables exist
        establish_connection(&url).unwrap();

        let err = DbSource::new(&url).fetch().unwrap_err();
        assert!(matches!(err, LoadError::DbQuery { .. }));
    }
}
