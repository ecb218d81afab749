use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use log::{info, warn};
use snafu::ResultExt;

use crate::errors::{DatasetFileSnafu, LoadError};
use crate::modules::catalog::{RecordBundle, RecordSource};
use crate::modules::helpers::fields::Fields;
use crate::modules::models::circuit::Circuit;
use crate::modules::models::constructor::Constructor;
use crate::modules::models::driver::Driver;
use crate::modules::models::race::Race;
use crate::modules::models::race_result::RaceResult;
use crate::modules::models::season::Season;
use crate::modules::models::status::Status;

/// Loads the whole dataset from a directory of CSV dumps (`circuits.csv`,
/// `races.csv`, ...). A missing or unreadable file fails the load; a single
/// malformed row is skipped with a warning and the load continues.
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> CsvSource {
        CsvSource { dir: dir.into() }
    }
}

impl RecordSource for CsvSource {
    fn fetch(&self) -> Result<RecordBundle, LoadError> {
        let dir = self.dir.as_path();

        let circuits = read_keyed(dir, "circuits.csv", parse_circuit, |c: &Circuit| c.id.clone())?;
        let constructors = read_keyed(dir, "constructors.csv", parse_constructor, |c: &Constructor| {
            c.id.clone()
        })?;
        let drivers = read_keyed(dir, "drivers.csv", parse_driver, |d: &Driver| d.id.clone())?;
        let statuses = read_keyed(dir, "status.csv", parse_status, |s: &Status| s.id.clone())?;
        let races = read_rows(dir, "races.csv", parse_race)?;
        let results = read_rows(dir, "results.csv", parse_result)?;

        let seasons: HashMap<i32, Season> = read_rows(dir, "seasons.csv", parse_season)?
            .into_iter()
            .map(|season| (season.year, season))
            .collect();

        info!(target: "csv_source", "dataset read from {}", dir.display());

        Ok(RecordBundle {
            circuits,
            constructors,
            drivers,
            statuses,
            seasons,
            races,
            results,
        })
    }

    fn describe(&self) -> String {
        format!("csv dataset at {}", self.dir.display())
    }
}

fn read_rows<T>(
    dir: &Path,
    file: &str,
    parse: impl Fn(&StringRecord) -> Result<T, String>,
) -> Result<Vec<T>, LoadError> {
    let path = dir.join(file);
    let handle = File::open(&path).context(DatasetFileSnafu { path: path.clone() })?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(handle);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 2; // line 1 is the header
        let record = match record {
            Ok(record) => record,
            Err(source) => return Err(LoadError::MalformedCsv { path, source }),
        };
        match parse(&record) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                warn!(target: "csv_source", "skipping {file} line {line}: {reason}");
            }
        }
    }
    Ok(rows)
}

fn read_keyed<T>(
    dir: &Path,
    file: &str,
    parse: impl Fn(&StringRecord) -> Result<T, String>,
    key: impl Fn(&T) -> String,
) -> Result<HashMap<String, T>, LoadError> {
    let rows = read_rows(dir, file, parse)?;
    Ok(rows.into_iter().map(|row| (key(&row), row)).collect())
}

fn req(record: &StringRecord, index: usize, what: &str) -> Result<String, String> {
    match record.get(index) {
        Some(value) => Ok(value.to_string()),
        None => Err(format!("missing field '{what}' (column {index})")),
    }
}

fn opt(record: &StringRecord, index: usize) -> Option<String> {
    Fields::optional(record.get(index).unwrap_or(r"\N"))
}

fn parse_circuit(record: &StringRecord) -> Result<Circuit, String> {
    if record.len() < 9 {
        return Err(format!("expected 9 fields, got {}", record.len()));
    }
    Ok(Circuit {
        id: req(record, 0, "circuitId")?,
        circuit_ref: req(record, 1, "circuitRef")?,
        name: req(record, 2, "name")?,
        location: req(record, 3, "location")?,
        country: req(record, 4, "country")?,
        lat: req(record, 5, "lat")?,
        lng: req(record, 6, "lng")?,
        alt: opt(record, 7),
        url: req(record, 8, "url")?,
    })
}

fn parse_constructor(record: &StringRecord) -> Result<Constructor, String> {
    if record.len() < 5 {
        return Err(format!("expected 5 fields, got {}", record.len()));
    }
    Ok(Constructor {
        id: req(record, 0, "constructorId")?,
        constructor_ref: req(record, 1, "constructorRef")?,
        name: req(record, 2, "name")?,
        nationality: req(record, 3, "nationality")?,
        url: req(record, 4, "url")?,
    })
}

fn parse_driver(record: &StringRecord) -> Result<Driver, String> {
    if record.len() < 9 {
        return Err(format!("expected 9 fields, got {}", record.len()));
    }
    Ok(Driver {
        id: req(record, 0, "driverId")?,
        driver_ref: req(record, 1, "driverRef")?,
        number: opt(record, 2),
        code: opt(record, 3),
        forename: req(record, 4, "forename")?,
        surname: req(record, 5, "surname")?,
        dob: Fields::lenient_date(record.get(6).unwrap_or("")),
        nationality: req(record, 7, "nationality")?,
        url: req(record, 8, "url")?,
    })
}

// races.csv carries 8 core columns; the session sub-schedule (fp1..sprint)
// only exists in newer dumps, so those columns are read as optional.
fn parse_race(record: &StringRecord) -> Result<Race, String> {
    if record.len() < 8 {
        return Err(format!("expected at least 8 fields, got {}", record.len()));
    }
    Ok(Race {
        id: req(record, 0, "raceId")?,
        year: Fields::parse_i32(&req(record, 1, "year")?, "year")?,
        round: req(record, 2, "round")?,
        circuit_id: req(record, 3, "circuitId")?,
        name: req(record, 4, "name")?,
        date: Fields::parse_date(&req(record, 5, "date")?, "date")?,
        time: opt(record, 6),
        url: opt(record, 7),
        first_practice: Race::session(opt(record, 8), opt(record, 9)),
        second_practice: Race::session(opt(record, 10), opt(record, 11)),
        third_practice: Race::session(opt(record, 12), opt(record, 13)),
        qualifying: Race::session(opt(record, 14), opt(record, 15)),
        sprint: Race::session(opt(record, 16), opt(record, 17)),
    })
}

fn parse_result(record: &StringRecord) -> Result<RaceResult, String> {
    if record.len() < 18 {
        return Err(format!("expected 18 fields, got {}", record.len()));
    }
    Ok(RaceResult {
        id: req(record, 0, "resultId")?,
        race_id: req(record, 1, "raceId")?,
        driver_id: req(record, 2, "driverId")?,
        constructor_id: req(record, 3, "constructorId")?,
        number: opt(record, 4),
        grid: Fields::parse_i32(&req(record, 5, "grid")?, "grid")?,
        position: Fields::optional_i32(&req(record, 6, "position")?, "position")?,
        position_text: req(record, 7, "positionText")?,
        position_order: Fields::parse_i32(&req(record, 8, "positionOrder")?, "positionOrder")?,
        points: Fields::parse_f32(&req(record, 9, "points")?, "points")?,
        laps: Fields::parse_i32(&req(record, 10, "laps")?, "laps")?,
        time: opt(record, 11),
        milliseconds: Fields::optional_i64(&req(record, 12, "milliseconds")?, "milliseconds")?,
        fastest_lap: Fields::optional_i32(&req(record, 13, "fastestLap")?, "fastestLap")?,
        rank: Fields::optional_i32(&req(record, 14, "rank")?, "rank")?,
        fastest_lap_time: opt(record, 15),
        fastest_lap_speed: opt(record, 16),
        status_id: req(record, 17, "statusId")?,
    })
}

fn parse_status(record: &StringRecord) -> Result<Status, String> {
    if record.len() < 2 {
        return Err(format!("expected 2 fields, got {}", record.len()));
    }
    Ok(Status {
        id: req(record, 0, "statusId")?,
        description: req(record, 1, "status")?,
    })
}

fn parse_season(record: &StringRecord) -> Result<Season, String> {
    if record.len() < 2 {
        return Err(format!("expected 2 fields, got {}", record.len()));
    }
    Ok(Season {
        year: Fields::parse_i32(&req(record, 0, "year")?, "year")?,
        url: req(record, 1, "url")?,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;

    fn write_dataset(dir: &Path) {
        fs::write(
            dir.join("circuits.csv"),
            "circuitId,circuitRef,name,location,country,lat,lng,alt,url\n\
             1,monza,Autodromo Nazionale di Monza,Monza,Italy,45.6156,9.28111,162,http://example.com/monza\n\
             2,spa,Circuit de Spa-Francorchamps,Spa,Belgium,50.4372,5.97139,\\N,http://example.com/spa\n",
        )
        .unwrap();
        fs::write(
            dir.join("constructors.csv"),
            "constructorId,constructorRef,name,nationality,url\n\
             1,ferrari,Ferrari,Italian,http://example.com/ferrari\n",
        )
        .unwrap();
        fs::write(
            dir.join("drivers.csv"),
            "driverId,driverRef,number,code,forename,surname,dob,nationality,url\n\
             1,leclerc,16,LEC,Charles,Leclerc,1997-10-16,Monegasque,http://example.com/lec\n\
             2,fangio,\\N,\\N,Juan,Fangio,1911-06-24,Argentine,http://example.com/fangio\n",
        )
        .unwrap();
        fs::write(
            dir.join("races.csv"),
            "raceId,year,round,circuitId,name,date,time,url,fp1_date,fp1_time,fp2_date,fp2_time,fp3_date,fp3_time,quali_date,quali_time,sprint_date,sprint_time\n\
             1,2021,2,1,Italian Grand Prix,2021-09-12,13:00:00,http://example.com/italy,2021-09-10,12:30:00,2021-09-11,10:00:00,\\N,\\N,2021-09-10,16:00:00,2021-09-11,14:30:00\n\
             2,2021,1,2,Belgian Grand Prix,2021-08-29,13:00:00,\\N,\\N,\\N,\\N,\\N,\\N,\\N,\\N,\\N,\\N,\\N\n",
        )
        .unwrap();
        fs::write(
            dir.join("results.csv"),
            "resultId,raceId,driverId,constructorId,number,grid,position,positionText,positionOrder,points,laps,time,milliseconds,fastestLap,rank,fastestLapTime,fastestLapSpeed,statusId\n\
             1,1,1,1,16,3,1,1,1,25.5,53,1:21:54.365,4914365,50,1,1:24.812,246.6,1\n\
             2,1,2,1,\\N,5,\\N,R,2,0,12,\\N,\\N,\\N,\\N,\\N,\\N,2\n\
             3,1,2,1,\\N,not-a-grid,1,1,3,0,53,\\N,\\N,\\N,\\N,\\N,\\N,1\n",
        )
        .unwrap();
        fs::write(
            dir.join("status.csv"),
            "statusId,status\n1,Finished\n2,Retired\n",
        )
        .unwrap();
        fs::write(
            dir.join("seasons.csv"),
            "year,url\n2021,http://example.com/2021\n",
        )
        .unwrap();
    }

    #[test]
    fn fetch_reads_all_collections() {
        let dir = tempdir().unwrap();
        write_dataset(dir.path());

        let bundle = CsvSource::new(dir.path()).fetch().unwrap();
        assert_eq!(bundle.circuits.len(), 2);
        assert_eq!(bundle.constructors.len(), 1);
        assert_eq!(bundle.drivers.len(), 2);
        assert_eq!(bundle.races.len(), 2);
        assert_eq!(bundle.statuses.len(), 2);
        assert_eq!(bundle.seasons.len(), 1);

        // the row with a non-numeric grid is skipped, not fatal
        assert_eq!(bundle.results.len(), 2);
    }

    #[test]
    fn null_markers_decode_to_absent() {
        let dir = tempdir().unwrap();
        write_dataset(dir.path());

        let bundle = CsvSource::new(dir.path()).fetch().unwrap();
        assert_eq!(bundle.circuits["2"].alt, None);
        assert_eq!(bundle.drivers["2"].number, None);

        let retired = bundle.results.iter().find(|r| r.id == "2").unwrap();
        assert_eq!(retired.position, None);
        assert_eq!(retired.position_text, "R");
        assert_eq!(retired.milliseconds, None);
    }

    #[test]
    fn session_schedule_is_optional_per_session() {
        let dir = tempdir().unwrap();
        write_dataset(dir.path());

        let bundle = CsvSource::new(dir.path()).fetch().unwrap();
        let monza = bundle.races.iter().find(|r| r.id == "1").unwrap();
        assert!(monza.first_practice.is_some());
        assert!(monza.third_practice.is_none());
        assert!(monza.sprint.is_some());

        let spa = bundle.races.iter().find(|r| r.id == "2").unwrap();
        assert!(spa.first_practice.is_none());
        assert_eq!(spa.url, None);
    }

    #[test]
    fn missing_file_is_a_structural_failure() {
        let dir = tempdir().unwrap();
        write_dataset(dir.path());
        fs::remove_file(dir.path().join("results.csv")).unwrap();

        let err = CsvSource::new(dir.path()).fetch().unwrap_err();
        assert!(matches!(err, LoadError::DatasetFile { .. }));
    }
}
