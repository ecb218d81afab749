use std::collections::HashMap;

use log::warn;

use crate::errors::LoadError;
use crate::modules::catalog::{RecordBundle, RecordSource};
use crate::modules::ergast_api::{
    fetch_collection, CircuitDoc, ConstructorDoc, DriverDoc, RaceDoc, ResultDoc, SeasonDoc,
    StatusDoc,
};
use crate::modules::helpers::fields::Fields;
use crate::modules::models::circuit::Circuit;
use crate::modules::models::constructor::Constructor;
use crate::modules::models::driver::Driver;
use crate::modules::models::race::Race;
use crate::modules::models::race_result::RaceResult;
use crate::modules::models::season::Season;
use crate::modules::models::status::Status;

/// Loads the whole dataset from a remote JSON mirror, one document per
/// collection. Transport and payload failures are structural; a race document
/// with an unparseable date is skipped with a warning.
pub struct ApiSource {
    base_url: String,
}

impl ApiSource {
    pub fn new(base_url: impl Into<String>) -> ApiSource {
        ApiSource {
            base_url: base_url.into(),
        }
    }
}

impl RecordSource for ApiSource {
    fn fetch(&self) -> Result<RecordBundle, LoadError> {
        let base = self.base_url.as_str();

        let circuits: Vec<CircuitDoc> = fetch_collection(base, "circuits.json")?;
        let constructors: Vec<ConstructorDoc> = fetch_collection(base, "constructors.json")?;
        let drivers: Vec<DriverDoc> = fetch_collection(base, "drivers.json")?;
        let races: Vec<RaceDoc> = fetch_collection(base, "races.json")?;
        let results: Vec<ResultDoc> = fetch_collection(base, "results.json")?;
        let statuses: Vec<StatusDoc> = fetch_collection(base, "status.json")?;
        let seasons: Vec<SeasonDoc> = fetch_collection(base, "seasons.json")?;

        let mut bundle = RecordBundle {
            circuits: circuits
                .into_iter()
                .map(|doc| {
                    let circuit = circuit_from_doc(doc);
                    (circuit.id.clone(), circuit)
                })
                .collect(),
            constructors: constructors
                .into_iter()
                .map(|doc| {
                    let constructor = constructor_from_doc(doc);
                    (constructor.id.clone(), constructor)
                })
                .collect(),
            drivers: drivers
                .into_iter()
                .map(|doc| {
                    let driver = driver_from_doc(doc);
                    (driver.id.clone(), driver)
                })
                .collect(),
            statuses: statuses
                .into_iter()
                .map(|doc| {
                    (
                        doc.status_id.clone(),
                        Status {
                            id: doc.status_id,
                            description: doc.status,
                        },
                    )
                })
                .collect(),
            seasons: seasons
                .into_iter()
                .map(|doc| {
                    (
                        doc.year,
                        Season {
                            year: doc.year,
                            url: doc.url,
                        },
                    )
                })
                .collect::<HashMap<i32, Season>>(),
            races: Vec::new(),
            results: Vec::new(),
        };

        for doc in races {
            match race_from_doc(doc) {
                Ok(race) => bundle.races.push(race),
                Err(reason) => {
                    warn!(target: "web_api", "skipping race document: {reason}");
                }
            }
        }
        bundle.results = results.into_iter().map(result_from_doc).collect();

        Ok(bundle)
    }

    fn describe(&self) -> String {
        format!("json mirror at {}", self.base_url)
    }
}

fn circuit_from_doc(doc: CircuitDoc) -> Circuit {
    Circuit {
        id: doc.circuit_id,
        circuit_ref: doc.circuit_ref,
        name: doc.name,
        location: doc.location,
        country: doc.country,
        lat: doc.lat,
        lng: doc.lng,
        alt: doc.alt,
        url: doc.url,
    }
}

fn constructor_from_doc(doc: ConstructorDoc) -> Constructor {
    Constructor {
        id: doc.constructor_id,
        constructor_ref: doc.constructor_ref,
        name: doc.name,
        nationality: doc.nationality,
        url: doc.url,
    }
}

fn driver_from_doc(doc: DriverDoc) -> Driver {
    Driver {
        id: doc.driver_id,
        driver_ref: doc.driver_ref,
        number: doc.number,
        code: doc.code,
        forename: doc.forename,
        surname: doc.surname,
        dob: doc.dob.as_deref().and_then(Fields::lenient_date),
        nationality: doc.nationality,
        url: doc.url,
    }
}

fn race_from_doc(doc: RaceDoc) -> Result<Race, String> {
    let date = Fields::parse_date(&doc.date, "date")
        .map_err(|reason| format!("race {}: {reason}", doc.race_id))?;
    Ok(Race {
        id: doc.race_id,
        year: doc.year,
        round: doc.round,
        circuit_id: doc.circuit_id,
        name: doc.name,
        date,
        time: doc.time,
        url: doc.url,
        first_practice: Race::session(doc.fp1_date, doc.fp1_time),
        second_practice: Race::session(doc.fp2_date, doc.fp2_time),
        third_practice: Race::session(doc.fp3_date, doc.fp3_time),
        qualifying: Race::session(doc.quali_date, doc.quali_time),
        sprint: Race::session(doc.sprint_date, doc.sprint_time),
    })
}

fn result_from_doc(doc: ResultDoc) -> RaceResult {
    RaceResult {
        id: doc.result_id,
        race_id: doc.race_id,
        driver_id: doc.driver_id,
        constructor_id: doc.constructor_id,
        number: doc.number,
        grid: doc.grid,
        position: doc.position,
        position_text: doc.position_text,
        position_order: doc.position_order,
        points: doc.points,
        laps: doc.laps,
        time: doc.time,
        milliseconds: doc.milliseconds,
        fastest_lap: doc.fastest_lap,
        rank: doc.rank,
        fastest_lap_time: doc.fastest_lap_time,
        fastest_lap_speed: doc.fastest_lap_speed,
        status_id: doc.status_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn race_documents_decode_and_convert() {
        let json = r#"[{
            "raceId": "1073",
            "year": 2021,
            "round": "21",
            "circuitId": "77",
            "name": "Saudi Arabian Grand Prix",
            "date": "2021-12-05",
            "time": "17:30:00",
            "url": null,
            "fp1Date": "2021-12-03",
            "fp1Time": "13:30:00"
        }]"#;
        let docs: Vec<RaceDoc> = serde_json::from_str(json).unwrap();
        let race = race_from_doc(docs.into_iter().next().unwrap()).unwrap();

        assert_eq!(race.id, "1073");
        assert_eq!(race.round, "21");
        assert!(race.first_practice.is_some());
        assert!(race.sprint.is_none());
        assert_eq!(race.url, None);
    }

    #[test]
    fn bad_race_date_is_rejected_per_document() {
        let json = r#"[{
            "raceId": "9",
            "year": 1952,
            "round": "1",
            "circuitId": "5",
            "name": "Swiss Grand Prix",
            "date": "unknown",
            "time": null,
            "url": null
        }]"#;
        let docs: Vec<RaceDoc> = serde_json::from_str(json).unwrap();
        assert!(race_from_doc(docs.into_iter().next().unwrap()).is_err());
    }

    #[test]
    fn result_documents_keep_absent_position_distinct() {
        let json = r#"[{
            "resultId": "2",
            "raceId": "18",
            "driverId": "4",
            "constructorId": "4",
            "number": "5",
            "grid": 11,
            "position": null,
            "positionText": "R",
            "positionOrder": 19,
            "points": 0.0,
            "laps": 8,
            "time": null,
            "milliseconds": null,
            "fastestLap": null,
            "rank": null,
            "fastestLapTime": null,
            "fastestLapSpeed": null,
            "statusId": "4"
        }]"#;
        let docs: Vec<ResultDoc> = serde_json::from_str(json).unwrap();
        let result = result_from_doc(docs.into_iter().next().unwrap());
        assert_eq!(result.position, None);
        assert_eq!(result.position_text, "R");
        assert_eq!(result.status_id, "4");
    }
}
