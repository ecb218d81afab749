use log::info;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snafu::ResultExt;

use crate::errors::{ApiPayloadSnafu, ApiRequestSnafu, LoadError};

/// Fetches one JSON collection document (`circuits.json`, `races.json`, ...)
/// from the remote dataset mirror and decodes it. The mirror serves each
/// table as a plain JSON array.
pub fn fetch_collection<T: DeserializeOwned>(
    base_url: &str,
    document: &str,
) -> Result<Vec<T>, LoadError> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), document);
    info!(target: "ergast_api", "fetching {url}");

    let response = reqwest::blocking::get(&url)
        .and_then(|response| response.error_for_status())
        .context(ApiRequestSnafu { url: url.clone() })?;
    let body = response.text().context(ApiRequestSnafu { url: url.clone() })?;

    serde_json::from_str(&body).context(ApiPayloadSnafu { url })
}

#[derive(Debug, Deserialize)]
pub struct CircuitDoc {
    #[serde(rename = "circuitId")]
    pub circuit_id: String,
    #[serde(rename = "circuitRef")]
    pub circuit_ref: String,
    pub name: String,
    pub location: String,
    pub country: String,
    pub lat: String,
    pub lng: String,
    pub alt: Option<String>,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ConstructorDoc {
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    #[serde(rename = "constructorRef")]
    pub constructor_ref: String,
    pub name: String,
    pub nationality: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DriverDoc {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "driverRef")]
    pub driver_ref: String,
    pub number: Option<String>,
    pub code: Option<String>,
    pub forename: String,
    pub surname: String,
    pub dob: Option<String>,
    pub nationality: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct RaceDoc {
    #[serde(rename = "raceId")]
    pub race_id: String,
    pub year: i32,
    pub round: String,
    #[serde(rename = "circuitId")]
    pub circuit_id: String,
    pub name: String,
    pub date: String,
    pub time: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "fp1Date", default)]
    pub fp1_date: Option<String>,
    #[serde(rename = "fp1Time", default)]
    pub fp1_time: Option<String>,
    #[serde(rename = "fp2Date", default)]
    pub fp2_date: Option<String>,
    #[serde(rename = "fp2Time", default)]
    pub fp2_time: Option<String>,
    #[serde(rename = "fp3Date", default)]
    pub fp3_date: Option<String>,
    #[serde(rename = "fp3Time", default)]
    pub fp3_time: Option<String>,
    #[serde(rename = "qualiDate", default)]
    pub quali_date: Option<String>,
    #[serde(rename = "qualiTime", default)]
    pub quali_time: Option<String>,
    #[serde(rename = "sprintDate", default)]
    pub sprint_date: Option<String>,
    #[serde(rename = "sprintTime", default)]
    pub sprint_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResultDoc {
    #[serde(rename = "resultId")]
    pub result_id: String,
    #[serde(rename = "raceId")]
    pub race_id: String,
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    pub number: Option<String>,
    pub grid: i32,
    pub position: Option<i32>,
    #[serde(rename = "positionText")]
    pub position_text: String,
    #[serde(rename = "positionOrder")]
    pub position_order: i32,
    pub points: f32,
    pub laps: i32,
    pub time: Option<String>,
    pub milliseconds: Option<i64>,
    #[serde(rename = "fastestLap")]
    pub fastest_lap: Option<i32>,
    pub rank: Option<i32>,
    #[serde(rename = "fastestLapTime")]
    pub fastest_lap_time: Option<String>,
    #[serde(rename = "fastestLapSpeed")]
    pub fastest_lap_speed: Option<String>,
    #[serde(rename = "statusId")]
    pub status_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusDoc {
    #[serde(rename = "statusId")]
    pub status_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct SeasonDoc {
    pub year: i32,
    pub url: String,
}
