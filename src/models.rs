use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = circuits)]
pub struct NewCircuit {
    pub circuit_id: i32,
    pub circuit_ref: String,
    pub name: String,
    pub location: String,
    pub country: String,
    pub lat: String,
    pub lng: String,
    pub alt: Option<String>,
    pub url: String,
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = constructors)]
pub struct NewConstructor {
    pub constructor_id: i32,
    pub constructor_ref: String,
    pub name: String,
    pub nationality: String,
    pub url: String,
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = drivers)]
pub struct NewDriver {
    pub driver_id: i32,
    pub driver_ref: String,
    pub number: Option<String>,
    pub code: Option<String>,
    pub forename: String,
    pub surname: String,
    pub dob: Option<String>,
    pub nationality: String,
    pub url: String,
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = races)]
pub struct NewRace {
    pub race_id: i32,
    pub year: i32,
    pub round: i32,
    pub circuit_id: i32,
    pub name: String,
    pub date: String,
    pub time: Option<String>,
    pub url: Option<String>,
    pub fp1_date: Option<String>,
    pub fp1_time: Option<String>,
    pub fp2_date: Option<String>,
    pub fp2_time: Option<String>,
    pub fp3_date: Option<String>,
    pub fp3_time: Option<String>,
    pub quali_date: Option<String>,
    pub quali_time: Option<String>,
    pub sprint_date: Option<String>,
    pub sprint_time: Option<String>,
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = results)]
pub struct NewResult {
    pub result_id: i32,
    pub race_id: i32,
    pub driver_id: i32,
    pub constructor_id: i32,
    pub number: Option<String>,
    pub grid: i32,
    pub position: Option<i32>,
    pub position_text: String,
    pub position_order: i32,
    pub points: f32,
    pub laps: i32,
    pub time: Option<String>,
    pub milliseconds: Option<i64>,
    pub fastest_lap: Option<i32>,
    pub rank: Option<i32>,
    pub fastest_lap_time: Option<String>,
    pub fastest_lap_speed: Option<String>,
    pub status_id: i32,
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = status)]
pub struct NewStatus {
    pub status_id: i32,
    pub description: String,
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = seasons)]
pub struct NewSeason {
    pub year: i32,
    pub url: String,
}
