use serde::{Deserialize, Serialize};

/// A single classified entry of a race. `position` is absent for retirements
/// and disqualifications; `position_text` keeps the dataset's encoding ("R",
/// "D", ...) and `position_order` is the ordinal the store sorts on.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct RaceResult {
    pub id: String,
    pub race_id: String,
    pub driver_id: String,
    pub constructor_id: String,
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
    pub status_id: String,
}

impl RaceResult {
    /// What the classification column should show: the numeric finishing
    /// position when there is one, otherwise the dataset's position text.
    pub fn display_position(&self) -> String {
        match self.position {
            Some(position) => position.to_string(),
            None => self.position_text.clone(),
        }
    }
}
