use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One scheduled session of a race weekend (practice, qualifying, sprint).
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Session {
    pub date: String,
    pub time: Option<String>,
}

/// A race on the calendar. `round` stays text: historical rows are not
/// guaranteed to hold a number, ordering falls back to lexicographic when
/// they do not.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Race {
    pub id: String,
    pub year: i32,
    pub round: String,
    pub circuit_id: String,
    pub name: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub url: Option<String>,
    pub first_practice: Option<Session>,
    pub second_practice: Option<Session>,
    pub third_practice: Option<Session>,
    pub qualifying: Option<Session>,
    pub sprint: Option<Session>,
}

impl Race {
    /// Builds the optional session pair the way the dataset encodes it: the
    /// session exists only when its date is present, the start time may still
    /// be missing.
    pub fn session(date: Option<String>, time: Option<String>) -> Option<Session> {
        date.map(|date| Session { date, time })
    }
}
