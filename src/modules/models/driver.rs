use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A driver record. `number` and `code` only exist for the modern era, `dob`
/// is absent when the dataset carries an unparseable birth date.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Driver {
    pub id: String,
    pub driver_ref: String,
    pub number: Option<String>,
    pub code: Option<String>,
    pub forename: String,
    pub surname: String,
    pub dob: Option<NaiveDate>,
    pub nationality: String,
    pub url: String,
}

impl Driver {
    pub fn unknown(id: &str) -> Driver {
        Driver {
            id: id.to_string(),
            driver_ref: String::new(),
            number: None,
            code: None,
            forename: "Unknown".to_string(),
            surname: "Driver".to_string(),
            dob: None,
            nationality: String::new(),
            url: String::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}
