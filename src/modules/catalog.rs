use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use log::{info, warn};

use crate::errors::LoadError;
use crate::modules::helpers::sort::Sorting;
use crate::modules::models::circuit::Circuit;
use crate::modules::models::constructor::Constructor;
use crate::modules::models::driver::Driver;
use crate::modules::models::race::Race;
use crate::modules::models::race_result::RaceResult;
use crate::modules::models::season::Season;
use crate::modules::models::status::Status;

/// Everything a backing source hands over in one bulk load: id-keyed maps for
/// the entities the joins resolve through, ordered rows for races and results.
#[derive(Debug, Clone, Default)]
pub struct RecordBundle {
    pub circuits: HashMap<String, Circuit>,
    pub constructors: HashMap<String, Constructor>,
    pub drivers: HashMap<String, Driver>,
    pub statuses: HashMap<String, Status>,
    pub seasons: HashMap<i32, Season>,
    pub races: Vec<Race>,
    pub results: Vec<RaceResult>,
}

/// A backing source the catalog can bulk-load from. The catalog does not care
/// whether the bundle came from CSV files, a database or a remote API.
pub trait RecordSource {
    fn fetch(&self) -> Result<RecordBundle, LoadError>;

    /// Short label used in load-time log lines.
    fn describe(&self) -> String;
}

/// One dangling foreign key met while joining. Recorded once per encounter;
/// repeated references to the same missing id are not deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingRef {
    pub kind: &'static str,
    pub missing_id: String,
    pub referenced_by: String,
}

/// A race of a season with its circuit already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRace {
    pub race: Race,
    pub circuit: Circuit,
}

/// A race result with driver, constructor and status resolved. Each of the
/// three is substituted independently when its reference dangles.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResult {
    pub result: RaceResult,
    pub driver: Driver,
    pub constructor: Constructor,
    pub status: Status,
}

/// The in-memory record store plus the season join queries over it.
///
/// Loaded exactly once per instance; every query takes `&self` and never
/// mutates the records. Dangling-reference diagnostics go into an interior
/// log that callers can drain.
pub struct SeasonCatalog {
    records: RecordBundle,
    loaded: bool,
    dangling: Mutex<Vec<DanglingRef>>,
}

impl Default for SeasonCatalog {
    fn default() -> Self {
        SeasonCatalog::new()
    }
}

impl SeasonCatalog {
    pub fn new() -> SeasonCatalog {
        SeasonCatalog {
            records: RecordBundle::default(),
            loaded: false,
            dangling: Mutex::new(Vec::new()),
        }
    }

    /// # load
    /// Bulk-loads every collection from the given source. Safe to call more
    /// than once; only the first successful call has any effect.
    ///
    /// After the fetch the result rows are stably sorted by
    /// (race id, position order) so every race's results come out in
    /// finishing order without re-sorting per query.
    pub fn load(&mut self, source: &dyn RecordSource) -> Result<(), LoadError> {
        if self.loaded {
            info!(target: "catalog", "records already loaded, skipping {}", source.describe());
            return Ok(());
        }

        info!(target: "catalog", "loading records from {}", source.describe());
        let mut bundle = source.fetch()?;

        bundle.results.sort_by(|a, b| {
            a.race_id
                .cmp(&b.race_id)
                .then(a.position_order.cmp(&b.position_order))
        });

        info!(
            target: "catalog",
            "loaded {} circuits, {} constructors, {} drivers, {} races, {} results, {} statuses, {} seasons",
            bundle.circuits.len(),
            bundle.constructors.len(),
            bundle.drivers.len(),
            bundle.races.len(),
            bundle.results.len(),
            bundle.statuses.len(),
            bundle.seasons.len(),
        );

        self.records = bundle;
        self.loaded = true;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn circuit(&self, id: &str) -> Option<&Circuit> {
        self.records.circuits.get(id)
    }

    pub fn constructor(&self, id: &str) -> Option<&Constructor> {
        self.records.constructors.get(id)
    }

    pub fn driver(&self, id: &str) -> Option<&Driver> {
        self.records.drivers.get(id)
    }

    pub fn status(&self, id: &str) -> Option<&Status> {
        self.records.statuses.get(id)
    }

    pub fn season(&self, year: i32) -> Option<&Season> {
        self.records.seasons.get(&year)
    }

    pub fn races(&self) -> &[Race] {
        &self.records.races
    }

    pub fn results(&self) -> &[RaceResult] {
        &self.records.results
    }

    /// # races_for_season
    /// All races of the given year with their circuits resolved, in round
    /// order. An unknown year yields an empty vector, not an error.
    pub fn races_for_season(&self, year: i32) -> Vec<SeasonRace> {
        let mut season_races: Vec<SeasonRace> = self
            .records
            .races
            .iter()
            .filter(|race| race.year == year)
            .map(|race| {
                let circuit = match self.records.circuits.get(&race.circuit_id) {
                    Some(circuit) => circuit.clone(),
                    None => {
                        self.record_dangling("circuit", &race.circuit_id, &race.id);
                        Circuit::unknown(&race.circuit_id)
                    }
                };
                SeasonRace {
                    race: race.clone(),
                    circuit,
                }
            })
            .collect();

        season_races.sort_by(|a, b| Sorting::by_round(&a.race.round, &b.race.round));
        season_races
    }

    /// # results_for_race
    /// The classified results of one race, in finishing order. This is a
    /// stable sub-sequence of the globally pre-sorted result rows, so no
    /// re-sort happens here.
    pub fn results_for_race(&self, race_id: &str) -> Vec<ResolvedResult> {
        self.records
            .results
            .iter()
            .filter(|result| result.race_id == race_id)
            .map(|result| {
                let driver = match self.records.drivers.get(&result.driver_id) {
                    Some(driver) => driver.clone(),
                    None => {
                        self.record_dangling("driver", &result.driver_id, &result.id);
                        Driver::unknown(&result.driver_id)
                    }
                };
                let constructor = match self.records.constructors.get(&result.constructor_id) {
                    Some(constructor) => constructor.clone(),
                    None => {
                        self.record_dangling("constructor", &result.constructor_id, &result.id);
                        Constructor::unknown(&result.constructor_id)
                    }
                };
                let status = match self.records.statuses.get(&result.status_id) {
                    Some(status) => status.clone(),
                    None => {
                        self.record_dangling("status", &result.status_id, &result.id);
                        Status::unknown(&result.status_id)
                    }
                };
                ResolvedResult {
                    result: result.clone(),
                    driver,
                    constructor,
                    status,
                }
            })
            .collect()
    }

    /// Distinct drivers that started at least one race of the season, sorted
    /// by surname then forename.
    pub fn drivers_for_season(&self, year: i32) -> Vec<Driver> {
        let mut drivers: Vec<Driver> = self
            .participant_ids(year, |result| &result.driver_id)
            .iter()
            .filter_map(|id| match self.records.drivers.get(*id) {
                Some(driver) => Some(driver.clone()),
                None => {
                    warn!(target: "catalog", "driver {id} raced in {year} but is not in the store");
                    None
                }
            })
            .collect();

        drivers.sort_by(|a, b| a.surname.cmp(&b.surname).then_with(|| a.forename.cmp(&b.forename)));
        drivers
    }

    /// Distinct constructors entered in the season, sorted by name.
    pub fn constructors_for_season(&self, year: i32) -> Vec<Constructor> {
        let mut constructors: Vec<Constructor> = self
            .participant_ids(year, |result| &result.constructor_id)
            .iter()
            .filter_map(|id| match self.records.constructors.get(*id) {
                Some(constructor) => Some(constructor.clone()),
                None => {
                    warn!(target: "catalog", "constructor {id} raced in {year} but is not in the store");
                    None
                }
            })
            .collect();

        constructors.sort_by(|a, b| a.name.cmp(&b.name));
        constructors
    }

    /// Wiki link for a season: the stored one when the seasons table has it,
    /// the Wikipedia season page otherwise.
    pub fn season_url(&self, year: i32) -> String {
        match self.records.seasons.get(&year) {
            Some(season) if !season.url.is_empty() => season.url.clone(),
            _ => Season::fallback_url(year),
        }
    }

    /// Drains the dangling-reference diagnostics recorded by the queries run
    /// so far.
    pub fn take_diagnostics(&self) -> Vec<DanglingRef> {
        let mut log = match self.dangling.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *log)
    }

    /// Two-step join shared by the participant queries: the race ids of the
    /// year first, then the distinct foreign keys of every result in one of
    /// those races.
    fn participant_ids<'a>(
        &'a self,
        year: i32,
        key: impl Fn(&'a RaceResult) -> &'a String,
    ) -> HashSet<&'a str> {
        let race_ids: HashSet<&str> = self
            .records
            .races
            .iter()
            .filter(|race| race.year == year)
            .map(|race| race.id.as_str())
            .collect();

        self.records
            .results
            .iter()
            .filter(|result| race_ids.contains(result.race_id.as_str()))
            .map(|result| key(result).as_str())
            .collect()
    }

    fn record_dangling(&self, kind: &'static str, missing_id: &str, referenced_by: &str) {
        warn!(
            target: "catalog",
            "{kind} {missing_id} not found (referenced by {referenced_by})"
        );
        let mut log = match self.dangling.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        log.push(DanglingRef {
            kind,
            missing_id: missing_id.to_string(),
            referenced_by: referenced_by.to_string(),
        });
    }
}
