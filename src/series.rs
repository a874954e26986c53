//! Rating series data model and the two mutations the tracker performs on it.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// One recorded rating.
///
/// The serde names are the CSV column headers of the storage file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// 1-based position assigned when the row was appended. Edits may leave
    /// duplicates or gaps.
    #[serde(rename = "Race Number")]
    pub race_number: i64,
    #[serde(rename = "Rate")]
    pub rate: i64,
}

impl Observation {
    pub fn new(date: NaiveDate, race_number: i64, rate: i64) -> Self {
        Self {
            date,
            race_number,
            rate,
        }
    }
}

/// The full rating history of one game, in stored row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSeries {
    observations: Vec<Observation>,
}

impl RatingSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }
}

impl<'a> IntoIterator for &'a RatingSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Today's local calendar date, stamped on newly appended observations.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Append a new observation numbered `len + 1` and dated `today`.
///
/// The rate is taken as given; the input widget is responsible for keeping it
/// non-negative.
pub fn append_observation(series: RatingSeries, rate: i64, today: NaiveDate) -> RatingSeries {
    let mut observations = series.into_observations();
    let race_number = observations.len() as i64 + 1;
    observations.push(Observation::new(today, race_number, rate));
    RatingSeries::from_observations(observations)
}

/// Accept the rows left in the table editor as the new series.
///
/// No renumbering and no comparison against the previous contents.
pub fn replace_all(edited: Vec<Observation>) -> RatingSeries {
    RatingSeries::from_observations(edited)
}
