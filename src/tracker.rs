//! # ISS tracker
//!
//! [`IssTracker`] is the query surface of the crate. It owns one immutable [`OemDataset`] and
//! answers every query with a [`ResponseValue`] tree, ready to be serialized by whatever router
//! sits on top (the `iss_tracker` binary uses JSON on stdout).
//!
//! ## Response keys
//!
//! | Query            | Keys                                                              |
//! |------------------|-------------------------------------------------------------------|
//! | state vector     | `EPOCH`, `X`, `Y`, `Z`, `X_DOT`, `Y_DOT`, `Z_DOT`                 |
//! | speed            | `EPOCH`, `SPEED`                                                  |
//! | location         | `EPOCH`, `LATITUDE`, `LONGITUDE`, `ALTITUDE`, `GEO`               |
//! | now              | state vector keys, `SPEED`, location keys                         |
//! | span             | `START`, `STOP`                                                   |
//! | average speed    | `AVERAGE_SPEED`                                                   |
//!
//! `GEO` holds `COUNTRY`, `COUNTRY_CODE`, `STATE`, `LOCALITY` and `DISPLAY_NAME`, or
//! [`ResponseValue::NoResult`] when no region lies under the spacecraft. A failing
//! [`PlaceResolver`] never fails the query: it is logged and reported as `NoResult` too.
//!
//! ## Example
//!
//! ```rust,no_run
//! use iss_tracker::{feed::{load_dataset, FileFeedSource}, place::NoGeocoder, tracker::IssTracker};
//! use hifitime::Epoch;
//!
//! let dataset = load_dataset(&FileFeedSource::new("ISS.OEM_J2K_EPH.xml")).unwrap();
//! let tracker = IssTracker::new(dataset);
//!
//! let now = tracker.now(&Epoch::now().unwrap(), &NoGeocoder).unwrap();
//! println!("{}", serde_json::to_string_pretty(&now).unwrap());
//! ```
use hifitime::Epoch;
use tracing::warn;

use crate::{
    constants::UNIT_KM_PER_S,
    geodesy::{locate, GeodeticLocation},
    kinematics,
    oem::{OemDataset, StateVector},
    place::{PlaceLookup, PlaceResolver},
    response::ResponseValue,
    tracker_errors::TrackerError,
};

#[derive(Debug, Clone)]
pub struct IssTracker {
    dataset: OemDataset,
}

impl IssTracker {
    pub fn new(dataset: OemDataset) -> Self {
        IssTracker { dataset }
    }

    pub fn dataset(&self) -> &OemDataset {
        &self.dataset
    }

    /// Every state vector of the dataset, in epoch order.
    pub fn epochs(&self) -> ResponseValue {
        ResponseValue::from(self.dataset.index().records())
    }

    /// State vectors in positions `[offset, limit)`.
    ///
    /// Bounds are clamped, see [`EpochIndex::range`](crate::epoch_index::EpochIndex::range).
    pub fn epochs_range(&self, offset: Option<usize>, limit: Option<usize>) -> ResponseValue {
        ResponseValue::from(self.dataset.index().range(offset, limit))
    }

    /// The state vector recorded at `epoch` (feed format, e.g. `2024-069T02:26:00.000Z`).
    pub fn state_vector(&self, epoch: &str) -> Result<ResponseValue, TrackerError> {
        let sv = self.dataset.index().by_epoch(epoch)?;
        Ok(ResponseValue::from(sv))
    }

    /// Instantaneous speed at `epoch`.
    pub fn speed(&self, epoch: &str) -> Result<ResponseValue, TrackerError> {
        let sv = self.dataset.index().by_epoch(epoch)?;
        Ok(ResponseValue::map([
            ("EPOCH", ResponseValue::text(sv.epoch_text())),
            ("SPEED", speed_value(sv)),
        ]))
    }

    /// Geodetic location at `epoch` and the region below it.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: epoch text in feed format
    /// * `resolver`: names the region under the ground track
    ///
    /// Return
    /// ------
    /// * the location map, or the [`TrackerError`] raised by the epoch lookup
    pub fn location(
        &self,
        epoch: &str,
        resolver: &dyn PlaceResolver,
    ) -> Result<ResponseValue, TrackerError> {
        let sv = self.dataset.index().by_epoch(epoch)?;
        Ok(located(sv, resolver))
    }

    /// Everything known about the state vector closest to `now`.
    ///
    /// Arguments
    /// ---------
    /// * `now`: the reference instant, usually `Epoch::now()`
    /// * `resolver`: names the region under the ground track
    ///
    /// Return
    /// ------
    /// * the state vector keys merged with `SPEED` and the location keys,
    ///   or [`TrackerError::EmptyDataset`]
    pub fn now(
        &self,
        now: &Epoch,
        resolver: &dyn PlaceResolver,
    ) -> Result<ResponseValue, TrackerError> {
        let sv = self.dataset.index().nearest_to(now)?;
        Ok(ResponseValue::from(sv)
            .merge(ResponseValue::map([("SPEED", speed_value(sv))]))
            .merge(located(sv, resolver)))
    }

    /// Comment lines of the feed, in feed order.
    pub fn comments(&self) -> ResponseValue {
        ResponseValue::List(
            self.dataset
                .comments()
                .iter()
                .map(ResponseValue::text)
                .collect(),
        )
    }

    pub fn header(&self) -> ResponseValue {
        ResponseValue::from(self.dataset.header())
    }

    pub fn metadata(&self) -> ResponseValue {
        ResponseValue::from(self.dataset.metadata())
    }

    /// First and last epochs covered by the dataset.
    pub fn span(&self) -> Result<ResponseValue, TrackerError> {
        let (first, last) = self.dataset.index().span()?;
        Ok(ResponseValue::map([
            ("START", ResponseValue::text(first.epoch_text())),
            ("STOP", ResponseValue::text(last.epoch_text())),
        ]))
    }

    /// Mean speed over every state vector of the dataset.
    pub fn average_speed(&self) -> Result<ResponseValue, TrackerError> {
        let average = kinematics::average_speed(self.dataset.index().records())?;
        Ok(ResponseValue::map([(
            "AVERAGE_SPEED",
            ResponseValue::measure(average, UNIT_KM_PER_S),
        )]))
    }
}

fn speed_value(sv: &StateVector) -> ResponseValue {
    ResponseValue::measure(kinematics::speed(sv), UNIT_KM_PER_S)
}

fn located(sv: &StateVector, resolver: &dyn PlaceResolver) -> ResponseValue {
    let location = locate(sv);
    let geo = resolve_place(&location, resolver);
    ResponseValue::from(&location).merge(ResponseValue::map([("GEO", geo)]))
}

fn resolve_place(location: &GeodeticLocation, resolver: &dyn PlaceResolver) -> ResponseValue {
    match resolver.resolve(location.latitude, location.longitude) {
        Ok(lookup) => ResponseValue::from(&lookup),
        Err(err) => {
            warn!(
                latitude = location.latitude,
                longitude = location.longitude,
                error = %err,
                "place resolution failed, no region reported"
            );
            ResponseValue::from(&PlaceLookup::NoMatch)
        }
    }
}

#[cfg(test)]
mod tracker_test {
    use super::*;
    use crate::{
        constants::Degree,
        place::{NoGeocoder, Place},
    };
    use approx::assert_relative_eq;
    use hifitime::Unit;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ndm>
  <oem id="CCSDS_OEM_VERS" version="2.0">
    <header>
      <CREATION_DATE>2024-067T20:32:49.275Z</CREATION_DATE>
      <ORIGINATOR>JSC</ORIGINATOR>
    </header>
    <body>
      <segment>
        <metadata>
          <OBJECT_NAME>ISS</OBJECT_NAME>
          <CENTER_NAME>EARTH</CENTER_NAME>
        </metadata>
        <data>
          <COMMENT>Units are in kg and m^2</COMMENT>
          <COMMENT>MASS=459325.00</COMMENT>
          <stateVector>
            <EPOCH>2024-069T02:26:00.000Z</EPOCH>
            <X units="km">-2018.0</X>
            <Y units="km">6018.0</Y>
            <Z units="km">2410.0</Z>
            <X_DOT units="km/s">-4.16</X_DOT>
            <Y_DOT units="km/s">-3.55</Y_DOT>
            <Z_DOT units="km/s">5.37</Z_DOT>
          </stateVector>
          <stateVector>
            <EPOCH>2024-069T02:28:00.000Z</EPOCH>
            <X units="km">-2020.0</X>
            <Y units="km">6020.0</Y>
            <Z units="km">2412.0</Z>
            <X_DOT units="km/s">-4.17</X_DOT>
            <Y_DOT units="km/s">-3.56</Y_DOT>
            <Z_DOT units="km/s">5.38</Z_DOT>
          </stateVector>
        </data>
      </segment>
    </body>
  </oem>
</ndm>"#;

    const FIRST: &str = "2024-069T02:26:00.000Z";
    const SECOND: &str = "2024-069T02:28:00.000Z";

    fn tracker() -> IssTracker {
        IssTracker::new(OemDataset::from_xml(FEED).unwrap())
    }

    struct FixedPlace;

    impl PlaceResolver for FixedPlace {
        fn resolve(&self, _lat: Degree, _lon: Degree) -> Result<PlaceLookup, TrackerError> {
            Ok(PlaceLookup::Found(Place {
                country: Some("México".into()),
                country_code: Some("mx".into()),
                state: Some("Yucatán".into()),
                locality: None,
                display_name: Some("Yucatán, México".into()),
            }))
        }
    }

    struct BrokenResolver;

    impl PlaceResolver for BrokenResolver {
        fn resolve(&self, _lat: Degree, _lon: Degree) -> Result<PlaceLookup, TrackerError> {
            Err(TrackerError::GeocoderResponse("service unavailable".into()))
        }
    }

    fn measure(value: &ResponseValue, key: &str) -> (f64, &'static str) {
        value.get(key).and_then(ResponseValue::as_measure).unwrap()
    }

    #[test]
    fn test_epochs() {
        let tracker = tracker();
        let ResponseValue::List(all) = tracker.epochs() else {
            panic!("epochs is a list")
        };
        assert_eq!(all.len(), 2);

        let ResponseValue::List(first) = tracker.epochs_range(Some(0), Some(1)) else {
            panic!("epochs_range is a list")
        };
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].get("EPOCH").and_then(ResponseValue::as_text), Some(FIRST));
        assert_eq!(measure(&first[0], "X"), (-2018.0, "km"));

        assert_eq!(
            tracker.epochs_range(Some(5), None),
            ResponseValue::List(vec![])
        );
    }

    #[test]
    fn test_state_vector() {
        let sv = tracker().state_vector(SECOND).unwrap();
        assert_eq!(measure(&sv, "Z_DOT"), (5.38, "km/s"));

        assert_eq!(
            tracker().state_vector("2024-069T02:27:00.000Z"),
            Err(TrackerError::EpochNotFound("2024-069T02:27:00.000Z".into()))
        );
        assert!(matches!(
            tracker().state_vector("not an epoch"),
            Err(TrackerError::InvalidEpoch(_))
        ));
    }

    #[test]
    fn test_speed() {
        let speed = tracker().speed(FIRST).unwrap();
        let (value, units) = measure(&speed, "SPEED");
        assert_relative_eq!(value, 7.6645, epsilon = 1e-4);
        assert_eq!(units, "km/s");
        assert_eq!(speed.get("EPOCH").and_then(ResponseValue::as_text), Some(FIRST));
    }

    #[test]
    fn test_location() {
        let location = tracker().location(FIRST, &FixedPlace).unwrap();

        let (latitude, units) = measure(&location, "LATITUDE");
        assert_relative_eq!(latitude, 20.79, epsilon = 1e-2);
        assert_eq!(units, "deg");
        let (altitude, units) = measure(&location, "ALTITUDE");
        assert_relative_eq!(altitude, 411.32, epsilon = 1e-2);
        assert_eq!(units, "km");
        let (longitude, _) = measure(&location, "LONGITUDE");
        assert!((-180.0..180.0).contains(&longitude));

        let geo = location.get("GEO").unwrap();
        assert_eq!(
            geo.get("COUNTRY_CODE").and_then(ResponseValue::as_text),
            Some("mx")
        );
        assert_eq!(geo.get("LOCALITY"), Some(&ResponseValue::NoResult));
    }

    #[test]
    fn test_location_without_region() {
        let tracker = tracker();
        let offline = tracker.location(FIRST, &NoGeocoder).unwrap();
        assert_eq!(offline.get("GEO"), Some(&ResponseValue::NoResult));

        let broken = tracker.location(FIRST, &BrokenResolver).unwrap();
        assert_eq!(broken.get("GEO"), Some(&ResponseValue::NoResult));
        assert_eq!(broken.get("LATITUDE"), offline.get("LATITUDE"));
    }

    #[test]
    fn test_now() {
        let tracker = tracker();
        let first = OemDataset::from_xml(FEED).unwrap().index().records()[0].epoch;

        let now = tracker
            .now(&(first + Unit::Second * 30_i64), &FixedPlace)
            .unwrap();
        assert_eq!(now.get("EPOCH").and_then(ResponseValue::as_text), Some(FIRST));
        for key in [
            "X", "Y", "Z", "X_DOT", "Y_DOT", "Z_DOT", "SPEED", "LATITUDE", "LONGITUDE", "ALTITUDE",
            "GEO",
        ] {
            assert!(now.get(key).is_some(), "missing {key}");
        }

        let later = tracker
            .now(&(first + Unit::Second * 90_i64), &NoGeocoder)
            .unwrap();
        assert_eq!(later.get("EPOCH").and_then(ResponseValue::as_text), Some(SECOND));
        assert_eq!(later.get("GEO"), Some(&ResponseValue::NoResult));

        // halfway between the two records
        let tie = tracker
            .now(&(first + Unit::Minute * 1_i64), &NoGeocoder)
            .unwrap();
        assert_eq!(tie.get("EPOCH").and_then(ResponseValue::as_text), Some(FIRST));
    }

    #[test]
    fn test_pass_through_blocks() {
        let tracker = tracker();
        assert_eq!(
            tracker.comments(),
            ResponseValue::List(vec![
                ResponseValue::text("Units are in kg and m^2"),
                ResponseValue::text("MASS=459325.00"),
            ])
        );
        assert_eq!(
            tracker
                .header()
                .get("ORIGINATOR")
                .and_then(ResponseValue::as_text),
            Some("JSC")
        );
        assert_eq!(
            tracker
                .metadata()
                .get("OBJECT_NAME")
                .and_then(ResponseValue::as_text),
            Some("ISS")
        );
    }

    #[test]
    fn test_span_and_average_speed() {
        let tracker = tracker();
        let span = tracker.span().unwrap();
        assert_eq!(span.get("START").and_then(ResponseValue::as_text), Some(FIRST));
        assert_eq!(span.get("STOP").and_then(ResponseValue::as_text), Some(SECOND));

        let (average, units) = measure(&tracker.average_speed().unwrap(), "AVERAGE_SPEED");
        let second = (4.17f64.powi(2) + 3.56f64.powi(2) + 5.38f64.powi(2)).sqrt();
        assert_relative_eq!(average, (7.664528687 + second) / 2.0, epsilon = 1e-6);
        assert_eq!(units, "km/s");
    }

    #[test]
    fn test_empty_dataset() {
        let empty = FEED
            .lines()
            .filter(|line| !is_record_line(line))
            .collect::<Vec<_>>()
            .join("\n");
        let tracker = IssTracker::new(OemDataset::from_xml(&empty).unwrap());
        let now = Epoch::from_gregorian_utc_hms(2024, 3, 9, 2, 26, 0);

        assert_eq!(tracker.epochs(), ResponseValue::List(vec![]));
        assert_eq!(tracker.now(&now, &NoGeocoder), Err(TrackerError::EmptyDataset));
        assert_eq!(tracker.span(), Err(TrackerError::EmptyDataset));
        assert_eq!(tracker.average_speed(), Err(TrackerError::EmptyDataset));
    }

    fn is_record_line(line: &str) -> bool {
        let tag = line.trim_start();
        ["<stateVector>", "</stateVector>", "<EPOCH>", "<X", "<Y", "<Z"]
            .iter()
            .any(|prefix| tag.starts_with(prefix))
    }
}
