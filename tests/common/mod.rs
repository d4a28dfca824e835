#![allow(dead_code)]
use approx::assert_relative_eq;
use iss_tracker::{
    feed::{load_dataset, FileFeedSource},
    response::ResponseValue,
    tracker::IssTracker,
};

pub const SAMPLE_FEED: &str = "tests/data/iss_sample.xml";

pub fn sample_tracker() -> IssTracker {
    let dataset = load_dataset(&FileFeedSource::new(SAMPLE_FEED)).unwrap();
    IssTracker::new(dataset)
}

pub fn text<'a>(response: &'a ResponseValue, key: &str) -> &'a str {
    response
        .get(key)
        .and_then(ResponseValue::as_text)
        .unwrap_or_else(|| panic!("{key} should be a text value"))
}

pub fn assert_measure(
    response: &ResponseValue,
    key: &str,
    expected: f64,
    units: &str,
    epsilon: f64,
) {
    let (value, found_units) = response
        .get(key)
        .and_then(ResponseValue::as_measure)
        .unwrap_or_else(|| panic!("{key} should be a measure"));
    assert_relative_eq!(value, expected, epsilon = epsilon);
    assert_eq!(found_units, units, "units of {key}");
}
