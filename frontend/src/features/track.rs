//! `track` slice: the last reported position of the tracked object.  The
//! whole slice is replaced by each update.

use serde::Serialize;
use serde_json::{json, Value};

use crate::store::{reducer, Action, Reducer};
use crate::utils::set_immutable_object;

pub const REDUCER_NAME: &str = "track";
pub const UPDATE_TRACK: &str = "track/updateTrack";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackData {
    pub lon: f64,
    pub lat: f64,
    pub alt: f64,
    pub speed: f64,
    pub classification: Option<Value>,
    pub status: Option<Value>,
}

pub fn update_track_action(track: Value) -> Action {
    Action::new(UPDATE_TRACK, track)
}

pub fn track_reducer() -> Reducer {
    reducer(reduce)
}

fn initial_state() -> Value {
    json!({ "lon": 0, "lat": 0, "alt": 0, "speed": 0 })
}

pub fn reduce(state: Option<&Value>, action: &Action) -> Value {
    let mut next = state.cloned().unwrap_or_else(initial_state);
    if action.is(UPDATE_TRACK) {
        if let Err(e) = set_immutable_object(&mut next, &action.payload) {
            log::warn!("track update ignored: {}", e);
        }
    }
    next
}

/// Track data with every missing or falsy coordinate read as `0`.
pub fn get_track_data_selector(state: &Value) -> TrackData {
    let track = state.get(REDUCER_NAME);
    let number = |key: &str| {
        track
            .and_then(|t| t.get(key))
            .and_then(Value::as_f64)
            .filter(|n| !n.is_nan())
            .unwrap_or(0.0)
    };
    let raw = |key: &str| {
        track
            .and_then(|t| t.get(key))
            .filter(|v| !v.is_null())
            .cloned()
    };

    TrackData {
        lon: number("lon"),
        lat: number("lat"),
        alt: number("alt"),
        speed: number("speed"),
        classification: raw("classification"),
        status: raw("status"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ReducerRegistry, StoreOptions};

    #[test]
    fn update_replaces_the_whole_slice() {
        let state = reduce(None, &Action::of_type("@@redux/INIT"));
        assert_eq!(state, initial_state());

        let next = reduce(
            Some(&state),
            &update_track_action(json!({ "lon": 34.8, "lat": 32.1, "status": "live" })),
        );
        assert_eq!(next, json!({ "lon": 34.8, "lat": 32.1, "status": "live" }));
    }

    #[test]
    fn selector_defaults_missing_fields() {
        let data = get_track_data_selector(&json!({ "track": { "lat": 1.5 } }));
        assert_eq!(
            data,
            TrackData {
                lat: 1.5,
                ..TrackData::default()
            }
        );
        assert_eq!(get_track_data_selector(&Value::Null), TrackData::default());
    }

    #[test]
    fn registers_next_to_other_slices() {
        let registry = ReducerRegistry::new();
        registry.init_store(json!({}), &StoreOptions { devtools: false });
        assert!(registry.add(REDUCER_NAME, track_reducer()));

        registry.dispatch(update_track_action(json!({ "lon": 1, "lat": 2, "alt": 3, "speed": 4 })));
        let data = get_track_data_selector(&registry.get_state().unwrap());
        assert_eq!((data.lon, data.lat, data.alt, data.speed), (1.0, 2.0, 3.0, 4.0));
    }
}
