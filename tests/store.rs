use serde_json::json;
use stackplot::data::domain::{Domain, Extent, YDomain};
use stackplot::data::series::{Epoch, Series, Trace};
use stackplot::error::StoreError;
use stackplot::sink::{channel, Intent, IntentSink, SeriesProvider};
use stackplot::store::MemoryStore;

fn two_series() -> MemoryStore {
    MemoryStore::new()
        .with_series(Series::new(3, "a").with_trace(Trace::from_points([[0.0, -1.0], [10.0, 4.0]])))
        .with_series(Series::new(7, "b").with_trace(Trace::from_points([[5.0, 2.0], [20.0, 8.0]])))
}

#[test]
fn create_series_gets_fresh_id() {
    let mut store = two_series();
    store
        .apply(Intent::CreateSeries {
            name: "c".into(),
            traces: vec![],
        })
        .expect("applied");
    let ids: Vec<u32> = store.series().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![3, 7, 8]);
    assert_eq!(store.series()[2].name, "c");
}

#[test]
fn remove_series_and_epochs() {
    let mut store = two_series();
    store
        .apply(Intent::CreateEpoch {
            series_id: 7,
            start: 6.0,
            end: 2.0,
            tag: None,
        })
        .expect("applied");
    assert_eq!(store.find_series(7).map(|s| s.epochs.clone()), Some(vec![Epoch::new(2.0, 6.0, None)]));

    assert_eq!(
        store.apply(Intent::RemoveEpoch {
            series_id: 7,
            epoch_index: 1
        }),
        Err(StoreError::UnknownEpoch {
            series_id: 7,
            epoch_index: 1
        })
    );
    store
        .apply(Intent::RemoveEpoch {
            series_id: 7,
            epoch_index: 0,
        })
        .expect("applied");
    assert!(store.find_series(7).map(|s| s.epochs.is_empty()).unwrap_or(false));

    store.apply(Intent::RemoveSeries { series_id: 3 }).expect("applied");
    assert_eq!(
        store.apply(Intent::RemoveSeries { series_id: 3 }),
        Err(StoreError::UnknownSeries(3))
    );
    assert_eq!(store.series().len(), 1);
}

#[test]
fn set_epoch_domain_normalizes() {
    let mut store = two_series();
    store.dispatch(Intent::CreateEpoch {
        series_id: 3,
        start: 1.0,
        end: 2.0,
        tag: None,
    });
    store.dispatch(Intent::SetEpochDomain {
        series_id: 3,
        epoch_index: 0,
        start: 9.0,
        end: 4.0,
    });
    let e = &store.find_series(3).expect("series").epochs[0];
    assert_eq!((e.start, e.end), (4.0, 9.0));
}

#[test]
fn name_and_metadata_updates() {
    let mut store = two_series();
    store.dispatch(Intent::SetName {
        series_id: 3,
        name: "Fp1".into(),
    });
    let meta = json!({"unit": "uV", "rate": 256});
    store.dispatch(Intent::SetSeriesMetadata {
        series_id: 3,
        metadata: meta.as_object().cloned().unwrap_or_default(),
    });
    let s = store.find_series(3).expect("series");
    assert_eq!(s.name, "Fp1");
    assert_eq!(s.metadata.get("rate"), Some(&json!(256)));
}

#[test]
fn failed_dispatch_is_dropped() {
    let mut store = two_series();
    store.dispatch(Intent::SetName {
        series_id: 99,
        name: "nope".into(),
    });
    assert!(store.series().iter().all(|s| s.name != "nope"));
}

#[test]
fn domain_is_fitted_until_zoomed() {
    let mut store = two_series();
    let fitted = store.domain();
    assert_eq!(fitted.x, Extent::new(0.0, 20.0));
    assert_eq!(fitted.y, YDomain::Shared(Extent::new(-1.0, 8.0)));

    store.dispatch(Intent::SetZoom {
        x: Extent::new(2.0, 4.0),
    });
    let zoomed = store.domain();
    assert_eq!(zoomed.x, Extent::new(2.0, 4.0));
    assert_eq!(zoomed.y, fitted.y);
}

#[test]
fn per_row_fit_keeps_rows_independent() {
    let store = two_series();
    let d = Domain::fit_per_row(store.series());
    assert_eq!(d.y_for_row(0, None), Extent::new(-1.0, 4.0));
    assert_eq!(d.y_for_row(1, None), Extent::new(2.0, 8.0));
    assert_eq!(d.y_for_row(5, None), Extent::default());
}

#[test]
fn channel_forwards_intents_in_order() {
    let (mut tx, rx) = channel();
    tx.dispatch(Intent::SetZoom {
        x: Extent::new(0.0, 1.0),
    });
    tx.create_epoch(3, 1.0, 2.0, None).expect("receiver alive");
    tx.remove_epoch(3, 0).expect("receiver alive");

    let mut store = two_series();
    let received: Vec<Intent> = rx.try_iter().collect();
    assert_eq!(received.len(), 3);
    store.dispatch_all(received);
    assert_eq!(store.domain().x, Extent::new(0.0, 1.0));
    assert!(store.find_series(3).map(|s| s.epochs.is_empty()).unwrap_or(false));
}

#[test]
fn sender_survives_dropped_receiver() {
    let (mut tx, rx) = channel();
    drop(rx);
    tx.dispatch(Intent::RemoveSeries { series_id: 1 });
    assert!(tx.set_zoom(Extent::new(0.0, 1.0)).is_err());
}

#[test]
fn vec_sink_records_intents() {
    let mut sink: Vec<Intent> = Vec::new();
    sink.dispatch(Intent::RemoveSeries { series_id: 1 });
    assert_eq!(sink, vec![Intent::RemoveSeries { series_id: 1 }]);
}

#[test]
fn series_round_trips_through_json() {
    let s = Series::new(1, "Cz")
        .with_trace(Trace::from_points([[0.0, 1.0]]))
        .with_epoch(Epoch::new(0.0, 1.0, Some(stackplot::EpochTag::new("blink"))));
    let txt = serde_json::to_string(&s).expect("serialize");
    assert!(txt.contains("\"blink\""));
    let back: Series = serde_json::from_str(&txt).expect("deserialize");
    assert_eq!(back, s);
}

#[test]
fn clamp_with_nan_bound_passes_value_through() {
    assert_eq!(Extent::new(f64::NAN, 20.0).clamp(25.0), 25.0);
    assert_eq!(Extent::new(20.0, 10.0).clamp(25.0), 20.0);
    assert_eq!(Extent::new(0.0, 10.0).clamp(-1.0), 0.0);
}
