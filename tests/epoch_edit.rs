use stackplot::data::series::{Epoch, EpochTag, Series};
use stackplot::epoch_edit::{EditEdge, EditState, EpochEditor};
use stackplot::sink::{Intent, IntentSink, SeriesProvider};
use stackplot::store::MemoryStore;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn store_with_epoch(start: f64, end: f64) -> MemoryStore {
    MemoryStore::new().with_series(Series::new(1, "eeg").with_epoch(Epoch::new(start, end, None)))
}

fn series(store: &MemoryStore, id: u32) -> Series {
    store.find_series(id).cloned().expect("series exists")
}

fn apply(store: &mut MemoryStore, intent: Option<Intent>) {
    if let Some(i) = intent {
        store.dispatch(i);
    }
}

#[test]
fn create_then_drag_backwards_normalizes_bounds() {
    init_logging();
    let mut store = MemoryStore::new().with_series(Series::new(1, "eeg"));
    let mut ed = EpochEditor::new();

    let created = ed.init_edit_epoch_start(&series(&store, 1), None, 10.0);
    assert_eq!(
        created,
        Some(Intent::CreateEpoch {
            series_id: 1,
            start: 10.0,
            end: 10.0,
            tag: None
        })
    );
    apply(&mut store, created);
    assert_eq!(ed.state().edge(), Some(EditEdge::New));

    let moved = ed.continue_epoch(5.0);
    assert_eq!(
        moved,
        Some(Intent::SetEpochDomain {
            series_id: 1,
            epoch_index: 0,
            start: 5.0,
            end: 10.0
        })
    );
    apply(&mut store, moved);

    let committed = ed.stop_edit_epoch_end();
    assert!(matches!(
        committed,
        Some(Intent::SetEpochDomain { start, end, .. }) if start == 5.0 && end == 10.0
    ));
    apply(&mut store, committed);
    assert!(ed.is_idle());
    assert_eq!(series(&store, 1).epochs, vec![Epoch::new(5.0, 10.0, None)]);
}

#[test]
fn stop_is_idempotent() {
    let mut store = store_with_epoch(20.0, 40.0);
    let mut ed = EpochEditor::new();
    let intent = ed.init_edit_epoch_start(&series(&store, 1), Some(0), 20.0);
    apply(&mut store, intent);
    apply(&mut store, ed.continue_epoch(12.0));
    apply(&mut store, ed.stop_edit_epoch_start());
    let after_one = series(&store, 1).epochs;
    assert_eq!(ed.stop_edit_epoch_start(), None);
    assert_eq!(ed.stop_edit_epoch_end(), None);
    assert_eq!(series(&store, 1).epochs, after_one);
    assert_eq!(after_one[0].start, 12.0);
    assert_eq!(after_one[0].end, 40.0);
}

#[test]
fn dragging_start_past_end_swaps_edges() {
    let store = store_with_epoch(20.0, 40.0);
    let mut ed = EpochEditor::new();
    assert_eq!(ed.init_edit_epoch_start(&series(&store, 1), Some(0), 20.0), None);
    assert_eq!(ed.state().edge(), Some(EditEdge::Start));

    let i = ed.continue_epoch(50.0);
    assert_eq!(
        i,
        Some(Intent::SetEpochDomain {
            series_id: 1,
            epoch_index: 0,
            start: 40.0,
            end: 50.0
        })
    );
    assert_eq!(ed.state().edge(), Some(EditEdge::End));

    let i = ed.continue_epoch(30.0);
    assert!(matches!(i, Some(Intent::SetEpochDomain { start, end, .. }) if start == 30.0 && end == 40.0));
    assert_eq!(ed.state().edge(), Some(EditEdge::Start));

    // Landing on the anchor keeps the current edge.
    ed.continue_epoch(40.0);
    assert_eq!(ed.state().edge(), Some(EditEdge::Start));
}

#[test]
fn dragging_end_pins_start() {
    let store = store_with_epoch(20.0, 40.0);
    let mut ed = EpochEditor::new();
    ed.init_edit_epoch_end(&series(&store, 1), 0, 40.0);
    let session = ed.session().expect("active");
    assert_eq!(session.anchor_x, 20.0);
    let i = ed.continue_epoch(35.0);
    assert!(matches!(i, Some(Intent::SetEpochDomain { start, end, .. }) if start == 20.0 && end == 35.0));
}

#[test]
fn every_committed_epoch_stays_ordered() {
    let mut store = MemoryStore::new()
        .with_series(Series::new(1, "a").with_epoch(Epoch::new(10.0, 30.0, None)))
        .with_series(Series::new(2, "b"));
    let mut ed = EpochEditor::new();
    // Deterministic pseudo-random walk over operations and positions.
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };
    for _ in 0..2_000 {
        let r = next();
        let x = (r % 1_000) as f64 / 10.0;
        let sid = if r & 1 == 0 { 1 } else { 2 };
        let s = series(&store, sid);
        let intent = match (r >> 12) % 6 {
            0 => ed.init_edit_epoch_start(&s, None, x),
            1 => {
                let idx = if s.epochs.is_empty() { None } else { Some(((r >> 20) as usize) % s.epochs.len()) };
                ed.init_edit_epoch_start(&s, idx, x)
            }
            2 if !s.epochs.is_empty() => ed.init_edit_epoch_end(&s, ((r >> 20) as usize) % s.epochs.len(), x),
            3 => ed.stop_edit_epoch_start(),
            4 => ed.stop_edit_epoch_end(),
            _ => ed.continue_epoch(x),
        };
        if let Some(Intent::SetEpochDomain { start, end, .. }) = &intent {
            assert!(start <= end);
        }
        apply(&mut store, intent);
        for s in store.series() {
            for e in &s.epochs {
                assert!(e.start <= e.end, "inverted epoch {e:?}");
            }
        }
    }
}

#[test]
fn second_gesture_is_rejected_while_one_is_active() {
    let store = store_with_epoch(20.0, 40.0);
    let mut ed = EpochEditor::new();
    ed.init_edit_epoch_end(&series(&store, 1), 0, 40.0);
    let before = ed.state().clone();
    assert_eq!(ed.init_edit_epoch_start(&series(&store, 1), None, 5.0), None);
    assert_eq!(ed.init_edit_epoch_end(&series(&store, 1), 0, 5.0), None);
    assert_eq!(ed.state(), &before);
}

#[test]
fn out_of_order_events_are_no_ops() {
    let store = store_with_epoch(20.0, 40.0);
    let mut ed = EpochEditor::new();
    assert_eq!(ed.continue_epoch(3.0), None);
    assert_eq!(ed.stop_edit_epoch_end(), None);
    assert_eq!(ed.cancel(), None);
    assert_eq!(ed.init_edit_epoch_end(&series(&store, 1), 7, 3.0), None);
    assert_eq!(ed.init_edit_epoch_start(&series(&store, 1), None, f64::NAN), None);
    assert_eq!(ed.state(), &EditState::Idle);
}

#[test]
fn release_without_move_commits_nothing() {
    let store = store_with_epoch(20.0, 40.0);
    let mut ed = EpochEditor::new();
    ed.init_edit_epoch_start(&series(&store, 1), Some(0), 21.5);
    assert_eq!(ed.stop_edit_epoch_start(), None);
    assert!(ed.is_idle());
}

#[test]
fn cancel_restores_or_removes() {
    let mut store = store_with_epoch(20.0, 40.0);
    let mut ed = EpochEditor::new();

    let intent = ed.init_edit_epoch_end(&series(&store, 1), 0, 40.0);
    apply(&mut store, intent);
    apply(&mut store, ed.continue_epoch(70.0));
    assert_eq!(series(&store, 1).epochs[0].end, 70.0);
    apply(&mut store, ed.cancel());
    assert_eq!(series(&store, 1).epochs[0], Epoch::new(20.0, 40.0, None));
    assert!(ed.is_idle());

    let intent = ed.init_edit_epoch_start(&series(&store, 1), None, 80.0);
    apply(&mut store, intent);
    apply(&mut store, ed.continue_epoch(90.0));
    assert_eq!(series(&store, 1).epochs.len(), 2);
    let undo = ed.cancel();
    assert_eq!(
        undo,
        Some(Intent::RemoveEpoch {
            series_id: 1,
            epoch_index: 1
        })
    );
    apply(&mut store, undo);
    assert_eq!(series(&store, 1).epochs.len(), 1);
}

#[test]
fn active_tag_is_attached_to_new_epochs() {
    let store = MemoryStore::new().with_series(Series::new(4, "emg"));
    let mut ed = EpochEditor::new();
    ed.set_active_tag(Some(EpochTag::new("sleep")));
    let i = ed.init_edit_epoch_start(&series(&store, 4), None, 1.0);
    assert_eq!(
        i,
        Some(Intent::CreateEpoch {
            series_id: 4,
            start: 1.0,
            end: 1.0,
            tag: Some(EpochTag::new("sleep"))
        })
    );
}
