use stackplot::data::domain::Extent;
use stackplot::layout::{RowBand, Viewport};
use stackplot::scale::{build_horizontal_scale, build_row_scale, LinearScale};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn horizontal_scale_maps_domain_onto_plot_width() {
    let s = build_horizontal_scale(Extent::new(0.0, 100.0), (0.0, 720.0));
    assert!(close(s.apply(0.0), 0.0));
    assert!(close(s.apply(50.0), 360.0));
    assert!(close(s.apply(100.0), 720.0));
    assert!(close(s.invert(180.0), 25.0));
}

#[test]
fn row_scales_round_trip_and_are_inverted() {
    let vp = Viewport::new(800.0, 400.0);
    let bands = vp.row_bands(3);
    let domain = Extent::new(-2.5, 7.5);
    for band in &bands {
        for padding in [0.0, 4.0, 12.0] {
            let s = build_row_scale(domain, band, padding);
            assert!(
                s.apply(domain.max) < s.apply(domain.min),
                "row {} padding {padding}: max must sit above min",
                band.index
            );
            for v in [-2.5, -1.0, 0.0, 0.3, 3.75, 7.5] {
                let back = s.invert(s.apply(v));
                assert!((back - v).abs() < 1e-9, "round trip of {v} gave {back}");
            }
        }
    }
}

#[test]
fn row_scale_range_is_padded_band() {
    let band = RowBand {
        index: 1,
        top: 170.0,
        bottom: 340.0,
    };
    let s = build_row_scale(Extent::new(0.0, 1.0), &band, 5.0);
    assert_eq!(s.range(), (335.0, 175.0));
    assert_eq!(s.range_bounds(), (175.0, 335.0));
}

#[test]
fn zero_width_domain_maps_to_range_midpoint() {
    let s = LinearScale::new(Extent::new(3.0, 3.0), (100.0, 0.0));
    assert!(close(s.apply(3.0), 50.0));
    assert!(close(s.apply(-40.0), 50.0));
    assert!(close(s.invert(12.0), 3.0));
}

#[test]
fn zero_height_band_inverts_to_domain_midpoint() {
    let band = RowBand {
        index: 0,
        top: 10.0,
        bottom: 10.0,
    };
    let s = build_row_scale(Extent::new(0.0, 8.0), &band, 0.0);
    assert!(close(s.invert(10.0), 4.0));
    assert!(close(s.invert(999.0), 4.0));
}

#[test]
fn oversized_padding_collapses_band_to_midpoint() {
    let band = RowBand {
        index: 0,
        top: 0.0,
        bottom: 10.0,
    };
    let s = build_row_scale(Extent::new(0.0, 8.0), &band, 20.0);
    assert_eq!(s.range(), (5.0, 5.0));
    assert!(close(s.invert(5.0), 4.0));
}

#[test]
fn with_range_builds_a_new_scale() {
    let s = LinearScale::new(Extent::new(0.0, 10.0), (0.0, 100.0));
    let t = s.with_range((0.0, 200.0));
    assert!(close(s.apply(5.0), 50.0));
    assert!(close(t.apply(5.0), 100.0));
    let u = s.with_domain(Extent::new(0.0, 20.0));
    assert!(close(u.apply(5.0), 25.0));
}

#[test]
fn ticks_stay_inside_domain() {
    let s = LinearScale::new(Extent::new(-0.37, 4.2), (0.0, 100.0));
    let ticks = s.ticks(5);
    assert_eq!(ticks, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert!(s.ticks(0).is_empty());
    let flat = LinearScale::new(Extent::new(2.0, 2.0), (0.0, 100.0));
    assert_eq!(flat.ticks(4), vec![2.0]);
}

#[test]
fn subnormal_span_yields_domain_bounds_as_ticks() {
    let s = LinearScale::new(Extent::new(0.0, 1e-310), (0.0, 100.0));
    assert_eq!(s.ticks(4), vec![0.0, 1e-310]);
    let tiny = LinearScale::new(Extent::new(1.0, 1.0 + 1e-15), (0.0, 100.0));
    let ticks = tiny.ticks(10);
    assert!(!ticks.is_empty() && ticks.len() <= 100);
}
