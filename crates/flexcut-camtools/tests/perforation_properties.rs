use flexcut_camtools::{ChordMeasurer, PathMeasurer, PerforationConfig, PerforationFilter};
use flexcut_core::Polyline;
use proptest::prelude::*;

const TOL: f64 = 1e-6;

fn straight(length: f64) -> Polyline {
    Polyline::from(vec![(0.0, 0.0), (length, 0.0)])
}

fn polyline_strategy() -> impl Strategy<Value = Polyline> {
    prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 2..12).prop_map(Polyline::from)
}

proptest! {
    #[test]
    fn zero_bridge_is_identity(
        cut in 0.0..20.0f64,
        start_with_cut in any::<bool>(),
        polys in prop::collection::vec(polyline_strategy(), 0..6),
    ) {
        let filter = PerforationFilter::new(PerforationConfig::new(cut, 0.0, start_with_cut));
        prop_assert_eq!(filter.apply_to_polypath(&polys), polys);
    }

    #[test]
    fn single_points_pass_through(
        x in -50.0..50.0f64,
        y in -50.0..50.0f64,
        cut in 0.1..20.0f64,
        bridge in 0.1..20.0f64,
    ) {
        let single = Polyline::from(vec![(x, y)]);
        let filter = PerforationFilter::new(PerforationConfig::new(cut, bridge, true));
        prop_assert_eq!(filter.apply_to_polypath(std::slice::from_ref(&single)), vec![single]);
    }

    #[test]
    fn bridge_first_short_paths_are_skipped(
        cut in 0.1..20.0f64,
        bridge in 0.1..20.0f64,
        fraction in 0.01..1.0f64,
    ) {
        let filter = PerforationFilter::new(PerforationConfig::new(cut, bridge, false));
        let output = filter.apply_to_polypath(&[straight(cut * fraction)]);
        prop_assert!(output.is_empty());
    }

    #[test]
    fn straight_line_cuts_are_ordered_and_bounded(
        cut in 0.1..20.0f64,
        bridge in 0.1..20.0f64,
        length in 0.5..500.0f64,
        start_with_cut in any::<bool>(),
    ) {
        let config = PerforationConfig::new(cut, bridge, start_with_cut);
        let filter = PerforationFilter::new(config);
        let input = straight(length);
        let output = filter.apply_to_polypath(std::slice::from_ref(&input));

        // fallback to the untouched polyline carries no pattern to check
        prop_assume!(output != vec![input]);

        let mut previous_end: Option<f64> = None;
        for segment in &output {
            prop_assert_eq!(segment.len(), 2);
            let start = segment.points()[0].x;
            let end = segment.points()[1].x;
            prop_assert!(end > start);
            prop_assert!(end - start <= cut + TOL);
            if let Some(previous_end) = previous_end {
                prop_assert!(start >= previous_end + bridge - TOL);
            }
            previous_end = Some(end);
        }

        if let Some(last_end) = previous_end {
            prop_assert!(last_end <= length + TOL);
            if length > cut + bridge {
                // a full pattern always leaves a bridge at the end
                prop_assert!(last_end < length - TOL);
            }
        }
    }

    #[test]
    fn cuts_stay_inside_source_bounds(
        cut in 0.1..20.0f64,
        bridge in 0.1..20.0f64,
        start_with_cut in any::<bool>(),
        poly in polyline_strategy(),
    ) {
        let measurer = ChordMeasurer::new();
        let filter = PerforationFilter::new(PerforationConfig::new(cut, bridge, start_with_cut));
        let bbox = poly.bounding_box().unwrap();

        for segment in filter.apply_to_polypath(std::slice::from_ref(&poly)) {
            if segment == poly {
                continue;
            }
            prop_assert!(measurer.total_length(&segment).unwrap() <= cut + TOL);
            for point in segment.points() {
                prop_assert!(bbox.contains(point, TOL));
            }
        }
    }
}
