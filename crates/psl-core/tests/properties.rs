use proptest::prelude::*;

use psl_core::geometry::normalize;
use psl_core::score::overall_from_raw;
use psl_core::{classify, generate_advice, Gender, ScoreProfile, SubScores, BANDS};

fn sub_scores() -> impl Strategy<Value = SubScores> {
    prop::array::uniform7(0.0_f64..=100.0).prop_map(|v| SubScores {
        symmetry: v[0],
        facial_thirds: v[1],
        jawline: v[2],
        eyes: v[3],
        canthal_tilt: v[4],
        lips: v[5],
        detection_quality: v[6],
    })
}

fn gender() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female)]
}

proptest! {
    #[test]
    fn pt_normalize_ideal_and_floor(ideal in -5.0_f64..5.0, tol in 0.01_f64..2.0) {
        prop_assert_eq!(normalize(ideal, ideal, tol), 100.0);
        prop_assert!(normalize(ideal + tol, ideal, tol) < 1e-9);
        prop_assert_eq!(normalize(ideal + 2.0 * tol, ideal, tol), 0.0);
        prop_assert_eq!(normalize(ideal - 2.0 * tol, ideal, tol), 0.0);
    }

    #[test]
    fn pt_normalize_bounded(m in -10.0_f64..10.0, ideal in -5.0_f64..5.0, tol in 0.01_f64..2.0) {
        let s = normalize(m, ideal, tol);
        prop_assert!((0.0..=100.0).contains(&s));
    }

    #[test]
    fn pt_overall_monotonic(a in -20.0_f64..120.0, b in -20.0_f64..120.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(overall_from_raw(lo) <= overall_from_raw(hi));
    }

    #[test]
    fn pt_potential_bounds(sub in sub_scores()) {
        let p = ScoreProfile::from_sub_scores(sub);
        prop_assert!((1.0..=10.0).contains(&p.overall));
        prop_assert!(p.potential >= p.overall);
        prop_assert!(p.potential <= 10.0);
        if p.overall <= 9.7 {
            prop_assert!(p.potential >= p.overall + 0.3 - 1e-9);
        }
    }

    #[test]
    fn pt_classify_unique(tenths in 10_u32..=100) {
        let s = tenths as f64 / 10.0;
        let matches = BANDS.iter().filter(|b| b.contains(s)).count();
        prop_assert_eq!(matches, 1);
        prop_assert!(classify(s).contains(s));
    }

    #[test]
    fn pt_advice_sorted_and_deterministic(sub in sub_scores(), g in gender(), age in 13_u32..90) {
        let p = ScoreProfile::from_sub_scores(sub);
        let first = generate_advice(&p, g, age);
        prop_assert!(first.windows(2).all(|w| w[0].priority <= w[1].priority));
        prop_assert_eq!(&first, &generate_advice(&p, g, age));
        if g == Gender::Male {
            prop_assert!(first.iter().all(|a| !a.gender_restricted));
        }
    }
}

#[test]
fn band_boundaries_sampled() {
    for band in BANDS.iter() {
        assert_eq!(classify(band.min), band);
        assert_eq!(classify(band.max), band);
    }
    for pair in BANDS.windows(2) {
        assert!(((pair[1].min - pair[0].max) - 0.1).abs() < 1e-9);
    }
    assert_eq!(BANDS[0].min, 1.0);
    assert_eq!(BANDS[BANDS.len() - 1].max, 10.0);
}
