use kira_boldqc::math::stats::{count_above, max, max_abs, mean};

#[test]
fn mean_basic() {
    let m = mean(&[1.0, 2.0, 3.0, 6.0]).unwrap();
    assert!((m - 3.0).abs() < 1e-12);
}

#[test]
fn mean_empty_is_none() {
    assert_eq!(mean(&[]), None);
}

#[test]
fn max_skips_nan() {
    assert_eq!(max(&[0.2, f64::NAN, 0.7, 0.1]), Some(0.7));
    assert_eq!(max(&[f64::NAN]), None);
    assert_eq!(max(&[]), None);
}

#[test]
fn count_above_is_strict() {
    let v = [0.5, 0.51, 0.2, 1.0];
    assert_eq!(count_above(&v, 0.5), 2);
    assert_eq!(count_above(&v, f64::INFINITY), 0);
}

#[test]
fn max_abs_uses_magnitude() {
    let v = [0.1, -0.4, 0.3];
    assert_eq!(max_abs(&v), Some(0.4));
    assert_eq!(max_abs(&Vec::<f64>::new()), None);
}
