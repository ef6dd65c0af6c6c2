mod common;

use kira_boldqc::toolkit::parse::{
    format_motion_params, parse_avscale, parse_image_info, parse_motion_params,
    parse_region_stats, parse_single_stat, parse_volume_count,
};

#[test]
fn image_info_fields() {
    let info = parse_image_info(common::FSLINFO);
    assert_eq!(info.data_type.as_deref(), Some("FLOAT32"));
    assert_eq!(info.spatial_dims(), Some([64, 64, 36]));
    assert_eq!(info.dims[3], Some(5));
    assert_eq!(info.voxel_size(), Some([3.0, 3.0, 3.5]));
    assert_eq!(info.repetition_time(), Some(2.0));
}

#[test]
fn image_info_tolerates_missing_keys() {
    let info = parse_image_info("dim1 10\ngarbage\n");
    assert_eq!(info.dims[0], Some(10));
    assert_eq!(info.spatial_dims(), None);
    assert_eq!(info.repetition_time(), None);
}

#[test]
fn volume_count() {
    assert_eq!(parse_volume_count("180\n").unwrap(), 180);
    assert!(parse_volume_count("").is_err());
    assert!(parse_volume_count("-3").is_err());
}

#[test]
fn region_stats_needs_four_values() {
    let s = parse_region_stats("42.1 10.2 0.0 88.3 \n").unwrap();
    assert_eq!(s.mean, 42.1);
    assert_eq!(s.std, 10.2);
    assert_eq!(s.min, 0.0);
    assert_eq!(s.max, 88.3);
    assert!(parse_region_stats("42.1 10.2").is_err());
    assert!(parse_region_stats("a b c d").is_err());
}

#[test]
fn single_stat() {
    assert_eq!(parse_single_stat("812.5 \n").unwrap(), 812.5);
    assert!(parse_single_stat("   ").is_err());
}

#[test]
fn avscale_rotation_then_translation() {
    let p = parse_avscale(common::AVSCALE).unwrap();
    assert_eq!(p, [0.01, -0.02, 0.0, 0.5, -0.25, 0.125]);
    assert!(parse_avscale("Scales (x,y,z) = 1 1 1\n").is_err());
}

#[test]
fn motion_params_rows() {
    let rows = parse_motion_params(common::PAR).unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[1], [0.002, 0.001, -0.003, 0.15, 0.30, -0.40]);
    assert!(parse_motion_params("0 0 0 0 0\n").is_err());
}

#[test]
fn formatted_params_parse_back() {
    let rows = vec![[0.01, -0.02, 0.0, 0.5, -0.25, 0.125]];
    let text = format_motion_params(&rows);
    assert_eq!(
        text,
        "0.010000  -0.020000  0.000000  0.500000  -0.250000  0.125000\n"
    );
    assert_eq!(parse_motion_params(&text).unwrap(), rows);
}
