use kira_boldqc::io::html::{ReportView, escape_html, fmt_value, known_path, render_report};
use kira_boldqc::metrics::{
    DvarsSummary, FdSummary, ImageInfo, MotionSummary, ParamsSource, RegionStats, SeriesSummary,
};
use kira_boldqc::pipeline::{StageOutcome, StageRecord};

fn view() -> ReportView {
    ReportView {
        subject: "sub01".to_string(),
        scan: Some("/data/bold.nii.gz".to_string()),
        mask: Some("/data/mask.nii.gz".to_string()),
        generated_at: "2026-01-01 00:00:00".to_string(),
        image: Some(ImageInfo {
            data_type: Some("FLOAT32".to_string()),
            dims: [Some(64), Some(64), Some(36), Some(5)],
            pixdims: [Some(3.0), Some(3.0), Some(3.5), Some(2.0)],
        }),
        n_volumes: Some(5),
        tsnr: Some(RegionStats {
            mean: 42.1,
            std: 10.2,
            min: 0.0,
            max: 88.3,
        }),
        mean_intensity: Some(812.5),
        motion: Some(MotionSummary {
            source: ParamsSource::ParFile,
            n_volumes: 5,
            max_abs_translation_mm: Some(0.4),
            max_abs_rotation_deg: Some(0.17),
            mean_rel_rms_mm: Some(0.045),
            mean_abs_rms_mm: Some(0.11),
        }),
        fd: FdSummary {
            series: SeriesSummary {
                n: 3,
                mean: Some(0.1),
                max: Some(0.3),
                count_above: 0,
            },
            threshold_mm: 0.5,
        },
        dvars: DvarsSummary {
            series: SeriesSummary {
                n: 4,
                mean: Some(33.5),
                max: Some(60.0),
                count_above: 0,
            },
            outlier_count: 2,
        },
        fd_plot: "sub01_fd_plot.png".to_string(),
        dvars_plot: "sub01_dvars_plot.png".to_string(),
        stages: vec![StageRecord {
            name: "stage3_motion",
            label: "Motion correction",
            outcome: StageOutcome::Succeeded,
            elapsed_ms: 12,
        }],
        warnings: Vec::new(),
    }
}

#[test]
fn good_run_renders_classified_cells() {
    let html = render_report(&view()).unwrap();
    assert!(html.contains("<title>fMRI QC report: sub01</title>"));
    assert!(html.contains("<td class=\"good\">42.10 (Good)</td>"));
    assert!(html.contains("<td class=\"good\">0.100 (Low)</td>"));
    assert!(html.contains("<td class=\"good\">0.300 (Low)</td>"));
    assert!(html.contains("64 x 64 x 36"));
    assert!(html.contains("src=\"sub01_fd_plot.png\""));
    assert!(html.contains("src=\"sub01_dvars_plot.png\""));
    assert!(!html.contains("<h2>Warnings</h2>"));
}

#[test]
fn overall_label_is_fixed_even_for_bad_metrics() {
    let mut v = view();
    v.tsnr = Some(RegionStats {
        mean: 4.0,
        std: 1.0,
        min: 0.0,
        max: 9.0,
    });
    v.fd.series.mean = Some(0.9);
    v.fd.series.max = Some(3.0);
    let html = render_report(&v).unwrap();
    assert!(html.contains("Overall quality: <span class=\"good\">GOOD</span>"));
    assert!(html.contains("<td class=\"bad\">4.00 (Poor)</td>"));
    assert!(html.contains("<td class=\"warning\">0.900 (Elevated)</td>"));
    assert!(html.contains("<td class=\"warning\">3.000 (High)</td>"));
}

#[test]
fn missing_metrics_render_as_na() {
    let mut v = view();
    v.tsnr = None;
    v.motion = None;
    v.fd = FdSummary::unavailable();
    v.dvars = DvarsSummary::unavailable();
    let html = render_report(&v).unwrap();
    assert!(html.contains("<tr><th>Mean tSNR (in mask)</th><td class=\"na\">NA</td></tr>"));
    assert!(html.contains("<tr><th>Mean FD (mm)</th><td class=\"na\">NA</td></tr>"));
    assert!(html.contains("<tr><th>Max DVARS</th><td class=\"na\">NA</td></tr>"));
}

#[test]
fn failed_stage_and_warnings_are_listed() {
    let mut v = view();
    v.stages.push(StageRecord {
        name: "stage4_tsnr",
        label: "Temporal statistics",
        outcome: StageOutcome::Skipped("requires stage3_motion".to_string()),
        elapsed_ms: 0,
    });
    v.warnings.push("only <1> volume".to_string());
    let html = render_report(&v).unwrap();
    assert!(html.contains("<td class=\"warning\">skipped</td><td>requires stage3_motion</td>"));
    assert!(html.contains("<li>only &lt;1&gt; volume</li>"));
}

#[test]
fn unknown_inputs_render_as_na() {
    let mut v = view();
    assert!(render_report(&v).unwrap().contains("Input: /data/bold.nii.gz<br/>"));
    v.scan = None;
    v.mask = None;
    let html = render_report(&v).unwrap();
    assert!(html.contains("Input: NA<br/>Mask: NA<br/>"));
}

#[test]
fn known_path_of_empty_path_is_none() {
    assert_eq!(known_path(std::path::Path::new("")), None);
    assert_eq!(
        known_path(std::path::Path::new("bold.nii.gz")).as_deref(),
        Some("bold.nii.gz")
    );
}

#[test]
fn subject_is_escaped() {
    let mut v = view();
    v.subject = "a&b".to_string();
    let html = render_report(&v).unwrap();
    assert!(html.contains("fMRI QC report: a&amp;b"));
}

#[test]
fn helpers() {
    assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    assert_eq!(fmt_value(1.23456, 2), "1.23");
    assert_eq!(fmt_value(f64::INFINITY, 2), "inf");
}
