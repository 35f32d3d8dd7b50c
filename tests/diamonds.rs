use std::io::Write;

use ferrite_regress::tasks::{curve_fit, diamond_price};
use ferrite_regress::{CurveFitConfig, DiamondConfig, TargetTransform};

const CUTS: [&str; 6] = ["Fair", "Good", "Very Good", "Premium", "Ideal", "Unknown"];
const COLORS: [&str; 7] = ["J", "I", "H", "G", "F", "E", "D"];
const CLARITIES: [&str; 8] = ["I1", "SI2", "SI1", "VS2", "VS1", "VVS2", "VVS1", "IF"];

fn write_csv(rows: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "carat,cut,color,clarity,depth,table,price").unwrap();
    for i in 0..rows {
        let carat = 0.3 + (i % 17) as f64 * 0.1;
        let depth = 58.0 + (i % 7) as f64;
        let table = 54.0 + (i % 5) as f64;
        let price = (carat * 4000.0 + (i % 8) as f64 * 150.0).round();
        // Every 11th row is missing its carat value.
        let carat_cell = if i % 11 == 3 { String::new() } else { format!("{carat:.2}") };
        writeln!(
            file,
            "{},\"{}\",{},{},{:.1},{:.1},{}",
            carat_cell,
            CUTS[i % CUTS.len()],
            COLORS[i % COLORS.len()],
            CLARITIES[i % CLARITIES.len()],
            depth,
            table,
            price
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

fn small_config() -> DiamondConfig {
    DiamondConfig {
        hidden_sizes: vec![16, 8, 4],
        epochs: 6,
        batch_size: 16,
        sample_predictions: 3,
        log_every: 0,
        ..DiamondConfig::default()
    }
}

#[test]
fn diamond_run_end_to_end() {
    let file = write_csv(70);
    let report = diamond_price::run(file.path(), &small_config()).unwrap();

    assert_eq!(report.outcome.history.len(), 6);
    assert!(report.outcome.history.iter().all(f64::is_finite));
    assert_eq!(report.outcome.model.target_transform(), TargetTransform::Log1p);
    assert_eq!(report.outcome.model.stats().n_features(), 33);

    assert_eq!(report.samples.len(), 3);
    for s in &report.samples {
        assert!(s.row < 70);
        assert!(s.actual > 0.0);
        assert!(s.predicted.is_finite());
    }
    assert!(report.mean_absolute_error.is_finite());
}

#[test]
fn diamond_run_is_reproducible() {
    let file = write_csv(40);
    let a = diamond_price::run(file.path(), &small_config()).unwrap();
    let b = diamond_price::run(file.path(), &small_config()).unwrap();
    assert_eq!(a.outcome.history, b.outcome.history);
    assert_eq!(a.samples, b.samples);
}

#[test]
fn missing_file_is_an_error() {
    let err = diamond_price::run("/nonexistent/diamonds.csv", &small_config());
    assert!(err.is_err());
}

#[test]
fn curve_task_reports_probe_points() {
    let config = CurveFitConfig {
        epochs: 200,
        learning_rate: 0.01,
        ..CurveFitConfig::default()
    };
    let report = curve_fit::run(&config).unwrap();
    let xs: Vec<f64> = report.probes.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![-8.0, -4.0, 0.0, 4.0, 8.0]);
    assert!((report.probes[4].actual - 68.8).abs() < 1e-9);
    assert!(report.probes.iter().all(|p| p.predicted.is_finite()));
}
