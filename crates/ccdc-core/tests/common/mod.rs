use ccdc_core::consts::HARMONIC_TERM_COUNT;
use ccdc_core::model::{BandModel, SegmentedPixelModel};
use ndarray::Array2;

/// Coefficient value used by [`build_model`] for band `b`, segment `seg`, term `t`.
pub fn coef_value(b: usize, seg: usize, t: usize) -> f64 {
    b as f64 * 100.0 + seg as f64 * 10.0 + t as f64
}

/// Build a consistent pixel model with one segment per entry of `t_end`.
///
/// Segment `i` starts 100 ms after segment `i - 1` ends (a short break), the
/// first segment starts 500 ms before its end. Ends must be at least 200 ms
/// apart.
pub fn build_model(bands: &[&str], t_end: &[i64]) -> SegmentedPixelModel {
    let n = t_end.len();
    let t_start: Vec<i64> = (0..n)
        .map(|i| if i == 0 { t_end[0] - 500 } else { t_end[i - 1] + 100 })
        .collect();
    let t_break: Vec<i64> = (0..n)
        .map(|i| if i + 1 == n { 0 } else { t_end[i] + 50 })
        .collect();
    let num_obs: Vec<i64> = (0..n).map(|i| 10 + i as i64).collect();

    let bands = bands
        .iter()
        .enumerate()
        .map(|(b, name)| {
            let coefs = Array2::from_shape_fn((n, HARMONIC_TERM_COUNT), |(seg, t)| {
                coef_value(b, seg, t)
            });
            let magnitude = (0..n).map(|seg| -(seg as f64) - 0.5).collect();
            let rmse = (0..n).map(|seg| 0.01 * (seg + 1) as f64).collect();
            BandModel::new(*name, coefs, magnitude, rmse)
        })
        .collect();

    SegmentedPixelModel {
        t_start,
        t_end: t_end.to_vec(),
        t_break,
        num_obs,
        bands,
    }
}

/// JSON text of a nested coefficient array, as found in exported CSV cells.
pub fn coefs_json(rows: &[[f64; 8]]) -> String {
    serde_json::to_string(rows).expect("serialize coefficients")
}

/// A CSV sampled table with `red` and `nir` bands and two samples of the
/// same two-segment pixel, dated 1500 ms and 5000 ms.
pub fn two_band_csv() -> String {
    let coefs = coefs_json(&[
        [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8],
        [1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8],
    ]);
    let nir = coefs_json(&[
        [2.1, 2.2, 2.3, 2.4, 2.5, 2.6, 2.7, 2.8],
        [3.1, 3.2, 3.3, 3.4, 3.5, 3.6, 3.7, 3.8],
    ]);
    let quoted = |s: &str| format!("\"{}\"", s.replace('"', "\"\""));
    let header = "shot_num,millis,tStart,tEnd,tBreak,numObs,red_coefs,red_magnitude,red_rmse,nir_coefs,nir_magnitude,nir_rmse,.geo";
    let row = |shot: &str, millis: &str| {
        format!(
            "{shot},{millis},{},{},{},{},{},{},{},{},{},{},{}",
            quoted("[100,2100]"),
            quoted("[2000,4000]"),
            quoted("[2050,0]"),
            quoted("[25,31]"),
            quoted(&coefs),
            quoted("[-0.05,0.0]"),
            quoted("[0.011,0.012]"),
            quoted(&nir),
            quoted("[0.2,0.0]"),
            quoted("[0.021,0.022]"),
            quoted(r#"{"type":"Point","coordinates":[31.5,-24.2]}"#),
        )
    };
    format!(
        "{header}\n{}\n{}\n",
        row("73480100100060726", "1500"),
        row("73480100100060727", "5000")
    )
}

/// Write `contents` to a named file inside a fresh temp directory.
pub fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
