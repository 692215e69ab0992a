use anyhow::{anyhow, bail, Context, Result};
use fracsmooth::kernel::KernelLifecycle;
use fracsmooth::smoothing::traits::SpectrumSmooth;
use fracsmooth::smoothing::{FracSmoothConfig, FracSmoothKernel};
use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const DEFAULT_PYTHON_BIN: &str = "python";

const PY_SMOOTH_SCRIPT: &str = r#"
import json
import sys
import time
import numpy as np

env = json.loads(sys.stdin.read())
iters = int(env["iters"])
p = env["payload"]

data = np.asarray(p["re"], dtype=float) + 1j * np.asarray(p["im"], dtype=float)
width = float(p["width"])

def _limits(low, up, size):
    low_ceil = np.ceil(low)
    up_floor = np.floor(up)
    begin = low_ceil - 0.5 if (low_ceil - low) > .5 else low_ceil + 0.5
    end = up_floor + 1 if (up - up_floor) > .5 else up_floor
    base = np.arange(begin, end)
    upper = np.append(base, up)
    lower = np.append(low, base)
    front = int(upper[0])
    upper = np.pad(upper, (front, 0))
    lower = np.pad(lower, (front, 0))
    upper = np.pad(upper, (0, size - len(upper)))
    lower = np.pad(lower, (0, size - len(lower)))
    return np.stack((upper, lower))

def _compute():
    n_bins = data.shape[-1]
    k = np.arange(n_bins)
    low = k * 2 ** (-width / 2)
    up = k * 2 ** (width / 2)
    size = int(np.ceil(up[-1]) + 1)
    mat = np.array([_limits(l, u, size) for l, u in zip(low, up)])
    with np.errstate(divide="ignore", invalid="ignore"):
        mat = np.log2(mat / k[:, None, None])
    mat = np.nan_to_num(mat, nan=0.0, posinf=0.0, neginf=0.0)
    weights = (mat[:, 0] - mat[:, 1]) / width
    weights[0, 0] = 1
    mean_size = n_bins - (weights != 0).argmax(axis=1)
    mag = np.abs(data)
    padded = np.array([
        np.pad(mag, ((0, 0), (0, size - n_bins)), "mean", stat_length=m)
        for m in mean_size
    ])
    padded = np.moveaxis(padded, 1, 0)
    smoothed = np.sum(weights[None] * padded, axis=2)
    return smoothed * np.exp(1j * np.angle(data))

y = _compute()

t0 = time.perf_counter_ns()
for _ in range(iters):
    _compute()
t1 = time.perf_counter_ns()

print(json.dumps({
    "output": np.concatenate([y.real.ravel(), y.imag.ravel()]).tolist(),
    "avg_ns": (t1 - t0) / max(iters, 1),
    "python_version": sys.version.split()[0],
    "numpy_version": np.__version__
}))
"#;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct PythonEval {
    output: Vec<f64>,
    avg_ns: f64,
    python_version: String,
    numpy_version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ContractRow {
    case_id: String,
    n_channels: usize,
    n_bins: usize,
    width: f64,
    pearson_r: f64,
    mae: f64,
    rmse: f64,
    max_abs: f64,
    rust_ns: f64,
    python_ns: f64,
    speedup_vs_python: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContractBundle {
    generated_epoch_seconds: u64,
    python_executable: String,
    python_version: String,
    numpy_version: String,
    rows: Vec<ContractRow>,
}

struct ContractCase {
    case_id: &'static str,
    width: f64,
    spectrum: Array2<Complex<f64>>,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("contracts") => run_contracts(),
        _ => {
            eprintln!("Usage:");
            eprintln!("  cargo run -p xtask -- contracts");
            Ok(())
        }
    }
}

fn run_contracts() -> Result<()> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let out_dir = PathBuf::from(format!("target/contracts/{ts}"));
    fs::create_dir_all(&out_dir).context("creating contract output directory")?;

    let python_bin = detect_python_bin();
    let mut rows = Vec::new();
    let mut versions = None;

    for case in contract_cases() {
        let kernel = FracSmoothKernel::try_new(FracSmoothConfig::new(case.width))?;
        let candidate = kernel
            .run_alloc(&case.spectrum)
            .map_err(|e| anyhow!("{} candidate execution failed: {e}", case.case_id))?;
        let py = python_smooth_eval(&python_bin, &case.spectrum, case.width, 20)?;

        let rust_ns = benchmark_avg_ns(20, || {
            kernel
                .run_alloc(&case.spectrum)
                .map(|_| ())
                .map_err(|e| anyhow!("{} candidate benchmark failed: {e}", case.case_id))
        })?;

        let candidate = flatten_complex(&candidate);
        ensure_same_length(case.case_id, &candidate, &py.output)?;

        let (n_channels, n_bins) = case.spectrum.dim();
        rows.push(build_row(RowBuildInput {
            case_id: case.case_id,
            n_channels,
            n_bins,
            width: case.width,
            rust_candidate: &candidate,
            python_reference: &py.output,
            rust_ns,
            python_ns: py.avg_ns,
        }));
        if versions.is_none() {
            versions = Some((py.python_version, py.numpy_version));
        }
    }

    let (python_version, numpy_version) = versions.unwrap_or_default();
    let bundle = ContractBundle {
        generated_epoch_seconds: ts,
        python_executable: python_bin.to_string_lossy().into_owned(),
        python_version,
        numpy_version,
        rows,
    };

    let summary_json = out_dir.join("summary.json");
    fs::write(
        &summary_json,
        serde_json::to_vec_pretty(&bundle).context("serializing contract summary")?,
    )
    .with_context(|| format!("writing {}", summary_json.display()))?;
    let summary_csv = out_dir.join("summary.csv");
    write_summary_csv(&summary_csv, &bundle.rows)?;

    println!("Contract artifacts:");
    println!("  - {}", summary_json.display());
    println!("  - {}", summary_csv.display());
    println!("  - cases: {}", bundle.rows.len());
    for row in &bundle.rows {
        println!(
            "    {:<28} max_abs={:.3e} pearson={:.9} speedup={:.1}x",
            row.case_id, row.max_abs, row.pearson_r, row.speedup_vs_python
        );
    }

    Ok(())
}

fn contract_cases() -> Vec<ContractCase> {
    let ramp = Array2::from_shape_fn((1, 5), |(_, k)| Complex::new(k as f64 + 1.0, 0.0));

    // Two channels of a resonant transfer function with linear phase.
    let resonant = Array2::from_shape_fn((2, 513), |(c, k)| {
        let f = k as f64 / 512.0;
        let peak = 1.0 / (1.0 + ((f - 0.1 * (c + 1) as f64) * 40.0).powi(2));
        let ripple = 0.2 * (k as f64 * 0.7).sin().abs();
        Complex::from_polar(0.05 + peak + ripple, -(k as f64) * 0.01 * (c + 1) as f64)
    });

    let comb = Array2::from_shape_fn((1, 1025), |(_, k)| {
        Complex::new(if k % 3 == 0 { 1.0 } else { 0.25 }, 0.1)
    });

    vec![
        ContractCase {
            case_id: "ramp_5_one_octave",
            width: 1.0,
            spectrum: ramp,
        },
        ContractCase {
            case_id: "resonant_2x513_third_octave",
            width: 1.0 / 3.0,
            spectrum: resonant.clone(),
        },
        ContractCase {
            case_id: "resonant_2x513_two_octaves",
            width: 2.0,
            spectrum: resonant,
        },
        ContractCase {
            case_id: "comb_1025_24th_octave",
            width: 1.0 / 24.0,
            spectrum: comb,
        },
    ]
}

fn detect_python_bin() -> PathBuf {
    PathBuf::from(DEFAULT_PYTHON_BIN)
}

fn python_smooth_eval(
    python_bin: &Path,
    spectrum: &Array2<Complex<f64>>,
    width: f64,
    iters: usize,
) -> Result<PythonEval> {
    let re: Vec<Vec<f64>> = spectrum
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|z| z.re).collect())
        .collect();
    let im: Vec<Vec<f64>> = spectrum
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|z| z.im).collect())
        .collect();
    run_python_eval(
        python_bin,
        PY_SMOOTH_SCRIPT,
        json!({
            "iters": iters,
            "payload": { "re": re, "im": im, "width": width }
        }),
    )
}

fn run_python_eval(
    python_bin: &Path,
    script: &str,
    payload: serde_json::Value,
) -> Result<PythonEval> {
    let mut child = Command::new(python_bin)
        .arg("-c")
        .arg(script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning python interpreter at {}", python_bin.display()))?;

    {
        let stdin = child.stdin.as_mut().context("opening python stdin")?;
        let payload_bytes = serde_json::to_vec(&payload).context("serializing python payload")?;
        stdin
            .write_all(&payload_bytes)
            .context("writing payload to python stdin")?;
    }

    let output = child
        .wait_with_output()
        .context("waiting for python process")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python execution failed: {stderr}");
    }
    let stdout = String::from_utf8(output.stdout).context("parsing python stdout utf8")?;
    let parsed: PythonEval = serde_json::from_str(stdout.trim()).context("parsing python json")?;
    Ok(parsed)
}

/// Real parts row-major, then imaginary parts row-major.
fn flatten_complex(spectrum: &Array2<Complex<f64>>) -> Vec<f64> {
    spectrum
        .iter()
        .map(|z| z.re)
        .chain(spectrum.iter().map(|z| z.im))
        .collect()
}

fn ensure_same_length(case_id: &str, a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        bail!(
            "case {case_id} has mismatched output lengths: left={}, right={}",
            a.len(),
            b.len()
        );
    }
    Ok(())
}

fn benchmark_avg_ns<F>(iters: usize, mut f: F) -> Result<f64>
where
    F: FnMut() -> Result<()>,
{
    let start = Instant::now();
    for _ in 0..iters {
        f()?;
    }
    Ok(start.elapsed().as_nanos() as f64 / iters as f64)
}

struct RowBuildInput<'a> {
    case_id: &'a str,
    n_channels: usize,
    n_bins: usize,
    width: f64,
    rust_candidate: &'a [f64],
    python_reference: &'a [f64],
    rust_ns: f64,
    python_ns: f64,
}

fn build_row(args: RowBuildInput<'_>) -> ContractRow {
    ContractRow {
        case_id: args.case_id.to_string(),
        n_channels: args.n_channels,
        n_bins: args.n_bins,
        width: args.width,
        pearson_r: pearson(args.rust_candidate, args.python_reference),
        mae: mean_abs_error(args.rust_candidate, args.python_reference),
        rmse: root_mean_squared_error(args.rust_candidate, args.python_reference),
        max_abs: max_abs_error(args.rust_candidate, args.python_reference),
        rust_ns: args.rust_ns,
        python_ns: args.python_ns,
        speedup_vs_python: args.python_ns / args.rust_ns,
    }
}

fn mean_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .sum::<f64>()
        / a.len() as f64
}

fn root_mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    (a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        / a.len() as f64)
        .sqrt()
}

fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = *x - mean_a;
        let db = *y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        if a == b {
            1.0
        } else {
            0.0
        }
    } else {
        cov / (var_a.sqrt() * var_b.sqrt())
    }
}

fn write_summary_csv(path: &Path, rows: &[ContractRow]) -> Result<()> {
    let mut out = String::new();
    out.push_str(
        "case_id,n_channels,n_bins,width,pearson_r,mae,rmse,max_abs,rust_ns,python_ns,speedup_vs_python\n",
    );
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{:.6},{:.12},{:.12},{:.12},{:.12},{:.3},{:.3},{:.6}\n",
            row.case_id,
            row.n_channels,
            row.n_bins,
            row.width,
            row.pearson_r,
            row.mae,
            row.rmse,
            row.max_abs,
            row.rust_ns,
            row.python_ns,
            row.speedup_vs_python
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
