use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fracsmooth::kernel::KernelLifecycle;
use fracsmooth::smoothing::traits::SpectrumSmooth;
use fracsmooth::smoothing::{FracSmoothConfig, FracSmoothKernel, IntegrationLimits};
use ndarray::Array2;
use num_complex::Complex;
use rand::rngs::ThreadRng;
use std::num::NonZeroUsize;

/// Get a randomized multi-channel spectrum from instance of `rng`.
fn randomized_spectrum(
    mut rng: ThreadRng,
    num_channels: NonZeroUsize,
    num_bins: NonZeroUsize,
) -> Array2<Complex<f64>> {
    use rand::Rng;

    let c: usize = num_channels.into();
    let n: usize = num_bins.into();
    // Pink-ish tilt with random ripple, like a measured transfer function.
    Array2::from_shape_fn((c, n), |(_, k)| {
        let tilt = 1.0 / (1.0 + k as f64).sqrt();
        let ripple = rng.random_range(0.5..1.5);
        let phase = rng.random_range(-std::f64::consts::PI..std::f64::consts::PI);
        Complex::from_polar(tilt * ripple, phase)
    })
}

/// Full pipeline on a two-channel 1025-bin spectrum (2048-point FFT).
fn frac_smooth_widths(c: &mut Criterion) {
    let spectrum = randomized_spectrum(
        rand::rng(),
        NonZeroUsize::new(2).unwrap(),
        NonZeroUsize::new(1025).unwrap(),
    );

    let mut group = c.benchmark_group("frac_smooth");
    group.sample_size(10);
    for (label, width) in [("1/24", 1.0 / 24.0), ("1/6", 1.0 / 6.0), ("1/3", 1.0 / 3.0)] {
        let kernel = FracSmoothKernel::try_new(FracSmoothConfig::new(width))
            .expect("smoothing kernel config should be valid");
        group.bench_with_input(BenchmarkId::new("run_alloc", label), &spectrum, |bench, x| {
            bench.iter(|| kernel.run_alloc(black_box(x)))
        });
    }
    group.finish();
}

/// Limit rasterization alone, which depends only on the bin count and width.
fn integration_limits(c: &mut Criterion) {
    c.bench_function("integration_limits_1025_third_octave", |bench| {
        bench.iter(|| IntegrationLimits::compute(black_box(1025), black_box(1.0 / 3.0)))
    });
}

criterion_group!(benches, frac_smooth_widths, integration_limits);
criterion_main!(benches);
