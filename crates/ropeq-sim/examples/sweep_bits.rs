//! Sweep the quantization bit width and compare both schemes
//!
//! Run with: cargo run --example sweep_bits -p ropeq-sim

use ropeq_sim::{run_once, QuantMode, RunConfig};

fn main() {
    tracing_subscriber::fmt().init();

    let base = RunConfig {
        seq_len: 4096,
        dim: 64,
        mode: QuantMode::PerChannel,
        ..Default::default()
    };

    println!(
        "seq_len={} dim={} base={} seed={} mode={:?}\n",
        base.seq_len, base.dim, base.base, base.seed, base.mode
    );
    println!(
        "{:>4}  {:>12} {:>12} {:>8}  | {:>12} {:>12} {:>8}",
        "bits", "log mean", "log max", "drift", "naive mean", "naive max", "drift"
    );

    for bits in 2..=8 {
        let result = run_once(RunConfig {
            bits,
            ..base.clone()
        })
        .expect("valid config");
        let log = result.stats_log;
        let naive = result.stats_naive.expect("baseline requested");
        println!(
            "{:>4}  {:>12.6} {:>12.6} {:>7.2}x  | {:>12.6} {:>12.6} {:>7.2}x",
            bits,
            log.mean_rmse,
            log.max_rmse,
            log.drift,
            naive.mean_rmse,
            naive.max_rmse,
            naive.drift
        );
    }
}
