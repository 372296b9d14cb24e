use algorithms::ops::{Multiplies, Negate, Plus};
use algorithms::{AlignedBuf, BatchOf, BinaryOp, Combine, Element, Emulated, Map, UnaryOp};
use log::{debug, error, info};
use num_traits::{AsPrimitive, Float};
use rand::Rng;
use std::fmt::{Debug, Display};
use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::args::{Arguments, ReduceOp, SubCommandEnum, TransformOp};
use crate::config::{BenchOptions, ElemKind};

mod args;
mod config;

trait Scalar: Element + Float + Debug + Display + Default + 'static {}

impl<T: Element + Float + Debug + Display + Default + 'static> Scalar for T {}

/// `len` random values in `[low, high)`, starting `offset` elements past an
/// aligned address.
fn generate<T: Scalar>(options: &BenchOptions, low: f64, high: f64) -> AlignedBuf<T>
where
    f64: AsPrimitive<T>,
{
    let mut rng = rand::thread_rng();
    let mut buf = AlignedBuf::<T>::from_elem(T::zero(), options.len + options.offset);
    for x in buf.iter_mut() {
        *x = AsPrimitive::<T>::as_(rng.gen_range(low..high));
    }
    buf
}

fn timed<R>(iterations: u32, mut f: impl FnMut() -> R) -> (R, Duration) {
    let start = Instant::now();
    let mut result = f();
    for _ in 1..iterations {
        result = black_box(f());
    }
    (result, start.elapsed() / iterations)
}

fn bench_reduce<T: Scalar, F>(options: &BenchOptions, op: F, init: T, low: f64, high: f64)
where
    F: Combine<T, T> + Copy,
    f64: AsPrimitive<T>,
{
    let buf = generate::<T>(options, low, high);
    let data = &buf[options.offset..];
    let (vectorized, vectorized_time) = timed(options.iterations, || {
        algorithms::reduce_with(black_box(data), init, op)
    });
    let (sequential, sequential_time) = timed(options.iterations, || {
        black_box(data).iter().fold(init, |acc, &x| {
            BinaryOp::<T, T, BatchOf<T, Emulated>>::call(&op, acc, x)
        })
    });
    info!("target cpu: {}", algorithms::arch::selected());
    info!("vectorized: {vectorized} in {vectorized_time:?}");
    info!("sequential: {sequential} in {sequential_time:?}");
    info!(
        "difference: {}, speedup: {:.2}x",
        (vectorized - sequential).abs(),
        sequential_time.as_secs_f64() / vectorized_time.as_secs_f64().max(f64::MIN_POSITIVE)
    );
}

fn verify<T: Scalar>(result: &[T], expected: impl Iterator<Item = T>) -> usize {
    let mismatches = result
        .iter()
        .zip(expected)
        .enumerate()
        .filter(|(_, (r, e))| r != &e)
        .inspect(|(i, (r, e))| debug!("mismatch at {i}: {r} != {e}"))
        .count();
    if mismatches != 0 {
        error!("{mismatches} elements differ from the scalar map");
    }
    mismatches
}

fn bench_transform<T: Scalar>(options: &BenchOptions, op: TransformOp) -> usize
where
    Negate: Map<T>,
    Plus: Combine<T, T>,
    f64: AsPrimitive<T>,
{
    let lhs = generate::<T>(options, -1.0, 1.0);
    let rhs = generate::<T>(options, -1.0, 1.0);
    let lhs = &lhs[options.offset..];
    let rhs = &rhs[..options.len];
    let mut dst = vec![T::zero(); options.len];
    let mut scalar = vec![T::zero(); options.len];
    let mismatches = match op {
        TransformOp::Negate => {
            let (_, vectorized_time) = timed(options.iterations, || {
                algorithms::transform(black_box(lhs), &mut dst, Negate)
            });
            let (_, sequential_time) = timed(options.iterations, || {
                for (d, &x) in scalar.iter_mut().zip(black_box(lhs)) {
                    *d = UnaryOp::<T, BatchOf<T, Emulated>>::call(&Negate, x);
                }
            });
            info!("vectorized: {vectorized_time:?}, sequential: {sequential_time:?}");
            verify(&dst, scalar.iter().copied())
        }
        TransformOp::Plus => {
            let (_, vectorized_time) = timed(options.iterations, || {
                algorithms::transform_binary(black_box(lhs), rhs, &mut dst, Plus)
            });
            let (_, sequential_time) = timed(options.iterations, || {
                for ((d, &x), &y) in scalar.iter_mut().zip(black_box(lhs)).zip(rhs) {
                    *d = x + y;
                }
            });
            info!("vectorized: {vectorized_time:?}, sequential: {sequential_time:?}");
            verify(&dst, scalar.iter().copied())
        }
    };
    info!("target cpu: {}", algorithms::arch::selected());
    mismatches
}

fn run<T: Scalar>(cmd: &SubCommandEnum, options: &BenchOptions) -> usize
where
    Negate: Map<T>,
    Plus: Combine<T, T>,
    Multiplies: Combine<T, T>,
    f64: AsPrimitive<T>,
{
    match cmd {
        SubCommandEnum::Reduce(reduce) => {
            match reduce.op {
                ReduceOp::Plus => bench_reduce(options, Plus, T::zero(), -1.0, 1.0),
                // values close to one keep the product away from zero and infinity
                ReduceOp::Multiplies => {
                    bench_reduce(options, Multiplies, T::one(), 0.999, 1.001)
                }
            }
            0
        }
        SubCommandEnum::Transform(transform) => bench_transform::<T>(options, transform.op),
    }
}

fn main() {
    let args: Arguments = argh::from_env();
    let mut log_builder = env_logger::builder();
    if args.verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Info);
    }
    log_builder.init();
    debug!("arguments: {args:#?}");

    let options = match config::load(args.config.as_deref(), |options| args.apply(options)) {
        Ok(options) => options,
        Err(err) => {
            error!("{err}");
            std::process::exit(2);
        }
    };
    debug!("options: {options:?}");

    algorithms::init();
    let mismatches = match options.elem {
        ElemKind::F32 => run::<f32>(&args.cmd, &options),
        ElemKind::F64 => run::<f64>(&args.cmd, &options),
    };
    if mismatches != 0 {
        std::process::exit(1);
    }
}
