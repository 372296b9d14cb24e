use algorithms::ops::{Multiplies, Plus};
use algorithms::{
    reduce, reduce_in, reduce_with, AlignedBuf, Arch, Batch, BatchOf, Emulated, Simd,
};
use rand::Rng;
use std::ops::{Add, Mul};

fn sum_every_alignment<A: Arch>()
where
    f64: Simd<A>,
    BatchOf<f64, A>: Add<Output = BatchOf<f64, A>>,
{
    if !A::available() {
        println!("detected no {}, skipped", A::NAME);
        return;
    }
    println!("detected {}", A::NAME);
    let lanes = <BatchOf<f64, A> as Batch>::LANES;
    let size = 4 * lanes;
    let buf = AlignedBuf::<f64>::from_elem(123.0, size);
    let cases = [
        (0, size),
        (1, size),
        (0, size - 1),
        (1, size - 1),
    ];
    for (begin, end) in cases {
        let r = reduce_in::<A, _, _, _>(&buf[begin..end], 1337.0, Plus);
        let expected = 1337.0 + 123.0 * (end - begin) as f64;
        assert_eq!(r, expected, "begin = {begin}, end = {end}.");
    }
    // shorter than one batch, never reaches the vector body
    let size = lanes - 1;
    let small = AlignedBuf::<f64>::from_elem(42.0, size);
    let cases = [(0, size), (1, size), (0, size - 1), (1, size - 1)];
    for (begin, end) in cases {
        if begin >= end {
            println!("begin = {begin}, end = {end}, empty range skipped");
            continue;
        }
        let r = reduce_in::<A, _, _, _>(&small[begin..end], 1337.0, Plus);
        let expected = 1337.0 + 42.0 * (end - begin) as f64;
        assert_eq!(r, expected, "begin = {begin}, end = {end}.");
    }
    assert_eq!(reduce_in::<A, f64, _, _>(&[], 1337.0, Plus), 1337.0);
}

#[test]
fn test_reduce_alignment() {
    sum_every_alignment::<Emulated>();
    #[cfg(target_arch = "x86_64")]
    {
        sum_every_alignment::<algorithms::V2>();
        sum_every_alignment::<algorithms::V3>();
    }
    #[cfg(target_arch = "aarch64")]
    sum_every_alignment::<algorithms::Neon>();
}

fn product_of_halves<A: Arch>()
where
    f32: Simd<A>,
    BatchOf<f32, A>: Mul<Output = BatchOf<f32, A>>,
{
    if !A::available() {
        println!("detected no {}, skipped", A::NAME);
        return;
    }
    const EPSILON: f32 = 1e-6;
    let buf = AlignedBuf::<f32>::from_elem(0.5, 40);
    for begin in 0..5 {
        let data = &buf[begin..];
        let r = reduce_in::<A, _, _, _>(data, 1.0f32, Multiplies);
        let expected = 0.5f32.powi(data.len() as i32);
        assert!((r - expected).abs() < EPSILON, "r = {r}, expected = {expected}.");
    }
}

#[test]
fn test_reduce_multiplies() {
    product_of_halves::<Emulated>();
    #[cfg(target_arch = "x86_64")]
    {
        product_of_halves::<algorithms::V2>();
        product_of_halves::<algorithms::V3>();
    }
    #[cfg(target_arch = "aarch64")]
    product_of_halves::<algorithms::Neon>();
}

#[test]
fn test_reduce_random() {
    algorithms::init();
    const EPSILON: f32 = 1e-2;
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let n = rng.gen_range(0..2000);
        let offset = rng.gen_range(0..8).min(n);
        let data = (0..n).map(|_| rng.gen_range(-1.0f32..1.0)).collect::<Vec<_>>();
        let data = &data[offset..];
        let r = reduce(data, 0.0f32);
        let expected = data.iter().map(|&x| x as f64).sum::<f64>() as f32;
        assert!(
            (r - expected).abs() < EPSILON,
            "n = {n}, offset = {offset}, r = {r}, expected = {expected}."
        );
    }
}

#[test]
fn test_reduce_integers_exact() {
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let n = rng.gen_range(0..500);
        let data = (0..n).map(|_| rng.gen_range(-1000i32..1000)).collect::<Vec<_>>();
        let offset = rng.gen_range(0..4).min(n);
        let data = &data[offset..];
        assert_eq!(reduce(data, 7i32), 7 + data.iter().sum::<i32>());
        let signs = data.iter().map(|&x| if x < 0 { -1i64 } else { 1 }).collect::<Vec<_>>();
        let product = signs.iter().product::<i64>();
        assert_eq!(reduce_with(&signs[..], 3i64, Multiplies), 3 * product);
    }
}

#[test]
fn test_reduce_dispatch_matches_emulated() {
    let mut rng = rand::thread_rng();
    let buf = AlignedBuf::<f64>::from_slice(
        &(0..1024).map(|_| rng.gen_range(0..100) as f64).collect::<Vec<_>>(),
    );
    for begin in 0..8 {
        let data = &buf[begin..];
        let emulated = reduce_in::<Emulated, _, _, _>(data, 0.0, Plus);
        assert_eq!(reduce(data, 0.0), emulated);
    }
}
