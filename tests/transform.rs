use algorithms::ops::{Negate, Plus};
use algorithms::{
    transform, transform_binary, transform_binary_in, transform_in, transform_inplace, AlignedBuf,
    Arch, BatchOf, Emulated, Simd,
};
use num_complex::Complex;
use rand::Rng;
use std::ops::{Add, Neg};

const SIZE: usize = 93;

fn negate_and_add<A: Arch>()
where
    f64: Simd<A>,
    BatchOf<f64, A>: Add<Output = BatchOf<f64, A>> + Neg<Output = BatchOf<f64, A>>,
{
    if !A::available() {
        println!("detected no {}, skipped", A::NAME);
        return;
    }
    println!("detected {}", A::NAME);
    let mut rng = rand::thread_rng();
    let lhs = (0..SIZE + 1).map(|_| rng.gen_range(-10.0..10.0)).collect::<Vec<f64>>();
    let rhs = (0..SIZE + 1).map(|_| rng.gen_range(-10.0..10.0)).collect::<Vec<f64>>();
    let lhs = AlignedBuf::<f64>::from_slice(&lhs);
    let rhs = AlignedBuf::<f64>::from_slice(&rhs);
    let mut out = AlignedBuf::<f64>::from_elem(0.0, SIZE + 1);
    for (a, b, c) in [(0, 0, 0), (1, 1, 1), (0, 1, 0), (0, 0, 1), (1, 0, 0), (0, 1, 1)] {
        let (x, y) = (&lhs[a..a + SIZE], &rhs[b..b + SIZE]);
        let dst = &mut out[c..c + SIZE];
        transform_in::<A, _, _>(x, dst, Negate);
        assert!(x.iter().zip(dst.iter()).all(|(x, r)| -x == *r));
        transform_binary_in::<A, _, _>(x, y, dst, Plus);
        for i in 0..SIZE {
            assert_eq!(dst[i], x[i] + y[i], "lhs {a}, rhs {b}, dst {c}, index {i}.");
        }
    }
}

#[test]
fn test_transform_alignment() {
    negate_and_add::<Emulated>();
    #[cfg(target_arch = "x86_64")]
    {
        negate_and_add::<algorithms::V2>();
        negate_and_add::<algorithms::V3>();
    }
    #[cfg(target_arch = "aarch64")]
    negate_and_add::<algorithms::Neon>();
}

#[test]
fn test_transform_f32_dispatched() {
    algorithms::init();
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let n = rng.gen_range(0..300);
        let lhs = (0..n).map(|_| rng.gen::<f32>()).collect::<Vec<_>>();
        let rhs = (0..n).map(|_| rng.gen::<f32>()).collect::<Vec<_>>();
        let mut dst = vec![0.0f32; n];
        transform_binary(&lhs[..], &rhs[..], &mut dst[..], Plus);
        for i in 0..n {
            assert_eq!(dst[i], lhs[i] + rhs[i]);
        }
        transform_inplace(&mut dst[..], Negate);
        for i in 0..n {
            assert_eq!(dst[i], -(lhs[i] + rhs[i]));
        }
    }
}

#[test]
fn test_transform_complex() {
    let data = (0..SIZE)
        .map(|i| Complex::new(i as f32, -(i as f32)))
        .collect::<Vec<_>>();
    let buf = AlignedBuf::<Complex<f32>>::from_slice(&data);
    let mut out = vec![Complex::new(0.0f32, 0.0); SIZE - 1];
    transform(&buf[1..], &mut out[..], Negate);
    for (x, r) in buf[1..].iter().zip(&out) {
        assert_eq!(*r, Complex::new(-x.re, -x.im));
    }
    let mut sum = vec![Complex::new(0.0f32, 0.0); SIZE];
    transform_binary(&buf[..], &data[..], &mut sum[..], Plus);
    assert!(sum.iter().zip(&data).all(|(s, x)| *s == *x + *x));
}
