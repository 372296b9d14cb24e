use argh::FromArgs;
use std::str::FromStr;

use crate::config::{BenchOptions, ElemKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Plus,
    Multiplies,
}

impl FromStr for ReduceOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "plus" => Ok(ReduceOp::Plus),
            "multiplies" => Ok(ReduceOp::Multiplies),
            _ => Err(format!("unknown operator `{s}`, expected `plus` or `multiplies`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOp {
    Negate,
    Plus,
}

impl FromStr for TransformOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "negate" => Ok(TransformOp::Negate),
            "plus" => Ok(TransformOp::Plus),
            _ => Err(format!("unknown operator `{s}`, expected `negate` or `plus`")),
        }
    }
}

#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand)]
pub enum SubCommandEnum {
    Reduce(ReduceArguments),
    Transform(TransformArguments),
}

#[derive(FromArgs, Debug, PartialEq)]
/// fold a generated sequence, vectorized and sequentially
#[argh(subcommand, name = "reduce")]
pub struct ReduceArguments {
    /// operator: [`plus`, `multiplies`]
    #[argh(option, default = "ReduceOp::Plus")]
    pub op: ReduceOp,
}

#[derive(FromArgs, Debug, PartialEq)]
/// map generated sequences and verify against a scalar map
#[argh(subcommand, name = "transform")]
pub struct TransformArguments {
    /// operator: [`negate`, `plus`]
    #[argh(option, default = "TransformOp::Negate")]
    pub op: TransformOp,
}

#[derive(FromArgs, Debug)]
/// SIMD algorithms benchmark
pub struct Arguments {
    #[argh(subcommand)]
    pub cmd: SubCommandEnum,

    /// benchmark configurations, a TOML file path or string
    #[argh(option, short = 'c')]
    pub config: Option<String>,

    /// sequence length
    #[argh(option)]
    pub len: Option<usize>,

    /// timed repetitions
    #[argh(option)]
    pub iterations: Option<u32>,

    /// misalign the start of the sequence by this many elements
    #[argh(option)]
    pub offset: Option<usize>,

    /// element type: [`f32`, `f64`]
    #[argh(option)]
    pub elem: Option<ElemKind>,

    /// verbose
    #[argh(switch, short = 'v')]
    pub verbose: bool,
}

impl Arguments {
    /// Options given on the command line take precedence over `base`.
    pub fn apply(&self, mut base: BenchOptions) -> BenchOptions {
        if let Some(len) = self.len {
            base.len = len;
        }
        if let Some(iterations) = self.iterations {
            base.iterations = iterations;
        }
        if let Some(offset) = self.offset {
            base.offset = offset;
        }
        if let Some(elem) = self.elem {
            base.elem = elem;
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_config() {
        let args = Arguments::from_args(
            &["algorithms-bench"],
            &["--len", "77", "--elem", "f64", "reduce", "--op", "multiplies"],
        )
        .unwrap();
        assert_eq!(
            args.cmd,
            SubCommandEnum::Reduce(ReduceArguments {
                op: ReduceOp::Multiplies
            })
        );
        let options = args.apply(BenchOptions {
            offset: 5,
            ..BenchOptions::default()
        });
        assert_eq!(options.len, 77);
        assert_eq!(options.offset, 5);
        assert_eq!(options.elem, ElemKind::F64);
    }

    #[test]
    fn defaults_and_errors() {
        let args = Arguments::from_args(&["algorithms-bench"], &["transform"]).unwrap();
        assert_eq!(
            args.cmd,
            SubCommandEnum::Transform(TransformArguments {
                op: TransformOp::Negate
            })
        );
        assert!(!args.verbose);
        assert!(Arguments::from_args(&["algorithms-bench"], &["transform", "--op", "abs"]).is_err());
    }
}
