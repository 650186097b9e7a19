//! Intensity sources for reactive runs.

use anyhow::{Context, Result};
use std::f32::consts::TAU;
use std::fs;
use std::path::Path;

/// Where per-tick activity factors come from.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    /// No signal; emitters keep their configured parameters.
    Silent,
    /// `1 + sin(2π t / period)`, between 0 and 2.
    Pulse { period: f32 },
    /// Recorded factors, repeated from the start when exhausted.
    Samples(Vec<f32>),
}

impl Signal {
    /// Read whitespace-separated factors. Blank lines and `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read signal file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in signal file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut samples = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            for word in line.split_whitespace() {
                let value: f32 = word
                    .parse()
                    .with_context(|| format!("line {}: `{word}` is not a number", line_no + 1))?;
                samples.push(value);
            }
        }
        if samples.is_empty() {
            anyhow::bail!("no samples");
        }
        Ok(Signal::Samples(samples))
    }

    /// Factor for `tick`, or `None` when silent.
    pub fn at(&self, tick: u64) -> Option<f32> {
        match self {
            Signal::Silent => None,
            Signal::Pulse { period } if *period > 0.0 => {
                Some(1.0 + (TAU * tick as f32 / period).sin())
            }
            Signal::Pulse { .. } => None,
            Signal::Samples(samples) => samples.get((tick % samples.len() as u64) as usize).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent() {
        assert_eq!(Signal::Silent.at(5), None);
    }

    #[test]
    fn test_pulse_range() {
        let signal = Signal::Pulse { period: 8.0 };
        assert!((signal.at(0).unwrap() - 1.0).abs() < 1e-6);
        assert!((signal.at(2).unwrap() - 2.0).abs() < 1e-6);
        assert!(signal.at(6).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_samples_cycle() {
        let signal = Signal::parse("# loudness\n0.5\n\n1.5 2.5\n").unwrap();
        assert_eq!(signal, Signal::Samples(vec![0.5, 1.5, 2.5]));
        assert_eq!(signal.at(0), Some(0.5));
        assert_eq!(signal.at(4), Some(1.5));
    }

    #[test]
    fn test_bad_sample_is_error() {
        assert!(Signal::parse("0.5\nloud\n").is_err());
        assert!(Signal::parse("# nothing\n").is_err());
    }
}
