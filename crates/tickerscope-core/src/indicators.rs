//! Technical indicators over a table's closing prices.
//!
//! Series are aligned with the input: position `i` describes bar `i`.
//! Rolling-window indicators are `None` until the window is full.

use serde::Serialize;
use ta::indicators::{
    ExponentialMovingAverage, MovingAverageConvergenceDivergence, SimpleMovingAverage,
};
use ta::Next;
use thiserror::Error;

use crate::{OhlcvTable, UtcDateTime};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_WIDTH: f64 = 2.0;

/// Indicator values for one bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub ts: UtcDateTime,
    pub close: f64,
    pub rsi: Option<f64>,
    pub macd: f64,
    pub signal_line: f64,
    pub ma20: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBand {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Rejected indicator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{indicator} period must be at least {min}, got {period}")]
pub struct IndicatorError {
    pub indicator: &'static str,
    pub period: usize,
    pub min: usize,
}

impl IndicatorError {
    const fn new(indicator: &'static str, period: usize, min: usize) -> Self {
        Self {
            indicator,
            period,
            min,
        }
    }
}

/// RSI(14), MACD(12, 26, 9) and Bollinger(20, 2) for every bar of `table`.
pub fn compute(table: &OhlcvTable) -> Result<Vec<IndicatorRow>, IndicatorError> {
    let closes = table.closes();
    let rsi = rsi(&closes, RSI_PERIOD)?;
    let (macd, signal) = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL)?;
    let bands = bollinger(&closes, BOLLINGER_WINDOW, BOLLINGER_WIDTH)?;

    Ok(table
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorRow {
            ts: bar.ts,
            close: bar.close,
            rsi: rsi[i],
            macd: macd[i],
            signal_line: signal[i],
            ma20: bands[i].map(|band| band.middle),
            upper_band: bands[i].map(|band| band.upper),
            lower_band: bands[i].map(|band| band.lower),
        })
        .collect())
}

/// Relative strength index from simple rolling means of gains and losses.
///
/// The first value appears at index `period`, since the first close has no
/// change. A flat window (no gains, no losses) has no defined RSI.
pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    let invalid = |_| IndicatorError::new("rsi", period, 1);
    let mut avg_gain = SimpleMovingAverage::new(period).map_err(invalid)?;
    let mut avg_loss = SimpleMovingAverage::new(period).map_err(invalid)?;

    let mut out = vec![None; closes.len()];
    for (i, pair) in closes.windows(2).enumerate() {
        let delta = pair[1] - pair[0];
        let gain = avg_gain.next(delta.max(0.0));
        let loss = avg_loss.next((-delta).max(0.0));
        if i + 1 < period {
            continue;
        }

        // Running sums can leave rounding residue on a window that went flat.
        out[i + 1] = if loss <= f64::EPSILON && gain <= f64::EPSILON {
            None
        } else if loss <= f64::EPSILON {
            Some(100.0)
        } else {
            Some(100.0 - 100.0 / (1.0 + gain / loss))
        };
    }
    Ok(out)
}

/// Exponential moving average seeded with the first value
/// (`alpha = 2 / (span + 1)`, no bias adjustment).
pub fn ema(values: &[f64], span: usize) -> Result<Vec<f64>, IndicatorError> {
    let mut average =
        ExponentialMovingAverage::new(span).map_err(|_| IndicatorError::new("ema", span, 1))?;
    Ok(values.iter().map(|value| average.next(*value)).collect())
}

/// MACD line (`fast` EMA minus `slow` EMA) and its `signal`-span EMA.
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<(Vec<f64>, Vec<f64>), IndicatorError> {
    let mut indicator = MovingAverageConvergenceDivergence::new(fast, slow, signal)
        .map_err(|_| IndicatorError::new("macd", fast.min(slow).min(signal), 1))?;

    Ok(closes
        .iter()
        .map(|close| {
            let output = indicator.next(*close);
            (output.macd, output.signal)
        })
        .unzip())
}

/// Rolling mean plus/minus `width` sample standard deviations.
pub fn bollinger(
    closes: &[f64],
    window: usize,
    width: f64,
) -> Result<Vec<Option<BollingerBand>>, IndicatorError> {
    if window < 2 {
        return Err(IndicatorError::new("bollinger", window, 2));
    }
    let mut mean = SimpleMovingAverage::new(window)
        .map_err(|_| IndicatorError::new("bollinger", window, 2))?;

    let mut out = vec![None; closes.len()];
    for (i, close) in closes.iter().enumerate() {
        let middle = mean.next(*close);
        if i + 1 < window {
            continue;
        }

        let slice = &closes[i + 1 - window..=i];
        let variance =
            slice.iter().map(|v| (v - middle).powi(2)).sum::<f64>() / (window - 1) as f64;
        let std = variance.sqrt();
        out[i] = Some(BollingerBand {
            middle,
            upper: middle + width * std,
            lower: middle - width * std,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn rsi_of_steady_rise_is_100() {
        let closes = (1..=20).map(f64::from).collect::<Vec<_>>();
        let out = rsi(&closes, 14).expect("valid period");
        assert!(out[..14].iter().all(Option::is_none));
        assert_eq!(out[14], Some(100.0));
    }

    #[test]
    fn rsi_balances_gains_and_losses() {
        // Alternating +1/-1 moves: equal average gain and loss.
        let closes = (0..16)
            .map(|i| if i % 2 == 0 { 10.0 } else { 11.0 })
            .collect::<Vec<_>>();
        let out = rsi(&closes, 14).expect("valid period");
        assert!(approx(out[14].expect("full window"), 50.0));
    }

    #[test]
    fn ema_starts_at_first_value() {
        let out = ema(&[10.0, 20.0], 3).expect("valid span");
        assert!(approx(out[0], 10.0));
        assert!(approx(out[1], 15.0));
    }

    #[test]
    fn macd_of_constant_series_is_zero() {
        let (line, signal) = macd(&[5.0; 40], 12, 26, 9).expect("valid spans");
        assert!(line.iter().chain(signal.iter()).all(|v| approx(*v, 0.0)));
    }

    #[test]
    fn bollinger_uses_sample_deviation() {
        let closes = [1.0, 2.0, 3.0];
        let out = bollinger(&closes, 3, 2.0).expect("valid window");
        assert!(out[0].is_none() && out[1].is_none());
        let band = out[2].expect("full window");
        assert!(approx(band.middle, 2.0));
        // Sample std of 1, 2, 3 is exactly 1.
        assert!(approx(band.upper, 4.0));
        assert!(approx(band.lower, 0.0));
    }

    #[test]
    fn short_series_yield_no_windowed_values() {
        let closes = [1.0, 2.0];
        assert!(rsi(&closes, 14).expect("valid").iter().all(Option::is_none));
        assert!(bollinger(&closes, 20, 2.0)
            .expect("valid")
            .iter()
            .all(Option::is_none));
    }

    #[test]
    fn macd_signal_trails_the_line() {
        // Line seeds at zero, then the signal EMA lags a rising line.
        let closes = (1..=30).map(f64::from).collect::<Vec<_>>();
        let (line, signal) = macd(&closes, 12, 26, 9).expect("valid spans");
        assert!(approx(line[0], 0.0) && approx(signal[0], 0.0));
        assert!(line[29] > signal[29] && signal[29] > 0.0);
    }

    #[test]
    fn degenerate_periods_are_rejected() {
        assert_eq!(
            rsi(&[1.0, 2.0], 0).expect_err("zero period"),
            IndicatorError::new("rsi", 0, 1)
        );
        assert!(ema(&[1.0], 0).is_err());
        assert_eq!(
            bollinger(&[1.0, 2.0], 1, 2.0).expect_err("single-bar window").min,
            2
        );
    }
}
