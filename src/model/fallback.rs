//! Deterministic rule-based fallback scorer.
//!
//! Used when no model artifact could be loaded and `SCORING_MODE=fallback`
//! is configured. The score is a pure function of the fired risk factors, so
//! the same request always produces the same answer.

const BASE_SCORE: f64 = 0.02;
const PER_FACTOR: f64 = 0.12;
const MAX_SCORE: f64 = 0.95;
const FRAUD_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct FallbackPrediction {
    pub probability: f64,
    pub is_fraud: bool,
}

/// Score a transaction from its risk-factor count.
pub fn score(risk_factor_count: usize) -> FallbackPrediction {
    let probability = (BASE_SCORE + PER_FACTOR * risk_factor_count as f64).min(MAX_SCORE);
    FallbackPrediction {
        probability,
        is_fraud: probability >= FRAUD_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_factors_is_near_zero() {
        let pred = score(0);
        assert_eq!(pred.probability, BASE_SCORE);
        assert!(!pred.is_fraud);
    }

    #[test]
    fn score_grows_with_factor_count_and_saturates() {
        assert!(score(3).probability > score(1).probability);
        assert_eq!(score(50).probability, MAX_SCORE);
        assert!(score(50).is_fraud);
    }

    #[test]
    fn four_factors_cross_the_fraud_line() {
        assert!(!score(3).is_fraud);
        assert!(score(4).is_fraud);
    }
}
