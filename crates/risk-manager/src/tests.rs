#[cfg(test)]
mod bracket_tests {
    use crate::bracket::{BracketParameters, RiskBracketCalculator};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_support_from_last_ten_lows() {
        let calc = RiskBracketCalculator::default();
        // The 80.0 low is 11 bars back and must be ignored.
        let mut lows = vec![80.0];
        lows.extend([98.0, 97.5, 99.0, 96.0, 98.5, 97.0, 99.5, 98.0, 97.2, 98.8]);
        assert_eq!(calc.support_level(100.0, Some(&lows)), 96.0);
    }

    #[test]
    fn test_bracket_is_two_to_one() {
        let calc = RiskBracketCalculator::default();
        let lows = vec![96.0, 97.0, 98.0];
        let bracket = calc.calculate(100.0, Some(&lows));

        assert!(!bracket.fallback);
        assert_eq!(bracket.entry, 100.0);
        assert!(approx(bracket.stop_loss, 96.0 * 0.98));
        let risk = bracket.entry - bracket.stop_loss;
        assert!(approx(bracket.take_profit - bracket.entry, 2.0 * risk));
        assert!(bracket.stop_loss < bracket.entry && bracket.entry < bracket.take_profit);
    }

    #[test]
    fn test_missing_lows_use_discounted_support() {
        let calc = RiskBracketCalculator::default();
        let bracket = calc.calculate(200.0, None);

        assert!(!bracket.fallback);
        assert!(approx(bracket.stop_loss, 200.0 * 0.95 * 0.98));
        assert!(approx(bracket.take_profit, 200.0 + 2.0 * (200.0 - 200.0 * 0.95 * 0.98)));

        let empty: Vec<f64> = vec![];
        assert_eq!(calc.calculate(200.0, Some(&empty)), bracket);
    }

    #[test]
    fn test_zero_support_uses_fallback_bracket() {
        let calc = RiskBracketCalculator::default();
        let lows = vec![0.0, 12.0, 13.0];
        let bracket = calc.calculate(50.0, Some(&lows));

        assert!(bracket.fallback);
        assert_eq!(bracket.entry, 50.0);
        assert_eq!(bracket.stop_loss, 50.0 * 0.95);
        assert_eq!(bracket.take_profit, 50.0 * 1.10);
    }

    #[test]
    fn test_support_above_price_uses_fallback_bracket() {
        // Bad data: lows well above the current price invert the bracket.
        let calc = RiskBracketCalculator::default();
        let lows = vec![150.0, 151.0];
        let bracket = calc.calculate(100.0, Some(&lows));

        assert!(bracket.fallback);
        assert_eq!(bracket.stop_loss, 100.0 * 0.95);
        assert_eq!(bracket.take_profit, 100.0 * 1.10);
    }

    #[test]
    fn test_negative_low_uses_fallback_bracket() {
        let calc = RiskBracketCalculator::default();
        let lows = vec![-3.0, 40.0];
        let bracket = calc.calculate(42.0, Some(&lows));
        assert!(bracket.fallback);
        assert!(bracket.stop_loss > 0.0);
    }

    #[test]
    fn test_bracket_always_monotonic() {
        let calc = RiskBracketCalculator::default();
        let cases: Vec<(f64, Vec<f64>)> = vec![
            (10.0, vec![9.5, 9.8]),
            (10.0, vec![0.01]),
            (10.0, vec![10.0]),
            (10.0, vec![25.0]),
            (1234.5, vec![1100.0, 1200.0, 1190.0]),
            (0.5, vec![0.45]),
        ];
        for (price, lows) in cases {
            let b = calc.calculate(price, Some(&lows));
            assert!(b.stop_loss > 0.0, "stop_loss must be positive for {:?}", b);
            assert!(b.stop_loss < b.entry && b.entry < b.take_profit, "{:?}", b);
        }
    }

    #[test]
    fn test_custom_parameters() {
        let calc = RiskBracketCalculator::new(BracketParameters {
            support_lookback: 2,
            reward_to_risk: 3.0,
            ..BracketParameters::default()
        });
        let lows = vec![50.0, 90.0, 95.0];
        let bracket = calc.calculate(100.0, Some(&lows));
        assert!(approx(bracket.stop_loss, 90.0 * 0.98));
        assert!(approx(bracket.take_profit - 100.0, 3.0 * (100.0 - 90.0 * 0.98)));
    }
}
