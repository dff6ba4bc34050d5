//! Dispersion and drawdown measures over settled bets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::streaks::{chronological, compute_streaks, StreakStats};
use super::summary::{to_f64, win_rate};
use crate::domain::Bet;

/// Bets per chunk for the consistency score
pub const CONSISTENCY_CHUNK: usize = 10;

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

fn settled(bets: &[Bet]) -> Vec<&Bet> {
    chronological(bets)
        .into_iter()
        .filter(|b| b.status.is_settled())
        .collect()
}

/// Standard deviation of per-bet profit
pub fn volatility(bets: &[Bet]) -> f64 {
    let profits: Vec<f64> = settled(bets).iter().map(|b| to_f64(b.profit)).collect();
    std_dev(&profits)
}

/// 100 − 2 × stddev of the win rate across consecutive chunks of ten bets,
/// floored at 0. Fewer than ten settled bets score 0.
pub fn consistency_score(bets: &[Bet]) -> f64 {
    let settled = settled(bets);
    if settled.len() < CONSISTENCY_CHUNK {
        return 0.0;
    }

    let rates: Vec<f64> = settled
        .chunks(CONSISTENCY_CHUNK)
        .map(|chunk| {
            let won = chunk.iter().filter(|b| b.is_won()).count() as i64;
            win_rate(won, chunk.len() as i64)
        })
        .collect();

    (100.0 - 2.0 * std_dev(&rates)).max(0.0)
}

/// Largest peak-to-trough fall of cumulative profit
pub fn max_drawdown(bets: &[Bet]) -> Decimal {
    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut drawdown = Decimal::ZERO;

    for bet in settled(bets) {
        cumulative += bet.profit;
        peak = peak.max(cumulative);
        drawdown = drawdown.max(peak - cumulative);
    }
    drawdown
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub settled_bets: i64,
    pub streaks: StreakStats,
    pub volatility: f64,
    pub consistency_score: f64,
    pub max_drawdown: Decimal,
    pub biggest_win: Option<Decimal>,
    pub biggest_loss: Option<Decimal>,
    pub average_stake: Decimal,
}

pub fn performance(bets: &[Bet]) -> PerformanceStats {
    let settled = settled(bets);
    let average_stake = if bets.is_empty() {
        Decimal::ZERO
    } else {
        bets.iter().map(|b| b.stake).sum::<Decimal>() / Decimal::from(bets.len() as i64)
    };

    PerformanceStats {
        settled_bets: settled.len() as i64,
        streaks: compute_streaks(bets),
        volatility: volatility(bets),
        consistency_score: consistency_score(bets),
        max_drawdown: max_drawdown(bets),
        biggest_win: settled
            .iter()
            .filter(|b| b.is_won())
            .map(|b| b.profit)
            .max(),
        biggest_loss: settled
            .iter()
            .filter(|b| b.is_lost())
            .map(|b| b.profit)
            .min(),
        average_stake,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BetStatus;
    use crate::stats::test_support::bet;
    use rust_decimal_macros::dec;

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[5.0, 5.0, 5.0]), 0.0);
        // mean 5, squared deviations 9+1+1+9 = 20, /4 = 5
        assert!((std_dev(&[2.0, 4.0, 6.0, 8.0]) - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_of_profits() {
        // profits: +10, -10
        let bets = vec![
            bet(0, BetStatus::Won, dec!(10), dec!(2)),
            bet(1, BetStatus::Lost, dec!(10), dec!(2)),
            bet(2, BetStatus::Pending, dec!(10), dec!(2)),
        ];
        assert!((volatility(&bets) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_consistency_requires_ten_bets() {
        let bets: Vec<Bet> = (0..9)
            .map(|i| bet(i, BetStatus::Won, dec!(10), dec!(2)))
            .collect();
        assert_eq!(consistency_score(&bets), 0.0);
    }

    #[test]
    fn test_consistency_perfectly_even() {
        // Two chunks, each 50% winners
        let bets: Vec<Bet> = (0..20)
            .map(|i| {
                let status = if i % 2 == 0 { BetStatus::Won } else { BetStatus::Lost };
                bet(i, status, dec!(10), dec!(2))
            })
            .collect();
        assert_eq!(consistency_score(&bets), 100.0);
    }

    #[test]
    fn test_consistency_uneven_chunks() {
        // Chunk 1: 100% winners, chunk 2: 0% winners -> stddev 50 -> 100 - 100 = 0
        let bets: Vec<Bet> = (0..20)
            .map(|i| {
                let status = if i < 10 { BetStatus::Won } else { BetStatus::Lost };
                bet(i, status, dec!(10), dec!(2))
            })
            .collect();
        assert_eq!(consistency_score(&bets), 0.0);

        // Chunk 1: 80%, chunk 2: 60% -> stddev 10 -> 80
        let bets: Vec<Bet> = (0..20)
            .map(|i| {
                let won = (i < 10 && i % 10 < 8) || (i >= 10 && i % 10 < 6);
                let status = if won { BetStatus::Won } else { BetStatus::Lost };
                bet(i, status, dec!(10), dec!(2))
            })
            .collect();
        assert!((consistency_score(&bets) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_counts_partial_last_chunk() {
        // Chunk 1: 10 bets at 50%, chunk 2: 5 bets at 100% -> stddev 25 -> 50
        let bets: Vec<Bet> = (0..15)
            .map(|i| {
                let won = i >= 10 || i % 2 == 0;
                let status = if won { BetStatus::Won } else { BetStatus::Lost };
                bet(i, status, dec!(10), dec!(2))
            })
            .collect();
        assert!((consistency_score(&bets) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_drawdown() {
        // cumulative: +10, +20, +10, -10, 0 -> peak 20, trough -10
        let bets = vec![
            bet(0, BetStatus::Won, dec!(10), dec!(2)),
            bet(1, BetStatus::Won, dec!(10), dec!(2)),
            bet(2, BetStatus::Lost, dec!(10), dec!(2)),
            bet(3, BetStatus::Lost, dec!(20), dec!(2)),
            bet(4, BetStatus::Won, dec!(10), dec!(2)),
        ];
        assert_eq!(max_drawdown(&bets), dec!(30));
    }

    #[test]
    fn test_performance_bundle() {
        let bets = vec![
            bet(0, BetStatus::Won, dec!(10), dec!(4)),
            bet(1, BetStatus::Lost, dec!(30), dec!(2)),
            bet(2, BetStatus::Pending, dec!(20), dec!(2)),
        ];
        let perf = performance(&bets);
        assert_eq!(perf.settled_bets, 2);
        assert_eq!(perf.biggest_win, Some(dec!(30)));
        assert_eq!(perf.biggest_loss, Some(dec!(-30)));
        assert_eq!(perf.average_stake, dec!(20));
        assert_eq!(perf.streaks.current_length, 1);
    }
}
