use serde::{Deserialize, Serialize};

use crate::domain::{Bet, BetStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Win,
    Loss,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakStats {
    pub current_kind: StreakKind,
    pub current_length: u32,
    pub longest_win: u32,
    pub longest_loss: u32,
}

/// Bets sorted by date, ties keeping input order
pub(crate) fn chronological(bets: &[Bet]) -> Vec<&Bet> {
    let mut ordered: Vec<&Bet> = bets.iter().collect();
    ordered.sort_by_key(|b| b.date);
    ordered
}

/// Scan settled bets in date order. A loss resets the win counter and a win
/// resets the loss counter; pending bets leave both untouched.
pub fn compute_streaks(bets: &[Bet]) -> StreakStats {
    let mut stats = StreakStats::default();
    let mut wins = 0u32;
    let mut losses = 0u32;

    for bet in chronological(bets) {
        match bet.status {
            BetStatus::Won => {
                wins += 1;
                losses = 0;
                stats.longest_win = stats.longest_win.max(wins);
            }
            BetStatus::Lost => {
                losses += 1;
                wins = 0;
                stats.longest_loss = stats.longest_loss.max(losses);
            }
            BetStatus::Pending => {}
        }
    }

    (stats.current_kind, stats.current_length) = if wins > 0 {
        (StreakKind::Win, wins)
    } else if losses > 0 {
        (StreakKind::Loss, losses)
    } else {
        (StreakKind::None, 0)
    };
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::bet;
    use rust_decimal_macros::dec;

    fn sequence(statuses: &[BetStatus]) -> Vec<Bet> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| bet(i as i64, *s, dec!(10), dec!(2)))
            .collect()
    }

    #[test]
    fn test_no_bets() {
        assert_eq!(compute_streaks(&[]), StreakStats::default());
    }

    #[test]
    fn test_streaks_reset_on_status_change() {
        use BetStatus::*;
        let bets = sequence(&[Won, Won, Won, Lost, Lost, Won, Lost, Lost, Lost, Lost]);
        let stats = compute_streaks(&bets);
        assert_eq!(stats.longest_win, 3);
        assert_eq!(stats.longest_loss, 4);
        assert_eq!(stats.current_kind, StreakKind::Loss);
        assert_eq!(stats.current_length, 4);
    }

    #[test]
    fn test_pending_does_not_break_streak() {
        use BetStatus::*;
        let bets = sequence(&[Won, Pending, Won, Pending]);
        let stats = compute_streaks(&bets);
        assert_eq!(stats.longest_win, 2);
        assert_eq!(stats.current_kind, StreakKind::Win);
        assert_eq!(stats.current_length, 2);
    }

    #[test]
    fn test_uses_chronological_order() {
        use BetStatus::*;
        // Input out of order: by date this is Lost, Won, Won
        let mut bets = sequence(&[Won, Won, Lost]);
        bets[2].date = bets[0].date - chrono::Duration::hours(5);
        let stats = compute_streaks(&bets);
        assert_eq!(stats.longest_win, 2);
        assert_eq!(stats.longest_loss, 1);
        assert_eq!(stats.current_kind, StreakKind::Win);
    }

    #[test]
    fn test_counters_bounded_by_bet_count() {
        use BetStatus::*;
        let bets = sequence(&[Won, Lost, Won, Won, Lost, Pending, Won]);
        let stats = compute_streaks(&bets);
        let total = bets.len() as u32;
        assert!(stats.longest_win <= total);
        assert!(stats.longest_loss <= total);
        assert!(stats.current_length <= total);
    }
}
