//! Scoring module - round tally, ending penalty, and ranking
//!
//! Rules:
//! - Every hand is force-revealed and summed.
//! - The player who ended the round has their hand sum doubled if it is
//!   strictly greater than the lowest hand sum at the table.
//! - Round points are added to each cumulative score.
//! - Ranking is a stable ascending sort on the resulting cumulative score,
//!   so ties keep seating order.

use crate::player::Player;
use crate::types::PlayerId;

/// One player's line in a round result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRoundScore {
    pub player: PlayerId,
    /// Raw sum of the fully revealed hand
    pub hand_sum: i32,
    /// Whether the ending penalty doubled `hand_sum`
    pub penalized: bool,
    /// Points added to the cumulative score this round
    pub round_points: i32,
    /// Cumulative score after this round
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub round: u32,
    /// Player whose full reveal triggered the final round, if still seated
    pub ender: Option<PlayerId>,
    /// Seating order
    pub scores: Vec<PlayerRoundScore>,
    /// Best (lowest) total first
    pub ranking: Vec<PlayerId>,
}

impl RoundResult {
    pub fn score_of(&self, player: PlayerId) -> Option<&PlayerRoundScore> {
        self.scores.iter().find(|s| s.player == player)
    }

    /// Lowest cumulative total after this round
    pub fn leader(&self) -> Option<PlayerId> {
        self.ranking.first().copied()
    }
}

/// Whether the round ender's sum earns the doubling penalty
pub fn penalty_applies(ender_sum: i32, all_sums: &[i32]) -> bool {
    match all_sums.iter().min() {
        Some(&min) => ender_sum > min,
        None => false,
    }
}

/// Points a hand sum contributes, after the penalty if any
pub fn round_points(hand_sum: i32, penalized: bool) -> i32 {
    if penalized {
        hand_sum * 2
    } else {
        hand_sum
    }
}

/// Reveal every hand, tally the round, and update cumulative scores
pub fn score_round(players: &mut [Player], ender: Option<PlayerId>, round: u32) -> RoundResult {
    for player in players.iter_mut() {
        player.hand_mut().reveal_all();
    }

    let sums: Vec<i32> = players.iter().map(|p| p.hand().total()).collect();
    let ender = ender.filter(|id| players.iter().any(|p| p.id() == *id));

    let mut scores = Vec::with_capacity(players.len());
    for (player, &hand_sum) in players.iter_mut().zip(sums.iter()) {
        let penalized = ender == Some(player.id()) && penalty_applies(hand_sum, &sums);
        let points = round_points(hand_sum, penalized);
        player.add_score(points);
        scores.push(PlayerRoundScore {
            player: player.id(),
            hand_sum,
            penalized,
            round_points: points,
            total: player.score(),
        });
    }

    let mut ranked = scores.clone();
    ranked.sort_by_key(|s| s.total);
    let ranking = ranked.iter().map(|s| s.player).collect();

    RoundResult {
        round,
        ender,
        scores,
        ranking,
    }
}

/// Whether any cumulative score has reached the threshold
pub fn match_over(players: &[Player], threshold: i32) -> bool {
    players.iter().any(|p| p.score() >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::Hand;
    use crate::types::{Card, CardId};

    fn player(id: u32, values: [i8; 12]) -> Player {
        let mut p = Player::new(PlayerId(id), format!("p{id}"));
        p.deal(Hand::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Card::new(CardId(id * 100 + i as u32), v))
                .collect(),
        ));
        p
    }

    #[test]
    fn penalty_only_when_strictly_above_minimum() {
        assert!(penalty_applies(10, &[10, 5]));
        assert!(!penalty_applies(5, &[10, 5]));
        assert!(!penalty_applies(5, &[5, 5]));
        assert!(penalty_applies(-1, &[-1, -3]));
        assert!(!penalty_applies(0, &[]));
    }

    #[test]
    fn round_points_doubles_when_penalized() {
        assert_eq!(round_points(7, false), 7);
        assert_eq!(round_points(7, true), 14);
        assert_eq!(round_points(-3, true), -6);
    }

    #[test]
    fn ender_with_lowest_hand_is_not_doubled() {
        let mut players = vec![player(0, [1; 12]), player(1, [2; 12])];
        let result = score_round(&mut players, Some(PlayerId(0)), 1);

        let p0 = result.score_of(PlayerId(0)).unwrap();
        assert_eq!(p0.hand_sum, 12);
        assert!(!p0.penalized);
        assert_eq!(p0.total, 12);
        assert_eq!(players[1].score(), 24);
        assert_eq!(result.ranking, vec![PlayerId(0), PlayerId(1)]);
        assert!(players.iter().all(|p| p.hand().all_face_up()));
    }

    #[test]
    fn ender_above_minimum_is_doubled() {
        let mut players = vec![player(0, [1; 12]), player(1, [2; 12])];
        let result = score_round(&mut players, Some(PlayerId(1)), 1);

        let p1 = result.score_of(PlayerId(1)).unwrap();
        assert!(p1.penalized);
        assert_eq!(p1.round_points, 48);
        assert_eq!(players[1].score(), 48);
        assert_eq!(result.leader(), Some(PlayerId(0)));
    }

    #[test]
    fn tied_minimum_is_not_doubled() {
        let mut players = vec![player(0, [1; 12]), player(1, [1; 12])];
        let result = score_round(&mut players, Some(PlayerId(1)), 1);
        assert!(!result.score_of(PlayerId(1)).unwrap().penalized);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let mut players = vec![
            player(0, [3; 12]),
            player(1, [1; 12]),
            player(2, [3; 12]),
        ];
        let result = score_round(&mut players, None, 1);
        assert_eq!(result.ranking, vec![PlayerId(1), PlayerId(0), PlayerId(2)]);
    }

    #[test]
    fn scores_accumulate_and_end_match() {
        let mut players = vec![player(0, [5; 12]), player(1, [0; 12])];
        score_round(&mut players, None, 1);
        assert_eq!(players[0].score(), 60);
        assert!(!match_over(&players, 100));

        players[0].deal(Hand::new(vec![Card::new(CardId(0), 12); 12]));
        score_round(&mut players, None, 2);
        assert_eq!(players[0].score(), 204);
        assert!(match_over(&players, 100));
    }

    #[test]
    fn departed_ender_has_no_penalty_target() {
        let mut players = vec![player(0, [5; 12]), player(1, [0; 12])];
        let result = score_round(&mut players, Some(PlayerId(9)), 1);
        assert_eq!(result.ender, None);
        assert!(result.scores.iter().all(|s| !s.penalized));
    }
}
