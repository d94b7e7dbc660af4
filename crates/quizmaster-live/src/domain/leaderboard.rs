//! Leaderboard ranking.

use std::cmp::Ordering;

use quizmaster_catalog::domain::participant::Participant;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based rank, distinct per participant.
    pub rank: u32,
    /// The ranked participant.
    pub participant_id: Uuid,
    /// Display name.
    pub name: String,
    /// Number of correct graded answers.
    pub correct_answers: u32,
    /// Sum of awarded points.
    pub total_points: u32,
    /// Mean response time over graded answers, in seconds.
    pub average_response_time: f64,
}

/// Leaderboard order: more correct answers first, then faster, then earlier
/// join.
#[must_use]
pub fn compare(a: &Participant, b: &Participant) -> Ordering {
    b.correct_answers
        .cmp(&a.correct_answers)
        .then_with(|| a.average_response_time.total_cmp(&b.average_response_time))
        .then_with(|| a.join_sequence.cmp(&b.join_sequence))
}

/// Ranks participants. Pure; the input is not modified.
#[must_use]
pub fn rank(participants: &[Participant]) -> Vec<Standing> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by(|a, b| compare(a, b));

    ordered
        .into_iter()
        .zip(1u32..)
        .map(|(p, rank)| Standing {
            rank,
            participant_id: p.id,
            name: p.name.clone(),
            correct_answers: p.correct_answers,
            total_points: p.total_points,
            average_response_time: p.average_response_time,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizmaster_test_support::fixed_now;

    fn participant(name: &str, correct: u32, avg: f64, seq: u32) -> Participant {
        let mut p = Participant::new(Uuid::new_v4(), Uuid::nil(), name, None, fixed_now()).unwrap();
        p.correct_answers = correct;
        p.average_response_time = avg;
        p.join_sequence = seq;
        p
    }

    #[test]
    fn test_rank_orders_by_correct_then_speed() {
        // Arrange
        let slow = participant("Bob", 9, 22.3, 0);
        let third = participant("Carol", 7, 25.8, 1);
        let fast = participant("David", 9, 19.2, 2);

        // Act
        let standings = rank(&[slow.clone(), third.clone(), fast.clone()]);

        // Assert
        let order: Vec<Uuid> = standings.iter().map(|s| s.participant_id).collect();
        assert_eq!(order, vec![fast.id, slow.id, third.id]);
        assert_eq!(
            standings.iter().map(|s| s.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_rank_breaks_full_ties_by_join_order() {
        let late = participant("Late", 5, 10.0, 4);
        let early = participant("Early", 5, 10.0, 1);

        let standings = rank(&[late.clone(), early.clone()]);

        assert_eq!(standings[0].participant_id, early.id);
        assert_eq!(standings[1].rank, 2);
    }

    #[test]
    fn test_rank_demo_participants() {
        let demo = [
            participant("Alice", 8, 18.5, 0),
            participant("Bob", 9, 22.3, 1),
            participant("Carol", 7, 25.8, 2),
            participant("David", 9, 19.2, 3),
            participant("Eve", 6, 31.1, 4),
            participant("Frank", 8, 20.7, 5),
        ];

        let names: Vec<String> = rank(&demo).into_iter().map(|s| s.name).collect();

        assert_eq!(names, vec!["David", "Bob", "Alice", "Frank", "Carol", "Eve"]);
    }

    #[test]
    fn test_rank_is_repeatable_and_empty_safe() {
        let demo = [participant("Alice", 1, 2.0, 0), participant("Bob", 1, 1.0, 1)];
        assert_eq!(rank(&demo), rank(&demo));
        assert!(rank(&[]).is_empty());
    }
}
