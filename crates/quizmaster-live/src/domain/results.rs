//! Results projections over a quiz and its participants.

use quizmaster_catalog::domain::aggregates::Quiz;
use quizmaster_catalog::domain::participant::Participant;
use quizmaster_catalog::domain::question::QuestionType;
use serde::Serialize;
use uuid::Uuid;

use super::leaderboard::rank;

/// Fixed leading columns of an export.
pub const SUMMARY_COLUMNS: [&str; 7] = [
    "Rank",
    "Name",
    "Email",
    "Correct",
    "Points",
    "Avg Time",
    "Completion",
];

/// Percentage of gradable questions the participant answered.
#[must_use]
pub fn completion_rate(quiz: &Quiz, participant: &Participant) -> f64 {
    let gradable: Vec<Uuid> = quiz.gradable_questions().map(|q| q.id).collect();
    if gradable.is_empty() {
        return 0.0;
    }
    let answered = gradable
        .iter()
        .filter(|id| participant.response_for(**id).is_some())
        .count();
    #[allow(clippy::cast_precision_loss)]
    let rate = answered as f64 / gradable.len() as f64 * 100.0;
    rate
}

/// One per-question cell of an export row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportCell {
    /// The answer as text; `None` for a blank submission.
    pub response: Option<String>,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Points awarded.
    pub points: u32,
    /// Seconds taken.
    pub response_time: f64,
}

/// One participant row of an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    /// 1-based rank.
    pub rank: u32,
    /// Participant identifier.
    pub participant_id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email, if given.
    pub email: Option<String>,
    /// Number of correct graded answers.
    pub correct_answers: u32,
    /// Sum of awarded points.
    pub total_points: u32,
    /// Mean response time in seconds.
    pub average_response_time: f64,
    /// Percentage of gradable questions answered.
    pub completion_rate: f64,
    /// One cell per gradable question, `None` when unanswered.
    pub cells: Vec<Option<ExportCell>>,
}

/// Tabular results of a quiz, one row per participant in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsExport {
    /// Column headers: the summary columns, then four per gradable question.
    pub columns: Vec<String>,
    /// Rows in rank order.
    pub rows: Vec<ExportRow>,
}

/// Builds the results export for a quiz.
#[must_use]
pub fn export_results(quiz: &Quiz, participants: &[Participant]) -> ResultsExport {
    let gradable: Vec<(usize, &_)> = quiz
        .questions
        .iter()
        .enumerate()
        .filter(|(_, q)| q.is_gradable())
        .collect();

    let mut columns: Vec<String> = SUMMARY_COLUMNS.iter().map(|c| (*c).to_owned()).collect();
    for (position, _) in &gradable {
        let n = position + 1;
        for suffix in ["Response", "Correct", "Points", "Time"] {
            columns.push(format!("Q{n} {suffix}"));
        }
    }

    let rows = rank(participants)
        .into_iter()
        .filter_map(|standing| {
            let p = participants.iter().find(|p| p.id == standing.participant_id)?;
            let cells = gradable
                .iter()
                .map(|(_, question)| {
                    p.response_for(question.id).map(|r| ExportCell {
                        response: r.answer.as_ref().map(|a| a.describe(question)),
                        correct: r.correct,
                        points: r.points,
                        response_time: r.response_time,
                    })
                })
                .collect();
            Some(ExportRow {
                rank: standing.rank,
                participant_id: p.id,
                name: p.name.clone(),
                email: p.email.clone(),
                correct_answers: p.correct_answers,
                total_points: p.total_points,
                average_response_time: p.average_response_time,
                completion_rate: completion_rate(quiz, p),
                cells,
            })
        })
        .collect();

    ResultsExport { columns, rows }
}

/// Aggregate figures for a quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizAnalytics {
    /// The quiz.
    pub quiz_id: Uuid,
    /// Number of participants.
    pub participant_count: usize,
    /// Mean correct answers per participant.
    pub average_correct_answers: f64,
    /// Mean share of the maximum points, as a percentage.
    pub average_score_percent: f64,
    /// Mean of the participants' average response times.
    pub average_response_time: f64,
    /// Mean completion rate, as a percentage.
    pub average_completion_rate: f64,
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

/// Computes quiz analytics. All averages are 0 without participants.
#[must_use]
pub fn analytics(quiz: &Quiz, participants: &[Participant]) -> QuizAnalytics {
    let n = participants.len();
    let max_points = f64::from(quiz.max_points());

    QuizAnalytics {
        quiz_id: quiz.id,
        participant_count: n,
        average_correct_answers: mean(participants.iter().map(|p| f64::from(p.correct_answers)), n),
        average_score_percent: mean(
            participants.iter().map(|p| {
                if max_points > 0.0 {
                    f64::from(p.total_points) / max_points * 100.0
                } else {
                    0.0
                }
            }),
            n,
        ),
        average_response_time: mean(participants.iter().map(|p| p.average_response_time), n),
        average_completion_rate: mean(participants.iter().map(|p| completion_rate(quiz, p)), n),
    }
}

/// One question line of a participant detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    /// The question.
    pub question_id: Uuid,
    /// 1-based position in the quiz.
    pub position: usize,
    /// Question type.
    pub kind: QuestionType,
    /// Prompt.
    pub text: String,
    /// Whether a response was recorded.
    pub answered: bool,
    /// The answer as text.
    pub response: Option<String>,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Points awarded.
    pub points: u32,
    /// Seconds taken.
    pub response_time: Option<f64>,
}

/// A participant's summary plus one line per question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantDetail {
    /// Participant identifier.
    pub participant_id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Rank among the quiz's participants.
    pub rank: u32,
    /// Number of correct graded answers.
    pub correct_answers: u32,
    /// Sum of awarded points.
    pub total_points: u32,
    /// Mean response time in seconds.
    pub average_response_time: f64,
    /// Percentage of gradable questions answered.
    pub completion_rate: f64,
    /// Per-question results in quiz order.
    pub questions: Vec<QuestionResult>,
}

/// Builds the detail view of one participant. Returns `None` if the
/// participant is not among `participants`.
#[must_use]
pub fn participant_detail(
    quiz: &Quiz,
    participants: &[Participant],
    participant_id: Uuid,
) -> Option<ParticipantDetail> {
    let p = participants.iter().find(|p| p.id == participant_id)?;
    let rank = rank(participants)
        .iter()
        .find(|s| s.participant_id == participant_id)
        .map(|s| s.rank)?;

    let questions = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let response = p.response_for(q.id);
            QuestionResult {
                question_id: q.id,
                position: i + 1,
                kind: q.kind,
                text: q.text.clone(),
                answered: response.is_some(),
                response: response.and_then(|r| r.answer.as_ref()).map(|a| a.describe(q)),
                correct: response.is_some_and(|r| r.correct),
                points: response.map_or(0, |r| r.points),
                response_time: response.map(|r| r.response_time),
            }
        })
        .collect();

    Some(ParticipantDetail {
        participant_id: p.id,
        name: p.name.clone(),
        email: p.email.clone(),
        rank,
        correct_answers: p.correct_answers,
        total_points: p.total_points,
        average_response_time: p.average_response_time,
        completion_rate: completion_rate(quiz, p),
        questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizmaster_catalog::domain::answer::Answer;
    use quizmaster_catalog::domain::participant::Response;
    use quizmaster_catalog::domain::question::{CorrectAnswer, QuestionDraft};
    use quizmaster_test_support::fixed_now;

    fn draft(kind: &str, options: &[&str], key: Vec<CorrectAnswer>, points: u32) -> QuestionDraft {
        QuestionDraft {
            kind: kind.to_owned(),
            text: format!("{kind} question"),
            options: options.iter().map(|o| (*o).to_owned()).collect(),
            correct_answers: key,
            timer: 30,
            points,
            media: None,
        }
    }

    fn quiz() -> Quiz {
        let mut quiz = Quiz::new(Uuid::new_v4(), "Sample Quiz", "", "DEMO123", "", fixed_now()).unwrap();
        quiz.add_question(Uuid::new_v4(), draft("instruction_slide", &[], vec![], 0), fixed_now())
            .unwrap();
        quiz.add_question(
            Uuid::new_v4(),
            draft(
                "single_choice",
                &["London", "Berlin", "Paris", "Madrid"],
                vec![CorrectAnswer::Index(2)],
                10,
            ),
            fixed_now(),
        )
        .unwrap();
        quiz.add_question(
            Uuid::new_v4(),
            draft("true_false", &[], vec![CorrectAnswer::Bool(false)], 5),
            fixed_now(),
        )
        .unwrap();
        quiz
    }

    fn answered(quiz: &Quiz, name: &str, seq: u32, answers: &[(usize, Answer, bool, f64)]) -> Participant {
        let mut p = Participant::new(Uuid::new_v4(), quiz.id, name, None, fixed_now()).unwrap();
        p.join_sequence = seq;
        for (index, answer, correct, time) in answers {
            let q = &quiz.questions[*index];
            p.record(Response {
                question_id: q.id,
                answer: Some(answer.clone()),
                correct: *correct,
                points: if *correct { q.points } else { 0 },
                response_time: *time,
                graded: q.is_gradable(),
                submitted_at: fixed_now(),
            })
            .unwrap();
        }
        p
    }

    #[test]
    fn test_export_has_cells_per_gradable_question_in_rank_order() {
        // Arrange
        let quiz = quiz();
        let alice = answered(&quiz, "Alice", 0, &[(1, Answer::Choice(0), false, 5.0)]);
        let bob = answered(
            &quiz,
            "Bob",
            1,
            &[
                (0, Answer::Acknowledge, true, 1.0),
                (1, Answer::Choice(2), true, 4.0),
                (2, Answer::Boolean(false), true, 6.0),
            ],
        );

        // Act
        let export = export_results(&quiz, &[alice, bob]);

        // Assert
        assert_eq!(export.columns.len(), SUMMARY_COLUMNS.len() + 8);
        assert_eq!(export.columns[7], "Q2 Response");
        assert_eq!(export.columns[14], "Q3 Time");
        assert_eq!(export.rows[0].name, "Bob");
        assert_eq!(export.rows[0].total_points, 15);
        assert!((export.rows[0].completion_rate - 100.0).abs() < f64::EPSILON);
        let alice_row = &export.rows[1];
        assert_eq!(alice_row.cells.len(), 2);
        assert_eq!(
            alice_row.cells[0].as_ref().and_then(|c| c.response.clone()),
            Some("London".to_owned())
        );
        assert!(alice_row.cells[1].is_none());
        assert!((alice_row.completion_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_analytics_averages_over_participants() {
        let quiz = quiz();
        let alice = answered(&quiz, "Alice", 0, &[(1, Answer::Choice(2), true, 4.0)]);
        let bob = answered(&quiz, "Bob", 1, &[(1, Answer::Choice(0), false, 8.0)]);

        let stats = analytics(&quiz, &[alice, bob]);

        assert_eq!(stats.participant_count, 2);
        assert!((stats.average_correct_answers - 0.5).abs() < f64::EPSILON);
        // Alice scored 10 of 15 points, Bob none.
        assert!((stats.average_score_percent - 100.0 / 3.0).abs() < 1e-9);
        assert!((stats.average_response_time - 6.0).abs() < f64::EPSILON);
        assert!((stats.average_completion_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_analytics_without_participants_is_zero() {
        let stats = analytics(&quiz(), &[]);
        assert_eq!(stats.participant_count, 0);
        assert!(stats.average_score_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_participant_detail_lists_every_question() {
        let quiz = quiz();
        let alice = answered(&quiz, "Alice", 0, &[(2, Answer::Boolean(true), false, 3.0)]);
        let id = alice.id;

        let detail = participant_detail(&quiz, &[alice], id).unwrap();

        assert_eq!(detail.rank, 1);
        assert_eq!(detail.questions.len(), 3);
        assert!(!detail.questions[0].answered);
        assert_eq!(detail.questions[2].response.as_deref(), Some("True"));
        assert_eq!(detail.questions[2].response_time, Some(3.0));
        assert!(participant_detail(&quiz, &[], id).is_none());
    }
}
