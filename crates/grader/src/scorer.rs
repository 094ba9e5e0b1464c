//! The grading pass.
//!
//! Sums per-category points and maps the total onto the letter table. The
//! total is not re-normalized; a table whose rounded scores land below zero
//! still grades `F`.

use courier_events::{CategoryScore, LetterGrade};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::category::ScoreCategory;

/// Letter thresholds, highest first. A total earns the first letter whose
/// threshold it reaches.
pub const GRADE_THRESHOLDS: [(i32, LetterGrade); 6] = [
    (100, LetterGrade::S),
    (90, LetterGrade::A),
    (80, LetterGrade::B),
    (70, LetterGrade::C),
    (60, LetterGrade::D),
    (0, LetterGrade::F),
];

/// Errors raised by a grading pass. Both indicate a setup bug.
#[derive(Debug, Error, PartialEq)]
pub enum GradeError {
    #[error("category weights sum to {total}, expected 100")]
    WeightMismatch { total: i32 },
    #[error("no categories to grade")]
    EmptyCategoryTable,
}

/// Result of a grading pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub total: i32,
    pub letter: LetterGrade,
    pub breakdown: Vec<CategoryScore>,
}

/// Returns the letter for a total score.
pub fn letter_for(total: i32) -> LetterGrade {
    GRADE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| total >= *threshold)
        .map(|(_, letter)| *letter)
        .unwrap_or(LetterGrade::F)
}

/// Grades a set of categories.
///
/// Weights must sum to exactly 100.
pub fn calculate_score(categories: &[ScoreCategory]) -> Result<Grade, GradeError> {
    if categories.is_empty() {
        return Err(GradeError::EmptyCategoryTable);
    }

    let weight_total: i32 = categories.iter().map(|c| c.weight_percent).sum();
    if weight_total != 100 {
        return Err(GradeError::WeightMismatch {
            total: weight_total,
        });
    }

    let breakdown: Vec<CategoryScore> = categories
        .iter()
        .map(|category| {
            let score = category.score();
            debug!(
                category = %category.name,
                current = category.current_value,
                target = category.target_value,
                score,
                "scored category"
            );
            CategoryScore {
                name: category.name.clone(),
                weight_percent: category.weight_percent,
                current_value: category.current_value,
                score,
            }
        })
        .collect();

    let total = breakdown.iter().map(|c| c.score).sum();

    Ok(Grade {
        total,
        letter: letter_for(total),
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_targets_met_is_perfect() {
        let categories = vec![
            ScoreCategory::high("Package Health", 40, 100.0, 100.0),
            ScoreCategory::high("Player Health", 40, 100.0, 100.0),
            ScoreCategory::low("Completion Time", 20, 90.0, 90.0),
        ];

        let grade = calculate_score(&categories).unwrap();
        assert_eq!(grade.total, 100);
        assert_eq!(grade.letter, LetterGrade::S);
        assert_eq!(grade.breakdown.len(), 3);
    }

    #[test]
    fn test_weight_mismatch_is_fatal() {
        let categories = vec![
            ScoreCategory::high("Package Health", 40, 100.0, 100.0),
            ScoreCategory::high("Player Health", 40, 100.0, 100.0),
        ];

        assert_eq!(
            calculate_score(&categories),
            Err(GradeError::WeightMismatch { total: 80 })
        );
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(calculate_score(&[]), Err(GradeError::EmptyCategoryTable));
    }

    #[test]
    fn test_letter_thresholds() {
        assert_eq!(letter_for(100), LetterGrade::S);
        assert_eq!(letter_for(99), LetterGrade::A);
        assert_eq!(letter_for(90), LetterGrade::A);
        assert_eq!(letter_for(89), LetterGrade::B);
        assert_eq!(letter_for(70), LetterGrade::C);
        assert_eq!(letter_for(60), LetterGrade::D);
        assert_eq!(letter_for(59), LetterGrade::F);
        assert_eq!(letter_for(0), LetterGrade::F);
        assert_eq!(letter_for(-3), LetterGrade::F);
    }

    #[test]
    fn test_mixed_run() {
        let categories = vec![
            ScoreCategory::high("Package Health", 25, 100.0, 80.0),
            ScoreCategory::high("Player Health", 25, 100.0, 100.0),
            ScoreCategory::low("Completion Time", 25, 0.0, 0.0).with_penalty_exponent(0.999),
            ScoreCategory::low("Police Pullovers", 25, 0.0, 1.0),
        ];

        let grade = calculate_score(&categories).unwrap();
        // 20 + 25 + 25 + 24
        assert_eq!(grade.total, 94);
        assert_eq!(grade.letter, LetterGrade::A);
    }
}
