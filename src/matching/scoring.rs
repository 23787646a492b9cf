use std::collections::HashSet;

/// Safely convert usize to f64 for percentage calculations
///
/// Symptom counts are tiny, so the precision loss on 64-bit platforms never
/// matters here.
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// How well a selection covers one disease's required symptoms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    /// Required symptoms present in the selection
    pub matched_symptoms: usize,

    /// Total symptoms required by the disease
    pub total_symptoms: usize,

    /// `100 * matched / total`, or 0.0 when the disease requires nothing
    pub percentage: f64,
}

impl MatchScore {
    /// Score a disease's symptom positions against the selected positions
    #[must_use]
    pub fn calculate(disease_positions: &[usize], selected: &HashSet<usize>) -> Self {
        let total_symptoms = disease_positions.len();
        let matched_symptoms = disease_positions
            .iter()
            .filter(|pos| selected.contains(*pos))
            .count();

        let percentage = if total_symptoms == 0 {
            0.0
        } else {
            100.0 * count_to_f64(matched_symptoms) / count_to_f64(total_symptoms)
        };

        Self {
            matched_symptoms,
            total_symptoms,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(raw: &[usize]) -> HashSet<usize> {
        raw.iter().copied().collect()
    }

    #[test]
    fn test_percentage() {
        let score = MatchScore::calculate(&[0, 1], &selection(&[0]));
        assert_eq!(score.matched_symptoms, 1);
        assert_eq!(score.total_symptoms, 2);
        assert!((score.percentage - 50.0).abs() < f64::EPSILON);

        let score = MatchScore::calculate(&[0, 1, 2], &selection(&[0, 1, 2, 5]));
        assert!((score.percentage - 100.0).abs() < f64::EPSILON);

        let score = MatchScore::calculate(&[3, 4, 5], &selection(&[4]));
        assert!((score.percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_disease_scores_zero() {
        let score = MatchScore::calculate(&[], &selection(&[0, 1]));
        assert_eq!(score.total_symptoms, 0);
        assert!((score.percentage - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_overlap() {
        let score = MatchScore::calculate(&[7, 8], &selection(&[0, 1]));
        assert_eq!(score.matched_symptoms, 0);
        assert!((score.percentage - 0.0).abs() < f64::EPSILON);
    }
}
