use super::domain::PhysicalProfile;

const BEDROOM_WEIGHT: f64 = 0.3;
const BATHROOM_WEIGHT: f64 = 0.2;
const SQFT_WEIGHT: f64 = 0.3;
const TYPE_WEIGHT: f64 = 0.2;

const BEDROOM_PENALTY: f64 = 0.2;
const BATHROOM_PENALTY: f64 = 0.3;
const TYPE_MISMATCH_SCORE: f64 = 0.5;

/// Returned when no dimension can be compared.
pub const NEUTRAL_SIMILARITY: f64 = 0.5;

/// Similarity in `[0, 1]` between a subject and a candidate. Dimensions missing
/// on either side drop out of both the score and the weight total.
pub fn similarity_score(subject: &PhysicalProfile<'_>, candidate: &PhysicalProfile<'_>) -> f64 {
    let mut score = 0.0;
    let mut total_weight = 0.0;

    if let (Some(a), Some(b)) = (subject.bedrooms, candidate.bedrooms) {
        let diff = (f64::from(a) - f64::from(b)).abs();
        score += (1.0 - diff * BEDROOM_PENALTY).max(0.0) * BEDROOM_WEIGHT;
        total_weight += BEDROOM_WEIGHT;
    }

    if let (Some(a), Some(b)) = (subject.bathrooms, candidate.bathrooms) {
        let diff = (a - b).abs();
        score += (1.0 - diff * BATHROOM_PENALTY).max(0.0) * BATHROOM_WEIGHT;
        total_weight += BATHROOM_WEIGHT;
    }

    // Relative to the subject's size, so a zero-sized subject cannot be scored.
    if let (Some(a), Some(b)) = (
        subject.square_footage.filter(|sqft| *sqft > 0),
        candidate.square_footage,
    ) {
        let diff = (f64::from(a) - f64::from(b)).abs();
        score += (1.0 - diff / f64::from(a)).max(0.0) * SQFT_WEIGHT;
        total_weight += SQFT_WEIGHT;
    }

    if let (Some(a), Some(b)) = (subject.property_type, candidate.property_type) {
        let type_score = if a == b { 1.0 } else { TYPE_MISMATCH_SCORE };
        score += type_score * TYPE_WEIGHT;
        total_weight += TYPE_WEIGHT;
    }

    if total_weight > 0.0 {
        score / total_weight
    } else {
        NEUTRAL_SIMILARITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(
        bedrooms: Option<u32>,
        bathrooms: Option<f64>,
        square_footage: Option<u32>,
        property_type: Option<&str>,
    ) -> PhysicalProfile<'_> {
        PhysicalProfile {
            bedrooms,
            bathrooms,
            square_footage,
            property_type,
        }
    }

    #[test]
    fn identical_properties_score_exactly_one() {
        let subject = profile(Some(3), Some(2.0), Some(1500), Some("Single Family"));
        assert_eq!(similarity_score(&subject, &subject), 1.0);
    }

    #[test]
    fn no_comparable_dimensions_is_neutral() {
        let subject = profile(Some(3), None, None, None);
        let candidate = profile(None, Some(2.0), Some(1200), Some("Condo"));
        assert_eq!(similarity_score(&subject, &candidate), NEUTRAL_SIMILARITY);
    }

    #[test]
    fn missing_dimensions_do_not_penalize() {
        let subject = profile(Some(3), None, None, Some("Condo"));
        let candidate = profile(Some(3), Some(1.0), Some(900), Some("Condo"));
        assert_eq!(similarity_score(&subject, &candidate), 1.0);
    }

    #[test]
    fn blends_penalties_by_weight() {
        let subject = profile(Some(3), Some(2.0), Some(1000), Some("Single Family"));
        let candidate = profile(Some(2), Some(1.0), Some(1250), Some("Condo"));
        // beds 0.8*0.3 + baths 0.7*0.2 + sqft 0.75*0.3 + type 0.5*0.2 = 0.705
        let score = similarity_score(&subject, &candidate);
        assert!((score - 0.705).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn large_differences_floor_at_zero_per_dimension() {
        let subject = profile(Some(1), None, Some(500), None);
        let candidate = profile(Some(9), None, Some(2000), None);
        assert_eq!(similarity_score(&subject, &candidate), 0.0);
    }
}
