use super::domain::{Comparable, PropertyAttributes};
use super::geo::haversine_miles;
use super::settings::{ComparableSearch, RentModel};
use super::similarity::{similarity_score, NEUTRAL_SIMILARITY};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const DEFAULT_DISTANCE_MILES: f64 = 1.0;
const MIN_WEIGHTING_DISTANCE: f64 = 0.1;

/// Monthly rent estimate with its low/high band. All zeros means the rent
/// could not be estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RentEstimate {
    pub rent: f64,
    pub rent_low: f64,
    pub rent_high: f64,
}

impl RentEstimate {
    pub const fn unavailable() -> Self {
        Self {
            rent: 0.0,
            rent_low: 0.0,
            rent_high: 0.0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.rent > 0.0
    }
}

/// Inverse-distance weighted mean of comparable rents, boosted by similarity.
/// Comparables with a non-positive price or weight are ignored. A correlation
/// outside [0, 1] counts as neutral.
pub fn estimate_from_comparables(comparables: &[Comparable], model: &RentModel) -> RentEstimate {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for comparable in comparables {
        if !(comparable.price.is_finite() && comparable.price > 0.0) {
            continue;
        }

        let correlation =
            usable_correlation(comparable.correlation).unwrap_or(NEUTRAL_SIMILARITY);
        let distance = usable_distance(comparable.distance).unwrap_or(DEFAULT_DISTANCE_MILES);
        let weight = correlation / distance.max(MIN_WEIGHTING_DISTANCE);
        if !(weight.is_finite() && weight > 0.0) {
            continue;
        }

        weighted_sum += comparable.price * weight;
        total_weight += weight;
    }

    if !(total_weight > 0.0) {
        return RentEstimate::unavailable();
    }

    let estimate = weighted_sum / total_weight;
    RentEstimate {
        rent: estimate.round_ties_even(),
        rent_low: (estimate * (1.0 - model.range_factor)).round_ties_even(),
        rent_high: (estimate * (1.0 + model.range_factor)).round_ties_even(),
    }
}

/// Square-footage baseline plus bedroom and bathroom bonuses, clamped to a sane
/// rent-per-sqft band. Zero when square footage is unknown.
pub fn estimate_from_attributes(attributes: &PropertyAttributes, model: &RentModel) -> f64 {
    let Some(sqft) = attributes.known_square_footage().map(f64::from) else {
        return 0.0;
    };

    let bedrooms = attributes.bedrooms.map(f64::from).unwrap_or(0.0);
    let bathrooms = attributes.bathrooms.unwrap_or(0.0);
    let adjustment = bedrooms * model.bedroom_bonus + bathrooms * model.bathroom_bonus;

    let mut rent = (sqft * model.base_rent_per_sqft + adjustment).max(0.0);
    if rent / sqft < model.min_rent_per_sqft {
        rent = sqft * model.min_rent_per_sqft + adjustment;
    }
    if rent / sqft > model.max_rent_per_sqft {
        rent = sqft * model.max_rent_per_sqft + adjustment;
    }

    round_cents(rent)
}

/// Fills in `correlation` and `distance` on comparables that arrive unscored.
/// Out-of-range values are discarded and rescored. Distance needs coordinates
/// on both sides; otherwise it stays unset and the estimator treats it as one
/// mile.
pub fn score_comparables(
    subject: &PropertyAttributes,
    comparables: impl IntoIterator<Item = Comparable>,
) -> Vec<Comparable> {
    let subject_profile = subject.physical();
    let subject_coordinates = subject.coordinates();

    comparables
        .into_iter()
        .map(|mut comparable| {
            comparable.correlation = usable_correlation(comparable.correlation);
            comparable.distance = usable_distance(comparable.distance);
            if comparable.correlation.is_none() {
                comparable.correlation =
                    Some(similarity_score(&subject_profile, &comparable.physical()));
            }
            if comparable.distance.is_none() {
                comparable.distance = subject_coordinates
                    .zip(comparable.coordinates())
                    .map(|(from, to)| haversine_miles(from, to));
            }
            comparable
        })
        .collect()
}

/// Builds a comparable list from a pool of recorded properties: candidates
/// within the search radius, priced by a rent-to-sale-price proxy, ordered by
/// similarity then proximity.
pub fn find_similar_properties(
    subject: &PropertyAttributes,
    pool: &[PropertyAttributes],
    search: &ComparableSearch,
    model: &RentModel,
) -> Vec<Comparable> {
    let Some(origin) = subject.coordinates() else {
        return Vec::new();
    };
    let subject_profile = subject.physical();

    let mut candidates: Vec<Comparable> = pool
        .iter()
        .filter(|candidate| !is_same_property(subject, candidate))
        .filter_map(|candidate| {
            let coordinates = candidate.coordinates()?;
            let sale_price = candidate.last_sale_price.filter(|price| *price > 0.0)?;

            let distance = haversine_miles(origin, coordinates);
            if !(distance <= search.radius_miles) {
                return None;
            }

            let correlation = similarity_score(&subject_profile, &candidate.physical());
            Some(Comparable {
                id: candidate.id.clone(),
                formatted_address: candidate.formatted_address.clone(),
                price: rent_from_sale_price(sale_price, model),
                latitude: candidate.latitude,
                longitude: candidate.longitude,
                bedrooms: candidate.bedrooms,
                bathrooms: candidate.bathrooms,
                square_footage: candidate.square_footage,
                property_type: candidate.property_type.clone(),
                distance: Some(distance),
                correlation: Some(correlation),
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        let by_correlation = b
            .correlation
            .unwrap_or(0.0)
            .total_cmp(&a.correlation.unwrap_or(0.0));
        match by_correlation {
            Ordering::Equal => a
                .distance
                .unwrap_or(f64::MAX)
                .total_cmp(&b.distance.unwrap_or(f64::MAX)),
            other => other,
        }
    });
    candidates.truncate(search.max_results);
    candidates
}

pub fn rent_from_sale_price(sale_price: f64, model: &RentModel) -> f64 {
    if sale_price <= 0.0 {
        return 0.0;
    }
    sale_price * model.rent_to_price_ratio
}

fn usable_correlation(correlation: Option<f64>) -> Option<f64> {
    correlation.filter(|value| (0.0..=1.0).contains(value))
}

fn usable_distance(distance: Option<f64>) -> Option<f64> {
    distance.filter(|miles| miles.is_finite() && *miles >= 0.0)
}

fn is_same_property(subject: &PropertyAttributes, candidate: &PropertyAttributes) -> bool {
    matches!((&subject.id, &candidate.id), (Some(a), Some(b)) if a == b)
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparable(price: f64, correlation: f64, distance: f64) -> Comparable {
        Comparable {
            price,
            correlation: Some(correlation),
            distance: Some(distance),
            ..Comparable::default()
        }
    }

    fn located(id: &str, lat: f64, lon: f64, sale_price: Option<f64>) -> PropertyAttributes {
        PropertyAttributes {
            id: Some(id.to_string()),
            latitude: Some(lat),
            longitude: Some(lon),
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            square_footage: Some(1500),
            property_type: Some("Single Family".to_string()),
            last_sale_price: sale_price,
            ..PropertyAttributes::default()
        }
    }

    #[test]
    fn weighted_estimate_favors_close_similar_comparables() {
        let model = RentModel::default();
        let comparables = vec![
            comparable(2000.0, 1.0, 0.5), // weight 2.0
            comparable(3000.0, 0.5, 1.0), // weight 0.5
        ];

        let estimate = estimate_from_comparables(&comparables, &model);

        // (4000 + 1500) / 2.5 = 2200
        assert_eq!(estimate.rent, 2200.0);
        assert_eq!(estimate.rent_low, 2035.0);
        assert_eq!(estimate.rent_high, 2365.0);
    }

    #[test]
    fn distance_is_floored_when_weighting() {
        let model = RentModel::default();
        let near = vec![comparable(1800.0, 0.9, 0.0), comparable(2400.0, 0.9, 0.1)];
        let estimate = estimate_from_comparables(&near, &model);
        assert_eq!(estimate.rent, 2100.0);
    }

    #[test]
    fn unusable_comparables_yield_no_estimate() {
        let model = RentModel::default();
        let comparables = vec![comparable(0.0, 1.0, 1.0), comparable(-50.0, 1.0, 1.0)];
        assert_eq!(
            estimate_from_comparables(&comparables, &model),
            RentEstimate::unavailable()
        );
        assert!(!estimate_from_comparables(&[], &model).is_available());
    }

    #[test]
    fn out_of_range_correlations_count_as_neutral() {
        let model = RentModel::default();
        let comparables: Vec<Comparable> = serde_json::from_value(serde_json::json!([
            { "price": 3000, "correlation": 1.0, "distance": 1.0 },
            { "price": 1000, "correlation": -0.99, "distance": 1.0 }
        ]))
        .expect("comparables parse");

        let estimate = estimate_from_comparables(&comparables, &model);

        // (3000 * 1.0 + 1000 * 0.5) / 1.5
        assert_eq!(estimate.rent, 2333.0);
        assert!(estimate.rent_low < estimate.rent && estimate.rent < estimate.rent_high);

        let inflated = vec![comparable(3000.0, 7.5, 1.0), comparable(1000.0, 0.5, 1.0)];
        assert_eq!(estimate_from_comparables(&inflated, &model).rent, 2000.0);
    }

    #[test]
    fn zero_weight_comparables_are_skipped() {
        let model = RentModel::default();
        let comparables = vec![comparable(9000.0, 0.0, 1.0), comparable(2100.0, 0.8, 1.0)];
        assert_eq!(estimate_from_comparables(&comparables, &model).rent, 2100.0);
    }

    #[test]
    fn half_dollar_estimates_round_to_even() {
        let model = RentModel::default();
        let comparables = vec![comparable(2200.0, 1.0, 1.0), comparable(2201.0, 1.0, 1.0)];
        assert_eq!(estimate_from_comparables(&comparables, &model).rent, 2200.0);
    }

    #[test]
    fn attribute_estimate_adds_room_bonuses() {
        let attrs = PropertyAttributes {
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            square_footage: Some(1500),
            ..PropertyAttributes::default()
        };
        // 1500 * 1.10 + 3 * 150 + 2 * 75
        assert_eq!(estimate_from_attributes(&attrs, &RentModel::default()), 2250.0);
    }

    #[test]
    fn attribute_estimate_requires_square_footage() {
        let attrs = PropertyAttributes {
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            square_footage: Some(0),
            ..PropertyAttributes::default()
        };
        assert_eq!(estimate_from_attributes(&attrs, &RentModel::default()), 0.0);
    }

    #[test]
    fn attribute_estimate_clamps_rent_per_sqft() {
        let attrs = PropertyAttributes {
            square_footage: Some(1000),
            ..PropertyAttributes::default()
        };

        let cheap = RentModel {
            base_rent_per_sqft: 0.2,
            ..RentModel::default()
        };
        assert_eq!(estimate_from_attributes(&attrs, &cheap), 600.0);

        let pricey = RentModel {
            base_rent_per_sqft: 5.0,
            ..RentModel::default()
        };
        assert_eq!(estimate_from_attributes(&attrs, &pricey), 3500.0);
    }

    #[test]
    fn scoring_fills_missing_similarity_and_distance() {
        let subject = located("subject", 30.0, -97.0, None);
        let unscored = Comparable {
            price: 2100.0,
            latitude: Some(30.0),
            longitude: Some(-97.0),
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            square_footage: Some(1500),
            property_type: Some("Single Family".to_string()),
            ..Comparable::default()
        };
        let preset = comparable(1900.0, 0.4, 2.5);

        let scored = score_comparables(&subject, vec![unscored, preset]);

        assert_eq!(scored[0].correlation, Some(1.0));
        assert_eq!(scored[0].distance, Some(0.0));
        assert_eq!(scored[1].correlation, Some(0.4));
        assert_eq!(scored[1].distance, Some(2.5));
    }

    #[test]
    fn scoring_replaces_out_of_range_values() {
        let subject = located("subject", 30.0, -97.0, None);
        let mut bogus = comparable(2100.0, -0.99, -3.0);
        bogus.latitude = Some(30.0);
        bogus.longitude = Some(-97.0);
        bogus.bedrooms = Some(3);
        bogus.bathrooms = Some(2.0);
        bogus.square_footage = Some(1500);
        bogus.property_type = Some("Single Family".to_string());

        let scored = score_comparables(&subject, vec![bogus, comparable(1900.0, f64::NAN, 1.0)]);

        assert_eq!(scored[0].correlation, Some(1.0));
        assert_eq!(scored[0].distance, Some(0.0));
        assert!(scored[1]
            .correlation
            .is_some_and(|value| (0.0..=1.0).contains(&value)));
    }

    #[test]
    fn discovery_filters_by_radius_and_sale_price() {
        let subject = located("subject", 30.2672, -97.7431, None);
        let pool = vec![
            subject.clone(),
            located("near", 30.2700, -97.7400, Some(250_000.0)),
            located("unpriced", 30.2680, -97.7420, None),
            located("far", 31.2672, -97.7431, Some(400_000.0)),
        ];

        let found = find_similar_properties(
            &subject,
            &pool,
            &ComparableSearch::default(),
            &RentModel::default(),
        );

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_deref(), Some("near"));
        assert_eq!(found[0].price, 2500.0);
        assert_eq!(found[0].correlation, Some(1.0));
    }

    #[test]
    fn discovery_orders_by_similarity_then_distance_and_keeps_top_results() {
        let subject = located("subject", 30.0, -97.0, None);
        let mut pool = Vec::new();
        for index in 0..6 {
            pool.push(located(
                &format!("twin-{index}"),
                30.0 + 0.001 * (6 - index) as f64,
                -97.0,
                Some(200_000.0),
            ));
        }
        let mut different = located("different", 30.0001, -97.0, Some(200_000.0));
        different.bedrooms = Some(6);
        pool.push(different);

        let found = find_similar_properties(
            &subject,
            &pool,
            &ComparableSearch::default(),
            &RentModel::default(),
        );

        assert_eq!(found.len(), 5);
        assert_eq!(found[0].id.as_deref(), Some("twin-5"));
        assert!(found.iter().all(|comp| comp.id.as_deref() != Some("different")));
        assert!(found
            .windows(2)
            .all(|pair| pair[0].distance <= pair[1].distance));
    }

    #[test]
    fn discovery_requires_subject_coordinates() {
        let subject = PropertyAttributes::default();
        let pool = vec![located("near", 30.0, -97.0, Some(250_000.0))];
        assert!(find_similar_properties(
            &subject,
            &pool,
            &ComparableSearch::default(),
            &RentModel::default()
        )
        .is_empty());
    }
}
