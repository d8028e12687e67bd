//! End-to-end checks of the analysis service through its HTTP router.

mod common {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rental_eval::analysis::PropertyAttributes;
    use rental_eval::comparables::NoComparables;
    use rental_eval::enrichment::DisabledEnricher;
    use rental_eval::properties::{
        address_matches, load_from_reader, PropertyRepository, RepositoryError,
    };
    use rental_eval::service::AnalysisService;
    use rental_eval::AnalysisSettings;

    pub(super) const RECORDS: &str = r#"[
        {
            "id": "prop-100",
            "formattedAddress": "100 Main St, Springfield, IL 62701",
            "propertyType": "Single Family",
            "bedrooms": 3,
            "bathrooms": 2,
            "squareFootage": 1500,
            "yearBuilt": 2010,
            "lastSalePrice": 300000,
            "lastSaleDate": "2023-06-01"
        },
        {
            "id": "prop-200",
            "formattedAddress": "200 Oak Ave, Springfield, IL 62702",
            "propertyType": "Condo",
            "bedrooms": 2,
            "bathrooms": 1
        }
    ]"#;

    pub(super) struct FixtureRepository(Vec<PropertyAttributes>);

    impl PropertyRepository for FixtureRepository {
        fn fetch(&self, id: &str) -> Result<Option<PropertyAttributes>, RepositoryError> {
            Ok(self
                .0
                .iter()
                .find(|property| property.id.as_deref() == Some(id))
                .cloned())
        }

        fn find_by_address(
            &self,
            fragment: &str,
        ) -> Result<Vec<PropertyAttributes>, RepositoryError> {
            Ok(self
                .0
                .iter()
                .filter(|property| address_matches(property, fragment))
                .cloned()
                .collect())
        }

        fn all(&self) -> Result<Vec<PropertyAttributes>, RepositoryError> {
            Ok(self.0.clone())
        }
    }

    pub(super) type Service = AnalysisService<FixtureRepository, NoComparables, DisabledEnricher>;

    pub(super) fn service() -> Arc<Service> {
        let properties = load_from_reader(RECORDS.as_bytes()).expect("fixture records parse");
        Arc::new(AnalysisService::new(
            Arc::new(FixtureRepository(properties)),
            Arc::new(NoComparables),
            Arc::new(DisabledEnricher),
            AnalysisSettings::default(),
        ))
    }

    pub(super) fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
    }
}

mod routes {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use rental_eval::service::analysis_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = analysis_router(service())
            .oneshot(request)
            .await
            .expect("route executes");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let payload = serde_json::from_slice(&body).expect("json body");
        (status, payload)
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn inline_property_analysis_returns_report() {
        let (status, payload) = send(post_json(
            "/api/v1/analysis",
            json!({
                "property": {
                    "formattedAddress": "12 Birch Rd, Urbana, IL 61801",
                    "squareFootage": 1500,
                    "bedrooms": 3,
                    "bathrooms": 2,
                    "lastSalePrice": 300000,
                    "lastSaleDate": "2023-06-01"
                },
                "monthly_rent": 3000,
                "as_of": as_of()
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["result"]["cap_rate_percent"], json!(7.12));
        assert_eq!(payload["result"]["recommendation"], json!("maybe"));
        let report = payload["report"].as_str().expect("report text");
        assert!(report.contains("Net Operating Income (NOI): $21,360"));
    }

    #[tokio::test]
    async fn posted_comparables_with_bad_correlations_stay_in_price_range() {
        let (status, payload) = send(post_json(
            "/api/v1/analysis",
            json!({
                "property": {
                    "squareFootage": 1500,
                    "bedrooms": 3,
                    "bathrooms": 2,
                    "lastSalePrice": 300000,
                    "lastSaleDate": "2023-06-01"
                },
                "comparables": [
                    { "price": 3000, "correlation": 1.0, "distance": 1.0 },
                    { "price": 1000, "correlation": -0.99, "distance": 1.0 }
                ],
                "as_of": as_of()
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        let rent = payload["result"]["monthly_rent"]
            .as_f64()
            .expect("monthly rent");
        assert!((1000.0..=3000.0).contains(&rent), "rent {rent} escaped the comparable range");
        assert_ne!(payload["result"]["recommendation"], json!("worth_investing"));
    }

    #[tokio::test]
    async fn address_lookup_analyzes_recorded_property() {
        let (status, payload) = send(post_json(
            "/api/v1/properties/analyze",
            json!({
                "address": "main st",
                "monthly_rent": 2000,
                "calculation_mode": "gross",
                "as_of": as_of()
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["property"]["id"], json!("prop-100"));
        assert_eq!(payload["result"]["noi"], json!(24000.0));
        assert_eq!(payload["result"]["details"]["calculation_mode"], json!("gross"));
    }

    #[tokio::test]
    async fn unknown_address_is_not_found() {
        let (status, payload) = send(post_json(
            "/api/v1/properties/analyze",
            json!({ "address": "999 Nowhere" }),
        ))
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(payload["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn property_lookup_by_id() {
        let request = Request::get("/api/v1/properties/prop-200")
            .body(Body::empty())
            .expect("request builds");
        let (status, payload) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["propertyType"], json!("Condo"));
    }

    #[tokio::test]
    async fn property_analysis_honours_query_options() {
        let request = Request::get(
            "/api/v1/properties/prop-100/analysis?monthly_rent=2000&cap_rate_threshold=4",
        )
        .body(Body::empty())
        .expect("request builds");
        let (status, payload) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["result"]["recommendation"], json!("worth_investing"));
        assert_eq!(
            payload["result"]["details"]["cap_rate_threshold"],
            json!(4.0)
        );
    }

    #[tokio::test]
    async fn invalid_query_mode_is_bad_request() {
        let request = Request::get("/api/v1/properties/prop-100/analysis?calculation_mode=levered")
            .body(Body::empty())
            .expect("request builds");
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_positive_threshold_is_bad_request() {
        let (status, payload) = send(post_json(
            "/api/v1/analysis",
            json!({ "property": {}, "cap_rate_threshold": -1 }),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"]
            .as_str()
            .is_some_and(|message| message.contains("cap_rate_threshold")));
    }

    #[tokio::test]
    async fn unassessable_property_still_returns_result() {
        let request = Request::get("/api/v1/properties/prop-200/analysis")
            .body(Body::empty())
            .expect("request builds");
        let (status, payload) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["result"]["recommendation"], json!("not_worth_it"));
        assert_eq!(payload["result"]["cap_rate_percent"], json!(0.0));
    }
}
