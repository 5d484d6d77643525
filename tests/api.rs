use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use brutto_netto::api::build_router;
use brutto_netto::error::CalculationError;
use brutto_netto::models::{BatchResponse, CalculationResult, GrossToNetInput, HealthResponse};
use brutto_netto::tax::{GrossToNet, StandardCalculator};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tower::ServiceExt;

/// Records every input it sees and fails on a chosen gross wage.
#[derive(Default)]
struct Recorder {
    calls: AtomicUsize,
    inputs: Mutex<Vec<GrossToNetInput>>,
    fail_on: Option<f64>,
}

impl GrossToNet for Recorder {
    fn validate_and_calculate(
        &self,
        input: &GrossToNetInput,
    ) -> Result<CalculationResult, CalculationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.clone());
        if self.fail_on == Some(input.gross_wage) {
            return Err(CalculationError::Failed(format!(
                "cannot handle {}",
                input.gross_wage
            )));
        }
        Ok(CalculationResult {
            net_wage_month: input.gross_wage * 0.6,
            net_wage_year: input.gross_wage * 7.2,
            ..Default::default()
        })
    }
}

fn app_with(recorder: Arc<Recorder>) -> Router {
    build_router(recorder)
}

async fn post_json(app: Router, body: &str) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/brutto-netto")
                .method(Method::POST)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn test_results_match_input_order() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = Arc::new(Recorder::default());
    let (status, body) = post_json(
        app_with(recorder.clone()),
        r#"{"bruttoListe": [3000, 1500.5, 4200, 2000]}"#,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let response: BatchResponse = serde_json::from_value(body)?;
    let bruttos: Vec<Value> = response.results.iter().map(|r| r.brutto.clone()).collect();
    assert_eq!(bruttos, vec![json!(3000), json!(1500.5), json!(4200), json!(2000)]);
    assert_eq!(response.results[1].netto_monat, 1500.5 * 0.6);
    assert_eq!(recorder.calls.load(Ordering::SeqCst), 4);
    Ok(())
}

#[tokio::test]
async fn test_missing_or_empty_list_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    for body in [
        r#"{}"#,
        r#"{"bruttoListe": []}"#,
        r#"{"bruttoListe": 3000}"#,
        r#"{"bruttoListe": {"a": 1}}"#,
        r#"{"steuerklasse": 3}"#,
    ] {
        let recorder = Arc::new(Recorder::default());
        let (status, response) = post_json(app_with(recorder.clone()), body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(
            response,
            json!({ "error": "bruttoListe (Array) fehlt oder ist leer." })
        );
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }
    Ok(())
}

#[tokio::test]
async fn test_body_without_json_content_type_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = Arc::new(Recorder::default());
    let response = app_with(recorder.clone())
        .oneshot(
            Request::builder()
                .uri("/brutto-netto")
                .method(Method::POST)
                .header("content-type", "text/plain")
                .body(Body::from(r#"{"bruttoListe": [3000]}"#))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_localized_names_and_defaults_reach_calculator() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = Arc::new(Recorder::default());
    let (status, _) = post_json(
        app_with(recorder.clone()),
        r#"{
            "bruttoListe": [3000],
            "steuerklasse": 3,
            "inputTaxClass": 5,
            "inputChildren": 2,
            "kirchensteuer": 0,
            "inputChurchTax": 1
        }"#,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let inputs = recorder.inputs.lock().unwrap();
    let input = &inputs[0].template;
    assert_eq!(input.tax_class, 3);
    assert_eq!(input.children, 2);
    assert_eq!(input.church_tax, 0);
    assert_eq!(input.state, "Hamburg");
    assert_eq!(input.year_of_birth, 1990);
    assert_eq!(input.additional_contribution, 1.7);
    assert_eq!(input.period, 2);
    assert_eq!(inputs[0].gross_wage, 3000.0);
    Ok(())
}

#[tokio::test]
async fn test_calculator_failure_fails_whole_batch() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = Arc::new(Recorder {
        fail_on: Some(2000.0),
        ..Default::default()
    });
    let (status, body) = post_json(
        app_with(recorder),
        r#"{"bruttoListe": [1000, 2000, 3000]}"#,
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": "Interner Fehler",
            "details": "calculation failed: cannot handle 2000",
        })
    );
    assert!(body.get("results").is_none());
    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_internal_error() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = Arc::new(Recorder::default());
    let (status, body) = post_json(app_with(recorder), r#"{"bruttoListe": [3000"#).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Interner Fehler");
    assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
    Ok(())
}

#[tokio::test]
async fn test_standard_calculator_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(Arc::new(StandardCalculator));
    let (status, body) = post_json(
        app,
        r#"{"bruttoListe": [2500, 5000], "year": "2025", "bundesland": "Bayern", "kirchensteuer": 1}"#,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let response: BatchResponse = serde_json::from_value(body)?;
    assert_eq!(response.results.len(), 2);
    for entry in &response.results {
        let gross = entry.brutto.as_f64().unwrap();
        let deductions = entry.steuern_gesamt + entry.sozialabgaben_gesamt;
        assert!((entry.netto_monat + deductions - gross).abs() < 0.011);
        assert!(entry.kirchensteuer_monat > 0.0);
    }
    Ok(())
}

#[tokio::test]
async fn test_invalid_tax_class_is_internal_error() -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(Arc::new(StandardCalculator));
    let (status, body) = post_json(
        app,
        r#"{"bruttoListe": [3000], "year": "2025", "steuerklasse": 0, "inputTaxClass": 1}"#,
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["details"],
        "invalid inputTaxClass: must be between 1 and 6, got 0"
    );
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(Arc::new(Recorder::default()));
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .method(Method::GET)
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let health: HealthResponse = serde_json::from_slice(&body)?;
        assert_eq!(health.status, "ok");
        assert!(chrono::DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
    }
    Ok(())
}

#[tokio::test]
async fn test_overflowing_gross_wage_is_internal_error() -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(Arc::new(StandardCalculator));
    let (status, body) = post_json(app, r#"{"bruttoListe": [3000, 1e308], "year": "2025"}"#).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Interner Fehler");
    assert!(body["details"]
        .as_str()
        .is_some_and(|d| d.starts_with("invalid inputGrossWage")));
    assert!(body.get("results").is_none());
    Ok(())
}

#[tokio::test]
async fn test_cors_preflight_and_simple_request() -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(Arc::new(Recorder::default()));

    let preflight = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/brutto-netto")
                .method(Method::OPTIONS)
                .header("origin", "https://lohnrechner.example")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(preflight.status(), StatusCode::OK);
    assert_eq!(preflight.headers()["access-control-allow-origin"], "*");
    assert!(preflight.headers().contains_key("access-control-allow-methods"));

    let health = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .method(Method::GET)
                .header("origin", "https://lohnrechner.example")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.headers()["access-control-allow-origin"], "*");
    Ok(())
}

/// Holds its calculation until the test releases it from async code.
struct Gate {
    started: Mutex<Option<oneshot::Sender<()>>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl GrossToNet for Gate {
    fn validate_and_calculate(
        &self,
        _input: &GrossToNetInput,
    ) -> Result<CalculationResult, CalculationError> {
        if let Some(started) = self.started.lock().unwrap().take() {
            let _ = started.send(());
        }
        self.release
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| CalculationError::Failed("never released".into()))?;
        Ok(CalculationResult::default())
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_batch_does_not_block_runtime() -> Result<(), Box<dyn std::error::Error>> {
    let (started_tx, started_rx) = oneshot::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let app = build_router(Arc::new(Gate {
        started: Mutex::new(Some(started_tx)),
        release: Mutex::new(release_rx),
    }));

    // the single runtime thread must stay free to release the calculation
    let (response, _) = tokio::join!(
        post_json(app, r#"{"bruttoListe": [3000]}"#),
        async move {
            let _ = started_rx.await;
            let _ = release_tx.send(());
        }
    );
    let (status, body) = response?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["results"].as_array().map(Vec::len), Some(1));
    Ok(())
}
