use std::sync::Arc;

use actix_web::{test, App};
use api_models::{
    consents::Consent,
    enums::{ConsentStatus, SubmissionStatus},
    payments::{
        AccountIdentification, InstructedAmount, PaymentData, PaymentInitiation,
        PaymentsSubmissionRequest, PaymentsSubmissionResponse,
    },
};
use masking::Secret;
use resource_server::{
    configs::settings::Settings,
    core::payments::{self, flows::DomesticPayments, PaymentsSubmitPayload},
    db::{payment_submission::PaymentSubmissionInterface, MockDb},
    routes,
    services::{
        api::ApplicationResponse,
        authentication::AuthenticationData,
        consents::{ConsentStoreInterface, MockConsentStore},
    },
    types::storage::PaymentSubmissionNew,
};
use time::macros::datetime;

const CLIENT_A: &str = "tpp-client-a";
const CLIENT_B: &str = "tpp-client-b";

fn initiation(amount: &str) -> PaymentInitiation {
    PaymentInitiation {
        instruction_identification: "instr-001".to_string(),
        end_to_end_identification: "e2e-001".to_string(),
        instructed_amount: InstructedAmount {
            amount: amount.to_string(),
            currency: "GBP".to_string(),
        },
        requested_execution_date_time: None,
        debtor_account: None,
        creditor_account: AccountIdentification {
            scheme_name: "UK.OBIE.SortCodeAccountNumber".to_string(),
            identification: Secret::new("08080021325698".to_string()),
            name: Some(Secret::new("ACME Inc".to_string())),
            secondary_identification: None,
        },
        remittance_information: None,
    }
}

fn consent(consent_id: &str, api_client_id: &str, status: ConsentStatus, amount: &str) -> Consent {
    Consent {
        consent_id: consent_id.to_string(),
        api_client_id: api_client_id.to_string(),
        status,
        request: PaymentData {
            initiation: initiation(amount),
            supplementary_data: None,
        },
        charges: Vec::new(),
        creation_date_time: datetime!(2024-08-01 09:00:00),
        status_update_date_time: datetime!(2024-08-01 09:05:00),
    }
}

fn submission_request(consent_id: &str, amount: &str) -> PaymentsSubmissionRequest {
    PaymentsSubmissionRequest {
        consent_id: consent_id.to_string(),
        initiation: initiation(amount),
        supplementary_data: None,
    }
}

struct TestContext {
    state: routes::AppState,
    db: MockDb,
    consent_store: MockConsentStore,
}

fn test_context() -> TestContext {
    let db = MockDb::new();
    let consent_store = MockConsentStore::new();
    let state = routes::AppState::with_stores(
        Settings::default(),
        Box::new(db.clone()),
        Arc::new(consent_store.clone()),
    );
    TestContext {
        state,
        db,
        consent_store,
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .service(routes::app::Payments::server($state.clone()))
                .service(routes::app::Health::server($state.clone())),
        )
        .await
    };
}

#[actix_web::test]
async fn health_is_good() {
    let ctx = test_context();
    let app = test_app!(ctx.state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn submission_creates_once_and_replays_identically() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdc_scenario1", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;
    let app = test_app!(ctx.state);

    let req = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdc_scenario1", "100.00"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let first_body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(first_body["payment_id"], "pdc_scenario1");
    assert_eq!(first_body["status"], "InitiationPending");

    // The consent is consumed exactly once.
    assert_eq!(ctx.consent_store.consume_call_count(), 1);
    assert_eq!(
        ctx.consent_store.get_consent_status("pdc_scenario1").await,
        Some(ConsentStatus::Consumed)
    );

    // An identical retry is answered with the original response, including
    // the original creation timestamp, without a second consumption.
    let retry = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdc_scenario1", "100.00"))
        .to_request();
    let resp = test::call_service(&app, retry).await;
    assert_eq!(resp.status(), 201);
    let second_body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(first_body, second_body);

    assert_eq!(ctx.consent_store.consume_call_count(), 1);
    assert_eq!(ctx.db.payment_submissions.lock().await.len(), 1);

    let stored = ctx
        .db
        .find_payment_submission_by_consent_id_api_client_id("pdc_scenario1", CLIENT_A)
        .await
        .expect("submission lookup failed");
    assert_eq!(stored.idempotency_key, "key-1");
}

#[actix_web::test]
async fn conflicting_payload_with_same_key_is_rejected() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdc_conflict", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;
    let app = test_app!(ctx.state);

    let req = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdc_conflict", "100.00"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    // Same consent and idempotency key, different amount.
    let conflicting = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdc_conflict", "999.99"))
        .to_request();
    let resp = test::call_service(&app, conflicting).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["error_code"], "RS_4");

    assert_eq!(ctx.db.payment_submissions.lock().await.len(), 1);
    assert_eq!(ctx.consent_store.consume_call_count(), 1);
}

#[actix_web::test]
async fn submission_against_unauthorised_consent_is_gated() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent(
            "pdc_waiting",
            CLIENT_A,
            ConsentStatus::AwaitingAuthorisation,
            "100.00",
        ))
        .await;
    ctx.consent_store
        .insert_consent(consent("pdc_used", CLIENT_A, ConsentStatus::Consumed, "100.00"))
        .await;
    let app = test_app!(ctx.state);

    for consent_id in ["pdc_waiting", "pdc_used"] {
        let req = test::TestRequest::post()
            .uri("/open-banking/v3.1/pisp/domestic-payments")
            .insert_header(("x-api-client-id", CLIENT_A))
            .insert_header(("x-idempotency-key", "key-1"))
            .set_json(submission_request(consent_id, "100.00"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["error_code"], "RS_3");
    }

    // No submission record may be created by a gated request.
    assert!(ctx.db.payment_submissions.lock().await.is_empty());
    assert_eq!(ctx.consent_store.consume_call_count(), 0);
}

#[actix_web::test]
async fn validation_mismatch_is_distinct_from_idempotency_conflict() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdc_validate", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;
    let app = test_app!(ctx.state);

    // First submission already diverges from the consented amount: a client
    // bug, not a duplicate-request race.
    let req = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdc_validate", "999.99"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["error_code"], "RS_5");
    assert_eq!(
        body["error"]["mismatched_fields"],
        serde_json::json!(["instructed_amount.amount"])
    );

    assert!(ctx.db.payment_submissions.lock().await.is_empty());
}

#[actix_web::test]
async fn cross_client_access_is_forbidden() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdc_isolated", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;
    let app = test_app!(ctx.state);

    let req = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdc_isolated", "100.00"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    // Another provider must not observe the consent or the submission.
    let foreign_get = test::TestRequest::get()
        .uri("/open-banking/v3.1/pisp/domestic-payments/pdc_isolated")
        .insert_header(("x-api-client-id", CLIENT_B))
        .to_request();
    assert_eq!(test::call_service(&app, foreign_get).await.status(), 403);

    let foreign_replay = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_B))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdc_isolated", "100.00"))
        .to_request();
    assert_eq!(test::call_service(&app, foreign_replay).await.status(), 403);
}

#[actix_web::test]
async fn resource_version_visibility_is_monotonic() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdc_versioned", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;
    let app = test_app!(ctx.state);

    let req = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdc_versioned", "100.00"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    for version in ["v3.1", "v4.0"] {
        let get = test::TestRequest::get()
            .uri(&format!(
                "/open-banking/{version}/pisp/domestic-payments/pdc_versioned"
            ))
            .insert_header(("x-api-client-id", CLIENT_A))
            .to_request();
        assert_eq!(test::call_service(&app, get).await.status(), 200);
    }

    // Reading from an older version is a conflict, not a not-found, and
    // carries both versions.
    let get_old = test::TestRequest::get()
        .uri("/open-banking/v3.0/pisp/domestic-payments/pdc_versioned")
        .insert_header(("x-api-client-id", CLIENT_A))
        .to_request();
    let resp = test::call_service(&app, get_old).await;
    assert_eq!(resp.status(), 409);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["error_code"], "RS_8");
    assert_eq!(body["error"]["resource_version"], "v3.1");
    assert_eq!(body["error"]["requested_version"], "v3.0");
}

#[actix_web::test]
async fn missing_idempotency_key_is_rejected() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdc_nokey", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;
    let app = test_app!(ctx.state);

    let req = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .set_json(submission_request("pdc_nokey", "100.00"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(ctx.db.payment_submissions.lock().await.is_empty());
}

#[actix_web::test]
async fn wrong_consent_type_for_the_route_is_not_found() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdsc_sched", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;
    let app = test_app!(ctx.state);

    // A scheduled-payment consent submitted on the immediate-payment route.
    let req = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdsc_sched", "100.00"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn scheduled_payments_submit_through_their_own_route() {
    let ctx = test_context();
    let mut scheduled = consent("pdsc_future", CLIENT_A, ConsentStatus::Authorised, "250.00");
    scheduled.request.initiation.requested_execution_date_time =
        Some(datetime!(2024-09-01 08:00:00));
    ctx.consent_store.insert_consent(scheduled).await;
    let app = test_app!(ctx.state);

    let mut request = submission_request("pdsc_future", "250.00");
    request.initiation.requested_execution_date_time = Some(datetime!(2024-09-01 08:00:00));

    let req = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-scheduled-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(request.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    // Submitting for a different execution date than consented fails
    // validation on that field.
    let ctx2 = test_context();
    let mut scheduled = consent("pdsc_other", CLIENT_A, ConsentStatus::Authorised, "250.00");
    scheduled.request.initiation.requested_execution_date_time =
        Some(datetime!(2024-09-01 08:00:00));
    ctx2.consent_store.insert_consent(scheduled).await;
    let app2 = test_app!(ctx2.state);

    let mut request = submission_request("pdsc_other", "250.00");
    request.initiation.requested_execution_date_time = Some(datetime!(2024-09-02 08:00:00));
    let req = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-scheduled-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(request)
        .to_request();
    let resp = test::call_service(&app2, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"]["mismatched_fields"],
        serde_json::json!(["requested_execution_date_time"])
    );
}

#[actix_web::test]
async fn funds_confirmation_is_gated_on_consent_status() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdc_funds", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;
    let app = test_app!(ctx.state);

    let req = test::TestRequest::get()
        .uri("/open-banking/v3.1/pisp/domestic-payment-consents/pdc_funds/funds-confirmation")
        .insert_header(("x-api-client-id", CLIENT_A))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["funds_available"], true);

    // Submit the payment; the consent transitions to Consumed and the gate
    // closes.
    let submit = test::TestRequest::post()
        .uri("/open-banking/v3.1/pisp/domestic-payments")
        .insert_header(("x-api-client-id", CLIENT_A))
        .insert_header(("x-idempotency-key", "key-1"))
        .set_json(submission_request("pdc_funds", "100.00"))
        .to_request();
    assert_eq!(test::call_service(&app, submit).await.status(), 201);

    let req = test::TestRequest::get()
        .uri("/open-banking/v3.1/pisp/domestic-payment-consents/pdc_funds/funds-confirmation")
        .insert_header(("x-api-client-id", CLIENT_A))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["error_code"], "RS_3");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_submissions_create_exactly_one_payment() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdc_race", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = ctx.state.clone();
        handles.push(tokio::spawn(async move {
            payments::payments_submit_core::<DomesticPayments>(
                state,
                AuthenticationData {
                    api_client_id: CLIENT_A.to_string(),
                },
                PaymentsSubmitPayload {
                    version: "v3.1".to_string(),
                    idempotency_key: Some("key-1".to_string()),
                    request: submission_request("pdc_race", "100.00"),
                },
            )
            .await
        }));
    }

    let mut responses: Vec<PaymentsSubmissionResponse> = Vec::new();
    for handle in handles {
        let result = handle.await.expect("task panicked").expect("request failed");
        match result {
            ApplicationResponse::JsonCreated(response) => responses.push(response),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    // Exactly one submission was persisted and one consumption performed;
    // every caller saw the same response.
    assert_eq!(ctx.db.payment_submissions.lock().await.len(), 1);
    assert_eq!(ctx.consent_store.consume_call_count(), 1);
    let first = responses.first().expect("no responses collected");
    assert!(responses.iter().all(|response| response == first));
    assert_eq!(first.status, SubmissionStatus::InitiationPending);
}

#[tokio::test]
async fn retry_after_crash_between_insert_and_consume_replays_cleanly() {
    let ctx = test_context();
    ctx.consent_store
        .insert_consent(consent("pdc_crash", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;

    // Simulate a crash strictly between submission persistence and consent
    // consumption: the record exists, the consent was never consumed.
    ctx.db
        .insert_payment_submission(PaymentSubmissionNew {
            id: "pdc_crash".to_string(),
            consent_id: "pdc_crash".to_string(),
            api_client_id: CLIENT_A.to_string(),
            idempotency_key: "key-1".to_string(),
            payment: PaymentData {
                initiation: initiation("100.00"),
                supplementary_data: None,
            },
            status: SubmissionStatus::default(),
            ob_version: api_models::enums::ApiVersion::V3_1,
        })
        .await
        .expect("failed to seed the crashed submission");
    assert_eq!(ctx.consent_store.consume_call_count(), 0);

    // The client retry re-enters the orchestration and short-circuits as a
    // replay before the consumption step.
    let result = payments::payments_submit_core::<DomesticPayments>(
        ctx.state.clone(),
        AuthenticationData {
            api_client_id: CLIENT_A.to_string(),
        },
        PaymentsSubmitPayload {
            version: "v3.1".to_string(),
            idempotency_key: Some("key-1".to_string()),
            request: submission_request("pdc_crash", "100.00"),
        },
    )
    .await
    .expect("retry failed");

    match result {
        ApplicationResponse::JsonCreated(response) => {
            assert_eq!(response.payment_id, "pdc_crash");
        }
        other => panic!("unexpected response: {other:?}"),
    }
    assert_eq!(ctx.db.payment_submissions.lock().await.len(), 1);
    assert_eq!(ctx.consent_store.consume_call_count(), 0);
}

#[tokio::test]
async fn consuming_an_already_consumed_consent_is_a_no_op_success() {
    let consent_store = MockConsentStore::new();
    consent_store
        .insert_consent(consent("pdc_twice", CLIENT_A, ConsentStatus::Authorised, "100.00"))
        .await;

    consent_store
        .consume_consent("pdc_twice", CLIENT_A)
        .await
        .expect("first consumption failed");
    consent_store
        .consume_consent("pdc_twice", CLIENT_A)
        .await
        .expect("repeat consumption must be a no-op success");

    assert_eq!(
        consent_store.get_consent_status("pdc_twice").await,
        Some(ConsentStatus::Consumed)
    );
}
