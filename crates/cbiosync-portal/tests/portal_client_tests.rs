#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cbiosync_core::errors::ExErrorKind;
use cbiosync_core::source::ClinicalSource;
use cbiosync_core_types::{ApiToken, Domain};
use cbiosync_portal::PortalClient;
use common::{Reply, StubPortal};

fn client_for(stub: &StubPortal) -> PortalClient {
    PortalClient::new(
        &format!("{}/api/v2/api-docs", stub.base_url),
        ApiToken::new("tok-1"),
    )
    .unwrap()
}

#[test]
fn test_attributes_are_posted_with_study_body_and_bearer() {
    // GIVEN a portal that lists one patient attribute
    let stub = StubPortal::start(vec![Reply::ok(
        r#"[{"clinicalAttributeId":"OS_STATUS","patientAttribute":true,"studyId":"s1"}]"#,
    )]);
    let client = client_for(&stub);

    // WHEN fetching attribute metadata
    let metas = client.clinical_attributes("s1").unwrap();

    // THEN the metadata decodes and the request matches the API contract
    assert_eq!(metas.len(), 1);
    assert!(metas[0].patient_attribute);
    let requests = stub.finish();
    let request = &requests[0];
    assert!(request.starts_with("POST /api/clinical-attributes/fetch?projection=ID "));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer tok-1"));
    assert!(request.ends_with(r#"["s1"]"#));
}

#[test]
fn test_clinical_data_query_names_domain() {
    let stub = StubPortal::start(vec![Reply::ok(
        r#"[{"patientId":"P1","sampleId":"S1","clinicalAttributeId":"CANCER_TYPE","value":"Glioma"}]"#,
    )]);
    let client = client_for(&stub);

    let data = client.clinical_data("s1", Domain::Sample).unwrap();

    assert_eq!(data[0].sample_id.as_deref(), Some("S1"));
    let requests = stub.finish();
    assert!(requests[0].starts_with(
        "GET /api/studies/s1/clinical-data?studyId=s1&projection=DETAILED&clinicalDataType=SAMPLE "
    ));
}

#[test]
fn test_unauthorised_status_maps_to_unauthorised() {
    let stub = StubPortal::start(vec![Reply::status(401)]);
    let client = client_for(&stub);

    let err = client.clinical_events("s1").unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Unauthorised);
    stub.finish();
}

#[test]
fn test_server_error_maps_to_external_service() {
    let stub = StubPortal::start(vec![Reply::status(500)]);
    let client = client_for(&stub);

    let err = client.clinical_data("s1", Domain::Patient).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ExternalService);
    stub.finish();
}

#[test]
fn test_non_json_body_maps_to_serialization() {
    let stub = StubPortal::start(vec![Reply::ok("<html>maintenance</html>")]);
    let client = client_for(&stub);

    let err = client.clinical_attributes("s1").unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Serialization);
    stub.finish();
}

#[test]
fn test_study_id_cannot_change_the_request_path() {
    // GIVEN a study id with path and query delimiters in it
    let stub = StubPortal::start(vec![Reply::ok("[]")]);
    let client = client_for(&stub);

    // WHEN fetching its events
    let events = client.clinical_events("pbta/../x?y").unwrap();

    // THEN the id travels as one encoded path segment
    assert!(events.is_empty());
    let requests = stub.finish();
    assert!(requests[0]
        .starts_with("GET /api/studies/pbta%2F..%2Fx%3Fy/clinical-events?projection=DETAILED "));
}
