use super::*;
use crate::config::AppConfig;
use crate::cookies::MemoryCookies;
use crate::notify::RecordingNotifier;
use crate::request::{MockHttpClient, TransportError};
use crate::test_support::{GRAPHQL_URL, UPLOAD_URL, client, data, validation_errors};
use crate::upload::PendingFile;
use serde_json::json;
use zatca_shared::{EntityKind, PromotionInput};

fn language_form(name: &str, code: &str) -> FormState {
    let mut form = FormState::new();
    form.set_value("name", name);
    form.set_value("code", code);
    form
}

fn picture() -> Attachment {
    Attachment::Pending(PendingFile {
        name: "rack.jpg".into(),
        content_type: "image/jpeg".into(),
        bytes: vec![9; 4],
    })
}

#[test]
fn test_required_fields() {
    let schema = schema_for(EntityKind::Language);
    let errors = FormState::new().validate(schema).unwrap_err();
    assert_eq!(errors["name"], "Name is required");
    assert_eq!(errors["code"], "Code is required");

    let values = language_form(" Arabic ", "ar").validate(schema).unwrap();
    assert_eq!(values["name"], "Arabic");
}

#[test]
fn test_type_coercion() {
    let schema = schema_for(EntityKind::Promotion);
    let mut form = FormState::new();
    form.set_value("code", "RAMADAN");
    form.set_value("discountPercent", "12.5");
    form.set_value("startsOn", "2026-03-01");
    form.set_value("endsOn", "2026-03-30");
    form.set_value("active", "on");

    let values = form.validate(schema).unwrap();
    let input: PromotionInput = serde_json::from_value(Value::Object(values)).unwrap();
    assert_eq!(input.discount_percent, 12.5);
    assert!(input.active);
    assert_eq!(input.ends_on.to_string(), "2026-03-30");

    form.set_value("discountPercent", "a lot");
    form.set_value("startsOn", "01/03/2026");
    let errors = form.validate(schema).unwrap_err();
    assert_eq!(errors["discountPercent"], "Discount (%) must be a number");
    assert_eq!(errors["startsOn"], "Starts on must be a date (YYYY-MM-DD)");
}

#[test]
fn test_email_and_integer_fields() {
    let mut form = FormState::new();
    form.set_value("email", "not-an-email");
    let errors = form.validate(schema_for(EntityKind::User)).unwrap_err();
    assert_eq!(errors["email"], "Invalid e-mail address");

    form.set_value("dayNumber", "-1");
    let errors = form.validate(schema_for(EntityKind::ProgramDay)).unwrap_err();
    assert_eq!(errors["dayNumber"], "Day must be a whole number");
}

#[test]
fn test_editing_a_field_clears_its_error() {
    let schema = schema_for(EntityKind::Language);
    let mut form = FormState::new();
    form.apply_error(
        schema,
        &ApiError::Validation(FieldErrors::from([("name".into(), "Taken".into())])),
    );
    assert_eq!(form.error("name"), Some("Taken"));
    form.set_value("name", "Other");
    assert_eq!(form.error("name"), None);
}

#[test]
fn test_unknown_server_fields_become_a_toast() {
    let schema = schema_for(EntityKind::Language);
    let mut form = FormState::new();
    let toast = form.apply_error(
        schema,
        &ApiError::Validation(FieldErrors::from([("slug".into(), "Slug clash".into())])),
    );
    assert_eq!(toast.as_deref(), Some("Slug clash"));
    assert!(form.errors().is_empty());

    assert_eq!(form.apply_error(schema, &ApiError::Unauthorized), None);
    assert_eq!(
        form.apply_error(schema, &ApiError::Network("boom".into())).as_deref(),
        Some("boom")
    );
}

#[test]
fn test_load_record_prefills_values_and_attachments() {
    let mut form = FormState::new();
    form.load_record(
        schema_for(EntityKind::Questionnaire),
        &Questionnaire {
            id: "q1".into(),
            question: "Goal?".into(),
            answers: vec!["Lose weight".into(), "Build muscle".into()],
        },
    );
    assert_eq!(form.value("answers"), "Lose weight\nBuild muscle");

    let mut form = FormState::new();
    form.load_record(
        schema_for(EntityKind::Equipment),
        &Equipment {
            id: "e1".into(),
            name: "Rack".into(),
            image: Some("/uploads/rack.jpg".into()),
        },
    );
    assert_eq!(form.value("name"), "Rack");
    assert_eq!(
        form.attachment("image"),
        Some(&Attachment::uploaded("/uploads/rack.jpg"))
    );
}

#[test]
fn test_redirect_targets() {
    assert_eq!(schema_for(EntityKind::City).redirect(), "/city");
    assert_eq!(schema_for(EntityKind::Invoice).redirect(), "/");
}

#[test]
fn test_schema_field_names_are_unique() {
    for kind in EntityKind::ALL {
        let schema = schema_for(kind);
        assert_eq!(schema.kind, kind);
        let mut names: Vec<_> = schema.fields.iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), schema.fields.len(), "{kind:?}");
    }
}

#[tokio::test]
async fn test_add_language_server_name_error() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let toasts = RecordingNotifier::new();
    mock.mock_response(
        GRAPHQL_URL,
        200,
        validation_errors(json!({ "name": "Name already exists" })),
    );

    let api = client(&mock, &jar);
    let uploader = Uploader::new(&mock, &toasts, &AppConfig::default());
    let schema = schema_for(EntityKind::Language);
    let mut form = language_form("Arabic", "ar");

    let outcome =
        submit::<Language, _, _, _, _>(&mut form, schema, &FormMode::Create, &api, &uploader).await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.error("name"), Some("Name already exists"));
    assert_eq!(form.error("code"), None);
    assert!(!form.submitting);
}

#[tokio::test]
async fn test_typing_during_submit_is_kept() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let toasts = RecordingNotifier::new();
    mock.mock_response(
        GRAPHQL_URL,
        200,
        validation_errors(json!({ "name": "Name already exists", "code": "Code already exists" })),
    );

    let api = client(&mock, &jar);
    let uploader = Uploader::new(&mock, &toasts, &AppConfig::default());
    let mut form = language_form("Arabic", "ar");
    form.submitting = true;
    let started = form.clone();
    let mut running = started.clone();

    let outcome = submit::<Language, _, _, _, _>(
        &mut running,
        schema_for(EntityKind::Language),
        &FormMode::Create,
        &api,
        &uploader,
    )
    .await;
    form.set_value("code", "ara");
    form.finish_submit(&started, running);

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.value("code"), "ara");
    assert_eq!(form.error("code"), None);
    assert_eq!(form.error("name"), Some("Name already exists"));
    assert!(!form.submitting);
}

#[tokio::test]
async fn test_file_picked_during_submit_is_kept() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let toasts = RecordingNotifier::new();
    mock.mock_response(UPLOAD_URL, 200, json!({ "path": "/uploads/rack.jpg" }));
    mock.mock_response(
        GRAPHQL_URL,
        200,
        validation_errors(json!({ "name": "Name already exists" })),
    );

    let api = client(&mock, &jar);
    let uploader = Uploader::new(&mock, &toasts, &AppConfig::default());
    let schema = schema_for(EntityKind::Equipment);
    let mut form = FormState::new();
    form.set_value("name", "Rack");
    form.set_attachment("image", picture());

    let started = form.clone();
    let mut running = started.clone();
    submit::<Equipment, _, _, _, _>(&mut running, schema, &FormMode::Create, &api, &uploader).await;
    let repicked = Attachment::Pending(PendingFile {
        name: "bench.jpg".into(),
        content_type: "image/jpeg".into(),
        bytes: vec![9],
    });
    let mut edited = form.clone();
    edited.set_attachment("image", repicked.clone());

    form.finish_submit(&started, running.clone());
    assert_eq!(
        form.attachment("image"),
        Some(&Attachment::uploaded("/uploads/rack.jpg"))
    );

    edited.finish_submit(&started, running);
    assert_eq!(edited.attachment("image"), Some(&repicked));
    assert_eq!(edited.error("name"), Some("Name already exists"));
}

#[tokio::test]
async fn test_create_success() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let toasts = RecordingNotifier::new();
    mock.mock_response(
        GRAPHQL_URL,
        200,
        data("createLanguage", json!({ "id": "7", "name": "Arabic", "code": "ar" })),
    );

    let api = client(&mock, &jar);
    let uploader = Uploader::new(&mock, &toasts, &AppConfig::default());
    let mut form = language_form("Arabic", "ar");

    let outcome = submit::<Language, _, _, _, _>(
        &mut form,
        schema_for(EntityKind::Language),
        &FormMode::Create,
        &api,
        &uploader,
    )
    .await;

    assert_eq!(
        outcome,
        SubmitOutcome::Saved {
            message: "Language created successfully".into(),
            redirect: "/language".into(),
        }
    );
    let body = mock.json_body(0);
    assert_eq!(body["operationName"], "CreateLanguage");
    assert_eq!(body["variables"], json!({ "input": { "name": "Arabic", "code": "ar" } }));
}

#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let toasts = RecordingNotifier::new();
    let api = client(&mock, &jar);
    let uploader = Uploader::new(&mock, &toasts, &AppConfig::default());
    let mut form = language_form("", "ar");

    let outcome = submit::<Language, _, _, _, _>(
        &mut form,
        schema_for(EntityKind::Language),
        &FormMode::Create,
        &api,
        &uploader,
    )
    .await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_failed_upload_blocks_submission() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let toasts = RecordingNotifier::new();
    mock.mock_failure(UPLOAD_URL, TransportError::Network("offline".into()));

    let api = client(&mock, &jar);
    let uploader = Uploader::new(&mock, &toasts, &AppConfig::default());
    let mut form = FormState::new();
    form.set_value("name", "Rack");
    form.set_attachment("image", picture());

    let outcome = submit::<Equipment, _, _, _, _>(
        &mut form,
        schema_for(EntityKind::Equipment),
        &FormMode::Create,
        &api,
        &uploader,
    )
    .await;

    assert_eq!(outcome, SubmitOutcome::Blocked);
    assert_eq!(form.error("image"), Some("Upload failed, please try again"));
    assert_eq!(form.attachment("image"), Some(&picture()));
    // Only the upload was attempted.
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_update_uploads_then_reuses_path() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let toasts = RecordingNotifier::new();
    mock.mock_response(UPLOAD_URL, 200, json!({ "path": "/uploads/rack.jpg" }));
    let saved = json!({ "id": "e1", "name": "Rack", "image": "/uploads/rack.jpg" });
    mock.mock_response(GRAPHQL_URL, 200, data("updateEquipment", saved.clone()));
    mock.mock_response(GRAPHQL_URL, 200, data("updateEquipment", saved));

    let api = client(&mock, &jar);
    let uploader = Uploader::new(&mock, &toasts, &AppConfig::default());
    let schema = schema_for(EntityKind::Equipment);
    let mode = FormMode::Edit("e1".into());
    let mut form = FormState::new();
    form.set_value("name", "Rack");
    form.set_attachment("image", picture());

    let first = submit::<Equipment, _, _, _, _>(&mut form, schema, &mode, &api, &uploader).await;
    assert!(matches!(first, SubmitOutcome::Saved { .. }));
    assert_eq!(
        form.attachment("image"),
        Some(&Attachment::uploaded("/uploads/rack.jpg"))
    );

    let second = submit::<Equipment, _, _, _, _>(&mut form, schema, &mode, &api, &uploader).await;
    assert!(matches!(second, SubmitOutcome::Saved { .. }));

    // upload, update, update
    assert_eq!(mock.request_count(), 3);
    let body = mock.json_body(2);
    assert_eq!(body["operationName"], "UpdateEquipment");
    assert_eq!(body["variables"]["id"], "e1");
    assert_eq!(body["variables"]["input"]["image"], "/uploads/rack.jpg");
}

#[tokio::test]
async fn test_fetch_options() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(
        GRAPHQL_URL,
        200,
        data("countries", json!([{ "id": "sa", "name": "Saudi Arabia", "code": "SA" }])),
    );

    let options = fetch_options(&client(&mock, &jar), EntityKind::Country)
        .await
        .unwrap();
    assert_eq!(
        options,
        vec![EntityRef {
            id: "sa".into(),
            name: "Saudi Arabia".into()
        }]
    );
}
