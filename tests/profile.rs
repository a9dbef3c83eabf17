mod common;

use cancapp::worker::{Operation, Outcome, ProfileForm};
use common::{signed_in_store, signed_out_store, TOKEN};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn profile_operations_need_a_token() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = signed_out_store(&server);

    let err = store.dispatch(Operation::FetchUsers).await.unwrap_err();
    assert_eq!(err.message(), "Missing token");
    assert_eq!(store.snapshot().profile.status.error.as_deref(), Some("Missing token"));

    let err = store
        .dispatch(Operation::UpdateProfile(ProfileForm {
            name: "Ada".to_string(),
            address: "London".to_string(),
            image: None,
        }))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Missing token");

    let err = store.dispatch(Operation::SaveToken).await.unwrap_err();
    assert_eq!(err.message(), "Missing token or userId");
}

#[tokio::test]
async fn users_are_fetched_for_the_cached_user_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/User/GetUsers"))
        .and(query_param("userType", "Patient"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "id": 7, "fullName": "Ada", "address": "London", "userType": "Patient" },
                { "id": 8, "fullName": "Grace", "address": "NYC", "userType": "Patient" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store(&server);
    store.dispatch(Operation::FetchUsers).await.unwrap();

    let users = store.snapshot().profile.users;
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].name, "Grace");
}

#[tokio::test]
async fn save_token_and_password_change_report_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/User/save-token"))
        .and(body_partial_json(json!({ "token": TOKEN, "userId": 7 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/User/ChangePassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Password updated" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store(&server);

    store.dispatch(Operation::SaveToken).await.unwrap();
    assert_eq!(
        store.snapshot().profile.message.as_deref(),
        Some("Token saved successfully")
    );

    let outcome = store
        .dispatch(Operation::ChangePassword {
            old_password: "Old-pass1".into(),
            new_password: "New-pass1".into(),
        })
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::PasswordChanged { message: "Password updated".to_string() }
    );
    assert_eq!(store.snapshot().profile.message.as_deref(), Some("Password updated"));
}

#[tokio::test]
async fn profile_update_upserts_the_user() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/User/EditUserProfile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "id": 7, "fullName": "Ada L.", "address": "Paris", "userType": "Patient" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store(&server);
    store
        .dispatch(Operation::UpdateProfile(ProfileForm {
            name: "Ada L.".to_string(),
            address: "Paris".to_string(),
            image: None,
        }))
        .await
        .unwrap();

    let users = store.snapshot().profile.users;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].address, "Paris");
}
