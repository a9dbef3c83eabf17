#![allow(dead_code)]

use cancapp::api::ApiClient;
use cancapp::domain::{Credential, UserId, UserType};
use cancapp::storage::{CredentialStore, MemoryCredentialStore};
use cancapp::worker::{Worker, WorkerSettings};
use cancapp::Store;
use wiremock::MockServer;

pub const TOKEN: &str = "tok-123";

pub fn api_base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

pub fn signed_in() -> Credential {
    Credential::new(TOKEN, UserId::new("7"), UserType::Patient)
}

pub fn store_with(server: &MockServer, settings: WorkerSettings, credentials: Box<dyn CredentialStore>) -> Store {
    let client = ApiClient::new(&api_base(server), None).unwrap();
    Store::new(Worker::new(client, settings), credentials)
}

/// Store with an empty in-memory session.
pub fn signed_out_store(server: &MockServer) -> Store {
    store_with(server, WorkerSettings::default(), Box::new(MemoryCredentialStore::new()))
}

/// Store whose session cache already holds [`signed_in`].
pub fn signed_in_store(server: &MockServer) -> Store {
    store_with(
        server,
        WorkerSettings::default(),
        Box::new(MemoryCredentialStore::with_credential(signed_in())),
    )
}
