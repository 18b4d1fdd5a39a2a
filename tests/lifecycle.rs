//! End-to-end lifecycle tests for the backend: configure, upgrade to a
//! service account, rotate its secret, and the failure paths in between.
//!
//! The admin API is mocked at the trait boundary; storage is the in-memory
//! backend.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mockall::mock;
use pretty_assertions::assert_eq;

use minio_secrets_engine::admin::{
    AddServiceAccountReq, AdminApi, AdminError, ServiceAccountCredential, UpdateServiceAccountReq,
};
use minio_secrets_engine::client::AdminClientFactory;
use minio_secrets_engine::config::{ConfigUpdate, EngineConfig};
use minio_secrets_engine::controller::SERVICE_ACCOUNT_NAME;
use minio_secrets_engine::core::{
    ConfigurationError, Error, SecretValue, StateError, UpstreamError,
};
use minio_secrets_engine::storage::MemoryBackend;
use minio_secrets_engine::MinioBackend;

mock! {
    Admin {}

    #[async_trait]
    impl AdminApi for Admin {
        async fn create_service_account(
            &self,
            req: AddServiceAccountReq,
        ) -> Result<ServiceAccountCredential, AdminError>;

        async fn update_service_account(
            &self,
            name: &str,
            req: UpdateServiceAccountReq,
        ) -> Result<(), AdminError>;
    }
}

/// Factory handing out one shared mock client, counting constructions
struct CountingFactory {
    admin: Arc<dyn AdminApi>,
    builds: AtomicUsize,
}

impl CountingFactory {
    fn new(admin: MockAdmin) -> Arc<Self> {
        Arc::new(Self {
            admin: Arc::new(admin),
            builds: AtomicUsize::new(0),
        })
    }

    fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl AdminClientFactory for CountingFactory {
    fn build(&self, _config: &EngineConfig) -> Result<Arc<dyn AdminApi>, ConfigurationError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.admin))
    }
}

fn backend_with(admin: MockAdmin) -> (MinioBackend, Arc<CountingFactory>) {
    let factory = CountingFactory::new(admin);
    (
        MinioBackend::new(MemoryBackend::new(), factory.clone()),
        factory,
    )
}

fn root_update() -> ConfigUpdate {
    ConfigUpdate {
        endpoint: Some("minio.local:9000".into()),
        access_key_id: Some("root".into()),
        secret_access_key: Some(SecretValue::new("s3cr3t")),
        use_ssl: Some(false),
    }
}

#[tokio::test]
async fn fresh_engine_reads_defaults() {
    let (backend, _) = backend_with(MockAdmin::new());

    let config = backend.read_config().await.unwrap();
    assert_eq!(config.endpoint, "");
    assert_eq!(config.access_key_id, "");
    assert!(config.secret_access_key.is_empty());
    assert!(!config.use_ssl);
    assert!(!config.configured);
    assert!(!config.is_service_account);
}

#[tokio::test]
async fn configure_marks_the_engine_configured() {
    let (backend, _) = backend_with(MockAdmin::new());

    let changed = backend.update_config(&root_update()).await.unwrap();
    assert!(changed);

    let config = backend.read_config().await.unwrap();
    assert_eq!(config.endpoint, "minio.local:9000");
    assert_eq!(config.access_key_id, "root");
    assert_eq!(config.secret_access_key.expose(), "s3cr3t");
    assert!(!config.use_ssl);
    assert!(config.configured);
    assert!(!config.is_service_account);
}

#[tokio::test]
async fn partial_update_preserves_unsupplied_fields() {
    let (backend, _) = backend_with(MockAdmin::new());
    backend.update_config(&root_update()).await.unwrap();

    backend
        .update_config(&ConfigUpdate {
            use_ssl: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    let config = backend.read_config().await.unwrap();
    assert!(config.use_ssl);
    assert_eq!(config.endpoint, "minio.local:9000");
    assert_eq!(config.access_key_id, "root");
    assert_eq!(config.secret_access_key.expose(), "s3cr3t");
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let (backend, _) = backend_with(MockAdmin::new());

    let err = backend
        .update_config(&ConfigUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::EmptyUpdate)
    ));
    assert!(err.is_client_fault());
}

#[tokio::test]
async fn delete_returns_the_engine_to_defaults() {
    let (backend, _) = backend_with(MockAdmin::new());
    backend.update_config(&root_update()).await.unwrap();

    backend.delete_config().await.unwrap();

    let config = backend.read_config().await.unwrap();
    assert!(!config.configured);
    assert!(!config.is_service_account);
    assert_eq!(config.endpoint, "");
}

#[tokio::test]
async fn every_mutation_empties_the_client_cache() {
    let (backend, factory) = backend_with(MockAdmin::new());
    backend.update_config(&root_update()).await.unwrap();

    let config = backend.read_config().await.unwrap();
    backend.client_cache().get_or_create(&config).unwrap();
    assert!(!backend.client_cache().is_empty());

    // An update that does not touch connectivity fields still invalidates
    backend
        .update_config(&ConfigUpdate {
            use_ssl: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(backend.client_cache().is_empty());

    let config = backend.read_config().await.unwrap();
    backend.client_cache().get_or_create(&config).unwrap();
    assert_eq!(factory.builds(), 2);

    backend.delete_config().await.unwrap();
    assert!(backend.client_cache().is_empty());
}

#[tokio::test]
async fn upgrade_then_rotate_full_lifecycle() {
    let rotated_secret = Arc::new(Mutex::new(None::<String>));
    let sent = Arc::clone(&rotated_secret);

    let mut mock = MockAdmin::new();
    mock.expect_create_service_account()
        .withf(|req| {
            req.target_user == "root" && req.name == SERVICE_ACCOUNT_NAME && req.policy.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(ServiceAccountCredential {
                access_key: "svc-key".into(),
                secret_key: SecretValue::new("svc-secret"),
            })
        });
    mock.expect_update_service_account()
        .withf(|name, _req| name == SERVICE_ACCOUNT_NAME)
        .times(1)
        .returning(move |_, req| {
            *sent.lock().unwrap() = Some(req.new_secret_key.expose().to_string());
            Ok(())
        });

    let (backend, _) = backend_with(mock);
    backend.update_config(&root_update()).await.unwrap();

    backend.upgrade_to_service_account().await.unwrap();

    let config = backend.read_config().await.unwrap();
    assert!(config.is_service_account);
    assert_eq!(config.access_key_id, "svc-key");
    assert_eq!(config.secret_access_key.expose(), "svc-secret");

    backend.rotate_secret().await.unwrap();

    let config = backend.read_config().await.unwrap();
    let sent_secret = rotated_secret.lock().unwrap().clone().unwrap();
    // The persisted secret is exactly the one the remote accepted
    assert_eq!(config.secret_access_key.expose(), sent_secret);
    assert_ne!(config.secret_access_key.expose(), "svc-secret");
    assert_eq!(config.secret_access_key.expose().len(), 40);
}

#[tokio::test]
async fn second_upgrade_is_a_state_error() {
    let mut mock = MockAdmin::new();
    mock.expect_create_service_account().times(1).returning(|_| {
        Ok(ServiceAccountCredential {
            access_key: "svc-key".into(),
            secret_key: SecretValue::new("svc-secret"),
        })
    });

    let (backend, _) = backend_with(mock);
    backend.update_config(&root_update()).await.unwrap();
    backend.upgrade_to_service_account().await.unwrap();

    let err = backend.upgrade_to_service_account().await.unwrap_err();
    assert!(matches!(
        err,
        Error::State(StateError::AlreadyServiceAccount)
    ));
    assert!(err.is_client_fault());

    let config = backend.read_config().await.unwrap();
    assert!(config.is_service_account);
    assert_eq!(config.access_key_id, "svc-key");
}

#[tokio::test]
async fn rotate_on_a_fresh_engine_makes_no_remote_call() {
    let mut mock = MockAdmin::new();
    mock.expect_update_service_account().times(0);

    let (backend, factory) = backend_with(mock);

    let err = backend.rotate_secret().await.unwrap_err();
    assert!(matches!(err, Error::State(StateError::NotServiceAccount)));

    let config = backend.read_config().await.unwrap();
    assert!(!config.configured);
    assert_eq!(factory.builds(), 0);
}

#[tokio::test]
async fn upgrade_without_configuration_names_the_missing_field() {
    let (backend, _) = backend_with(MockAdmin::new());

    let err = backend.upgrade_to_service_account().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::MissingField { field: "endpoint" })
    ));
}

#[tokio::test]
async fn failed_upgrade_is_a_server_fault_and_changes_nothing() {
    let mut mock = MockAdmin::new();
    mock.expect_create_service_account()
        .times(1)
        .returning(|_| Err(AdminError::Transport("connection refused".into())));

    let (backend, _) = backend_with(mock);
    backend.update_config(&root_update()).await.unwrap();

    let err = backend.upgrade_to_service_account().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Upstream(UpstreamError::CreateServiceAccount { .. })
    ));
    assert!(!err.is_client_fault());

    let config = backend.read_config().await.unwrap();
    assert!(!config.is_service_account);
    assert_eq!(config.access_key_id, "root");
    assert_eq!(config.secret_access_key.expose(), "s3cr3t");
}
