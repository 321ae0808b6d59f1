//! Core of a self-sovereign identity service: DID management, protected key
//! storage, credential issuance and human-reviewed credential-manifest and
//! presentation-exchange workflows.
//!
//! The library consists of three crates:
//!
//! * **Providers**: modular implementations behind trait seams
//!   * Transactional storage provider
//!   * Key algorithm provider
//!   * Envelope-encrypted keystore
//!   * DID method provider
//!   * Operation engine
//!   * Manifest and presentation exchanges
//! * **Crypto**: signers, hashers and the symmetric encryption suite,
//!   delimited in its own crate.
//! * **Core**: a service layer orchestrating the providers.
//!
//! To get started, initialize the core and use the services:
//!
//! ```ignore
//! let core = SsiCore::new(None).await?;
//! let issuer = core
//!     .did_service
//!     .create_did(DidMethodType::Key, KeyAlgorithmType::Eddsa, None)
//!     .await?;
//! ```

use std::{collections::HashMap, error::Error, sync::Arc};

use ssi_crypto::imp::{
    hasher::sha256::SHA256,
    signer::{eddsa::EDDSASigner, es256::ES256Signer},
    CryptoProviderImpl,
};

use ssi_providers::{
    did::{
        imp::{
            key::KeyDidMethod,
            provider::DidMethodRegistry,
            stub::StubDidMethod,
            web::{Params as WebDidMethodParams, WebDidMethod},
        },
        provider::DidMethodProvider,
        storage::DidStorage,
        DidMethodHandler,
    },
    exchange::{ManifestExchange, PresentationExchange},
    jwt::{verifier::DidTokenVerifier, TokenVerifier},
    key_algorithm::{
        imp::{eddsa::Eddsa, es256::Es256, provider::KeyAlgorithmProviderImpl},
        provider::KeyAlgorithmProvider,
        KeyAlgorithm,
    },
    keystore::{new_service_encryption, KeyStoreStorage},
    operation::OperationStorage,
    storage::{imp::in_memory::InMemoryStorage, ServiceStorage},
};

use config::CoreConfig;
use model::{DidMethodType, KeyAlgorithmType};
use service::{
    credential_service::CredentialService, did_service::DidService,
    keystore_service::KeyStoreService, manifest_service::ManifestService,
    operation_service::OperationService, presentation_service::PresentationService,
};

pub mod config;
pub mod model;
pub mod service;

pub struct SsiCore {
    pub did_service: DidService,
    pub keystore_service: KeyStoreService,
    pub operation_service: OperationService,
    pub credential_service: CredentialService,
    pub manifest_service: ManifestService,
    pub presentation_service: PresentationService,

    pub storage: Arc<dyn ServiceStorage>,
    pub key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    pub did_method_provider: Arc<dyn DidMethodProvider>,
    pub keystore: Arc<KeyStoreStorage>,
    pub token_verifier: Arc<dyn TokenVerifier>,
}

impl SsiCore {
    /// Wires storage, encryption, keystore, DID methods, the operation
    /// engine and the review services. `None` initializes the core with the
    /// default configuration. A failed service-key bootstrap is fatal.
    pub async fn new(config: Option<CoreConfig>) -> Result<Self, Box<dyn Error>> {
        let config = config.unwrap_or_default();

        let storage: Arc<dyn ServiceStorage> = Arc::new(InMemoryStorage::new());

        // initialize crypto provider
        let crypto_provider = Arc::new(CryptoProviderImpl::new(
            HashMap::from_iter(vec![("sha-256".to_string(), Arc::new(SHA256 {}) as _)]),
            HashMap::from_iter(vec![
                ("Ed25519".to_string(), Arc::new(EDDSASigner {}) as _),
                ("ES256".to_string(), Arc::new(ES256Signer {}) as _),
            ]),
        ));

        // initialize key algorithm provider
        let key_algorithms: HashMap<String, Arc<dyn KeyAlgorithm>> = HashMap::from_iter(vec![
            (KeyAlgorithmType::Eddsa.to_string(), Arc::new(Eddsa) as _),
            (KeyAlgorithmType::Es256.to_string(), Arc::new(Es256) as _),
        ]);
        let key_algorithm_provider: Arc<dyn KeyAlgorithmProvider> = Arc::new(
            KeyAlgorithmProviderImpl::new(key_algorithms, crypto_provider),
        );

        // bootstrap service encryption and the keystore on top of it
        let encryption =
            new_service_encryption(storage.clone(), &config.encryption_config, None).await?;
        let keystore = Arc::new(KeyStoreStorage::new(
            storage.clone(),
            key_algorithm_provider.clone(),
            encryption,
        ));

        // initialize did method provider
        let mut did_methods: HashMap<String, Arc<dyn DidMethodHandler>> = HashMap::new();
        for method in &config.did_method_config.methods {
            let handler: Arc<dyn DidMethodHandler> = match method {
                DidMethodType::Key => Arc::new(KeyDidMethod::new(
                    key_algorithm_provider.clone(),
                    keystore.clone(),
                    DidStorage::new(storage.clone(), &method.to_string()),
                )),
                DidMethodType::Web => Arc::new(WebDidMethod::new(
                    DidStorage::new(storage.clone(), &method.to_string()),
                    WebDidMethodParams {
                        resolve_to_insecure_http: Some(
                            config.did_method_config.resolve_web_to_insecure_http,
                        ),
                    },
                )),
            };
            did_methods.insert(method.to_string(), handler);
        }
        for &stub in &config.did_method_config.stub_methods {
            did_methods.insert(stub.to_string(), Arc::new(StubDidMethod::new(stub)));
        }
        let did_method_provider: Arc<dyn DidMethodProvider> =
            Arc::new(DidMethodRegistry::new(did_methods));

        let token_verifier: Arc<dyn TokenVerifier> = Arc::new(DidTokenVerifier::new(
            did_method_provider.clone(),
            key_algorithm_provider.clone(),
        ));

        // initialize the operation engine and the review flows on top
        let operations = Arc::new(OperationStorage::new(storage.clone()));
        let manifest_exchange = ManifestExchange::new(
            storage.clone(),
            operations.clone(),
            token_verifier.clone(),
        );
        let presentation_exchange = PresentationExchange::new(
            storage.clone(),
            operations.clone(),
            token_verifier.clone(),
        );

        tracing::debug!(
            methods = ?did_method_provider.get_supported_methods(),
            "core initialized"
        );

        Ok(Self {
            did_service: DidService::new(did_method_provider.clone()),
            keystore_service: KeyStoreService::new(keystore.clone()),
            operation_service: OperationService::new(operations),
            credential_service: CredentialService::new(
                keystore.clone(),
                key_algorithm_provider.clone(),
                did_method_provider.clone(),
                token_verifier.clone(),
            ),
            manifest_service: ManifestService::new(manifest_exchange),
            presentation_service: PresentationService::new(presentation_exchange),
            storage,
            key_algorithm_provider,
            did_method_provider,
            keystore,
            token_verifier,
        })
    }
}
