use ssi_providers::keystore::EncryptionConfig;

use crate::model::DidMethodType;

pub struct CoreConfig {
    pub did_method_config: DidMethodConfig,
    pub encryption_config: EncryptionConfig,
}

pub struct DidMethodConfig {
    /// Methods registered with a working handler.
    pub methods: Vec<DidMethodType>,
    /// Methods registered as placeholders; every operation on them answers
    /// "not implemented".
    pub stub_methods: Vec<&'static str>,
    /// Resolve web DIDs over plain HTTP. Test environments only.
    pub resolve_web_to_insecure_http: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            did_method_config: DidMethodConfig {
                methods: vec![DidMethodType::Key, DidMethodType::Web],
                stub_methods: vec![],
                resolve_web_to_insecure_http: false,
            },
            encryption_config: EncryptionConfig::default(),
        }
    }
}
