use core::fmt::Debug;
use core::option::Option;
use std::collections::HashMap;

use crate::exchange::Exchange;

/// API credentials for a single exchange account. `api_password` is only populated for
/// exchanges requiring a passphrase alongside the key/secret pair (e.g. Bitget, OKX).
pub trait Credentials: Debug + Sync + Send {
    fn get(&self, field: &str) -> Option<String>;
    fn exchange(&self) -> Exchange;
}

#[derive(Debug, Clone)]
pub struct BasicCredentials {
    exchange: Exchange,
    data: HashMap<String, String>,
}

impl BasicCredentials {
    pub fn new(exchange: Exchange, api_key: &str, api_secret: &str, api_password: Option<&str>) -> Self {
        let mut data = HashMap::new();
        data.insert("api_key".to_string(), api_key.to_string());
        data.insert("api_secret".to_string(), api_secret.to_string());
        if let Some(password) = api_password {
            data.insert("api_password".to_string(), password.to_string());
        }
        Self { exchange, data }
    }

    #[must_use]
    pub fn empty(exchange: Exchange) -> Self {
        Self {
            exchange,
            data: HashMap::default(),
        }
    }
}

impl Credentials for BasicCredentials {
    fn get(&self, field: &str) -> Option<String> { self.data.get(field).cloned() }

    fn exchange(&self) -> Exchange { self.exchange }
}
