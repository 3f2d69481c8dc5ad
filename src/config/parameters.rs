//! Named processor parameters and the sources that supply them.
//!
//! Every parameter has a stable camelCase name (used as the key in JSON
//! parameter files and in error messages) and an environment variable name.
//! Sources only hand out raw text; conversion happens in
//! [`ProcessorConfig::from_source`](super::ProcessorConfig::from_source).
use std::{
    collections::HashMap,
    env::{self, VarError},
    fmt, fs,
    path::Path,
};

use serde_json::Value;

use super::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    ProcessorPrivateKey,
    SrcSignalServiceAddress,
    DestTaikoAddress,
    DestBridgeAddress,
    DestErc721VaultAddress,
    DestErc20VaultAddress,
    DestErc1155VaultAddress,
    DatabaseUsername,
    DatabasePassword,
    DatabaseName,
    DatabaseHost,
    DatabaseMaxIdleConns,
    DatabaseMaxOpenConns,
    DatabaseConnMaxLifetime,
    QueueUsername,
    QueuePassword,
    QueueHost,
    QueuePort,
    QueuePrefetchCount,
    SrcRpcUrl,
    DestRpcUrl,
    HeaderSyncInterval,
    Confirmations,
    ConfirmationTimeout,
    ProfitableOnly,
    BackOffRetryInterval,
    BackOffMaxRetrys,
    EthClientTimeout,
}

impl Parameter {
    pub const ALL: [Parameter; 28] = [
        Parameter::ProcessorPrivateKey,
        Parameter::SrcSignalServiceAddress,
        Parameter::DestTaikoAddress,
        Parameter::DestBridgeAddress,
        Parameter::DestErc721VaultAddress,
        Parameter::DestErc20VaultAddress,
        Parameter::DestErc1155VaultAddress,
        Parameter::DatabaseUsername,
        Parameter::DatabasePassword,
        Parameter::DatabaseName,
        Parameter::DatabaseHost,
        Parameter::DatabaseMaxIdleConns,
        Parameter::DatabaseMaxOpenConns,
        Parameter::DatabaseConnMaxLifetime,
        Parameter::QueueUsername,
        Parameter::QueuePassword,
        Parameter::QueueHost,
        Parameter::QueuePort,
        Parameter::QueuePrefetchCount,
        Parameter::SrcRpcUrl,
        Parameter::DestRpcUrl,
        Parameter::HeaderSyncInterval,
        Parameter::Confirmations,
        Parameter::ConfirmationTimeout,
        Parameter::ProfitableOnly,
        Parameter::BackOffRetryInterval,
        Parameter::BackOffMaxRetrys,
        Parameter::EthClientTimeout,
    ];

    /// Stable parameter name.
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::ProcessorPrivateKey => "processorPrivateKey",
            Parameter::SrcSignalServiceAddress => "srcSignalServiceAddress",
            Parameter::DestTaikoAddress => "destTaikoAddress",
            Parameter::DestBridgeAddress => "destBridgeAddress",
            Parameter::DestErc721VaultAddress => "destERC721VaultAddress",
            Parameter::DestErc20VaultAddress => "destERC20VaultAddress",
            Parameter::DestErc1155VaultAddress => "destERC1155VaultAddress",
            Parameter::DatabaseUsername => "databaseUsername",
            Parameter::DatabasePassword => "databasePassword",
            Parameter::DatabaseName => "databaseName",
            Parameter::DatabaseHost => "databaseHost",
            Parameter::DatabaseMaxIdleConns => "databaseMaxIdleConns",
            Parameter::DatabaseMaxOpenConns => "databaseMaxOpenConns",
            Parameter::DatabaseConnMaxLifetime => "databaseConnMaxLifetime",
            Parameter::QueueUsername => "queueUsername",
            Parameter::QueuePassword => "queuePassword",
            Parameter::QueueHost => "queueHost",
            Parameter::QueuePort => "queuePort",
            Parameter::QueuePrefetchCount => "queuePrefetchCount",
            Parameter::SrcRpcUrl => "srcRPCUrl",
            Parameter::DestRpcUrl => "destRPCUrl",
            Parameter::HeaderSyncInterval => "headerSyncInterval",
            Parameter::Confirmations => "confirmations",
            Parameter::ConfirmationTimeout => "confirmationTimeout",
            Parameter::ProfitableOnly => "profitableOnly",
            Parameter::BackOffRetryInterval => "backOffRetryInterval",
            Parameter::BackOffMaxRetrys => "backOffMaxRetrys",
            Parameter::EthClientTimeout => "ethClientTimeout",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Parameter::ProcessorPrivateKey => "PROCESSOR_PRIVATE_KEY",
            Parameter::SrcSignalServiceAddress => "SRC_SIGNAL_SERVICE_ADDRESS",
            Parameter::DestTaikoAddress => "DEST_TAIKO_ADDRESS",
            Parameter::DestBridgeAddress => "DEST_BRIDGE_ADDRESS",
            Parameter::DestErc721VaultAddress => "DEST_ERC721_VAULT_ADDRESS",
            Parameter::DestErc20VaultAddress => "DEST_ERC20_VAULT_ADDRESS",
            Parameter::DestErc1155VaultAddress => "DEST_ERC1155_VAULT_ADDRESS",
            Parameter::DatabaseUsername => "DATABASE_USER",
            Parameter::DatabasePassword => "DATABASE_PASSWORD",
            Parameter::DatabaseName => "DATABASE_NAME",
            Parameter::DatabaseHost => "DATABASE_HOST",
            Parameter::DatabaseMaxIdleConns => "DATABASE_MAX_IDLE_CONNS",
            Parameter::DatabaseMaxOpenConns => "DATABASE_MAX_OPEN_CONNS",
            Parameter::DatabaseConnMaxLifetime => "DATABASE_CONN_MAX_LIFETIME",
            Parameter::QueueUsername => "QUEUE_USER",
            Parameter::QueuePassword => "QUEUE_PASSWORD",
            Parameter::QueueHost => "QUEUE_HOST",
            Parameter::QueuePort => "QUEUE_PORT",
            Parameter::QueuePrefetchCount => "QUEUE_PREFETCH_COUNT",
            Parameter::SrcRpcUrl => "SRC_RPC_URL",
            Parameter::DestRpcUrl => "DEST_RPC_URL",
            Parameter::HeaderSyncInterval => "HEADER_SYNC_INTERVAL",
            Parameter::Confirmations => "CONFIRMATIONS_BEFORE_PROCESSING",
            Parameter::ConfirmationTimeout => "CONFIRMATIONS_TIMEOUT",
            Parameter::ProfitableOnly => "PROFITABLE_ONLY",
            Parameter::BackOffRetryInterval => "BACKOFF_RETRY_INTERVAL",
            Parameter::BackOffMaxRetrys => "BACKOFF_MAX_RETRIES",
            Parameter::EthClientTimeout => "ETH_CLIENT_TIMEOUT",
        }
    }

    pub fn from_name(name: &str) -> Option<Parameter> {
        Parameter::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supplies raw parameter values by name.
pub trait ParameterSource {
    /// Returns the raw value, or `None` when this source does not define it.
    ///
    /// A value that is present but unreadable is an error, not `None`.
    fn get(&self, parameter: Parameter) -> Result<Option<String>, ConfigError>;
}

/// Reads parameters from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvParameterSource;

impl ParameterSource for EnvParameterSource {
    fn get(&self, parameter: Parameter) -> Result<Option<String>, ConfigError> {
        match env::var(parameter.env_var()) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
                parameter,
                reason: format!("{} is not valid UTF-8", parameter.env_var()),
            }),
        }
    }
}

/// In-memory parameter values, usually loaded from a JSON parameter file.
#[derive(Clone, Default)]
pub struct MapParameterSource {
    values: HashMap<Parameter, String>,
}

// Values may hold the private key or passwords; only names are printed.
impl fmt::Debug for MapParameterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl MapParameterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, parameter: Parameter, value: impl Into<String>) -> Self {
        self.values.insert(parameter, value.into());
        self
    }

    /// Parses a JSON object keyed by parameter name.
    ///
    /// Strings, numbers and booleans are accepted; `null` leaves the
    /// parameter unset. Unknown keys are rejected so typos do not silently
    /// fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let document: Value =
            serde_json::from_str(json).map_err(|e| ConfigError::FileFormat(e.to_string()))?;
        let Value::Object(entries) = document else {
            return Err(ConfigError::FileFormat(
                "expected a JSON object of parameters".into(),
            ));
        };

        let mut values = HashMap::new();
        for (key, value) in entries {
            let parameter = Parameter::from_name(&key)
                .ok_or_else(|| ConfigError::FileFormat(format!("unknown parameter: {}", key)))?;
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ConfigError::FileFormat(format!(
                        "parameter {} must be a string, number or boolean",
                        key
                    )))
                }
            };
            values.insert(parameter, text);
        }

        Ok(Self { values })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}

impl ParameterSource for MapParameterSource {
    fn get(&self, parameter: Parameter) -> Result<Option<String>, ConfigError> {
        Ok(self.values.get(&parameter).cloned())
    }
}

/// Ordered stack of sources; the first layer defining a parameter wins.
#[derive(Default)]
pub struct LayeredParameterSource {
    layers: Vec<Box<dyn ParameterSource + Send + Sync>>,
}

impl LayeredParameterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, source: impl ParameterSource + Send + Sync + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }
}

impl ParameterSource for LayeredParameterSource {
    fn get(&self, parameter: Parameter) -> Result<Option<String>, ConfigError> {
        for layer in &self.layers {
            if let Some(value) = layer.get(parameter)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}
