//! Processor configuration assembled from named parameters.
use std::{env, str::FromStr};

use log::info;
use zeroize::Zeroizing;

use crate::{
    constants::{
        CONFIG_FILE_ENV_VAR, DEFAULT_BACKOFF_MAX_RETRIES, DEFAULT_BACKOFF_RETRY_INTERVAL_SECS,
        DEFAULT_CONFIRMATIONS, DEFAULT_CONFIRMATIONS_TIMEOUT_SECS,
        DEFAULT_DATABASE_CONN_MAX_LIFETIME_SECS, DEFAULT_DATABASE_MAX_IDLE_CONNS,
        DEFAULT_DATABASE_MAX_OPEN_CONNS, DEFAULT_ETH_CLIENT_TIMEOUT_SECS,
        DEFAULT_HEADER_SYNC_INTERVAL_SECS, DEFAULT_PROFITABLE_ONLY, DEFAULT_QUEUE_PREFETCH_COUNT,
    },
    models::{parse_address, parse_private_key, Address, ProcessorKey, SecretString},
    services::{DatabaseConnectionOptions, DatabaseFactory, QueueConnectionOptions, QueueFactory},
};

use super::{
    ConfigError, EnvParameterSource, LayeredParameterSource, MapParameterSource, Parameter,
    ParameterSource,
};

/// Immutable processor configuration.
///
/// Building it performs no I/O. The database and queue are reached only when
/// the caller invokes [`DatabaseFactory`] or [`QueueFactory`].
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub src_signal_service_address: Address,
    pub dest_taiko_address: Address,
    pub dest_bridge_address: Address,
    pub dest_erc721_vault_address: Address,
    pub dest_erc20_vault_address: Address,
    pub dest_erc1155_vault_address: Address,

    pub processor_private_key: ProcessorKey,

    /// Seconds between header syncs.
    pub header_sync_interval: u64,
    /// Blocks to wait before processing a message.
    pub confirmations: u64,
    /// Seconds to wait for `confirmations` blocks.
    pub confirmations_timeout: u64,
    pub profitable_only: bool,

    /// Seconds between retries.
    pub backoff_retry_interval: u64,
    pub backoff_max_retries: u64,

    pub src_rpc_url: String,
    pub dest_rpc_url: String,
    /// Seconds. Enforced by the chain clients, not here.
    pub eth_client_timeout: u64,

    pub database: DatabaseFactory,
    pub queue: QueueFactory,
}

impl ProcessorConfig {
    /// Builds the config from any parameter source.
    ///
    /// The private key is parsed first, then the six contract addresses. The
    /// first failure is returned and names the parameter.
    pub fn from_source<S>(source: &S) -> Result<Self, ConfigError>
    where
        S: ParameterSource + ?Sized,
    {
        let processor_private_key = {
            let raw = Zeroizing::new(required(source, Parameter::ProcessorPrivateKey)?);
            parse_private_key(&raw).map_err(|source| ConfigError::InvalidSigningKey {
                parameter: Parameter::ProcessorPrivateKey,
                source,
            })?
        };

        let src_signal_service_address = address(source, Parameter::SrcSignalServiceAddress)?;
        let dest_taiko_address = address(source, Parameter::DestTaikoAddress)?;
        let dest_bridge_address = address(source, Parameter::DestBridgeAddress)?;
        let dest_erc721_vault_address = address(source, Parameter::DestErc721VaultAddress)?;
        let dest_erc20_vault_address = address(source, Parameter::DestErc20VaultAddress)?;
        let dest_erc1155_vault_address = address(source, Parameter::DestErc1155VaultAddress)?;

        let database = DatabaseFactory::new(DatabaseConnectionOptions {
            username: required(source, Parameter::DatabaseUsername)?,
            password: secret(source, Parameter::DatabasePassword)?,
            database: required(source, Parameter::DatabaseName)?,
            host: required(source, Parameter::DatabaseHost)?,
            max_idle_conns: number_or(
                source,
                Parameter::DatabaseMaxIdleConns,
                DEFAULT_DATABASE_MAX_IDLE_CONNS,
            )?,
            max_open_conns: number_or(
                source,
                Parameter::DatabaseMaxOpenConns,
                DEFAULT_DATABASE_MAX_OPEN_CONNS,
            )?,
            max_conn_lifetime_secs: number_or(
                source,
                Parameter::DatabaseConnMaxLifetime,
                DEFAULT_DATABASE_CONN_MAX_LIFETIME_SECS,
            )?,
            connect_timeout: DatabaseConnectionOptions::default_connect_timeout(),
        });

        let queue = QueueFactory::new(QueueConnectionOptions {
            username: required(source, Parameter::QueueUsername)?,
            password: secret(source, Parameter::QueuePassword)?,
            host: required(source, Parameter::QueueHost)?,
            port: number(source, Parameter::QueuePort)?,
            prefetch_count: number_or(
                source,
                Parameter::QueuePrefetchCount,
                DEFAULT_QUEUE_PREFETCH_COUNT,
            )?,
            connect_timeout: QueueConnectionOptions::default_connect_timeout(),
        });

        Ok(Self {
            src_signal_service_address,
            dest_taiko_address,
            dest_bridge_address,
            dest_erc721_vault_address,
            dest_erc20_vault_address,
            dest_erc1155_vault_address,
            processor_private_key,
            header_sync_interval: number_or(
                source,
                Parameter::HeaderSyncInterval,
                DEFAULT_HEADER_SYNC_INTERVAL_SECS,
            )?,
            confirmations: number_or(source, Parameter::Confirmations, DEFAULT_CONFIRMATIONS)?,
            confirmations_timeout: number_or(
                source,
                Parameter::ConfirmationTimeout,
                DEFAULT_CONFIRMATIONS_TIMEOUT_SECS,
            )?,
            profitable_only: flag_or(source, Parameter::ProfitableOnly, DEFAULT_PROFITABLE_ONLY)?,
            backoff_retry_interval: number_or(
                source,
                Parameter::BackOffRetryInterval,
                DEFAULT_BACKOFF_RETRY_INTERVAL_SECS,
            )?,
            backoff_max_retries: number_or(
                source,
                Parameter::BackOffMaxRetrys,
                DEFAULT_BACKOFF_MAX_RETRIES,
            )?,
            src_rpc_url: required(source, Parameter::SrcRpcUrl)?,
            dest_rpc_url: required(source, Parameter::DestRpcUrl)?,
            eth_client_timeout: number_or(
                source,
                Parameter::EthClientTimeout,
                DEFAULT_ETH_CLIENT_TIMEOUT_SECS,
            )?,
            database,
            queue,
        })
    }

    /// Builds the config from the environment.
    ///
    /// When `PROCESSOR_CONFIG_FILE` is set, the JSON file it names supplies
    /// any parameter the environment leaves unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut source = LayeredParameterSource::new().with_layer(EnvParameterSource);
        if let Ok(path) = env::var(CONFIG_FILE_ENV_VAR) {
            source = source.with_layer(MapParameterSource::from_file(path)?);
        }
        Self::from_source(&source)
    }

    /// Logs the effective settings. Passwords and the key are left out.
    pub fn log_summary(&self) {
        info!("Processor signer: {}", self.processor_private_key.address());
        info!(
            "Contracts: signal service {}, taiko {}, bridge {}",
            self.src_signal_service_address, self.dest_taiko_address, self.dest_bridge_address
        );
        info!(
            "Vaults: erc20 {}, erc721 {}, erc1155 {}",
            self.dest_erc20_vault_address,
            self.dest_erc721_vault_address,
            self.dest_erc1155_vault_address
        );
        info!(
            "Processing: header sync {}s, {} confirmations, confirmation timeout {}s, profitable only {}",
            self.header_sync_interval,
            self.confirmations,
            self.confirmations_timeout,
            self.profitable_only
        );
        info!(
            "Backoff: retry every {}s, at most {} retries",
            self.backoff_retry_interval, self.backoff_max_retries
        );
        info!(
            "RPC: source {}, destination {}, client timeout {}s",
            self.src_rpc_url, self.dest_rpc_url, self.eth_client_timeout
        );
        info!("Database: {}", self.database.options().redacted_url());
        info!(
            "Queue: {} (prefetch {})",
            self.queue.options().redacted_url(),
            self.queue.options().prefetch_count
        );
    }
}

fn required<S>(source: &S, parameter: Parameter) -> Result<String, ConfigError>
where
    S: ParameterSource + ?Sized,
{
    source
        .get(parameter)?
        .ok_or(ConfigError::MissingParameter(parameter))
}

fn secret<S>(source: &S, parameter: Parameter) -> Result<SecretString, ConfigError>
where
    S: ParameterSource + ?Sized,
{
    required(source, parameter).map(SecretString::from)
}

fn address<S>(source: &S, parameter: Parameter) -> Result<Address, ConfigError>
where
    S: ParameterSource + ?Sized,
{
    let raw = required(source, parameter)?;
    parse_address(&raw).map_err(|source| ConfigError::InvalidAddress { parameter, source })
}

fn parse_number<T>(parameter: Parameter, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            parameter,
            reason: format!("{:?} is not a valid unsigned integer: {}", raw, e),
        })
}

fn number<S, T>(source: &S, parameter: Parameter) -> Result<T, ConfigError>
where
    S: ParameterSource + ?Sized,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_number(parameter, &required(source, parameter)?)
}

fn number_or<S>(source: &S, parameter: Parameter, default: u64) -> Result<u64, ConfigError>
where
    S: ParameterSource + ?Sized,
{
    match source.get(parameter)? {
        Some(raw) => parse_number(parameter, &raw),
        None => Ok(default),
    }
}

fn flag_or<S>(source: &S, parameter: Parameter, default: bool) -> Result<bool, ConfigError>
where
    S: ParameterSource + ?Sized,
{
    let Some(raw) = source.get(parameter)? else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            parameter,
            reason: format!("{:?} is not a valid boolean", raw),
        }),
    }
}
