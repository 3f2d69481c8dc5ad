//! Builds the processor config from the environment and a parameter file.
use std::{env, io::Write, sync::Mutex};

use relayer_processor::{
    config::{ConfigError, Parameter, ProcessorConfig},
    constants::CONFIG_FILE_ENV_VAR,
    models::SecretString,
};
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn clear_env() {
    for parameter in Parameter::ALL {
        env::remove_var(parameter.env_var());
    }
    env::remove_var(CONFIG_FILE_ENV_VAR);
}

fn setup() {
    clear_env();
    env::set_var("PROCESSOR_PRIVATE_KEY", KEY);
    env::set_var(
        "SRC_SIGNAL_SERVICE_ADDRESS",
        "0x1000777700000000000000000000000000000007",
    );
    env::set_var("DEST_TAIKO_ADDRESS", "0x1000777700000000000000000000000000000001");
    env::set_var("DEST_BRIDGE_ADDRESS", "0x1000777700000000000000000000000000000004");
    env::set_var(
        "DEST_ERC721_VAULT_ADDRESS",
        "0x1000777700000000000000000000000000000003",
    );
    env::set_var(
        "DEST_ERC20_VAULT_ADDRESS",
        "0x1000777700000000000000000000000000000002",
    );
    env::set_var(
        "DEST_ERC1155_VAULT_ADDRESS",
        "0x1000777700000000000000000000000000000005",
    );
    env::set_var("DATABASE_USER", "u");
    env::set_var("DATABASE_PASSWORD", "p");
    env::set_var("DATABASE_NAME", "relayer");
    env::set_var("DATABASE_HOST", "db:3306");
    env::set_var("QUEUE_USER", "guest");
    env::set_var("QUEUE_PASSWORD", "guest");
    env::set_var("QUEUE_HOST", "mq");
    env::set_var("QUEUE_PORT", "5672");
    env::set_var("SRC_RPC_URL", "http://l1:8545");
    env::set_var("DEST_RPC_URL", "http://l2:8545");
}

#[test]
fn test_from_env_reads_every_parameter() {
    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    setup();
    env::set_var("CONFIRMATIONS_BEFORE_PROCESSING", "6");
    env::set_var("PROFITABLE_ONLY", "true");
    env::set_var("BACKOFF_MAX_RETRIES", "9");
    env::set_var("QUEUE_PREFETCH_COUNT", "10");

    let config = ProcessorConfig::from_env();
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.confirmations, 6);
    assert!(config.profitable_only);
    assert_eq!(config.backoff_max_retries, 9);
    assert_eq!(config.header_sync_interval, 10);
    assert_eq!(
        format!("{:#x}", config.processor_private_key.address()),
        "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
    );
    assert_eq!(config.database.options().password, SecretString::new("p"));
    assert_eq!(config.queue.options().prefetch_count, 10);
    assert_eq!(config.dest_rpc_url, "http://l2:8545");
}

#[test]
fn test_environment_overrides_parameter_file() {
    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    setup();
    env::remove_var("DATABASE_HOST");
    env::set_var("CONFIRMATIONS_BEFORE_PROCESSING", "1");

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"databaseHost": "file-db:3307", "confirmations": 20, "profitableOnly": true}}"#
    )
    .unwrap();
    env::set_var(CONFIG_FILE_ENV_VAR, file.path());

    let config = ProcessorConfig::from_env();
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.database.options().host, "file-db:3307");
    assert_eq!(config.confirmations, 1);
    assert!(config.profitable_only);
}

#[test]
fn test_missing_parameter_file_is_an_error() {
    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    setup();
    env::set_var(CONFIG_FILE_ENV_VAR, "/nonexistent/processor.json");

    let result = ProcessorConfig::from_env();
    clear_env();

    assert!(matches!(result, Err(ConfigError::FileRead { .. })));
}

#[test]
fn test_from_env_errors_name_the_parameter() {
    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    setup();
    env::set_var("DEST_ERC721_VAULT_ADDRESS", "0xzz00777700000000000000000000000000000003");

    let err = ProcessorConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.parameter(), Some(Parameter::DestErc721VaultAddress));
    assert!(err.to_string().contains("destERC721VaultAddress"));
}

#[test]
fn test_unset_private_key_is_missing() {
    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    setup();
    env::remove_var("PROCESSOR_PRIVATE_KEY");

    let err = ProcessorConfig::from_env().unwrap_err();
    clear_env();

    assert!(matches!(
        err,
        ConfigError::MissingParameter(Parameter::ProcessorPrivateKey)
    ));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_value_is_invalid_not_missing() {
    use std::{ffi::OsString, os::unix::ffi::OsStringExt};

    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    setup();
    env::set_var("DATABASE_HOST", OsString::from_vec(vec![b'd', b'b', 0x80]));

    let err = ProcessorConfig::from_env().unwrap_err();
    clear_env();

    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            parameter: Parameter::DatabaseHost,
            ..
        }
    ));
}
