//! Constants used in the deploy scripts

/// Network used when none is selected
pub const DEFAULT_NETWORK: &str = "berachainTestnet";

/// Index of the signing account used when none is selected
pub const DEFAULT_ACCOUNT_INDEX: usize = 0;

/// Number of block confirmations awaited for a deployment transaction
pub const DEFAULT_CONFIRMATIONS: u64 = 2;

/// Contract deployed by the sample script
pub const DEFAULT_CONTRACT: &str = "Token";

/// Constructor arguments of the sample contract, in order
pub const DEFAULT_CONSTRUCTOR_ARGS: [&str; 2] = ["NameToken", "SymbolToken"];

/// Directory holding the compiled artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "./artifacts";

/// File where deployed addresses are recorded
pub const DEFAULT_DEPLOYMENTS_FILE: &str = "deployments.json";

/// Env var holding the signing key material, shared by every network
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Label shown when asking the operator to confirm the deployment
pub const CONFIRM_LABEL: &str = "continue (y/n/_): ";

/// The only confirmation input that lets the deployment go on
pub const CONFIRM_TOKEN: &str = "y";

/// Delay between two explorer verification status checks
pub const VERIFY_POLL_INTERVAL_SECS: u64 = 3;

/// Maximum number of explorer verification status checks
pub const VERIFY_MAX_POLLS: u32 = 20;
