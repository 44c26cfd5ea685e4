//! Constants for git-credential-org
//!
//! Environment variable names, storage identifiers and platform-specific
//! device paths shared by the core library and the CLI.

/// Environment variable overriding the configuration file location
pub const ENV_CONFIG_PATH: &str = "GIT_CREDENTIAL_ORG_CONFIG";

/// Environment variable that forces debug logging when set to `1`
pub const ENV_DEBUG: &str = "GIT_CREDENTIAL_ORG_DEBUG";

/// Earlier spelling of [`ENV_CONFIG_PATH`], still honoured
pub const LEGACY_ENV_CONFIG_PATH: &str = "GIT_CREDENTIALS_ORG_CONFIG";

/// Earlier spelling of [`ENV_DEBUG`], still honoured
pub const LEGACY_ENV_DEBUG: &str = "GIT_CREDENTIALS_ORG_DEBUG";

/// Application directory name under the XDG config home
pub const APP_DIR_NAME: &str = "git-credential-org";

/// Earlier application directory, read when [`APP_DIR_NAME`] has no config
pub const LEGACY_APP_DIR_NAME: &str = "git-credentials-org";

/// Configuration file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix of every storage identifier (keychain service, 1Password title)
pub const STORAGE_PREFIX: &str = "git-credential-org";

/// Account label under which keychain entries are filed
pub const KEYCHAIN_ACCOUNT: &str = "credentials";

/// Backend used when neither the host nor the defaults name one
pub const DEFAULT_BACKEND: &str = "keychain";

/// Log level used when the configuration does not set one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Vault used by the 1Password backend when none is configured
pub const DEFAULT_OP_VAULT: &str = "Private";

/// Executable name of the 1Password CLI
pub const DEFAULT_OP_COMMAND: &str = "op";

/// Controlling terminal device used for interactive prompts
#[cfg(not(windows))]
pub const TTY_INPUT: &str = "/dev/tty";

/// Controlling terminal device used for interactive prompts
#[cfg(not(windows))]
pub const TTY_OUTPUT: &str = "/dev/tty";

/// Console input device used for interactive prompts
#[cfg(windows)]
pub const TTY_INPUT: &str = "CONIN$";

/// Console output device used for interactive prompts
#[cfg(windows)]
pub const TTY_OUTPUT: &str = "CONOUT$";
