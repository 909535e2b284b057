// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod session_verifier;
pub mod song_repository;
pub mod translator;

// Re-exports
pub use config::{ConfigError, EnvSettings, SongsConfig};
pub use logging::init_logging;
pub use session_verifier::{SessionVerifier, SessionVerifierError, StaticSessionVerifier};
pub use song_repository::{DynamoSongRepository, RepositoryError, SongRepository};
pub use translator::{AwsTranslator, TranslateError, Translator};
