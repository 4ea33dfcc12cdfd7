use tracing::debug;

const DEFAULT_WINDOW_SIZE: usize = 2000;
const DEFAULT_CHUNK_SIZE: usize = 500;

/// Run-wide sizing for the import pipeline.
///
/// In debug builds a `.env` file is honored before the environment is read.
#[derive(Clone, Debug)]
pub struct ImportConfig {
    /// Records per concurrently processed window of the parsed stream
    pub window_size: usize,
    /// Rows per INSERT statement issued by the writer
    pub chunk_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ImportConfig {
    /// Load configuration from the environment.
    pub fn load() -> Self {
        #[cfg(debug_assertions)]
        {
            if dotenvy::dotenv().is_ok() {
                debug!("loaded .env file");
            }
        }

        Self::from_env()
    }

    fn from_env() -> Self {
        let defaults = Self::default();
        let window_size = read_size("WAX_WINDOW_SIZE").unwrap_or(defaults.window_size);
        let chunk_size = read_size("WAX_CHUNK_SIZE").unwrap_or(defaults.chunk_size);
        debug!(window_size, chunk_size, "import sizing");
        ImportConfig {
            window_size,
            chunk_size,
        }
    }
}

fn read_size(var: &str) -> Option<usize> {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&n| n > 0)
}
