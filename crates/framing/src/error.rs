use std::path::PathBuf;

#[derive(Debug)]
pub enum FramingError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    InvalidConfig(String),
}

impl std::fmt::Display for FramingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramingError::Io { path, source } => write!(f, "read {path:?}: {source}"),
            FramingError::Parse(e) => write!(f, "config json: {e}"),
            FramingError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for FramingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FramingError::Io { source, .. } => Some(source),
            FramingError::Parse(e) => Some(e),
            FramingError::InvalidConfig(_) => None,
        }
    }
}

impl From<serde_json::Error> for FramingError {
    fn from(e: serde_json::Error) -> Self {
        FramingError::Parse(e)
    }
}
