use std::fmt;
use std::path::PathBuf;

/// Errors from reading or parsing model files.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("{} contains no triangles", .0.display())]
    EmptyGeometry(PathBuf),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: tobj::LoadError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

/// The stage of a load pipeline that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStage {
    Materials,
    Geometry,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStage::Materials => f.write_str("materials"),
            LoadStage::Geometry => f.write_str("geometry"),
        }
    }
}

/// Failure outcome of one load pipeline.
#[derive(Debug, thiserror::Error)]
#[error("{request}: {stage} stage failed: {error}")]
pub struct PipelineFailure {
    /// Name of the request that failed.
    pub request: String,
    pub stage: LoadStage,
    #[source]
    pub error: AssetError,
}
