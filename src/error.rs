use crate::scene::Viewport;

/// Failures of the math core
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MathError {
    /// Normalizing a vector of zero (or non-finite) length
    DegenerateVector,
    /// Inverting a matrix whose upper 3x3 determinant is exactly zero
    SingularMatrix,
}

impl std::fmt::Display for MathError {
    fn fmt(&self, out: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MathError::DegenerateVector => write!(out, "cannot normalize a zero-length vector"),
            MathError::SingularMatrix => write!(out, "matrix is singular and has no inverse"),
        }
    }
}

impl std::error::Error for MathError {}

#[derive(Debug)]
pub enum Error {
    Math(MathError),
    Config(String),
    InvalidViewport(Viewport),
    NotInitialized,
    Backend(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, out: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Math(e) => write!(out, "math error: {}", e),
            Error::Config(msg) => write!(out, "config error: {}", msg),
            Error::InvalidViewport(viewport) => write!(
                out,
                "invalid viewport {} x {}",
                viewport.width,
                viewport.height,
            ),
            Error::NotInitialized => write!(out, "renderer has not been initialized"),
            Error::Backend(msg) => write!(out, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Math(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MathError> for Error {
    fn from(e: MathError) -> Error {
        Error::Math(e)
    }
}

impl From<ini::Error> for Error {
    fn from(e: ini::Error) -> Error {
        Error::Config(e.to_string())
    }
}
