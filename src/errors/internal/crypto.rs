#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("crypto failure in {component} during {operation}: {message}")]
    Other {
        operation: &'static str,
        component: &'static str,
        message: String,
    },
}

impl CryptoError {
    pub fn other_from_error<E>(component: &'static str, operation: &'static str, err: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Other {
            component,
            operation,
            message: err.to_string(),
        }
    }
}
