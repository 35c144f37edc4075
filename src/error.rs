use std::fmt;

/// Failure kinds of the analysis workflow. Validation never reaches the
/// network; the other kinds are surfaced to the user and leave the
/// controller idle and resubmittable.
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// Required input missing; blocks submission locally.
    Validation(String),
    /// The request itself failed (offline, DNS, connection reset).
    Network(String),
    /// HTTP non-success, or a body indicating failure, with any
    /// backend-supplied remediation hints.
    Backend {
        message: String,
        recommendation: Option<String>,
        required_apis: Vec<String>,
    },
    /// PDF generation failed.
    Export(String),
}

impl AnalysisError {
    pub fn backend(message: impl Into<String>) -> Self {
        AnalysisError::Backend {
            message: message.into(),
            recommendation: None,
            required_apis: Vec::new(),
        }
    }

    /// Full user-facing text, including remediation hints when present.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Validation(msg) => msg.clone(),
            AnalysisError::Network(msg) => format!("Erro na análise: {}", msg),
            AnalysisError::Backend { message, recommendation, required_apis } => {
                let mut text = format!("Erro na análise: {}", message);
                if let Some(rec) = recommendation {
                    text.push_str(&format!("\n\nRecomendação: {}", rec));
                }
                if !required_apis.is_empty() {
                    text.push_str(&format!("\n\nAPIs necessárias:\n{}", required_apis.join("\n")));
                }
                text
            }
            AnalysisError::Export(msg) => format!("Erro ao gerar relatório PDF: {}", msg),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Validation(msg) => write!(f, "validation: {}", msg),
            AnalysisError::Network(msg) => write!(f, "network: {}", msg),
            AnalysisError::Backend { message, .. } => write!(f, "backend: {}", message),
            AnalysisError::Export(msg) => write!(f, "export: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Network(err.to_string())
    }
}
