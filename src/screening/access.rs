use crate::utils::error::{ReconcileError, Result};

/// Shared access key check for the screening tools.
#[derive(Debug, Clone)]
pub struct AccessGate {
    expected: String,
}

impl AccessGate {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into().trim().to_string(),
        }
    }

    /// 未設定 key 時一律拒絕
    pub fn check(&self, provided: &str) -> Result<()> {
        if self.expected.is_empty() {
            return Err(ReconcileError::Unauthorized {
                message: "no access key is configured".to_string(),
            });
        }

        if provided.trim() != self.expected {
            tracing::warn!("⚠️ Rejected invalid access key");
            return Err(ReconcileError::Unauthorized {
                message: "invalid access key".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_key() {
        let gate = AccessGate::new("open-sesame");
        assert!(gate.check("open-sesame").is_ok());
        assert!(gate.check("  open-sesame\n").is_ok());
    }

    #[test]
    fn test_rejects_wrong_key() {
        let gate = AccessGate::new("open-sesame");
        assert!(matches!(
            gate.check("Open-Sesame"),
            Err(ReconcileError::Unauthorized { .. })
        ));
        assert!(gate.check("").is_err());
    }

    #[test]
    fn test_unconfigured_gate_rejects_everything() {
        let gate = AccessGate::new("   ");
        assert!(gate.check("").is_err());
        assert!(gate.check("anything").is_err());
    }
}
