//! Optional request persistence for offline replay. Never load-bearing: any
//! failure is logged and swallowed.

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::config::SolverConfig;
use crate::core::types::ChallengeType;

/// Write the outbound request to `<dump_dir>/<challenge_type>_request.json`
/// when `dump_requests` is enabled.
pub fn maybe_dump_request<T: Serialize>(
    config: &SolverConfig,
    challenge_type: ChallengeType,
    request: &T,
) {
    if !config.dump_requests {
        return;
    }
    let path = config
        .dump_dir
        .join(format!("{}_request.json", challenge_type.as_str()));
    let json = match serde_json::to_string_pretty(request) {
        Ok(json) => json,
        Err(e) => {
            warn!(%challenge_type, error = %e, "could not serialize request for dumping");
            return;
        }
    };
    match std::fs::write(&path, json) {
        Ok(()) => debug!(path = %path.display(), "dumped request"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not dump request"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SwapTwoRequest;

    #[test]
    fn dump_writes_file_named_after_challenge_type() {
        let dir = std::env::temp_dir().join(format!("captcha-scout-dump-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut config = SolverConfig::new("key");
        config.dump_requests = true;
        config.dump_dir = dir.clone();

        let request = SwapTwoRequest {
            image_b64: "QUFB".into(),
        };
        maybe_dump_request(&config, ChallengeType::SwapTwo, &request);

        let written = std::fs::read_to_string(dir.join("swap_two_request.json")).unwrap();
        assert!(written.contains("\"imageB64\": \"QUFB\""));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn dump_disabled_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("captcha-scout-nodump-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut config = SolverConfig::new("key");
        config.dump_dir = dir.clone();

        maybe_dump_request(
            &config,
            ChallengeType::SwapTwo,
            &SwapTwoRequest {
                image_b64: "QUFB".into(),
            },
        );
        assert!(!dir.join("swap_two_request.json").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
