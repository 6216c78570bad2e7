use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// SolverConfig — constructor defaults with env-var overrides
// ---------------------------------------------------------------------------

pub const ENV_API_KEY: &str = "CAPTCHA_SCOUT_API_KEY";
pub const ENV_API_BASE_URL: &str = "CAPTCHA_SCOUT_API_BASE_URL";
pub const ENV_DUMP_REQUESTS: &str = "CAPTCHA_SCOUT_DUMP_REQUESTS";
pub const ENV_DUMP_DIR: &str = "CAPTCHA_SCOUT_DUMP_DIR";
pub const ENV_MOUSE_STEP_SIZE: &str = "CAPTCHA_SCOUT_MOUSE_STEP_SIZE";

pub const DEFAULT_API_BASE_URL: &str = "https://www.sadcaptcha.com/api/v1";

/// Tunables for one solving session. One instance per orchestrator; cheap to
/// clone into strategies.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// License key, sent as a query parameter on every solver call.
    pub api_key: String,
    pub api_base_url: String,
    /// When `true`, every outbound request is also written to
    /// `dump_dir/<challenge_type>_request.json` for offline replay.
    pub dump_requests: bool,
    pub dump_dir: PathBuf,
    /// Pixel increment between trajectory samples in the arced-slide sweep.
    pub mouse_step_size: u32,
    /// How long `solve_captcha_if_present` waits for a challenge to show up
    /// before declaring success.
    pub detect_timeout: Duration,
    /// How long to wait for the challenge to disappear after a solve attempt.
    pub verify_timeout: Duration,
    /// Pause between classifier polls.
    pub classify_interval: Duration,
    /// Classifier gives up and returns the `None` sentinel after this many polls.
    pub classify_max_polls: u32,
    /// Full detect → classify → solve → verify attempts before best-effort return.
    pub retries: u32,
}

impl SolverConfig {
    /// Defaults plus env-var overrides. The key argument wins over
    /// `CAPTCHA_SCOUT_API_KEY`; pass an empty string to use the env var alone.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = {
            let k = api_key.into();
            if k.is_empty() {
                std::env::var(ENV_API_KEY).unwrap_or_default()
            } else {
                k
            }
        };
        Self {
            api_key,
            api_base_url: env_string(ENV_API_BASE_URL)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            dump_requests: env_flag(ENV_DUMP_REQUESTS),
            dump_dir: env_string(ENV_DUMP_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            mouse_step_size: env_parse(ENV_MOUSE_STEP_SIZE).unwrap_or(5),
            detect_timeout: Duration::from_secs(15),
            verify_timeout: Duration::from_secs(5),
            classify_interval: Duration::from_secs(1),
            classify_max_polls: 30,
            retries: 3,
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_string(name).and_then(|v| v.parse().ok())
}

fn env_flag(name: &str) -> bool {
    env_string(name)
        .map(|v| {
            matches!(
                v.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}
