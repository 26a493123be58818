//! services/api/src/pipeline/gate.rs
//!
//! Decides, once at startup, whether a live model backend is available.

use crate::adapters::OpenAiCompletionAdapter;
use crate::config::Config;
use content_pipeline_core::demo::DemoDelay;
use content_pipeline_core::ports::CompletionService;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Either a configured backend or the simulated demo mode.
///
/// Missing credentials are a supported mode, not an error: every pipeline
/// operation has a simulated path that only needs the demo latency bounds.
#[derive(Clone)]
pub enum CredentialGate {
    Live(Arc<dyn CompletionService>),
    Demo(DemoDelay),
}

impl CredentialGate {
    /// Builds the gate from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        match &config.openai_api_key {
            Some(key) => CredentialGate::Live(Arc::new(OpenAiCompletionAdapter::from_credentials(
                key,
                config.openai_api_base.as_deref(),
                config.llm_timeout,
            ))),
            None => CredentialGate::Demo(DemoDelay {
                min: config.demo_delay_min,
                max: config.demo_delay_max,
            }),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, CredentialGate::Live(_))
    }

    pub fn backend(&self) -> Option<&Arc<dyn CompletionService>> {
        match self {
            CredentialGate::Live(backend) => Some(backend),
            CredentialGate::Demo(_) => None,
        }
    }

    /// Sleeps for a random demo latency. A no-op when live.
    pub async fn simulate_latency(&self) {
        if let CredentialGate::Demo(delay) = self {
            let pause = delay.sample(&mut rand::thread_rng());
            debug!("Simulating backend latency of {:?}", pause);
            tokio::time::sleep(pause).await;
        }
    }

    /// The pause between simulated stream lines in demo mode.
    pub fn demo_line_interval(&self) -> Duration {
        match self {
            CredentialGate::Demo(delay) => delay.max / 10,
            CredentialGate::Live(_) => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn missing_key_selects_demo_mode() {
        let gate = CredentialGate::from_config(&config_with(&[("DEMO_DELAY_MIN_MS", "5"), ("DEMO_DELAY_MAX_MS", "9")]));
        assert!(!gate.is_live());
        assert!(gate.backend().is_none());
        match gate {
            CredentialGate::Demo(delay) => {
                assert_eq!(delay.min, Duration::from_millis(5));
                assert_eq!(delay.max, Duration::from_millis(9));
            }
            CredentialGate::Live(_) => panic!("expected demo mode"),
        }
    }

    #[test]
    fn configured_key_selects_live_mode() {
        let gate = CredentialGate::from_config(&config_with(&[("OPENAI_API_KEY", "sk-test")]));
        assert!(gate.is_live());
        assert!(gate.backend().is_some());
        assert_eq!(gate.demo_line_interval(), Duration::ZERO);
    }

    #[tokio::test]
    async fn demo_latency_stays_within_bounds() {
        let gate = CredentialGate::Demo(DemoDelay {
            min: Duration::from_millis(1),
            max: Duration::from_millis(20),
        });
        let started = std::time::Instant::now();
        gate.simulate_latency().await;
        assert!(started.elapsed() >= Duration::from_millis(1));
    }
}
