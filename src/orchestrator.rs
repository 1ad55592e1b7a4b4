//! Interpretation orchestration

use crate::ads::AdGate;
use crate::lotto::NumberSet;
use crate::parser::{self, Interpretation};
use crate::prompt::{self, DreamText, ValidationError};
use crate::provider::{GenerateProvider, GenerateRequest, ProviderError};
use crate::HaemongConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from interpretation orchestration
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Input rejected before any network call
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Another interpretation is already in flight
    #[error("이미 해몽이 진행 중입니다. 잠시만 기다려주세요.")]
    Busy,

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Sets shown after the first ad; the remaining two come after the second.
pub const FIRST_REVEAL: usize = 3;

/// Drives one interpretation: validate, prompt, call the model, parse.
pub struct Orchestrator {
    config: HaemongConfig,
    provider: Arc<dyn GenerateProvider>,
    ad_gate: Arc<dyn AdGate>,
    in_flight: AtomicBool,
}

impl Orchestrator {
    pub fn new(
        config: HaemongConfig,
        provider: Arc<dyn GenerateProvider>,
        ad_gate: Arc<dyn AdGate>,
    ) -> Self {
        Self {
            config,
            provider,
            ad_gate,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Interpret a dream. Everything up to the provider response can fail;
    /// parsing cannot. Submissions are serialized: a call while another is
    /// in flight returns [`OrchestratorError::Busy`] without touching the
    /// network.
    pub async fn interpret(&self, text: &str) -> Result<Interpretation, OrchestratorError> {
        let dream = DreamText::new(text)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(OrchestratorError::Busy);
        }

        let result = self.interpret_inner(&dream).await;
        self.in_flight.store(false, Ordering::Release);
        result
    }

    async fn interpret_inner(
        &self,
        dream: &DreamText,
    ) -> Result<Interpretation, OrchestratorError> {
        let request = GenerateRequest::from_prompt(prompt::build_prompt(dream))
            .with_generation(self.config.temperature, self.config.max_output_tokens);

        info!(
            provider = self.provider.name(),
            model = self.provider.model(),
            "Requesting interpretation"
        );

        let raw = self.provider.generate(&request).await?;
        debug!(content_len = raw.len(), "Got model response");

        Ok(parser::parse(&raw))
    }

    /// Wait out the first ad, then hand back the first three sets.
    ///
    /// `Interpretation` carries 5 sets when it comes out of the parser, but
    /// its fields are public; a shorter hand-built value must not panic.
    pub async fn reveal_first<'a>(&self, interpretation: &'a Interpretation) -> &'a [NumberSet] {
        self.ad_gate.wait().await;
        let cut = interpretation.sets.len().min(FIRST_REVEAL);
        &interpretation.sets[..cut]
    }

    /// Wait out the second ad, then hand back the remaining sets.
    pub async fn reveal_second<'a>(&self, interpretation: &'a Interpretation) -> &'a [NumberSet] {
        self.ad_gate.wait().await;
        let cut = interpretation.sets.len().min(FIRST_REVEAL);
        &interpretation.sets[cut..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::NoAdGate;
    use crate::parser::SET_COUNT;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct CannedProvider {
        response: String,
        calls: AtomicUsize,
    }

    impl CannedProvider {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerateProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "test"
        }

        async fn generate(&self, _request: &GenerateRequest) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    /// Blocks inside generate() until released, so tests can observe the
    /// in-flight state deterministically.
    struct BlockingProvider {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl GenerateProvider for BlockingProvider {
        fn name(&self) -> &str {
            "blocking"
        }

        fn model(&self) -> &str {
            "test"
        }

        async fn generate(&self, _request: &GenerateRequest) -> Result<String, ProviderError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok("[동양적 관점]\nA\n[서양적 관점]\nB".to_string())
        }
    }

    fn orchestrator_with(provider: Arc<dyn GenerateProvider>) -> Orchestrator {
        Orchestrator::new(HaemongConfig::default(), provider, Arc::new(NoAdGate))
    }

    #[tokio::test]
    async fn test_interpret_end_to_end() {
        let provider = Arc::new(CannedProvider::new(
            "[동양적 관점]\n길몽입니다.\n[서양적 관점]\n성장의 신호입니다.\n[로또 번호]\n1세트: 1,2,3,4,5,6",
        ));
        let orchestrator = orchestrator_with(provider.clone());

        let result = orchestrator.interpret("하늘을 나는 꿈을 꿨습니다").await.unwrap();
        assert_eq!(result.eastern, "길몽입니다.");
        assert_eq!(result.western, "성장의 신호입니다.");
        assert_eq!(result.sets.len(), SET_COUNT);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_input_never_reaches_the_provider() {
        let provider = Arc::new(CannedProvider::new("unused"));
        let orchestrator = orchestrator_with(provider.clone());

        let err = orchestrator.interpret("용꿈").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Validation(ValidationError::TooShort)));

        let err = orchestrator.interpret("   ").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Validation(ValidationError::Empty)));

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_submit_is_rejected() {
        let provider = Arc::new(BlockingProvider {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let orchestrator = Arc::new(orchestrator_with(provider.clone()));

        let first = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.interpret("돼지가 집으로 들어오는 꿈").await })
        };
        provider.entered.notified().await;

        let err = orchestrator.interpret("돼지가 집으로 들어오는 꿈").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Busy));

        provider.release.notify_one();
        let result = first.await.unwrap().unwrap();
        assert_eq!(result.eastern, "A");

        // the slot frees up once the first call finishes
        assert!(!orchestrator.in_flight.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_staged_reveal_splits_three_then_two() {
        let provider = Arc::new(CannedProvider::new("no markers at all"));
        let orchestrator = orchestrator_with(provider);

        let result = orchestrator.interpret("오래된 집이 무너지는 꿈을 꿨다").await.unwrap();
        let first = orchestrator.reveal_first(&result).await;
        let second = orchestrator.reveal_second(&result).await;
        assert_eq!(first.len(), FIRST_REVEAL);
        assert_eq!(second.len(), SET_COUNT - FIRST_REVEAL);
        assert_eq!(
            first.iter().chain(second.iter()).collect::<Vec<_>>().len(),
            SET_COUNT
        );
    }

    #[tokio::test]
    async fn test_reveal_tolerates_short_handmade_results() {
        let provider = Arc::new(CannedProvider::new("unused"));
        let orchestrator = orchestrator_with(provider);

        let short = Interpretation {
            eastern: "A".to_string(),
            western: "B".to_string(),
            sets: vec![crate::lotto::generate(), crate::lotto::generate()],
        };
        let first = orchestrator.reveal_first(&short).await;
        let second = orchestrator.reveal_second(&short).await;
        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
    }
}
