use crate::config::{CalculatorConfig, SubmissionPolicy};
use crate::core::collector::FormCollector;
use crate::core::renderer::{present, render};
use crate::domain::model::{CalculationOutcome, RenderedResult};
use crate::domain::ports::{FormSource, PricingEngine, ResultView};
use crate::utils::error::ErrorSeverity;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub const CONNECTIVITY_FAILURE: &str = "Could not connect to the calculation engine.";

/// How a single submission ended. The user has already been notified.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rendered { ticket: u64, result: RenderedResult },
    Rejected { ticket: u64, message: String },
    TransportFailed { ticket: u64 },
    InvalidInput { message: String },
    /// A newer submission was issued before this one completed.
    Stale { ticket: u64 },
    /// Refused because another submission is in flight.
    Busy,
}

impl SubmitOutcome {
    /// Exit status for a one-shot command-line submission: 0 rendered,
    /// 1 invalid input, 2 server rejection, 3 transport failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            SubmitOutcome::Rendered { .. } => 0,
            SubmitOutcome::InvalidInput { .. } => ErrorSeverity::High.exit_code(),
            SubmitOutcome::Rejected { .. } => ErrorSeverity::Medium.exit_code(),
            SubmitOutcome::TransportFailed { .. } => ErrorSeverity::Critical.exit_code(),
            // nothing reached the user, nothing failed
            SubmitOutcome::Stale { .. } | SubmitOutcome::Busy => 0,
        }
    }
}

/// Clears the in-flight flag when the submission ends, however it ends.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Drives submit → collect → send → render-or-notify.
pub struct SubmitHandler<E: PricingEngine, V: ResultView> {
    engine: E,
    view: V,
    collector: FormCollector,
    policy: SubmissionPolicy,
    latest_ticket: AtomicU64,
    in_flight: AtomicBool,
}

impl<E: PricingEngine, V: ResultView> SubmitHandler<E, V> {
    pub fn new(engine: E, view: V, collector: FormCollector, policy: SubmissionPolicy) -> Self {
        Self {
            engine,
            view,
            collector,
            policy,
            latest_ticket: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn from_config(engine: E, view: V, config: &CalculatorConfig) -> Self {
        Self::new(
            engine,
            view,
            FormCollector::new(config.numeric_policy()),
            config.submission_policy(),
        )
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn latest_ticket(&self) -> u64 {
        self.latest_ticket.load(Ordering::Acquire)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest_ticket() == ticket
    }

    pub async fn submit<F: FormSource + ?Sized>(&self, form: &F) -> SubmitOutcome {
        let _flight = match self.policy {
            SubmissionPolicy::SingleFlight => match FlightGuard::acquire(&self.in_flight) {
                Some(guard) => Some(guard),
                None => {
                    tracing::debug!("Submission refused: a calculation is already in flight");
                    return SubmitOutcome::Busy;
                }
            },
            SubmissionPolicy::LatestWins => None,
        };

        let ticket = self.latest_ticket.fetch_add(1, Ordering::AcqRel) + 1;

        let request = match self.collector.collect(form) {
            Ok(request) => request,
            Err(e) => {
                let message = e.user_friendly_message();
                tracing::warn!("Submission #{} not sent: {}", ticket, e);
                self.view.alert(&message);
                return SubmitOutcome::InvalidInput { message };
            }
        };

        tracing::info!("Submission #{} sent (quality class {:?})", ticket, request.quality_class);
        let result = self.engine.calculate(&request).await;

        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding response for submission #{}; #{} is newer",
                ticket,
                self.latest_ticket()
            );
            return SubmitOutcome::Stale { ticket };
        }

        match result {
            Ok(CalculationOutcome::Priced(response)) => {
                let rendered = render(&response);
                present(&self.view, &rendered);
                tracing::info!("Submission #{} priced at {}", ticket, rendered.final_price);
                SubmitOutcome::Rendered {
                    ticket,
                    result: rendered,
                }
            }
            Ok(CalculationOutcome::Rejected(rejection)) => {
                let message = format!("Error: {}", rejection.error);
                tracing::warn!(
                    "Submission #{} rejected with status {}: {}",
                    ticket,
                    rejection.status,
                    rejection.error
                );
                self.view.alert(&message);
                SubmitOutcome::Rejected { ticket, message }
            }
            Err(e) => {
                tracing::error!("Calculation Error: {}", e);
                self.view.alert(CONNECTIVITY_FAILURE);
                SubmitOutcome::TransportFailed { ticket }
            }
        }
    }
}
