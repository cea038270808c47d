//! Notification delivery contract
//!
//! The core never renders or vibrates anything itself. The UI shell
//! implements [`NotificationGateway`]; [`NotificationRelay`] adapts it to
//! the signal stream so the tracker can stay gateway-agnostic. Calls are
//! fire-and-forget; delivery failures are not the core's concern.

use quarry_types::Severity;

use crate::signals::{GameSignal, SignalHandler, TimerRole};

/// Host-supplied notification surface.
pub trait NotificationGateway {
    fn notify_timer_warning(&mut self);
    fn notify_hiding_period_ended(&mut self);
    fn show_toast(&mut self, message: &str, severity: Severity);
}

/// Bridges [`GameSignal`]s onto a [`NotificationGateway`].
#[derive(Debug)]
pub struct NotificationRelay<G> {
    gateway: G,
}

impl<G: NotificationGateway> NotificationRelay<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn into_inner(self) -> G {
        self.gateway
    }
}

impl<G: NotificationGateway> SignalHandler for NotificationRelay<G> {
    fn handle_signal(&mut self, signal: &GameSignal) {
        match signal {
            GameSignal::TimerWarning { role, remaining_secs, .. } => match role {
                TimerRole::HidingPeriod => self.gateway.notify_timer_warning(),
                TimerRole::Question => self.gateway.show_toast(
                    &format!("{remaining_secs}s left to answer"),
                    Severity::Warning,
                ),
            },
            GameSignal::HidingPeriodEnded { .. } => self.gateway.notify_hiding_period_ended(),
            GameSignal::QuestionTimeExpired { .. } => self
                .gateway
                .show_toast("Response time is up", Severity::Error),
            GameSignal::CurseCleared { name, reason, .. } => self.gateway.show_toast(
                &format!("{name} cleared ({})", reason.as_str()),
                Severity::Info,
            ),
            GameSignal::TrapTriggered {
                station_name,
                bonus_minutes,
                ..
            } => self.gateway.show_toast(
                &format!("Time trap sprung at {station_name}: +{bonus_minutes} min"),
                Severity::Success,
            ),
            GameSignal::QuestionVetoed { .. } => {
                self.gateway.show_toast("Question vetoed", Severity::Info);
            }
            // Phase and pause changes are rendered directly by the UI
            GameSignal::PhaseChanged { .. }
            | GameSignal::GamePaused { .. }
            | GameSignal::GameResumed { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::deck::ClearReason;

    use super::*;

    #[derive(Default)]
    struct FakeGateway {
        timer_warnings: u32,
        period_ended: u32,
        toasts: Vec<(String, Severity)>,
    }

    impl NotificationGateway for FakeGateway {
        fn notify_timer_warning(&mut self) {
            self.timer_warnings += 1;
        }

        fn notify_hiding_period_ended(&mut self) {
            self.period_ended += 1;
        }

        fn show_toast(&mut self, message: &str, severity: Severity) {
            self.toasts.push((message.to_string(), severity));
        }
    }

    #[test]
    fn signals_map_onto_the_gateway() {
        let mut relay = NotificationRelay::new(FakeGateway::default());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        relay.handle_signals(&[
            GameSignal::TimerWarning {
                role: TimerRole::HidingPeriod,
                remaining_secs: 60,
                timestamp: now,
            },
            GameSignal::HidingPeriodEnded { timestamp: now },
            GameSignal::CurseCleared {
                curse_id: "silent-map".to_string(),
                name: "Curse of the Silent Map".to_string(),
                reason: ClearReason::Expired,
                timestamp: now,
            },
            GameSignal::TrapTriggered {
                station_name: "Old Mill".to_string(),
                bonus_minutes: 5,
                timestamp: now,
            },
        ]);

        let gateway = relay.into_inner();
        assert_eq!(gateway.timer_warnings, 1);
        assert_eq!(gateway.period_ended, 1);
        assert_eq!(gateway.toasts.len(), 2);
        assert_eq!(
            gateway.toasts[0].0,
            "Curse of the Silent Map cleared (expired)"
        );
        assert_eq!(gateway.toasts[1].1, Severity::Success);
    }
}
