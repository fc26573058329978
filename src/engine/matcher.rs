use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::assignment::AssignmentEvent;
use crate::models::driver::Driver;
use crate::models::order::Order;
use crate::state::AppState;

/// Outcome of a single matcher tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub pending: usize,
    pub available: usize,
    pub matched: usize,
    pub failed: usize,
}

pub async fn run_matcher(state: Arc<AppState>, interval: Duration, shutdown: CancellationToken) {
    info!(?interval, "matcher started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; matching starts one interval in.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                match_pending_orders(&state);
            }
        }
    }

    info!("matcher stopped");
}

/// Runs one matching pass: pairs the oldest pending orders with the
/// longest-idle available drivers. Failed pairs are left for the next tick.
///
/// The two reads are independent, so either side may change before the
/// assignment; the store re-validates both records and rejects stale pairs.
pub fn match_pending_orders(state: &AppState) -> MatchReport {
    let start = Instant::now();
    state.metrics.matcher_ticks_total.inc();

    let mut pending = state.store.list_pending_orders();
    let mut available = state.store.list_available_drivers();

    state.metrics.pending_orders.set(pending.len() as i64);
    state.metrics.available_drivers.set(available.len() as i64);

    let mut report = MatchReport {
        pending: pending.len(),
        available: available.len(),
        ..MatchReport::default()
    };

    if pending.is_empty() {
        debug!("no pending orders");
        return finish(state, report, start);
    }
    if available.is_empty() {
        info!(pending = pending.len(), "no available drivers for pending orders");
        return finish(state, report, start);
    }

    pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    available.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then_with(|| a.id.cmp(&b.id)));

    assign_pairs(state, &pending, &available, &mut report);

    finish(state, report, start)
}

/// Attempts each order/driver pair in turn. A rejected pair is counted and
/// skipped; the remaining pairs are still attempted.
fn assign_pairs(
    state: &AppState,
    pending: &[Order],
    available: &[Driver],
    report: &mut MatchReport,
) {
    for (order, driver) in pending.iter().zip(available.iter()) {
        match state.store.assign_order_to_driver(&order.id, &driver.id) {
            Ok(_) => {
                report.matched += 1;
                state
                    .metrics
                    .assignments_total
                    .with_label_values(&["success"])
                    .inc();
                info!(order_id = %order.id, driver_id = %driver.id, "order assigned");

                let event = AssignmentEvent {
                    order_id: order.id.clone(),
                    driver_id: driver.id.clone(),
                    assigned_at: Utc::now(),
                };
                if let Err(err) = state.assignment_events_tx.send(event) {
                    debug!(order_id = %err.0.order_id, "no assignment feed subscribers");
                }
            }
            Err(err) => {
                report.failed += 1;
                state
                    .metrics
                    .assignments_total
                    .with_label_values(&["error"])
                    .inc();
                if err.is_not_found() {
                    debug!(
                        order_id = %order.id,
                        driver_id = %driver.id,
                        error = %err,
                        "pair vanished before assignment"
                    );
                } else {
                    warn!(
                        order_id = %order.id,
                        driver_id = %driver.id,
                        error = %err,
                        "assignment failed; retrying next tick"
                    );
                }
            }
        }
    }
}

fn finish(state: &AppState, report: MatchReport, start: Instant) -> MatchReport {
    state
        .metrics
        .matcher_tick_seconds
        .observe(start.elapsed().as_secs_f64());

    if report.matched > 0 || report.failed > 0 {
        info!(
            matched = report.matched,
            failed = report.failed,
            pending = report.pending,
            available = report.available,
            "matcher tick completed"
        );
    }

    report
}
