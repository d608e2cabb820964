use log::warn;
use portfolio_api::model::allocation::Allocation;
use portfolio_api::model::asset::Asset;
use portfolio_api::model::holding::Holding;
use portfolio_api::model::rebalance::{ActionPriority, RebalanceAction, TradeDirection};
use std::collections::HashMap;

/// Positions above this weight rebalance with high priority.
const HIGH_PRIORITY_WEIGHT: f64 = 0.10;

/// Diffs the target allocation against current holdings into concrete
/// buy/sell actions.
///
/// Applying every action to the holdings snapshot reproduces the target
/// quantities exactly; holdings of priced assets outside the allocation are
/// liquidated in full. Actions are ordered high priority first, then by
/// estimated value descending.
pub fn generate(
    allocations: &[Allocation],
    holdings: &[Holding],
    assets: &[Asset],
) -> Vec<RebalanceAction> {
    let prices: HashMap<usize, f64> = assets.iter().map(|a| (a.id(), a.price())).collect();
    let held: HashMap<usize, f64> = holdings.iter().map(|h| (h.asset_id(), h.quantity())).collect();
    let allocated: HashMap<usize, &Allocation> =
        allocations.iter().map(|a| (a.asset_id(), a)).collect();

    let mut actions = Vec::new();

    for allocation in allocations {
        let price = match prices.get(&allocation.asset_id()) {
            Some(p) => *p,
            None => {
                warn!(
                    "no price for allocated asset {}; skipping action",
                    allocation.asset_id()
                );
                continue;
            }
        };
        let current = held.get(&allocation.asset_id()).copied().unwrap_or(0.0);
        let delta = allocation.target_quantity() - current;
        if delta == 0.0 {
            continue;
        }
        let direction = if delta > 0.0 {
            TradeDirection::Buy
        } else {
            TradeDirection::Sell
        };
        let priority = if allocation.target_weight() > HIGH_PRIORITY_WEIGHT {
            ActionPriority::High
        } else {
            ActionPriority::Medium
        };
        actions.push(RebalanceAction::new(
            allocation.asset_id(),
            direction,
            delta.abs(),
            delta.abs() * price,
            priority,
        ));
    }

    // Positions with no target are closed out entirely.
    let mut stray: Vec<&Holding> = holdings
        .iter()
        .filter(|h| h.quantity() > 0.0 && !allocated.contains_key(&h.asset_id()))
        .collect();
    stray.sort_by_key(|h| h.asset_id());
    for holding in stray {
        let price = match prices.get(&holding.asset_id()) {
            Some(p) => *p,
            None => {
                warn!(
                    "no price for held asset {}; cannot generate liquidation",
                    holding.asset_id()
                );
                continue;
            }
        };
        actions.push(RebalanceAction::new(
            holding.asset_id(),
            TradeDirection::Sell,
            holding.quantity(),
            holding.quantity() * price,
            ActionPriority::Medium,
        ));
    }

    actions.sort_by(|a, b| {
        a.priority()
            .cmp(&b.priority())
            .then_with(|| {
                b.estimated_value()
                    .partial_cmp(&a.estimated_value())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.asset_id().cmp(&b.asset_id()))
    });
    actions
}
