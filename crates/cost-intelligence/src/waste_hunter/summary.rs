//! Aggregation of waste opportunities into a dashboard summary

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::types::{
    CategoryBreakdown, DataRange, ServiceBreakdown, WasteOpportunity, WasteSummary,
};
use crate::types::ImplementationEffort;

/// Services reported in the breakdown
pub const TOP_SERVICES: usize = 10;
/// Opportunities reported in the summary
pub const TOP_OPPORTUNITIES: usize = 20;
/// Minimum confidence for a quick win
pub const QUICK_WIN_CONFIDENCE: f64 = 80.0;

/// Whether an opportunity can be acted on immediately
pub fn is_quick_win(opportunity: &WasteOpportunity) -> bool {
    opportunity
        .recommendations
        .first()
        .is_some_and(|r| r.effort == ImplementationEffort::Low)
        && opportunity.confidence >= QUICK_WIN_CONFIDENCE
}

pub(crate) fn summarize(
    opportunities: &[WasteOpportunity],
    data_range: DataRange,
    generated_at: DateTime<Utc>,
) -> WasteSummary {
    // Several rules can fire on one resource; cost is counted once and
    // savings never exceed it.
    let mut per_resource: IndexMap<&str, (f64, f64)> = IndexMap::new();
    let mut by_service: IndexMap<&str, ServiceBreakdown> = IndexMap::new();
    let mut summary = WasteSummary {
        total_opportunities: opportunities.len(),
        total_current_cost: 0.0,
        total_potential_savings: 0.0,
        savings_percent: 0.0,
        by_category: Default::default(),
        by_severity: Default::default(),
        by_service: Vec::new(),
        top_opportunities: Vec::new(),
        data_range,
        quick_wins: 0,
        generated_at,
    };

    for opportunity in opportunities {
        let entry = per_resource
            .entry(opportunity.resource_id.as_str())
            .or_insert((opportunity.current_cost, 0.0));
        entry.1 += opportunity.potential_savings;

        let category = summary
            .by_category
            .entry(opportunity.category)
            .or_insert_with(CategoryBreakdown::default);
        category.count += 1;
        category.potential_savings += opportunity.potential_savings;

        *summary.by_severity.entry(opportunity.severity).or_insert(0) += 1;

        let service = by_service
            .entry(opportunity.service_name.as_str())
            .or_insert_with(|| ServiceBreakdown {
                service_name: opportunity.service_name.clone(),
                count: 0,
                potential_savings: 0.0,
            });
        service.count += 1;
        service.potential_savings += opportunity.potential_savings;

        if is_quick_win(opportunity) {
            summary.quick_wins += 1;
        }
    }

    for (cost, savings) in per_resource.values() {
        summary.total_current_cost += cost;
        summary.total_potential_savings += savings.min(*cost);
    }
    summary.savings_percent = if summary.total_current_cost > 0.0 {
        summary.total_potential_savings / summary.total_current_cost * 100.0
    } else {
        0.0
    };

    let mut services: Vec<ServiceBreakdown> = by_service.into_values().collect();
    services.sort_by(|a, b| b.potential_savings.total_cmp(&a.potential_savings));
    services.truncate(TOP_SERVICES);
    summary.by_service = services;

    let mut top = opportunities.to_vec();
    top.sort_by(|a, b| b.potential_savings.total_cmp(&a.potential_savings));
    top.truncate(TOP_OPPORTUNITIES);
    summary.top_opportunities = top;

    summary
}
