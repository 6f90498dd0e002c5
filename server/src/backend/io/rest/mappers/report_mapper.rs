use crate::backend::domain::models::format_date;
use crate::backend::domain::{SaldoReport, SpendingSeries};
use shared::{GraphDataResponse, GraphPoint, SaldoResponse};

pub struct ReportMapper;

impl ReportMapper {
    pub fn to_saldo_response(report: SaldoReport) -> SaldoResponse {
        SaldoResponse {
            date: format_date(report.date),
            cycle_start: format_date(report.cycle.start),
            cycle_end: format_date(report.cycle.end),
            day_index: report.cycle.day_index,
            days_in_cycle: report.cycle.days_in_cycle,
            monthly_budget: report.monthly_budget,
            spend_today: report.spend_today,
            allowed_cumulative: report.allowed_cumulative,
            spent_cumulative: report.spent_cumulative,
            saldo: report.saldo,
            tomorrow_allowance: report.tomorrow_allowance,
        }
    }

    pub fn to_graph_response(series: SpendingSeries) -> GraphDataResponse {
        GraphDataResponse {
            from: format_date(series.from),
            to: format_date(series.to),
            monthly_budget: series.monthly_budget,
            points: series
                .points
                .into_iter()
                .map(|point| GraphPoint {
                    date: format_date(point.date),
                    spend: point.spend,
                    cumulative: point.cumulative_spend,
                    budget_cum: point.cumulative_budget,
                    saldo: point.saldo,
                })
                .collect(),
        }
    }
}
