//! Plain-text rendering of the dashboard views.

use std::fmt::Write as _;

use client_core::{
    dispatcher::ScoringDispatcher,
    history::{HistoryRow, HistoryView},
    insights::{summary_line, ChartPoint, InsightsView},
    risk::{format_probability, risk_tone, RiskTone},
    FeatureDraft, SessionState, Tab,
};
use colored::{ColoredString, Colorize};
use shared::{
    domain::{FeatureField, FieldControl},
    protocol::ScoredPrediction,
};

const BAR_WIDTH: usize = 40;

fn toned(text: &str, tone: RiskTone) -> ColoredString {
    match tone {
        RiskTone::Alert => text.red().bold(),
        RiskTone::Warning => text.yellow(),
        RiskTone::Positive => text.green(),
    }
}

pub fn tab_bar(session: &SessionState) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == session.active_tab() {
                format!("[{}]", tab.label()).bold().to_string()
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn fields_table(draft: &FeatureDraft) -> String {
    let mut out = String::new();
    for &field in FeatureField::ALL {
        let current = draft.raw(field).unwrap_or("");
        let allowed = match field.control() {
            FieldControl::Text => "text".to_string(),
            FieldControl::Number => "number".to_string(),
            FieldControl::OptionalNumber => "number, empty for none".to_string(),
            FieldControl::Choice(options) => options
                .iter()
                .map(|option| {
                    if option.label == option.value {
                        option.value.to_string()
                    } else {
                        format!("{}={}", option.value, option.label)
                    }
                })
                .collect::<Vec<_>>()
                .join(" | "),
        };
        let _ = writeln!(
            out,
            "{:<17} {:<24} {:<22} {}",
            field.wire_name(),
            field.label(),
            format!("'{current}'"),
            allowed
        );
    }
    out
}

pub fn predict_view(draft: &FeatureDraft, dispatcher: &ScoringDispatcher) -> String {
    let mut out = fields_table(draft);
    let _ = writeln!(out, "{}", dispatcher.status());
    out
}

pub fn prediction_card(prediction: &ScoredPrediction) -> String {
    let tone = risk_tone(&prediction.risk_label);
    format!(
        "Customer: {}\nChurn probability: {}\nRisk: {}\n",
        prediction.customer_id,
        format_probability(prediction.churn_probability),
        toned(&prediction.risk_label, tone)
    )
}

pub fn history_table(view: &HistoryView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.status());
    let _ = writeln!(
        out,
        "{:>6}  {:<16} {:>9}  {:<8} {}",
        "ID", "Customer", "Churn", "Risk", "Predicted at"
    );
    for row in view.rows() {
        match row {
            HistoryRow::Entry(entry) => {
                let risk = format!("{:<8}", entry.risk_label);
                let _ = writeln!(
                    out,
                    "{:>6}  {:<16} {:>9}  {} {}",
                    entry.id,
                    entry.customer_id,
                    entry.churn_probability,
                    toned(&risk, entry.tone),
                    entry.predicted_at
                );
            }
            HistoryRow::Placeholder(text) => {
                let _ = writeln!(out, "{}", text.dimmed());
            }
        }
    }
    out
}

fn bar_chart(out: &mut String, title: &str, points: &[ChartPoint]) {
    let _ = writeln!(out, "{title}");
    for point in points {
        let filled = ((point.churn_pct / 100.0) * BAR_WIDTH as f64)
            .round()
            .clamp(0.0, BAR_WIDTH as f64) as usize;
        let _ = writeln!(
            out,
            "  {:<28} {:<width$} {:.1}%",
            point.category,
            "#".repeat(filled),
            point.churn_pct,
            width = BAR_WIDTH
        );
    }
}

pub fn insights_panel(view: &InsightsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.status());
    if let (Some(stats), Some(series)) = (view.stats(), view.series()) {
        let _ = writeln!(out, "{}", summary_line(stats));
        bar_chart(&mut out, "Churn rate by contract", &series.by_contract);
        bar_chart(
            &mut out,
            "Churn rate by payment method",
            &series.by_payment_method,
        );
    }
    out
}
