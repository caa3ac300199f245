use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, prepare_api_url},
    ChurnApi, Dashboard, DashboardCommand, HttpChurnApi, Tab,
};
use shared::domain::FeatureField;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;
mod shell;

#[derive(Parser, Debug)]
#[command(about = "Churn prediction dashboard")]
struct Cli {
    /// Base URL of the churn scoring service. Overrides dashboard.toml and
    /// CHURN_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the feature fields, their allowed values and defaults.
    Fields,
    /// Score one customer built from the default form plus overrides.
    Predict {
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Show the most recent predictions.
    History,
    /// Show churn analytics for the dataset.
    Insights,
    /// Probe the scoring service.
    Health,
    /// Interactive dashboard session (default).
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    let api_url = prepare_api_url(&settings.api_url)?;
    info!(api_url = %api_url, "using churn service");
    let api = Arc::new(HttpChurnApi::new(api_url));

    match cli.command.unwrap_or(Command::Shell) {
        Command::Fields => {
            let dashboard = Dashboard::new(api);
            print!("{}", render::fields_table(dashboard.form()));
        }
        Command::Predict { set } => {
            let mut dashboard = Dashboard::new(api);
            for assignment in &set {
                let (field, raw) = parse_assignment(assignment)?;
                dashboard.handle(DashboardCommand::SetField { field, raw });
            }
            dashboard.handle(DashboardCommand::Submit);
            dashboard.settle().await;

            println!("{}", dashboard.dispatcher().status());
            let Some(prediction) = dashboard.session().last_result() else {
                bail!("prediction failed");
            };
            print!("{}", render::prediction_card(prediction));
            print!("{}", render::history_table(dashboard.history()));
        }
        Command::History => {
            let mut dashboard = Dashboard::new(api);
            dashboard.handle(DashboardCommand::SelectTab(Tab::History));
            dashboard.settle().await;
            print!("{}", render::history_table(dashboard.history()));
        }
        Command::Insights => {
            let mut dashboard = Dashboard::new(api);
            dashboard.handle(DashboardCommand::SelectTab(Tab::Insights));
            dashboard.settle().await;
            print!("{}", render::insights_panel(dashboard.insights()));
        }
        Command::Health => {
            let health = api
                .health()
                .await
                .with_context(|| format!("churn service at {} is not reachable", api.base_url()))?;
            println!("{}: {}", health.status, health.message);
        }
        Command::Shell => shell::run(Dashboard::new(api)).await?,
    }

    Ok(())
}

/// Parses a `FIELD=VALUE` override. The field is matched by wire name.
fn parse_assignment(assignment: &str) -> Result<(FeatureField, String)> {
    let Some((name, raw)) = assignment.split_once('=') else {
        bail!("expected FIELD=VALUE, got '{assignment}'");
    };
    let field = name.trim().parse::<FeatureField>()?;
    Ok((field, raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        let (field, raw) = parse_assignment("customerID=A=B").expect("assignment");
        assert_eq!(field, FeatureField::CustomerId);
        assert_eq!(raw, "A=B");
    }

    #[test]
    fn assignment_keeps_empty_value() {
        let (field, raw) = parse_assignment("TotalCharges=").expect("assignment");
        assert_eq!(field, FeatureField::TotalCharges);
        assert_eq!(raw, "");
    }

    #[test]
    fn assignment_rejects_unknown_field_and_missing_equals() {
        assert!(parse_assignment("Age=40").is_err());
        assert!(parse_assignment("tenure").is_err());
    }

    #[test]
    fn cli_accepts_global_api_url_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dashboard",
            "predict",
            "--set",
            "tenure=3",
            "--api-url",
            "http://scoring:8000",
        ])
        .expect("parse");
        assert_eq!(cli.api_url.as_deref(), Some("http://scoring:8000"));
        match cli.command {
            Some(Command::Predict { set }) => assert_eq!(set, vec!["tenure=3".to_string()]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
