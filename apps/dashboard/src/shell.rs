//! Interactive dashboard session on stdin/stdout.

use std::io::Write as _;

use anyhow::{bail, Result};
use client_core::{ChurnApi, Dashboard, DashboardCommand, DashboardEvent, Tab};
use shared::domain::FeatureField;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render;

const HELP: &str = "\
commands:
  tab <predict|history|insights>   switch view
  set <field> <value>              edit a form field (see `fields`)
  clear <field>                    empty a form field
  submit                           score the current form
  show                             redraw the active view
  fields                           list form fields
  help                             this text
  quit                             leave";

#[derive(Debug, PartialEq, Eq)]
enum ShellInput {
    Command(DashboardCommand),
    Show,
    Fields,
    Help,
    Quit,
    Nothing,
}

fn parse_line(line: &str) -> Result<ShellInput> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));
    let input = match verb {
        "" => ShellInput::Nothing,
        "tab" => ShellInput::Command(DashboardCommand::SelectTab(rest.parse::<Tab>()?)),
        "set" => {
            let (name, raw) = rest
                .split_once(char::is_whitespace)
                .map(|(name, raw)| (name, raw.trim()))
                .unwrap_or((rest, ""));
            if name.is_empty() {
                bail!("usage: set <field> <value>");
            }
            ShellInput::Command(DashboardCommand::SetField {
                field: name.parse::<FeatureField>()?,
                raw: raw.to_string(),
            })
        }
        "clear" => ShellInput::Command(DashboardCommand::ClearField(rest.parse::<FeatureField>()?)),
        "submit" => ShellInput::Command(DashboardCommand::Submit),
        "show" => ShellInput::Show,
        "fields" => ShellInput::Fields,
        "help" | "?" => ShellInput::Help,
        "quit" | "exit" => ShellInput::Quit,
        other => bail!("unknown command '{other}', try `help`"),
    };
    Ok(input)
}

fn draw<A: ChurnApi + 'static>(dashboard: &Dashboard<A>) {
    println!("{}", render::tab_bar(dashboard.session()));
    match dashboard.session().active_tab() {
        Tab::Predict => {
            print!(
                "{}",
                render::predict_view(dashboard.form(), dashboard.dispatcher())
            );
            if let Some(prediction) = dashboard.session().last_result() {
                print!("{}", render::prediction_card(prediction));
            }
        }
        Tab::History => print!("{}", render::history_table(dashboard.history())),
        Tab::Insights => print!("{}", render::insights_panel(dashboard.insights())),
    }
}

enum Wake {
    Line(Option<String>),
    Event(DashboardEvent),
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

pub async fn run<A: ChurnApi + 'static>(mut dashboard: Dashboard<A>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");
    draw(&dashboard);
    prompt();

    loop {
        let wake = tokio::select! {
            line = lines.next_line() => Wake::Line(line?),
            Some(event) = dashboard.next_event() => Wake::Event(event),
        };
        match wake {
            Wake::Line(None) => break,
            Wake::Line(Some(line)) => {
                match parse_line(&line) {
                    Ok(ShellInput::Quit) => break,
                    Ok(ShellInput::Nothing) => {}
                    Ok(ShellInput::Help) => println!("{HELP}"),
                    Ok(ShellInput::Fields) => print!("{}", render::fields_table(dashboard.form())),
                    Ok(ShellInput::Show) => draw(&dashboard),
                    Ok(ShellInput::Command(command)) => {
                        debug!(?command, "shell command");
                        let redraw = !matches!(
                            command,
                            DashboardCommand::SetField { .. } | DashboardCommand::ClearField(_)
                        );
                        dashboard.handle(command);
                        if redraw {
                            draw(&dashboard);
                        }
                    }
                    Err(err) => eprintln!("{err}"),
                }
                prompt();
            }
            Wake::Event(event) => {
                dashboard.apply(event);
                println!();
                draw(&dashboard);
                prompt();
            }
        }
    }

    Ok(())
}
