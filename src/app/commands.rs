use crate::domain::model::ResourceField;
use crate::utils::error::{AnalyticsError, Result};
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  show                                  print the hospital table
  search [text]                         show only hospitals whose name contains text
  rebalance                             run one staff rebalance pass
  transfer <source> <destination> <n>   move n of every resource between rows
  set <row> <field> <value>             edit one cell (staff, doctors, beds, ct_scanners, mri_machines)
  chart [json]                          print staff percentage per hospital
  help                                  print this help
  quit                                  leave the session";

/// One user action against the hospital table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Show,
    Search(String),
    Rebalance,
    Transfer {
        selection: Vec<usize>,
        buffer: String,
    },
    Set {
        row: usize,
        field: ResourceField,
        value: String,
    },
    Chart {
        json: bool,
    },
    Help,
    Quit,
}

fn parse_row(text: &str) -> Result<usize> {
    text.parse().map_err(|_| {
        AnalyticsError::invalid_input(format!("'{}' is not a row number", text))
    })
}

impl FromStr for Action {
    type Err = AnalyticsError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(command, rest)| (command, rest.trim()))
            .unwrap_or((line, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();

        match command.to_ascii_lowercase().as_str() {
            "show" | "table" => Ok(Action::Show),
            "search" | "find" => Ok(Action::Search(rest.to_string())),
            "rebalance" => Ok(Action::Rebalance),
            "transfer" => {
                // 最後一個參數是緩衝值，缺少時視為空白
                let (rows, buffer) = match args.split_last() {
                    Some((buffer, rows)) if args.len() >= 3 => (rows, *buffer),
                    _ => (args.as_slice(), ""),
                };
                let selection = rows.iter().map(|row| parse_row(row)).collect::<Result<Vec<_>>>()?;
                Ok(Action::Transfer {
                    selection,
                    buffer: buffer.to_string(),
                })
            }
            "set" => match args.as_slice() {
                [row, field, value] => Ok(Action::Set {
                    row: parse_row(row)?,
                    field: field.parse()?,
                    value: value.to_string(),
                }),
                _ => Err(AnalyticsError::invalid_input("usage: set <row> <field> <value>")),
            },
            "chart" => match args.as_slice() {
                [] => Ok(Action::Chart { json: false }),
                ["json"] => Ok(Action::Chart { json: true }),
                _ => Err(AnalyticsError::invalid_input("usage: chart [json]")),
            },
            "help" | "?" => Ok(Action::Help),
            "quit" | "exit" => Ok(Action::Quit),
            other => Err(AnalyticsError::invalid_input(format!(
                "unknown command '{}', type 'help' for a list",
                other
            ))),
        }
    }
}
