use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::load_log;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;

const OP_MAX_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    let Ok(re) = Regex::new(r"\x1B\[[0-9;]*[mK]") else {
        return s.to_string();
    };
    re.replace_all(s, "").into_owned()
}

/// ANSI color for an operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "sync" => Colour::Green,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = DbPool::new(&cfg.database)?;
        print_log(&pool)?;
    }

    Ok(())
}

fn print_log(pool: &DbPool) -> AppResult<()> {
    let entries: Vec<(i64, String, String, String, String)> = load_log(&pool.conn)?
        .into_iter()
        .map(|row| {
            let date = chrono::DateTime::parse_from_rfc3339(&row.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(row.date);

            let op_target = if row.target.is_empty() {
                row.operation.clone()
            } else {
                format!("{} ({})", row.operation, row.target)
            };

            (row.id, date, row.operation, op_target, row.message)
        })
        .collect();

    if entries.is_empty() {
        println!("📜 Internal log is empty.");
        return Ok(());
    }

    let op_w = entries
        .iter()
        .map(|(_, _, _, op_target, _)| op_target.len())
        .max()
        .unwrap_or(10)
        .min(OP_MAX_WIDTH);
    let id_w = entries
        .iter()
        .map(|(id, _, _, _, _)| id.to_string().len())
        .max()
        .unwrap_or(1);
    let date_w = entries
        .iter()
        .map(|(_, date, _, _, _)| date.len())
        .max()
        .unwrap_or(10);

    println!("📜 Internal log:\n");

    for (id, date, operation, op_target, message) in entries {
        let color = color_for_operation(&operation);

        let visible = if op_target.chars().count() > OP_MAX_WIDTH {
            let mut s = op_target.chars().take(OP_MAX_WIDTH - 3).collect::<String>();
            s.push_str("...");
            s
        } else {
            op_target
        };

        // only the operation word is colored
        let colored = match visible.split_once(' ') {
            Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
            None => color.paint(visible.as_str()).to_string(),
        };

        let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

        println!(
            "{:>id_w$}: {:<date_w$} | {}{} => {}",
            id,
            date,
            colored,
            padding,
            message,
            id_w = id_w,
            date_w = date_w
        );
    }

    Ok(())
}
