use std::fmt;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

#[derive(Clone, Copy)]
enum Kind {
    Info,
    Success,
    Warning,
    Error,
}

impl Kind {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Kind::Info => (FG_BLUE, "ℹ️"),
            Kind::Success => (FG_GREEN, "✅"),
            Kind::Warning => (FG_YELLOW, "⚠️"),
            Kind::Error => (FG_RED, "❌"),
        }
    }
}

fn emit<T: fmt::Display>(kind: Kind, msg: T) {
    let (color, icon) = kind.style();
    let line = format!("{}{}{} {}{}", color, BOLD, icon, RESET, msg);
    match kind {
        Kind::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    emit(Kind::Info, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    emit(Kind::Success, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    log::warn!("{msg}");
    emit(Kind::Warning, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    emit(Kind::Error, msg);
}

/// Section header above a listing.
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}{}==== {}{}\n", FG_BLUE, BOLD, msg, RESET);
}
