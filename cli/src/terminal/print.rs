use colored::*;
use hostsweep_common::response::NO_ACTIVE_DEVICES;
use tracing::info;

pub const PRINT_TARGET: &str = "hostsweep::print";
pub const TOTAL_WIDTH: usize = 64;

const SEPARATOR: Color = Color::BrightBlack;
const PRIMARY: Color = Color::BrightGreen;
const TEXT_DEFAULT: Color = Color::White;

/// Plain terminal output, printed without a level symbol.
pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: String = format!(
        "{}{}{}",
        "─".repeat(left).color(SEPARATOR),
        formatted.to_uppercase().color(PRIMARY),
        "─".repeat(right).color(SEPARATOR)
    );

    print(&line);
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).color(SEPARATOR);
    print(&format!("{}", sep));
}

pub fn aligned_line(key: &str, value: ColoredString, key_width: usize) {
    let dots: String = ".".repeat((key_width + 1).saturating_sub(key.len()));
    let colon: String = format!("{}{}", dots.color(SEPARATOR), ":".color(SEPARATOR));
    print_status(format!("{}{} {}", key.color(PRIMARY), colon, value));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(TEXT_DEFAULT));
    print(&message);
}

pub fn error_line(msg: &str) {
    print(&format!("{}", msg.red().bold()));
}

pub fn no_results() {
    header("zero devices detected");
    print(&format!("{}", NO_ACTIVE_DEVICES.red().bold()));
}
