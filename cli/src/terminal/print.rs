use colored::*;

pub const TOTAL_WIDTH: usize = 64;

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    println!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right).bright_black()
    );
}

pub fn fat_separator() {
    println!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub fn status(msg: &str) {
    println!("{} {}", ">".bright_black(), msg);
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx);
    println!("{} {}", idx_str.bright_black(), name.bright_green().bold());
}

pub fn as_tree_one_level(key_value_pairs: Vec<(String, ColoredString)>) {
    for (i, (key, value)) in key_value_pairs.iter().enumerate() {
        let last: bool = i + 1 == key_value_pairs.len();
        let branch: ColoredString = if last {
            "└─".bright_black()
        } else {
            "├─".bright_black()
        };
        let dots: String = ".".repeat(8usize.saturating_sub(key.len()));
        println!(
            " {} {}{}{} {}",
            branch,
            key,
            dots.bright_black(),
            ":".bright_black(),
            value
        );
    }
}

pub fn centerln(msg: &str) {
    let width: usize = console::measure_text_width(msg);
    let space: String = " ".repeat(TOTAL_WIDTH.saturating_sub(width) / 2);
    println!("{}{}", space, msg);
}
