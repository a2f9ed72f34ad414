use colored::{Color, Colorize};
use kanri_core::board::Board;
use kanri_core::task::{Task, TaskStatus};
use prettytable::{format, Cell, Row, Table};

/// Column accent colors, the board's usual palette: todo blue, doing yellow,
/// done green.
pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Blue,
        TaskStatus::Doing => Color::Yellow,
        TaskStatus::Done => Color::Green,
    }
}

pub fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "To Be Done",
        TaskStatus::Doing => "Is Being Done",
        TaskStatus::Done => "Is Done",
    }
}

pub fn parse_status(input: &str) -> eyre::Result<TaskStatus> {
    input
        .parse::<TaskStatus>()
        .map_err(|_| eyre::eyre!("unknown column '{input}', expected 'todo', 'doing' or 'done'"))
}

/// Render the three columns side by side, one row per position.
pub fn print_board(board: &Board) {
    let columns: Vec<Vec<&Task>> = TaskStatus::ALL
        .iter()
        .map(|status| board.column(*status))
        .collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);

    if height == 0 {
        println!(
            "{}",
            "The board is empty, add a task with `kanri add <text>`.".yellow()
        );
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(
        TaskStatus::ALL
            .iter()
            .map(|status| {
                Cell::new(
                    &status_label(*status)
                        .color(status_color(*status))
                        .bold()
                        .to_string(),
                )
            })
            .collect(),
    ));

    for index in 0..height {
        let cells = columns
            .iter()
            .map(|column| match column.get(index) {
                Some(task) => Cell::new(&format_task(task)),
                None => Cell::new(""),
            })
            .collect();
        table.add_row(Row::new(cells));
    }

    table.printstd();
}

fn format_task(task: &Task) -> String {
    let id: String = task.id.chars().take(8).collect();
    format!("{} {}", id.dimmed(), task.text)
}
