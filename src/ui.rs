use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::loader::LoadStatus;
use crate::model::UiData;
use crate::records::{SortDirection, COLUMNS};

const MAX_COLUMN_WIDTH: usize = 24;
const NO_RECORDS_TEXT: &str = "No records found";

pub fn draw(uidata: &UiData, frame: &mut Frame) {
    let [search_area, table_area, pages_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_search(uidata, frame, search_area);

    match &uidata.load_status {
        LoadStatus::Loading => {
            frame.render_widget(
                Paragraph::new("Loading ...").centered().block(titled_block()),
                table_area,
            );
        }
        LoadStatus::Failed(message) => {
            frame.render_widget(
                Paragraph::new(message.clone().red())
                    .centered()
                    .block(titled_block()),
                table_area,
            );
        }
        LoadStatus::Loaded => {
            draw_table(uidata, frame, table_area);
            draw_pagination(uidata, frame, pages_area);
        }
    }

    draw_status(uidata, frame, status_area);
}

fn titled_block() -> Block<'static> {
    Block::bordered()
        .title(Line::from(" Applications List ".bold()).centered())
        .border_set(border::THICK)
}

fn draw_search(uidata: &UiData, frame: &mut Frame, area: Rect) {
    let block = Block::bordered().title(" Search by name, status or student ID ");
    let inner = block.inner(area);
    frame.render_widget(
        Paragraph::new(uidata.search.as_str()).block(block),
        area,
    );
    if uidata.search_active {
        frame.set_cursor_position((search_cursor_x(inner, uidata.search_cursor), inner.y));
    }
}

/// Keep the cursor inside the input box when the query outgrows it.
fn search_cursor_x(inner: Rect, cursor: usize) -> u16 {
    inner.x + (cursor.min(inner.width.saturating_sub(1) as usize)) as u16
}

fn draw_table(uidata: &UiData, frame: &mut Frame, area: Rect) {
    let header = Row::new(COLUMNS.iter().map(|column| {
        let marker = match (column.sort_key(), uidata.sort) {
            (Some(key), Some((active, direction))) if key == active => {
                match direction {
                    SortDirection::Ascending => " ▲",
                    SortDirection::Descending => " ▼",
                }
            }
            _ => "",
        };
        Cell::from(format!("{}{marker}", column.header())).bold()
    }));

    let widths = column_widths(uidata);

    let rows: Vec<Row> = if uidata.rows.is_empty() {
        vec![Row::new(vec![Cell::from(NO_RECORDS_TEXT.italic())])]
    } else {
        uidata
            .rows
            .iter()
            .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.as_str()))))
            .collect()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block());
    frame.render_widget(table, area);
}

/// Width per column: widest of header and visible cells, capped.
fn column_widths(uidata: &UiData) -> Vec<Constraint> {
    COLUMNS
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let content = uidata
                .rows
                .iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0);
            let width = column.header().len().max(content).min(MAX_COLUMN_WIDTH);
            Constraint::Length(width as u16 + 2)
        })
        .collect()
}

fn draw_pagination(uidata: &UiData, frame: &mut Frame, area: Rect) {
    let mut spans: Vec<Span> = vec![Span::from(" ")];
    for page in 1..=uidata.total_pages {
        let label = format!(" {page} ");
        if page == uidata.current_page {
            spans.push(label.bold().reversed());
        } else {
            spans.push(Span::from(label));
        }
        spans.push(Span::from(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).centered(), area);
}

fn draw_status(uidata: &UiData, frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        " /".blue().bold(),
        " search ".into(),
        "a/n/d".blue().bold(),
        " sort ".into(),
        "←/→ 1-9".blue().bold(),
        " page ".into(),
        "q".blue().bold(),
        " quit ".into(),
    ]);
    let summary = match uidata.load_status {
        LoadStatus::Loaded => format!(
            "{} | {} of {} records, page {}/{}",
            uidata.status_message,
            uidata.filtered_count,
            uidata.total_count,
            uidata.current_page,
            uidata.total_pages
        ),
        _ => uidata.status_message.clone(),
    };
    let [hints_area, summary_area] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(summary.len() as u16 + 1)])
            .areas(area);
    frame.render_widget(Paragraph::new(hints), hints_area);
    frame.render_widget(Paragraph::new(summary).right_aligned(), summary_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_cursor_stays_inside_the_input_box() {
        let inner = Rect::new(1, 1, 10, 1);
        assert_eq!(search_cursor_x(inner, 0), 1);
        assert_eq!(search_cursor_x(inner, 5), 6);
        // a query longer than the box pins the cursor to the last cell
        assert_eq!(search_cursor_x(inner, 50), 10);
    }

    #[test]
    fn search_cursor_handles_a_collapsed_box() {
        let inner = Rect::new(3, 1, 0, 1);
        assert_eq!(search_cursor_x(inner, 7), 3);
    }
}
