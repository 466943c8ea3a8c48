use super::ui;
use crate::core::quote::{ChartData, ChartInterval, ChartRange, QuoteProvider};
use chrono::DateTime;
use comfy_table::{Cell, CellAlignment};
use futures::future::join_all;

/// Lowest and highest price over the chart points.
fn price_span(chart: &ChartData) -> Option<(f64, f64)> {
    chart.data.iter().map(|p| p.price).fold(None, |span, price| {
        Some(match span {
            None => (price, price),
            Some((low, high)) => (low.min(price), high.max(price)),
        })
    })
}

pub fn render_table(results: &[(String, Option<ChartData>)]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Price"),
        ui::header_cell("Prev Close"),
        ui::header_cell("Change"),
        ui::header_cell("Low"),
        ui::header_cell("High"),
        ui::header_cell("Points"),
        ui::header_cell("Last Point"),
    ]);

    for (symbol, chart) in results {
        let Some(chart) = chart else {
            table.add_row(vec![
                Cell::new(symbol),
                Cell::new("No data"),
                ui::na_cell(true),
            ]);
            continue;
        };

        let span = price_span(chart);
        let last_point = chart
            .data
            .last()
            .and_then(|p| DateTime::from_timestamp(p.timestamp, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string());

        table.add_row(vec![
            Cell::new(&chart.meta.symbol),
            Cell::new(format!("{:.2}", chart.meta.regular_market_price))
                .set_alignment(CellAlignment::Right),
            ui::format_optional_cell(chart.meta.previous_close, |p| format!("{p:.2}")),
            chart
                .meta
                .change_percent()
                .map_or_else(|| ui::na_cell(false), ui::change_cell),
            ui::format_optional_cell(span.map(|(low, _)| low), |v| format!("{v:.2}")),
            ui::format_optional_cell(span.map(|(_, high)| high), |v| format!("{v:.2}")),
            Cell::new(chart.data.len()).set_alignment(CellAlignment::Right),
            ui::format_optional_cell(last_point, |s| s),
        ]);
    }

    table.to_string()
}

/// Fetches all symbols concurrently and renders one row per symbol.
pub async fn run(
    provider: &dyn QuoteProvider,
    symbols: &[String],
    range: ChartRange,
    interval: ChartInterval,
) -> String {
    let pb = ui::new_spinner("Fetching quotes...");

    let fetches = symbols.iter().map(|symbol| async move {
        let chart = provider.fetch_chart(symbol, range, interval).await;
        (symbol.to_uppercase(), chart)
    });
    let results: Vec<(String, Option<ChartData>)> = join_all(fetches).await;
    pb.finish_and_clear();

    format!(
        "{} ({range}, {interval})\n\n{}",
        ui::style_text("Market Watch", ui::StyleType::Title),
        render_table(&results)
    )
}
