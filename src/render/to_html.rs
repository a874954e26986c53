//! The single interactive page: name field, add form, chart and table editor.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::errors::RenderResult;
use crate::render::to_svg::{self, Chart};
use crate::series::RatingSeries;

pub const PAGE_TITLE: &str = "Rate Tracker by Game";

/// One editable grid row, as strings ready for input fields.
#[derive(Debug, Clone, Serialize)]
struct GridRow {
    date: String,
    race_number: i64,
    rate: i64,
}

/// What the page shows for one request.
#[derive(Debug, Clone, Default)]
pub struct PageView<'a> {
    /// Selected game and its loaded series, if a name was entered.
    pub selected: Option<(&'a str, &'a RatingSeries)>,
    pub notice: Option<&'a str>,
    /// Existing series names offered as suggestions.
    pub series_names: &'a [String],
    pub today: Option<NaiveDate>,
}

pub fn render(view: &PageView<'_>) -> RenderResult<String> {
    let handlebars = crate::common::get_handlebars();

    let (game, series) = match view.selected {
        Some((game, series)) => (Some(game), Some(series)),
        None => (None, None),
    };
    let is_empty = series.map_or(true, RatingSeries::is_empty);

    let chart_svg = match series {
        Some(series) if !series.is_empty() => Some(to_svg::render_chart(&Chart::build(series))?),
        _ => None,
    };

    let rows: Vec<GridRow> = series
        .into_iter()
        .flatten()
        .map(|observation| GridRow {
            date: observation.date.format("%Y-%m-%d").to_string(),
            race_number: observation.race_number,
            rate: observation.rate,
        })
        .collect();

    let res = handlebars.render_template(
        &get_template(),
        &json!({
            "title": PAGE_TITLE,
            "has_game": game.is_some(),
            "game": game,
            "notice": view.notice,
            "series_names": view.series_names,
            "is_empty": is_empty,
            "no_data_notice": to_svg::NO_DATA_NOTICE,
            "chart_svg": chart_svg,
            "next_race_number": rows.len() + 1,
            "rows": rows,
            "today": view.today.map(|day| day.format("%Y-%m-%d").to_string()),
        }),
    )?;
    Ok(res)
}

pub fn get_template() -> String {
    include_str!("to_html.hbs").to_string()
}
