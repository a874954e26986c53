//! Page, add and save handlers. Every mutation ends in a redirect back to the
//! page, which is rebuilt from freshly loaded storage.

use axum::{
    body::Bytes,
    extract::{Form, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use url::form_urlencoded;

use crate::render::{to_html, to_svg};
use crate::series::{append_observation, replace_all, today, Observation};
use crate::server::app::AppState;
use crate::server::error::AppError;

pub const ADDED_NOTICE_SUFFIX: &str = "Added a rate for";
pub const SAVED_NOTICE: &str = "Data updated!";

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub game: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub game: String,
}

#[derive(Debug, Deserialize)]
pub struct AddRateForm {
    pub game: String,
    pub rate: String,
}

/// Page location for `game`, carrying an optional notice to display.
pub fn page_url(game: &str, notice: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("game", game);
    if let Some(notice) = notice {
        query.append_pair("notice", notice);
    }
    format!("/?{}", query.finish())
}

fn parse_integer(field: &str, value: &str) -> Result<i64, AppError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::validation(field, format!("'{}' is not an integer", value)))
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::validation("date", format!("'{}' is not a YYYY-MM-DD date", value))
    })
}

pub async fn show_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let series_names = state.store.list()?;
    let today = today();

    let html = match query.game.as_deref().filter(|game| !game.is_empty()) {
        Some(game) => {
            let (_, series) = state.store.open(game)?;
            to_html::render(&to_html::PageView {
                selected: Some((game, &series)),
                notice: query.notice.as_deref(),
                series_names: &series_names,
                today: Some(today),
            })?
        }
        None => to_html::render(&to_html::PageView {
            selected: None,
            notice: query.notice.as_deref(),
            series_names: &series_names,
            today: Some(today),
        })?,
    };

    Ok(Html(html))
}

pub async fn add_rate(
    State(state): State<AppState>,
    Form(form): Form<AddRateForm>,
) -> Result<Redirect, AppError> {
    let rate = parse_integer("rate", &form.rate)?;

    let (location, series) = state.store.open(&form.game)?;
    let series = append_observation(series, rate, today());
    state.store.save(&series, &location)?;

    info!("Added rate {} to '{}' ({} rows)", rate, form.game, series.len());
    let notice = format!("{} {}!", ADDED_NOTICE_SUFFIX, form.game);
    Ok(Redirect::to(&page_url(&form.game, Some(&notice))))
}

/// Grid submission: one `game` field, then `date`, `race_number` and `rate`
/// repeated once per row in display order.
#[derive(Debug, Default, PartialEq)]
pub struct GridSubmission {
    pub game: String,
    pub rows: Vec<Observation>,
}

impl GridSubmission {
    pub fn parse(body: &[u8]) -> Result<Self, AppError> {
        let mut game = String::new();
        let mut dates = Vec::new();
        let mut race_numbers = Vec::new();
        let mut rates = Vec::new();

        for (key, value) in form_urlencoded::parse(body) {
            match key.as_ref() {
                "game" => game = value.into_owned(),
                "date" => dates.push(value.into_owned()),
                "race_number" => race_numbers.push(value.into_owned()),
                "rate" => rates.push(value.into_owned()),
                _ => {}
            }
        }

        if dates.len() != race_numbers.len() || dates.len() != rates.len() {
            return Err(AppError::validation(
                "rows",
                format!(
                    "column lengths differ (date: {}, race_number: {}, rate: {})",
                    dates.len(),
                    race_numbers.len(),
                    rates.len()
                ),
            ));
        }

        let mut rows = Vec::with_capacity(dates.len());
        for ((date, race_number), rate) in dates.iter().zip(&race_numbers).zip(&rates) {
            let blank = [date, race_number, rate].iter().all(|v| v.trim().is_empty());
            if blank {
                continue;
            }
            rows.push(Observation::new(
                parse_date(date)?,
                parse_integer("race_number", race_number)?,
                parse_integer("rate", rate)?,
            ));
        }

        Ok(Self { game, rows })
    }
}

pub async fn save_edits(State(state): State<AppState>, body: Bytes) -> Result<Redirect, AppError> {
    let submission = GridSubmission::parse(&body)?;

    let location = state.store.location(&submission.game)?;
    let series = replace_all(submission.rows);
    state.store.save(&series, &location)?;

    info!("Saved {} edited rows for '{}'", series.len(), submission.game);
    Ok(Redirect::to(&page_url(&submission.game, Some(SAVED_NOTICE))))
}

pub async fn chart_svg(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, AppError> {
    let location = state.store.location(&query.game)?;
    let series = state.store.load(&location)?;
    let svg = to_svg::render(&series)?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
