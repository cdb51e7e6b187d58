use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Local, NaiveDate};
use nf_core::{
    export_file_name, Article, ArticleTable, CollectionRun, DatePreset, DateRange, ExportFormat,
    FetchFailure, FilterCriteria, TableSummary,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CollectRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectResponse {
    pub collected_at: DateTime<Local>,
    pub summary: TableSummary,
    pub failures: Vec<FetchFailure>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub collected_at: DateTime<Local>,
    pub summary: TableSummary,
    pub keywords: Vec<String>,
    pub sources: Vec<String>,
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticlesResponse {
    pub total: usize,
    pub articles: Vec<Article>,
}

/// Filter options as query parameters; list values are comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub search: Option<String>,
    pub keywords: Option<String>,
    pub sources: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub preset: Option<String>,
}

impl FilterQuery {
    pub fn to_criteria(&self, table: &ArticleTable, today: NaiveDate) -> Result<FilterCriteria, ApiError> {
        let bounds = table.date_bounds();
        let date_range = match self.preset.as_deref().filter(|p| !p.is_empty()) {
            Some(preset) => preset.parse::<DatePreset>()?.resolve(today, bounds),
            None if self.from.is_some() || self.to.is_some() => {
                DateRange::resolve(self.from, self.to, bounds)?
            }
            None => None,
        };

        Ok(FilterCriteria {
            search_text: self.search.clone().filter(|s| !s.is_empty()),
            keywords: split_list(self.keywords.as_deref()).collect(),
            sources: split_list(self.sources.as_deref()).collect(),
            date_range,
        })
    }
}

fn split_list(value: Option<&str>) -> impl Iterator<Item = String> + '_ {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

async fn latest_run(state: &AppState) -> Result<CollectionRun, ApiError> {
    state.latest().await.ok_or(ApiError::NotCollected)
}

/// The latest table under `query`, plus whether any filter was active.
async fn filtered_table(
    state: &AppState,
    query: &FilterQuery,
) -> Result<(ArticleTable, bool), ApiError> {
    let run = latest_run(state).await?;
    let criteria = query.to_criteria(&run.table, Local::now().date_naive())?;
    Ok((run.table.filter(&criteria), !criteria.is_unrestricted()))
}

pub async fn list_keywords(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.keywords.clone())
}

pub async fn collect(
    State(state): State<Arc<AppState>>,
    request: Option<Json<CollectRequest>>,
) -> Result<Json<CollectResponse>, ApiError> {
    let keywords = match request {
        Some(Json(request)) if !request.keywords.is_empty() => request.keywords,
        _ => state.keywords.clone(),
    };
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ApiError::InvalidRequest("Keywords must not be blank".to_string()));
    }

    info!("🚀 Collecting articles for {} keywords", keywords.len());
    let run = state.collector.collect(&keywords).await;

    let message = if run.is_empty() {
        "No articles found. Try again later.".to_string()
    } else {
        format!("Collection complete! Found {} unique articles", run.table.len())
    };
    let response = CollectResponse {
        collected_at: run.collected_at,
        summary: run.summary(),
        failures: run.failures.clone(),
        message,
    };

    state.replace(run).await;
    Ok(Json(response))
}

pub async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<SummaryResponse>, ApiError> {
    let run = latest_run(&state).await?;
    Ok(Json(SummaryResponse {
        collected_at: run.collected_at,
        summary: run.summary(),
        keywords: run.table.keywords().into_iter().map(str::to_string).collect(),
        sources: run.table.sources().into_iter().map(str::to_string).collect(),
        date_bounds: run.table.date_bounds(),
    }))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let (table, _) = filtered_table(&state, &query).await?;
    Ok(Json(ArticlesResponse {
        total: table.len(),
        articles: table.into_articles(),
    }))
}

pub async fn export_articles(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, ApiError> {
    let format = format
        .parse::<ExportFormat>()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let (table, is_filtered) = filtered_table(&state, &query).await?;
    let body = format.render(&table)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(format, is_filtered, Local::now())
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
