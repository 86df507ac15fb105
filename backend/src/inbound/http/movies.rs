//! Catalog API handlers.
//!
//! ```text
//! GET    /api/v1/movies?limit=10&offset=0
//! GET    /api/v1/movies/deleted              (admin)
//! GET    /api/v1/movies/{id-or-title}
//! POST   /api/v1/movies                      (admin)
//! PATCH  /api/v1/movies/{id}                 (admin)
//! DELETE /api/v1/movies/{id}                 (admin)
//! POST   /api/v1/movies/{id}/restore         (admin)
//! POST   /api/v1/movies/sync                 (admin)
//! ```
//!
//! Register [`list_deleted`] and [`sync`] before [`find`] so their literal
//! segments win over the `{term}` matcher.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    DeletionScope, Movie, MovieChanges, MovieDraft, MoviePage, RoleName, RoleRequirement,
    SyncReport,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, LookupTerm, map_movie_validation_error, parse_movie_id,
};

const MANAGE_CATALOG: RoleRequirement = RoleRequirement::any_of(&[RoleName::Admin]);
const ID_FIELD: FieldName = FieldName::new("id");

/// Stored movie as returned to clients.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub director: String,
    pub release_date: String,
    pub opening: Option<String>,
    pub producer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id.to_string(),
            title: movie.key.title().to_owned(),
            director: movie.key.director().to_owned(),
            release_date: movie.details.release_date,
            opening: movie.details.opening,
            producer: movie.details.producer,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
            deleted_at: movie.deleted_at,
        }
    }
}

/// One page of movies.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePageResponse {
    pub items: Vec<MovieResponse>,
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
}

impl From<MoviePage> for MoviePageResponse {
    fn from(page: MoviePage) -> Self {
        Self {
            items: page.movies.into_iter().map(MovieResponse::from).collect(),
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

/// Query string for `GET /movies`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

/// Body for `POST /movies`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: String,
    pub director: String,
    pub release_date: String,
    pub opening: Option<String>,
    pub producer: Option<String>,
}

/// Body for `PATCH /movies/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub director: Option<String>,
    pub release_date: Option<String>,
    pub opening: Option<String>,
    pub producer: Option<String>,
}

impl From<UpdateMovieRequest> for MovieChanges {
    fn from(request: UpdateMovieRequest) -> Self {
        Self {
            title: request.title,
            director: request.director,
            release_date: request.release_date,
            opening: request.opening,
            producer: request.producer,
        }
    }
}

/// List active movies ordered by title.
#[get("/movies")]
pub async fn list(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<MoviePageResponse>> {
    let page = state.movies.list(query.limit, query.offset).await?;
    Ok(web::Json(page.into()))
}

/// List soft-deleted movies, most recently deleted first.
#[get("/movies/deleted")]
pub async fn list_deleted(
    state: web::Data<HttpState>,
    principal: Authenticated,
) -> ApiResult<web::Json<Vec<MovieResponse>>> {
    principal.require(&state, &MANAGE_CATALOG).await?;
    let movies = state.movies.list_deleted().await?;
    Ok(web::Json(movies.into_iter().map(MovieResponse::from).collect()))
}

/// Fetch an active movie by id, or by exact title when the term is not a
/// UUID.
#[get("/movies/{term}")]
pub async fn find(
    state: web::Data<HttpState>,
    term: web::Path<String>,
) -> ApiResult<web::Json<MovieResponse>> {
    let movie = match LookupTerm::classify(&term) {
        LookupTerm::Id(id) => state.movies.find_by_id(&id, DeletionScope::ActiveOnly).await?,
        LookupTerm::Title(title) => state.movies.find_by_title(&title).await?,
    };
    Ok(web::Json(movie.into()))
}

/// Create a movie.
#[post("/movies")]
pub async fn create(
    state: web::Data<HttpState>,
    principal: Authenticated,
    payload: web::Json<CreateMovieRequest>,
) -> ApiResult<HttpResponse> {
    principal.require(&state, &MANAGE_CATALOG).await?;
    let CreateMovieRequest {
        title,
        director,
        release_date,
        opening,
        producer,
    } = payload.into_inner();
    let draft = MovieDraft::try_from_parts(&title, &director, &release_date, opening, producer)
        .map_err(map_movie_validation_error)?;
    let movie = state.movie_commands.create(&draft).await?;
    Ok(HttpResponse::Created().json(MovieResponse::from(movie)))
}

/// Apply a partial update to an active movie.
#[patch("/movies/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    principal: Authenticated,
    id: web::Path<String>,
    payload: web::Json<UpdateMovieRequest>,
) -> ApiResult<web::Json<MovieResponse>> {
    principal.require(&state, &MANAGE_CATALOG).await?;
    let id = parse_movie_id(&id, ID_FIELD)?;
    let changes = MovieChanges::from(payload.into_inner());
    let movie = state.movie_commands.update(&id, &changes).await?;
    Ok(web::Json(movie.into()))
}

/// Soft-delete an active movie.
#[delete("/movies/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    principal: Authenticated,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    principal.require(&state, &MANAGE_CATALOG).await?;
    let id = parse_movie_id(&id, ID_FIELD)?;
    state.movie_commands.soft_delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Clear a movie's deletion mark.
#[post("/movies/{id}/restore")]
pub async fn restore(
    state: web::Data<HttpState>,
    principal: Authenticated,
    id: web::Path<String>,
) -> ApiResult<web::Json<MovieResponse>> {
    principal.require(&state, &MANAGE_CATALOG).await?;
    let id = parse_movie_id(&id, ID_FIELD)?;
    let movie = state.movie_commands.restore(&id).await?;
    Ok(web::Json(movie.into()))
}

/// Run one reconciliation pass against the film feed.
#[post("/movies/sync")]
pub async fn sync(
    state: web::Data<HttpState>,
    principal: Authenticated,
) -> ApiResult<web::Json<SyncReport>> {
    principal.require(&state, &MANAGE_CATALOG).await?;
    let report = state.sync.sync_all().await?;
    Ok(web::Json(report))
}

/// Register every catalog route in the required order.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(list_deleted)
        .service(sync)
        .service(find)
        .service(create)
        .service(update)
        .service(remove)
        .service(restore);
}
