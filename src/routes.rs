use std::sync::Arc;

use axum::{extract::State, http::StatusCode};

use crate::{
    AppState,
    error::{AppError, AppResult, ErrorBody},
    extract::{Json, Path, Query},
    models::{
        ActorRequest, ActorResponse, BatchDeleteResponse, CreatedResponse, GeocodeQuery,
        MessageResponse, MovieRequest, MovieResponse, SumQuery,
    },
};

#[utoipa::path(get, path = "/", tag = "Other", responses((status = 200, body = MessageResponse)))]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World"))
}

#[utoipa::path(
    get,
    path = "/hello/{name}",
    tag = "Other",
    params(("name" = String, Path, description = "Name to greet")),
    responses((status = 200, body = MessageResponse))
)]
pub async fn say_hello(Path(name): Path<String>) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!("Hello {name}")))
}

#[utoipa::path(
    get,
    path = "/sum",
    tag = "Other",
    params(SumQuery),
    responses(
        (status = 200, body = i64),
        (status = 400, body = ErrorBody)
    )
)]
pub async fn sum(Query(q): Query<SumQuery>) -> AppResult<Json<i64>> {
    q.x.checked_add(q.y)
        .map(Json)
        .ok_or_else(|| AppError::InvalidInput("x + y is out of range".to_string()))
}

#[utoipa::path(
    get,
    path = "/geocode",
    tag = "Other",
    params(GeocodeQuery),
    responses(
        (status = 200, description = "Upstream reverse-geocoding document, relayed as-is"),
        (status = 502, body = ErrorBody),
        (status = 504, body = ErrorBody)
    )
)]
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GeocodeQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let body = state.geocoder.reverse(q.lat, q.lon).await?;
    Ok(Json(body))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

pub async fn method_not_allowed() -> AppError {
    AppError::Rejected {
        status: StatusCode::METHOD_NOT_ALLOWED,
        detail: "Method Not Allowed".to_string(),
    }
}

// actors

#[utoipa::path(
    get,
    path = "/actors",
    tag = "Actors",
    responses((status = 200, body = Vec<ActorResponse>))
)]
pub async fn list_actors(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<ActorResponse>>> {
    let actors = state.actors.list().await?;
    Ok(Json(actors.into_iter().map(ActorResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/actors/{id}",
    tag = "Actors",
    params(("id" = i32, Path, description = "Actor id")),
    responses(
        (status = 200, body = ActorResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<ActorResponse>> {
    let actor = state.actors.get(id).await?;
    Ok(Json(actor.into()))
}

#[utoipa::path(
    post,
    path = "/actors",
    tag = "Actors",
    request_body = ActorRequest,
    responses(
        (status = 200, body = CreatedResponse),
        (status = 400, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActorRequest>,
) -> AppResult<Json<CreatedResponse>> {
    let id = state.actors.create(req.validate()?).await?;
    Ok(Json(CreatedResponse { message: "Actor has been added successfully!".to_string(), id }))
}

#[utoipa::path(
    put,
    path = "/actors/{id}",
    tag = "Actors",
    params(("id" = i32, Path, description = "Actor id")),
    request_body = ActorRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<ActorRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.actors.update(id, req.validate()?).await?;
    Ok(Json(MessageResponse::new(format!("Actor {id} updated successfully!"))))
}

#[utoipa::path(
    delete,
    path = "/actors/{id}",
    tag = "Actors",
    params(("id" = i32, Path, description = "Actor id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.actors.delete(id).await?;
    Ok(Json(MessageResponse::new(format!("Actor with id {id} deleted successfully!"))))
}

/// Example body: `[5, 6, 10]`.
#[utoipa::path(
    delete,
    path = "/actors/batch",
    tag = "Actors",
    request_body = Vec<i32>,
    responses(
        (status = 200, body = BatchDeleteResponse),
        (status = 400, body = ErrorBody)
    )
)]
pub async fn delete_actors(
    State(state): State<Arc<AppState>>,
    Json(ids): Json<Vec<i32>>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let deleted = state.actors.delete_many(&ids).await?;
    Ok(Json(BatchDeleteResponse::new("actors", ids, deleted)))
}

// movies

#[utoipa::path(
    get,
    path = "/movies",
    tag = "Movies",
    responses((status = 200, body = Vec<MovieResponse>))
)]
pub async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<MovieResponse>>> {
    let movies = state.movies.list().await?;
    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/movies/{id}",
    tag = "Movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, body = MovieResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<MovieResponse>> {
    let movie = state.movies.get(id).await?;
    Ok(Json(movie.into()))
}

#[utoipa::path(
    post,
    path = "/movies",
    tag = "Movies",
    request_body = MovieRequest,
    responses(
        (status = 200, body = CreatedResponse),
        (status = 400, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MovieRequest>,
) -> AppResult<Json<CreatedResponse>> {
    let id = state.movies.create(req.validate()?).await?;
    Ok(Json(CreatedResponse { message: "Movie has been added successfully!".to_string(), id }))
}

#[utoipa::path(
    put,
    path = "/movies/{id}",
    tag = "Movies",
    params(("id" = i32, Path, description = "Movie id")),
    request_body = MovieRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<MovieRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.movies.update(id, req.validate()?).await?;
    Ok(Json(MessageResponse::new(format!("Movie {id} updated successfully!"))))
}

#[utoipa::path(
    delete,
    path = "/movies/{id}",
    tag = "Movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.movies.delete(id).await?;
    Ok(Json(MessageResponse::new(format!("Movie with id {id} deleted successfully!"))))
}

#[utoipa::path(
    delete,
    path = "/movies/batch",
    tag = "Movies",
    request_body = Vec<i32>,
    responses(
        (status = 200, body = BatchDeleteResponse),
        (status = 400, body = ErrorBody)
    )
)]
pub async fn delete_movies(
    State(state): State<Arc<AppState>>,
    Json(ids): Json<Vec<i32>>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let deleted = state.movies.delete_many(&ids).await?;
    Ok(Json(BatchDeleteResponse::new("movies", ids, deleted)))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{actors::ActorCatalog, geocode::GeocodeClient, movies::MovieCatalog};

    async fn test_app() -> Router {
        test_app_with_geocoder("http://127.0.0.1:9").await
    }

    async fn test_app_with_geocoder(base_url: &str) -> Router {
        let db = crate::db::connect_and_migrate("sqlite::memory:").await.unwrap();
        let geocoder = GeocodeClient::new(
            reqwest::Client::new(),
            base_url.to_string(),
            "Mozilla/5.0".to_string(),
            Duration::from_secs(2),
        );
        crate::app(Arc::new(AppState {
            actors: ActorCatalog::new(db.clone()),
            movies: MovieCatalog::new(db),
            geocoder,
        }))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn post_actor(app: &Router, name: &str, surname: &str) -> i64 {
        let (status, body) =
            send(app, "POST", "/actors", Some(json!({"name": name, "surname": surname}))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn greetings() {
        let app = test_app().await;

        assert_eq!(send(&app, "GET", "/", None).await.1, json!({"message": "Hello World"}));
        assert_eq!(
            send(&app, "GET", "/hello/Ada", None).await.1,
            json!({"message": "Hello Ada"})
        );
    }

    #[tokio::test]
    async fn sum_uses_defaults_and_rejects_bad_input() {
        let app = test_app().await;

        assert_eq!(send(&app, "GET", "/sum", None).await, (StatusCode::OK, json!(10)));
        assert_eq!(send(&app, "GET", "/sum?x=3&y=4", None).await, (StatusCode::OK, json!(7)));
        assert_eq!(send(&app, "GET", "/sum?x=-5", None).await, (StatusCode::OK, json!(5)));

        let (status, _) = send(&app, "GET", "/sum?x=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "GET", "/sum?x=9223372036854775807&y=1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "x + y is out of range");
    }

    #[tokio::test]
    async fn creating_the_same_actor_twice_conflicts() {
        let app = test_app().await;

        let (status, body) =
            send(&app, "POST", "/actors", Some(json!({"name": "Tom", "surname": "Hanks"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Actor has been added successfully!");
        assert_eq!(body["id"], 1);

        let (status, body) =
            send(&app, "POST", "/actors", Some(json!({"name": "Tom", "surname": "Hanks"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "Actor already exists in database!");
    }

    #[tokio::test]
    async fn creating_with_empty_fields_is_bad_request() {
        let app = test_app().await;

        for body in [
            json!({"name": "", "surname": "Hanks"}),
            json!({"name": "Tom", "surname": ""}),
            json!({"name": "Tom"}),
            json!({}),
        ] {
            let (status, resp) = send(&app, "POST", "/actors", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["detail"], "All fields: name and surname are required!");
        }

        let (status, resp) = send(&app, "POST", "/movies", Some(json!({"title": "Heat"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["detail"], "All fields title/year/actors are required!");
    }

    #[tokio::test]
    async fn get_returns_created_actor_or_not_found() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/actors/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Actor not found!");

        let id = post_actor(&app, "Meryl", "Streep").await;
        let (status, body) = send(&app, "GET", &format!("/actors/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": id, "name": "Meryl", "surname": "Streep"}));
    }

    #[tokio::test]
    async fn batch_delete_reports_partial_success() {
        let app = test_app().await;

        for i in 1..=10 {
            post_actor(&app, "Actor", &format!("No{i}")).await;
        }
        let (status, _) = send(&app, "DELETE", "/actors/6", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "DELETE", "/actors/batch", Some(json!([5, 6, 10]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "message": "Operation partially successful. Deleted 2 out of 3 requested actors.",
                "requested_ids": [5, 6, 10],
                "actual_deleted_count": 2,
            })
        );

        let (status, body) = send(&app, "DELETE", "/actors/batch", Some(json!([1, 2]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "All selected actors deleted successfully!", "deleted_ids": [1, 2]})
        );
    }

    #[tokio::test]
    async fn batch_delete_with_empty_list_is_bad_request() {
        let app = test_app().await;

        let (status, body) = send(&app, "DELETE", "/actors/batch", Some(json!([]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No actor(s) to remove! Please select at least one actor.");

        let (status, body) = send(&app, "DELETE", "/movies/batch", Some(json!([]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No movie(s) to remove! Please select at least one movie.");
    }

    #[tokio::test]
    async fn update_conflicts_only_with_other_actors() {
        let app = test_app().await;

        post_actor(&app, "Tom", "Hanks").await;
        let id = post_actor(&app, "Tom", "Cruise").await;
        let uri = format!("/actors/{id}");

        let (status, body) =
            send(&app, "PUT", &uri, Some(json!({"name": "Tom", "surname": "Hanks"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "Actor already exists. Update not allowed!");

        let (status, body) =
            send(&app, "PUT", &uri, Some(json!({"name": "Tom", "surname": "Cruise"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Actor {id} updated successfully!"));
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_ids_are_not_found() {
        let app = test_app().await;

        let (status, _) =
            send(&app, "PUT", "/actors/77", Some(json!({"name": "Tom", "surname": "Hanks"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", "/actors/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let movie = json!({"title": "Heat", "year": 1995, "actors": "Al Pacino"});
        let (status, body) = send(&app, "PUT", "/movies/77", Some(movie)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Movie not found!");
        let (status, _) = send(&app, "DELETE", "/movies/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_reflects_store_contents() {
        let app = test_app().await;

        assert_eq!(send(&app, "GET", "/actors", None).await.1, json!([]));

        let a = post_actor(&app, "Tom", "Hanks").await;
        let b = post_actor(&app, "Meg", "Ryan").await;

        let (_, body) = send(&app, "GET", "/actors", None).await;
        assert_eq!(
            body,
            json!([
                {"id": a, "name": "Tom", "surname": "Hanks"},
                {"id": b, "name": "Meg", "surname": "Ryan"},
            ])
        );

        send(&app, "DELETE", &format!("/actors/{a}"), None).await;
        let (_, body) = send(&app, "GET", "/actors", None).await;
        assert_eq!(body, json!([{"id": b, "name": "Meg", "surname": "Ryan"}]));
    }

    #[tokio::test]
    async fn movie_lifecycle() {
        let app = test_app().await;

        let heat = json!({"title": "Heat", "year": 1995, "actors": "Al Pacino, Robert De Niro"});
        let (status, body) = send(&app, "POST", "/movies", Some(heat.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Movie has been added successfully!");
        let id = body["id"].as_i64().unwrap();

        let (status, body) = send(&app, "POST", "/movies", Some(heat)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "Movie already exists!");

        let (_, body) = send(&app, "GET", &format!("/movies/{id}"), None).await;
        assert_eq!(
            body,
            json!({"id": id, "title": "Heat", "year": 1995, "actors": "Al Pacino, Robert De Niro"})
        );

        let ronin = json!({"title": "Ronin", "year": 1998, "actors": "Robert De Niro"});
        let (status, body) = send(&app, "PUT", &format!("/movies/{id}"), Some(ronin)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Movie {id} updated successfully!"));

        let (_, body) = send(&app, "GET", "/movies", None).await;
        assert_eq!(body[0]["title"], "Ronin");

        let (status, body) = send(&app, "DELETE", "/movies/batch", Some(json!([id]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted_ids"], json!([id]));
        assert_eq!(send(&app, "GET", "/movies", None).await.1, json!([]));
    }

    #[tokio::test]
    async fn geocode_validates_params_and_surfaces_upstream_failures() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let app = test_app_with_geocoder(&format!("http://{addr}")).await;

        let (status, _) = send(&app, "GET", "/geocode?lat=50.06", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "GET", "/geocode?lat=50.06&lon=19.90", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["detail"].as_str().unwrap().starts_with("upstream request failed"));
    }

    #[tokio::test]
    async fn openapi_document_lists_tagged_routes() {
        let app = test_app().await;

        let (status, doc) = send(&app, "GET", "/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);

        let tags: Vec<&str> =
            doc["tags"].as_array().unwrap().iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(tags, vec!["Actors", "Movies", "Other"]);
        assert!(doc["paths"]["/actors/batch"]["delete"].is_object());
        assert!(doc["paths"]["/movies/{id}"]["put"].is_object());
    }

    #[tokio::test]
    async fn extractor_failures_use_the_detail_body() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/actors/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string(), "{body}");

        let (status, body) =
            send(&app, "POST", "/actors", Some(json!({"name": 5, "surname": "Hanks"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string(), "{body}");

        let (status, body) = send(&app, "DELETE", "/movies/batch", Some(json!(["a"]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string(), "{body}");

        let (status, body) = send(&app, "GET", "/sum?x=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string(), "{body}");
    }

    #[tokio::test]
    async fn unrouted_requests_use_the_detail_body() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/actors/batch", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["detail"], "Method Not Allowed");

        let (status, body) = send(&app, "GET", "/directors", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Not Found");
    }

    #[tokio::test]
    async fn update_with_incomplete_body_is_bad_request_and_keeps_the_row() {
        let app = test_app().await;

        let id = post_actor(&app, "Tom", "Hanks").await;
        let uri = format!("/actors/{id}");
        let (status, body) = send(&app, "PUT", &uri, Some(json!({"name": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "All fields: name and surname are required!");
        assert_eq!(
            send(&app, "GET", &uri, None).await.1,
            json!({"id": id, "name": "Tom", "surname": "Hanks"})
        );

        let heat = json!({"title": "Heat", "year": 1995, "actors": "Al Pacino"});
        let (_, body) = send(&app, "POST", "/movies", Some(heat)).await;
        let uri = format!("/movies/{}", body["id"]);
        let (status, body) = send(&app, "PUT", &uri, Some(json!({"title": "Heat"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "All fields title/year/actors are required!");
        let (_, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(body["year"], 1995);
        assert_eq!(body["actors"], "Al Pacino");
    }

    #[tokio::test]
    async fn swagger_ui_is_served() {
        let app = test_app().await;

        let request = Request::builder().uri("/docs/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
