use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(title = "MovieDB REST"),
    paths(
        routes::root,
        routes::say_hello,
        routes::sum,
        routes::geocode,
        routes::list_actors,
        routes::get_actor,
        routes::create_actor,
        routes::update_actor,
        routes::delete_actor,
        routes::delete_actors,
        routes::list_movies,
        routes::get_movie,
        routes::create_movie,
        routes::update_movie,
        routes::delete_movie,
        routes::delete_movies
    ),
    tags(
        (name = "Actors", description = "Management of the actors catalog."),
        (name = "Movies", description = "Management of the movie catalog."),
        (name = "Other", description = "Other endpoints - not related to Movies.")
    )
)]
pub struct ApiDoc;

/// Interactive docs at `/docs`, backed by the document at `/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/openapi.json", ApiDoc::openapi())
}
