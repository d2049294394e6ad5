//! Serve command - runs the bookbinder web server.
//!
//! Thin page controllers: each handler verifies the anti-forgery token,
//! binds the submitted form, delegates the list diff to the reconciler,
//! collects the result in a change set, and commits once.

use std::{path::PathBuf, sync::Arc};

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tokio::signal::unix::{SignalKind, signal};
use tower_cookies::{CookieManagerLayer, Cookies};
use tracing_subscriber::EnvFilter;

use bookbinder::{
    form::{AuthorForm, BookForm, bind_author_form},
    fragment::{InsertionAddress, blank_item},
    model::{Book, EntityId},
    reconcile::reconcile,
    seed::seed_demo_data,
    store::{AuthorStore, ChangeSet, InMemory, Sqlite},
};

use crate::antiforgery::{AntiForgery, TOKEN_FIELD};
use crate::backend::{JSON_FILE, create_store};
use crate::cli::ServeArgs;
use crate::templates::{
    FormMode, author_detail_page, author_form_page, authors_index_page, book_item_fragment,
    delete_confirm_page,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<dyn AuthorStore>,
    antiforgery: AntiForgery,
}

/// Run the bookbinder server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("bookbinder=info".parse().unwrap()),
        )
        .init();

    // Create the storage backend
    let store = create_store(args).await?;

    if args.seed {
        seed_demo_data(store.as_ref()).await?;
    }

    // Create shared application state
    let app_state = AppState {
        store,
        antiforgery: AntiForgery::new(),
    };

    // Build router
    let app = Router::new()
        .route("/", get(handle_root_request))
        .route("/health", get(handle_health_endpoint))
        .route("/authors", get(handle_authors_index))
        .route(
            "/authors/new",
            get(handle_create_page).post(handle_create_submit),
        )
        .route(
            "/authors/books/new",
            get(handle_blank_book).post(handle_blank_book),
        )
        .route("/authors/{id}", get(handle_author_detail))
        .route(
            "/authors/{id}/edit",
            get(handle_edit_page).post(handle_edit_submit),
        )
        .route(
            "/authors/{id}/delete",
            get(handle_delete_page).post(handle_delete_submit),
        )
        .layer(CookieManagerLayer::new())
        .with_state(app_state.clone());

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    // Print startup message
    println!("Bookbinder server started");
    println!();
    println!("Web interface: http://localhost:{}", local_addr.port());
    println!();
    println!("Available endpoints:");
    println!("  GET  /                     - Redirect to the author list");
    println!("  GET  /health               - Health check (JSON)");
    println!("  GET  /authors              - Author list");
    println!("  GET  /authors/new          - Create author form");
    println!("  POST /authors/new          - Create author submission");
    println!("  GET  /authors/books/new    - Blank book row fragment");
    println!("  GET  /authors/:id          - Author details");
    println!("  GET  /authors/:id/edit     - Edit author form");
    println!("  POST /authors/:id/edit     - Edit author submission");
    println!("  GET  /authors/:id/delete   - Delete confirmation");
    println!("  POST /authors/:id/delete   - Delete author");
    println!();
    println!("Press Ctrl+C to shutdown");

    let data_dir = args.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to set up SIGTERM handler");
            let mut sigint =
                signal(SignalKind::interrupt()).expect("failed to set up SIGINT handler");

            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
                _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
            }

            // Save the store on shutdown (only needed for the InMemory backend)
            if let Some(in_memory) = app_state.store.as_any().downcast_ref::<InMemory>() {
                let json_path = data_dir.join(JSON_FILE);
                match in_memory.save_to_file(&json_path) {
                    Ok(_) => {
                        tracing::info!("Store saved to {}", json_path.display());
                        println!("\nStore saved successfully");
                    }
                    Err(e) => {
                        tracing::error!("Failed to save store: {e:?}");
                        eprintln!("Failed to save store: {e:?}");
                    }
                }
            }
        })
        .await?;

    println!("Server shut down");
    Ok(())
}

/// Map a domain error onto the response a browser should see.
fn error_response(err: bookbinder::Error) -> Response {
    if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Author not found").into_response()
    } else if err.is_conflict() {
        (StatusCode::CONFLICT, format!("Conflicting submission: {err}")).into_response()
    } else if err.is_bind_error() {
        (StatusCode::BAD_REQUEST, format!("Invalid form submission: {err}")).into_response()
    } else {
        tracing::error!("Request failed: {err}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
    }
}

/// Pull the anti-forgery token field out of the raw form pairs.
fn submitted_token(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(name, _)| name == TOKEN_FIELD)
        .map(|(_, value)| value.as_str())
}

const FORGERY_REJECTED: (StatusCode, &str) =
    (StatusCode::FORBIDDEN, "Anti-forgery token missing or invalid");

// ============================================================================
// Page Handlers
// ============================================================================

/// Handler for GET / - Root redirect
async fn handle_root_request() -> Redirect {
    Redirect::to("/authors")
}

/// Handler for GET /authors - Author list
async fn handle_authors_index(State(state): State<AppState>) -> Response {
    match state.store.fetch_all().await {
        Ok(authors) => Html(authors_index_page(&authors)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Handler for GET /authors/:id - Author details
async fn handle_author_detail(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Response {
    match state.store.fetch_with_books(id).await {
        Ok(Some(author)) => Html(author_detail_page(&author)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Author not found").into_response(),
        Err(e) => error_response(e),
    }
}

/// Handler for GET /authors/new - Create author form
async fn handle_create_page(State(state): State<AppState>, cookies: Cookies) -> Response {
    let token = state.antiforgery.issue(&cookies).await;
    Html(author_form_page(
        FormMode::Create,
        &AuthorForm::blank(),
        &[],
        &token,
    ))
    .into_response()
}

/// Handler for POST /authors/new - Create author submission
async fn handle_create_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    if !state
        .antiforgery
        .verify(&cookies, submitted_token(&pairs))
        .await
    {
        return FORGERY_REJECTED.into_response();
    }

    let form = match bind_author_form(&pairs) {
        Ok(form) => form,
        Err(e) => return error_response(e),
    };

    let errors = form.validate();
    if !errors.is_empty() {
        let token = state.antiforgery.issue(&cookies).await;
        return Html(author_form_page(FormMode::Create, &form, &errors, &token))
            .into_response();
    }

    let mut changes = ChangeSet::new();
    changes.add(form.to_author());
    match state.store.commit(changes).await {
        Ok(()) => Redirect::to("/authors").into_response(),
        Err(e) => error_response(e),
    }
}

/// Handler for GET /authors/books/new - One blank book row fragment.
///
/// Stateless: the fragment is derived entirely from the query parameters,
/// so the in-progress form never has to be saved to ask for another row.
async fn handle_blank_book(Query(address): Query<InsertionAddress>) -> Html<String> {
    let item = blank_item(&address, BookForm::blank);
    Html(book_item_fragment(&item.field_prefix, item.key, &item.item))
}

/// Handler for GET /authors/:id/edit - Edit author form
async fn handle_edit_page(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<EntityId>,
) -> Response {
    let author = match state.store.fetch_with_books(id).await {
        Ok(Some(author)) => author,
        Ok(None) => return (StatusCode::NOT_FOUND, "Author not found").into_response(),
        Err(e) => return error_response(e),
    };

    let token = state.antiforgery.issue(&cookies).await;
    Html(author_form_page(
        FormMode::Edit,
        &AuthorForm::from_author(&author),
        &[],
        &token,
    ))
    .into_response()
}

/// Handler for POST /authors/:id/edit - Edit author submission
async fn handle_edit_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<EntityId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    if !state
        .antiforgery
        .verify(&cookies, submitted_token(&pairs))
        .await
    {
        return FORGERY_REJECTED.into_response();
    }

    let form = match bind_author_form(&pairs) {
        Ok(form) => form,
        Err(e) => return error_response(e),
    };

    // The submitted identity must match the resource being edited.
    if form.id != id {
        return (StatusCode::NOT_FOUND, "Author not found").into_response();
    }

    let errors = form.validate();
    if !errors.is_empty() {
        let token = state.antiforgery.issue(&cookies).await;
        return Html(author_form_page(FormMode::Edit, &form, &errors, &token))
            .into_response();
    }

    let mut author = match state.store.fetch_with_books(id).await {
        Ok(Some(author)) => author,
        Ok(None) => return (StatusCode::NOT_FOUND, "Author not found").into_response(),
        Err(e) => return error_response(e),
    };

    author.first_name = form.first_name.clone();
    author.last_name = form.last_name.clone();

    let report = match reconcile::<Book>(&mut author.books, &form.books) {
        Ok(report) => report,
        Err(e) => return error_response(e),
    };
    tracing::info!(
        author_id = id,
        added = report.added,
        removed = report.removed,
        updated = report.updated,
        "Reconciled book list"
    );

    let mut changes = ChangeSet::new();
    changes.mark_updated(author);
    match state.store.commit(changes).await {
        Ok(()) => Redirect::to("/authors").into_response(),
        Err(e) => error_response(e),
    }
}

/// Handler for GET /authors/:id/delete - Delete confirmation
async fn handle_delete_page(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<EntityId>,
) -> Response {
    let author = match state.store.fetch_with_books(id).await {
        Ok(Some(author)) => author,
        Ok(None) => return (StatusCode::NOT_FOUND, "Author not found").into_response(),
        Err(e) => return error_response(e),
    };

    let token = state.antiforgery.issue(&cookies).await;
    Html(delete_confirm_page(&author, &token)).into_response()
}

/// Handler for POST /authors/:id/delete - Delete author
async fn handle_delete_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<EntityId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    if !state
        .antiforgery
        .verify(&cookies, submitted_token(&pairs))
        .await
    {
        return FORGERY_REJECTED.into_response();
    }

    let mut changes = ChangeSet::new();
    changes.remove(id);
    match state.store.commit(changes).await {
        Ok(()) => Redirect::to("/authors").into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Health Handler
// ============================================================================

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: &'static str,
}

/// Handler for GET /health - Health check endpoint
async fn handle_health_endpoint(State(state): State<AppState>) -> axum::Json<HealthResponse> {
    let any = state.store.as_any();
    let backend = if any.is::<Sqlite>() {
        "sqlite"
    } else if any.is::<InMemory>() {
        "inmemory"
    } else {
        "unknown"
    };

    axum::Json(HealthResponse {
        status: "healthy",
        backend,
    })
}
