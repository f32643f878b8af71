//! Route handlers and application wiring.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use switchyard_http::{App, HandlerResult, Reply, Request, Response};
use tracing::info;

use crate::pages;
use crate::store::UserStore;

/// Body accepted by `POST /users`.
#[derive(Debug, Deserialize)]
struct NewUser {
    #[serde(default = "unknown_name")]
    name: String,
    #[serde(default)]
    email: String,
}

fn unknown_name() -> String {
    "Unknown".to_owned()
}

/// Build the demo application over `store`.
pub fn build_app(store: Arc<UserStore>) -> App {
    let mut app = App::new();

    app.route("/").to(index);
    app.route("/hello").to(hello);

    let users = Arc::clone(&store);
    app.route("/users")
        .methods("GET")
        .to(move |req| list_users(&users, req));

    let users = Arc::clone(&store);
    app.route("/users")
        .methods("POST")
        .to(move |req| create_user(&users, req));

    app.route("/form").methods("GET").to(show_form);

    app.route("/form")
        .methods("POST")
        .to(move |req| submit_form(&store, req));

    app
}

fn index(_req: &Request) -> HandlerResult {
    Ok(Reply::from(pages::INDEX))
}

fn hello(req: &Request) -> HandlerResult {
    let name = req.query().first("name").unwrap_or("World");
    Ok(Reply::from(pages::hello(name)))
}

fn list_users(store: &UserStore, req: &Request) -> HandlerResult {
    let users = match req.query().first("search") {
        Some(needle) if !needle.is_empty() => store.search(needle),
        _ => store.all(),
    };
    Ok(Reply::from(Response::json(&users, 200)?))
}

fn create_user(store: &UserStore, req: &Request) -> HandlerResult {
    let response = match req.json_as::<NewUser>() {
        Ok(new_user) => {
            let user = store.insert(new_user.name, new_user.email);
            info!(id = user.id, name = %user.name, "user created");
            Response::json(&json!({ "message": "User created", "user": user }), 201)?
        }
        Err(err) => Response::json(&json!({ "error": err.to_string() }), 400)?,
    };
    Ok(Reply::from(response))
}

fn show_form(_req: &Request) -> HandlerResult {
    Ok(Reply::from(pages::FORM))
}

fn submit_form(store: &UserStore, req: &Request) -> HandlerResult {
    let form = match req.form() {
        Ok(form) => form,
        Err(err) => {
            let page = format!(
                "<html><body><h1>Error: {}</h1></body></html>",
                pages::escape(&err.to_string())
            );
            return Ok(Reply::from(Response::with_status(page, 400)));
        }
    };

    let name = form.first("name").unwrap_or_default();
    let email = form.first("email").unwrap_or_default();
    if name.is_empty() || email.is_empty() {
        return Ok(Reply::from(Response::with_status(pages::FORM_REJECTED, 400)));
    }

    let page = pages::form_submitted(name, email);
    let user = store.insert(name.to_owned(), email.to_owned());
    info!(id = user.id, name = %user.name, "user created from form");
    Ok(Reply::from(page))
}
