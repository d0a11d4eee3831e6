//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod adoptions;
#[allow(clippy::missing_errors_doc)]
pub mod animals;
#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod habits;
#[allow(clippy::missing_errors_doc)]
pub mod notifications;
#[allow(clippy::missing_errors_doc)]
pub mod payments;
pub mod response;
#[allow(clippy::missing_errors_doc)]
pub mod roles;
#[allow(clippy::missing_errors_doc)]
pub mod subscriptions;
#[allow(clippy::missing_errors_doc)]
pub mod usage_logs;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use axum::Router;
use axum::routing::{get, post};

use pawhub_app::ports::{Authenticator, Storage};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, A>() -> Router<AppState<S, A>>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    let router = Router::new()
        // Authentication
        .route("/signup", post(auth::signup::<S, A>))
        .route("/token", post(auth::obtain::<S, A>))
        .route("/token/refresh", post(auth::refresh::<S, A>))
        // Users
        .route(
            "/users",
            get(users::list::<S, A>).post(users::create::<S, A>),
        )
        .route("/users/me", get(users::me))
        .route(
            "/users/{id}",
            get(users::get::<S, A>)
                .put(users::update::<S, A>)
                .patch(users::update::<S, A>)
                .delete(users::delete::<S, A>),
        )
        // Roles
        .route(
            "/roles",
            get(roles::list::<S, A>).post(roles::create::<S, A>),
        )
        .route(
            "/roles/{id}",
            get(roles::get::<S, A>)
                .put(roles::update::<S, A>)
                .patch(roles::update::<S, A>)
                .delete(roles::delete::<S, A>),
        )
        // Adoptions
        .route(
            "/adoptions",
            get(adoptions::list::<S, A>).post(adoptions::create::<S, A>),
        )
        .route(
            "/adoptions/{id}",
            get(adoptions::get::<S, A>)
                .put(adoptions::put::<S, A>)
                .patch(adoptions::patch::<S, A>)
                .delete(adoptions::delete::<S, A>),
        )
        // Devices
        .route(
            "/devices",
            get(devices::list::<S, A>).post(devices::create::<S, A>),
        )
        .route(
            "/devices/{id}",
            get(devices::get::<S, A>)
                .put(devices::update::<S, A>)
                .patch(devices::update::<S, A>)
                .delete(devices::delete::<S, A>),
        )
        .route(
            "/update-device-quantity",
            post(devices::update_quantity::<S, A>),
        )
        // Usage logs
        .route(
            "/usage-logs",
            get(usage_logs::list::<S, A>).post(usage_logs::create::<S, A>),
        )
        .route(
            "/usage-logs/{id}",
            get(usage_logs::get::<S, A>).delete(usage_logs::delete::<S, A>),
        )
        // Habits
        .route(
            "/habits",
            get(habits::list::<S, A>).post(habits::create::<S, A>),
        )
        .route(
            "/habits/{id}",
            get(habits::get::<S, A>)
                .put(habits::update::<S, A>)
                .patch(habits::update::<S, A>)
                .delete(habits::delete::<S, A>),
        )
        // Notifications
        .route(
            "/notifications",
            get(notifications::list::<S, A>).post(notifications::create::<S, A>),
        )
        .route(
            "/notifications/{id}",
            get(notifications::get::<S, A>)
                .put(notifications::update::<S, A>)
                .patch(notifications::update::<S, A>)
                .delete(notifications::delete::<S, A>),
        )
        .route(
            "/notifications/{id}/read",
            post(notifications::mark_read::<S, A>),
        )
        // Subscriptions
        .route(
            "/subscriptions",
            get(subscriptions::list::<S, A>).post(subscriptions::create::<S, A>),
        )
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get::<S, A>)
                .put(subscriptions::update::<S, A>)
                .patch(subscriptions::update::<S, A>)
                .delete(subscriptions::delete::<S, A>),
        )
        .route(
            "/subscriptions/{id}/cancel",
            post(subscriptions::cancel::<S, A>),
        )
        // Payments
        .route(
            "/payments",
            get(payments::list::<S, A>).post(payments::create::<S, A>),
        )
        .route(
            "/payments/{id}",
            get(payments::get::<S, A>)
                .put(payments::update::<S, A>)
                .patch(payments::update::<S, A>)
                .delete(payments::delete::<S, A>),
        );

    // Animals, also reachable as pets
    ["/animals", "/pets"]
        .into_iter()
        .fold(router, |router, prefix| {
            router
                .route(
                    prefix,
                    get(animals::list::<S, A>).post(animals::create::<S, A>),
                )
                .route(
                    &format!("{prefix}/{{id}}"),
                    get(animals::get::<S, A>)
                        .put(animals::update::<S, A>)
                        .patch(animals::update::<S, A>)
                        .delete(animals::delete::<S, A>),
                )
                .route(
                    &format!("{prefix}/{{id}}/change_status"),
                    post(animals::change_status::<S, A>),
                )
        })
}
