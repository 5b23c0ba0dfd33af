use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::{TokenIssuer, TokenValidator};
use crate::logger::LoggerMiddleware;
use crate::middleware::JwtMiddleware;
use crate::repository::Repositories;
use crate::routes::{
    create_food, create_invoice, create_menu, create_order, create_order_items, create_table,
    database_health, get_food, get_invoice, get_menu, get_order, get_order_item, get_table,
    get_user, json_error_handler, list_foods, list_invoices, list_menus, list_order_items,
    list_order_items_by_order, list_orders, list_tables, list_users, login, refresh,
    router_health, signup, update_food, update_invoice, update_menu, update_order,
    update_order_item, update_table,
};

pub fn run(
    listener: TcpListener,
    repositories: Repositories,
    issuer: TokenIssuer,
    validator: TokenValidator,
    shutdown_timeout_secs: u64,
) -> Result<Server, std::io::Error> {
    let repositories = web::Data::new(repositories);
    let issuer = web::Data::new(issuer);
    let validator_data = web::Data::new(validator.clone());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(repositories.clone())
            .app_data(issuer.clone())
            .app_data(validator_data.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))

            // Public routes, registered ahead of the protected scope
            .route("/health/router", web::get().to(router_health))
            .route("/health/database", web::get().to(database_health))
            .route("/api/v1/users/signup", web::post().to(signup))
            .route("/api/v1/users/login", web::post().to(login))
            .route("/api/v1/users/refresh", web::post().to(refresh))

            // Protected routes (require an access token)
            .service(
                web::scope("/api/v1")
                    .wrap(JwtMiddleware::new(validator.clone()))
                    .route("/users", web::get().to(list_users))
                    .route("/users/{user_id}", web::get().to(get_user))
                    .route("/menus", web::post().to(create_menu))
                    .route("/menus", web::get().to(list_menus))
                    .route("/menus/{menu_id}", web::get().to(get_menu))
                    .route("/menus/{menu_id}", web::patch().to(update_menu))
                    .route("/foods", web::post().to(create_food))
                    .route("/foods", web::get().to(list_foods))
                    .route("/foods/{food_id}", web::get().to(get_food))
                    .route("/foods/{food_id}", web::patch().to(update_food))
                    .route("/tables", web::post().to(create_table))
                    .route("/tables", web::get().to(list_tables))
                    .route("/tables/{table_id}", web::get().to(get_table))
                    .route("/tables/{table_id}", web::patch().to(update_table))
                    .route("/orders", web::post().to(create_order))
                    .route("/orders", web::get().to(list_orders))
                    .route("/orders/{order_id}", web::get().to(get_order))
                    .route("/orders/{order_id}", web::patch().to(update_order))
                    .route("/orderItems", web::post().to(create_order_items))
                    .route("/orderItems", web::get().to(list_order_items))
                    .route(
                        "/orderItems/order/{order_id}",
                        web::get().to(list_order_items_by_order),
                    )
                    .route("/orderItems/{order_item_id}", web::get().to(get_order_item))
                    .route("/orderItems/{order_item_id}", web::patch().to(update_order_item))
                    .route("/invoices", web::post().to(create_invoice))
                    .route("/invoices", web::get().to(list_invoices))
                    .route("/invoices/{invoice_id}", web::get().to(get_invoice))
                    .route("/invoices/{invoice_id}", web::patch().to(update_invoice)),
            )
    })
    .shutdown_timeout(shutdown_timeout_secs)
    .listen(listener)?
    .run();

    Ok(server)
}
