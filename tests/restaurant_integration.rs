mod common;

use common::{spawn_app, TestApp};
use serde_json::{json, Value};

async fn create(app: &TestApp, token: &str, path: &str, body: Value) -> Value {
    let response = app.post(path, token, &body).await;
    assert_eq!(201, response.status().as_u16(), "POST {} failed", path);
    response.json().await.unwrap()
}

async fn seed_menu_and_food(app: &TestApp, token: &str) -> (String, String) {
    let menu = create(
        app,
        token,
        "/api/v1/menus",
        json!({ "name": "Dinner", "category": "Main" }),
    )
    .await;
    let menu_id = menu["menuId"].as_str().unwrap().to_string();

    let food = create(
        app,
        token,
        "/api/v1/foods",
        json!({ "name": "Pasta", "price": 12.499, "foodImage": "pasta.png", "menuId": menu_id }),
    )
    .await;
    (menu_id, food["foodId"].as_str().unwrap().to_string())
}

async fn seed_table(app: &TestApp, token: &str, number: i32) -> String {
    let table = create(
        app,
        token,
        "/api/v1/tables",
        json!({ "numberOfGuests": 4, "tableNumber": number }),
    )
    .await;
    table["tableId"].as_str().unwrap().to_string()
}

// --- Menus ---

#[tokio::test]
async fn menu_crud() {
    let app = spawn_app();
    let token = app.access_token().await;

    let menu = create(
        &app,
        &token,
        "/api/v1/menus",
        json!({
            "name": "Lunch",
            "category": "Daily",
            "startDate": "2024-01-01T00:00:00Z",
            "endDate": "2024-12-31T00:00:00Z",
        }),
    )
    .await;
    let menu_id = menu["menuId"].as_str().unwrap();

    let listed: Value = app.get("/api/v1/menus", &token).await.json().await.unwrap();
    assert_eq!(listed["menus"].as_array().unwrap().len(), 1);

    let path = format!("/api/v1/menus/{}", menu_id);
    let updated = app.patch(&path, &token, &json!({ "name": "Brunch" })).await;
    assert_eq!(200, updated.status().as_u16());
    let updated: Value = updated.json().await.unwrap();
    assert_eq!(updated["name"], "Brunch");
    assert_eq!(updated["category"], "Daily");

    let fetched: Value = app.get(&path, &token).await.json().await.unwrap();
    assert_eq!(fetched["name"], "Brunch");
}

#[tokio::test]
async fn menu_rejects_inverted_dates() {
    let app = spawn_app();
    let token = app.access_token().await;

    let response = app
        .post(
            "/api/v1/menus",
            &token,
            &json!({
                "name": "Lunch",
                "category": "Daily",
                "startDate": "2024-12-31T00:00:00Z",
                "endDate": "2024-01-01T00:00:00Z",
            }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());

    let menu = create(
        &app,
        &token,
        "/api/v1/menus",
        json!({ "name": "Lunch", "category": "Daily", "endDate": "2024-06-01T00:00:00Z" }),
    )
    .await;
    let path = format!("/api/v1/menus/{}", menu["menuId"].as_str().unwrap());
    let response = app
        .patch(&path, &token, &json!({ "startDate": "2024-07-01T00:00:00Z" }))
        .await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn patch_without_fields_or_unknown_id() {
    let app = spawn_app();
    let token = app.access_token().await;
    let (menu_id, _) = seed_menu_and_food(&app, &token).await;

    let empty = app
        .patch(&format!("/api/v1/menus/{}", menu_id), &token, &json!({}))
        .await;
    assert_eq!(400, empty.status().as_u16());
    let body: Value = empty.json().await.unwrap();
    assert_eq!(body["message"], "No fields to update");

    for path in [
        "/api/v1/menus/unknown",
        "/api/v1/foods/unknown",
        "/api/v1/tables/unknown",
    ] {
        let body = if path.contains("tables") {
            json!({ "tableNumber": 3 })
        } else {
            json!({ "name": "Renamed" })
        };
        let response = app.patch(path, &token, &body).await;
        assert_eq!(404, response.status().as_u16(), "PATCH {}", path);
    }
}

// --- Foods ---

#[tokio::test]
async fn food_price_is_rounded_and_menu_must_exist() {
    let app = spawn_app();
    let token = app.access_token().await;
    let (menu_id, food_id) = seed_menu_and_food(&app, &token).await;

    let food: Value = app
        .get(&format!("/api/v1/foods/{}", food_id), &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(food["price"], 12.5);
    assert_eq!(food["menuId"], menu_id.as_str());

    let orphan = app
        .post(
            "/api/v1/foods",
            &token,
            &json!({ "name": "Soup", "price": 3.0, "foodImage": "soup.png", "menuId": "nope" }),
        )
        .await;
    assert_eq!(404, orphan.status().as_u16());
}

#[tokio::test]
async fn foods_are_paginated() {
    let app = spawn_app();
    let token = app.access_token().await;
    let (menu_id, _) = seed_menu_and_food(&app, &token).await;
    for name in ["Salad", "Steak", "Cake"] {
        create(
            &app,
            &token,
            "/api/v1/foods",
            json!({ "name": name, "price": 5, "foodImage": "x.png", "menuId": menu_id }),
        )
        .await;
    }

    let body: Value = app
        .get("/api/v1/foods?page=2&recordPerPage=3", &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["totalCount"], 4);
    let items = body["foodItems"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Cake");
}

// --- Tables & Orders ---

#[tokio::test]
async fn table_and_order_crud() {
    let app = spawn_app();
    let token = app.access_token().await;
    let table_id = seed_table(&app, &token, 7).await;

    let tables: Value = app.get("/api/v1/tables", &token).await.json().await.unwrap();
    assert_eq!(tables["totalCount"], 1);

    let order = create(
        &app,
        &token,
        "/api/v1/orders",
        json!({ "orderDate": "2024-05-01T19:30:00Z", "tableId": table_id }),
    )
    .await;
    assert_eq!(order["tableId"], table_id.as_str());

    let orders: Value = app.get("/api/v1/orders", &token).await.json().await.unwrap();
    assert_eq!(orders["totalCount"], 1);

    let missing_table = app
        .post(
            "/api/v1/orders",
            &token,
            &json!({ "orderDate": "2024-05-01T19:30:00Z", "tableId": "nope" }),
        )
        .await;
    assert_eq!(404, missing_table.status().as_u16());

    let path = format!("/api/v1/orders/{}", order["orderId"].as_str().unwrap());
    let moved = app.patch(&path, &token, &json!({ "tableId": "nope" })).await;
    assert_eq!(404, moved.status().as_u16());
}

// --- Order Items ---

#[tokio::test]
async fn order_items_create_an_order_priced_at_current_food_price() {
    let app = spawn_app();
    let token = app.access_token().await;
    let (_, food_id) = seed_menu_and_food(&app, &token).await;
    let table_id = seed_table(&app, &token, 1).await;

    let created = create(
        &app,
        &token,
        "/api/v1/orderItems",
        json!({
            "tableId": table_id,
            "orderItems": [
                { "foodId": food_id, "quantity": "M" },
                { "foodId": food_id, "quantity": "L" },
            ],
        }),
    )
    .await;
    let order_id = created["orderId"].as_str().unwrap();
    let items = created["orderItems"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["unitPrice"], 12.5);
    assert_eq!(items[1]["quantity"], "L");

    let by_order: Value = app
        .get(&format!("/api/v1/orderItems/order/{}", order_id), &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(by_order["totalCount"], 2);

    let item_path = format!(
        "/api/v1/orderItems/{}",
        items[0]["orderItemId"].as_str().unwrap()
    );
    let patched: Value = app
        .patch(&item_path, &token, &json!({ "quantity": "S" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(patched["quantity"], "S");
    assert_eq!(patched["unitPrice"], 12.5);
}

#[tokio::test]
async fn order_items_with_unknown_food_write_nothing() {
    let app = spawn_app();
    let token = app.access_token().await;
    let (_, food_id) = seed_menu_and_food(&app, &token).await;
    let table_id = seed_table(&app, &token, 1).await;

    let response = app
        .post(
            "/api/v1/orderItems",
            &token,
            &json!({
                "tableId": table_id,
                "orderItems": [
                    { "foodId": food_id, "quantity": "M" },
                    { "foodId": "missing", "quantity": "S" },
                ],
            }),
        )
        .await;
    assert_eq!(404, response.status().as_u16());

    let orders: Value = app.get("/api/v1/orders", &token).await.json().await.unwrap();
    assert_eq!(orders["totalCount"], 0);
    let items = app.get("/api/v1/orderItems", &token).await;
    assert_eq!(404, items.status().as_u16());
}

#[tokio::test]
async fn order_items_reject_unknown_quantity() {
    let app = spawn_app();
    let token = app.access_token().await;
    let (_, food_id) = seed_menu_and_food(&app, &token).await;
    let table_id = seed_table(&app, &token, 1).await;

    let response = app
        .post(
            "/api/v1/orderItems",
            &token,
            &json!({ "tableId": table_id, "orderItems": [{ "foodId": food_id, "quantity": "XL" }] }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());
}

// --- Invoices ---

#[tokio::test]
async fn invoice_view_joins_table_and_items() {
    let app = spawn_app();
    let token = app.access_token().await;
    let (_, food_id) = seed_menu_and_food(&app, &token).await;
    let table_id = seed_table(&app, &token, 12).await;
    let created = create(
        &app,
        &token,
        "/api/v1/orderItems",
        json!({ "tableId": table_id, "orderItems": [{ "foodId": food_id, "quantity": "S" }] }),
    )
    .await;

    let invoice = create(
        &app,
        &token,
        "/api/v1/invoices",
        json!({ "orderId": created["orderId"], "paymentMethod": "CARD" }),
    )
    .await;
    assert_eq!(invoice["paymentStatus"], "PENDING");

    let path = format!("/api/v1/invoices/{}", invoice["invoiceId"].as_str().unwrap());
    let view: Value = app.get(&path, &token).await.json().await.unwrap();
    assert_eq!(view["tableNumber"], 12);
    assert_eq!(view["paymentMethod"], "CARD");
    assert_eq!(view["orderDetails"].as_array().unwrap().len(), 1);

    let paid: Value = app
        .patch(&path, &token, &json!({ "paymentStatus": "PAID" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(paid["paymentStatus"], "PAID");

    // status falls back to PENDING when a patch leaves it out
    let reset: Value = app
        .patch(&path, &token, &json!({ "paymentMethod": "CASH" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(reset["paymentStatus"], "PENDING");
    assert_eq!(reset["paymentMethod"], "CASH");
}

#[tokio::test]
async fn invoice_requires_existing_order_and_items() {
    let app = spawn_app();
    let token = app.access_token().await;

    let orphan = app
        .post("/api/v1/invoices", &token, &json!({ "orderId": "nope" }))
        .await;
    assert_eq!(404, orphan.status().as_u16());

    // an order without items cannot be rendered as an invoice
    let table_id = seed_table(&app, &token, 3).await;
    let order = create(
        &app,
        &token,
        "/api/v1/orders",
        json!({ "orderDate": "2024-05-01T19:30:00Z", "tableId": table_id }),
    )
    .await;
    let invoice = create(
        &app,
        &token,
        "/api/v1/invoices",
        json!({ "orderId": order["orderId"] }),
    )
    .await;

    let path = format!("/api/v1/invoices/{}", invoice["invoiceId"].as_str().unwrap());
    assert_eq!(404, app.get(&path, &token).await.status().as_u16());

    let listed: Value = app.get("/api/v1/invoices", &token).await.json().await.unwrap();
    assert_eq!(listed["totalCount"], 1);
}
