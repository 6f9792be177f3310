//! End-to-end scenarios against a real `PostgreSQL` database.
//!
//! Each test empties every table first; run with `--test-threads=1`.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{Value, json};

use sentra_core::{AdminRole, OrderNumber, ProductType, Rupiah};
use sentra_integration_tests::{
    admin, auth_cookie, database_app, database_app_with_gateway, empty_request, json_request,
    send, spawn_gateway,
};
use sentra_server::db::{
    AdminUserRepository, OrderRepository, ProductRepository, RepositoryError, SettingsRepository,
};
use sentra_server::error::{AppError, SERVER_ERROR_MESSAGE};
use sentra_server::models::{NewOrder, OrderItem, ProductInput, setting_keys as keys};
use sentra_server::services::auth::AuthService;

const REQUIRES_DB: &str = "SENTRA_TEST_DATABASE_URL must be set";

fn product(name: &str, product_type: ProductType, price: i64, sort_order: i32) -> ProductInput {
    ProductInput {
        name: name.to_owned(),
        product_type,
        price: Rupiah::new(price),
        description: None,
        image: None,
        items: (product_type == ProductType::Paket)
            .then(|| vec!["INDOMIE GORENG".to_owned(), "GULA PASIR 1/4".to_owned()]),
        is_active: None,
        sort_order,
    }
}

fn checkout_body(name: &str, phone: &str, kelompok: &str, items: &Value, total: i64) -> Value {
    json!({
        "customerName": name,
        "whatsappNumber": phone,
        "kelompok": kelompok,
        "items": items,
        "totalAmount": total,
    })
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SENTRA_TEST_DATABASE_URL)"]
async fn test_checkout_keeps_client_total_and_item_snapshot() {
    let (app, pool) = database_app().await.expect(REQUIRES_DB);
    let products = ProductRepository::new(&pool);
    let paket = products
        .create(&product("Paket A", ProductType::Paket, 50_000, 1))
        .await
        .unwrap();
    let satuan = products
        .create(&product("ROKOK CLASMILD 20 BTG", ProductType::Satuan, 28_000, 10))
        .await
        .unwrap();

    let items = json!([
        {"productId": paket.id, "productName": "Paket A", "productType": "paket",
         "quantity": 1, "price": 50000, "items": ["INDOMIE GORENG", "GULA PASIR 1/4"]},
        {"productId": satuan.id, "productName": "ROKOK CLASMILD 20 BTG", "productType": "satuan",
         "quantity": 2, "price": 28000},
    ]);
    // Deliberately not 106000: the server stores what the client sends.
    let body = checkout_body("Budi", "081234567890", "Kantor A", &items, 100_000);

    let res = send(&app, json_request("POST", "/api/checkout", &body, None)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["waSent"], false);
    let order_number = res.body["orderNumber"].as_str().unwrap().to_owned();
    assert!(order_number.starts_with("SDK-"));

    // Later catalog edits do not touch the stored snapshot.
    products
        .update(paket.id, &product("Paket A Baru", ProductType::Paket, 65_000, 1))
        .await
        .unwrap();

    let cookie = auth_cookie(&admin(1, AdminRole::SuperAdmin, &[]));
    let res = send(&app, empty_request("GET", "/api/orders", Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::OK);
    let order = &res.body["data"][0];
    assert_eq!(order["orderNumber"], order_number.as_str());
    assert_eq!(order["totalAmount"], 100_000);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["waSent"], false);
    assert_eq!(order["items"][0]["productName"], "Paket A");
    assert_eq!(order["items"][0]["price"], 50_000);
    assert_eq!(order["items"][1]["quantity"], 2);
    assert_eq!(order["items"][1]["price"], 28_000);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SENTRA_TEST_DATABASE_URL)"]
async fn test_delivered_confirmation_is_recorded_and_follow_up_succeeds() {
    let (gateway, sent) = spawn_gateway().await;
    let (app, _pool) = database_app_with_gateway(gateway).await.expect(REQUIRES_DB);

    let items = json!([{"productName": "Paket B", "productType": "paket", "quantity": 1,
                        "price": 55000, "items": ["MINYAK GORENG 1L"]}]);
    let body = checkout_body("Rina", "0812-3456-7890", "Kantor A", &items, 55_000);

    let res = send(&app, json_request("POST", "/api/checkout", &body, None)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["waSent"], true);
    assert_eq!(res.body["message"], "Pesanan berhasil! Detail dikirim ke WhatsApp.");
    let order_number = res.body["orderNumber"].as_str().unwrap().to_owned();

    let messages = sent.bodies();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["number"], "6281234567890");
    assert!(messages[0]["text"].as_str().unwrap().contains(&order_number));

    let cookie = auth_cookie(&admin(1, AdminRole::SuperAdmin, &[]));
    let res = send(&app, empty_request("GET", "/api/orders", Some(&cookie))).await;
    let stored = res.body["data"][0].clone();
    assert_eq!(stored["orderNumber"], order_number.as_str());
    assert_eq!(stored["waSent"], true);

    let res = send(
        &app,
        json_request("POST", "/api/followup", &json!({"orderId": stored["id"]}), Some(&cookie)),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({
            "success": true,
            "message": "Pesan follow up berhasil dikirim",
            "customerName": "Rina",
        })
    );
    let messages = sent.bodies();
    assert_eq!(messages.len(), 2);
    assert!(messages[1]["text"].as_str().unwrap().contains("Ka *Rina*"));

    // Follow-ups never touch the order.
    let res = send(&app, empty_request("GET", "/api/orders", Some(&cookie))).await;
    assert_eq!(res.body["data"][0], stored);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SENTRA_TEST_DATABASE_URL)"]
async fn test_order_number_collision_is_a_server_error() {
    let (_app, pool) = database_app().await.expect(REQUIRES_DB);
    let orders = OrderRepository::new(&pool);
    let order = NewOrder {
        order_number: OrderNumber::generate(&chrono::Utc::now(), 1),
        customer_name: "Budi".to_owned(),
        whatsapp_number: "081234567890".to_owned(),
        kelompok: "Kantor A".to_owned(),
        items: vec![OrderItem {
            product_id: None,
            product_name: "ROKOK GARFIT".to_owned(),
            product_type: ProductType::Satuan,
            quantity: 1,
            price: Rupiah::new(20_000),
            items: None,
        }],
        total_amount: Rupiah::new(20_000),
    };

    orders.create(&order).await.unwrap();
    let err = orders.create(&order).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Database(_)), "{err:?}");

    let res = AppError::from(err).into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], SERVER_ERROR_MESSAGE);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SENTRA_TEST_DATABASE_URL)"]
async fn test_checkout_is_closed_outside_active_batch() {
    let (app, pool) = database_app().await.expect(REQUIRES_DB);
    let settings = SettingsRepository::new(&pool);
    settings.set(keys::BATCH_ACTIVE, "true").await.unwrap();
    settings.set(keys::BATCH_START, "2020-01-01T08:00").await.unwrap();
    settings.set(keys::BATCH_END, "2020-01-07T17:00").await.unwrap();

    let items = json!([{"productName": "Paket A", "productType": "paket", "quantity": 1, "price": 50000}]);
    let body = checkout_body("Budi", "081234567890", "Kantor A", &items, 50_000);

    let res = send(&app, json_request("POST", "/api/checkout", &body, None)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(
        res.body["message"],
        "Pembelian sedang ditutup. Tidak bisa checkout di luar periode batch."
    );

    let res = send(&app, empty_request("GET", "/api/batch-status", None)).await;
    assert_eq!(res.body["data"]["active"], true);
    assert_eq!(res.body["data"]["status"], "closed");
    assert_eq!(res.body["data"]["isOpen"], false);

    // An inactive batch never blocks checkout.
    settings.set(keys::BATCH_ACTIVE, "false").await.unwrap();
    let res = send(&app, json_request("POST", "/api/checkout", &body, None)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SENTRA_TEST_DATABASE_URL)"]
async fn test_check_order_by_number_and_phone() {
    let (app, _pool) = database_app().await.expect(REQUIRES_DB);
    let items = json!([{"productName": "ROKOK GARFIT", "productType": "satuan", "quantity": 1, "price": 20000}]);

    let res = send(
        &app,
        json_request(
            "POST",
            "/api/checkout",
            &checkout_body("Sari", "0812-3456-7890", "Kantor B", &items, 20_000),
            None,
        ),
    )
    .await;
    let order_number = res.body["orderNumber"].as_str().unwrap().to_owned();

    let res = send(
        &app,
        json_request(
            "POST",
            "/api/check-order",
            &json!({"query": order_number.to_lowercase()}),
            None,
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["orders"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["orders"][0]["orderNumber"], order_number.as_str());
    assert!(res.body["orders"][0].get("whatsappNumber").is_none());

    let res = send(
        &app,
        json_request("POST", "/api/check-order", &json!({"query": "+62 812 3456 7890"}), None),
    )
    .await;
    assert_eq!(res.body["orders"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["message"], "Ditemukan 1 pesanan");

    let res = send(
        &app,
        json_request("POST", "/api/check-order", &json!({"query": "SDK-19990101-00000000"}), None),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["orders"], json!([]));
    assert_eq!(res.body["message"], "Pesanan tidak ditemukan");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SENTRA_TEST_DATABASE_URL)"]
async fn test_regular_admin_only_sees_own_offices() {
    let (app, _pool) = database_app().await.expect(REQUIRES_DB);
    let items = json!([{"productName": "ROKOK GARFIT", "productType": "satuan", "quantity": 1, "price": 20000}]);

    for kelompok in ["Kantor A", "Kantor B"] {
        let body = checkout_body("Budi", "081234567890", kelompok, &items, 20_000);
        let res = send(&app, json_request("POST", "/api/checkout", &body, None)).await;
        assert_eq!(res.status, StatusCode::OK);
    }

    let cookie = auth_cookie(&admin(5, AdminRole::Admin, &["Kantor A"]));
    let res = send(&app, empty_request("GET", "/api/orders", Some(&cookie))).await;
    let orders = res.body["data"].as_array().unwrap().clone();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["kelompok"], "Kantor A");

    let super_cookie = auth_cookie(&admin(1, AdminRole::SuperAdmin, &[]));
    let res = send(&app, empty_request("GET", "/api/orders", Some(&super_cookie))).await;
    let all = res.body["data"].as_array().unwrap().clone();
    assert_eq!(all.len(), 2);
    let hidden = all
        .iter()
        .find(|o| o["kelompok"] == "Kantor B")
        .and_then(|o| o["id"].as_i64())
        .unwrap();

    let res = send(
        &app,
        json_request("PUT", "/api/orders", &json!({"id": hidden, "status": "confirmed"}), Some(&cookie)),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = send(
        &app,
        json_request("POST", "/api/followup", &json!({"orderId": hidden}), Some(&cookie)),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = send(
        &app,
        json_request("DELETE", "/api/orders", &json!({"ids": [hidden]}), Some(&cookie)),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["deleted"], 0);

    let res = send(
        &app,
        json_request("DELETE", "/api/orders", &json!({"ids": [hidden]}), Some(&super_cookie)),
    )
    .await;
    assert_eq!(res.body["deleted"], 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SENTRA_TEST_DATABASE_URL)"]
async fn test_order_status_and_notes_update() {
    let (app, _pool) = database_app().await.expect(REQUIRES_DB);
    let items = json!([{"productName": "ROKOK GARFIT", "productType": "satuan", "quantity": 1, "price": 20000}]);
    let body = checkout_body("Budi", "081234567890", "Kantor A", &items, 20_000);
    send(&app, json_request("POST", "/api/checkout", &body, None)).await;

    let cookie = auth_cookie(&admin(1, AdminRole::SuperAdmin, &[]));
    let res = send(&app, empty_request("GET", "/api/orders", Some(&cookie))).await;
    let id = res.body["data"][0]["id"].as_i64().unwrap();

    let res = send(
        &app,
        json_request(
            "PUT",
            "/api/orders",
            &json!({"id": id, "status": "completed", "notes": "Diambil di kantor"}),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    // Status alone leaves the notes in place; an explicit null clears them.
    send(
        &app,
        json_request("PUT", "/api/orders", &json!({"id": id, "status": "cancelled"}), Some(&cookie)),
    )
    .await;
    let res = send(&app, empty_request("GET", "/api/orders", Some(&cookie))).await;
    assert_eq!(res.body["data"][0]["status"], "cancelled");
    assert_eq!(res.body["data"][0]["notes"], "Diambil di kantor");

    send(
        &app,
        json_request("PUT", "/api/orders", &json!({"id": id, "notes": null}), Some(&cookie)),
    )
    .await;
    let res = send(&app, empty_request("GET", "/api/orders", Some(&cookie))).await;
    assert_eq!(res.body["data"][0]["notes"], Value::Null);

    let res = send(
        &app,
        json_request("PUT", "/api/orders", &json!({"id": id + 100, "status": "confirmed"}), Some(&cookie)),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SENTRA_TEST_DATABASE_URL)"]
async fn test_login_and_admin_account_management() {
    let (app, pool) = database_app().await.expect(REQUIRES_DB);
    let auth = AuthService::new(AdminUserRepository::new(&pool));
    let root = auth
        .bootstrap_super_admin("root", "correct horse battery", "Super Admin")
        .await
        .unwrap()
        .unwrap();
    assert!(
        auth.bootstrap_super_admin("other", "x", "Other")
            .await
            .unwrap()
            .is_none()
    );

    let res = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "root", "password": "wrong"}),
            None,
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Username atau password salah");

    let res = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "root", "password": "correct horse battery"}),
            None,
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["user"]["role"], "super_admin");
    let set_cookie = res.headers["set-cookie"].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_owned();

    let new_admin = json!({
        "username": "kasir",
        "password": "kasir-password",
        "name": "Kasir",
        "role": "admin",
        "allowedOffices": ["Kantor A"],
    });
    let res = send(&app, json_request("POST", "/api/admin-users", &new_admin, Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Admin berhasil ditambahkan");

    let res = send(&app, json_request("POST", "/api/admin-users", &new_admin, Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["message"], "Username sudah digunakan");

    let res = send(&app, empty_request("GET", "/api/admin-users", Some(&cookie))).await;
    let users = res.body["data"].as_array().unwrap().clone();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));
    let kasir_id = users
        .iter()
        .find(|u| u["username"] == "kasir")
        .and_then(|u| u["id"].as_i64())
        .unwrap();

    let res = send(
        &app,
        json_request(
            "PUT",
            "/api/admin-users",
            &json!({"id": root.id, "role": "admin"}),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    // Deactivated accounts cannot log in.
    let res = send(
        &app,
        json_request(
            "PUT",
            "/api/admin-users",
            &json!({"id": kasir_id, "isActive": false}),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    let res = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "kasir", "password": "kasir-password"}),
            None,
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = send(
        &app,
        json_request("DELETE", "/api/admin-users", &json!({"id": kasir_id}), Some(&cookie)),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    let res = send(
        &app,
        json_request("DELETE", "/api/admin-users", &json!({"id": kasir_id}), Some(&cookie)),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SENTRA_TEST_DATABASE_URL)"]
async fn test_product_and_settings_admin() {
    let (app, _pool) = database_app().await.expect(REQUIRES_DB);
    let cookie = auth_cookie(&admin(1, AdminRole::SuperAdmin, &[]));

    let res = send(
        &app,
        json_request(
            "POST",
            "/api/products",
            &json!({"name": "Paket B", "type": "paket", "price": "55000", "items": [], "image": "", "sortOrder": "2"}),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    let created = res.body["data"].clone();
    assert_eq!(created["price"], 55_000);
    assert_eq!(created["sortOrder"], 2);
    assert_eq!(created["isActive"], true);
    assert_eq!(created["items"], Value::Null);
    assert_eq!(created["image"], Value::Null);

    let res = send(
        &app,
        json_request(
            "PUT",
            "/api/products",
            &json!({"id": created["id"], "name": "Paket B", "type": "paket", "price": 57000, "isActive": false}),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(res.body["data"]["price"], 57_000);
    assert_eq!(res.body["data"]["isActive"], false);

    let res = send(&app, empty_request("GET", "/api/products", None)).await;
    assert_eq!(res.body["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/products?id={}", created["id"]);
    let res = send(&app, empty_request("DELETE", &uri, Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::OK);
    let res = send(&app, empty_request("DELETE", &uri, Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = send(
        &app,
        json_request(
            "PUT",
            "/api/settings",
            &json!({"store_name": "Swasembada-DK", "batch_active": true, "batch_name": 7}),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = send(&app, empty_request("GET", "/api/settings", Some(&cookie))).await;
    assert_eq!(res.body["data"]["store_name"], "Swasembada-DK");
    assert_eq!(res.body["data"]["batch_active"], "true");
    assert_eq!(res.body["data"]["batch_name"], "7");
}
