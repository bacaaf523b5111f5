#[macro_use]
extern crate time_test;

use rocket::http::{Cookie, Status};
use rocket::local::asynchronous::Client;
use rocket::tokio;
use serde_json::{Value, json};

use ponto_api::orm::testing::{seed, test_rocket};

async fn login(client: &Client, email: &str, password: &str) -> (Cookie<'static>, i64) {
    let response = client
        .post("/api/auth")
        .json(&json!({ "email": email, "password": password }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let cookie = response.cookies().get("session").unwrap().clone().into_owned();
    let envelope: Value = response.into_json().await.unwrap();
    (cookie, envelope["data"]["employeeId"].as_i64().unwrap())
}

async fn create_entry(client: &Client, cookie: &Cookie<'static>, body: Value) -> (Status, Value) {
    let response = client
        .post("/api/lancamentos")
        .cookie(cookie.clone())
        .json(&body)
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_json().await.unwrap())
}

fn entry(employee_id: i64, date: &str, entry_type: &str) -> Value {
    json!({
        "date": date,
        "entryType": entry_type,
        "description": "Expediente",
        "location": "-23.5505,-46.6333",
        "employeeId": employee_id
    })
}

#[tokio::test]
async fn test_create_and_get_entry() {
    let client = Client::untracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_create_and_get_entry");

    let (cookie, user_id) = login(&client, seed::USER_EMAIL, seed::USER_PASSWORD).await;

    let (status, envelope) = create_entry(
        &client,
        &cookie,
        entry(user_id, "2025-03-03 08:00:00", "WORK_START"),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(envelope["errors"], json!([]));
    let created = envelope["data"].clone();
    assert!(created["id"].is_number());
    assert_eq!(created["date"], "2025-03-03 08:00:00");
    assert_eq!(created["entryType"], "WORK_START");
    assert_eq!(created["description"], "Expediente");
    assert_eq!(created["employeeId"], user_id);

    let response = client
        .get(format!("/api/lancamentos/{}", created["id"]))
        .cookie(cookie)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(envelope["data"], created);
}

#[tokio::test]
async fn test_create_entry_validation() {
    let client = Client::untracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_create_entry_validation");

    let (cookie, _) = login(&client, seed::USER_EMAIL, seed::USER_PASSWORD).await;

    let (status, envelope) = create_entry(
        &client,
        &cookie,
        json!({ "date": "03/03/2025", "entryType": "COFFEE" }),
    )
    .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(envelope["data"], Value::Null);
    assert_eq!(
        envelope["errors"],
        json!([
            "Data inválida.",
            "Tipo inválido.",
            "Funcionário não encontrado. ID inexistente."
        ])
    );

    let (status, envelope) = create_entry(
        &client,
        &cookie,
        entry(99999, "2025-03-03 08:00:00", "WORK_START"),
    )
    .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(
        envelope["errors"],
        json!(["Funcionário não encontrado. ID inexistente."])
    );
}

#[tokio::test]
async fn test_create_entry_for_someone_else() {
    let client = Client::untracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_create_entry_for_someone_else");

    let (user_cookie, user_id) = login(&client, seed::USER_EMAIL, seed::USER_PASSWORD).await;
    let (_, colleague_id) = login(&client, seed::COLLEAGUE_EMAIL, seed::COLLEAGUE_PASSWORD).await;
    let (admin_cookie, _) = login(&client, seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD).await;
    let (outsider_cookie, _) = login(&client, seed::OUTSIDER_EMAIL, seed::OUTSIDER_PASSWORD).await;

    let (status, envelope) = create_entry(
        &client,
        &user_cookie,
        entry(colleague_id, "2025-03-03 08:00:00", "WORK_START"),
    )
    .await;
    assert_eq!(status, Status::Forbidden);
    assert_eq!(envelope["errors"], json!(["Acesso negado."]));

    let (status, _) = create_entry(
        &client,
        &outsider_cookie,
        entry(user_id, "2025-03-03 08:00:00", "WORK_START"),
    )
    .await;
    assert_eq!(status, Status::Forbidden);

    // An administrator punches for anyone in their own company.
    let (status, envelope) = create_entry(
        &client,
        &admin_cookie,
        entry(colleague_id, "2025-03-03 08:00:00", "WORK_START"),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(envelope["data"]["employeeId"], colleague_id);
}

#[tokio::test]
async fn test_list_entries_paginated() {
    let client = Client::untracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_list_entries_paginated");

    let (cookie, user_id) = login(&client, seed::USER_EMAIL, seed::USER_PASSWORD).await;

    let punches = [
        ("2025-03-03 12:00:00", "LUNCH_START"),
        ("2025-03-03 08:00:00", "WORK_START"),
        ("2025-03-03 13:00:00", "LUNCH_END"),
        ("2025-03-03 17:00:00", "WORK_END"),
        ("2025-03-03 15:00:00", "BREAK_START"),
    ];
    let mut ids = Vec::new();
    for (date, entry_type) in punches {
        let (status, envelope) =
            create_entry(&client, &cookie, entry(user_id, date, entry_type)).await;
        assert_eq!(status, Status::Ok);
        ids.push(envelope["data"]["id"].as_i64().unwrap());
    }

    // Default ordering is by id, newest first.
    let response = client
        .get(format!("/api/lancamentos/funcionario/{}?size=2", user_id))
        .cookie(cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let envelope: Value = response.into_json().await.unwrap();
    let page = &envelope["data"];
    assert_eq!(page["totalElements"], 5);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["number"], 0);
    assert_eq!(page["size"], 2);
    let content = page["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0]["id"], ids[4]);
    assert_eq!(content[1]["id"], ids[3]);

    // Last page holds the remainder.
    let response = client
        .get(format!("/api/lancamentos/funcionario/{}?pag=2&size=2", user_id))
        .cookie(cookie.clone())
        .dispatch()
        .await;
    let envelope: Value = response.into_json().await.unwrap();
    let content = envelope["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["id"], ids[0]);

    // Chronological order by punch date.
    let response = client
        .get(format!(
            "/api/lancamentos/funcionario/{}?ord=date&dir=ASC",
            user_id
        ))
        .cookie(cookie)
        .dispatch()
        .await;
    let envelope: Value = response.into_json().await.unwrap();
    let dates: Vec<&str> = envelope["data"]["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["date"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec![
            "2025-03-03 08:00:00",
            "2025-03-03 12:00:00",
            "2025-03-03 13:00:00",
            "2025-03-03 15:00:00",
            "2025-03-03 17:00:00",
        ]
    );
    assert_eq!(envelope["data"]["size"], 25);
}

#[tokio::test]
async fn test_list_entries_far_page_is_empty() {
    let client = Client::untracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_list_entries_far_page_is_empty");

    let (cookie, user_id) = login(&client, seed::USER_EMAIL, seed::USER_PASSWORD).await;
    let (status, _) = create_entry(
        &client,
        &cookie,
        entry(user_id, "2025-03-03 08:00:00", "WORK_START"),
    )
    .await;
    assert_eq!(status, Status::Ok);

    let response = client
        .get(format!(
            "/api/lancamentos/funcionario/{}?pag=400000000000000000&size=100",
            user_id
        ))
        .cookie(cookie)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(envelope["errors"], json!([]));
    let page = &envelope["data"];
    assert_eq!(page["content"], json!([]));
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["number"], 400000000000000000_i64);
    assert_eq!(page["size"], 100);
}

#[tokio::test]
async fn test_list_entries_access() {
    let client = Client::untracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_list_entries_access");

    let (_, user_id) = login(&client, seed::USER_EMAIL, seed::USER_PASSWORD).await;
    let (colleague_cookie, _) =
        login(&client, seed::COLLEAGUE_EMAIL, seed::COLLEAGUE_PASSWORD).await;
    let (admin_cookie, _) = login(&client, seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD).await;

    let response = client
        .get(format!("/api/lancamentos/funcionario/{}", user_id))
        .cookie(colleague_cookie)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    let response = client
        .get(format!("/api/lancamentos/funcionario/{}", user_id))
        .cookie(admin_cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(envelope["data"]["totalElements"], 0);
    assert_eq!(envelope["data"]["content"], json!([]));

    let response = client
        .get("/api/lancamentos/funcionario/99999")
        .cookie(admin_cookie)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(envelope["errors"], json!(["Funcionário não encontrado."]));

    let response = client
        .get(format!("/api/lancamentos/funcionario/{}", user_id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn test_get_entry_not_found() {
    let client = Client::untracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_get_entry_not_found");

    let (cookie, _) = login(&client, seed::USER_EMAIL, seed::USER_PASSWORD).await;

    let response = client.get("/api/lancamentos/4242").cookie(cookie).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(
        envelope["errors"],
        json!(["Lançamento não encontrado para o id 4242."])
    );
}

#[tokio::test]
async fn test_update_entry() {
    let client = Client::untracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_update_entry");

    let (cookie, user_id) = login(&client, seed::USER_EMAIL, seed::USER_PASSWORD).await;
    let (_, colleague_id) = login(&client, seed::COLLEAGUE_EMAIL, seed::COLLEAGUE_PASSWORD).await;

    let (_, envelope) = create_entry(
        &client,
        &cookie,
        entry(user_id, "2025-03-03 08:00:00", "WORK_START"),
    )
    .await;
    let id = envelope["data"]["id"].as_i64().unwrap();

    // employeeId in the body does not move the entry.
    let response = client
        .put(format!("/api/lancamentos/{}", id))
        .cookie(cookie.clone())
        .json(&json!({
            "date": "2025-03-03 08:15:00",
            "entryType": "WORK_START",
            "employeeId": colleague_id
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(envelope["data"]["id"], id);
    assert_eq!(envelope["data"]["date"], "2025-03-03 08:15:00");
    assert_eq!(envelope["data"]["employeeId"], user_id);
    assert_eq!(envelope["data"]["description"], Value::Null);
    assert_eq!(envelope["data"]["location"], Value::Null);

    let response = client
        .put(format!("/api/lancamentos/{}", id))
        .cookie(cookie.clone())
        .json(&json!({ "date": "", "entryType": "WORK_START" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(envelope["errors"], json!(["Data não pode ser vazia."]));

    let response = client
        .put("/api/lancamentos/4242")
        .cookie(cookie)
        .json(&json!({ "date": "2025-03-03 08:15:00", "entryType": "WORK_START" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn test_delete_entry() {
    let client = Client::untracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_delete_entry");

    let (user_cookie, user_id) = login(&client, seed::USER_EMAIL, seed::USER_PASSWORD).await;
    let (admin_cookie, _) = login(&client, seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD).await;
    let (outsider_cookie, _) = login(&client, seed::OUTSIDER_EMAIL, seed::OUTSIDER_PASSWORD).await;

    let (_, envelope) = create_entry(
        &client,
        &user_cookie,
        entry(user_id, "2025-03-03 17:00:00", "WORK_END"),
    )
    .await;
    let created = envelope["data"].clone();
    let id = created["id"].as_i64().unwrap();

    // Only administrators remove entries.
    let response = client
        .delete(format!("/api/lancamentos/{}", id))
        .cookie(user_cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(envelope["errors"], json!(["Acesso negado."]));

    // ...and only within their own company.
    let response = client
        .delete(format!("/api/lancamentos/{}", id))
        .cookie(outsider_cookie)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    let response = client
        .delete(format!("/api/lancamentos/{}", id))
        .cookie(admin_cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(envelope["data"], created);

    let response = client
        .get(format!("/api/lancamentos/{}", id))
        .cookie(user_cookie)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client
        .delete(format!("/api/lancamentos/{}", id))
        .cookie(admin_cookie)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
    let envelope: Value = response.into_json().await.unwrap();
    assert_eq!(
        envelope["errors"],
        json!([format!(
            "Erro ao remover lançamento. Registro não encontrado para o id {}.",
            id
        )])
    );
}
