use chrono::Utc;
use connectlife_api::config::AppConfig;
use connectlife_auth::{Claims, Role};
use connectlife_core::UserId;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::{json, Value};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    // Held so the upload directory outlives the server.
    _upload_dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        let upload_dir = tempfile::tempdir().expect("failed to create upload dir");
        let config = AppConfig {
            jwt_secret: JWT_SECRET.to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            upload_dir: upload_dir.path().to_path_buf(),
        };

        // Same router as prod, bound to an ephemeral port.
        let app = connectlife_api::app::build_app(&config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            _upload_dir: upload_dir,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    email: &str,
    role: Option<&str>,
) -> reqwest::Response {
    let mut body = json!({
        "nome": name,
        "email": email,
        "senha": "hunter2",
    });
    if let Some(role) = role {
        body["tipo"] = json!(role);
    }

    client
        .post(format!("{base_url}/auth/register"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

/// Register + login, returning (token, user id).
async fn signup(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    email: &str,
    role: Option<&str>,
) -> (String, String) {
    let res = register(client, base_url, name, email, role).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "senha": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    let id = body["usuario"]["id"].as_str().unwrap().to_string();
    (token, id)
}

async fn create_community(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
    sport: &str,
) -> Value {
    let form = Form::new()
        .text("name", name.to_string())
        .text("esporte", sport.to_string())
        .text("descricao", "criado nos testes");

    let res = client
        .post(format!("{base_url}/chats"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn set_community_open(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    id: &str,
    open: bool,
) -> reqwest::Response {
    let form = Form::new().text("aberto", if open { "true" } else { "false" });
    client
        .put(format!("{base_url}/chats/{id}"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .unwrap()
}

async fn create_venue(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
) -> reqwest::Response {
    let form = Form::new()
        .text("nome", name.to_string())
        .text("endereco", "Rua dos Testes, 42");
    client
        .post(format!("{base_url}/locais"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_and_tampered_tokens_never_reach_handlers() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let now = Utc::now().timestamp();
    let expired = Claims {
        sub: UserId::new(),
        role: Role::Admin,
        iat: now - 7200,
        exp: now - 3600,
    };
    let expired_token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &expired,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&expired_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let tampered = Claims {
        sub: UserId::new(),
        role: Role::Admin,
        iat: now,
        exp: now + 3600,
    };
    let tampered_token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &tampered,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&tampered_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_round_trips_identity_and_role() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token, id) = signup(&client, &srv.base_url, "Alice", "alice@example.com", None).await;

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["userId"].as_str().unwrap(), id);
    assert_eq!(body["role"].as_str().unwrap(), "member");
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = register(&client, &srv.base_url, "Alice", "dup@example.com", None).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = register(&client, &srv.base_url, "Impostor", "dup@example.com", None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

/// The full ownership scenario: A owns a closed community; B cannot join
/// until A opens it, can never edit it, and not even A can delete it without
/// the admin role.
#[tokio::test]
async fn community_ownership_scenario() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token_a, _) = signup(&client, &srv.base_url, "Ana", "ana@example.com", None).await;
    let (token_b, id_b) = signup(&client, &srv.base_url, "Bruno", "bruno@example.com", None).await;

    let community = create_community(&client, &srv.base_url, &token_a, "Pelada", "Futebol").await;
    let community_id = community["id"].as_str().unwrap().to_string();
    assert_eq!(community["aberto"], json!(false));

    // Closed: B cannot join.
    let res = client
        .post(format!("{}/chats/{}/join", srv.base_url, community_id))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // A opens the community.
    let res = set_community_open(&client, &srv.base_url, &token_a, &community_id, true).await;
    assert_eq!(res.status(), StatusCode::OK);

    // B joins, twice; the second join is an idempotent success.
    for _ in 0..2 {
        let res = client
            .post(format!("{}/chats/{}/join", srv.base_url, community_id))
            .bearer_auth(&token_b)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    // B appears in the member list exactly once.
    let res = client
        .get(format!("{}/chats", srv.base_url))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    let chats: Value = res.json().await.unwrap();
    let chat = chats
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == json!(community_id))
        .expect("B should see the joined community");
    let b_entries = chat["members"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|m| m["id"] == json!(id_b))
        .count();
    assert_eq!(b_entries, 1);
    assert_eq!(chat["numMembers"], json!(2));

    // B is a member but not the owner: edits are forbidden.
    let res = set_community_open(&client, &srv.base_url, &token_b, &community_id, false).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Deletion needs the admin role, even for the owner.
    let res = client
        .delete(format!("{}/chats/{}", srv.base_url, community_id))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let (token_admin, _) = signup(
        &client,
        &srv.base_url,
        "Root",
        "root@example.com",
        Some("admin"),
    )
    .await;
    let res = client
        .delete(format!("{}/chats/{}", srv.base_url, community_id))
        .bearer_auth(&token_admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn scheduling_twice_keeps_exactly_one_event() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token_owner, _) = signup(&client, &srv.base_url, "Ana", "owner@example.com", None).await;
    let (token_admin, _) = signup(
        &client,
        &srv.base_url,
        "Root",
        "admin@example.com",
        Some("admin"),
    )
    .await;
    let (token_other, _) = signup(&client, &srv.base_url, "Caio", "caio@example.com", None).await;

    let community = create_community(&client, &srv.base_url, &token_owner, "Racha", "Futebol").await;
    let community_id = community["id"].as_str().unwrap().to_string();

    let res = create_venue(&client, &srv.base_url, &token_admin, "Quadra Azul").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let venue: Value = res.json().await.unwrap();
    let venue_id = venue["id"].as_str().unwrap().to_string();

    let event_body = |name: &str| {
        json!({
            "chat": community_id,
            "nome": name,
            "dataHora": (Utc::now() + chrono::Duration::days(3)).to_rfc3339(),
            "local": venue_id,
            "esporte": "Futebol",
        })
    };

    // Only the community owner can schedule.
    let res = client
        .post(format!("{}/eventos", srv.base_url))
        .bearer_auth(&token_other)
        .json(&event_body("Invasão"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    for name in ["Primeiro Racha", "Segundo Racha"] {
        let res = client
            .post(format!("{}/eventos", srv.base_url))
            .bearer_auth(&token_owner)
            .json(&event_body(name))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/eventos", srv.base_url))
        .bearer_auth(&token_owner)
        .send()
        .await
        .unwrap();
    let events: Value = res.json().await.unwrap();
    let for_community: Vec<_> = events
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["chat"]["id"] == json!(community_id))
        .collect();

    assert_eq!(for_community.len(), 1, "older event must have been replaced");
    assert_eq!(for_community[0]["nome"], json!("Segundo Racha"));
}

#[tokio::test]
async fn community_chat_is_member_only() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token_owner, _) = signup(&client, &srv.base_url, "Ana", "ana2@example.com", None).await;
    let (token_outsider, _) =
        signup(&client, &srv.base_url, "Davi", "davi@example.com", None).await;

    let community = create_community(&client, &srv.base_url, &token_owner, "Vôlei", "Vôlei").await;
    let community_id = community["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/chats/{}/messages", srv.base_url, community_id))
        .bearer_auth(&token_outsider)
        .json(&json!({ "content": "oi?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/chats/{}/messages", srv.base_url, community_id))
        .bearer_auth(&token_owner)
        .json(&json!({ "content": "bora jogar" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/chats/{}/messages", srv.base_url, community_id))
        .bearer_auth(&token_owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], json!("bora jogar"));

    // Reading is gated the same way as posting.
    let res = client
        .get(format!("{}/chats/{}/messages", srv.base_url, community_id))
        .bearer_auth(&token_outsider)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn venues_are_admin_managed_with_unique_names() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token_member, _) =
        signup(&client, &srv.base_url, "Eva", "eva@example.com", None).await;
    let (token_admin, _) = signup(
        &client,
        &srv.base_url,
        "Root",
        "root2@example.com",
        Some("admin"),
    )
    .await;

    let res = create_venue(&client, &srv.base_url, &token_member, "Ginásio").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = create_venue(&client, &srv.base_url, &token_admin, "Ginásio").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = create_venue(&client, &srv.base_url, &token_admin, "Ginásio").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Anyone signed in can browse venues.
    let res = client
        .get(format!("{}/locais", srv.base_url))
        .bearer_auth(&token_member)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let venues: Value = res.json().await.unwrap();
    assert_eq!(venues.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_account_management_rules() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token_admin, id_admin) = signup(
        &client,
        &srv.base_url,
        "Root",
        "root3@example.com",
        Some("admin"),
    )
    .await;
    let (_, id_target) = signup(&client, &srv.base_url, "Fábio", "fabio@example.com", None).await;
    signup(&client, &srv.base_url, "Gina", "gina@example.com", None).await;

    // Admins cannot manage their own account through the admin path.
    let res = client
        .put(format!("{}/usuarios/{}", srv.base_url, id_admin))
        .bearer_auth(&token_admin)
        .multipart(Form::new().text("nome", "Novo Nome"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Email edits that collide with another account surface as a conflict.
    let res = client
        .put(format!("{}/usuarios/{}", srv.base_url, id_target))
        .bearer_auth(&token_admin)
        .multipart(Form::new().text("email", "gina@example.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Role promotion sticks: the next login carries the new role.
    let res = client
        .put(format!("{}/usuarios/{}", srv.base_url, id_target))
        .bearer_auth(&token_admin)
        .multipart(Form::new().text("tipo", "admin"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "fabio@example.com", "senha": "hunter2" }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["usuario"]["tipo"], json!("admin"));

    // Deactivation blocks login.
    let res = client
        .put(format!("{}/usuarios/{}", srv.base_url, id_target))
        .bearer_auth(&token_admin)
        .multipart(Form::new().text("ativo", "false"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "fabio@example.com", "senha": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Self-deletion through the admin path is blocked; deleting another works.
    let res = client
        .delete(format!("{}/usuarios/{}", srv.base_url, id_admin))
        .bearer_auth(&token_admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/usuarios/{}", srv.base_url, id_target))
        .bearer_auth(&token_admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn uploaded_picture_is_served_statically() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token_admin, _) = signup(
        &client,
        &srv.base_url,
        "Root",
        "root4@example.com",
        Some("admin"),
    )
    .await;

    let png = Part::bytes(vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])
        .file_name("quadra.png")
        .mime_str("image/png")
        .unwrap();
    let form = Form::new()
        .text("nome", "Arena com Foto")
        .text("endereco", "Av. Central, 1")
        .part("imagem", png);

    let res = client
        .post(format!("{}/locais", srv.base_url))
        .bearer_auth(&token_admin)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let venue: Value = res.json().await.unwrap();
    let picture = venue["imagemLocal"].as_str().unwrap();
    assert!(picture.starts_with("/uploads/imagem-"));

    // The stored file is publicly reachable, no token needed.
    let res = client
        .get(format!("{}{}", srv.base_url, picture))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Non-image uploads are refused.
    let text = Part::bytes(b"not an image".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = Form::new()
        .text("nome", "Arena Inválida")
        .text("endereco", "Av. Central, 2")
        .part("imagem", text);
    let res = client
        .post(format!("{}/locais", srv.base_url))
        .bearer_auth(&token_admin)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn open_community_discovery_filters_by_sport() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token, _) = signup(&client, &srv.base_url, "Ana", "ana3@example.com", None).await;

    for (name, sport) in [("Pelada ABC", "Futebol"), ("Corrida XYZ", "Corrida")] {
        let community = create_community(&client, &srv.base_url, &token, name, sport).await;
        let id = community["id"].as_str().unwrap().to_string();
        let res = set_community_open(&client, &srv.base_url, &token, &id, true).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
    // A third community stays closed and must not be discoverable.
    create_community(&client, &srv.base_url, &token, "Fechado FC", "Futebol").await;

    let res = client
        .get(format!("{}/chats/abertos", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let all: Value = res.json().await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let res = client
        .get(format!("{}/chats/abertos?sport=fute", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let filtered: Value = res.json().await.unwrap();
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["name"], json!("Pelada ABC"));
}
