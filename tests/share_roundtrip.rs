use geoshare::registry::UploadedFile;
use geoshare::{Config, GeoShareError, HeadlessSurface, Session, ShareClient, ShareServer};
use geoshare::models::bundle::BundleFile;
use serde_json::{Value, json};
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

async fn spawn_server(config: Config) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(ShareServer::new(config).serve(listener));
    format!("http://{}", addr)
}

fn feature_collection(lng: f64, lat: f64) -> Value {
    json!({"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"name": "spot"}, "geometry": {"type": "Point", "coordinates": [lng, lat]}}
    ]})
}

#[tokio::test]
async fn created_bundle_round_trips() {
    let base = spawn_server(Config::default()).await;
    let client = ShareClient::new(&base, 1024);
    let files = vec![BundleFile {
        name: "spot.geojson".into(),
        geojson: feature_collection(10.0, 20.0),
    }];

    let id = client.share(&files).await.expect("share");
    let bundle = client.fetch(&id).await.expect("fetch");
    assert_eq!(bundle.files, files);
    assert!(bundle.created_at > 0);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let base = spawn_server(Config::default()).await;
    let client = ShareClient::new(&base, 1024);
    assert!(matches!(
        client.fetch("Zz9_unused").await,
        Err(GeoShareError::NotFound(_))
    ));

    let res = reqwest::get(format!("{}/api/view/Zz9_unused", base)).await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn bad_shapes_are_client_errors() {
    let base = spawn_server(Config::default()).await;
    let http = reqwest::Client::new();
    for body in [
        json!({"files": []}),
        json!({"files": "nope"}),
        json!({"files": [{"name": "a", "geojson": {"type": "Feature"}}]}),
    ] {
        let res = http
            .post(format!("{}/api/share", base))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 400, "body {}", body);
        let body: Value = res.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    let client = ShareClient::new(&base, 1024);
    assert!(matches!(
        client.share(&[]).await,
        Err(GeoShareError::Rejected { status: 400, .. })
    ));
}

#[tokio::test]
async fn oversized_share_reports_the_limit() {
    let base = spawn_server(Config {
        max_payload_bytes: 1024,
        ..Config::default()
    })
    .await;
    let client = ShareClient::new(&base, 999);
    let mut big = feature_collection(0.0, 0.0);
    big["features"][0]["properties"]["padding"] = json!("x".repeat(2048));

    let err = client
        .share(&[BundleFile {
            name: "big.geojson".into(),
            geojson: big,
        }])
        .await
        .unwrap_err();
    assert!(matches!(err, GeoShareError::PayloadTooLarge { limit_bytes: 1024 }));
    assert!(err.to_string().contains("1 KB"));
}

#[tokio::test]
async fn uploaded_batch_can_be_viewed_read_only() {
    let base = spawn_server(Config::default()).await;
    let client = ShareClient::new(&base, 1024);

    let mut editor = Session::new(HeadlessSurface::new(), "/");
    let outcome = editor
        .upload_batch(
            &client,
            vec![
                UploadedFile::new("notes.txt", "hello"),
                UploadedFile::new("spot.geojson", feature_collection(10.0, 20.0).to_string()),
            ],
        )
        .await
        .unwrap();
    assert_eq!(editor.registry().len(), 1);
    assert_eq!(outcome.report.errors.len(), 1);
    let link = outcome.share.expect("share attempted").expect("share link");
    assert_eq!(editor.share_link(), Some(link.as_str()));

    let path = link.strip_prefix(&base).unwrap();
    let mut viewer = Session::new(HeadlessSurface::new(), path);
    assert!(viewer.mode().is_read_only());
    let report = viewer.hydrate(&client).await.unwrap();
    assert!(report.is_clean());

    let files = viewer.registry().list_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "spot.geojson");
    assert_eq!(viewer.registry().surface().view(), files[0].bounds);
}

#[tokio::test]
async fn client_routes_fall_back_to_the_web_map() {
    let base = spawn_server(Config::default()).await;
    let res = reqwest::get(format!("{}/v/AbCdEf12", base)).await.unwrap();
    assert_eq!(res.status(), 200);
    let html = res.text().await.unwrap();
    assert!(html.contains("<title>GeoShare</title>"));
    assert!(html.contains("20 MB"));
}

#[tokio::test]
async fn unknown_shared_map_leaves_the_view_empty() {
    let base = spawn_server(Config::default()).await;
    let client = ShareClient::new(&base, 1024);

    let mut viewer = Session::new(HeadlessSurface::new(), "/v/Zz9_unused");
    let err = viewer.hydrate(&client).await.unwrap_err();
    assert!(matches!(err, GeoShareError::NotFound(ref id) if id == "Zz9_unused"));
    assert!(viewer.registry().is_empty());
    assert_eq!(viewer.registry().surface().view(), None);
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure() {
    // Bind then drop so the port is known to be closed
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ShareClient::new(format!("http://{}", addr), 1024);
    let files = [BundleFile {
        name: "spot.geojson".into(),
        geojson: feature_collection(1.0, 2.0),
    }];
    assert!(matches!(
        client.share(&files).await,
        Err(GeoShareError::NetworkFailure(_))
    ));
    assert!(matches!(
        client.fetch("AbCdEf12").await,
        Err(GeoShareError::NetworkFailure(_))
    ));
}

#[tokio::test]
async fn undecodable_success_body_is_an_unexpected_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/api/share", post(|| async { "not json" }))
        .route("/api/view/{id}", get(|| async { "<html></html>" }));
    tokio::spawn(async move { axum::serve(listener, app).await });

    let client = ShareClient::new(format!("http://{}", addr), 1024);
    let files = [BundleFile {
        name: "spot.geojson".into(),
        geojson: feature_collection(1.0, 2.0),
    }];
    assert!(matches!(
        client.share(&files).await,
        Err(GeoShareError::UnexpectedResponse { status: 200, .. })
    ));
    assert!(matches!(
        client.fetch("AbCdEf12").await,
        Err(GeoShareError::UnexpectedResponse { status: 200, .. })
    ));
}
