//! Values written into a request body come back unchanged through path extraction.
//!
//! The stub server echoes the request body and Content-Type of every request.

use assay::matcher::equal_to;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start an HTTP/1.1 echo server and return its base URL.
async fn start_echo_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind echo server");
    let addr = listener.local_addr().expect("Missing local address");
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(echo(stream));
        }
    });
    format!("http://{addr}")
}

async fn echo(mut stream: TcpStream) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let read = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let header = |name: &str| {
        head.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    };
    let length: usize = header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let content_type = header("content-type").unwrap_or_default();

    while buffer.len() < header_end + length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
        }
    }
    let body = &buffer[header_end..header_end + length];

    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    let _ = stream.write_all(&response).await;
    let _ = stream.shutdown().await;
}

fn place() -> Value {
    json!({
        "Name": "Sun City",
        "Inhabitants": 100000,
        "IsCapital": true,
        "Area": 12.5
    })
}

#[tokio::test]
async fn test_json_round_trip_preserves_types() {
    let base = start_echo_server().await;

    let response = assay::given()
        .json_body(&place())
        .when()
        .post(&format!("{base}/echo"))
        .await
        .expect("request should succeed");

    let extract = response.extract();
    assert_eq!(extract.body("$.Name").unwrap(), json!("Sun City"));
    assert_eq!(extract.body("$.Inhabitants").unwrap(), json!(100000));
    assert_eq!(extract.body("$.IsCapital").unwrap(), json!(true));
    assert_eq!(extract.body("$.Area").unwrap(), json!(12.5));
    response
        .then()
        .content_type("application/json")
        .unwrap()
        .body_path("$.Inhabitants", equal_to(100000))
        .unwrap();
}

#[tokio::test]
async fn test_xml_round_trip_yields_strings() {
    let base = start_echo_server().await;

    let response = assay::given()
        .xml_body("Place", &place())
        .when()
        .post(&format!("{base}/echo"))
        .await
        .expect("request should succeed");

    let extract = response.extract();
    assert_eq!(extract.body("/Place/Name").unwrap(), json!("Sun City"));
    assert_eq!(extract.body("/Place/Inhabitants").unwrap(), json!("100000"));
    assert_eq!(extract.body("/Place/IsCapital").unwrap(), json!("true"));
    assert_eq!(extract.body("/Place/Area").unwrap(), json!("12.5"));
}

#[tokio::test]
async fn test_xml_round_trip_through_deserialization() {
    let base = start_echo_server().await;

    let places = json!({
        "Place": [
            {"@id": 1, "Name": "Sun City"},
            {"@id": 2, "Name": "Pleasure Meadow"}
        ]
    });
    let response = assay::given()
        .xml_body("Places", &places)
        .when()
        .post(&format!("{base}/echo"))
        .await
        .expect("request should succeed");

    let value: Value = response.deserialize_to().unwrap();
    assert_eq!(
        value,
        json!({
            "Place": [
                {"@id": "1", "Name": "Sun City"},
                {"@id": "2", "Name": "Pleasure Meadow"}
            ]
        })
    );
    assert_eq!(
        response.extract().body_list("//Place/@id").unwrap(),
        vec![json!("1"), json!("2")]
    );
}

#[tokio::test]
async fn test_raw_body_round_trip() {
    let base = start_echo_server().await;

    let response = assay::given()
        .content_type("text/plain")
        .body("Sun City")
        .when()
        .post(&format!("{base}/echo"))
        .await
        .expect("request should succeed");

    response.then().body("Sun City").unwrap();
    assert_eq!(response.extract().body_as_string(), "Sun City");
}
