use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Multipart, Path},
    http::{HeaderMap, Method, StatusCode},
    response::Redirect,
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the `/echo` route saw: method, every header value in arrival
/// order (duplicates preserved), and the raw body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// What the `/multipart` route parsed out of the request body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultipartEcho {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilePart {
    pub name: String,
    pub filename: String,
    pub size: usize,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route("/multipart", post(multipart))
        .route("/redirect", get(redirect))
        .route("/delay/{ms}", get(delay))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn multipart(mut parts: Multipart) -> Result<Json<MultipartEcho>, StatusCode> {
    let mut fields = Vec::new();
    let mut files = Vec::new();
    while let Some(part) = parts
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = part.name().unwrap_or_default().to_string();
        match part.file_name().map(str::to_string) {
            Some(filename) => {
                let data = part.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                files.push(FilePart {
                    name,
                    filename,
                    size: data.len(),
                });
            }
            None => {
                let value = part.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                fields.push((name, value));
            }
        }
    }
    Ok(Json(MultipartEcho { fields, files }))
}

async fn redirect() -> Redirect {
    Redirect::to("/echo")
}

async fn delay(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            method: "POST".to_string(),
            headers: vec![("x-token".to_string(), "1".to_string())],
            body: "hello".to_string(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["headers"][0][0], "x-token");
        assert_eq!(json["body"], "hello");
    }

    #[test]
    fn multipart_echo_roundtrips_through_json() {
        let echo = MultipartEcho {
            fields: vec![("a".to_string(), "b".to_string())],
            files: vec![FilePart {
                name: "upload".to_string(),
                filename: "hello.txt".to_string(),
                size: 11,
            }],
        };
        let json = serde_json::to_string(&echo).unwrap();
        let back: MultipartEcho = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fields, echo.fields);
        assert_eq!(back.files[0].filename, "hello.txt");
        assert_eq!(back.files[0].size, 11);
    }
}
