use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::config::Configuration;
use crate::error::{AppError, RemoteCallError};
use crate::pipeline::transfer::wire::{
    parse_predict_response, parse_upload_response, PredictRequest, IMAGE_FIELD,
};
use crate::pipeline::types::{ImageFile, RawModelResult, StorageReference};

/// The two remote calls the inference service exposes. No business logic
/// lives behind this seam.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    async fn upload(&self, image: &ImageFile) -> Result<StorageReference, RemoteCallError>;

    async fn predict(
        &self,
        request: &PredictRequest,
    ) -> Result<Vec<RawModelResult>, RemoteCallError>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    upload_url: String,
    predict_url: String,
}

impl HttpTransport {
    pub fn new(configuration: &Configuration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(AppError::HttpClient)?;
        Ok(Self::with_client(http, configuration))
    }

    pub fn with_client(http: reqwest::Client, configuration: &Configuration) -> Self {
        Self {
            http,
            upload_url: configuration.upload_url(),
            predict_url: configuration.predict_url(),
        }
    }

    async fn successful_body(response: reqwest::Response) -> Result<Vec<u8>, RemoteCallError> {
        let status = response.status();
        if !status.is_success() {
            debug!("{} answered {}", response.url(), status);
            return Err(RemoteCallError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl InferenceTransport for HttpTransport {
    async fn upload(&self, image: &ImageFile) -> Result<StorageReference, RemoteCallError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())?;
        let form = Form::new().part(IMAGE_FIELD, part);

        debug!("POST {} ({} bytes)", self.upload_url, image.byte_len());
        let response = self.http.post(&self.upload_url).multipart(form).send().await?;
        let body = Self::successful_body(response).await?;
        parse_upload_response(&body)
    }

    async fn predict(
        &self,
        request: &PredictRequest,
    ) -> Result<Vec<RawModelResult>, RemoteCallError> {
        debug!("POST {} for {}", self.predict_url, request.file_path);
        let response = self.http.post(&self.predict_url).json(request).send().await?;
        let body = Self::successful_body(response).await?;
        parse_predict_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// Answers one connection per canned reply, in order, and returns the
    /// raw requests it saw.
    async fn serve_replies(
        replies: Vec<(u16, &'static str)>,
    ) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                let reason = if status == 200 { "OK" } else { "Internal Server Error" };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
            requests
        });
        (format!("http://{}", address), server)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        while !request_complete(&raw) {
            let read = socket.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn request_complete(raw: &[u8]) -> bool {
        let Some(header_end) = raw.windows(4).position(|window| window == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&raw[..header_end]).to_ascii_lowercase();
        let body = &raw[header_end + 4..];
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok());
        match content_length {
            Some(length) => body.len() >= length,
            None if headers.contains("transfer-encoding: chunked") => body.ends_with(b"0\r\n\r\n"),
            None => true,
        }
    }

    fn transport_for(service_url: String) -> HttpTransport {
        let configuration = Configuration {
            service_url,
            ..Configuration::default()
        };
        HttpTransport::new(&configuration).unwrap()
    }

    #[test]
    fn test_http_transport_targets_fixed_endpoints() {
        let transport = transport_for("http://127.0.0.1:5000".to_string());
        assert_eq!(transport.upload_url, "http://127.0.0.1:5000/upload");
        assert_eq!(transport.predict_url, "http://127.0.0.1:5000/predict");
    }

    #[tokio::test]
    async fn test_upload_and_predict_over_http() {
        let (service_url, server) = serve_replies(vec![
            (200, r#"{"file_path": "src/upload/scan.png"}"#),
            (
                200,
                r#"{"models": [{"Probabilities": [0.1, 0.7, 0.2], "Predicted_Class": "Osteopenia"}]}"#,
            ),
        ])
        .await;
        let transport = transport_for(service_url);
        let image = ImageFile::new("scan.png", PNG_SIGNATURE.to_vec()).unwrap();

        let reference = transport.upload(&image).await.unwrap();
        assert_eq!(reference.as_str(), "src/upload/scan.png");
        let models = transport
            .predict(&PredictRequest::new(reference, true))
            .await
            .unwrap();
        assert_eq!(
            models,
            vec![RawModelResult::new(vec![0.1, 0.7, 0.2], "Osteopenia")]
        );

        let requests = server.await.unwrap();
        let upload = requests[0].to_ascii_lowercase();
        assert!(upload.starts_with("post /upload http/1.1"));
        assert!(upload.contains("content-type: multipart/form-data"));
        assert!(upload.contains(r#"name="image"; filename="scan.png""#));
        assert!(upload.contains("content-type: image/png"));

        let predict = &requests[1];
        assert!(predict.starts_with("POST /predict HTTP/1.1"));
        assert!(predict
            .to_ascii_lowercase()
            .contains("content-type: application/json"));
        assert!(predict.ends_with(r#"{"file_path":"src/upload/scan.png","useEnsemble":true}"#));
    }

    #[tokio::test]
    async fn test_http_failures_map_to_remote_errors() {
        let (service_url, server) = serve_replies(vec![
            (500, r#"{"message": "File upload failed"}"#),
            (200, r#"{"message": "No file part"}"#),
            (500, r#"{"error": "cannot identify image file"}"#),
        ])
        .await;
        let transport = transport_for(service_url);
        let image = ImageFile::new("scan.png", PNG_SIGNATURE.to_vec()).unwrap();

        assert!(matches!(
            transport.upload(&image).await,
            Err(RemoteCallError::Status { status: 500 })
        ));
        assert!(matches!(
            transport.upload(&image).await,
            Err(RemoteCallError::MissingField("file_path"))
        ));
        let request = PredictRequest::new(StorageReference::new("src/upload/scan.png"), false);
        assert!(matches!(
            transport.predict(&request).await,
            Err(RemoteCallError::Status { status: 500 })
        ));

        let requests = server.await.unwrap();
        assert!(requests[2].ends_with(r#"{"file_path":"src/upload/scan.png"}"#));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let transport = transport_for(format!("http://{}", address));
        let image = ImageFile::new("scan.png", vec![1, 2, 3]).unwrap();
        let result = transport.upload(&image).await;
        assert!(matches!(result, Err(RemoteCallError::Http(_))));
    }
}
