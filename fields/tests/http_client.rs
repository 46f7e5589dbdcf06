//! `HttpValidationClient` against a local stub of the validation backend.

mod common;

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use common::init_tracing;
use fields::config::ApiSettings;
use fields::element::{INVALID_CLASS, VALID_CLASS};
use fields::{
    FieldController, FieldElement, FieldKind, HttpValidationClient, MemoryElement, ValidationError,
    ValidationService,
};
use shared::models::DocumentKind;

type Recorded = Arc<Mutex<Vec<(String, Value)>>>;

struct StubBackend {
    base_url: String,
    requests: Recorded,
}

impl StubBackend {
    fn client(&self) -> HttpValidationClient {
        HttpValidationClient::from_config(&ApiSettings::with_base_url(&self.base_url)).unwrap()
    }

    fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

fn route(path: &str, body: &Value) -> (StatusCode, String) {
    let reply = match path {
        "/api/validation/document" => json!({
            "valid": true,
            "message": "CPF válido",
            "formatted": "123.456.789-09",
            "type": "cpf"
        }),
        "/api/validation/cep" if body["cep"] == "01310100" => json!({
            "success": true,
            "message": "CEP encontrado",
            "data": {
                "cep": "01310-100",
                "logradouro": "Avenida Paulista",
                "bairro": "",
                "localidade": "São Paulo",
                "uf": "SP"
            }
        }),
        "/api/validation/cep" => {
            return (
                StatusCode::NOT_FOUND,
                json!({"success": false, "message": "CEP não encontrado"}).to_string(),
            )
        }
        "/api/validation/email" => return (StatusCode::OK, "<html>oops</html>".to_string()),
        "/api/validation/cpf" => json!({
            "valid": false,
            "formatted": "111.111.111-11",
            "message": "CPF inválido"
        }),
        "/api/validation/cnpj" => json!({
            "valid": true,
            "formatted": "11.222.333/0001-81",
            "message": "CNPJ válido"
        }),
        _ => return (StatusCode::NOT_FOUND, "{}".to_string()),
    };
    (StatusCode::OK, reply.to_string())
}

async fn start_backend() -> StubBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests: Recorded = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let seen = seen.clone();
                    async move {
                        let path = req.uri().path().to_string();
                        let bytes = match req.into_body().collect().await {
                            Ok(collected) => collected.to_bytes(),
                            Err(_) => Bytes::new(),
                        };
                        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
                        let (status, reply) = route(&path, &body);
                        seen.lock().unwrap().push((path, body));

                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header("Content-Type", "application/json")
                                .body(Full::new(Bytes::from(reply)))
                                .unwrap(),
                        )
                    }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    StubBackend {
        base_url: format!("http://{}", addr),
        requests,
    }
}

#[tokio::test]
async fn test_validate_document_posts_digits() {
    let backend = start_backend().await;
    let result = backend.client().validate_document("12345678909").await.unwrap();

    assert!(result.valid);
    assert_eq!(result.message, "CPF válido");
    assert_eq!(result.formatted.as_deref(), Some("123.456.789-09"));
    assert_eq!(result.kind, Some(DocumentKind::Cpf));
    assert_eq!(
        backend.requests(),
        vec![(
            "/api/validation/document".to_string(),
            json!({"document": "12345678909"})
        )]
    );
}

#[tokio::test]
async fn test_lookup_cep_maps_address() {
    let backend = start_backend().await;
    let lookup = backend.client().lookup_cep("01310100").await.unwrap();

    assert!(lookup.success);
    let data = lookup.data.unwrap();
    assert_eq!(data.street.as_deref(), Some("Avenida Paulista"));
    assert_eq!(data.neighborhood, None);
    assert_eq!(data.city.as_deref(), Some("São Paulo"));
    assert_eq!(data.state_code.as_deref(), Some("SP"));
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let backend = start_backend().await;
    let err = backend.client().lookup_cep("99999999").await.unwrap_err();

    match err {
        ValidationError::Status { endpoint, status } => {
            assert_eq!(endpoint, "/api/validation/cep");
            assert_eq!(status, 404);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparsable_body_is_a_decode_error() {
    let backend = start_backend().await;
    let err = backend.client().validate_email("a@b.com").await.unwrap_err();

    assert!(matches!(err, ValidationError::Decode { .. }));
    assert_eq!(err.endpoint(), Some("/api/validation/email"));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpValidationClient::from_config(&ApiSettings::with_base_url(format!("http://{}", addr)))
            .unwrap();
    let err = client.validate_document("12345678909").await.unwrap_err();
    assert!(matches!(err, ValidationError::Transport { .. }));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_cpf_and_cnpj_endpoints() {
    let backend = start_backend().await;
    let client = backend.client();

    let cpf = client.validate_cpf("11111111111").await.unwrap();
    assert!(!cpf.valid);
    assert_eq!(cpf.formatted.as_deref(), Some("111.111.111-11"));

    let cnpj = client.validate_cnpj("11222333000181").await.unwrap();
    assert!(cnpj.valid);
    assert_eq!(cnpj.message, "CNPJ válido");

    let requests = backend.requests();
    assert_eq!(requests[0].1, json!({"cpf": "11111111111"}));
    assert_eq!(requests[1].0, "/api/validation/cnpj");
}

#[tokio::test]
async fn test_controllers_end_to_end() {
    init_tracing();
    let backend = start_backend().await;
    let client = Arc::new(backend.client());

    let document = MemoryElement::new("cpf");
    let document_controller = FieldController::builder(document.clone(), FieldKind::Document)
        .service(client.clone())
        .delay(Duration::from_millis(20))
        .build();

    let cep = MemoryElement::new("cep");
    let cep_controller = FieldController::builder(cep.clone(), FieldKind::Cep(Default::default()))
        .service(client)
        .delay(Duration::from_millis(20))
        .build();

    document_controller.input("12345678909");
    cep_controller.input("99999-999");

    let mut settled = false;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if document.has_class(VALID_CLASS) && cep.has_class(INVALID_CLASS) {
            settled = true;
            break;
        }
    }
    assert!(settled, "controllers never rendered a result");
    assert_eq!(document.value(), "123.456.789-09");
    assert_eq!(document.feedback_text().as_deref(), Some("CPF válido"));
    assert_eq!(cep.feedback_text().as_deref(), Some("Erro na consulta do CEP"));
}
