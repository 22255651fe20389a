//! HTTP gateway against a mock backend.

mod common;

use common::{pdf, walk_to_review};
use mockito::{Matcher, Server};
use quickcrate_onboard::config::{default_config, GatewayConfig};
use quickcrate_onboard::error::{SubmissionError, UploadError};
use quickcrate_onboard::gateway::{HttpMerchantApi, MerchantApi};
use quickcrate_onboard::registration::{
    sample_payload, DocumentKind, DocumentSet, TermsAcceptance,
};
use quickcrate_onboard::RegistrationWizard;
use serde_json::json;

fn api_for(server: &Server) -> HttpMerchantApi {
    HttpMerchantApi::new(GatewayConfig {
        api_base_url: format!("{}/api", server.url()),
        timeout_secs: 5,
        ..default_config()
    })
}

fn multipart() -> Matcher {
    Matcher::Regex("^multipart/form-data; boundary=".to_string())
}

#[test]
fn upload_posts_multipart_and_returns_server_path() {
    let mut server = Server::new();
    let upload = server
        .mock("POST", "/api/Upload/Document")
        .match_header("content-type", multipart())
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("filename=\"kra.pdf\"".to_string()),
            Matcher::Regex("%PDF-1.4 test".to_string()),
            Matcher::Regex("name=\"type\"\r\n\r\nkrapin\r\n".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"filePath":"/uploads/documents/kra.pdf"}"#)
        .create();
    let api = api_for(&server);

    let path = api
        .upload_file(&pdf("kra.pdf"), DocumentKind::TaxCertificate)
        .expect("upload succeeds");
    assert_eq!(path, "/uploads/documents/kra.pdf");
    upload.assert();
}

#[test]
fn upload_error_status_carries_server_message() {
    let mut server = Server::new();
    let upload = server
        .mock("POST", "/api/Upload/Document")
        .with_status(413)
        .with_body(r#"{"message":"Document too large"}"#)
        .create();
    let api = api_for(&server);

    let err = api
        .upload_file(&pdf("reg.pdf"), DocumentKind::BusinessRegistration)
        .expect_err("upload rejected");
    assert_eq!(
        err,
        UploadError::Rejected {
            status: 413,
            message: "Document too large".to_string(),
        }
    );
    upload.assert();
}

#[test]
fn upload_without_path_is_an_error() {
    let mut server = Server::new();
    let _upload = server
        .mock("POST", "/api/Upload/Document")
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create();
    let api = api_for(&server);

    let err = api
        .upload_file(&pdf("kra.pdf"), DocumentKind::TaxCertificate)
        .expect_err("missing path");
    assert_eq!(err, UploadError::MissingPath);
}

#[test]
fn register_posts_canonical_json() {
    let mut server = Server::new();
    let register = server
        .mock("POST", "/api/Merchant/AddMerchant")
        .match_body(Matcher::PartialJson(json!({
            "krapin": "A123456789Z",
            "preferredPaymentChannel": "bank,mpesa",
            "termsAndCondition": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":99}"#)
        .create();
    let api = api_for(&server);

    let reply = api
        .register_merchant(&sample_payload())
        .expect("registration accepted");
    assert_eq!(reply["id"], 99);
    register.assert();
}

#[test]
fn register_failure_without_message_reports_status() {
    let mut server = Server::new();
    let _register = server
        .mock("POST", "/api/Merchant/AddMerchant")
        .with_status(500)
        .with_body("Internal Server Error")
        .create();
    let api = api_for(&server);

    let err = api
        .register_merchant(&sample_payload())
        .expect_err("registration rejected");
    assert_eq!(err.to_string(), "HTTP error! status: 500");
    assert_eq!(err.status(), Some(500));
}

#[test]
fn wizard_upload_500_never_reaches_registration_endpoint() {
    let mut server = Server::new();
    let upload = server
        .mock("POST", "/api/Upload/Document")
        .with_status(500)
        .with_body("{}")
        .expect(1)
        .create();
    let register = server
        .mock("POST", "/api/Merchant/AddMerchant")
        .expect(0)
        .create();
    let api = api_for(&server);
    let mut wizard = RegistrationWizard::new();
    walk_to_review(
        &mut wizard,
        DocumentSet {
            tax_certificate: Some(pdf("kra.pdf")),
            business_registration_certificate: None,
        },
    );

    let err = wizard
        .submit(&api, TermsAcceptance::accepted())
        .expect_err("upload fails");
    assert!(matches!(
        err,
        SubmissionError::Upload(UploadError::Rejected { status: 500, .. })
    ));
    upload.assert();
    register.assert();
}

#[test]
fn wizard_uploads_then_registers_over_http() {
    let mut server = Server::new();
    let upload = server
        .mock("POST", "/api/Upload/Document")
        .with_status(200)
        .with_body(r#"{"url":"/uploads/documents/kra.pdf"}"#)
        .create();
    let register = server
        .mock("POST", "/api/Merchant/AddMerchant")
        .match_body(Matcher::PartialJson(json!({
            "krapinCertificate": "/uploads/documents/kra.pdf",
            "businessRegistrationCertificate": ""
        })))
        .with_status(201)
        .with_body(r#"{"merchantId":12}"#)
        .create();
    let api = api_for(&server);
    let mut wizard = RegistrationWizard::new();
    walk_to_review(
        &mut wizard,
        DocumentSet {
            tax_certificate: Some(pdf("kra.pdf")),
            business_registration_certificate: None,
        },
    );

    let payload = wizard
        .submit(&api, TermsAcceptance::accepted())
        .expect("submission succeeds");
    assert_eq!(payload.krapin_certificate, "/uploads/documents/kra.pdf");
    upload.assert();
    register.assert();
}
