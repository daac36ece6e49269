//! Tests for the API services

use super::*;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::http::HttpClient;
use crate::types::FileKind;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Arc<HttpClient> {
    let config = ClientConfig::builder().server(server.uri()).build();
    Arc::new(HttpClient::new(config).unwrap())
}

fn course_json() -> serde_json::Value {
    json!({
        "_id": "c1",
        "title": "Rust for Web Developers",
        "price": 49.0,
        "isPublished": false,
        "modules": [
            {
                "title": "Ownership",
                "lessons": [
                    {"title": "Moves", "video": "videos/c1/0/0.mp4", "duration": 312.5}
                ]
            }
        ]
    })
}

struct FixedProbe(f64);

#[async_trait]
impl MediaProbe for FixedProbe {
    async fn probe_duration(&self, _file: &UploadFile) -> Result<f64, ProbeError> {
        Ok(self.0)
    }
}

struct BrokenProbe;

#[async_trait]
impl MediaProbe for BrokenProbe {
    async fn probe_duration(&self, _file: &UploadFile) -> Result<f64, ProbeError> {
        Err(ProbeError("no video track".to_string()))
    }
}

// ============================================================================
// Models
// ============================================================================

#[test]
fn test_course_parse() {
    let course: Course = serde_json::from_value(course_json()).unwrap();

    assert_eq!(course.id, "c1");
    assert_eq!(course.price, Some(49.0));
    assert!(!course.is_published);
    assert_eq!(course.modules.len(), 1);
    let lesson = &course.modules[0].lessons[0];
    assert_eq!(lesson.video_key.as_deref(), Some("videos/c1/0/0.mp4"));
    assert_eq!(lesson.duration, Some(312.5));
}

#[test]
fn test_course_draft_skips_empty_fields() {
    let draft = CourseDraft {
        title: "Async Rust".to_string(),
        price: Some(19.0),
        ..CourseDraft::default()
    };
    assert_eq!(
        serde_json::to_value(&draft).unwrap(),
        json!({"title": "Async Rust", "price": 19.0})
    );
}

#[test]
fn test_invoice_parse() {
    let invoice: Invoice = serde_json::from_value(json!({
        "_id": "pay_1",
        "invoiceNumber": "INV-0042",
        "student": {"name": "Ada", "email": "ada@example.com"},
        "courseTitle": "Rust for Web Developers",
        "amount": 49.0,
        "currency": "USD",
        "status": "completed",
        "paidAt": "2026-03-01T10:00:00Z"
    }))
    .unwrap();

    assert_eq!(invoice.invoice_number.as_deref(), Some("INV-0042"));
    assert_eq!(invoice.status, PaymentStatus::Completed);
    assert_eq!(invoice.paid_at.unwrap().to_rfc3339(), "2026-03-01T10:00:00+00:00");
}

#[test]
fn test_presigned_request_wire_format() {
    let body = PresignedUrlRequest {
        file_type: FileKind::Video,
        file_name: "intro.mp4".to_string(),
        module_index: Some(0),
        lesson_index: Some(2),
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({"fileType": "video", "fileName": "intro.mp4", "moduleIndex": 0, "lessonIndex": 2})
    );

    let thumb = PresignedUrlRequest {
        file_type: FileKind::Thumbnail,
        file_name: "cover.png".to_string(),
        module_index: None,
        lesson_index: None,
    };
    assert_eq!(
        serde_json::to_value(&thumb).unwrap(),
        json!({"fileType": "thumbnail", "fileName": "cover.png"})
    );
}

#[test_case("intro.mp4", "video/mp4")]
#[test_case("Lecture.MOV", "video/quicktime")]
#[test_case("cover.jpeg", "image/jpeg")]
#[test_case("cover.png", "image/png")]
#[test_case("notes", "application/octet-stream")]
fn test_content_type_for(name: &str, expected: &str) {
    assert_eq!(content_type_for(name), expected);
}

// ============================================================================
// InstructorApi
// ============================================================================

#[tokio::test]
async fn test_list_courses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/instructor/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"courses": [course_json()]})))
        .expect(1)
        .mount(&server)
        .await;

    let api = InstructorApi::new(client_for(&server));
    let courses = api.list_courses().await.unwrap();

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].title, "Rust for Web Developers");
}

#[tokio::test]
async fn test_create_course() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/instructor/courses"))
        .and(body_json(json!({"title": "Rust for Web Developers", "price": 49.0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"course": course_json()})))
        .expect(1)
        .mount(&server)
        .await;

    let api = InstructorApi::new(client_for(&server));
    let draft = CourseDraft {
        title: "Rust for Web Developers".to_string(),
        price: Some(49.0),
        ..CourseDraft::default()
    };
    let course = api.create_course(&draft).await.unwrap();
    assert_eq!(course.id, "c1");
}

#[tokio::test]
async fn test_lesson_crud_paths() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/instructor/courses/c1/modules/0/lessons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"course": course_json()})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/instructor/courses/c1/modules/0/lessons/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"course": course_json()})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/instructor/courses/c1/modules/0/lessons/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"course": course_json()})))
        .expect(1)
        .mount(&server)
        .await;

    let api = InstructorApi::new(client_for(&server));
    let lesson = Lesson {
        title: "Moves".to_string(),
        ..Lesson::default()
    };

    api.add_lesson("c1", 0, &lesson).await.unwrap();
    api.update_lesson("c1", 0, 0, &lesson).await.unwrap();
    api.delete_lesson("c1", 0, 0).await.unwrap();
}

#[tokio::test]
async fn test_module_crud_paths() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/instructor/courses/c1/modules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"course": course_json()})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/instructor/courses/c1/modules/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"course": course_json()})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/instructor/courses/c1/modules/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"course": course_json()})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/instructor/courses/c1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = InstructorApi::new(client_for(&server));
    let module = CourseModule {
        title: "Lifetimes".to_string(),
        ..CourseModule::default()
    };

    api.add_module("c1", &module).await.unwrap();
    api.update_module("c1", 1, &module).await.unwrap();
    api.delete_module("c1", 1).await.unwrap();
    api.delete_course("c1").await.unwrap();
}

#[tokio::test]
async fn test_course_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/instructor/courses/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let api = InstructorApi::new(client_for(&server));
    let err = api.get_course("c1").await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

// ============================================================================
// Uploader
// ============================================================================

#[tokio::test]
async fn test_upload_thumbnail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/instructor/courses/presigned-url"))
        .and(body_json(json!({"fileType": "thumbnail", "fileName": "cover.png"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": format!("{}/storage/thumbs/cover.png?sig=abc", server.uri()),
            "key": "thumbs/cover.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/storage/thumbs/cover.png"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let uploader = Uploader::new(client_for(&server))
        .unwrap()
        .with_probe(Arc::new(FixedProbe(10.0)));
    let file = UploadFile::new("cover.png", "image/png", vec![0x89, b'P', b'N', b'G']);

    let uploaded = uploader
        .upload(UploadTarget::thumbnail(), &file)
        .await
        .unwrap();

    assert_eq!(uploaded.key, "thumbs/cover.png");
    // Thumbnails are never probed
    assert_eq!(uploaded.duration, None);
}

#[tokio::test]
async fn test_upload_lesson_video_with_probe() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/instructor/courses/presigned-url"))
        .and(body_json(json!({
            "fileType": "video",
            "fileName": "intro.mp4",
            "moduleIndex": 1,
            "lessonIndex": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": format!("{}/storage/videos/intro.mp4", server.uri()),
            "key": "videos/intro.mp4"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/storage/videos/intro.mp4"))
        .and(header("content-type", "video/mp4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let uploader = Uploader::new(client_for(&server))
        .unwrap()
        .with_probe(Arc::new(FixedProbe(95.0)));
    let file = UploadFile::new("intro.mp4", "video/mp4", vec![0u8; 64]);

    let uploaded = uploader
        .upload(UploadTarget::lesson_video(1, 3), &file)
        .await
        .unwrap();

    assert_eq!(uploaded.key, "videos/intro.mp4");
    assert_eq!(uploaded.duration, Some(95.0));
}

#[tokio::test]
async fn test_upload_probe_failure_skips_presign() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/instructor/courses/presigned-url"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let uploader = Uploader::new(client_for(&server))
        .unwrap()
        .with_probe(Arc::new(BrokenProbe));
    let file = UploadFile::new("intro.mp4", "video/mp4", vec![0u8; 8]);

    let err = uploader
        .upload(UploadTarget::lesson_video(0, 0), &file)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Probe { ref message } if message == "no video track"));
}

#[tokio::test]
async fn test_upload_storage_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/instructor/courses/presigned-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": format!("{}/storage/expired", server.uri()),
            "key": "videos/expired.mp4"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/storage/expired"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Request has expired"))
        .mount(&server)
        .await;

    let uploader = Uploader::new(client_for(&server)).unwrap();
    let file = UploadFile::new("expired.mp4", "video/mp4", vec![1u8, 2, 3]);

    let err = uploader
        .upload(UploadTarget::lesson_video(0, 0), &file)
        .await
        .unwrap_err();

    // A storage 403 is an upload failure, not a session revocation
    assert!(matches!(err, Error::Upload { .. }));
    assert!(!err.is_redirect());
}

#[tokio::test]
async fn test_upload_stalled_storage_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/instructor/courses/presigned-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": format!("{}/storage/slow", server.uri()),
            "key": "thumbs/slow.png"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/storage/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(4)))
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .server(server.uri())
        .timeout(std::time::Duration::from_secs(1))
        .build();
    let uploader = Uploader::new(Arc::new(HttpClient::new(config).unwrap())).unwrap();
    let file = UploadFile::new("slow.png", "image/png", vec![0u8; 8]);

    let start = std::time::Instant::now();
    let err = uploader
        .upload(UploadTarget::thumbnail(), &file)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(start.elapsed() < std::time::Duration::from_secs(3));
}

#[tokio::test]
async fn test_upload_file_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("lesson-1.webm");
    tokio::fs::write(&file_path, b"webm-bytes").await.unwrap();

    let file = UploadFile::from_path(&file_path).await.unwrap();
    assert_eq!(file.file_name, "lesson-1.webm");
    assert_eq!(file.content_type, "video/webm");
    assert_eq!(file.len(), 10);
}

// ============================================================================
// PaymentApi / AccountApi
// ============================================================================

#[tokio::test]
async fn test_get_invoice_uses_user_scope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/payments/pay_1/invoice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invoice": {
                "_id": "pay_1",
                "student": {"name": "Ada", "email": "ada@example.com"},
                "courseTitle": "Rust for Web Developers",
                "amount": 49.0,
                "status": "pending"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = PaymentApi::new(client_for(&server));
    let invoice = api.get_invoice("pay_1").await.unwrap();

    assert_eq!(invoice.id, "pay_1");
    assert_eq!(invoice.status, PaymentStatus::Pending);
    assert!(invoice.paid_at.is_none());
}

#[tokio::test]
async fn test_signup() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/signup"))
        .and(body_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "hunter22",
            "role": "instructor"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "Account created",
            "user": {"_id": "u1", "name": "Ada", "email": "ada@example.com", "role": "instructor"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = AccountApi::new(client_for(&server));
    let response = api
        .signup(&SignupRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter22".to_string(),
            role: UserRole::Instructor,
        })
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.user.unwrap().role, UserRole::Instructor);
}

#[tokio::test]
async fn test_me_after_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "u1", "name": "Ada", "email": "ada@example.com"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/user/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = AccountApi::new(client_for(&server));
    let me = api.me().await.unwrap();
    assert_eq!(me.name, "Ada");
    assert_eq!(me.role, UserRole::Student);
}

#[tokio::test]
async fn test_login_then_logout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "hunter22"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "accessToken=abc; Path=/")
                .set_body_json(json!({"success": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/user/logout"))
        .and(header("cookie", "accessToken=abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "Logged out"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = AccountApi::new(client_for(&server));
    let login = api
        .login(&LoginRequest {
            email: "ada@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap();
    assert!(login.success);

    let logout = api.logout().await.unwrap();
    assert_eq!(logout.message.as_deref(), Some("Logged out"));
}

#[tokio::test]
async fn test_login_bad_credentials_is_unhandled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&server)
        .await;

    let api = AccountApi::new(client_for(&server));
    let err = api
        .login(&LoginRequest {
            email: "ada@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(!err.is_redirect());
}
