//! Typed API services
//!
//! Every service sends through the shared [`HttpClient`](crate::http::HttpClient),
//! so all of them get the same session refresh and error classification.
//!
//! - `InstructorApi` - course, module and lesson CRUD
//! - `Uploader` - presigned-URL uploads of thumbnails and lesson videos
//! - `PaymentApi` - student invoices
//! - `AccountApi` - signup, login, logout

mod account;
mod instructor;
mod models;
mod payments;
mod upload;

pub use account::AccountApi;
pub use instructor::{InstructorApi, INSTRUCTOR_COURSES};
pub use models::{
    AuthResponse, Course, CourseDraft, CourseModule, Invoice, InvoiceParty, Lesson, LoginRequest,
    PaymentStatus, SignupRequest, UserProfile, UserRole,
};
pub use payments::PaymentApi;
pub use upload::{
    content_type_for, MediaProbe, PresignedUpload, PresignedUrlRequest, ProbeError, UploadFile,
    UploadTarget, UploadedFile, Uploader,
};

#[cfg(test)]
mod tests;
