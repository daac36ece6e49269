//! Instructor course authoring
//!
//! Course, module and lesson CRUD under `/instructor/courses`. Modules and
//! lessons are addressed by their index within the parent, the same way the
//! upload flow addresses them.

use super::models::{
    Course, CourseDraft, CourseEnvelope, CourseModule, CoursesEnvelope, Lesson,
};
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use std::sync::Arc;
use tracing::debug;

/// Path prefix for every instructor endpoint
pub const INSTRUCTOR_COURSES: &str = "/instructor/courses";

/// Course authoring service
#[derive(Debug, Clone)]
pub struct InstructorApi {
    client: Arc<HttpClient>,
}

impl InstructorApi {
    /// Create the service over a shared client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Courses owned by the signed-in instructor
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        let envelope: CoursesEnvelope = self
            .client
            .send_json(ApiRequest::get(INSTRUCTOR_COURSES))
            .await?;
        debug!("Fetched {} courses", envelope.courses.len());
        Ok(envelope.courses)
    }

    /// One course with its modules and lessons
    pub async fn get_course(&self, course_id: &str) -> Result<Course> {
        self.course_request(ApiRequest::get(course_path(course_id)))
            .await
    }

    /// Create a course
    pub async fn create_course(&self, draft: &CourseDraft) -> Result<Course> {
        self.course_request(ApiRequest::post(INSTRUCTOR_COURSES).body(draft)?)
            .await
    }

    /// Replace a course's top-level fields
    pub async fn update_course(&self, course_id: &str, draft: &CourseDraft) -> Result<Course> {
        self.course_request(ApiRequest::put(course_path(course_id)).body(draft)?)
            .await
    }

    /// Delete a course
    pub async fn delete_course(&self, course_id: &str) -> Result<()> {
        self.client
            .send(ApiRequest::delete(course_path(course_id)))
            .await?;
        Ok(())
    }

    /// Append a module
    pub async fn add_module(&self, course_id: &str, module: &CourseModule) -> Result<Course> {
        let path = format!("{}/modules", course_path(course_id));
        self.course_request(ApiRequest::post(path).body(module)?)
            .await
    }

    /// Replace the module at `module_index`
    pub async fn update_module(
        &self,
        course_id: &str,
        module_index: usize,
        module: &CourseModule,
    ) -> Result<Course> {
        self.course_request(ApiRequest::put(module_path(course_id, module_index)).body(module)?)
            .await
    }

    /// Delete the module at `module_index`
    pub async fn delete_module(&self, course_id: &str, module_index: usize) -> Result<Course> {
        self.course_request(ApiRequest::delete(module_path(course_id, module_index)))
            .await
    }

    /// Append a lesson to a module
    pub async fn add_lesson(
        &self,
        course_id: &str,
        module_index: usize,
        lesson: &Lesson,
    ) -> Result<Course> {
        let path = format!("{}/lessons", module_path(course_id, module_index));
        self.course_request(ApiRequest::post(path).body(lesson)?)
            .await
    }

    /// Replace a lesson
    pub async fn update_lesson(
        &self,
        course_id: &str,
        module_index: usize,
        lesson_index: usize,
        lesson: &Lesson,
    ) -> Result<Course> {
        let path = lesson_path(course_id, module_index, lesson_index);
        self.course_request(ApiRequest::put(path).body(lesson)?)
            .await
    }

    /// Delete a lesson
    pub async fn delete_lesson(
        &self,
        course_id: &str,
        module_index: usize,
        lesson_index: usize,
    ) -> Result<Course> {
        let path = lesson_path(course_id, module_index, lesson_index);
        self.course_request(ApiRequest::delete(path)).await
    }

    async fn course_request(&self, request: ApiRequest) -> Result<Course> {
        let envelope: CourseEnvelope = self.client.send_json(request).await?;
        Ok(envelope.course)
    }
}

fn course_path(course_id: &str) -> String {
    format!("{INSTRUCTOR_COURSES}/{course_id}")
}

fn module_path(course_id: &str, module_index: usize) -> String {
    format!("{}/modules/{module_index}", course_path(course_id))
}

fn lesson_path(course_id: &str, module_index: usize, lesson_index: usize) -> String {
    format!(
        "{}/lessons/{lesson_index}",
        module_path(course_id, module_index)
    )
}
