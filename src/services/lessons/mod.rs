pub mod calendar;
pub mod cancel;
pub mod complete;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    lessons::{
        entities::Lesson,
        requests::{
            CalendarParams, CancelLessonRequest, CreateLessonRequest, LessonListParams,
            UpdateLessonRequest,
        },
    },
    users::entities::User,
};
use crate::storage::Storage;

pub struct LessonService {
    storage: Option<Arc<dyn Storage>>,
}

impl LessonService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 排课 / 预约
    pub async fn create_lesson(
        &self,
        req: CreateLessonRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_lesson(self, req, request).await
    }

    pub async fn list_lessons(
        &self,
        query: LessonListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_lessons(self, query, request).await
    }

    // 日历视图
    pub async fn calendar(
        &self,
        params: CalendarParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        calendar::get_calendar(self, params, request).await
    }

    pub async fn get_lesson(
        &self,
        lesson_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_lesson(self, lesson_id, request).await
    }

    // 修改 / 改期
    pub async fn update_lesson(
        &self,
        lesson_id: i64,
        update: UpdateLessonRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_lesson(self, lesson_id, update, request).await
    }

    pub async fn cancel_lesson(
        &self,
        lesson_id: i64,
        req: CancelLessonRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        cancel::cancel_lesson(self, lesson_id, req, request).await
    }

    pub async fn complete_lesson(
        &self,
        lesson_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        complete::complete_lesson(self, lesson_id, request).await
    }

    pub async fn delete_lesson(
        &self,
        lesson_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_lesson(self, lesson_id, request).await
    }
}

/// 课时的参与者或管理员可以查看
pub(crate) fn can_view(user: &User, lesson: &Lesson) -> bool {
    user.is_admin() || lesson.involves(user.id)
}

/// 只有该课时的教师或管理员可以管理
pub(crate) fn can_manage(user: &User, lesson: &Lesson) -> bool {
    user.is_admin() || (user.is_tutor() && lesson.tutor_id == user.id)
}

pub(crate) fn lesson_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::LessonNotFound,
        "Lesson not found",
    ))
}

pub(crate) fn lesson_not_scheduled() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::LessonNotScheduled,
        "Lesson is no longer scheduled",
    ))
}

/// 读取课时，不存在或无权查看时返回对应响应
pub(crate) async fn load_visible_lesson(
    storage: &Arc<dyn Storage>,
    lesson_id: i64,
    user: &User,
) -> Result<Lesson, HttpResponse> {
    match storage.get_lesson_by_id(lesson_id).await {
        Ok(Some(lesson)) if can_view(user, &lesson) => Ok(lesson),
        Ok(Some(_)) => Err(crate::services::forbidden("No permission to access this lesson")),
        Ok(None) => Err(lesson_not_found()),
        Err(e) => Err(crate::services::storage_error_response(
            e,
            ErrorCode::InternalServerError,
        )),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::lessons::entities::{Lesson, LessonStatus};
    use crate::models::users::entities::{User, UserRole, UserStatus};
    use chrono::{DateTime, Utc};

    pub fn user(id: i64, role: UserRole) -> User {
        let now = Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            avatar_url: None,
            utc_offset_minutes: 0,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn lesson(id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Lesson {
        Lesson {
            id,
            tutor_id: 2,
            student_id: 3,
            course_id: None,
            title: format!("Lesson {id}"),
            start_at: start,
            end_at: end,
            status: LessonStatus::Scheduled,
            notes: None,
            price_cents: 0,
            cancel_reason: None,
            cancelled_by: None,
            cancelled_at: None,
            created_at: start,
            updated_at: start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{lesson, user};
    use super::*;
    use crate::models::users::entities::UserRole;
    use chrono::{TimeDelta, Utc};

    #[test]
    fn test_lesson_access_rules() {
        let now = Utc::now();
        let l = lesson(1, now, now + TimeDelta::hours(1));

        assert!(can_view(&user(2, UserRole::Tutor), &l));
        assert!(can_view(&user(3, UserRole::Student), &l));
        assert!(!can_view(&user(4, UserRole::Student), &l));
        assert!(can_view(&user(1, UserRole::Admin), &l));

        assert!(can_manage(&user(2, UserRole::Tutor), &l));
        assert!(!can_manage(&user(3, UserRole::Student), &l));
        assert!(!can_manage(&user(5, UserRole::Tutor), &l));
        assert!(can_manage(&user(1, UserRole::Admin), &l));
    }
}
