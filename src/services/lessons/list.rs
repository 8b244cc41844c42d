use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LessonService;
use crate::models::{
    ApiResponse, ErrorCode,
    lessons::requests::{LessonListParams, LessonListQuery},
};
use crate::services::{current_user, storage_error_response};

pub async fn list_lessons(
    service: &LessonService,
    query: LessonListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let mut list_query = LessonListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        tutor_id: query.tutor_id,
        student_id: query.student_id,
        participant_id: None,
        status: query.status,
        from: query.from,
        to: query.to,
    };

    // 非管理员只能看到自己参与的课时
    if !current.is_admin() {
        list_query.participant_id = Some(current.id);
    }

    match storage.list_lessons_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Lessons retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
