use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    lessons::{
        entities::Lesson,
        requests::{LessonListQuery, LessonRangeQuery, NewLesson, UpdateLessonRequest},
        responses::LessonListResponse,
    },
    revenue::{
        entities::{RevenueTransaction, TransactionStatus},
        requests::{NewTransaction, TransactionListQuery},
        responses::TransactionListResponse,
    },
    slots::{
        entities::{TimeRange, TutorSlot},
        requests::SlotEdit,
        responses::SlotEditOutcome,
    },
    songs::{
        entities::Song,
        requests::{CreateSongRequest, SongListQuery, UpdateSongRequest},
        responses::SongListResponse,
    },
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionReview},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 课程管理方法
    async fn create_course(&self, tutor_id: i64, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;

    /// 曲谱管理方法
    async fn create_song(&self, created_by: i64, song: CreateSongRequest) -> Result<Song>;
    async fn get_song_by_id(&self, song_id: i64) -> Result<Option<Song>>;
    async fn list_songs_with_pagination(&self, query: SongListQuery) -> Result<SongListResponse>;
    async fn update_song(&self, song_id: i64, update: UpdateSongRequest) -> Result<Option<Song>>;
    async fn delete_song(&self, song_id: i64) -> Result<bool>;

    /// 课时管理方法
    // 创建课时（同一教师时间冲突在事务内复查）
    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson>;
    async fn get_lesson_by_id(&self, lesson_id: i64) -> Result<Option<Lesson>>;
    async fn list_lessons_with_pagination(
        &self,
        query: LessonListQuery,
    ) -> Result<LessonListResponse>;
    // 列出与时间窗口重叠的课时，按开始时间排序
    async fn list_lessons_in_range(&self, query: LessonRangeQuery) -> Result<Vec<Lesson>>;
    // 更新/改期，仅限已排课状态
    async fn update_lesson(
        &self,
        lesson_id: i64,
        update: UpdateLessonRequest,
    ) -> Result<Option<Lesson>>;
    // 取消课时：仅当状态为 scheduled 时生效，返回是否更新成功
    async fn cancel_lesson(
        &self,
        lesson_id: i64,
        cancelled_by: i64,
        reason: Option<String>,
    ) -> Result<bool>;
    // 完成课时，可同时记录一笔待支付流水
    async fn complete_lesson(
        &self,
        lesson_id: i64,
        payment: Option<NewTransaction>,
    ) -> Result<bool>;
    async fn delete_lesson(&self, lesson_id: i64) -> Result<bool>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        tutor_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;

    /// 提交管理方法
    // 新建提交并同步作业状态
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_latest_submission(&self, assignment_id: i64) -> Result<Option<Submission>>;
    // 某作业的全部提交，按版本升序
    async fn list_submission_history(&self, assignment_id: i64) -> Result<Vec<Submission>>;
    // 批改最新提交并同步作业状态
    async fn review_submission(&self, review: SubmissionReview) -> Result<Option<Submission>>;

    /// 收入流水方法
    async fn create_transaction(&self, transaction: NewTransaction) -> Result<RevenueTransaction>;
    async fn get_transaction_by_id(&self, transaction_id: i64)
    -> Result<Option<RevenueTransaction>>;
    async fn list_transactions_with_pagination(
        &self,
        query: TransactionListQuery,
    ) -> Result<TransactionListResponse>;
    // 不分页的流水列表，用于汇总
    async fn list_transactions(&self, query: TransactionListQuery)
    -> Result<Vec<RevenueTransaction>>;
    // 按当前状态条件更新，返回是否更新成功
    async fn update_transaction_status(
        &self,
        transaction_id: i64,
        from: TransactionStatus,
        to: TransactionStatus,
        note: Option<String>,
    ) -> Result<bool>;

    /// 可用时段方法
    // 与窗口重叠的时段区间
    async fn list_tutor_slots(&self, tutor_id: i64, window: TimeRange) -> Result<Vec<TutorSlot>>;
    // 在事务内应用一次编辑并重新合并
    async fn apply_slot_edit(&self, tutor_id: i64, edit: SlotEdit) -> Result<SlotEditOutcome>;
}
